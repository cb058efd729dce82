use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub upgrade_cost: u64,
    pub tool_upgrade_cost: u64,
    pub can_upgrade_speed: bool,
    pub can_upgrade_tool: bool,
    pub tool_maxed: bool,
    pub crop_cost: u64,
    pub crop_sell_value: u64,
    pub status: String,
    pub on_upgrade_speed: Callback<()>,
    pub on_upgrade_tool: Callback<()>,
    pub on_reset: Callback<()>,
}

fn button_style(enabled: bool) -> &'static str {
    if enabled {
        "opacity:1; cursor:pointer;"
    } else {
        "opacity:0.5; cursor:not-allowed;"
    }
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let speed_cb = {
        let cb = props.on_upgrade_speed.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let tool_cb = {
        let cb = props.on_upgrade_tool.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let reset_cb = {
        let cb = props.on_reset.clone();
        Callback::from(move |_| {
            if let Some(win) = web_sys::window() {
                if win
                    .confirm_with_message("This will wipe your farm and start fresh. Are you sure?")
                    .unwrap_or(false)
                {
                    cb.emit(());
                }
            } else {
                cb.emit(());
            }
        })
    };
    let tool_label = if props.tool_maxed {
        "Upgrade Tool (Max level)".to_string()
    } else {
        format!("Upgrade Tool (Cost: {})", props.tool_upgrade_cost)
    };
    html! {<div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:230px; display:flex; flex-direction:column; gap:6px;">
        <button id="upgradeSpeedBtn" onclick={speed_cb} disabled={!props.can_upgrade_speed} style={button_style(props.can_upgrade_speed)}>
            { format!("Upgrade Crop Speed (Cost: {})", props.upgrade_cost) }
        </button>
        <button id="upgradeToolBtn" onclick={tool_cb} disabled={!props.can_upgrade_tool} style={button_style(props.can_upgrade_tool)}>
            { tool_label }
        </button>
        <button onclick={reset_cb} style="background:#f85149; border:1px solid #b62324; color:#fff;">{"Reset Farm"}</button>
        <div style="font-size:11px; opacity:0.7;">{ format!("Click a tile to plant ({}) or harvest a ready crop (+{})", props.crop_cost, props.crop_sell_value) }</div>
        { if !props.status.is_empty() { html!{ <div style="font-size:11px; line-height:1.2; background:#1c2128; border:1px solid #30363d; padding:4px 6px; border-radius:6px;">{ props.status.clone() }</div> } } else { html!{} } }
    </div>}
}
