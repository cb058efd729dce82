use crate::util::format_growth_time;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StatsPanelProps {
    pub money: u64,
    pub speed_level: u32,
    pub growth_time_ms: f64,
    pub tool_level: u32,
    pub max_tool_level: u32,
}

#[function_component]
pub fn StatsPanel(props: &StatsPanelProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;"; // icon | label | value
    let icon_style = "width:20px; text-align:center; flex-shrink:0;";
    let label_style = "flex:1; font-weight:500;";
    let value_style =
        "min-width:70px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    html! {
        <div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:230px; display:flex; flex-direction:column; gap:10px; font-size:14px;">
            <div style={row_style}>
                <span style={format!("{} color:#d4af37;", icon_style)}>{"🪙"}</span>
                <span style={format!("{} color:#d4af37;", label_style)}>{"Money"}</span>
                <span id="money" style={format!("{} color:#d4af37;", value_style)}>{ props.money }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{} color:#2ea043;", icon_style)}>{"🌱"}</span>
                <span style={format!("{} color:#2ea043;", label_style)}>{"Crop Speed"}</span>
                <span id="speedLevel" style={format!("{} color:#2ea043;", value_style)}>{ props.speed_level }</span>
            </div>
            <div style={row_style}>
                <span style={icon_style}>{"⏱"}</span>
                <span style={label_style}>{"Growth Time"}</span>
                <span style={value_style}>{ format_growth_time(props.growth_time_ms) }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{} color:#58a6ff;", icon_style)}>{"⛏"}</span>
                <span style={format!("{} color:#58a6ff;", label_style)}>{"Tool Level"}</span>
                <span id="toolLevel" style={format!("{} color:#58a6ff;", value_style)}>
                    { format!("{} / {}", props.tool_level, props.max_tool_level) }
                </span>
            </div>
        </div>
    }
}
