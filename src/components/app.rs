use super::{controls_panel::ControlsPanel, farm_view::FarmView, stats_panel::StatsPanel};
use crate::config::FarmConfig;
use crate::model::{FarmAction, FarmState};
use crate::persistence::{self, BrowserStorage};
use yew::prelude::*;

fn initial_farm() -> FarmState {
    let config = FarmConfig::default();
    match BrowserStorage::open() {
        Ok(store) => persistence::load(&store, config),
        Err(e) => {
            log::warn!("starting without a save: {e}");
            FarmState::new(config)
        }
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let farm = use_reducer(initial_farm);

    // Persist every state change
    {
        let farm = farm.clone();
        use_effect_with(farm.version, move |version| {
            if *version > 0 {
                let saved = BrowserStorage::open().and_then(|store| persistence::save(&store, &farm));
                if let Err(e) = saved {
                    log::warn!("save failed: {e}");
                }
            }
            || ()
        });
    }

    let upgrade_speed = {
        let farm = farm.clone();
        Callback::from(move |()| farm.dispatch(FarmAction::UpgradeCropSpeed))
    };
    let upgrade_tool = {
        let farm = farm.clone();
        Callback::from(move |()| farm.dispatch(FarmAction::UpgradeTool))
    };
    let reset = {
        let farm = farm.clone();
        Callback::from(move |()| {
            let cleared = BrowserStorage::open().and_then(|store| persistence::clear(&store, &farm.config));
            if let Err(e) = cleared {
                log::warn!("could not clear save: {e}");
            }
            farm.dispatch(FarmAction::Reset);
        })
    };

    let e = farm.economy;
    let cfg = &farm.config;
    html! {
        <div id="root" style="display:flex; gap:16px; padding:16px; align-items:flex-start; color:#c9d1d9; background:#0e1116; min-height:100vh; font-family:sans-serif;">
            <FarmView farm={farm.clone()} />
            <div style="display:flex; flex-direction:column; gap:12px;">
                <StatsPanel
                    money={e.money}
                    speed_level={e.crop_speed_level}
                    growth_time_ms={farm.growth_time_ms()}
                    tool_level={e.tool_level}
                    max_tool_level={cfg.max_tool_level}
                />
                <ControlsPanel
                    upgrade_cost={e.upgrade_cost}
                    tool_upgrade_cost={e.tool_upgrade_cost}
                    can_upgrade_speed={farm.can_upgrade_crop_speed()}
                    can_upgrade_tool={farm.can_upgrade_tool()}
                    tool_maxed={e.tool_level >= cfg.max_tool_level}
                    crop_cost={cfg.crop_cost}
                    crop_sell_value={cfg.crop_sell_value}
                    status={farm.status.clone()}
                    on_upgrade_speed={upgrade_speed}
                    on_upgrade_tool={upgrade_tool}
                    on_reset={reset}
                />
            </div>
        </div>
    }
}
