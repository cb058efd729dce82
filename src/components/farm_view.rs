use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

use crate::model::{FarmAction, FarmState};
use crate::render::{draw_farm, Sprites};
use crate::util::pointer_to_tile;

#[derive(Properties, PartialEq, Clone)]
pub struct FarmViewProps {
    pub farm: UseReducerHandle<FarmState>,
}

/// Starts the tick + draw animation-frame loop. Returns its teardown.
fn start_frame_loop(
    canvas: HtmlCanvasElement,
    farm_ref: Rc<RefCell<UseReducerHandle<FarmState>>>,
    dispatcher: UseReducerDispatcher<FarmState>,
) -> Option<impl FnOnce() + 'static> {
    let window = web_sys::window()?;
    let ctx = match canvas.get_context("2d") {
        Ok(Some(obj)) => obj.dyn_into::<CanvasRenderingContext2d>().ok()?,
        _ => {
            log::error!("canvas has no 2d context");
            return None;
        }
    };
    let sprites = match Sprites::load() {
        Ok(s) => s,
        Err(e) => {
            log::error!("could not create sprite images: {e:?}");
            return None;
        }
    };

    let raf_id = Rc::new(RefCell::new(None::<i32>));
    let frame_cell: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    {
        let raf_id = raf_id.clone();
        let frame_cell_inner = frame_cell.clone();
        let window_loop = window.clone();
        *frame_cell.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            dispatcher.dispatch(FarmAction::Tick {
                now: js_sys::Date::now(),
            });
            draw_farm(&ctx, &farm_ref.borrow(), &sprites);
            // schedule next frame
            if let Some(cb) = frame_cell_inner.borrow().as_ref() {
                if let Ok(id) = window_loop.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    *raf_id.borrow_mut() = Some(id);
                }
            }
        }) as Box<dyn FnMut()>));
    }
    if let Some(cb) = frame_cell.borrow().as_ref() {
        if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            *raf_id.borrow_mut() = Some(id);
        }
    }

    Some(move || {
        if let Some(id) = raf_id.borrow_mut().take() {
            let _ = window.cancel_animation_frame(id);
        }
        // breaks the closure <-> cell cycle
        let _ = frame_cell.borrow_mut().take();
    })
}

#[function_component(FarmView)]
pub fn farm_view(props: &FarmViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let farm_ref = use_mut_ref(|| props.farm.clone());

    // Effect: keep the frame loop looking at the latest state
    {
        let farm_ref = farm_ref.clone();
        let current_handle = props.farm.clone();
        use_effect_with(props.farm.version, move |_| {
            *farm_ref.borrow_mut() = current_handle;
            || ()
        });
    }

    {
        let canvas_ref = canvas_ref.clone();
        let farm_ref = farm_ref.clone();
        let dispatcher = props.farm.dispatcher();
        use_effect_with((), move |_| {
            let teardown = canvas_ref
                .cast::<HtmlCanvasElement>()
                .and_then(|canvas| start_frame_loop(canvas, farm_ref, dispatcher));
            move || {
                if let Some(stop) = teardown {
                    stop();
                }
            }
        });
    }

    let onclick = {
        let canvas_ref = canvas_ref.clone();
        let farm = props.farm.clone();
        Callback::from(move |e: MouseEvent| {
            let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() else {
                return;
            };
            let rect = canvas.get_bounding_client_rect();
            let px = e.client_x() as f64 - rect.left();
            let py = e.client_y() as f64 - rect.top();
            match pointer_to_tile(px, py, farm.config.tile_px, farm.grid_size()) {
                Some((x, y)) => farm.dispatch(FarmAction::Click {
                    x,
                    y,
                    now: js_sys::Date::now(),
                }),
                None => log::debug!("click at ({px:.0},{py:.0}) missed the farm"),
            }
        })
    };

    let (w, h) = props.farm.config.canvas_size();
    html! {
        <canvas ref={canvas_ref} id="gameCanvas" width={w.to_string()} height={h.to_string()}
            style="display:block; border:1px solid #30363d; border-radius:8px; cursor:pointer;"
            {onclick}></canvas>
    }
}
