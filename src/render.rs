//! Canvas drawing. Stateless: every frame paints the grid straight from a
//! `FarmState` snapshot.

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::model::{FarmState, Tile};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
    Grass,
    Tilled,
    Growing,
    Ready,
}

impl Sprite {
    pub const ALL: [Sprite; 4] = [Sprite::Grass, Sprite::Tilled, Sprite::Growing, Sprite::Ready];

    pub fn path(self) -> &'static str {
        match self {
            Sprite::Grass => "./assets/tiles/grass.png",
            Sprite::Tilled => "./assets/tiles/tilled.png",
            Sprite::Growing => "./assets/crops/crop_stage1.png",
            Sprite::Ready => "./assets/crops/crop_ready.png",
        }
    }

    /// Stand-in colour while the image is still loading (or missing).
    fn fallback(self) -> &'static str {
        match self {
            Sprite::Grass => "#3f7d3a",
            Sprite::Tilled => "#6b4a2b",
            Sprite::Growing => "#9ccc65",
            Sprite::Ready => "#f2c14e",
        }
    }
}

/// Base sprite plus optional crop overlay for one tile.
pub fn tile_layers(tile: &Tile) -> (Sprite, Option<Sprite>) {
    if !tile.planted {
        return (Sprite::Grass, None);
    }
    let crop = if tile.ready { Sprite::Ready } else { Sprite::Growing };
    (Sprite::Tilled, Some(crop))
}

pub struct Sprites {
    images: Vec<(Sprite, HtmlImageElement)>,
}

impl Sprites {
    /// Kicks off loading of every sprite; drawing falls back to flat colours until they arrive.
    pub fn load() -> Result<Self, JsValue> {
        let mut images = Vec::with_capacity(Sprite::ALL.len());
        for sprite in Sprite::ALL {
            let img = HtmlImageElement::new()?;
            img.set_src(sprite.path());
            images.push((sprite, img));
        }
        Ok(Self { images })
    }

    fn get(&self, sprite: Sprite) -> Option<&HtmlImageElement> {
        self.images
            .iter()
            .find(|(s, img)| *s == sprite && img.complete() && img.natural_width() > 0)
            .map(|(_, img)| img)
    }

    fn draw(&self, ctx: &CanvasRenderingContext2d, sprite: Sprite, x: f64, y: f64, size: f64) {
        match self.get(sprite) {
            Some(img) => {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, size, size);
            }
            None => match sprite {
                Sprite::Grass | Sprite::Tilled => {
                    ctx.set_fill_style_str(sprite.fallback());
                    ctx.fill_rect(x, y, size, size);
                }
                Sprite::Growing | Sprite::Ready => {
                    let m = size * 0.3;
                    ctx.set_fill_style_str(sprite.fallback());
                    ctx.fill_rect(x + m, y + m, size - 2.0 * m, size - 2.0 * m);
                }
            },
        }
    }
}

pub fn draw_farm(ctx: &CanvasRenderingContext2d, state: &FarmState, sprites: &Sprites) {
    let gs = state.grid_size();
    let size = state.config.tile_px;
    ctx.clear_rect(0.0, 0.0, gs.width as f64 * size, gs.height as f64 * size);
    for y in 0..gs.height {
        for x in 0..gs.width {
            let Some(tile) = state.tile(x as i32, y as i32) else {
                continue;
            };
            let px = x as f64 * size;
            let py = y as f64 * size;
            let (base, crop) = tile_layers(tile);
            sprites.draw(ctx, base, px, py, size);
            if let Some(crop) = crop {
                sprites.draw(ctx, crop, px, py, size);
            }
        }
    }
}
