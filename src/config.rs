//! Tuning constants for the farm. Everything the simulation, the renderer and
//! the save adapter need to agree on lives in one [`FarmConfig`].

use serde::{Deserialize, Serialize};

/// Highest speed level a snapshot may claim. Beyond this the growth time is
/// already below one millisecond.
pub const MAX_SAVED_SPEED_LEVEL: u32 = 100_000;
/// Largest cost a snapshot may carry: the last integer a JS number holds exactly.
pub const MAX_SAVED_COST: u64 = (1 << 53) - 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FarmConfig {
    pub grid_size: GridSize,
    /// Edge length of one tile on the canvas, in CSS pixels.
    pub tile_px: f64,
    pub starting_money: u64,
    /// Milliseconds a crop needs at speed level 1.
    pub base_growth_ms: f64,
    pub crop_cost: u64,
    pub crop_sell_value: u64,
    pub speed_upgrade_base_cost: u64,
    pub tool_upgrade_base_cost: u64,
    pub max_tool_level: u32,
    pub save_key: String,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            grid_size: GridSize {
                width: 20,
                height: 15,
            },
            tile_px: 40.0,
            starting_money: 50,
            base_growth_ms: 10_000.0,
            crop_cost: 5,
            crop_sell_value: 15,
            speed_upgrade_base_cost: 50,
            tool_upgrade_base_cost: 100,
            max_tool_level: 5,
            save_key: "cropTycoonSave".to_string(),
        }
    }
}

impl FarmConfig {
    /// Canvas size needed to show the whole grid.
    pub fn canvas_size(&self) -> (u32, u32) {
        (
            (self.grid_size.width as f64 * self.tile_px) as u32,
            (self.grid_size.height as f64 * self.tile_px) as u32,
        )
    }
}

/// Next rung of an upgrade ladder: ×1.5, floored.
pub fn inflate_cost(cost: u64) -> u64 {
    cost.saturating_mul(3) / 2
}

/// Cost after `purchases` successful upgrades starting from `base`.
/// Stops as soon as the ladder reaches a fixed point.
pub fn cost_after(base: u64, purchases: u32) -> u64 {
    let mut cost = base;
    for _ in 0..purchases {
        let next = inflate_cost(cost);
        if next == cost {
            break;
        }
        cost = next;
    }
    cost
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inflate_floors_half_units() {
        assert_eq!(inflate_cost(50), 75);
        assert_eq!(inflate_cost(75), 112);
        assert_eq!(inflate_cost(112), 168);
        assert_eq!(inflate_cost(1), 1);
    }

    #[test]
    fn cost_ladder_replays_from_base() {
        assert_eq!(cost_after(100, 0), 100);
        assert_eq!(cost_after(100, 1), 150);
        assert_eq!(cost_after(100, 3), 337);
    }

    #[test]
    fn huge_ladder_stops_at_fixed_point() {
        let top = cost_after(50, u32::MAX);
        assert_eq!(top, u64::MAX / 2);
        assert_eq!(cost_after(1, u32::MAX), 1);
    }

    #[test]
    fn default_canvas_covers_grid() {
        assert_eq!(FarmConfig::default().canvas_size(), (800, 600));
    }
}
