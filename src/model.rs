//! Core data model for Crop Tycoon.
//! The farm grid, the economy counters and every rule that mutates them.
//! Nothing here touches the DOM; timestamps are passed in by the caller.

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use thiserror::Error;
use yew::Reducible;

use crate::config::{inflate_cost, FarmConfig, GridSize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub planted: bool,
    /// Milliseconds since the epoch at planting. Only meaningful while `planted`.
    pub planted_at: f64,
    pub ready: bool,
}

impl Tile {
    fn plant(&mut self, now: f64) {
        self.planted = true;
        self.ready = false;
        self.planted_at = now;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Economy {
    pub money: u64,
    pub crop_speed_level: u32,
    pub upgrade_cost: u64,
    pub tool_level: u32,
    pub tool_upgrade_cost: u64,
}

impl Economy {
    pub fn new(cfg: &FarmConfig) -> Self {
        Self {
            money: cfg.starting_money,
            crop_speed_level: 1,
            upgrade_cost: cfg.speed_upgrade_base_cost,
            tool_level: 1,
            tool_upgrade_cost: cfg.tool_upgrade_base_cost,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum UpgradeError {
    #[error("need {needed} money, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error("already at max level {max}")]
    MaxLevel { max: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    OutOfBounds,
    Planted { count: u32, cost: u64 },
    Harvested { earned: u64 },
    /// Nothing affordable to plant and nothing ready to harvest.
    Nothing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FarmState {
    pub config: FarmConfig,
    /// Row-major tiles; length = width * height.
    pub tiles: Vec<Tile>,
    pub economy: Economy,
    /// Bumped on every mutation; drives redraw and autosave.
    pub version: u64,
    /// Latest player-facing diagnostic.
    pub status: String,
}

impl FarmState {
    pub fn new(config: FarmConfig) -> Self {
        let gs = config.grid_size;
        let tiles = vec![Tile::default(); (gs.width * gs.height) as usize];
        let economy = Economy::new(&config);
        Self {
            config,
            tiles,
            economy,
            version: 0,
            status: String::new(),
        }
    }

    pub fn grid_size(&self) -> GridSize {
        self.config.grid_size
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        let gs = self.config.grid_size;
        x >= 0 && y >= 0 && (x as u32) < gs.width && (y as u32) < gs.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some((y as u32 * self.config.grid_size.width + x as u32) as usize)
        } else {
            None
        }
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).map(|i| &self.tiles[i])
    }

    pub fn tile_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        self.index(x, y).map(move |i| &mut self.tiles[i])
    }

    /// In-bounds indices of the (2r+1)² square around the origin, row by row.
    fn square(&self, origin_x: i32, origin_y: i32, radius: i32) -> Vec<usize> {
        let mut out = Vec::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if let Some(i) = self.index(origin_x + dx, origin_y + dy) {
                    out.push(i);
                }
            }
        }
        out
    }

    /// Half-width of the square the tool affects.
    pub fn tool_radius(&self) -> i32 {
        (self.economy.tool_level / 2) as i32
    }

    pub fn growth_time_ms(&self) -> f64 {
        self.config.base_growth_ms / self.economy.crop_speed_level.max(1) as f64
    }

    pub fn plant_square(&mut self, origin_x: i32, origin_y: i32, radius: i32, now: f64) -> u32 {
        let crop_cost = self.config.crop_cost;
        let budget = self.economy.money;
        let mut planted = 0u32;
        let mut total_cost = 0u64;
        for i in self.square(origin_x, origin_y, radius) {
            let tile = &mut self.tiles[i];
            if !tile.planted && budget - total_cost >= crop_cost {
                tile.plant(now);
                total_cost += crop_cost;
                planted += 1;
            }
        }
        if planted > 0 {
            self.economy.money -= total_cost;
            log::info!("[Economy] planted {planted} crops for {total_cost}");
        }
        planted
    }

    pub fn harvest_square(&mut self, origin_x: i32, origin_y: i32, radius: i32) -> bool {
        let sell = self.config.crop_sell_value;
        let mut harvested = 0u64;
        for i in self.square(origin_x, origin_y, radius) {
            let tile = &mut self.tiles[i];
            if tile.ready {
                *tile = Tile::default();
                self.economy.money = self.economy.money.saturating_add(sell);
                harvested += 1;
            }
        }
        if harvested > 0 {
            log::info!("[Economy] harvested {harvested} crops (+{})", harvested.saturating_mul(sell));
        }
        harvested > 0
    }

    /// Plant first; harvest only when nothing could be planted.
    pub fn click(&mut self, x: i32, y: i32, now: f64) -> ClickOutcome {
        if !self.in_bounds(x, y) {
            log::debug!("click ({x},{y}) outside the farm");
            return ClickOutcome::OutOfBounds;
        }
        let radius = self.tool_radius();
        let before = self.economy.money;
        let count = self.plant_square(x, y, radius, now);
        if count > 0 {
            return ClickOutcome::Planted {
                count,
                cost: before - self.economy.money,
            };
        }
        if self.harvest_square(x, y, radius) {
            return ClickOutcome::Harvested {
                earned: self.economy.money - before,
            };
        }
        log::warn!("not enough money to plant with the current tool or no crops to harvest");
        ClickOutcome::Nothing
    }

    fn is_ripe(&self, tile: &Tile, now: f64) -> bool {
        tile.planted && !tile.ready && now - tile.planted_at >= self.growth_time_ms()
    }

    /// True when `tick(now)` would mature at least one crop.
    pub fn has_ripe(&self, now: f64) -> bool {
        self.tiles.iter().any(|t| self.is_ripe(t, now))
    }

    /// Marks every planted crop whose growth time has elapsed as ready.
    /// Returns how many tiles matured.
    pub fn tick(&mut self, now: f64) -> usize {
        let growth = self.growth_time_ms();
        let mut matured = 0;
        for tile in self.tiles.iter_mut().filter(|t| t.planted && !t.ready) {
            if now - tile.planted_at >= growth {
                tile.ready = true;
                matured += 1;
            }
        }
        matured
    }

    pub fn can_upgrade_crop_speed(&self) -> bool {
        let e = &self.economy;
        e.money >= e.upgrade_cost && e.money - e.upgrade_cost >= self.config.crop_cost
    }

    pub fn can_upgrade_tool(&self) -> bool {
        let e = &self.economy;
        e.money >= e.tool_upgrade_cost && e.tool_level < self.config.max_tool_level
    }

    /// Buys one speed level. Refused unless a crop is still affordable afterwards.
    pub fn upgrade_crop_speed(&mut self) -> Result<u32, UpgradeError> {
        if !self.can_upgrade_crop_speed() {
            return Err(UpgradeError::InsufficientFunds {
                needed: self.economy.upgrade_cost.saturating_add(self.config.crop_cost),
                available: self.economy.money,
            });
        }
        let e = &mut self.economy;
        e.money -= e.upgrade_cost;
        e.crop_speed_level = e.crop_speed_level.saturating_add(1);
        e.upgrade_cost = inflate_cost(e.upgrade_cost);
        log::info!("[Economy] crop speed upgraded to level {}", e.crop_speed_level);
        Ok(e.crop_speed_level)
    }

    pub fn upgrade_tool(&mut self) -> Result<u32, UpgradeError> {
        let max = self.config.max_tool_level;
        if self.economy.tool_level >= max {
            return Err(UpgradeError::MaxLevel { max });
        }
        if self.economy.money < self.economy.tool_upgrade_cost {
            return Err(UpgradeError::InsufficientFunds {
                needed: self.economy.tool_upgrade_cost,
                available: self.economy.money,
            });
        }
        let e = &mut self.economy;
        e.money -= e.tool_upgrade_cost;
        e.tool_level += 1;
        e.tool_upgrade_cost = inflate_cost(e.tool_upgrade_cost);
        log::info!("[Economy] tool upgraded to level {}", e.tool_level);
        Ok(e.tool_level)
    }
}

// ---------------- Reducer & Actions -----------------
#[derive(Clone, Debug)]
pub enum FarmAction {
    /// Pointer click already mapped to grid coordinates.
    Click { x: i32, y: i32, now: f64 },
    /// Called once per animation frame.
    Tick { now: f64 },
    UpgradeCropSpeed,
    UpgradeTool,
    /// Start over with a fresh farm (save wipe handled by the caller).
    Reset,
}

impl Reducible for FarmState {
    type Action = FarmAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use FarmAction::*;
        match action {
            Tick { now } if !self.has_ripe(now) => return self,
            Click { x, y, .. } if !self.in_bounds(x, y) => return self,
            _ => {}
        }
        let mut new = (*self).clone();
        match action {
            Click { x, y, now } => {
                new.status = match new.click(x, y, now) {
                    ClickOutcome::OutOfBounds => return self,
                    ClickOutcome::Planted { count, cost } => format!("Planted {count} crops (-{cost})"),
                    ClickOutcome::Harvested { earned } => format!("Harvested crops (+{earned})"),
                    ClickOutcome::Nothing => {
                        "Not enough money to plant crops with current tool or no crops to harvest"
                            .to_string()
                    }
                };
            }
            Tick { now } => {
                new.tick(now);
            }
            UpgradeCropSpeed => {
                new.status = match new.upgrade_crop_speed() {
                    Ok(level) => format!("Upgrade successful. New level: {level}"),
                    Err(e) => {
                        log::warn!("crop speed upgrade refused: {e}");
                        format!("Cannot upgrade crop speed: {e}")
                    }
                };
            }
            UpgradeTool => {
                new.status = match new.upgrade_tool() {
                    Ok(level) => format!("Tool upgraded! New level: {level}"),
                    Err(e) => {
                        log::warn!("tool upgrade refused: {e}");
                        format!("Cannot upgrade tool: {e}")
                    }
                };
            }
            Reset => {
                let mut fresh = FarmState::new(new.config.clone());
                fresh.status = "Started a fresh farm".to_string();
                new = fresh;
            }
        }
        new.version = self.version.wrapping_add(1);
        Rc::new(new)
    }
}
