//! Local snapshot of the farm: `{ money, cropSpeedLevel, farmGrid }` as JSON
//! under a single storage key.
//!
//! Loading is lenient. The snapshot is merged field by field into a freshly
//! built farm, so a missing or mistyped value only loses that value.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::{cost_after, FarmConfig, MAX_SAVED_COST, MAX_SAVED_SPEED_LEVEL};
use crate::model::{FarmState, Tile};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("local storage is unavailable")]
    Unavailable,
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value backend the snapshot is written to.
pub trait SnapshotStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn write(&self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&self, key: &str) -> Result<(), PersistError>;
}

/// `window.localStorage`.
pub struct BrowserStorage {
    store: web_sys::Storage,
}

impl BrowserStorage {
    pub fn open() -> Result<Self, PersistError> {
        let win = web_sys::window().ok_or(PersistError::Unavailable)?;
        match win.local_storage() {
            Ok(Some(store)) => Ok(Self { store }),
            Ok(None) => Err(PersistError::Unavailable),
            Err(e) => Err(PersistError::Storage(format!("{e:?}"))),
        }
    }
}

impl SnapshotStore for BrowserStorage {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        self.store
            .get_item(key)
            .map_err(|e| PersistError::Storage(format!("{e:?}")))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.store
            .set_item(key, value)
            .map_err(|e| PersistError::Storage(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.store
            .remove_item(key)
            .map_err(|e| PersistError::Storage(format!("{e:?}")))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub money: u64,
    pub crop_speed_level: u32,
    /// Rows indexed `[y][x]`.
    pub farm_grid: Vec<Vec<Tile>>,
    pub tool_level: u32,
    pub upgrade_cost: u64,
    pub tool_upgrade_cost: u64,
}

impl Snapshot {
    pub fn of(state: &FarmState) -> Self {
        let width = state.grid_size().width.max(1) as usize;
        Self {
            money: state.economy.money,
            crop_speed_level: state.economy.crop_speed_level,
            farm_grid: state.tiles.chunks(width).map(|row| row.to_vec()).collect(),
            tool_level: state.economy.tool_level,
            upgrade_cost: state.economy.upgrade_cost,
            tool_upgrade_cost: state.economy.tool_upgrade_cost,
        }
    }
}

pub fn to_json(state: &FarmState) -> Result<String, PersistError> {
    Ok(serde_json::to_string(&Snapshot::of(state))?)
}

/// Builds a farm from `config` and merges whatever `raw` provides on top.
pub fn from_json(raw: &str, config: FarmConfig) -> Result<FarmState, PersistError> {
    let data: Value = serde_json::from_str(raw)?;
    let mut state = FarmState::new(config);
    merge(&mut state, &data);
    Ok(state)
}

// A zero, like a missing value, falls back to the default.
fn positive_u64(v: Option<&Value>) -> Option<u64> {
    v.and_then(Value::as_u64).filter(|n| *n > 0)
}

fn positive_u32(v: Option<&Value>) -> Option<u32> {
    positive_u64(v).and_then(|n| u32::try_from(n).ok())
}

fn saved_cost(v: Option<&Value>) -> Option<u64> {
    positive_u64(v).filter(|c| *c <= MAX_SAVED_COST)
}

fn merge(state: &mut FarmState, data: &Value) {
    let cfg = state.config.clone();
    let e = &mut state.economy;
    e.money = positive_u64(data.get("money")).unwrap_or(0);
    e.crop_speed_level = positive_u32(data.get("cropSpeedLevel"))
        .filter(|lvl| *lvl <= MAX_SAVED_SPEED_LEVEL)
        .unwrap_or(1);
    e.tool_level = positive_u32(data.get("toolLevel"))
        .unwrap_or(1)
        .min(cfg.max_tool_level.max(1));
    e.upgrade_cost = saved_cost(data.get("upgradeCost"))
        .unwrap_or_else(|| cost_after(cfg.speed_upgrade_base_cost, e.crop_speed_level - 1));
    e.tool_upgrade_cost = saved_cost(data.get("toolUpgradeCost"))
        .unwrap_or_else(|| cost_after(cfg.tool_upgrade_base_cost, e.tool_level - 1));

    let Some(rows) = data.get("farmGrid").and_then(Value::as_array) else {
        return;
    };
    for (y, row) in rows.iter().enumerate() {
        let Some(row) = row.as_array() else { continue };
        for (x, saved) in row.iter().enumerate() {
            let Some(tile) = state.tile_mut(x as i32, y as i32) else { continue };
            merge_tile(tile, saved);
        }
    }
}

fn merge_tile(tile: &mut Tile, saved: &Value) {
    let Some(fields) = saved.as_object() else { return };
    if let Some(p) = fields.get("planted").and_then(Value::as_bool) {
        tile.planted = p;
    }
    if let Some(t) = fields.get("plantedAt").and_then(Value::as_f64) {
        tile.planted_at = t;
    }
    if let Some(r) = fields.get("ready").and_then(Value::as_bool) {
        tile.ready = r;
    }
    if tile.ready && !tile.planted {
        tile.ready = false;
    }
}

pub fn save(store: &impl SnapshotStore, state: &FarmState) -> Result<(), PersistError> {
    let json = to_json(state)?;
    store.write(&state.config.save_key, &json)
}

/// Never fails: absent or unreadable snapshots yield a fresh farm.
pub fn load(store: &impl SnapshotStore, config: FarmConfig) -> FarmState {
    let raw = match store.read(&config.save_key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return FarmState::new(config),
        Err(e) => {
            log::warn!("could not read save: {e}");
            return FarmState::new(config);
        }
    };
    match from_json(&raw, config.clone()) {
        Ok(state) => {
            log::info!("loaded save ({} money)", state.economy.money);
            state
        }
        Err(e) => {
            log::warn!("ignoring corrupt save: {e}");
            FarmState::new(config)
        }
    }
}

pub fn clear(store: &impl SnapshotStore, config: &FarmConfig) -> Result<(), PersistError> {
    store.remove(&config.save_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore {
        items: RefCell<HashMap<String, String>>,
    }

    impl SnapshotStore for MemoryStore {
        fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
            Ok(self.items.borrow().get(key).cloned())
        }
        fn write(&self, key: &str, value: &str) -> Result<(), PersistError> {
            self.items.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
        fn remove(&self, key: &str) -> Result<(), PersistError> {
            self.items.borrow_mut().remove(key);
            Ok(())
        }
    }

    fn cfg() -> FarmConfig {
        FarmConfig::default()
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = MemoryStore::default();
        let mut farm = FarmState::new(cfg());
        farm.economy.money = 500;
        farm.upgrade_crop_speed().unwrap();
        farm.upgrade_tool().unwrap();
        farm.click(4, 3, 1_234.5);
        farm.click(10, 10, 2_000.0);
        farm.tick(2_000.0 + 5_000.0);

        save(&store, &farm).unwrap();
        let loaded = load(&store, cfg());

        assert_eq!(loaded.economy, farm.economy);
        assert_eq!(loaded.tiles, farm.tiles);
        assert!(loaded.tile(4, 3).unwrap().ready);
        assert_eq!(loaded.tile(10, 10).unwrap().planted_at, 2_000.0);
    }

    #[test]
    fn snapshot_uses_camel_case_field_names() {
        let mut farm = FarmState::new(cfg());
        farm.click(1, 0, 42.0);
        let v: Value = serde_json::from_str(&to_json(&farm).unwrap()).unwrap();
        assert_eq!(v["money"], 45);
        assert_eq!(v["cropSpeedLevel"], 1);
        assert_eq!(v["farmGrid"].as_array().unwrap().len(), 15);
        assert_eq!(v["farmGrid"][0].as_array().unwrap().len(), 20);
        assert_eq!(v["farmGrid"][0][1]["planted"], true);
        assert_eq!(v["farmGrid"][0][1]["plantedAt"], 42.0);
    }

    #[test]
    fn missing_store_entry_gives_fresh_farm() {
        let loaded = load(&MemoryStore::default(), cfg());
        assert_eq!(loaded, FarmState::new(cfg()));
    }

    #[test]
    fn corrupt_json_is_ignored() {
        let store = MemoryStore::default();
        store.write("cropTycoonSave", "{not json").unwrap();
        assert_eq!(load(&store, cfg()), FarmState::new(cfg()));
    }

    #[test]
    fn missing_fields_default() {
        let farm = from_json("{}", cfg()).unwrap();
        assert_eq!(farm.economy.money, 0);
        assert_eq!(farm.economy.crop_speed_level, 1);
        assert_eq!(farm.economy.upgrade_cost, 50);
        assert_eq!(farm.economy.tool_level, 1);
        assert!(farm.tiles.iter().all(|t| *t == Tile::default()));
    }

    #[test]
    fn mistyped_fields_degrade_per_field() {
        let raw = r#"{"money":"lots","cropSpeedLevel":0,"farmGrid":[[{"planted":true,"plantedAt":"noon"},7,{"ready":true}]]}"#;
        let farm = from_json(raw, cfg()).unwrap();
        assert_eq!(farm.economy.money, 0);
        assert_eq!(farm.economy.crop_speed_level, 1);
        let t0 = farm.tile(0, 0).unwrap();
        assert!(t0.planted && !t0.ready);
        assert_eq!(t0.planted_at, 0.0);
        assert_eq!(*farm.tile(1, 0).unwrap(), Tile::default());
        // ready without planted is not kept
        assert!(!farm.tile(2, 0).unwrap().ready);
    }

    #[test]
    fn legacy_snapshot_rebuilds_cost_ladder() {
        let raw = r#"{"money":80,"cropSpeedLevel":3,"farmGrid":[]}"#;
        let farm = from_json(raw, cfg()).unwrap();
        assert_eq!(farm.economy.money, 80);
        assert_eq!(farm.economy.upgrade_cost, 112);
        assert_eq!(farm.economy.tool_upgrade_cost, 100);
    }

    #[test]
    fn oversized_grid_is_clipped() {
        let row: Vec<Value> = (0..30)
            .map(|_| serde_json::json!({"planted": true, "plantedAt": 1.0, "ready": false}))
            .collect();
        let grid: Vec<Value> = (0..20).map(|_| Value::Array(row.clone())).collect();
        let raw = serde_json::json!({ "money": 5, "farmGrid": grid }).to_string();
        let farm = from_json(&raw, cfg()).unwrap();
        assert_eq!(farm.tiles.len(), 300);
        assert!(farm.tiles.iter().all(|t| t.planted));
    }

    #[test]
    fn absurd_saved_cost_is_rebuilt_from_level() {
        let raw = r#"{"money":10,"cropSpeedLevel":2,"upgradeCost":18446744073709551615,"toolUpgradeCost":18446744073709551615}"#;
        let mut farm = from_json(raw, cfg()).unwrap();
        assert_eq!(farm.economy.upgrade_cost, 75);
        assert_eq!(farm.economy.tool_upgrade_cost, 100);
        assert!(farm.upgrade_crop_speed().is_err());
        assert_eq!(farm.economy.money, 10);
    }

    #[test]
    fn implausible_speed_level_falls_back_to_default() {
        let farm = from_json(r#"{"cropSpeedLevel":4000000000}"#, cfg()).unwrap();
        assert_eq!(farm.economy.crop_speed_level, 1);
        assert_eq!(farm.economy.upgrade_cost, 50);
    }

    #[test]
    fn highest_allowed_speed_level_loads() {
        let raw = format!(r#"{{"cropSpeedLevel":{MAX_SAVED_SPEED_LEVEL}}}"#);
        let farm = from_json(&raw, cfg()).unwrap();
        assert_eq!(farm.economy.crop_speed_level, MAX_SAVED_SPEED_LEVEL);
        assert_eq!(farm.economy.upgrade_cost, u64::MAX / 2);
    }

    #[test]
    fn tool_level_is_capped_on_load() {
        let farm = from_json(r#"{"toolLevel":99}"#, cfg()).unwrap();
        assert_eq!(farm.economy.tool_level, 5);
    }

    #[test]
    fn clear_removes_snapshot() {
        let store = MemoryStore::default();
        let farm = FarmState::new(cfg());
        save(&store, &farm).unwrap();
        clear(&store, &farm.config).unwrap();
        assert!(store.read("cropTycoonSave").unwrap().is_none());
    }
}
