// Pointer and formatting helpers shared by the components

use crate::config::GridSize;

/// Maps a point relative to the canvas' top-left corner to a tile, or `None` when it misses the grid.
pub fn pointer_to_tile(px: f64, py: f64, tile_px: f64, grid: GridSize) -> Option<(i32, i32)> {
    if tile_px <= 0.0 {
        return None;
    }
    let tx = (px / tile_px).floor();
    let ty = (py / tile_px).floor();
    if tx < 0.0 || ty < 0.0 || tx >= grid.width as f64 || ty >= grid.height as f64 {
        return None;
    }
    Some((tx as i32, ty as i32))
}

pub fn format_growth_time(ms: f64) -> String {
    let secs = ms / 1000.0;
    if secs >= 1.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{}ms", ms.round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: GridSize = GridSize { width: 20, height: 15 };

    #[test]
    fn pointer_maps_by_floor_division() {
        assert_eq!(pointer_to_tile(0.0, 0.0, 40.0, GRID), Some((0, 0)));
        assert_eq!(pointer_to_tile(39.9, 40.0, 40.0, GRID), Some((0, 1)));
        assert_eq!(pointer_to_tile(799.0, 599.0, 40.0, GRID), Some((19, 14)));
    }

    #[test]
    fn pointer_outside_grid_is_none() {
        assert_eq!(pointer_to_tile(-0.5, 10.0, 40.0, GRID), None);
        assert_eq!(pointer_to_tile(800.0, 10.0, 40.0, GRID), None);
        assert_eq!(pointer_to_tile(10.0, 600.0, 40.0, GRID), None);
    }

    #[test]
    fn growth_time_formatting() {
        assert_eq!(format_growth_time(10_000.0), "10.0s");
        assert_eq!(format_growth_time(3_333.3), "3.3s");
        assert_eq!(format_growth_time(400.0), "400ms");
    }
}
