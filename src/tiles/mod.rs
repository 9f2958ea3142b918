//! Map tile sources, caching, and background loading.

pub mod cache;
pub mod loader;
pub mod source;

use crate::core::geo::{LatLng, TileCoord};

/// Edge length of a map tile in pixels
pub const TILE_SIZE: u32 = 256;

/// Computes the tile coordinates covering a viewport centered on `center`,
/// clamped to the zoom level's valid range. One extra tile ring pads each
/// axis so panning has pixels to reveal.
pub fn visible_tiles(center: &LatLng, zoom: u8, width_px: u32, height_px: u32) -> Vec<TileCoord> {
    let center_tile = center.to_tile_space(zoom);
    let tiles_x = (width_px / TILE_SIZE + 2) as i64;
    let tiles_y = (height_px / TILE_SIZE + 2) as i64;
    let max_coord = 2_i64.pow(zoom as u32);

    let start_x = center_tile.x.floor() as i64 - tiles_x / 2;
    let start_y = center_tile.y.floor() as i64 - tiles_y / 2;

    let mut tiles = Vec::new();
    for x in start_x..start_x + tiles_x {
        for y in start_y..start_y + tiles_y {
            if x >= 0 && y >= 0 && x < max_coord && y < max_coord {
                tiles.push(TileCoord::new(x as u32, y as u32, zoom));
            }
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_tiles_clamped_at_world_edge() {
        // At zoom 0 there is exactly one tile no matter the viewport
        let tiles = visible_tiles(&LatLng::new(0.0, 0.0), 0, 1024, 768);
        assert_eq!(tiles, vec![TileCoord::new(0, 0, 0)]);
    }

    #[test]
    fn test_visible_tiles_cover_viewport() {
        let tiles = visible_tiles(&LatLng::new(48.8566, 2.3522), 10, 800, 600);
        assert!(!tiles.is_empty());

        let center = TileCoord::from_lat_lng(&LatLng::new(48.8566, 2.3522), 10);
        assert!(tiles.contains(&center));
        for tile in &tiles {
            assert!(tile.is_valid());
        }
    }

    #[test]
    fn test_visible_tiles_all_unique() {
        let tiles = visible_tiles(&LatLng::new(40.7128, -74.0060), 12, 1280, 720);
        let mut deduped = tiles.clone();
        deduped.sort_by_key(|t| (t.x, t.y));
        deduped.dedup();
        assert_eq!(deduped.len(), tiles.len());
    }
}
