use crate::core::geo::TileCoord;

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// Simple implementation that hits the default OpenStreetMap tile server.
pub struct OpenStreetMapSource {
    subdomains: Vec<&'static str>,
}

impl OpenStreetMapSource {
    pub fn new() -> Self {
        Self {
            subdomains: vec!["a", "b", "c"],
        }
    }
}

impl Default for OpenStreetMapSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TileSource for OpenStreetMapSource {
    fn url(&self, coord: TileCoord) -> String {
        // Guard against empty subdomain list (should not happen, but be safe)
        if self.subdomains.is_empty() {
            return format!(
                "https://tile.openstreetmap.org/{}/{}/{}.png",
                coord.z, coord.x, coord.y
            );
        }

        let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
        let sub = self.subdomains[idx];
        format!(
            "https://{}.tile.openstreetmap.org/{}/{}/{}.png",
            sub, coord.z, coord.x, coord.y
        )
    }
}

/// OpenStreetMap Humanitarian style tiles.
pub struct HumanitarianSource {
    subdomains: Vec<&'static str>,
}

impl HumanitarianSource {
    pub fn new() -> Self {
        Self {
            subdomains: vec!["a", "b", "c"],
        }
    }
}

impl Default for HumanitarianSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TileSource for HumanitarianSource {
    fn url(&self, coord: TileCoord) -> String {
        let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
        let sub = self.subdomains[idx];
        format!(
            "https://tile-{}.openstreetmap.fr/hot/{}/{}/{}.png",
            sub, coord.z, coord.x, coord.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osm_url() {
        let source = OpenStreetMapSource::new();
        let url = source.url(TileCoord::new(1, 2, 3));
        assert_eq!(url, "https://a.tile.openstreetmap.org/3/1/2.png");
    }

    #[test]
    fn test_humanitarian_url() {
        let source = HumanitarianSource::new();
        let url = source.url(TileCoord::new(0, 0, 0));
        assert_eq!(url, "https://tile-a.openstreetmap.fr/hot/0/0/0.png");
    }

    #[test]
    fn test_subdomain_rotation() {
        let source = OpenStreetMapSource::new();
        let a = source.url(TileCoord::new(0, 0, 1));
        let b = source.url(TileCoord::new(1, 0, 1));
        assert_ne!(a, b);
    }
}
