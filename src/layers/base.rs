use crate::core::bounds::BoundingBox;
use crate::data::geojson::{GeoJson, JsonMap};
use chrono::{DateTime, Utc};

/// Category tag for a data layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Vector,
    Raster,
    RealTime,
    Unknown,
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKind::Vector => write!(f, "vector"),
            LayerKind::Raster => write!(f, "raster"),
            LayerKind::RealTime => write!(f, "realtime"),
            LayerKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// A named unit of geospatial data owned by a provider.
///
/// Layers carry presentation state (visibility, opacity, style) alongside a
/// lazily loaded payload. Setters report whether they changed anything so
/// callers can suppress duplicate change notifications.
pub trait DataLayer {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn kind(&self) -> LayerKind;
    fn description(&self) -> &str;

    fn is_visible(&self) -> bool;
    /// Returns `true` if the visibility actually changed
    fn set_visible(&mut self, visible: bool) -> bool;

    /// Opacity in [0, 1]
    fn opacity(&self) -> f64;
    /// Clamps to [0, 1] silently; returns `true` if the stored value changed
    fn set_opacity(&mut self, opacity: f64) -> bool;

    /// Schema-free style mapping
    fn style(&self) -> &JsonMap;
    fn set_style(&mut self, style: JsonMap);

    /// Metadata about the layer and, once loaded, its payload
    fn properties(&self) -> JsonMap;

    /// Spatial extent; absent until the payload is loaded and contains at
    /// least one Point coordinate. Never triggers a load.
    fn bounding_box(&self) -> Option<BoundingBox>;

    /// Whether the one-time load has run and produced a payload. Distinct
    /// from a loaded-but-empty payload.
    fn is_loaded(&self) -> bool;

    /// The layer's payload, loading it on first access. The load runs at
    /// most once; a failure is cached and never retried.
    fn data(&self) -> Option<&GeoJson>;

    /// Set when the payload was last successfully loaded
    fn last_updated(&self) -> Option<DateTime<Utc>>;
}
