//! # geoscope
//!
//! Core library for a plugin-driven geospatial data viewer.
//!
//! Data providers own named layers of geospatial data; a registry aggregates
//! providers, addresses every layer under a globally unique id, and forwards
//! lifecycle events to subscribers. Plugins are discovered at runtime (or
//! registered in-process) and may contribute providers and widgets to the
//! hosting application. A tile subsystem fetches and caches slippy-map tiles
//! for whatever view the host paints.

pub mod core;
pub mod data;
pub mod layers;
pub mod plugins;
pub mod prelude;
pub mod providers;
pub mod registry;
pub mod tiles;
pub mod workspace;

// Re-export public API
pub use crate::core::{
    bounds::BoundingBox,
    config::Config,
    geo::{LatLng, Point, TileCoord},
};

pub use crate::data::{
    formats::FileFormat,
    geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
};

pub use crate::layers::{
    base::{DataLayer, LayerKind},
    file::FileLayer,
};

pub use crate::providers::{
    base::{DataProvider, ImportOptions, ProviderEvent},
    file::FileProvider,
};

pub use crate::registry::{events::RegistryEvent, id::GlobalLayerId, ProviderRegistry};

pub use crate::plugins::{
    base::{Plugin, PluginCapability},
    loader::PluginLoader,
};

pub use crate::tiles::{cache::TileCache, loader::TileLoader, source::TileSource};

pub use crate::workspace::Workspace;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("provider not found: {0}")]
    ProviderNotFound(String),

    #[error("layer not found: {0}")]
    LayerNotFound(String),

    #[error("provider already registered: {0}")]
    DuplicateProvider(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("format recognized but not implemented: {0}")]
    UnimplementedFormat(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("capability denied: {0}")]
    CapabilityDenied(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("export error: {0}")]
    Export(String),

    #[error("tile fetch failed: {0}")]
    TileFetch(String),

    #[error("plugin error: {0}")]
    Plugin(String),
}
