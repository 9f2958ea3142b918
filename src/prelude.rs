//! Prelude module for common geoscope types and traits
//!
//! Re-exports the most commonly used types, traits, and functions for easy
//! importing with `use geoscope::prelude::*;`

pub use crate::core::{
    bounds::BoundingBox,
    config::Config,
    geo::{LatLng, Point, TileCoord},
};

pub use crate::data::{
    formats::FileFormat,
    geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry, JsonMap},
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
    file_provider::FileProviderPlugin,
    loader::PluginLoader,
};

pub use crate::tiles::{
    cache::TileCache,
    loader::TileLoader,
    source::{HumanitarianSource, OpenStreetMapSource, TileSource},
    visible_tiles, TILE_SIZE,
};

pub use crate::workspace::Workspace;

pub use crate::{Error, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
