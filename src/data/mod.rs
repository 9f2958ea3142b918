//! Geospatial data documents and file format codecs.

pub mod formats;
pub mod geojson;
