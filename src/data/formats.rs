//! File format recognition and import/export codecs.
//!
//! Formats are recognized by file extension only. KML is recognized but has
//! no codec yet, so loading it fails deterministically.

use crate::data::geojson::{GeoJson, GeoJsonFeature, JsonMap};
use crate::{Error, Result};
use std::path::Path;

/// File formats the viewer recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    GeoJson,
    Csv,
    Kml,
}

impl FileFormat {
    /// Extensions the file provider advertises, in declaration order
    pub const EXTENSIONS: [&'static str; 4] = ["geojson", "json", "csv", "kml"];

    /// Maps a file extension (case-insensitive) to a recognized format
    pub fn from_extension(extension: &str) -> Option<FileFormat> {
        match extension.to_ascii_lowercase().as_str() {
            "geojson" | "json" => Some(FileFormat::GeoJson),
            "csv" => Some(FileFormat::Csv),
            "kml" => Some(FileFormat::Kml),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<FileFormat> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileFormat::GeoJson => write!(f, "geojson"),
            FileFormat::Csv => write!(f, "csv"),
            FileFormat::Kml => write!(f, "kml"),
        }
    }
}

/// Parses raw file contents according to `format`
pub fn parse(format: FileFormat, contents: &str) -> Result<GeoJson> {
    match format {
        FileFormat::GeoJson => parse_geojson(contents),
        FileFormat::Csv => parse_csv(contents),
        FileFormat::Kml => Err(Error::UnimplementedFormat("kml".to_string())),
    }
}

fn parse_geojson(contents: &str) -> Result<GeoJson> {
    serde_json::from_str(contents).map_err(|e| Error::Parse(format!("invalid GeoJSON: {}", e)))
}

/// Builds a feature collection from comma-separated text. The first row is
/// the header; every later row becomes one geometry-less feature whose
/// properties map header names to the row's raw string fields. There is no
/// quoting or escaping support, and no geometry is inferred from
/// coordinate-like columns.
fn parse_csv(contents: &str) -> Result<GeoJson> {
    let mut lines = contents.lines();
    let header: Vec<&str> = match lines.next() {
        Some(line) => line.split(',').collect(),
        None => return Err(Error::Parse("empty CSV input".to_string())),
    };

    let mut features = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();

        let mut properties = JsonMap::new();
        for (name, value) in header.iter().zip(fields.iter()) {
            properties.insert(
                (*name).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }

        features.push(GeoJsonFeature {
            id: None,
            geometry: None,
            properties: Some(properties),
        });
    }

    Ok(GeoJson::FeatureCollection { features })
}

/// Serializes a document for a GeoJSON target
pub fn export_geojson(document: &GeoJson) -> Result<String> {
    serde_json::to_string_pretty(document)
        .map_err(|e| Error::Export(format!("failed to serialize GeoJSON: {}", e)))
}

/// Renders a feature collection as comma-separated text. The header comes
/// from the first feature's property keys; keys missing on later features
/// render as empty fields. Fails for non-collection documents and empty
/// collections.
pub fn export_csv(document: &GeoJson) -> Result<String> {
    let features = match document {
        GeoJson::FeatureCollection { features } => features,
        GeoJson::Feature(_) => {
            return Err(Error::Export(
                "only feature collections can be written as CSV".to_string(),
            ))
        }
    };
    let first = features
        .first()
        .ok_or_else(|| Error::Export("no features to export".to_string()))?;

    let header: Vec<String> = first
        .properties
        .as_ref()
        .map(|p| p.keys().cloned().collect())
        .unwrap_or_default();

    let mut out = String::new();
    out.push_str(&header.join(","));
    out.push('\n');

    for feature in features {
        let row: Vec<String> = header
            .iter()
            .map(|key| {
                feature
                    .properties
                    .as_ref()
                    .and_then(|p| p.get(key))
                    .map(csv_field)
                    .unwrap_or_default()
            })
            .collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    Ok(out)
}

/// Plain-text rendering of a property value for CSV output
fn csv_field(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_recognition() {
        assert_eq!(FileFormat::from_extension("geojson"), Some(FileFormat::GeoJson));
        assert_eq!(FileFormat::from_extension("JSON"), Some(FileFormat::GeoJson));
        assert_eq!(FileFormat::from_extension("csv"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_extension("kml"), Some(FileFormat::Kml));
        assert_eq!(FileFormat::from_extension("shp"), None);
    }

    #[test]
    fn test_csv_parsing_keeps_string_values() {
        let doc = parse(FileFormat::Csv, "name,value\na,1\nb,2\n").unwrap();
        let features = doc.features();
        assert_eq!(features.len(), 2);

        let props = features[0].properties.as_ref().unwrap();
        assert_eq!(
            props.get("value"),
            Some(&serde_json::Value::String("1".to_string()))
        );
        assert!(features[0].geometry.is_none());
    }

    #[test]
    fn test_csv_row_shorter_than_header() {
        let doc = parse(FileFormat::Csv, "a,b,c\n1,2\n").unwrap();
        let features = doc.features();
        let props = features[0].properties.as_ref().unwrap();
        assert_eq!(props.len(), 2);
        assert!(props.get("c").is_none());
    }

    #[test]
    fn test_kml_always_fails() {
        let result = parse(FileFormat::Kml, "<kml></kml>");
        assert!(matches!(result, Err(Error::UnimplementedFormat(_))));
    }

    #[test]
    fn test_export_csv_fills_missing_keys() {
        let doc = parse(FileFormat::Csv, "name,value\na,1\n").unwrap();
        let mut features = match doc {
            GeoJson::FeatureCollection { features } => features,
            GeoJson::Feature(_) => unreachable!(),
        };
        let mut extra = JsonMap::new();
        extra.insert("name".to_string(), "b".into());
        features.push(GeoJsonFeature {
            id: None,
            geometry: None,
            properties: Some(extra),
        });

        let out = export_csv(&GeoJson::FeatureCollection { features }).unwrap();
        assert_eq!(out, "name,value\na,1\nb,\n");
    }

    #[test]
    fn test_export_csv_rejects_empty_collection() {
        let doc = GeoJson::FeatureCollection { features: vec![] };
        assert!(matches!(export_csv(&doc), Err(Error::Export(_))));
    }

    #[test]
    fn test_export_csv_rejects_single_feature_document() {
        let doc = GeoJson::Feature(GeoJsonFeature {
            id: None,
            geometry: None,
            properties: None,
        });
        assert!(matches!(export_csv(&doc), Err(Error::Export(_))));
    }
}
