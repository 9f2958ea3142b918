//! File-backed layers with one-shot lazy loading.

use crate::core::bounds::BoundingBox;
use crate::data::formats::{self, FileFormat};
use crate::data::geojson::{GeoJson, JsonMap};
use crate::layers::base::{DataLayer, LayerKind};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use once_cell::unsync::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};

/// Payload plus everything derived from it at load time
#[derive(Debug)]
struct LoadedPayload {
    document: GeoJson,
    bounding_box: Option<BoundingBox>,
    feature_count: usize,
    fields: Vec<String>,
    loaded_at: DateTime<Utc>,
}

/// A layer whose data lives in a local file, parsed on first access.
///
/// The load runs exactly once; re-reading `data()` returns the cached result
/// even if the backing file changed on disk. A failed load is cached too, so
/// the layer stays in the unloaded state without retrying.
pub struct FileLayer {
    id: String,
    name: String,
    kind: LayerKind,
    description: String,
    path: PathBuf,
    visible: bool,
    opacity: f64,
    style: JsonMap,
    // `None` inside the cell records a failed load; the load never reruns.
    payload: OnceCell<Option<LoadedPayload>>,
}

impl FileLayer {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        kind: LayerKind,
    ) -> Self {
        let path = path.into();
        let description = format!(
            "File layer: {}",
            path.file_name().and_then(|n| n.to_str()).unwrap_or("<unnamed>")
        );

        let mut style = JsonMap::new();
        if kind == LayerKind::Vector {
            style.insert("stroke".to_string(), "#0000FF".into());
            style.insert("strokeWidth".to_string(), 2.into());
            style.insert("fill".to_string(), "#0000FF33".into());
        }

        Self {
            id: id.into(),
            name: name.into(),
            kind,
            description,
            path,
            visible: true,
            opacity: 1.0,
            style,
            payload: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Forces the one-time load, reporting the first failure's cause. Calls
    /// after a failed load return a generic error since only the outcome is
    /// cached.
    pub fn load(&self) -> Result<()> {
        let mut first_error = None;
        let loaded = self.payload.get_or_init(|| match read_payload(&self.path) {
            Ok(payload) => Some(payload),
            Err(e) => {
                log::warn!(
                    "failed to load layer data from {}: {}",
                    self.path.display(),
                    e
                );
                first_error = Some(e);
                None
            }
        });

        match loaded {
            Some(_) => Ok(()),
            None => Err(first_error.unwrap_or_else(|| {
                Error::Parse(format!("previous load of {} failed", self.path.display()))
            })),
        }
    }

    fn loaded(&self) -> Option<&LoadedPayload> {
        self.payload.get().and_then(|p| p.as_ref())
    }
}

fn read_payload(path: &Path) -> Result<LoadedPayload> {
    let format = FileFormat::from_path(path).ok_or_else(|| {
        Error::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string(),
        )
    })?;

    let contents = fs::read_to_string(path)?;
    let document = formats::parse(format, &contents)?;

    let bounding_box = document.point_bounds();
    let feature_count = document.feature_count();
    let fields: Vec<String> = document
        .features()
        .first()
        .and_then(|f| f.properties.as_ref())
        .map(|p| p.keys().cloned().collect())
        .unwrap_or_default();

    Ok(LoadedPayload {
        document,
        bounding_box,
        feature_count,
        fields,
        loaded_at: Utc::now(),
    })
}

impl DataLayer for FileLayer {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> LayerKind {
        self.kind
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;
        true
    }

    fn opacity(&self) -> f64 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f64) -> bool {
        let opacity = opacity.clamp(0.0, 1.0);
        if self.opacity == opacity {
            return false;
        }
        self.opacity = opacity;
        true
    }

    fn style(&self) -> &JsonMap {
        &self.style
    }

    fn set_style(&mut self, style: JsonMap) {
        self.style = style;
    }

    fn properties(&self) -> JsonMap {
        let mut props = JsonMap::new();
        if let Some(file_name) = self.path.file_name().and_then(|n| n.to_str()) {
            props.insert("fileName".to_string(), file_name.into());
        }
        props.insert(
            "filePath".to_string(),
            self.path.display().to_string().into(),
        );
        if let Ok(metadata) = fs::metadata(&self.path) {
            props.insert("fileSize".to_string(), metadata.len().into());
        }

        if let Some(loaded) = self.loaded() {
            props.insert("featureCount".to_string(), (loaded.feature_count as u64).into());
            props.insert(
                "fields".to_string(),
                serde_json::Value::Array(
                    loaded.fields.iter().cloned().map(Into::into).collect(),
                ),
            );
        }

        props
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        self.loaded().and_then(|p| p.bounding_box)
    }

    fn is_loaded(&self) -> bool {
        self.loaded().is_some()
    }

    fn data(&self) -> Option<&GeoJson> {
        let _ = self.load();
        self.loaded().map(|p| &p.document)
    }

    fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.loaded().map(|p| p.loaded_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    const POINTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "a"},
             "geometry": {"type": "Point", "coordinates": [10, 20]}},
            {"type": "Feature", "properties": {"name": "b"},
             "geometry": {"type": "Point", "coordinates": [30, 40]}}
        ]
    }"#;

    #[test]
    fn test_opacity_clamps() {
        let mut layer = FileLayer::new("l1", "Layer", "/tmp/none.geojson", LayerKind::Vector);

        assert!(layer.set_opacity(1.5));
        assert_eq!(layer.opacity(), 1.0);
        assert!(layer.set_opacity(-0.5));
        assert_eq!(layer.opacity(), 0.0);
        assert!(layer.set_opacity(0.25));
        assert_eq!(layer.opacity(), 0.25);
    }

    #[test]
    fn test_setters_are_idempotent() {
        let mut layer = FileLayer::new("l1", "Layer", "/tmp/none.geojson", LayerKind::Vector);

        assert!(layer.set_visible(false));
        assert!(!layer.set_visible(false));
        assert!(layer.set_opacity(0.5));
        assert!(!layer.set_opacity(0.5));
        // Values clamping to the current state are no-ops too
        layer.set_opacity(1.0);
        assert!(!layer.set_opacity(2.0));
    }

    #[test]
    fn test_lazy_load_and_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "points.geojson", POINTS);
        let layer = FileLayer::new("l1", "points", path, LayerKind::Vector);

        assert!(!layer.is_loaded());
        assert!(layer.bounding_box().is_none());

        let doc = layer.data().unwrap();
        assert_eq!(doc.feature_count(), 2);
        assert!(layer.is_loaded());
        assert!(layer.last_updated().is_some());

        let bbox = layer.bounding_box().unwrap();
        assert_eq!(bbox.min_lon, 10.0);
        assert_eq!(bbox.max_lon, 30.0);
        assert_eq!(bbox.min_lat, 20.0);
        assert_eq!(bbox.max_lat, 40.0);
    }

    #[test]
    fn test_failed_load_is_never_retried() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "broken.geojson", "{not valid json");
        let layer = FileLayer::new("l1", "broken", path.clone(), LayerKind::Vector);

        assert!(layer.data().is_none());
        assert!(!layer.is_loaded());

        // Repairing the file on disk must not change the answer; the failed
        // outcome is cached.
        fs::write(&path, POINTS).unwrap();
        assert!(layer.data().is_none());
        assert!(!layer.is_loaded());
        assert!(layer.last_updated().is_none());
    }

    #[test]
    fn test_load_reports_first_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "doc.kml", "<kml></kml>");
        let layer = FileLayer::new("l1", "doc", path, LayerKind::Vector);

        assert!(matches!(layer.load(), Err(Error::UnimplementedFormat(_))));
        // The cause is only known to the first call
        assert!(layer.load().is_err());
    }

    #[test]
    fn test_derived_properties() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "points.geojson", POINTS);
        let layer = FileLayer::new("l1", "points", path, LayerKind::Vector);

        layer.load().unwrap();
        let props = layer.properties();
        assert_eq!(props.get("featureCount"), Some(&serde_json::json!(2)));
        assert_eq!(props.get("fields"), Some(&serde_json::json!(["name"])));
        assert_eq!(props.get("fileName"), Some(&serde_json::json!("points.geojson")));
    }
}
