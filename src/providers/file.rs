//! The built-in file-backed data provider.

use crate::data::formats::{self, FileFormat};
use crate::layers::base::{DataLayer, LayerKind};
use crate::layers::file::FileLayer;
use crate::prelude::HashMap;
use crate::providers::base::{DataProvider, ImportOptions, ProviderEvent};
use crate::{Error, Result};
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Loads geospatial data from local files (GeoJSON, CSV, KML).
///
/// Layers are created by import only; the provider cannot create empty
/// layers. Each imported file becomes one [`FileLayer`] under a generated
/// UUID id.
pub struct FileProvider {
    layers: HashMap<String, FileLayer>,
    /// Layer ids in import order
    order: Vec<String>,
    pending: Vec<ProviderEvent>,
    initialized: bool,
}

impl FileProvider {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            order: Vec::new(),
            pending: Vec::new(),
            initialized: false,
        }
    }

    fn detect_kind(path: &Path) -> LayerKind {
        match FileFormat::from_path(path) {
            Some(_) => LayerKind::Vector,
            None => LayerKind::Unknown,
        }
    }

    fn generate_layer_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn extension_of(path: &Path) -> String {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default()
    }
}

impl Default for FileProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DataProvider for FileProvider {
    fn provider_id(&self) -> &str {
        "file-provider"
    }

    fn name(&self) -> &str {
        "File Data Provider"
    }

    fn description(&self) -> &str {
        "Loads geospatial data from local files including GeoJSON, CSV, and KML formats"
    }

    fn supported_types(&self) -> Vec<String> {
        FileFormat::EXTENSIONS.iter().map(|s| s.to_string()).collect()
    }

    fn can_create_layers(&self) -> bool {
        false
    }

    fn can_import_data(&self) -> bool {
        true
    }

    fn can_export_data(&self) -> bool {
        true
    }

    fn is_real_time(&self) -> bool {
        false
    }

    fn layer_ids(&self) -> Vec<String> {
        self.order.clone()
    }

    fn layer(&self, layer_id: &str) -> Option<&dyn DataLayer> {
        self.layers.get(layer_id).map(|l| l as &dyn DataLayer)
    }

    fn layer_mut(&mut self, layer_id: &str) -> Option<&mut dyn DataLayer> {
        self.layers.get_mut(layer_id).map(|l| l as &mut dyn DataLayer)
    }

    fn layers(&self) -> Vec<&dyn DataLayer> {
        self.order
            .iter()
            .filter_map(|id| self.layers.get(id).map(|l| l as &dyn DataLayer))
            .collect()
    }

    fn create_layer(
        &mut self,
        _name: &str,
        _kind: LayerKind,
        _parameters: &serde_json::Value,
    ) -> Result<String> {
        Err(Error::CapabilityDenied(
            "file provider cannot create layers".to_string(),
        ))
    }

    fn remove_layer(&mut self, layer_id: &str) -> Result<()> {
        if self.layers.remove(layer_id).is_none() {
            return Err(Error::LayerNotFound(layer_id.to_string()));
        }
        self.order.retain(|id| id != layer_id);
        self.pending.push(ProviderEvent::LayerRemoved(layer_id.to_string()));
        log::debug!("removed layer: {}", layer_id);
        Ok(())
    }

    fn import_data(&mut self, path: &Path, options: &ImportOptions) -> Result<String> {
        let extension = Self::extension_of(path);
        if FileFormat::from_extension(&extension).is_none() {
            return Err(Error::UnsupportedFormat(extension));
        }

        let layer_id = Self::generate_layer_id();
        let layer_name = options.name.clone().unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("layer")
                .to_string()
        });
        let layer = FileLayer::new(
            layer_id.clone(),
            layer_name,
            path,
            Self::detect_kind(path),
        );

        // Import forces the load so a failure surfaces here instead of on
        // first data access.
        layer.load()?;

        self.layers.insert(layer_id.clone(), layer);
        self.order.push(layer_id.clone());
        self.pending.push(ProviderEvent::LayerAdded(layer_id.clone()));
        log::debug!("imported {} as layer {}", path.display(), layer_id);
        Ok(layer_id)
    }

    fn export_layer(&self, layer_id: &str, path: &Path) -> Result<()> {
        let layer = self
            .layers
            .get(layer_id)
            .ok_or_else(|| Error::LayerNotFound(layer_id.to_string()))?;
        if !layer.is_loaded() {
            return Err(Error::Export(format!("layer {} has no loaded data", layer_id)));
        }
        let document = layer
            .data()
            .ok_or_else(|| Error::Export(format!("layer {} has no loaded data", layer_id)))?;

        let extension = Self::extension_of(path);
        let rendered = match FileFormat::from_extension(&extension) {
            Some(FileFormat::GeoJson) => formats::export_geojson(document)?,
            Some(FileFormat::Csv) => formats::export_csv(document)?,
            _ => return Err(Error::UnsupportedFormat(extension)),
        };

        fs::write(path, rendered)?;
        log::debug!("exported layer {} to {}", layer_id, path.display());
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        log::debug!("initializing file data provider");
        self.initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        log::debug!("shutting down file data provider");
        self.layers.clear();
        self.order.clear();
        self.pending.clear();
        self.initialized = false;
    }

    fn poll_events(&mut self) -> Vec<ProviderEvent> {
        std::mem::take(&mut self.pending)
    }
}
