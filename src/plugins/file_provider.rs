use crate::plugins::base::{Plugin, PluginCapability};
use crate::providers::base::DataProvider;
use crate::providers::file::FileProvider;
use crate::Result;

/// Built-in plugin exposing the file data provider.
///
/// Construction is cheap; the provider is created on initialization and
/// handed to the host through `take_provider`, which registers it with the
/// registry.
pub struct FileProviderPlugin {
    provider: Option<Box<dyn DataProvider>>,
    initialized: bool,
}

impl FileProviderPlugin {
    pub fn new() -> Self {
        Self {
            provider: None,
            initialized: false,
        }
    }
}

impl Default for FileProviderPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for FileProviderPlugin {
    fn name(&self) -> &str {
        "File Data Provider"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn description(&self) -> &str {
        "Provides geospatial data from local files including GeoJSON, CSV, and KML"
    }

    fn capabilities(&self) -> Vec<PluginCapability> {
        vec![PluginCapability::DataProvider, PluginCapability::ImportExport]
    }

    fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        log::debug!("initializing file provider plugin");
        self.provider = Some(Box::new(FileProvider::new()));
        self.initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        log::debug!("shutting down file provider plugin");
        if let Some(mut provider) = self.provider.take() {
            provider.shutdown();
        }
        self.initialized = false;
    }

    fn take_provider(&mut self) -> Option<Box<dyn DataProvider>> {
        self.provider.take()
    }
}
