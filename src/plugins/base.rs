use crate::providers::base::DataProvider;
use crate::Result;

/// Capability tag a plugin advertises to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginCapability {
    DataProvider,
    Mapping,
    LayerManager,
    ImportExport,
}

impl std::fmt::Display for PluginCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginCapability::DataProvider => write!(f, "data-provider"),
            PluginCapability::Mapping => write!(f, "mapping"),
            PluginCapability::LayerManager => write!(f, "layer-manager"),
            PluginCapability::ImportExport => write!(f, "import-export"),
        }
    }
}

/// A dynamically discovered (or built-in) extension module.
///
/// Plugins expose metadata and lifecycle hooks. A provider-exposing plugin
/// hands its provider to the host through [`take_provider`](Self::take_provider)
/// after initialization; a widget-exposing plugin contributes a surface when
/// the `egui` feature is enabled.
pub trait Plugin {
    fn name(&self) -> &str;
    fn version(&self) -> &str;
    fn description(&self) -> &str;
    fn capabilities(&self) -> Vec<PluginCapability>;

    fn initialize(&mut self) -> Result<()>;
    fn shutdown(&mut self);

    /// Hands over the plugin's data provider, if it exposes one. Called once
    /// by the host after successful initialization.
    fn take_provider(&mut self) -> Option<Box<dyn DataProvider>> {
        None
    }

    /// Creates the plugin's widget surface, if it exposes one
    #[cfg(feature = "egui")]
    fn create_widget(&mut self) -> Option<Box<dyn PluginWidget>> {
        None
    }
}

/// A minimal widget surface contributed by a plugin
#[cfg(feature = "egui")]
pub trait PluginWidget {
    fn title(&self) -> &str;
    fn show(&mut self, ui: &mut egui::Ui);
}

/// Symbol every dynamic plugin module must export
pub const PLUGIN_ENTRY_SYMBOL: &[u8] = b"geoscope_plugin_entry";

/// Signature of the module entry point: constructs the plugin instance
pub type PluginEntryFn = unsafe extern "C" fn() -> Box<dyn Plugin>;
