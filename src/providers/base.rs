use crate::layers::base::{DataLayer, LayerKind};
use crate::Result;
use std::path::Path;

/// Lifecycle notification a provider queues for the registry to drain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    LayerAdded(String),
    LayerRemoved(String),
    LayerChanged(String),
    DataUpdated(String),
}

/// Options accepted by [`DataProvider::import_data`]
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Display name for the created layer; defaults to the file stem
    pub name: Option<String>,
}

/// An owner and source of data layers.
///
/// Providers queue a [`ProviderEvent`] for every mutation they perform; the
/// registry drains the queue through [`poll_events`](Self::poll_events) after
/// each call that may mutate, which keeps event delivery ordered with the
/// operations that caused it. Providers must not queue events from
/// `initialize`.
pub trait DataProvider {
    /// Unique id across the registry
    fn provider_id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// Format/type tags this provider handles (file extensions for
    /// file-backed providers)
    fn supported_types(&self) -> Vec<String>;

    // Capability flags, static per provider instance
    fn can_create_layers(&self) -> bool;
    fn can_import_data(&self) -> bool;
    fn can_export_data(&self) -> bool;
    fn is_real_time(&self) -> bool;

    fn layer_ids(&self) -> Vec<String>;
    fn layer(&self, layer_id: &str) -> Option<&dyn DataLayer>;
    fn layer_mut(&mut self, layer_id: &str) -> Option<&mut dyn DataLayer>;
    fn layers(&self) -> Vec<&dyn DataLayer>;

    /// Creates an empty layer, returning its local id. Capability-gated:
    /// providers reporting `can_create_layers() == false` fail every call.
    fn create_layer(
        &mut self,
        name: &str,
        kind: LayerKind,
        parameters: &serde_json::Value,
    ) -> Result<String>;

    /// Destroys a layer
    fn remove_layer(&mut self, layer_id: &str) -> Result<()>;

    /// Imports a file as a new layer, returning the new layer's local id
    fn import_data(&mut self, path: &Path, options: &ImportOptions) -> Result<String>;

    /// Writes a layer's payload to a file, dispatching on the target
    /// extension
    fn export_layer(&self, layer_id: &str, path: &Path) -> Result<()>;

    /// Prepares the provider for use. Idempotent.
    fn initialize(&mut self) -> Result<()>;

    /// Releases all owned layers
    fn shutdown(&mut self);

    /// Drains queued lifecycle events in the order they occurred
    fn poll_events(&mut self) -> Vec<ProviderEvent>;
}
