//! Aggregation of data providers under globally unique layer ids.

pub mod events;
pub mod id;

use crate::layers::base::{DataLayer, LayerKind};
use crate::prelude::{HashMap, HashSet};
use crate::providers::base::{DataProvider, ImportOptions, ProviderEvent};
use crate::registry::events::{EventBus, RegistryEvent};
use crate::registry::id::{validate_id_component, GlobalLayerId};
use crate::{Error, Result};
use crossbeam_channel::Receiver;
use std::path::Path;

/// Tracks every registered provider and the layers they own.
///
/// The registry owns providers outright; callers address layers only through
/// [`GlobalLayerId`] values and re-resolve on each access. All operations run
/// synchronously on the calling thread, and events are emitted before the
/// mutating call returns.
pub struct ProviderRegistry {
    providers: HashMap<String, Box<dyn DataProvider>>,
    /// Provider ids in registration order; the import fallback honors it
    order: Vec<String>,
    /// Incrementally maintained index of every known layer
    layer_index: HashSet<GlobalLayerId>,
    events: EventBus,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::default(),
            order: Vec::new(),
            layer_index: HashSet::default(),
            events: EventBus::new(),
        }
    }

    /// Subscribes to registry events; the receiver sees every event emitted
    /// after this call.
    pub fn subscribe(&mut self) -> Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    /// Registers and initializes a provider. Fails on a duplicate or invalid
    /// provider id, or when initialization fails; registry state is unchanged
    /// in every failure case. Pre-existing layers are indexed after the
    /// registration event.
    pub fn register_provider(&mut self, mut provider: Box<dyn DataProvider>) -> Result<()> {
        let provider_id = provider.provider_id().to_string();
        validate_id_component(&provider_id)?;
        if self.providers.contains_key(&provider_id) {
            log::warn!("data provider already registered: {}", provider_id);
            return Err(Error::DuplicateProvider(provider_id));
        }

        if let Err(e) = provider.initialize() {
            log::warn!("failed to initialize data provider {}: {}", provider_id, e);
            return Err(e);
        }

        let existing = provider.layer_ids();
        self.providers.insert(provider_id.clone(), provider);
        self.order.push(provider_id.clone());

        log::debug!("registered data provider: {}", provider_id);
        self.events.emit(RegistryEvent::ProviderRegistered {
            provider_id: provider_id.clone(),
        });

        for layer_id in existing {
            if validate_id_component(&layer_id).is_err() {
                log::warn!(
                    "skipping layer with unusable id {:?} from provider {}",
                    layer_id,
                    provider_id
                );
                continue;
            }
            let global = GlobalLayerId::new(provider_id.as_str(), layer_id.as_str());
            if self.layer_index.insert(global.clone()) {
                self.events.emit(RegistryEvent::LayerAdded { layer: global });
            }
        }

        Ok(())
    }

    /// Unregisters a provider: emits one removal per indexed layer, shuts the
    /// provider down, emits the unregistration, then drops the provider.
    pub fn unregister_provider(&mut self, provider_id: &str) -> Result<()> {
        let mut provider = match self.providers.remove(provider_id) {
            Some(provider) => provider,
            None => {
                log::warn!("data provider not found: {}", provider_id);
                return Err(Error::ProviderNotFound(provider_id.to_string()));
            }
        };
        self.order.retain(|id| id != provider_id);

        let removed: Vec<GlobalLayerId> = self
            .layer_index
            .iter()
            .filter(|global| global.provider_id() == provider_id)
            .cloned()
            .collect();
        for global in removed {
            self.layer_index.remove(&global);
            self.events.emit(RegistryEvent::LayerRemoved { layer: global });
        }

        provider.shutdown();
        log::debug!("unregistered data provider: {}", provider_id);
        self.events.emit(RegistryEvent::ProviderUnregistered {
            provider_id: provider_id.to_string(),
        });

        Ok(())
    }

    /// Provider ids in registration order
    pub fn provider_ids(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn provider(&self, provider_id: &str) -> Option<&dyn DataProvider> {
        self.providers.get(provider_id).map(|p| p.as_ref())
    }

    /// Registered providers in registration order
    pub fn providers(&self) -> Vec<&dyn DataProvider> {
        self.order
            .iter()
            .filter_map(|id| self.providers.get(id).map(|p| p.as_ref()))
            .collect()
    }

    /// Global ids of every indexed layer (unspecified order)
    pub fn layer_ids(&self) -> Vec<GlobalLayerId> {
        self.layer_index.iter().cloned().collect()
    }

    /// Resolves a layer by global id. Lookup only; absent when either the
    /// provider or the layer is missing.
    pub fn layer(&self, global: &GlobalLayerId) -> Option<&dyn DataLayer> {
        if !self.layer_index.contains(global) {
            return None;
        }
        self.provider(global.provider_id())
            .and_then(|p| p.layer(global.layer_id()))
    }

    /// Resolves a layer by provider and local id
    pub fn provider_layer(&self, provider_id: &str, layer_id: &str) -> Option<&dyn DataLayer> {
        self.provider(provider_id).and_then(|p| p.layer(layer_id))
    }

    /// Every layer of every registered provider
    pub fn layers(&self) -> Vec<&dyn DataLayer> {
        self.providers()
            .into_iter()
            .flat_map(|p| p.layers())
            .collect()
    }

    pub fn layers_by_kind(&self, kind: LayerKind) -> Vec<&dyn DataLayer> {
        self.layers()
            .into_iter()
            .filter(|l| l.kind() == kind)
            .collect()
    }

    pub fn visible_layers(&self) -> Vec<&dyn DataLayer> {
        self.layers()
            .into_iter()
            .filter(|l| l.is_visible())
            .collect()
    }

    /// Providers whose supported types include `type_tag`
    pub fn providers_by_type(&self, type_tag: &str) -> Vec<&dyn DataProvider> {
        self.providers()
            .into_iter()
            .filter(|p| p.supported_types().iter().any(|t| t == type_tag))
            .collect()
    }

    pub fn real_time_providers(&self) -> Vec<&dyn DataProvider> {
        self.providers()
            .into_iter()
            .filter(|p| p.is_real_time())
            .collect()
    }

    /// Sets a layer's visibility, emitting the targeted event plus a generic
    /// change event when the value actually changes.
    pub fn set_layer_visible(&mut self, global: &GlobalLayerId, visible: bool) -> Result<()> {
        let layer = self.layer_lookup_mut(global)?;
        if layer.set_visible(visible) {
            self.events.emit(RegistryEvent::LayerVisibilityChanged {
                layer: global.clone(),
                visible,
            });
            self.events.emit(RegistryEvent::LayersChanged);
        }
        Ok(())
    }

    /// Sets a layer's opacity (clamped by the layer), emitting a generic
    /// change event when the value actually changes.
    pub fn set_layer_opacity(&mut self, global: &GlobalLayerId, opacity: f64) -> Result<()> {
        let layer = self.layer_lookup_mut(global)?;
        if layer.set_opacity(opacity) {
            self.events.emit(RegistryEvent::LayersChanged);
        }
        Ok(())
    }

    /// Extensions importable through at least one registered provider,
    /// deduplicated, in registration order
    pub fn supported_import_formats(&self) -> Vec<String> {
        let mut formats = Vec::new();
        for provider in self.providers() {
            if provider.can_import_data() {
                for tag in provider.supported_types() {
                    if !formats.contains(&tag) {
                        formats.push(tag);
                    }
                }
            }
        }
        formats
    }

    /// Extensions exportable through at least one registered provider
    pub fn supported_export_formats(&self) -> Vec<String> {
        let mut formats = Vec::new();
        for provider in self.providers() {
            if provider.can_export_data() {
                for tag in provider.supported_types() {
                    if !formats.contains(&tag) {
                        formats.push(tag);
                    }
                }
            }
        }
        formats
    }

    /// Imports a file, preferring `preferred_provider` when given. When the
    /// preferred provider declines, every provider claiming the file's
    /// extension is tried in registration order; the first success wins.
    pub fn import_data(
        &mut self,
        path: &Path,
        preferred_provider: Option<&str>,
    ) -> Result<GlobalLayerId> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if let Some(preferred) = preferred_provider {
            if let Some(Ok(global)) = self.try_import(preferred, path) {
                return Ok(global);
            }
        }

        for provider_id in self.order.clone() {
            let accepts = self
                .providers
                .get(&provider_id)
                .map(|p| {
                    p.can_import_data() && p.supported_types().iter().any(|t| t == &extension)
                })
                .unwrap_or(false);
            if !accepts {
                continue;
            }
            if let Some(Ok(global)) = self.try_import(&provider_id, path) {
                return Ok(global);
            }
        }

        log::warn!("no provider could import file: {}", path.display());
        Err(Error::UnsupportedFormat(extension))
    }

    fn try_import(&mut self, provider_id: &str, path: &Path) -> Option<Result<GlobalLayerId>> {
        let result = {
            let provider = self.providers.get_mut(provider_id)?;
            if !provider.can_import_data() {
                return None;
            }
            provider.import_data(path, &ImportOptions::default())
        };
        self.pump_events(provider_id);

        match result {
            Ok(layer_id) => {
                log::debug!("data imported by provider: {}", provider_id);
                Some(Ok(GlobalLayerId::new(provider_id, layer_id.as_str())))
            }
            Err(e) => {
                log::debug!("provider {} declined {}: {}", provider_id, path.display(), e);
                Some(Err(e))
            }
        }
    }

    /// Removes a layer through its owning provider
    pub fn remove_layer(&mut self, global: &GlobalLayerId) -> Result<()> {
        if !self.layer_index.contains(global) {
            return Err(Error::LayerNotFound(global.to_string()));
        }
        let result = match self.providers.get_mut(global.provider_id()) {
            Some(provider) => provider.remove_layer(global.layer_id()),
            None => Err(Error::ProviderNotFound(global.provider_id().to_string())),
        };
        self.pump_events(global.provider_id());
        result
    }

    /// Creates a layer on a specific provider (capability-gated there)
    pub fn create_layer(
        &mut self,
        provider_id: &str,
        name: &str,
        kind: LayerKind,
        parameters: &serde_json::Value,
    ) -> Result<GlobalLayerId> {
        let result = match self.providers.get_mut(provider_id) {
            Some(provider) => provider.create_layer(name, kind, parameters),
            None => return Err(Error::ProviderNotFound(provider_id.to_string())),
        };
        self.pump_events(provider_id);
        result.map(|layer_id| GlobalLayerId::new(provider_id, layer_id.as_str()))
    }

    /// Exports a layer through its owning provider
    pub fn export_layer(&self, global: &GlobalLayerId, path: &Path) -> Result<()> {
        if !self.layer_index.contains(global) {
            return Err(Error::LayerNotFound(global.to_string()));
        }
        match self.provider(global.provider_id()) {
            Some(provider) => provider.export_layer(global.layer_id(), path),
            None => Err(Error::ProviderNotFound(global.provider_id().to_string())),
        }
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Drains a provider's queued events, keeping the layer index in step
    /// and forwarding to subscribers.
    fn pump_events(&mut self, provider_id: &str) {
        let events = match self.providers.get_mut(provider_id) {
            Some(provider) => provider.poll_events(),
            None => return,
        };

        for event in events {
            match event {
                ProviderEvent::LayerAdded(layer_id) => {
                    if validate_id_component(&layer_id).is_err() {
                        log::warn!(
                            "skipping layer with unusable id {:?} from provider {}",
                            layer_id,
                            provider_id
                        );
                        continue;
                    }
                    let global = GlobalLayerId::new(provider_id, layer_id.as_str());
                    self.layer_index.insert(global.clone());
                    self.events.emit(RegistryEvent::LayerAdded { layer: global });
                    self.events.emit(RegistryEvent::LayersChanged);
                }
                ProviderEvent::LayerRemoved(layer_id) => {
                    let global = GlobalLayerId::new(provider_id, layer_id.as_str());
                    self.layer_index.remove(&global);
                    self.events.emit(RegistryEvent::LayerRemoved { layer: global });
                    self.events.emit(RegistryEvent::LayersChanged);
                }
                ProviderEvent::LayerChanged(layer_id) => {
                    let global = GlobalLayerId::new(provider_id, layer_id.as_str());
                    self.events.emit(RegistryEvent::LayerChanged { layer: global });
                    self.events.emit(RegistryEvent::LayersChanged);
                }
                ProviderEvent::DataUpdated(layer_id) => {
                    let global = GlobalLayerId::new(provider_id, layer_id.as_str());
                    self.events.emit(RegistryEvent::DataUpdated { layer: global });
                }
            }
        }
    }

    fn layer_lookup_mut(&mut self, global: &GlobalLayerId) -> Result<&mut dyn DataLayer> {
        if !self.layer_index.contains(global) {
            return Err(Error::LayerNotFound(global.to_string()));
        }
        self.providers
            .get_mut(global.provider_id())
            .and_then(|p| p.layer_mut(global.layer_id()))
            .ok_or_else(|| Error::LayerNotFound(global.to_string()))
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
