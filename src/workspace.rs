//! Wiring of configuration, plugins, and the provider registry.

use crate::core::config::Config;
use crate::plugins::base::PluginCapability;
use crate::plugins::file_provider::FileProviderPlugin;
use crate::plugins::loader::PluginLoader;
use crate::registry::ProviderRegistry;

/// The hosting application's view of the system.
///
/// Plugins are loaded (built-ins first, then discovered modules),
/// provider-exposing plugins hand their providers to the registry, and
/// everything is torn down in reverse on shutdown.
pub struct Workspace {
    config: Config,
    plugins: PluginLoader,
    registry: ProviderRegistry,
}

impl Workspace {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            plugins: PluginLoader::new(),
            registry: ProviderRegistry::new(),
        }
    }

    /// Loads built-in and discovered plugins, then registers every provider
    /// they expose. Providers that fail to register are logged and skipped;
    /// the rest of the workspace keeps working.
    pub fn bootstrap(&mut self) {
        self.plugins.register(Box::new(FileProviderPlugin::new()));
        self.plugins.load_all(&self.config.plugin_dirs);

        for plugin in self.plugins.plugins_mut() {
            if !plugin.capabilities().contains(&PluginCapability::DataProvider) {
                continue;
            }
            let Some(provider) = plugin.take_provider() else {
                continue;
            };
            let provider_id = provider.provider_id().to_string();
            if let Err(e) = self.registry.register_provider(provider) {
                log::warn!("could not register provider {}: {}", provider_id, e);
            }
        }
    }

    /// Unregisters every provider, then unloads every plugin
    pub fn shutdown(&mut self) {
        for provider_id in self.registry.provider_ids() {
            if let Err(e) = self.registry.unregister_provider(&provider_id) {
                log::warn!("failed to unregister provider {}: {}", provider_id, e);
            }
        }
        self.plugins.unload_all();
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ProviderRegistry {
        &mut self.registry
    }

    pub fn plugins(&self) -> &PluginLoader {
        &self.plugins
    }

    pub fn plugins_mut(&mut self) -> &mut PluginLoader {
        &mut self.plugins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config() -> Config {
        Config {
            plugin_dirs: Vec::new(),
            ..Config::default()
        }
    }

    #[test]
    fn test_bootstrap_registers_file_provider() {
        let mut workspace = Workspace::new(offline_config());
        workspace.bootstrap();

        assert_eq!(
            workspace.registry().provider_ids(),
            vec!["file-provider".to_string()]
        );
        assert_eq!(
            workspace.plugins().plugin_names(),
            vec!["File Data Provider".to_string()]
        );
    }

    #[test]
    fn test_shutdown_tears_everything_down() {
        let mut workspace = Workspace::new(offline_config());
        workspace.bootstrap();
        workspace.shutdown();

        assert!(workspace.registry().is_empty());
        assert!(workspace.plugins().is_empty());
    }

    #[test]
    fn test_bootstrap_twice_does_not_duplicate_providers() {
        let mut workspace = Workspace::new(offline_config());
        workspace.bootstrap();
        // A second bootstrap loads another built-in plugin instance, but the
        // duplicate provider id is rejected by the registry.
        workspace.bootstrap();

        assert_eq!(workspace.registry().len(), 1);
    }
}
