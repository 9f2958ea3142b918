//! Discovery and lifecycle management of plugin modules.
//!
//! Discovery, instantiation, and initialization are separate phases so hosts
//! and tests can exercise them with in-process plugins instead of compiled
//! modules.

use crate::plugins::base::{Plugin, PluginEntryFn, PLUGIN_ENTRY_SYMBOL};
use crate::{Error, Result};
use libloading::Library;
use std::path::{Path, PathBuf};

/// Shared-library extensions considered plugin candidates
const MODULE_EXTENSIONS: [&str; 3] = ["so", "dll", "dylib"];

/// A retained plugin and, for dynamic modules, the library that backs it.
struct LoadedPlugin {
    // Field order matters: the plugin must drop before the library so its
    // vtable stays valid through the drop.
    plugin: Box<dyn Plugin>,
    _library: Option<Library>,
}

/// Discovers, instantiates, and retains plugins.
#[derive(Default)]
pub struct PluginLoader {
    plugins: Vec<LoadedPlugin>,
}

impl PluginLoader {
    pub fn new() -> Self {
        Self { plugins: Vec::new() }
    }

    /// Lists plugin module candidates in the given directories, in order.
    /// Missing directories are skipped.
    pub fn discover(directories: &[PathBuf]) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        for dir in directories {
            let entries = match std::fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(_) => {
                    log::debug!("plugin directory does not exist: {}", dir.display());
                    continue;
                }
            };
            log::debug!("searching for plugins in: {}", dir.display());
            for entry in entries.flatten() {
                let path = entry.path();
                let is_module = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|ext| MODULE_EXTENSIONS.contains(&ext))
                    .unwrap_or(false);
                if is_module && path.is_file() {
                    candidates.push(path);
                }
            }
        }
        candidates
    }

    /// Opens a module and constructs its plugin instance. The module must
    /// export [`PLUGIN_ENTRY_SYMBOL`] with the [`PluginEntryFn`] signature
    /// and be built against a compatible ABI.
    pub fn load_module(path: &Path) -> Result<(Box<dyn Plugin>, Library)> {
        // SAFETY: loading runs the module's initializers, and the entry
        // symbol's signature is part of the plugin ABI contract.
        unsafe {
            let library = Library::new(path)
                .map_err(|e| Error::Plugin(format!("failed to load {}: {}", path.display(), e)))?;
            let plugin = {
                let entry = library
                    .get::<PluginEntryFn>(PLUGIN_ENTRY_SYMBOL)
                    .map_err(|e| {
                        Error::Plugin(format!(
                            "{} does not expose a plugin entry point: {}",
                            path.display(),
                            e
                        ))
                    })?;
                entry()
            };
            Ok((plugin, library))
        }
    }

    /// Loads every module under the configured directories, keeping only
    /// plugins that initialize successfully.
    pub fn load_all(&mut self, directories: &[PathBuf]) {
        for path in Self::discover(directories) {
            match Self::load_module(&path) {
                Ok((plugin, library)) => self.retain(plugin, Some(library)),
                Err(e) => log::warn!("skipping plugin module {}: {}", path.display(), e),
            }
        }
        log::info!("loaded {} plugins", self.plugins.len());
    }

    /// Registers an in-process plugin (for built-ins)
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        self.retain(plugin, None);
    }

    fn retain(&mut self, mut plugin: Box<dyn Plugin>, library: Option<Library>) {
        let name = plugin.name().to_string();
        log::debug!("loading plugin: {}", name);
        match plugin.initialize() {
            Ok(()) => self.plugins.push(LoadedPlugin {
                plugin,
                _library: library,
            }),
            Err(e) => log::warn!("failed to initialize plugin {}: {}", name, e),
        }
    }

    /// Shuts down every retained plugin, then discards the loader handles
    pub fn unload_all(&mut self) {
        for loaded in &mut self.plugins {
            loaded.plugin.shutdown();
        }
        self.plugins.clear();
    }

    pub fn plugin_names(&self) -> Vec<String> {
        self.plugins
            .iter()
            .map(|l| l.plugin.name().to_string())
            .collect()
    }

    pub fn plugin(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugins
            .iter()
            .find(|l| l.plugin.name() == name)
            .map(|l| l.plugin.as_ref())
    }

    pub fn plugin_mut(&mut self, name: &str) -> Option<&mut (dyn Plugin + 'static)> {
        self.plugins
            .iter_mut()
            .find(|l| l.plugin.name() == name)
            .map(|l| l.plugin.as_mut())
    }

    /// Iterates retained plugins in load order
    pub fn plugins_mut(&mut self) -> impl Iterator<Item = &mut (dyn Plugin + 'static)> + '_ {
        self.plugins.iter_mut().map(|l| l.plugin.as_mut())
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::base::PluginCapability;

    struct FakePlugin {
        fail_init: bool,
        shutdowns: std::rc::Rc<std::cell::Cell<u32>>,
    }

    impl Plugin for FakePlugin {
        fn name(&self) -> &str {
            "Fake"
        }
        fn version(&self) -> &str {
            "0.0.1"
        }
        fn description(&self) -> &str {
            "test plugin"
        }
        fn capabilities(&self) -> Vec<PluginCapability> {
            vec![PluginCapability::LayerManager]
        }
        fn initialize(&mut self) -> Result<()> {
            if self.fail_init {
                Err(Error::Plugin("boom".to_string()))
            } else {
                Ok(())
            }
        }
        fn shutdown(&mut self) {
            self.shutdowns.set(self.shutdowns.get() + 1);
        }
    }

    #[test]
    fn test_register_retains_initialized_plugins() {
        let counter = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut loader = PluginLoader::new();
        loader.register(Box::new(FakePlugin {
            fail_init: false,
            shutdowns: counter.clone(),
        }));

        assert_eq!(loader.len(), 1);
        assert_eq!(loader.plugin_names(), vec!["Fake".to_string()]);
        assert!(loader.plugin("Fake").is_some());
    }

    #[test]
    fn test_failed_initialization_is_skipped() {
        let counter = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut loader = PluginLoader::new();
        loader.register(Box::new(FakePlugin {
            fail_init: true,
            shutdowns: counter,
        }));

        assert!(loader.is_empty());
        assert!(loader.plugin("Fake").is_none());
    }

    #[test]
    fn test_unload_all_shuts_plugins_down() {
        let counter = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut loader = PluginLoader::new();
        loader.register(Box::new(FakePlugin {
            fail_init: false,
            shutdowns: counter.clone(),
        }));

        loader.unload_all();
        assert_eq!(counter.get(), 1);
        assert!(loader.is_empty());
    }

    #[test]
    fn test_discover_skips_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("not_a_module.txt"), "x").unwrap();
        std::fs::write(dir.path().join("mod.so"), "x").unwrap();

        let dirs = vec![
            dir.path().to_path_buf(),
            PathBuf::from("/nonexistent/plugin/dir"),
        ];
        let found = PluginLoader::discover(&dirs);
        assert_eq!(found, vec![dir.path().join("mod.so")]);
    }

    #[test]
    fn test_load_module_rejects_non_modules() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.so");
        std::fs::write(&path, "not a shared library").unwrap();

        assert!(matches!(
            PluginLoader::load_module(&path),
            Err(Error::Plugin(_))
        ));
    }
}
