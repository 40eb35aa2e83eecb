//! Module loading: export mappings and the loader seam.

use std::{collections::HashMap, path::Path, sync::Arc};

use {
    anyhow::{Context, Result, bail},
    async_trait::async_trait,
    tracing::debug,
};

/// Ordered export mapping of a loaded module (name → value).
///
/// Insertion order is preserved so selectors such as
/// [`ImportSelector::first_export`](crate::ImportSelector::first_export) are
/// deterministic.
pub struct Exports<H> {
    entries: Vec<(String, H)>,
}

impl<H> Default for Exports<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Exports<H> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add (or replace) an export, builder style.
    pub fn with(mut self, name: impl Into<String>, value: H) -> Self {
        self.insert(name, value);
        self
    }

    /// Add an export. Replacing keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, value: H) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&H> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove an export and hand back its value.
    pub fn take(&mut self, name: &str) -> Option<H> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Export names in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H> std::fmt::Debug for Exports<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exports")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<H, K: Into<String>> FromIterator<(K, H)> for Exports<H> {
    fn from_iter<I: IntoIterator<Item = (K, H)>>(iter: I) -> Self {
        let mut exports = Self::new();
        for (k, v) in iter {
            exports.insert(k, v);
        }
        exports
    }
}

/// Loads the module behind a locator and returns its exports.
///
/// Locators are `file://` URLs of the matched files.
#[async_trait]
pub trait ModuleLoader<H: Send>: Send + Sync {
    async fn load(&self, locator: &str) -> Result<Exports<H>>;
}

type Factory<H> = Arc<dyn Fn() -> Result<Exports<H>> + Send + Sync>;

/// In-process loader for command modules compiled into the binary.
///
/// Each module is registered under its path relative to the commands
/// directory, without extension (`"admin/ban"`). A locator resolves to the
/// registered module whose path is the longest component-wise suffix of the
/// locator's path with the extension stripped. Each load runs the factory
/// again; nothing is cached.
pub struct ModuleRegistry<H> {
    modules: HashMap<String, Factory<H>>,
}

impl<H> Default for ModuleRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> ModuleRegistry<H> {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Register a module factory. A trailing extension in `module` is ignored.
    pub fn register(
        &mut self,
        module: &str,
        factory: impl Fn() -> Result<Exports<H>> + Send + Sync + 'static,
    ) -> &mut Self {
        self.modules.insert(module_key(module), Arc::new(factory));
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(
        mut self,
        module: &str,
        factory: impl Fn() -> Result<Exports<H>> + Send + Sync + 'static,
    ) -> Self {
        self.register(module, factory);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn resolve(&self, locator: &str) -> Result<&Factory<H>> {
        let url = url::Url::parse(locator).with_context(|| format!("invalid locator {locator}"))?;
        let path = url
            .to_file_path()
            .map_err(|()| anyhow::anyhow!("locator {locator} is not a file URL"))?;
        let key = module_key(&path.to_string_lossy());
        let segments: Vec<&str> = key.split('/').collect();

        // Longest suffix first.
        for start in 0..segments.len() {
            let candidate = segments[start..].join("/");
            if let Some(factory) = self.modules.get(&candidate) {
                return Ok(factory);
            }
        }
        bail!("cannot resolve module {locator}")
    }
}

#[async_trait]
impl<H: Send + 'static> ModuleLoader<H> for ModuleRegistry<H> {
    async fn load(&self, locator: &str) -> Result<Exports<H>> {
        let factory = self.resolve(locator)?;
        debug!(locator, "instantiating registered module");
        factory()
    }
}

/// Normalize a module path: `/` separators, no leading `./` or `/`,
/// extension of the last segment stripped.
fn module_key(module: &str) -> String {
    let module = module.replace('\\', "/");
    let trimmed = module.trim_start_matches("./").trim_matches('/');
    let path = Path::new(trimmed);
    match (path.parent(), path.file_stem()) {
        (Some(parent), Some(stem)) if !parent.as_os_str().is_empty() => {
            format!("{}/{}", parent.to_string_lossy(), stem.to_string_lossy())
        },
        (_, Some(stem)) => stem.to_string_lossy().into_owned(),
        _ => trimmed.to_string(),
    }
}
