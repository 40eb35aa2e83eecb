use std::{fmt, path::PathBuf, sync::Arc};

use {
    cmdload_config::{
        AutoloadConfig, MatchOptions,
        schema::{DEFAULT_IMPORT, DEFAULT_PATH, DEFAULT_PATTERN},
    },
    serde::{Deserialize, Serialize},
};

use crate::module::Exports;

/// Path info handed to the `on_load` and `on_finish` hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathParams {
    /// `file://` URL of the module.
    pub absolute: String,
    /// Path relative to the command directory, `/`-separated.
    pub relative: String,
}

/// One glob pattern or several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patterns {
    One(String),
    Many(Vec<String>),
}

impl Patterns {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(p) => vec![p],
            Self::Many(ps) => ps,
        }
    }
}

impl From<&str> for Patterns {
    fn from(p: &str) -> Self {
        Self::One(p.to_string())
    }
}

impl From<String> for Patterns {
    fn from(p: String) -> Self {
        Self::One(p)
    }
}

impl From<Vec<String>> for Patterns {
    fn from(ps: Vec<String>) -> Self {
        Self::Many(ps)
    }
}

impl From<Vec<&str>> for Patterns {
    fn from(ps: Vec<&str>) -> Self {
        Self::Many(ps.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Patterns {
    fn from(ps: [&str; N]) -> Self {
        Self::Many(ps.iter().map(|p| p.to_string()).collect())
    }
}

type ComputeExport<H> = Arc<dyn Fn(&Exports<H>) -> String + Send + Sync>;

/// Chooses which export of a loaded module gets registered.
pub enum ImportSelector<H> {
    /// Always the export with this name.
    Named(String),
    /// Name computed from the module's exports.
    Computed(ComputeExport<H>),
}

impl<H> ImportSelector<H> {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn computed(f: impl Fn(&Exports<H>) -> String + Send + Sync + 'static) -> Self {
        Self::Computed(Arc::new(f))
    }

    /// First export in declaration order, or `"default"` when there is none.
    pub fn first_export() -> Self {
        Self::computed(|exports| {
            exports
                .keys()
                .next()
                .unwrap_or(DEFAULT_IMPORT)
                .to_string()
        })
    }

    pub fn select(&self, exports: &Exports<H>) -> String {
        match self {
            Self::Named(name) => name.clone(),
            Self::Computed(f) => f(exports),
        }
    }
}

impl<H> Default for ImportSelector<H> {
    fn default() -> Self {
        Self::Named(DEFAULT_IMPORT.into())
    }
}

impl<H> Clone for ImportSelector<H> {
    fn clone(&self) -> Self {
        match self {
            Self::Named(name) => Self::Named(name.clone()),
            Self::Computed(f) => Self::Computed(Arc::clone(f)),
        }
    }
}

impl<H> fmt::Debug for ImportSelector<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

type OnLoad = Box<dyn Fn(&PathParams) + Send + Sync>;
type OnFinish = Box<dyn Fn(&[PathParams]) + Send + Sync>;

/// Options for a single autoload run.
pub struct AutoloadOptions<H> {
    /// Command directory, default `./commands`.
    pub path: Option<PathBuf>,
    /// Glob patterns; `None` means `**/*.{ts,js,cjs,mjs}`.
    pub patterns: Option<Patterns>,
    /// Forwarded untouched to the scanner.
    pub match_options: MatchOptions,
    pub import: ImportSelector<H>,
    /// Fail when nothing matches. Default `true`.
    pub fail_glob: bool,
    /// Called before each file is loaded.
    pub on_load: Option<OnLoad>,
    /// Called once after every file was registered.
    pub on_finish: Option<OnFinish>,
}

impl<H> Default for AutoloadOptions<H> {
    fn default() -> Self {
        Self {
            path: None,
            patterns: None,
            match_options: MatchOptions::default(),
            import: ImportSelector::default(),
            fail_glob: true,
            on_load: None,
            on_finish: None,
        }
    }
}

impl<H> AutoloadOptions<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options from a config section. Hooks are left unset.
    pub fn from_config(config: &AutoloadConfig) -> Self {
        Self {
            path: Some(PathBuf::from(&config.path)),
            patterns: config
                .patterns
                .clone()
                .map(|p| Patterns::Many(p.into_vec())),
            match_options: config.match_options.clone(),
            import: ImportSelector::Named(config.import.clone()),
            fail_glob: config.fail_glob,
            on_load: None,
            on_finish: None,
        }
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn patterns(mut self, patterns: impl Into<Patterns>) -> Self {
        self.patterns = Some(patterns.into());
        self
    }

    pub fn match_options(mut self, options: MatchOptions) -> Self {
        self.match_options = options;
        self
    }

    pub fn import(mut self, selector: ImportSelector<H>) -> Self {
        self.import = selector;
        self
    }

    pub fn fail_glob(mut self, fail_glob: bool) -> Self {
        self.fail_glob = fail_glob;
        self
    }

    pub fn on_load(mut self, hook: impl Fn(&PathParams) + Send + Sync + 'static) -> Self {
        self.on_load = Some(Box::new(hook));
        self
    }

    pub fn on_finish(mut self, hook: impl Fn(&[PathParams]) + Send + Sync + 'static) -> Self {
        self.on_finish = Some(Box::new(hook));
        self
    }

    /// Pattern list to scan with. Only an absent option falls back to the
    /// default; an explicit empty list stays empty.
    pub fn resolved_patterns(&self) -> Vec<String> {
        match &self.patterns {
            Some(p) => p.clone().into_vec(),
            None => vec![DEFAULT_PATTERN.to_string()],
        }
    }

    /// Command directory as given, or the default.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PATH))
    }
}

impl<H> fmt::Debug for AutoloadOptions<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoloadOptions")
            .field("path", &self.path)
            .field("patterns", &self.patterns)
            .field("match_options", &self.match_options)
            .field("import", &self.import)
            .field("fail_glob", &self.fail_glob)
            .field("on_load", &self.on_load.is_some())
            .field("on_finish", &self.on_finish.is_some())
            .finish()
    }
}
