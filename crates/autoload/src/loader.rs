//! The autoload run: scan, load each module in order, register its export.

use tracing::{debug, info};

use crate::{
    error::{AutoloadError, Result},
    module::ModuleLoader,
    options::{AutoloadOptions, PathParams},
    path::{ProgramRoot, file_locator},
    plugin::{Plugin, PluginSink},
    scan::{GlobScanner, Scanner},
};

/// Scanner, module loader and program root bundled for repeated runs.
pub struct Autoloader<S, L> {
    root: ProgramRoot,
    scanner: S,
    loader: L,
}

impl<L> Autoloader<GlobScanner, L> {
    /// Autoloader using the glob scanner.
    pub fn new(root: ProgramRoot, loader: L) -> Self {
        Self::with_scanner(root, GlobScanner, loader)
    }
}

impl<S: Scanner, L> Autoloader<S, L> {
    pub fn with_scanner(root: ProgramRoot, scanner: S, loader: L) -> Self {
        Self {
            root,
            scanner,
            loader,
        }
    }

    pub fn root(&self) -> &ProgramRoot {
        &self.root
    }

    /// Run with `options`, registering into `plugin`.
    pub async fn load<H, P>(&self, options: AutoloadOptions<H>, plugin: P) -> Result<P>
    where
        H: Send,
        L: ModuleLoader<H>,
        P: PluginSink<H> + Send,
    {
        autoload_with(&self.root, &self.scanner, &self.loader, options, plugin).await
    }

    /// Resolve the match set for `options` without loading anything.
    pub async fn scan<H>(&self, options: &AutoloadOptions<H>) -> Result<Vec<PathParams>> {
        let base = self.root.resolve(options.resolved_path());
        let patterns = options.resolved_patterns();
        let matches = self
            .scanner
            .scan(&base, &patterns, &options.match_options)
            .await
            .map_err(AutoloadError::Scan)?;
        matches
            .into_iter()
            .map(|relative| {
                let absolute = file_locator(&base, &relative).map_err(AutoloadError::Load)?;
                Ok(PathParams { absolute, relative })
            })
            .collect()
    }
}

/// Autoload into a fresh [`Plugin`], resolving relative paths against the
/// current executable and scanning with [`GlobScanner`].
pub async fn autoload<H, L>(options: AutoloadOptions<H>, loader: &L) -> Result<Plugin<H>>
where
    H: Send,
    L: ModuleLoader<H>,
{
    let root = ProgramRoot::from_current_exe().map_err(AutoloadError::Load)?;
    autoload_with(&root, &GlobScanner, loader, options, Plugin::default()).await
}

/// Scan the command directory and register one export per matched file.
///
/// Files are loaded strictly one after another in match-set order. The first
/// failure aborts the run and drops `plugin`.
pub async fn autoload_with<H, S, L, P>(
    root: &ProgramRoot,
    scanner: &S,
    loader: &L,
    options: AutoloadOptions<H>,
    mut plugin: P,
) -> Result<P>
where
    H: Send,
    S: Scanner + ?Sized,
    L: ModuleLoader<H> + ?Sized,
    P: PluginSink<H> + Send,
{
    let patterns = options.resolved_patterns();
    let base = root.resolve(options.resolved_path());

    let matches = scanner
        .scan(&base, &patterns, &options.match_options)
        .await
        .map_err(AutoloadError::Scan)?;

    if options.fail_glob && matches.is_empty() {
        return Err(AutoloadError::NoMatches);
    }

    for relative in &matches {
        let absolute = file_locator(&base, relative).map_err(AutoloadError::Load)?;
        let params = PathParams {
            absolute,
            relative: relative.clone(),
        };
        if let Some(on_load) = &options.on_load {
            on_load(&params);
        }

        let mut exports = loader
            .load(&params.absolute)
            .await
            .map_err(AutoloadError::Load)?;

        let export = options.import.select(&exports);
        let Some(handler) = exports.take(&export) else {
            return Err(AutoloadError::MissingExport {
                relative: params.relative,
                export,
            });
        };

        debug!(file = %params.relative, export = %export, "registered command module");
        plugin.register(handler);
    }

    if let Some(on_finish) = &options.on_finish {
        let all = matches
            .iter()
            .map(|relative| {
                Ok(PathParams {
                    absolute: file_locator(&base, relative).map_err(AutoloadError::Load)?,
                    relative: relative.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        on_finish(&all);
    }

    info!(
        plugin = plugin.name().unwrap_or("-"),
        dir = %base.display(),
        count = matches.len(),
        "autoloaded command modules"
    );
    Ok(plugin)
}
