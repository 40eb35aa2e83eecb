//! Command autoloading for bot plugins.
//!
//! Scans a command directory with glob patterns, loads every matched module
//! through a [`ModuleLoader`], picks one export per module and registers it
//! with a [`PluginSink`]. Modules are processed one at a time in match order;
//! the first failure aborts the whole run.

pub mod error;
pub mod loader;
pub mod module;
pub mod options;
pub mod path;
pub mod plugin;
pub mod scan;

pub use {
    cmdload_config::{AutoloadConfig, MatchOptions},
    error::AutoloadError,
    loader::{Autoloader, autoload, autoload_with},
    module::{Exports, ModuleLoader, ModuleRegistry},
    options::{AutoloadOptions, ImportSelector, PathParams, Patterns},
    path::ProgramRoot,
    plugin::{Plugin, PluginSink},
    scan::{GlobScanner, Scanner},
};
