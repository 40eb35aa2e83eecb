//! Directory traversal: the scanner seam and the glob-based implementation.
//!
//! [`GlobScanner`] semantics:
//! - only regular files are reported (symlinked files count when
//!   `follow_links` is set);
//! - entries are visited depth-first, sorted by file name within each
//!   directory, so the match set is stable for a given tree;
//! - every file is reported at most once, however many patterns match it;
//! - hidden entries (leading `.`) are skipped unless `dot` is set or a
//!   pattern names the hidden segment itself (`.env.ts`, `.hidden/*.ts`);
//! - a missing root yields an empty match set, unreadable entries and
//!   non-UTF-8 names are skipped with a warning.

use std::path::Path;

use {
    anyhow::{Context, Result},
    async_trait::async_trait,
    globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder},
    tracing::{debug, warn},
    walkdir::{DirEntry, WalkDir},
};

use crate::MatchOptions;

/// Enumerates files under a root that match any of the given patterns.
///
/// Returned paths are relative to `root` and `/`-separated.
#[async_trait]
pub trait Scanner: Send + Sync {
    async fn scan(
        &self,
        root: &Path,
        patterns: &[String],
        options: &MatchOptions,
    ) -> Result<Vec<String>>;
}

/// Scanner backed by `walkdir` and `globset`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobScanner;

#[async_trait]
impl Scanner for GlobScanner {
    async fn scan(
        &self,
        root: &Path,
        patterns: &[String],
        options: &MatchOptions,
    ) -> Result<Vec<String>> {
        let root = root.to_path_buf();
        let patterns = patterns.to_vec();
        let options = options.clone();
        tokio::task::spawn_blocking(move || scan_blocking(&root, &patterns, &options))
            .await
            .context("scan task failed")?
    }
}

/// Synchronous scan, used by [`GlobScanner`] on a blocking worker.
pub fn scan_blocking(
    root: &Path,
    patterns: &[String],
    options: &MatchOptions,
) -> Result<Vec<String>> {
    let include = build_set(patterns, options)?;
    let ignore = build_set(&options.ignore, options)?;
    let dot_patterns: Vec<String> = patterns
        .iter()
        .filter(|p| names_hidden_segment(p))
        .cloned()
        .collect();
    let dot_include = build_set(&dot_patterns, options)?;
    let prune_hidden = !options.dot && dot_patterns.is_empty();

    if !root.is_dir() {
        debug!(root = %root.display(), "scan root is not a directory");
        return Ok(Vec::new());
    }

    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(options.follow_links)
        .sort_by_file_name();
    if let Some(depth) = options.max_depth {
        walker = walker.max_depth(depth);
    }

    let mut matches = Vec::new();
    let entries = walker
        .into_iter()
        .filter_entry(|entry| !prune_hidden || !is_hidden(entry));
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            },
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(relative) = relative_slash_path(root, entry.path()) else {
            warn!(path = %entry.path().display(), "skipping non-UTF-8 path");
            continue;
        };
        let included = if !options.dot && has_hidden_segment(&relative) {
            dot_include.is_match(&relative)
        } else {
            include.is_match(&relative)
        };
        if included && !ignore.is_match(&relative) {
            matches.push(relative);
        }
    }

    debug!(
        root = %root.display(),
        patterns = ?patterns,
        count = matches.len(),
        "scanned command directory"
    );
    Ok(matches)
}

fn build_set(patterns: &[String], options: &MatchOptions) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(build_glob(pattern, options)?);
    }
    builder.build().context("failed to compile glob set")
}

fn build_glob(pattern: &str, options: &MatchOptions) -> Result<Glob> {
    let pattern = pattern.trim_start_matches("./");
    GlobBuilder::new(pattern)
        .case_insensitive(options.case_insensitive)
        .literal_separator(options.literal_separator)
        .build()
        .with_context(|| format!("invalid glob pattern {pattern:?}"))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn is_hidden_segment(segment: &str) -> bool {
    segment.starts_with('.') && segment != "." && segment != ".."
}

fn has_hidden_segment(relative: &str) -> bool {
    relative.split('/').any(is_hidden_segment)
}

/// Whether a pattern spells out a hidden segment, which opts those entries
/// in even without `dot`.
fn names_hidden_segment(pattern: &str) -> bool {
    has_hidden_segment(pattern.trim_start_matches("./"))
}

/// `root`-relative, `/`-separated path. `None` when a component is not
/// valid UTF-8.
fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}
