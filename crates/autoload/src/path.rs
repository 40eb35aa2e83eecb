//! Base directory resolution and file locators.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

/// Directory of the running entry program. Relative command paths are
/// resolved against it, so the result does not depend on where the bot was
/// launched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramRoot {
    dir: PathBuf,
}

impl ProgramRoot {
    /// Use `dir` as the program root. Relative input is anchored at the
    /// current working directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let dir = if dir.is_absolute() {
            dir
        } else {
            std::path::absolute(&dir).unwrap_or(dir)
        };
        Self {
            dir: normalize(&dir),
        }
    }

    /// Root derived from an entry program path: its parent directory, with a
    /// relative entry first joined onto `cwd`.
    pub fn from_entry(entry: &Path, cwd: &Path) -> Self {
        let entry = if entry.is_absolute() {
            entry.to_path_buf()
        } else {
            cwd.join(entry)
        };
        Self::new(entry.join(".."))
    }

    /// Root of the current executable.
    pub fn from_current_exe() -> Result<Self> {
        let exe = std::env::current_exe().context("cannot determine current executable")?;
        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        Ok(Self::from_entry(&exe, &cwd))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a command directory: absolute paths are taken as given,
    /// relative ones are joined onto the program root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            normalize(path)
        } else {
            normalize(&self.dir.join(path))
        }
    }
}

/// Lexically normalize a path: drop `.`, fold `..` into its parent.
/// The filesystem is not consulted, so symlinks are left alone.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                },
                Some(Component::RootDir | Component::Prefix(_)) => {},
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `file://` URL for `relative` under `base`.
pub fn file_locator(base: &Path, relative: &str) -> Result<String> {
    let path = base.join(relative);
    let url = url::Url::from_file_path(&path)
        .map_err(|()| anyhow::anyhow!("cannot build file URL for {}", path.display()))?;
    Ok(url.into())
}
