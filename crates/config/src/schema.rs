/// Config schema types for the command autoloader.
use serde::{Deserialize, Serialize};

/// Default directory scanned for command modules.
pub const DEFAULT_PATH: &str = "./commands";

/// Default glob pattern: source-like files at any depth.
pub const DEFAULT_PATTERN: &str = "**/*.{ts,js,cjs,mjs}";

/// Default export name selected from each loaded module.
pub const DEFAULT_IMPORT: &str = "default";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CmdloadConfig {
    pub autoload: AutoloadConfig,
}

/// Options for a single autoload run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoloadConfig {
    /// Directory to scan, relative to the entry program unless absolute.
    pub path: String,

    /// Glob pattern(s). `None` means the default pattern set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<PatternsConfig>,

    /// Name of the export to register from each module.
    pub import: String,

    /// Fail when no file matches.
    pub fail_glob: bool,

    /// Traversal and matching behaviour, forwarded to the scanner.
    pub match_options: MatchOptions,
}

impl Default for AutoloadConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_PATH.into(),
            patterns: None,
            import: DEFAULT_IMPORT.into(),
            fail_glob: true,
            match_options: MatchOptions::default(),
        }
    }
}

/// Either a single pattern or a list, as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternsConfig {
    One(String),
    Many(Vec<String>),
}

impl PatternsConfig {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(p) => vec![p],
            Self::Many(ps) => ps,
        }
    }
}

/// Matcher and directory-walk settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Match paths case-insensitively.
    pub case_insensitive: bool,

    /// Descend into hidden (dot) directories and match dotfiles.
    pub dot: bool,

    /// Follow symbolic links while walking.
    pub follow_links: bool,

    /// Maximum directory depth below the root (`None` = unlimited).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Patterns whose matches are dropped from the result.
    pub ignore: Vec<String>,

    /// When set, `*` and `?` do not cross `/`; only `**` spans directories.
    pub literal_separator: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            dot: false,
            follow_links: false,
            max_depth: None,
            ignore: Vec::new(),
            literal_separator: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AutoloadConfig::default();
        assert_eq!(cfg.path, "./commands");
        assert_eq!(cfg.import, "default");
        assert!(cfg.fail_glob);
        assert!(cfg.patterns.is_none());
        assert!(cfg.match_options.literal_separator);
    }

    #[test]
    fn test_patterns_single_or_list() {
        let cfg: AutoloadConfig = toml::from_str(r#"patterns = "*.ts""#).unwrap();
        assert_eq!(cfg.patterns, Some(PatternsConfig::One("*.ts".into())));

        let cfg: AutoloadConfig = toml::from_str(r#"patterns = ["*.ts", "*.js"]"#).unwrap();
        assert_eq!(
            cfg.patterns.unwrap().into_vec(),
            vec!["*.ts".to_string(), "*.js".to_string()]
        );
    }

    #[test]
    fn test_explicit_empty_list_stays_empty() {
        let cfg: AutoloadConfig = toml::from_str("patterns = []").unwrap();
        assert_eq!(cfg.patterns, Some(PatternsConfig::Many(Vec::new())));
    }

    #[test]
    fn test_partial_match_options() {
        let cfg: AutoloadConfig = toml::from_str(
            r#"
            fail_glob = false
            [match_options]
            dot = true
            ignore = ["**/*.test.ts"]
            "#,
        )
        .unwrap();
        assert!(!cfg.fail_glob);
        assert!(cfg.match_options.dot);
        assert!(!cfg.match_options.follow_links);
        assert_eq!(cfg.match_options.ignore, vec!["**/*.test.ts".to_string()]);
    }
}
