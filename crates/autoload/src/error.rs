/// Failure of an autoload run. Every variant aborts the whole run.
#[derive(Debug, thiserror::Error)]
pub enum AutoloadError {
    #[error(
        "No matches found. You can disable this error by setting fail_glob to false in the autoload options"
    )]
    NoMatches,

    #[error("{relative} doesn't provide export {export}")]
    MissingExport { relative: String, export: String },

    /// Module loader failure, passed through as is.
    #[error(transparent)]
    Load(anyhow::Error),

    /// Scanner failure, passed through as is.
    #[error(transparent)]
    Scan(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AutoloadError>;
