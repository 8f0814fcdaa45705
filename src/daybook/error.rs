use thiserror::Error;

#[derive(Error, Debug)]
pub enum DaybookError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error importing file: {0}")]
    InvalidImport(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Not signed in. Run `daybook login` first.")]
    NotSignedIn,

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, DaybookError>;
