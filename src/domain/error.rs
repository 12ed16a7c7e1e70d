use thiserror::Error;

#[derive(Error, Debug)]
pub enum WashboardError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API Error: {0}")]
    Api(String),

    #[error("Secure store error: {0}")]
    Store(String),

    #[error("Item '{key}' is {size} bytes, store accepts at most {limit}")]
    ItemTooLarge {
        key: String,
        size: usize,
        limit: usize,
    },

    #[error("Unknown query: {0}")]
    UnknownQuery(String),
}
