use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("An effect label must not be empty.")]
    EmptyEffect,

    #[error("A rule set requires a default effect.")]
    MissingDefaultEffect,

    #[error("An error occurred deserializing rule set settings {0}.")]
    Deserializing(#[source] serde_json::Error),
}
