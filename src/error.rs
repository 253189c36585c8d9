use std::{io, path::PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that end a pipeline run. The binary turns each into one
/// diagnostic line.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input file '{}' could not be read: {source}", .path.display())]
    InputMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(
        "could not find games data on the page. Make sure the profile is public \
         and the URL is correct; Steam may also have changed its page markup."
    )]
    GamesDataNotFound,

    #[error("failed to decode games data: {0}")]
    Decode(String),

    #[error("could not write '{}': {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("invalid selector for {field}: '{selector}'")]
    Selector { field: String, selector: String },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A single game entry that could not be turned into a record.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("required field '{0}' is missing")]
    MissingField(&'static str),
}
