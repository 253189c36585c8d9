//! Steam library export: games, playtime and achievements out of a saved
//! library page (to CSV) or a public profile (to a console listing).

use std::fs;

pub mod config;
pub mod csv;
pub mod error;
pub mod export;
pub mod game;
pub mod markup;
pub mod normalize;
pub mod profile;

pub use config::Config;
pub use error::{EntryError, Error, Result};
pub use export::ExportOutcome;
pub use game::{GameRecord, Playtime, ProfileGame};

/// Read the saved page at `config.input`, extract its games, sort them by
/// playtime and write them to `config.output`.
///
/// The schema is compiled before the input is read, so a bad selector fails
/// without touching any file. A page without game entries produces
/// [`ExportOutcome::Empty`] and no output file.
pub fn export_library_page(config: &Config) -> Result<ExportOutcome> {
    let extractor = markup::Extractor::new(&config.markup)?;

    let page = fs::read_to_string(&config.input).map_err(|source| Error::InputMissing {
        path: config.input.clone(),
        source,
    })?;

    let mut games = extractor.extract_all(&page);
    export::sort_by_playtime(&mut games);
    export::write_csv(&config.output, &config.columns, config.headers, &games)
}
