// Two ways to get a Steam library out:
//
// `html`    reads a library page saved from the browser and writes a CSV.
// `profile` fetches the games page of a public profile and lists it.
//
// Steam's markup is generated and changes without notice. When a run finds
// nothing, the selectors and patterns in the config file are the place to look.

use std::{error::Error, io::Write, path::PathBuf};

use clap::ArgMatches;
use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use steam_library::{
    export::{self, HeaderStyle},
    profile::{self, HttpSource},
    Config, ExportOutcome,
};

mod cli;

fn main() {
    let matches = cli::build_command().get_matches();

    let level = match matches.get_count("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = init_logging(level) {
        eprintln!("WARNING: logging is unavailable: {e}");
    }

    if let Err(e) = run(&matches) {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
}

fn init_logging(level: LevelFilter) -> Result<(), SetLoggerError> {
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let config = match matches.get_one::<String>("config") {
        Some(path) => Config::load(&PathBuf::from(path))?,
        None => Config::default(),
    };

    match matches.subcommand() {
        Some(("html", sub)) => export_page(config, sub),
        Some(("profile", sub)) => list_profile(&config, sub),
        _ => unreachable!("clap requires a subcommand"),
    }
}

fn export_page(mut config: Config, sub: &ArgMatches) -> Result<(), Box<dyn Error>> {
    if let Some(input) = sub.get_one::<String>("input") {
        config.input = PathBuf::from(input);
    }
    if let Some(output) = sub.get_one::<String>("output") {
        config.output = PathBuf::from(output);
    }
    if sub.get_flag("localized") {
        config.headers = HeaderStyle::Localized;
    }

    match steam_library::export_library_page(&config)? {
        ExportOutcome::Saved { path, rows } => {
            println!("Saved {rows} games to '{}'.", path.display());
            println!("The file opens in Excel, Google Sheets or Numbers.");
        }
        ExportOutcome::Empty => println!("No game data was extracted; nothing was saved."),
    }
    Ok(())
}

fn list_profile(config: &Config, sub: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let Some(profile_url) = sub.get_one::<String>("profile_url") else {
        return Err("missing profile URL".into());
    };

    let source = HttpSource::new(&config.endpoint);
    let games = profile::library_from_profile(&source, &config.endpoint, profile_url)?;

    let mut stdout = std::io::stdout().lock();
    export::print_listing(&mut stdout, &games)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_logger_init_is_reported() {
        let _ = init_logging(LevelFilter::Warn);
        assert!(init_logging(LevelFilter::Warn).is_err());
    }
}
