//! Game list of a public Steam profile.
//!
//! The games page embeds its data as a JSON array passed to a script call.
//! That call has been renamed by Steam before, so the patterns that find it
//! live in config and a miss is reported as [`Error::GamesDataNotFound`].

use std::time::Duration;

use json::JsonValue;
use log::{debug, info};
use regex::Regex;
use reqwest::header::USER_AGENT;

use crate::{
    config::EndpointConfig,
    error::{Error, Result},
    export::sort_by_playtime,
    game::ProfileGame,
    normalize::parse_hours,
};

/// Where page text comes from.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Single blocking GET with a browser user agent and a bounded timeout.
/// Any transport error or non-2xx status fails the fetch.
pub struct HttpSource {
    client: reqwest::blocking::Client,
    user_agent: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(config: &EndpointConfig) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
        }
    }
}

impl PageSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<String> {
        self.client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .timeout(self.timeout)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|source| Error::Transport {
                url: url.to_string(),
                source,
            })
    }
}

/// `https://steamcommunity.com/id/someone` + `games/?tab=all`, with exactly
/// one slash between them.
pub fn listing_url(profile_url: &str, suffix: &str) -> String {
    let mut url = profile_url.trim().to_string();
    if !url.ends_with('/') {
        url.push('/');
    }
    url.push_str(suffix);
    url
}

/// Finds the embedded games array in a page body.
pub struct GamesLocator {
    patterns: Vec<Regex>,
}

impl GamesLocator {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, regex::Error>>()?;
        Ok(Self { patterns })
    }

    /// Capture group 1 of the first pattern that matches.
    pub fn locate<'a>(&self, body: &'a str) -> Option<&'a str> {
        self.patterns.iter().find_map(|re| {
            let literal = re.captures(body)?.get(1)?.as_str();
            debug!("Games data matched /{}/", re.as_str());
            Some(literal)
        })
    }
}

/// Decode the embedded array. Entries that are not objects yield a game with
/// no name, no id and zero hours.
pub fn parse_games(literal: &str) -> Result<Vec<ProfileGame>> {
    let value = json::parse(literal).map_err(|e| Error::Decode(e.to_string()))?;
    if !value.is_array() {
        return Err(Error::Decode("expected a JSON array".to_string()));
    }
    Ok(value.members().map(profile_game).collect())
}

fn profile_game(game: &JsonValue) -> ProfileGame {
    let name = game["name"].as_str().map(str::to_string);

    let app_id = match &game["appid"] {
        id if id.is_number() => Some(id.dump()),
        id => id.as_str().map(str::to_string),
    };

    // Older pages sent hours as a string with thousands separators.
    let hours_forever = &game["hours_forever"];
    let hours = match hours_forever.as_f64() {
        Some(hours) => hours,
        None => hours_forever.as_str().map_or(0.0, parse_hours),
    };

    ProfileGame::new(name, app_id, hours)
}

/// Fetch, locate, decode and sort the games of a public profile.
pub fn library_from_profile<S: PageSource>(
    source: &S,
    config: &EndpointConfig,
    profile_url: &str,
) -> Result<Vec<ProfileGame>> {
    let locator = GamesLocator::new(&config.patterns)?;
    let url = listing_url(profile_url, &config.listing_suffix);

    info!("Fetching game list from {url}");
    let body = source.fetch(&url)?;

    let literal = locator.locate(&body).ok_or(Error::GamesDataNotFound)?;
    let mut games = parse_games(literal)?;
    info!("Decoded {} games", games.len());

    sort_by_playtime(&mut games);
    Ok(games)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator() -> GamesLocator {
        GamesLocator::new(&EndpointConfig::default().patterns).unwrap()
    }

    #[test]
    fn listing_url_has_one_slash() {
        let suffix = "games/?tab=all";
        assert_eq!(
            listing_url("https://steamcommunity.com/id/gaben", suffix),
            "https://steamcommunity.com/id/gaben/games/?tab=all"
        );
        assert_eq!(
            listing_url("https://steamcommunity.com/id/gaben/", suffix),
            "https://steamcommunity.com/id/gaben/games/?tab=all"
        );
    }

    #[test]
    fn locates_current_and_legacy_markers() {
        let current = r#"<script>oGamesListPage.SetGames( [{"appid":440}] );</script>"#;
        assert_eq!(locator().locate(current), Some(r#"[{"appid":440}]"#));

        let legacy = r#"<script>var g_rgGames = [{"appid":620}];</script>"#;
        assert_eq!(locator().locate(legacy), Some(r#"[{"appid":620}]"#));

        assert_eq!(locator().locate("<html>private profile</html>"), None);
    }

    #[test]
    fn parses_loose_game_objects() {
        let games = parse_games(
            r#"[
                {"appid": 440, "name": "Team Fortress 2", "hours_forever": 12.5},
                {"appid": "620", "name": "Portal 2", "hours_forever": "1,234.5"},
                {"name": "Never Played"},
                {"appid": 70}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            games,
            vec![
                ProfileGame::new(Some("Team Fortress 2".into()), Some("440".into()), 12.5),
                ProfileGame::new(Some("Portal 2".into()), Some("620".into()), 1234.5),
                ProfileGame::new(Some("Never Played".into()), None, 0.0),
                ProfileGame::new(None, Some("70".into()), 0.0),
            ]
        );
    }

    #[test]
    fn rejects_malformed_or_non_array_data() {
        assert!(matches!(parse_games("[{\"appid\": 4"), Err(Error::Decode(_))));
        assert!(matches!(parse_games("{\"appid\": 4}"), Err(Error::Decode(_))));
    }
}
