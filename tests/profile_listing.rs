use std::cell::RefCell;

use steam_library::{
    config::EndpointConfig,
    profile::{library_from_profile, PageSource},
    Error, Playtime, Result,
};

struct CannedPage {
    body: &'static str,
    requested: RefCell<Vec<String>>,
}

impl CannedPage {
    fn new(body: &'static str) -> Self {
        Self {
            body,
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl PageSource for CannedPage {
    fn fetch(&self, url: &str) -> Result<String> {
        self.requested.borrow_mut().push(url.to_string());
        Ok(self.body.to_string())
    }
}

const GAMES_PAGE: &str = r#"<html><script>
var oGamesListPage = new CGamesListPage();
oGamesListPage.SetGames( [{"appid":400,"name":"Portal","hours_forever":"5"},{"appid":570,"name":"Dota 2","hours_forever":"20"},{"appid":10,"name":"Counter-Strike"},{"appid":240,"name":"Counter-Strike: Source","hours_forever":20}] );
</script></html>"#;

#[test]
fn lists_games_most_played_first() {
    let source = CannedPage::new(GAMES_PAGE);
    let games = library_from_profile(
        &source,
        &EndpointConfig::default(),
        "https://steamcommunity.com/id/someone",
    )
    .unwrap();

    assert_eq!(
        *source.requested.borrow(),
        vec!["https://steamcommunity.com/id/someone/games/?tab=all".to_string()]
    );

    let listed: Vec<(&str, f64)> = games.iter().map(|g| (g.title(), g.hours())).collect();
    assert_eq!(
        listed,
        vec![
            ("Dota 2", 20.0),
            ("Counter-Strike: Source", 20.0),
            ("Portal", 5.0),
            ("Counter-Strike", 0.0),
        ]
    );
    assert_eq!(games[0].app_id.as_deref(), Some("570"));
}

#[test]
fn page_without_marker_is_a_diagnostic() {
    let source = CannedPage::new("<html><body>This profile is private.</body></html>");
    let err = library_from_profile(
        &source,
        &EndpointConfig::default(),
        "https://steamcommunity.com/id/someone/",
    )
    .unwrap_err();

    assert!(matches!(err, Error::GamesDataNotFound));
    assert!(err.to_string().contains("profile is public"));
}

#[test]
fn malformed_array_is_a_decode_error() {
    let source = CannedPage::new("oGamesListPage.SetGames( [{\"appid\": 440,] );");
    let err = library_from_profile(
        &source,
        &EndpointConfig::default(),
        "https://steamcommunity.com/id/someone",
    )
    .unwrap_err();

    assert!(matches!(err, Error::Decode(_)));
}

#[test]
fn invalid_pattern_fails_before_fetching() {
    let source = CannedPage::new(GAMES_PAGE);
    let config = EndpointConfig {
        patterns: vec!["SetGames\\((".to_string()],
        ..EndpointConfig::default()
    };

    let err = library_from_profile(&source, &config, "https://steamcommunity.com/id/someone")
        .unwrap_err();
    assert!(matches!(err, Error::Pattern(_)));
    assert!(source.requested.borrow().is_empty());
}
