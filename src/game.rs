/// Placeholder for a missing app identifier.
pub const UNKNOWN: &str = "unknown";
/// Placeholder for a missing text, link or image field.
pub const NOT_AVAILABLE: &str = "N/A";
/// Placeholder for a missing title.
pub const UNKNOWN_TITLE: &str = "Unknown Game";

/// Anything that can be ranked and listed by playtime.
pub trait Playtime {
    fn title(&self) -> &str;
    fn hours(&self) -> f64;
}

/// One game scraped from a saved library page. Every field holds either a
/// real value or its sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub app_id: String,
    pub title: String,
    pub hours: f64,
    pub playtime_text: String,
    pub achievements_unlocked: String,
    pub achievements_total: String,
    pub completion_percent: String,
    pub store_link: String,
    pub achievement_link: String,
    pub header_image: String,
    pub library_image: String,
}

impl Default for GameRecord {
    fn default() -> Self {
        Self {
            app_id: UNKNOWN.to_string(),
            title: UNKNOWN_TITLE.to_string(),
            hours: 0.0,
            playtime_text: NOT_AVAILABLE.to_string(),
            achievements_unlocked: "0".to_string(),
            achievements_total: "0".to_string(),
            completion_percent: "0.0".to_string(),
            store_link: NOT_AVAILABLE.to_string(),
            achievement_link: NOT_AVAILABLE.to_string(),
            header_image: NOT_AVAILABLE.to_string(),
            library_image: NOT_AVAILABLE.to_string(),
        }
    }
}

impl Playtime for GameRecord {
    fn title(&self) -> &str {
        &self.title
    }

    fn hours(&self) -> f64 {
        self.hours
    }
}

/// One game as listed by the public profile endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileGame {
    pub name: Option<String>,
    pub app_id: Option<String>,
    pub hours: f64,
}

impl ProfileGame {
    pub const fn new(name: Option<String>, app_id: Option<String>, hours: f64) -> Self {
        Self {
            name,
            app_id,
            hours,
        }
    }
}

impl Playtime for ProfileGame {
    fn title(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_TITLE)
    }

    fn hours(&self) -> f64 {
        self.hours
    }
}
