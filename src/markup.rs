//! Game entries out of a saved library page.
//!
//! Every field is looked up on its own, so a missing image never costs the
//! title. Only a field marked `required` can fail an entry, and a failed
//! entry is skipped without affecting its neighbours.

use log::{debug, info, warn};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::{
    config::{FieldRule, MarkupSchema},
    error::{EntryError, Error, Result},
    game::{GameRecord, NOT_AVAILABLE, UNKNOWN, UNKNOWN_TITLE},
    normalize::{app_id_from_link, parse_hours, percent_from_style, percent_pattern, split_achievements},
};

struct FieldLookup {
    field: &'static str,
    selector: Selector,
    attr: Option<String>,
    required: bool,
}

impl FieldLookup {
    fn compile(field: &'static str, rule: &FieldRule) -> Result<Self> {
        let selector = Selector::parse(&rule.selector).map_err(|_| Error::Selector {
            field: field.to_string(),
            selector: rule.selector.clone(),
        })?;
        Ok(Self {
            field,
            selector,
            attr: rule.attr.clone(),
            required: rule.required,
        })
    }

    fn find(&self, entry: ElementRef) -> Option<String> {
        let element = entry.select(&self.selector).next()?;
        match &self.attr {
            Some(attr) => element.value().attr(attr).map(str::to_string),
            None => Some(element.text().collect::<String>().trim().to_string()),
        }
    }

    fn lookup(&self, entry: ElementRef) -> std::result::Result<Option<String>, EntryError> {
        match self.find(entry) {
            None if self.required => Err(EntryError::MissingField(self.field)),
            found => Ok(found),
        }
    }
}

/// A compiled [`MarkupSchema`].
pub struct Extractor {
    entry_source: String,
    entry: Selector,
    title: FieldLookup,
    playtime: FieldLookup,
    achievements: FieldLookup,
    store_link: FieldLookup,
    achievement_link: FieldLookup,
    header_image: FieldLookup,
    library_image: FieldLookup,
    progress: FieldLookup,
    percent: Regex,
}

impl Extractor {
    pub fn new(schema: &MarkupSchema) -> Result<Self> {
        let entry = Selector::parse(&schema.entry).map_err(|_| Error::Selector {
            field: "entry".to_string(),
            selector: schema.entry.clone(),
        })?;

        Ok(Self {
            entry_source: schema.entry.clone(),
            entry,
            title: FieldLookup::compile("title", &schema.title)?,
            playtime: FieldLookup::compile("playtime", &schema.playtime)?,
            achievements: FieldLookup::compile("achievements", &schema.achievements)?,
            store_link: FieldLookup::compile("store_link", &schema.store_link)?,
            achievement_link: FieldLookup::compile("achievement_link", &schema.achievement_link)?,
            header_image: FieldLookup::compile("header_image", &schema.header_image)?,
            library_image: FieldLookup::compile("library_image", &schema.library_image)?,
            progress: FieldLookup::compile("progress", &schema.progress)?,
            percent: percent_pattern(&schema.percent_property)?,
        })
    }

    /// Game entries in document order. An empty result is logged, not an error.
    pub fn locate<'a>(&self, doc: &'a Html) -> Vec<ElementRef<'a>> {
        let entries: Vec<ElementRef<'a>> = doc.select(&self.entry).collect();
        if entries.is_empty() {
            warn!("No game entries matched '{}'", self.entry_source);
        } else {
            info!("Found {} game entries", entries.len());
        }
        entries
    }

    pub fn extract(&self, entry: ElementRef) -> std::result::Result<GameRecord, EntryError> {
        let title = self
            .title
            .lookup(entry)?
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

        let playtime_text = self.playtime.lookup(entry)?;
        let hours = playtime_text.as_deref().map_or(0.0, parse_hours);

        let (achievements_unlocked, achievements_total) = match self.achievements.lookup(entry)? {
            Some(raw) => split_achievements(&raw),
            None => ("0".to_string(), "0".to_string()),
        };

        let store_link = self.store_link.lookup(entry)?;
        let app_id = store_link
            .as_deref()
            .and_then(app_id_from_link)
            .unwrap_or_else(|| UNKNOWN.to_string());

        let completion_percent = self
            .progress
            .lookup(entry)?
            .and_then(|style| percent_from_style(&style, &self.percent))
            .unwrap_or_else(|| "0.0".to_string());

        Ok(GameRecord {
            app_id,
            title,
            hours,
            playtime_text: or_na(playtime_text),
            achievements_unlocked,
            achievements_total,
            completion_percent,
            store_link: or_na(store_link),
            achievement_link: or_na(self.achievement_link.lookup(entry)?),
            header_image: or_na(self.header_image.lookup(entry)?),
            library_image: or_na(self.library_image.lookup(entry)?),
        })
    }

    /// Parse `markup` and extract every entry, skipping the ones that fail.
    pub fn extract_all(&self, markup: &str) -> Vec<GameRecord> {
        let doc = Html::parse_document(markup);
        let mut games = Vec::new();

        for (i, entry) in self.locate(&doc).into_iter().enumerate() {
            match self.extract(entry) {
                Ok(game) => {
                    debug!("Entry {}: {} ({} h)", i + 1, game.title, game.hours);
                    games.push(game);
                }
                Err(e) => warn!("Could not parse game entry {}, skipping: {e}", i + 1),
            }
        }
        games
    }
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
