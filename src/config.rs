use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use yaml_rust2::{Yaml, YamlLoader};

use crate::{
    error::{Error, Result},
    export::{Column, HeaderStyle},
};

pub const DEFAULT_INPUT: &str = "index.html";
pub const DEFAULT_OUTPUT: &str = "steam_games.csv";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/104.0.0.0 Safari/537.36";

/// Everything a pipeline run needs to know. Passed into each run; nothing
/// here is global.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub headers: HeaderStyle,
    pub columns: Vec<Column>,
    pub markup: MarkupSchema,
    pub endpoint: EndpointConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            headers: HeaderStyle::Plain,
            columns: Column::ALL.to_vec(),
            markup: MarkupSchema::default(),
            endpoint: EndpointConfig::default(),
        }
    }
}

/// Where one field lives inside a game entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub selector: String,
    /// Read this attribute instead of the element's text.
    pub attr: Option<String>,
    pub required: bool,
}

impl FieldRule {
    pub fn text(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            attr: None,
            required: false,
        }
    }

    pub fn attr(selector: &str, attr: &str) -> Self {
        Self {
            selector: selector.to_string(),
            attr: Some(attr.to_string()),
            required: false,
        }
    }
}

/// Declarative description of a saved library page. Selector changes are
/// config changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSchema {
    pub entry: String,
    pub title: FieldRule,
    pub playtime: FieldRule,
    pub achievements: FieldRule,
    pub store_link: FieldRule,
    pub achievement_link: FieldRule,
    pub header_image: FieldRule,
    /// Any image in the entry other than the header image.
    pub library_image: FieldRule,
    pub progress: FieldRule,
    pub percent_property: String,
}

impl Default for MarkupSchema {
    fn default() -> Self {
        Self {
            entry: "div._2-pQFn1G7dZ7667rrakcU3".to_string(),
            title: FieldRule::text("a._22awlPiAoaZjQMqxJhp-KP"),
            playtime: FieldRule::text("span._26nl3MClDebGDV7duYjZVn"),
            achievements: FieldRule::text("span._3ydRMzL4MOXZbMhQcxqQXf"),
            store_link: FieldRule::attr("a._22awlPiAoaZjQMqxJhp-KP", "href"),
            achievement_link: FieldRule::attr("a._1ccMjQOvv82OWGpl8CAhE9", "href"),
            header_image: FieldRule::attr("img._3jYuqSNjQE9W5xZ7nNQ8tb", "src"),
            library_image: FieldRule::attr("img:not(._3jYuqSNjQE9W5xZ7nNQ8tb)", "src"),
            progress: FieldRule::attr("div._2xJwdVhvDkvQzMUqFV5bOd", "style"),
            percent_property: "--percent".to_string(),
        }
    }
}

impl MarkupSchema {
    fn rule_mut(&mut self, field: &str) -> Option<&mut FieldRule> {
        match field {
            "title" => Some(&mut self.title),
            "playtime" => Some(&mut self.playtime),
            "achievements" => Some(&mut self.achievements),
            "store_link" => Some(&mut self.store_link),
            "achievement_link" => Some(&mut self.achievement_link),
            "header_image" => Some(&mut self.header_image),
            "library_image" => Some(&mut self.library_image),
            "progress" => Some(&mut self.progress),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Appended to the profile URL (after its trailing slash).
    pub listing_suffix: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Tried in order; capture group 1 is the embedded JSON array.
    pub patterns: Vec<String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            listing_suffix: "games/?tab=all".to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
            timeout: Duration::from_secs(15),
            patterns: vec![
                r"oGamesListPage\.SetGames\(\s*(\[.*\])\s*\);".to_string(),
                r"var g_rgGames\s*=\s*(\[.*\]);".to_string(),
            ],
        }
    }
}

impl Config {
    /// Defaults overlaid with the YAML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&text)
            .map_err(|e| match e {
                Error::Config(reason) => Error::Config(format!("{}: {reason}", path.display())),
                other => other,
            })
    }

    /// Defaults overlaid with whatever keys the document sets.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let docs = YamlLoader::load_from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        let mut config = Self::default();
        if let Some(doc) = docs.first() {
            config.apply(doc)?;
        }
        Ok(config)
    }

    fn apply(&mut self, doc: &Yaml) -> Result<()> {
        if let Some(input) = opt_str(doc, "input")? {
            self.input = PathBuf::from(input);
        }
        if let Some(output) = opt_str(doc, "output")? {
            self.output = PathBuf::from(output);
        }
        if let Some(style) = opt_str(doc, "headers")? {
            self.headers = style
                .parse()
                .map_err(|_| Error::Config(format!("unknown header style '{style}'")))?;
        }
        if let Some(keys) = opt_str_list(doc, "columns")? {
            self.columns = keys
                .iter()
                .map(|key| {
                    Column::from_key(key)
                        .ok_or_else(|| Error::Config(format!("unknown column '{key}'")))
                })
                .collect::<Result<_>>()?;
        }

        let markup = &doc["markup"];
        if let Some(entry) = opt_str(markup, "entry")? {
            self.markup.entry = entry.to_string();
        }
        if let Some(property) = opt_str(markup, "percent_property")? {
            self.markup.percent_property = property.to_string();
        }
        if let Yaml::Hash(fields) = &markup["fields"] {
            for (name, node) in fields {
                let Some(rule) = name.as_str().and_then(|n| self.markup.rule_mut(n)) else {
                    continue;
                };
                apply_rule(rule, node)?;
            }
        }

        let endpoint = &doc["endpoint"];
        if let Some(suffix) = opt_str(endpoint, "listing_suffix")? {
            self.endpoint.listing_suffix = suffix.to_string();
        }
        if let Some(agent) = opt_str(endpoint, "user_agent")? {
            self.endpoint.user_agent = agent.to_string();
        }
        match &endpoint["timeout_secs"] {
            Yaml::BadValue | Yaml::Null => {}
            Yaml::Integer(secs) if *secs > 0 => {
                self.endpoint.timeout = Duration::from_secs(*secs as u64);
            }
            _ => return Err(Error::Config("'timeout_secs' must be a positive integer".into())),
        }
        if let Some(patterns) = opt_str_list(endpoint, "patterns")? {
            self.endpoint.patterns = patterns;
        }

        Ok(())
    }
}

fn apply_rule(rule: &mut FieldRule, node: &Yaml) -> Result<()> {
    match node {
        Yaml::String(selector) => rule.selector = selector.clone(),
        Yaml::Hash(_) => {
            if let Some(selector) = opt_str(node, "selector")? {
                rule.selector = selector.to_string();
            }
            if let Some(attr) = opt_str(node, "attr")? {
                rule.attr = Some(attr.to_string());
            }
            match &node["required"] {
                Yaml::BadValue | Yaml::Null => {}
                Yaml::Boolean(required) => rule.required = *required,
                _ => return Err(Error::Config("'required' must be true or false".into())),
            }
        }
        _ => return Err(Error::Config("field rules must be a selector or a mapping".into())),
    }
    Ok(())
}

fn opt_str<'a>(node: &'a Yaml, key: &str) -> Result<Option<&'a str>> {
    match &node[key] {
        Yaml::BadValue | Yaml::Null => Ok(None),
        Yaml::String(value) => Ok(Some(value.as_str())),
        _ => Err(Error::Config(format!("'{key}' must be a string"))),
    }
}

fn opt_str_list(node: &Yaml, key: &str) -> Result<Option<Vec<String>>> {
    match &node[key] {
        Yaml::BadValue | Yaml::Null => Ok(None),
        Yaml::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| Error::Config(format!("'{key}' must list strings")))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        _ => Err(Error::Config(format!("'{key}' must be a list"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_keeps_defaults() {
        assert_eq!(Config::from_yaml_str("").unwrap(), Config::default());
    }

    #[test]
    fn overlays_only_given_keys() {
        let config = Config::from_yaml_str(
            r#"
output: out/games.csv
headers: localized
columns: [title, hours]
markup:
  entry: "li.game"
  fields:
    title: "span.name"
    store_link:
      selector: "a.store"
    playtime:
      required: true
endpoint:
  timeout_secs: 5
"#,
        )
        .unwrap();

        assert_eq!(config.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(config.output, PathBuf::from("out/games.csv"));
        assert_eq!(config.headers, HeaderStyle::Localized);
        assert_eq!(config.columns, vec![Column::Title, Column::Hours]);
        assert_eq!(config.markup.entry, "li.game");
        assert_eq!(config.markup.title, FieldRule::text("span.name"));
        assert_eq!(config.markup.store_link, FieldRule::attr("a.store", "href"));
        assert!(config.markup.playtime.required);
        assert_eq!(config.endpoint.timeout, Duration::from_secs(5));
        assert_eq!(config.endpoint.patterns, EndpointConfig::default().patterns);
    }

    #[test]
    fn rejects_wrongly_typed_values() {
        assert!(matches!(
            Config::from_yaml_str("input: [a, b]"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_yaml_str("headers: klingon"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_yaml_str("columns: [title, rating]"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_yaml_str("endpoint:\n  timeout_secs: 0"),
            Err(Error::Config(_))
        ));
    }
}
