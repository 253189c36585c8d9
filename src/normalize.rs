//! Rules that turn loosely formatted page text into record fields.

use std::sync::LazyLock;

use regex::Regex;

static HOURS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.?\d*").unwrap());

static APP_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/app/(\d+)").unwrap());

/// Hours from playtime text such as `"1,234.5 hrs on record"`.
/// Thousands separators are dropped; text without a numeral gives 0.0.
pub fn parse_hours(raw: &str) -> f64 {
    let cleaned = raw.replace(',', "");
    HOURS_RE
        .find(&cleaned)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

/// Splits `"<unlocked>/<total>"` once on the slash. Without a slash both
/// halves are `"0"`.
pub fn split_achievements(raw: &str) -> (String, String) {
    match raw.split_once('/') {
        Some((unlocked, total)) => (unlocked.trim().to_string(), total.trim().to_string()),
        None => ("0".to_string(), "0".to_string()),
    }
}

/// Numeric id following `/app/` in a store link.
pub fn app_id_from_link(link: &str) -> Option<String> {
    APP_ID_RE
        .captures(link)
        .map(|caps| caps[1].to_string())
}

/// Matches `<property>: <decimal>` inside an inline style declaration. The
/// name must start a declaration, so `--bar--percent` is not `--percent`.
pub fn percent_pattern(property: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?:^|[;{{\s]){}\s*:\s*(\d+(?:\.\d+)?)",
        regex::escape(property)
    ))
}

/// Completion percentage out of a style attribute such as
/// `"--percent: 42.5%; width: 10px"`.
pub fn percent_from_style(style: &str, pattern: &Regex) -> Option<String> {
    pattern.captures(style).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_strip_thousands_separators() {
        assert_eq!(parse_hours("1,234.5 hrs"), 1234.5);
        assert_eq!(parse_hours("Total played 12 hours"), 12.0);
        assert_eq!(parse_hours("0.3"), 0.3);
    }

    #[test]
    fn hours_without_numeral_are_zero() {
        assert_eq!(parse_hours(""), 0.0);
        assert_eq!(parse_hours("N/A"), 0.0);
        assert_eq!(parse_hours("never played"), 0.0);
    }

    #[test]
    fn achievements_split_once() {
        assert_eq!(split_achievements("15/30"), ("15".into(), "30".into()));
        assert_eq!(split_achievements(" 3 / 7 "), ("3".into(), "7".into()));
        assert_eq!(split_achievements("1/2/3"), ("1".into(), "2/3".into()));
    }

    #[test]
    fn achievements_without_separator_default_to_zero() {
        assert_eq!(split_achievements("15"), ("0".into(), "0".into()));
        assert_eq!(split_achievements(""), ("0".into(), "0".into()));
    }

    #[test]
    fn app_id_follows_app_segment() {
        assert_eq!(
            app_id_from_link("https://store.steampowered.com/app/440/Team_Fortress_2/"),
            Some("440".into())
        );
        assert_eq!(app_id_from_link("https://store.steampowered.com/sub/440/"), None);
        assert_eq!(app_id_from_link("N/A"), None);
    }

    #[test]
    fn percent_read_from_custom_property() {
        let re = percent_pattern("--percent").unwrap();
        assert_eq!(
            percent_from_style("width: 100%; --percent: 42.5%;", &re),
            Some("42.5".into())
        );
        assert_eq!(percent_from_style("--percent:100", &re), Some("100".into()));
        assert_eq!(percent_from_style("width: 42%", &re), None);
    }

    #[test]
    fn percent_ignores_longer_property_names() {
        let re = percent_pattern("--percent").unwrap();
        assert_eq!(
            percent_from_style("--bar--percent: 7%; --percent: 42.5%", &re),
            Some("42.5".into())
        );
        assert_eq!(percent_from_style("--bar--percent: 7%", &re), None);
        assert_eq!(percent_from_style("width:1px;--percent:3", &re), Some("3".into()));
    }
}
