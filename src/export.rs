use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use log::{debug, info};

use crate::{
    csv,
    error::{Error, Result},
    game::{GameRecord, Playtime},
};

/// One CSV column, in the order of the record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    AppId,
    Title,
    Hours,
    PlaytimeText,
    AchievementsUnlocked,
    AchievementsTotal,
    CompletionPercent,
    StoreLink,
    AchievementLink,
    HeaderImage,
    LibraryImage,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::AppId,
        Column::Title,
        Column::Hours,
        Column::PlaytimeText,
        Column::AchievementsUnlocked,
        Column::AchievementsTotal,
        Column::CompletionPercent,
        Column::StoreLink,
        Column::AchievementLink,
        Column::HeaderImage,
        Column::LibraryImage,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Column::AppId => "app_id",
            Column::Title => "title",
            Column::Hours => "hours",
            Column::PlaytimeText => "playtime_text",
            Column::AchievementsUnlocked => "achievements_unlocked",
            Column::AchievementsTotal => "achievements_total",
            Column::CompletionPercent => "completion_percent",
            Column::StoreLink => "store_link",
            Column::AchievementLink => "achievement_link",
            Column::HeaderImage => "header_image",
            Column::LibraryImage => "library_image",
        }
    }

    pub const fn localized_label(self) -> &'static str {
        match self {
            Column::AppId => "应用ID",
            Column::Title => "游戏名称",
            Column::Hours => "游戏时长(小时)",
            Column::PlaytimeText => "原始时长文本",
            Column::AchievementsUnlocked => "已解锁成就",
            Column::AchievementsTotal => "成就总数",
            Column::CompletionPercent => "成就完成度(%)",
            Column::StoreLink => "商店链接",
            Column::AchievementLink => "成就链接",
            Column::HeaderImage => "头图链接",
            Column::LibraryImage => "库封面链接",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    pub fn label(self, style: HeaderStyle) -> &'static str {
        match style {
            HeaderStyle::Plain => self.key(),
            HeaderStyle::Localized => self.localized_label(),
        }
    }

    pub fn value(self, game: &GameRecord) -> String {
        match self {
            Column::AppId => game.app_id.clone(),
            Column::Title => game.title.clone(),
            Column::Hours => format_hours(game.hours),
            Column::PlaytimeText => game.playtime_text.clone(),
            Column::AchievementsUnlocked => game.achievements_unlocked.clone(),
            Column::AchievementsTotal => game.achievements_total.clone(),
            Column::CompletionPercent => game.completion_percent.clone(),
            Column::StoreLink => game.store_link.clone(),
            Column::AchievementLink => game.achievement_link.clone(),
            Column::HeaderImage => game.header_image.clone(),
            Column::LibraryImage => game.library_image.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderStyle {
    /// Field names as written in code.
    #[default]
    Plain,
    Localized,
}

impl FromStr for HeaderStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(HeaderStyle::Plain),
            "localized" => Ok(HeaderStyle::Localized),
            other => Err(format!("unknown header style: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved { path: PathBuf, rows: usize },
    /// Nothing to write; no file was created.
    Empty,
}

/// Most played first. Stable, so equal playtimes keep their source order.
pub fn sort_by_playtime<T: Playtime>(games: &mut [T]) {
    games.sort_by(|a, b| b.hours().total_cmp(&a.hours()));
}

/// Shortest text that reads back as the same number, always with a decimal
/// point (`12.0`, `1234.5`).
pub fn format_hours(hours: f64) -> String {
    format!("{hours:?}")
}

/// Write `games` to `path` as BOM-prefixed CSV with one header row.
///
/// Rows go to a sibling `.part` file first, which replaces `path` only once
/// fully written; a failed export leaves `path` untouched.
pub fn write_csv(
    path: &Path,
    columns: &[Column],
    style: HeaderStyle,
    games: &[GameRecord],
) -> Result<ExportOutcome> {
    if games.is_empty() {
        return Ok(ExportOutcome::Empty);
    }

    let output_err = |source: io::Error| Error::Output {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(output_err)?;
        }
    }

    let mut part = path.as_os_str().to_owned();
    part.push(".part");
    let part = PathBuf::from(part);

    let written = write_rows(&part, columns, style, games).and_then(|()| fs::rename(&part, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&part);
        return Err(output_err(e));
    }

    info!("Wrote {} rows to {}", games.len(), path.display());
    Ok(ExportOutcome::Saved {
        path: path.to_path_buf(),
        rows: games.len(),
    })
}

fn write_rows(
    path: &Path,
    columns: &[Column],
    style: HeaderStyle,
    games: &[GameRecord],
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(csv::BOM.as_bytes())?;

    let header: Vec<String> = columns.iter().map(|c| c.label(style).to_string()).collect();
    csv::write_row(&mut out, &header, ',')?;

    for game in games {
        let row: Vec<String> = columns.iter().map(|c| c.value(game)).collect();
        csv::write_row(&mut out, &row, ',')?;
    }
    out.flush()?;
    debug!("Flushed {}", path.display());
    Ok(())
}

/// Aligned console listing: name, then hours with two decimals. An empty
/// library is a single line.
pub fn print_listing<W: Write, T: Playtime>(out: &mut W, games: &[T]) -> io::Result<()> {
    if games.is_empty() {
        return writeln!(out, "No games found.");
    }
    writeln!(out, "--- Steam library ---")?;
    for game in games {
        writeln!(out, "{:<50} | {:>7.2} hrs", game.title(), game.hours())?;
    }
    writeln!(out)?;
    writeln!(out, "Found {} games.", games.len())
}
