//! Speedrun leaderboard
//!
//! Persisted as a JSON array in a local file, keeps the 10 fastest times.
//! The file format (`nome` / `tempo_ms` keys, 4-space indent) is shared with
//! existing ranking files, so entries rename their fields on the wire.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of times to keep
pub const MAX_ENTRIES: usize = 10;
/// Longest name accepted from the name entry screen
pub const MAX_NAME_LEN: usize = 10;
/// Default file name next to the executable's working directory
pub const DEFAULT_RANKING_FILE: &str = "ranking.json";

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("could not access ranking file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed ranking: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    #[serde(rename = "nome")]
    pub name: String,
    /// Completion time, lower is better
    #[serde(rename = "tempo_ms")]
    pub time_ms: u64,
}

impl RankingEntry {
    pub fn new(name: &str, time_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            time_ms,
        }
    }
}

/// Leaderboard sorted ascending by time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Ranking {
    pub entries: Vec<RankingEntry>,
}

impl Ranking {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Seed board used when there's no usable file
    pub fn defaults() -> Self {
        Self {
            entries: vec![
                RankingEntry::new("DEV", 150_000),
                RankingEntry::new("GHOST", 240_000),
            ],
        }
    }

    /// Normalise a player-typed name: trimmed, upper-cased, length-capped
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_uppercase().chars().take(MAX_NAME_LEN).collect()
    }

    /// Check if a time would make the board
    pub fn qualifies(&self, time_ms: u64) -> bool {
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| time_ms < e.time_ms).unwrap_or(true)
    }

    /// Get the rank a time would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, time_ms: u64) -> Option<usize> {
        if !self.qualifies(time_ms) {
            return None;
        }
        // Ties go after existing entries
        let rank = self.entries.iter().position(|e| time_ms < e.time_ms);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a finished run. Returns the rank achieved (1-indexed), or None if
    /// the time didn't qualify or the name is blank.
    pub fn add_time(&mut self, name: &str, time_ms: u64) -> Option<usize> {
        let name = Self::normalize_name(name);
        if name.is_empty() {
            return None;
        }
        let rank = self.potential_rank(time_ms)?;
        self.entries.insert(rank - 1, RankingEntry { name, time_ms });
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best_time(&self) -> Option<u64> {
        self.entries.first().map(|e| e.time_ms)
    }

    /// Read the board from a file. Missing, empty or corrupt files yield the
    /// default board.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(Some(ranking)) => {
                log::info!("Loaded {} ranking entries", ranking.entries.len());
                ranking
            }
            Ok(None) => {
                log::info!("No ranking at {}, using defaults", path.display());
                Self::defaults()
            }
            Err(err) => {
                log::warn!("Unreadable ranking at {}: {}; using defaults", path.display(), err);
                Self::defaults()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Option<Self>, RankingError> {
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(path)?;
        if json.trim().is_empty() {
            return Ok(None);
        }
        let mut ranking: Ranking = serde_json::from_str(&json)?;
        ranking.entries.sort_by_key(|e| e.time_ms);
        ranking.entries.truncate(MAX_ENTRIES);
        Ok(Some(ranking))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RankingError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        fs::write(path.as_ref(), buf)?;
        log::info!("Ranking saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Format a run time as `MM:SS.mmm`
pub fn format_time(time_ms: u64) -> String {
    let total_secs = time_ms / 1000;
    let ms = time_ms % 1000;
    format!("{:02}:{:02}.{:03}", total_secs / 60, total_secs % 60, ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_board() -> Ranking {
        let mut ranking = Ranking::new();
        for i in 0..MAX_ENTRIES as u64 {
            ranking.add_time("p", 10_000 * (i + 1));
        }
        ranking
    }

    #[test]
    fn test_add_keeps_ascending_order() {
        let mut ranking = Ranking::defaults();
        assert_eq!(ranking.add_time("  ana ", 200_000), Some(2));
        let names: Vec<&str> = ranking.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["DEV", "ANA", "GHOST"]);
        assert_eq!(ranking.best_time(), Some(150_000));
    }

    #[test]
    fn test_ties_rank_after_existing() {
        let mut ranking = Ranking::defaults();
        assert_eq!(ranking.add_time("bob", 150_000), Some(2));
        assert_eq!(ranking.entries[0].name, "DEV");
    }

    #[test]
    fn test_board_is_capped() {
        let mut ranking = full_board();
        assert!(!ranking.qualifies(100_000));
        assert_eq!(ranking.add_time("slow", 100_000), None);

        assert_eq!(ranking.add_time("fast", 5_000), Some(1));
        assert_eq!(ranking.entries.len(), MAX_ENTRIES);
        assert_eq!(ranking.entries.last().map(|e| e.time_ms), Some(90_000));
    }

    #[test]
    fn test_names_are_normalized() {
        assert_eq!(Ranking::normalize_name("  zé silva  "), "ZÉ SILVA");
        assert_eq!(Ranking::normalize_name("abcdefghijklmnop"), "ABCDEFGHIJ");
        let mut ranking = Ranking::new();
        assert_eq!(ranking.add_time("   ", 1_000), None);
        assert!(ranking.is_empty());
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(150_000), "02:30.000");
        assert_eq!(format_time(61_005), "01:01.005");
        assert_eq!(format_time(0), "00:00.000");
    }

    #[test]
    fn test_file_format_is_a_plain_array() {
        let json = serde_json::to_string(&Ranking::defaults()).expect("serialize");
        assert!(json.starts_with("[{\"nome\":\"DEV\",\"tempo_ms\":150000}"));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let path = std::env::temp_dir()
            .join(format!("switch_back_rank_{}.json", std::process::id()));
        fs::write(&path, "{ not json").expect("write");
        assert_eq!(Ranking::load(&path), Ranking::defaults());

        let mut ranking = Ranking::defaults();
        ranking.add_time("eve", 90_000);
        ranking.save(&path).expect("save");
        let text = fs::read_to_string(&path).expect("read");
        assert!(text.contains("\n        \"nome\": \"EVE\""));
        assert_eq!(Ranking::load(&path), ranking);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("switch_back_rank_does_not_exist.json");
        assert_eq!(Ranking::load(path), Ranking::defaults());
    }
}
