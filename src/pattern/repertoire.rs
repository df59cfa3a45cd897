//! Versioned character tables for the extended-script pattern
//!
//! A repertoire is a sorted, merged list of inclusive code point ranges.
//! Tables are loaded from JSON so they can be replaced without touching
//! validation logic:
//!
//! ```json
//! { "name": "jis-x0213", "version": "2004", "ranges": [["3041", "3096"], ["U+30A1", "U+30FA"]] }
//! ```

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Block-level approximation of the JIS X 0213 repertoire.
///
/// Covers whole Unicode blocks, so it is slightly wider than the
/// standard. Deployments that need the exact plane 1/plane 2 mapping load
/// the authoritative table with [`Repertoire::load`].
const JIS_X0213_BLOCKS: &[(u32, u32)] = &[
    (0x00A0, 0x017F), // Latin-1 supplement, Latin extended-A
    (0x01CD, 0x01DC), // pinyin vowels
    (0x0250, 0x02FF), // IPA, spacing modifiers
    (0x0300, 0x036F), // combining diacritics
    (0x0391, 0x03C9), // Greek
    (0x0401, 0x0451), // Cyrillic
    (0x1E3E, 0x1E3F),
    (0x1F70, 0x1F73),
    (0x2010, 0x205E), // general punctuation
    (0x20AC, 0x20AC), // euro sign
    (0x2100, 0x22FF), // letterlike, number forms, arrows, math operators
    (0x2300, 0x23FF),
    (0x2460, 0x24FF), // enclosed alphanumerics
    (0x2500, 0x27BF), // box drawing, shapes, misc symbols, dingbats
    (0x2934, 0x2935),
    (0x29BF, 0x29FB),
    (0x3000, 0x303F), // CJK symbols and punctuation
    (0x3041, 0x3096), // hiragana
    (0x3099, 0x30FF), // kana marks, katakana
    (0x31F0, 0x31FF), // katakana phonetic extensions
    (0x3200, 0x33FF), // enclosed CJK, CJK compatibility
    (0x3400, 0x4DBF), // CJK extension A
    (0x4E00, 0x9FFF), // CJK unified ideographs
    (0xF900, 0xFAFF), // CJK compatibility ideographs
    (0xFE45, 0xFE46),
    (0xFF01, 0xFF9F), // full-width forms, half-width katakana
    (0xFFE0, 0xFFE6),
    (0x20000, 0x2A6DF), // CJK extension B
    (0x2F800, 0x2FA1F), // CJK compatibility supplement
];

/// Character table loading errors.
#[derive(Debug, Clone, Error)]
pub enum RepertoireError {
    #[error("failed to read character table '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("invalid character table JSON: {0}")]
    Json(String),

    #[error("invalid code point '{0}'")]
    InvalidCodePoint(String),

    #[error("reversed code point range {start}..={end}")]
    ReversedRange { start: String, end: String },
}

#[derive(Debug, Deserialize)]
struct RepertoireFile {
    name: String,
    version: String,
    ranges: Vec<[String; 2]>,
}

/// Immutable set of code point ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repertoire {
    name: String,
    version: String,
    ranges: Vec<(u32, u32)>,
}

impl Repertoire {
    /// Creates a repertoire from character ranges.
    ///
    /// Ranges may overlap or arrive unsorted; empty ranges are dropped.
    pub fn new<I>(name: impl Into<String>, version: impl Into<String>, ranges: I) -> Self
    where
        I: IntoIterator<Item = RangeInclusive<char>>,
    {
        let ranges = ranges
            .into_iter()
            .filter(|r| r.start() <= r.end())
            .map(|r| (*r.start() as u32, *r.end() as u32))
            .collect();
        Self {
            name: name.into(),
            version: version.into(),
            ranges: normalize(ranges),
        }
    }

    /// Built-in JIS X 0213 approximation.
    pub fn jis_x0213() -> Self {
        Self {
            name: "jis-x0213".into(),
            version: "builtin".into(),
            ranges: normalize(JIS_X0213_BLOCKS.to_vec()),
        }
    }

    /// Loads a character table file.
    pub fn load(path: &Path) -> Result<Self, RepertoireError> {
        let content = fs::read_to_string(path).map_err(|e| RepertoireError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    /// Parses a character table from its JSON form.
    pub fn from_json_str(content: &str) -> Result<Self, RepertoireError> {
        let file: RepertoireFile =
            serde_json::from_str(content).map_err(|e| RepertoireError::Json(e.to_string()))?;

        let mut ranges = Vec::with_capacity(file.ranges.len());
        for [start, end] in &file.ranges {
            let lo = parse_code_point(start)?;
            let hi = parse_code_point(end)?;
            if lo > hi {
                return Err(RepertoireError::ReversedRange {
                    start: start.clone(),
                    end: end.clone(),
                });
            }
            ranges.push((lo, hi));
        }

        Ok(Self {
            name: file.name,
            version: file.version,
            ranges: normalize(ranges),
        })
    }

    /// Returns the table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the table version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the number of disjoint ranges after merging.
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    /// Returns true if `c` belongs to the repertoire.
    pub fn contains(&self, c: char) -> bool {
        let cp = c as u32;
        self.ranges
            .binary_search_by(|&(lo, hi)| {
                if hi < cp {
                    std::cmp::Ordering::Less
                } else if lo > cp {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }
}

/// Parses `3041`, `0x3041` or `U+3041` into a Unicode scalar value.
fn parse_code_point(raw: &str) -> Result<u32, RepertoireError> {
    let trimmed = raw.trim();
    let hex = trimmed
        .strip_prefix("U+")
        .or_else(|| trimmed.strip_prefix("u+"))
        .or_else(|| trimmed.strip_prefix("0x"))
        .unwrap_or(trimmed);

    u32::from_str_radix(hex, 16)
        .ok()
        .filter(|cp| char::from_u32(*cp).is_some())
        .ok_or_else(|| RepertoireError::InvalidCodePoint(raw.to_string()))
}

/// Sorts ranges and merges overlapping or adjacent ones.
fn normalize(mut ranges: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    ranges.sort_unstable();
    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(ranges.len());
    for (lo, hi) in ranges {
        match merged.last_mut() {
            Some(last) if lo <= last.1.saturating_add(1) => last.1 = last.1.max(hi),
            _ => merged.push((lo, hi)),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_kana_and_kanji() {
        let rep = Repertoire::jis_x0213();
        assert!(rep.contains('あ'));
        assert!(rep.contains('ア'));
        assert!(rep.contains('漢'));
        assert!(rep.contains('\u{3000}'));
        assert!(!rep.contains('a'));
        assert!(!rep.contains('\u{1F600}'));
    }

    #[test]
    fn test_ranges_are_merged() {
        let rep = Repertoire::new("t", "1", ['a'..='f', 'c'..='k', 'l'..='m', 'x'..='z']);
        assert_eq!(rep.range_count(), 2);
        assert!(rep.contains('m'));
        assert!(!rep.contains('n'));
        assert!(rep.contains('y'));
    }

    #[test]
    fn test_load_from_json() {
        let rep = Repertoire::from_json_str(
            r#"{"name":"thai","version":"11","ranges":[["U+0E01","0E3A"],["0x0E3F","0E5B"]]}"#,
        )
        .unwrap();
        assert_eq!(rep.name(), "thai");
        assert_eq!(rep.version(), "11");
        assert!(rep.contains('\u{0E01}'));
        assert!(!rep.contains('\u{0E3B}'));
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = Repertoire::from_json_str(r#"{"name":"x","version":"1","ranges":[["0041","0030"]]}"#)
            .unwrap_err();
        assert!(matches!(err, RepertoireError::ReversedRange { .. }));
    }

    #[test]
    fn test_surrogate_code_point_rejected() {
        let err = Repertoire::from_json_str(r#"{"name":"x","version":"1","ranges":[["D800","D8FF"]]}"#)
            .unwrap_err();
        assert!(matches!(err, RepertoireError::InvalidCodePoint(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Repertoire::load(Path::new("/nonexistent/table.json")).unwrap_err();
        assert!(matches!(err, RepertoireError::Io { .. }));
    }
}
