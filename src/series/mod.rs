use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::error::StreamsError;

/// Ubuntu releases known without consulting `distro-info`.
const BUILTIN_SERIES: &[(&str, &str)] = &[
    ("hardy", "8.04"),
    ("lucid", "10.04"),
    ("maverick", "10.10"),
    ("natty", "11.04"),
    ("oneiric", "11.10"),
    ("precise", "12.04"),
    ("quantal", "12.10"),
    ("raring", "13.04"),
    ("saucy", "13.10"),
    ("trusty", "14.04"),
    ("xenial", "16.04"),
    ("bionic", "18.04"),
    ("focal", "20.04"),
    ("jammy", "22.04"),
    ("noble", "24.04"),
];

/// Process-wide table; set at most once, read-only afterwards.
static TABLE: OnceLock<SeriesTable> = OnceLock::new();

fn version_regex() -> &'static Regex {
    static VERSION_RE: OnceLock<Regex> = OnceLock::new();
    VERSION_RE.get_or_init(|| {
        Regex::new(r"^(?P<version>\d+\.\d+)").expect("invalid distro-info version regex")
    })
}

#[derive(Error, Debug)]
pub enum SeriesError {
    #[error("series table already initialized")]
    AlreadyInitialized,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed distro-info data: {0}")]
    Malformed(String),
}

/// Mapping from release codename to numeric release string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesTable {
    versions: HashMap<String, String>,
}

impl SeriesTable {
    pub fn builtin() -> Self {
        Self {
            versions: BUILTIN_SERIES
                .iter()
                .map(|(series, version)| (series.to_string(), version.to_string()))
                .collect(),
        }
    }

    /// Merge rows from a `distro-info` CSV (`version,codename,series,...`).
    ///
    /// Columns are located through the header so extra columns are harmless.
    /// Returns how many series were added or changed.
    pub fn extend_from_distro_info(&mut self, csv: &str) -> Result<usize, SeriesError> {
        let mut lines = csv.lines().filter(|line| !line.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| SeriesError::Malformed("missing header".to_string()))?;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        let column = |name: &str| {
            columns
                .iter()
                .position(|c| *c == name)
                .ok_or_else(|| SeriesError::Malformed(format!("missing {name:?} column")))
        };
        let version_col = column("version")?;
        let series_col = column("series")?;

        let mut changed = 0;
        for (line_no, line) in lines.enumerate() {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let (Some(raw_version), Some(series)) = (fields.get(version_col), fields.get(series_col))
            else {
                return Err(SeriesError::Malformed(format!(
                    "row {} has {} fields",
                    line_no + 2,
                    fields.len()
                )));
            };
            // "12.04 LTS" -> "12.04"
            let Some(caps) = version_regex().captures(raw_version) else {
                return Err(SeriesError::Malformed(format!(
                    "row {} has version {raw_version:?}",
                    line_no + 2
                )));
            };
            let version = caps["version"].to_string();
            if self.versions.get(*series) != Some(&version) {
                self.versions.insert(series.to_string(), version);
                changed += 1;
            }
        }
        Ok(changed)
    }

    pub fn version(&self, series: &str) -> Option<&str> {
        self.versions.get(series).map(String::as_str)
    }

    pub fn series_for_version(&self, version: &str) -> Option<&str> {
        self.versions
            .iter()
            .find(|(_, v)| v.as_str() == version)
            .map(|(series, _)| series.as_str())
    }

    /// Known codenames, newest release first.
    pub fn series(&self) -> Vec<&str> {
        let mut entries: Vec<(&str, &str)> = self
            .versions
            .iter()
            .map(|(s, v)| (s.as_str(), v.as_str()))
            .collect();
        entries.sort_by(|a, b| release_key(b.1).cmp(&release_key(a.1)).then(a.0.cmp(b.0)));
        entries.into_iter().map(|(series, _)| series).collect()
    }
}

fn release_key(version: &str) -> (u32, u32) {
    let (major, minor) = version.split_once('.').unwrap_or((version, "0"));
    (major.parse().unwrap_or(0), minor.parse().unwrap_or(0))
}

/// Initialize the process-wide table from a `distro-info` CSV file, on top of
/// the built-in entries. Must run before the first lookup.
pub fn init_from_distro_info(path: impl AsRef<Path>) -> Result<usize, SeriesError> {
    let data = fs::read_to_string(path)?;
    let mut table = SeriesTable::builtin();
    let changed = table.extend_from_distro_info(&data)?;
    TABLE
        .set(table)
        .map_err(|_| SeriesError::AlreadyInitialized)?;
    Ok(changed)
}

fn table() -> &'static SeriesTable {
    TABLE.get_or_init(SeriesTable::builtin)
}

/// Numeric release for `series`, e.g. `"precise"` -> `"12.04"`.
pub fn version(series: &str) -> Result<&'static str, StreamsError> {
    table()
        .version(series)
        .ok_or_else(|| StreamsError::UnknownSeries(series.to_string()))
}

pub fn series_for_version(version: &str) -> Option<&'static str> {
    table().series_for_version(version)
}

pub fn known_series() -> Vec<&'static str> {
    table().series()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISTRO_INFO: &str = "\
version,codename,series,created,release,eol,eol-server
12.04 LTS,Precise Pangolin,precise,2011-10-13,2012-04-26,2017-04-26,2017-04-26
24.10,Oracular Oriole,oracular,2024-04-25,2024-10-10,2025-07-10
";

    #[test]
    fn builtin_lookup() {
        assert_eq!(version("precise").unwrap(), "12.04");
        assert_eq!(version("lucid").unwrap(), "10.04");
        assert_eq!(series_for_version("22.04"), Some("jammy"));
    }

    #[test]
    fn unknown_series_is_an_error() {
        let err = version("warty-hedgehog").unwrap_err();
        assert!(matches!(err, StreamsError::UnknownSeries(ref s) if s == "warty-hedgehog"));
    }

    #[test]
    fn distro_info_rows_extend_the_table() {
        let mut table = SeriesTable::builtin();
        let changed = table.extend_from_distro_info(DISTRO_INFO).unwrap();
        // precise is already present with the same version
        assert_eq!(changed, 1);
        assert_eq!(table.version("oracular"), Some("24.10"));
        assert_eq!(table.version("precise"), Some("12.04"));
    }

    #[test]
    fn distro_info_without_series_column_is_rejected() {
        let mut table = SeriesTable::builtin();
        let err = table
            .extend_from_distro_info("version,codename\n12.04,Precise")
            .unwrap_err();
        assert!(matches!(err, SeriesError::Malformed(_)));
    }

    #[test]
    fn series_sorted_newest_first() {
        let table = SeriesTable::builtin();
        let series = table.series();
        assert_eq!(series.first(), Some(&"noble"));
        assert_eq!(series.last(), Some(&"hardy"));
    }
}
