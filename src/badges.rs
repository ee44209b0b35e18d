// 🏅 Badge Translation Store - Chinese badge name → Korean badge name

use crate::error::{LoadOutcome, ReportError};
use crate::names::read_delimited;
use crate::table::HeaderIndex;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

pub const SOURCE_COLUMN: &str = "中文技能章";
pub const TARGET_COLUMN: &str = "韩文技能章";

#[derive(Debug, Clone, Default)]
pub struct BadgeTranslationStore {
    translations: BTreeMap<String, String>,
}

impl BadgeTranslationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the translation table. Unlike the name lookup, a missing file is not created.
    pub fn load(path: &Path) -> LoadOutcome<Self> {
        let (headers, rows) = match read_delimited(path, b',') {
            Ok(table) => table,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read badge translations");
                return LoadOutcome::with_warning(Self::new(), e);
            }
        };

        let index = HeaderIndex::new(&headers);
        let missing = index.missing(&[SOURCE_COLUMN, TARGET_COLUMN]);
        if !missing.is_empty() {
            warn!(path = %path.display(), ?missing, "badge translation file has no usable header");
            return LoadOutcome::with_warning(
                Self::new(),
                ReportError::MalformedHeader {
                    path: path.to_path_buf(),
                    missing,
                },
            );
        }

        let mut store = Self::new();
        for row in &rows {
            if let (Some(source), Some(target)) = (
                index.cell(row, SOURCE_COLUMN),
                index.cell(row, TARGET_COLUMN),
            ) {
                store.insert(source, target);
            }
        }

        info!(path = %path.display(), badges = store.len(), "loaded badge translations");
        LoadOutcome::clean(store)
    }

    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) {
        self.translations.insert(source.into(), target.into());
    }

    /// Mapped name, or the input itself when there is no translation
    pub fn translate<'a>(&'a self, name: &'a str) -> &'a str {
        self.translations
            .get(name)
            .map(String::as_str)
            .unwrap_or(name)
    }

    /// Source names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.translations.keys().map(String::as_str).collect()
    }

    /// Source names containing `typed`; everything when `typed` is empty
    pub fn filter(&self, typed: &str) -> Vec<&str> {
        self.translations
            .keys()
            .filter(|name| name.contains(typed))
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.translations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store_from(content: &str) -> LoadOutcome<BadgeTranslationStore> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("badge_translation.csv");
        fs::write(&path, content).unwrap();
        BadgeTranslationStore::load(&path)
    }

    #[test]
    fn test_load_with_bom() {
        let outcome = store_from("\u{feff}中文技能章,韩文技能章\n急救,응급처치\n露营,캠핑\n");
        assert!(outcome.is_clean());
        let store = outcome.value;

        assert_eq!(store.len(), 2);
        assert_eq!(store.translate("急救"), "응급처치");
        assert_eq!(store.translate("露营"), "캠핑");
    }

    #[test]
    fn test_translate_passes_unknown_through() {
        let store = store_from("中文技能章,韩文技能章\n急救,응급처치\n").value;
        assert_eq!(store.translate("X"), "X");
        assert_eq!(store.translate(""), "");
    }

    #[test]
    fn test_missing_file_is_not_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("badge_translation.csv");

        let outcome = BadgeTranslationStore::load(&path);

        assert!(outcome.value.is_empty());
        assert!(matches!(outcome.warnings[0], ReportError::MissingFile(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_invalid_utf8_is_a_warning() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("badge_translation.csv");
        let mut bytes = "中文技能章,韩文技能章\n急救,응급처치\n".as_bytes().to_vec();
        bytes.extend_from_slice(b"\xff\xfe,\xc3\n");
        fs::write(&path, bytes).unwrap();

        let outcome = BadgeTranslationStore::load(&path);

        assert!(outcome.value.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert!(matches!(outcome.warnings[0], ReportError::Csv(_)));
    }

    #[test]
    fn test_directory_path_is_a_warning() {
        let dir = TempDir::new().unwrap();

        let outcome = BadgeTranslationStore::load(dir.path());

        assert!(outcome.value.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert!(!matches!(
            outcome.warnings[0],
            ReportError::MalformedHeader { .. } | ReportError::MissingFile(_)
        ));
    }

    #[test]
    fn test_missing_columns() {
        let outcome = store_from("中文,韩文\n急救,응급처치\n");
        assert!(outcome.value.is_empty());
        assert!(matches!(outcome.warnings[0], ReportError::MalformedHeader { .. }));
    }

    #[test]
    fn test_incomplete_rows_skipped() {
        let store = store_from("中文技能章,韩文技能章\n急救\n露营,캠핑\n,빈칸\n").value;
        assert_eq!(store.names(), vec!["露营"]);
    }

    #[test]
    fn test_filter() {
        let store = store_from("中文技能章,韩文技能章\n急救,응급처치\n水上急救,수상응급\n露营,캠핑\n").value;
        assert_eq!(store.filter("急救"), vec!["急救", "水上急救"]);
        assert_eq!(store.filter("").len(), 3);
        assert!(store.filter("无").is_empty());
    }
}
