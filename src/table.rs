// 📋 Header-indexed rows shared by the CSV and spreadsheet readers

use std::collections::HashMap;

const BOM: char = '\u{feff}';

/// Column name → position, built from a header row
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    columns: HashMap<String, usize>,
}

impl HeaderIndex {
    /// Header cells are trimmed; a byte-order mark on any cell is dropped
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut columns = HashMap::new();
        for (i, header) in headers.into_iter().enumerate() {
            let name = header.as_ref().trim_start_matches(BOM).trim().to_string();
            if !name.is_empty() {
                // First occurrence wins on duplicate headers
                columns.entry(name).or_insert(i);
            }
        }
        HeaderIndex { columns }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.get(column).copied()
    }

    /// Required columns not present in this header, in the order asked
    pub fn missing(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|c| !self.columns.contains_key(**c))
            .map(|c| c.to_string())
            .collect()
    }

    /// Trimmed cell for `column`, `None` if the column or cell is absent or blank
    pub fn cell<'a>(&self, row: &'a [String], column: &str) -> Option<&'a str> {
        self.position(column)
            .and_then(|i| row.get(i))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_bom_and_whitespace_stripped() {
        let index = HeaderIndex::new(["\u{feff}中文技能章", " 韩文技能章 "]);
        assert_eq!(index.position("中文技能章"), Some(0));
        assert_eq!(index.position("韩文技能章"), Some(1));
    }

    #[test]
    fn test_missing_columns() {
        let index = HeaderIndex::new(["中文名", "英文名"]);
        assert_eq!(index.missing(&["中文名", "ID"]), vec!["ID".to_string()]);
        assert!(index.missing(&["中文名"]).is_empty());
        assert!(HeaderIndex::new(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_cell_lookup() {
        let index = HeaderIndex::new(["中文名", "英文名", "ID"]);
        let r = row(&["王小明", "  ", "1001"]);
        assert_eq!(index.cell(&r, "中文名"), Some("王小明"));
        assert_eq!(index.cell(&r, "英文名"), None);
        assert_eq!(index.cell(&r, "ID"), Some("1001"));
        assert_eq!(index.cell(&r, "备注"), None);

        let short = row(&["王小明"]);
        assert_eq!(index.cell(&short, "ID"), None);
    }
}
