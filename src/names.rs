// 🪪 Name Lookup Store - name → {romanized name, ID}
//
// Loaded once from name_id_map.csv, extended by explicit imports.
// Never written back unless the caller asks for it.

use crate::error::{LoadOutcome, ReportError, Result};
use crate::romanize::Romanizer;
use crate::table::HeaderIndex;
use calamine::{open_workbook_auto, Data, Reader};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub const NAME_COLUMN: &str = "中文名";
pub const ROMANIZED_COLUMN: &str = "英文名";
pub const ID_COLUMN: &str = "ID";

const REQUIRED: [&str; 2] = [NAME_COLUMN, ID_COLUMN];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub romanized_name: String,
    pub identifier: String,
}

#[derive(Debug, Clone, Default)]
pub struct NameLookupStore {
    entries: BTreeMap<String, LookupEntry>,
}

impl NameLookupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the lookup file, creating an empty template if it does not exist
    pub fn load(path: &Path, romanizer: &dyn Romanizer) -> LoadOutcome<Self> {
        if !path.exists() {
            let warning = match write_template(path) {
                Ok(()) => {
                    info!(path = %path.display(), "created empty name lookup file");
                    ReportError::MissingFile(path.to_path_buf())
                }
                Err(e) => e,
            };
            return LoadOutcome::with_warning(Self::new(), warning);
        }

        match read_delimited(path, b',') {
            Ok((headers, rows)) => {
                let index = HeaderIndex::new(&headers);
                let missing = index.missing(&REQUIRED);
                if !missing.is_empty() {
                    warn!(path = %path.display(), ?missing, "name lookup file has no usable header");
                    return LoadOutcome::with_warning(
                        Self::new(),
                        ReportError::MalformedHeader {
                            path: path.to_path_buf(),
                            missing,
                        },
                    );
                }

                let mut store = Self::new();
                for (name, entry) in parse_rows(&index, &rows, romanizer) {
                    store.entries.insert(name, entry);
                }
                info!(path = %path.display(), entries = store.len(), "loaded name lookup");
                LoadOutcome::clean(store)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read name lookup file");
                LoadOutcome::with_warning(Self::new(), e)
            }
        }
    }

    /// Merge entries from a spreadsheet or delimited file
    ///
    /// The whole source is read and validated before anything is merged, so
    /// on error the store is untouched. Returns the number of rows merged.
    pub fn import_from(&mut self, path: &Path, romanizer: &dyn Romanizer) -> Result<usize> {
        let (headers, rows) = match delimiter_for(path) {
            Some(delimiter) => read_delimited(path, delimiter)?,
            None => read_spreadsheet(path)?,
        };

        let index = HeaderIndex::new(&headers);
        let missing = index.missing(&REQUIRED);
        if !missing.is_empty() {
            return Err(ReportError::ImportColumn(
                REQUIRED.iter().map(|c| c.to_string()).collect(),
            ));
        }

        let parsed = parse_rows(&index, &rows, romanizer);
        let imported = parsed.len();
        for (name, entry) in parsed {
            self.entries.insert(name, entry);
        }

        info!(path = %path.display(), imported, total = self.len(), "imported name lookup entries");
        Ok(imported)
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: LookupEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&LookupEntry> {
        self.entries.get(name.trim())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &LookupEntry)> {
        self.entries.iter()
    }

    /// Write every entry back out in the lookup file layout
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record([NAME_COLUMN, ROMANIZED_COLUMN, ID_COLUMN])?;
        for (name, entry) in &self.entries {
            wtr.write_record([
                name.as_str(),
                entry.romanized_name.as_str(),
                entry.identifier.as_str(),
            ])?;
        }
        wtr.flush().map_err(|e| ReportError::io(path, e))?;
        info!(path = %path.display(), entries = self.len(), "saved name lookup");
        Ok(())
    }
}

fn write_template(path: &Path) -> Result<()> {
    let header = format!("{},{},{}\n", NAME_COLUMN, ROMANIZED_COLUMN, ID_COLUMN);
    fs::write(path, header).map_err(|e| ReportError::io(path, e))
}

/// Rows with a blank name or ID are skipped
fn parse_rows(
    index: &HeaderIndex,
    rows: &[Vec<String>],
    romanizer: &dyn Romanizer,
) -> Vec<(String, LookupEntry)> {
    rows.iter()
        .filter_map(|row| {
            let name = index.cell(row, NAME_COLUMN)?;
            let identifier = index.cell(row, ID_COLUMN)?;
            let romanized_name = index
                .cell(row, ROMANIZED_COLUMN)
                .map(str::to_string)
                .unwrap_or_else(|| romanizer.romanize(name));
            Some((
                name.to_string(),
                LookupEntry {
                    romanized_name,
                    identifier: identifier.to_string(),
                },
            ))
        })
        .collect()
}

fn delimiter_for(path: &Path) -> Option<u8> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "csv" | "txt" => Some(b','),
        "tsv" => Some(b'\t'),
        _ => None,
    }
}

/// Header row plus data rows, as strings
pub(crate) fn read_delimited(path: &Path, delimiter: u8) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    if !path.exists() {
        return Err(ReportError::MissingFile(path.to_path_buf()));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok((headers, rows))
}

/// First worksheet, first row as headers
fn read_spreadsheet(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    if !path.exists() {
        return Err(ReportError::MissingFile(path.to_path_buf()));
    }

    let mut workbook =
        open_workbook_auto(path).map_err(|e| ReportError::Spreadsheet(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::Spreadsheet("workbook has no worksheets".to_string()))?
        .map_err(|e| ReportError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header.iter().map(cell_text).collect(),
        None => Vec::new(),
    };
    let data = rows.map(|row| row.iter().map(cell_text).collect()).collect();

    Ok((headers, data))
}

/// Integral numbers lose their decimal part so IDs read back as typed
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}
