// 🗂️ Session - everything one run of the form owns
//
// Lookup stores are loaded once here and passed by reference to whoever
// needs them. No process-wide state.

use crate::badges::BadgeTranslationStore;
use crate::config::AppConfig;
use crate::docx;
use crate::error::{ReportError, Result};
use crate::names::NameLookupStore;
use crate::records::{Record, RecordFields, RecordList};
use crate::report::{DatePolicy, Report, ReportGenerator};
use crate::romanize::{PinyinRomanizer, Romanizer};
use std::path::Path;
use tracing::{info, warn};

pub struct Session {
    pub names: NameLookupStore,
    pub badges: BadgeTranslationStore,
    pub records: RecordList,
    pub group_name: String,
    pub leader_name: String,
    pub date_policy: DatePolicy,
    /// Warnings collected while loading the lookup files
    pub notices: Vec<ReportError>,
    romanizer: Box<dyn Romanizer>,
}

impl Session {
    pub fn open(config: &AppConfig) -> Self {
        Self::open_with(config, Box::new(PinyinRomanizer))
    }

    pub fn open_with(config: &AppConfig, romanizer: Box<dyn Romanizer>) -> Self {
        let names = NameLookupStore::load(&config.name_map_path, romanizer.as_ref());
        let badges = BadgeTranslationStore::load(&config.badge_path);

        let mut notices = names.warnings;
        notices.extend(badges.warnings);
        for notice in &notices {
            warn!("{}", notice);
        }

        info!(
            names = names.value.len(),
            badges = badges.value.len(),
            "session ready"
        );

        Session {
            names: names.value,
            badges: badges.value,
            records: RecordList::new(),
            group_name: config.default_group.clone(),
            leader_name: config.default_leader.clone(),
            date_policy: DatePolicy::default(),
            notices,
            romanizer,
        }
    }

    /// Romanized name and ID for a typed name
    ///
    /// Known names come from the lookup; unknown ones get a derived
    /// romanization and an empty ID.
    pub fn candidate_for(&self, name: &str) -> (String, String) {
        match self.names.get(name) {
            Some(entry) => (entry.romanized_name.clone(), entry.identifier.clone()),
            None => (self.romanizer.romanize(name), String::new()),
        }
    }

    pub fn romanize(&self, name: &str) -> String {
        self.romanizer.romanize(name)
    }

    /// Fill blank romanized name / ID from the lookup before adding
    pub fn complete(&self, mut fields: RecordFields) -> RecordFields {
        if fields.romanized_name.trim().is_empty() || fields.identifier.trim().is_empty() {
            let (romanized, identifier) = self.candidate_for(&fields.name);
            if fields.romanized_name.trim().is_empty() {
                fields.romanized_name = romanized;
            }
            if fields.identifier.trim().is_empty() {
                fields.identifier = identifier;
            }
        }
        fields
    }

    pub fn add_record(&mut self, fields: RecordFields) -> &Record {
        self.records.add(fields)
    }

    pub fn edit_record(&mut self, sequence: u32, fields: RecordFields) -> bool {
        self.records.edit(sequence, fields)
    }

    pub fn delete_record(&mut self, sequence: u32) -> Option<Record> {
        self.records.delete(sequence)
    }

    pub fn move_record(&mut self, from: u32, to: u32) -> bool {
        self.records.move_record(from, to)
    }

    /// Merge names from a spreadsheet; on error the lookup is unchanged
    pub fn import_names(&mut self, path: &Path) -> Result<usize> {
        self.names.import_from(path, self.romanizer.as_ref())
    }

    /// Append rows from a records CSV, completing blanks from the lookup
    ///
    /// Every row is parsed before any is added, so a bad row leaves the list
    /// unchanged. Returns the number of rows added.
    pub fn load_records_csv(&mut self, path: &Path) -> Result<usize> {
        if !path.exists() {
            return Err(ReportError::MissingFile(path.to_path_buf()));
        }

        let mut rdr = csv::Reader::from_path(path)?;
        let rows = rdr
            .deserialize::<RecordFields>()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let count = rows.len();
        for fields in rows {
            let fields = self.complete(fields);
            self.records.add(fields);
        }
        info!(path = %path.display(), rows = count, "loaded records");
        Ok(count)
    }

    pub fn build_report(&self) -> Result<Report> {
        ReportGenerator::new(&self.badges)
            .with_date_policy(self.date_policy.clone())
            .generate(self.records.as_slice(), &self.group_name, &self.leader_name)
    }

    /// Generate and write the report. Nothing is written when there are no records.
    pub fn export(&self, path: &Path) -> Result<()> {
        let report = self.build_report()?;
        docx::write(&report, path)
    }
}
