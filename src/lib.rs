// Badge Report - Core Library
// Lookup tables, record list and report generation, shared by the TUI and the CLI

pub mod error;
pub mod table;
pub mod romanize;
pub mod names;
pub mod badges;
pub mod dates;
pub mod records;
pub mod report;
pub mod docx;
pub mod config;
pub mod session;

// Re-export commonly used types
pub use error::{LoadOutcome, ReportError, Result};
pub use romanize::{PinyinRomanizer, Romanizer};
pub use names::{LookupEntry, NameLookupStore};
pub use badges::BadgeTranslationStore;
pub use dates::{closing_date_line, normalize_approval_date, parse_approval_date, parse_compact_date};
pub use records::{Record, RecordFields, RecordList, GRADE_CHOICES, LEVEL_CHOICES};
pub use report::{DatePolicy, Report, ReportGenerator};
pub use config::AppConfig;
pub use session::Session;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
