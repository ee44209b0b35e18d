// 📄 Report Generator - records → approval report document model
//
// Produces a plain serializable `Report`; the docx module decides how it
// looks on paper and where it goes.

use crate::badges::BadgeTranslationStore;
use crate::dates::closing_date_line;
use crate::error::{ReportError, Result};
use crate::records::Record;
use serde::{Deserialize, Serialize};

pub const TITLE: &str = "기능장 인가 보고서";

pub const HEADERS: [&str; 9] = [
    "순",
    "성명姓名",
    "영어면英文名",
    "ID",
    "현급위现级别",
    "기능장명技能章名",
    "承认日",
    "S.V 구분年级",
    "备注비  고",
];

pub const SIGN_OFF: &str = "위와 같이 기능장 취득을 인가하고 보고합니다.";
pub const SALUTATION: &str = "한국스카우트 서울북부연맹  귀하";
pub const BLANK_NAME: &str = "???";

const BADGE_COLUMN: usize = 5;

/// Where the single application date printed under the table comes from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatePolicy {
    /// Approval date of the last record in the list
    #[default]
    LastRecord,
    /// A date supplied by the caller, raw or normalized
    Fixed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub sign_off: String,
    pub date_line: String,
    pub attribution: String,
    pub salutation: String,
}

pub struct ReportGenerator<'a> {
    badges: &'a BadgeTranslationStore,
    date_policy: DatePolicy,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(badges: &'a BadgeTranslationStore) -> Self {
        ReportGenerator {
            badges,
            date_policy: DatePolicy::default(),
        }
    }

    pub fn with_date_policy(mut self, policy: DatePolicy) -> Self {
        self.date_policy = policy;
        self
    }

    pub fn generate(&self, records: &[Record], group_name: &str, leader_name: &str) -> Result<Report> {
        let last = records.last().ok_or(ReportError::EmptyInput)?;

        let rows = records
            .iter()
            .map(|record| {
                let mut cells = record.cells();
                cells[BADGE_COLUMN] = self.badges.translate(&cells[BADGE_COLUMN]).to_string();
                cells.to_vec()
            })
            .collect();

        let date_source = match &self.date_policy {
            DatePolicy::LastRecord => last.fields.approval_date.as_str(),
            DatePolicy::Fixed(date) => date.as_str(),
        };

        Ok(Report {
            title: TITLE.to_string(),
            headers: HEADERS.iter().map(|h| h.to_string()).collect(),
            rows,
            sign_off: SIGN_OFF.to_string(),
            date_line: closing_date_line(date_source),
            attribution: attribution_line(group_name, leader_name),
            salutation: SALUTATION.to_string(),
        })
    }
}

/// `제 {group} 团대(단) 대장队장 {leader} (인)` with `???` for blanks
pub fn attribution_line(group_name: &str, leader_name: &str) -> String {
    let or_blank = |s: &str| {
        let s = s.trim();
        if s.is_empty() { BLANK_NAME.to_string() } else { s.to_string() }
    };
    format!(
        "제   {}    团대(단)         대장队장    {}      (인)",
        or_blank(group_name),
        or_blank(leader_name)
    )
}
