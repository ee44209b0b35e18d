// 📝 Record List - ordered rows with dense 1..N sequence numbers
//
// The sequence number is derived state: every structural change is
// followed by `renumber()`, never patched up by the caller.

use crate::dates::normalize_approval_date;
use serde::{Deserialize, Serialize};

/// Level picker choices; free text is still accepted
pub const LEVEL_CHOICES: [&str; 5] = [
    "初级(초급)",
    "二级(2급)",
    "一级(1급)",
    "星级(별급)",
    "国花(무궁화)",
];

/// Grade picker choices; free text is still accepted
pub const GRADE_CHOICES: [&str; 3] = ["小学", "初中", "高中"];

/// Everything a user types for one row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    #[serde(rename = "姓名")]
    pub name: String,
    #[serde(rename = "英文名", default)]
    pub romanized_name: String,
    #[serde(rename = "ID", default)]
    pub identifier: String,
    #[serde(rename = "现级别", default)]
    pub level: String,
    #[serde(rename = "技能章名", default)]
    pub badge_name: String,
    #[serde(rename = "承认日", default)]
    pub approval_date: String,
    #[serde(rename = "年级", default)]
    pub grade: String,
    #[serde(rename = "备注", default)]
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub sequence: u32,
    #[serde(flatten)]
    pub fields: RecordFields,
}

impl Record {
    /// Cells in preview/report column order, badge name untranslated
    pub fn cells(&self) -> [String; 9] {
        let f = &self.fields;
        [
            self.sequence.to_string(),
            f.name.clone(),
            f.romanized_name.clone(),
            f.identifier.clone(),
            f.level.clone(),
            f.badge_name.clone(),
            f.approval_date.clone(),
            f.grade.clone(),
            f.note.clone(),
        ]
    }
}

fn normalized(mut fields: RecordFields) -> RecordFields {
    fields.approval_date = normalize_approval_date(&fields.approval_date);
    fields
}

#[derive(Debug, Clone, Default)]
pub struct RecordList {
    records: Vec<Record>,
}

impl RecordList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, fields: RecordFields) -> &Record {
        let sequence = self.records.len() as u32 + 1;
        self.records.push(Record {
            sequence,
            fields: normalized(fields),
        });
        &self.records[self.records.len() - 1]
    }

    /// Replace every field except the sequence. Unknown sequence is a no-op.
    pub fn edit(&mut self, sequence: u32, fields: RecordFields) -> bool {
        match self.index_of(sequence) {
            Some(i) => {
                self.records[i].fields = normalized(fields);
                true
            }
            None => false,
        }
    }

    /// Remove a record; the caller has already confirmed with the user
    pub fn delete(&mut self, sequence: u32) -> Option<Record> {
        let i = self.index_of(sequence)?;
        let removed = self.records.remove(i);
        self.renumber();
        Some(removed)
    }

    /// Move the record at `from` so it ends up at position `to`
    pub fn move_record(&mut self, from: u32, to: u32) -> bool {
        let (Some(i), Some(j)) = (self.index_of(from), self.index_of(to)) else {
            return false;
        };
        let record = self.records.remove(i);
        self.records.insert(j, record);
        self.renumber();
        true
    }

    pub fn get(&self, sequence: u32) -> Option<&Record> {
        self.index_of(sequence).map(|i| &self.records[i])
    }

    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn index_of(&self, sequence: u32) -> Option<usize> {
        let i = (sequence as usize).checked_sub(1)?;
        (i < self.records.len()).then_some(i)
    }

    fn renumber(&mut self) {
        for (i, record) in self.records.iter_mut().enumerate() {
            record.sequence = i as u32 + 1;
        }
    }
}

impl<'a> IntoIterator for &'a RecordList {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, date: &str) -> RecordFields {
        RecordFields {
            name: name.to_string(),
            romanized_name: name.to_uppercase(),
            identifier: format!("ID-{name}"),
            level: LEVEL_CHOICES[0].to_string(),
            badge_name: "急救".to_string(),
            approval_date: date.to_string(),
            grade: GRADE_CHOICES[1].to_string(),
            note: String::new(),
        }
    }

    fn list_of(names: &[&str]) -> RecordList {
        let mut list = RecordList::new();
        for name in names {
            list.add(fields(name, ""));
        }
        list
    }

    fn sequences(list: &RecordList) -> Vec<u32> {
        list.iter().map(|r| r.sequence).collect()
    }

    fn names(list: &RecordList) -> Vec<String> {
        list.iter().map(|r| r.fields.name.clone()).collect()
    }

    #[test]
    fn test_add_assigns_sequence_and_normalizes_date() {
        let mut list = RecordList::new();
        assert_eq!(list.add(fields("a", "20240115")).sequence, 1);
        let second = list.add(fields("b", "20230229"));
        assert_eq!(second.sequence, 2);
        assert_eq!(second.fields.approval_date, "20230229");
        assert_eq!(list.get(1).unwrap().fields.approval_date, "2024-01-15");
    }

    #[test]
    fn test_edit_keeps_sequence() {
        let mut list = list_of(&["a", "b", "c"]);

        assert!(list.edit(2, fields("B", "20240301")));

        let edited = list.get(2).unwrap();
        assert_eq!(edited.sequence, 2);
        assert_eq!(edited.fields.name, "B");
        assert_eq!(edited.fields.approval_date, "2024-03-01");
        assert_eq!(names(&list), vec!["a", "B", "c"]);
    }

    #[test]
    fn test_edit_unknown_is_noop() {
        let mut list = list_of(&["a"]);
        assert!(!list.edit(0, fields("x", "")));
        assert!(!list.edit(2, fields("x", "")));
        assert_eq!(names(&list), vec!["a"]);
    }

    #[test]
    fn test_delete_any_position_keeps_sequence_dense() {
        for position in 1..=5 {
            let mut list = list_of(&["a", "b", "c", "d", "e"]);
            let removed = list.delete(position).unwrap();
            assert_eq!(removed.sequence, position);
            assert_eq!(sequences(&list), vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_delete_unknown() {
        let mut list = list_of(&["a"]);
        assert!(list.delete(0).is_none());
        assert!(list.delete(5).is_none());
        assert_eq!(list.len(), 1);
        assert!(RecordList::new().delete(1).is_none());
    }

    #[test]
    fn test_add_edit_delete_preserves_other_order() {
        let mut list = list_of(&["a", "b", "c"]);
        let seq = list.add(fields("x", "")).sequence;
        list.add(fields("d", ""));

        list.edit(seq, fields("y", ""));
        list.delete(seq);

        assert_eq!(names(&list), vec!["a", "b", "c", "d"]);
        assert_eq!(sequences(&list), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_move_record_renumbers() {
        let mut list = list_of(&["a", "b", "c", "d"]);

        assert!(list.move_record(4, 1));
        assert_eq!(names(&list), vec!["d", "a", "b", "c"]);
        assert_eq!(sequences(&list), vec![1, 2, 3, 4]);

        assert!(list.move_record(1, 3));
        assert_eq!(names(&list), vec!["a", "b", "d", "c"]);

        assert!(!list.move_record(1, 9));
    }

    #[test]
    fn test_cells_column_order() {
        let mut list = RecordList::new();
        let record = list.add(fields("a", "20240115"));
        let cells = record.cells();
        assert_eq!(cells[0], "1");
        assert_eq!(cells[1], "a");
        assert_eq!(cells[5], "急救");
        assert_eq!(cells[6], "2024-01-15");
    }
}
