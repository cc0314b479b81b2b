//! Student reference dataset
//!
//! A read-only table of per-student activity rows loaded once from CSV. Rows
//! are keyed by an identifier column discovered from the header.

use crate::error::InsightError;
use crate::types::{RawFieldMap, RawValue};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

/// Identifier column candidates, highest priority first
pub const ID_COLUMN_CANDIDATES: &[&str] = &[
    "student_name",
    "display_name",
    "name",
    "full_name",
    "nama",
    "username",
    "user_name",
    "learner_name",
    "user_id",
    "id",
];

/// One dataset row
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    /// Value of the identifier column
    pub id: String,
    /// Column name and raw cell value, in header order
    pub cells: Vec<(String, String)>,
}

impl StudentRecord {
    /// Raw cell value for a column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// All cells as raw field values, ready for feature building
    pub fn to_field_map(&self) -> RawFieldMap {
        self.cells
            .iter()
            .map(|(name, value)| {
                let raw = if value.trim().is_empty() {
                    RawValue::Missing
                } else {
                    RawValue::Text(value.clone())
                };
                (name.clone(), raw)
            })
            .collect()
    }
}

/// Student dataset with a discovered identifier column
#[derive(Debug, Clone)]
pub struct StudentDataset {
    columns: Vec<String>,
    id_column: String,
    records: Vec<StudentRecord>,
}

impl StudentDataset {
    /// Load a dataset from a CSV file
    pub fn from_path(path: &Path) -> Result<Self, InsightError> {
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| InsightError::Dataset(format!("{}: {}", path.display(), e)))?;
        let dataset = Self::from_csv_reader(reader)?;
        log::info!(
            "Loaded {} student rows from {} (id column: {})",
            dataset.len(),
            path.display(),
            dataset.id_column
        );
        Ok(dataset)
    }

    /// Load a dataset from any CSV source
    pub fn from_reader<R: Read>(source: R) -> Result<Self, InsightError> {
        Self::from_csv_reader(csv::ReaderBuilder::new().flexible(true).from_reader(source))
    }

    /// Rows may be shorter or longer than the header: missing cells read as
    /// empty, extra cells are dropped. Column names are kept verbatim.
    fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, InsightError> {
        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| InsightError::Dataset(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let id_column = discover_id_column(&columns)
            .ok_or_else(|| InsightError::Dataset("dataset has no columns".to_string()))?;
        let id_index = columns.iter().position(|c| *c == id_column).unwrap_or(0);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| InsightError::Dataset(e.to_string()))?;
            let cells: Vec<(String, String)> = columns
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), row.get(i).unwrap_or_default().to_string()))
                .collect();
            let id = row.get(id_index).unwrap_or_default().to_string();
            records.push(StudentRecord { id, cells });
        }

        Ok(Self {
            columns,
            id_column,
            records,
        })
    }

    /// Column names in header order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Name of the identifier column
    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted, de-duplicated student identifiers
    pub fn students(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The last row for a student
    pub fn latest(&self, id: &str) -> Option<&StudentRecord> {
        self.records.iter().rev().find(|r| r.id == id)
    }
}

/// Pick the identifier column: first known candidate present, else the first column
pub fn discover_id_column(columns: &[String]) -> Option<String> {
    ID_COLUMN_CANDIDATES
        .iter()
        .find(|candidate| columns.iter().any(|c| c == *candidate))
        .map(|c| c.to_string())
        .or_else(|| columns.first().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_CSV: &str = "\
user_id,name,email,avg_exam_score,total_completed_modules
7,Budi,budi@example.com,\"88,5\",15
3,Ana,ana@example.com,91.0,20
7,Budi,budi@example.com,90.0,16
";

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_id_column_priority() {
        assert_eq!(
            discover_id_column(&columns(&["user_id", "name", "username"])),
            Some("name".to_string())
        );
        assert_eq!(
            discover_id_column(&columns(&["score", "student_name", "id"])),
            Some("student_name".to_string())
        );
        assert_eq!(
            discover_id_column(&columns(&["learner", "score"])),
            Some("learner".to_string())
        );
        assert_eq!(discover_id_column(&[]), None);
    }

    #[test]
    fn test_students_sorted_unique() {
        let dataset = StudentDataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(dataset.id_column(), "name");
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.students(), vec!["Ana".to_string(), "Budi".to_string()]);
    }

    #[test]
    fn test_latest_returns_last_row() {
        let dataset = StudentDataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let budi = dataset.latest("Budi").unwrap();
        assert_eq!(budi.get("avg_exam_score"), Some("90.0"));
        assert_eq!(budi.get("total_completed_modules"), Some("16"));
        assert!(dataset.latest("Nobody").is_none());
    }

    #[test]
    fn test_record_to_field_map() {
        let dataset = StudentDataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let record = &dataset.records[0];
        let map = record.to_field_map();
        assert_eq!(map["avg_exam_score"], RawValue::Text("88,5".to_string()));
        assert_eq!(map["total_completed_modules"], RawValue::Text("15".to_string()));
    }

    #[test]
    fn test_empty_cells_are_missing() {
        let dataset =
            StudentDataset::from_reader("name,avg_exam_score\nCici,\n".as_bytes()).unwrap();
        let map = dataset.latest("Cici").unwrap().to_field_map();
        assert_eq!(map["avg_exam_score"], RawValue::Missing);
    }

    #[test]
    fn test_short_row_keeps_dataset() {
        let csv = "name,avg_exam_score,total_submissions\nAna,90,3\nBudi,80\n";
        let dataset = StudentDataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.students(), vec!["Ana".to_string(), "Budi".to_string()]);

        let budi = dataset.latest("Budi").unwrap();
        assert_eq!(budi.get("avg_exam_score"), Some("80"));
        assert_eq!(budi.get("total_submissions"), Some(""));
        assert_eq!(budi.to_field_map()["total_submissions"], RawValue::Missing);
    }

    #[test]
    fn test_long_row_drops_extra_cells() {
        let csv = "name,avg_exam_score\nAna,90,unexpected\n";
        let dataset = StudentDataset::from_reader(csv.as_bytes()).unwrap();
        let ana = dataset.latest("Ana").unwrap();
        assert_eq!(ana.cells.len(), 2);
        assert_eq!(ana.get("avg_exam_score"), Some("90"));
    }

    #[test]
    fn test_column_names_are_verbatim() {
        let csv = "name, email,avg_exam_score\nAna,ana@example.com,90\n";
        let dataset = StudentDataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.columns(), &columns(&["name", " email", "avg_exam_score"])[..]);

        let ana = dataset.latest("Ana").unwrap();
        assert_eq!(ana.get(" email"), Some("ana@example.com"));
        assert_eq!(ana.get("email"), None);
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CSV.as_bytes()).unwrap();
        let dataset = StudentDataset::from_path(file.path()).unwrap();
        assert_eq!(
            dataset.columns(),
            &columns(&["user_id", "name", "email", "avg_exam_score", "total_completed_modules"])[..]
        );
    }

    #[test]
    fn test_missing_file_is_dataset_error() {
        let err = StudentDataset::from_path(Path::new("/nonexistent/df.csv")).unwrap_err();
        assert!(matches!(err, InsightError::Dataset(_)));
    }
}
