//! CSV export and import.
//!
//! Export writes one column per field name seen across all records (first-seen
//! order) plus a trailing `exportedAt` column stamped with the export time.
//! Every value is quoted, inner quotes are doubled, rows end in CRLF with no
//! trailing line break.
//!
//! Import reads the same shape back. `exportedAt` is dropped, an empty
//! `updatedAt` means the record was never edited, and empty extra columns are
//! treated as absent (a record only gets them because some other record had
//! them).

use super::invalid;
use crate::error::Result;
use crate::model::{format_timestamp, Record, RECORD_FIELDS};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

pub const EXPORTED_AT: &str = "exportedAt";
const ROW_SEPARATOR: &str = "\r\n";

pub fn header_for(records: &[Record]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        for name in record.field_names() {
            if !headers.iter().any(|h| h == name) {
                headers.push(name.to_string());
            }
        }
    }
    if !headers.iter().any(|h| h == EXPORTED_AT) {
        headers.push(EXPORTED_AT.to_string());
    }
    headers
}

pub fn build_csv(records: &[Record], exported_at: DateTime<Utc>) -> String {
    let headers = header_for(records);
    let stamp = format_timestamp(exported_at);

    let mut rows: Vec<String> = Vec::with_capacity(records.len() + 1);
    rows.push(
        headers
            .iter()
            .map(|h| quote(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    for record in records {
        let row = headers
            .iter()
            .map(|h| {
                if h == EXPORTED_AT {
                    quote(&stamp)
                } else {
                    quote(&record.field_value(h).unwrap_or_default())
                }
            })
            .collect::<Vec<_>>()
            .join(",");
        rows.push(row);
    }
    rows.join(ROW_SEPARATOR)
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn parse_records(content: &str) -> Result<Vec<Record>> {
    let mut rows = split_rows(content)?.into_iter();
    let Some(headers) = rows.next() else {
        return Ok(Vec::new());
    };

    let mut records = Vec::new();
    for (i, row) in rows.enumerate() {
        let line = i + 2;
        if row.len() == 1 && row[0].is_empty() {
            continue;
        }
        if row.len() != headers.len() {
            return Err(invalid(format!(
                "row {}: expected {} columns, found {}",
                line,
                headers.len(),
                row.len()
            )));
        }

        let mut fields = Map::new();
        for (name, value) in headers.iter().zip(row) {
            let typed = RECORD_FIELDS.contains(&name.as_str());
            let keep = match name.as_str() {
                EXPORTED_AT => false,
                "updatedAt" => !value.is_empty(),
                _ => typed || !value.is_empty(),
            };
            if keep {
                fields.insert(name.clone(), Value::String(value));
            }
        }

        let record = serde_json::from_value::<Record>(Value::Object(fields))
            .map_err(|e| invalid(format!("row {}: {}", line, e)))?;
        records.push(record);
    }
    Ok(records)
}

/// Splits CSV text into rows of unquoted field values. Accepts CRLF or LF
/// line endings and quoted fields spanning lines.
fn split_rows(content: &str) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                other => field.push(other),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            other => field.push(other),
        }
    }

    if in_quotes {
        return Err(invalid("unterminated quoted field"));
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DaybookError;
    use crate::model::{Category, NewRecord, Status};
    use chrono::{NaiveDate, TimeZone};

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
    }

    fn record(id: &str, title: &str) -> Record {
        Record::new(
            id.into(),
            NewRecord {
                date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
                title: title.into(),
                category: Category::Learning,
                description: "line one\nline \"two\", with comma".into(),
                status: Status::InProgress,
            },
            Utc.with_ymd_and_hms(2024, 6, 30, 18, 45, 12).unwrap()
                + chrono::Duration::milliseconds(250),
        )
    }

    #[test]
    fn header_is_union_plus_exported_at() {
        let mut edited = record("2", "b");
        edited.updated_at = Some(stamp());
        edited
            .extra
            .insert("mood".into(), Value::String("ok".into()));
        let headers = header_for(&[record("1", "a"), edited]);
        assert_eq!(
            headers,
            vec![
                "id",
                "date",
                "title",
                "category",
                "description",
                "status",
                "createdAt",
                "updatedAt",
                "mood",
                "exportedAt"
            ]
        );
    }

    #[test]
    fn quotes_every_value_and_uses_crlf() {
        let csv = build_csv(&[record("1", "say \"hi\"")], stamp());
        let mut lines = csv.split("\r\n");
        assert_eq!(
            lines.next().unwrap(),
            r#""id","date","title","category","description","status","createdAt","exportedAt""#
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with(r#""1","2024-06-30","say ""hi""","learning","#));
        assert!(row.ends_with(r#""2024-07-01T12:00:00Z""#));
        assert!(!csv.ends_with("\r\n"));
    }

    #[test]
    fn missing_fields_export_as_empty() {
        let mut edited = record("2", "b");
        edited.updated_at = Some(stamp());
        let csv = build_csv(&[record("1", "a"), edited], stamp());
        let first_row = csv.split("\r\n").nth(1).unwrap();
        // updatedAt column is present but empty for the unedited record
        assert!(first_row.contains(r#""2024-06-30T18:45:12.250Z","","2024-07-01T12:00:00Z""#));
    }

    #[test]
    fn export_then_import_reproduces_records() {
        let mut edited = record("2", "with, comma");
        edited.updated_at = Some(stamp());
        edited
            .extra
            .insert("mood".into(), Value::String("tired".into()));
        let records = vec![record("1", "plain"), edited];

        let parsed = parse_records(&build_csv(&records, stamp())).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn parses_lf_and_unquoted_fields() {
        let raw = "id,date,title,category,description,status,createdAt\n\
                   7,2024-01-01,Walk,health,,pending,2024-01-01T10:00:00Z\n";
        let parsed = parse_records(raw).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "7");
        assert_eq!(parsed[0].description, "");
        assert_eq!(parsed[0].updated_at, None);
    }

    #[test]
    fn rejects_ragged_rows() {
        let raw = "\"id\",\"title\"\r\n\"1\"";
        assert!(matches!(parse_records(raw), Err(DaybookError::InvalidImport(_))));
    }

    #[test]
    fn rejects_unterminated_quote() {
        assert!(matches!(
            parse_records("\"id\",\"title\"\r\n\"1,2"),
            Err(DaybookError::InvalidImport(_))
        ));
    }

    #[test]
    fn header_only_yields_nothing() {
        assert!(parse_records("\"id\",\"exportedAt\"").unwrap().is_empty());
        assert!(parse_records("").unwrap().is_empty());
    }
}
