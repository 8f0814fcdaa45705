use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Health,
    Learning,
    Project,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Work,
        Category::Personal,
        Category::Health,
        Category::Learning,
        Category::Project,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Health => "health",
            Category::Learning => "learning",
            Category::Project => "project",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| {
                format!(
                    "Unknown category '{}' (expected one of: work, personal, health, learning, project, other)",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Pending,
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Status::ALL
            .iter()
            .find(|st| st.as_str() == normalized)
            .copied()
            .ok_or_else(|| {
                format!(
                    "Unknown status '{}' (expected one of: pending, in-progress, completed)",
                    s
                )
            })
    }
}

/// One dated entry.
///
/// `id` is assigned once and never changes; it is the only key used to decide
/// whether two records are "the same" record. Keys this struct does not know
/// about (from hand-edited or foreign import files) are kept in `extra` and
/// written back out on export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub date: NaiveDate,
    pub title: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wire names of the typed fields, in export column order.
pub const RECORD_FIELDS: [&str; 8] = [
    "id",
    "date",
    "title",
    "category",
    "description",
    "status",
    "createdAt",
    "updatedAt",
];

impl Record {
    pub fn new(id: String, draft: NewRecord, now: DateTime<Utc>) -> Self {
        Self {
            id,
            date: draft.date,
            title: draft.title,
            category: draft.category,
            description: draft.description,
            status: draft.status,
            created_at: now,
            updated_at: None,
            extra: Map::new(),
        }
    }

    /// Field names present on this record, typed fields first.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = RECORD_FIELDS
            .iter()
            .copied()
            .filter(|name| *name != "updatedAt" || self.updated_at.is_some())
            .collect();
        names.extend(self.extra.keys().map(String::as_str));
        names
    }

    /// String form of a field, as written to CSV. `None` when the record has no
    /// such field.
    pub fn field_value(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.clone()),
            "date" => Some(self.date.format("%Y-%m-%d").to_string()),
            "title" => Some(self.title.clone()),
            "category" => Some(self.category.to_string()),
            "description" => Some(self.description.clone()),
            "status" => Some(self.status.to_string()),
            "createdAt" => Some(format_timestamp(self.created_at)),
            "updatedAt" => self.updated_at.map(format_timestamp),
            other => self.extra.get(other).map(|v| match v {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                v => v.to_string(),
            }),
        }
    }
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// User-supplied fields for a new record.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub date: NaiveDate,
    pub title: String,
    pub category: Category,
    pub description: String,
    pub status: Status,
}

/// Partial update. Unset fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub status: Option<Status>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.title.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.status.is_none()
    }

    pub fn apply(&self, record: &mut Record, now: DateTime<Utc>) {
        if let Some(date) = self.date {
            record.date = date;
        }
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(category) = self.category {
            record.category = category;
        }
        if let Some(description) = &self.description {
            record.description = description.clone();
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        record.updated_at = Some(now);
    }
}
