use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Outcome of the most recent format check on a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatStatus {
    #[default]
    NotChecked,
    Valid,
    Issues,
}

/// Row of the `documents` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub committee: String,
    pub country: String,
    pub topic: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub format_status: FormatStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn null_as_default<'de, D>(deserializer: D) -> Result<FormatStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<FormatStatus>::deserialize(deserializer)?.unwrap_or_default())
}

/// Insert payload for the `documents` table.
#[derive(Debug, Clone, Serialize)]
pub struct NewDocument {
    pub user_id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub committee: String,
    pub country: String,
    pub topic: String,
    pub content: Option<String>,
    pub format_status: FormatStatus,
}

/// Partial update; only `Some` fields are sent to the store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_status: Option<FormatStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DocumentPatch {
    pub fn format_status(status: FormatStatus) -> Self {
        Self {
            format_status: Some(status),
            ..Default::default()
        }
    }

    /// True when no user-visible field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.doc_type.is_none()
            && self.committee.is_none()
            && self.country.is_none()
            && self.topic.is_none()
            && self.content.is_none()
            && self.format_status.is_none()
    }

    pub fn apply_to(&self, record: &mut DocumentRecord) {
        if let Some(v) = &self.title {
            record.title = v.clone();
        }
        if let Some(v) = &self.doc_type {
            record.doc_type = v.clone();
        }
        if let Some(v) = &self.committee {
            record.committee = v.clone();
        }
        if let Some(v) = &self.country {
            record.country = v.clone();
        }
        if let Some(v) = &self.topic {
            record.topic = v.clone();
        }
        if let Some(v) = &self.content {
            record.content = Some(v.clone());
        }
        if let Some(v) = self.format_status {
            record.format_status = v;
        }
        if let Some(v) = self.updated_at {
            record.updated_at = Some(v);
        }
    }
}

/// Optional equality filters for listing documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DocumentFilter {
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    pub committee: Option<String>,
    pub country: Option<String>,
}
