//! Attendance rows and the source that fetches them by date.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::supabase::{ClientError, SupabaseClient};

pub const TABLE: &str = "Attendance";
pub const DATE_COLUMN: &str = "pdate";

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    /// The date string is not `YYYY-MM-DD`.
    #[error("Invalid date format")]
    InvalidDate(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

// =============================================================================
// ROWS
// =============================================================================

/// Row identifier. Tables use either a serial integer or a text/uuid key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// Presence value as stored; any JSON scalar. Displays strings bare and
/// `null` as nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Presence(pub serde_json::Value);

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&scalar_text(&self.0))
    }
}

/// One attendance row. Rows with a null or missing `id` still render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRow {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<RowId>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub std_name: String,
    #[serde(default)]
    pub presence: Presence,
}

fn scalar_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn scalar_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(|value| scalar_text(&value))
}

// Ids of any other JSON type are dropped rather than failing the response.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<RowId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value::<RowId>(value).ok())
}

// =============================================================================
// DATES
// =============================================================================

/// Accept exactly four digits, dash, two digits, dash, two digits.
///
/// # Errors
///
/// Returns [`AttendanceError::InvalidDate`] for any other shape.
pub fn validate_date(date: &str) -> Result<(), AttendanceError> {
    let bytes = date.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if well_formed { Ok(()) } else { Err(AttendanceError::InvalidDate(date.to_string())) }
}

/// Today's local date as `YYYY-MM-DD`, falling back to UTC when the local
/// offset cannot be determined.
#[must_use]
pub fn today() -> String {
    let now = time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc());
    format_date(now.date())
}

#[must_use]
pub fn format_date(date: time::Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

// =============================================================================
// SOURCE
// =============================================================================

/// Fetches attendance rows for a date. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AttendanceSource: Send + Sync {
    /// Return every row recorded for `date`.
    ///
    /// # Errors
    ///
    /// Returns an [`AttendanceError`] if the request fails or the response
    /// is malformed.
    async fn fetch_by_date(&self, date: &str) -> Result<Vec<AttendanceRow>, AttendanceError>;
}

#[async_trait::async_trait]
impl AttendanceSource for SupabaseClient {
    async fn fetch_by_date(&self, date: &str) -> Result<Vec<AttendanceRow>, AttendanceError> {
        let rows = self
            .from(TABLE)
            .select("*")
            .eq(DATE_COLUMN, date)
            .execute::<AttendanceRow>()
            .await?;
        tracing::info!(table = TABLE, date, rows = rows.len(), "attendance loaded");
        Ok(rows)
    }
}

#[cfg(test)]
#[path = "attendance_test.rs"]
mod tests;
