use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

use crate::constants::DEFAULT_HISTORY_LIMIT;
use crate::models::refined::RefinedPrompt;

/// Lifecycle status of a submission record.
///
/// A record is created in `processing` and moves exactly once to one of the
/// terminal states (`completed`, `failed`, `rejected`). `pending` is part of
/// the persisted taxonomy for a future queued submission mode; the current
/// pipeline never produces it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "submission_status", rename_all = "lowercase")
)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Rejected,
}

impl SubmissionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionStatus::Completed | SubmissionStatus::Failed | SubmissionStatus::Rejected
        )
    }
}

impl Display for SubmissionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SubmissionStatus::Pending => write!(f, "pending"),
            SubmissionStatus::Processing => write!(f, "processing"),
            SubmissionStatus::Completed => write!(f, "completed"),
            SubmissionStatus::Failed => write!(f, "failed"),
            SubmissionStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for SubmissionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SubmissionStatus::Pending),
            "processing" => Ok(SubmissionStatus::Processing),
            "completed" => Ok(SubmissionStatus::Completed),
            "failed" => Ok(SubmissionStatus::Failed),
            "rejected" => Ok(SubmissionStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid submission status: {}", s)),
        }
    }
}

/// Declared classification of a submission's input, derived before the
/// gateway call with precedence mixed > image > document > text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "input_type", rename_all = "lowercase")
)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    Text,
    Image,
    Document,
    Mixed,
}

impl Display for InputType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            InputType::Text => write!(f, "text"),
            InputType::Image => write!(f, "image"),
            InputType::Document => write!(f, "document"),
            InputType::Mixed => write!(f, "mixed"),
        }
    }
}

impl FromStr for InputType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(InputType::Text),
            "image" => Ok(InputType::Image),
            "document" => Ok(InputType::Document),
            "mixed" => Ok(InputType::Mixed),
            _ => Err(anyhow::anyhow!("Invalid input type: {}", s)),
        }
    }
}

/// The persisted (url, name, content type) triplet of an uploaded file.
/// The file handle itself never outlives the submit request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredFile {
    pub url: String,
    pub name: String,
    pub content_type: String,
}

/// One refinement request and its outcome record.
///
/// Invariants: `refined_prompt` is present iff `status` is completed;
/// the three file arrays always have equal lengths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub title: Option<String>,
    pub status: SubmissionStatus,
    pub input_type: InputType,
    pub raw_text: Option<String>,
    pub file_urls: Vec<String>,
    pub file_names: Vec<String>,
    pub file_types: Vec<String>,
    pub refined_prompt: Option<RefinedPrompt>,
    pub completeness_score: Option<i32>,
    pub validation_passed: bool,
    pub validation_errors: Vec<String>,
    pub processing_time_ms: Option<i64>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "sqlx")]
impl sqlx::FromRow<'_, sqlx::postgres::PgRow> for Submission {
    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        let refined_prompt = row
            .get::<Option<serde_json::Value>, _>("refined_prompt")
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| {
                sqlx::Error::Decode(format!("Failed to parse refined_prompt: {}", e).into())
            })?;
        Ok(Submission {
            id: row.get("id"),
            title: row.get("title"),
            status: row.get("status"),
            input_type: row.get("input_type"),
            raw_text: row.get("raw_text"),
            file_urls: row.get("file_urls"),
            file_names: row.get("file_names"),
            file_types: row.get("file_types"),
            refined_prompt,
            completeness_score: row.get("completeness_score"),
            validation_passed: row.get::<Option<bool>, _>("validation_passed").unwrap_or(false),
            validation_errors: row
                .get::<Option<Vec<String>>, _>("validation_errors")
                .unwrap_or_default(),
            processing_time_ms: row.get("processing_time_ms"),
            error_message: row.get("error_message"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

impl Submission {
    /// Zip the parallel file arrays back into triplets.
    pub fn files(&self) -> Vec<StoredFile> {
        self.file_urls
            .iter()
            .zip(self.file_names.iter())
            .zip(self.file_types.iter())
            .map(|((url, name), content_type)| StoredFile {
                url: url.clone(),
                name: name.clone(),
                content_type: content_type.clone(),
            })
            .collect()
    }

    /// The `refined_prompt`-iff-`completed` invariant.
    pub fn is_consistent(&self) -> bool {
        self.refined_prompt.is_some() == (self.status == SubmissionStatus::Completed)
            && self.file_urls.len() == self.file_names.len()
            && self.file_names.len() == self.file_types.len()
    }
}

/// Filters for the history query. Results are always ordered newest-first.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionListQuery {
    pub status: Option<SubmissionStatus>,
    pub input_type: Option<InputType>,
    /// Case-insensitive substring match over title and raw text.
    pub search: Option<String>,
    pub limit: Option<i64>,
}

impl Default for SubmissionListQuery {
    fn default() -> Self {
        Self {
            status: None,
            input_type: None,
            search: None,
            limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

/// Per-status record counts for the history view.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SubmissionStats {
    pub total: i64,
    pub pending: i64,
    pub processing: i64,
    pub completed: i64,
    pub failed: i64,
    pub rejected: i64,
}
