use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Lifecycle of a job listing
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    InProgress,
    Closed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::InProgress => "in_progress",
            JobStatus::Closed => "closed",
        }
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(JobStatus::Open),
            "in_progress" => Ok(JobStatus::InProgress),
            "closed" => Ok(JobStatus::Closed),
            other => Err(format!(
                "Invalid status \"{}\". Allowed values: open, in_progress, closed",
                other
            )),
        }
    }
}

/// Budget as sent by clients: a JSON number or a numeric string
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Budget {
    Amount(f64),
    Text(String),
}

impl Budget {
    /// The amount as a finite number greater than zero
    pub fn amount(&self) -> Result<f64, String> {
        let value = match self {
            Budget::Amount(value) => *value,
            Budget::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("Budget \"{}\" is not a number", text))?,
        };

        if !value.is_finite() || value <= 0.0 {
            return Err("Budget must be a number greater than zero".to_string());
        }
        Ok(value)
    }
}

/// Body of `POST /jobs`
#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct CreateJob {
    #[validate(
        required(message = "Missing required fields (title, description, budget, category)"),
        length(min = 1, message = "Missing required fields (title, description, budget, category)")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "Missing required fields (title, description, budget, category)"),
        length(min = 1, message = "Missing required fields (title, description, budget, category)")
    )]
    pub description: Option<String>,

    #[validate(required(message = "Missing required fields (title, description, budget, category)"))]
    pub budget: Option<Budget>,

    #[validate(
        required(message = "Missing required fields (title, description, budget, category)"),
        length(min = 1, message = "Missing required fields (title, description, budget, category)")
    )]
    pub category: Option<String>,

    pub skills: Option<Vec<String>>,
}

/// Body of `PUT /jobs/{jobId}`. Absent fields are left unchanged.
#[derive(Deserialize, Serialize, Debug, Default, Validate)]
pub struct UpdateJob {
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "description cannot be empty"))]
    pub description: Option<String>,

    pub budget: Option<Budget>,

    #[validate(length(min = 1, message = "category cannot be empty"))]
    pub category: Option<String>,

    pub skills: Option<Vec<String>>,

    pub status: Option<JobStatus>,
}

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct NewComment {
    #[validate(
        required(message = "Comment content is required"),
        length(min = 1, message = "Comment content is required")
    )]
    pub content: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct NewReply {
    #[validate(
        required(message = "Reply content is required"),
        length(min = 1, message = "Reply content is required")
    )]
    pub content: Option<String>,
}

/// Query string of `GET /jobs`
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    /// Kept as text so an empty `userId=` is ignored like the other filters
    pub user_id: Option<String>,
}
