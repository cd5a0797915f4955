use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::warn;

/// Failure envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
            details: None,
            stack: None,
        }
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn details(mut self, details: Option<String>) -> Self {
        self.details = details;
        self
    }

    pub fn stack(mut self, stack: Option<String>) -> Self {
        self.stack = stack;
        self
    }
}

fn bad_request(response: ErrorResponse) -> actix_web::Error {
    actix_web::error::InternalError::from_response("", HttpResponse::BadRequest().json(response)).into()
}

/// Creates a configured JsonConfig with standardized error handling for the entire project
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default()
        .error_handler(|err, req| {
            let response = match err {
                actix_web_validator::Error::Validate(validation_errors) => {
                    let mut messages: Vec<(String, String)> = validation_errors
                        .field_errors()
                        .into_iter()
                        .flat_map(|(field, errors)| {
                            errors.iter().map(move |e| {
                                let message = e
                                    .message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| format!("Validation error in field: {}", field));
                                (field.to_string(), message)
                            })
                        })
                        .collect();
                    // field_errors is a map; sort for a stable message
                    messages.sort();
                    messages.dedup_by(|a, b| a.1 == b.1);

                    let joined = messages
                        .into_iter()
                        .map(|(_, m)| m)
                        .collect::<Vec<_>>()
                        .join("; ");
                    ErrorResponse::new(joined).error("Validation failed")
                }
                actix_web_validator::Error::Deserialize(de_err) => {
                    let err_string = de_err.to_string();

                    let message = if err_string.contains("EOF while parsing") {
                        "Request body is empty. Expected JSON payload"
                    } else if err_string.contains("unknown variant") {
                        "Invalid enum value. Check allowed values for this field"
                    } else {
                        "Invalid JSON format"
                    };
                    ErrorResponse::new(message)
                        .error("Request validation failed")
                        .details(Some(err_string))
                }
                other => ErrorResponse::new("Invalid request body")
                    .error("Request validation failed")
                    .details(Some(other.to_string())),
            };

            warn!("Rejected body for {} {}: {}", req.method(), req.path(), response.message);
            bad_request(response)
        })
}

/// Path segments that fail to parse (e.g. a non-numeric job id) become a 400
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        warn!("Rejected path {}: {}", req.path(), err);
        bad_request(
            ErrorResponse::new("Invalid identifier in path")
                .error("Request validation failed")
                .details(Some(err.to_string())),
        )
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req| {
        warn!("Rejected query for {}: {}", req.path(), err);
        bad_request(
            ErrorResponse::new("Invalid query parameters")
                .error("Request validation failed")
                .details(Some(err.to_string())),
        )
    })
}
