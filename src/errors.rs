// src/errors.rs
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum BreedSenseError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Stale response for ticket {ticket} discarded")]
    StaleResponse { ticket: u64 },

    #[error("A request is already in flight for this page")]
    Busy,

    #[error("Page session not found: {0}")]
    PageNotFound(Uuid),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Geolocation error: {0}")]
    Geolocation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResponseError for BreedSenseError {
    fn error_response(&self) -> HttpResponse {
        match self {
            BreedSenseError::InvalidInput(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "Invalid input",
                    "message": self.to_string()
                }))
            }
            BreedSenseError::Upload(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Upload error",
                "message": self.to_string()
            })),
            BreedSenseError::Busy => HttpResponse::Conflict().json(serde_json::json!({
                "error": "Busy",
                "message": self.to_string()
            })),
            BreedSenseError::PageNotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
                "error": "Page not found",
                "message": self.to_string()
            })),
            BreedSenseError::Geolocation(_) => {
                HttpResponse::ServiceUnavailable().json(serde_json::json!({
                    "error": "Location service error",
                    "message": self.to_string()
                }))
            }
            BreedSenseError::UnsupportedLanguage(_)
            | BreedSenseError::StaleResponse { .. }
            | BreedSenseError::Config(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal error",
                    "message": self.to_string()
                }))
            }
        }
    }
}
