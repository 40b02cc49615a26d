pub mod error_code;

pub use error_code::ErrorCode;

use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::domain::DomainError;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("{detail}")]
    FailedPrecondition { code: ErrorCode, detail: String },
    #[error("{detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn precondition(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::FailedPrecondition {
            code,
            detail: detail.into(),
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::NotFound { code, .. } => *code,
            AppError::FailedPrecondition { code, .. } => *code,
            AppError::BadRequest { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Internal { .. } => ErrorCode::Internal,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            AppError::NotFound { detail, .. }
            | AppError::FailedPrecondition { detail, .. }
            | AppError::BadRequest { detail, .. }
            | AppError::Config { detail }
            | AppError::Internal { detail } => detail.clone(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::FailedPrecondition { .. } => StatusCode::CONFLICT,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Config { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        let detail = e.to_string();
        match e {
            DomainError::ParseCard(_) => AppError::bad_request(ErrorCode::ParseCard, detail),
            DomainError::PhaseMismatch(_) => {
                AppError::precondition(ErrorCode::PhaseMismatch, detail)
            }
            DomainError::GameFull => AppError::precondition(ErrorCode::GameFull, detail),
            DomainError::AlreadyInGame(_) => {
                AppError::precondition(ErrorCode::AlreadyInGame, detail)
            }
            DomainError::PlayerNotFound(_) => {
                AppError::precondition(ErrorCode::NotAPlayer, detail)
            }
            DomainError::OutOfTurn(_) => AppError::precondition(ErrorCode::OutOfTurn, detail),
            DomainError::CardNotInHand(_) => {
                AppError::precondition(ErrorCode::CardNotInHand, detail)
            }
            DomainError::IllegalPlay(_) => AppError::precondition(ErrorCode::IllegalPlay, detail),
            DomainError::EmptyCards | DomainError::Invariant(_) => AppError::internal(detail),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().as_str().to_string();

        let problem_details = ProblemDetails {
            type_: format!("/errors/{code}"),
            title: Self::humanize_code(&code),
            status: status.as_u16(),
            detail: self.detail(),
            code,
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .json(problem_details)
    }
}
