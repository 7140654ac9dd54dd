use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ethers::contract::ContractError;
use ethers::providers::{Middleware, ProviderError};
use serde::Serialize;
use thiserror::Error;

use crate::constants::NOTICE_UPGRADE_NOT_READY;

/// Failure reported by the wallet or the chain for a submitted upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_message: Option<String>,
    pub message: String,
}

impl TxFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            short_message: None,
            message: message.into(),
        }
    }

    pub fn with_short(short_message: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            short_message: Some(short_message.into()),
            message: message.into(),
        }
    }

    /// Message shown to the user, short form first.
    pub fn display_message(&self) -> &str {
        self.short_message
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.message)
    }
}

impl<M: Middleware> From<ContractError<M>> for TxFailure {
    fn from(err: ContractError<M>) -> Self {
        let message = err.to_string();
        match err.decode_revert::<String>() {
            Some(reason) => Self::with_short(reason, message),
            None => Self::new(message),
        }
    }
}

impl From<ProviderError> for TxFailure {
    fn from(err: ProviderError) -> Self {
        Self::new(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Blockchain RPC error: {0}")]
    BlockchainRPC(String),

    #[error("Transaction failed: {}", .0.display_message())]
    Transaction(TxFailure),

    #[error("{}", NOTICE_UPGRADE_NOT_READY)]
    UpgradeNotReady,

    #[error("Upgrade already in progress")]
    UpgradeInProgress,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String, Option<serde_json::Value>) {
        match self {
            AppError::BlockchainRPC(msg) => (
                StatusCode::BAD_GATEWAY,
                "BLOCKCHAIN_RPC_ERROR",
                msg.clone(),
                None,
            ),
            AppError::Transaction(failure) => (
                StatusCode::BAD_GATEWAY,
                "TRANSACTION_FAILED",
                failure.display_message().to_string(),
                serde_json::to_value(failure).ok(),
            ),
            AppError::UpgradeNotReady => (
                StatusCode::PRECONDITION_FAILED,
                "UPGRADE_NOT_READY",
                NOTICE_UPGRADE_NOT_READY.to_string(),
                None,
            ),
            AppError::UpgradeInProgress => (
                StatusCode::CONFLICT,
                "UPGRADE_IN_PROGRESS",
                "An upgrade is already awaiting confirmation".to_string(),
                None,
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                msg.clone(),
                None,
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                self.to_string(),
                None,
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.parts();

        let body = Json(ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
