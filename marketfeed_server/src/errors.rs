use std::fmt::Display;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use marketfeed_engine::ListingApiError;
use shopify_tools::ShopifyApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Storefront authorization failed. {0}")]
    OAuthFailed(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("An upstream service failed. {0}")]
    UpstreamError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ServerError {
    pub fn backend<E: Display>(e: E) -> Self {
        Self::BackendError(e.to_string())
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::OAuthFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<ListingApiError> for ServerError {
    fn from(e: ListingApiError) -> Self {
        match e {
            ListingApiError::DatabaseError(e) => Self::BackendError(e),
            ListingApiError::NotFound(what) => Self::NoRecordFound(what),
            ListingApiError::InvalidArgument(what) => Self::InvalidRequestBody(what),
            ListingApiError::Llm(e) => Self::UpstreamError(e.to_string()),
        }
    }
}

impl From<ShopifyApiError> for ServerError {
    fn from(e: ShopifyApiError) -> Self {
        match e {
            ShopifyApiError::AuthFailed(e) => Self::OAuthFailed(e),
            other => Self::UpstreamError(other.to_string()),
        }
    }
}
