use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use checkout_engine::traits::CheckoutError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("No customer id was supplied with the request")]
    MissingCustomerId,
    #[error("The payment notification signature is invalid")]
    InvalidPaymentSignature,
    #[error("Checkout error. {0}")]
    CheckoutError(#[from] CheckoutError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::MissingCustomerId => StatusCode::UNAUTHORIZED,
            Self::InvalidPaymentSignature => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::CheckoutError(e) => match e {
                CheckoutError::ValidationError(_) => StatusCode::BAD_REQUEST,
                CheckoutError::PriceMismatch { .. } => StatusCode::BAD_REQUEST,
                CheckoutError::IllegalStatusChange { .. } => StatusCode::BAD_REQUEST,
                CheckoutError::ItemNotFound(_) => StatusCode::NOT_FOUND,
                CheckoutError::AddressNotFound(_) => StatusCode::NOT_FOUND,
                CheckoutError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                CheckoutError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                CheckoutError::DuplicateTrackingNumber(_) => StatusCode::INTERNAL_SERVER_ERROR,
                CheckoutError::TransactionAborted(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        // A price mismatch carries both figures so the client can resync its cart display.
        let body = match self {
            Self::CheckoutError(CheckoutError::PriceMismatch { computed, submitted }) => serde_json::json!({
                "error": self.to_string(),
                "server_total": computed.to_string(),
                "submitted_total": submitted.to_string(),
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}
