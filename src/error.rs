use axum::{http::StatusCode, Json};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// Literal value does not match the kind of its field
    TypeMismatch(String),
    /// Operator is not allowed for the kind of its field
    IllegalOperator(String),
    /// Compound node with a child count its logical type does not accept
    Arity(String),
    UnknownField(String),
    /// Evaluation or serialization attempted on a tree with missing parts
    IncompletePredicate(String),
    /// Row layout that cannot be turned into a tree (bad indentation)
    InvalidRows(String),
    BadRequest(String),
    Database(String),
    Configuration(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::TypeMismatch(e) => write!(f, "Type mismatch: {}", e),
            AppError::IllegalOperator(e) => write!(f, "Illegal operator: {}", e),
            AppError::Arity(e) => write!(f, "Arity error: {}", e),
            AppError::UnknownField(e) => write!(f, "Unknown field: {}", e),
            AppError::IncompletePredicate(e) => write!(f, "Incomplete predicate: {}", e),
            AppError::InvalidRows(e) => write!(f, "Invalid rows: {}", e),
            AppError::BadRequest(e) => write!(f, "Bad request: {}", e),
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::Configuration(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Short machine-readable code, also used as the `kind` of row issues
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::TypeMismatch(_) => "typeMismatch",
            AppError::IllegalOperator(_) => "illegalOperator",
            AppError::Arity(_) => "arity",
            AppError::UnknownField(_) => "unknownField",
            AppError::IncompletePredicate(_) => "incompletePredicate",
            AppError::InvalidRows(_) => "invalidRows",
            AppError::BadRequest(_) => "badRequest",
            AppError::Database(_) => "database",
            AppError::Configuration(_) => "configuration",
        }
    }

    /// True for errors a caller can fix by changing its input
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AppError::TypeMismatch(_)
                | AppError::IllegalOperator(_)
                | AppError::Arity(_)
                | AppError::UnknownField(_)
                | AppError::IncompletePredicate(_)
                | AppError::InvalidRows(_)
                | AppError::BadRequest(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::IncompletePredicate(_) => StatusCode::UNPROCESSABLE_ENTITY,
            e if e.is_input_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Conversion to an HTTP response
    pub fn to_response(&self) -> (StatusCode, Json<serde_json::Value>) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        (
            status,
            Json(json!({
                "error": self.to_string(),
                "kind": self.kind(),
                "status": status.as_u16().to_string(),
            })),
        )
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        self.to_response().into_response()
    }
}
