//! Error types for the HCB API client.
//!
//! Failures fall into two families. Misuse errors (acting on a detached
//! entity, a missing association, bad input) are raised locally before any
//! request is sent. Server-reported errors are decoded from the response into
//! [`Error::Api`] or [`Error::Authentication`] with a flat [`ApiErrorKind`] /
//! [`AuthErrorKind`] discriminator.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for HCB operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of a server-reported API failure.
///
/// The first eight kinds are derived from the HTTP status. The last two are
/// semantic refinements selected by the `error` code in the response body,
/// which take precedence over the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 422
    UnprocessableEntity,
    /// 429
    RateLimit,
    /// 5xx
    Server,
    /// Any other non-success status
    Generic,
    /// Body error code `invalid_operation`
    InvalidOperation,
    /// Body error code `invalid_user`
    InvalidUser,
}

impl ApiErrorKind {
    /// Provisional kind for an HTTP status, before any body override.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ApiErrorKind::BadRequest,
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            422 => ApiErrorKind::UnprocessableEntity,
            429 => ApiErrorKind::RateLimit,
            500..=599 => ApiErrorKind::Server,
            _ => ApiErrorKind::Generic,
        }
    }

    /// Semantic kind selected by a machine error code, if it is one we refine.
    pub fn from_error_code(code: &str) -> Option<Self> {
        match code {
            "invalid_operation" => Some(ApiErrorKind::InvalidOperation),
            "invalid_user" => Some(ApiErrorKind::InvalidUser),
            _ => None,
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiErrorKind::BadRequest => "bad request",
            ApiErrorKind::Unauthorized => "unauthorized",
            ApiErrorKind::Forbidden => "forbidden",
            ApiErrorKind::NotFound => "not found",
            ApiErrorKind::UnprocessableEntity => "unprocessable entity",
            ApiErrorKind::RateLimit => "rate limited",
            ApiErrorKind::Server => "server error",
            ApiErrorKind::Generic => "API error",
            ApiErrorKind::InvalidOperation => "invalid operation",
            ApiErrorKind::InvalidUser => "invalid user",
        };
        f.write_str(name)
    }
}

/// Kind of an authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    /// The access token expired and could not be refreshed
    TokenExpired,
    /// The refresh token was revoked or is otherwise invalid
    TokenRevoked,
    /// The token does not carry the requested scope
    InvalidScope,
}

impl AuthErrorKind {
    /// Map an OAuth token-endpoint error code to a kind.
    pub fn from_oauth_code(code: Option<&str>) -> Self {
        match code {
            Some("invalid_scope") => AuthErrorKind::InvalidScope,
            Some("invalid_grant") => AuthErrorKind::TokenRevoked,
            _ => AuthErrorKind::TokenExpired,
        }
    }
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthErrorKind::TokenExpired => "token expired",
            AuthErrorKind::TokenRevoked => "token revoked",
            AuthErrorKind::InvalidScope => "invalid scope",
        };
        f.write_str(name)
    }
}

/// The main error type for all HCB API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// The API returned a non-success response
    #[error("{kind} (status={status}, code={code:?}): {message}")]
    Api {
        /// Kind derived from the status and the body error code
        kind: ApiErrorKind,
        /// HTTP status code
        status: u16,
        /// Machine error code from the body, if any
        code: Option<String>,
        /// First server message, or a fallback
        message: String,
        /// Every message the server returned
        messages: Vec<String>,
    },

    /// The OAuth token could not be used or refreshed
    #[error("Authentication failed ({kind}): {message}")]
    Authentication {
        /// Kind of authentication failure
        kind: AuthErrorKind,
        /// Human-readable message
        message: String,
        /// Every message the token endpoint returned
        messages: Vec<String>,
    },

    /// An action was invoked on an entity with no client attached
    #[error("No client attached to this {entity}")]
    DetachedEntity {
        /// Entity type name
        entity: &'static str,
    },

    /// An action needs an association the entity does not carry
    #[error("No {field} on this {entity}")]
    MissingAssociation {
        /// Entity type name
        entity: &'static str,
        /// Missing field
        field: &'static str,
    },

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build an API error from a non-success status and its decoded body.
    ///
    /// The body is expected to look like
    /// `{"error": "<code>", "messages": ["..."]}`; anything else degrades to
    /// an empty message list and a fallback message.
    pub(crate) fn from_api_response(status: u16, body: Value) -> Self {
        let code = body
            .get("error")
            .and_then(Value::as_str)
            .map(String::from);
        let messages = messages_from_body(&body);

        let kind = code
            .as_deref()
            .and_then(ApiErrorKind::from_error_code)
            .unwrap_or_else(|| ApiErrorKind::from_status(status));

        let message = messages
            .first()
            .cloned()
            .or_else(|| code.clone())
            .unwrap_or_else(|| "API error".to_string());

        Error::Api {
            kind,
            status,
            code,
            message,
            messages,
        }
    }

    /// Build an authentication error from a failed token-endpoint response.
    pub(crate) fn from_oauth_response(status: u16, body: Value) -> Self {
        let code = body.get("error").and_then(Value::as_str);
        let mut messages = messages_from_body(&body);
        if let Some(description) = body.get("error_description").and_then(Value::as_str) {
            messages.push(description.to_string());
        }

        let message = messages
            .first()
            .cloned()
            .or_else(|| code.map(String::from))
            .unwrap_or_else(|| format!("Token refresh failed ({})", status));

        Error::Authentication {
            kind: AuthErrorKind::from_oauth_code(code),
            message,
            messages,
        }
    }

    /// The API error kind, if this is a server-reported API error.
    pub fn kind(&self) -> Option<ApiErrorKind> {
        match self {
            Error::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The authentication error kind, if this is an authentication error.
    pub fn auth_kind(&self) -> Option<AuthErrorKind> {
        match self {
            Error::Authentication { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Machine error code of an API error.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Error::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Server messages carried by this error (empty for local errors).
    pub fn messages(&self) -> &[String] {
        match self {
            Error::Api { messages, .. } | Error::Authentication { messages, .. } => messages,
            _ => &[],
        }
    }

    /// Returns `true` for a 404 without a semantic override.
    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(ApiErrorKind::NotFound)
    }

    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Error::Authentication { .. }
                | Error::Api {
                    kind: ApiErrorKind::Unauthorized,
                    ..
                }
        )
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (4xx response or local misuse).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => (400..500).contains(status),
            _ => self.is_misuse(),
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` for errors raised locally before any request was sent.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            Error::DetachedEntity { .. }
                | Error::MissingAssociation { .. }
                | Error::InvalidInput(_)
                | Error::Config(_)
        )
    }
}

fn messages_from_body(body: &Value) -> Vec<String> {
    match body.get("messages") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|m| m.as_str().map(String::from))
            .collect(),
        Some(Value::String(message)) => vec![message.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiErrorKind::from_status(400), ApiErrorKind::BadRequest);
        assert_eq!(ApiErrorKind::from_status(401), ApiErrorKind::Unauthorized);
        assert_eq!(ApiErrorKind::from_status(403), ApiErrorKind::Forbidden);
        assert_eq!(ApiErrorKind::from_status(404), ApiErrorKind::NotFound);
        assert_eq!(ApiErrorKind::from_status(422), ApiErrorKind::UnprocessableEntity);
        assert_eq!(ApiErrorKind::from_status(429), ApiErrorKind::RateLimit);
        assert_eq!(ApiErrorKind::from_status(502), ApiErrorKind::Server);
        assert_eq!(ApiErrorKind::from_status(418), ApiErrorKind::Generic);
    }

    #[test]
    fn test_invalid_operation_overrides_bad_request() {
        let err = Error::from_api_response(
            400,
            json!({ "error": "invalid_operation", "messages": ["Cannot cancel"] }),
        );
        assert_eq!(err.kind(), Some(ApiErrorKind::InvalidOperation));
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.error_code(), Some("invalid_operation"));
        assert_eq!(err.to_string(), "invalid operation (status=400, code=Some(\"invalid_operation\")): Cannot cancel");
    }

    #[test]
    fn test_invalid_user_overrides_any_status() {
        let err = Error::from_api_response(404, json!({ "error": "invalid_user" }));
        assert_eq!(err.kind(), Some(ApiErrorKind::InvalidUser));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_plain_not_found() {
        let err = Error::from_api_response(
            404,
            json!({ "error": "not_found", "messages": ["Event not found"] }),
        );
        assert!(err.is_not_found());
        match err {
            Error::Api {
                message, messages, ..
            } => {
                assert_eq!(message, "Event not found");
                assert_eq!(messages, vec!["Event not found".to_string()]);
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_messages_decodes_to_empty_list() {
        let err = Error::from_api_response(500, json!({ "error": "boom" }));
        assert!(err.messages().is_empty());
        assert!(err.is_server_error());
        match err {
            Error::Api { message, .. } => assert_eq!(message, "boom"),
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_fallback_message_for_empty_body() {
        let err = Error::from_api_response(418, Value::Null);
        assert_eq!(err.kind(), Some(ApiErrorKind::Generic));
        assert_eq!(err.error_code(), None);
        match err {
            Error::Api { message, .. } => assert_eq!(message, "API error"),
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_oauth_error_mapping() {
        let revoked = Error::from_oauth_response(400, json!({ "error": "invalid_grant" }));
        assert_eq!(revoked.auth_kind(), Some(AuthErrorKind::TokenRevoked));
        assert!(revoked.is_auth_error());

        let scope = Error::from_oauth_response(
            400,
            json!({ "error": "invalid_scope", "error_description": "scope denied" }),
        );
        assert_eq!(scope.auth_kind(), Some(AuthErrorKind::InvalidScope));
        assert_eq!(scope.messages(), ["scope denied".to_string()]);

        let other = Error::from_oauth_response(500, Value::Null);
        assert_eq!(other.auth_kind(), Some(AuthErrorKind::TokenExpired));
    }

    #[test]
    fn test_misuse_classification() {
        let err = Error::DetachedEntity { entity: "CardGrant" };
        assert!(err.is_misuse());
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "No client attached to this CardGrant");

        let err = Error::MissingAssociation {
            entity: "Transfer",
            field: "transaction_id",
        };
        assert_eq!(err.to_string(), "No transaction_id on this Transfer");
    }
}
