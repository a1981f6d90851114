//! Error taxonomy shared by backends, translations and actions.

use thiserror::Error as ThisError;

/// Message carried by [`Error::NotFound`].
pub const NOT_FOUND: &str = "not found";

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, ThisError)]
pub enum Error {
    /// Stable sentinel returned by reads when the object does not exist.
    #[error("not found")]
    NotFound,
    /// Raw failure reported by the Kubernetes API.
    #[error(transparent)]
    Kube(#[from] kube::Error),
    #[error(transparent)]
    Translate(#[from] TranslateError),
    /// A `data_handler` callback aborted the action.
    #[error(transparent)]
    Handler(anyhow::Error),
    #[error("context canceled")]
    Cancelled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
    #[error("native object json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("object is missing metadata.name")]
    MissingName,
}

impl Error {
    /// Whether this error means the requested object does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound => true,
            Error::Kube(kube::Error::Api(ae)) => ae.code == 404,
            _ => false,
        }
    }
}

/// Collapse backend specific not-found failures into [`Error::NotFound`].
/// Every other error is returned unchanged.
pub fn format(err: Error) -> Error {
    if err.is_not_found() {
        return Error::NotFound;
    }
    err
}

/// Failure converting between a simplified value and its native object.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum TranslateError {
    #[error("invalid value {value:?} for {field}")]
    InvalidValue { field: &'static str, value: String },
    #[error("unsupported {field} {value:?}")]
    Unsupported { field: &'static str, value: String },
}

impl TranslateError {
    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue { field, value: value.into() }
    }

    pub fn unsupported(field: &'static str, value: impl Into<String>) -> Self {
        Self::Unsupported { field, value: value.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16, reason: &str) -> Error {
        Error::Kube(kube::Error::Api(ErrorResponse {
            status: "Failure".into(),
            message: format!("{reason} happened"),
            reason: reason.into(),
            code,
        }))
    }

    #[test]
    fn not_found_is_normalized() {
        let err = format(api_error(404, "NotFound"));
        assert!(matches!(err, Error::NotFound));
        assert_eq!(err.to_string(), NOT_FOUND);
    }

    #[test]
    fn other_api_errors_pass_through() {
        let err = format(api_error(409, "AlreadyExists"));
        match err {
            Error::Kube(kube::Error::Api(ae)) => assert_eq!(ae.code, 409),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn context_errors_are_not_not_found() {
        assert!(matches!(format(Error::DeadlineExceeded), Error::DeadlineExceeded));
        assert!(matches!(format(Error::Cancelled), Error::Cancelled));
    }

    #[test]
    fn handler_errors_keep_their_message() {
        let err = Error::Handler(anyhow::anyhow!("test error"));
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn json_errors_have_neutral_message() {
        let decode: Error = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert!(decode.to_string().starts_with("native object json: "));
    }

    #[test]
    fn translate_error_messages() {
        let err: Error = TranslateError::invalid("restartPolicy", "Sometimes").into();
        assert_eq!(err.to_string(), "invalid value \"Sometimes\" for restartPolicy");
    }
}
