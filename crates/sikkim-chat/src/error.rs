//! Error types for the conversation engine.

use sikkim_core::SikkimError;

/// Errors from the chat engine.
///
/// `UnknownLanguage` and `EmptySubmission` are expected outcomes of user
/// input: the session is left untouched and callers are free to ignore them.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
    #[error("message cannot be empty")]
    EmptySubmission,
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    #[error("catalog load error: {0}")]
    CatalogLoad(String),
    #[error("session unavailable: {0}")]
    SessionUnavailable(String),
}

impl ChatError {
    /// Whether this error is a silently ignorable user-input outcome.
    pub fn is_ignorable(&self) -> bool {
        matches!(self, ChatError::UnknownLanguage(_) | ChatError::EmptySubmission)
    }
}

impl From<SikkimError> for ChatError {
    fn from(err: SikkimError) -> Self {
        ChatError::CatalogLoad(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::UnknownLanguage("klingon".to_string());
        assert_eq!(err.to_string(), "unknown language: klingon");

        let err = ChatError::EmptySubmission;
        assert_eq!(err.to_string(), "message cannot be empty");

        let err = ChatError::InvalidCatalog("no languages".to_string());
        assert_eq!(err.to_string(), "invalid catalog: no languages");

        let err = ChatError::CatalogLoad("missing file".to_string());
        assert_eq!(err.to_string(), "catalog load error: missing file");

        let err = ChatError::SessionUnavailable("lock poisoned".to_string());
        assert_eq!(err.to_string(), "session unavailable: lock poisoned");
    }

    #[test]
    fn test_ignorable_errors() {
        assert!(ChatError::UnknownLanguage("x".into()).is_ignorable());
        assert!(ChatError::EmptySubmission.is_ignorable());
        assert!(!ChatError::InvalidCatalog("x".into()).is_ignorable());
        assert!(!ChatError::CatalogLoad("x".into()).is_ignorable());
        assert!(!ChatError::SessionUnavailable("x".into()).is_ignorable());
    }

    #[test]
    fn test_chat_error_from_sikkim_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "catalog.json");
        let chat_err: ChatError = SikkimError::from(io_err).into();
        assert!(matches!(chat_err, ChatError::CatalogLoad(_)));
        assert!(chat_err.to_string().contains("catalog.json"));
    }

    #[test]
    fn test_chat_error_unicode_inner_messages() {
        let err = ChatError::UnknownLanguage("हिंदी".to_string());
        assert!(err.to_string().contains("हिंदी"));
    }
}
