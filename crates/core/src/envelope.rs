//! Uniform result wrapper returned by every use case

use serde::Serialize;

/// `{success, data, error}` wrapper.
///
/// The constructors are the only way to build one, which keeps the shape
/// consistent: a successful envelope never carries an error, and a failed
/// envelope carries either data or an error message but not both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEnvelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> ResultEnvelope<T> {
    /// Successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed result with a user-facing message
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Unsuccessful result that still carries data and no error
    pub fn rejected(data: T) -> Self {
        Self {
            success: false,
            data: Some(data),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Map the data payload, keeping success and error as they are
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResultEnvelope<U> {
        ResultEnvelope {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_shapes() {
        let ok = ResultEnvelope::ok(1);
        assert!(ok.is_success());
        assert_eq!(ok.data(), Some(&1));
        assert_eq!(ok.error(), None);

        let err: ResultEnvelope<i32> = ResultEnvelope::err("boom");
        assert!(!err.is_success());
        assert_eq!(err.data(), None);
        assert_eq!(err.error(), Some("boom"));

        let rejected = ResultEnvelope::rejected(false);
        assert!(!rejected.is_success());
        assert_eq!(rejected.data(), Some(&false));
        assert_eq!(rejected.error(), None);
    }

    #[test]
    fn test_envelope_serializes_nulls() {
        let err: ResultEnvelope<i32> = ResultEnvelope::err("nope");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"success": false, "data": null, "error": "nope"})
        );
    }

    #[test]
    fn test_map_preserves_error() {
        let err: ResultEnvelope<i32> = ResultEnvelope::err("nope");
        let mapped = err.map(|v| v * 2);
        assert_eq!(mapped.error(), Some("nope"));
        assert!(ResultEnvelope::ok(2).map(|v| v * 2).data() == Some(&4));
    }
}
