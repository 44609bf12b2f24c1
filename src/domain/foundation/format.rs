//! Negotiated response format of a request.

use super::Failure;

/// Representation a request asked for.
///
/// The responder only distinguishes JSON from everything else; the
/// navigational flag additionally decides whether the request's location is
/// worth remembering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestFormat {
    Json,

    /// Interactive page request (HTML, `*/*`, or no preference).
    #[default]
    Navigational,

    /// Some other explicit representation (CSV, PDF, ...).
    Other,
}

impl RequestFormat {
    pub fn is_json(&self) -> bool {
        matches!(self, RequestFormat::Json)
    }

    pub fn is_navigational(&self) -> bool {
        matches!(self, RequestFormat::Navigational)
    }

    /// For JSON-only handlers: anything but JSON is an unsupported format.
    pub fn require_json(&self) -> Result<(), Failure> {
        if self.is_json() {
            Ok(())
        } else {
            Err(Failure::UnsupportedFormat)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::FailureKind;

    #[test]
    fn default_is_navigational() {
        assert!(RequestFormat::default().is_navigational());
    }

    #[test]
    fn require_json_accepts_json() {
        assert!(RequestFormat::Json.require_json().is_ok());
    }

    #[test]
    fn require_json_rejects_other_formats() {
        for format in [RequestFormat::Navigational, RequestFormat::Other] {
            let err = format.require_json().unwrap_err();
            assert_eq!(err.kind(), FailureKind::UnsupportedFormat);
        }
    }
}
