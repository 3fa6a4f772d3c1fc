//! Typed error taxonomy for update checks and downloads.
//!
//! Absence of an update is never an error: check operations return
//! `Ok(None)` both when the repository has published no releases yet
//! (HTTP 404) and when the latest release is not a genuine upgrade.
//! Nothing is retried here; retry policy belongs to the caller.

use std::fmt;

pub type Result<T> = std::result::Result<T, UpdateError>;

#[derive(Debug)]
pub enum UpdateError {
    /// Malformed or unexpected payload, unexpected status code, or a
    /// release without a usable installer asset.
    InvalidResponse(String),
    /// Transport-level failure during the metadata fetch.
    Network(reqwest::Error),
    /// Failure during asset transfer or final placement. Wraps either
    /// an [`UpdateError::InvalidResponse`] (bad download status) or an
    /// io/transport error.
    Download(anyhow::Error),
    /// The caller cancelled the operation before it completed.
    Cancelled,
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateError::InvalidResponse(msg) => {
                write!(f, "Invalid response from release registry: {}", msg)
            }
            UpdateError::Network(err) => {
                write!(f, "Network error during update check: {}", err)
            }
            UpdateError::Download(err) => {
                write!(f, "Download failed: {:#}", err)
            }
            UpdateError::Cancelled => write!(f, "Operation cancelled"),
        }
    }
}

impl std::error::Error for UpdateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UpdateError::Network(err) => Some(err),
            UpdateError::Download(err) => {
                let source: &(dyn std::error::Error + 'static) = err.as_ref();
                Some(source)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_response_display() {
        let err = UpdateError::InvalidResponse("no tag_name".to_string());
        assert!(err.to_string().contains("Invalid response"));
        assert!(err.to_string().contains("no tag_name"));
    }

    #[test]
    fn test_download_display_includes_cause() {
        let err = UpdateError::Download(anyhow::anyhow!("disk full"));
        assert!(err.to_string().contains("Download failed"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_cancelled_display() {
        assert_eq!(UpdateError::Cancelled.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_download_source_is_preserved() {
        use std::error::Error;

        let err = UpdateError::Download(anyhow::anyhow!("connection reset"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_cancelled_has_no_source() {
        use std::error::Error;

        assert!(UpdateError::Cancelled.source().is_none());
    }
}
