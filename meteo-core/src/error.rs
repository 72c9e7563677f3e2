use std::path::PathBuf;

/// Errors produced by the resolver, the aggregator and the recent-location cache.
///
/// A lookup that simply finds nothing is not an error: those operations
/// return `Ok(None)` instead.
#[derive(Debug, thiserror::Error)]
pub enum MeteoError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{operation} request failed with status {status}")]
    Status {
        operation: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("Failed to access recent locations file {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode recent locations: {0}")]
    Encode(#[from] serde_json::Error),
}

impl MeteoError {
    /// True for network and HTTP-level failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, MeteoError::Http(_) | MeteoError::Status { .. })
    }
}

pub type Result<T, E = MeteoError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_is_transport() {
        let err = MeteoError::Status {
            operation: "Forecast",
            status: reqwest::StatusCode::BAD_GATEWAY,
        };
        assert!(err.is_transport());
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn persistence_error_is_not_transport() {
        let err = MeteoError::Persistence {
            path: PathBuf::from("/tmp/recent.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!err.is_transport());
        assert!(err.to_string().contains("/tmp/recent.json"));
    }
}
