use thiserror::Error;

/// Everything that can go wrong talking to the listings backend.
///
/// `househunt-core` turns these into the load, mutation and discovery
/// errors the front ends show.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never got an answer: refused, DNS, timeout, or a body
    /// that could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("bad URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client itself could not be constructed.
    #[error("cannot set up HTTP client: {0}")]
    ClientSetup(String),

    #[error("nothing at {url}")]
    NotFound { url: String },

    /// A non-2xx answer other than 404.
    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not the JSON we expected. `body` keeps the raw text.
    #[error("unexpected response body: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The HTTP status behind this error, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidUrl(_) | Self::ClientSetup(_) | Self::Deserialization { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_404() {
        let err = Error::NotFound {
            url: "http://x/api/houses/1".into(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn other_statuses_are_not_not_found() {
        let err = Error::Status {
            status: 503,
            body: String::new(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_not_found());
    }

    #[test]
    fn local_failures_have_no_status() {
        let err = Error::ClientSetup("no tls backend".into());
        assert_eq!(err.status(), None);
    }
}
