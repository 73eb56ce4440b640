use std::fmt;

use crate::services::FieldErrors;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CliError: everything the inventory client can fail with
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug)]
pub enum CliError {
    /// The server rejected the form (HTTP 422).
    Validation(FieldErrors),
    /// The id does not name a live product (HTTP 404).
    NotFound(String),
    /// The server could not be reached or the body was unreadable.
    Http(reqwest::Error),
    UnexpectedStatus { status: u16, body: String },
    /// The user declined a confirmation prompt.
    Aborted,
    InvalidInput(String),
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(errors) => {
                write!(f, "Validation failed:")?;
                for (field, messages) in errors.iter() {
                    for message in messages {
                        write!(f, "\n  {field}: {message}")?;
                    }
                }
                Ok(())
            }
            Self::NotFound(message) => write!(f, "{message}"),
            Self::Http(err) => {
                if err.is_connect() || err.is_timeout() {
                    write!(f, "Failed to reach the inventory server: {err}")
                } else {
                    write!(f, "HTTP error: {err}")
                }
            }
            Self::UnexpectedStatus { status, body } => {
                write!(f, "Unexpected response from server ({status}): {body}")
            }
            Self::Aborted => write!(f, "Aborted."),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<reqwest::Error> for CliError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Io(std::io::Error::new(std::io::ErrorKind::Other, err.to_string()))
    }
}
