use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    // network, auth, quota, server failures and unreadable responses
    #[error("remote service error{}: {message}", status_suffix(.status))]
    RemoteService {
        status: Option<u16>,
        message: String
    },

    #[error("invalid parameter `{field}`: {message}")]
    InvalidParameter {
        field: String,
        message: String
    }
}

fn status_suffix(status: &Option<u16>) -> String {

    status.map(|s| format!(" ({s})")).unwrap_or_default()

}

impl CompletionError {

    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {

        CompletionError::RemoteService { status, message: message.into() }

    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {

        CompletionError::InvalidParameter { field: field.into(), message: message.into() }

    }

    pub fn field(&self) -> Option<&str> {

        match self {
            CompletionError::InvalidParameter { field, .. } => Some(field),
            CompletionError::RemoteService { .. } => None
        }

    }

    pub fn status(&self) -> Option<u16> {

        match self {
            CompletionError::RemoteService { status, .. } => *status,
            CompletionError::InvalidParameter { .. } => None
        }

    }

}

impl From<reqwest::Error> for CompletionError {

    fn from(e: reqwest::Error) -> Self {

        let status = e.status().map(|s| s.as_u16());
        let message = if e.is_timeout() {
            format!("request timed out: {e}")
        } else {
            e.to_string()
        };
        CompletionError::RemoteService { status, message }

    }

}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value:?}")]
    Invalid {
        var: &'static str,
        value: String
    }
}
