/// Result code reported when a failure carries no upstream status.
pub const DEFAULT_RESULT_CODE: u16 = 500;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Connection refused or timed out while tunnelling through the account's route.
    #[error("Proxy connection failed: {0}")]
    Proxy(String),

    /// Network failure with no response and no route involved.
    #[error("{0}")]
    Transport(String),

    /// The API answered with a non-2xx status.
    #[error("Upstream rejected request ({result_code}): {message}")]
    Remote { result_code: u16, message: String },

    /// The API answered 2xx but the envelope could not be mapped.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Normalized result code: upstream status when one exists, otherwise 500.
    pub fn result_code(&self) -> u16 {
        match self {
            Self::Remote { result_code, .. } => *result_code,
            Self::Proxy(_) | Self::Transport(_) | Self::Malformed(_) => DEFAULT_RESULT_CODE,
        }
    }

    /// Normalized message: the upstream message for remote failures, the
    /// transport description otherwise.
    pub fn message(&self) -> String {
        match self {
            Self::Remote { message, .. } => message.clone(),
            Self::Transport(message) => message.clone(),
            Self::Proxy(_) | Self::Malformed(_) => self.to_string(),
        }
    }
}
