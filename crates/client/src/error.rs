use invoicedesk_core::DomainError;

/// Anything that can go wrong between building a request and reading the reply.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Another create request from the same guard has not finished yet.
    #[error("an invoice submission is already in flight")]
    SubmissionInFlight,
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
    /// The draft could not be turned into a payload.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}
