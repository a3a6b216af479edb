use thiserror::Error;

/// Errors from recovering a plaintext credential.
///
/// These messages are for internal logs only. The gateway collapses every
/// variant into [`GatewayError::AuthFailure`] before anything reaches a caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecryptionError {
    #[error("empty encrypted data or passphrase")]
    EmptyInput,

    #[error("malformed ciphertext")]
    MalformedCiphertext,

    #[error("cipher initialization failed")]
    CipherInitError,

    #[error("invalid padding")]
    PaddingError,

    #[error("decrypted plaintext is not valid UTF-8")]
    InvalidPlaintext,
}

/// Errors from computing a webhook signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("invalid HMAC key: {0}")]
    InvalidKey(String),
}

/// Errors from extracting required fields out of a webhook payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("invalid {0}")]
    InvalidField(&'static str),

    #[error("unexpected repository '{0}'")]
    UnexpectedRepository(String),
}

/// Errors from a call against the provider REST API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("can't decode response: {0}")]
    Decode(String),
}

/// Errors that abort a keepalive scan. No partial result survives any of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("can't get workflow list: {0}")]
    ListWorkflows(#[source] ApiError),

    #[error("can't fetch definition of workflow '{workflow}': {source}")]
    FetchDefinition { workflow: String, source: ApiError },

    #[error("can't parse definition of workflow '{workflow}': {message}")]
    ParseDefinition { workflow: String, message: String },

    #[error("can't enable workflow '{workflow}': {source}")]
    Rearm { workflow: String, source: ApiError },
}

/// Terminal failures of one gateway invocation.
///
/// "Ignored" is deliberately absent: an uninteresting event is an outcome,
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Missing or invalid envelope/payload field, or a foreign repository.
    #[error("bad request: {0}")]
    MalformedRequest(String),

    /// Decryption or signature failure. Carries no detail on purpose.
    #[error("authentication failed")]
    AuthFailure,

    /// The provider API call failed or returned a non-success status.
    #[error("dispatch request failed: {0}")]
    UpstreamFailure(#[source] ApiError),

    /// A keepalive scan aborted.
    #[error("workflow keepalive failed: {0}")]
    ScanAbort(#[from] ScanError),
}

impl GatewayError {
    /// HTTP status reported to the caller.
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::MalformedRequest(_) => 400,
            GatewayError::AuthFailure => 403,
            GatewayError::UpstreamFailure(_) | GatewayError::ScanAbort(_) => 502,
        }
    }

    /// Stable machine-readable code for error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::MalformedRequest(_) => "BAD_REQUEST",
            GatewayError::AuthFailure => "FORBIDDEN",
            GatewayError::UpstreamFailure(_) => "UPSTREAM_FAILURE",
            GatewayError::ScanAbort(_) => "KEEPALIVE_FAILED",
        }
    }
}

impl From<ClassifyError> for GatewayError {
    fn from(e: ClassifyError) -> Self {
        GatewayError::MalformedRequest(e.to_string())
    }
}

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("can't read {path}: {message}")]
    Read { path: String, message: String },

    #[error("can't parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
