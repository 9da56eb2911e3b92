//! Error types for the reconciliation runtime.

use thiserror::Error;

/// Errors surfaced by a gateway implementation. `NotFound` and
/// `AlreadyExists` are expected conditions that the reconcilers tolerate at
/// the exact call site that can legitimately race or re-run; everything else
/// is fatal in setup and logged-and-continue in teardown. The remote error
/// detail is always carried in the message.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The named role or policy does not exist remotely.
    #[error("not found: {0}")]
    NotFound(String),

    /// The resource already exists (e.g. a concurrent run created the role
    /// between the existence check and the create call).
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The caller lacks permission for the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The remote service rejected a policy document.
    #[error("invalid policy document: {0}")]
    InvalidDocument(String),

    /// Any other remote fault.
    #[error("service error: {0}")]
    Service(String),
}

impl GatewayError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }

    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }
}

/// Fatal setup errors. The step name pins down exactly how far
/// reconciliation progressed before the run terminated.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The account id could not be determined, so every downstream ARN
    /// would be malformed. Raised before any mutating call is attempted.
    #[error("could not resolve identity context: {0}")]
    Context(String),

    /// A reconciliation step failed with a non-tolerated gateway error.
    #[error("{step} failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: GatewayError,
    },
}

impl ProvisionError {
    pub fn step(step: &'static str, source: GatewayError) -> Self {
        Self::Step { step, source }
    }
}
