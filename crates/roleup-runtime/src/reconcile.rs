//! Per-resource reconcilers.
//!
//! Each function drives one remote resource toward its declared state and
//! handles the tolerated conditions (`AlreadyExists`, `NotFound`) at the
//! exact call site that can legitimately race or re-run. Everything else
//! propagates to the caller untouched.

use std::fmt;

use roleup_core::{InlinePolicyBinding, ManagedPolicyBinding, RoleSpec};
use tracing::info;

use crate::error::GatewayError;
use crate::gateway::IamGateway;

/// Which branch the role reconciler took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleOutcome {
    Created,
    AlreadyExists,
}

impl fmt::Display for RoleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::AlreadyExists => write!(f, "already exists"),
        }
    }
}

/// Which branch the attachment reconciler took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    Attached,
    AlreadyAttached,
}

impl fmt::Display for AttachOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attached => write!(f, "attached"),
            Self::AlreadyAttached => write!(f, "already attached"),
        }
    }
}

/// Result of one teardown step. Errors are carried, not discarded, so the
/// orchestrator can log them and keep going.
#[derive(Debug)]
pub enum StepOutcome {
    Removed,
    AlreadyAbsent,
    Failed(GatewayError),
}

impl StepOutcome {
    fn from_result(result: Result<(), GatewayError>) -> Self {
        match result {
            Ok(()) => Self::Removed,
            Err(GatewayError::NotFound(_)) => Self::AlreadyAbsent,
            Err(err) => Self::Failed(err),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Removed => write!(f, "removed"),
            Self::AlreadyAbsent => write!(f, "already absent"),
            Self::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

/// Make sure a role named `spec.name` exists.
///
/// An existing role is left exactly as found: its trust policy is not
/// compared against `spec.trust_policy`, and drift is tolerated rather than
/// detected. Creation losing a race to another run counts as success.
pub async fn ensure_role(
    gateway: &dyn IamGateway,
    spec: &RoleSpec,
) -> Result<RoleOutcome, GatewayError> {
    if let Some(existing) = gateway.get_role(&spec.name).await? {
        info!(role = %spec.name, arn = %existing.arn, "role already exists, leaving it untouched");
        return Ok(RoleOutcome::AlreadyExists);
    }

    match gateway.create_role(&spec.name, &spec.trust_policy).await {
        Ok(()) => {
            info!(role = %spec.name, "created role");
            Ok(RoleOutcome::Created)
        }
        Err(GatewayError::AlreadyExists(detail)) => {
            info!(role = %spec.name, %detail, "role was created concurrently, treating as success");
            Ok(RoleOutcome::AlreadyExists)
        }
        Err(err) => Err(err),
    }
}

/// Make sure the managed policy is attached. Attach failures are not
/// tolerated here: a missing attachment is a real misconfiguration, unlike
/// role existence where the content is assumed already correct.
pub async fn ensure_attached(
    gateway: &dyn IamGateway,
    binding: &ManagedPolicyBinding,
) -> Result<AttachOutcome, GatewayError> {
    let attached = gateway.list_attached_policies(&binding.role_name).await?;
    if attached.iter().any(|arn| arn == &binding.policy_arn) {
        info!(role = %binding.role_name, policy = %binding.policy_arn, "managed policy already attached");
        return Ok(AttachOutcome::AlreadyAttached);
    }

    gateway
        .attach_policy(&binding.role_name, &binding.policy_arn)
        .await?;
    info!(role = %binding.role_name, policy = %binding.policy_arn, "attached managed policy");
    Ok(AttachOutcome::Attached)
}

/// Apply the inline policy. Unconditional put: the remote API provides
/// idempotent replace semantics under the policy name, so there is no
/// inspect step here at all.
pub async fn put_inline(
    gateway: &dyn IamGateway,
    binding: &InlinePolicyBinding,
) -> Result<(), GatewayError> {
    gateway
        .put_inline_policy(&binding.role_name, &binding.policy_name, &binding.document)
        .await?;
    info!(role = %binding.role_name, policy = %binding.policy_name, "applied inline policy");
    Ok(())
}

/// Teardown mirror of [`ensure_attached`]: detach, tolerating "not
/// attached".
pub async fn ensure_detached(
    gateway: &dyn IamGateway,
    binding: &ManagedPolicyBinding,
) -> StepOutcome {
    StepOutcome::from_result(
        gateway
            .detach_policy(&binding.role_name, &binding.policy_arn)
            .await,
    )
}

/// Remove the inline policy by name, tolerating absence.
pub async fn remove_inline(gateway: &dyn IamGateway, role_name: &str, policy_name: &str) -> StepOutcome {
    StepOutcome::from_result(gateway.delete_inline_policy(role_name, policy_name).await)
}

/// Delete the role by name, tolerating absence.
pub async fn remove_role(gateway: &dyn IamGateway, role_name: &str) -> StepOutcome {
    StepOutcome::from_result(gateway.delete_role(role_name).await)
}
