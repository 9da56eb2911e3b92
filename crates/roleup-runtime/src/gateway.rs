//! Capability interface over the remote identity/authorization API.

use async_trait::async_trait;

use crate::error::GatewayError;

/// Remote view of an existing role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDescriptor {
    pub name: String,
    pub arn: String,
}

/// Minimal IAM/STS surface consumed by the reconcilers. One blocking-style
/// async call per remote operation; no retries, no caching. Correctness
/// comes from the callers tolerating "already exists" / "not found" at the
/// sites that can race or re-run.
#[async_trait]
pub trait IamGateway: Send + Sync {
    /// Account id of the current caller (STS `GetCallerIdentity`).
    async fn caller_account_id(&self) -> Result<String, GatewayError>;

    /// Look up a role by name. Absence is `Ok(None)`, not an error.
    async fn get_role(&self, name: &str) -> Result<Option<RoleDescriptor>, GatewayError>;

    /// Create a role with the given trust policy. A concurrent creation
    /// surfaces as [`GatewayError::AlreadyExists`].
    async fn create_role(
        &self,
        name: &str,
        trust_policy: &serde_json::Value,
    ) -> Result<(), GatewayError>;

    /// ARNs of all managed policies currently attached to the role.
    async fn list_attached_policies(&self, role_name: &str) -> Result<Vec<String>, GatewayError>;

    async fn attach_policy(&self, role_name: &str, policy_arn: &str) -> Result<(), GatewayError>;

    /// Detaching an absent attachment surfaces as
    /// [`GatewayError::NotFound`].
    async fn detach_policy(&self, role_name: &str, policy_arn: &str) -> Result<(), GatewayError>;

    /// Put-or-replace an inline policy under `policy_name`. Idempotent on
    /// the remote side; the same name always overwrites prior content.
    async fn put_inline_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        document: &serde_json::Value,
    ) -> Result<(), GatewayError>;

    async fn delete_inline_policy(
        &self,
        role_name: &str,
        policy_name: &str,
    ) -> Result<(), GatewayError>;

    /// Names of all inline policies on the role. Used only by the read-only
    /// status inspector.
    async fn list_inline_policies(&self, role_name: &str) -> Result<Vec<String>, GatewayError>;

    async fn delete_role(&self, name: &str) -> Result<(), GatewayError>;
}
