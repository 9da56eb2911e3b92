use serde::{Deserialize, Serialize};

// Policy document builders (pure, no I/O)
pub mod documents;

/// Role name used when no override is supplied.
pub const DEFAULT_ROLE_NAME: &str = "items-api-role";

/// DynamoDB table the inline policy grants access to.
pub const DEFAULT_TABLE_NAME: &str = "Items";

/// Region used for clients and rendered ARNs when no override is supplied.
pub const DEFAULT_REGION: &str = "ap-northeast-1";

/// Name of the inline policy owned by this tool. Re-using the same name on
/// every run is what makes the inline apply an overwrite rather than an
/// accumulation.
pub const DEFAULT_INLINE_POLICY_NAME: &str = "ItemsTableAccess";

/// AWS-managed policy granting the Lambda runtime permission to write logs.
pub const LAMBDA_BASIC_EXECUTION_POLICY_ARN: &str =
    "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole";

/// Immutable per-run configuration, constructed once in `main` and threaded
/// by reference into every component call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// IAM role name to reconcile.
    pub role_name: String,

    /// DynamoDB table the inline policy is scoped to.
    pub table_name: String,

    /// AWS region.
    pub region: String,

    /// Explicit account id. When set, the STS caller-identity lookup is
    /// skipped entirely.
    #[serde(default)]
    pub account_id: Option<String>,

    /// ARN of the managed policy to keep attached.
    pub managed_policy_arn: String,

    /// Name under which the inline policy is stored on the role.
    pub inline_policy_name: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            role_name: DEFAULT_ROLE_NAME.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            region: DEFAULT_REGION.to_string(),
            account_id: None,
            managed_policy_arn: LAMBDA_BASIC_EXECUTION_POLICY_ARN.to_string(),
            inline_policy_name: DEFAULT_INLINE_POLICY_NAME.to_string(),
        }
    }
}

impl RunConfig {
    /// Target state for the role itself.
    pub fn role_spec(&self) -> RoleSpec {
        RoleSpec {
            name: self.role_name.clone(),
            trust_policy: documents::lambda_trust_policy(),
        }
    }

    /// Target state for the managed-policy attachment.
    pub fn managed_binding(&self) -> ManagedPolicyBinding {
        ManagedPolicyBinding {
            role_name: self.role_name.clone(),
            policy_arn: self.managed_policy_arn.clone(),
        }
    }

    /// Target state for the inline policy. Requires a resolved identity
    /// context: the document embeds fully qualified table ARNs.
    pub fn inline_binding(&self, context: &IdentityContext) -> InlinePolicyBinding {
        InlinePolicyBinding {
            role_name: self.role_name.clone(),
            policy_name: self.inline_policy_name.clone(),
            document: documents::table_access_policy(context, &self.table_name),
        }
    }
}

/// Account id and region for the current run. Resolved once, read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityContext {
    pub account_id: String,
    pub region: String,
}

/// Declared target state for the role: a name and the trust policy it is
/// created with. An existing role is never updated to match (see the role
/// reconciler).
#[derive(Debug, Clone)]
pub struct RoleSpec {
    pub name: String,
    pub trust_policy: serde_json::Value,
}

/// A managed policy that must be attached to the role. Set membership:
/// attaching twice is a no-op, detaching twice is a no-op.
#[derive(Debug, Clone)]
pub struct ManagedPolicyBinding {
    pub role_name: String,
    pub policy_arn: String,
}

/// An inline policy document stored under a unique name on the role.
/// Applying is a put-or-replace: same name always overwrites prior content.
#[derive(Debug, Clone)]
pub struct InlinePolicyBinding {
    pub role_name: String,
    pub policy_name: String,
    pub document: serde_json::Value,
}
