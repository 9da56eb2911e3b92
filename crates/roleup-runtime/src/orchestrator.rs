//! Setup and teardown orchestration.
//!
//! Both flows run strictly sequentially: each remote operation is awaited
//! before the next begins. Setup stops at the first fatal error; teardown
//! always runs every step and reports per-step outcomes.

use roleup_core::{IdentityContext, RunConfig};
use tracing::{info, warn};

use crate::context::resolve_context;
use crate::error::{GatewayError, ProvisionError};
use crate::gateway::{IamGateway, RoleDescriptor};
use crate::reconcile::{
    AttachOutcome, RoleOutcome, StepOutcome, ensure_attached, ensure_detached, ensure_role,
    put_inline, remove_inline, remove_role,
};

/// What the setup flow did, branch by branch.
#[derive(Debug)]
pub struct SetupReport {
    pub context: IdentityContext,
    pub role: RoleOutcome,
    pub attachment: AttachOutcome,
}

/// Run the full setup flow: resolve context, ensure the role, ensure the
/// managed-policy attachment, apply the inline policy.
pub async fn run_setup(
    gateway: &dyn IamGateway,
    config: &RunConfig,
) -> Result<SetupReport, ProvisionError> {
    let context = resolve_context(gateway, config).await?;
    info!(account_id = %context.account_id, region = %context.region, "resolved identity context");

    let role = ensure_role(gateway, &config.role_spec())
        .await
        .map_err(|err| ProvisionError::step("role reconciliation", err))?;

    let attachment = ensure_attached(gateway, &config.managed_binding())
        .await
        .map_err(|err| ProvisionError::step("managed policy attachment", err))?;

    put_inline(gateway, &config.inline_binding(&context))
        .await
        .map_err(|err| ProvisionError::step("inline policy apply", err))?;

    Ok(SetupReport {
        context,
        role,
        attachment,
    })
}

/// Per-step outcomes of a teardown run, in execution order.
#[derive(Debug)]
pub struct TeardownReport {
    pub inline_policy: StepOutcome,
    pub attachment: StepOutcome,
    pub role: StepOutcome,
}

impl TeardownReport {
    /// Step label/outcome pairs in the order they ran.
    pub fn steps(&self) -> [(&'static str, &StepOutcome); 3] {
        [
            ("inline policy", &self.inline_policy),
            ("managed policy attachment", &self.attachment),
            ("role", &self.role),
        ]
    }

    pub fn any_failed(&self) -> bool {
        self.steps().iter().any(|(_, outcome)| outcome.is_failed())
    }
}

/// Run the full teardown flow: remove the inline policy, detach the managed
/// policy, delete the role, in that order, never aborting early. Tolerated
/// and failed steps are logged and carried in the report so repeated
/// invocations can drive a partially provisioned role to fully absent.
pub async fn run_teardown(gateway: &dyn IamGateway, config: &RunConfig) -> TeardownReport {
    let inline_policy = remove_inline(gateway, &config.role_name, &config.inline_policy_name).await;
    log_step("inline policy", &inline_policy);

    let attachment = ensure_detached(gateway, &config.managed_binding()).await;
    log_step("managed policy attachment", &attachment);

    let role = remove_role(gateway, &config.role_name).await;
    log_step("role", &role);

    TeardownReport {
        inline_policy,
        attachment,
        role,
    }
}

fn log_step(step: &'static str, outcome: &StepOutcome) {
    match outcome {
        StepOutcome::Removed => info!(step, "removed"),
        StepOutcome::AlreadyAbsent => warn!(step, "already absent, nothing to remove"),
        StepOutcome::Failed(err) => warn!(step, error = %err, "step failed, continuing"),
    }
}

/// Read-only snapshot of the remote state for the configured role.
#[derive(Debug)]
pub struct RoleStatus {
    pub role: Option<RoleDescriptor>,
    pub managed_policy_attached: bool,
    pub inline_policy_present: bool,
}

/// Inspect the remote state without mutating it.
pub async fn inspect(
    gateway: &dyn IamGateway,
    config: &RunConfig,
) -> Result<RoleStatus, GatewayError> {
    let Some(role) = gateway.get_role(&config.role_name).await? else {
        return Ok(RoleStatus {
            role: None,
            managed_policy_attached: false,
            inline_policy_present: false,
        });
    };

    let attached = gateway.list_attached_policies(&config.role_name).await?;
    let inline = gateway.list_inline_policies(&config.role_name).await?;

    Ok(RoleStatus {
        role: Some(role),
        managed_policy_attached: attached.iter().any(|arn| arn == &config.managed_policy_arn),
        inline_policy_present: inline.iter().any(|name| name == &config.inline_policy_name),
    })
}
