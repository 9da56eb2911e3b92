//! Identity context resolution.

use roleup_core::{IdentityContext, RunConfig};
use tracing::info;

use crate::error::ProvisionError;
use crate::gateway::IamGateway;

/// Resolve the account id and region for this run. The explicit override
/// wins; otherwise a single STS caller-identity query is issued. No retry:
/// transient failures propagate, and an unresolvable account id is fatal
/// before any mutating call happens.
pub async fn resolve_context(
    gateway: &dyn IamGateway,
    config: &RunConfig,
) -> Result<IdentityContext, ProvisionError> {
    let account_id = match config.account_id.as_deref() {
        Some(id) if !id.trim().is_empty() => {
            info!(account_id = %id, "using account id override");
            id.trim().to_string()
        }
        _ => gateway
            .caller_account_id()
            .await
            .map_err(|err| ProvisionError::Context(err.to_string()))?,
    };

    if account_id.is_empty() {
        return Err(ProvisionError::Context(
            "identity service returned an empty account id".to_string(),
        ));
    }

    Ok(IdentityContext {
        account_id,
        region: config.region.clone(),
    })
}
