//! Reconciliation runtime: the gateway capability interface, the
//! per-resource reconcilers, and the setup/teardown orchestrators.
//!
//! All remote access goes through the [`gateway::IamGateway`] trait so the
//! reconcilers can be exercised against an in-memory fake.

pub mod context;
pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod reconcile;

#[cfg(test)]
pub(crate) mod fake_gateway;

pub use context::resolve_context;
pub use error::{GatewayError, ProvisionError};
pub use gateway::{IamGateway, RoleDescriptor};
pub use orchestrator::{RoleStatus, SetupReport, TeardownReport, inspect, run_setup, run_teardown};
pub use reconcile::{AttachOutcome, RoleOutcome, StepOutcome};
