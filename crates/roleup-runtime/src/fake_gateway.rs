//! In-memory gateway used by the reconciler tests.
//!
//! Models just enough of the remote semantics to exercise every branch:
//! roles keyed by name, attachment sets, inline policy maps, plus per-op
//! failure injection, a creation-race switch, an operation log, and a
//! counter of attempted mutations.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GatewayError;
use crate::gateway::{IamGateway, RoleDescriptor};

type InlinePolicies = BTreeMap<String, BTreeMap<String, Value>>;

#[derive(Default)]
pub(crate) struct FakeState {
    pub account_id: Option<String>,
    pub roles: BTreeMap<String, Value>,
    pub attached: BTreeMap<String, BTreeSet<String>>,
    pub inline: InlinePolicies,
    pub log: Vec<&'static str>,
    pub mutation_count: usize,
    pub fail_ops: BTreeSet<&'static str>,
    pub race_on_create: bool,
}

#[derive(Default)]
pub(crate) struct FakeGateway {
    pub state: Mutex<FakeState>,
}

impl FakeGateway {
    pub fn with_account(account_id: &str) -> Self {
        let gateway = Self::default();
        gateway.state.lock().unwrap().account_id = Some(account_id.to_string());
        gateway
    }

    pub fn seed_role(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .roles
            .insert(name.to_string(), Value::Object(Default::default()));
    }

    /// Force the named operation to fail with a service error.
    pub fn fail_op(&self, op: &'static str) {
        self.state.lock().unwrap().fail_ops.insert(op);
    }

    /// Clone of the durable resource state, for before/after comparison.
    pub fn snapshot(
        &self,
    ) -> (
        BTreeMap<String, Value>,
        BTreeMap<String, BTreeSet<String>>,
        InlinePolicies,
    ) {
        let state = self.state.lock().unwrap();
        (
            state.roles.clone(),
            state.attached.clone(),
            state.inline.clone(),
        )
    }
}

impl FakeState {
    fn check(&mut self, op: &'static str) -> Result<(), GatewayError> {
        self.log.push(op);
        if self.fail_ops.contains(op) {
            return Err(GatewayError::service(format!("injected failure in {op}")));
        }
        Ok(())
    }

    fn role_arn(name: &str) -> String {
        format!("arn:aws:iam::123456789012:role/{name}")
    }
}

#[async_trait]
impl IamGateway for FakeGateway {
    async fn caller_account_id(&self) -> Result<String, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.check("caller_account_id")?;
        state
            .account_id
            .clone()
            .ok_or_else(|| GatewayError::service("no caller identity configured"))
    }

    async fn get_role(&self, name: &str) -> Result<Option<RoleDescriptor>, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.check("get_role")?;
        Ok(state.roles.contains_key(name).then(|| RoleDescriptor {
            name: name.to_string(),
            arn: FakeState::role_arn(name),
        }))
    }

    async fn create_role(&self, name: &str, trust_policy: &Value) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.mutation_count += 1;
        state.check("create_role")?;
        if state.race_on_create {
            state
                .roles
                .insert(name.to_string(), trust_policy.clone());
            return Err(GatewayError::already_exists(format!("role {name}")));
        }
        if state.roles.contains_key(name) {
            return Err(GatewayError::already_exists(format!("role {name}")));
        }
        state.roles.insert(name.to_string(), trust_policy.clone());
        Ok(())
    }

    async fn list_attached_policies(&self, role_name: &str) -> Result<Vec<String>, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.check("list_attached_policies")?;
        if !state.roles.contains_key(role_name) {
            return Err(GatewayError::not_found(format!("role {role_name}")));
        }
        Ok(state
            .attached
            .get(role_name)
            .map(|arns| arns.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn attach_policy(&self, role_name: &str, policy_arn: &str) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.mutation_count += 1;
        state.check("attach_policy")?;
        if !state.roles.contains_key(role_name) {
            return Err(GatewayError::not_found(format!("role {role_name}")));
        }
        state
            .attached
            .entry(role_name.to_string())
            .or_default()
            .insert(policy_arn.to_string());
        Ok(())
    }

    async fn detach_policy(&self, role_name: &str, policy_arn: &str) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.mutation_count += 1;
        state.check("detach_policy")?;
        let was_attached = state
            .attached
            .get_mut(role_name)
            .is_some_and(|arns| arns.remove(policy_arn));
        if !was_attached {
            return Err(GatewayError::not_found(format!(
                "policy {policy_arn} not attached to {role_name}"
            )));
        }
        Ok(())
    }

    async fn put_inline_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        document: &Value,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.mutation_count += 1;
        state.check("put_inline_policy")?;
        if !state.roles.contains_key(role_name) {
            return Err(GatewayError::not_found(format!("role {role_name}")));
        }
        state
            .inline
            .entry(role_name.to_string())
            .or_default()
            .insert(policy_name.to_string(), document.clone());
        Ok(())
    }

    async fn delete_inline_policy(
        &self,
        role_name: &str,
        policy_name: &str,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.mutation_count += 1;
        state.check("delete_inline_policy")?;
        let removed = state
            .inline
            .get_mut(role_name)
            .is_some_and(|policies| policies.remove(policy_name).is_some());
        if !removed {
            return Err(GatewayError::not_found(format!(
                "inline policy {policy_name} on {role_name}"
            )));
        }
        Ok(())
    }

    async fn list_inline_policies(&self, role_name: &str) -> Result<Vec<String>, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.check("list_inline_policies")?;
        if !state.roles.contains_key(role_name) {
            return Err(GatewayError::not_found(format!("role {role_name}")));
        }
        Ok(state
            .inline
            .get(role_name)
            .map(|policies| policies.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete_role(&self, name: &str) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.mutation_count += 1;
        state.check("delete_role")?;
        if state.roles.remove(name).is_none() {
            return Err(GatewayError::not_found(format!("role {name}")));
        }
        state.attached.remove(name);
        state.inline.remove(name);
        Ok(())
    }
}
