//! AWS implementation of the gateway trait, backed by the IAM and STS SDK
//! clients. Service errors are classified into the runtime taxonomy by
//! their wire error code, with the remote message preserved.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_iam::Client as IamClient;
use aws_sdk_iam::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_sts::Client as StsClient;
use serde_json::Value;

use roleup_runtime::{GatewayError, IamGateway, RoleDescriptor};

pub struct AwsIamGateway {
    iam: IamClient,
    sts: StsClient,
}

impl AwsIamGateway {
    /// Build IAM and STS clients from the default credential provider chain
    /// plus the run's region.
    pub async fn new(region: &str) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self {
            iam: IamClient::new(&shared),
            sts: StsClient::new(&shared),
        }
    }
}

/// Map a wire error code onto the taxonomy. IAM reports `NoSuchEntity`,
/// `EntityAlreadyExists`, `MalformedPolicyDocument`, and `AccessDenied`;
/// anything unrecognized is a service fault.
fn classify(op: &'static str, code: Option<&str>, message: &str) -> GatewayError {
    match code {
        Some("NoSuchEntity" | "NoSuchEntityException") => {
            GatewayError::not_found(format!("{op}: {message}"))
        }
        Some("EntityAlreadyExists" | "EntityAlreadyExistsException") => {
            GatewayError::already_exists(format!("{op}: {message}"))
        }
        Some("AccessDenied" | "AccessDeniedException") => {
            GatewayError::permission_denied(format!("{op}: {message}"))
        }
        Some("MalformedPolicyDocument" | "MalformedPolicyDocumentException") => {
            GatewayError::invalid_document(format!("{op}: {message}"))
        }
        _ => GatewayError::service(format!("{op}: {message}")),
    }
}

fn map_sdk_err<E, R>(op: &'static str, err: SdkError<E, R>) -> GatewayError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().map(str::to_owned);
    let message = match err.message() {
        Some(message) => message.to_owned(),
        None => DisplayErrorContext(&err).to_string(),
    };
    classify(op, code.as_deref(), &message)
}

#[async_trait]
impl IamGateway for AwsIamGateway {
    async fn caller_account_id(&self) -> Result<String, GatewayError> {
        let out = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|err| map_sdk_err("get-caller-identity", err))?;
        out.account()
            .map(str::to_owned)
            .ok_or_else(|| GatewayError::service("get-caller-identity: response missing account id"))
    }

    async fn get_role(&self, name: &str) -> Result<Option<RoleDescriptor>, GatewayError> {
        match self.iam.get_role().role_name(name).send().await {
            Ok(out) => {
                let role = out
                    .role()
                    .ok_or_else(|| GatewayError::service("get-role: response missing role"))?;
                Ok(Some(RoleDescriptor {
                    name: role.role_name().to_string(),
                    arn: role.arn().to_string(),
                }))
            }
            Err(err) => match map_sdk_err("get-role", err) {
                GatewayError::NotFound(_) => Ok(None),
                other => Err(other),
            },
        }
    }

    async fn create_role(&self, name: &str, trust_policy: &Value) -> Result<(), GatewayError> {
        self.iam
            .create_role()
            .role_name(name)
            .assume_role_policy_document(trust_policy.to_string())
            .send()
            .await
            .map(|_| ())
            .map_err(|err| map_sdk_err("create-role", err))
    }

    async fn list_attached_policies(&self, role_name: &str) -> Result<Vec<String>, GatewayError> {
        let out = self
            .iam
            .list_attached_role_policies()
            .role_name(role_name)
            .send()
            .await
            .map_err(|err| map_sdk_err("list-attached-role-policies", err))?;
        Ok(out
            .attached_policies()
            .iter()
            .filter_map(|policy| policy.policy_arn().map(str::to_owned))
            .collect())
    }

    async fn attach_policy(&self, role_name: &str, policy_arn: &str) -> Result<(), GatewayError> {
        self.iam
            .attach_role_policy()
            .role_name(role_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| map_sdk_err("attach-role-policy", err))
    }

    async fn detach_policy(&self, role_name: &str, policy_arn: &str) -> Result<(), GatewayError> {
        self.iam
            .detach_role_policy()
            .role_name(role_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| map_sdk_err("detach-role-policy", err))
    }

    async fn put_inline_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        document: &Value,
    ) -> Result<(), GatewayError> {
        self.iam
            .put_role_policy()
            .role_name(role_name)
            .policy_name(policy_name)
            .policy_document(document.to_string())
            .send()
            .await
            .map(|_| ())
            .map_err(|err| map_sdk_err("put-role-policy", err))
    }

    async fn delete_inline_policy(
        &self,
        role_name: &str,
        policy_name: &str,
    ) -> Result<(), GatewayError> {
        self.iam
            .delete_role_policy()
            .role_name(role_name)
            .policy_name(policy_name)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| map_sdk_err("delete-role-policy", err))
    }

    async fn list_inline_policies(&self, role_name: &str) -> Result<Vec<String>, GatewayError> {
        let out = self
            .iam
            .list_role_policies()
            .role_name(role_name)
            .send()
            .await
            .map_err(|err| map_sdk_err("list-role-policies", err))?;
        Ok(out.policy_names().to_vec())
    }

    async fn delete_role(&self, name: &str) -> Result<(), GatewayError> {
        self.iam
            .delete_role()
            .role_name(name)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| map_sdk_err("delete-role", err))
    }
}
