//! Policy document builders.
//!
//! Pure functions producing the two JSON documents the reconcilers apply:
//! the trust policy (static) and the inline table-access policy
//! (parameterized by the resolved identity context). No side effects, no
//! I/O.

use serde_json::{Value, json};

use crate::IdentityContext;

/// Trust policy allowing the Lambda service principal to assume the role.
pub fn lambda_trust_policy() -> Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": "lambda.amazonaws.com" },
            "Action": "sts:AssumeRole"
        }]
    })
}

/// Fully qualified ARN of the table the inline policy is scoped to.
pub fn table_arn(context: &IdentityContext, table_name: &str) -> String {
    format!(
        "arn:aws:dynamodb:{}:{}:table/{}",
        context.region, context.account_id, table_name
    )
}

/// Inline policy granting the CRUD action set the handler needs, scoped to
/// exactly one table and its indexes. The account and region segments come
/// from the resolved context; callers must not pass a placeholder context.
pub fn table_access_policy(context: &IdentityContext, table_name: &str) -> Value {
    let table = table_arn(context, table_name);
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Sid": "TableCrud",
            "Effect": "Allow",
            "Action": [
                "dynamodb:GetItem",
                "dynamodb:PutItem",
                "dynamodb:UpdateItem",
                "dynamodb:DeleteItem",
                "dynamodb:Query",
                "dynamodb:Scan",
                "dynamodb:DescribeTable"
            ],
            "Resource": [
                table.clone(),
                format!("{table}/index/*")
            ]
        }]
    })
}
