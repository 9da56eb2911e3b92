use clap::{Args, Parser, Subcommand};
use roleup_adapter_aws::AwsIamGateway;
use roleup_core::{RunConfig, documents};
use roleup_runtime::{inspect, resolve_context, run_setup, run_teardown};

#[derive(Parser)]
#[command(
    name = "roleup",
    version,
    about = "Provision and tear down the Lambda execution role for the Items API exercise"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Converge the remote role, managed-policy attachment, and inline policy
    Setup {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Best-effort removal of the inline policy, the attachment, and the role
    Teardown {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Show the remote state of the role without mutating anything
    Status {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the rendered trust and inline policy documents
    Render {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// IAM role name to reconcile
    #[arg(long, env = "ROLE_NAME", default_value = roleup_core::DEFAULT_ROLE_NAME)]
    role_name: String,

    /// DynamoDB table the inline policy grants access to
    #[arg(long, env = "TABLE_NAME", default_value = roleup_core::DEFAULT_TABLE_NAME)]
    table_name: String,

    /// AWS region for clients and rendered ARNs
    #[arg(long, env = "AWS_REGION", default_value = roleup_core::DEFAULT_REGION)]
    region: String,

    /// Account id override; skips the STS caller-identity lookup
    #[arg(long, env = "ACCOUNT_ID")]
    account_id: Option<String>,
}

impl ConfigArgs {
    fn into_config(self) -> RunConfig {
        RunConfig {
            role_name: self.role_name,
            table_name: self.table_name,
            region: self.region,
            account_id: self.account_id,
            ..RunConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Setup { config } => cmd_setup(config.into_config()).await,
        Command::Teardown { config } => cmd_teardown(config.into_config()).await,
        Command::Status { config } => cmd_status(config.into_config()).await,
        Command::Render { config } => cmd_render(config.into_config()).await,
    }
}

async fn cmd_setup(config: RunConfig) -> anyhow::Result<()> {
    let gateway = AwsIamGateway::new(&config.region).await;
    let report = run_setup(&gateway, &config).await?;

    println!("✔ Setup complete for role '{}'", config.role_name);
    println!("  - account: {}", report.context.account_id);
    println!("  - role: {}", report.role);
    println!("  - managed policy: {}", report.attachment);
    println!("  - inline policy: applied '{}'", config.inline_policy_name);
    Ok(())
}

async fn cmd_teardown(config: RunConfig) -> anyhow::Result<()> {
    let gateway = AwsIamGateway::new(&config.region).await;
    let report = run_teardown(&gateway, &config).await;

    println!("Teardown finished for role '{}':", config.role_name);
    for (step, outcome) in report.steps() {
        println!("  - {step}: {outcome}");
    }
    if report.any_failed() {
        println!("Some steps failed; re-run teardown once the cause is fixed.");
    }
    Ok(())
}

async fn cmd_status(config: RunConfig) -> anyhow::Result<()> {
    let gateway = AwsIamGateway::new(&config.region).await;
    let status = inspect(&gateway, &config).await?;

    match &status.role {
        Some(role) => println!("Role:                    {} ({})", role.name, role.arn),
        None => println!("Role:                    absent"),
    }
    println!("Managed policy attached: {}", status.managed_policy_attached);
    println!("Inline policy present:   {}", status.inline_policy_present);
    Ok(())
}

async fn cmd_render(config: RunConfig) -> anyhow::Result<()> {
    let gateway = AwsIamGateway::new(&config.region).await;
    let context = resolve_context(&gateway, &config).await?;

    println!("Trust policy:");
    println!(
        "{}",
        serde_json::to_string_pretty(&documents::lambda_trust_policy())?
    );
    println!();
    println!("Inline policy '{}':", config.inline_policy_name);
    println!(
        "{}",
        serde_json::to_string_pretty(&documents::table_access_policy(&context, &config.table_name))?
    );
    Ok(())
}
