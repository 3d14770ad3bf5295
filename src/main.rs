use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gopay_inline::payments::{PaymentRequest, PaymentVariant, Validators};
use gopay_inline::{Client, Config};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gopay", version, about = "Build, validate and submit GoPay payments")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Optional config file; GOPAY_* environment variables take precedence
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the request and print the JSON sent to the gateway
    Validate(BuildArgs),
    /// Build the request and submit it
    Create {
        #[command(flatten)]
        build: BuildArgs,
        /// Parent payment id, required for recurring payments
        #[arg(long)]
        parent_id: Option<u64>,
    },
    /// Print the state of an existing payment
    Verify { id: u64 },
}

#[derive(clap::Args)]
struct BuildArgs {
    /// JSON file with the payment input
    file: PathBuf,
    #[arg(long, value_enum, default_value_t = Variant::Recurrent)]
    variant: Variant,
    /// Accept unknown keys and unnamed items
    #[arg(long)]
    no_scheme: bool,
    /// Skip item and EET total reconciliation
    #[arg(long)]
    no_prices: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Variant {
    Payment,
    Recurrent,
    Recurring,
}

impl From<Variant> for PaymentVariant {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Payment => PaymentVariant::Payment,
            Variant::Recurrent => PaymentVariant::Recurrent,
            Variant::Recurring => PaymentVariant::Recurring,
        }
    }
}

impl BuildArgs {
    fn build(&self) -> Result<PaymentRequest> {
        let raw = std::fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        let data: serde_json::Value =
            serde_json::from_str(&raw).context("Payment input is not valid JSON")?;

        let mut validators = Validators::default();
        if self.no_scheme {
            validators = validators.without_scheme();
        }
        if self.no_prices {
            validators = validators.without_prices();
        }

        Ok(PaymentVariant::from(self.variant).create(&data, validators)?)
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    match cli.command {
        Command::Validate(build) => {
            let request = build.build()?;
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        Command::Create { build, parent_id } => {
            let request = build.build()?;
            let client = Client::new(Config::load(cli.config.as_deref())?)?;
            tracing::info!("Submitting payment to {}", client.config().base_url());

            let payments = client.payments();
            let response = match request {
                PaymentRequest::Payment(payment) => payments.create_payment(payment).await?,
                PaymentRequest::Recurrent(payment) => {
                    payments.create_recurrent_payment(payment).await?
                }
                PaymentRequest::Recurring(payment) => {
                    let parent_id =
                        parent_id.context("--parent-id is required for recurring payments")?;
                    payments.create_recurring_payment(parent_id, payment).await?
                }
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Verify { id } => {
            let client = Client::new(Config::load(cli.config.as_deref())?)?;
            let response = client.payments().verify(id).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
