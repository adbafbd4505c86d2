use clap::Parser;
use miette::{IntoDiagnostic, Result};
use paygate::application::dispatcher::PaymentDispatcher;
use paygate::domain::account::AccountConfig;
use paygate::domain::payment::PaymentRequest;
use paygate::infrastructure::http::HttpGatewayTransport;
use paygate::infrastructure::in_memory::InMemoryJournal;
use paygate::infrastructure::rate_limit::build_limiter;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Fires a batch of payment submissions at an external gateway and prints
/// the recorded outcomes.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Account configuration JSON file
    config: PathBuf,

    /// Gateway processing endpoint
    #[arg(long, default_value = "http://localhost:1234/external/process")]
    gateway_url: String,

    /// Number of payments to submit
    #[arg(long, default_value_t = 10)]
    payments: u32,

    /// Amount per payment
    #[arg(long, default_value = "100")]
    amount: Decimal,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = AccountConfig::load(&cli.config).into_diagnostic()?;
    if !config.enabled {
        return Err(miette::miette!("account {} is disabled", config.account_name));
    }

    let transport = Arc::new(HttpGatewayTransport::new(cli.gateway_url).into_diagnostic()?);
    let journal = Arc::new(InMemoryJournal::new());
    let limiter = build_limiter(&config);
    let dispatcher = PaymentDispatcher::new(config, limiter, transport, journal.clone());

    let mut handles = Vec::with_capacity(cli.payments as usize);
    for _ in 0..cli.payments {
        let request = PaymentRequest::new(Uuid::new_v4(), cli.amount);
        handles.push(dispatcher.submit(request).await);
    }
    for handle in handles {
        handle.await.into_diagnostic()?;
    }

    for (payment_id, entries) in journal.all().await {
        for entry in entries {
            println!("{payment_id} {entry:?}");
        }
    }

    Ok(())
}
