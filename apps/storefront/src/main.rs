use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use client_core::{
    CatalogStore, DropSession, HttpChainRpc, InMemoryChain, LocalKeypairSigner,
    TransactionOrchestrator,
};
use shared::domain::ShippingDetails;

/// Scripted walk through one drop lifecycle: pick an influencer, generate and
/// list a drop, then buy it and record the shipping order.
#[derive(Parser, Debug)]
struct Args {
    /// Catalog search query used to pick the influencer.
    #[arg(long, default_value = "zaara")]
    influencer: String,
    /// Node gateway endpoint; the in-process simulator is used when omitted.
    #[arg(long)]
    endpoint: Option<String>,
    /// Generation latency in milliseconds.
    #[arg(long, default_value_t = 2000)]
    latency_ms: u64,
    #[arg(long, default_value = "Jane")]
    recipient: String,
    #[arg(long, default_value = "1 Main St")]
    street: String,
    #[arg(long, default_value = "NYC")]
    city: String,
    #[arg(long, default_value = "10001")]
    zip: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let rpc: Arc<dyn client_core::ChainRpc> = match &args.endpoint {
        Some(endpoint) => Arc::new(HttpChainRpc::new(endpoint.clone())),
        None => Arc::new(InMemoryChain::new()),
    };
    let wallet = Arc::new(LocalKeypairSigner::generate());
    let orchestrator = Arc::new(TransactionOrchestrator::new(rpc, wallet));
    let catalog = Arc::new(CatalogStore::with_default_roster());

    let session = DropSession::new(catalog, orchestrator)
        .with_generation_latency(Duration::from_millis(args.latency_ms));

    let matches = session.catalog().filter(&args.influencer);
    let influencer = matches
        .first()
        .ok_or_else(|| anyhow!("no influencer matches query {:?}", args.influencer))?;
    println!("Selected {}: {}", influencer.name, influencer.description);
    let influencer_id = influencer.id.clone();

    session.select_influencer(&influencer_id).await;
    let listing = session.generate_drop().await?;
    println!(
        "Drop listed at {listing} ({})",
        session
            .chosen_asset()
            .await
            .unwrap_or_else(|| "<no asset>".into())
    );

    session.request_purchase().await?;
    let order = session
        .submit_shipping(ShippingDetails {
            recipient_name: args.recipient,
            street_address: args.street,
            city: args.city,
            postal_code: args.zip,
        })
        .await?;

    println!("Order recorded: {}", serde_json::to_string_pretty(&order)?);
    println!(
        "Session view: {:?}, orders on ledger: {}",
        session.current_view().await,
        session.order_count().await
    );

    Ok(())
}
