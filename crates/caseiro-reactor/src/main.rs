use anyhow::Result;
use caseiro_ai::BedrockAgent;
use caseiro_notify::{SmsChannel, SnsTransport};
use caseiro_reactor::{Reactor, ReactorConfig};
use caseiro_storage::s3::S3ObjectStore;
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env().add_directive("caseiro=info".parse()?))
        .with_current_span(false)
        .without_time()
        .init();

    let config = ReactorConfig::from_env()?;
    tracing::info!(
        output_bucket = %config.output_bucket,
        agent_region = %config.agent.region,
        storage = ?config.storage,
        "Reactor starting"
    );
    if let Err(e) = config.agent.validate() {
        tracing::warn!(error = %e, "Agent identity incomplete, invocations will fail");
    }

    let store = Arc::new(S3ObjectStore::connect(&config.storage).await);
    let agent = Arc::new(BedrockAgent::connect(config.agent.clone()).await);
    let sms = SmsChannel::new(
        Arc::new(SnsTransport::connect(&config.storage).await),
        &config.sms.sender_id,
        &config.sms.destination_number,
    );
    let reactor = Arc::new(Reactor::new(store, agent, sms, &config));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let reactor = Arc::clone(&reactor);
        async move { Ok::<_, lambda_runtime::Error>(reactor.handle(&event.payload).await) }
    }))
    .await
    .map_err(|e| anyhow::anyhow!("Lambda runtime error: {e}"))
}
