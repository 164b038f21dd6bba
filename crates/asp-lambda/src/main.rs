use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use asp_api::{HttpApi, ProvisionerAdapter};
use asp_compose::{ComposeUiClient, ComposeUiConfig};
use asp_core::{ProvisionContext, Provisioner, provision_app_slaves};
use asp_model::ProvisionEvent;
use asp_observe::{LoggerConfig, LoggerTimeZone, init_local_offset, init_logger};

/// When set, serve the HTTP API on this address instead of handling one event from stdin.
const ENV_LISTEN_ADDR: &str = "ASP_LISTEN_ADDR";

fn main() -> anyhow::Result<()> {
    let log_cfg = LoggerConfig::from_env()?;
    if log_cfg.tz == LoggerTimeZone::Local {
        // must run before the runtime spawns worker threads
        init_local_offset();
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?
        .block_on(run(log_cfg))
}

async fn run(log_cfg: LoggerConfig) -> anyhow::Result<()> {
    // 1) logger
    init_logger(&log_cfg)?;
    info!("logger initialized");

    // 2) provisioning settings + compose-ui client
    let ctx = ProvisionContext::from_env()?;
    let compose_cfg = ComposeUiConfig::from_env()?;
    let client = ComposeUiClient::new(&compose_cfg)?;
    info!(services_url = client.services_url(), "compose-ui client ready");
    let provisioner: Arc<dyn Provisioner> = Arc::new(client);

    // 3) serve or invoke once
    match std::env::var(ENV_LISTEN_ADDR) {
        Ok(addr) => serve(&addr, ctx, provisioner).await,
        Err(_) => invoke_once(&ctx, provisioner).await,
    }
}

async fn invoke_once(ctx: &ProvisionContext, provisioner: Arc<dyn Provisioner>) -> anyhow::Result<()> {
    let mut raw = String::new();
    tokio::io::stdin()
        .read_to_string(&mut raw)
        .await
        .context("failed to read event from stdin")?;
    let event: ProvisionEvent =
        serde_json::from_str(&raw).context("event is not a valid provisioning event")?;

    let span = info_span!("invocation", id = %Uuid::new_v4());
    let response = provision_app_slaves(event, ctx, provisioner)
        .instrument(span)
        .await?;

    let mut out = serde_json::to_vec(&response)?;
    out.push(b'\n');
    let mut stdout = tokio::io::stdout();
    stdout.write_all(&out).await?;
    stdout.flush().await?;
    Ok(())
}

async fn serve(
    addr: &str,
    ctx: ProvisionContext,
    provisioner: Arc<dyn Provisioner>,
) -> anyhow::Result<()> {
    let handler = Arc::new(ProvisionerAdapter::new(ctx, provisioner));
    let router = HttpApi::new(handler).router();

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "serving provisioning api");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await?;
    Ok(())
}
