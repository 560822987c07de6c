//! slurp binary entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slurp::shutdown::spawn_signal_handler;
use slurp::{server, App, Config, Metrics};
use slurp_listener::{Listener, ZmqRelay};

#[derive(Parser, Debug)]
#[command(name = "slurp")]
#[command(about = "EDDN relay listener tracking the best commodity prices near home")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "SLURP_CONFIG", default_value = "slurper.yaml")]
    config: PathBuf,

    /// Relay to subscribe to, overriding relay.url from the config file
    #[arg(long, env = "EDDN_RELAY_URL")]
    relay_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "slurp=info,slurp_summary=info,slurp_listener=info",
                )
            }),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load(&args.config).map_err(|e| {
        error!(error = %e, "Failed to load config");
        e
    })?;
    if let Some(url) = args.relay_url {
        config.relay.url = url;
    }

    info!(
        relay = %config.relay.url,
        dock_file = %config.dock.file_path.display(),
        stock_file = %config.stock.file_path.display(),
        origin = ?config.stock.origin_coords,
        max_from_origin = config.stock.max_from_origin,
        "Starting slurp"
    );

    let metrics = Arc::new(Metrics::new().context("registering metrics")?);
    let shutdown = CancellationToken::new();

    let server_task = config.metrics.listen_addr.map(|addr| {
        let metrics = Arc::clone(&metrics);
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = server::serve(addr, metrics, shutdown).await {
                error!(error = %e, addr = %addr, "Health/metrics server failed");
            }
        })
    });

    let mut app = App::load(&config, Arc::clone(&metrics), std::io::stdout())
        .context("loading summaries")?;

    spawn_signal_handler(shutdown.clone()).context("installing signal handlers")?;

    let mut listener = Listener::with_shutdown(
        ZmqRelay::new(config.relay.url.clone()),
        config.relay.listener_config(),
        shutdown.clone(),
    );
    let stats = listener.run(|frame| app.handle_frame(&frame)).await;

    // The feed may end on its own; make sure the server stops too.
    shutdown.cancel();
    app.shutdown();

    if let Some(task) = server_task {
        if let Err(e) = task.await {
            error!(error = %e, "Health/metrics server task panicked");
        }
    }

    info!(
        frames = stats.frames,
        reconnects = stats.reconnects,
        "slurp stopped"
    );
    Ok(())
}
