use std::path::PathBuf;

use clap::Parser;
use tokio::signal;
use tokio::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tokenbucket::config::{LoggingConfig, TokenBucketConfig};
use tokenbucket::ratelimit::{Limiter, TokioClock};

/// Pace a stream of synthetic events through a token bucket.
#[derive(Debug, Parser)]
#[command(name = "tokenbucket", version, about)]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refill rate in events per second (overrides the file)
    #[arg(short, long)]
    rate: Option<f64>,

    /// Maximum token balance (overrides the file)
    #[arg(short, long)]
    burst: Option<f64>,

    /// Starting balance (overrides the file)
    #[arg(short, long)]
    tokens: Option<f64>,

    /// Number of events to admit before exiting
    #[arg(short, long, default_value_t = 20)]
    events: u64,

    /// Log filter directive (overrides the file)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON log lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TokenBucketConfig::from_file(path)?,
        None => TokenBucketConfig::default(),
    };
    apply_overrides(&mut config, &args);

    init_tracing(&config.logging)?;

    info!("Starting tokenbucket");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut limiter = Limiter::from_config_with_clock(&config.limiter, TokioClock)?;
    info!(
        rate = limiter.rate(),
        burst = limiter.burst(),
        tokens = limiter.tokens(),
        events = args.events,
        "Limiter initialized"
    );

    let start = Instant::now();
    let run = async {
        for event in 1..=args.events {
            limiter.wait_async().await;
            info!(
                event,
                offset_ms = start.elapsed().as_millis() as u64,
                "Event admitted"
            );
        }
    };

    tokio::select! {
        _ = run => {
            info!(elapsed_ms = start.elapsed().as_millis() as u64, "All events admitted");
        }
        _ = signal::ctrl_c() => {
            warn!("Received Ctrl+C, stopping early");
        }
    }

    Ok(())
}

/// Command line flags take precedence over the configuration file.
fn apply_overrides(config: &mut TokenBucketConfig, args: &Args) {
    if let Some(rate) = args.rate {
        config.limiter.requests_per_unit = rate;
        config.limiter.unit = Default::default();
    }
    if let Some(burst) = args.burst {
        config.limiter.burst = burst;
    }
    if let Some(tokens) = args.tokens {
        config.limiter.initial_tokens = Some(tokens);
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.json {
        config.logging.json = true;
    }
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}
