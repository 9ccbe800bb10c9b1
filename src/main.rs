use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use touchdown::constants::{
    BOUNCE_TIME_MILLIS, FLYING_TIME_MILLIS, G_BUFFER_TIME_MILLIS, G_UPDATES_AFTER_TOUCH,
};
use touchdown::context::Context;
use touchdown::logger::FlightLogger;
use touchdown::source::{EventSource, ReplaySource, SerialSource};
use touchdown::transmitter::Transmitter;
use touchdown::LandingConfig;

#[derive(Parser, Debug)]
#[command(name = "touchdown")]
#[command(about = "Touchdown, bounce and landing classifier")]
#[command(version)]
struct Args {
    /// Serial port delivering host events
    #[arg(long, required_unless_present = "replay", conflicts_with = "replay")]
    port: Option<String>,

    #[arg(long, default_value_t = 9600)]
    baud: u32,

    /// Recorded flight to replay instead of a live feed
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Serial port to send status lines to
    #[arg(long)]
    transmit: Option<String>,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    #[arg(long)]
    no_log: bool,

    // ── Timing ────────────────────────────────────────────────
    #[arg(long, default_value_t = BOUNCE_TIME_MILLIS)]
    bounce_time_ms: u64,

    #[arg(long, default_value_t = FLYING_TIME_MILLIS)]
    flying_time_ms: u64,

    #[arg(long, default_value_t = G_BUFFER_TIME_MILLIS)]
    g_buffer_time_ms: u64,

    #[arg(long, default_value_t = G_UPDATES_AFTER_TOUCH)]
    g_updates_after_touch: u32,

    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> LandingConfig {
        LandingConfig {
            bounce_time_ms: self.bounce_time_ms,
            flying_time_ms: self.flying_time_ms,
            g_buffer_time_ms: self.g_buffer_time_ms,
            g_updates_after_touch: self.g_updates_after_touch,
            ..LandingConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("touchdown v{}", env!("CARGO_PKG_VERSION"));

    let source: Box<dyn EventSource> = match (&args.replay, &args.port) {
        (Some(path), _) => Box::new(ReplaySource::from_path(path)?),
        (None, Some(port)) => Box::new(SerialSource::open(port, args.baud)?),
        (None, None) => anyhow::bail!("either --port or --replay is required"),
    };
    let logger = if args.no_log {
        None
    } else {
        Some(FlightLogger::create(&args.log_dir)?)
    };
    let transmitter = args
        .transmit
        .as_deref()
        .map(|port| Transmitter::open(port, args.baud))
        .transpose()?;

    let mut context = Context::new(args.config(), source, logger, transmitter);
    let start = Instant::now();
    while context.update(start.elapsed().as_millis() as u64)? {}

    info!(
        state = %context.classifier.state(),
        status = %context.classifier.status(),
        bounces = context.classifier.bounce_count(),
        max_g = context.classifier.max_g(),
        "event source finished"
    );
    Ok(())
}
