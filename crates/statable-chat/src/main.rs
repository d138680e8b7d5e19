//! Chat navigation entry point.

use std::time::Duration;

use clap::Parser;
use statable_chat::{ChatApp, ChatConfig, ChatError, DEFAULT_FRAMES, DEFAULT_SCRIPT, parse_script};
use statable_core::ContainerConfig;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Scripted chat client navigation
#[derive(Parser, Debug)]
#[command(name = "statable-chat")]
#[command(about = "Walk a chat client's screens from a navigation script")]
#[command(version)]
struct Args {
    /// Comma-separated steps, e.g. "auth,channels:alice,chat:general,back"
    #[arg(short, long, default_value = DEFAULT_SCRIPT)]
    script: String,

    /// Duration of each built-in transition in milliseconds
    #[arg(long, default_value = "300")]
    duration_ms: u64,

    /// Watchdog for custom transitions in milliseconds (0 waits forever)
    #[arg(long, default_value = "5000")]
    watchdog_ms: u64,

    /// Frames logged per transition
    #[arg(long, default_value_t = DEFAULT_FRAMES)]
    frames: u32,

    /// Let the splash screen advance on its own after this many milliseconds
    #[arg(long)]
    splash_ms: Option<u64>,

    /// User restored from a previous session
    #[arg(short, long)]
    user: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log: String,
}

impl Args {
    fn config(&self) -> ChatConfig {
        ChatConfig {
            transition_duration: Duration::from_millis(self.duration_ms),
            splash_delay: self.splash_ms.map(Duration::from_millis),
            signed_in_user: self.user.clone(),
            frames: self.frames,
            container: ContainerConfig {
                transition_watchdog: (self.watchdog_ms > 0)
                    .then(|| Duration::from_millis(self.watchdog_ms)),
                ..ContainerConfig::default()
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), ChatError> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let steps = parse_script(&args.script)?;
    let app = ChatApp::start(&args.config());
    app.launch(args.splash_ms.is_some()).await?;

    let report = app.run(&steps).await?;
    let failed = report.steps.iter().filter_map(|s| s.outcome.as_ref()).filter(|o| !o.is_success());
    tracing::info!(
        steps = report.steps.len(),
        unsuccessful = failed.count(),
        history = ?report.history,
        "script finished"
    );

    app.shutdown().await;
    Ok(())
}
