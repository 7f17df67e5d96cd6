use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Resolve the effective default level: the command line wins over the
/// config file, and an unparseable config value falls back to `warn`.
pub fn default_level(override_level: Option<LevelFilter>, configured: &str) -> LevelFilter {
    override_level
        .or_else(|| configured.parse().ok())
        .unwrap_or(LevelFilter::WARN)
}

/// Install a compact stderr subscriber. `RUST_LOG` directives still apply on
/// top of the default level. Keep the guard alive until exit.
pub fn init(override_level: Option<LevelFilter>, configured: &str) -> WorkerGuard {
    let level = default_level(override_level, configured);
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(writer)
        .with_filter(env_filter);

    if tracing_subscriber::registry()
        .with(stderr_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: a tracing subscriber was already installed");
    }

    guard
}

/// Registers a panic hook that logs panics using the `tracing` crate
pub fn register_panic_logger() {
    std::panic::set_hook(Box::new(|panic| match panic.location() {
        Some(loc) => {
            tracing::error!(
                message = %panic,
                panic.file = loc.file(),
                panic.line = loc.line(),
                panic.column = loc.column(),
            );
        }
        None => tracing::error!(message = %panic),
    }));
}
