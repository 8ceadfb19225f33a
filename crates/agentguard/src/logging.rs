//! # Logging Infrastructure
//!
//! Structured logging with `tracing` for the guard and the CLI.
//!
//! Every verdict is emitted as a structured event under the
//! `agentguard::verdict` target, so an operator can route decisions to a
//! separate sink with an env filter such as `agentguard::verdict=info`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use agentguard::logging::{init_logging, LogConfig};
//!
//! let _guard = init_logging(&LogConfig::default()).expect("Failed to initialize logging");
//! tracing::info!("guard started");
//! ```
//!
//! ## Configuration Options
//!
//! ```no_run
//! use std::path::PathBuf;
//! use agentguard::logging::{LogConfig, LogFormat, LogLevel};
//!
//! let config = LogConfig {
//!     level: LogLevel::Debug,
//!     format: LogFormat::Json,
//!     file_path: Some(PathBuf::from("/var/log/agentguard/verdicts.log")),
//!     correlation_ids: true,
//! };
//! ```

use std::path::{Path, PathBuf};

use agentguard_core::types::{FeeEstimate, TransactionProposal, Verdict};
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Target used for verdict events.
pub const VERDICT_TARGET: &str = "agentguard::verdict";

/// Error type for logging initialization failures.
#[derive(Debug)]
pub enum LogError {
    /// Failed to create log file or directory
    FileCreation(String),
    /// Failed to initialize the subscriber
    SubscriberInit(String),
    /// Invalid configuration
    InvalidConfig(String),
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileCreation(msg) => write!(f, "Failed to create log file: {msg}"),
            Self::SubscriberInit(msg) => write!(f, "Failed to initialize logging: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "Invalid log configuration: {msg}"),
        }
    }
}

impl std::error::Error for LogError {}

/// Minimum severity of messages that will be logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// trace and above
    Trace,
    /// debug and above
    Debug,
    /// info and above
    #[default]
    Info,
    /// warn and above
    Warn,
    /// errors only
    Error,
}

impl LogLevel {
    /// Convert to tracing Level.
    #[must_use]
    pub const fn as_tracing_level(self) -> Level {
        match self {
            Self::Trace => Level::TRACE,
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warn => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }

    /// Directive string for [`EnvFilter`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable multi-line output with colors.
    #[default]
    Pretty,
    /// One JSON object per event, for log aggregation.
    Json,
    /// Single-line output.
    Compact,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Compact => write!(f, "compact"),
        }
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Minimum level. Defaults to [`LogLevel::Info`].
    pub level: LogLevel,

    /// Output format. Defaults to [`LogFormat::Pretty`].
    pub format: LogFormat,

    /// Optional file to mirror logs into, rotated daily.
    ///
    /// The parent directory is created if it doesn't exist.
    pub file_path: Option<PathBuf>,

    /// Render the enclosing span, and with it the per-proposal correlation
    /// id, on every event.
    pub correlation_ids: bool,
}

/// Guard that flushes file logs on drop.
///
/// Keep it alive for as long as logging is needed.
pub struct LogGuard {
    guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

impl LogGuard {
    const fn new(guard: Option<tracing_appender::non_blocking::WorkerGuard>) -> Self {
        Self { guard }
    }
}

impl std::fmt::Debug for LogGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogGuard")
            .field("has_file_guard", &self.guard.is_some())
            .finish()
    }
}

type Filtered = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Filtered> + Send + Sync>;

fn stderr_layer(config: &LogConfig) -> BoxedLayer {
    let span_events = if config.correlation_ids {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    match config.format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(true)
            .with_span_events(span_events)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(config.correlation_ids)
            .with_span_list(false)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
    }
}

fn file_layer(
    config: &LogConfig,
    writer: tracing_appender::non_blocking::NonBlocking,
) -> BoxedLayer {
    match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_current_span(config.correlation_ids)
            .boxed(),
        LogFormat::Pretty | LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .boxed(),
    }
}

fn open_log_file(
    path: &Path,
) -> Result<
    (
        tracing_appender::non_blocking::NonBlocking,
        tracing_appender::non_blocking::WorkerGuard,
    ),
    LogError,
> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .map_err(|e| LogError::FileCreation(format!("{}: {e}", dir.display())))?;

    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| LogError::InvalidConfig("Invalid log file name".to_string()))?;

    let appender = tracing_appender::rolling::daily(dir, filename);
    Ok(tracing_appender::non_blocking(appender))
}

/// Initialize the global subscriber.
///
/// Logs go to stderr so that command output on stdout stays machine-readable.
///
/// # Errors
///
/// Returns [`LogError`] if the log file directory cannot be created or a
/// global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<LogGuard, LogError> {
    let filter = EnvFilter::try_new(config.level.as_str())
        .map_err(|e| LogError::InvalidConfig(e.to_string()))?;

    let mut layers: Vec<BoxedLayer> = vec![stderr_layer(config)];
    let mut worker = None;

    if let Some(path) = &config.file_path {
        let (writer, guard) = open_log_file(path)?;
        layers.push(file_layer(config, writer));
        worker = Some(guard);
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(layers)
        .try_init()
        .map_err(|e| LogError::SubscriberInit(e.to_string()))?;

    Ok(LogGuard::new(worker))
}

/// Generate a new correlation ID: 32 lowercase hex characters.
///
/// Unique within a process. Not suitable for anything security-related.
///
/// ```
/// use agentguard::logging::new_correlation_id;
///
/// let id = new_correlation_id();
/// assert_eq!(id.len(), 32);
/// assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn new_correlation_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static SEQUENCE: AtomicU64 = AtomicU64::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);

    // low 64 bits of the clock are enough to tell runs apart
    #[allow(clippy::cast_possible_truncation)]
    let clock = nanos as u64;

    format!("{:016x}{:016x}", splitmix64(clock ^ sequence.rotate_left(32)), splitmix64(sequence))
}

const fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Create an info span carrying a correlation ID field.
///
/// ```
/// use agentguard::logging::new_correlation_id;
///
/// let span = agentguard::with_correlation_id!(new_correlation_id(), "evaluate", round = 1);
/// let _entered = span.enter();
/// ```
#[macro_export]
macro_rules! with_correlation_id {
    ($id:expr, $name:expr) => {
        tracing::info_span!($name, correlation_id = %$id)
    };
    ($id:expr, $name:expr, $($fields:tt)*) => {
        tracing::info_span!($name, correlation_id = %$id, $($fields)*)
    };
}

/// Convert a `-v` count to a [`LogLevel`].
///
/// | Verbosity | Level |
/// |-----------|-------|
/// | 0         | Warn  |
/// | 1         | Info  |
/// | 2         | Debug |
/// | 3+        | Trace |
#[must_use]
pub const fn verbosity_to_level(verbosity: u8) -> LogLevel {
    match verbosity {
        0 => LogLevel::Warn,
        1 => LogLevel::Info,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    }
}

/// Emit one structured event describing a verdict.
///
/// Authorized proposals log at INFO, blocked ones at WARN.
pub fn log_verdict_event(proposal: &TransactionProposal, fee: FeeEstimate, verdict: &Verdict) {
    let rule = verdict.rule_name().unwrap_or("none");
    let amount = proposal.amount_ether();
    let fee_gwei = fee.gwei();

    if verdict.authorized {
        tracing::info!(
            target: "agentguard::verdict",
            rule,
            kind = verdict.kind.as_str(),
            authorized = true,
            amount_eth = %amount,
            destination = %proposal.destination,
            fee_gwei = %fee_gwei,
            reason = %verdict.reason,
            "transaction authorized"
        );
    } else {
        tracing::warn!(
            target: "agentguard::verdict",
            rule,
            kind = verdict.kind.as_str(),
            authorized = false,
            amount_eth = %amount,
            destination = %proposal.destination,
            fee_gwei = %fee_gwei,
            reason = %verdict.reason,
            "transaction blocked"
        );
    }
}
