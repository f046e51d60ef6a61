//! Logging setup for drivers and tests.
//!
//! `TSNORM_LOG` takes a `RUST_LOG`-style filter. A bare level such as `debug`
//! is applied to the tsnorm crates only, so dependencies stay quiet; any other
//! value is used as written. `RUST_LOG` is the fallback and is always used as
//! written. `TSNORM_LOG_FORMAT` picks the layout:
//!
//! - `text` (default): one line per event, and one per closed
//!   `compile_library` / `pass` span with its busy and idle time
//! - `tree`: `tracing-tree` output, nested by library and then by pass
//! - `json`: one object per event, listing the enclosing library and pass
//!
//! ```bash
//! TSNORM_LOG=debug TSNORM_LOG_FORMAT=tree my-driver
//! TSNORM_LOG="tsnorm_scope=trace,tsnorm_passes=debug" my-driver
//! ```

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Targets a bare `TSNORM_LOG` level applies to.
const TARGETS: &[&str] = &[
    "tsnorm",
    "tsnorm_tree",
    "tsnorm_scope",
    "tsnorm_transform",
    "tsnorm_passes",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Filter directives in `EnvFilter` syntax.
    pub filter: String,
    pub format: LogFormat,
}

impl TracingConfig {
    /// Read `TSNORM_LOG`, `RUST_LOG` and `TSNORM_LOG_FORMAT`. `None` when no
    /// filter is set.
    pub fn from_env() -> Option<Self> {
        let own = std::env::var("TSNORM_LOG").ok();
        let rust = std::env::var("RUST_LOG").ok();
        let format = std::env::var("TSNORM_LOG_FORMAT").ok();
        Self::from_vars(own.as_deref(), rust.as_deref(), format.as_deref())
    }

    pub fn from_vars(own: Option<&str>, rust: Option<&str>, format: Option<&str>) -> Option<Self> {
        let filter = match (own, rust) {
            (Some(own), _) => scoped_directives(own),
            (None, Some(rust)) => rust.to_string(),
            (None, None) => return None,
        };
        Some(TracingConfig {
            filter,
            format: LogFormat::parse(format.unwrap_or_default()),
        })
    }

    /// Install this configuration as the global subscriber, writing to
    /// stderr. Returns `false` when a subscriber was already installed.
    pub fn init(&self) -> bool {
        let filter = EnvFilter::builder().parse_lossy(&self.filter);
        match self.format {
            LogFormat::Tree => {
                let layer = tracing_tree::HierarchicalLayer::default()
                    .with_writer(std::io::stderr)
                    .with_indent_amount(2)
                    .with_indent_lines(true)
                    .with_bracketed_fields(true)
                    // Passes that log nothing leave no empty span behind.
                    .with_deferred_spans(true)
                    .with_targets(true);
                Registry::default().with(filter).with(layer).try_init().is_ok()
            }
            LogFormat::Json => {
                let layer = fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr);
                Registry::default().with(filter).with(layer).try_init().is_ok()
            }
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(std::io::stderr)
                .try_init()
                .is_ok(),
        }
    }
}

fn is_level(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error" | "off"
    )
}

/// `debug` becomes `tsnorm=debug,tsnorm_tree=debug,...`.
fn scoped_directives(value: &str) -> String {
    let value = value.trim();
    if !is_level(value) {
        return value.to_string();
    }
    TARGETS
        .iter()
        .map(|target| format!("{target}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the subscriber described by the environment, if any. Safe to call
/// more than once; only the first installation takes effect.
pub fn init_tracing() {
    let Some(config) = TracingConfig::from_env() else {
        return;
    };
    if !config.init() {
        tracing::debug!(filter = %config.filter, "tracing subscriber already installed");
    }
}
