// Logging module - routes diagnostics into the log pane
//
// Writing to stderr while the TUI owns the alternate screen would garble the
// display, so tracing events from this crate are forwarded to the log pane as
// UiEvent::Log lines. Events on the `respite::meta` target are about the log
// pane itself (dropped lines, focus errors) and are never forwarded, which
// keeps a failing log pane from feeding itself. An optional JSON file layer
// records everything.

use crate::config::{LogRotation, LoggingConfig};
use crate::events::UiSender;
use anyhow::{Context, Result};
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::Context as LayerContext;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Target for diagnostics that must not reach the log pane
pub const META_TARGET: &str = "respite::meta";

/// Crate prefix for events worth showing in the log pane
const CRATE_TARGET: &str = "respite";

/// Tracing layer that forwards this crate's events to the log pane
pub struct PaneLogLayer {
    ui: UiSender,
}

impl PaneLogLayer {
    pub fn new(ui: UiSender) -> Self {
        Self { ui }
    }

    fn forwards(target: &str) -> bool {
        target.starts_with(CRATE_TARGET) && !target.starts_with(META_TARGET)
    }
}

impl<S> Layer<S> for PaneLogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: LayerContext<'_, S>) {
        let metadata = event.metadata();
        if !Self::forwards(metadata.target()) {
            return;
        }

        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));

        let line = match *metadata.level() {
            Level::ERROR => format!("error: {}", message),
            Level::WARN => format!("warning: {}", message),
            _ => message,
        };

        // Never block inside a tracing callback
        self.ui.try_log(line);
    }
}

/// Visitor to extract the message from a tracing event
struct MessageVisitor<'a>(&'a mut String);

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.0.push_str(value);
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{:?}", value);
        }
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// whole run.
pub fn init(config: &LoggingConfig, ui: UiSender) -> Result<Option<WorkerGuard>> {
    let default_filter = format!("{}={}", CRATE_TARGET, config.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(PaneLogLayer::new(ui));

    let Some(sink) = &config.file else {
        registry.try_init().context("Failed to install tracing subscriber")?;
        return Ok(None);
    };

    std::fs::create_dir_all(&sink.dir)
        .with_context(|| format!("Could not create log directory {}", sink.dir.display()))?;

    let rotation = match sink.rotation {
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Daily => Rotation::DAILY,
        LogRotation::Never => Rotation::NEVER,
    };
    let file_appender = RollingFileAppender::new(rotation, &sink.dir, &sink.prefix);

    // Wrap in non-blocking writer (writes happen in background thread)
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    registry
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(Some(guard))
}
