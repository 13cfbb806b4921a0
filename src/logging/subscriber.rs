//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Current UTC time rendered with a `chrono` format string.
fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// A [`tracing_subscriber::Layer`] that appends every event to a log file
/// with a timestamp prefix.
///
/// The file is opened in append mode so a boot log accumulates across runs;
/// each run starts with a header line.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open (or create) `path`, write a run header, and return the layer.
    ///
    /// Returns `None` if the parent directory cannot be created or the file
    /// cannot be opened.
    pub(super) fn new(path: &Path) -> Option<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()?;
        writeln!(
            file,
            "==========================================\n\
             bootconfig {} {}\n\
             ==========================================",
            crate::cli::VERSION,
            utc_now("%Y-%m-%d %H:%M:%S"),
        )
        .ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let line = format!("[{}] {}", utc_now("%H:%M:%S"), extractor.message);

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that prints the pre-rendered
/// `::`-joined line and nothing else.
struct LineFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for LineFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        writeln!(writer, "{}", extractor.message)
    }
}

/// Console filter built from `RUST_LOG`-style `directives`.
///
/// Falls back to `INFO` (`DEBUG` when `verbose`) when no directives are
/// given or they do not parse.
fn console_filter(verbose: bool, directives: Option<&str>) -> EnvFilter {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(level.into()))
}

/// Initialise the global [`tracing`] subscriber.
///
/// The console layer prints `INFO` and above (`DEBUG` when `verbose`), with
/// warnings and errors on stderr. `RUST_LOG`, when set, replaces that level.
/// When `log_file` is given every event at `DEBUG` and above is also
/// appended to it.
///
/// Returns `false` if a log file was requested but could not be opened.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool, log_file: Option<&Path>) -> bool {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = console_filter(verbose, directives.as_deref());

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let console_layer = fmt::layer()
        .event_format(LineFormatter)
        .with_writer(make_writer)
        .with_filter(filter);

    let file_layer = log_file.and_then(FileLayer::new);
    let file_ok = log_file.is_none() || file_layer.is_some();

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer.map(|l| l.with_filter(LevelFilter::DEBUG)))
        .init();

    file_ok
}
