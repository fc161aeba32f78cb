use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` overrides the default
/// `info,pagerx=debug` filter.
pub fn tracing_init() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pagerx=debug"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_names(false)
        .with_thread_ids(true)
        .with_target(false)
        .with_timer(ShortTime::default())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Wall-clock time plus milliseconds since startup.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ShortTime {
    started: chrono::DateTime<chrono::offset::Local>,
}

impl Default for ShortTime {
    fn default() -> Self {
        Self {
            started: chrono::Local::now(),
        }
    }
}

impl FormatTime for ShortTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Local::now();
        let elapsed = now.signed_duration_since(self.started).num_milliseconds();
        write!(w, "{} +{elapsed:>6}ms", now.format("%H:%M:%S"))
    }
}
