use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{error, info, warn};

use crate::error::DataInputError;

use super::unified::DataSourceFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourceSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (the source could not be read at all, e.g. missing file).
    Critical,
}

/// Context about one attempt to open a data source.
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// The source path being read.
    pub path: PathBuf,
    /// Format the source was read as.
    pub format: DataSourceFormat,
}

/// Minimal stats reported when a source is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceStats {
    /// Number of distinct data ids in the resulting dataset.
    pub rows: usize,
}

/// Observer interface for data-source outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts. Observers are passed explicitly
/// through [`super::SourceOptions`]; there is no global registry.
pub trait SourceObserver: Send + Sync {
    /// Called when a source was read and indexed.
    fn on_success(&self, _ctx: &SourceContext, _stats: SourceStats) {}

    /// Called when reading a source fails.
    fn on_failure(&self, _ctx: &SourceContext, _severity: SourceSeverity, _error: &DataInputError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &SourceContext, severity: SourceSeverity, error: &DataInputError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn SourceObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn SourceObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl SourceObserver for CompositeObserver {
    fn on_success(&self, ctx: &SourceContext, stats: SourceStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &SourceContext, severity: SourceSeverity, error: &DataInputError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &SourceContext, severity: SourceSeverity, error: &DataInputError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Appends one line per source event to a local log file.
///
/// Line layout: `<unix-seconds> <event> [severity=..] format=.. path=.. <detail>`.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// The file is opened in append mode on every event. When that fails the callbacks emit a
    /// `tracing` warning; use [`Self::try_record`] to get the error instead.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    /// Append one event line.
    pub fn try_record(
        &self,
        event: &str,
        severity: Option<SourceSeverity>,
        ctx: &SourceContext,
        detail: &str,
    ) -> io::Result<()> {
        let severity = severity.map(|s| format!(" severity={s:?}")).unwrap_or_default();
        let line = format!(
            "{ts} {event}{severity} format={fmt:?} path={path} {detail}",
            ts = unix_ts(),
            fmt = ctx.format,
            path = ctx.path.display(),
        );

        // The guard protects no data, so a poisoned lock is still usable.
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut f = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(f, "{line}")
    }

    fn record(&self, event: &str, severity: Option<SourceSeverity>, ctx: &SourceContext, detail: &str) {
        if let Err(err) = self.try_record(event, severity, ctx, detail) {
            warn!(log = %self.path.display(), event, %err, "could not append to observer log");
        }
    }
}

impl SourceObserver for FileObserver {
    fn on_success(&self, ctx: &SourceContext, stats: SourceStats) {
        self.record("ok", None, ctx, &format!("ids={}", stats.rows));
    }

    fn on_failure(&self, ctx: &SourceContext, severity: SourceSeverity, error: &DataInputError) {
        self.record("fail", Some(severity), ctx, &format!("err={error}"));
    }

    fn on_alert(&self, ctx: &SourceContext, severity: SourceSeverity, error: &DataInputError) {
        self.record("ALERT", Some(severity), ctx, &format!("err={error}"));
    }
}

/// Forwards source events to `tracing`.
///
/// Successes are `info`, failures `warn`, alerts `error`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl SourceObserver for TracingObserver {
    fn on_success(&self, ctx: &SourceContext, stats: SourceStats) {
        info!(format = ?ctx.format, path = %ctx.path.display(), ids = stats.rows, "data source ready");
    }

    fn on_failure(&self, ctx: &SourceContext, severity: SourceSeverity, error: &DataInputError) {
        warn!(?severity, format = ?ctx.format, path = %ctx.path.display(), %error, "data source failed");
    }

    fn on_alert(&self, ctx: &SourceContext, severity: SourceSeverity, error: &DataInputError) {
        error!(?severity, format = ?ctx.format, path = %ctx.path.display(), %error, "data source alert");
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{
        CompositeObserver, FileObserver, SourceContext, SourceObserver, SourceSeverity, SourceStats,
    };
    use crate::error::DataInputError;
    use crate::ingestion::unified::DataSourceFormat;

    #[derive(Default)]
    struct Counting {
        successes: AtomicUsize,
        failures: AtomicUsize,
    }

    impl SourceObserver for Counting {
        fn on_success(&self, _ctx: &SourceContext, _stats: SourceStats) {
            self.successes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_failure(&self, _ctx: &SourceContext, _severity: SourceSeverity, _error: &DataInputError) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn ctx(path: PathBuf) -> SourceContext {
        SourceContext {
            path,
            format: DataSourceFormat::PIPE,
        }
    }

    #[test]
    fn severities_are_ordered() {
        assert!(SourceSeverity::Critical > SourceSeverity::Error);
        assert!(SourceSeverity::Error > SourceSeverity::Warning);
        assert!(SourceSeverity::Warning > SourceSeverity::Info);
    }

    #[test]
    fn composite_fans_out_and_alert_defaults_to_failure() {
        let a = Arc::new(Counting::default());
        let b = Arc::new(Counting::default());
        let composite = CompositeObserver::new(vec![a.clone() as Arc<dyn SourceObserver>, b.clone()]);
        let err = DataInputError::MissingDataId { id: "x".into() };

        composite.on_success(&ctx(PathBuf::from("a.txt")), SourceStats { rows: 1 });
        composite.on_alert(&ctx(PathBuf::from("a.txt")), SourceSeverity::Critical, &err);

        for o in [&a, &b] {
            assert_eq!(o.successes.load(Ordering::SeqCst), 1);
            assert_eq!(o.failures.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn file_observer_appends_lines() {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        let log = std::env::temp_dir().join(format!("data-driven-input-observer-{nanos}.log"));
        let obs = FileObserver::new(&log);

        obs.on_success(&ctx(PathBuf::from("a.txt")), SourceStats { rows: 3 });
        obs.on_failure(
            &ctx(PathBuf::from("b.txt")),
            SourceSeverity::Error,
            &DataInputError::EmptySource { source_label: "b.txt".into() },
        );

        let text = std::fs::read_to_string(&log).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("ok format=") && lines[0].contains("ids=3"));
        assert!(lines[1].contains("fail severity=Error"));
        let _ = std::fs::remove_file(&log);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unwritable_log_path_is_reported() {
        // A directory cannot be opened for appending.
        let obs = FileObserver::new(std::env::temp_dir());
        let c = ctx(PathBuf::from("a.txt"));

        assert!(obs.try_record("ok", None, &c, "ids=1").is_err());

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            obs.on_success(&c, SourceStats { rows: 1 });
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("could not append to observer log"), "{output}");
        assert!(output.contains("WARN"));
    }
}
