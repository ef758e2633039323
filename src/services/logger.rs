//! The logger: level filter, rotation, primary file and sink fan-out.
//!
//! A [`Logger`] is a plain value owned by the host application. Every call
//! does its file I/O on the calling thread before returning; share a logger
//! between threads by putting it behind a `Mutex`.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::error::{LogitError, LogitResult};
use crate::domain::models::{
    CallSite, ConfigDict, DeliveryFailure, DeliveryTarget, Level, LogReport, LoggerConfig,
    LoggerSettings, OutputFormat, StructuredFormat,
};
use crate::domain::ports::RecordSink;
use crate::domain::units::{parse_duration, parse_size};
use crate::infrastructure::config::SettingsLoader;
use crate::infrastructure::logging::structured::{create_sink, touch};
use crate::infrastructure::logging::{unix_now, RotationLedger};
use crate::infrastructure::paths::ProjectPaths;
use crate::services::formatter::{render_message, FormatContext};

/// Bytes per kilobyte in size thresholds
const BYTES_PER_KILOBYTE: u64 = 1_000;

/// Leveled file logger with rotation and structured sinks
pub struct Logger {
    config: LoggerConfig,
    format: OutputFormat,
    paths: ProjectPaths,
    ledger: RotationLedger,
    sinks: Vec<Box<dyn RecordSink>>,
    echo: bool,
}

impl Logger {
    /// Logger with default configuration for the project at `paths`
    pub fn new(paths: ProjectPaths) -> Self {
        Self {
            config: LoggerConfig::default(),
            format: OutputFormat::default(),
            ledger: RotationLedger::for_project(&paths),
            paths,
            sinks: Vec::new(),
            echo: true,
        }
    }

    /// Logger with default configuration for the working directory
    pub fn for_current_dir() -> LogitResult<Self> {
        Ok(Self::new(ProjectPaths::current()?))
    }

    /// Logger built from already loaded settings.
    ///
    /// Settings are validated in full before anything is created.
    pub fn from_settings(paths: ProjectPaths, settings: &LoggerSettings) -> LogitResult<Self> {
        let (config, formats) = settings.resolve()?;

        let mut logger = Self::new(paths);
        logger.config = config;
        logger.echo = settings.echo;
        for format in formats {
            logger.register_sink(format)?;
        }
        Ok(logger)
    }

    /// Logger configured from `.logit/config.yaml` and `LOGIT_*` variables
    pub fn load(paths: ProjectPaths) -> anyhow::Result<Self> {
        let settings = SettingsLoader::load(&paths)?;
        Ok(Self::from_settings(paths, &settings)?)
    }

    /// Current configuration
    pub const fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Project locations used for the ledger and archives
    pub const fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    /// Rotation ledger of this project
    pub const fn ledger(&self) -> &RotationLedger {
        &self.ledger
    }

    /// Primary log file, resolved against the project root
    pub fn log_file_path(&self) -> PathBuf {
        self.paths.resolve(&self.config.log_file_path)
    }

    /// Set level and file, keeping the rotation thresholds
    pub fn configure(&mut self, level: Level, log_file_path: impl AsRef<Path>) -> ConfigDict {
        self.config.level = level;
        self.config.log_file_path = log_file_path.as_ref().to_path_buf();
        self.config.to_dict()
    }

    /// Set level, file and both rotation thresholds.
    ///
    /// Threshold literals are parsed before anything changes; `None`
    /// disables that kind of rotation.
    pub fn configure_full(
        &mut self,
        level: Level,
        log_file_path: impl AsRef<Path>,
        rotation_time: Option<&str>,
        rotation_size: Option<&str>,
    ) -> LogitResult<ConfigDict> {
        let rotation_seconds = rotation_time.map(parse_duration).transpose()?;
        let rotation_kilobytes = rotation_size.map(parse_size).transpose()?;

        self.config = LoggerConfig {
            level,
            log_file_path: log_file_path.as_ref().to_path_buf(),
            rotation_seconds,
            rotation_kilobytes,
        };
        Ok(self.config.to_dict())
    }

    /// Replace the whole configuration from a dictionary.
    ///
    /// See [`LoggerConfig::from_dict`] for the accepted keys.
    pub fn configure_from_dict(&mut self, dict: &ConfigDict) -> LogitResult<()> {
        self.config = LoggerConfig::from_dict(dict)?;
        Ok(())
    }

    /// Replace the whole configuration with an already validated one
    pub fn set_config(&mut self, config: LoggerConfig) {
        self.config = config;
    }

    /// Producers rendered around each message
    pub const fn format(&self) -> &OutputFormat {
        &self.format
    }

    /// Replace the output format
    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    /// Print decorated lines to stdout in addition to the file
    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    /// Register the structured sink for `format` next to the current log file.
    ///
    /// Registering a format twice keeps the first sink.
    ///
    /// # Returns
    /// Path of the sink file
    pub fn register_sink(&mut self, format: StructuredFormat) -> LogitResult<PathBuf> {
        if let Some(existing) = self.sinks.iter().find(|sink| sink.format() == format) {
            return Ok(existing.path().to_path_buf());
        }

        let sink = create_sink(format, &self.log_file_path())?;
        let path = sink.path().to_path_buf();
        debug!(format = %format, path = %path.display(), "registered structured sink");
        self.sinks.push(sink);
        Ok(path)
    }

    /// Register a sink by format name (`json`, `xml` or `csv`)
    pub fn register_sink_named(&mut self, format: &str) -> LogitResult<PathBuf> {
        self.register_sink(format.parse()?)
    }

    /// Add a caller-built sink, replacing any sink of the same format
    pub fn add_sink(&mut self, sink: Box<dyn RecordSink>) {
        self.sinks.retain(|existing| existing.format() != sink.format());
        self.sinks.push(sink);
    }

    /// Registered sinks
    pub fn sinks(&self) -> impl Iterator<Item = &dyn RecordSink> {
        self.sinks.iter().map(|sink| &**sink)
    }

    /// Log `message` at `level`, attributed to the caller
    #[track_caller]
    pub fn log(&mut self, level: Level, message: impl AsRef<str>) -> LogitResult<LogReport> {
        let call_site = CallSite::caller();
        self.log_at(level, message.as_ref(), call_site)
    }

    /// Log `message` at `level` with an explicit call site.
    ///
    /// Messages below the configured level return a suppressed report
    /// without touching the filesystem. Sink and rotation failures are
    /// collected in the report; only a failed write to the primary file is
    /// returned as an error.
    pub fn log_at(
        &mut self,
        level: Level,
        message: &str,
        call_site: CallSite,
    ) -> LogitResult<LogReport> {
        if !level.passes(self.config.level) {
            return Ok(LogReport::suppressed());
        }

        let ctx = FormatContext::new(level, call_site);
        let rendered = render_message(&self.format, message, &ctx);
        let line = rendered.line(false);
        let mut report = LogReport {
            emitted: true,
            ..LogReport::default()
        };

        if !self.sinks.is_empty() {
            let record = rendered.record();
            for sink in &mut self.sinks {
                if let Err(error) = sink.append(&record) {
                    warn!(
                        format = %sink.format(),
                        path = %sink.path().display(),
                        error = %error,
                        "structured sink failed"
                    );
                    report.failures.push(DeliveryFailure {
                        target: DeliveryTarget::Sink(sink.format()),
                        error,
                    });
                }
            }
        }

        let log_file = self.log_file_path();
        match self.rotate_if_due(&log_file) {
            Ok(archived) => report.archived_to = archived,
            Err(error) => {
                warn!(path = %log_file.display(), error = %error, "log rotation failed");
                report.failures.push(DeliveryFailure {
                    target: DeliveryTarget::Rotation,
                    error,
                });
            }
        }

        append_line(&log_file, &line)?;

        if self.echo {
            println!("{}", rendered.line(true));
        }

        Ok(report)
    }

    /// Log at [`Level::Clutter`]
    #[track_caller]
    pub fn clutter(&mut self, message: impl AsRef<str>) -> LogitResult<LogReport> {
        self.log_at(Level::Clutter, message.as_ref(), CallSite::caller())
    }

    /// Log at [`Level::Info`]
    #[track_caller]
    pub fn info(&mut self, message: impl AsRef<str>) -> LogitResult<LogReport> {
        self.log_at(Level::Info, message.as_ref(), CallSite::caller())
    }

    /// Log at [`Level::Debug`]
    #[track_caller]
    pub fn debug(&mut self, message: impl AsRef<str>) -> LogitResult<LogReport> {
        self.log_at(Level::Debug, message.as_ref(), CallSite::caller())
    }

    /// Log at [`Level::Warning`]
    #[track_caller]
    pub fn warning(&mut self, message: impl AsRef<str>) -> LogitResult<LogReport> {
        self.log_at(Level::Warning, message.as_ref(), CallSite::caller())
    }

    /// Log at [`Level::Error`]
    #[track_caller]
    pub fn error(&mut self, message: impl AsRef<str>) -> LogitResult<LogReport> {
        self.log_at(Level::Error, message.as_ref(), CallSite::caller())
    }

    /// Log at [`Level::Critical`]
    #[track_caller]
    pub fn critical(&mut self, message: impl AsRef<str>) -> LogitResult<LogReport> {
        self.log_at(Level::Critical, message.as_ref(), CallSite::caller())
    }

    /// Archive `log_file` when a configured threshold has been reached.
    ///
    /// # Returns
    /// Archive path when the file was moved
    fn rotate_if_due(&self, log_file: &Path) -> LogitResult<Option<PathBuf>> {
        let now = unix_now();
        let mut due = false;

        if let Some(threshold) = self.config.rotation_seconds {
            due |= self.ledger.is_rotation_due(log_file, threshold, now)?;
        }

        if let Some(kilobytes) = self.config.rotation_kilobytes {
            let bytes = match fs::metadata(log_file) {
                Ok(metadata) => metadata.len(),
                Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
                Err(e) => return Err(LogitError::io("inspect", log_file, e)),
            };
            due |= bytes > 0 && bytes >= kilobytes.saturating_mul(BYTES_PER_KILOBYTE);
        }

        if !due {
            return Ok(None);
        }

        let archived = if log_file.exists() {
            Some(self.ledger.move_to_archive(log_file)?)
        } else {
            None
        };
        self.ledger.save_last_rotation(log_file, now)?;
        Ok(archived)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config)
            .field("format", &self.format)
            .field("paths", &self.paths)
            .field(
                "sinks",
                &self.sinks.iter().map(|sink| sink.format()).collect::<Vec<_>>(),
            )
            .field("echo", &self.echo)
            .finish_non_exhaustive()
    }
}

fn append_line(log_file: &Path, line: &str) -> LogitResult<()> {
    touch(log_file)?;

    let mut file = OpenOptions::new()
        .append(true)
        .open(log_file)
        .map_err(|e| LogitError::io("open", log_file, e))?;

    writeln!(file, "{line}").map_err(|e| LogitError::io("append to", log_file, e))
}
