//! Structured logging with session context.
//!
//! Every record carries the session id, an optional component name and a
//! UTC timestamp. Records are built fluently and written on [`LogBuilder::emit`]:
//!
//! ```rust,ignore
//! logger.debug("item added").field("id", 7).field("new_line", true).emit();
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::SessionId;

/// Severity of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn label(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// How records are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// `HH:MM:SS LEVEL component: message key=value ...`
    #[default]
    Human,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "human" | "text" => Ok(Self::Human),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

/// One structured log record.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    #[serde(serialize_with = "serialize_ts")]
    pub ts: DateTime<Utc>,
    pub level: LogLevel,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    pub message: String,
    /// Caller fields, nested so they never shadow `ts`, `level` or `message`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
}

impl LogRecord {
    /// Render as a single JSON line.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Render for a terminal. String fields are printed unquoted.
    pub fn to_human(&self) -> String {
        let mut out = format!(
            "{} {:<5} ",
            self.ts.format("%H:%M:%S"),
            self.level.label().to_ascii_uppercase()
        );
        if let Some(component) = &self.component {
            out.push_str(component);
            out.push_str(": ");
        }
        out.push_str(&self.message);

        for (key, value) in &self.fields {
            match value {
                Value::String(s) => out.push_str(&format!(" {}={}", key, s)),
                other => out.push_str(&format!(" {}={}", key, other)),
            }
        }
        out
    }

    fn render(&self, format: LogFormat) -> String {
        match format {
            LogFormat::Json => self.to_json(),
            LogFormat::Human => self.to_human(),
        }
    }
}

/// Lines kept by a capturing logger.
#[derive(Debug, Clone, Default)]
pub struct CapturedLines(Arc<Mutex<Vec<String>>>);

impl CapturedLines {
    /// Copy of every line written so far.
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Whether any line contains every one of `needles`.
    pub fn contains_all(&self, needles: &[&str]) -> bool {
        self.lines()
            .iter()
            .any(|line| needles.iter().all(|n| line.contains(n)))
    }

    fn push(&self, line: String) {
        if let Ok(mut lines) = self.0.lock() {
            lines.push(line);
        }
    }
}

#[derive(Debug, Clone, Default)]
enum Sink {
    #[default]
    Stderr,
    Capture(CapturedLines),
}

/// Structured logger bound to one session.
///
/// Clones share the session id and sink.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    session_id: SessionId,
    component: Option<String>,
    min_level: LogLevel,
    format: LogFormat,
    sink: Sink,
}

impl StructuredLogger {
    /// Human-format logger at `info` writing to stderr.
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            component: None,
            min_level: LogLevel::Info,
            format: LogFormat::Human,
            sink: Sink::Stderr,
        }
    }

    /// Logger that only lets errors through.
    pub fn quiet() -> Self {
        Self::new(SessionId::named("quiet")).with_min_level(LogLevel::Error)
    }

    /// Logger that records every level in memory instead of writing to stderr.
    pub fn capturing(session_id: SessionId) -> (Self, CapturedLines) {
        let lines = CapturedLines::default();
        let mut logger = Self::new(session_id).with_min_level(LogLevel::Trace);
        logger.sink = Sink::Capture(lines.clone());
        (logger, lines)
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Start a record at `level`.
    pub fn at(&self, level: LogLevel, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder {
            logger: self,
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn debug(&self, message: impl Into<String>) -> LogBuilder<'_> {
        self.at(LogLevel::Debug, message)
    }

    pub fn info(&self, message: impl Into<String>) -> LogBuilder<'_> {
        self.at(LogLevel::Info, message)
    }

    pub fn warn(&self, message: impl Into<String>) -> LogBuilder<'_> {
        self.at(LogLevel::Warn, message)
    }

    pub fn error(&self, message: impl Into<String>) -> LogBuilder<'_> {
        self.at(LogLevel::Error, message)
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Whether records at `level` would be written.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn write(&self, level: LogLevel, message: String, fields: BTreeMap<String, Value>) {
        if !self.enabled(level) {
            return;
        }

        let record = LogRecord {
            ts: Utc::now(),
            level,
            session_id: self.session_id.to_string(),
            component: self.component.clone(),
            message,
            fields,
        };
        let line = record.render(self.format);

        match &self.sink {
            Sink::Stderr => eprintln!("{}", line),
            Sink::Capture(lines) => lines.push(line),
        }
    }
}

/// A record under construction. Nothing is written until [`emit`](Self::emit).
#[must_use = "log records are only written by .emit()"]
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    level: LogLevel,
    message: String,
    fields: BTreeMap<String, Value>,
}

impl LogBuilder<'_> {
    /// Attach a field. Anything convertible to a JSON value works.
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Attach a field rendered with `Display` (errors, ids, enums).
    pub fn display(self, key: &str, value: impl fmt::Display) -> Self {
        self.field(key, value.to_string())
    }

    pub fn emit(self) {
        self.logger.write(self.level, self.message, self.fields);
    }
}

fn serialize_ts<S: serde::Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}
