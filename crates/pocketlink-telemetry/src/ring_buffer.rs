use jiff::Timestamp;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Number of entries kept when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<&Level> for LogLevel {
    fn from(level: &Level) -> Self {
        match *level {
            Level::ERROR => LogLevel::Error,
            Level::WARN => LogLevel::Warn,
            Level::INFO => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.pad(s)
    }
}

/// One captured diagnostic event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub timestamp: Timestamp,
    pub level: LogLevel,
    /// The `component` field of the event, or its target when absent.
    pub component: String,
    pub message: String,
    pub fields: BTreeMap<String, String>,
}

struct Inner {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
    min_level: Mutex<LogLevel>,
}

/// Bounded, shared log of the most recent events.
///
/// Clones share the same storage. Once full, each new entry evicts the
/// oldest one.
#[derive(Clone)]
pub struct LogBuffer {
    inner: Arc<Inner>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(VecDeque::with_capacity(capacity)),
                capacity,
                min_level: Mutex::new(LogLevel::Debug),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Entries below `level` are dropped from now on.
    pub fn set_min_level(&self, level: LogLevel) {
        *self.inner.min_level.lock() = level;
    }

    pub fn push(&self, entry: LogEntry) {
        if entry.level < *self.inner.min_level.lock() || self.inner.capacity == 0 {
            return;
        }

        let mut entries = self.inner.entries.lock();
        while entries.len() >= self.inner.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Snapshot of the buffered entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.inner.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.entries.lock().clear();
    }

    /// A `tracing` layer feeding this buffer.
    pub fn layer(&self) -> RingBufferLayer {
        RingBufferLayer {
            buffer: self.clone(),
        }
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for LogBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogBuffer")
            .field("len", &self.len())
            .field("capacity", &self.inner.capacity)
            .finish()
    }
}

/// Layer that copies every event into a [`LogBuffer`].
#[derive(Debug, Clone)]
pub struct RingBufferLayer {
    buffer: LogBuffer,
}

impl<S: Subscriber> Layer<S> for RingBufferLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);

        self.buffer.push(LogEntry {
            timestamp: Timestamp::now(),
            level: LogLevel::from(metadata.level()),
            component: visitor
                .component
                .unwrap_or_else(|| metadata.target().to_string()),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    component: Option<String>,
    fields: BTreeMap<String, String>,
}

impl FieldCollector {
    fn store(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            "component" => self.component = Some(value),
            name => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.store(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.store(field, format!("{value:?}"));
    }
}
