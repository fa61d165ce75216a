//! Named loggers used throughout the crate.
//!
//! Every component logs through a [`Logger`] carrying its own name and threshold. The default
//! handler forwards records to the [`log`] facade (target = logger name), so host applications
//! pick them up with whatever `log` backend they already install. A user handler can be
//! registered on top of that with [`set_user_log_handler`].

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, LazyLock, Mutex, RwLock, Weak};

static GLOBAL_LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static INSTANCES: LazyLock<Mutex<Vec<Weak<LoggerInner>>>> =
    LazyLock::new(|| Mutex::new(Vec::new()));

type SharedLogHandler = Arc<dyn Fn(&Logger, LogLevel, &str) + Send + Sync + 'static>;

#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    pub fn new(name: impl Into<String>) -> Self {
        let inner = Arc::new(LoggerInner::new(name.into()));
        track_instance(&inner);
        Self { inner }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_u8(self.inner.log_level.load(Ordering::SeqCst))
    }

    pub fn set_log_level<L>(&self, level: L) -> Result<(), LogError>
    where
        L: IntoLogLevel,
    {
        let level = level.into_log_level()?;
        self.inner.log_level.store(level as u8, Ordering::SeqCst);
        Ok(())
    }

    /// Replaces the handler that receives every record of this logger.
    pub fn set_log_handler<F>(&self, handler: F)
    where
        F: Fn(&Logger, LogLevel, &str) + Send + Sync + 'static,
    {
        *self.inner.log_handler.write().unwrap() = Arc::new(handler);
    }

    pub fn reset_log_handler(&self) {
        *self.inner.log_handler.write().unwrap() = Arc::new(forward_to_log_facade);
    }

    pub fn has_user_log_handler(&self) -> bool {
        self.inner.user_log_handler.read().unwrap().is_some()
    }

    fn set_user_handler(&self, handler: Option<SharedLogHandler>) {
        *self.inner.user_log_handler.write().unwrap() = handler;
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.dispatch(LogLevel::Debug, message);
    }

    pub fn log(&self, message: impl fmt::Display) {
        self.dispatch(LogLevel::Verbose, message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.dispatch(LogLevel::Info, message);
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.dispatch(LogLevel::Warn, message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.dispatch(LogLevel::Error, message);
    }

    fn dispatch(&self, level: LogLevel, message: impl fmt::Display) {
        let message = message.to_string();
        let user_handler = self.inner.user_log_handler.read().unwrap().clone();
        if let Some(handler) = user_handler {
            handler(self, level, &message);
        }
        let handler = self.inner.log_handler.read().unwrap().clone();
        handler(self, level, &message);
    }

    fn from_inner(inner: Arc<LoggerInner>) -> Self {
        Self { inner }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.inner.name)
            .field("level", &self.log_level())
            .finish()
    }
}

struct LoggerInner {
    name: String,
    log_level: AtomicU8,
    log_handler: RwLock<SharedLogHandler>,
    user_log_handler: RwLock<Option<SharedLogHandler>>,
}

impl LoggerInner {
    fn new(name: String) -> Self {
        let level = GLOBAL_LOG_LEVEL.load(Ordering::SeqCst);
        Self {
            name,
            log_level: AtomicU8::new(level),
            log_handler: RwLock::new(Arc::new(forward_to_log_facade)),
            user_log_handler: RwLock::new(None),
        }
    }
}

fn track_instance(inner: &Arc<LoggerInner>) {
    INSTANCES.lock().unwrap().push(Arc::downgrade(inner));
}

fn forward_to_log_facade(logger: &Logger, level: LogLevel, message: &str) {
    if level < logger.log_level() {
        return;
    }

    let facade_level = match level {
        LogLevel::Debug => log::Level::Debug,
        LogLevel::Verbose => log::Level::Trace,
        LogLevel::Info => log::Level::Info,
        LogLevel::Warn => log::Level::Warn,
        LogLevel::Error => log::Level::Error,
        LogLevel::Silent => return,
    };
    log::log!(target: logger.name(), facade_level, "{message}");
}

fn with_instances<F>(mut f: F)
where
    F: FnMut(Logger),
{
    let mut instances = INSTANCES.lock().unwrap();
    let mut i = 0;
    while i < instances.len() {
        match instances[i].upgrade() {
            Some(inner) => {
                f(Logger::from_inner(inner));
                i += 1;
            }
            None => {
                instances.swap_remove(i);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    Verbose = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Silent = 5,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Verbose => "verbose",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Silent => "silent",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Debug,
            1 => LogLevel::Verbose,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Silent,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "verbose" | "trace" => Ok(LogLevel::Verbose),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "silent" | "off" => Ok(LogLevel::Silent),
            other => Err(LogError::InvalidLogLevel(other.to_string())),
        }
    }
}

pub trait IntoLogLevel {
    fn into_log_level(self) -> Result<LogLevel, LogError>;
}

impl IntoLogLevel for LogLevel {
    fn into_log_level(self) -> Result<LogLevel, LogError> {
        Ok(self)
    }
}

impl IntoLogLevel for &str {
    fn into_log_level(self) -> Result<LogLevel, LogError> {
        LogLevel::from_str(self)
    }
}

impl IntoLogLevel for String {
    fn into_log_level(self) -> Result<LogLevel, LogError> {
        LogLevel::from_str(&self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub level: Option<LogLevel>,
}

/// Record handed to callbacks registered through [`set_user_log_handler`].
#[derive(Debug, Clone)]
pub struct LogCallbackParams {
    pub level: LogLevel,
    pub message: String,
    pub logger_type: String,
}

pub type LogCallback = Arc<dyn Fn(LogCallbackParams) + Send + Sync + 'static>;

#[derive(Debug, Clone)]
pub enum LogError {
    InvalidLogLevel(String),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::InvalidLogLevel(level) => {
                write!(f, "Invalid value \"{level}\" assigned to `logLevel`")
            }
        }
    }
}

impl std::error::Error for LogError {}

/// Sets the threshold of every existing logger and of loggers created afterwards.
pub fn set_log_level<L>(level: L) -> Result<(), LogError>
where
    L: IntoLogLevel,
{
    let level = level.into_log_level()?;
    GLOBAL_LOG_LEVEL.store(level as u8, Ordering::SeqCst);
    with_instances(|logger| {
        let _ = logger.set_log_level(level);
    });
    Ok(())
}

/// Installs (or removes, with `None`) a callback receiving the records of every logger.
pub fn set_user_log_handler(callback: Option<LogCallback>, options: Option<LogOptions>) {
    let options = options.unwrap_or_default();

    match callback {
        Some(cb) => {
            let custom_level = options.level;
            with_instances(|logger| {
                let handler_cb = Arc::clone(&cb);
                let handler: SharedLogHandler =
                    Arc::new(move |instance: &Logger, level, message: &str| {
                        let threshold = custom_level.unwrap_or_else(|| instance.log_level());
                        if level < threshold {
                            return;
                        }
                        handler_cb(LogCallbackParams {
                            level,
                            message: message.to_owned(),
                            logger_type: instance.name().to_owned(),
                        });
                    });
                logger.set_user_handler(Some(handler));
            });
        }
        None => {
            with_instances(|logger| logger.set_user_handler(None));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    static TEST_GUARD: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

    fn reset_logging() {
        set_log_level(LogLevel::Info).unwrap();
        set_user_log_handler(None, None);
    }

    fn recording_logger(name: &str) -> (Logger, Arc<Mutex<Vec<(LogLevel, String)>>>) {
        let logger = Logger::new(name);
        let records = Arc::new(Mutex::new(Vec::new()));
        let handler_records = Arc::clone(&records);
        logger.set_log_handler(move |instance, level, message| {
            if level < instance.log_level() {
                return;
            }
            handler_records
                .lock()
                .unwrap()
                .push((level, message.to_owned()));
        });
        (logger, records)
    }

    #[test]
    fn records_respect_global_level() {
        let _guard = TEST_GUARD.lock().unwrap();
        reset_logging();
        let (logger, records) = recording_logger("@twitch-login/level-test");

        set_log_level("warn").unwrap();
        logger.debug("debug message");
        logger.info("info message");
        logger.warn("warn message");
        logger.error("error message");

        let stored = records.lock().unwrap();
        let levels: Vec<_> = stored.iter().map(|(level, _)| *level).collect();
        assert_eq!(levels, [LogLevel::Warn, LogLevel::Error]);
        assert_eq!(stored[0].1, "warn message");
        reset_logging();
    }

    #[test]
    fn unknown_level_is_rejected() {
        let err = LogLevel::from_str("chatty").unwrap_err();
        assert!(err.to_string().contains("chatty"));
    }

    #[test]
    fn user_handler_respects_custom_level() {
        let _guard = TEST_GUARD.lock().unwrap();
        reset_logging();
        let logger = Logger::new("@twitch-login/user-handler-test");
        let logger_name = logger.name().to_owned();

        let captured = Arc::new(Mutex::new(Vec::new()));
        let captured_cb = Arc::clone(&captured);
        set_user_log_handler(
            Some(Arc::new(move |params: LogCallbackParams| {
                if params.logger_type == logger_name {
                    captured_cb
                        .lock()
                        .unwrap()
                        .push((params.level, params.message));
                }
            })),
            Some(LogOptions {
                level: Some(LogLevel::Warn),
            }),
        );

        assert!(logger.has_user_log_handler());
        logger.info("ignored");
        logger.warn("popup is slow");

        let records = captured.lock().unwrap().clone();
        assert_eq!(records, vec![(LogLevel::Warn, "popup is slow".to_string())]);
        reset_logging();
        assert!(!logger.has_user_log_handler());
    }
}
