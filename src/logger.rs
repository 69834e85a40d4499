//! Pluggable logging capability.
//!
//! The client reports request activity through a [`Logger`] supplied at
//! construction. The default [`NoopLogger`] discards everything; use
//! [`LogLogger`] to forward to the `log` facade.

use std::fmt::{self, Display};

/// A structured key/value pair attached to a log message.
pub type Field<'a> = (&'a str, &'a dyn Display);

pub trait Logger: Send + Sync {
    fn debug(&self, message: &str, fields: &[Field<'_>]);
    fn info(&self, message: &str, fields: &[Field<'_>]);
    fn warn(&self, message: &str, fields: &[Field<'_>]);
    fn error(&self, message: &str, fields: &[Field<'_>]);
}

/// Discards all log calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _: &str, _: &[Field<'_>]) {}
    fn info(&self, _: &str, _: &[Field<'_>]) {}
    fn warn(&self, _: &str, _: &[Field<'_>]) {}
    fn error(&self, _: &str, _: &[Field<'_>]) {}
}

/// Forwards to the `log` crate under the `helius` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLogger;

impl LogLogger {
    fn emit(level: log::Level, message: &str, fields: &[Field<'_>]) {
        log::log!(target: "helius", level, "{}{}", message, Fields(fields));
    }
}

impl Logger for LogLogger {
    fn debug(&self, message: &str, fields: &[Field<'_>]) {
        Self::emit(log::Level::Debug, message, fields);
    }

    fn info(&self, message: &str, fields: &[Field<'_>]) {
        Self::emit(log::Level::Info, message, fields);
    }

    fn warn(&self, message: &str, fields: &[Field<'_>]) {
        Self::emit(log::Level::Warn, message, fields);
    }

    fn error(&self, message: &str, fields: &[Field<'_>]) {
        Self::emit(log::Level::Error, message, fields);
    }
}

/// Renders fields as ` key=value key=value`.
pub(crate) struct Fields<'a, 'b>(pub &'a [Field<'b>]);

impl Display for Fields<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.0 {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}
