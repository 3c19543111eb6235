//! Logger capability for structured logging
//!
//! Consumers hand a [`Logger`] to whatever code needs to report progress.
//! Each method takes a pre-formatted argument pack built with
//! [`format_args!`]; `debug` is optional and discards by default.

use std::fmt;
use std::sync::Arc;

/// Logger interface for structured logging.
///
/// `info`, `warn` and `error` are required; `debug` may be left out:
///
/// ```rust
/// use fhirkit_types::Logger;
/// use std::fmt;
///
/// struct Stderr;
///
/// impl Logger for Stderr {
///     fn info(&self, args: fmt::Arguments<'_>) {
///         eprintln!("INFO {}", args);
///     }
///     fn warn(&self, args: fmt::Arguments<'_>) {
///         eprintln!("WARN {}", args);
///     }
///     fn error(&self, args: fmt::Arguments<'_>) {
///         eprintln!("ERROR {}", args);
///     }
/// }
///
/// Stderr.info(format_args!("loaded {} packages", 3));
/// ```
///
/// A type without `error` is not a logger:
///
/// ```compile_fail
/// use fhirkit_types::Logger;
/// use std::fmt;
///
/// struct Partial;
///
/// impl Logger for Partial {
///     fn info(&self, _: fmt::Arguments<'_>) {}
///     fn warn(&self, _: fmt::Arguments<'_>) {}
/// }
/// ```
pub trait Logger {
    /// Log debug messages (optional)
    fn debug(&self, args: fmt::Arguments<'_>) {
        let _ = args;
    }

    /// Log informational messages
    fn info(&self, args: fmt::Arguments<'_>);

    /// Log warning messages
    fn warn(&self, args: fmt::Arguments<'_>);

    /// Log error messages
    fn error(&self, args: fmt::Arguments<'_>);
}

impl<L: Logger + ?Sized> Logger for &L {
    fn debug(&self, args: fmt::Arguments<'_>) {
        (**self).debug(args)
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        (**self).info(args)
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        (**self).warn(args)
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        (**self).error(args)
    }
}

impl<L: Logger + ?Sized> Logger for Box<L> {
    fn debug(&self, args: fmt::Arguments<'_>) {
        (**self).debug(args)
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        (**self).info(args)
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        (**self).warn(args)
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        (**self).error(args)
    }
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn debug(&self, args: fmt::Arguments<'_>) {
        (**self).debug(args)
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        (**self).info(args)
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        (**self).warn(args)
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        (**self).error(args)
    }
}

/// Logger that drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn info(&self, _args: fmt::Arguments<'_>) {}

    fn warn(&self, _args: fmt::Arguments<'_>) {}

    fn error(&self, _args: fmt::Arguments<'_>) {}
}

/// Logger that forwards to the `tracing` macros.
///
/// Every event carries a `component` field so messages from different
/// consumers can be told apart by the subscriber.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone)]
pub struct TracingLogger {
    component: std::borrow::Cow<'static, str>,
}

#[cfg(feature = "tracing")]
impl TracingLogger {
    pub fn new(component: impl Into<std::borrow::Cow<'static, str>>) -> Self {
        Self {
            component: component.into(),
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }
}

#[cfg(feature = "tracing")]
impl Default for TracingLogger {
    fn default() -> Self {
        Self::new("fhirkit")
    }
}

#[cfg(feature = "tracing")]
impl Logger for TracingLogger {
    fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(component = %self.component, "{}", args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(component = %self.component, "{}", args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(component = %self.component, "{}", args);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(component = %self.component, "{}", args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        lines: Mutex<Vec<String>>,
    }

    impl Recording {
        fn push(&self, level: &str, args: fmt::Arguments<'_>) {
            self.lines.lock().unwrap().push(format!("{level}: {args}"));
        }

        fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl Logger for Recording {
        fn info(&self, args: fmt::Arguments<'_>) {
            self.push("info", args);
        }

        fn warn(&self, args: fmt::Arguments<'_>) {
            self.push("warn", args);
        }

        fn error(&self, args: fmt::Arguments<'_>) {
            self.push("error", args);
        }
    }

    struct WithDebug(Recording);

    impl Logger for WithDebug {
        fn debug(&self, args: fmt::Arguments<'_>) {
            self.0.push("debug", args);
        }

        fn info(&self, args: fmt::Arguments<'_>) {
            self.0.info(args);
        }

        fn warn(&self, args: fmt::Arguments<'_>) {
            self.0.warn(args);
        }

        fn error(&self, args: fmt::Arguments<'_>) {
            self.0.error(args);
        }
    }

    fn report(logger: &dyn Logger) {
        logger.debug(format_args!("resolving {}", "hl7.fhir.r4.core"));
        logger.info(format_args!("loaded {} files", 2));
        logger.warn(format_args!("missing index"));
        logger.error(format_args!("failed: {}", "timeout"));
    }

    #[test]
    fn test_logger_without_debug_drops_debug() {
        let logger = Recording::default();
        report(&logger);
        assert_eq!(
            logger.lines(),
            vec!["info: loaded 2 files", "warn: missing index", "error: failed: timeout"]
        );
    }

    #[test]
    fn test_logger_with_debug() {
        let logger = WithDebug(Recording::default());
        report(&logger);
        assert_eq!(logger.0.lines().len(), 4);
        assert_eq!(logger.0.lines()[0], "debug: resolving hl7.fhir.r4.core");
    }

    #[test]
    fn test_smart_pointers_forward() {
        let shared = Arc::new(Recording::default());
        report(&shared);
        let boxed: Box<dyn Logger> = Box::new(NoopLogger);
        report(&boxed);
        assert_eq!(shared.lines().len(), 3);
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn test_tracing_logger_without_subscriber() {
        let logger = TracingLogger::new("package-loader");
        assert_eq!(logger.component(), "package-loader");
        assert_eq!(TracingLogger::default().component(), "fhirkit");
        report(&logger);
    }
}
