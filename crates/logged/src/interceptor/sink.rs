use std::error::Error as StdError;
use std::fmt::Write;

use crate::context;
use crate::converter::Value;
use crate::interceptor::Level;

/// A log record produced by the interceptor.
#[derive(Clone, Copy)]
pub struct Record<'a> {
    pub logger: &'a str,
    pub level: Level,
    /// Message with one `{}` placeholder per argument.
    pub message: &'a str,
    pub arguments: &'a [Value],
    pub cause: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Record<'a> {
    pub fn new(logger: &'a str, level: Level, message: &'a str, arguments: &'a [Value]) -> Self {
        Self {
            logger,
            level,
            message,
            arguments,
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: &'a (dyn StdError + 'static)) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Substitutes the `{}` placeholders with the arguments, left to right. Surplus arguments
    /// are dropped and surplus placeholders are kept as is.
    pub fn formatted(&self) -> String {
        let mut out = String::with_capacity(self.message.len());
        let mut arguments = self.arguments.iter();
        let mut rest = self.message;

        while let Some(position) = rest.find("{}") {
            out.push_str(&rest[..position]);
            match arguments.next() {
                Some(argument) => {
                    let _ = write!(out, "{}", argument);
                },
                None => out.push_str("{}"),
            }
            rest = &rest[position + 2..];
        }
        out.push_str(rest);

        out
    }
}

/// Destination of the records. Level gating is delegated to the sink.
pub trait LogSink: Send + Sync {
    fn is_enabled(&self, logger: &str, level: Level) -> bool;

    fn log(&self, record: &Record<'_>);
}

fn render_context() -> String {
    let entries = context::snapshot();
    if entries.is_empty() {
        return String::new();
    }

    let mut out = String::from(" [");
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{}={}", key, value);
    }
    out.push(']');

    out
}

/// Writes records through the `log` facade, using the logger identity as target and
/// appending the diagnostic context.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacadeSink;

impl LogSink for LogFacadeSink {
    fn is_enabled(&self, logger: &str, level: Level) -> bool {
        level.as_log().is_some_and(|level| log::log_enabled!(target: logger, level))
    }

    fn log(&self, record: &Record<'_>) {
        let Some(level) = record.level.as_log() else { return };

        match record.cause {
            Some(cause) => log::log!(target: record.logger, level, "{}: {}{}", record.formatted(), cause, render_context()),
            None => log::log!(target: record.logger, level, "{}{}", record.formatted(), render_context()),
        }
    }
}

/// Writes records as `tracing` events. The logger identity and the diagnostic context are
/// carried as fields since tracing targets are static.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn is_enabled(&self, _logger: &str, level: Level) -> bool {
        match level {
            Level::Off => false,
            Level::Trace => tracing::enabled!(tracing::Level::TRACE),
            Level::Debug => tracing::enabled!(tracing::Level::DEBUG),
            Level::Info => tracing::enabled!(tracing::Level::INFO),
            Level::Warn => tracing::enabled!(tracing::Level::WARN),
            Level::Error => tracing::enabled!(tracing::Level::ERROR),
        }
    }

    fn log(&self, record: &Record<'_>) {
        let message = record.formatted();
        let context = serde_json::to_string(&context::snapshot()).unwrap_or_default();
        let cause = record.cause.map(|x| x.to_string());
        let cause = cause.as_deref();

        match record.level {
            Level::Off => {},
            Level::Trace => tracing::trace!(logger = record.logger, context = %context, cause, "{}", message),
            Level::Debug => tracing::debug!(logger = record.logger, context = %context, cause, "{}", message),
            Level::Info => tracing::info!(logger = record.logger, context = %context, cause, "{}", message),
            Level::Warn => tracing::warn!(logger = record.logger, context = %context, cause, "{}", message),
            Level::Error => tracing::error!(logger = record.logger, context = %context, cause, "{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod formatted {
        use super::*;

        #[test]
        fn should_substitute_placeholders_in_order() {
            let arguments = [Value::from("a"), Value::Int(2)];
            let record = Record::new("foo", Level::Info, "do the thing {} {}", &arguments);

            assert_eq!(record.formatted(), "do the thing a 2");
        }

        #[test]
        fn should_keep_surplus_placeholders() {
            let arguments = [Value::from("a")];
            let record = Record::new("foo", Level::Info, "{} and {}", &arguments);

            assert_eq!(record.formatted(), "a and {}");
        }

        #[test]
        fn should_drop_surplus_arguments() {
            let arguments = [Value::from("a"), Value::from("b")];
            let record = Record::new("foo", Level::Info, "only {}", &arguments);

            assert_eq!(record.formatted(), "only a");
        }

        #[test]
        fn should_render_message_without_placeholders_as_is() {
            let record = Record::new("foo", Level::Info, "failed", &[]);

            assert_eq!(record.formatted(), "failed");
        }
    }

    mod context_suffix {
        use super::*;
        use crate::context::ContextScope;

        #[test]
        fn should_be_empty_without_context() {
            assert_eq!(render_context(), "");
        }

        #[test]
        fn should_list_entries_sorted_by_key() {
            let mut scope = ContextScope::enter();
            scope.put("user", "alice");
            scope.put("request-id", "42");

            assert_eq!(render_context(), " [request-id=42, user=alice]");
        }
    }

    mod log_facade {
        use std::sync::{Mutex, Once};

        use super::*;
        use crate::context::ContextScope;

        const QUIET: &str = "sink::quiet";

        /// Keeps every record except those targeting [`QUIET`].
        struct CapturingLogger;

        static LOGGER: CapturingLogger = CapturingLogger;
        static INSTALL: Once = Once::new();
        static CAPTURED: Mutex<Vec<(String, log::Level, String)>> = Mutex::new(Vec::new());

        impl log::Log for CapturingLogger {
            fn enabled(&self, metadata: &log::Metadata) -> bool {
                metadata.target() != QUIET
            }

            fn log(&self, record: &log::Record) {
                if self.enabled(record.metadata()) {
                    CAPTURED
                        .lock()
                        .unwrap()
                        .push((record.target().to_string(), record.level(), record.args().to_string()));
                }
            }

            fn flush(&self) {}
        }

        /// Records written for `target`. Tests use distinct targets since the logger is global.
        fn captured(target: &str) -> Vec<(log::Level, String)> {
            INSTALL.call_once(|| {
                log::set_logger(&LOGGER).unwrap();
                log::set_max_level(log::LevelFilter::Trace);
            });

            CAPTURED
                .lock()
                .unwrap()
                .iter()
                .filter(|(x, _, _)| x == target)
                .map(|(_, level, message)| (*level, message.clone()))
                .collect()
        }

        #[test]
        fn should_write_to_logger_target_with_context() {
            // Given
            captured("shop::Orders");
            let mut scope = ContextScope::enter();
            scope.put("request-id", "42");
            let arguments = [Value::from("book")];

            // When
            LogFacadeSink.log(&Record::new("shop::Orders", Level::Warn, "place order {}", &arguments));

            // Then
            assert_eq!(captured("shop::Orders"), vec![(log::Level::Warn, "place order book [request-id=42]".to_string())]);
        }

        #[test]
        fn should_append_cause() {
            captured("shop::Payments");
            let cause = std::io::Error::new(std::io::ErrorKind::Other, "card declined");

            LogFacadeSink.log(&Record::new("shop::Payments", Level::Error, "failed", &[]).with_cause(&cause));

            assert_eq!(captured("shop::Payments"), vec![(log::Level::Error, "failed: card declined".to_string())]);
        }

        #[test]
        fn should_map_every_level() {
            captured("shop::Levels");

            for level in [Level::Trace, Level::Debug, Level::Info, Level::Warn, Level::Error] {
                LogFacadeSink.log(&Record::new("shop::Levels", level, "message", &[]));
            }

            let levels: Vec<_> = captured("shop::Levels").into_iter().map(|(x, _)| x).collect();
            assert_eq!(
                levels,
                vec![log::Level::Trace, log::Level::Debug, log::Level::Info, log::Level::Warn, log::Level::Error]
            );
        }

        #[test]
        fn should_never_write_off() {
            captured("shop::Off");

            LogFacadeSink.log(&Record::new("shop::Off", Level::Off, "message", &[]));

            assert!(captured("shop::Off").is_empty());
            assert!(!LogFacadeSink.is_enabled("shop::Off", Level::Off));
        }

        #[test]
        fn should_ask_logger_whether_target_is_enabled() {
            captured(QUIET);

            assert!(LogFacadeSink.is_enabled("shop::Orders", Level::Debug));
            assert!(!LogFacadeSink.is_enabled(QUIET, Level::Error));
        }
    }

    mod tracing_events {
        use std::io;
        use std::sync::{Arc, Mutex};

        use super::*;
        use crate::context::ContextScope;

        #[derive(Clone, Default)]
        struct Buffer(Arc<Mutex<Vec<u8>>>);

        impl Buffer {
            fn contents(&self) -> String {
                String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
            }
        }

        impl io::Write for Buffer {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        fn capture(f: impl FnOnce()) -> String {
            let buffer = Buffer::default();
            let writer = buffer.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(move || writer.clone())
                .with_ansi(false)
                .with_max_level(tracing::Level::TRACE)
                .finish();

            tracing::subscriber::with_default(subscriber, f);
            buffer.contents()
        }

        #[test]
        fn should_carry_logger_and_context_as_fields() {
            let output = capture(|| {
                let mut scope = ContextScope::enter();
                scope.put("request-id", "42");
                let arguments = [Value::from("book")];

                TracingSink.log(&Record::new("shop::Orders", Level::Info, "place order {}", &arguments));
            });

            assert!(output.contains("INFO"));
            assert!(output.contains("place order book"));
            assert!(output.contains("shop::Orders"));
            assert!(output.contains(r#"{"request-id":"42"}"#));
        }

        #[test]
        fn should_carry_cause_as_field() {
            let output = capture(|| {
                let cause = std::io::Error::new(std::io::ErrorKind::Other, "card declined");
                TracingSink.log(&Record::new("shop::Payments", Level::Error, "failed", &[]).with_cause(&cause));
            });

            assert!(output.contains("ERROR"));
            assert!(output.contains("failed"));
            assert!(output.contains("card declined"));
        }

        #[test]
        fn should_map_every_level() {
            let output = capture(|| {
                for level in [Level::Trace, Level::Debug, Level::Info, Level::Warn, Level::Error] {
                    TracingSink.log(&Record::new("shop::Levels", level, "message", &[]));
                }
            });

            let lines: Vec<_> = output.lines().collect();
            assert_eq!(lines.len(), 5);
            for (line, level) in lines.iter().zip(["TRACE", "DEBUG", "INFO", "WARN", "ERROR"]) {
                assert!(line.contains(level), "{} should be at {}", line, level);
            }
        }

        #[test]
        fn should_never_write_off() {
            let mut enabled = true;
            let output = capture(|| {
                enabled = TracingSink.is_enabled("shop::Off", Level::Off);
                TracingSink.log(&Record::new("shop::Off", Level::Off, "message", &[]));
            });

            assert!(!enabled);
            assert!(output.is_empty());
        }

        #[test]
        fn should_be_enabled_when_subscriber_accepts_level() {
            let mut enabled = false;
            capture(|| enabled = TracingSink.is_enabled("shop::Orders", Level::Trace));

            assert!(enabled);
        }
    }
}
