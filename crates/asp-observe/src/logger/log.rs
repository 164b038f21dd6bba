use std::io;

use tracing::Subscriber;
use tracing_subscriber::{
    Layer, fmt, fmt::MakeWriter, layer::SubscriberExt, registry::LookupSpan,
    util::SubscriberInitExt,
};

use crate::logger::{
    config::LoggerConfig,
    error::{LoggerError, LoggerResult},
    object::LoggerRfc3339,
};

/// Sink for every log line. Stdout carries the invocation response.
pub(crate) fn log_writer() -> io::Stderr {
    io::stderr()
}

/// Initializes text logger.
pub(crate) fn logger_text(cfg: &LoggerConfig) -> LoggerResult<()> {
    let subscriber = tracing_subscriber::registry()
        .with(cfg.level.to_env_filter())
        .with(text_layer(cfg, log_writer));
    init_subscriber(subscriber)
}

/// Initializes JSON (structured) logger.
pub(crate) fn logger_json(cfg: &LoggerConfig) -> LoggerResult<()> {
    let subscriber = tracing_subscriber::registry()
        .with(cfg.level.to_env_filter())
        .with(json_layer(cfg, log_writer));
    init_subscriber(subscriber)
}

fn text_layer<S, W>(cfg: &LoggerConfig, writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_ansi(cfg.should_use_color())
        .with_target(cfg.with_targets)
        .with_timer(LoggerRfc3339::new(cfg.tz))
        .with_writer(writer)
}

fn json_layer<S, W>(cfg: &LoggerConfig, writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .json()
        .with_ansi(false)
        .with_current_span(true)
        .with_target(cfg.with_targets)
        .with_timer(LoggerRfc3339::new(cfg.tz))
        .with_writer(writer)
}

/// Installs the subscriber as the global default.
fn init_subscriber<S>(subscriber: S) -> LoggerResult<()>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::logger::object::LoggerFormat;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn plain_config(format: LoggerFormat) -> LoggerConfig {
        LoggerConfig {
            format,
            use_color: false,
            ..Default::default()
        }
    }

    #[test]
    fn log_lines_go_to_stderr() {
        let _: fn() -> io::Stderr = log_writer;
    }

    #[test]
    fn json_layer_writes_one_object_per_line_to_its_writer() {
        let capture = Capture::default();
        let sink = capture.clone();
        let cfg = plain_config(LoggerFormat::Json);

        let subscriber =
            tracing_subscriber::registry().with(json_layer(&cfg, move || sink.clone()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(slaves = 3, "scale request sent");
        });

        let out = capture.contents();
        let line: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(line["fields"]["message"], "scale request sent");
        assert_eq!(line["fields"]["slaves"], 3);
        assert_eq!(line["level"], "INFO");
    }

    #[test]
    fn text_layer_writes_to_its_writer() {
        let capture = Capture::default();
        let sink = capture.clone();
        let cfg = plain_config(LoggerFormat::Text);

        let subscriber =
            tracing_subscriber::registry().with(text_layer(&cfg, move || sink.clone()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("deadline too close to function timeout");
        });

        let out = capture.contents();
        assert!(out.contains("WARN"), "{out}");
        assert!(out.contains("deadline too close to function timeout"), "{out}");
    }

    #[test]
    fn second_init_reports_already_initialized() {
        let config = plain_config(LoggerFormat::Json);

        // Other tests in this binary may have installed a subscriber first.
        let _ = logger_json(&config);
        let again = logger_text(&config);
        assert!(matches!(again, Err(LoggerError::AlreadyInitialized)));
    }
}
