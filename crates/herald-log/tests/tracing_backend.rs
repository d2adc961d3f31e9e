use std::sync::Arc;

use herald_log::{
    ConsoleSink, ConsoleTarget, LOGGER_NAME, Level, LogFacade, LogFormat, LoggingConfig,
    TracingBackend,
};
use herald_test_support::fixtures::{JobFailed, Probe};
use serde_json::Value;

fn backend(format: LogFormat) -> Arc<TracingBackend> {
    let config = LoggingConfig {
        format,
        console: ConsoleTarget::Stderr,
        ansi: false,
    };
    Arc::new(TracingBackend::from_config(&config).expect("backend builds"))
}

#[test]
fn tagged_messages_reach_the_console_sink() {
    let backend = backend(LogFormat::Compact);
    let mut lines = backend.subscribe();
    let facade = LogFacade::with_backend(backend.clone());

    facade.debug_for::<Probe>("hello {0}", &[&"world"]);

    let line = lines.try_recv().expect("line rendered");
    assert!(line.contains("DEBUG"), "line: {line}");
    assert!(line.contains(LOGGER_NAME), "line: {line}");
    assert!(line.contains("Probe - hello world"), "line: {line}");
}

#[test]
fn json_sink_carries_exception_fields() -> anyhow::Result<()> {
    let backend = backend(LogFormat::Json);
    let mut lines = backend.subscribe();
    let facade = LogFacade::with_backend(backend.clone());

    facade.error_exception(&JobFailed {
        job: 3,
        source: std::io::Error::other("disk full"),
    });

    let record: Value = serde_json::from_str(&lines.try_recv()?)?;
    assert_eq!(record["level"], "ERROR");
    assert_eq!(record["target"], LOGGER_NAME);
    assert_eq!(record["fields"]["message"], "job 3 failed");
    assert_eq!(record["fields"]["exception_kind"], "JobFailed");
    assert!(
        record["fields"]["exception_sources"]
            .as_str()
            .is_some_and(|sources| sources.contains("disk full"))
    );
    Ok(())
}

#[test]
fn serialized_payload_is_not_reinterpreted() -> anyhow::Result<()> {
    let backend = backend(LogFormat::Json);
    let mut lines = backend.subscribe();
    let facade = LogFacade::with_backend(backend.clone());

    facade.log_serialized(&serde_json::json!({"slot": "{0}"}))?;

    let record: Value = serde_json::from_str(&lines.try_recv()?)?;
    assert_eq!(record["level"], "DEBUG");
    assert_eq!(record["fields"]["message"], r#"{"slot":"{0}"}"#);
    Ok(())
}

#[test]
fn builder_sink_matches_config() {
    let backend = backend(LogFormat::Pretty);
    assert_eq!(
        backend.sink(),
        &ConsoleSink {
            target: ConsoleTarget::Stderr,
            format: LogFormat::Pretty,
            ansi: false,
        }
    );
    assert_eq!(herald_log::LogBackend::min_level(backend.as_ref()), Level::Trace);
}
