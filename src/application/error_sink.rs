//! The single error exit path shared by `create` and `generate`

use std::sync::Arc;

use serde_json::Value;
use tracing::error;

use crate::application::{Console, EventProperties, Telemetry};
use crate::core::error::Error;

pub const ERROR_EVENT: &str = "Error";

/// Prints a failed flow's error block and reports it to telemetry.
///
/// The caller terminates the process with a non-zero status afterwards; there
/// is no retry and nothing already created is rolled back.
pub struct ErrorReporter {
    telemetry: Arc<dyn Telemetry>,
    console: Arc<dyn Console>,
}

impl ErrorReporter {
    pub fn new(telemetry: Arc<dyn Telemetry>, console: Arc<dyn Console>) -> Self {
        Self { telemetry, console }
    }

    pub async fn report(&self, err: &Error, context: EventProperties) {
        error!(kind = %err.kind(), error = %err, "Command failed");

        let lines = err.lines();
        self.console.error_block(&lines);

        let mut properties = EventProperties::new();
        properties.insert("error".into(), Value::String(lines.join("\n")));
        properties.insert("kind".into(), Value::String(err.kind().to_string()));
        properties.extend(context);
        self.telemetry.event(ERROR_EVENT, properties).await;

        self.console.help_pointers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{RecordingConsole, RecordingTelemetry};
    use serde_json::json;

    #[tokio::test]
    async fn test_report_prints_block_and_sends_one_event() {
        let telemetry = Arc::new(RecordingTelemetry::default());
        let console = Arc::new(RecordingConsole::default());
        let reporter = ErrorReporter::new(telemetry.clone(), console.clone());

        let mut context = EventProperties::new();
        context.insert("projectName".into(), json!("hello-world"));
        context.insert("dbType".into(), Value::Null);
        reporter.report(&Error::MissingDbType, context).await;

        assert_eq!(console.errors(), Error::MissingDbType.lines());
        assert!(console.help_shown());

        let events = telemetry.events();
        assert_eq!(events.len(), 1);
        let (name, properties) = &events[0];
        assert_eq!(name, ERROR_EVENT);
        assert!(
            properties["error"]
                .as_str()
                .unwrap()
                .starts_with("You must pass an application name")
        );
        assert_eq!(properties["kind"], "user_input");
        assert_eq!(properties["projectName"], "hello-world");
    }

    #[tokio::test]
    async fn test_report_external_error_uses_raw_text() {
        let telemetry = Arc::new(RecordingTelemetry::default());
        let console = Arc::new(RecordingConsole::default());
        let reporter = ErrorReporter::new(telemetry.clone(), console.clone());

        let err = Error::CommandFailed {
            command: "npm install --save @cubejs-backend/server".to_string(),
            exit_code: 254,
        };
        reporter.report(&err, EventProperties::new()).await;

        assert_eq!(console.errors(), vec![err.to_string()]);
        assert_eq!(telemetry.events()[0].1["kind"], "external");
    }
}
