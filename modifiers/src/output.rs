//! Output sinks for modifier reporting.
//!
//! A modifier holds an ordered list of sinks. Reporting a message feeds it
//! through each sink in turn, each sink receiving the possibly-transformed
//! text returned by the previous one. The default configuration is a single
//! sink that prints to standard output and returns its input unchanged.

use serde::{Deserialize, Serialize};

/// A single output channel in a modifier's reporting chain.
pub trait OutputSink {
    /// Consume the text and return what the next sink in the chain should see.
    fn process(&self, text: &str) -> String;
}

/// Closed set of configurable sinks, keyed by the `type` discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnyOutput {
    #[serde(rename = "stdout")]
    Stdout(StandardOutput),
}

impl OutputSink for AnyOutput {
    fn process(&self, text: &str) -> String {
        match self {
            AnyOutput::Stdout(sink) => sink.process(text),
        }
    }
}

/// Writes the text to standard output and passes it through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardOutput {}

impl OutputSink for StandardOutput {
    fn process(&self, text: &str) -> String {
        println!("{text}");
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_output_returns_text_unchanged() {
        let sink = StandardOutput::default();
        assert_eq!(sink.process("hello"), "hello");
    }

    #[test]
    fn any_output_delegates_to_stdout() {
        let sink = AnyOutput::Stdout(StandardOutput::default());
        assert_eq!(sink.process("message"), "message");
    }

    #[test]
    fn stdout_sink_deserializes_from_type_tag() {
        let sink: AnyOutput = serde_json::from_str(r#"{"type": "stdout"}"#).unwrap();
        assert_eq!(sink, AnyOutput::Stdout(StandardOutput::default()));
    }

    #[test]
    fn unknown_sink_type_is_rejected() {
        let result: Result<AnyOutput, _> = serde_json::from_str(r#"{"type": "carrier-pigeon"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn stdout_sink_serializes_with_type_tag() {
        let json = serde_json::to_string(&AnyOutput::Stdout(StandardOutput::default())).unwrap();
        assert!(json.contains("stdout"));
    }
}
