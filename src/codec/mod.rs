//! Encoding of chart definitions.
//!
//! JSON is the authoring format. The binary form is a compact bincode
//! encoding for hosts that load pre-compiled tables; it is prefixed with a
//! version so that incompatible tables are rejected instead of misread.
//!
//! Only definitions are encoded. Machine instances are never persisted.

use crate::builder::ChartDefinition;
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::CodecError;

/// Version identifier for the binary encoding
pub const ENCODING_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    definition: &'a ChartDefinition,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    definition: ChartDefinition,
}

/// Render a definition as pretty-printed JSON.
pub fn to_json(definition: &ChartDefinition) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(definition)?)
}

/// Parse a definition from JSON.
pub fn from_json(json: &str) -> Result<ChartDefinition, CodecError> {
    Ok(serde_json::from_str(json)?)
}

/// Encode a definition in the versioned binary format.
pub fn to_bytes(definition: &ChartDefinition) -> Result<Vec<u8>, CodecError> {
    let envelope = EnvelopeRef {
        version: ENCODING_VERSION,
        definition,
    };
    Ok(bincode::serialize(&envelope)?)
}

/// Decode a definition from the versioned binary format.
pub fn from_bytes(bytes: &[u8]) -> Result<ChartDefinition, CodecError> {
    // The version leads the envelope, so it can be read before the body.
    let version: u32 = bincode::deserialize(bytes)?;
    if version != ENCODING_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: version,
            supported: ENCODING_VERSION,
        });
    }

    let envelope: Envelope = bincode::deserialize(bytes)?;
    Ok(envelope.definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BranchDef, StateDef, TransitionBuilder};

    fn first_example() -> ChartDefinition {
        let go = TransitionBuilder::on("Go")
            .choice(vec![
                BranchDef::when("ready", "RUNNING").then("start"),
                BranchDef::otherwise("IDLE"),
            ])
            .build()
            .unwrap();
        let kill = TransitionBuilder::on("Kill").then("stop").to("IDLE").build().unwrap();
        let timeout = TransitionBuilder::on("Tick")
            .after(60_000)
            .then("stop")
            .to("IDLE")
            .build()
            .unwrap();

        ChartDefinition::new(
            "firstExample",
            StateDef::new("root")
                .child(StateDef::new("IDLE").transition(go))
                .child(StateDef::new("RUNNING").transition(kill).transition(timeout)),
        )
    }

    #[test]
    fn json_round_trip_preserves_definition() {
        let definition = first_example();
        let json = to_json(&definition).unwrap();

        assert_eq!(from_json(&json).unwrap(), definition);
    }

    #[test]
    fn binary_round_trip_preserves_definition() {
        let definition = first_example();
        let bytes = to_bytes(&definition).unwrap();

        assert_eq!(from_bytes(&bytes).unwrap(), definition);
    }

    #[test]
    fn binary_rejects_other_versions() {
        let definition = first_example();
        let bytes = bincode::serialize(&EnvelopeRef {
            version: ENCODING_VERSION + 1,
            definition: &definition,
        })
        .unwrap();

        let result = from_bytes(&bytes);
        assert!(matches!(
            result,
            Err(CodecError::UnsupportedVersion { found: 2, supported: 1 })
        ));
    }

    #[test]
    fn truncated_bytes_fail_to_decode() {
        let bytes = to_bytes(&first_example()).unwrap();
        let result = from_bytes(&bytes[..bytes.len() / 2]);

        assert!(matches!(result, Err(CodecError::Binary(_))));
    }

    #[test]
    fn empty_input_has_no_version_to_read() {
        assert!(matches!(from_bytes(&[]), Err(CodecError::Binary(_))));
    }

    #[test]
    fn malformed_json_is_reported() {
        let error = from_json(r#"{ "name": "x" }"#).unwrap_err();

        assert!(matches!(error, CodecError::Json(_)));
        let message = error.to_string();
        assert!(message.starts_with("Chart definition JSON is malformed"));
        assert!(message.contains("root"));
    }

    #[test]
    fn version_mismatch_names_both_versions() {
        let error = CodecError::UnsupportedVersion { found: 3, supported: ENCODING_VERSION };

        assert_eq!(
            error.to_string(),
            "Chart definition table has encoding version 3, expected 1"
        );
    }
}
