//! Text encodings of a [`RootAssembly`].
//!
//! - `json`: envelopes keep opaque base64 payloads.
//! - `expanded`: envelopes are decoded into typed JSON through a
//!   [`CodecRegistry`], recursively.

use std::fmt;
use std::str::FromStr;

use crate::assembly::RootAssembly;
use crate::codec::{CodecRegistry, with_expansion};
use crate::error::{ConfigError, ConfigResult};

/// Selects the text encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextFormat {
    #[default]
    Json,
    Expanded,
}

impl FromStr for TextFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" | "jsonpb" => Ok(Self::Json),
            "expanded" | "v2jsonpb" => Ok(Self::Expanded),
            other => Err(ConfigError::parse(format!("unknown text format '{other}'"))),
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Expanded => f.write_str("expanded"),
        }
    }
}

/// Renders `assembly` as pretty-printed JSON.
pub fn dump(
    assembly: &RootAssembly,
    format: TextFormat,
    codecs: &CodecRegistry,
) -> ConfigResult<String> {
    match format {
        TextFormat::Json => {
            assembly.verify(codecs)?;
            serde_json::to_string_pretty(assembly)
                .map_err(|e| ConfigError::codec("ingot.core.Config", e))
        }
        TextFormat::Expanded => {
            let (result, failure) =
                with_expansion(codecs, || serde_json::to_string_pretty(assembly));
            result.map_err(|e| failure.unwrap_or_else(|| ConfigError::codec("ingot.core.Config", e)))
        }
    }
}

/// Parses text produced by [`dump`] back into an assembly.
pub fn load(text: &str, format: TextFormat, codecs: &CodecRegistry) -> ConfigResult<RootAssembly> {
    let assembly: RootAssembly = match format {
        TextFormat::Json => serde_json::from_str(text)?,
        TextFormat::Expanded => {
            let (result, failure) = with_expansion(codecs, || serde_json::from_str(text));
            result.map_err(|e| failure.unwrap_or_else(|| ConfigError::parse(e)))?
        }
    };
    assembly.verify(codecs)?;
    Ok(assembly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::TypedEnvelope;
    use crate::message::Message;
    use crate::message::testing::{Other, Sample};
    use crate::tagged::TaggedFeatures;

    fn codecs() -> CodecRegistry {
        let mut codecs = CodecRegistry::new();
        codecs.register::<Sample>();
        codecs.register::<Other>();
        codecs.register::<TaggedFeatures>();
        codecs
    }

    fn assembly() -> RootAssembly {
        let mut nested = TaggedFeatures::default();
        nested.insert(
            "probe".into(),
            TypedEnvelope::from_message(&Other { enabled: true }).unwrap(),
        );
        RootAssembly {
            app: vec![
                TypedEnvelope::from_message(&Sample {
                    name: "log".into(),
                    level: 2,
                })
                .unwrap(),
                TypedEnvelope::from_message(&nested).unwrap(),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_format_names() {
        assert_eq!("jsonpb".parse::<TextFormat>().unwrap(), TextFormat::Json);
        assert_eq!("v2jsonpb".parse::<TextFormat>().unwrap(), TextFormat::Expanded);
        assert!("yaml".parse::<TextFormat>().is_err());
    }

    #[test]
    fn test_round_trip_both_formats() {
        let codecs = codecs();
        let original = assembly();

        for format in [TextFormat::Json, TextFormat::Expanded] {
            let text = dump(&original, format, &codecs).unwrap();
            assert_eq!(load(&text, format, &codecs).unwrap(), original);
        }
    }

    #[test]
    fn test_expanded_decodes_nested_envelopes() {
        let text = dump(&assembly(), TextFormat::Expanded, &codecs()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(json["app"][0]["@type"], Sample::TYPE_NAME);
        assert_eq!(json["app"][0]["value"]["level"], 2);
        let probe = &json["app"][1]["value"]["features"]["probe"];
        assert_eq!(probe["@type"], Other::TYPE_NAME);
        assert_eq!(probe["value"]["enabled"], true);
    }

    #[test]
    fn test_unknown_decoder_is_fatal() {
        let mut codecs = CodecRegistry::new();
        codecs.register::<Sample>();

        let err = dump(&assembly(), TextFormat::Expanded, &codecs).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDecoder { .. }));
        let err = dump(&assembly(), TextFormat::Json, &codecs).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDecoder { .. }));
    }
}
