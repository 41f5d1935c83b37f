//! The assembled configuration consumed by the proxy runtime.

use linkme::distributed_slice;
use serde::{Deserialize, Serialize};

use crate::codec::{CodecRegistry, MESSAGE_CODECS, MessageCodec};
use crate::envelope::TypedEnvelope;
use crate::error::ConfigResult;
use crate::message::Message;

/// Configuration of one inbound handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InboundHandlerConfig {
    pub tag: String,
    pub receiver_settings: Option<TypedEnvelope>,
    pub proxy_settings: Option<TypedEnvelope>,
}

/// Configuration of one outbound handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutboundHandlerConfig {
    pub tag: String,
    pub sender_settings: Option<TypedEnvelope>,
    pub proxy_settings: Option<TypedEnvelope>,
}

/// Ordered module configurations plus handler lists.
///
/// `app` is in startup order; the log module is always first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootAssembly {
    pub app: Vec<TypedEnvelope>,
    pub inbound: Vec<InboundHandlerConfig>,
    pub outbound: Vec<OutboundHandlerConfig>,
}

impl Message for RootAssembly {
    const TYPE_NAME: &'static str = "ingot.core.Config";
}

#[distributed_slice(MESSAGE_CODECS)]
static ROOT_ASSEMBLY_CODEC: MessageCodec = MessageCodec::of::<RootAssembly>();

impl RootAssembly {
    /// Canonical binary encoding.
    pub fn encode(&self) -> ConfigResult<Vec<u8>> {
        self.encode_to_vec()
    }

    /// Type identifiers of the app modules, in startup order.
    pub fn app_types(&self) -> Vec<&str> {
        self.app.iter().map(TypedEnvelope::type_name).collect()
    }

    /// Unpacks the first app module of type `T`.
    pub fn find_app<T: Message>(&self) -> Option<ConfigResult<T>> {
        self.app
            .iter()
            .find(|envelope| envelope.is::<T>())
            .map(TypedEnvelope::unpack)
    }

    pub fn inbound(&self, tag: &str) -> Option<&InboundHandlerConfig> {
        self.inbound.iter().find(|handler| handler.tag == tag)
    }

    pub fn outbound(&self, tag: &str) -> Option<&OutboundHandlerConfig> {
        self.outbound.iter().find(|handler| handler.tag == tag)
    }

    fn envelopes(&self) -> impl Iterator<Item = &TypedEnvelope> {
        let inbound = self
            .inbound
            .iter()
            .flat_map(|h| [h.receiver_settings.as_ref(), h.proxy_settings.as_ref()]);
        let outbound = self
            .outbound
            .iter()
            .flat_map(|h| [h.sender_settings.as_ref(), h.proxy_settings.as_ref()]);
        self.app
            .iter()
            .chain(inbound.chain(outbound).flatten())
    }

    /// Checks that every top-level envelope decodes with `codecs`.
    pub fn verify(&self, codecs: &CodecRegistry) -> ConfigResult<()> {
        self.envelopes().try_for_each(|envelope| codecs.verify(envelope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::message::testing::{Other, Sample};

    fn assembly() -> RootAssembly {
        RootAssembly {
            app: vec![
                TypedEnvelope::from_message(&Sample::default()).unwrap(),
                TypedEnvelope::from_message(&Other { enabled: true }).unwrap(),
            ],
            inbound: vec![InboundHandlerConfig {
                tag: "in".into(),
                receiver_settings: None,
                proxy_settings: Some(TypedEnvelope::from_message(&Sample::default()).unwrap()),
            }],
            outbound: Vec::new(),
        }
    }

    #[test]
    fn test_binary_round_trip() {
        let assembly = assembly();
        let bytes = assembly.encode().unwrap();
        assert_eq!(RootAssembly::decode(&bytes).unwrap(), assembly);
    }

    #[test]
    fn test_find_app() {
        let assembly = assembly();
        assert_eq!(assembly.app_types(), vec!["ingot.test.Sample", "ingot.test.Other"]);
        assert!(assembly.find_app::<Other>().unwrap().unwrap().enabled);
        assert!(assembly.inbound("in").is_some());
    }

    #[test]
    fn test_verify_reports_unknown_decoder() {
        let mut codecs = CodecRegistry::new();
        codecs.register::<Sample>();
        let err = assembly().verify(&codecs).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDecoder { type_name } if type_name == "ingot.test.Other"));

        codecs.register::<Other>();
        assert!(assembly().verify(&codecs).is_ok());
    }
}
