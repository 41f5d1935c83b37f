//! Tagged feature sets: ordered `{type, tag, settings}` arrays resolved into
//! a tag-keyed map of envelopes.
//!
//! A set is itself a [`Message`], so it nests inside other module configs
//! (the multi-observatory holds one).

use indexmap::IndexMap;
use linkme::distributed_slice;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{MESSAGE_CODECS, MessageCodec};
use crate::envelope::TypedEnvelope;
use crate::message::Message;

/// One raw `{type, tag, settings}` item of a tagged feature array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeatureItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub tag: String,
    pub settings: Value,
}

/// Tag-keyed set of packed features, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaggedFeatures {
    pub features: IndexMap<String, TypedEnvelope>,
}

impl TaggedFeatures {
    pub fn get(&self, tag: &str) -> Option<&TypedEnvelope> {
        self.features.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.features.contains_key(tag)
    }

    pub(crate) fn insert(&mut self, tag: String, envelope: TypedEnvelope) {
        self.features.insert(tag, envelope);
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedEnvelope)> {
        self.features.iter().map(|(tag, envelope)| (tag.as_str(), envelope))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Message for TaggedFeatures {
    const TYPE_NAME: &'static str = "ingot.core.TaggedFeatures";
}

#[distributed_slice(MESSAGE_CODECS)]
static TAGGED_FEATURES_CODEC: MessageCodec = MessageCodec::of::<TaggedFeatures>();
