//! Canonical module configuration messages.
//!
//! Statically typed messages implement [`Message`] and receive the
//! object-safe [`ModuleConfig`] through a blanket impl. The canonical binary
//! encoding of every message is postcard.

use std::any::Any;
use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ConfigError, ConfigResult};

/// A canonical configuration record, as consumed by the proxy runtime.
pub trait ModuleConfig: Any + Debug + Send + Sync {
    /// Fully-qualified type identifier stored in envelopes.
    fn type_name(&self) -> &str;

    /// Encodes the message into its canonical binary form.
    fn encode(&self) -> ConfigResult<Vec<u8>>;

    /// Upcast used for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl dyn ModuleConfig {
    /// Returns the concrete message if it is of type `T`.
    pub fn downcast_ref<T: ModuleConfig>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Returns `true` if the message is of type `T`.
    pub fn is<T: ModuleConfig>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// A statically typed canonical message.
///
/// Usually derived with `#[derive(Message)]`, which also registers the type
/// with the codec registry.
pub trait Message:
    Serialize + DeserializeOwned + Default + Clone + Debug + PartialEq + Send + Sync + 'static
{
    /// Fully-qualified type identifier, e.g. `ingot.app.log.Config`.
    const TYPE_NAME: &'static str;

    /// Encodes `self` with postcard.
    fn encode_to_vec(&self) -> ConfigResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|e| ConfigError::codec(Self::TYPE_NAME, e))
    }

    /// Decodes a postcard payload.
    fn decode(bytes: &[u8]) -> ConfigResult<Self> {
        postcard::from_bytes(bytes).map_err(|e| ConfigError::codec(Self::TYPE_NAME, e))
    }
}

impl<T: Message> ModuleConfig for T {
    fn type_name(&self) -> &str {
        T::TYPE_NAME
    }

    fn encode(&self) -> ConfigResult<Vec<u8>> {
        self.encode_to_vec()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use serde::{Deserialize, Serialize};

    use super::Message;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct Sample {
        pub name: String,
        pub level: u32,
    }

    impl Message for Sample {
        const TYPE_NAME: &'static str = "ingot.test.Sample";
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct Other {
        pub enabled: bool,
    }

    impl Message for Other {
        const TYPE_NAME: &'static str = "ingot.test.Other";
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Sample;
    use super::*;

    #[test]
    fn test_binary_round_trip() {
        let msg = Sample {
            name: "direct".into(),
            level: 3,
        };
        let bytes = msg.encode_to_vec().unwrap();
        assert_eq!(Sample::decode(&bytes).unwrap(), msg);
    }

    #[test]
    fn test_downcast_through_trait_object() {
        let boxed: Box<dyn ModuleConfig> = Box::new(Sample::default());
        assert_eq!(boxed.type_name(), "ingot.test.Sample");
        assert!(boxed.is::<Sample>());
        assert!(boxed.downcast_ref::<super::testing::Other>().is_none());
    }
}
