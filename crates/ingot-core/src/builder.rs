//! Builder traits.
//!
//! A settings type implements [`Buildable`]; the registry stores factories
//! producing type-erased [`Builder`]s that parse raw settings into it and
//! build the canonical message.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};
use crate::loader::BuildContext;
use crate::message::ModuleConfig;

/// A loosely typed settings record that validates and defaults itself into
/// a canonical value.
pub trait Buildable {
    type Output;

    fn build(&self, ctx: &BuildContext<'_>) -> ConfigResult<Self::Output>;
}

/// Type-erased builder created by a registry factory.
pub trait Builder: Send {
    /// Parses raw settings. `null` keeps the builder at its defaults.
    fn load_settings(&mut self, raw: &Value) -> ConfigResult<()>;

    fn build(&self, ctx: &BuildContext<'_>) -> ConfigResult<Box<dyn ModuleConfig>>;
}

struct SettingsBuilder<B> {
    settings: B,
}

impl<B> Builder for SettingsBuilder<B>
where
    B: Buildable + DeserializeOwned + Send,
    B::Output: ModuleConfig,
{
    fn load_settings(&mut self, raw: &Value) -> ConfigResult<()> {
        if raw.is_null() {
            return Ok(());
        }
        self.settings = B::deserialize(raw).map_err(ConfigError::parse)?;
        Ok(())
    }

    fn build(&self, ctx: &BuildContext<'_>) -> ConfigResult<Box<dyn ModuleConfig>> {
        Ok(Box::new(self.settings.build(ctx)?))
    }
}

/// Factory producing an empty builder for settings type `B`.
///
/// This is what `#[register_builder(...)]` stores in the registry.
pub fn builder_factory<B>() -> Box<dyn Builder>
where
    B: Buildable + DeserializeOwned + Default + Send + 'static,
    B::Output: ModuleConfig,
{
    Box::new(SettingsBuilder {
        settings: B::default(),
    })
}
