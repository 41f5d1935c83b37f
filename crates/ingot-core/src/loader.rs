//! Heterogeneous and tagged-feature loading.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::descriptor::{SchemaResolver, extension_name, resolve_extension};
use crate::envelope::TypedEnvelope;
use crate::error::{ConfigError, ConfigResult};
use crate::message::ModuleConfig;
use crate::registry::TypeRegistry;
use crate::tagged::{FeatureItem, TaggedFeatures};

/// Everything a builder may consult while building.
///
/// Passed into every [`Buildable::build`](crate::Buildable::build) so that
/// builders can delegate to the heterogeneous loader.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    types: &'a TypeRegistry,
    schemas: Option<&'a dyn SchemaResolver>,
}

impl<'a> BuildContext<'a> {
    pub fn new(types: &'a TypeRegistry) -> Self {
        Self {
            types,
            schemas: None,
        }
    }

    /// Enables the descriptor fallback for marked names.
    pub fn with_schemas(mut self, schemas: &'a dyn SchemaResolver) -> Self {
        self.schemas = Some(schemas);
        self
    }

    pub fn types(&self) -> &'a TypeRegistry {
        self.types
    }

    pub fn schemas(&self) -> Option<&'a dyn SchemaResolver> {
        self.schemas
    }

    /// Loads a module configuration of `(category, type_name)` from raw settings.
    ///
    /// An empty `type_name` is replaced by `default_impl`. Names carrying the
    /// extension marker that are not registered go through the descriptor
    /// fallback; the raw settings are ignored for them.
    pub fn load_heterogeneous(
        &self,
        category: &str,
        type_name: &str,
        default_impl: &str,
        raw: &Value,
    ) -> ConfigResult<Box<dyn ModuleConfig>> {
        let type_name = if type_name.is_empty() {
            default_impl
        } else {
            type_name
        };

        let Some(create) = self.types.lookup(category, type_name) else {
            if extension_name(type_name).is_some() {
                debug!(category, type_name, "Resolving extension schema");
                return Ok(Box::new(resolve_extension(self.schemas, type_name)?));
            }
            return Err(ConfigError::unknown_type(category, type_name));
        };

        let mut builder = create();
        let built = builder
            .load_settings(raw)
            .and_then(|()| builder.build(self))
            .map_err(|err| {
                ConfigError::delegation(format!("{category} '{type_name}'"), None, err)
            })?;

        debug!(category, type_name, message = built.type_name(), "Loaded module config");
        Ok(built)
    }

    /// [`load_heterogeneous`](Self::load_heterogeneous), packed into an envelope.
    pub fn load_envelope(
        &self,
        category: &str,
        type_name: &str,
        default_impl: &str,
        raw: &Value,
    ) -> ConfigResult<TypedEnvelope> {
        let config = self.load_heterogeneous(category, type_name, default_impl, raw)?;
        TypedEnvelope::pack(config.as_ref())
    }

    /// Loads an ordered array of `{type, tag, settings}` items into a
    /// tag-keyed feature set.
    ///
    /// Fails on the first bad item; `null` yields an empty set.
    pub fn load_tagged_features(
        &self,
        category: &str,
        default_impl: &str,
        raw: &Value,
    ) -> ConfigResult<TaggedFeatures> {
        let items = if raw.is_null() {
            Vec::new()
        } else {
            Vec::<Value>::deserialize(raw).map_err(|e| {
                ConfigError::parse(format!("{category} features must be an array: {e}"))
            })?
        };

        let mut features = TaggedFeatures::default();
        for (index, item) in items.iter().enumerate() {
            let item = FeatureItem::deserialize(item).map_err(|e| {
                ConfigError::parse(format!("{category} feature #{index}: {e}"))
            })?;
            if item.tag.is_empty() {
                return Err(ConfigError::validation(
                    "tag",
                    format!("{category} feature"),
                    "must not be empty",
                ));
            }
            if features.contains(&item.tag) {
                return Err(ConfigError::DuplicateTag {
                    category: category.to_string(),
                    tag: item.tag,
                });
            }

            let envelope = self
                .load_envelope(category, &item.kind, default_impl, &item.settings)
                .map_err(|err| match err {
                    ConfigError::UnknownType { .. } => err.with_tag(item.tag.clone()),
                    ConfigError::BuildDelegation { context, source, .. } => {
                        ConfigError::BuildDelegation {
                            context,
                            tag: Some(item.tag.clone()),
                            source,
                        }
                    }
                    other => ConfigError::delegation(
                        format!("{category} feature"),
                        Some(item.tag.clone()),
                        other,
                    ),
                })?;
            features.insert(item.tag, envelope);
        }
        Ok(features)
    }
}

impl std::fmt::Debug for BuildContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildContext")
            .field("types", self.types)
            .field("schemas", &self.schemas.is_some())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use serde::Deserialize;

    use crate::builder::Buildable;
    use crate::error::{ConfigError, ConfigResult};
    use crate::loader::BuildContext;
    use crate::message::testing::Sample;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct SampleSettings {
        pub name: String,
        pub level: Option<u32>,
    }

    impl Buildable for SampleSettings {
        type Output = Sample;

        fn build(&self, _ctx: &BuildContext<'_>) -> ConfigResult<Sample> {
            if self.name == "invalid" {
                return Err(ConfigError::validation("name", "SampleSettings", "rejected"));
            }
            Ok(Sample {
                name: self.name.clone(),
                level: self.level.unwrap_or(1),
            })
        }
    }
}
