//! The type registry: `(category, type name) → builder factory`.
//!
//! Entries are contributed at link time through [`BUILDER_REGISTRY`]
//! (usually via `#[register_builder(...)]`) and collected into an explicit
//! [`TypeRegistry`] value. Categories default to exact name matching;
//! a [`CategoryRegistration`] can declare case-insensitive matching.

use std::collections::HashMap;

use linkme::distributed_slice;
use parking_lot::RwLock;
use tracing::warn;

use crate::builder::Builder;

/// Creates an empty builder.
pub type BuilderFactory = fn() -> Box<dyn Builder>;

/// One `(category, type name)` registration.
#[derive(Clone, Copy)]
pub struct BuilderRegistration {
    pub category: &'static str,
    pub type_name: &'static str,
    pub create: BuilderFactory,
}

/// How type names are compared within a category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameMatching {
    #[default]
    Exact,
    CaseInsensitive,
}

/// Declares the name matching rule of a category.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRegistration {
    pub category: &'static str,
    pub matching: NameMatching,
}

/// Link-time registry of builder factories.
#[distributed_slice]
pub static BUILDER_REGISTRY: [BuilderRegistration];

/// Link-time registry of category matching rules.
#[distributed_slice]
pub static CATEGORY_REGISTRY: [CategoryRegistration];

#[derive(Default)]
struct Inner {
    categories: HashMap<String, NameMatching>,
    entries: HashMap<(String, String), BuilderFactory>,
}

impl Inner {
    fn matching(&self, category: &str) -> NameMatching {
        self.categories.get(category).copied().unwrap_or_default()
    }

    fn key(&self, category: &str, type_name: &str) -> (String, String) {
        let type_name = match self.matching(category) {
            NameMatching::Exact => type_name.to_string(),
            NameMatching::CaseInsensitive => type_name.to_lowercase(),
        };
        (category.to_string(), type_name)
    }
}

/// Registry of builder factories keyed by `(category, type name)`.
#[derive(Default)]
pub struct TypeRegistry {
    inner: RwLock<Inner>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from every link-time registration.
    ///
    /// If the same `(category, type)` pair is registered more than once a
    /// warning is emitted and the **first** one wins.
    pub fn collect_all() -> Self {
        let registry = Self::new();
        for category in CATEGORY_REGISTRY {
            registry.set_matching(category.category, category.matching);
        }
        for entry in BUILDER_REGISTRY {
            if !registry.register(entry.category, entry.type_name, entry.create) {
                warn!(
                    category = entry.category,
                    type_name = entry.type_name,
                    "Multiple builders registered for the same type; using the first one"
                );
            }
        }
        registry
    }

    /// Sets the matching rule of `category`, re-keying existing entries.
    pub fn set_matching(&self, category: &str, matching: NameMatching) {
        let mut inner = self.inner.write();
        inner.categories.insert(category.to_string(), matching);
        if matching == NameMatching::CaseInsensitive {
            let keys: Vec<_> = inner
                .entries
                .keys()
                .filter(|(cat, _)| cat == category)
                .cloned()
                .collect();
            for key in keys {
                if let Some(factory) = inner.entries.remove(&key) {
                    inner
                        .entries
                        .entry((key.0, key.1.to_lowercase()))
                        .or_insert(factory);
                }
            }
        }
    }

    /// Registers a factory. Returns `false` if the pair was already taken.
    pub fn register(&self, category: &str, type_name: &str, create: BuilderFactory) -> bool {
        let mut inner = self.inner.write();
        let key = inner.key(category, type_name);
        if inner.entries.contains_key(&key) {
            return false;
        }
        inner.entries.insert(key, create);
        true
    }

    pub fn lookup(&self, category: &str, type_name: &str) -> Option<BuilderFactory> {
        let inner = self.inner.read();
        inner.entries.get(&inner.key(category, type_name)).copied()
    }

    pub fn contains(&self, category: &str, type_name: &str) -> bool {
        self.lookup(category, type_name).is_some()
    }

    /// Registered type names of `category`, sorted.
    pub fn type_names(&self, category: &str) -> Vec<String> {
        let mut names: Vec<_> = self
            .inner
            .read()
            .entries
            .keys()
            .filter(|(cat, _)| cat == category)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("entries", &self.len())
            .finish()
    }
}
