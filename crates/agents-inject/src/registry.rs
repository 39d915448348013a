//! Language-keyed collection of injectors
//!
//! Built once at startup and immutable afterwards; share it behind an `Arc`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::InjectError;
use crate::injector::{Injector, VariantInjector};
use crate::variant::BUILTIN_VARIANTS;

/// Injectors indexed by language identity
#[derive(Clone, Default)]
pub struct InjectorRegistry {
    injectors: BTreeMap<String, Arc<dyn Injector>>,
}

impl InjectorRegistry {
    /// Build a registry, rejecting two injectors with the same language
    pub fn new(
        injectors: impl IntoIterator<Item = Arc<dyn Injector>>,
    ) -> Result<Self, InjectError> {
        let mut map = BTreeMap::new();
        for injector in injectors {
            let language = injector.language().to_string();
            if map.contains_key(&language) {
                return Err(InjectError::DuplicateInjector(language));
            }
            map.insert(language, injector);
        }
        Ok(Self { injectors: map })
    }

    /// Registry holding one injector per compiled-in variant
    pub fn builtin() -> Result<Self, InjectError> {
        Self::new(
            BUILTIN_VARIANTS
                .iter()
                .map(|v| Arc::new(VariantInjector::new(*v)) as Arc<dyn Injector>),
        )
    }

    /// Injector registered for `language`
    pub fn lookup(&self, language: &str) -> Option<&dyn Injector> {
        self.injectors.get(language).map(|i| i.as_ref())
    }

    /// Registered languages in sorted order
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.injectors.keys().map(String::as_str)
    }

    /// Number of registered injectors
    pub fn len(&self) -> usize {
        self.injectors.len()
    }

    /// Whether no injector is registered
    pub fn is_empty(&self) -> bool {
        self.injectors.is_empty()
    }
}

impl fmt::Debug for InjectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectorRegistry")
            .field("languages", &self.languages().collect::<Vec<_>>())
            .finish()
    }
}
