//! Unit-type registry and unit factory.
//!
//! - [`VariantRegistry`]: maps unit-type keys to a [`UnitVariant`]
//! - [`UnitFactory`]: builds [`Unit`]s from a key, a data record and a
//!   starting position
//!
//! The registry is an explicit value built at startup (usually with
//! [`VariantRegistry::with_defaults`]) and handed to whoever creates units.

use std::collections::BTreeMap;

use crate::data::GameData;
use crate::error::{GameError, Result};
use crate::position::Position;
use crate::unit::{Unit, UnitId, UnitVariant};

/// Convert a type name to its data key: `SpecialUnitClass` → `special_unit_class`.
///
/// ```
/// use battlehex_core::registry::class_name_to_key;
///
/// assert_eq!(class_name_to_key("Pikeman"), "pikeman");
/// assert_eq!(class_name_to_key("HeavyCrossbowman"), "heavy_crossbowman");
/// ```
#[must_use]
pub fn class_name_to_key(class_name: &str) -> String {
    let mut key = String::with_capacity(class_name.len() + 4);
    for (i, c) in class_name.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            key.push('_');
        }
        key.extend(c.to_lowercase());
    }
    key
}

/// Mapping from unit-type key to behavior variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantRegistry {
    variants: BTreeMap<String, UnitVariant>,
}

impl VariantRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in unit types: `pikeman` and `archer`.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_type("Pikeman", UnitVariant::Infantry);
        registry.register_type("Archer", UnitVariant::Shooter);
        registry
    }

    /// Register `key` as `variant`, replacing any earlier registration.
    pub fn register(&mut self, key: impl Into<String>, variant: UnitVariant) -> &mut Self {
        let key = key.into();
        tracing::trace!(%key, variant = variant.name(), "Unit type registered");
        self.variants.insert(key, variant);
        self
    }

    /// Register a type under the key derived from its name.
    pub fn register_type(&mut self, type_name: &str, variant: UnitVariant) -> &mut Self {
        self.register(class_name_to_key(type_name), variant)
    }

    /// Resolve a unit-type key.
    ///
    /// # Errors
    ///
    /// [`GameError::UnregisteredUnitType`] listing the known keys.
    pub fn resolve(&self, key: &str) -> Result<UnitVariant> {
        self.variants
            .get(key)
            .copied()
            .ok_or_else(|| GameError::UnregisteredUnitType {
                key: key.to_string(),
                known: self.variants.keys().cloned().collect(),
            })
    }

    /// All registrations as `(key, variant)`, sorted by key.
    pub fn registered_units(&self) -> impl Iterator<Item = (&str, UnitVariant)> {
        self.variants.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Builds units from data records and the variant registry.
///
/// Assigns sequential [`UnitId`]s starting at 1.
#[derive(Debug)]
pub struct UnitFactory<'a> {
    data: &'a GameData,
    registry: &'a VariantRegistry,
    next_id: u32,
}

impl<'a> UnitFactory<'a> {
    /// Create a factory over loaded data and a registry.
    #[must_use]
    pub fn new(data: &'a GameData, registry: &'a VariantRegistry) -> Self {
        Self {
            data,
            registry,
            next_id: 1,
        }
    }

    /// Create a unit of type `key` standing at `position`.
    ///
    /// # Errors
    ///
    /// - [`GameError::MissingConfiguration`] if no data record exists
    /// - [`GameError::UnregisteredUnitType`] if the key has no variant
    /// - [`GameError::InvalidConfiguration`] if the record breaks a stat constraint
    pub fn create(&mut self, key: &str, position: Position) -> Result<Unit> {
        let data = self.data.unit(key)?;
        let variant = self.registry.resolve(key)?;
        data.validate(key, variant)?;

        let id = UnitId::new(self.next_id);
        self.next_id += 1;

        tracing::debug!(%id, key, %position, variant = variant.name(), "Unit created");
        Ok(Unit::new(
            id,
            data.name.clone(),
            data.stats_for(variant),
            data.behavior_for(variant),
            position,
        )
        .with_icon(data.icon.clone()))
    }
}
