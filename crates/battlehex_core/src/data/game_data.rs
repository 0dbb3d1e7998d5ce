//! Top-level game data document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::unit_data::UnitData;
use crate::error::{GameError, Result};
use crate::registry::VariantRegistry;

/// Cosmetic battlefield decorations. Never consulted by battle logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldData {
    /// Glyph drawn for empty cells.
    #[serde(default = "default_empty_icon")]
    pub empty_icon: String,
}

fn default_empty_icon() -> String {
    "_".to_string()
}

impl Default for FieldData {
    fn default() -> Self {
        Self {
            empty_icon: default_empty_icon(),
        }
    }
}

impl FieldData {
    /// Look up a decoration glyph by symbolic key.
    #[must_use]
    pub fn icon(&self, key: &str) -> Option<&str> {
        match key {
            "empty" | "icon" | "empty_icon" => Some(&self.empty_icon),
            _ => None,
        }
    }
}

/// Unit records and field decorations loaded from one RON document.
///
/// # Example RON
///
/// ```ron
/// GameData(
///     field: FieldData(empty_icon: "_"),
///     units: {
///         "pikeman": UnitData(name: "Pikeman", type: "infantry", ...),
///     },
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    /// Battlefield decorations.
    #[serde(default)]
    pub field: FieldData,

    /// Unit records keyed by unit-type key.
    #[serde(default)]
    pub units: BTreeMap<String, UnitData>,
}

/// Document shape used while parsing, so each unit record can be
/// decoded on its own and report which key is incomplete.
#[derive(Deserialize)]
#[serde(rename = "GameData")]
struct RawGameData {
    #[serde(default)]
    field: FieldData,
    #[serde(default)]
    units: BTreeMap<String, ron::Value>,
}

impl GameData {
    /// Parse a RON document. `origin` labels errors (usually the file path).
    ///
    /// # Errors
    ///
    /// [`GameError::MissingConfiguration`] if a unit record lacks a required
    /// field, [`GameError::DataParseError`] for anything else malformed.
    pub fn from_ron_str(source: &str, origin: &str) -> Result<Self> {
        let raw: RawGameData = ron::from_str(source).map_err(|e| GameError::DataParseError {
            path: origin.to_string(),
            message: e.to_string(),
        })?;

        let mut units = BTreeMap::new();
        for (key, value) in raw.units {
            let data: UnitData = value.into_rust().map_err(|e| match e {
                ron::Error::MissingStructField { field, .. } => GameError::MissingConfiguration {
                    key: key.clone(),
                    field: Some(field.to_string()),
                },
                other => GameError::DataParseError {
                    path: format!("{origin}#{key}"),
                    message: other.to_string(),
                },
            })?;
            units.insert(key, data);
        }

        Ok(Self {
            field: raw.field,
            units,
        })
    }

    /// Find the record for a unit-type key.
    ///
    /// # Errors
    ///
    /// [`GameError::MissingConfiguration`] if no record exists.
    pub fn unit(&self, key: &str) -> Result<&UnitData> {
        self.units
            .get(key)
            .ok_or_else(|| GameError::MissingConfiguration {
                key: key.to_string(),
                field: None,
            })
    }

    /// Check every record against the registry and its stat constraints.
    ///
    /// Returns all problems found (empty when the data is valid).
    #[must_use]
    pub fn validate(&self, registry: &VariantRegistry) -> Vec<GameError> {
        let mut errors = Vec::new();

        for (key, data) in &self.units {
            match registry.resolve(key) {
                Ok(variant) => {
                    if let Err(e) = data.validate(key, variant) {
                        errors.push(e);
                    }
                }
                Err(e) => errors.push(e),
            }
        }

        if self.field.empty_icon.is_empty() {
            errors.push(GameError::InvalidConfiguration {
                key: "field".to_string(),
                reason: "empty_icon must not be empty".to_string(),
            });
        }

        errors
    }
}
