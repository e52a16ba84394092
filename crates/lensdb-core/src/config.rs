use crate::{error::ConfigurationError, model::NamingConvention};
use serde::{Deserialize, Serialize};

///
/// ProjectionFields
///
/// Which base fields a projection descriptor carries.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionFields {
    /// Every field the base entity maps.
    AllBaseFields,
    /// Contract fields plus the primary key.
    #[default]
    ContractOnly,
}

///
/// ModelConfig
///
/// ```toml
/// naming = "snake"
/// projection_fields = "contract_only"
/// validate_on_register = true
/// ```
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Convention for inferred table and column names.
    #[serde(default)]
    pub naming: NamingConvention,

    #[serde(default)]
    pub projection_fields: ProjectionFields,

    /// Run the structural validator over each new projection before it is
    /// inserted. Defaults to false.
    #[serde(default)]
    pub validate_on_register: bool,
}

impl ModelConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(source).map_err(|err| ConfigurationError::InvalidConfig(err.to_string()))
    }

    #[must_use]
    pub const fn with_naming(mut self, naming: NamingConvention) -> Self {
        self.naming = naming;
        self
    }

    #[must_use]
    pub const fn with_projection_fields(mut self, fields: ProjectionFields) -> Self {
        self.projection_fields = fields;
        self
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_the_default() {
        assert_eq!(ModelConfig::from_toml_str("").unwrap(), ModelConfig::default());
    }

    #[test]
    fn reads_every_key() {
        let config = ModelConfig::from_toml_str(
            r#"
            naming = "snake"
            projection_fields = "all_base_fields"
            validate_on_register = true
            "#,
        )
        .unwrap();

        assert_eq!(config.naming, NamingConvention::Snake);
        assert_eq!(config.projection_fields, ProjectionFields::AllBaseFields);
        assert!(config.validate_on_register);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ModelConfig::from_toml_str("nameing = \"snake\"").unwrap_err();

        assert!(matches!(err, ConfigurationError::InvalidConfig(_)));
    }
}
