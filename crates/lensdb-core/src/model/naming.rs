use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

///
/// NamingConvention
///
/// How storage and column names are inferred when no explicit annotation
/// is present.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    Camel,
    Kebab,
    Pascal,
    Snake,
    #[default]
    Verbatim,
}

impl NamingConvention {
    #[must_use]
    pub fn apply(self, ident: &str) -> String {
        match self {
            Self::Camel => ident.to_case(Case::Camel),
            Self::Kebab => ident.to_case(Case::Kebab),
            Self::Pascal => ident.to_case(Case::Pascal),
            Self::Snake => ident.to_case(Case::Snake),
            Self::Verbatim => ident.to_string(),
        }
    }

    /// Default physical name of a table for an entity identifier.
    #[must_use]
    pub fn table_name(self, ident: &str) -> String {
        self.apply(ident)
    }

    /// Default physical name of a column for a field.
    #[must_use]
    pub fn column_name(self, field: &str) -> String {
        self.apply(field)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conventions_rewrite_identifiers() {
        assert_eq!(NamingConvention::Verbatim.apply("TimeZone"), "TimeZone");
        assert_eq!(NamingConvention::Snake.apply("TimeZone"), "time_zone");
        assert_eq!(NamingConvention::Pascal.apply("time_zone"), "TimeZone");
        assert_eq!(NamingConvention::Camel.apply("time_zone"), "timeZone");
        assert_eq!(NamingConvention::Kebab.apply("TimeZone"), "time-zone");
    }

    #[test]
    fn deserializes_from_snake_case() {
        let naming: NamingConvention = serde_json::from_str("\"snake\"").unwrap();

        assert_eq!(naming, NamingConvention::Snake);
    }
}
