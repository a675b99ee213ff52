//! Properties and the predefined-property table.

use serde::{Deserialize, Serialize};

/// Declared value type of a property (and the type of a data value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Page,
    Number,
    Text,
    Uri,
    Boolean,
    Time,
    GeoCoord,
    Concept,
}

impl ValueType {
    /// Types stored twice: once for display, once in an indexable form under
    /// the property's auxiliary predicate.
    pub fn has_auxiliary_encoding(self) -> bool {
        matches!(self, ValueType::Time)
    }
}

/// Graph predicates some predefined properties map to directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedPredicate {
    RdfType,
    SubClassOf,
    SubPropertyOf,
    WikiPageSortKey,
    RedirectsTo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredefinedProperty {
    pub key: &'static str,
    pub label: &'static str,
    pub value_type: ValueType,
    pub predicate: Option<FixedPredicate>,
}

pub const PREDEFINED_PROPERTIES: &[PredefinedProperty] = &[
    PredefinedProperty {
        key: "_INST",
        label: "Instance of",
        value_type: ValueType::Page,
        predicate: Some(FixedPredicate::RdfType),
    },
    PredefinedProperty {
        key: "_SUBC",
        label: "Subcategory of",
        value_type: ValueType::Page,
        predicate: Some(FixedPredicate::SubClassOf),
    },
    PredefinedProperty {
        key: "_SUBP",
        label: "Subproperty of",
        value_type: ValueType::Page,
        predicate: Some(FixedPredicate::SubPropertyOf),
    },
    PredefinedProperty {
        key: "_SKEY",
        label: "Sort key",
        value_type: ValueType::Text,
        predicate: Some(FixedPredicate::WikiPageSortKey),
    },
    PredefinedProperty {
        key: "_REDI",
        label: "Redirects to",
        value_type: ValueType::Page,
        predicate: Some(FixedPredicate::RedirectsTo),
    },
    PredefinedProperty {
        key: "_MDAT",
        label: "Modification date",
        value_type: ValueType::Time,
        predicate: None,
    },
    PredefinedProperty {
        key: "_CDAT",
        label: "Creation date",
        value_type: ValueType::Time,
        predicate: None,
    },
    PredefinedProperty {
        key: "_LEDT",
        label: "Last editor is",
        value_type: ValueType::Page,
        predicate: None,
    },
];

pub fn predefined_property(key: &str) -> Option<&'static PredefinedProperty> {
    PREDEFINED_PROPERTIES.iter().find(|p| p.key == key)
}

// ============================================================================
// Property references
// ============================================================================

/// A property as used in a query.
///
/// `key` is the canonical form: user-defined properties use their page title
/// with underscores (`Has_population`), predefined ones start with `_`.
/// `inverse` asks for entities that are the *target* of the property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyRef {
    pub key: String,
    #[serde(default)]
    pub inverse: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
}

impl PropertyRef {
    pub fn new(key: impl AsRef<str>) -> Self {
        let key = canonical_key(key.as_ref());
        let value_type = predefined_property(&key).map(|p| p.value_type);
        Self {
            key,
            inverse: false,
            value_type,
        }
    }

    pub fn with_type(key: impl AsRef<str>, value_type: ValueType) -> Self {
        Self {
            value_type: Some(value_type),
            ..Self::new(key)
        }
    }

    pub fn inverted(mut self) -> Self {
        self.inverse = !self.inverse;
        self
    }

    /// The same property with `inverse` cleared.
    pub fn non_inverse(&self) -> Self {
        Self {
            inverse: false,
            ..self.clone()
        }
    }

    pub fn is_predefined(&self) -> bool {
        self.key.starts_with('_')
    }

    pub fn predefined(&self) -> Option<&'static PredefinedProperty> {
        predefined_property(&self.key)
    }

    /// Human-readable label (`Has population`, `Modification date`).
    pub fn label(&self) -> String {
        match self.predefined() {
            Some(p) => p.label.to_string(),
            None => self.key.replace('_', " "),
        }
    }

    /// Declared type, falling back to the predefined table, then to `Page`.
    pub fn effective_value_type(&self) -> ValueType {
        self.value_type
            .or_else(|| self.predefined().map(|p| p.value_type))
            .unwrap_or(ValueType::Page)
    }

    pub fn is_auxiliary(&self) -> bool {
        self.effective_value_type().has_auxiliary_encoding()
    }
}

fn canonical_key(key: &str) -> String {
    key.trim().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_canonicalised() {
        let p = PropertyRef::new(" Has population ");
        assert_eq!(p.key, "Has_population");
        assert_eq!(p.label(), "Has population");
        assert!(!p.is_predefined());
        assert_eq!(p.effective_value_type(), ValueType::Page);
    }

    #[test]
    fn test_predefined_lookup() {
        let p = PropertyRef::new("_SUBC");
        assert!(p.is_predefined());
        assert_eq!(p.label(), "Subcategory of");
        assert_eq!(
            p.predefined().and_then(|d| d.predicate),
            Some(FixedPredicate::SubClassOf)
        );
        assert!(predefined_property("_NOPE").is_none());
    }

    #[test]
    fn test_time_properties_are_auxiliary() {
        assert!(PropertyRef::new("_MDAT").is_auxiliary());
        assert!(PropertyRef::with_type("Born_on", ValueType::Time).is_auxiliary());
        assert!(!PropertyRef::with_type("Population", ValueType::Number).is_auxiliary());
    }

    #[test]
    fn test_inverse_helpers() {
        let p = PropertyRef::new("Located_in").inverted();
        assert!(p.inverse);
        assert!(!p.non_inverse().inverse);
        assert_eq!(p.non_inverse().key, "Located_in");
    }

    #[test]
    fn test_deserialised_predefined_property_keeps_its_type() {
        let p: PropertyRef = serde_json::from_str(r#"{"key":"_CDAT"}"#).unwrap();
        assert_eq!(p.value_type, None);
        assert_eq!(p.effective_value_type(), ValueType::Time);
    }
}
