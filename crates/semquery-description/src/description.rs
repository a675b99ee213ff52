//! The description algebra.

use serde::{Deserialize, Serialize};

use crate::property::PropertyRef;
use crate::value::{namespace_prefix, DataValue, PageRef};

#[derive(Debug, thiserror::Error)]
pub enum DescriptionError {
    #[error("invalid description JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid date {year}-{month}-{day}")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

/// How a value constraint relates the entity (or property value) to its item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Comparator {
    #[default]
    Eq,
    Neq,
    Less,
    Greater,
    Leq,
    Geq,
    Like,
    NotLike,
    EqNoCase,
    NeqNoCase,
    LikeNoCase,
    NotLikeNoCase,
    /// Full-text operators; the triple-store backend has no equivalent.
    In,
    Phrase,
    Not,
    /// Any comparator name this crate does not know.
    Unsupported,
}

const COMPARATOR_NAMES: &[(Comparator, &str)] = &[
    (Comparator::Eq, "eq"),
    (Comparator::Neq, "neq"),
    (Comparator::Less, "less"),
    (Comparator::Greater, "greater"),
    (Comparator::Leq, "leq"),
    (Comparator::Geq, "geq"),
    (Comparator::Like, "like"),
    (Comparator::NotLike, "not_like"),
    (Comparator::EqNoCase, "eq_no_case"),
    (Comparator::NeqNoCase, "neq_no_case"),
    (Comparator::LikeNoCase, "like_no_case"),
    (Comparator::NotLikeNoCase, "not_like_no_case"),
    (Comparator::In, "in"),
    (Comparator::Phrase, "phrase"),
    (Comparator::Not, "not"),
    (Comparator::Unsupported, "unsupported"),
];

impl From<String> for Comparator {
    fn from(name: String) -> Self {
        COMPARATOR_NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(c, _)| *c)
            .unwrap_or(Comparator::Unsupported)
    }
}

impl From<Comparator> for String {
    fn from(comparator: Comparator) -> Self {
        comparator.name().to_string()
    }
}

impl Comparator {
    pub fn name(self) -> &'static str {
        COMPARATOR_NAMES
            .iter()
            .find(|(c, _)| *c == self)
            .map(|(_, n)| *n)
            .unwrap_or("unsupported")
    }

    pub fn is_case_insensitive(self) -> bool {
        matches!(
            self,
            Comparator::EqNoCase
                | Comparator::NeqNoCase
                | Comparator::LikeNoCase
                | Comparator::NotLikeNoCase
        )
    }

    /// Prefix written before the value in query text.
    pub fn query_prefix(self) -> &'static str {
        match self {
            Comparator::Eq | Comparator::EqNoCase | Comparator::Unsupported => "",
            Comparator::Neq | Comparator::NeqNoCase => "!",
            Comparator::Less => "<<",
            Comparator::Greater => ">>",
            Comparator::Leq => "≤",
            Comparator::Geq => "≥",
            Comparator::Like | Comparator::LikeNoCase => "~",
            Comparator::NotLike | Comparator::NotLikeNoCase => "!~",
            Comparator::In => "in:",
            Comparator::Phrase => "phrase:",
            Comparator::Not => "not:",
        }
    }
}

/// One node of a query description tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Description {
    /// Any existing entity.
    Thing,
    Namespace {
        namespace: i32,
    },
    /// Instance of at least one of the categories. No categories matches nothing.
    Class {
        categories: Vec<PageRef>,
    },
    Value {
        item: DataValue,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        property: Option<PropertyRef>,
        #[serde(default)]
        comparator: Comparator,
    },
    SomeProperty {
        property: PropertyRef,
        description: Box<Description>,
    },
    Conjunction {
        descriptions: Vec<Description>,
    },
    Disjunction {
        descriptions: Vec<Description>,
    },
    /// Whatever the concept page's stored query describes.
    Concept {
        concept: PageRef,
    },
}

impl Description {
    pub fn namespace(namespace: i32) -> Self {
        Description::Namespace { namespace }
    }

    pub fn class(categories: impl IntoIterator<Item = PageRef>) -> Self {
        Description::Class {
            categories: categories.into_iter().collect(),
        }
    }

    pub fn value(item: impl Into<DataValue>, comparator: Comparator) -> Self {
        Description::Value {
            item: item.into(),
            property: None,
            comparator,
        }
    }

    pub fn some_property(property: PropertyRef, description: Description) -> Self {
        Description::SomeProperty {
            property,
            description: Box::new(description),
        }
    }

    /// `[[property::<comparator>item]]`
    pub fn property_value(
        property: PropertyRef,
        item: impl Into<DataValue>,
        comparator: Comparator,
    ) -> Self {
        let value = Description::Value {
            item: item.into(),
            property: Some(property.clone()),
            comparator,
        };
        Self::some_property(property, value)
    }

    pub fn conjunction(descriptions: impl IntoIterator<Item = Description>) -> Self {
        Description::Conjunction {
            descriptions: descriptions.into_iter().collect(),
        }
    }

    pub fn disjunction(descriptions: impl IntoIterator<Item = Description>) -> Self {
        Description::Disjunction {
            descriptions: descriptions.into_iter().collect(),
        }
    }

    pub fn concept(concept: PageRef) -> Self {
        Description::Concept { concept }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Description::Thing => "thing",
            Description::Namespace { .. } => "namespace",
            Description::Class { .. } => "class",
            Description::Value { .. } => "value",
            Description::SomeProperty { .. } => "some_property",
            Description::Conjunction { .. } => "conjunction",
            Description::Disjunction { .. } => "disjunction",
            Description::Concept { .. } => "concept",
        }
    }

    /// Nesting depth (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        match self {
            Description::SomeProperty { description, .. } => 1 + description.depth(),
            Description::Conjunction { descriptions } | Description::Disjunction { descriptions } => {
                1 + descriptions.iter().map(Self::depth).max().unwrap_or(0)
            }
            _ => 1,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, DescriptionError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, DescriptionError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Wiki query text for this description, e.g.
    /// `[[Category:City]][[Located in::Germany]]`.
    pub fn query_string(&self) -> String {
        self.render_query(false)
    }

    fn render_query(&self, as_value: bool) -> String {
        match self {
            Description::Thing => "+".to_string(),
            Description::Namespace { namespace } => {
                let prefix = namespace_prefix(*namespace)
                    .map(str::to_string)
                    .unwrap_or_else(|| if *namespace == 0 { String::new() } else { namespace.to_string() });
                wrap_subquery(format!("[[{prefix}:+]]"), as_value)
            }
            Description::Class { categories } => {
                let names: Vec<&str> = categories.iter().map(|c| c.title.as_str()).collect();
                wrap_subquery(format!("[[Category:{}]]", names.join("||")), as_value)
            }
            Description::Value {
                item, comparator, ..
            } => {
                let text = format!("{}{}", comparator.query_prefix(), item.display());
                if as_value {
                    text
                } else {
                    format!("[[{text}]]")
                }
            }
            Description::SomeProperty {
                property,
                description,
            } => {
                let label = if property.inverse {
                    format!("-{}", property.label())
                } else {
                    property.label()
                };
                wrap_subquery(
                    format!("[[{label}::{}]]", description.render_query(true)),
                    as_value,
                )
            }
            Description::Conjunction { descriptions } => {
                let parts: Vec<String> = descriptions.iter().map(|d| d.render_query(false)).collect();
                wrap_subquery(parts.concat(), as_value)
            }
            Description::Disjunction { descriptions } => {
                let all_values = descriptions
                    .iter()
                    .all(|d| matches!(d, Description::Value { .. } | Description::Thing));
                if as_value && all_values {
                    let parts: Vec<String> = descriptions.iter().map(|d| d.render_query(true)).collect();
                    parts.join("||")
                } else {
                    let parts: Vec<String> = descriptions.iter().map(|d| d.render_query(false)).collect();
                    wrap_subquery(parts.join(" OR "), as_value)
                }
            }
            Description::Concept { concept } => {
                wrap_subquery(format!("[[Concept:{}]]", concept.title), as_value)
            }
        }
    }
}

fn wrap_subquery(text: String, as_value: bool) -> String {
    if as_value {
        format!("<q>{text}</q>")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TimeValue;

    fn city_in_germany() -> Description {
        Description::conjunction([
            Description::class([PageRef::category("City")]),
            Description::property_value(
                PropertyRef::new("Located in"),
                PageRef::main("Germany"),
                Comparator::Eq,
            ),
        ])
    }

    #[test]
    fn test_query_string() {
        assert_eq!(
            city_in_germany().query_string(),
            "[[Category:City]][[Located in::Germany]]"
        );

        let values = Description::some_property(
            PropertyRef::new("Population"),
            Description::disjunction([
                Description::value(DataValue::Number(12.0), Comparator::Eq),
                Description::value(DataValue::Number(42.0), Comparator::Greater),
            ]),
        );
        assert_eq!(values.query_string(), "[[Population::12||>>42]]");
    }

    #[test]
    fn test_query_string_nested_and_inverse() {
        let d = Description::some_property(
            PropertyRef::new("Capital of").inverted(),
            Description::class([PageRef::category("Country"), PageRef::category("State")]),
        );
        assert_eq!(
            d.query_string(),
            "[[-Capital of::<q>[[Category:Country||State]]</q>]]"
        );
        assert_eq!(
            Description::concept(PageRef::concept("Big cities")).query_string(),
            "[[Concept:Big cities]]"
        );
    }

    #[test]
    fn test_json_roundtrip_of_a_nested_tree() {
        let d = Description::disjunction([
            city_in_germany(),
            Description::namespace(0),
            Description::property_value(
                PropertyRef::new("_MDAT"),
                TimeValue::from_ymd(2020, 1, 1).unwrap(),
                Comparator::Geq,
            ),
        ]);
        let text = d.to_json().unwrap();
        assert_eq!(Description::from_json(&text).unwrap(), d);
    }

    #[test]
    fn test_json_shape_and_defaults() {
        let d = Description::from_json(
            r#"{"kind":"value","item":{"type":"text","value":"Berlin"}}"#,
        )
        .unwrap();
        assert_eq!(
            d,
            Description::value(DataValue::Text("Berlin".into()), Comparator::Eq)
        );
    }

    #[test]
    fn test_unknown_comparator_decodes_as_unsupported() {
        let d = Description::from_json(
            r#"{"kind":"value","item":{"type":"number","value":3},"comparator":"near"}"#,
        )
        .unwrap();
        match d {
            Description::Value { comparator, .. } => assert_eq!(comparator, Comparator::Unsupported),
            other => panic!("unexpected description: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = Description::from_json(r#"{"kind":"class"}"#).unwrap_err();
        assert!(err.to_string().starts_with("invalid description JSON"));
    }

    #[test]
    fn test_depth() {
        assert_eq!(Description::Thing.depth(), 1);
        assert_eq!(city_in_germany().depth(), 3);
        assert_eq!(Description::conjunction([]).depth(), 1);
    }
}
