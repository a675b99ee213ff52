//! One interpreter per description kind, dispatched through a static registry.

mod class;
mod concept;
mod conjunction;
mod disjunction;
mod namespace;
mod some_property;
mod thing;
mod value;

use semquery_description::{Description, PropertyRef, ValueType};

use crate::builder::ConditionBuilder;
use crate::condition::Condition;

pub use class::ClassInterpreter;
pub use concept::ConceptInterpreter;
pub use conjunction::ConjunctionInterpreter;
pub use disjunction::DisjunctionInterpreter;
pub use namespace::NamespaceInterpreter;
pub use some_property::SomePropertyInterpreter;
pub use thing::ThingInterpreter;
pub use value::ValueInterpreter;

/// Compiles one description kind. Implementations hold no state; everything
/// mutable lives in the builder.
pub trait DescriptionInterpreter: Sync {
    fn can_interpret(&self, description: &Description) -> bool;

    fn interpret(&self, description: &Description, builder: &mut ConditionBuilder) -> Condition;
}

pub static INTERPRETERS: &[&dyn DescriptionInterpreter] = &[
    &ThingInterpreter,
    &NamespaceInterpreter,
    &ClassInterpreter,
    &ValueInterpreter,
    &SomePropertyInterpreter,
    &ConjunctionInterpreter,
    &DisjunctionInterpreter,
    &ConceptInterpreter,
];

pub fn interpreter_for(description: &Description) -> Option<&'static dyn DescriptionInterpreter> {
    INTERPRETERS
        .iter()
        .copied()
        .find(|interpreter| interpreter.can_interpret(description))
}

/// Value type the join variable carries inside a compound description: the
/// type of the first value constraint, else the order-by property's type.
fn compound_value_type(descriptions: &[Description], property: Option<&PropertyRef>) -> ValueType {
    descriptions
        .iter()
        .find_map(|d| match d {
            Description::Value { item, .. } => Some(item.value_type()),
            _ => None,
        })
        .or_else(|| property.map(PropertyRef::effective_value_type))
        .unwrap_or(ValueType::Page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use semquery_description::{Comparator, PageRef};

    fn samples() -> Vec<Description> {
        vec![
            Description::Thing,
            Description::namespace(0),
            Description::class([PageRef::category("A")]),
            Description::value(PageRef::main("B"), Comparator::Eq),
            Description::some_property(PropertyRef::new("P"), Description::Thing),
            Description::conjunction([]),
            Description::disjunction([]),
            Description::concept(PageRef::concept("C")),
        ]
    }

    #[test]
    fn test_exactly_one_interpreter_per_kind() {
        for description in samples() {
            let matching = INTERPRETERS
                .iter()
                .filter(|i| i.can_interpret(&description))
                .count();
            assert_eq!(matching, 1, "{}", description.kind_name());
        }
    }

    #[test]
    fn test_compound_value_type() {
        let numbers = [Description::value(
            semquery_description::DataValue::Number(3.0),
            Comparator::Eq,
        )];
        assert_eq!(compound_value_type(&numbers, None), ValueType::Number);
        assert_eq!(compound_value_type(&[], None), ValueType::Page);
        assert_eq!(
            compound_value_type(&[], Some(&PropertyRef::new("_MDAT"))),
            ValueType::Time
        );
    }
}
