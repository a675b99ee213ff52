//! Property constraints: `?subject <predicate> ?object` plus whatever the
//! inner description requires of the object.

use semquery_description::{Description, ValueType};

use super::DescriptionInterpreter;
use crate::builder::ConditionBuilder;
use crate::condition::{Condition, ConditionKind};
use crate::turtle::property_predicate;
use crate::vocab::RDFS_SUBPROPERTY_OF;

pub struct SomePropertyInterpreter;

impl DescriptionInterpreter for SomePropertyInterpreter {
    fn can_interpret(&self, description: &Description) -> bool {
        matches!(description, Description::SomeProperty { .. })
    }

    fn interpret(&self, description: &Description, builder: &mut ConditionBuilder) -> Condition {
        let Description::SomeProperty {
            property,
            description: inner,
        } = description
        else {
            unreachable!(
                "some-property interpreter dispatched a {} description",
                description.kind_name()
            );
        };

        let property = &builder.typed_property(property);
        let join = builder.join_variable().to_string();
        let order_by = builder.order_by_property().cloned();
        let object = builder.next_variable();
        let inner_order_by = builder
            .is_sort_key(&property.key)
            .then(|| property.non_inverse());

        builder
            .set_join_variable(object.clone())
            .set_order_by_property(inner_order_by.clone());
        let inner_condition = builder.interpret(inner);
        builder.set_join_variable(join.clone()).set_order_by_property(order_by);

        if inner_condition.is_false() {
            return inner_condition;
        }

        let mut predicate = property_predicate(property);
        let mut pattern = String::new();
        let mut property_variable = None;
        let has_fixed_predicate = property.predefined().is_some_and(|p| p.predicate.is_some());
        if !has_fixed_predicate && builder.has_subproperty(property) {
            let variable = builder.next_variable_with_prefix("sp");
            pattern.push_str(&format!("?{variable} {RDFS_SUBPROPERTY_OF}* {predicate} .\n"));
            predicate = format!("?{variable}");
            property_variable = Some(variable);
        }

        let mut inner_text = format!(
            "{}{}",
            inner_condition.weak_condition_string(),
            inner_condition.pattern()
        );
        let object_term = match inner_condition.singleton_value() {
            Some(value) => {
                inner_text = inner_text.replace(&format!("?{object} "), &format!("{value} "));
                value.to_string()
            }
            None => format!("?{object}"),
        };

        let (subject, object_term) = if property.inverse {
            (object_term, format!("?{join}"))
        } else {
            (format!("?{join}"), object_term)
        };
        pattern.push_str(&format!("{subject} {predicate} {object_term} .\n"));
        if matches!(inner_condition.kind, ConditionKind::Filter { .. }) {
            pattern.push_str(&inner_text);
        } else if !inner_text.is_empty() {
            pattern.push_str(&format!("{{ {inner_text}}}\n"));
        }

        let mut condition = Condition::where_pattern(pattern, true);
        condition.uses_variable(&join);
        if inner_condition.singleton_value().is_none() {
            condition.uses_variable(&object);
        }
        if let Some(variable) = &property_variable {
            condition.uses_variable(variable);
        }
        condition.variables.extend(inner_condition.variables.iter().cloned());
        condition.order_variables = inner_condition.order_variables.clone();
        if inner_order_by.is_some() {
            if let Some(order_variable) = &inner_condition.order_by_variable {
                condition
                    .order_variables
                    .insert(property.key.clone(), order_variable.clone());
            }
        }
        builder.add_order_by_data_for_property(&mut condition, &join, ValueType::Page);
        condition
    }
}
