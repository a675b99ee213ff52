//! Disjunctions.
//!
//! Graph-pattern branches become a `UNION`; filter branches and plain value
//! bindings become one `||` filter. When both kinds occur, the union is bound
//! to a fresh variable inside `OPTIONAL { }` and the filter also accepts the
//! join variable being equal to it.

use semquery_description::Description;

use super::{compound_value_type, DescriptionInterpreter};
use crate::builder::ConditionBuilder;
use crate::condition::{Condition, ConditionKind, FalseReason};

pub struct DisjunctionInterpreter;

impl DescriptionInterpreter for DisjunctionInterpreter {
    fn can_interpret(&self, description: &Description) -> bool {
        matches!(description, Description::Disjunction { .. })
    }

    fn interpret(&self, description: &Description, builder: &mut ConditionBuilder) -> Condition {
        let Description::Disjunction { descriptions } = description else {
            unreachable!("disjunction interpreter dispatched a {} description", description.kind_name());
        };

        let join = builder.join_variable().to_string();
        let order_by = builder.order_by_property().cloned();
        let value_type = compound_value_type(descriptions, order_by.as_ref());
        let mut branches: Vec<String> = Vec::new();
        let mut filters: Vec<String> = Vec::new();
        let mut has_safe = false;
        let mut merged = Condition::truth();

        builder.set_order_by_property(None);
        for child in descriptions {
            let sub = builder.interpret(child);
            match &sub.kind {
                ConditionKind::False(_) => continue,
                ConditionKind::True => {
                    builder.set_order_by_property(order_by);
                    let mut condition = Condition::truth();
                    builder.add_order_by_data_for_property(&mut condition, &join, value_type);
                    return condition;
                }
                ConditionKind::Where { pattern, safe } => {
                    branches.push(format!("{{\n{pattern}}}"));
                    has_safe |= *safe;
                }
                ConditionKind::Filter { filter } => filters.push(filter.clone()),
                ConditionKind::Singleton {
                    value,
                    pattern,
                    safe,
                } => {
                    if pattern.is_empty() {
                        filters.push(format!("?{join} = {value}"));
                    } else {
                        branches.push(format!("{{\n{pattern} FILTER( ?{join} = {value} ) }}"));
                    }
                    has_safe |= *safe;
                }
            }
            merged.absorb(&sub);
        }
        builder.set_order_by_property(order_by);

        let union = branches.join(" UNION ");
        let filter = filters.join(" || ");
        if union.is_empty() && filter.is_empty() {
            return builder.contradiction(FalseReason::EmptyDisjunction);
        }
        merged.kind = if union.is_empty() {
            ConditionKind::Filter { filter }
        } else if filter.is_empty() {
            ConditionKind::Where {
                pattern: union,
                safe: has_safe,
            }
        } else {
            let auxiliary = builder.next_variable();
            let union = union.replace(&format!("?{join} "), &format!("?{auxiliary} "));
            merged.uses_variable(&auxiliary);
            ConditionKind::Where {
                pattern: format!(
                    "OPTIONAL {{ {union} }}\n FILTER( {filter} || ?{join} = ?{auxiliary} )\n"
                ),
                safe: false,
            }
        };
        merged.uses_variable(&join);

        builder.add_order_by_data_for_property(&mut merged, &join, value_type);
        merged
    }
}
