use semquery_description::Description;

use super::{compound_value_type, DescriptionInterpreter};
use crate::builder::ConditionBuilder;
use crate::condition::{Condition, ConditionKind, FalseReason};

pub struct ConjunctionInterpreter;

impl DescriptionInterpreter for ConjunctionInterpreter {
    fn can_interpret(&self, description: &Description) -> bool {
        matches!(description, Description::Conjunction { .. })
    }

    fn interpret(&self, description: &Description, builder: &mut ConditionBuilder) -> Condition {
        let Description::Conjunction { descriptions } = description else {
            unreachable!("conjunction interpreter dispatched a {} description", description.kind_name());
        };

        let join = builder.join_variable().to_string();
        let order_by = builder.order_by_property().cloned();
        let mut pattern = String::new();
        let mut filters: Vec<String> = Vec::new();
        let mut singleton: Option<String> = None;
        let mut has_safe = false;
        let mut merged = Condition::truth();

        // Children are ordered as a whole below.
        builder.set_order_by_property(None);
        for child in descriptions {
            let sub = builder.interpret(child);
            if sub.is_false() {
                return sub;
            }
            match &sub.kind {
                ConditionKind::True | ConditionKind::False(_) => {}
                ConditionKind::Where { pattern: p, safe } => {
                    pattern.push_str(p);
                    has_safe |= *safe;
                }
                ConditionKind::Filter { filter } => filters.push(filter.clone()),
                ConditionKind::Singleton {
                    value,
                    pattern: p,
                    safe,
                } => {
                    match &singleton {
                        None => singleton = Some(value.clone()),
                        Some(existing) if existing != value => {
                            return builder.contradiction(FalseReason::ConflictingSingletons);
                        }
                        Some(_) => {}
                    }
                    pattern.push_str(p);
                    has_safe |= *safe;
                }
            }
            merged.absorb(&sub);
            merged.order_variables.extend(sub.order_variables);
        }
        builder.set_order_by_property(order_by);

        let filter = filters.join(" && ");
        if !filter.is_empty() && (singleton.is_some() || !pattern.is_empty()) {
            pattern.push_str(&format!("FILTER( {filter} )\n"));
        }
        merged.kind = match singleton {
            Some(value) => ConditionKind::Singleton {
                value,
                pattern,
                safe: has_safe,
            },
            None if pattern.is_empty() && filter.is_empty() => ConditionKind::True,
            None if pattern.is_empty() => ConditionKind::Filter { filter },
            None => ConditionKind::Where {
                pattern,
                safe: has_safe,
            },
        };

        let value_type = compound_value_type(descriptions, builder.order_by_property());
        builder.add_order_by_data_for_property(&mut merged, &join, value_type);
        merged
    }
}
