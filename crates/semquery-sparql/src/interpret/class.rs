use semquery_description::{Description, ValueType};

use super::DescriptionInterpreter;
use crate::builder::ConditionBuilder;
use crate::condition::{Condition, FalseReason};
use crate::vocab::{RDFS_SUBCLASS_OF, RDF_TYPE};

pub struct ClassInterpreter;

impl DescriptionInterpreter for ClassInterpreter {
    fn can_interpret(&self, description: &Description) -> bool {
        matches!(description, Description::Class { .. })
    }

    fn interpret(&self, description: &Description, builder: &mut ConditionBuilder) -> Condition {
        let Description::Class { categories } = description else {
            unreachable!("class interpreter dispatched a {} description", description.kind_name());
        };
        if categories.is_empty() {
            return builder.contradiction(FalseReason::EmptyClass);
        }

        let join = builder.join_variable().to_string();
        let mut branches = Vec::with_capacity(categories.len());
        let mut class_variables = Vec::new();
        for category in categories {
            let resource = builder.category_resource(category);
            if builder.has_subcategory(category) {
                let class_variable = builder.next_variable_with_prefix("sc");
                branches.push(format!(
                    "{{ ?{join} {RDF_TYPE} ?{class_variable} . ?{class_variable} {RDFS_SUBCLASS_OF}* {resource} . }}\n"
                ));
                class_variables.push(class_variable);
            } else {
                branches.push(format!("{{ ?{join} {RDF_TYPE} {resource} . }}\n"));
            }
        }

        let mut condition = Condition::where_pattern(branches.join("UNION\n"), true);
        condition.uses_variable(&join);
        for variable in &class_variables {
            condition.uses_variable(variable);
        }
        builder.add_order_by_data_for_property(&mut condition, &join, ValueType::Page);
        condition
    }
}
