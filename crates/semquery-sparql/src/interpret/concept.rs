use semquery_description::Description;

use super::DescriptionInterpreter;
use crate::builder::ConditionBuilder;
use crate::condition::{Condition, FalseReason};

pub struct ConceptInterpreter;

impl DescriptionInterpreter for ConceptInterpreter {
    fn can_interpret(&self, description: &Description) -> bool {
        matches!(description, Description::Concept { .. })
    }

    fn interpret(&self, description: &Description, builder: &mut ConditionBuilder) -> Condition {
        let Description::Concept { concept } = description else {
            unreachable!("concept interpreter dispatched a {} description", description.kind_name());
        };

        let id = format!("concept:{}", concept.title);
        if !builder.enter_reference(&id) {
            tracing::debug!(concept = %concept.title, "circular concept reference");
            builder.push_warning(format!(
                "Concept:{} refers to itself and was not expanded",
                concept.title
            ));
            return builder.contradiction(FalseReason::CircularConcept);
        }

        let condition = match builder.concept_definition(concept) {
            Some(definition) => builder.interpret(&definition),
            None => builder.contradiction(FalseReason::UndefinedConcept),
        };
        builder.exit_reference(&id);
        condition
    }
}
