use semquery_description::{Description, ValueType};

use super::DescriptionInterpreter;
use crate::builder::ConditionBuilder;
use crate::condition::Condition;
use crate::turtle::typed_literal;
use crate::vocab::{SWIVT_WIKI_NAMESPACE, XSD_INTEGER};

pub struct NamespaceInterpreter;

impl DescriptionInterpreter for NamespaceInterpreter {
    fn can_interpret(&self, description: &Description) -> bool {
        matches!(description, Description::Namespace { .. })
    }

    fn interpret(&self, description: &Description, builder: &mut ConditionBuilder) -> Condition {
        let Description::Namespace { namespace } = description else {
            unreachable!("namespace interpreter dispatched a {} description", description.kind_name());
        };
        let join = builder.join_variable().to_string();
        let literal = typed_literal(&namespace.to_string(), XSD_INTEGER);
        let mut condition =
            Condition::where_pattern(format!("{{ ?{join} {SWIVT_WIKI_NAMESPACE} {literal} . }}\n"), true);
        condition.uses_variable(&join);
        builder.add_order_by_data_for_property(&mut condition, &join, ValueType::Page);
        condition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_pattern() {
        let mut builder = ConditionBuilder::default();
        let condition = builder.interpret(&Description::namespace(14));
        assert_eq!(
            condition.pattern(),
            "{ ?result swivt:wikiNamespace \"14\"^^xsd:integer . }\n"
        );
        assert!(condition.is_safe());
    }
}
