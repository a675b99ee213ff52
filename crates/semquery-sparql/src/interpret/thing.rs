use semquery_description::{Description, ValueType};

use super::DescriptionInterpreter;
use crate::builder::ConditionBuilder;
use crate::condition::Condition;

pub struct ThingInterpreter;

impl DescriptionInterpreter for ThingInterpreter {
    fn can_interpret(&self, description: &Description) -> bool {
        matches!(description, Description::Thing)
    }

    fn interpret(&self, _description: &Description, builder: &mut ConditionBuilder) -> Condition {
        let join = builder.join_variable().to_string();
        let value_type = builder
            .order_by_property()
            .map(|p| p.effective_value_type())
            .unwrap_or(ValueType::Page);
        let mut condition = Condition::truth();
        builder.add_order_by_data_for_property(&mut condition, &join, value_type);
        condition
    }
}
