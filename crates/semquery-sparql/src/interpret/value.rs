//! Value constraints: equality, ordering comparisons and pattern matching.

use semquery_description::{Comparator, DataValue, Description};

use super::DescriptionInterpreter;
use crate::builder::ConditionBuilder;
use crate::condition::{Condition, ConditionKind, FalseReason};
use crate::turtle::{exact_regex, like_pattern_regex, match_term, sort_key_literal};

pub struct ValueInterpreter;

impl DescriptionInterpreter for ValueInterpreter {
    fn can_interpret(&self, description: &Description) -> bool {
        matches!(description, Description::Value { .. })
    }

    fn interpret(&self, description: &Description, builder: &mut ConditionBuilder) -> Condition {
        let Description::Value {
            item, comparator, ..
        } = description
        else {
            unreachable!("value interpreter dispatched a {} description", description.kind_name());
        };

        if matches!(item, DataValue::GeoCoord { .. } | DataValue::Concept(_)) {
            return builder.contradiction(FalseReason::UnsupportedValue);
        }

        let join = builder.join_variable().to_string();
        let mut condition = match comparator {
            Comparator::Eq => equality_condition(item, &join, builder),
            Comparator::Less => comparison_condition(item, "<", &join, builder),
            Comparator::Greater => comparison_condition(item, ">", &join, builder),
            Comparator::Leq => comparison_condition(item, "<=", &join, builder),
            Comparator::Geq => comparison_condition(item, ">=", &join, builder),
            Comparator::Neq => comparison_condition(item, "!=", &join, builder),
            Comparator::Like
            | Comparator::NotLike
            | Comparator::LikeNoCase
            | Comparator::NotLikeNoCase
            | Comparator::EqNoCase
            | Comparator::NeqNoCase => regex_condition(item, *comparator, &join, builder),
            Comparator::In | Comparator::Phrase | Comparator::Not | Comparator::Unsupported => {
                Condition::truth()
            }
        };
        if condition.is_false() {
            return condition;
        }
        builder.add_order_by_data_for_property(&mut condition, &join, item.value_type());
        condition
    }
}

fn equality_condition(item: &DataValue, join: &str, builder: &mut ConditionBuilder) -> Condition {
    if let Some(page) = item.as_page() {
        if let Some(redirect) = builder.redirect_variable_for(page) {
            let mut condition = Condition::filter(format!("?{join} = ?{redirect}"));
            condition.uses_variable(join);
            condition.uses_variable(&redirect);
            return condition;
        }
    }
    match match_term(item, &builder.config().page_iri_base) {
        Some(term) => Condition::singleton(term, "", false),
        None => builder.contradiction(FalseReason::UnsupportedValue),
    }
}

/// `?var op value`, where pages compare through their sort key.
fn comparison_condition(
    item: &DataValue,
    operator: &str,
    join: &str,
    builder: &mut ConditionBuilder,
) -> Condition {
    let term = match item {
        DataValue::Page(page) => Some(sort_key_literal(page)),
        other => match_term(other, &builder.config().page_iri_base),
    };
    let Some(term) = term else {
        return builder.contradiction(FalseReason::UnsupportedValue);
    };
    let mut condition = Condition::filter("");
    builder.add_order_by_data(&mut condition, join, item.value_type());
    let Some(order_variable) = condition.order_by_variable.clone() else {
        return builder.contradiction(FalseReason::UnsupportedValue);
    };
    condition.kind = ConditionKind::Filter {
        filter: format!("?{order_variable} {operator} {term}"),
    };
    condition
}

fn regex_condition(
    item: &DataValue,
    comparator: Comparator,
    join: &str,
    builder: &mut ConditionBuilder,
) -> Condition {
    let (text, target) = match item {
        DataValue::Text(text) => (text.clone(), format!("?{join}")),
        DataValue::Uri(uri) => (uri.clone(), format!("str( ?{join} )")),
        DataValue::Page(page) => (page.sort_key(), String::new()),
        _ => return Condition::truth(),
    };

    let pattern = match comparator {
        Comparator::EqNoCase | Comparator::NeqNoCase => exact_regex(&text),
        _ => like_pattern_regex(&text),
    };
    let negated = matches!(
        comparator,
        Comparator::NotLike | Comparator::NotLikeNoCase | Comparator::NeqNoCase
    );
    let flags = if comparator.is_case_insensitive() || builder.features().no_case {
        "si"
    } else {
        "s"
    };

    let mut condition = Condition::filter("");
    let target = if item.as_page().is_some() {
        builder.add_order_by_data(&mut condition, join, item.value_type());
        let Some(shadow) = condition.order_by_variable.clone() else {
            return Condition::truth();
        };
        format!("?{shadow}")
    } else {
        condition.uses_variable(join);
        target
    };
    let negation = if negated { "!" } else { "" };
    condition.kind = ConditionKind::Filter {
        filter: format!("{negation}regex( {target}, \"{pattern}\", \"{flags}\" )"),
    };
    condition
}
