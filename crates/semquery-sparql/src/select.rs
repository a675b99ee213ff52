//! Full `SELECT` queries around a rendered condition.

use crate::builder::ConditionBuilder;
use crate::condition::Condition;
use crate::vocab::ALL_PREFIXES;

impl ConditionBuilder {
    /// Order variables in sort-key order, each with its direction keyword.
    fn ordering(&self, condition: &Condition) -> Vec<(String, &'static str)> {
        let mut ordering: Vec<(String, &'static str)> = Vec::new();
        for (key, direction) in self.sort_keys() {
            if let Some(variable) = condition.order_variables.get(key) {
                if !ordering.iter().any(|(v, _)| v == variable) {
                    ordering.push((variable.clone(), direction.keyword()));
                }
            }
        }
        ordering
    }

    /// `PREFIX` declarations for every prefix the rendered text uses, then
    /// `SELECT DISTINCT` over the result and order variables.
    pub fn select_query(&self, condition: &Condition) -> String {
        let body = self.render(condition);
        let ordering = self.ordering(condition);

        let mut query = String::new();
        for prefix in ALL_PREFIXES {
            if body.contains(&format!("{}:", prefix.label())) {
                query.push_str(&format!(
                    "PREFIX {}: <{}>\n",
                    prefix.label(),
                    prefix.iri(&self.config().property_namespace)
                ));
            }
        }

        query.push_str(&format!("SELECT DISTINCT ?{}", self.result_variable()));
        for (variable, _) in &ordering {
            query.push_str(&format!(" ?{variable}"));
        }
        query.push_str(" WHERE {\n");
        query.push_str(&body);
        query.push_str("}\n");

        if !ordering.is_empty() {
            let terms: Vec<String> = ordering
                .iter()
                .map(|(variable, keyword)| format!("{keyword}(?{variable})"))
                .collect();
            query.push_str(&format!("ORDER BY {}\n", terms.join(" ")));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::{ConditionBuilder, SortDirection};
    use semquery_description::{Description, PageRef, PropertyRef};

    #[test]
    fn test_select_with_prefixes() {
        let mut builder = ConditionBuilder::default();
        let condition = builder
            .build_condition(&Description::class([PageRef::category("City")]))
            .unwrap();
        assert_eq!(
            builder.select_query(&condition),
            "PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>\n\
             SELECT DISTINCT ?result WHERE {\n\
             { ?result rdf:type <City> . }\n\
             }\n"
        );
    }

    #[test]
    fn test_select_orders_by_sort_keys() {
        let mut builder = ConditionBuilder::default();
        builder.set_sort_keys([
            ("Population", SortDirection::Desc),
            ("", SortDirection::Asc),
        ]);
        let d = Description::some_property(PropertyRef::new("Population"), Description::Thing);
        let condition = builder.build_condition(&d).unwrap();
        let query = builder.select_query(&condition);
        assert!(query.contains("SELECT DISTINCT ?result ?v1sk ?resultsk WHERE {"));
        assert!(query.ends_with("ORDER BY DESC(?v1sk) ASC(?resultsk)\n"));
        assert!(query.contains("PREFIX property: <http://example.org/id/Property-3A>\n"));
        assert!(query.contains("PREFIX swivt: <http://semantic-mediawiki.org/swivt/1.0#>\n"));
    }

    #[test]
    fn test_false_selects_nothing() {
        let mut builder = ConditionBuilder::default();
        builder.set_sort_keys([("", SortDirection::Asc)]);
        let condition = builder.build_condition(&Description::class([])).unwrap();
        let query = builder.select_query(&condition);
        assert!(query.starts_with("SELECT DISTINCT ?result WHERE {\n<http://www.example.org>"));
        assert!(!query.contains("ORDER BY"));
    }
}
