//! The condition builder: compilation context threaded through interpreters.
//!
//! One builder compiles one description tree at a time. It owns every piece
//! of mutable state the interpreters need (variable counter, current join
//! variable, the order-by property, redirect variables, collected warnings)
//! plus the collaborator ports. Interpreters are stateless and receive the
//! builder by `&mut`.

use std::collections::BTreeSet;
use std::sync::Arc;

use semquery_description::{Description, PageRef, PropertyRef, ValueType};

use crate::condition::{Condition, FalseReason};
use crate::config::{CompilerConfig, QueryFeatures};
use crate::error::{CompileError, CompileResult};
use crate::interpret::interpreter_for;
use crate::ports::{
    CircularReferenceGuard, ConceptStore, HierarchyLookup, PropertyTypeLookup, RecursionGuard,
    RedirectLookup,
};
use crate::turtle::{category_resource, page_resource};
use crate::vocab::{SWIVT_PAGE, SWIVT_REDIRECTS_TO, SWIVT_SORT_KEY};

/// Bound by the existence pattern of unsafe conditions.
const EXISTENCE_VARIABLE: &str = "url";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

pub struct ConditionBuilder {
    config: CompilerConfig,
    result_variable: String,
    join_variable: String,
    order_by_property: Option<PropertyRef>,
    sort_keys: Vec<(String, SortDirection)>,
    hierarchy: Option<Arc<dyn HierarchyLookup>>,
    redirects: Option<Arc<dyn RedirectLookup>>,
    property_types: Option<Arc<dyn PropertyTypeLookup>>,
    concepts: Option<Arc<dyn ConceptStore>>,
    guard: Box<dyn CircularReferenceGuard>,
    counter: usize,
    allocated: BTreeSet<String>,
    redirect_variables: Vec<(PageRef, String)>,
    warnings: Vec<String>,
}

impl Default for ConditionBuilder {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}

impl ConditionBuilder {
    pub fn new(config: CompilerConfig) -> Self {
        let result_variable = config.result_variable.clone();
        let guard = RecursionGuard::new(config.max_concept_depth);
        let mut allocated = BTreeSet::new();
        allocated.insert(result_variable.clone());
        Self {
            config,
            join_variable: result_variable.clone(),
            result_variable,
            order_by_property: None,
            sort_keys: Vec::new(),
            hierarchy: None,
            redirects: None,
            property_types: None,
            concepts: None,
            guard: Box::new(guard),
            counter: 0,
            allocated,
            redirect_variables: Vec::new(),
            warnings: Vec::new(),
        }
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Sets the result variable; the join variable follows it.
    pub fn set_result_variable(&mut self, name: impl Into<String>) -> &mut Self {
        self.result_variable = name.into();
        self.join_variable = self.result_variable.clone();
        self.allocated.insert(self.result_variable.clone());
        self
    }

    pub fn set_join_variable(&mut self, name: impl Into<String>) -> &mut Self {
        self.join_variable = name.into();
        self
    }

    pub fn set_order_by_property(&mut self, property: Option<PropertyRef>) -> &mut Self {
        self.order_by_property = property;
        self
    }

    /// Property keys to sort by, in priority order. `""` (or `"#"`) sorts by
    /// the result page itself.
    pub fn set_sort_keys<K: Into<String>>(
        &mut self,
        keys: impl IntoIterator<Item = (K, SortDirection)>,
    ) -> &mut Self {
        self.sort_keys = keys.into_iter().map(|(k, d)| (k.into(), d)).collect();
        self
    }

    pub fn set_hierarchy_lookup(&mut self, lookup: Arc<dyn HierarchyLookup>) -> &mut Self {
        self.hierarchy = Some(lookup);
        self
    }

    pub fn set_redirect_lookup(&mut self, lookup: Arc<dyn RedirectLookup>) -> &mut Self {
        self.redirects = Some(lookup);
        self
    }

    pub fn set_property_type_lookup(&mut self, lookup: Arc<dyn PropertyTypeLookup>) -> &mut Self {
        self.property_types = Some(lookup);
        self
    }

    pub fn set_concept_store(&mut self, store: Arc<dyn ConceptStore>) -> &mut Self {
        self.concepts = Some(store);
        self
    }

    pub fn set_circular_reference_guard(
        &mut self,
        guard: Box<dyn CircularReferenceGuard>,
    ) -> &mut Self {
        self.guard = guard;
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn features(&self) -> &QueryFeatures {
        &self.config.features
    }

    pub fn result_variable(&self) -> &str {
        &self.result_variable
    }

    pub fn join_variable(&self) -> &str {
        &self.join_variable
    }

    pub fn order_by_property(&self) -> Option<&PropertyRef> {
        self.order_by_property.as_ref()
    }

    pub fn sort_keys(&self) -> &[(String, SortDirection)] {
        &self.sort_keys
    }

    pub fn is_sort_key(&self, key: &str) -> bool {
        self.sort_keys.iter().any(|(k, _)| k == key)
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    // ========================================================================
    // Variables
    // ========================================================================

    /// A fresh `vN` variable.
    pub fn next_variable(&mut self) -> String {
        self.next_variable_with_prefix("v")
    }

    /// A fresh variable sharing the `vN` counter (`sc3`, `sp4`, `r5`, ...).
    pub fn next_variable_with_prefix(&mut self, prefix: &str) -> String {
        self.counter += 1;
        let name = format!("{prefix}{}", self.counter);
        self.allocated.insert(name.clone());
        name
    }

    /// The sort-key shadow of `variable` (`<variable>sk`).
    pub fn shadow_variable(&mut self, variable: &str) -> String {
        let name = format!("{variable}sk");
        self.allocated.insert(name.clone());
        name
    }

    pub fn allocated_variables(&self) -> &BTreeSet<String> {
        &self.allocated
    }

    // ========================================================================
    // Ports
    // ========================================================================

    pub fn has_subcategory(&self, category: &PageRef) -> bool {
        self.config.features.subclass_closure
            && self
                .hierarchy
                .as_ref()
                .is_some_and(|h| h.has_subcategory(category))
    }

    pub fn has_subproperty(&self, property: &PropertyRef) -> bool {
        self.config.features.subproperty_closure
            && self
                .hierarchy
                .as_ref()
                .is_some_and(|h| h.has_subproperty(property))
    }

    /// Variable standing for the redirect target of `page`, if it is a
    /// redirect. The same page always gets the same variable within one
    /// compilation.
    pub fn redirect_variable_for(&mut self, page: &PageRef) -> Option<String> {
        if !self.config.features.redirects {
            return None;
        }
        if !self.redirects.as_ref()?.is_redirect(page) {
            return None;
        }
        if let Some((_, variable)) = self.redirect_variables.iter().find(|(p, _)| p == page) {
            return Some(variable.clone());
        }
        let variable = self.next_variable_with_prefix("r");
        self.redirect_variables.push((page.clone(), variable.clone()));
        Some(variable)
    }

    /// `property` with its declared type filled in from the type lookup when
    /// the query did not state one.
    pub fn typed_property(&self, property: &PropertyRef) -> PropertyRef {
        if property.value_type.is_some() || property.is_predefined() {
            return property.clone();
        }
        let value_type = self
            .property_types
            .as_ref()
            .and_then(|lookup| lookup.value_type(property));
        PropertyRef {
            value_type,
            ..property.clone()
        }
    }

    pub fn enter_reference(&mut self, id: &str) -> bool {
        self.guard.enter(id)
    }

    pub fn exit_reference(&mut self, id: &str) {
        self.guard.exit(id);
    }

    /// Defining description of a concept. Missing definitions and store
    /// failures both come back as `None`.
    pub fn concept_definition(&self, concept: &PageRef) -> Option<Description> {
        let store = self.concepts.as_ref()?;
        match store.defining_description(concept) {
            Ok(definition) => definition,
            Err(err) => {
                tracing::warn!(concept = %concept.title, error = %err, "failed to load concept definition");
                None
            }
        }
    }

    pub fn page_resource(&self, page: &PageRef) -> String {
        page_resource(page, &self.config.page_iri_base)
    }

    pub fn category_resource(&self, category: &PageRef) -> String {
        category_resource(category, &self.config.page_iri_base)
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Make `variable` the ordering variable of `condition`. Pages sort by
    /// their sort key, bound through a weak condition on the shadow variable.
    pub fn add_order_by_data(
        &mut self,
        condition: &mut Condition,
        variable: &str,
        value_type: ValueType,
    ) {
        condition.uses_variable(variable);
        if value_type == ValueType::Page {
            let shadow = self.shadow_variable(variable);
            condition.set_weak_condition(
                &shadow,
                format!("?{variable} {SWIVT_SORT_KEY} ?{shadow} .\n"),
            );
            condition.uses_variable(&shadow);
            condition.order_by_variable = Some(shadow);
        } else {
            condition.order_by_variable = Some(variable.to_string());
        }
    }

    /// Record ordering data for the current order-by property, if any.
    pub fn add_order_by_data_for_property(
        &mut self,
        condition: &mut Condition,
        variable: &str,
        value_type: ValueType,
    ) {
        let Some(property) = self.order_by_property.clone() else {
            return;
        };
        self.add_order_by_data(condition, variable, value_type);
        if let Some(order_variable) = condition.order_by_variable.clone() {
            condition.order_variables.insert(property.key, order_variable);
        }
    }

    // ========================================================================
    // Compilation
    // ========================================================================

    /// An unsatisfiable condition; the reason is logged, never rendered.
    pub fn contradiction(&self, reason: FalseReason) -> Condition {
        tracing::debug!(reason = ?reason, join = %self.join_variable, "condition is unsatisfiable");
        Condition::falsity(reason)
    }

    /// Dispatch `description` to its interpreter. The join variable and the
    /// order-by property are the same afterwards as before.
    ///
    /// # Panics
    ///
    /// If no interpreter is registered for the description kind.
    pub fn interpret(&mut self, description: &Description) -> Condition {
        let interpreter = interpreter_for(description).unwrap_or_else(|| {
            panic!(
                "no interpreter registered for {} descriptions",
                description.kind_name()
            )
        });
        let join_variable = self.join_variable.clone();
        let order_by_property = self.order_by_property.clone();
        let condition = interpreter.interpret(description, self);
        self.join_variable = join_variable;
        self.order_by_property = order_by_property;
        condition
    }

    /// Compile a whole description tree against the result variable.
    ///
    /// Resets per-compilation state first, so compiling the same tree twice
    /// yields the same condition.
    pub fn build_condition(&mut self, description: &Description) -> CompileResult<Condition> {
        if let Some((key, _)) = self
            .sort_keys
            .iter()
            .find(|(key, _)| key.chars().any(char::is_whitespace))
        {
            return Err(CompileError::InvalidSortKey(key.clone()));
        }
        if !is_valid_variable(&self.result_variable) {
            return Err(CompileError::InvalidVariable(self.result_variable.clone()));
        }
        if is_generated_variable(&self.result_variable) {
            return Err(CompileError::ReservedVariable(self.result_variable.clone()));
        }

        self.reset();
        tracing::debug!(
            query = %description.query_string(),
            depth = description.depth(),
            sort_keys = self.sort_keys.len(),
            "compiling description"
        );

        let configured_order_by = self.order_by_property.clone();
        self.join_variable = self.result_variable.clone();
        let mut condition = self.interpret(description);
        if condition.is_false() {
            return Ok(condition);
        }

        self.add_missing_order_by_conditions(&mut condition);
        self.add_redirect_conditions(&mut condition);
        self.join_variable = self.result_variable.clone();
        self.order_by_property = configured_order_by;

        let result = self.result_variable.clone();
        condition.uses_variable(&result);
        Ok(condition)
    }

    fn reset(&mut self) {
        self.counter = 0;
        self.allocated.clear();
        self.allocated.insert(self.result_variable.clone());
        self.redirect_variables.clear();
        self.warnings.clear();
        self.guard.reset();
    }

    /// Bind an ordering variable for every sort key the condition does not
    /// already order by. Properties the query does not constrain are joined
    /// optionally so that entities without a value still match.
    fn add_missing_order_by_conditions(&mut self, condition: &mut Condition) {
        let keys: Vec<String> = self.sort_keys.iter().map(|(k, _)| k.clone()).collect();
        for key in keys {
            if condition.order_variables.contains_key(&key) {
                continue;
            }
            if key.is_empty() || key == "#" {
                let result = self.result_variable.clone();
                self.add_order_by_data(condition, &result, ValueType::Page);
                if let Some(order_variable) = condition.order_by_variable.clone() {
                    condition.order_variables.insert(key, order_variable);
                }
                continue;
            }

            let auxiliary = Description::some_property(
                self.typed_property(&PropertyRef::new(&key)),
                Description::Thing,
            );
            self.join_variable = self.result_variable.clone();
            self.order_by_property = None;
            let aux_condition = self.interpret(&auxiliary);
            let Some(order_variable) = aux_condition.order_variables.get(&key).cloned() else {
                continue;
            };
            condition.set_weak_condition(
                &order_variable,
                format!(
                    "OPTIONAL {{ {}{}}}\n",
                    aux_condition.weak_condition_string(),
                    aux_condition.pattern()
                ),
            );
            condition.variables.extend(aux_condition.variables);
            condition.order_variables.insert(key, order_variable);
        }
    }

    fn add_redirect_conditions(&self, condition: &mut Condition) {
        for (page, variable) in &self.redirect_variables {
            condition.set_weak_condition(
                variable,
                format!("{} {SWIVT_REDIRECTS_TO} ?{variable} .\n", self.page_resource(page)),
            );
            condition.uses_variable(variable);
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Graph-pattern text of a condition, ready to sit inside `WHERE { }`.
    pub fn render(&self, condition: &Condition) -> String {
        if condition.is_false() {
            return condition.pattern();
        }
        let mut text = condition.weak_condition_string();
        if text.is_empty() && !condition.is_safe() {
            text = format!(
                "?{} {SWIVT_PAGE} ?{EXISTENCE_VARIABLE} .\n",
                self.result_variable
            );
        }
        text.push_str(&condition.pattern());
        if let Some(value) = condition.singleton_value() {
            text = text.replace(&format!("?{} ", self.result_variable), &format!("{value} "));
        }
        text
    }
}

fn is_valid_variable(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Names the builder may hand out itself: `url`, counter variables
/// (`v1`, `sc2`, `sp3`, `r4`) and their `sk` shadows.
fn is_generated_variable(name: &str) -> bool {
    if name == EXISTENCE_VARIABLE {
        return true;
    }
    let stem = name.strip_suffix("sk").unwrap_or(name);
    ["v", "sc", "sp", "r"].iter().any(|prefix| {
        stem.strip_prefix(prefix)
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
    })
}
