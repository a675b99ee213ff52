//! Collaborator ports consulted during compilation.
//!
//! The compiler never talks to storage directly; it asks these narrow traits
//! whether a category has subcategories, whether a page is a redirect, and
//! what a concept page's defining description is. In-memory implementations
//! are provided for tests and for callers that preload the relevant facts.

use ahash::{AHashMap, AHashSet};
use semquery_description::{Description, PageRef, PropertyRef, ValueType};

use crate::error::ConceptStoreError;

pub trait HierarchyLookup: Send + Sync {
    fn has_subcategory(&self, category: &PageRef) -> bool;
    fn has_subproperty(&self, property: &PropertyRef) -> bool;
}

pub trait RedirectLookup: Send + Sync {
    /// Whether `page` is the source of a redirect and must be resolved to
    /// its target before matching.
    fn is_redirect(&self, page: &PageRef) -> bool;
}

/// Declared value types of properties, for properties a query names without
/// a type (sort keys in particular).
pub trait PropertyTypeLookup: Send + Sync {
    fn value_type(&self, property: &PropertyRef) -> Option<ValueType>;
}

pub trait ConceptStore: Send + Sync {
    fn defining_description(
        &self,
        concept: &PageRef,
    ) -> Result<Option<Description>, ConceptStoreError>;
}

/// Bounded visited-multiset used to stop recursive concept expansion.
pub trait CircularReferenceGuard: Send {
    /// Returns false when `id` may not be entered again.
    fn enter(&mut self, id: &str) -> bool;
    fn exit(&mut self, id: &str);
    fn reset(&mut self);
}

// ============================================================================
// In-memory implementations
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct StaticHierarchy {
    categories: AHashSet<PageRef>,
    properties: AHashSet<String>,
}

impl StaticHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `category` has at least one subcategory.
    pub fn with_subcategories(mut self, category: &PageRef) -> Self {
        self.categories.insert(category.clone());
        self
    }

    /// Record that `property` has at least one subproperty.
    pub fn with_subproperties(mut self, property: &PropertyRef) -> Self {
        self.properties.insert(property.key.clone());
        self
    }
}

impl HierarchyLookup for StaticHierarchy {
    fn has_subcategory(&self, category: &PageRef) -> bool {
        self.categories.contains(category)
    }

    fn has_subproperty(&self, property: &PropertyRef) -> bool {
        self.properties.contains(&property.key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticRedirects {
    sources: AHashSet<PageRef>,
}

impl StaticRedirects {
    pub fn new(sources: impl IntoIterator<Item = PageRef>) -> Self {
        Self {
            sources: sources.into_iter().collect(),
        }
    }
}

impl RedirectLookup for StaticRedirects {
    fn is_redirect(&self, page: &PageRef) -> bool {
        self.sources.contains(page)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticPropertyTypes {
    types: AHashMap<String, ValueType>,
}

impl StaticPropertyTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, key: impl AsRef<str>, value_type: ValueType) -> Self {
        self.types.insert(PropertyRef::new(key).key, value_type);
        self
    }
}

impl PropertyTypeLookup for StaticPropertyTypes {
    fn value_type(&self, property: &PropertyRef) -> Option<ValueType> {
        self.types.get(&property.key).copied()
    }
}

/// Allows each identity to be entered at most `max_depth` times at once.
#[derive(Debug, Clone)]
pub struct RecursionGuard {
    max_depth: usize,
    active: AHashMap<String, usize>,
}

impl RecursionGuard {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
            active: AHashMap::new(),
        }
    }

    pub fn depth_of(&self, id: &str) -> usize {
        self.active.get(id).copied().unwrap_or(0)
    }
}

impl Default for RecursionGuard {
    fn default() -> Self {
        Self::new(1)
    }
}

impl CircularReferenceGuard for RecursionGuard {
    fn enter(&mut self, id: &str) -> bool {
        let depth = self.active.entry(id.to_string()).or_insert(0);
        if *depth >= self.max_depth {
            return false;
        }
        *depth += 1;
        true
    }

    fn exit(&mut self, id: &str) {
        if let Some(depth) = self.active.get_mut(id) {
            *depth = depth.saturating_sub(1);
            if *depth == 0 {
                self.active.remove(id);
            }
        }
    }

    fn reset(&mut self) {
        self.active.clear();
    }
}

/// Concept definitions kept as serialized JSON, decoded on lookup.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConceptStore {
    definitions: AHashMap<PageRef, String>,
}

impl InMemoryConceptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, concept: &PageRef, description: &Description) -> serde_json::Result<()> {
        let json = serde_json::to_string(description)?;
        self.definitions.insert(concept.clone(), json);
        Ok(())
    }

    /// Store a raw serialized definition as-is.
    pub fn insert_raw(&mut self, concept: &PageRef, json: impl Into<String>) {
        self.definitions.insert(concept.clone(), json.into());
    }
}

impl ConceptStore for InMemoryConceptStore {
    fn defining_description(
        &self,
        concept: &PageRef,
    ) -> Result<Option<Description>, ConceptStoreError> {
        let Some(json) = self.definitions.get(concept) else {
            return Ok(None);
        };
        serde_json::from_str(json)
            .map(Some)
            .map_err(|source| ConceptStoreError::Malformed {
                concept: concept.title.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recursion_guard_bounds_reentry() {
        let mut guard = RecursionGuard::new(1);
        assert!(guard.enter("concept:A"));
        assert!(!guard.enter("concept:A"));
        assert!(guard.enter("concept:B"));
        guard.exit("concept:A");
        assert_eq!(guard.depth_of("concept:A"), 0);
        assert!(guard.enter("concept:A"));
    }

    #[test]
    fn test_recursion_guard_depth_two() {
        let mut guard = RecursionGuard::new(2);
        assert!(guard.enter("x"));
        assert!(guard.enter("x"));
        assert!(!guard.enter("x"));
        guard.reset();
        assert_eq!(guard.depth_of("x"), 0);
    }

    #[test]
    fn test_concept_store_roundtrip_and_malformed() {
        let mut store = InMemoryConceptStore::new();
        let big = PageRef::concept("Big cities");
        let definition = Description::class([PageRef::category("City")]);
        store.insert(&big, &definition).unwrap();
        assert_eq!(store.defining_description(&big).unwrap(), Some(definition));

        assert_eq!(
            store.defining_description(&PageRef::concept("Nope")).unwrap(),
            None
        );

        assert_eq!(store.defining_description(&PageRef::main("Big cities")).unwrap(), None);

        let broken = PageRef::concept("Broken");
        store.insert_raw(&broken, "{\"kind\":");
        let err = store.defining_description(&broken).unwrap_err();
        assert!(matches!(err, ConceptStoreError::Malformed { .. }));
    }

    #[test]
    fn test_static_lookups() {
        let hierarchy = StaticHierarchy::new()
            .with_subcategories(&PageRef::category("Animal"))
            .with_subproperties(&PropertyRef::new("Located in"));
        assert!(hierarchy.has_subcategory(&PageRef::category("Animal")));
        assert!(!hierarchy.has_subcategory(&PageRef::category("Plant")));
        assert!(!hierarchy.has_subcategory(&PageRef::main("Animal")));
        assert!(hierarchy.has_subproperty(&PropertyRef::new("Located_in")));

        let types = StaticPropertyTypes::new().with_type("Has population", ValueType::Number);
        assert_eq!(
            types.value_type(&PropertyRef::new("Has_population")),
            Some(ValueType::Number)
        );
        assert_eq!(types.value_type(&PropertyRef::new("Capital")), None);

        let redirects = StaticRedirects::new([PageRef::main("NYC")]);
        assert!(redirects.is_redirect(&PageRef::main("NYC")));
        assert!(!redirects.is_redirect(&PageRef::main("New York")));
    }
}
