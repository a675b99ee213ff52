//! Condition algebra: the compiled form of a description.
//!
//! A [`Condition`] is one of five kinds plus metadata shared by all of them:
//!
//! - **True**: no constraint beyond whatever already binds the join variable.
//! - **False**: unsatisfiable; always rendered as [`FALSE_PATTERN`].
//! - **Where**: a graph pattern.
//! - **Filter**: a boolean expression over bound variables.
//! - **Singleton**: the join variable equals one concrete term.
//!
//! *Weak conditions* are patterns that only bind auxiliary variables (sort
//! keys, redirect targets). They are kept apart from the main pattern so that
//! combinators can hoist them, and are prepended when a condition is rendered.

use std::collections::{BTreeMap, BTreeSet};

use crate::vocab::FALSE_PATTERN;

/// Why a condition compiled to `False`. Never part of the rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FalseReason {
    EmptyClass,
    UnsupportedValue,
    ConflictingSingletons,
    EmptyDisjunction,
    CircularConcept,
    UndefinedConcept,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ConditionKind {
    #[default]
    True,
    False(FalseReason),
    Where {
        pattern: String,
        safe: bool,
    },
    Filter {
        filter: String,
    },
    Singleton {
        value: String,
        pattern: String,
        safe: bool,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    pub kind: ConditionKind,
    /// Variable the results of this condition sort by, if any.
    pub order_by_variable: Option<String>,
    /// Keyed patterns prepended on render; a key appears at most once.
    pub weak_conditions: Vec<(String, String)>,
    /// Property key => variable holding that property's sort value.
    pub order_variables: BTreeMap<String, String>,
    /// Every variable the condition (including weak conditions) mentions.
    pub variables: BTreeSet<String>,
}

impl Condition {
    pub fn truth() -> Self {
        Self::default()
    }

    pub fn falsity(reason: FalseReason) -> Self {
        Self {
            kind: ConditionKind::False(reason),
            ..Self::default()
        }
    }

    pub fn where_pattern(pattern: impl Into<String>, safe: bool) -> Self {
        Self {
            kind: ConditionKind::Where {
                pattern: pattern.into(),
                safe,
            },
            ..Self::default()
        }
    }

    pub fn filter(filter: impl Into<String>) -> Self {
        Self {
            kind: ConditionKind::Filter {
                filter: filter.into(),
            },
            ..Self::default()
        }
    }

    pub fn singleton(value: impl Into<String>, pattern: impl Into<String>, safe: bool) -> Self {
        Self {
            kind: ConditionKind::Singleton {
                value: value.into(),
                pattern: pattern.into(),
                safe,
            },
            ..Self::default()
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self.kind, ConditionKind::True)
    }

    pub fn is_false(&self) -> bool {
        matches!(self.kind, ConditionKind::False(_))
    }

    pub fn false_reason(&self) -> Option<FalseReason> {
        match self.kind {
            ConditionKind::False(reason) => Some(reason),
            _ => None,
        }
    }

    /// Value bound by a singleton condition.
    pub fn singleton_value(&self) -> Option<&str> {
        match &self.kind {
            ConditionKind::Singleton { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The main pattern, without weak conditions.
    pub fn pattern(&self) -> String {
        match &self.kind {
            ConditionKind::True => String::new(),
            ConditionKind::False(_) => FALSE_PATTERN.to_string(),
            ConditionKind::Where { pattern, .. } | ConditionKind::Singleton { pattern, .. } => {
                pattern.clone()
            }
            ConditionKind::Filter { filter } => format!("FILTER( {filter} )\n"),
        }
    }

    /// A safe condition binds the join variable by itself; an unsafe one
    /// needs an extra existence pattern when rendered on its own.
    pub fn is_safe(&self) -> bool {
        match &self.kind {
            ConditionKind::True | ConditionKind::Filter { .. } => false,
            ConditionKind::False(_) => true,
            ConditionKind::Where { safe, .. } | ConditionKind::Singleton { safe, .. } => *safe,
        }
    }

    pub fn weak_condition_string(&self) -> String {
        self.weak_conditions
            .iter()
            .map(|(_, pattern)| pattern.as_str())
            .collect()
    }

    /// Insert a weak condition, replacing an existing one with the same key in place.
    pub fn set_weak_condition(&mut self, key: &str, pattern: impl Into<String>) {
        let pattern = pattern.into();
        match self.weak_conditions.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = pattern,
            None => self.weak_conditions.push((key.to_string(), pattern)),
        }
    }

    pub fn uses_variable(&mut self, name: &str) {
        if !self.variables.contains(name) {
            self.variables.insert(name.to_string());
        }
    }

    /// Pull in the weak conditions and variables of a sub-condition.
    pub fn absorb(&mut self, other: &Condition) {
        for (key, pattern) in &other.weak_conditions {
            self.set_weak_condition(key, pattern.clone());
        }
        self.variables.extend(other.variables.iter().cloned());
    }
}
