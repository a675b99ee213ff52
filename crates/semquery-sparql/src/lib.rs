//! Compiles semquery description trees into SPARQL graph-pattern conditions.
//!
//! ```text
//! Description ──▶ ConditionBuilder::build_condition ──▶ Condition
//!                        │  (interpreters, ports)          │
//!                        ▼                                 ▼
//!                  variable allocation          render / select_query
//! ```
//!
//! The builder dispatches each description node to its interpreter. Each
//! interpreter produces a [`Condition`]; compound interpreters combine the
//! conditions of their children. Hierarchy, redirect, property-type and concept information
//! comes from the injected [`ports`].

pub mod builder;
pub mod condition;
pub mod config;
pub mod error;
pub mod interpret;
pub mod ports;
mod select;
pub mod turtle;
pub mod vocab;

pub use builder::{ConditionBuilder, SortDirection};
pub use condition::{Condition, ConditionKind, FalseReason};
pub use config::{CompilerConfig, QueryFeatures};
pub use error::{CompileError, CompileResult, ConceptStoreError};
pub use interpret::{interpreter_for, DescriptionInterpreter};
pub use ports::{
    CircularReferenceGuard, ConceptStore, HierarchyLookup, InMemoryConceptStore,
    PropertyTypeLookup, RecursionGuard, RedirectLookup, StaticHierarchy, StaticPropertyTypes,
    StaticRedirects,
};
