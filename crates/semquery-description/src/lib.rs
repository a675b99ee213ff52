//! Semquery query descriptions.
//!
//! A *description* is the algebraic form of one semantic query: a tree of
//! class, namespace, value, property and concept constraints combined by
//! conjunction and disjunction. Descriptions are produced by a query-text
//! parser (not part of this crate) and consumed by the condition compiler in
//! `semquery-sparql`.
//!
//! This crate only defines the model:
//!
//! - [`Description`] and [`Comparator`] (the query algebra),
//! - [`DataValue`], [`PageRef`] and [`TimeValue`] (the values constraints refer to),
//! - [`PropertyRef`] plus the predefined-property table.
//!
//! Every type is `serde`-encodable. Concept definitions are stored as JSON and
//! decoded on demand, so a malformed definition surfaces as a
//! [`DescriptionError`] rather than a panic.

pub mod description;
pub mod property;
pub mod value;

pub use description::{Comparator, Description, DescriptionError};
pub use property::{predefined_property, FixedPredicate, PredefinedProperty, PropertyRef, ValueType};
pub use value::{DataValue, PageRef, TimeValue};
