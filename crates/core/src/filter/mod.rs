//! Dynamic filtering for the webcam list.
//!
//! - [`catalog`]: the static field registry.
//! - [`spec`]: parsing `filters` and translating it into a predicate tree.
//! - [`predicate`]: the tree itself and in-memory evaluation.
//! - [`ordering`]: the `sort_by` parameter.

pub mod catalog;
pub mod ordering;
pub mod predicate;
pub mod spec;

pub use catalog::{FieldDescriptor, FieldType, Operator, FIELD_CATALOG};
pub use ordering::{parse_ordering, SortKey};
pub use predicate::{
    relation_path, Comparison, Condition, FieldSource, FieldValue, FilterQuery, Predicate, Value,
};
pub use spec::{build_query, ArchiveIndex, FilterError, FilterSpec};

/// Pseudo-field resolved through the media-server inventory rather than a
/// column.
pub const ARCHIVE_DATE_FIELD: &str = "archive_date";
