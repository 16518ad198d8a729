//! Input and schedule validation.
//!
//! - **`input`**: structural checks on the group list before generation.
//! - **`constraints`**: hard, soft and quota checks on any schedule state.

mod constraints;
mod input;

pub use constraints::{has_hard_violations, validate, ConstraintValidator};
pub use input::{validate_groups, ValidationError, ValidationErrorKind, ValidationResult};
