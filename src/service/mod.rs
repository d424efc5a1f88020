//! Generic record access over introspected tables, plus request validation.

mod crud;
mod validation;
pub use crud::RecordAccessor;
pub(crate) use crud::merge_with_key;
pub use validation::RequestValidator;
