//! Dynamic SQL builder for generated stores.
//!
//! Generated code rarely knows up front how many parameters a statement has:
//! patches set an arbitrary subset of columns and filters are optional.
//! [`Builder`] lets such code write `{}` markers and takes care of numbering.
//!
//! # Example
//!
//! ```ignore
//! use endo::{Builder, params};
//!
//! let mut b = Builder::new();
//! b.write_trimmed("
//!     SELECT id, email FROM users
//! ");
//! if let Some(email) = email {
//!     b.write_with_params(" WHERE email = {}", params![email]);
//! }
//! b.write(" ORDER BY id");
//!
//! let (sql, args) = b.build();
//! ```

mod builder;
mod param;


pub use builder::Builder;
pub use param::{KeyValue, Param, ParamStyle, Values};

/// The marker replaced by a numbered placeholder in parameterized fragments.
pub const PARAM_MARKER: &str = "{}";
