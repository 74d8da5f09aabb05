//! # endo
//!
//! Runtime support for data access code generated by `endo-gen`.
//!
//! Generated stores compose their SQL through [`Builder`], which keeps the
//! SQL text and its positional arguments in lock step: every `{}` marker
//! written through [`Builder::write_with_params`] becomes `$n`, where `n` is
//! one more than the number of arguments already held by the builder.
//!
//! ```ignore
//! use endo::{Builder, KeyValue, params};
//!
//! let mut b = Builder::new();
//! b.write("UPDATE users SET ")
//!     .write_keyed_args("%s = {}", ", ", [
//!         KeyValue::new("email", "a@example.com"),
//!         KeyValue::new("verified", true),
//!     ])
//!     .write_with_params(" WHERE id = {}", params![42_i64]);
//!
//! let (sql, args) = b.build();
//! assert_eq!(sql, "UPDATE users SET email = $1, verified = $2 WHERE id = $3");
//! assert_eq!(args.len(), 3);
//! ```

#[macro_use]
mod macros;

pub mod error;
pub mod page;
pub mod sql;

pub use error::{EndoError, EndoResult};
pub use page::PageOptions;
pub use sql::{Builder, KeyValue, PARAM_MARKER, Param, ParamStyle, Values};
