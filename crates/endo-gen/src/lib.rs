//! # endo-gen
//!
//! The model/schema resolution core of the endo code generator.
//!
//! A front end turns model declarations into [`RawModel`]s; this crate
//! resolves them into a consistent [`Schema`] that a renderer can turn into
//! data access code:
//!
//! - **Fields**: column defaulting, `primary`/`auto`/`exclude`/`readonly`/`sort`
//!   flags, the `-` skip sentinel and recursive flattening of embedded shapes
//! - **Models**: `key: value` directives in the model annotation
//!   (`plural`, `table`, `order by`, `patches`, `read-only`, `immutable`)
//! - **Patch types**: explicit bindings are checked, missing ones synthesized
//!   with optional field types
//!
//! ```ignore
//! use endo_gen::{GenConfig, RawField, RawModel, Schema};
//!
//! let decls = vec![
//!     RawModel::new("User")
//!         .field(RawField::named("ID", "int").with_tag("id,primary,auto"))
//!         .field(RawField::named("Email", "string").with_tag("email")),
//! ];
//!
//! let schema = Schema::resolve(&decls, &GenConfig::default())?;
//! let user = schema.model("User").unwrap();
//! assert_eq!(user.table(), "users");
//! assert_eq!(user.patch().unwrap().name(), "UserPatch");
//! ```

mod assemble;
pub mod config;
pub mod decl;
pub mod directive;
pub mod error;
pub mod fragments;
pub mod model;
mod normalize;
mod resolve;
pub mod schema;

pub use config::{
    GenConfig, NamingConfig, OptionalStyle, PatchMode, PlaceholderStyle, PluralRule, TableCase,
};
pub use decl::{FieldFlags, FieldTag, RawField, RawModel};
pub use directive::{Directives, parse_bool, parse_directives};
pub use error::{BindingFailure, SchemaError, SchemaResult};
pub use fragments::Helpers;
pub use model::{Field, Model};
pub use normalize::MAX_EMBED_DEPTH;
pub use schema::{Schema, resolve_schema};
