//! Raw field declaration → resolved [`Field`]s.

use crate::config::GenConfig;
use crate::decl::{Declarations, FieldTag, RawField};
use crate::error::{SchemaError, SchemaResult};
use crate::model::Field;
use tracing::trace;

/// Embedding deeper than this is rejected.
pub const MAX_EMBED_DEPTH: usize = 32;

/// Normalizes the declarations of one model.
pub(crate) struct Normalizer<'a> {
    decls: &'a Declarations<'a>,
    cfg: &'a GenConfig,
    model: &'a str,
}

impl<'a> Normalizer<'a> {
    pub(crate) fn new(decls: &'a Declarations<'a>, cfg: &'a GenConfig, model: &'a str) -> Self {
        Self { decls, cfg, model }
    }

    /// Normalize one declaration, appending zero or more fields to `out`.
    ///
    /// Embedded declarations naming a local shape are flattened in place,
    /// recursively and in declaration order.
    pub(crate) fn normalize(&self, raw: &'a RawField, out: &mut Vec<Field>) -> SchemaResult<()> {
        let mut chain = vec![self.model];
        self.walk(raw, &mut chain, out)
    }

    fn walk(
        &self,
        raw: &'a RawField,
        chain: &mut Vec<&'a str>,
        out: &mut Vec<Field>,
    ) -> SchemaResult<()> {
        let tag = match raw.tag.as_deref() {
            Some(tag) => match FieldTag::parse(tag) {
                Some(tag) => tag,
                None => return Ok(()),
            },
            None => FieldTag::default(),
        };

        let name = match raw.name.as_deref() {
            Some(name) => name,
            None => {
                if let Some(shape) = self.decls.shape(&raw.ty) {
                    return self.flatten(&shape.name, &shape.fields, chain, out);
                }
                embedded_field_name(&raw.ty)
            }
        };

        self.push_field(name, raw, tag, out)
    }

    fn flatten(
        &self,
        shape: &'a str,
        fields: &'a [RawField],
        chain: &mut Vec<&'a str>,
        out: &mut Vec<Field>,
    ) -> SchemaResult<()> {
        if chain.contains(&shape) {
            let mut path = chain.join(" -> ");
            path.push_str(" -> ");
            path.push_str(shape);
            return Err(SchemaError::EmbeddingCycle {
                model: self.model.to_string(),
                chain: path,
            });
        }
        if chain.len() > MAX_EMBED_DEPTH {
            return Err(SchemaError::invalid_field(
                self.model,
                shape,
                format!("embedding nested deeper than {MAX_EMBED_DEPTH} levels"),
            ));
        }

        trace!(model = self.model, shape, depth = chain.len(), "flattening embedded declaration");
        chain.push(shape);
        for field in fields {
            self.walk(field, chain, out)?;
        }
        chain.pop();
        Ok(())
    }

    fn push_field(
        &self,
        name: &str,
        raw: &RawField,
        tag: FieldTag,
        out: &mut Vec<Field>,
    ) -> SchemaResult<()> {
        if name.is_empty() {
            return Err(SchemaError::invalid_field(
                self.model,
                raw.ty.as_str(),
                "field name is empty",
            ));
        }
        if raw.ty.trim().is_empty() {
            return Err(SchemaError::invalid_field(self.model, name, "type is empty"));
        }
        if self.cfg.models_external() && !is_exported(name) {
            // Not accessible from another package.
            trace!(model = self.model, field = name, "skipping unexported field");
            return Ok(());
        }
        if out.iter().any(|f| f.name == name) {
            return Err(SchemaError::invalid_field(
                self.model,
                name,
                "field name declared more than once",
            ));
        }

        let column = tag.column.unwrap_or_else(|| name.to_string());
        out.push(Field {
            name: name.to_string(),
            column,
            ty: raw.ty.clone(),
            primary_key: tag.flags.primary,
            auto: tag.flags.auto,
            exclude: tag.flags.exclude,
            read_only: tag.flags.readonly,
            sort: tag.flags.sort,
        });
        Ok(())
    }
}

/// The implicit name of an embedded field: its type's base identifier.
fn embedded_field_name(ty: &str) -> &str {
    let ty = ty.trim().trim_start_matches('*');
    ty.rsplit('.').next().unwrap_or(ty)
}

pub(crate) fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
