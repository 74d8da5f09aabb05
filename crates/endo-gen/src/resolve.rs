//! Second pass over all assembled models: patch type binding and synthesis.

use crate::config::GenConfig;
use crate::error::{BindingFailure, SchemaError, SchemaResult};
use crate::model::{Field, Model};
use std::collections::BTreeMap;
use tracing::debug;

/// Bind every patch model to its base and synthesize the missing ones.
///
/// Returns the base models in declaration order; patch models are only
/// reachable through [`Model::patch`] afterwards.
pub(crate) fn resolve_dependencies(models: Vec<Model>, cfg: &GenConfig) -> SchemaResult<Vec<Model>> {
    let (patches, mut bases): (Vec<Model>, Vec<Model>) =
        models.into_iter().partition(Model::is_patch_model);

    for patch in patches {
        bind_patch(&mut bases, patch)?;
    }

    for base in &mut bases {
        if base.patch.is_some() {
            continue;
        }
        let patch_name = format!("{}Patch", base.name);
        if !cfg.patch.synthesizes() {
            // Nothing may bind to a read-only or immutable base.
            if !base.is_updatable() {
                debug!(model = %base.name, "no patch type for non-updatable model");
                continue;
            }
            return Err(SchemaError::MissingPatchType {
                model: base.name.clone(),
                patch: patch_name,
            });
        }
        let patch = synthesize_patch(base, patch_name, cfg);
        debug!(model = %base.name, patch = %patch.name, fields = patch.fields.len(), "synthesized patch type");
        base.patch = Some(Box::new(patch));
    }

    Ok(bases)
}

fn bind_patch(bases: &mut [Model], patch: Model) -> SchemaResult<()> {
    let target = patch.patch_binding.clone().unwrap_or_default();
    let unresolved = |reason| SchemaError::UnresolvedPatchBinding {
        patch: patch.name.clone(),
        target: target.clone(),
        reason,
    };

    let base = bases
        .iter_mut()
        .find(|b| b.name == target)
        .ok_or_else(|| unresolved(BindingFailure::NotFound))?;
    if !base.is_updatable() {
        return Err(unresolved(BindingFailure::NotUpdatable));
    }
    if let Some(existing) = &base.patch {
        return Err(SchemaError::DuplicatePatchBinding {
            base: base.name.clone(),
            existing: existing.name.clone(),
            conflicting: patch.name.clone(),
        });
    }

    debug!(model = %base.name, patch = %patch.name, "bound patch type");
    base.patch = Some(Box::new(patch));
    Ok(())
}

fn synthesize_patch(base: &Model, name: String, cfg: &GenConfig) -> Model {
    let fields = base
        .patch_fields()
        .into_iter()
        .map(|f| Field {
            name: f.name.clone(),
            column: f.column.clone(),
            ty: cfg.optional_type.wrap(&f.ty),
            primary_key: false,
            auto: false,
            exclude: false,
            read_only: false,
            sort: false,
        })
        .collect();

    Model {
        type_name: name.clone(),
        name,
        package_prefix: String::new(),
        plural: base.plural.clone(),
        table: base.table.clone(),
        read_only: base.read_only,
        immutable: base.immutable,
        order_by: String::new(),
        primary_key: None,
        patch_binding: Some(base.name.clone()),
        patch: None,
        generated: true,
        directives: BTreeMap::new(),
        fields,
    }
}
