//! Schema resolution entry point.

use crate::assemble::assemble_model;
use crate::config::{GenConfig, PatchMode};
use crate::decl::{Declarations, RawModel};
use crate::error::SchemaResult;
use crate::model::Model;
use crate::resolve::resolve_dependencies;
use serde::Serialize;
use tracing::debug;

/// A fully resolved schema, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    /// Patch mode the schema was resolved with; renderers use it to decide
    /// what to emit.
    pub patch_mode: PatchMode,
    pub views: bool,
    /// Base models in declaration order, each with its patch type attached.
    pub models: Vec<Model>,
}

impl Schema {
    /// Resolve `decls` into a schema. Either every model resolves or an
    /// error is returned; there is no partial result.
    pub fn resolve(decls: &[RawModel], cfg: &GenConfig) -> SchemaResult<Self> {
        let lookup = Declarations::new(decls);

        let mut assembled = Vec::with_capacity(decls.len());
        for (index, raw) in decls.iter().enumerate() {
            if let Some(model) = assemble_model(index, raw, &lookup, cfg)? {
                assembled.push(model);
            }
        }
        let skipped = decls.len() - assembled.len();

        let models = resolve_dependencies(assembled, cfg)?;
        debug!(
            declarations = decls.len(),
            skipped,
            models = models.len(),
            "resolved schema"
        );

        Ok(Self {
            patch_mode: cfg.patch,
            views: cfg.views,
            models,
        })
    }

    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name() == name)
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Every patch type, bound or synthesized, in base order.
    pub fn patches(&self) -> impl Iterator<Item = &Model> {
        self.models.iter().filter_map(Model::patch)
    }
}

/// Resolve `decls` into the ordered list of base models.
pub fn resolve_schema(decls: &[RawModel], cfg: &GenConfig) -> SchemaResult<Vec<Model>> {
    Schema::resolve(decls, cfg).map(|s| s.models)
}
