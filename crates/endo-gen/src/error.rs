//! Error types for endo-gen

use std::fmt;
use thiserror::Error;

/// Result type alias for schema resolution
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Why an explicit patch binding could not be honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingFailure {
    /// No base model with the target name exists.
    NotFound,
    /// The target is read-only, immutable or itself a patch type.
    NotUpdatable,
}

impl fmt::Display for BindingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("model not found"),
            Self::NotUpdatable => f.write_str("model is not updatable"),
        }
    }
}

/// Errors that abort a schema resolution pass.
///
/// Every variant names the models (and fields) involved so a failure can be
/// diagnosed without re-running the generator.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// An explicit `patches:` / `patch type:` directive could not be bound
    #[error("patch type {patch} cannot patch {target}: {reason}")]
    UnresolvedPatchBinding {
        patch: String,
        target: String,
        reason: BindingFailure,
    },

    /// A base model was claimed by more than one patch type
    #[error("model {base} already has patch type {existing}, cannot also bind {conflicting}")]
    DuplicatePatchBinding {
        base: String,
        existing: String,
        conflicting: String,
    },

    /// No patch type exists and synthesis is disabled
    #[error("could not find patch type {patch} for model {model}")]
    MissingPatchType { model: String, patch: String },

    /// A model declaration cannot be assembled
    #[error("model declaration {index}: {message}")]
    InvalidModelDeclaration { index: usize, message: String },

    /// A field declaration cannot be normalized
    #[error("field {field} of model {model}: {message}")]
    InvalidFieldDeclaration {
        model: String,
        field: String,
        message: String,
    },

    /// An embedded declaration (transitively) embeds itself
    #[error("model {model}: cyclic embedding {chain}")]
    EmbeddingCycle { model: String, chain: String },

    /// More than one field is flagged `primary`
    #[error("model {model}: multiple primary keys ({first}, {second})")]
    MultiplePrimaryKeys {
        model: String,
        first: String,
        second: String,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(String),
}

impl SchemaError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub(crate) fn invalid_field(
        model: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidFieldDeclaration {
            model: model.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this error is about patch type binding
    pub fn is_patch_binding(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedPatchBinding { .. }
                | Self::DuplicatePatchBinding { .. }
                | Self::MissingPatchType { .. }
        )
    }
}
