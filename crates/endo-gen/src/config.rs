//! Generator configuration.
//!
//! Everything that influences resolution is carried by a [`GenConfig`] passed
//! in by the caller; there is no process-wide state. A configuration can be
//! built in code or loaded from an `endo.toml` file:
//!
//! ```toml
//! patch = "include"        # include | only | import
//! views = false            # treat every model as a read-only view
//! ignore_marker = "endo-ignore"
//! models_package = "db"    # models live in an external package
//! optional_type = "pointer" # pointer (*T) | option (Option<T>)
//! placeholder = "dollar"   # dollar ($1) | question_mark (?)
//!
//! [naming]
//! plural = "suffix"        # suffix | english
//! table = "lower"          # lower | snake_case
//! ```

use crate::error::{SchemaError, SchemaResult};
use crate::fragments::Helpers;
use endo::ParamStyle;
use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How patch types are produced and what the renderer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchMode {
    /// Synthesize missing patch types and render them with the store.
    #[default]
    Include,
    /// Synthesize missing patch types; render only the patch types.
    Only,
    /// Patch types must already exist among the declarations.
    Import,
}

impl PatchMode {
    /// Whether missing patch types may be synthesized.
    pub fn synthesizes(self) -> bool {
        !matches!(self, Self::Import)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluralRule {
    /// Append `s`.
    #[default]
    Suffix,
    /// Simple English rules (`y` → `ies`, sibilants → `es`).
    English,
}

impl PluralRule {
    pub fn pluralize(self, name: &str) -> String {
        match self {
            Self::Suffix => format!("{name}s"),
            Self::English => pluralize_english(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableCase {
    /// `EffectiveRoles` → `effectiveroles`
    #[default]
    Lower,
    /// `EffectiveRoles` → `effective_roles`
    SnakeCase,
}

impl TableCase {
    pub fn apply(self, plural: &str) -> String {
        match self {
            Self::Lower => plural.to_lowercase(),
            Self::SnakeCase => plural.to_snake_case(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NamingConfig {
    pub plural: PluralRule,
    pub table: TableCase,
}

/// How a patch field's type is made optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalStyle {
    /// `*T`
    #[default]
    Pointer,
    /// `Option<T>`
    Option,
}

impl OptionalStyle {
    pub fn wrap(self, ty: &str) -> String {
        match self {
            Self::Pointer => format!("*{ty}"),
            Self::Option => format!("Option<{ty}>"),
        }
    }
}

/// Placeholder style used by rendered SQL fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    #[default]
    Dollar,
    QuestionMark,
}

impl From<PlaceholderStyle> for ParamStyle {
    fn from(style: PlaceholderStyle) -> Self {
        match style {
            PlaceholderStyle::Dollar => ParamStyle::Dollar,
            PlaceholderStyle::QuestionMark => ParamStyle::QuestionMark,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    pub patch: PatchMode,
    /// Default every model to read-only.
    pub views: bool,
    /// Models whose annotation contains this text are skipped.
    pub ignore_marker: String,
    /// Name of the external package the models are imported from, if any.
    pub models_package: Option<String>,
    pub naming: NamingConfig,
    pub optional_type: OptionalStyle,
    pub placeholder: PlaceholderStyle,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            patch: PatchMode::Include,
            views: false,
            ignore_marker: "endo-ignore".to_string(),
            models_package: None,
            naming: NamingConfig::default(),
            optional_type: OptionalStyle::Pointer,
            placeholder: PlaceholderStyle::Dollar,
        }
    }
}

impl GenConfig {
    pub fn load(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SchemaError::config(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&raw).map_err(|e| match e {
            SchemaError::Config(msg) => {
                SchemaError::config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_toml_str(raw: &str) -> SchemaResult<Self> {
        let cfg: GenConfig = toml::from_str(raw)
            .map_err(|e| SchemaError::config(format!("failed to parse config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> SchemaResult<()> {
        if self.ignore_marker.trim().is_empty() {
            return Err(SchemaError::config("ignore_marker must not be empty"));
        }
        if let Some(pkg) = &self.models_package {
            let valid = pkg
                .chars()
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_')
                && pkg.chars().all(|c| c.is_alphanumeric() || c == '_');
            if !valid {
                return Err(SchemaError::config(format!(
                    "models_package is not a valid identifier: {pkg:?}"
                )));
            }
        }
        Ok(())
    }

    /// Whether the models live in another package than the generated code.
    pub fn models_external(&self) -> bool {
        self.models_package.is_some()
    }

    /// Qualifier prepended to model types, e.g. `db.`; empty for local models.
    pub fn package_prefix(&self) -> String {
        self.models_package
            .as_deref()
            .map(|pkg| format!("{pkg}."))
            .unwrap_or_default()
    }

    /// Fragment helpers for the renderer, using the configured placeholder style.
    pub fn helpers(&self) -> Helpers {
        Helpers::new(self.placeholder.into())
    }
}

fn pluralize_english(base: &str) -> String {
    if base.ends_with('y')
        && !matches!(
            base.chars().rev().nth(1),
            None | Some('a' | 'e' | 'i' | 'o' | 'u')
        )
    {
        format!("{}ies", &base[..base.len() - 1])
    } else if base.ends_with('s')
        || base.ends_with('x')
        || base.ends_with('z')
        || base.ends_with("ch")
        || base.ends_with("sh")
    {
        format!("{base}es")
    } else {
        format!("{base}s")
    }
}
