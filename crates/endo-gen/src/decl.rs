//! Raw, unresolved declarations as produced by a front end.
//!
//! A front end (a source parser, a schema document loader, ...) turns whatever
//! declaration syntax it reads into [`RawModel`]s. Nothing here assumes a
//! particular annotation syntax: a field's metadata is a plain tag string of
//! the form `column,flag,flag`.

use serde::Deserialize;
use std::collections::HashMap;

/// One field-like declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawField {
    /// Field name; `None` for an embedded (anonymous) declaration.
    #[serde(default)]
    pub name: Option<String>,
    /// Type expression, copied through verbatim.
    #[serde(rename = "type")]
    pub ty: String,
    /// `column,flag,...`; a leading `-` drops the declaration.
    #[serde(default)]
    pub tag: Option<String>,
}

impl RawField {
    pub fn named(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ty: ty.into(),
            tag: None,
        }
    }

    pub fn embedded(ty: impl Into<String>) -> Self {
        Self {
            name: None,
            ty: ty.into(),
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// One record-shaped declaration: a model candidate or an embeddable shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawModel {
    pub name: String,
    /// Free-text annotation carrying `key: value` directives.
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub fields: Vec<RawField>,
}

impl RawModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: String::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn field(mut self, field: RawField) -> Self {
        self.fields.push(field);
        self
    }
}

/// Field flags recognized in a tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldFlags {
    pub primary: bool,
    pub auto: bool,
    pub exclude: bool,
    pub readonly: bool,
    pub sort: bool,
}

/// A parsed field tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTag {
    /// Explicit column name, if the tag carries one.
    pub column: Option<String>,
    pub flags: FieldFlags,
}

impl FieldTag {
    /// Column sentinel that drops a declaration entirely.
    pub const SKIP: &'static str = "-";

    /// Parse `column,flag,flag`.
    ///
    /// Returns `None` when the column is the `-` sentinel. Unknown flags are
    /// ignored.
    pub fn parse(tag: &str) -> Option<Self> {
        let mut parts = tag.split(',');
        let column = parts.next().unwrap_or_default().trim();
        if column == Self::SKIP {
            return None;
        }

        let mut flags = FieldFlags::default();
        for option in parts {
            match option.trim() {
                "primary" => flags.primary = true,
                "auto" => flags.auto = true,
                "exclude" => flags.exclude = true,
                "readonly" => flags.readonly = true,
                "sort" => flags.sort = true,
                _ => {}
            }
        }

        Some(Self {
            column: (!column.is_empty()).then(|| column.to_string()),
            flags,
        })
    }
}

/// Lookup table from type name to declaration, built once before
/// normalization so embedded fields can be resolved.
#[derive(Debug)]
pub struct Declarations<'a> {
    by_name: HashMap<&'a str, &'a RawModel>,
}

impl<'a> Declarations<'a> {
    pub fn new(models: &'a [RawModel]) -> Self {
        let mut by_name = HashMap::with_capacity(models.len());
        for m in models {
            by_name.insert(m.name.as_str(), m);
        }
        Self { by_name }
    }

    /// The composite declaration a type expression names, if it is local.
    ///
    /// Only a bare type name resolves; pointers, qualified and generic types
    /// do not.
    pub fn shape(&self, ty: &str) -> Option<&'a RawModel> {
        self.by_name.get(ty.trim()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_with_column_and_flags() {
        let tag = FieldTag::parse("id,primary,auto").unwrap();
        assert_eq!(tag.column.as_deref(), Some("id"));
        assert!(tag.flags.primary);
        assert!(tag.flags.auto);
        assert!(!tag.flags.exclude);
        assert!(!tag.flags.readonly);
    }

    #[test]
    fn tag_skip_sentinel() {
        assert_eq!(FieldTag::parse("-"), None);
        // The sentinel wins over any flag that follows it.
        assert_eq!(FieldTag::parse("-,primary"), None);
    }

    #[test]
    fn tag_without_column() {
        let tag = FieldTag::parse(",readonly").unwrap();
        assert_eq!(tag.column, None);
        assert!(tag.flags.readonly);
    }

    #[test]
    fn tag_ignores_unknown_flags() {
        let tag = FieldTag::parse("email,unique,omitempty,sort").unwrap();
        assert_eq!(tag.column.as_deref(), Some("email"));
        assert!(tag.flags.sort);
        assert_eq!(
            FieldFlags {
                sort: false,
                ..tag.flags
            },
            FieldFlags::default()
        );
    }

    #[test]
    fn declarations_resolve_bare_names_only() {
        let models = vec![RawModel::new("Timestamps"), RawModel::new("User")];
        let decls = Declarations::new(&models);

        assert_eq!(decls.shape("Timestamps").map(|m| m.name.as_str()), Some("Timestamps"));
        assert!(decls.shape("*Timestamps").is_none());
        assert!(decls.shape("time.Time").is_none());
    }

    #[test]
    fn raw_models_deserialize_from_document() {
        let raw: Vec<RawModel> = serde_json::from_str(
            r#"[{
                "name": "User",
                "doc": "plural: People",
                "fields": [
                    {"name": "ID", "type": "int", "tag": "id,primary"},
                    {"type": "Timestamps"}
                ]
            }]"#,
        )
        .unwrap();

        assert_eq!(raw[0].fields[0], RawField::named("ID", "int").with_tag("id,primary"));
        assert_eq!(raw[0].fields[1], RawField::embedded("Timestamps"));
    }
}
