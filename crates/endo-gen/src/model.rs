//! Resolved schema entities.

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use std::collections::BTreeMap;

/// One column mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Field name in the target source.
    pub name: String,
    /// Column name in the database.
    pub column: String,
    /// Declared type, copied through verbatim.
    #[serde(rename = "type")]
    pub ty: String,
    pub primary_key: bool,
    /// Generated by the database; never written.
    pub auto: bool,
    /// Never materialized as a column.
    pub exclude: bool,
    /// Excluded from update and patch paths.
    pub read_only: bool,
    /// Default ordering column.
    pub sort: bool,
}

impl Field {
    /// Whether the field takes part in inserts and updates.
    pub fn is_writable(&self) -> bool {
        !(self.exclude || self.auto || self.read_only)
    }
}

/// One table or view mapping.
///
/// Built by the assembler; the dependency resolver attaches its patch type.
/// After resolution a model is read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub(crate) name: String,
    pub(crate) type_name: String,
    pub(crate) package_prefix: String,
    pub(crate) plural: String,
    pub(crate) table: String,
    pub(crate) read_only: bool,
    pub(crate) immutable: bool,
    pub(crate) order_by: String,
    /// Index into `fields`.
    pub(crate) primary_key: Option<usize>,
    /// Name of the model this one patches.
    pub(crate) patch_binding: Option<String>,
    pub(crate) patch: Option<Box<Model>>,
    pub(crate) generated: bool,
    pub(crate) directives: BTreeMap<String, String>,
    pub(crate) fields: Vec<Field>,
}

impl Model {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The model type as referenced from generated code, e.g. `db.User`.
    pub fn qualified_type(&self) -> String {
        format!("{}{}", self.package_prefix, self.type_name)
    }

    pub fn package_prefix(&self) -> &str {
        &self.package_prefix
    }

    pub fn plural(&self) -> &str {
        &self.plural
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    /// The `ORDER BY` expression; empty when the model has no ordering.
    pub fn order_by(&self) -> &str {
        &self.order_by
    }

    pub fn primary_key(&self) -> Option<&Field> {
        self.primary_key.map(|i| &self.fields[i])
    }

    /// The model this one patches, if it is a patch type.
    pub fn patch_binding(&self) -> Option<&str> {
        self.patch_binding.as_deref()
    }

    pub fn is_patch_model(&self) -> bool {
        self.patch_binding.is_some()
    }

    /// Whether rows of this model may be updated (and thus patched).
    pub fn is_updatable(&self) -> bool {
        !(self.read_only || self.immutable || self.is_patch_model())
    }

    /// The bound or synthesized patch type.
    pub fn patch(&self) -> Option<&Model> {
        self.patch.as_deref()
    }

    /// True for patch types synthesized by the resolver.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Every directive found in the model's annotation, known or not.
    pub fn directives(&self) -> &BTreeMap<String, String> {
        &self.directives
    }

    /// Materialized fields in declaration order. Excluded fields never appear.
    pub fn fields(&self) -> Vec<&Field> {
        self.fields.iter().filter(|f| !f.exclude).collect()
    }

    /// Every normalized field, excluded ones included.
    pub fn all_fields(&self) -> &[Field] {
        &self.fields
    }

    /// Fields written on insert: materialized, not auto, not read-only.
    pub fn write_fields(&self) -> Vec<&Field> {
        self.fields.iter().filter(|f| f.is_writable()).collect()
    }

    /// Fields a patch type mirrors: writable and not the primary key.
    pub fn patch_fields(&self) -> Vec<&Field> {
        self.fields
            .iter()
            .filter(|f| f.is_writable() && !f.primary_key)
            .collect()
    }

    pub fn fields_without_primary_key(&self) -> Vec<&Field> {
        self.fields
            .iter()
            .filter(|f| !f.exclude && !f.primary_key)
            .collect()
    }

    pub fn columns(&self) -> Vec<&str> {
        self.fields().into_iter().map(|f| f.column.as_str()).collect()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The field mapped to `column`. Column names are not required to be
    /// unique; the last declaration shadows earlier ones.
    pub fn field_by_column(&self, column: &str) -> Option<&Field> {
        self.fields.iter().rev().find(|f| f.column == column)
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Model", 14)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("type", &self.qualified_type())?;
        s.serialize_field("plural", &self.plural)?;
        s.serialize_field("table", &self.table)?;
        s.serialize_field("read_only", &self.read_only)?;
        s.serialize_field("immutable", &self.immutable)?;
        s.serialize_field("updatable", &self.is_updatable())?;
        s.serialize_field("order_by", &self.order_by)?;
        s.serialize_field("primary_key", &self.primary_key())?;
        s.serialize_field("patches", &self.patch_binding)?;
        s.serialize_field("generated", &self.generated)?;
        s.serialize_field("directives", &self.directives)?;
        s.serialize_field("fields", &self.fields())?;
        s.serialize_field("patch", &self.patch())?;
        s.end()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn field(name: &str, column: &str, ty: &str) -> Field {
        Field {
            name: name.to_string(),
            column: column.to_string(),
            ty: ty.to_string(),
            primary_key: false,
            auto: false,
            exclude: false,
            read_only: false,
            sort: false,
        }
    }

    fn user() -> Model {
        let mut id = field("ID", "id", "int");
        id.primary_key = true;
        id.auto = true;
        let mut display = field("DisplayName", "display_name", "string");
        display.read_only = true;
        let mut roles = field("Roles", "roles", "[]Role");
        roles.exclude = true;

        Model {
            name: "User".to_string(),
            type_name: "User".to_string(),
            package_prefix: "db.".to_string(),
            plural: "Users".to_string(),
            table: "users".to_string(),
            read_only: false,
            immutable: false,
            order_by: "id".to_string(),
            primary_key: Some(0),
            patch_binding: None,
            patch: None,
            generated: false,
            directives: BTreeMap::new(),
            fields: vec![id, field("Email", "email", "string"), display, roles],
        }
    }

    fn names(fields: Vec<&Field>) -> Vec<&str> {
        fields.into_iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn field_subsets() {
        let m = user();
        assert_eq!(names(m.fields()), ["ID", "Email", "DisplayName"]);
        assert_eq!(m.all_fields().len(), 4);
        assert_eq!(names(m.write_fields()), ["Email"]);
        assert_eq!(names(m.patch_fields()), ["Email"]);
        assert_eq!(names(m.fields_without_primary_key()), ["Email", "DisplayName"]);
        assert_eq!(m.columns(), ["id", "email", "display_name"]);
    }

    #[test]
    fn primary_key_and_lookup() {
        let m = user();
        assert_eq!(m.primary_key().map(|f| f.column.as_str()), Some("id"));
        assert_eq!(m.field("Email").map(|f| f.column.as_str()), Some("email"));
        assert!(m.field("Missing").is_none());
        assert_eq!(m.qualified_type(), "db.User");
    }

    #[test]
    fn updatable_rules() {
        let mut m = user();
        assert!(m.is_updatable());

        m.read_only = true;
        assert!(!m.is_updatable());

        m.read_only = false;
        m.immutable = true;
        assert!(!m.is_updatable());

        m.immutable = false;
        m.patch_binding = Some("Account".to_string());
        assert!(m.is_patch_model());
        assert!(!m.is_updatable());
    }

    #[test]
    fn serializes_renderer_view() {
        let v = serde_json::to_value(user()).unwrap();
        assert_eq!(v["type"], "db.User");
        assert_eq!(v["updatable"], true);
        assert_eq!(v["primary_key"]["column"], "id");
        assert_eq!(v["fields"].as_array().unwrap().len(), 3);
        assert_eq!(v["fields"][1]["type"], "string");
        assert!(v["patch"].is_null());
    }
}
