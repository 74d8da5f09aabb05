//! Raw model declaration + directives → resolved [`Model`].

use crate::config::GenConfig;
use crate::decl::{Declarations, RawModel};
use crate::directive::parse_directives;
use crate::error::{SchemaError, SchemaResult};
use crate::model::{Field, Model};
use crate::normalize::{Normalizer, is_exported};
use tracing::debug;

pub(crate) const KEY_PLURAL: &str = "plural";
pub(crate) const KEY_TABLE: &str = "table";
pub(crate) const KEYS_ORDER_BY: &[&str] = &["order by", "sort"];
pub(crate) const KEYS_PATCHES: &[&str] = &["patch type", "patches"];
pub(crate) const KEY_READ_ONLY: &str = "read-only";
pub(crate) const KEY_IMMUTABLE: &str = "immutable";

/// Assemble the model at `index` of the declaration list.
///
/// Returns `Ok(None)` when the model is skipped.
pub(crate) fn assemble_model(
    index: usize,
    raw: &RawModel,
    decls: &Declarations<'_>,
    cfg: &GenConfig,
) -> SchemaResult<Option<Model>> {
    if raw.name.trim().is_empty() {
        return Err(SchemaError::InvalidModelDeclaration {
            index,
            message: "model name is empty".to_string(),
        });
    }
    if raw.doc.contains(cfg.ignore_marker.as_str()) {
        debug!(model = %raw.name, "model ignored by annotation");
        return Ok(None);
    }
    if cfg.models_external() && !is_exported(&raw.name) {
        debug!(model = %raw.name, "skipping unexported model of external package");
        return Ok(None);
    }

    let directives = parse_directives(&raw.doc);

    let read_only = directives.flag(KEY_READ_ONLY).unwrap_or(cfg.views);
    let immutable = directives.flag(KEY_IMMUTABLE).unwrap_or(false);

    // Table derives from plural, so plural goes first.
    let plural = match directives.get(KEY_PLURAL) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => cfg.naming.plural.pluralize(&raw.name),
    };
    let table = match directives.get(KEY_TABLE) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => cfg.naming.table.apply(&plural),
    };
    let explicit_order_by = directives.first_of(KEYS_ORDER_BY).map(str::to_string);
    let patch_binding = directives.first_of(KEYS_PATCHES).map(str::to_string);

    let normalizer = Normalizer::new(decls, cfg, &raw.name);
    let mut fields: Vec<Field> = Vec::with_capacity(raw.fields.len());
    for field in &raw.fields {
        normalizer.normalize(field, &mut fields)?;
    }

    let primary_key = find_primary_key(&raw.name, &fields)?;

    // Only known once every field has been seen.
    let order_by = explicit_order_by
        .or_else(|| fields.iter().find(|f| f.sort).map(|f| f.column.clone()))
        .or_else(|| primary_key.map(|i| fields[i].column.clone()))
        .unwrap_or_default();

    debug!(
        model = %raw.name,
        table = %table,
        fields = fields.len(),
        patches = patch_binding.as_deref().unwrap_or(""),
        "assembled model"
    );

    Ok(Some(Model {
        name: raw.name.clone(),
        type_name: raw.name.clone(),
        package_prefix: cfg.package_prefix(),
        plural,
        table,
        read_only,
        immutable,
        order_by,
        primary_key,
        patch_binding,
        patch: None,
        generated: false,
        directives: directives.into_map(),
        fields,
    }))
}

fn find_primary_key(model: &str, fields: &[Field]) -> SchemaResult<Option<usize>> {
    let mut found: Option<usize> = None;
    for (i, field) in fields.iter().enumerate() {
        if !field.primary_key {
            continue;
        }
        if let Some(first) = found {
            return Err(SchemaError::MultiplePrimaryKeys {
                model: model.to_string(),
                first: fields[first].name.clone(),
                second: field.name.clone(),
            });
        }
        found = Some(i);
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PluralRule, TableCase};
    use crate::decl::RawField;

    fn assemble(raw: RawModel, cfg: &GenConfig) -> SchemaResult<Option<Model>> {
        let models = vec![raw];
        let decls = Declarations::new(&models);
        assemble_model(0, &models[0], &decls, cfg)
    }

    fn user() -> RawModel {
        RawModel::new("User")
            .field(RawField::named("ID", "int").with_tag("id,primary"))
            .field(RawField::named("Email", "string").with_tag("email"))
    }

    #[test]
    fn defaults_from_name_and_primary_key() {
        let m = assemble(user(), &GenConfig::default()).unwrap().unwrap();
        assert_eq!(m.plural(), "Users");
        assert_eq!(m.table(), "users");
        assert_eq!(m.order_by(), "id");
        assert_eq!(m.primary_key().map(|f| f.column.as_str()), Some("id"));
        assert!(!m.is_read_only());
        assert!(!m.is_immutable());
        assert!(m.patch_binding().is_none());
    }

    #[test]
    fn table_follows_explicit_plural() {
        let m = assemble(user().with_doc("plural: People"), &GenConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(m.plural(), "People");
        assert_eq!(m.table(), "people");
    }

    #[test]
    fn explicit_table_wins() {
        let m = assemble(
            user().with_doc("User (table: app_users) is a user."),
            &GenConfig::default(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(m.plural(), "Users");
        assert_eq!(m.table(), "app_users");
    }

    #[test]
    fn order_by_directive_overrides_primary_key() {
        let m = assemble(user().with_doc(r#"order by: "id DESC""#), &GenConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(m.order_by(), "id DESC");
    }

    #[test]
    fn sort_directive_is_an_alias() {
        let m = assemble(user().with_doc("sort: email"), &GenConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(m.order_by(), "email");
    }

    #[test]
    fn sort_flag_beats_primary_key() {
        let raw = RawModel::new("Event")
            .field(RawField::named("ID", "int").with_tag("id,primary"))
            .field(RawField::named("At", "time.Time").with_tag("happened_at,sort"));
        let m = assemble(raw, &GenConfig::default()).unwrap().unwrap();
        assert_eq!(m.order_by(), "happened_at");
    }

    #[test]
    fn no_primary_key_means_no_ordering() {
        let raw = RawModel::new("Log").field(RawField::named("Line", "string"));
        let m = assemble(raw, &GenConfig::default()).unwrap().unwrap();
        assert_eq!(m.order_by(), "");
        assert!(m.primary_key().is_none());
    }

    #[test]
    fn ignore_marker_skips_model() {
        let raw = user().with_doc("Internal helper.\nendo-ignore");
        assert!(assemble(raw, &GenConfig::default()).unwrap().is_none());
    }

    #[test]
    fn read_only_and_immutable_directives() {
        let m = assemble(
            user().with_doc("read-only: true\nimmutable: 1"),
            &GenConfig::default(),
        )
        .unwrap()
        .unwrap();
        assert!(m.is_read_only());
        assert!(m.is_immutable());
        assert!(!m.is_updatable());
    }

    #[test]
    fn views_mode_defaults_read_only() {
        let cfg = GenConfig {
            views: true,
            ..GenConfig::default()
        };
        let m = assemble(user(), &cfg).unwrap().unwrap();
        assert!(m.is_read_only());

        let m = assemble(user().with_doc("read-only: false"), &cfg)
            .unwrap()
            .unwrap();
        assert!(!m.is_read_only());
    }

    #[test]
    fn unparseable_bool_keeps_default() {
        let m = assemble(user().with_doc("read-only: maybe"), &GenConfig::default())
            .unwrap()
            .unwrap();
        assert!(!m.is_read_only());
    }

    #[test]
    fn patch_binding_keys() {
        let m = assemble(
            RawModel::new("UserPatch").with_doc("patches: User"),
            &GenConfig::default(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(m.patch_binding(), Some("User"));
        assert!(m.is_patch_model());

        let m = assemble(
            RawModel::new("UserPatch").with_doc("patch type: User"),
            &GenConfig::default(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(m.patch_binding(), Some("User"));
    }

    #[test]
    fn unknown_directives_are_kept() {
        let m = assemble(user().with_doc("owner: identity"), &GenConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(m.directives().get("owner").map(String::as_str), Some("identity"));
    }

    #[test]
    fn multiple_primary_keys_are_rejected() {
        let raw = RawModel::new("Membership")
            .field(RawField::named("UserID", "int").with_tag("user_id,primary"))
            .field(RawField::named("GroupID", "int").with_tag("group_id,primary"));
        let err = assemble(raw, &GenConfig::default()).unwrap_err();
        match err {
            SchemaError::MultiplePrimaryKeys {
                model,
                first,
                second,
            } => {
                assert_eq!(model, "Membership");
                assert_eq!(first, "UserID");
                assert_eq!(second, "GroupID");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_columns_are_tolerated_and_shadow() {
        let raw = RawModel::new("User")
            .field(RawField::named("Mail", "string").with_tag("email"))
            .field(RawField::named("Email", "string").with_tag("email"));
        let m = assemble(raw, &GenConfig::default()).unwrap().unwrap();

        assert_eq!(m.columns(), ["email", "email"]);
        assert_eq!(m.field_by_column("email").map(|f| f.name.as_str()), Some("Email"));
    }

    #[test]
    fn excluded_primary_key_still_orders() {
        let raw = RawModel::new("EffectiveRole")
            .with_doc("EffectiveRole (table: effective_roles) is a view.")
            .field(RawField::named("UserID", "int").with_tag("user_id,primary,exclude"))
            .field(RawField::named("RoleID", "int").with_tag("role_id"));
        let m = assemble(raw, &GenConfig::default()).unwrap().unwrap();

        assert_eq!(m.columns(), ["role_id"]);
        assert_eq!(m.primary_key().map(|f| f.name.as_str()), Some("UserID"));
        assert_eq!(m.order_by(), "user_id");
    }

    #[test]
    fn naming_rules_apply() {
        let cfg = GenConfig {
            naming: crate::config::NamingConfig {
                plural: PluralRule::English,
                table: TableCase::SnakeCase,
            },
            ..GenConfig::default()
        };
        let m = assemble(RawModel::new("AuditEntry"), &cfg).unwrap().unwrap();
        assert_eq!(m.plural(), "AuditEntries");
        assert_eq!(m.table(), "audit_entries");
    }

    #[test]
    fn external_package_prefix() {
        let cfg = GenConfig {
            models_package: Some("db".to_string()),
            ..GenConfig::default()
        };
        let m = assemble(user(), &cfg).unwrap().unwrap();
        assert_eq!(m.qualified_type(), "db.User");

        assert!(assemble(RawModel::new("internalRow"), &cfg).unwrap().is_none());
    }

    #[test]
    fn empty_name_is_invalid() {
        assert!(matches!(
            assemble(RawModel::new(""), &GenConfig::default()),
            Err(SchemaError::InvalidModelDeclaration { index: 0, .. })
        ));
    }
}
