use super::PARAM_MARKER;
use super::param::{KeyValue, Param, ParamStyle};
use crate::error::{EndoError, EndoResult};
use crate::page::PageOptions;
use std::fmt;
use tokio_postgres::types::ToSql;

/// An incremental SQL text and positional argument accumulator.
///
/// Every placeholder emitted by the builder is numbered `1 + <arguments held
/// so far>`, so indices stay contiguous over the whole life of the builder no
/// matter how many `write*` calls contributed parameters. Fragments written
/// with [`write_with_args`](Builder::write_with_args) are numbered by hand and
/// still count towards the next index.
///
/// A builder is single-owner. To build several queries from a shared prefix,
/// fork it with [`copy`](Builder::copy).
#[must_use]
#[derive(Clone, Default)]
pub struct Builder {
    style: ParamStyle,
    sql: String,
    args: Vec<Param>,
    unmatched_markers: usize,
    surplus_values: usize,
}

impl Builder {
    /// Create an empty builder using `$n` placeholders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder using the given placeholder style.
    pub fn with_style(style: ParamStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    pub fn style(&self) -> ParamStyle {
        self.style
    }

    /// Append raw SQL verbatim.
    pub fn write(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append SQL with leading and trailing whitespace stripped.
    ///
    /// Convenient for multi-line string literals in generated code.
    pub fn write_trimmed(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql.trim());
        self
    }

    /// Append SQL together with arguments for placeholders the caller numbered
    /// by hand.
    pub fn write_with_args(
        &mut self,
        sql: &str,
        args: impl IntoIterator<Item = Param>,
    ) -> &mut Self {
        self.sql.push_str(sql);
        self.args.extend(args);
        self
    }

    /// Append arguments without any SQL.
    pub fn with_args(&mut self, args: impl IntoIterator<Item = Param>) -> &mut Self {
        self.args.extend(args);
        self
    }

    /// Append `template`, replacing every `{}` marker from left to right with
    /// the next placeholder and binding the matching value.
    ///
    /// One value is consumed per marker. Markers left without a value are
    /// written verbatim and surplus values are dropped; both are reported by
    /// [`validate`](Builder::validate).
    pub fn write_with_params(
        &mut self,
        template: &str,
        values: impl IntoIterator<Item = Param>,
    ) -> &mut Self {
        let mut values = values.into_iter();
        let mut rest = template;
        self.sql.reserve(template.len());

        while let Some(pos) = rest.find(PARAM_MARKER) {
            self.sql.push_str(&rest[..pos]);
            match values.next() {
                Some(value) => self.push_param(value),
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(template, "marker without value written verbatim");
                    self.sql.push_str(PARAM_MARKER);
                    self.unmatched_markers += 1;
                }
            }
            rest = &rest[pos + PARAM_MARKER.len()..];
        }
        self.sql.push_str(rest);

        let surplus = values.count();
        #[cfg(feature = "tracing")]
        {
            if surplus > 0 {
                tracing::warn!(template, surplus, "values without marker dropped");
            }
        }
        self.surplus_values += surplus;
        self
    }

    /// Append one fragment per key, joined by `separator`.
    ///
    /// The first `%s` in `format` is replaced by the key and `%%` stands for a
    /// literal `%`, then the fragment is written as with
    /// [`write_with_params`](Builder::write_with_params). A key
    /// bound to [`Values`](super::Values) fills as many markers as it has
    /// values.
    ///
    /// ```ignore
    /// b.write(" WHERE ").write_keyed_args("%s = {}", " AND ", [
    ///     KeyValue::new("status", "active"),
    ///     KeyValue::new("role", "admin"),
    /// ]);
    /// ```
    pub fn write_keyed_args(
        &mut self,
        format: &str,
        separator: &str,
        pairs: impl IntoIterator<Item = KeyValue>,
    ) -> &mut Self {
        for (i, pair) in pairs.into_iter().enumerate() {
            if i > 0 {
                self.sql.push_str(separator);
            }
            let (key, params) = pair.into_parts();
            let fragment = expand_key(format, &key);
            self.write_with_params(&fragment, params);
        }
        self
    }

    /// Append ` LIMIT {} OFFSET {}` bound to the page's limit and offset.
    pub fn write_page(&mut self, page: &PageOptions) -> &mut Self {
        let (limit, offset) = page.limit_offset();
        self.write_with_params(" LIMIT {} OFFSET {}", params![limit, offset])
    }

    /// An independent builder holding a snapshot of the current text and
    /// arguments. Writes to either side never affect the other.
    pub fn copy(&self) -> Builder {
        self.clone()
    }

    /// The SQL accumulated so far.
    pub fn as_str(&self) -> &str {
        &self.sql
    }

    /// The arguments accumulated so far.
    pub fn args(&self) -> &[Param] {
        &self.args
    }

    /// Number of arguments held; the next placeholder index is this plus one.
    pub fn len_args(&self) -> usize {
        self.args.len()
    }

    /// Argument refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.args.iter().map(Param::as_sql).collect()
    }

    /// The accumulated SQL and arguments.
    ///
    /// Does not consume the builder; calling it again returns the then
    /// current state.
    pub fn build(&self) -> (String, Vec<Param>) {
        (self.sql.clone(), self.args.clone())
    }

    /// Check that every `{}` marker received a value and no value was left
    /// over.
    pub fn validate(&self) -> EndoResult<()> {
        if self.unmatched_markers > 0 || self.surplus_values > 0 {
            return Err(EndoError::Validation(format!(
                "Builder: {} marker(s) without value, {} value(s) without marker",
                self.unmatched_markers, self.surplus_values
            )));
        }
        Ok(())
    }

    fn push_param(&mut self, value: Param) {
        self.args.push(value);
        self.style.write_placeholder(&mut self.sql, self.args.len());
    }
}

// `%s` (first only) → key, `%%` → `%`; any other `%` is kept.
fn expand_key(format: &str, key: &str) -> String {
    let mut out = String::with_capacity(format.len() + key.len());
    let mut key_written = false;
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some('s') if !key_written => {
                chars.next();
                out.push_str(key);
                key_written = true;
            }
            _ => out.push('%'),
        }
    }
    out
}

impl fmt::Write for Builder {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.sql.push_str(s);
        Ok(())
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("sql", &self.sql)
            .field("args", &self.args)
            .finish()
    }
}
