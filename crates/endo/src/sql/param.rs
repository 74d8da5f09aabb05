//! Arguments and placeholder styles for [`Builder`](super::Builder).

use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A clone-friendly query argument.
///
/// The value itself is shared through an `Arc`; cloning a `Param` never
/// copies the underlying value, while a builder copy still owns its own
/// argument list.
#[derive(Clone)]
pub struct Param(Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Wrap any `ToSql` value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// The value as a `ToSql` trait object, as expected by tokio-postgres.
    pub fn as_sql(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Multiple values bound to a single [`KeyValue`].
///
/// Every value fills one `{}` marker of the key's fragment, so
/// `"%s BETWEEN {} AND {}"` takes a `Values` of length two.
#[derive(Clone, Debug, Default)]
pub struct Values(Vec<Param>);

impl Values {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a value (consuming, for chaining).
    pub fn with<T: ToSql + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.0.push(Param::new(value));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn into_vec(self) -> Vec<Param> {
        self.0
    }
}

impl From<Vec<Param>> for Values {
    fn from(params: Vec<Param>) -> Self {
        Self(params)
    }
}

impl<T: ToSql + Send + Sync + 'static> FromIterator<T> for Values {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Param::new).collect())
    }
}

#[derive(Clone, Debug)]
enum KeyValueArg {
    Single(Param),
    Multi(Values),
}

/// A key (usually a column) and the value(s) bound to it.
///
/// Used with [`Builder::write_keyed_args`](super::Builder::write_keyed_args).
#[derive(Clone, Debug)]
pub struct KeyValue {
    key: String,
    value: KeyValueArg,
}

impl KeyValue {
    /// A key bound to a single value.
    pub fn new<T: ToSql + Send + Sync + 'static>(key: impl Into<String>, value: T) -> Self {
        Self::from_param(key, Param::new(value))
    }

    /// A key bound to an already wrapped value.
    pub fn from_param(key: impl Into<String>, param: Param) -> Self {
        Self {
            key: key.into(),
            value: KeyValueArg::Single(param),
        }
    }

    /// A key bound to several values, one per marker in its fragment.
    pub fn many(key: impl Into<String>, values: impl Into<Values>) -> Self {
        Self {
            key: key.into(),
            value: KeyValueArg::Multi(values.into()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Param>) {
        let params = match self.value {
            KeyValueArg::Single(p) => vec![p],
            KeyValueArg::Multi(values) => values.into_vec(),
        };
        (self.key, params)
    }
}

/// How a positional parameter is rendered into the SQL text.
///
/// The style is chosen per builder; the index passed to the formatter is
/// 1-based and always equals the argument's position in the argument list.
#[derive(Debug, Clone, Copy, Default)]
pub enum ParamStyle {
    /// `$1, $2, ...` (PostgreSQL).
    #[default]
    Dollar,
    /// `?` for every parameter (MySQL, SQLite).
    QuestionMark,
    /// A caller supplied formatter.
    Custom(fn(&mut String, usize)),
}

impl ParamStyle {
    /// Append the placeholder for the 1-based `index` to `out`.
    pub fn write_placeholder(self, out: &mut String, index: usize) {
        match self {
            ParamStyle::Dollar => {
                out.push('$');
                push_usize(out, index);
            }
            ParamStyle::QuestionMark => out.push('?'),
            ParamStyle::Custom(f) => f(out, index),
        }
    }

    /// The placeholder for the 1-based `index` as an owned string.
    pub fn placeholder(self, index: usize) -> String {
        let mut s = String::new();
        self.write_placeholder(&mut s, index);
        s
    }
}

// Write a usize as decimal digits into `out` without going through fmt.
#[inline]
fn push_usize(out: &mut String, mut n: usize) {
    if n < 10 {
        out.push((b'0' + n as u8) as char);
        return;
    }
    // Stack buffer for up to 20 digits (u64::MAX).
    let mut buf = [0u8; 20];
    let mut pos = buf.len();
    while n > 0 {
        pos -= 1;
        buf[pos] = b'0' + (n % 10) as u8;
        n /= 10;
    }
    for &d in &buf[pos..] {
        out.push(d as char);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollar_placeholders_are_one_based_numbers() {
        assert_eq!(ParamStyle::Dollar.placeholder(1), "$1");
        assert_eq!(ParamStyle::Dollar.placeholder(10), "$10");
        assert_eq!(ParamStyle::Dollar.placeholder(12345), "$12345");
    }

    #[test]
    fn question_mark_ignores_index() {
        assert_eq!(ParamStyle::QuestionMark.placeholder(1), "?");
        assert_eq!(ParamStyle::QuestionMark.placeholder(7), "?");
    }

    #[test]
    fn custom_style_receives_index() {
        fn colon(out: &mut String, i: usize) {
            out.push_str(&format!(":p{i}"));
        }
        assert_eq!(ParamStyle::Custom(colon).placeholder(3), ":p3");
    }

    #[test]
    fn param_debug_shows_value() {
        assert_eq!(format!("{:?}", Param::new(42_i32)), "42");
        assert_eq!(format!("{:?}", Param::new("admin")), "\"admin\"");
    }

    #[test]
    fn values_collect_from_iterator() {
        let v: Values = [1_i64, 2, 3].into_iter().collect();
        assert_eq!(v.len(), 3);
        assert!(Values::new().is_empty());
    }
}
