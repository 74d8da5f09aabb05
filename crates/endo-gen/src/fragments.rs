//! SQL fragment helpers for renderers.
//!
//! Renderers turn a resolved [`Model`](crate::model::Model) into store code
//! and need a handful of small string helpers to do so: column lists,
//! placeholder lists and `col = $n` assignments. They are plain functions
//! here; [`Helpers`] bundles them with a placeholder style so a renderer can
//! take its configuration as an argument.

use crate::model::Field;
use endo::ParamStyle;

/// Fields that are not the primary key.
pub fn filter_primary<'a>(fields: &[&'a Field]) -> Vec<&'a Field> {
    fields.iter().copied().filter(|f| !f.primary_key).collect()
}

/// Column names of `fields`, in order.
pub fn to_columns<'a>(fields: &[&'a Field]) -> Vec<&'a str> {
    fields.iter().map(|f| f.column.as_str()).collect()
}

/// `items` joined by `sep`.
pub fn join<S: AsRef<str>>(sep: &str, items: &[S]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(item.as_ref());
    }
    out
}

/// Placeholders `1..=n` in the given style.
pub fn param_list(n: usize, style: ParamStyle) -> Vec<String> {
    (1..=n).map(|i| style.placeholder(i)).collect()
}

/// The index of the argument following `items`.
pub fn next_arg<T>(items: &[T]) -> usize {
    items.len() + 1
}

/// `column = <placeholder>` for every column, numbered from 1.
pub fn field_updates<S: AsRef<str>>(columns: &[S], style: ParamStyle) -> Vec<String> {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let mut s = String::with_capacity(column.as_ref().len() + 6);
            s.push_str(column.as_ref());
            s.push_str(" = ");
            style.write_placeholder(&mut s, i + 1);
            s
        })
        .collect()
}

/// Fragment helpers bound to one placeholder style.
#[derive(Debug, Clone, Copy, Default)]
pub struct Helpers {
    style: ParamStyle,
}

impl Helpers {
    pub fn new(style: ParamStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> ParamStyle {
        self.style
    }

    pub fn params(&self, n: usize) -> Vec<String> {
        param_list(n, self.style)
    }

    pub fn updates<S: AsRef<str>>(&self, columns: &[S]) -> Vec<String> {
        field_updates(columns, self.style)
    }

    /// Comma separated column list, e.g. `id, email`.
    pub fn column_list(&self, fields: &[&Field]) -> String {
        join(", ", &to_columns(fields))
    }

    /// Comma separated placeholder list for `fields`, e.g. `$1, $2`.
    pub fn param_list(&self, fields: &[&Field]) -> String {
        join(", ", &self.params(fields.len()))
    }
}
