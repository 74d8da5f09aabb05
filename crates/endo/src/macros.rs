/// Build a `Vec<Param>` from a list of `ToSql` values.
///
/// ```ignore
/// let mut b = endo::Builder::new();
/// b.write_with_params("SELECT * FROM users WHERE id = {} AND role = {}", endo::params![7_i64, "admin"]);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::Param>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Param::new($value)),+]
    };
}
