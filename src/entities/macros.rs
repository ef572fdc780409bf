//! Macros for reducing boilerplate when describing resource fields
//!
//! Rust has no runtime reflection, so every type that takes part in data
//! shaping or in-memory sorting carries an explicit descriptor table: its
//! public field names in declaration order plus a getter per name.

/// Implement [`Shapeable`](crate::core::field::Shapeable) for a struct.
///
/// Each entry maps a public field name to a struct field whose type converts
/// into [`FieldValue`](crate::core::field::FieldValue). Lookups by name are
/// case-insensitive; the declared spelling is what shaped records carry.
///
/// # Example
///
/// ```rust,ignore
/// use shape::prelude::*;
///
/// #[derive(Debug, Clone)]
/// pub struct BookDto {
///     pub id: Uuid,
///     pub title: String,
///     pub pages: i32,
/// }
///
/// impl_shapeable!(BookDto, "BookDto", {
///     "id" => id,
///     "title" => title,
///     "pages" => pages,
/// });
///
/// assert_eq!(BookDto::field_names(), &["id", "title", "pages"]);
/// ```
#[macro_export]
macro_rules! impl_shapeable {
    (
        $type:ty,
        $type_name:expr,
        {
            $( $name:literal => $field:ident ),* $(,)?
        }
    ) => {
        impl $crate::core::field::Shapeable for $type {
            fn type_name() -> &'static str {
                $type_name
            }

            fn field_names() -> &'static [&'static str] {
                &[ $( $name ),* ]
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                $(
                    if field.eq_ignore_ascii_case($name) {
                        return Some($crate::core::field::FieldValue::from(self.$field.clone()));
                    }
                )*
                None
            }
        }
    };
}
