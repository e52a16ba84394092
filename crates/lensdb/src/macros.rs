///
/// view
///
/// Declare a view: a trait of read accessors whose trait object type is
/// the view's type. Supertraits (themselves declared with `view!`) become
/// parent views.
///
/// ```ignore
/// view! {
///     pub trait Located {
///         fn name(&self) -> String;
///         fn state(&self) -> String;
///     }
/// }
///
/// view! {
///     pub trait Census: Located {
///         fn population(&self) -> i64;
///     }
/// }
/// ```
///
/// Each accessor is implemented on `Projection` and returns the field's
/// value, or the zero value when the instance's shape lacks the field.
///

#[macro_export]
macro_rules! view {
    (
        $(#[$meta:meta])*
        $vis:vis trait $name:ident $(: $first:ident $(+ $rest:ident)*)? {
            $(
                $(#[$fmeta:meta])*
                fn $field:ident(&self) -> $ty:ty;
            )*
        }
    ) => {
        $(#[$meta])*
        $vis trait $name $(: $first $(+ $rest)*)? {
            $(
                $(#[$fmeta])*
                fn $field(&self) -> $ty;
            )*
        }

        impl $crate::__reexports::ViewKind for dyn $name {
            const PATH: &'static str = concat!(module_path!(), "::", stringify!($name));

            fn members() -> ::std::vec::Vec<$crate::__reexports::MemberDecl> {
                ::std::vec![
                    $(
                        $crate::__reexports::MemberDecl::getter(
                            stringify!($field),
                            <$ty as $crate::__reexports::FieldValue>::value_type(),
                        ),
                    )*
                ]
            }

            fn extends() -> ::std::vec::Vec<$crate::__reexports::TypePath> {
                ::std::vec![
                    $(
                        <dyn $first as $crate::__reexports::ViewKind>::path(),
                        $(<dyn $rest as $crate::__reexports::ViewKind>::path(),)*
                    )?
                ]
            }

            fn declare_parents(
                catalog: &mut $crate::__reexports::TypeCatalog,
            ) -> ::std::result::Result<(), $crate::__reexports::ConfigurationError> {
                $(
                    catalog.declare_view::<dyn $first>()?;
                    $(catalog.declare_view::<dyn $rest>()?;)*
                )?
                let _ = catalog;

                ::std::result::Result::Ok(())
            }
        }

        impl $name for $crate::__reexports::Projection {
            $(
                fn $field(&self) -> $ty {
                    self.read_or_zero::<$ty>(stringify!($field))
                }
            )*
        }
    };
}
