#[macro_export]
macro_rules! scalar_kind_registry_entries {
    ($macro:ident $(, @args $($args:tt)+ )?) => {
        $macro! {
            $(
                @args $($args)+;
            )?
            @entries
            (Blob, Blob, supports_ordering = false, is_keyable = false),
            (Bool, Bool, supports_ordering = true, is_keyable = false),
            (Float32, Numeric, supports_ordering = true, is_keyable = false),
            (Float64, Numeric, supports_ordering = true, is_keyable = false),
            (Int, Numeric, supports_ordering = true, is_keyable = true),
            (Text, Textual, supports_ordering = true, is_keyable = true),
            (Uint, Numeric, supports_ordering = true, is_keyable = true),
            (Ulid, Identifier, supports_ordering = true, is_keyable = true),
        }
    };
}

#[macro_export]
macro_rules! scalar_kind_registry {
    ($macro:ident) => {
        $crate::scalar_kind_registry_entries!($macro)
    };
    ($macro:ident, $($args:tt)+) => {
        $crate::scalar_kind_registry_entries!($macro, @args $($args)+)
    };
}

macro_rules! metadata_from_registry {
    ( @args $kind:expr; @entries $( ($scalar:ident, $family:ident, supports_ordering = $supports_ordering:expr, is_keyable = $is_keyable:expr) ),* $(,)? ) => {
        match $kind {
            $(
                $crate::ScalarKind::$scalar => $crate::ScalarMetadata {
                    family: $crate::ScalarFamily::$family,
                    supports_ordering: $supports_ordering,
                    is_keyable: $is_keyable,
                },
            )*
        }
    };
}

macro_rules! label_from_registry {
    ( @args $kind:expr; @entries $( ($scalar:ident, $family:ident, supports_ordering = $supports_ordering:expr, is_keyable = $is_keyable:expr) ),* $(,)? ) => {
        match $kind {
            $( $crate::ScalarKind::$scalar => stringify!($scalar), )*
        }
    };
}

macro_rules! all_kinds_from_registry {
    ( @entries $( ($scalar:ident, $family:ident, supports_ordering = $supports_ordering:expr, is_keyable = $is_keyable:expr) ),* $(,)? ) => {
        [ $( $crate::ScalarKind::$scalar ),* ]
    };
}
