//! Helper macro generating the port error enums shared by all adapters.
//!
//! Every driven port distinguishes connection failures (the store could not
//! be reached) from query failures (the store answered with an error). The
//! macro derives the enum, its `thiserror` display, and snake_case
//! constructor functions accepting `impl Into<T>` for each field.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum SamplePortError {
            Connection { message: String } => "sample store unreachable: {message}",
            Query { message: String } => "sample store query failed: {message}",
            RowCount { expected: u32, actual: u32 } =>
                "sample row count mismatch: expected {expected}, got {actual}",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SamplePortError::connection("refused");
        assert_eq!(err.to_string(), "sample store unreachable: refused");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = SamplePortError::row_count(1_u32, 0_u32);
        assert_eq!(
            err.to_string(),
            "sample row count mismatch: expected 1, got 0"
        );
    }

    #[test]
    fn variants_compare_by_payload() {
        assert_eq!(
            SamplePortError::query("boom"),
            SamplePortError::query("boom")
        );
        assert_ne!(
            SamplePortError::query("boom"),
            SamplePortError::connection("boom")
        );
    }
}
