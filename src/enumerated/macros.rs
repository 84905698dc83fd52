/// Declares an [`Enumerated`](crate::Enumerated) newtype from a static table.
///
/// ```text
/// enumerated! {
///     /// Docs for the type.
///     pub struct FileAccessMethod: "FileAccessMethod" {
///         RECORD_ACCESS = 0 => "recordAccess",
///         STREAM_ACCESS = 1 => "streamAccess",
///     }
/// }
/// ```
///
/// Each entry becomes an associated constant and a row of the type's
/// registry table, in declaration order.
macro_rules! enumerated {
    (
        $(#[$meta:meta])*
        $vis:vis struct $ty:ident : $type_name:literal {
            $(
                $(#[$entry_meta:meta])*
                $konst:ident = $code:literal => $name:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        $vis struct $ty(u32);

        impl $ty {
            $(
                $(#[$entry_meta])*
                #[doc = concat!("`", $name, "` (", stringify!($code), ").")]
                pub const $konst: Self = Self($code);
            )*

            const TABLE: &'static [(u32, &'static str)] = &[$(($code, $name)),*];
        }

        impl $crate::enumerated::Enumerated for $ty {
            const TYPE_NAME: &'static str = $type_name;

            fn from_code(code: u32) -> Self {
                Self(code)
            }

            fn code(self) -> u32 {
                self.0
            }

            fn registry() -> &'static $crate::enumerated::Registry<Self> {
                static REGISTRY: ::std::sync::LazyLock<$crate::enumerated::Registry<$ty>> =
                    ::std::sync::LazyLock::new(|| $crate::enumerated::Registry::new($ty::TABLE));
                &REGISTRY
            }
        }

        impl ::std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match <$ty as $crate::enumerated::Enumerated>::name_for_id(self.0) {
                    Some(name) => write!(f, "{}({})", $type_name, name),
                    None => write!(f, "{}({})", $type_name, self.0),
                }
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match <$ty as $crate::enumerated::Enumerated>::name_for_id(self.0) {
                    Some(name) => f.write_str(name),
                    None => write!(f, "{}({})", $type_name, self.0),
                }
            }
        }

        impl From<u32> for $ty {
            fn from(code: u32) -> Self {
                <$ty as $crate::enumerated::Enumerated>::for_id(code)
            }
        }

        impl From<$ty> for u32 {
            fn from(value: $ty) -> u32 {
                value.0
            }
        }
    };
}
