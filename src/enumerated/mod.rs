//! # Extensible Enumerations
//!
//! Protocol-level integer codes with a closed set of declared names and an
//! open range for codes nobody declared (newer protocol revisions, vendor
//! extensions).
//!
//! ## Overview
//!
//! Every enumeration is a `Copy` newtype over its `u32` code implementing
//! [`Enumerated`]. Its declared entries come from an explicit, static
//! `(code, name)` table that is turned into a [`Registry`] on first use.
//!
//! | Operation | Method | Fails? |
//! |-----------|--------|--------|
//! | code → instance | [`Enumerated::for_id`] | never |
//! | name → instance | [`Enumerated::for_name`] | `None` for unknown names |
//! | code → name | [`Enumerated::name_for_id`] | `None` for undeclared codes |
//! | declared count | [`Enumerated::size`] | never |
//!
//! Equality, ordering and hashing only look at the code, so an undeclared
//! value built twice compares equal:
//!
//! ```rust
//! use bacnet_objects::{Enumerated, ErrorCode};
//!
//! let a = ErrorCode::for_id(60_000);
//! let b = ErrorCode::for_id(60_000);
//! assert_eq!(a, b);
//! assert_eq!(a.name(), None);
//! assert_eq!(ErrorCode::for_id(32), ErrorCode::UNKNOWN_PROPERTY);
//! ```
//!
//! ## Declaring a new enumeration
//!
//! Types outside this crate implement [`Enumerated`] by hand and keep their
//! registry in a `LazyLock`:
//!
//! ```rust
//! use bacnet_objects::{Enumerated, Registry};
//! use std::sync::LazyLock;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
//! struct DoorStatus(u32);
//!
//! impl std::fmt::Display for DoorStatus {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         match self.name() {
//!             Some(name) => f.write_str(name),
//!             None => write!(f, "{}({})", Self::TYPE_NAME, self.0),
//!         }
//!     }
//! }
//!
//! impl Enumerated for DoorStatus {
//!     const TYPE_NAME: &'static str = "DoorStatus";
//!     fn from_code(code: u32) -> Self { Self(code) }
//!     fn code(self) -> u32 { self.0 }
//!     fn registry() -> &'static Registry<Self> {
//!         static REGISTRY: LazyLock<Registry<DoorStatus>> =
//!             LazyLock::new(|| Registry::new(&[(0, "closed"), (1, "opened")]));
//!         &REGISTRY
//!     }
//! }
//!
//! assert_eq!(DoorStatus::for_name("opened"), Some(DoorStatus(1)));
//! assert_eq!(DoorStatus::for_id(9).to_string(), "DoorStatus(9)");
//! ```

use std::fmt;
use std::hash::Hash;

#[macro_use]
mod macros;

mod error_class;
mod error_code;
mod escalator_operation_direction;
mod file_access_method;
mod object_type;
mod property_identifier;
mod registry;

pub use error_class::ErrorClass;
pub use error_code::ErrorCode;
pub use escalator_operation_direction::EscalatorOperationDirection;
pub use file_access_method::FileAccessMethod;
pub use object_type::ObjectType;
pub use property_identifier::PropertyIdentifier;
pub use registry::Registry;

/// A closed-but-extensible integer-coded protocol value.
///
/// Implementors provide the raw conversions and their registry; every
/// lookup operation is a provided method.
///
/// # Invariants
///
/// - `from_code(c).code() == c` for every `c`.
/// - `Eq`, `Ord` and `Hash` agree with `code()`.
pub trait Enumerated:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Type name used when displaying undeclared codes.
    const TYPE_NAME: &'static str;

    /// Wrap a raw code without consulting the registry.
    fn from_code(code: u32) -> Self;

    /// The wire code of this value.
    fn code(self) -> u32;

    /// The type's registry, built once per process.
    fn registry() -> &'static Registry<Self>;

    /// Resolve a code, synthesizing an unnamed value when undeclared.
    fn for_id(code: u32) -> Self {
        Self::registry().by_code(code)
    }

    /// Reverse lookup by declared name.
    fn for_name(name: &str) -> Option<Self> {
        Self::registry().by_name(name)
    }

    /// Declared name for `code`, if any.
    fn name_for_id(code: u32) -> Option<&'static str> {
        Self::registry().display_name(code)
    }

    /// Number of declared entries.
    fn size() -> usize {
        Self::registry().count()
    }

    /// The registered singleton for a declared code.
    fn declared(code: u32) -> Option<&'static Self> {
        Self::registry().declared(code)
    }

    /// Declared entries in declaration order.
    fn all() -> impl Iterator<Item = Self> {
        Self::registry().iter().copied()
    }

    /// Declared name of this value, `None` when it is outside the declared set.
    fn name(self) -> Option<&'static str> {
        Self::name_for_id(self.code())
    }

    /// Whether this value's code is in the declared set.
    fn is_declared(self) -> bool {
        Self::declared(self.code()).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_declared_roundtrip<E: Enumerated>() {
        for entry in E::all() {
            let code = entry.code();
            let by_code = E::declared(code).unwrap();
            assert!(std::ptr::eq(by_code, E::declared(code).unwrap()));

            let name = E::name_for_id(code).unwrap();
            let by_name = E::for_name(name).unwrap();
            assert_eq!(by_name, *by_code);
            assert_eq!(E::for_id(code), entry);
        }
    }

    #[test]
    fn declared_codes_resolve_both_ways() {
        check_declared_roundtrip::<ErrorClass>();
        check_declared_roundtrip::<ErrorCode>();
        check_declared_roundtrip::<PropertyIdentifier>();
        check_declared_roundtrip::<ObjectType>();
        check_declared_roundtrip::<FileAccessMethod>();
        check_declared_roundtrip::<EscalatorOperationDirection>();
    }

    #[test]
    fn undeclared_codes_never_fail() {
        for code in [6, 1_000, 65_535, u32::MAX] {
            let a = EscalatorOperationDirection::for_id(code);
            let b = EscalatorOperationDirection::for_id(code);
            assert_eq!(a, b);
            assert_eq!(a.code(), code);
            assert!(!a.is_declared());
            assert_eq!(EscalatorOperationDirection::name_for_id(code), None);
        }
    }

    #[test]
    fn equality_ignores_origin() {
        let synthesized = ErrorClass::from_code(2);
        assert_eq!(synthesized, ErrorClass::PROPERTY);
        assert!(synthesized.is_declared());
    }

    #[test]
    fn display_falls_back_to_code() {
        assert_eq!(ErrorClass::SERVICES.to_string(), "services");
        assert_eq!(ErrorClass::for_id(99).to_string(), "ErrorClass(99)");
        assert_eq!(format!("{:?}", ErrorClass::for_id(99)), "ErrorClass(99)");
    }

    #[test]
    fn ordering_is_by_code() {
        assert!(PropertyIdentifier::ARCHIVE < PropertyIdentifier::FILE_SIZE);
        assert!(PropertyIdentifier::for_id(600) > PropertyIdentifier::RECORD_COUNT);
    }

    #[test]
    fn u32_conversions() {
        let method: FileAccessMethod = 1.into();
        assert_eq!(method, FileAccessMethod::STREAM_ACCESS);
        assert_eq!(u32::from(ObjectType::FILE), 10);
    }
}
