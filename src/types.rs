//! Core value types exchanged between service handlers and objects.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{Enumerated, ObjectType, PropertyIdentifier};

/// Largest valid object instance number (22 bits).
pub const MAX_INSTANCE: u32 = (1 << 22) - 1;

/// Identifies one object within a device: its type and instance number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectIdentifier {
    /// Object type.
    pub object_type: ObjectType,
    /// Instance number, at most [`MAX_INSTANCE`].
    pub instance: u32,
}

impl ObjectIdentifier {
    /// Create an identifier. The instance is not range-checked here.
    #[inline]
    pub const fn new(object_type: ObjectType, instance: u32) -> Self {
        Self {
            object_type,
            instance,
        }
    }

    /// Returns `true` if the instance fits in 22 bits.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.instance <= MAX_INSTANCE
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.object_type, self.instance)
    }
}

/// A wire-representable property value.
///
/// Values are immutable once built; writing a property replaces the whole
/// value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encodable {
    /// Null.
    Null,
    /// Boolean.
    Boolean(bool),
    /// Unsigned integer.
    Unsigned(u64),
    /// Signed integer.
    Signed(i64),
    /// Single-precision real.
    Real(f32),
    /// Double-precision real.
    Double(f64),
    /// Raw octets.
    OctetString(Vec<u8>),
    /// Character string.
    CharacterString(String),
    /// Raw enumerated code. See [`Encodable::enumerated`].
    Enumerated(u32),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Local date and time.
    DateTime(NaiveDateTime),
    /// Object identifier.
    ObjectIdentifier(ObjectIdentifier),
    /// Array of values, addressed 1-based by array index.
    Array(Vec<Encodable>),
}

impl Encodable {
    /// Wrap any enumerated value as its code.
    #[inline]
    pub fn enumerated<E: Enumerated>(value: E) -> Self {
        Encodable::Enumerated(value.code())
    }

    /// Wrap a character string.
    #[inline]
    pub fn string(value: impl Into<String>) -> Self {
        Encodable::CharacterString(value.into())
    }

    /// The unsigned payload, if this is an unsigned value.
    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            Encodable::Unsigned(v) => Some(*v),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Encodable::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// The string payload, if this is a character string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Encodable::CharacterString(v) => Some(v),
            _ => None,
        }
    }

    /// Decode the payload as enumeration `E`. Never fails for enumerated values.
    pub fn as_enumerated<E: Enumerated>(&self) -> Option<E> {
        match self {
            Encodable::Enumerated(code) => Some(E::for_id(*code)),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    pub fn as_array(&self) -> Option<&[Encodable]> {
        match self {
            Encodable::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns `true` for [`Encodable::Array`].
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Encodable::Array(_))
    }

    /// Short name of the value kind, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Encodable::Null => "null",
            Encodable::Boolean(_) => "boolean",
            Encodable::Unsigned(_) => "unsigned",
            Encodable::Signed(_) => "signed",
            Encodable::Real(_) => "real",
            Encodable::Double(_) => "double",
            Encodable::OctetString(_) => "octet-string",
            Encodable::CharacterString(_) => "character-string",
            Encodable::Enumerated(_) => "enumerated",
            Encodable::Date(_) => "date",
            Encodable::Time(_) => "time",
            Encodable::DateTime(_) => "date-time",
            Encodable::ObjectIdentifier(_) => "object-identifier",
            Encodable::Array(_) => "array",
        }
    }
}

impl From<bool> for Encodable {
    fn from(value: bool) -> Self {
        Encodable::Boolean(value)
    }
}

impl From<u64> for Encodable {
    fn from(value: u64) -> Self {
        Encodable::Unsigned(value)
    }
}

impl From<&str> for Encodable {
    fn from(value: &str) -> Self {
        Encodable::CharacterString(value.to_owned())
    }
}

impl From<String> for Encodable {
    fn from(value: String) -> Self {
        Encodable::CharacterString(value)
    }
}

impl From<ObjectIdentifier> for Encodable {
    fn from(value: ObjectIdentifier) -> Self {
        Encodable::ObjectIdentifier(value)
    }
}

/// Who is writing a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueSource {
    /// The local application.
    #[default]
    Local,
    /// A remote device, by device instance.
    Device(u32),
}

/// One property value as carried by read and write services.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyValue {
    /// Which property.
    pub property_identifier: PropertyIdentifier,
    /// 1-based element index for array properties; `Some(0)` addresses the length.
    pub property_array_index: Option<u32>,
    /// The value.
    pub value: Encodable,
    /// Write priority, passed through to hooks untouched.
    pub priority: Option<u8>,
}

impl PropertyValue {
    /// A whole-property value with no index and no priority.
    pub fn new(property_identifier: PropertyIdentifier, value: impl Into<Encodable>) -> Self {
        Self {
            property_identifier,
            property_array_index: None,
            value: value.into(),
            priority: None,
        }
    }

    /// Address a single array element.
    pub fn with_index(mut self, index: u32) -> Self {
        self.property_array_index = Some(index);
        self
    }

    /// Attach a write priority.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileAccessMethod;

    #[test]
    fn object_identifier_display() {
        let id = ObjectIdentifier::new(ObjectType::FILE, 3);
        assert_eq!(id.to_string(), "file 3");
        assert!(id.is_valid());
        assert!(!ObjectIdentifier::new(ObjectType::FILE, MAX_INSTANCE + 1).is_valid());
    }

    #[test]
    fn encodable_enumerated_roundtrip() {
        let value = Encodable::enumerated(FileAccessMethod::STREAM_ACCESS);
        assert_eq!(value, Encodable::Enumerated(1));
        assert_eq!(
            value.as_enumerated::<FileAccessMethod>(),
            Some(FileAccessMethod::STREAM_ACCESS)
        );
    }

    #[test]
    fn encodable_enumerated_unknown_code() {
        let value = Encodable::Enumerated(77);
        let method: FileAccessMethod = value.as_enumerated().unwrap();
        assert_eq!(method.code(), 77);
        assert_eq!(method.name(), None);
    }

    #[test]
    fn encodable_accessors() {
        assert_eq!(Encodable::from(5u64).as_unsigned(), Some(5));
        assert_eq!(Encodable::from(true).as_bool(), Some(true));
        assert_eq!(Encodable::from("abc").as_str(), Some("abc"));
        assert_eq!(Encodable::Null.as_unsigned(), None);
        assert!(Encodable::Array(vec![]).is_array());
        assert_eq!(Encodable::Real(1.0).kind(), "real");
    }

    #[test]
    fn property_value_builders() {
        let pv = PropertyValue::new(PropertyIdentifier::FILE_SIZE, 10u64)
            .with_index(2)
            .with_priority(8);
        assert_eq!(pv.property_array_index, Some(2));
        assert_eq!(pv.priority, Some(8));
        assert_eq!(pv.value, Encodable::Unsigned(10));
    }

    #[test]
    fn types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ObjectIdentifier>();
        assert_send_sync::<Encodable>();
        assert_send_sync::<PropertyValue>();
        assert_send_sync::<ValueSource>();
    }
}
