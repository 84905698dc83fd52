//! Error types for the object/property core.
//!
//! Failures travel on separate channels:
//!
//! | Type | Meaning | Reaches the remote peer as |
//! |------|---------|----------------------------|
//! | [`ConfigError`] | object cannot be created | nothing, it is a local setup failure |
//! | [`ServiceError`] | request rejected, state unchanged | its own `(ErrorClass, ErrorCode)` |
//! | [`ObjectError`] | service failure incl. contention and post-commit resource failure | [`ObjectError::to_service_error`] |
//! | [`ResourceError`] | backing resource failure | mapped by the caller |
//! | [`LockError`] | atomic lock not obtained in time | `(device, deviceBusy)` |
//! | [`DecodeError`] | malformed wire bytes | the dispatcher's concern |

use std::time::Duration;

use crate::{ErrorClass, ErrorCode, ObjectIdentifier, PropertyIdentifier};

/// A reportable `(ErrorClass, ErrorCode)` pair.
///
/// Returned when a request is rejected before any state changed.
///
/// # Examples
///
/// ```rust
/// use bacnet_objects::{ErrorClass, ErrorCode, ServiceError};
///
/// let err = ServiceError::read_access_denied();
/// assert_eq!(err.error_class, ErrorClass::PROPERTY);
/// assert_eq!(err.error_code, ErrorCode::READ_ACCESS_DENIED);
/// assert_eq!(err.to_string(), "property: readAccessDenied");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{error_class}: {error_code}")]
pub struct ServiceError {
    /// Broad failure category.
    pub error_class: ErrorClass,
    /// Specific failure reason.
    pub error_code: ErrorCode,
}

impl ServiceError {
    /// Build an error from any class/code pair.
    #[inline]
    pub const fn new(error_class: ErrorClass, error_code: ErrorCode) -> Self {
        Self {
            error_class,
            error_code,
        }
    }

    /// `(property, unknownProperty)`
    pub const fn unknown_property() -> Self {
        Self::new(ErrorClass::PROPERTY, ErrorCode::UNKNOWN_PROPERTY)
    }

    /// `(property, readAccessDenied)`
    pub const fn read_access_denied() -> Self {
        Self::new(ErrorClass::PROPERTY, ErrorCode::READ_ACCESS_DENIED)
    }

    /// `(property, writeAccessDenied)`
    pub const fn write_access_denied() -> Self {
        Self::new(ErrorClass::PROPERTY, ErrorCode::WRITE_ACCESS_DENIED)
    }

    /// `(property, valueOutOfRange)`
    pub const fn value_out_of_range() -> Self {
        Self::new(ErrorClass::PROPERTY, ErrorCode::VALUE_OUT_OF_RANGE)
    }

    /// `(property, invalidDataType)`
    pub const fn invalid_data_type() -> Self {
        Self::new(ErrorClass::PROPERTY, ErrorCode::INVALID_DATA_TYPE)
    }

    /// `(property, propertyIsNotAnArray)`
    pub const fn property_is_not_an_array() -> Self {
        Self::new(ErrorClass::PROPERTY, ErrorCode::PROPERTY_IS_NOT_AN_ARRAY)
    }

    /// `(property, invalidArrayIndex)`
    pub const fn invalid_array_index() -> Self {
        Self::new(ErrorClass::PROPERTY, ErrorCode::INVALID_ARRAY_INDEX)
    }

    /// `(device, deviceBusy)`
    pub const fn device_busy() -> Self {
        Self::new(ErrorClass::DEVICE, ErrorCode::DEVICE_BUSY)
    }

    /// `(services, fileAccessDenied)`
    pub const fn file_access_denied() -> Self {
        Self::new(ErrorClass::SERVICES, ErrorCode::FILE_ACCESS_DENIED)
    }

    /// `(services, invalidFileAccessMethod)`
    pub const fn invalid_file_access_method() -> Self {
        Self::new(ErrorClass::SERVICES, ErrorCode::INVALID_FILE_ACCESS_METHOD)
    }

    /// `(services, invalidFileStartPosition)`
    pub const fn invalid_file_start_position() -> Self {
        Self::new(ErrorClass::SERVICES, ErrorCode::INVALID_FILE_START_POSITION)
    }

    /// `(resources, other)`
    pub const fn resource_failure() -> Self {
        Self::new(ErrorClass::RESOURCES, ErrorCode::OTHER)
    }
}

/// Failure of a service operation on an object.
///
/// Unlike [`ServiceError`], some variants are raised after the request was
/// partly carried out; see [`Propagation`](Self::Propagation).
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    /// Request rejected before any state changed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The object's atomic lock stayed busy for the whole wait.
    #[error("{object}: atomic lock not acquired within {waited:?}")]
    Contention {
        /// Object whose lock was contended.
        object: ObjectIdentifier,
        /// How long the caller waited.
        waited: Duration,
    },

    /// The new value was committed in memory but the resource rejected it.
    ///
    /// The in-memory value is not rolled back.
    #[error("{object}: {property} committed but resource update failed: {source}")]
    Propagation {
        /// Object that was written.
        object: ObjectIdentifier,
        /// Property that was written.
        property: PropertyIdentifier,
        /// The resource failure.
        #[source]
        source: ResourceError,
    },
}

impl ObjectError {
    /// The pair to report to the remote caller.
    pub fn to_service_error(&self) -> ServiceError {
        match self {
            ObjectError::Service(err) => *err,
            ObjectError::Contention { .. } => ServiceError::device_busy(),
            ObjectError::Propagation { .. } => ServiceError::resource_failure(),
        }
    }

    /// Returns `true` when the caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ObjectError::Contention { .. })
    }
}

impl From<ObjectError> for ServiceError {
    fn from(error: ObjectError) -> Self {
        error.to_service_error()
    }
}

/// Failure to create an object. Not recoverable at the protocol layer.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The backing resource does not exist.
    #[error("resource does not exist: {name}")]
    ResourceNotFound {
        /// Resource name.
        name: String,
    },

    /// The backing resource is a directory.
    #[error("resource is a directory: {name}")]
    ResourceIsDirectory {
        /// Resource name.
        name: String,
    },

    /// Instance number outside the 22-bit range.
    #[error("invalid object instance: {instance}")]
    InvalidInstance {
        /// The rejected instance number.
        instance: u32,
    },

    /// The resource could not be inspected.
    #[error("resource check failed: {0}")]
    Resource(#[from] ResourceError),

    /// A derived property could not be computed while creating the object.
    #[error("initial {property} unavailable: {source}")]
    Property {
        /// The property being primed.
        property: PropertyIdentifier,
        /// Why it failed.
        #[source]
        source: ServiceError,
    },
}

/// Failure reported by a backing resource.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// A requested size or count is outside what the resource allows.
    #[error("{what} out of range: {value} (limit {limit})")]
    OutOfRange {
        /// What was being set.
        what: &'static str,
        /// The rejected value.
        value: u64,
        /// The largest accepted value.
        limit: u64,
    },

    /// The resource does not implement the operation.
    #[error("operation not supported: {operation}")]
    NotSupported {
        /// The unsupported operation.
        operation: &'static str,
    },

    /// The resource refused access.
    #[error("{operation}: access denied: {name}")]
    AccessDenied {
        /// Resource name.
        name: String,
        /// The operation that was denied.
        operation: &'static str,
    },

    /// I/O failure with context.
    #[error("{operation} failed: {source}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ResourceError {
    /// Map onto the pair a remote caller understands.
    pub fn to_service_error(&self) -> ServiceError {
        match self {
            ResourceError::OutOfRange { .. } => ServiceError::value_out_of_range(),
            ResourceError::NotSupported { .. } => {
                ServiceError::new(ErrorClass::SERVICES, ErrorCode::SERVICE_REQUEST_DENIED)
            }
            ResourceError::AccessDenied { .. } => ServiceError::file_access_denied(),
            ResourceError::Io { source, .. }
                if source.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                ServiceError::file_access_denied()
            }
            ResourceError::Io { .. } => ServiceError::resource_failure(),
        }
    }
}

impl From<ResourceError> for ServiceError {
    fn from(error: ResourceError) -> Self {
        error.to_service_error()
    }
}

/// Wraps the error as [`ResourceError::Io`], keeping it as the source.
///
/// Permission failures still report `(services, fileAccessDenied)`.
impl From<std::io::Error> for ResourceError {
    fn from(error: std::io::Error) -> Self {
        ResourceError::Io {
            operation: "io",
            source: error,
        }
    }
}

/// The atomic lock could not be obtained.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LockError {
    /// Another operation held the lock for the whole wait.
    #[error("lock not acquired within {waited:?}")]
    Timeout {
        /// How long the caller waited.
        waited: Duration,
    },
}

/// Malformed application-tagged bytes.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The buffer ended early.
    #[error("unexpected end of data: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEnd {
        /// Bytes required.
        needed: usize,
        /// Bytes left.
        remaining: usize,
    },

    /// A different application tag was found.
    #[error("expected application tag {expected}, found {found}")]
    UnexpectedTag {
        /// The tag the caller asked for.
        expected: u8,
        /// The tag on the wire.
        found: u8,
    },

    /// A context-specific tag appeared where an application tag was required.
    #[error("context tag {tag} where an application tag was expected")]
    ContextTag {
        /// The context tag number.
        tag: u8,
    },

    /// The length does not fit the tagged type.
    #[error("invalid length {length} for application tag {tag}")]
    InvalidLength {
        /// Application tag number.
        tag: u8,
        /// Declared content length.
        length: usize,
    },

    /// Character set other than UTF-8.
    #[error("unsupported character set: {0}")]
    UnsupportedCharset(u8),

    /// Character string bytes were not UTF-8.
    #[error("invalid UTF-8 in character string")]
    InvalidUtf8,
}
