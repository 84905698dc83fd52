//! # bacnet-objects
//!
//! Object and property core for a BACnet device: a property store with
//! per-type hooks, a per-object atomic-operation lock, extensible protocol
//! enumerations, and a file object backed by a pluggable resource.
//!
//! Transport, service decoding and the device's object database live
//! elsewhere. This crate answers "read this property", "write this
//! property" and "do these file steps atomically" for one object.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use bacnet_objects::{
//!     BacnetObject, Encodable, NoHooks, ObjectIdentifier, ObjectType, PropertyIdentifier,
//!     PropertyValue, ValueSource,
//! };
//!
//! let id = ObjectIdentifier::new(ObjectType::BINARY_VALUE, 3);
//! let object = BacnetObject::new(id, "pump-enable", NoHooks)?;
//!
//! object.write_property(
//!     ValueSource::Device(1001),
//!     PropertyValue::new(PropertyIdentifier::PRESENT_VALUE, true),
//! )?;
//! assert_eq!(
//!     object.read_property(PropertyIdentifier::PRESENT_VALUE, None)?,
//!     Encodable::Boolean(true)
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`BacnetObject`] | Property map plus hooks plus one atomic lock |
//! | [`PropertyHooks`] | `before_read` / `validate_write` / `after_write` per object type |
//! | [`AtomicLock`] | Exclusive, re-entrant, timeout-bounded object lock |
//! | [`Enumerated`] | Code/name mapping open to undeclared codes |
//! | [`FileObject`] | File object mirroring a [`FileAccess`] resource |
//! | [`AtomicSession`] | Stream/record file services under the lock |
//! | [`Encodable`] | A property value |
//! | [`ServiceError`] | `(errorClass, errorCode)` reported to the requester |
//!
//! ---
//!
//! ## Error Handling
//!
//! Three channels, never mixed:
//!
//! - [`ServiceError`]: the request was refused; nothing changed.
//! - [`ObjectError`]: a service error, lock contention, or a committed write
//!   the resource failed to apply. [`ObjectError::to_service_error`] gives the
//!   pair to send back.
//! - [`ConfigError`]: an object could not be built at all.
//!
//! ```rust
//! use bacnet_objects::{ErrorClass, ErrorCode, ServiceError};
//!
//! let err = ServiceError::new(ErrorClass::PROPERTY, ErrorCode::WRITE_ACCESS_DENIED);
//! assert_eq!(err, ServiceError::write_access_denied());
//! assert_eq!(err.to_string(), "property: writeAccessDenied");
//! ```
//!
//! ---
//!
//! ## Thread Safety
//!
//! Objects are `Send + Sync` and take `&self`. Each property access is atomic
//! on its own. Sequences that must not interleave with other requests hold
//! the object's [`AtomicLock`], directly or through an [`AtomicSession`].
//!
//! ---
//!
//! ## Logging
//!
//! Events go through [`tracing`]: rejected writes at `warn`, failed
//! propagation at `error`, lock traffic at `debug`/`trace`. Install any
//! subscriber to see them.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for [`Encodable`], [`ServiceError`], enumerations, and `BacnetObject::to_json` |

// Private modules
mod enumerated;
mod error;
mod file;
mod object;
mod types;

pub mod codec;

// Public re-exports - errors
pub use error::{ConfigError, DecodeError, LockError, ObjectError, ResourceError, ServiceError};

// Public re-exports - values
pub use types::{Encodable, MAX_INSTANCE, ObjectIdentifier, PropertyValue, ValueSource};

// Public re-exports - enumerations
pub use enumerated::{
    Enumerated, ErrorClass, ErrorCode, EscalatorOperationDirection, FileAccessMethod, ObjectType,
    PropertyIdentifier, Registry,
};

// Public re-exports - property store
pub use object::{
    AtomicConfig, AtomicGuard, AtomicLock, BacnetObject, DEFAULT_ATOMIC_TIMEOUT, NoHooks,
    PropertyHooks,
};

// Public re-exports - file objects
pub use file::{
    APPEND, AtomicSession, FileAccess, FileObject, RecordReadResult, StreamReadResult,
};
