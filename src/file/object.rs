//! The file object: a property store mirroring a [`FileAccess`] resource.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use super::FileAccess;
use super::atomic::AtomicSession;
use crate::object::{AtomicConfig, AtomicLock, BacnetObject, PropertyHooks};
use crate::{
    ConfigError, Encodable, ObjectError, ObjectIdentifier, ObjectType, PropertyIdentifier,
    PropertyValue, ResourceError, ServiceError, ValueSource,
};

/// Derived properties, recomputed from the resource on every read.
const DERIVED: [PropertyIdentifier; 4] = [
    PropertyIdentifier::FILE_SIZE,
    PropertyIdentifier::MODIFICATION_DATE,
    PropertyIdentifier::READ_ONLY,
    PropertyIdentifier::RECORD_COUNT,
];

/// [`PropertyHooks`] tying file properties to a [`FileAccess`] resource.
#[derive(Debug)]
pub(crate) struct FileHooks<F> {
    access: F,
}

impl<F: FileAccess> FileHooks<F> {
    fn read_failure(&self, pid: PropertyIdentifier, err: ResourceError) -> ServiceError {
        warn!(resource = self.access.name(), property = %pid, %err, "resource read failed");
        ServiceError::read_access_denied()
    }

    fn requested_unsigned(value: &PropertyValue) -> Result<u64, ServiceError> {
        value
            .value
            .as_unsigned()
            .ok_or(ServiceError::invalid_data_type())
    }
}

impl<F: FileAccess> PropertyHooks for FileHooks<F> {
    fn before_read(
        &self,
        pid: PropertyIdentifier,
        _array_index: Option<u32>,
    ) -> Result<Option<Encodable>, ServiceError> {
        let value = match pid {
            PropertyIdentifier::FILE_SIZE => {
                let length = self
                    .access
                    .length()
                    .map_err(|err| self.read_failure(pid, err))?;
                Encodable::Unsigned(length)
            }
            PropertyIdentifier::MODIFICATION_DATE => {
                let modified = self
                    .access
                    .last_modified()
                    .map_err(|err| self.read_failure(pid, err))?;
                Encodable::DateTime(DateTime::<Local>::from(modified).naive_local())
            }
            PropertyIdentifier::READ_ONLY => Encodable::Boolean(!self.access.can_write()),
            PropertyIdentifier::RECORD_COUNT => {
                if !self.access.has_record_access() {
                    return Err(ServiceError::read_access_denied());
                }
                let count = self
                    .access
                    .record_count()
                    .map_err(|err| self.read_failure(pid, err))?;
                Encodable::Unsigned(count)
            }
            _ => return Ok(None),
        };
        Ok(Some(value))
    }

    fn validate_write(&self, _source: ValueSource, value: &PropertyValue) -> Result<(), ServiceError> {
        match value.property_identifier {
            PropertyIdentifier::FILE_SIZE => {
                let size = Self::requested_unsigned(value)?;
                self.access
                    .validate_file_size_write(size)
                    .map_err(|err| err.to_service_error())
            }
            PropertyIdentifier::RECORD_COUNT => {
                if !self.access.has_record_access() {
                    return Err(ServiceError::read_access_denied());
                }
                let count = Self::requested_unsigned(value)?;
                self.access
                    .validate_record_count_write(count)
                    .map_err(|err| err.to_service_error())
            }
            PropertyIdentifier::FILE_ACCESS_METHOD
            | PropertyIdentifier::MODIFICATION_DATE
            | PropertyIdentifier::READ_ONLY => Err(ServiceError::write_access_denied()),
            _ => Ok(()),
        }
    }

    fn after_write(
        &self,
        pid: PropertyIdentifier,
        _old: Option<&Encodable>,
        new: &Encodable,
    ) -> Result<(), ResourceError> {
        match (pid, new.as_unsigned()) {
            (PropertyIdentifier::FILE_SIZE, Some(size)) => self.access.write_file_size(size),
            (PropertyIdentifier::RECORD_COUNT, Some(count)) => self.access.write_record_count(count),
            _ => Ok(()),
        }
    }
}

/// A file object exposing a [`FileAccess`] resource as properties.
///
/// `fileSize`, `modificationDate`, `readOnly` and `recordCount` always
/// reflect the resource at the moment of the read. Writes to `fileSize` and
/// `recordCount` are checked by the resource, then pushed to it.
///
/// Every write goes through [`write_property`](Self::write_property), which
/// takes the object's atomic lock for the single operation; the underlying
/// store is not exposed. Multi-step services use
/// [`begin_atomic`](Self::begin_atomic) to hold it across all steps.
#[derive(Debug)]
pub struct FileObject<F> {
    object: BacnetObject<FileHooks<F>>,
}

impl<F: FileAccess> FileObject<F> {
    /// Create a file object with default lock settings.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ResourceNotFound`] if the resource does not exist
    /// - [`ConfigError::ResourceIsDirectory`] if it is a directory
    /// - [`ConfigError::InvalidInstance`] if `instance` does not fit 22 bits
    pub fn new(instance: u32, file_type: impl Into<String>, access: F) -> Result<Self, ConfigError> {
        Self::with_config(instance, file_type, access, AtomicConfig::default())
    }

    /// Create a file object with explicit lock settings.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn with_config(
        instance: u32,
        file_type: impl Into<String>,
        access: F,
        config: AtomicConfig,
    ) -> Result<Self, ConfigError> {
        if !access.exists()? {
            return Err(ConfigError::ResourceNotFound {
                name: access.name().to_owned(),
            });
        }
        if access.is_directory()? {
            return Err(ConfigError::ResourceIsDirectory {
                name: access.name().to_owned(),
            });
        }

        let id = ObjectIdentifier::new(ObjectType::FILE, instance);
        let name = access.name().to_owned();
        let method = access.access_method();
        let object = BacnetObject::with_config(id, name, FileHooks { access }, config)?;

        object.write_property_internal(PropertyIdentifier::FILE_TYPE, Encodable::string(file_type));
        object.write_property_internal(
            PropertyIdentifier::FILE_ACCESS_METHOD,
            Encodable::enumerated(method),
        );
        object.write_property_internal(PropertyIdentifier::ARCHIVE, false);

        for pid in DERIVED {
            if pid == PropertyIdentifier::RECORD_COUNT && !object.hooks().access.has_record_access() {
                continue;
            }
            object
                .read_property(pid, None)
                .map_err(|source| ConfigError::Property {
                    property: pid,
                    source,
                })?;
        }

        debug!(object = %id, resource = object.hooks().access.name(), %method, "file object ready");
        Ok(Self { object })
    }

    /// The object's identifier.
    #[inline]
    pub fn id(&self) -> ObjectIdentifier {
        self.object.id()
    }

    /// The backing resource.
    #[inline]
    pub fn file_access(&self) -> &F {
        &self.object.hooks().access
    }

    /// Current `objectName`.
    pub fn name(&self) -> String {
        self.object.name()
    }

    /// Returns `true` if a value is stored for `pid`.
    pub fn contains(&self, pid: PropertyIdentifier) -> bool {
        self.object.contains(pid)
    }

    /// Identifiers of all stored properties, in code order.
    pub fn property_identifiers(&self) -> Vec<PropertyIdentifier> {
        self.object.property_identifiers()
    }

    /// A copy of all stored values, without consulting the resource.
    pub fn snapshot(&self) -> BTreeMap<PropertyIdentifier, Encodable> {
        self.object.snapshot()
    }

    /// Stored values as a JSON object keyed by property name.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if a value cannot be represented.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        self.object.to_json()
    }

    /// The object's atomic-operation lock.
    #[inline]
    pub fn lock(&self) -> &AtomicLock {
        self.object.lock()
    }

    /// Read a property. Derived properties are recomputed first.
    ///
    /// # Errors
    ///
    /// - `(property, readAccessDenied)` for `recordCount` without record
    ///   access, or when the resource cannot be inspected
    /// - the store's errors, see [`BacnetObject::read_property`]
    pub fn read_property(
        &self,
        pid: PropertyIdentifier,
        array_index: Option<u32>,
    ) -> Result<Encodable, ServiceError> {
        self.object.read_property(pid, array_index)
    }

    /// Write a property while holding the atomic lock.
    ///
    /// Re-enters the lock if the calling thread already holds it.
    ///
    /// # Errors
    ///
    /// - [`ObjectError::Contention`] if the lock stayed busy
    /// - `(property, valueOutOfRange)` when the resource rejects a size/count
    /// - [`ObjectError::Propagation`] when the resource failed after commit
    pub fn write_property(&self, source: ValueSource, value: PropertyValue) -> Result<(), ObjectError> {
        let _guard = self.object.acquire_atomic()?;
        self.object.write_property(source, value)
    }

    /// Start an atomic service, waiting up to the configured timeout.
    ///
    /// # Errors
    ///
    /// [`ObjectError::Contention`] if another operation holds the lock.
    pub fn begin_atomic(&self) -> Result<AtomicSession<'_, F>, ObjectError> {
        self.begin_atomic_with_timeout(self.object.config().timeout)
    }

    /// Start an atomic service with an explicit timeout.
    ///
    /// # Errors
    ///
    /// [`ObjectError::Contention`] if another operation holds the lock.
    pub fn begin_atomic_with_timeout(
        &self,
        timeout: Duration,
    ) -> Result<AtomicSession<'_, F>, ObjectError> {
        let guard = self.object.acquire_atomic_for(timeout)?;
        Ok(AtomicSession::new(self, guard))
    }
}
