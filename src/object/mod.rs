//! # Property Store
//!
//! A generic object: a map of property values plus the hooks that give an
//! object type its behavior.
//!
//! ## Lifecycle
//!
//! ```text
//! read_property(pid)                 write_property(source, value)
//!   │                                  │
//!   ├─ hooks.before_read(pid)          ├─ hooks.validate_write(source, value)  ── reject → ServiceError, nothing changed
//!   │    └─ Some(v) → store v          ├─ commit (old value captured)
//!   └─ serve stored value              └─ hooks.after_write(pid, old, new)     ── fail → ObjectError::Propagation
//! ```
//!
//! The store locks its map only for the duration of a single access. Callers
//! that need several accesses to behave as one take the object's
//! [`AtomicLock`] explicitly.
//!
//! ## Example
//!
//! ```rust
//! use bacnet_objects::{
//!     BacnetObject, Encodable, ObjectIdentifier, ObjectType, PropertyHooks,
//!     PropertyIdentifier, PropertyValue, ServiceError, ValueSource,
//! };
//!
//! /// Present value must stay within 0..=100.
//! struct Percent;
//!
//! impl PropertyHooks for Percent {
//!     fn validate_write(&self, _: ValueSource, value: &PropertyValue) -> Result<(), ServiceError> {
//!         match value.value.as_unsigned() {
//!             Some(v) if v > 100 => Err(ServiceError::value_out_of_range()),
//!             _ => Ok(()),
//!         }
//!     }
//! }
//!
//! let id = ObjectIdentifier::new(ObjectType::ANALOG_VALUE, 1);
//! let object = BacnetObject::new(id, "damper", Percent).unwrap();
//!
//! let ok = PropertyValue::new(PropertyIdentifier::PRESENT_VALUE, 40u64);
//! object.write_property(ValueSource::Local, ok).unwrap();
//!
//! let too_big = PropertyValue::new(PropertyIdentifier::PRESENT_VALUE, 140u64);
//! assert!(object.write_property(ValueSource::Local, too_big).is_err());
//!
//! assert_eq!(
//!     object.read_property(PropertyIdentifier::PRESENT_VALUE, None).unwrap(),
//!     Encodable::Unsigned(40)
//! );
//! ```

mod lock;

pub use lock::{AtomicConfig, AtomicGuard, AtomicLock, DEFAULT_ATOMIC_TIMEOUT};

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::{debug, error, trace, warn};

use crate::{
    ConfigError, Encodable, ObjectError, ObjectIdentifier, ObjectType, PropertyIdentifier,
    PropertyValue, ResourceError, ServiceError, ValueSource,
};

/// Per-object-type behavior around property access.
///
/// Every method has a no-op default; object types override only what they
/// need. Hooks must give the same answer for repeated calls over unchanged
/// state.
///
/// # Thread Safety
///
/// Hooks run on whatever thread calls into the object, concurrently with
/// other reads and writes unless the caller holds the object's lock.
pub trait PropertyHooks: Send + Sync {
    /// Called before a property is served.
    ///
    /// Return `Some(value)` to replace the stored value first, for properties
    /// whose truth lives outside the object.
    ///
    /// # Errors
    ///
    /// Any error is returned to the reader unchanged and the stored value is
    /// left alone.
    fn before_read(
        &self,
        pid: PropertyIdentifier,
        array_index: Option<u32>,
    ) -> Result<Option<Encodable>, ServiceError> {
        let _ = (pid, array_index);
        Ok(None)
    }

    /// Called before a write is committed.
    ///
    /// # Errors
    ///
    /// Rejecting the write returns the error to the writer with no state
    /// changed.
    fn validate_write(&self, source: ValueSource, value: &PropertyValue) -> Result<(), ServiceError> {
        let _ = (source, value);
        Ok(())
    }

    /// Called after a write has been committed in memory.
    ///
    /// `new` is the whole property value, also for array-element writes.
    ///
    /// # Errors
    ///
    /// A failure here cannot undo the write; the store logs it and reports
    /// [`ObjectError::Propagation`].
    fn after_write(
        &self,
        pid: PropertyIdentifier,
        old: Option<&Encodable>,
        new: &Encodable,
    ) -> Result<(), ResourceError> {
        let _ = (pid, old, new);
        Ok(())
    }
}

/// Hooks for objects with no behavior beyond storing values.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl PropertyHooks for NoHooks {}

/// A generic object: property map, hooks, and one atomic lock.
///
/// `objectIdentifier`, `objectName` and `objectType` are seeded at
/// construction. `propertyList` is computed on read.
#[derive(Debug)]
pub struct BacnetObject<H> {
    id: ObjectIdentifier,
    properties: RwLock<BTreeMap<PropertyIdentifier, Encodable>>,
    hooks: H,
    lock: AtomicLock,
    config: AtomicConfig,
}

impl<H: PropertyHooks> BacnetObject<H> {
    /// Create an object with default lock settings.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidInstance`] if the instance does not fit 22 bits.
    pub fn new(id: ObjectIdentifier, name: impl Into<String>, hooks: H) -> Result<Self, ConfigError> {
        Self::with_config(id, name, hooks, AtomicConfig::default())
    }

    /// Create an object with explicit lock settings.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidInstance`] if the instance does not fit 22 bits.
    pub fn with_config(
        id: ObjectIdentifier,
        name: impl Into<String>,
        hooks: H,
        config: AtomicConfig,
    ) -> Result<Self, ConfigError> {
        if !id.is_valid() {
            return Err(ConfigError::InvalidInstance {
                instance: id.instance,
            });
        }

        let mut properties = BTreeMap::new();
        properties.insert(PropertyIdentifier::OBJECT_IDENTIFIER, Encodable::ObjectIdentifier(id));
        properties.insert(PropertyIdentifier::OBJECT_NAME, Encodable::string(name));
        properties.insert(PropertyIdentifier::OBJECT_TYPE, Encodable::enumerated(id.object_type));

        debug!(object = %id, "object created");
        Ok(Self {
            id,
            properties: RwLock::new(properties),
            hooks,
            lock: AtomicLock::new(),
            config,
        })
    }

    /// The object's identifier.
    #[inline]
    pub fn id(&self) -> ObjectIdentifier {
        self.id
    }

    /// The object's type.
    #[inline]
    pub fn object_type(&self) -> ObjectType {
        self.id.object_type
    }

    /// Current `objectName`.
    pub fn name(&self) -> String {
        self.properties
            .read()
            .get(&PropertyIdentifier::OBJECT_NAME)
            .and_then(Encodable::as_str)
            .map(str::to_owned)
            .unwrap_or_default()
    }

    /// The object's hooks.
    #[inline]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// The object's atomic-operation lock.
    #[inline]
    pub fn lock(&self) -> &AtomicLock {
        &self.lock
    }

    /// The object's lock settings.
    #[inline]
    pub fn config(&self) -> AtomicConfig {
        self.config
    }

    /// Acquire the atomic lock with the configured timeout.
    ///
    /// # Errors
    ///
    /// [`ObjectError::Contention`] if the lock stayed busy.
    pub fn acquire_atomic(&self) -> Result<AtomicGuard<'_>, ObjectError> {
        self.acquire_atomic_for(self.config.timeout)
    }

    /// Acquire the atomic lock with an explicit timeout.
    ///
    /// # Errors
    ///
    /// [`ObjectError::Contention`] if the lock stayed busy.
    pub fn acquire_atomic_for(
        &self,
        timeout: std::time::Duration,
    ) -> Result<AtomicGuard<'_>, ObjectError> {
        self.lock.acquire(timeout).map_err(|err| match err {
            crate::LockError::Timeout { waited } => ObjectError::Contention {
                object: self.id,
                waited,
            },
        })
    }

    /// Read a property, running the pre-read hook first.
    ///
    /// With an array index, `0` yields the element count and `n` the n-th
    /// element.
    ///
    /// # Errors
    ///
    /// - `(property, unknownProperty)` if nothing is stored
    /// - `(property, propertyIsNotAnArray)` for an index on a non-array
    /// - `(property, invalidArrayIndex)` for an index past the end
    /// - whatever the hook reports
    pub fn read_property(
        &self,
        pid: PropertyIdentifier,
        array_index: Option<u32>,
    ) -> Result<Encodable, ServiceError> {
        let fresh = self.hooks.before_read(pid, array_index).inspect_err(|err| {
            debug!(object = %self.id, property = %pid, %err, "read rejected by hook");
        })?;
        if let Some(value) = fresh {
            trace!(object = %self.id, property = %pid, kind = value.kind(), "property recomputed");
            self.properties.write().insert(pid, value);
        }

        let properties = self.properties.read();
        if pid == PropertyIdentifier::PROPERTY_LIST {
            return select_element(&property_list(&properties), array_index);
        }
        let value = properties.get(&pid).ok_or(ServiceError::unknown_property())?;
        select_element(value, array_index)
    }

    /// Write a property through validation, commit and post-write reaction.
    ///
    /// # Errors
    ///
    /// - [`ObjectError::Service`] when rejected; nothing changed
    /// - [`ObjectError::Propagation`] when the post-write hook failed; the new
    ///   value is already committed
    pub fn write_property(&self, source: ValueSource, value: PropertyValue) -> Result<(), ObjectError> {
        let pid = value.property_identifier;
        if is_identity_property(pid) {
            return Err(ServiceError::write_access_denied().into());
        }
        if let Some(index) = value.property_array_index {
            check_index(self.properties.read().get(&pid), index)?;
        }

        if let Err(err) = self.hooks.validate_write(source, &value) {
            warn!(object = %self.id, property = %pid, ?source, %err, "write rejected");
            return Err(err.into());
        }

        let (old, new) = {
            let mut properties = self.properties.write();
            let old = properties.get(&pid).cloned();
            let new = match value.property_array_index {
                Some(index) => replace_element(old.as_ref(), index, value.value)?,
                None => value.value,
            };
            properties.insert(pid, new.clone());
            (old, new)
        };
        debug!(object = %self.id, property = %pid, kind = new.kind(), "property written");

        if let Err(source) = self.hooks.after_write(pid, old.as_ref(), &new) {
            error!(object = %self.id, property = %pid, %source, "committed write not propagated");
            return Err(ObjectError::Propagation {
                object: self.id,
                property: pid,
                source,
            });
        }
        Ok(())
    }

    /// Store a value with no hooks and no checks. Returns the previous value.
    pub fn write_property_internal(
        &self,
        pid: PropertyIdentifier,
        value: impl Into<Encodable>,
    ) -> Option<Encodable> {
        self.properties.write().insert(pid, value.into())
    }

    /// Remove a stored value. Identity properties cannot be removed.
    pub fn remove_property(&self, pid: PropertyIdentifier) -> Option<Encodable> {
        if is_identity_property(pid) || pid == PropertyIdentifier::OBJECT_NAME {
            return None;
        }
        self.properties.write().remove(&pid)
    }

    /// Returns `true` if a value is stored for `pid`.
    pub fn contains(&self, pid: PropertyIdentifier) -> bool {
        self.properties.read().contains_key(&pid)
    }

    /// Identifiers of all stored properties, in code order.
    pub fn property_identifiers(&self) -> Vec<PropertyIdentifier> {
        self.properties.read().keys().copied().collect()
    }

    /// A copy of all stored values, without running any hook.
    pub fn snapshot(&self) -> BTreeMap<PropertyIdentifier, Encodable> {
        self.properties.read().clone()
    }

    /// Stored values as a JSON object keyed by property name.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if a value cannot be represented.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let named: BTreeMap<String, Encodable> = self
            .snapshot()
            .into_iter()
            .map(|(pid, value)| (pid.to_string(), value))
            .collect();
        serde_json::to_string(&named)
    }
}

fn is_identity_property(pid: PropertyIdentifier) -> bool {
    pid == PropertyIdentifier::OBJECT_IDENTIFIER
        || pid == PropertyIdentifier::OBJECT_TYPE
        || pid == PropertyIdentifier::PROPERTY_LIST
}

fn property_list(properties: &BTreeMap<PropertyIdentifier, Encodable>) -> Encodable {
    Encodable::Array(
        properties
            .keys()
            .filter(|&&pid| !is_identity_property(pid) && pid != PropertyIdentifier::OBJECT_NAME)
            .map(|&pid| Encodable::enumerated(pid))
            .collect(),
    )
}

fn select_element(value: &Encodable, array_index: Option<u32>) -> Result<Encodable, ServiceError> {
    let Some(index) = array_index else {
        return Ok(value.clone());
    };
    let items = value
        .as_array()
        .ok_or(ServiceError::property_is_not_an_array())?;
    if index == 0 {
        return Ok(Encodable::Unsigned(items.len() as u64));
    }
    items
        .get(index as usize - 1)
        .cloned()
        .ok_or(ServiceError::invalid_array_index())
}

fn check_index(current: Option<&Encodable>, index: u32) -> Result<(), ServiceError> {
    let items = current
        .ok_or(ServiceError::unknown_property())?
        .as_array()
        .ok_or(ServiceError::property_is_not_an_array())?;
    if index == 0 || index as usize > items.len() {
        return Err(ServiceError::invalid_array_index());
    }
    Ok(())
}

fn replace_element(
    current: Option<&Encodable>,
    index: u32,
    element: Encodable,
) -> Result<Encodable, ServiceError> {
    check_index(current, index)?;
    let mut items = current
        .and_then(Encodable::as_array)
        .map(<[Encodable]>::to_vec)
        .unwrap_or_default();
    items[index as usize - 1] = element;
    Ok(Encodable::Array(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Enumerated, ErrorCode};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Hooks that compute presentValue from a counter and record writes.
    #[derive(Default)]
    struct Recording {
        reads: AtomicU64,
        writes: Mutex<Vec<(PropertyIdentifier, Option<Encodable>, Encodable)>>,
        fail_propagation: bool,
    }

    impl PropertyHooks for Recording {
        fn before_read(
            &self,
            pid: PropertyIdentifier,
            _: Option<u32>,
        ) -> Result<Option<Encodable>, ServiceError> {
            if pid == PropertyIdentifier::PRESENT_VALUE {
                let n = self.reads.fetch_add(1, Ordering::SeqCst);
                return Ok(Some(Encodable::Unsigned(n)));
            }
            if pid == PropertyIdentifier::STATUS_FLAGS {
                return Err(ServiceError::read_access_denied());
            }
            Ok(None)
        }

        fn validate_write(&self, _: ValueSource, value: &PropertyValue) -> Result<(), ServiceError> {
            if value.property_identifier == PropertyIdentifier::DESCRIPTION
                && value.value.as_str().is_none()
            {
                return Err(ServiceError::invalid_data_type());
            }
            Ok(())
        }

        fn after_write(
            &self,
            pid: PropertyIdentifier,
            old: Option<&Encodable>,
            new: &Encodable,
        ) -> Result<(), ResourceError> {
            self.writes
                .lock()
                .unwrap()
                .push((pid, old.cloned(), new.clone()));
            if self.fail_propagation {
                return Err(ResourceError::NotSupported { operation: "store" });
            }
            Ok(())
        }
    }

    fn object(hooks: Recording) -> BacnetObject<Recording> {
        BacnetObject::new(
            ObjectIdentifier::new(ObjectType::ANALOG_VALUE, 7),
            "av-7",
            hooks,
        )
        .unwrap()
    }

    #[test]
    fn identity_properties_are_seeded() {
        let obj = object(Recording::default());
        assert_eq!(
            obj.read_property(PropertyIdentifier::OBJECT_IDENTIFIER, None)
                .unwrap(),
            Encodable::ObjectIdentifier(obj.id())
        );
        assert_eq!(obj.name(), "av-7");
        assert_eq!(
            obj.read_property(PropertyIdentifier::OBJECT_TYPE, None)
                .unwrap()
                .as_enumerated::<ObjectType>(),
            Some(ObjectType::ANALOG_VALUE)
        );
    }

    #[test]
    fn invalid_instance_is_config_error() {
        let result = BacnetObject::new(
            ObjectIdentifier::new(ObjectType::DEVICE, crate::MAX_INSTANCE + 1),
            "bad",
            NoHooks,
        );
        assert!(matches!(result, Err(ConfigError::InvalidInstance { .. })));
    }

    #[test]
    fn before_read_recomputes_every_time() {
        let obj = object(Recording::default());
        let first = obj.read_property(PropertyIdentifier::PRESENT_VALUE, None).unwrap();
        let second = obj.read_property(PropertyIdentifier::PRESENT_VALUE, None).unwrap();
        assert_eq!(first, Encodable::Unsigned(0));
        assert_eq!(second, Encodable::Unsigned(1));
    }

    #[test]
    fn before_read_error_leaves_store_alone() {
        let obj = object(Recording::default());
        obj.write_property_internal(PropertyIdentifier::STATUS_FLAGS, Encodable::Unsigned(3));
        let err = obj.read_property(PropertyIdentifier::STATUS_FLAGS, None).unwrap_err();
        assert_eq!(err, ServiceError::read_access_denied());
        assert_eq!(
            obj.snapshot()[&PropertyIdentifier::STATUS_FLAGS],
            Encodable::Unsigned(3)
        );
    }

    #[test]
    fn missing_property_is_unknown() {
        let obj = object(Recording::default());
        let err = obj.read_property(PropertyIdentifier::DESCRIPTION, None).unwrap_err();
        assert_eq!(err.error_code, ErrorCode::UNKNOWN_PROPERTY);

        let vendor = PropertyIdentifier::for_id(9_001);
        assert!(obj.read_property(vendor, None).is_err());
    }

    #[test]
    fn write_commits_and_reports_old_and_new() {
        let obj = object(Recording::default());
        obj.write_property(
            ValueSource::Local,
            PropertyValue::new(PropertyIdentifier::DESCRIPTION, "first"),
        )
        .unwrap();
        obj.write_property(
            ValueSource::Device(99),
            PropertyValue::new(PropertyIdentifier::DESCRIPTION, "second"),
        )
        .unwrap();

        let writes = obj.hooks().writes.lock().unwrap();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].1, None);
        assert_eq!(writes[1].1, Some(Encodable::string("first")));
        assert_eq!(writes[1].2, Encodable::string("second"));
    }

    #[test]
    fn rejected_write_changes_nothing() {
        let obj = object(Recording::default());
        obj.write_property_internal(PropertyIdentifier::DESCRIPTION, "kept");
        let err = obj
            .write_property(
                ValueSource::Local,
                PropertyValue::new(PropertyIdentifier::DESCRIPTION, 5u64),
            )
            .unwrap_err();
        assert_eq!(err.to_service_error(), ServiceError::invalid_data_type());
        assert_eq!(
            obj.read_property(PropertyIdentifier::DESCRIPTION, None).unwrap(),
            Encodable::string("kept")
        );
        assert!(obj.hooks().writes.lock().unwrap().is_empty());
    }

    #[test]
    fn propagation_failure_keeps_committed_value() {
        let obj = object(Recording {
            fail_propagation: true,
            ..Default::default()
        });
        let err = obj
            .write_property(
                ValueSource::Local,
                PropertyValue::new(PropertyIdentifier::DESCRIPTION, "new"),
            )
            .unwrap_err();
        assert!(matches!(err, ObjectError::Propagation { .. }));
        assert_eq!(
            obj.read_property(PropertyIdentifier::DESCRIPTION, None).unwrap(),
            Encodable::string("new")
        );
    }

    #[test]
    fn identity_properties_are_not_writable() {
        let obj = object(Recording::default());
        for pid in [
            PropertyIdentifier::OBJECT_IDENTIFIER,
            PropertyIdentifier::OBJECT_TYPE,
            PropertyIdentifier::PROPERTY_LIST,
        ] {
            let err = obj
                .write_property(ValueSource::Local, PropertyValue::new(pid, 1u64))
                .unwrap_err();
            assert_eq!(err.to_service_error(), ServiceError::write_access_denied());
        }
    }

    #[test]
    fn indexed_write_to_scalar_is_rejected() {
        let obj = object(Recording::default());
        obj.write_property_internal(PropertyIdentifier::OUT_OF_SERVICE, false);
        let err = obj
            .write_property(
                ValueSource::Local,
                PropertyValue::new(PropertyIdentifier::OUT_OF_SERVICE, true).with_index(1),
            )
            .unwrap_err();
        assert_eq!(err.to_service_error(), ServiceError::property_is_not_an_array());
        assert_eq!(
            obj.read_property(PropertyIdentifier::OUT_OF_SERVICE, None).unwrap(),
            Encodable::Boolean(false)
        );
    }

    #[test]
    fn indexed_write_replaces_one_element() {
        let obj = object(Recording::default());
        let pid = PropertyIdentifier::for_id(600);
        obj.write_property_internal(
            pid,
            Encodable::Array(vec![Encodable::Unsigned(1), Encodable::Unsigned(2)]),
        );
        obj.write_property(
            ValueSource::Local,
            PropertyValue::new(pid, 20u64).with_index(2),
        )
        .unwrap();

        assert_eq!(obj.read_property(pid, Some(0)).unwrap(), Encodable::Unsigned(2));
        assert_eq!(obj.read_property(pid, Some(2)).unwrap(), Encodable::Unsigned(20));
        let err = obj.read_property(pid, Some(3)).unwrap_err();
        assert_eq!(err, ServiceError::invalid_array_index());

        let err = obj
            .write_property(ValueSource::Local, PropertyValue::new(pid, 1u64).with_index(3))
            .unwrap_err();
        assert_eq!(err.to_service_error(), ServiceError::invalid_array_index());
    }

    #[test]
    fn indexed_read_of_scalar_is_rejected() {
        let obj = object(Recording::default());
        let err = obj
            .read_property(PropertyIdentifier::OBJECT_NAME, Some(1))
            .unwrap_err();
        assert_eq!(err, ServiceError::property_is_not_an_array());
    }

    #[test]
    fn property_list_skips_identity() {
        let obj = object(Recording::default());
        obj.write_property_internal(PropertyIdentifier::DESCRIPTION, "d");
        let list = obj.read_property(PropertyIdentifier::PROPERTY_LIST, None).unwrap();
        assert_eq!(
            list,
            Encodable::Array(vec![Encodable::enumerated(PropertyIdentifier::DESCRIPTION)])
        );
        assert_eq!(
            obj.read_property(PropertyIdentifier::PROPERTY_LIST, Some(0)).unwrap(),
            Encodable::Unsigned(1)
        );
    }

    #[test]
    fn remove_keeps_identity() {
        let obj = object(Recording::default());
        obj.write_property_internal(PropertyIdentifier::DESCRIPTION, "d");
        assert!(obj.remove_property(PropertyIdentifier::DESCRIPTION).is_some());
        assert!(obj.remove_property(PropertyIdentifier::OBJECT_NAME).is_none());
        assert!(obj.contains(PropertyIdentifier::OBJECT_NAME));
        assert_eq!(
            obj.property_identifiers(),
            vec![
                PropertyIdentifier::OBJECT_IDENTIFIER,
                PropertyIdentifier::OBJECT_NAME,
                PropertyIdentifier::OBJECT_TYPE,
            ]
        );
    }

    #[test]
    fn acquire_atomic_reports_contention() {
        let obj = std::sync::Arc::new(
            BacnetObject::with_config(
                ObjectIdentifier::new(ObjectType::FILE, 1),
                "f",
                NoHooks,
                AtomicConfig::default().with_timeout(std::time::Duration::from_millis(20)),
            )
            .unwrap(),
        );
        let _guard = obj.acquire_atomic().unwrap();

        let contender = std::sync::Arc::clone(&obj);
        let err = std::thread::spawn(move || contender.acquire_atomic().map(|_| ()))
            .join()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, ObjectError::Contention { object, .. } if object.instance == 1));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn to_json_uses_property_names() {
        let obj = object(Recording::default());
        let json = obj.to_json().unwrap();
        assert!(json.contains("\"objectName\""));
        assert!(json.contains("av-7"));
    }
}
