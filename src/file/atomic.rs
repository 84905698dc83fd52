//! Multi-step file services under the object's atomic lock.

use std::time::Duration;

use tracing::{debug, warn};

use super::{FileAccess, FileObject};
use crate::object::AtomicGuard;
use crate::{
    Encodable, FileAccessMethod, ObjectError, PropertyIdentifier, PropertyValue, ResourceError,
    ServiceError, ValueSource,
};

/// Start position meaning "after the last byte or record".
pub const APPEND: i64 = -1;

/// Result of a stream read.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamReadResult {
    /// No bytes remain past the returned data.
    pub end_of_file: bool,
    /// Byte offset of the first returned byte.
    pub start: u64,
    /// The bytes read.
    pub data: Vec<u8>,
}

/// Result of a record read.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordReadResult {
    /// No records remain past the returned ones.
    pub end_of_file: bool,
    /// Index of the first returned record.
    pub start: u64,
    /// The records read.
    pub records: Vec<Vec<u8>>,
}

/// An atomic service in progress on a [`FileObject`].
///
/// Holds the object's lock until dropped. Every step, including property
/// access, happens on the thread that began the session.
///
/// # Example
///
/// ```rust
/// use bacnet_objects::{APPEND, FileAccess, FileAccessMethod, FileObject, ResourceError};
/// use std::sync::RwLock;
/// use std::time::SystemTime;
///
/// struct Log(RwLock<Vec<u8>>);
///
/// impl FileAccess for Log {
///     fn name(&self) -> &str { "event.log" }
///     fn exists(&self) -> Result<bool, ResourceError> { Ok(true) }
///     fn is_directory(&self) -> Result<bool, ResourceError> { Ok(false) }
///     fn length(&self) -> Result<u64, ResourceError> { Ok(self.0.read().unwrap().len() as u64) }
///     fn last_modified(&self) -> Result<SystemTime, ResourceError> { Ok(SystemTime::UNIX_EPOCH) }
///     fn can_write(&self) -> bool { true }
///     fn access_method(&self) -> FileAccessMethod { FileAccessMethod::STREAM_ACCESS }
///     fn validate_file_size_write(&self, _: u64) -> Result<(), ResourceError> { Ok(()) }
///     fn write_file_size(&self, size: u64) -> Result<(), ResourceError> {
///         self.0.write().unwrap().resize(size as usize, 0);
///         Ok(())
///     }
///     fn read_data(&self, start: u64, len: usize) -> Result<Vec<u8>, ResourceError> {
///         let data = self.0.read().unwrap();
///         let start = (start as usize).min(data.len());
///         let end = (start + len).min(data.len());
///         Ok(data[start..end].to_vec())
///     }
///     fn write_data(&self, start: u64, bytes: &[u8]) -> Result<(), ResourceError> {
///         let mut data = self.0.write().unwrap();
///         let start = start as usize;
///         if data.len() < start + bytes.len() {
///             data.resize(start + bytes.len(), 0);
///         }
///         data[start..start + bytes.len()].copy_from_slice(bytes);
///         Ok(())
///     }
/// }
///
/// let file = FileObject::new(1, "text/plain", Log(RwLock::new(b"boot;".to_vec())))?;
///
/// let session = file.begin_atomic()?;
/// let at = session.write_stream(APPEND, b"alarm;")?;
/// assert_eq!(at, 5);
/// let back = session.read_stream(at as i64, 6)?;
/// assert_eq!(back.data, b"alarm;");
/// assert!(back.end_of_file);
/// drop(session);
///
/// assert!(!file.lock().is_locked());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use = "the lock is released as soon as the session is dropped"]
pub struct AtomicSession<'a, F> {
    file: &'a FileObject<F>,
    guard: AtomicGuard<'a>,
}

impl<'a, F: FileAccess> AtomicSession<'a, F> {
    pub(super) fn new(file: &'a FileObject<F>, guard: AtomicGuard<'a>) -> Self {
        debug!(object = %file.id(), "atomic session started");
        Self { file, guard }
    }

    /// How long the session has held the lock.
    pub fn held_for(&self) -> Duration {
        self.guard.held_for()
    }

    /// Read a property inside the session.
    ///
    /// # Errors
    ///
    /// See [`FileObject::read_property`].
    pub fn read_property(
        &self,
        pid: PropertyIdentifier,
        array_index: Option<u32>,
    ) -> Result<Encodable, ServiceError> {
        self.file.read_property(pid, array_index)
    }

    /// Write a property inside the session. Re-enters the held lock.
    ///
    /// # Errors
    ///
    /// See [`FileObject::write_property`].
    pub fn write_property(&self, source: ValueSource, value: PropertyValue) -> Result<(), ObjectError> {
        self.file.write_property(source, value)
    }

    /// Read up to `count` bytes from byte `start`.
    ///
    /// # Errors
    ///
    /// - `(services, invalidFileAccessMethod)` on a record-access file
    /// - `(services, invalidFileStartPosition)` if `start` is negative or past
    ///   the end
    pub fn read_stream(&self, start: i64, count: usize) -> Result<StreamReadResult, ObjectError> {
        self.require(FileAccessMethod::STREAM_ACCESS)?;
        let access = self.file.file_access();
        let length = access.length().map_err(|err| self.failure("length", err))?;
        let start = checked_start(start, length, false)?;

        let data = access
            .read_data(start, count)
            .map_err(|err| self.failure("read_data", err))?;
        let end_of_file = start + data.len() as u64 >= length;
        Ok(StreamReadResult {
            end_of_file,
            start,
            data,
        })
    }

    /// Write `data` at byte `start`, or append with [`APPEND`].
    ///
    /// Returns the offset the data was written at.
    ///
    /// # Errors
    ///
    /// - `(services, invalidFileAccessMethod)` on a record-access file
    /// - `(services, fileAccessDenied)` if the resource is read-only
    /// - `(services, invalidFileStartPosition)` if `start` is past the end
    pub fn write_stream(&self, start: i64, data: &[u8]) -> Result<u64, ObjectError> {
        self.require(FileAccessMethod::STREAM_ACCESS)?;
        self.require_writable()?;
        let access = self.file.file_access();
        let length = access.length().map_err(|err| self.failure("length", err))?;
        let start = checked_start(start, length, true)?;

        access
            .write_data(start, data)
            .map_err(|err| self.failure("write_data", err))?;
        debug!(object = %self.file.id(), start, len = data.len(), "stream written");
        Ok(start)
    }

    /// Read up to `count` records from record `start`.
    ///
    /// # Errors
    ///
    /// - `(services, invalidFileAccessMethod)` on a stream-access file
    /// - `(services, invalidFileStartPosition)` if `start` is negative or past
    ///   the last record
    pub fn read_records(&self, start: i64, count: usize) -> Result<RecordReadResult, ObjectError> {
        self.require(FileAccessMethod::RECORD_ACCESS)?;
        let access = self.file.file_access();
        let total = access
            .record_count()
            .map_err(|err| self.failure("record_count", err))?;
        let start = checked_start(start, total, false)?;

        let records = access
            .read_records(start, count)
            .map_err(|err| self.failure("read_records", err))?;
        let end_of_file = start + records.len() as u64 >= total;
        Ok(RecordReadResult {
            end_of_file,
            start,
            records,
        })
    }

    /// Write `records` from record `start`, or append with [`APPEND`].
    ///
    /// Returns the index of the first written record.
    ///
    /// # Errors
    ///
    /// - `(services, invalidFileAccessMethod)` on a stream-access file
    /// - `(services, fileAccessDenied)` if the resource is read-only
    /// - `(services, invalidFileStartPosition)` if `start` is past the end
    pub fn write_records(&self, start: i64, records: &[Vec<u8>]) -> Result<u64, ObjectError> {
        self.require(FileAccessMethod::RECORD_ACCESS)?;
        self.require_writable()?;
        let access = self.file.file_access();
        let total = access
            .record_count()
            .map_err(|err| self.failure("record_count", err))?;
        let start = checked_start(start, total, true)?;

        access
            .write_records(start, records)
            .map_err(|err| self.failure("write_records", err))?;
        debug!(object = %self.file.id(), start, count = records.len(), "records written");
        Ok(start)
    }

    fn require(&self, method: FileAccessMethod) -> Result<(), ServiceError> {
        let actual = self.file.file_access().access_method();
        if actual != method {
            debug!(object = %self.file.id(), %actual, requested = %method, "access method mismatch");
            return Err(ServiceError::invalid_file_access_method());
        }
        Ok(())
    }

    fn require_writable(&self) -> Result<(), ServiceError> {
        if !self.file.file_access().can_write() {
            return Err(ServiceError::file_access_denied());
        }
        Ok(())
    }

    fn failure(&self, operation: &'static str, err: ResourceError) -> ServiceError {
        warn!(object = %self.file.id(), operation, %err, "resource failure in atomic service");
        err.to_service_error()
    }
}

impl<F> std::fmt::Debug for AtomicSession<'_, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicSession")
            .field("held_for", &self.guard.held_for())
            .finish_non_exhaustive()
    }
}

impl<F: FileAccess> FileObject<F> {
    /// One-shot [`AtomicSession::read_stream`].
    ///
    /// # Errors
    ///
    /// [`ObjectError::Contention`] or the session's errors.
    pub fn atomic_read_stream(&self, start: i64, count: usize) -> Result<StreamReadResult, ObjectError> {
        self.begin_atomic()?.read_stream(start, count)
    }

    /// One-shot [`AtomicSession::write_stream`].
    ///
    /// # Errors
    ///
    /// [`ObjectError::Contention`] or the session's errors.
    pub fn atomic_write_stream(&self, start: i64, data: &[u8]) -> Result<u64, ObjectError> {
        self.begin_atomic()?.write_stream(start, data)
    }

    /// One-shot [`AtomicSession::read_records`].
    ///
    /// # Errors
    ///
    /// [`ObjectError::Contention`] or the session's errors.
    pub fn atomic_read_records(&self, start: i64, count: usize) -> Result<RecordReadResult, ObjectError> {
        self.begin_atomic()?.read_records(start, count)
    }

    /// One-shot [`AtomicSession::write_records`].
    ///
    /// # Errors
    ///
    /// [`ObjectError::Contention`] or the session's errors.
    pub fn atomic_write_records(&self, start: i64, records: &[Vec<u8>]) -> Result<u64, ObjectError> {
        self.begin_atomic()?.write_records(start, records)
    }
}

/// Resolve a requested start against the current end.
///
/// Reads must start before the end (an empty resource allows `0`). Writes may
/// start anywhere up to the end, or at [`APPEND`].
fn checked_start(start: i64, end: u64, writing: bool) -> Result<u64, ServiceError> {
    if writing && start == APPEND {
        return Ok(end);
    }
    let start = u64::try_from(start).map_err(|_| ServiceError::invalid_file_start_position())?;
    let past_end = if writing || end == 0 {
        start > end
    } else {
        start >= end
    };
    if past_end {
        return Err(ServiceError::invalid_file_start_position());
    }
    Ok(start)
}
