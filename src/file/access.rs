//! The backing resource behind a file object.

use std::time::SystemTime;

use crate::{FileAccessMethod, ResourceError};

/// Access to the stored bytes or records a [`FileObject`](crate::FileObject)
/// mirrors.
///
/// The resource may also be changed by other processes; the file object
/// re-reads it on every property read instead of caching.
///
/// Record-level methods have defaults that report
/// [`ResourceError::NotSupported`], so stream-only resources implement just
/// the byte methods.
///
/// # Thread Safety
///
/// Methods take `&self`; implementations use interior mutability. The file
/// object serializes atomic services with its own lock, but plain property
/// reads may run concurrently with them.
///
/// # Example
///
/// ```rust
/// use bacnet_objects::{FileAccess, FileAccessMethod, ResourceError};
/// use std::sync::RwLock;
/// use std::time::SystemTime;
///
/// struct Blob(RwLock<Vec<u8>>);
///
/// impl FileAccess for Blob {
///     fn name(&self) -> &str { "blob" }
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
/// ```
pub trait FileAccess: Send + Sync {
    /// Name used for the object's `objectName` and in errors.
    fn name(&self) -> &str;

    /// Whether the resource exists.
    fn exists(&self) -> Result<bool, ResourceError>;

    /// Whether the resource is a directory rather than a plain resource.
    fn is_directory(&self) -> Result<bool, ResourceError>;

    /// Current size in bytes.
    fn length(&self) -> Result<u64, ResourceError>;

    /// Time of the last modification.
    fn last_modified(&self) -> Result<SystemTime, ResourceError>;

    /// Whether the resource accepts writes.
    fn can_write(&self) -> bool;

    /// How the resource is addressed.
    fn access_method(&self) -> FileAccessMethod;

    /// Whether record-level operations are supported.
    fn has_record_access(&self) -> bool {
        self.access_method() == FileAccessMethod::RECORD_ACCESS
    }

    /// Current number of records.
    fn record_count(&self) -> Result<u64, ResourceError> {
        Err(ResourceError::NotSupported {
            operation: "record_count",
        })
    }

    /// Check a new size before it is committed.
    ///
    /// # Errors
    ///
    /// [`ResourceError::OutOfRange`] when the size is not acceptable.
    fn validate_file_size_write(&self, size: u64) -> Result<(), ResourceError>;

    /// Truncate or extend the resource to `size` bytes.
    fn write_file_size(&self, size: u64) -> Result<(), ResourceError>;

    /// Check a new record count before it is committed.
    ///
    /// # Errors
    ///
    /// [`ResourceError::OutOfRange`] when the count is not acceptable.
    fn validate_record_count_write(&self, count: u64) -> Result<(), ResourceError> {
        let _ = count;
        Err(ResourceError::NotSupported {
            operation: "validate_record_count_write",
        })
    }

    /// Truncate or extend the resource to `count` records.
    fn write_record_count(&self, count: u64) -> Result<(), ResourceError> {
        let _ = count;
        Err(ResourceError::NotSupported {
            operation: "write_record_count",
        })
    }

    /// Read up to `len` bytes starting at byte `start`.
    fn read_data(&self, start: u64, len: usize) -> Result<Vec<u8>, ResourceError>;

    /// Write `data` starting at byte `start`, extending the resource as needed.
    fn write_data(&self, start: u64, data: &[u8]) -> Result<(), ResourceError>;

    /// Read up to `count` records starting at record `start`.
    fn read_records(&self, start: u64, count: usize) -> Result<Vec<Vec<u8>>, ResourceError> {
        let _ = (start, count);
        Err(ResourceError::NotSupported {
            operation: "read_records",
        })
    }

    /// Write `records` starting at record `start`, replacing existing ones.
    fn write_records(&self, start: u64, records: &[Vec<u8>]) -> Result<(), ResourceError> {
        let _ = (start, records);
        Err(ResourceError::NotSupported {
            operation: "write_records",
        })
    }
}
