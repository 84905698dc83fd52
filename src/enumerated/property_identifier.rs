enumerated! {
    /// Protocol-wide key naming a property of an object.
    ///
    /// Codes 512 and above are vendor proprietary and always representable.
    pub struct PropertyIdentifier: "PropertyIdentifier" {
        ARCHIVE = 13 => "archive",
        DESCRIPTION = 28 => "description",
        FILE_ACCESS_METHOD = 41 => "fileAccessMethod",
        FILE_SIZE = 42 => "fileSize",
        FILE_TYPE = 43 => "fileType",
        MODIFICATION_DATE = 71 => "modificationDate",
        OBJECT_IDENTIFIER = 75 => "objectIdentifier",
        OBJECT_NAME = 77 => "objectName",
        OBJECT_TYPE = 79 => "objectType",
        OUT_OF_SERVICE = 81 => "outOfService",
        PRESENT_VALUE = 85 => "presentValue",
        READ_ONLY = 99 => "readOnly",
        STATUS_FLAGS = 111 => "statusFlags",
        RECORD_COUNT = 141 => "recordCount",
        PROPERTY_LIST = 371 => "propertyList",
    }
}

impl PropertyIdentifier {
    /// First code of the vendor-proprietary range.
    pub const FIRST_PROPRIETARY: u32 = 512;

    /// Whether this identifier lies in the vendor-proprietary range.
    pub fn is_proprietary(self) -> bool {
        self.0 >= Self::FIRST_PROPRIETARY
    }
}
