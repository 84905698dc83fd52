enumerated! {
    /// Specific reason for a service failure, paired with an [`ErrorClass`](crate::ErrorClass).
    ///
    /// Only the codes this crate produces or commonly meets are declared;
    /// everything else decodes as an unnamed value.
    pub struct ErrorCode: "ErrorCode" {
        OTHER = 0 => "other",
        CONFIGURATION_IN_PROGRESS = 2 => "configurationInProgress",
        DEVICE_BUSY = 3 => "deviceBusy",
        FILE_ACCESS_DENIED = 5 => "fileAccessDenied",
        INCONSISTENT_PARAMETERS = 7 => "inconsistentParameters",
        INVALID_DATA_TYPE = 9 => "invalidDataType",
        INVALID_FILE_ACCESS_METHOD = 10 => "invalidFileAccessMethod",
        INVALID_FILE_START_POSITION = 11 => "invalidFileStartPosition",
        MISSING_REQUIRED_PARAMETER = 16 => "missingRequiredParameter",
        NO_SPACE_FOR_OBJECT = 18 => "noSpaceForObject",
        NO_SPACE_TO_WRITE_PROPERTY = 20 => "noSpaceToWriteProperty",
        OPERATIONAL_PROBLEM = 25 => "operationalProblem",
        READ_ACCESS_DENIED = 27 => "readAccessDenied",
        SERVICE_REQUEST_DENIED = 29 => "serviceRequestDenied",
        TIMEOUT = 30 => "timeout",
        UNKNOWN_OBJECT = 31 => "unknownObject",
        UNKNOWN_PROPERTY = 32 => "unknownProperty",
        UNSUPPORTED_OBJECT_TYPE = 36 => "unsupportedObjectType",
        VALUE_OUT_OF_RANGE = 37 => "valueOutOfRange",
        WRITE_ACCESS_DENIED = 40 => "writeAccessDenied",
        INVALID_ARRAY_INDEX = 42 => "invalidArrayIndex",
        DATATYPE_NOT_SUPPORTED = 47 => "datatypeNotSupported",
        PROPERTY_IS_NOT_AN_ARRAY = 50 => "propertyIsNotAnArray",
    }
}
