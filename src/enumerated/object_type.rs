enumerated! {
    /// Standard object types. Codes 128 and above are vendor proprietary.
    pub struct ObjectType: "ObjectType" {
        ANALOG_INPUT = 0 => "analogInput",
        ANALOG_OUTPUT = 1 => "analogOutput",
        ANALOG_VALUE = 2 => "analogValue",
        BINARY_INPUT = 3 => "binaryInput",
        BINARY_OUTPUT = 4 => "binaryOutput",
        BINARY_VALUE = 5 => "binaryValue",
        CALENDAR = 6 => "calendar",
        COMMAND = 7 => "command",
        DEVICE = 8 => "device",
        EVENT_ENROLLMENT = 9 => "eventEnrollment",
        FILE = 10 => "file",
        GROUP = 11 => "group",
        LOOP = 12 => "loop",
        MULTI_STATE_INPUT = 13 => "multiStateInput",
        MULTI_STATE_OUTPUT = 14 => "multiStateOutput",
        NOTIFICATION_CLASS = 15 => "notificationClass",
        PROGRAM = 16 => "program",
        SCHEDULE = 17 => "schedule",
        AVERAGING = 18 => "averaging",
        MULTI_STATE_VALUE = 19 => "multiStateValue",
        TREND_LOG = 20 => "trendLog",
        LIFE_SAFETY_POINT = 21 => "lifeSafetyPoint",
        LIFE_SAFETY_ZONE = 22 => "lifeSafetyZone",
        ACCUMULATOR = 23 => "accumulator",
        PULSE_CONVERTER = 24 => "pulseConverter",
        EVENT_LOG = 25 => "eventLog",
        GLOBAL_GROUP = 26 => "globalGroup",
        TREND_LOG_MULTIPLE = 27 => "trendLogMultiple",
        STRUCTURED_VIEW = 29 => "structuredView",
        ACCESS_DOOR = 30 => "accessDoor",
        ESCALATOR = 58 => "escalator",
    }
}

impl ObjectType {
    /// First code of the vendor-proprietary range.
    pub const FIRST_PROPRIETARY: u32 = 128;

    /// Whether this type lies in the vendor-proprietary range.
    pub fn is_proprietary(self) -> bool {
        self.0 >= Self::FIRST_PROPRIETARY
    }
}
