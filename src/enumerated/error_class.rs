enumerated! {
    /// Broad category of a service failure reported to a remote peer.
    pub struct ErrorClass: "ErrorClass" {
        DEVICE = 0 => "device",
        OBJECT = 1 => "object",
        PROPERTY = 2 => "property",
        RESOURCES = 3 => "resources",
        SECURITY = 4 => "security",
        SERVICES = 5 => "services",
        VT = 6 => "vt",
        COMMUNICATION = 7 => "communication",
    }
}
