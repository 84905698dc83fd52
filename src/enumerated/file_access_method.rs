enumerated! {
    /// How a file object's contents are addressed by the atomic file services.
    pub struct FileAccessMethod: "FileAccessMethod" {
        RECORD_ACCESS = 0 => "recordAccess",
        STREAM_ACCESS = 1 => "streamAccess",
    }
}
