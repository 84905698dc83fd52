enumerated! {
    /// Direction and speed an escalator is currently running at.
    pub struct EscalatorOperationDirection: "EscalatorOperationDirection" {
        UNKNOWN = 0 => "unknown",
        STOPPED = 1 => "stopped",
        UP_RATED_SPEED = 2 => "upRatedSpeed",
        UP_REDUCED_SPEED = 3 => "upReducedSpeed",
        DOWN_RATED_SPEED = 4 => "downRatedSpeed",
        DOWN_REDUCED_SPEED = 5 => "downReducedSpeed",
    }
}
