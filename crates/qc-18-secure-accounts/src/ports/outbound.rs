//! Outbound ports (driven side - SPI)

/// Wall-clock source for the transfer time lock.
pub trait TimeSource: Send + Sync {
    /// Current time in unix milliseconds.
    fn now_ms(&self) -> u64;
}
