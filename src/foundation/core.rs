/// Stream timestamp in microseconds.
///
/// Packets carry the timestamp of the input frame they were produced from.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Build a timestamp from a frame number at a fixed frame rate.
    ///
    /// Returns `None` for `fps == 0`, which has no frame spacing.
    pub fn from_frame(frame: u64, fps: u32) -> Option<Self> {
        if fps == 0 {
            return None;
        }
        let micros = i128::from(frame) * 1_000_000 / i128::from(fps);
        Some(Self(micros.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64))
    }

    /// Timestamp value in seconds.
    pub fn as_secs_f64(self) -> f64 {
        (self.0 as f64) / 1_000_000.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}us", self.0)
    }
}

/// A payload tagged with the timestamp it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct Packet<T> {
    /// Stream time of the payload.
    pub timestamp: Timestamp,
    /// The carried value.
    pub payload: T,
}

impl<T> Packet<T> {
    /// Wrap `payload` at `timestamp`.
    pub fn new(timestamp: Timestamp, payload: T) -> Self {
        Self { timestamp, payload }
    }

    /// Map the payload, keeping the timestamp.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Packet<U> {
        Packet {
            timestamp: self.timestamp,
            payload: f(self.payload),
        }
    }

    /// Consume the packet, returning the payload.
    pub fn into_payload(self) -> T {
        self.payload
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
