/// Votes required before a witnessed event is applied.
pub const DEFAULT_QUORUM: u64 = 5;

/// Witness engine configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WitnessConfig {
    /// Distinct validator attestations needed to apply an event.
    pub quorum: u64,
}

impl WitnessConfig {
    pub fn with_quorum(quorum: u64) -> Self {
        Self { quorum }
    }
}

impl Default for WitnessConfig {
    fn default() -> Self {
        Self {
            quorum: DEFAULT_QUORUM,
        }
    }
}
