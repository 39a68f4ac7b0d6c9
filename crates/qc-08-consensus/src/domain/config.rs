use std::time::Duration;

/// Consensus engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConsensusConfig {
    /// Abandon a round whose candidate was adopted longer ago than this
    /// without committing. `None` keeps a stalled round open forever.
    pub round_timeout: Option<Duration>,
}

impl ConsensusConfig {
    pub fn with_round_timeout(mut self, timeout: Duration) -> Self {
        self.round_timeout = Some(timeout);
        self
    }
}
