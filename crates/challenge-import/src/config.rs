/// Configuration for challenge import runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Number of successfully persisted rows between two catalog flushes
    pub checkpoint_interval: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: 100,
        }
    }
}
