//! Driver configuration
//!
//! The model is chosen by the endpoint client (see
//! [`OpenAiConfig`](crate::llm::openai::OpenAiConfig)); the driver reports
//! whatever the client names.

use crate::core::TowerId;
use crate::llm::retry::RetryConfig;

/// Default turn budget
pub const DEFAULT_MAX_TURNS: usize = 100;

/// Settings for one tool-calling run
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Maximum request/response round-trips (0 = make no request)
    pub max_turns: usize,
    /// Sampling temperature
    pub temperature: f64,
    /// Tower the disks start on
    pub source: TowerId,
    /// Tower that must end up holding every disk
    pub target: TowerId,
    /// Backoff for transient endpoint failures
    pub retry: RetryConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            temperature: 0.0,
            source: TowerId::A,
            target: TowerId::C,
            retry: RetryConfig::default(),
        }
    }
}

impl DriverConfig {
    /// Set the turn budget
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the source and target towers
    pub fn with_towers(mut self, source: TowerId, target: TowerId) -> Self {
        self.source = source;
        self.target = target;
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// The tower that is neither source nor target
    pub fn spare(&self) -> Option<TowerId> {
        self.source.third(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DriverConfig::default();
        assert_eq!(config.max_turns, 100);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.source, TowerId::A);
        assert_eq!(config.target, TowerId::C);
        assert_eq!(config.spare(), Some(TowerId::B));
    }

    #[test]
    fn test_builder() {
        let config = DriverConfig::default()
            .with_max_turns(5)
            .with_temperature(0.2)
            .with_towers(TowerId::B, TowerId::A)
            .with_retry(RetryConfig::disabled());

        assert_eq!(config.max_turns, 5);
        assert_eq!(config.spare(), Some(TowerId::C));
        assert_eq!(config.retry.max_retries, 0);
    }

    #[test]
    fn test_same_towers_have_no_spare() {
        let config = DriverConfig::default().with_towers(TowerId::A, TowerId::A);
        assert_eq!(config.spare(), None);
    }
}
