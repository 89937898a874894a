//! Client configuration options.

use std::time::Duration;

/// Default number of resources requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// HTTP status codes retried unless configured otherwise.
pub const DEFAULT_RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Configuration for the resource client.
///
/// # Example
///
/// ```
/// use resource_pager::{Backoff, ClientConfig, RecoveryConfig};
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0")
///     .with_recovery(RecoveryConfig::new(5).with_backoff(Backoff::exponential()));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Resources requested per page
    pub page_size: u32,
    /// Recovery configuration
    pub recovery: Option<RecoveryConfig>,
    /// Standalone backoff from before [`RecoveryConfig`] existed.
    ///
    /// Only consulted when `recovery` is absent or has no backoff of its own.
    #[deprecated(note = "set the backoff on `recovery` instead")]
    pub backoff_strategy: Backoff,
    /// Retry count paired with `backoff_strategy` when `recovery` is absent
    pub default_number_of_retries: u32,
    /// HTTP status codes to retry on
    pub retry_statuses: Vec<u16>,
}

#[allow(deprecated)]
impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("resource-pager/{} (Rust)", env!("CARGO_PKG_VERSION")),
            page_size: DEFAULT_PAGE_SIZE,
            recovery: Some(RecoveryConfig::new(10).with_backoff(Backoff::Zero)),
            backoff_strategy: Backoff::Zero,
            default_number_of_retries: 3,
            retry_statuses: DEFAULT_RETRY_STATUSES.to_vec(),
        }
    }
}

#[allow(deprecated)]
impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the number of resources requested per page.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the recovery configuration.
    pub fn with_recovery(mut self, recovery: RecoveryConfig) -> Self {
        self.recovery = Some(recovery);
        self
    }

    /// Remove the recovery configuration, falling back to the standalone
    /// backoff and the default retry count.
    pub fn without_recovery(mut self) -> Self {
        self.recovery = None;
        self
    }

    /// Set the standalone backoff.
    #[deprecated(note = "use `with_recovery` instead")]
    pub fn with_backoff_strategy(mut self, backoff: Backoff) -> Self {
        self.backoff_strategy = backoff;
        self
    }

    /// Set the retry count used together with the standalone backoff.
    pub fn with_default_retries(mut self, retries: u32) -> Self {
        self.default_number_of_retries = retries;
        self
    }

    /// Set the HTTP status codes that are retried.
    pub fn with_retry_statuses(mut self, statuses: Vec<u16>) -> Self {
        self.retry_statuses = statuses;
        self
    }

    /// Resolve the recovery strategy the executor runs with.
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        resolve_recovery_strategy(
            self.recovery.as_ref(),
            &self.backoff_strategy,
            self.default_number_of_retries,
        )
    }
}

/// Resolve configured recovery settings into one strategy.
///
/// - `recovery` with a backoff is used as-is.
/// - `recovery` without a backoff keeps its retry count and takes
///   `legacy_backoff`.
/// - No `recovery` pairs `legacy_backoff` with `default_retries`.
pub fn resolve_recovery_strategy(
    recovery: Option<&RecoveryConfig>,
    legacy_backoff: &Backoff,
    default_retries: u32,
) -> RecoveryStrategy {
    match recovery {
        Some(RecoveryConfig {
            backoff: Some(backoff),
            number_of_retries,
        }) => RecoveryStrategy::new(backoff.clone(), *number_of_retries),
        Some(RecoveryConfig {
            backoff: None,
            number_of_retries,
        }) => RecoveryStrategy::new(legacy_backoff.clone(), *number_of_retries),
        None => RecoveryStrategy::new(legacy_backoff.clone(), default_retries),
    }
}

/// Recovery settings as configured, backoff optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecoveryConfig {
    /// Backoff between attempts; `None` defers to the standalone backoff
    pub backoff: Option<Backoff>,
    /// Maximum number of retry attempts
    pub number_of_retries: u32,
}

impl RecoveryConfig {
    /// Create recovery settings with the given retry count and no backoff.
    pub fn new(number_of_retries: u32) -> Self {
        Self {
            backoff: None,
            number_of_retries,
        }
    }

    /// Set the backoff.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = Some(backoff);
        self
    }
}

/// Resolved retry policy consumed by the request executor.
///
/// Immutable once built; one strategy is shared by every request the
/// executor runs.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryStrategy {
    /// Backoff between attempts
    pub backoff: Backoff,
    /// Maximum number of retry attempts
    pub number_of_retries: u32,
}

impl RecoveryStrategy {
    /// Create a strategy.
    pub fn new(backoff: Backoff, number_of_retries: u32) -> Self {
        Self {
            backoff,
            number_of_retries,
        }
    }

    /// A strategy with no retries.
    pub fn no_retry() -> Self {
        Self::new(Backoff::Stop, 0)
    }

    /// Delay before retry number `retry` (0-based), or `None` when no
    /// further retry should happen.
    pub fn delay_before_retry(&self, retry: u32, elapsed: Duration) -> Option<Duration> {
        if retry >= self.number_of_retries {
            return None;
        }
        self.backoff.next_delay(retry, elapsed)
    }
}

impl Default for RecoveryStrategy {
    fn default() -> Self {
        Self::new(Backoff::Zero, 10)
    }
}

/// Wait policy between attempts.
#[derive(Debug, Clone, PartialEq)]
pub enum Backoff {
    /// Retry immediately
    Zero,
    /// Never retry
    Stop,
    /// Same delay before every retry
    Fixed(Duration),
    /// Delay growing by `multiplier` per retry, capped at `max_interval`
    Exponential {
        /// Delay before the first retry
        initial: Duration,
        /// Growth factor per retry
        multiplier: f64,
        /// Largest single delay
        max_interval: Duration,
        /// Stop retrying once this much time has passed since the first attempt
        max_elapsed: Option<Duration>,
    },
}

impl Backoff {
    /// Exponential backoff starting at 500ms, growing 1.5x up to one minute,
    /// giving up after fifteen minutes.
    pub fn exponential() -> Self {
        Backoff::Exponential {
            initial: Duration::from_millis(500),
            multiplier: 1.5,
            max_interval: Duration::from_secs(60),
            max_elapsed: Some(Duration::from_secs(15 * 60)),
        }
    }

    /// Delay before retry number `retry` (0-based), or `None` to stop.
    pub fn next_delay(&self, retry: u32, elapsed: Duration) -> Option<Duration> {
        match self {
            Backoff::Zero => Some(Duration::ZERO),
            Backoff::Stop => None,
            Backoff::Fixed(delay) => Some(*delay),
            Backoff::Exponential {
                initial,
                multiplier,
                max_interval,
                max_elapsed,
            } => {
                let factor = multiplier.powi(retry.min(i32::MAX as u32) as i32);
                let millis = (initial.as_millis() as f64 * factor)
                    .min(max_interval.as_millis() as f64);
                let delay = Duration::from_millis(millis as u64);
                match max_elapsed {
                    Some(limit) if elapsed + delay > *limit => None,
                    _ => Some(delay),
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(
            config.recovery_strategy(),
            RecoveryStrategy::new(Backoff::Zero, 10)
        );
    }

    #[test]
    fn test_recovery_with_backoff_used_as_is() {
        let config = ClientConfig::default()
            .with_backoff_strategy(Backoff::Fixed(Duration::from_secs(9)))
            .with_recovery(RecoveryConfig::new(4).with_backoff(Backoff::exponential()));

        assert_eq!(
            config.recovery_strategy(),
            RecoveryStrategy::new(Backoff::exponential(), 4)
        );
    }

    #[test]
    fn test_recovery_without_backoff_takes_legacy_backoff() {
        let legacy = Backoff::Fixed(Duration::from_millis(250));
        let config = ClientConfig::default()
            .with_backoff_strategy(legacy.clone())
            .with_recovery(RecoveryConfig::new(7));

        assert_eq!(config.recovery_strategy(), RecoveryStrategy::new(legacy, 7));
    }

    #[test]
    fn test_no_recovery_uses_legacy_backoff_and_default_retries() {
        let legacy = Backoff::Fixed(Duration::from_millis(250));
        let config = ClientConfig::default()
            .without_recovery()
            .with_backoff_strategy(legacy.clone())
            .with_default_retries(2);

        assert_eq!(config.recovery_strategy(), RecoveryStrategy::new(legacy, 2));
    }

    #[test]
    fn test_exponential_backoff() {
        let backoff = Backoff::Exponential {
            initial: Duration::from_millis(500),
            multiplier: 2.0,
            max_interval: Duration::from_secs(30),
            max_elapsed: None,
        };
        assert_eq!(backoff.next_delay(0, Duration::ZERO), Some(Duration::from_millis(500)));
        assert_eq!(backoff.next_delay(1, Duration::ZERO), Some(Duration::from_millis(1000)));
        assert_eq!(backoff.next_delay(2, Duration::ZERO), Some(Duration::from_millis(2000)));
        // 500ms * 2^10, capped
        assert_eq!(backoff.next_delay(10, Duration::ZERO), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_exponential_backoff_max_elapsed() {
        let backoff = Backoff::Exponential {
            initial: Duration::from_secs(1),
            multiplier: 1.0,
            max_interval: Duration::from_secs(1),
            max_elapsed: Some(Duration::from_secs(10)),
        };
        assert!(backoff.next_delay(0, Duration::from_secs(8)).is_some());
        assert!(backoff.next_delay(0, Duration::from_secs(10)).is_none());
    }

    #[test]
    fn test_strategy_budget() {
        let strategy = RecoveryStrategy::new(Backoff::Fixed(Duration::from_millis(5)), 2);
        assert_eq!(
            strategy.delay_before_retry(0, Duration::ZERO),
            Some(Duration::from_millis(5))
        );
        assert!(strategy.delay_before_retry(1, Duration::ZERO).is_some());
        assert!(strategy.delay_before_retry(2, Duration::ZERO).is_none());

        assert!(RecoveryStrategy::no_retry()
            .delay_before_retry(0, Duration::ZERO)
            .is_none());
        let stopped = RecoveryStrategy::new(Backoff::Stop, 5);
        assert!(stopped.delay_before_retry(0, Duration::ZERO).is_none());
    }
}
