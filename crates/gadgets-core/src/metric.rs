//! Metric-threshold inspections.

use crate::config::RuleConfig;
use crate::rule::Inspection;

/// An inspection that reports when a computed metric exceeds a limit.
pub trait MetricInspection: Inspection {
    /// Current threshold.
    fn threshold(&self) -> &Threshold;

    /// Label shown next to the limit in configuration UIs.
    fn configuration_label(&self) -> &'static str;

    /// Limit used when none is configured.
    fn default_limit(&self) -> usize {
        self.threshold().default_limit()
    }

    /// Configured limit.
    fn limit(&self) -> usize {
        self.threshold().limit()
    }

    /// Returns true if `metric` is over the configured limit.
    fn exceeds_limit(&self, metric: usize) -> bool {
        exceeds(metric, self.limit())
    }
}

/// Strict comparison: a metric equal to the limit is fine.
#[must_use]
pub fn exceeds(metric: usize, limit: usize) -> bool {
    metric > limit
}

/// Configurable limit with its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    limit: usize,
    default: usize,
}

impl Threshold {
    /// Threshold starting at its default.
    #[must_use]
    pub fn new(default: usize) -> Self {
        Self {
            limit: default,
            default,
        }
    }

    /// Configured limit.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Default limit.
    #[must_use]
    pub fn default_limit(&self) -> usize {
        self.default
    }

    /// Sets the limit.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    /// Restores the default.
    pub fn reset(&mut self) {
        self.limit = self.default;
    }

    /// Reads the `limit` option. Missing means default; malformed values are
    /// logged and replaced by the default.
    pub fn configure(&mut self, rule: &str, config: &RuleConfig) {
        let Some(value) = config.get("limit") else {
            self.reset();
            return;
        };
        match value.as_integer().map(usize::try_from) {
            Some(Ok(limit)) => self.limit = limit,
            _ => {
                tracing::warn!(
                    "{}: invalid limit `{}`, using default {}",
                    rule,
                    value,
                    self.default
                );
                self.reset();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_is_not_exceeding() {
        assert!(!exceeds(3, 3));
        assert!(exceeds(4, 3));
        assert!(!exceeds(0, 0));
    }

    #[test]
    fn configure_reads_limit() {
        let mut threshold = Threshold::new(1);
        threshold.configure("Test", &RuleConfig::default().with_option("limit", 5_i64));
        assert_eq!(threshold.limit(), 5);
        threshold.configure("Test", &RuleConfig::default());
        assert_eq!(threshold.limit(), 1);
    }

    #[test]
    fn malformed_limit_falls_back_to_default() {
        let mut threshold = Threshold::new(1);
        threshold.set_limit(7);
        threshold.configure("Test", &RuleConfig::default().with_option("limit", -2_i64));
        assert_eq!(threshold.limit(), 1);

        threshold.configure("Test", &RuleConfig::default().with_option("limit", "many"));
        assert_eq!(threshold.limit(), 1);
        assert_eq!(threshold.default_limit(), 1);
    }
}
