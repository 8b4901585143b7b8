//! Benchmark regression profile parsing for CI and local overrides.
//!
//! This module centralizes event and policy parsing for benchmark regression
//! checks so workflows can share one deterministic decision surface.

use std::env;

/// Environment variable controlling benchmark CI policy.
pub const CLUSTER_HIERARCHY_BENCH_CI_POLICY_ENV_KEY: &str = "CLUSTER_HIERARCHY_BENCH_CI_POLICY";

/// Environment variable exposing the GitHub Actions event name.
pub const GITHUB_EVENT_NAME_ENV_KEY: &str = "GITHUB_EVENT_NAME";

/// Policy controlling when benchmark baseline comparison should run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BenchmarkCiPolicy {
    /// Never run benchmark CI checks.
    Disabled,
    /// Run lightweight benchmark discovery in PRs and baseline comparison on
    /// scheduled or manual workflows.
    ScheduledBaseline,
    /// Run baseline comparison for all events.
    AlwaysBaseline,
}

impl BenchmarkCiPolicy {
    /// Returns a stable lowercase identifier for logs and workflow outputs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::ScheduledBaseline => "scheduled-baseline",
            Self::AlwaysBaseline => "always-baseline",
        }
    }
}

/// Event category used by benchmark CI policy resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BenchmarkCiEvent {
    /// Pull request events.
    PullRequest,
    /// Scheduled workflow events.
    Schedule,
    /// Manual workflow dispatch events.
    WorkflowDispatch,
    /// Any event not handled explicitly.
    Other,
}

impl BenchmarkCiEvent {
    /// Returns a stable lowercase identifier for logs and workflow outputs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PullRequest => "pull_request",
            Self::Schedule => "schedule",
            Self::WorkflowDispatch => "workflow_dispatch",
            Self::Other => "other",
        }
    }
}

/// Benchmark regression execution mode resolved from event and policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BenchmarkRegressionMode {
    /// Disable benchmark checks.
    Disabled,
    /// Run benchmark discovery only (`--list`) without baseline comparison.
    DiscoveryOnly,
    /// Run full Criterion baseline comparison.
    BaselineCompare,
}

impl BenchmarkRegressionMode {
    /// Returns a stable lowercase identifier for logs and workflow outputs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::DiscoveryOnly => "discovery_only",
            Self::BaselineCompare => "baseline_compare",
        }
    }

    /// Returns `true` when baseline comparison should run.
    #[must_use]
    pub const fn should_compare(self) -> bool {
        matches!(self, Self::BaselineCompare)
    }
}

/// Fully resolved benchmark CI profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BenchmarkRegressionProfile {
    policy: BenchmarkCiPolicy,
    event: BenchmarkCiEvent,
    mode: BenchmarkRegressionMode,
}

impl BenchmarkRegressionProfile {
    /// Loads benchmark regression profile from environment variables.
    ///
    /// Invalid policy values produce a warning and fall back to
    /// `default_policy`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cluster_hierarchy_test_support::ci::benchmark_regression_profile::{
    ///     BenchmarkCiPolicy, BenchmarkRegressionProfile,
    /// };
    ///
    /// let profile = BenchmarkRegressionProfile::load(
    ///     BenchmarkCiPolicy::ScheduledBaseline,
    /// );
    /// assert!(!profile.mode().as_str().is_empty());
    /// ```
    #[must_use]
    pub fn load(default_policy: BenchmarkCiPolicy) -> Self {
        Self::load_with_lookup(default_policy, |key| env::var(key).ok())
    }

    fn load_with_lookup<F>(default_policy: BenchmarkCiPolicy, lookup: F) -> Self
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let policy = match lookup(CLUSTER_HIERARCHY_BENCH_CI_POLICY_ENV_KEY) {
            Some(raw) => match parse_policy(&raw) {
                Ok(policy) => policy,
                Err(reason) => {
                    tracing::warn!(
                        env = CLUSTER_HIERARCHY_BENCH_CI_POLICY_ENV_KEY,
                        raw = %raw,
                        reason = %reason,
                        fallback_policy = default_policy.as_str(),
                        "invalid benchmark CI policy override; using default",
                    );
                    default_policy
                }
            },
            None => default_policy,
        };

        let event = lookup(GITHUB_EVENT_NAME_ENV_KEY)
            .as_deref()
            .map_or(BenchmarkCiEvent::Other, parse_event_name);
        let mode = resolve_regression_mode(event, policy);

        Self {
            policy,
            event,
            mode,
        }
    }

    /// Returns the parsed benchmark CI policy.
    #[must_use]
    pub const fn policy(self) -> BenchmarkCiPolicy {
        self.policy
    }

    /// Returns the parsed CI event category.
    #[must_use]
    pub const fn event(self) -> BenchmarkCiEvent {
        self.event
    }

    /// Returns the resolved benchmark regression mode.
    #[must_use]
    pub const fn mode(self) -> BenchmarkRegressionMode {
        self.mode
    }
}

/// Resolves benchmark regression mode for a CI event and policy.
#[must_use]
pub const fn resolve_regression_mode(
    event: BenchmarkCiEvent,
    policy: BenchmarkCiPolicy,
) -> BenchmarkRegressionMode {
    match policy {
        BenchmarkCiPolicy::Disabled => BenchmarkRegressionMode::Disabled,
        BenchmarkCiPolicy::AlwaysBaseline => BenchmarkRegressionMode::BaselineCompare,
        BenchmarkCiPolicy::ScheduledBaseline => {
            if matches!(
                event,
                BenchmarkCiEvent::Schedule | BenchmarkCiEvent::WorkflowDispatch
            ) {
                BenchmarkRegressionMode::BaselineCompare
            } else {
                BenchmarkRegressionMode::DiscoveryOnly
            }
        }
    }
}

/// Parses a benchmark CI policy string.
///
/// Accepted values are case-insensitive and tolerate either hyphen or
/// underscore separators.
pub fn parse_policy(raw: &str) -> Result<BenchmarkCiPolicy, String> {
    let normalized = raw.trim().to_ascii_lowercase();

    match normalized.as_str() {
        "disabled" | "off" | "none" | "0" => Ok(BenchmarkCiPolicy::Disabled),
        "scheduled-baseline" | "scheduled_baseline" | "scheduled" | "weekly" | "nightly" => {
            Ok(BenchmarkCiPolicy::ScheduledBaseline)
        }
        "always-baseline" | "always_baseline" | "always" | "all" | "1" => {
            Ok(BenchmarkCiPolicy::AlwaysBaseline)
        }
        _ => Err("expected one of: disabled, scheduled-baseline, always-baseline".to_string()),
    }
}

/// Parses a GitHub event name into a benchmark CI event category.
#[must_use]
pub fn parse_event_name(raw: &str) -> BenchmarkCiEvent {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pull_request" | "pull_request_target" => BenchmarkCiEvent::PullRequest,
        "schedule" => BenchmarkCiEvent::Schedule,
        "workflow_dispatch" => BenchmarkCiEvent::WorkflowDispatch,
        _ => BenchmarkCiEvent::Other,
    }
}
