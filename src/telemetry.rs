//! Telemetry metric name constants.
//!
//! Centralised metric names for mimir runs. Consumers install their own
//! `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `mimir_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `service`: training service name (e.g. "visual-recognition")
//! - `operation`: service call (e.g. "create_classifier", "get_classifier")
//! - `outcome`: terminal job state: "ready" or "failed"
//! - `category`: sample category of the combination

/// Total classifiers submitted for training.
///
/// Labels: `category`.
pub const JOBS_SUBMITTED_TOTAL: &str = "mimir_jobs_submitted_total";

/// Total jobs that reached a terminal state.
///
/// Labels: `outcome` ("ready" | "failed").
pub const JOBS_COMPLETED_TOTAL: &str = "mimir_jobs_completed_total";

/// Wall-clock time from submission to terminal state, in seconds.
///
/// Labels: `outcome`.
pub const JOB_DURATION_SECONDS: &str = "mimir_job_duration_seconds";

/// Total status queries issued by the poller (including failed ones).
pub const STATUS_POLLS_TOTAL: &str = "mimir_status_polls_total";

/// Total status queries that hit the post-creation not-found race.
pub const VISIBILITY_RACES_TOTAL: &str = "mimir_visibility_races_total";

/// Total transport-level retry attempts (not counting the initial request).
///
/// Labels: `service`, `operation`.
pub const RETRIES_TOTAL: &str = "mimir_retries_total";

/// Total cache file hits.
pub const CACHE_HITS_TOTAL: &str = "mimir_cache_hits_total";

/// Total cache file misses.
pub const CACHE_MISSES_TOTAL: &str = "mimir_cache_misses_total";
