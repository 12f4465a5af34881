//! Deterministic commit generation.
//!
//! Names come from a cyclic prefix list crossed with a strided subject
//! list; the stride keeps prefix and subject cycles from aligning, so
//! runs of commits read like a plausible changelog rather than a
//! repeating pattern. Generation is fully deterministic given the count:
//! CI behavior is decided later by the engine, never here.

use crate::{Commit, CommitId};

/// Synthetic spacing between consecutive commit timestamps, ms.
pub const COMMIT_SPACING_MS: u64 = 12_000;

const PREFIXES: &[&str] = &[
    "Fix", "Feat", "Refactor", "Chore", "Perf", "Test", "Docs", "Style", "CI", "Build",
];

const SUBJECTS: &[&str] = &[
    "auth flow",
    "user dashboard",
    "rate limiting",
    "DB migrations",
    "search indexing",
    "file uploads",
    "notifications",
    "cache layer",
    "session mgmt",
    "error handling",
    "input validation",
    "logging",
    "webhook delivery",
    "payment flow",
    "email templates",
    "dark mode",
    "accessibility",
    "mobile layout",
    "type safety",
    "test coverage",
    "CI pipeline",
    "Docker config",
    "env variables",
    "SSL renewal",
    "rate limiter",
    "retry logic",
    "queue jobs",
    "data export",
    "user roles",
    "audit log",
    "health checks",
    "metrics endpoint",
    "GraphQL schema",
    "REST API",
    "WebSocket handler",
    "queue worker",
    "image optimize",
    "lazy loading",
    "code splitting",
    "tree shaking",
    "memory leak",
    "race condition",
    "deadlock fix",
    "conn pooling",
    "password hash",
    "token refresh",
    "CORS policy",
    "CSP headers",
    "i18n support",
    "timezone fix",
    "date formatting",
    "currency fmt",
    "pagination",
    "sorting logic",
    "filter engine",
    "search parser",
    "OAuth2 flow",
    "SSO integration",
    "2FA setup",
    "key rotation",
    "S3 uploads",
    "CDN config",
    "DNS records",
    "load balancer",
    "cron jobs",
    "event bus",
    "pub/sub layer",
    "state machine",
];

/// Display name for the commit at generation index `i`.
///
/// The subject index is strided (`i*7 + 3`) so the subject cycle does not
/// align with the prefix cycle.
pub fn commit_name(i: usize) -> String {
    let prefix = PREFIXES[i % PREFIXES.len()];
    let subject = SUBJECTS[(i * 7 + 3) % SUBJECTS.len()];
    format!("{prefix}: {subject}")
}

/// Generate `count` idle commits in queue order.
///
/// Timestamps are synthetic and strictly increasing, spaced by
/// [`COMMIT_SPACING_MS`].
pub fn generate_commits(count: usize) -> Vec<Commit> {
    (0..count)
        .map(|i| {
            Commit::new(
                CommitId(i as u32),
                commit_name(i),
                i as u64 * COMMIT_SPACING_MS,
            )
        })
        .collect()
}
