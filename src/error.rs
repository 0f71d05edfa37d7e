use thiserror::Error;

// ─── Boundary errors ─────────────────────────────────────────────────────────
//
// The modulation stages themselves never fail: degenerate input is
// normalized into conservative output. Errors only exist at the boundary
// (validating config, decoding snapshots). Binary code wraps both in
// `anyhow::Result` context chains.

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── Snapshot errors ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot json: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("snapshot field {field} rejected: {reason}")]
    Field { field: String, reason: String },
}
