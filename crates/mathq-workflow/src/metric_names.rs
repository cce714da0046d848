//! Metric name constants to avoid typos across call sites.

/// Workflow operations total (counter, labels: op).
pub const WORKFLOW_OPS_TOTAL: &str = "workflow_ops_total";
/// Workflow operation errors total (counter, labels: op).
pub const WORKFLOW_ERRORS_TOTAL: &str = "workflow_errors_total";
/// Similarity queries total (counter).
pub const SIMILARITY_QUERIES_TOTAL: &str = "similarity_queries_total";
/// Near-duplicate matches returned per query (histogram).
pub const SIMILARITY_MATCHES: &str = "similarity_matches";
/// Live sessions (gauge).
pub const SESSIONS_ACTIVE: &str = "sessions_active";
/// Sessions evicted at capacity (counter).
pub const SESSIONS_EVICTED_TOTAL: &str = "sessions_evicted_total";
