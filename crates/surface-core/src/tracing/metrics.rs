//! Structured span field names shared by the loaders and the metrics engine.

/// Loaders: number of input lines read.
pub const LINES_READ: &str = "lines_read";

/// Loaders: number of lines rejected by a parser.
pub const PARSE_ERRORS: &str = "parse_errors";

/// Loaders: number of profile files handed to the workers.
pub const PROFILE_COUNT: &str = "profile_count";

/// Call graph: construction time in milliseconds.
pub const CALL_GRAPH_BUILD_TIME: &str = "call_graph_build_time";

/// Call graph: node count after construction.
pub const NODE_COUNT: &str = "node_count";

/// Call graph: edge count after construction.
pub const EDGE_COUNT: &str = "edge_count";

/// Metrics: page rank iterations until convergence.
pub const PAGE_RANK_ITERATIONS: &str = "page_rank_iterations";
