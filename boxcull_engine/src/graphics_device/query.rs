/// GPU queries - asynchronous counters read back without stalling

use std::any::Any;

/// Kind of query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Pipeline statistics over a Begin/End bracket
    PipelineStatistics,
}

/// Descriptor for creating a query
#[derive(Debug, Clone)]
pub struct QueryDesc {
    /// Debug name
    pub label: String,
    /// Query kind
    pub kind: QueryKind,
}

/// Counters recorded between `begin_query` and `end_query`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStatistics {
    /// Vertices read by the input assembler
    pub ia_vertices: u64,
    /// Primitives assembled by the input assembler
    pub ia_primitives: u64,
    /// Vertex shader invocations
    pub vs_invocations: u64,
    /// Compute shader invocations
    pub cs_invocations: u64,
}

/// Result of a non-blocking query read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryData {
    /// The GPU has not finished the bracketed work yet; ask again later
    NotReady,
    /// Final counters
    PipelineStatistics(PipelineStatistics),
}

/// Query resource trait
pub trait Query: Send + Sync {
    /// Descriptor the query was created with
    fn desc(&self) -> &QueryDesc;

    /// Downcast hook for backends
    fn as_any(&self) -> &dyn Any;
}
