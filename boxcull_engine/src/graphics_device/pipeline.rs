/// Pipeline traits and descriptors (graphics and compute)

use std::any::Any;

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Pixel,
    Compute,
}

/// Shader input for pipeline creation
///
/// The bytecode is opaque: compiling HLSL is the caller's business.
#[derive(Debug, Clone)]
pub struct ShaderDesc {
    /// Shader stage
    pub stage: ShaderStage,
    /// Entry point name
    pub entry_point: String,
    /// Compiled shader bytecode
    pub code: Vec<u8>,
}

impl ShaderDesc {
    pub fn new(stage: ShaderStage, entry_point: &str, code: Vec<u8>) -> Self {
        Self {
            stage,
            entry_point: entry_point.to_string(),
            code,
        }
    }
}

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
    TriangleStrip,
    LineList,
}

impl PrimitiveTopology {
    /// Number of primitives assembled from `index_count` indices
    pub fn primitive_count(&self, index_count: u32) -> u32 {
        match self {
            PrimitiveTopology::TriangleList => index_count / 3,
            PrimitiveTopology::TriangleStrip => index_count.saturating_sub(2),
            PrimitiveTopology::LineList => index_count / 2,
        }
    }
}

/// Index element type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    U16,
    U32,
}

/// Descriptor for creating a graphics pipeline
#[derive(Debug, Clone)]
pub struct PipelineDesc {
    /// Debug name
    pub label: String,
    /// Vertex shader
    pub vertex_shader: ShaderDesc,
    /// Pixel shader
    pub pixel_shader: ShaderDesc,
    /// Size of one vertex in bytes
    pub vertex_stride: u32,
    /// Primitive topology
    pub topology: PrimitiveTopology,
}

/// Graphics pipeline resource trait
pub trait Pipeline: Send + Sync {
    /// Descriptor the pipeline was created with
    fn desc(&self) -> &PipelineDesc;

    /// Downcast hook for backends
    fn as_any(&self) -> &dyn Any;
}

/// Built-in compute kernels the engine dispatches.
///
/// Backends map each kernel to their compiled shader; the mock device
/// runs the Rust reference implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeKernel {
    /// Per-instance frustum test with atomic append of visible indices
    FrustumCull,
}

/// Descriptor for creating a compute pipeline
#[derive(Debug, Clone)]
pub struct ComputePipelineDesc {
    /// Debug name
    pub label: String,
    /// Compute shader
    pub shader: ShaderDesc,
    /// Which kernel the shader implements
    pub kernel: ComputeKernel,
    /// Threads per group (numthreads.x)
    pub threads_per_group: u32,
}

/// Compute pipeline resource trait
pub trait ComputePipeline: Send + Sync {
    /// Descriptor the pipeline was created with
    fn desc(&self) -> &ComputePipelineDesc;

    /// Downcast hook for backends
    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
