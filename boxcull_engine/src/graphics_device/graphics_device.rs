/// GraphicsDevice trait - resource factory interface

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    Buffer, BufferDesc, Pipeline, PipelineDesc, ComputePipeline, ComputePipelineDesc,
    BindingGroup, BindingGroupDesc, Query, QueryDesc,
};

/// Main device trait
///
/// This is the factory interface for creating GPU resources. Implemented
/// by backend-specific devices (e.g., MockGraphicsDevice). The device is
/// owned by the caller and passed by reference to every component that
/// creates resources; there is no global device.
pub trait GraphicsDevice: Send + Sync {
    /// Create a buffer
    ///
    /// # Arguments
    ///
    /// * `desc` - Buffer descriptor
    /// * `initial_data` - Optional initial contents (must be exactly `desc.size` bytes)
    fn create_buffer(&mut self, desc: BufferDesc, initial_data: Option<&[u8]>) -> Result<Arc<dyn Buffer>>;

    /// Create a graphics pipeline
    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Arc<dyn Pipeline>>;

    /// Create a compute pipeline
    fn create_compute_pipeline(&mut self, desc: ComputePipelineDesc) -> Result<Arc<dyn ComputePipeline>>;

    /// Create a binding group
    fn create_binding_group(&mut self, desc: BindingGroupDesc) -> Result<Arc<dyn BindingGroup>>;

    /// Create a query
    fn create_query(&mut self, desc: QueryDesc) -> Result<Arc<dyn Query>>;
}
