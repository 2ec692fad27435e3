/// CommandList trait - immediate-context command recording
///
/// Commands execute on the GPU in submission order. Nothing here blocks on
/// GPU completion; `query_data` returns `QueryData::NotReady` instead.

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    Buffer, Pipeline, ComputePipeline, BindingGroup, Query, QueryData, IndexType,
};

/// Command list for recording rendering and compute commands
pub trait CommandList {
    /// Overwrite part of a buffer from CPU memory
    ///
    /// `DYNAMIC` buffers are mapped with discard, and a failed map returns
    /// `MapFailed`. Other buffers are updated in the command stream.
    ///
    /// # Arguments
    ///
    /// * `buffer` - Destination buffer
    /// * `offset` - Offset into the buffer in bytes
    /// * `data` - Bytes to write
    fn update_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64, data: &[u8]) -> Result<()>;

    /// Device-side copy of a whole buffer (sizes must match)
    fn copy_buffer(&mut self, src: &Arc<dyn Buffer>, dst: &Arc<dyn Buffer>) -> Result<()>;

    /// Bind a graphics pipeline
    fn bind_pipeline(&mut self, pipeline: &Arc<dyn Pipeline>) -> Result<()>;

    /// Bind a compute pipeline
    fn bind_compute_pipeline(&mut self, pipeline: &Arc<dyn ComputePipeline>) -> Result<()>;

    /// Bind a binding group to the vertex/pixel stages
    ///
    /// # Arguments
    ///
    /// * `set_index` - Set index (0 = per-frame, 1 = per-material, etc.)
    /// * `binding_group` - The binding group to bind
    fn bind_binding_group(&mut self, set_index: u32, binding_group: &Arc<dyn BindingGroup>) -> Result<()>;

    /// Bind a binding group to the compute stage
    fn bind_compute_binding_group(&mut self, set_index: u32, binding_group: &Arc<dyn BindingGroup>) -> Result<()>;

    /// Bind a vertex buffer
    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64) -> Result<()>;

    /// Bind an index buffer
    fn bind_index_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64, index_type: IndexType) -> Result<()>;

    /// Dispatch compute work groups
    fn dispatch(&mut self, groups_x: u32, groups_y: u32, groups_z: u32) -> Result<()>;

    /// Draw indexed, instanced geometry with CPU-supplied arguments
    fn draw_indexed_instanced(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) -> Result<()>;

    /// Draw indexed, instanced geometry with arguments read from a GPU buffer
    ///
    /// # Arguments
    ///
    /// * `args` - Buffer created with `BufferUsage::INDIRECT_ARGS`
    /// * `offset` - Byte offset of the argument record
    fn draw_indexed_instanced_indirect(&mut self, args: &Arc<dyn Buffer>, offset: u64) -> Result<()>;

    /// Start recording a query
    fn begin_query(&mut self, query: &Arc<dyn Query>) -> Result<()>;

    /// Stop recording a query
    fn end_query(&mut self, query: &Arc<dyn Query>) -> Result<()>;

    /// Non-blocking read of a finished query
    fn query_data(&mut self, query: &Arc<dyn Query>) -> Result<QueryData>;
}
