/// Mock graphics device (no GPU required)
///
/// Executes the command stream in software so the culling pipeline can be
/// driven end to end by tests and the headless demo: buffers own real
/// storage, copies move bytes, `dispatch` runs the Rust culling kernel,
/// indirect draws read their arguments back from buffer storage and feed
/// pipeline-statistics queries.
///
/// Queries finish after a configurable number of polls, and can be stalled
/// entirely. Maps of a named dynamic buffer can be made to fail.

use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard};
use bytemuck::{Pod, bytes_of, pod_read_unaligned};
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{SlotMap, new_key_type};
use crate::culling::cull_kernel;
use crate::culling::gpu_types::{
    IndirectArgs, InstanceGpuData, SceneConstants,
    CULL_SLOT_ARGS, CULL_SLOT_INSTANCES, CULL_SLOT_SCENE, CULL_SLOT_VISIBLE,
};
use crate::error::{Error, Result};
use crate::engine_bail;
use crate::engine_err;
use crate::graphics_device::{
    GraphicsDevice, CommandList, Buffer, BufferDesc, BufferUsage,
    Pipeline, PipelineDesc, ComputePipeline, ComputePipelineDesc, ComputeKernel,
    BindingGroup, BindingGroupDesc, BindingEntry, BindingResource,
    Query, QueryDesc, QueryData, PipelineStatistics, IndexType, ShaderStage,
};

// ============================================================================
// Shared device state
// ============================================================================

new_key_type! {
    /// Storage key of a live mock buffer
    pub struct MockBufferKey;

    /// Storage key of a live mock query
    pub struct MockQueryKey;
}

/// Where a query is in its Begin/End/GetData cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryPhase {
    /// Never begun
    Idle,
    /// Between begin and end, accumulating counters
    Active,
    /// Ended; becomes readable after `polls_left` more reads
    Pending { polls_left: u32 },
    /// Counters available
    Ready,
}

#[derive(Debug, Clone, Copy)]
struct MockQueryState {
    phase: QueryPhase,
    statistics: PipelineStatistics,
}

#[derive(Default)]
struct MockDeviceState {
    buffers: SlotMap<MockBufferKey, Vec<u8>>,
    queries: SlotMap<MockQueryKey, MockQueryState>,
    buffer_budget: Option<u64>,
    failing_uploads: FxHashSet<String>,
    query_latency: u32,
    queries_stalled: bool,
    failing_query_ends: bool,
}

impl MockDeviceState {
    fn storage(&self, key: MockBufferKey) -> Result<&Vec<u8>> {
        match self.buffers.get(key) {
            Some(bytes) => Ok(bytes),
            None => Err(engine_err!("boxcull::MockDevice", InvalidResource, "buffer storage released")),
        }
    }

    fn storage_mut(&mut self, key: MockBufferKey) -> Result<&mut Vec<u8>> {
        match self.buffers.get_mut(key) {
            Some(bytes) => Ok(bytes),
            None => Err(engine_err!("boxcull::MockDevice", InvalidResource, "buffer storage released")),
        }
    }

    fn query_mut(&mut self, key: MockQueryKey) -> Result<&mut MockQueryState> {
        match self.queries.get_mut(key) {
            Some(query) => Ok(query),
            None => Err(engine_err!("boxcull::MockDevice", InvalidResource, "query released")),
        }
    }

    fn live_bytes(&self) -> u64 {
        self.buffers.values().map(|bytes| bytes.len() as u64).sum()
    }

    /// Add counters to every query currently between begin and end
    fn accumulate(&mut self, delta: PipelineStatistics) {
        for query in self.queries.values_mut() {
            if query.phase == QueryPhase::Active {
                query.statistics.ia_vertices += delta.ia_vertices;
                query.statistics.ia_primitives += delta.ia_primitives;
                query.statistics.vs_invocations += delta.vs_invocations;
                query.statistics.cs_invocations += delta.cs_invocations;
            }
        }
    }
}

type SharedState = Arc<Mutex<MockDeviceState>>;

fn lock(state: &SharedState) -> Result<MutexGuard<'_, MockDeviceState>> {
    state
        .lock()
        .map_err(|_| Error::BackendError("mock device state poisoned".to_string()))
}

fn read_pod_at<T: Pod>(bytes: &[u8], offset: usize) -> Result<T> {
    let end = offset + std::mem::size_of::<T>();
    if end > bytes.len() {
        engine_bail!(
            "boxcull::MockDevice",
            InvalidResource,
            "read of {} bytes at offset {} overruns a {}-byte buffer",
            std::mem::size_of::<T>(),
            offset,
            bytes.len()
        );
    }
    Ok(pod_read_unaligned(&bytes[offset..end]))
}

// ============================================================================
// Mock Buffer
// ============================================================================

pub struct MockBuffer {
    desc: BufferDesc,
    key: MockBufferKey,
    state: SharedState,
}

impl MockBuffer {
    pub fn key(&self) -> MockBufferKey {
        self.key
    }
}

impl Buffer for MockBuffer {
    fn desc(&self) -> &BufferDesc {
        &self.desc
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockBuffer {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.buffers.remove(self.key);
        }
    }
}

fn buffer_key(buffer: &Arc<dyn Buffer>) -> Result<MockBufferKey> {
    match buffer.as_any().downcast_ref::<MockBuffer>() {
        Some(mock) => Ok(mock.key),
        None => Err(engine_err!(
            "boxcull::MockDevice",
            InvalidResource,
            "buffer '{}' was not created by a mock device",
            buffer.desc().label
        )),
    }
}

// ============================================================================
// Mock Pipelines
// ============================================================================

pub struct MockPipeline {
    desc: PipelineDesc,
}

impl Pipeline for MockPipeline {
    fn desc(&self) -> &PipelineDesc {
        &self.desc
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MockComputePipeline {
    desc: ComputePipelineDesc,
}

impl ComputePipeline for MockComputePipeline {
    fn desc(&self) -> &ComputePipelineDesc {
        &self.desc
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock BindingGroup
// ============================================================================

pub struct MockBindingGroup {
    pub label: String,
    entries: Vec<BindingEntry>,
}

impl BindingGroup for MockBindingGroup {
    fn entries(&self) -> &[BindingEntry] {
        &self.entries
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock Query
// ============================================================================

pub struct MockQuery {
    desc: QueryDesc,
    key: MockQueryKey,
    state: SharedState,
}

impl Query for MockQuery {
    fn desc(&self) -> &QueryDesc {
        &self.desc
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockQuery {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.queries.remove(self.key);
        }
    }
}

fn query_key(query: &Arc<dyn Query>) -> Result<MockQueryKey> {
    match query.as_any().downcast_ref::<MockQuery>() {
        Some(mock) => Ok(mock.key),
        None => Err(engine_err!(
            "boxcull::MockDevice",
            InvalidResource,
            "query '{}' was not created by a mock device",
            query.desc().label
        )),
    }
}

// ============================================================================
// Mock CommandList
// ============================================================================

/// Immediate-context command list executing against the device storage.
pub struct MockCommandList {
    state: SharedState,
    /// Names of recorded commands, in order
    pub commands: Vec<String>,
    /// Instance count of every draw, in order
    pub drawn_instances: Vec<u32>,
    pipeline: Option<Arc<dyn Pipeline>>,
    compute_pipeline: Option<Arc<dyn ComputePipeline>>,
    binding_groups: FxHashMap<u32, Arc<dyn BindingGroup>>,
    compute_binding_groups: FxHashMap<u32, Arc<dyn BindingGroup>>,
    vertex_buffer: Option<Arc<dyn Buffer>>,
    index_buffer: Option<(Arc<dyn Buffer>, IndexType)>,
}

impl MockCommandList {
    fn new(state: SharedState) -> Self {
        Self {
            state,
            commands: Vec::new(),
            drawn_instances: Vec::new(),
            pipeline: None,
            compute_pipeline: None,
            binding_groups: FxHashMap::default(),
            compute_binding_groups: FxHashMap::default(),
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    fn record_draw(&mut self, index_count: u32, instance_count: u32) -> Result<()> {
        let topology = match &self.pipeline {
            Some(pipeline) => pipeline.desc().topology,
            None => engine_bail!("boxcull::MockDevice", InvalidResource, "draw without a bound pipeline"),
        };

        let vertices = index_count as u64 * instance_count as u64;
        let delta = PipelineStatistics {
            ia_vertices: vertices,
            ia_primitives: topology.primitive_count(index_count) as u64 * instance_count as u64,
            vs_invocations: vertices,
            cs_invocations: 0,
        };
        lock(&self.state)?.accumulate(delta);

        self.drawn_instances.push(instance_count);
        Ok(())
    }

    /// Buffer bound to the compute stage at `slot` of set 0, checked
    /// against the binding kind the kernel expects.
    fn compute_slot(&self, slot: u32, usage: BufferUsage) -> Result<MockBufferKey> {
        let Some(group) = self.compute_binding_groups.get(&0) else {
            engine_bail!("boxcull::MockDevice", InvalidResource, "dispatch without a compute binding group");
        };
        match group.resource(slot) {
            Some(resource) if resource.required_usage() == usage => buffer_key(resource.buffer()),
            Some(_) => Err(engine_err!(
                "boxcull::MockDevice",
                InvalidResource,
                "compute slot {} bound with the wrong view type",
                slot
            )),
            None => Err(engine_err!("boxcull::MockDevice", InvalidResource, "compute slot {} is empty", slot)),
        }
    }

    fn run_frustum_cull(&mut self, threads: u32) -> Result<()> {
        let scene_key = self.compute_slot(CULL_SLOT_SCENE, BufferUsage::CONSTANT)?;
        let instances_key = self.compute_slot(CULL_SLOT_INSTANCES, BufferUsage::SHADER_RESOURCE)?;
        let args_key = self.compute_slot(CULL_SLOT_ARGS, BufferUsage::UNORDERED_ACCESS)?;
        let visible_key = self.compute_slot(CULL_SLOT_VISIBLE, BufferUsage::UNORDERED_ACCESS)?;

        let mut state = lock(&self.state)?;

        let scene: SceneConstants = read_pod_at(state.storage(scene_key)?, 0)?;
        let instances: Vec<InstanceGpuData> = state
            .storage(instances_key)?
            .chunks_exact(std::mem::size_of::<InstanceGpuData>())
            .map(pod_read_unaligned)
            .collect();
        let mut args: IndirectArgs = read_pod_at(state.storage(args_key)?, 0)?;
        let mut visible: Vec<u32> = state
            .storage(visible_key)?
            .chunks_exact(4)
            .map(pod_read_unaligned)
            .collect();

        for thread_id in 0..threads {
            cull_kernel(thread_id, &scene, &instances, &mut args, &mut visible);
        }

        let args_bytes = bytes_of(&args);
        state.storage_mut(args_key)?[..args_bytes.len()].copy_from_slice(args_bytes);
        let visible_bytes: &[u8] = bytemuck::cast_slice(&visible);
        state.storage_mut(visible_key)?[..visible_bytes.len()].copy_from_slice(visible_bytes);

        state.accumulate(PipelineStatistics {
            cs_invocations: threads as u64,
            ..Default::default()
        });
        Ok(())
    }
}

impl CommandList for MockCommandList {
    fn update_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64, data: &[u8]) -> Result<()> {
        let key = buffer_key(buffer)?;
        let label = &buffer.desc().label;
        let mut state = lock(&self.state)?;

        // Only DYNAMIC buffers are mapped; other updates are queued in the stream
        let mapped = buffer.desc().usage.contains(BufferUsage::DYNAMIC);
        if mapped && state.failing_uploads.contains(label) {
            engine_bail!("boxcull::MockDevice", MapFailed, "map of buffer '{}' failed", label);
        }

        let storage = state.storage_mut(key)?;
        let start = offset as usize;
        let end = start + data.len();
        if end > storage.len() {
            engine_bail!(
                "boxcull::MockDevice",
                InvalidResource,
                "update of '{}' ({}..{}) overruns {} bytes",
                label,
                start,
                end,
                storage.len()
            );
        }
        storage[start..end].copy_from_slice(data);

        self.commands.push("update_buffer".to_string());
        Ok(())
    }

    fn copy_buffer(&mut self, src: &Arc<dyn Buffer>, dst: &Arc<dyn Buffer>) -> Result<()> {
        let src_key = buffer_key(src)?;
        let dst_key = buffer_key(dst)?;
        if src.desc().size != dst.desc().size {
            engine_bail!(
                "boxcull::MockDevice",
                InvalidResource,
                "copy from '{}' ({} bytes) to '{}' ({} bytes): sizes differ",
                src.desc().label,
                src.desc().size,
                dst.desc().label,
                dst.desc().size
            );
        }
        if src_key == dst_key {
            engine_bail!("boxcull::MockDevice", InvalidResource, "copy of '{}' onto itself", src.desc().label);
        }

        let mut state = lock(&self.state)?;
        let data = state.storage(src_key)?.clone();
        state.storage_mut(dst_key)?.copy_from_slice(&data);

        self.commands.push("copy_buffer".to_string());
        Ok(())
    }

    fn bind_pipeline(&mut self, pipeline: &Arc<dyn Pipeline>) -> Result<()> {
        self.pipeline = Some(Arc::clone(pipeline));
        self.commands.push("bind_pipeline".to_string());
        Ok(())
    }

    fn bind_compute_pipeline(&mut self, pipeline: &Arc<dyn ComputePipeline>) -> Result<()> {
        self.compute_pipeline = Some(Arc::clone(pipeline));
        self.commands.push("bind_compute_pipeline".to_string());
        Ok(())
    }

    fn bind_binding_group(&mut self, set_index: u32, binding_group: &Arc<dyn BindingGroup>) -> Result<()> {
        self.binding_groups.insert(set_index, Arc::clone(binding_group));
        self.commands.push("bind_binding_group".to_string());
        Ok(())
    }

    fn bind_compute_binding_group(&mut self, set_index: u32, binding_group: &Arc<dyn BindingGroup>) -> Result<()> {
        self.compute_binding_groups.insert(set_index, Arc::clone(binding_group));
        self.commands.push("bind_compute_binding_group".to_string());
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>, _offset: u64) -> Result<()> {
        if !buffer.desc().usage.contains(BufferUsage::VERTEX) {
            engine_bail!("boxcull::MockDevice", InvalidResource, "'{}' is not a vertex buffer", buffer.desc().label);
        }
        self.vertex_buffer = Some(Arc::clone(buffer));
        self.commands.push("bind_vertex_buffer".to_string());
        Ok(())
    }

    fn bind_index_buffer(&mut self, buffer: &Arc<dyn Buffer>, _offset: u64, index_type: IndexType) -> Result<()> {
        if !buffer.desc().usage.contains(BufferUsage::INDEX) {
            engine_bail!("boxcull::MockDevice", InvalidResource, "'{}' is not an index buffer", buffer.desc().label);
        }
        self.index_buffer = Some((Arc::clone(buffer), index_type));
        self.commands.push("bind_index_buffer".to_string());
        Ok(())
    }

    fn dispatch(&mut self, groups_x: u32, groups_y: u32, groups_z: u32) -> Result<()> {
        let Some(pipeline) = self.compute_pipeline.clone() else {
            engine_bail!("boxcull::MockDevice", InvalidResource, "dispatch without a compute pipeline");
        };

        let threads = groups_x * groups_y * groups_z * pipeline.desc().threads_per_group;
        match pipeline.desc().kernel {
            ComputeKernel::FrustumCull => self.run_frustum_cull(threads)?,
        }

        self.commands.push("dispatch".to_string());
        Ok(())
    }

    fn draw_indexed_instanced(
        &mut self,
        index_count: u32,
        instance_count: u32,
        _first_index: u32,
        _vertex_offset: i32,
        _first_instance: u32,
    ) -> Result<()> {
        self.record_draw(index_count, instance_count)?;
        self.commands.push("draw_indexed_instanced".to_string());
        Ok(())
    }

    fn draw_indexed_instanced_indirect(&mut self, args: &Arc<dyn Buffer>, offset: u64) -> Result<()> {
        if !args.desc().usage.contains(BufferUsage::INDIRECT_ARGS) {
            engine_bail!(
                "boxcull::MockDevice",
                InvalidResource,
                "'{}' cannot be used as indirect arguments",
                args.desc().label
            );
        }
        if self.vertex_buffer.is_none() || self.index_buffer.is_none() || self.binding_groups.is_empty() {
            engine_bail!("boxcull::MockDevice", InvalidResource, "indirect draw without bound geometry and resources");
        }
        let key = buffer_key(args)?;
        let draw: IndirectArgs = read_pod_at(lock(&self.state)?.storage(key)?, offset as usize)?;

        self.record_draw(draw.index_count_per_instance, draw.instance_count)?;
        self.commands.push("draw_indexed_instanced_indirect".to_string());
        Ok(())
    }

    fn begin_query(&mut self, query: &Arc<dyn Query>) -> Result<()> {
        let key = query_key(query)?;
        let mut state = lock(&self.state)?;
        let slot = state.query_mut(key)?;
        if slot.phase == QueryPhase::Active {
            engine_bail!("boxcull::MockDevice", InvalidResource, "query '{}' is already active", query.desc().label);
        }
        // Reissuing discards any unread result
        slot.phase = QueryPhase::Active;
        slot.statistics = PipelineStatistics::default();

        self.commands.push("begin_query".to_string());
        Ok(())
    }

    fn end_query(&mut self, query: &Arc<dyn Query>) -> Result<()> {
        let key = query_key(query)?;
        let mut state = lock(&self.state)?;
        let latency = state.query_latency;
        let failing = state.failing_query_ends;
        let slot = state.query_mut(key)?;
        if slot.phase != QueryPhase::Active {
            engine_bail!("boxcull::MockDevice", InvalidResource, "query '{}' was not begun", query.desc().label);
        }
        if failing {
            // The device drops the bracket
            slot.phase = QueryPhase::Idle;
            engine_bail!("boxcull::MockDevice", BackendError, "end of query '{}' failed", query.desc().label);
        }
        slot.phase = QueryPhase::Pending { polls_left: latency };

        self.commands.push("end_query".to_string());
        Ok(())
    }

    fn query_data(&mut self, query: &Arc<dyn Query>) -> Result<QueryData> {
        let key = query_key(query)?;
        let mut state = lock(&self.state)?;
        let stalled = state.queries_stalled;
        let slot = state.query_mut(key)?;

        let phase = slot.phase;
        match phase {
            QueryPhase::Idle => Err(engine_err!(
                "boxcull::MockDevice",
                InvalidResource,
                "query '{}' was never issued",
                query.desc().label
            )),
            QueryPhase::Active => Err(engine_err!(
                "boxcull::MockDevice",
                InvalidResource,
                "query '{}' is still open",
                query.desc().label
            )),
            QueryPhase::Pending { .. } if stalled => Ok(QueryData::NotReady),
            QueryPhase::Pending { polls_left: 0 } | QueryPhase::Ready => {
                slot.phase = QueryPhase::Ready;
                Ok(QueryData::PipelineStatistics(slot.statistics))
            }
            QueryPhase::Pending { polls_left } => {
                slot.phase = QueryPhase::Pending { polls_left: polls_left - 1 };
                Ok(QueryData::NotReady)
            }
        }
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

/// Software graphics device.
///
/// Cheap to share: every resource and command list holds the same device
/// state, so controls like `stall_queries` affect work already recorded.
pub struct MockGraphicsDevice {
    state: SharedState,
    created_buffers: Vec<String>,
    created_pipelines: Vec<String>,
    created_queries: Vec<String>,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockDeviceState::default())),
            created_buffers: Vec::new(),
            created_pipelines: Vec::new(),
            created_queries: Vec::new(),
        }
    }

    /// Immediate context executing against this device
    pub fn command_list(&self) -> MockCommandList {
        MockCommandList::new(Arc::clone(&self.state))
    }

    /// Labels of every buffer created, in order
    pub fn get_created_buffers(&self) -> &[String] {
        &self.created_buffers
    }

    /// Labels of every graphics and compute pipeline created, in order
    pub fn get_created_pipelines(&self) -> &[String] {
        &self.created_pipelines
    }

    /// Labels of every query created, in order
    pub fn get_created_queries(&self) -> &[String] {
        &self.created_queries
    }

    /// Buffers not yet dropped
    pub fn live_buffer_count(&self) -> usize {
        lock(&self.state).map(|state| state.buffers.len()).unwrap_or(0)
    }

    /// Queries not yet dropped
    pub fn live_query_count(&self) -> usize {
        lock(&self.state).map(|state| state.queries.len()).unwrap_or(0)
    }

    /// Cap the total bytes of live buffers (`None` = unlimited)
    pub fn set_buffer_budget(&self, budget: Option<u64>) {
        if let Ok(mut state) = lock(&self.state) {
            state.buffer_budget = budget;
        }
    }

    /// Make every map of the DYNAMIC buffers labelled `label` fail with
    /// `MapFailed`. Updates of non-dynamic buffers never map and ignore this.
    pub fn fail_uploads(&self, label: &str) {
        if let Ok(mut state) = lock(&self.state) {
            state.failing_uploads.insert(label.to_string());
        }
    }

    pub fn clear_upload_failures(&self) {
        if let Ok(mut state) = lock(&self.state) {
            state.failing_uploads.clear();
        }
    }

    /// Number of `query_data` calls returning `NotReady` for queries ended
    /// from now on
    pub fn set_query_latency(&self, polls: u32) {
        if let Ok(mut state) = lock(&self.state) {
            state.query_latency = polls;
        }
    }

    /// While stalled, every ended query reports `NotReady`
    pub fn stall_queries(&self, stalled: bool) {
        if let Ok(mut state) = lock(&self.state) {
            state.queries_stalled = stalled;
        }
    }

    /// While set, `end_query` fails and discards the open bracket
    pub fn fail_query_ends(&self, failing: bool) {
        if let Ok(mut state) = lock(&self.state) {
            state.failing_query_ends = failing;
        }
    }

    /// Copy of a buffer's current contents
    pub fn read_buffer(&self, buffer: &Arc<dyn Buffer>) -> Result<Vec<u8>> {
        let key = buffer_key(buffer)?;
        Ok(lock(&self.state)?.storage(key)?.clone())
    }

    /// Read one `T` from a buffer at a byte offset
    pub fn read_pod<T: Pod>(&self, buffer: &Arc<dyn Buffer>, offset: usize) -> Result<T> {
        let key = buffer_key(buffer)?;
        read_pod_at(lock(&self.state)?.storage(key)?, offset)
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_buffer(&mut self, desc: BufferDesc, initial_data: Option<&[u8]>) -> Result<Arc<dyn Buffer>> {
        if desc.size == 0 {
            engine_bail!("boxcull::MockDevice", InvalidResource, "buffer '{}' has zero size", desc.label);
        }
        if desc.usage.is_empty() {
            engine_bail!("boxcull::MockDevice", InvalidResource, "buffer '{}' has no usage", desc.label);
        }
        if desc.stride != 0 && desc.size % desc.stride as u64 != 0 {
            engine_bail!(
                "boxcull::MockDevice",
                InvalidResource,
                "buffer '{}' size {} is not a multiple of stride {}",
                desc.label,
                desc.size,
                desc.stride
            );
        }
        if let Some(data) = initial_data {
            if data.len() as u64 != desc.size {
                engine_bail!(
                    "boxcull::MockDevice",
                    InvalidResource,
                    "buffer '{}' initial data is {} bytes, expected {}",
                    desc.label,
                    data.len(),
                    desc.size
                );
            }
        }

        let mut state = lock(&self.state)?;
        if let Some(budget) = state.buffer_budget {
            if state.live_bytes() + desc.size > budget {
                crate::engine_error!(
                    "boxcull::MockDevice",
                    "buffer '{}' ({} bytes) exceeds the memory budget",
                    desc.label,
                    desc.size
                );
                return Err(Error::OutOfMemory);
            }
        }

        let storage = match initial_data {
            Some(data) => data.to_vec(),
            None => vec![0u8; desc.size as usize],
        };
        let key = state.buffers.insert(storage);
        drop(state);

        crate::engine_debug!("boxcull::MockDevice", "created buffer '{}' ({} bytes)", desc.label, desc.size);
        self.created_buffers.push(desc.label.clone());

        Ok(Arc::new(MockBuffer {
            desc,
            key,
            state: Arc::clone(&self.state),
        }))
    }

    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Arc<dyn Pipeline>> {
        if desc.vertex_shader.stage != ShaderStage::Vertex || desc.pixel_shader.stage != ShaderStage::Pixel {
            engine_bail!("boxcull::MockDevice", InvalidResource, "pipeline '{}' has mismatched shader stages", desc.label);
        }
        if desc.vertex_stride == 0 {
            engine_bail!("boxcull::MockDevice", InvalidResource, "pipeline '{}' has zero vertex stride", desc.label);
        }

        self.created_pipelines.push(desc.label.clone());
        Ok(Arc::new(MockPipeline { desc }))
    }

    fn create_compute_pipeline(&mut self, desc: ComputePipelineDesc) -> Result<Arc<dyn ComputePipeline>> {
        if desc.shader.stage != ShaderStage::Compute {
            engine_bail!("boxcull::MockDevice", InvalidResource, "compute pipeline '{}' needs a compute shader", desc.label);
        }
        if desc.threads_per_group == 0 {
            engine_bail!("boxcull::MockDevice", InvalidResource, "compute pipeline '{}' has an empty group", desc.label);
        }

        self.created_pipelines.push(desc.label.clone());
        Ok(Arc::new(MockComputePipeline { desc }))
    }

    fn create_binding_group(&mut self, desc: BindingGroupDesc) -> Result<Arc<dyn BindingGroup>> {
        let mut slots = FxHashSet::default();
        for entry in &desc.entries {
            if !slots.insert((slot_kind(&entry.resource), entry.slot)) {
                engine_bail!(
                    "boxcull::MockDevice",
                    InvalidResource,
                    "binding group '{}' binds slot {} twice",
                    desc.label,
                    entry.slot
                );
            }
            let buffer = entry.resource.buffer();
            if !buffer.desc().usage.contains(entry.resource.required_usage()) {
                engine_bail!(
                    "boxcull::MockDevice",
                    InvalidResource,
                    "binding group '{}': buffer '{}' lacks {:?} usage for slot {}",
                    desc.label,
                    buffer.desc().label,
                    entry.resource.required_usage(),
                    entry.slot
                );
            }
        }

        Ok(Arc::new(MockBindingGroup {
            label: desc.label,
            entries: desc.entries,
        }))
    }

    fn create_query(&mut self, desc: QueryDesc) -> Result<Arc<dyn Query>> {
        let key = lock(&self.state)?.queries.insert(MockQueryState {
            phase: QueryPhase::Idle,
            statistics: PipelineStatistics::default(),
        });

        self.created_queries.push(desc.label.clone());
        Ok(Arc::new(MockQuery {
            desc,
            key,
            state: Arc::clone(&self.state),
        }))
    }
}

/// Register class of a binding (b#, t#, u# are separate namespaces)
fn slot_kind(resource: &BindingResource) -> u8 {
    match resource {
        BindingResource::ConstantBuffer(_) => 0,
        BindingResource::ShaderResource(_) => 1,
        BindingResource::UnorderedAccess(_) => 2,
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
