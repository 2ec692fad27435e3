/// InstancedBoxes - a field of animated cubes drawn with one indirect draw
///
/// Per frame:
/// 1. `frame`: animate instances, extract the frustum, upload scene and
///    instance data, then produce the draw's instance count, either on the
///    CPU (visibility list) or with the cull kernel (atomic append).
/// 2. `render`: collect finished statistics queries, then issue the
///    indirect draw bracketed by the next free query.
/// 3. `culled_count`: total instances minus the instances the GPU drew in
///    the most recent measured frame (up to K frames old).

use std::sync::Arc;
use bytemuck::{bytes_of, cast_slice};
use glam::Mat4;
use crate::camera::{Camera, Frustum};
use crate::config::{CullMode, CullingConfig};
use crate::culling::gpu_types::{
    CULL_SLOT_ARGS, CULL_SLOT_INSTANCES, CULL_SLOT_SCENE, CULL_SLOT_VISIBLE,
    DRAW_SLOT_INSTANCES, DRAW_SLOT_SCENE, DRAW_SLOT_VISIBLE,
};
use crate::culling::{
    AsyncQueryReader, IndirectArgsBuffer, InstanceGpuData, SceneConstants, VisibilityList,
    TRIANGLES_PER_BOX,
};
use crate::error::Result;
use crate::graphics_device::{
    BindingEntry, BindingGroup, BindingGroupDesc, BindingResource, Buffer, BufferDesc, BufferUsage,
    CommandList, ComputeKernel, ComputePipeline, ComputePipelineDesc, GraphicsDevice, IndexType,
    Pipeline, PipelineDesc, PipelineStatistics, PrimitiveTopology, ShaderDesc,
};
use crate::scene::cube::{BoxVertex, CUBE_INDICES, CUBE_VERTICES};
use crate::scene::instance::{InstanceParams, InstanceSet};

/// Compiled shaders used by the component
#[derive(Debug, Clone)]
pub struct BoxShaders {
    pub vertex: ShaderDesc,
    pub pixel: ShaderDesc,
    /// Frustum-cull compute shader (only used in GPU mode)
    pub cull: ShaderDesc,
}

/// Everything needed to build an `InstancedBoxes`
#[derive(Debug, Clone)]
pub struct InstancedBoxesDesc {
    /// One position per instance; the count is fixed from here on
    pub positions: Vec<glam::Vec3>,
    /// One parameter set per position
    pub params: Vec<InstanceParams>,
    pub shaders: BoxShaders,
}

/// Compute pass state (GPU mode)
struct CullPass {
    pipeline: Arc<dyn ComputePipeline>,
    binding_group: Arc<dyn BindingGroup>,
    threads_per_group: u32,
}

pub struct InstancedBoxes {
    config: CullingConfig,
    instances: InstanceSet,

    // Committed after a successful frame
    visibility: VisibilityList,
    frustum: Option<Frustum>,
    frames: u64,

    // Per-frame scratch
    world_matrices: Vec<Mat4>,
    gpu_data: Vec<InstanceGpuData>,
    pending_visibility: VisibilityList,

    // GPU resources (released on drop)
    vertex_buffer: Arc<dyn Buffer>,
    index_buffer: Arc<dyn Buffer>,
    scene_buffer: Arc<dyn Buffer>,
    instance_buffer: Arc<dyn Buffer>,
    visible_buffer: Arc<dyn Buffer>,
    args: IndirectArgsBuffer,
    pipeline: Arc<dyn Pipeline>,
    draw_group: Arc<dyn BindingGroup>,
    cull_pass: Option<CullPass>,
    queries: AsyncQueryReader,
}

impl InstancedBoxes {
    /// Create every GPU resource the component needs.
    ///
    /// Any failure aborts setup; resources created so far are released.
    pub fn new(device: &mut dyn GraphicsDevice, config: CullingConfig, desc: InstancedBoxesDesc) -> Result<Self> {
        config.validate()?;

        let count = desc.positions.len();
        if count > config.max_instances {
            crate::engine_bail!(
                "boxcull::InstancedBoxes",
                InitializationFailed,
                "{} instances exceed the configured maximum of {}",
                count,
                config.max_instances
            );
        }
        let instances = InstanceSet::new(desc.positions, desc.params)?;

        // Instance data starts at t = 0 so the buffer is valid before the first frame
        let mut world_matrices = Vec::with_capacity(count);
        let mut gpu_data = Vec::with_capacity(count);
        instances.animate(0.0, &mut world_matrices, &mut gpu_data);

        let vertex_buffer = device.create_buffer(
            BufferDesc::structured::<BoxVertex>("cube_vertices", CUBE_VERTICES.len(), BufferUsage::VERTEX),
            Some(cast_slice(&CUBE_VERTICES)),
        )?;
        let index_buffer = device.create_buffer(
            BufferDesc {
                label: "cube_indices".to_string(),
                size: std::mem::size_of_val(&CUBE_INDICES) as u64,
                stride: 0,
                usage: BufferUsage::INDEX,
            },
            Some(cast_slice(&CUBE_INDICES)),
        )?;
        let scene_buffer = device.create_buffer(
            BufferDesc::single::<SceneConstants>("scene_constants", BufferUsage::CONSTANT | BufferUsage::DYNAMIC),
            None,
        )?;
        let instance_buffer = device.create_buffer(
            BufferDesc::structured::<InstanceGpuData>("instance_data", count, BufferUsage::SHADER_RESOURCE),
            Some(cast_slice(&gpu_data)),
        )?;

        let visible_usage = match config.mode {
            CullMode::Cpu => BufferUsage::SHADER_RESOURCE,
            CullMode::Gpu => BufferUsage::SHADER_RESOURCE | BufferUsage::UNORDERED_ACCESS,
        };
        let visible_buffer = device.create_buffer(
            BufferDesc::structured::<u32>("visible_indices", count, visible_usage),
            None,
        )?;

        let args = IndirectArgsBuffer::new(device, config.mode, count as u32)?;

        let pipeline = device.create_pipeline(PipelineDesc {
            label: "instanced_boxes".to_string(),
            vertex_shader: desc.shaders.vertex,
            pixel_shader: desc.shaders.pixel,
            vertex_stride: std::mem::size_of::<BoxVertex>() as u32,
            topology: PrimitiveTopology::TriangleList,
        })?;

        let draw_group = device.create_binding_group(BindingGroupDesc {
            label: "instanced_boxes_draw".to_string(),
            entries: vec![
                BindingEntry {
                    slot: DRAW_SLOT_INSTANCES,
                    resource: BindingResource::ShaderResource(Arc::clone(&instance_buffer)),
                },
                BindingEntry {
                    slot: DRAW_SLOT_SCENE,
                    resource: BindingResource::ConstantBuffer(Arc::clone(&scene_buffer)),
                },
                BindingEntry {
                    slot: DRAW_SLOT_VISIBLE,
                    resource: BindingResource::ShaderResource(Arc::clone(&visible_buffer)),
                },
            ],
        })?;

        let cull_pass = match args.counter() {
            None => None,
            Some(counter) => {
                let pipeline = device.create_compute_pipeline(ComputePipelineDesc {
                    label: "frustum_cull".to_string(),
                    shader: desc.shaders.cull,
                    kernel: ComputeKernel::FrustumCull,
                    threads_per_group: config.threads_per_group,
                })?;
                let binding_group = device.create_binding_group(BindingGroupDesc {
                    label: "frustum_cull".to_string(),
                    entries: vec![
                        BindingEntry {
                            slot: CULL_SLOT_SCENE,
                            resource: BindingResource::ConstantBuffer(Arc::clone(&scene_buffer)),
                        },
                        BindingEntry {
                            slot: CULL_SLOT_INSTANCES,
                            resource: BindingResource::ShaderResource(Arc::clone(&instance_buffer)),
                        },
                        BindingEntry {
                            slot: CULL_SLOT_ARGS,
                            resource: BindingResource::UnorderedAccess(Arc::clone(counter)),
                        },
                        BindingEntry {
                            slot: CULL_SLOT_VISIBLE,
                            resource: BindingResource::UnorderedAccess(Arc::clone(&visible_buffer)),
                        },
                    ],
                })?;
                Some(CullPass {
                    pipeline,
                    binding_group,
                    threads_per_group: config.threads_per_group,
                })
            }
        };

        let queries = AsyncQueryReader::new(device, config.query_ring_size, TRIANGLES_PER_BOX)?;

        crate::engine_info!(
            "boxcull::InstancedBoxes",
            "{} instances, {:?} culling, {} query slots, frustum test {}",
            count,
            config.mode,
            config.query_ring_size,
            if config.frustum_test { "on" } else { "off" }
        );

        Ok(Self {
            config,
            instances,
            visibility: VisibilityList::with_capacity(count),
            frustum: None,
            frames: 0,
            world_matrices,
            gpu_data,
            pending_visibility: VisibilityList::with_capacity(count),
            vertex_buffer,
            index_buffer,
            scene_buffer,
            instance_buffer,
            visible_buffer,
            args,
            pipeline,
            draw_group,
            cull_pass,
            queries,
        })
    }

    /// Recompute planes, bounds and the visibility decision for this frame
    /// and update the GPU buffers.
    ///
    /// On error the frame is skipped: the component keeps the previous
    /// frame's visibility state and the caller may retry next frame.
    pub fn frame(&mut self, ctx: &mut dyn CommandList, camera: &Camera, elapsed_seconds: f32) -> Result<()> {
        let frustum = Frustum::from_view_and_projection(
            camera.view_matrix(),
            camera.projection_matrix(),
            self.config.depth_convention,
        );

        self.instances.animate(elapsed_seconds, &mut self.world_matrices, &mut self.gpu_data);
        if self.cull_pass.is_none() {
            self.pending_visibility.rebuild(&frustum, &self.world_matrices, self.config.frustum_test);
        }

        // The scene constants are the only mapped buffer. Map them before
        // anything else so a failed map leaves every buffer untouched.
        let scene = SceneConstants::new(
            camera.view_projection_matrix(),
            frustum.planes,
            camera.position(),
            self.instances.len() as u32,
            self.config.frustum_test,
        );
        ctx.update_buffer(&self.scene_buffer, 0, bytes_of(&scene))?;
        ctx.update_buffer(&self.instance_buffer, 0, cast_slice(&self.gpu_data))?;

        match &self.cull_pass {
            None => {
                let indices = self.pending_visibility.indices();
                if !indices.is_empty() {
                    ctx.update_buffer(&self.visible_buffer, 0, cast_slice(indices))?;
                }
                self.args.write_count(ctx, indices.len() as u32)?;
                std::mem::swap(&mut self.visibility, &mut self.pending_visibility);
            }
            Some(cull) => {
                let groups = (self.instances.len() as u32).div_ceil(cull.threads_per_group);
                self.args.reset_counter(ctx)?;
                ctx.bind_compute_pipeline(&cull.pipeline)?;
                ctx.bind_compute_binding_group(0, &cull.binding_group)?;
                ctx.dispatch(groups, 1, 1)?;
                self.args.resolve(ctx)?;
            }
        }

        self.frustum = Some(frustum);
        self.frames += 1;

        crate::engine_trace!(
            "boxcull::InstancedBoxes",
            "frame {} prepared ({} instances)",
            self.frames,
            self.instances.len()
        );
        Ok(())
    }

    /// Issue the indirect draw with the most recently produced arguments.
    pub fn render(&mut self, ctx: &mut dyn CommandList) -> Result<()> {
        self.queries.poll_completed(ctx)?;

        ctx.bind_pipeline(&self.pipeline)?;
        ctx.bind_vertex_buffer(&self.vertex_buffer, 0)?;
        ctx.bind_index_buffer(&self.index_buffer, 0, IndexType::U16)?;
        ctx.bind_binding_group(0, &self.draw_group)?;

        let measured = self.queries.begin_frame_query(ctx)?;
        let draw = ctx.draw_indexed_instanced_indirect(self.args.buffer(), 0);
        if measured {
            self.queries.end_frame_query(ctx)?;
        }
        draw
    }

    /// Collect finished query results without drawing. Returns how many
    /// frames completed.
    pub fn poll_queries(&mut self, ctx: &mut dyn CommandList) -> Result<usize> {
        self.queries.poll_completed(ctx)
    }

    /// Instances not drawn in the most recent measured frame.
    ///
    /// Lags the current frame by up to K frames. Before any measurement
    /// completes every instance is assumed drawn, so this is 0.
    pub fn culled_count(&self) -> u32 {
        let total = self.instances.len() as u64;
        let drawn = self.queries.instances_drawn().unwrap_or(total).min(total);
        (total - drawn) as u32
    }

    /// Enable or disable the frustum test (disabled = every instance drawn).
    ///
    /// Takes effect on the next `frame`.
    pub fn set_frustum_test(&mut self, enabled: bool) {
        if self.config.frustum_test != enabled {
            crate::engine_info!(
                "boxcull::InstancedBoxes",
                "frustum test {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }
        self.config.frustum_test = enabled;
    }

    pub fn frustum_test(&self) -> bool {
        self.config.frustum_test
    }

    pub fn config(&self) -> &CullingConfig {
        &self.config
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn instances(&self) -> &InstanceSet {
        &self.instances
    }

    /// Frames successfully prepared by `frame`
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frustum of the last successful frame
    pub fn frustum(&self) -> Option<&Frustum> {
        self.frustum.as_ref()
    }

    /// Visible indices chosen by the CPU in the last successful frame.
    ///
    /// `None` in GPU mode: the kernel's result is never read back.
    pub fn visible_indices(&self) -> Option<&[u32]> {
        match self.config.mode {
            CullMode::Cpu => Some(self.visibility.indices()),
            CullMode::Gpu => None,
        }
    }

    /// Statistics of the most recent measured frame
    pub fn last_statistics(&self) -> Option<PipelineStatistics> {
        self.queries.last_statistics()
    }

    /// Queries issued but not read back yet
    pub fn outstanding_queries(&self) -> usize {
        self.queries.outstanding()
    }

    /// Frames whose statistics have been read back
    pub fn measured_frames(&self) -> u64 {
        self.queries.last_completed_frame()
    }

    /// Buffer consumed by the indirect draw
    pub fn indirect_args(&self) -> &Arc<dyn Buffer> {
        self.args.buffer()
    }

    /// Mapped per-frame constants (view-projection, planes, cull flags)
    pub fn scene_buffer(&self) -> &Arc<dyn Buffer> {
        &self.scene_buffer
    }

    /// Per-instance world matrices and shading parameters
    pub fn instance_buffer(&self) -> &Arc<dyn Buffer> {
        &self.instance_buffer
    }

    /// Compacted visible-index buffer read by the vertex stage
    pub fn visible_index_buffer(&self) -> &Arc<dyn Buffer> {
        &self.visible_buffer
    }
}

#[cfg(test)]
#[path = "instanced_boxes_tests.rs"]
mod tests;
