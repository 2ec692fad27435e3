/// Indirect draw arguments buffer
///
/// Exactly one producer writes `instance_count` per frame:
/// - `CullMode::Cpu`: the CPU writes the visible count straight into the
///   args buffer.
/// - `CullMode::Gpu`: the cull kernel increments the count in a staging
///   buffer bound as an unordered-access view. The args buffer cannot be
///   bound that way, so `resolve` copies staging into it on the device.
///
/// Both the copy and the draw are recorded on the same command list after
/// the producer, so they execute in order without an explicit barrier.

use std::sync::Arc;
use bytemuck::bytes_of;
use crate::config::CullMode;
use crate::culling::gpu_types::IndirectArgs;
use crate::error::Result;
use crate::graphics_device::{Buffer, BufferDesc, BufferUsage, CommandList, GraphicsDevice};

pub struct IndirectArgsBuffer {
    /// Source of `draw_indexed_instanced_indirect`
    args: Arc<dyn Buffer>,
    /// Counter written by the cull kernel (GPU mode only)
    counter: Option<Arc<dyn Buffer>>,
    /// Largest instance count that may be written
    capacity: u32,
}

impl IndirectArgsBuffer {
    /// Create the args buffer (and the staging counter in GPU mode).
    ///
    /// Both start with a zero instance count, so a draw issued before the
    /// first `frame` renders nothing.
    pub fn new(device: &mut dyn GraphicsDevice, mode: CullMode, capacity: u32) -> Result<Self> {
        let initial = IndirectArgs::boxes(0);

        let args = device.create_buffer(
            BufferDesc::single::<IndirectArgs>("indirect_args", BufferUsage::INDIRECT_ARGS),
            Some(bytes_of(&initial)),
        )?;

        let counter = match mode {
            CullMode::Cpu => None,
            CullMode::Gpu => Some(device.create_buffer(
                BufferDesc::single::<IndirectArgs>("indirect_args_counter", BufferUsage::UNORDERED_ACCESS),
                Some(bytes_of(&initial)),
            )?),
        };

        Ok(Self { args, counter, capacity })
    }

    /// Buffer consumed by the indirect draw
    pub fn buffer(&self) -> &Arc<dyn Buffer> {
        &self.args
    }

    /// Buffer the cull kernel appends into, `None` in CPU mode
    pub fn counter(&self) -> Option<&Arc<dyn Buffer>> {
        self.counter.as_ref()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// CPU producer: write the visible count for this frame.
    pub fn write_count(&self, ctx: &mut dyn CommandList, instance_count: u32) -> Result<()> {
        if self.counter.is_some() {
            crate::engine_bail!(
                "boxcull::IndirectArgsBuffer",
                InvalidResource,
                "instance count is produced by the cull kernel in GPU mode"
            );
        }
        if instance_count > self.capacity {
            crate::engine_bail!(
                "boxcull::IndirectArgsBuffer",
                InvalidResource,
                "instance count {} exceeds capacity {}",
                instance_count,
                self.capacity
            );
        }
        ctx.update_buffer(&self.args, 0, bytes_of(&IndirectArgs::boxes(instance_count)))
    }

    /// GPU producer: zero the counter before the cull dispatch.
    pub fn reset_counter(&self, ctx: &mut dyn CommandList) -> Result<()> {
        let counter = self.gpu_counter()?;
        ctx.update_buffer(counter, 0, bytes_of(&IndirectArgs::boxes(0)))
    }

    /// GPU producer: copy the counter into the args buffer after the dispatch.
    pub fn resolve(&self, ctx: &mut dyn CommandList) -> Result<()> {
        let counter = self.gpu_counter()?;
        ctx.copy_buffer(counter, &self.args)
    }

    fn gpu_counter(&self) -> Result<&Arc<dyn Buffer>> {
        match &self.counter {
            Some(counter) => Ok(counter),
            None => Err(crate::engine_err!(
                "boxcull::IndirectArgsBuffer",
                InvalidResource,
                "no cull-kernel counter in CPU mode"
            )),
        }
    }
}

#[cfg(test)]
#[path = "indirect_args_tests.rs"]
mod tests;
