/// Binding groups - immutable sets of buffer bindings

use std::any::Any;
use std::sync::Arc;
use crate::graphics_device::{Buffer, BufferUsage};

/// How a buffer is exposed to shaders
#[derive(Clone)]
pub enum BindingResource {
    /// Constant buffer (register b#)
    ConstantBuffer(Arc<dyn Buffer>),
    /// Read-only structured buffer (register t#)
    ShaderResource(Arc<dyn Buffer>),
    /// Read-write structured buffer (register u#)
    UnorderedAccess(Arc<dyn Buffer>),
}

impl BindingResource {
    /// The bound buffer
    pub fn buffer(&self) -> &Arc<dyn Buffer> {
        match self {
            BindingResource::ConstantBuffer(buffer)
            | BindingResource::ShaderResource(buffer)
            | BindingResource::UnorderedAccess(buffer) => buffer,
        }
    }

    /// Usage flag the buffer must carry for this binding
    pub fn required_usage(&self) -> BufferUsage {
        match self {
            BindingResource::ConstantBuffer(_) => BufferUsage::CONSTANT,
            BindingResource::ShaderResource(_) => BufferUsage::SHADER_RESOURCE,
            BindingResource::UnorderedAccess(_) => BufferUsage::UNORDERED_ACCESS,
        }
    }
}

/// One slot of a binding group
#[derive(Clone)]
pub struct BindingEntry {
    /// Register slot
    pub slot: u32,
    /// Bound resource
    pub resource: BindingResource,
}

/// Descriptor for creating a binding group
#[derive(Clone)]
pub struct BindingGroupDesc {
    /// Debug name
    pub label: String,
    /// Bindings, one per slot
    pub entries: Vec<BindingEntry>,
}

/// Binding group resource trait
pub trait BindingGroup: Send + Sync {
    /// Entries the group was created with
    fn entries(&self) -> &[BindingEntry];

    /// Resource bound at `slot`, if any
    fn resource(&self, slot: u32) -> Option<&BindingResource> {
        self.entries()
            .iter()
            .find(|entry| entry.slot == slot)
            .map(|entry| &entry.resource)
    }

    /// Downcast hook for backends
    fn as_any(&self) -> &dyn Any;
}
