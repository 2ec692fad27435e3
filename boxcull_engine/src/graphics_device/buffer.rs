/// Buffer trait and buffer descriptor

use std::any::Any;
use bitflags::bitflags;

bitflags! {
    /// How a buffer may be bound and written
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// Vertex buffer
        const VERTEX = 1 << 0;
        /// Index buffer
        const INDEX = 1 << 1;
        /// Constant buffer
        const CONSTANT = 1 << 2;
        /// Read-only shader resource (structured buffer SRV)
        const SHADER_RESOURCE = 1 << 3;
        /// Read-write shader resource (UAV)
        const UNORDERED_ACCESS = 1 << 4;
        /// Source of indirect draw/dispatch arguments
        const INDIRECT_ARGS = 1 << 5;
        /// Rewritten by the CPU every frame (map/discard)
        const DYNAMIC = 1 << 6;
    }
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Debug name, also used by backends in error messages
    pub label: String,
    /// Size in bytes
    pub size: u64,
    /// Element stride for structured buffers (0 for raw/constant buffers)
    pub stride: u32,
    /// Buffer usage
    pub usage: BufferUsage,
}

impl BufferDesc {
    /// Descriptor for a structured buffer of `count` elements of `T`.
    pub fn structured<T>(label: &str, count: usize, usage: BufferUsage) -> Self {
        let stride = std::mem::size_of::<T>();
        Self {
            label: label.to_string(),
            size: (stride * count) as u64,
            stride: stride as u32,
            usage,
        }
    }

    /// Descriptor for a buffer holding exactly one `T`.
    pub fn single<T>(label: &str, usage: BufferUsage) -> Self {
        Self {
            label: label.to_string(),
            size: std::mem::size_of::<T>() as u64,
            stride: 0,
            usage,
        }
    }
}

/// Buffer resource trait
///
/// Implemented by backend-specific buffer types (e.g., MockBuffer).
/// The buffer is automatically released when the last Arc is dropped.
pub trait Buffer: Send + Sync {
    /// Descriptor the buffer was created with
    fn desc(&self) -> &BufferDesc;

    /// Downcast hook for backends that need their concrete type back
    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
