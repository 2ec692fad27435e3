/// Graphics device module - backend-agnostic GPU abstraction

// Module declarations
pub mod graphics_device;
pub mod buffer;
pub mod pipeline;
pub mod binding_group;
pub mod query;
pub mod command_list;

// Software device used by tests and the headless demo
pub mod mock_graphics_device;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use buffer::*;
pub use pipeline::*;
pub use binding_group::*;
pub use query::*;
pub use command_list::*;
