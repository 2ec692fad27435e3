/// Culling module - bounding volumes, visibility decision, indirect
/// arguments and asynchronous statistics readback

pub mod bounds;
pub mod cull;
pub mod gpu_types;
pub mod indirect_args;
pub mod query_reader;

pub use bounds::{AABB, LOCAL_BOX, build_world_bounds};
pub use cull::{VisibilityList, cull_instances, cull_kernel};
pub use gpu_types::{IndirectArgs, InstanceGpuData, SceneConstants, INDICES_PER_BOX, TRIANGLES_PER_BOX};
pub use indirect_args::IndirectArgsBuffer;
pub use query_reader::{AsyncQueryReader, SlotState};
