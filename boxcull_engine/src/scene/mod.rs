/// Scene module - the instanced box field and its per-frame driver

pub mod cube;
pub mod instance;
pub mod instanced_boxes;

pub use cube::{BoxVertex, CUBE_INDICES, CUBE_VERTICES};
pub use instance::{InstanceParams, InstanceSet, animated_world, random_params};
pub use instanced_boxes::{BoxShaders, InstancedBoxes, InstancedBoxesDesc};
