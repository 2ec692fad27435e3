/*!
# Boxcull Engine

GPU-driven frustum culling for a field of instanced boxes.

Every frame the engine extracts the camera frustum, rebuilds a bounding box
per instance, decides visibility (on the CPU or in a compute pass), writes
the instance count of a single indirect draw and reads back how many
instances the GPU actually drew through a ring of pipeline-statistics
queries, without ever waiting on the GPU.

## Architecture

- **camera**: passive `Camera` and six-plane `Frustum` extraction
- **culling**: bounding volumes, CPU/GPU visibility decision, indirect
  arguments buffer and the asynchronous query reader
- **graphics_device**: backend-agnostic device, command list and resource
  traits, plus a software `MockGraphicsDevice`
- **scene**: `InstancedBoxes`, the component driving all of the above

The device is owned by the caller and passed by reference to every
component that creates resources. Resources release on drop.
*/

// Internal modules
mod error;
pub mod log;
pub mod config;
pub mod camera;
pub mod culling;
pub mod graphics_device;
pub mod scene;

// Main boxcull namespace module
pub mod boxcull {
    // Error types
    pub use crate::error::{Error, Result};

    // Configuration
    pub use crate::config::{CullMode, CullingConfig, DepthConvention};

    // Scene component
    pub use crate::scene::{InstancedBoxes, InstancedBoxesDesc, BoxShaders, InstanceParams};

    // Logging sub-module (types and logger replacement)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, set_logger, reset_logger};
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Culling sub-module
    pub mod culling {
        pub use crate::culling::*;
    }

    // Graphics device sub-module
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;
