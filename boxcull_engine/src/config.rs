/// Culling configuration
///
/// Plain data with a `Default`, validated once when a scene component is
/// created. Only `frustum_test` may change afterwards.

use crate::error::Result;

/// Where the per-frame visibility decision is made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    /// CPU builds the visibility list and writes the instance count
    Cpu,
    /// Compute pass appends visible indices and bumps the instance count
    Gpu,
}

/// Clip-space depth range produced by the projection matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthConvention {
    /// OpenGL style: near maps to -1, far to +1
    NegativeOneToOne,
    /// D3D style: near maps to 0, far to 1
    ZeroToOne,
    /// Reversed depth: near maps to 1, far to 0
    ReversedZeroToOne,
}

/// Smallest accepted query ring
pub const MIN_QUERY_RING_SIZE: usize = 2;
/// Largest accepted query ring
pub const MAX_QUERY_RING_SIZE: usize = 8;

/// Culling configuration
#[derive(Debug, Clone)]
pub struct CullingConfig {
    /// CPU or GPU visibility decision
    pub mode: CullMode,
    /// When false every instance passes (debug pass-all)
    pub frustum_test: bool,
    /// Number of pipeline-statistics queries in flight (K)
    pub query_ring_size: usize,
    /// Depth range of the projection matrices fed to `frame`
    pub depth_convention: DepthConvention,
    /// Upper bound on the instance count accepted at init
    pub max_instances: usize,
    /// Compute group width of the culling kernel
    pub threads_per_group: u32,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            mode: CullMode::Gpu,
            frustum_test: true,
            query_ring_size: 3,
            depth_convention: DepthConvention::ReversedZeroToOne,
            max_instances: 4096,
            threads_per_group: 64,
        }
    }
}

impl CullingConfig {
    /// Check every field against its accepted range
    pub fn validate(&self) -> Result<()> {
        if !(MIN_QUERY_RING_SIZE..=MAX_QUERY_RING_SIZE).contains(&self.query_ring_size) {
            crate::engine_bail!(
                "boxcull::CullingConfig",
                InvalidConfig,
                "query_ring_size must be in {}..={}, got {}",
                MIN_QUERY_RING_SIZE,
                MAX_QUERY_RING_SIZE,
                self.query_ring_size
            );
        }
        if self.max_instances == 0 {
            crate::engine_bail!("boxcull::CullingConfig", InvalidConfig, "max_instances must be non-zero");
        }
        if u32::try_from(self.max_instances).is_err() {
            crate::engine_bail!(
                "boxcull::CullingConfig",
                InvalidConfig,
                "max_instances {} does not fit a 32-bit instance count",
                self.max_instances
            );
        }
        if self.threads_per_group == 0 {
            crate::engine_bail!("boxcull::CullingConfig", InvalidConfig, "threads_per_group must be non-zero");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
