use crate::error::Error;
use super::*;

#[test]
fn test_default_config_is_valid() {
    let config = CullingConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.mode, CullMode::Gpu);
    assert!(config.frustum_test);
    assert_eq!(config.query_ring_size, 3);
    assert_eq!(config.depth_convention, DepthConvention::ReversedZeroToOne);
}

#[test]
fn test_ring_size_bounds() {
    for size in [0, 1, MAX_QUERY_RING_SIZE + 1] {
        let config = CullingConfig { query_ring_size: size, ..Default::default() };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))), "size {} accepted", size);
    }
    for size in MIN_QUERY_RING_SIZE..=MAX_QUERY_RING_SIZE {
        let config = CullingConfig { query_ring_size: size, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}

#[test]
fn test_zero_max_instances_rejected() {
    let config = CullingConfig { max_instances: 0, ..Default::default() };
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_zero_group_width_rejected() {
    let config = CullingConfig { threads_per_group: 0, ..Default::default() };
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
}
