use crate::culling::{IndirectArgs, InstanceGpuData};
use super::*;

#[test]
fn test_structured_desc() {
    let desc = BufferDesc::structured::<InstanceGpuData>("instances", 10, BufferUsage::SHADER_RESOURCE);
    assert_eq!(desc.label, "instances");
    assert_eq!(desc.stride, 144);
    assert_eq!(desc.size, 1440);
    assert_eq!(desc.usage, BufferUsage::SHADER_RESOURCE);
}

#[test]
fn test_single_desc() {
    let desc = BufferDesc::single::<IndirectArgs>("args", BufferUsage::INDIRECT_ARGS);
    assert_eq!(desc.size, 20);
    assert_eq!(desc.stride, 0);
}

#[test]
fn test_usage_flags_combine() {
    let usage = BufferUsage::SHADER_RESOURCE | BufferUsage::UNORDERED_ACCESS;
    assert!(usage.contains(BufferUsage::UNORDERED_ACCESS));
    assert!(!usage.contains(BufferUsage::INDIRECT_ARGS));
}
