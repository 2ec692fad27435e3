use crate::config::CullMode;
use crate::culling::gpu_types::IndirectArgs;
use crate::error::Error;
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;
use crate::graphics_device::BufferUsage;
use super::*;

fn read_args(device: &MockGraphicsDevice, buffer: &Arc<dyn Buffer>) -> IndirectArgs {
    device.read_pod::<IndirectArgs>(buffer, 0).unwrap()
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_cpu_mode_has_no_counter() {
    let mut device = MockGraphicsDevice::new();
    let args = IndirectArgsBuffer::new(&mut device, CullMode::Cpu, 100).unwrap();

    assert!(args.counter().is_none());
    assert!(args.buffer().desc().usage.contains(BufferUsage::INDIRECT_ARGS));
    assert_eq!(device.live_buffer_count(), 1);
}

#[test]
fn test_gpu_mode_counter_is_uav() {
    let mut device = MockGraphicsDevice::new();
    let args = IndirectArgsBuffer::new(&mut device, CullMode::Gpu, 100).unwrap();

    let counter = args.counter().unwrap();
    assert!(counter.desc().usage.contains(BufferUsage::UNORDERED_ACCESS));
    assert!(!args.buffer().desc().usage.contains(BufferUsage::UNORDERED_ACCESS));
    assert_eq!(device.live_buffer_count(), 2);
}

#[test]
fn test_initial_args_draw_nothing() {
    let mut device = MockGraphicsDevice::new();
    let args = IndirectArgsBuffer::new(&mut device, CullMode::Gpu, 100).unwrap();

    let initial = read_args(&device, args.buffer());
    assert_eq!(initial.instance_count, 0);
    assert_eq!(initial.index_count_per_instance, 36);
    assert_eq!(initial.start_index_location, 0);
    assert_eq!(initial.base_vertex_location, 0);
    assert_eq!(initial.start_instance_location, 0);
}

// ============================================================================
// CPU producer
// ============================================================================

#[test]
fn test_write_count() {
    let mut device = MockGraphicsDevice::new();
    let args = IndirectArgsBuffer::new(&mut device, CullMode::Cpu, 100).unwrap();
    let mut ctx = device.command_list();

    args.write_count(&mut ctx, 42).unwrap();
    assert_eq!(read_args(&device, args.buffer()).instance_count, 42);

    args.write_count(&mut ctx, 100).unwrap();
    assert_eq!(read_args(&device, args.buffer()).instance_count, 100);
}

#[test]
fn test_write_count_above_capacity_rejected() {
    let mut device = MockGraphicsDevice::new();
    let args = IndirectArgsBuffer::new(&mut device, CullMode::Cpu, 10).unwrap();
    let mut ctx = device.command_list();

    args.write_count(&mut ctx, 5).unwrap();
    assert!(matches!(args.write_count(&mut ctx, 11), Err(Error::InvalidResource(_))));
    // Previous value untouched
    assert_eq!(read_args(&device, args.buffer()).instance_count, 5);
}

#[test]
fn test_write_count_refused_in_gpu_mode() {
    let mut device = MockGraphicsDevice::new();
    let args = IndirectArgsBuffer::new(&mut device, CullMode::Gpu, 10).unwrap();
    let mut ctx = device.command_list();

    assert!(args.write_count(&mut ctx, 3).is_err());
}

// ============================================================================
// GPU producer
// ============================================================================

#[test]
fn test_reset_and_resolve_refused_in_cpu_mode() {
    let mut device = MockGraphicsDevice::new();
    let args = IndirectArgsBuffer::new(&mut device, CullMode::Cpu, 10).unwrap();
    let mut ctx = device.command_list();

    assert!(args.reset_counter(&mut ctx).is_err());
    assert!(args.resolve(&mut ctx).is_err());
}

#[test]
fn test_resolve_copies_counter_into_args() {
    let mut device = MockGraphicsDevice::new();
    let args = IndirectArgsBuffer::new(&mut device, CullMode::Gpu, 10).unwrap();
    let mut ctx = device.command_list();

    // Stand-in for the kernel's increments
    let counter = args.counter().unwrap().clone();
    ctx.update_buffer(&counter, 0, bytemuck::bytes_of(&IndirectArgs::boxes(7))).unwrap();
    assert_eq!(read_args(&device, args.buffer()).instance_count, 0);

    args.resolve(&mut ctx).unwrap();
    assert_eq!(read_args(&device, args.buffer()).instance_count, 7);

    args.reset_counter(&mut ctx).unwrap();
    assert_eq!(read_args(&device, &counter).instance_count, 0);
    // Args keep the resolved value until the next resolve
    assert_eq!(read_args(&device, args.buffer()).instance_count, 7);

    assert_eq!(
        ctx.commands,
        vec!["update_buffer", "copy_buffer", "update_buffer"]
    );
}
