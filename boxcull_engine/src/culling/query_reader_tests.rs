use std::sync::Arc;
use crate::error::Error;
use crate::graphics_device::mock_graphics_device::{MockCommandList, MockGraphicsDevice};
use crate::graphics_device::{
    CommandList, GraphicsDevice, Pipeline, PipelineDesc, PrimitiveTopology, ShaderDesc, ShaderStage,
};
use super::*;

fn setup(ring_size: usize) -> (MockGraphicsDevice, MockCommandList, AsyncQueryReader) {
    let mut device = MockGraphicsDevice::new();
    let reader = AsyncQueryReader::new(&mut device, ring_size, 12).unwrap();
    let mut ctx = device.command_list();
    let pipeline = create_pipeline(&mut device);
    ctx.bind_pipeline(&pipeline).unwrap();
    (device, ctx, reader)
}

fn create_pipeline(device: &mut MockGraphicsDevice) -> Arc<dyn Pipeline> {
    device
        .create_pipeline(PipelineDesc {
            label: "boxes".to_string(),
            vertex_shader: ShaderDesc::new(ShaderStage::Vertex, "VSMain", vec![0]),
            pixel_shader: ShaderDesc::new(ShaderStage::Pixel, "PSMain", vec![0]),
            vertex_stride: 48,
            topology: PrimitiveTopology::TriangleList,
        })
        .unwrap()
}

/// One measured frame drawing `instances` cubes
fn measured_frame(ctx: &mut MockCommandList, reader: &mut AsyncQueryReader, instances: u32) -> bool {
    let begun = reader.begin_frame_query(ctx).unwrap();
    ctx.draw_indexed_instanced(36, instances, 0, 0, 0).unwrap();
    if begun {
        reader.end_frame_query(ctx).unwrap();
    }
    begun
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_new_creates_ring() {
    let mut device = MockGraphicsDevice::new();
    let reader = AsyncQueryReader::new(&mut device, 3, 12).unwrap();

    assert_eq!(reader.ring_size(), 3);
    assert_eq!(device.live_query_count(), 3);
    assert_eq!(reader.current_frame(), 0);
    assert_eq!(reader.last_completed_frame(), 0);
    assert_eq!(reader.instances_drawn(), None);
    for slot in 0..3 {
        assert_eq!(reader.slot_state(slot), Some(SlotState::Idle));
    }
}

#[test]
fn test_new_rejects_empty_ring() {
    let mut device = MockGraphicsDevice::new();
    assert!(matches!(AsyncQueryReader::new(&mut device, 0, 12), Err(Error::InvalidConfig(_))));
    assert!(matches!(AsyncQueryReader::new(&mut device, 2, 0), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_queries_released_with_reader() {
    let mut device = MockGraphicsDevice::new();
    let reader = AsyncQueryReader::new(&mut device, 4, 12).unwrap();
    assert_eq!(device.live_query_count(), 4);
    drop(reader);
    assert_eq!(device.live_query_count(), 0);
}

// ============================================================================
// Slot state machine
// ============================================================================

#[test]
fn test_slot_transitions() {
    let (_device, mut ctx, mut reader) = setup(2);

    assert!(reader.begin_frame_query(&mut ctx).unwrap());
    assert_eq!(reader.slot_state(0), Some(SlotState::Issued));
    assert!(reader.is_open());

    ctx.draw_indexed_instanced(36, 5, 0, 0, 0).unwrap();
    reader.end_frame_query(&mut ctx).unwrap();
    assert_eq!(reader.slot_state(0), Some(SlotState::AwaitingResult));

    assert_eq!(reader.poll_completed(&mut ctx).unwrap(), 1);
    assert_eq!(reader.slot_state(0), Some(SlotState::Idle));
    assert_eq!(reader.instances_drawn(), Some(5));
    assert_eq!(reader.last_statistics().unwrap().ia_primitives, 60);
}

#[test]
fn test_begin_twice_without_end_fails() {
    let (_device, mut ctx, mut reader) = setup(3);
    reader.begin_frame_query(&mut ctx).unwrap();
    assert!(reader.begin_frame_query(&mut ctx).is_err());
}

#[test]
fn test_end_without_begin_fails() {
    let (_device, mut ctx, mut reader) = setup(3);
    assert!(matches!(reader.end_frame_query(&mut ctx), Err(Error::InvalidResource(_))));
}

#[test]
fn test_failed_end_frees_slot() {
    let (device, mut ctx, mut reader) = setup(2);
    assert!(measured_frame(&mut ctx, &mut reader, 1));

    device.fail_query_ends(true);
    assert!(reader.begin_frame_query(&mut ctx).unwrap());
    assert!(matches!(reader.end_frame_query(&mut ctx), Err(Error::BackendError(_))));
    assert!(!reader.is_open());
    assert_eq!(reader.slot_state(1), Some(SlotState::Idle));
    assert_eq!(reader.current_frame(), 1);
    assert_eq!(reader.outstanding(), 1);

    // The next frame reuses the slot and is measured normally
    device.fail_query_ends(false);
    assert!(measured_frame(&mut ctx, &mut reader, 2));
    assert_eq!(reader.current_frame(), 2);
    assert_eq!(reader.poll_completed(&mut ctx).unwrap(), 2);
    assert_eq!(reader.instances_drawn(), Some(2));
}

#[test]
fn test_poll_skips_open_bracket() {
    let (_device, mut ctx, mut reader) = setup(2);
    reader.begin_frame_query(&mut ctx).unwrap();

    assert_eq!(reader.poll_completed(&mut ctx).unwrap(), 0);
    assert_eq!(reader.last_completed_frame(), 0);
}

// ============================================================================
// Ordering and progress
// ============================================================================

#[test]
fn test_poll_stops_at_first_not_ready() {
    let (device, mut ctx, mut reader) = setup(3);

    device.set_query_latency(2);
    measured_frame(&mut ctx, &mut reader, 10);
    device.set_query_latency(0);
    measured_frame(&mut ctx, &mut reader, 20);

    // Frame 1 is ready but frame 0 is not: nothing may be consumed
    assert_eq!(reader.poll_completed(&mut ctx).unwrap(), 0);
    assert_eq!(reader.poll_completed(&mut ctx).unwrap(), 0);
    assert_eq!(reader.instances_drawn(), None);

    assert_eq!(reader.poll_completed(&mut ctx).unwrap(), 2);
    assert_eq!(reader.instances_drawn(), Some(20));
    assert_eq!(reader.last_completed_frame(), 2);
}

#[test]
fn test_completed_frame_is_monotonic_and_bounded() {
    let (device, mut ctx, mut reader) = setup(3);
    device.set_query_latency(1);

    let mut previous = 0;
    for frame in 0..40u32 {
        measured_frame(&mut ctx, &mut reader, frame % 7);
        if frame % 3 != 0 {
            reader.poll_completed(&mut ctx).unwrap();
        }

        assert!(reader.last_completed_frame() >= previous);
        assert!(reader.last_completed_frame() <= reader.current_frame());
        assert!(reader.outstanding() <= reader.ring_size());
        previous = reader.last_completed_frame();
    }
    assert!(previous > 0);
}

// ============================================================================
// Saturation
// ============================================================================

#[test]
fn test_saturated_ring_preserves_unread_slot() {
    let (device, mut ctx, mut reader) = setup(2);

    measured_frame(&mut ctx, &mut reader, 10);
    device.set_query_latency(3);
    measured_frame(&mut ctx, &mut reader, 20);

    // Third frame would reuse slot 0 before its result was read
    assert!(!measured_frame(&mut ctx, &mut reader, 30));
    assert_eq!(reader.current_frame(), 2);
    assert_eq!(reader.outstanding(), 2);
    assert_eq!(reader.slot_state(0), Some(SlotState::AwaitingResult));

    // Slot 0 still holds frame 0's counters
    assert_eq!(reader.poll_completed(&mut ctx).unwrap(), 1);
    assert_eq!(reader.instances_drawn(), Some(10));
    assert_eq!(reader.last_completed_frame(), 1);
}

#[test]
fn test_ring_recovers_after_saturation() {
    let (device, mut ctx, mut reader) = setup(2);
    device.stall_queries(true);

    assert!(measured_frame(&mut ctx, &mut reader, 1));
    assert!(measured_frame(&mut ctx, &mut reader, 2));
    for _ in 0..5 {
        assert!(!measured_frame(&mut ctx, &mut reader, 3));
        assert_eq!(reader.poll_completed(&mut ctx).unwrap(), 0);
    }

    device.stall_queries(false);
    assert_eq!(reader.poll_completed(&mut ctx).unwrap(), 2);
    assert_eq!(reader.outstanding(), 0);
    assert!(measured_frame(&mut ctx, &mut reader, 4));
    assert_eq!(reader.current_frame(), 3);
}
