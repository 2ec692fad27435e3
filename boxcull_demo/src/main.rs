//! Headless boxcull demo
//!
//! Spins a camera in the middle of a random box field for a fixed number of
//! frames on the mock device and reports how many boxes the GPU culled.
//!
//! Usage: `boxcull_demo [cpu|gpu] [pass-all]`

use boxcull_engine::boxcull::camera::Camera;
use boxcull_engine::boxcull::device::mock_graphics_device::MockGraphicsDevice;
use boxcull_engine::boxcull::device::{ShaderDesc, ShaderStage};
use boxcull_engine::boxcull::scene::random_params;
use boxcull_engine::boxcull::{
    self, BoxShaders, CullMode, CullingConfig, InstancedBoxes, InstancedBoxesDesc,
};
use boxcull_engine::glam::{Mat4, Vec3};
use boxcull_engine::{engine_info, engine_warn};
use rand::Rng;

const INSTANCE_COUNT: usize = 1000;
const FRAME_COUNT: u32 = 240;
const FRAME_TIME: f32 = 1.0 / 60.0;
const FIELD_HALF_EXTENT: f32 = 10.0;

fn main() -> boxcull::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = if args.iter().any(|a| a == "cpu") { CullMode::Cpu } else { CullMode::Gpu };
    let frustum_test = !args.iter().any(|a| a == "pass-all");

    run(mode, frustum_test, FRAME_COUNT)
}

/// Drive `frame_count` frames, logging the culled count every 30 frames
fn run(mode: CullMode, frustum_test: bool, frame_count: u32) -> boxcull::Result<()> {
    let mut rng = rand::thread_rng();
    let positions: Vec<Vec3> = (0..INSTANCE_COUNT)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-FIELD_HALF_EXTENT..=FIELD_HALF_EXTENT),
                rng.gen_range(-FIELD_HALF_EXTENT..=FIELD_HALF_EXTENT),
                rng.gen_range(-FIELD_HALF_EXTENT..=FIELD_HALF_EXTENT),
            )
        })
        .collect();
    let params = random_params(&mut rng, INSTANCE_COUNT, 32.0, 3);

    // Bytecode is opaque to the mock device
    let shaders = BoxShaders {
        vertex: ShaderDesc::new(ShaderStage::Vertex, "main", Vec::new()),
        pixel: ShaderDesc::new(ShaderStage::Pixel, "main", Vec::new()),
        cull: ShaderDesc::new(ShaderStage::Compute, "main", Vec::new()),
    };

    let config = CullingConfig {
        mode,
        frustum_test,
        ..Default::default()
    };

    let mut device = MockGraphicsDevice::new();
    // Results arrive two polls after the draw, like a GPU a couple of frames behind
    device.set_query_latency(2);

    let mut boxes = InstancedBoxes::new(
        &mut device,
        config,
        InstancedBoxesDesc { positions, params, shaders },
    )?;
    let mut ctx = device.command_list();

    // Reversed depth: near and far swapped
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 16.0 / 9.0, 100.0, 0.1);

    for frame in 0..frame_count {
        let elapsed = frame as f32 * FRAME_TIME;
        let yaw = elapsed * 0.5;
        let target = Vec3::new(yaw.sin(), 0.0, -yaw.cos());
        let camera = Camera::look_at(Vec3::ZERO, target, projection);

        if let Err(err) = boxes.frame(&mut ctx, &camera, elapsed) {
            engine_warn!("boxcull::Demo", "frame {} skipped: {}", frame, err);
            continue;
        }
        boxes.render(&mut ctx)?;

        if frame % 30 == 0 {
            engine_info!(
                "boxcull::Demo",
                "frame {:4}  yaw {:5.2}  culled {:4} / {}  queries in flight {}",
                frame,
                yaw,
                boxes.culled_count(),
                boxes.instance_count(),
                boxes.outstanding_queries()
            );
        }
    }

    engine_info!(
        "boxcull::Demo",
        "done: {} frames, {} measured, last culled count {}",
        boxes.frames(),
        boxes.measured_frames(),
        boxes.culled_count()
    );
    Ok(())
}
