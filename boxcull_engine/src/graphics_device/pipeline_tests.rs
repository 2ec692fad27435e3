use super::*;

#[test]
fn test_primitive_count() {
    assert_eq!(PrimitiveTopology::TriangleList.primitive_count(36), 12);
    assert_eq!(PrimitiveTopology::TriangleStrip.primitive_count(5), 3);
    assert_eq!(PrimitiveTopology::TriangleStrip.primitive_count(1), 0);
    assert_eq!(PrimitiveTopology::LineList.primitive_count(8), 4);
}

#[test]
fn test_shader_desc_new() {
    let shader = ShaderDesc::new(ShaderStage::Compute, "CSMain", vec![1, 2, 3]);
    assert_eq!(shader.stage, ShaderStage::Compute);
    assert_eq!(shader.entry_point, "CSMain");
    assert_eq!(shader.code.len(), 3);
}
