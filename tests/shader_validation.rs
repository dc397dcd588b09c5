//! Validates the shape shader with naga, the same front end wgpu uses, so a
//! WGSL mistake fails here instead of at pipeline creation.

use glowfolio::gpu::SHAPE_SHADER;
use naga::valid::{Capabilities, ValidationFlags, Validator};

#[test]
fn test_shape_shader_parses_and_validates() {
    let module = match naga::front::wgsl::parse_str(SHAPE_SHADER) {
        Ok(module) => module,
        Err(e) => panic!("WGSL parse error:\n{}", e.emit_to_string(SHAPE_SHADER)),
    };
    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    if let Err(e) = validator.validate(&module) {
        panic!("WGSL validation error: {e:?}");
    }
}

#[test]
fn test_shape_shader_entry_points() {
    let module = naga::front::wgsl::parse_str(SHAPE_SHADER).unwrap();
    let names: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
    assert!(names.contains(&"vs_main"));
    assert!(names.contains(&"fs_main"));
}

#[test]
fn test_instance_attributes_match_shader_inputs() {
    let module = naga::front::wgsl::parse_str(SHAPE_SHADER).unwrap();
    let vs = module
        .entry_points
        .iter()
        .find(|e| e.name == "vs_main")
        .unwrap();
    let shape_in = vs
        .function
        .arguments
        .iter()
        .find(|a| a.binding.is_none())
        .unwrap();
    let naga::TypeInner::Struct { members, .. } = &module.types[shape_in.ty].inner else {
        panic!("vertex input is not a struct");
    };
    assert_eq!(members.len(), glowfolio::gpu::ShapeInstance::ATTRIBUTES.len());
}
