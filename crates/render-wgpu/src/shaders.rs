/// WGSL shader shared by every scene pipeline.
///
/// `normal.w` is 1 for lit vertices and 0 for flat ones, so one fragment
/// entry point serves meshes, glows, rings and stars.
pub const SCENE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    stars_model: mat4x4<f32>,
    light_dir: vec4<f32>,
    light_color: vec4<f32>,
    ambient: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec4<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) lit: f32,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(vertex.position, 1.0);
    out.world_normal = vertex.normal.xyz;
    out.lit = vertex.normal.w;
    out.color = vertex.color;
    return out;
}

@vertex
fn vs_stars(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world_pos = uniforms.stars_model * vec4<f32>(vertex.position, 1.0);
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = vec3<f32>(0.0, 1.0, 0.0);
    out.lit = 0.0;
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let diffuse = max(dot(n, normalize(uniforms.light_dir.xyz)), 0.0);
    let lighting = uniforms.ambient.rgb + uniforms.light_color.rgb * diffuse;
    let rgb = mix(in.color.rgb, in.color.rgb * lighting, in.lit);
    return vec4<f32>(rgb, in.color.a);
}
"#;
