//! Stock shader programs.
//!
//! Four ready-made 2D program variants covering the common draw
//! shapes: flat color, textured, instanced textured, and instanced
//! textured with a per-instance color. All of them take vertex
//! positions in surface pixels and a `u_transform` matrix, usually
//! the window's view transform.

use crate::error::Result;
use crate::factory::Factory;
use crate::program::{Program, Source};

const FLAT_VERTEX: &'static str = r#"
#version 450 core
in vec2 a_position;
uniform mat3 u_transform;

void main() {
    gl_Position = vec4(u_transform * vec3(a_position, 1.0), 1.0);
}
"#;

const FLAT_FRAGMENT: &'static str = r#"
#version 450 core
uniform vec4 u_color;
out vec4 o_color;

void main() {
    o_color = u_color;
}
"#;

const TEXTURE_VERTEX: &'static str = r#"
#version 450 core
in vec2 a_position;
in vec2 a_uv;
uniform mat3 u_transform;
out vec2 v_uv;

void main() {
    gl_Position = vec4(u_transform * vec3(a_position, 1.0), 1.0);
    v_uv = a_uv;
}
"#;

const TEXTURE_FRAGMENT: &'static str = r#"
#version 450 core
in vec2 v_uv;
uniform vec4 u_color;
uniform sampler2D u_sampler;
out vec4 o_color;

void main() {
    o_color = texture(u_sampler, v_uv) * u_color;
}
"#;

const INSTANCE_TEXTURE_VERTEX: &'static str = r#"
#version 450 core
in vec2 a_position;
in vec2 a_uv;
in vec2 a_offset;
uniform mat3 u_transform;
out vec2 v_uv;

void main() {
    gl_Position = vec4(u_transform * vec3(a_offset + a_position, 1.0), 1.0);
    v_uv = a_uv;
}
"#;

const INSTANCE_TEXTURE_COLOR_VERTEX: &'static str = r#"
#version 450 core
in vec2 a_position;
in vec2 a_uv;
in vec2 a_offset;
in vec4 a_color;
uniform mat3 u_transform;
out vec2 v_uv;
out vec4 v_color;

void main() {
    gl_Position = vec4(u_transform * vec3(a_offset + a_position, 1.0), 1.0);
    v_uv = a_uv;
    v_color = a_color;
}
"#;

const INSTANCE_TEXTURE_COLOR_FRAGMENT: &'static str = r#"
#version 450 core
in vec2 v_uv;
in vec4 v_color;
uniform sampler2D u_sampler;
out vec4 o_color;

void main() {
    o_color = texture(u_sampler, v_uv) * v_color;
}
"#;

/// Flat color fill.
pub fn flat(factory: &Factory) -> Result<Program> {
    factory.program(&Source {
        vertex: FLAT_VERTEX,
        fragment: FLAT_FRAGMENT,
        instanced: false,
        uniforms: &["u_transform", "u_color"],
        attributes: &["a_position"],
    })
}

/// Textured fill tinted by `u_color`.
pub fn texture(factory: &Factory) -> Result<Program> {
    factory.program(&Source {
        vertex: TEXTURE_VERTEX,
        fragment: TEXTURE_FRAGMENT,
        instanced: false,
        uniforms: &["u_transform", "u_color", "u_sampler"],
        attributes: &["a_position", "a_uv"],
    })
}

/// Textured fill repeated once per `a_offset` instance.
pub fn instanced_texture(factory: &Factory) -> Result<Program> {
    factory.program(&Source {
        vertex: INSTANCE_TEXTURE_VERTEX,
        fragment: TEXTURE_FRAGMENT,
        instanced: true,
        uniforms: &["u_transform", "u_color", "u_sampler"],
        attributes: &["a_position", "a_uv", "a_offset"],
    })
}

/// Textured fill with a per-instance offset and tint.
pub fn instanced_texture_color(factory: &Factory) -> Result<Program> {
    factory.program(&Source {
        vertex: INSTANCE_TEXTURE_COLOR_VERTEX,
        fragment: INSTANCE_TEXTURE_COLOR_FRAGMENT,
        instanced: true,
        uniforms: &["u_transform", "u_sampler"],
        attributes: &["a_position", "a_uv", "a_offset", "a_color"],
    })
}
