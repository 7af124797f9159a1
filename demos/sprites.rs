extern crate easel;
extern crate env_logger;

use easel::{Attribute, Bitmap, Color, DrawCall, Invocation, Key, Uniform, Window};
use easel::buffer::Usage;
use easel::pipeline::Blend;
use easel::texture::TextureBinding;

const SPRITES: usize = 64;
const SIZE: f32 = 24.0;

fn main() {
    let _ = env_logger::init();

    let mut window = Window::new(800, 600, "sprites").unwrap();
    let factory = window.factory();
    let program = window.instanced_texture_color_program().unwrap();

    // One sprite quad, indexed as two triangles.
    let positions = factory.array_buffer(
        4,
        2,
        Some(&[
            0.0, 0.0,
            SIZE, 0.0,
            SIZE, SIZE,
            0.0, SIZE,
        ]),
        Usage::StaticDraw,
    );
    let uvs = factory.array_buffer(
        4,
        2,
        Some(&[
            0.0, 0.0,
            1.0, 0.0,
            1.0, 1.0,
            0.0, 1.0,
        ]),
        Usage::StaticDraw,
    );
    let indices = factory.index_buffer(6, Some(&[0, 1, 2, 0, 2, 3]), Usage::StaticDraw);

    // A two layer atlas; every sprite samples the second layer
    // through a view.
    let atlas = factory.texture_array(32, 32, 2, 1);
    factory.write_texture_array_layer(&atlas, &Bitmap::solid(32, 32, Color::WHITE), 0);
    let mut dot = Bitmap::solid(32, 32, Color::TRANSPARENT);
    dot.blit(8, 8, &Bitmap::solid(16, 16, Color::WHITE));
    factory.write_texture_array_layer(&atlas, &dot, 1);
    let sprite_sheet = factory.array_layer_view(&atlas, 1);

    let mut offset_data = Vec::with_capacity(SPRITES * 2);
    let mut color_data = Vec::with_capacity(SPRITES * 4);
    for i in 0 .. SPRITES {
        let column = (i % 8) as f32;
        let row = (i / 8) as f32;
        offset_data.push(80.0 + column * 80.0);
        offset_data.push(60.0 + row * 64.0);
        let tint = Color::new(
            32 + (column * 28.0) as u8,
            32 + (row * 28.0) as u8,
            200,
            255,
        ).to_floats();
        color_data.extend_from_slice(&tint);
    }
    let offsets = factory.array_buffer(SPRITES, 2, Some(&offset_data), Usage::DynamicDraw);
    let colors = factory.array_buffer(SPRITES, 4, Some(&color_data), Usage::StaticDraw);

    let transform = program.slot("u_transform").unwrap();
    let position = program.slot("a_position").unwrap();
    let uv = program.slot("a_uv").unwrap();
    let offset = program.slot("a_offset").unwrap();
    let color = program.slot("a_color").unwrap();

    let mut phase = 0.0f32;
    while !window.should_close() {
        window.begin_frame();
        window.poll_events();
        if window.key_pressed(Key::Escape) {
            break;
        }

        // Bob each row on its own phase.
        phase += window.frame_time();
        for i in 0 .. SPRITES {
            let row = (i / 8) as f32;
            offset_data[i * 2 + 1] =
                60.0 + row * 64.0 + 12.0 * (phase * 2.0 + row).sin();
        }
        factory.write_buffer(&offsets, 0, &offset_data);

        window.clear(Color::new(12, 12, 24, 255));
        window.set_blend(Blend::Alpha);

        let mut invocation = Invocation::new(&program);
        invocation.attribute(position, Attribute::per_vertex(&positions));
        invocation.attribute(uv, Attribute::per_vertex(&uvs));
        invocation.attribute(offset, Attribute::per_instance(&offsets));
        invocation.attribute(color, Attribute::per_instance(&colors));
        invocation.uniform(transform, Uniform::Mat3(window.view()));
        invocation.texture = Some(TextureBinding::Two(&sprite_sheet));
        invocation.indices = Some(&indices);
        factory.draw(&invocation, &DrawCall::triangles(2, 0));

        window.end_frame();
        factory.collect_garbage();
    }
}
