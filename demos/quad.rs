extern crate easel;
extern crate env_logger;

use easel::{Attribute, Bitmap, Color, DrawCall, Invocation, Key, Uniform, Window};
use easel::buffer::Usage;
use easel::pipeline::Blend;
use easel::texture::TextureBinding;

fn checkerboard(size: u32, cell: u32) -> Bitmap {
    let mut bitmap = Bitmap::solid(size, size, Color::WHITE);
    for y in 0 .. size {
        for x in 0 .. size {
            if (x / cell + y / cell) % 2 == 0 {
                bitmap.set_pixel(x, y, Color::new(40, 40, 40, 255));
            }
        }
    }
    bitmap
}

fn main() {
    let _ = env_logger::init();

    let mut window = Window::new(800, 600, "quad").unwrap();
    let factory = window.factory();
    let program = window.texture_program().unwrap();

    let positions = factory.array_buffer(
        4,
        2,
        Some(&[
            100.0, 100.0,
            700.0, 100.0,
            700.0, 500.0,
            100.0, 500.0,
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

    let texture = factory.texture_from_bitmap(&checkerboard(64, 8));
    factory.generate_mipmaps(&texture, 4, 0.0);

    let transform = program.slot("u_transform").unwrap();
    let tint = program.slot("u_color").unwrap();
    let position = program.slot("a_position").unwrap();
    let uv = program.slot("a_uv").unwrap();

    while !window.should_close() {
        window.begin_frame();
        window.poll_events();
        if window.key_pressed(Key::Escape) {
            break;
        }

        window.clear(Color::BLACK);
        window.set_blend(Blend::Alpha);

        let mut invocation = Invocation::new(&program);
        invocation.attribute(position, Attribute::per_vertex(&positions));
        invocation.attribute(uv, Attribute::per_vertex(&uvs));
        invocation.uniform(transform, Uniform::Mat3(window.view()));
        invocation.uniform(tint, Uniform::Color(Color::WHITE));
        invocation.texture = Some(TextureBinding::Two(&texture));
        factory.draw(&invocation, &DrawCall::quad(0));

        window.end_frame();
        factory.collect_garbage();
    }
}
