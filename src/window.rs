//! Window surface and frame lifecycle.

use crate::prefabs;
use std::{ops, time};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::factory::Factory;
use glam::{Mat3, Vec3};
use crate::input::{Input, Key, MouseButton};
use crate::pipeline::Blend;
use crate::program::Program;

use glutin::GlContext;

/// Owner of the rendering surface, its GL context, and input state.
///
/// Events are delivered to the window that owns the event queue;
/// there is no process-wide "current window" anywhere in the crate.
/// All GPU resources must be built through [`factory`] while the
/// window is alive.
///
/// [`factory`]: #method.factory
pub struct Window {
    events_loop: glutin::EventsLoop,
    gl_window: glutin::GlWindow,
    factory: Factory,
    input: Input,
    width: u32,
    height: u32,
    view: Mat3,
    last_frame: time::Instant,
    frame_time: time::Duration,
    should_close: bool,

    /// Core contexts refuse to draw with VAO 0 bound; this one stays
    /// bound for the window's whole life.
    vao: u32,
}

impl Window {
    /// Opens a window with a GL 4.5 core context current on the
    /// calling thread.
    ///
    /// One warm-up frame runs before returning, so a successful
    /// return means the context can actually present.
    pub fn new(width: u32, height: u32, title: &str) -> Result<Self> {
        let events_loop = glutin::EventsLoop::new();
        let window_builder = glutin::WindowBuilder::new()
            .with_dimensions(width, height)
            .with_title(title);
        let context_builder = glutin::ContextBuilder::new()
            .with_gl(glutin::GlRequest::Specific(glutin::Api::OpenGl, (4, 5)))
            .with_vsync(false);
        let gl_window =
            glutin::GlWindow::new(window_builder, context_builder, &events_loop)
                .map_err(|err| Error::Window(err.to_string()))?;
        unsafe {
            gl_window
                .make_current()
                .map_err(|err| Error::Window(err.to_string()))?;
        }
        let factory = Factory::new(|sym| gl_window.get_proc_address(sym));

        let vao = factory.backend().gen_vertex_array();
        factory.backend().bind_vertex_array(vao);

        let mut window = Window {
            events_loop,
            gl_window,
            factory,
            input: Input::new(),
            width,
            height,
            view: view_transform(width, height),
            last_frame: time::Instant::now(),
            frame_time: time::Duration::new(0, 0),
            should_close: false,
            vao,
        };
        info!("window created: {}x{} {:?}", width, height, title);

        window.begin_frame();
        window.poll_events();
        window.end_frame();

        Ok(window)
    }

    /// Returns a factory for building resources under this window's
    /// context.
    pub fn factory(&self) -> Factory {
        self.factory.clone()
    }

    /// Returns true once the user has asked the window to close.
    pub fn should_close(&self) -> bool {
        self.should_close
    }

    /// Starts a frame.
    ///
    /// Computes the time elapsed since the previous `begin_frame`,
    /// refreshes the surface size, resets the viewport, and
    /// recomputes the view transform.
    pub fn begin_frame(&mut self) {
        let now = time::Instant::now();
        self.frame_time = now - self.last_frame;
        self.last_frame = now;
        if let Some((width, height)) = self.gl_window.get_inner_size() {
            self.width = width;
            self.height = height;
        }
        self.factory.viewport(0, 0, self.width, self.height);
        self.view = view_transform(self.width, self.height);
    }

    /// Presents the frame.
    pub fn end_frame(&mut self) {
        if let Err(err) = self.gl_window.swap_buffers() {
            error!("swap_buffers failed: {}", err);
        }
    }

    /// Pumps the event queue into the input state tables.
    ///
    /// The previous-frame snapshot rotates first, so a key that went
    /// down during this poll reads as pressed until the next poll.
    /// Scroll motion is zeroed first and accumulated over the events
    /// of this poll only.
    pub fn poll_events(&mut self) {
        self.input.begin_poll();
        let input = &mut self.input;
        let should_close = &mut self.should_close;
        self.events_loop.poll_events(|event| {
            let event = match event {
                glutin::Event::WindowEvent { event, .. } => event,
                _ => return,
            };
            match event {
                glutin::WindowEvent::Closed => {
                    *should_close = true;
                }
                glutin::WindowEvent::KeyboardInput { input: key, .. } => {
                    if let Some(code) = key.virtual_keycode {
                        let down = key.state == glutin::ElementState::Pressed;
                        input.record_key(code, down);
                    }
                }
                glutin::WindowEvent::MouseInput { state, button, .. } => {
                    let down = state == glutin::ElementState::Pressed;
                    input.record_button(button, down);
                }
                glutin::WindowEvent::CursorMoved { position: (x, y), .. } => {
                    input.record_cursor(x, y);
                }
                glutin::WindowEvent::MouseWheel { delta, .. } => match delta {
                    glutin::MouseScrollDelta::LineDelta(dx, dy) => {
                        input.record_scroll(dx, dy);
                    }
                    glutin::MouseScrollDelta::PixelDelta(dx, dy) => {
                        input.record_scroll(dx, dy);
                    }
                },
                _ => {}
            }
        });
    }

    /// Returns true while the key is held.
    pub fn key_down(&self, key: Key) -> bool {
        self.input.key_down(key)
    }

    /// Returns true for the one poll in which the key went down.
    pub fn key_pressed(&self, key: Key) -> bool {
        self.input.key_pressed(key)
    }

    /// Returns true while the mouse button is held.
    pub fn button_down(&self, button: MouseButton) -> bool {
        self.input.button_down(button)
    }

    /// Returns true for the one poll in which the button went down.
    pub fn button_pressed(&self, button: MouseButton) -> bool {
        self.input.button_pressed(button)
    }

    /// Returns the cursor position in surface pixels.
    pub fn cursor_position(&self) -> (f64, f64) {
        self.input.cursor()
    }

    /// Returns the scroll motion accumulated by the last poll.
    pub fn scroll_delta(&self) -> (f32, f32) {
        self.input.scroll()
    }

    /// Returns the surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the transform from surface pixels to clip space.
    ///
    /// The origin maps to the bottom-left corner.
    pub fn view(&self) -> Mat3 {
        self.view
    }

    /// Returns the previous frame's duration in seconds.
    pub fn frame_time(&self) -> f32 {
        self.frame_time.as_secs() as f32
            + self.frame_time.subsec_nanos() as f32 * 1e-9
    }

    /// Returns the presentation rate implied by the previous frame.
    pub fn fps(&self) -> f32 {
        1.0 / self.frame_time()
    }

    /// Replaces the blending mode.
    pub fn set_blend(&self, blend: Blend) {
        self.factory.set_blend(blend);
    }

    /// Sets the rasterized line width in pixels.
    pub fn set_line_width(&self, width: f32) {
        self.factory.line_width(width);
    }

    /// Sets the rasterized point size in pixels.
    pub fn set_point_size(&self, size: f32) {
        self.factory.point_size(size);
    }

    /// Fills the surface with a solid color.
    pub fn clear(&self, color: Color) {
        self.factory.clear(color);
    }

    /// Builds the stock flat color program.
    pub fn flat_program(&self) -> Result<Program> {
        prefabs::flat(&self.factory)
    }

    /// Builds the stock textured program.
    pub fn texture_program(&self) -> Result<Program> {
        prefabs::texture(&self.factory)
    }

    /// Builds the stock instanced textured program.
    pub fn instanced_texture_program(&self) -> Result<Program> {
        prefabs::instanced_texture(&self.factory)
    }

    /// Builds the stock instanced textured program with per-instance
    /// colors.
    pub fn instanced_texture_color_program(&self) -> Result<Program> {
        prefabs::instanced_texture_color(&self.factory)
    }
}

impl ops::Drop for Window {
    fn drop(&mut self) {
        self.factory.collect_garbage();
        self.factory.backend().bind_vertex_array(0);
        self.factory.backend().delete_vertex_array(self.vao);
    }
}

/// Maps surface pixels to clip space: `(0, 0)` to the bottom-left
/// corner, `(width, height)` to the top-right.
fn view_transform(width: u32, height: u32) -> Mat3 {
    Mat3::from_cols(
        Vec3::new(2.0 / width as f32, 0.0, 0.0),
        Vec3::new(0.0, 2.0 / height as f32, 0.0),
        Vec3::new(-1.0, -1.0, 1.0),
    )
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use super::view_transform;

    #[test]
    fn view_maps_surface_corners_to_clip_corners() {
        let view = view_transform(512, 256);
        assert_eq!(Vec3::new(-1.0, -1.0, 1.0), view * Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(Vec3::new(1.0, 1.0, 1.0), view * Vec3::new(512.0, 256.0, 1.0));
        assert_eq!(Vec3::new(0.0, 0.0, 1.0), view * Vec3::new(256.0, 128.0, 1.0));
    }
}
