//! Factory.

use crate::buffer;
use crate::gl;
use std::{collections, ffi, ptr};
use crate::sampler;
use crate::texture;

use crate::bitmap::Bitmap;
use crate::buffer::Buffer;
use crate::color::Color;
use crate::draw_call::DrawCall;
use crate::error::{Error, Result};
use crate::pipeline::Blend;
use crate::program::{Invocation, Program, Slot, Source, Stage, Uniform};
use crate::queue::Queue;
use crate::sampler::Sampler2;
use crate::texture::{Texture2, TextureArray};

/// OpenGL memory manager.
///
/// Owns the loaded GL function pointers; every GL call the crate
/// issues goes through here. Resources retired by handle drops are
/// reclaimed on the next [`collect_garbage`] pass.
///
/// [`collect_garbage`]: #method.collect_garbage
#[derive(Clone)]
pub struct Factory {
    /// Function pointers to the OpenGL backend.
    backend: gl::Backend,

    /// Released buffers arrive here to be destroyed.
    buffer_queue: Queue<buffer::Id>,

    /// Released textures arrive here to be destroyed.
    texture_queue: Queue<texture::Id>,

    /// Released GLSL programs arrive here to be destroyed.
    program_queue: Queue<u32>,
}

impl Factory {
    /// Constructor.
    pub fn new<F>(query_proc_address: F) -> Self
        where F: FnMut(&str) -> *const ()
    {
        Self {
            backend: gl::Backend::load(query_proc_address),
            buffer_queue: Queue::new(),
            texture_queue: Queue::new(),
            program_queue: Queue::new(),
        }
    }

    /// Returns the raw GL backend.
    pub(crate) fn backend(&self) -> &gl::Backend {
        &self.backend
    }

    /// Destroys every GPU object retired since the previous pass.
    ///
    /// Call once per frame or at teardown.
    pub fn collect_garbage(&self) {
        while let Some(id) = self.buffer_queue.next() {
            self.backend.delete_buffer(id);
        }
        while let Some(id) = self.texture_queue.next() {
            self.backend.delete_texture(id);
        }
        while let Some(id) = self.program_queue.next() {
            self.backend.delete_program(id);
        }
    }

    // Buffers

    /// Creates a vertex attribute buffer of `count` elements, each
    /// `width` `f32` lanes wide.
    ///
    /// When `data` is absent the buffer is zero-initialized; when
    /// present it must hold exactly `count * width` values.
    pub fn array_buffer(
        &self,
        count: usize,
        width: usize,
        data: Option<&[f32]>,
        usage: buffer::Usage,
    ) -> Buffer {
        let id = self.backend.gen_buffer();
        let target = buffer::Kind::Array.as_gl_enum();
        self.backend.bind_buffer(id, target);
        let size = count * width * 4;
        match data {
            Some(data) => {
                assert_eq!(
                    count * width,
                    data.len(),
                    "initial data must hold count * width values",
                );
                self.backend.buffer_data(target, size, data.as_ptr(), usage.as_gl_enum());
            }
            None => {
                let zeros = vec![0.0f32; count * width];
                self.backend.buffer_data(target, size, zeros.as_ptr(), usage.as_gl_enum());
            }
        }
        self.backend.bind_buffer(0, target);
        Buffer::new(id, buffer::Kind::Array, count, width, usage, self.buffer_queue.tx())
    }

    /// Creates an index buffer of `count` 32-bit unsigned indices.
    ///
    /// When `data` is absent the buffer is zero-initialized.
    pub fn index_buffer(
        &self,
        count: usize,
        data: Option<&[u32]>,
        usage: buffer::Usage,
    ) -> Buffer {
        let id = self.backend.gen_buffer();
        let target = buffer::Kind::Index.as_gl_enum();
        self.backend.bind_buffer(id, target);
        let size = count * 4;
        match data {
            Some(data) => {
                assert_eq!(count, data.len(), "initial data must hold count indices");
                self.backend.buffer_data(target, size, data.as_ptr(), usage.as_gl_enum());
            }
            None => {
                let zeros = vec![0u32; count];
                self.backend.buffer_data(target, size, zeros.as_ptr(), usage.as_gl_enum());
            }
        }
        self.backend.bind_buffer(0, target);
        Buffer::new(id, buffer::Kind::Index, count, 1, usage, self.buffer_queue.tx())
    }

    /// Overwrites a sub-range of a vertex attribute buffer, starting
    /// at element `offset`.
    ///
    /// Requires a valid `Array` handle and
    /// `offset + data.len() / width <= count`.
    pub fn write_buffer(&self, buffer: &Buffer, offset: usize, data: &[f32]) {
        assert_eq!(buffer::Kind::Array, buffer.kind(), "expected a vertex buffer");
        self.check_write(buffer, offset, data.len());
        let target = buffer.kind().as_gl_enum();
        self.backend.bind_buffer(buffer.id(), target);
        self.backend.buffer_sub_data(
            target,
            offset * buffer.width() * 4,
            data.len() * 4,
            data.as_ptr(),
        );
        self.backend.bind_buffer(0, target);
    }

    /// Overwrites a sub-range of an index buffer, starting at index
    /// `offset`.
    pub fn write_index_buffer(&self, buffer: &Buffer, offset: usize, data: &[u32]) {
        assert_eq!(buffer::Kind::Index, buffer.kind(), "expected an index buffer");
        self.check_write(buffer, offset, data.len());
        let target = buffer.kind().as_gl_enum();
        self.backend.bind_buffer(buffer.id(), target);
        self.backend.buffer_sub_data(target, offset * 4, data.len() * 4, data.as_ptr());
        self.backend.bind_buffer(0, target);
    }

    fn check_write(&self, buffer: &Buffer, offset: usize, lanes: usize) {
        assert!(buffer.valid(), "write to a released buffer");
        assert_eq!(
            0,
            lanes % buffer.width(),
            "write data must be a whole number of elements",
        );
        let elements = lanes / buffer.width();
        assert!(
            offset + elements <= buffer.count(),
            "buffer write out of range: {} + {} > {}",
            offset, elements, buffer.count(),
        );
    }

    // Programs

    /// Compiles and links a GLSL program and resolves its declared
    /// variable names to slots.
    ///
    /// Compile and link failures carry the driver's diagnostic text.
    /// A declared name the shader text does not actually use resolves
    /// to the absent-slot sentinel instead of failing the build.
    pub fn program(&self, source: &Source) -> Result<Program> {
        let vertex = self.compile(Stage::Vertex, source.vertex)?;
        let fragment = match self.compile(Stage::Fragment, source.fragment) {
            Ok(id) => id,
            Err(err) => {
                self.backend.delete_shader(vertex);
                return Err(err);
            }
        };

        let id = self.backend.create_program();
        self.backend.attach_shader(id, vertex);
        self.backend.attach_shader(id, fragment);
        let linked = self.backend.link_program(id);
        self.backend.delete_shader(vertex);
        self.backend.delete_shader(fragment);
        if !linked {
            let log = self.backend.program_info_log(id);
            self.backend.delete_program(id);
            return Err(Error::Link { log });
        }

        let mut locations = collections::HashMap::with_capacity(
            source.uniforms.len() + source.attributes.len(),
        );
        for &name in source.uniforms {
            let cname = variable_name(name);
            let location = self.backend.get_uniform_location(id, &cname);
            locations.insert(name.to_string(), Slot::new(location));
        }
        for &name in source.attributes {
            let cname = variable_name(name);
            let location = self.backend.get_attrib_location(id, &cname);
            locations.insert(name.to_string(), Slot::new(location));
        }

        Ok(Program::new(id, source.instanced, locations, self.program_queue.tx()))
    }

    fn compile(&self, stage: Stage, source: &str) -> Result<u32> {
        let source = ffi::CString::new(source).map_err(|_| Error::Compile {
            stage,
            log: "source text contains an interior NUL byte".to_string(),
        })?;
        let id = self.backend.create_shader(stage.as_gl_enum());
        self.backend.shader_source(id, &source);
        if self.backend.compile_shader(id) {
            Ok(id)
        } else {
            let log = self.backend.shader_info_log(id);
            self.backend.delete_shader(id);
            Err(Error::Compile { stage, log })
        }
    }

    // Textures

    /// Creates a 2D RGBA8 texture.
    ///
    /// Level 0 is uploaded from `pixels` when present; the pixel
    /// count must then equal `width * height`.
    pub fn texture2(
        &self,
        width: u32,
        height: u32,
        pixels: Option<&[Color]>,
        sampler: &Sampler2,
    ) -> Texture2 {
        let id = self.backend.gen_texture();
        self.backend.bind_texture(gl::TEXTURE_2D, id);
        self.backend.tex_parameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, sampler.wrap_s.as_gl_enum());
        self.backend.tex_parameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, sampler.wrap_t.as_gl_enum());
        self.backend.tex_parameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, sampler.min_filter.as_gl_enum());
        self.backend.tex_parameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, sampler.mag_filter.as_gl_enum());
        let data = match pixels {
            Some(pixels) => {
                assert_eq!(
                    (width * height) as usize,
                    pixels.len(),
                    "pixel data must hold width * height pixels",
                );
                pixels.as_ptr() as *const _
            }
            None => ptr::null(),
        };
        self.backend.tex_image_2d(
            gl::TEXTURE_2D,
            gl::RGBA8,
            width,
            height,
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            data,
        );
        self.backend.bind_texture(gl::TEXTURE_2D, 0);
        Texture2::new(id, width, height, self.texture_queue.tx())
    }

    /// Creates a 2D texture from a bitmap's pixels with default
    /// sampling.
    pub fn texture_from_bitmap(&self, bitmap: &Bitmap) -> Texture2 {
        self.texture2(
            bitmap.width(),
            bitmap.height(),
            Some(bitmap.pixels()),
            &Sampler2::default(),
        )
    }

    /// Generates the mip chain for a texture.
    ///
    /// Level 0 must already hold data.
    pub fn generate_mipmaps(&self, texture: &Texture2, max_level: u32, lod_bias: f32) {
        self.backend.bind_texture(gl::TEXTURE_2D, texture.id());
        self.backend.tex_parameteri(gl::TEXTURE_2D, gl::TEXTURE_MAX_LEVEL, max_level);
        self.backend.tex_parameterf(gl::TEXTURE_2D, gl::TEXTURE_LOD_BIAS, lod_bias);
        self.backend.generate_mipmap(gl::TEXTURE_2D);
        self.backend.bind_texture(gl::TEXTURE_2D, 0);
    }

    /// Creates a 2D RGBA8 texture array with immutable storage.
    pub fn texture_array(
        &self,
        width: u32,
        height: u32,
        layers: u32,
        levels: u32,
    ) -> TextureArray {
        let id = self.backend.gen_texture();
        self.backend.bind_texture(gl::TEXTURE_2D_ARRAY, id);
        self.backend.tex_storage_3d(gl::TEXTURE_2D_ARRAY, levels, gl::RGBA8, width, height, layers);
        self.backend.tex_parameteri(
            gl::TEXTURE_2D_ARRAY,
            gl::TEXTURE_WRAP_S,
            sampler::Wrap::Repeat.as_gl_enum(),
        );
        self.backend.tex_parameteri(
            gl::TEXTURE_2D_ARRAY,
            gl::TEXTURE_WRAP_T,
            sampler::Wrap::Repeat.as_gl_enum(),
        );
        self.backend.tex_parameteri(
            gl::TEXTURE_2D_ARRAY,
            gl::TEXTURE_MIN_FILTER,
            sampler::Filter::NearestMipmapLinear.as_gl_enum(),
        );
        self.backend.tex_parameteri(
            gl::TEXTURE_2D_ARRAY,
            gl::TEXTURE_MAG_FILTER,
            sampler::Filter::Nearest.as_gl_enum(),
        );
        self.backend.bind_texture(gl::TEXTURE_2D_ARRAY, 0);
        TextureArray::new(id, width, height, layers, levels, self.texture_queue.tx())
    }

    /// Uploads a bitmap into one layer of a texture array.
    ///
    /// The bitmap dimensions must equal the array dimensions and
    /// `layer` must be in range.
    pub fn write_texture_array_layer(
        &self,
        array: &TextureArray,
        bitmap: &Bitmap,
        layer: u32,
    ) {
        assert!(
            bitmap.width() == array.width() && bitmap.height() == array.height(),
            "bitmap is {}x{} but the array holds {}x{} layers",
            bitmap.width(), bitmap.height(), array.width(), array.height(),
        );
        assert!(layer < array.layers(), "layer {} out of range", layer);
        self.backend.bind_texture(gl::TEXTURE_2D_ARRAY, array.id());
        self.backend.tex_sub_image_3d_layer(
            gl::TEXTURE_2D_ARRAY,
            layer,
            array.width(),
            array.height(),
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            bitmap.as_bytes().as_ptr() as *const _,
        );
        self.backend.bind_texture(gl::TEXTURE_2D_ARRAY, 0);
    }

    /// Generates the mip chain for every layer of a texture array.
    pub fn generate_array_mipmaps(&self, array: &TextureArray, lod_bias: f32) {
        self.backend.bind_texture(gl::TEXTURE_2D_ARRAY, array.id());
        self.backend.tex_parameterf(gl::TEXTURE_2D_ARRAY, gl::TEXTURE_LOD_BIAS, lod_bias);
        self.backend.generate_mipmap(gl::TEXTURE_2D_ARRAY);
        self.backend.bind_texture(gl::TEXTURE_2D_ARRAY, 0);
    }

    /// Creates a 2D texture view aliasing one layer of a texture
    /// array's storage.
    ///
    /// The view keeps the array's storage alive for its own lifetime.
    pub fn array_layer_view(&self, array: &TextureArray, layer: u32) -> Texture2 {
        assert!(layer < array.layers(), "layer {} out of range", layer);
        let id = self.backend.gen_texture();
        self.backend.texture_view_layer(id, array.id(), gl::RGBA8, array.levels(), layer);
        self.backend.bind_texture(gl::TEXTURE_2D, id);
        self.backend.tex_parameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_WRAP_S,
            sampler::Wrap::ClampToBorder.as_gl_enum(),
        );
        self.backend.tex_parameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_WRAP_T,
            sampler::Wrap::ClampToBorder.as_gl_enum(),
        );
        // A single-level view is mipmap-incomplete under the default
        // minification filter.
        let min_filter = if array.levels() > 1 {
            sampler::Filter::LinearMipmapLinear
        } else {
            sampler::Filter::Nearest
        };
        self.backend.tex_parameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, min_filter.as_gl_enum());
        self.backend.tex_parameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_MAG_FILTER,
            sampler::Filter::Nearest.as_gl_enum(),
        );
        self.backend.bind_texture(gl::TEXTURE_2D, 0);
        Texture2::view(id, array, self.texture_queue.tx())
    }

    // Pipeline state

    /// Clears the color buffer to a solid color.
    pub fn clear(&self, color: Color) {
        let channels = color.to_floats();
        self.backend.clear_color(channels[0], channels[1], channels[2], channels[3]);
        self.backend.clear(gl::COLOR_BUFFER_BIT);
    }

    /// Replaces the blending mode.
    pub fn set_blend(&self, blend: Blend) {
        match blend.as_gl_enums_if_enabled() {
            Some((src, dst)) => {
                self.backend.enable(gl::BLEND);
                self.backend.blend_func(src, dst);
                self.backend.blend_equation(gl::FUNC_ADD);
            }
            None => {
                self.backend.disable(gl::BLEND);
            }
        }
    }

    /// Sets the viewport region.
    pub fn viewport(&self, x: u32, y: u32, w: u32, h: u32) {
        self.backend.viewport(x, y, w, h);
    }

    /// Sets the rasterized line width in pixels.
    pub fn line_width(&self, width: f32) {
        self.backend.line_width(width);
    }

    /// Sets the rasterized point size in pixels.
    pub fn point_size(&self, size: f32) {
        self.backend.point_size(size);
    }

    // Draw dispatch

    /// Performs a draw call.
    ///
    /// Everything the draw consumes comes from `invocation`; all
    /// bindings it makes are undone before returning, so consecutive
    /// draws never observe each other's state.
    pub fn draw(&self, invocation: &Invocation, call: &DrawCall) {
        let program = invocation.program;
        self.backend.use_program(program.id());

        for &(slot, ref uniform) in invocation.uniforms.iter() {
            self.upload_uniform(slot, uniform);
        }

        for &(slot, ref attribute) in invocation.attributes.iter() {
            let location = match slot.location() {
                Some(location) => location,
                None => continue,
            };
            let buffer = attribute.buffer;
            assert!(buffer.valid(), "attribute array bound to a released buffer");
            assert_eq!(
                buffer::Kind::Array,
                buffer.kind(),
                "attribute arrays must be vertex buffers",
            );
            self.backend.bind_buffer(buffer.id(), gl::ARRAY_BUFFER);
            self.backend.enable_vertex_attrib_array(location);
            self.backend.vertex_attrib_pointer(
                location,
                buffer.width() as i32,
                gl::FLOAT,
                false,
                0,
                0,
            );
            self.backend.vertex_attrib_divisor(location, attribute.rate.divisor());
        }
        self.backend.bind_buffer(0, gl::ARRAY_BUFFER);

        if let Some(ref binding) = invocation.texture {
            self.backend.active_texture(0);
            self.backend.bind_texture(binding.target(), binding.id());
        }

        if let Some(indices) = invocation.indices {
            assert!(indices.valid(), "index array bound to a released buffer");
            assert_eq!(
                buffer::Kind::Index,
                indices.kind(),
                "index arrays must be index buffers",
            );
            self.backend.bind_buffer(indices.id(), gl::ELEMENT_ARRAY_BUFFER);
        }

        let mode = call.primitive.as_gl_enum();
        let instances = if program.instanced() {
            Some(invocation.instance_count().unwrap_or(0))
        } else {
            None
        };
        match (invocation.indices.is_some(), instances) {
            (false, None) => {
                self.backend.draw_arrays(mode, call.offset, call.count)
            }
            (false, Some(n)) => {
                self.backend.draw_arrays_instanced(mode, call.offset, call.count, n)
            }
            (true, None) => {
                self.backend.draw_elements(mode, call.offset, call.count)
            }
            (true, Some(n)) => {
                self.backend.draw_elements_instanced(mode, call.offset, call.count, n)
            }
        }

        if invocation.indices.is_some() {
            self.backend.bind_buffer(0, gl::ELEMENT_ARRAY_BUFFER);
        }
        if let Some(ref binding) = invocation.texture {
            self.backend.bind_texture(binding.target(), 0);
        }
        for &(slot, _) in invocation.attributes.iter() {
            if let Some(location) = slot.location() {
                self.backend.vertex_attrib_divisor(location, 0);
                self.backend.disable_vertex_attrib_array(location);
            }
        }
        self.backend.use_program(0);
    }

    fn upload_uniform(&self, slot: Slot, uniform: &Uniform) {
        let location = match slot.location() {
            Some(location) => location,
            None => return,
        };
        match *uniform {
            Uniform::Color(color) => {
                self.backend.uniform_4f(location, color.to_floats())
            }
            Uniform::Mat2(matrix) => {
                self.backend.uniform_matrix_2fv(location, &matrix.to_cols_array())
            }
            Uniform::Mat3(matrix) => {
                self.backend.uniform_matrix_3fv(location, &matrix.to_cols_array())
            }
            Uniform::Mat4(matrix) => {
                self.backend.uniform_matrix_4fv(location, &matrix.to_cols_array())
            }
            Uniform::Vec2(vector) => {
                self.backend.uniform_2f(location, vector.to_array())
            }
            Uniform::Vec3(vector) => {
                self.backend.uniform_3f(location, vector.to_array())
            }
        }
    }
}

fn variable_name(name: &str) -> ffi::CString {
    ffi::CString::new(name).expect("shader variable names must not contain NUL")
}
