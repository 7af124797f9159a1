//! A thin windowed layer over OpenGL: buffers, textures, shader
//! programs, and draw dispatch, with every draw described by one
//! self-contained invocation value.

extern crate arrayvec;
extern crate crossbeam_channel;
extern crate glam;
extern crate glutin;
extern crate image;
#[macro_use] extern crate log;
extern crate thiserror;
extern crate vec_map;

mod factory;
mod prefabs;
mod queue;
pub mod gl;

pub mod bitmap;
pub mod buffer;
pub mod color;
pub mod draw_call;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod program;
pub mod sampler;
pub mod texture;
pub mod window;

/// Fixed size vector type.
pub type ArrayVec<A> = arrayvec::ArrayVec<A>;

#[doc(inline)]
pub use crate::bitmap::Bitmap;

#[doc(inline)]
pub use crate::buffer::Buffer;

#[doc(inline)]
pub use crate::color::Color;

#[doc(inline)]
pub use crate::draw_call::DrawCall;

#[doc(inline)]
pub use crate::draw_call::Primitive;

#[doc(inline)]
pub use crate::error::Error;

#[doc(inline)]
pub use crate::error::Result;

#[doc(inline)]
pub use crate::factory::Factory;

#[doc(inline)]
pub use crate::input::Key;

#[doc(inline)]
pub use crate::input::MouseButton;

#[doc(inline)]
pub use crate::pipeline::Blend;

#[doc(inline)]
pub use crate::program::Attribute;

#[doc(inline)]
pub use crate::program::Invocation;

#[doc(inline)]
pub use crate::program::Program;

#[doc(inline)]
pub use crate::program::Slot;

#[doc(inline)]
pub use crate::program::Source;

#[doc(inline)]
pub use crate::program::Uniform;

#[doc(inline)]
pub use crate::sampler::Sampler2;

#[doc(inline)]
pub use crate::texture::Texture2;

#[doc(inline)]
pub use crate::texture::TextureArray;

#[doc(inline)]
pub use crate::texture::TextureBinding;

#[doc(inline)]
pub use crate::window::Window;
