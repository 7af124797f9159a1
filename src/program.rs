//! GLSL programs and per-draw bindings.

use crate::gl;
use crate::queue;
use std::{cmp, collections, fmt, hash, ops, sync};

use crate::buffer::Buffer;
use crate::color::Color;
use crate::error::{Error, Result};
use glam::{Mat2, Mat3, Mat4, Vec2, Vec3};
use crate::texture::TextureBinding;
use crate::ArrayVec;

/// Specifies the maximum number of attribute bindings per draw.
pub const MAX_ATTRIBUTES: usize = 8;

/// Specifies the maximum number of uniform bindings per draw.
pub const MAX_UNIFORMS: usize = 8;

/// A programmable pipeline stage.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Stage {
    /// Per-vertex stage.
    Vertex,

    /// Per-fragment stage.
    Fragment,
}

impl Stage {
    pub(crate) fn as_gl_enum(self) -> u32 {
        match self {
            Stage::Vertex => gl::VERTEX_SHADER,
            Stage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Stage::Vertex => f.write_str("vertex"),
            Stage::Fragment => f.write_str("fragment"),
        }
    }
}

/// GLSL sources plus the interface a program declares.
///
/// Every name listed in `uniforms` and `attributes` is resolved to a
/// [`Slot`] once, at build time. Binding calls then work on slots and
/// never re-hash strings.
///
/// [`Slot`]: struct.Slot.html
#[derive(Clone, Copy, Debug)]
pub struct Source<'a> {
    /// Vertex stage source text.
    pub vertex: &'a str,

    /// Fragment stage source text.
    pub fragment: &'a str,

    /// Multiplies draws by the bound instance count.
    pub instanced: bool,

    /// Uniform names to resolve.
    pub uniforms: &'a [&'a str],

    /// Vertex attribute names to resolve.
    pub attributes: &'a [&'a str],
}

/// A resolved uniform/attribute location.
///
/// A name the shader never declares resolves to [`NONE`]; binding
/// through such a slot is silently skipped, mirroring the underlying
/// API's treatment of location `-1`.
///
/// [`NONE`]: #associatedconstant.NONE
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Slot(i32);

impl Slot {
    /// The absent-slot sentinel.
    pub const NONE: Slot = Slot(-1);

    pub(crate) fn new(location: i32) -> Self {
        Slot(location)
    }

    /// Returns the location, or `None` for the sentinel.
    pub(crate) fn location(self) -> Option<u32> {
        if self.0 < 0 {
            None
        } else {
            Some(self.0 as u32)
        }
    }

    /// Returns true unless this is the absent-slot sentinel.
    pub fn present(self) -> bool {
        self.0 >= 0
    }
}

/// Pushes the program ID onto the factory program queue when
/// destroyed.
pub(crate) struct Destructor {
    id: u32,
    tx: queue::Sender<u32>,
}

impl ops::Drop for Destructor {
    fn drop(&mut self) {
        let _ = self.tx.send(self.id);
    }
}

/// A compiled and linked shader program.
#[derive(Clone)]
pub struct Program {
    /// The OpenGL program ID.
    id: u32,

    /// Multiplies draws by the bound instance count.
    instanced: bool,

    /// Declared variable names resolved to slots at build time.
    locations: collections::HashMap<String, Slot>,

    /// Returns the program back to the factory upon destruction.
    _destructor: sync::Arc<Destructor>,
}

impl Program {
    /// Constructor.
    pub(crate) fn new(
        id: u32,
        instanced: bool,
        locations: collections::HashMap<String, Slot>,
        tx: queue::Sender<u32>,
    ) -> Self {
        Self {
            id,
            instanced,
            locations,
            _destructor: sync::Arc::new(Destructor { id, tx }),
        }
    }

    /// Returns the GLSL program ID.
    pub(crate) fn id(&self) -> u32 {
        self.id
    }

    /// Returns true if draws through this program are instanced.
    pub fn instanced(&self) -> bool {
        self.instanced
    }

    /// Looks up the slot a variable name resolved to at build time.
    ///
    /// Names never declared to [`Source`] fail with
    /// [`Error::UnknownVariable`]; names the shader did not actually
    /// declare return the absent-slot sentinel.
    ///
    /// [`Source`]: struct.Source.html
    /// [`Error::UnknownVariable`]: ../enum.Error.html
    pub fn slot(&self, name: &str) -> Result<Slot> {
        self.locations
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownVariable(name.to_string()))
    }
}

impl cmp::Eq for Program {}

impl cmp::PartialEq<Self> for Program {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        #[derive(Debug)]
        struct Program {
            id: u32,
            instanced: bool,
        }

        Program {
            id: self.id,
            instanced: self.instanced,
        }.fmt(f)
    }
}

impl hash::Hash for Program {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

/// A semantic value uploaded to a uniform slot.
///
/// Colors are converted to floating point channels (`channel / 255`)
/// on upload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Uniform {
    /// Four 8-bit channels, uploaded as a `vec4`.
    Color(Color),

    /// Column-major 2x2 matrix.
    Mat2(Mat2),

    /// Column-major 3x3 matrix.
    Mat3(Mat3),

    /// Column-major 4x4 matrix.
    Mat4(Mat4),

    /// Two-component vector.
    Vec2(Vec2),

    /// Three-component vector.
    Vec3(Vec3),
}

/// How often an attribute advances during a draw.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Rate {
    /// Once per vertex.
    Vertex,

    /// Once per instance.
    Instance,
}

impl Rate {
    pub(crate) fn divisor(self) -> u32 {
        match self {
            Rate::Vertex => 0,
            Rate::Instance => 1,
        }
    }
}

/// A vertex attribute data source.
#[derive(Clone, Copy, Debug)]
pub struct Attribute<'a> {
    /// The buffer supplying attribute data.
    pub buffer: &'a Buffer,

    /// The attribute step rate.
    pub rate: Rate,
}

impl<'a> Attribute<'a> {
    /// An attribute advancing once per vertex.
    pub fn per_vertex(buffer: &'a Buffer) -> Self {
        Attribute { buffer, rate: Rate::Vertex }
    }

    /// An attribute advancing once per instance.
    pub fn per_instance(buffer: &'a Buffer) -> Self {
        Attribute { buffer, rate: Rate::Instance }
    }
}

/// An invocation of a shader program.
///
/// Carries everything one draw needs: the program, its attribute and
/// uniform bindings, an optional texture, and an optional index
/// buffer. Draw behavior is a pure function of this value; nothing
/// set up by an earlier draw leaks into the next one.
#[derive(Clone)]
pub struct Invocation<'a> {
    /// The program to bind at draw time.
    pub program: &'a Program,

    /// Attribute arrays to bind at draw time.
    pub attributes: ArrayVec<[(Slot, Attribute<'a>); MAX_ATTRIBUTES]>,

    /// Uniform values to upload at draw time.
    pub uniforms: ArrayVec<[(Slot, Uniform); MAX_UNIFORMS]>,

    /// Texture bound to the active texture unit at draw time.
    pub texture: Option<TextureBinding<'a>>,

    /// Index buffer; its presence makes the draw indexed.
    pub indices: Option<&'a Buffer>,
}

impl<'a> Invocation<'a> {
    /// An invocation with no bindings yet.
    pub fn new(program: &'a Program) -> Self {
        Invocation {
            program,
            attributes: ArrayVec::new(),
            uniforms: ArrayVec::new(),
            texture: None,
            indices: None,
        }
    }

    /// Attaches an attribute array to a slot.
    pub fn attribute(&mut self, slot: Slot, attribute: Attribute<'a>) {
        self.attributes.push((slot, attribute));
    }

    /// Attaches a uniform value to a slot.
    pub fn uniform(&mut self, slot: Slot, uniform: Uniform) {
        self.uniforms.push((slot, uniform));
    }

    /// The number of instances an instanced draw covers.
    ///
    /// Taken from the element count of the bound instance-rate
    /// attributes (the smallest when several are bound); `None` when
    /// no instance-rate attribute is bound.
    pub fn instance_count(&self) -> Option<usize> {
        self.attributes
            .iter()
            .filter(|&&(_, ref attribute)| attribute.rate == Rate::Instance)
            .map(|&(_, ref attribute)| attribute.buffer.count())
            .min()
    }
}

#[cfg(test)]
mod tests {
    use crate::buffer;
    use crate::queue::Queue;
    use std::collections::HashMap;
    use super::{Attribute, Invocation, Program, Slot};

    fn program(queue: &Queue<u32>) -> Program {
        let mut locations = HashMap::new();
        locations.insert("u_transform".to_string(), Slot::new(0));
        locations.insert("a_position".to_string(), Slot::new(1));
        locations.insert("a_unused".to_string(), Slot::NONE);
        Program::new(1, false, locations, queue.tx())
    }

    #[test]
    fn declared_names_resolve() {
        let queue = Queue::new();
        let program = program(&queue);
        assert!(program.slot("u_transform").unwrap().present());
        assert!(program.slot("a_position").unwrap().present());
    }

    #[test]
    fn undeclared_shader_variables_become_sentinels() {
        let queue = Queue::new();
        let program = program(&queue);
        let slot = program.slot("a_unused").unwrap();
        assert!(!slot.present());
        assert_eq!(None, slot.location());
    }

    #[test]
    fn unknown_names_fail_lookup() {
        let queue = Queue::new();
        let program = program(&queue);
        assert!(program.slot("u_missing").is_err());
    }

    #[test]
    fn instance_count_follows_instance_rate_attributes() {
        let queue = Queue::new();
        let program = program(&queue);
        let buffer_queue = Queue::new();
        let vertices = buffer::Buffer::new(
            1,
            buffer::Kind::Array,
            4,
            2,
            buffer::Usage::DynamicDraw,
            buffer_queue.tx(),
        );
        let offsets = buffer::Buffer::new(
            2,
            buffer::Kind::Array,
            100,
            2,
            buffer::Usage::DynamicDraw,
            buffer_queue.tx(),
        );

        let mut invocation = Invocation::new(&program);
        invocation.attribute(Slot::new(1), Attribute::per_vertex(&vertices));
        assert_eq!(None, invocation.instance_count());

        invocation.attribute(Slot::new(2), Attribute::per_instance(&offsets));
        assert_eq!(Some(100), invocation.instance_count());
    }
}
