//! GPU buffer handles.

use crate::gl;
use crate::queue;
use std::{cmp, fmt, hash, ops};

/// OpenGL buffer ID type.
pub(crate) type Id = u32;

/// Determines what the buffer may be used for.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Kind {
    /// Vertex attribute data, `f32` lanes. Corresponds to
    /// `GL_ARRAY_BUFFER`.
    Array,

    /// Draw sequence indices, one `u32` per element. Corresponds to
    /// `GL_ELEMENT_ARRAY_BUFFER`.
    Index,
}

impl Kind {
    /// Returns the equivalent OpenGL target enumeration constant.
    pub(crate) fn as_gl_enum(self) -> u32 {
        match self {
            Kind::Array => gl::ARRAY_BUFFER,
            Kind::Index => gl::ELEMENT_ARRAY_BUFFER,
        }
    }

    /// Bytes per lane: both `f32` and `u32` lanes are 4 bytes wide.
    pub(crate) fn lane_size(self) -> usize {
        4
    }
}

/// A buffer data usage hint.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Usage {
    /// Corresponds to `GL_STATIC_DRAW`.
    StaticDraw,

    /// Corresponds to `GL_DYNAMIC_DRAW`.
    DynamicDraw,
}

impl Usage {
    /// Returns the equivalent OpenGL usage enumeration constant.
    pub(crate) fn as_gl_enum(self) -> u32 {
        match self {
            Usage::StaticDraw => gl::STATIC_DRAW,
            Usage::DynamicDraw => gl::DYNAMIC_DRAW,
        }
    }
}

/// An owning handle to a contiguous region of GPU memory.
///
/// Exactly one handle names a given GPU allocation: the type is
/// move-only, moving transfers the allocation without touching the
/// device, and dropping (or calling [`release`]) retires the
/// allocation through the factory's destruction queue.
///
/// [`release`]: #method.release
pub struct Buffer {
    /// The OpenGL buffer ID.
    id: Id,

    /// The type of buffer, e.g. a vertex buffer.
    kind: Kind,

    /// Number of elements held by the buffer.
    count: usize,

    /// Lanes per element (`f32`s for `Array`, always 1 for `Index`).
    width: usize,

    /// Data usage hint.
    usage: Usage,

    /// True while `id` names a live GPU allocation.
    valid: bool,

    /// Returns the buffer to the factory upon release.
    tx: queue::Sender<Id>,
}

impl Buffer {
    /// Constructor.
    pub(crate) fn new(
        id: Id,
        kind: Kind,
        count: usize,
        width: usize,
        usage: Usage,
        tx: queue::Sender<Id>,
    ) -> Self {
        Self {
            id,
            kind,
            count,
            width,
            usage,
            valid: true,
            tx,
        }
    }

    /// Returns the OpenGL buffer ID.
    pub(crate) fn id(&self) -> Id {
        self.id
    }

    /// Returns the buffer kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the number of elements this buffer holds.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the number of lanes per element.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the buffer data usage hint.
    pub fn usage(&self) -> Usage {
        self.usage
    }

    /// Returns the total size in bytes.
    pub fn size(&self) -> usize {
        self.count * self.width * self.kind.lane_size()
    }

    /// Returns true while the handle names a live GPU allocation.
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// Retires the GPU allocation.
    ///
    /// The ID is handed to the factory's destruction queue and
    /// reclaimed on its next garbage collection pass. Calling this a
    /// second time is a no-op.
    pub fn release(&mut self) {
        if self.valid {
            let _ = self.tx.send(self.id);
            self.valid = false;
        }
    }
}

impl ops::Drop for Buffer {
    fn drop(&mut self) {
        self.release();
    }
}

impl cmp::PartialEq<Self> for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl cmp::Eq for Buffer {}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        #[derive(Debug)]
        struct Buffer {
            id: Id,
            kind: Kind,
            count: usize,
            width: usize,
            usage: Usage,
            valid: bool,
        }

        Buffer {
            id: self.id,
            kind: self.kind,
            count: self.count,
            width: self.width,
            usage: self.usage,
            valid: self.valid,
        }.fmt(f)
    }
}

impl hash::Hash for Buffer {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use crate::queue::Queue;
    use super::{Buffer, Kind, Usage};

    fn handle(queue: &Queue<u32>) -> Buffer {
        Buffer::new(7, Kind::Array, 6, 2, Usage::DynamicDraw, queue.tx())
    }

    #[test]
    fn valid_after_creation() {
        let queue = Queue::new();
        let buffer = handle(&queue);
        assert!(buffer.valid());
        assert_eq!(6, buffer.count());
        assert_eq!(2, buffer.width());
        assert_eq!(48, buffer.size());
    }

    #[test]
    fn release_is_idempotent() {
        let queue = Queue::new();
        let mut buffer = handle(&queue);
        buffer.release();
        assert!(!buffer.valid());
        buffer.release();
        assert_eq!(Some(7), queue.next());
        assert_eq!(None, queue.next());
    }

    #[test]
    fn move_transfers_without_retiring() {
        let queue = Queue::new();
        let buffer = handle(&queue);
        let moved = buffer;
        assert!(moved.valid());
        assert_eq!(6, moved.count());
        assert_eq!(None, queue.next());
    }

    #[test]
    fn drop_retires_exactly_once() {
        let queue = Queue::new();
        {
            let buffer = handle(&queue);
            let _moved = buffer;
        }
        assert_eq!(Some(7), queue.next());
        assert_eq!(None, queue.next());
    }

    #[test]
    fn drop_after_release_does_not_retire_again() {
        let queue = Queue::new();
        {
            let mut buffer = handle(&queue);
            buffer.release();
        }
        assert_eq!(Some(7), queue.next());
        assert_eq!(None, queue.next());
    }
}
