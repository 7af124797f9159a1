//! GPU-visible pixel containers.

use crate::gl;
use crate::queue;
use std::{cmp, fmt, hash, ops, sync};

/// OpenGL texture ID type.
pub(crate) type Id = u32;

/// Returns the texture back to the factory upon destruction.
pub(crate) struct Destructor {
    id: Id,
    tx: queue::Sender<Id>,
}

impl ops::Drop for Destructor {
    fn drop(&mut self) {
        let _ = self.tx.send(self.id);
    }
}

/// GPU-visible 2D RGBA8 texture.
///
/// Either owns its own storage or, when created as a layer view,
/// aliases one layer of a [`TextureArray`]. A view keeps the array's
/// storage alive for as long as the view exists.
///
/// [`TextureArray`]: struct.TextureArray.html
#[derive(Clone)]
pub struct Texture2 {
    /// The OpenGL texture ID.
    id: Id,

    width: u32,
    height: u32,

    /// Returns the texture back to the factory upon destruction.
    destructor: sync::Arc<Destructor>,

    /// Set on layer views: pins the viewed array's storage.
    _storage: Option<sync::Arc<Destructor>>,
}

impl Texture2 {
    pub(crate) fn new(
        id: Id,
        width: u32,
        height: u32,
        tx: queue::Sender<Id>,
    ) -> Self {
        Texture2 {
            id,
            width,
            height,
            destructor: sync::Arc::new(Destructor { id, tx }),
            _storage: None,
        }
    }

    /// Constructor for a layer view over `array`.
    pub(crate) fn view(
        id: Id,
        array: &TextureArray,
        tx: queue::Sender<Id>,
    ) -> Self {
        Texture2 {
            id,
            width: array.width,
            height: array.height,
            destructor: sync::Arc::new(Destructor { id, tx }),
            _storage: Some(array.destructor.clone()),
        }
    }

    /// Returns the OpenGL texture ID.
    pub(crate) fn id(&self) -> Id {
        self.id
    }

    /// Returns the width of the texture in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl cmp::Eq for Texture2 {}

impl cmp::PartialEq<Self> for Texture2 {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for Texture2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        #[derive(Debug)]
        struct Texture2 {
            id: Id,
            width: u32,
            height: u32,
        }

        Texture2 {
            id: self.id,
            width: self.width,
            height: self.height,
        }.fmt(f)
    }
}

impl hash::Hash for Texture2 {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// GPU-visible 2D RGBA8 texture array with immutable storage.
#[derive(Clone)]
pub struct TextureArray {
    /// The OpenGL texture ID.
    id: Id,

    width: u32,
    height: u32,
    layers: u32,
    levels: u32,

    /// Returns the texture back to the factory upon destruction.
    ///
    /// Note: this is cloned by layer views.
    destructor: sync::Arc<Destructor>,
}

impl TextureArray {
    pub(crate) fn new(
        id: Id,
        width: u32,
        height: u32,
        layers: u32,
        levels: u32,
        tx: queue::Sender<Id>,
    ) -> Self {
        TextureArray {
            id,
            width,
            height,
            layers,
            levels,
            destructor: sync::Arc::new(Destructor { id, tx }),
        }
    }

    /// Returns the OpenGL texture ID.
    pub(crate) fn id(&self) -> Id {
        self.id
    }

    /// Returns the width of every layer in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of every layer in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the number of layers.
    pub fn layers(&self) -> u32 {
        self.layers
    }

    /// Returns the number of mip levels.
    pub fn levels(&self) -> u32 {
        self.levels
    }
}

impl cmp::Eq for TextureArray {}

impl cmp::PartialEq<Self> for TextureArray {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for TextureArray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        #[derive(Debug)]
        struct TextureArray {
            id: Id,
            width: u32,
            height: u32,
            layers: u32,
            levels: u32,
        }

        TextureArray {
            id: self.id,
            width: self.width,
            height: self.height,
            layers: self.layers,
            levels: self.levels,
        }.fmt(f)
    }
}

impl hash::Hash for TextureArray {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// What a draw call samples from.
#[derive(Clone, Debug)]
pub enum TextureBinding<'a> {
    /// A 2D texture (or a layer view).
    Two(&'a Texture2),

    /// A whole texture array.
    Array(&'a TextureArray),
}

impl<'a> TextureBinding<'a> {
    /// Returns the OpenGL bind target.
    pub(crate) fn target(&self) -> u32 {
        match *self {
            TextureBinding::Two(_) => gl::TEXTURE_2D,
            TextureBinding::Array(_) => gl::TEXTURE_2D_ARRAY,
        }
    }

    /// Returns the OpenGL texture ID.
    pub(crate) fn id(&self) -> Id {
        match *self {
            TextureBinding::Two(texture) => texture.id,
            TextureBinding::Array(array) => array.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::queue::Queue;
    use super::{Texture2, TextureArray};

    #[test]
    fn view_pins_array_storage() {
        let queue = Queue::new();
        let array = TextureArray::new(3, 64, 64, 4, 1, queue.tx());
        let view = Texture2::view(9, &array, queue.tx());
        assert_eq!(64, view.width());
        assert_eq!(64, view.height());
        drop(array);
        // The array ID is pinned by the view, only the view's own
        // drop may retire it.
        assert_eq!(None, queue.next());
        drop(view);
        let mut retired = vec![queue.next().unwrap(), queue.next().unwrap()];
        retired.sort();
        assert_eq!(vec![3, 9], retired);
        assert_eq!(None, queue.next());
    }

    #[test]
    fn clones_share_one_destructor() {
        let queue = Queue::new();
        let texture = Texture2::new(5, 8, 8, queue.tx());
        let alias = texture.clone();
        drop(texture);
        assert_eq!(None, queue.next());
        drop(alias);
        assert_eq!(Some(5), queue.next());
        assert_eq!(None, queue.next());
    }
}
