//! Draw call dispatch.

use crate::gl;

/// Primitive topology.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Primitive {
    /// Isolated points.
    Points,

    /// List of line segments.
    Lines,

    /// Open chain of connected line segments.
    LineStrip,

    /// Closed chain of connected line segments.
    LineLoop,

    /// List of triangle points.
    Triangles,

    /// Fan of triangles sharing the first vertex.
    TriangleFan,
}

impl Primitive {
    pub(crate) fn as_gl_enum(self) -> u32 {
        match self {
            Primitive::Points => gl::POINTS,
            Primitive::Lines => gl::LINES,
            Primitive::LineStrip => gl::LINE_STRIP,
            Primitive::LineLoop => gl::LINE_LOOP,
            Primitive::Triangles => gl::TRIANGLES,
            Primitive::TriangleFan => gl::TRIANGLE_FAN,
        }
    }
}

/// A draw call command.
///
/// `offset` and `count` denote vertices for non-indexed draws and
/// indices when the invocation carries an index buffer. Whether the
/// draw is indexed or instanced is decided by the invocation it is
/// dispatched with, never by earlier calls.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DrawCall {
    /// Where the vertices/indices begin.
    pub offset: usize,

    /// Number of vertices/indices to draw.
    pub count: usize,

    /// The primitive topology.
    pub primitive: Primitive,
}

impl DrawCall {
    /// One triangle: 3 vertices starting at `offset`.
    pub fn triangle(offset: usize) -> Self {
        DrawCall { offset, count: 3, primitive: Primitive::Triangles }
    }

    /// `count` triangles: `3 * count` vertices starting at `offset`.
    pub fn triangles(count: usize, offset: usize) -> Self {
        DrawCall { offset, count: count * 3, primitive: Primitive::Triangles }
    }

    /// One quad: 4 vertices drawn as a triangle fan.
    pub fn quad(offset: usize) -> Self {
        DrawCall { offset, count: 4, primitive: Primitive::TriangleFan }
    }

    /// One line segment: 2 vertices.
    pub fn line(offset: usize) -> Self {
        DrawCall { offset, count: 2, primitive: Primitive::Lines }
    }

    /// An open strip of `segments` connected segments:
    /// `segments + 1` vertices.
    pub fn line_strip(segments: usize, offset: usize) -> Self {
        DrawCall {
            offset,
            count: segments + 1,
            primitive: Primitive::LineStrip,
        }
    }

    /// A closed loop through `points` vertices.
    pub fn polyline(points: usize, offset: usize) -> Self {
        DrawCall { offset, count: points, primitive: Primitive::LineLoop }
    }

    /// `count` isolated points.
    pub fn points(count: usize, offset: usize) -> Self {
        DrawCall { offset, count, primitive: Primitive::Points }
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawCall, Primitive};

    #[test]
    fn fixed_count_formulas() {
        assert_eq!(
            DrawCall { offset: 2, count: 3, primitive: Primitive::Triangles },
            DrawCall::triangle(2),
        );
        assert_eq!(
            DrawCall { offset: 0, count: 12, primitive: Primitive::Triangles },
            DrawCall::triangles(4, 0),
        );
        assert_eq!(
            DrawCall { offset: 4, count: 4, primitive: Primitive::TriangleFan },
            DrawCall::quad(4),
        );
        assert_eq!(
            DrawCall { offset: 0, count: 2, primitive: Primitive::Lines },
            DrawCall::line(0),
        );
        assert_eq!(
            DrawCall { offset: 1, count: 6, primitive: Primitive::LineStrip },
            DrawCall::line_strip(5, 1),
        );
        assert_eq!(
            DrawCall { offset: 0, count: 5, primitive: Primitive::LineLoop },
            DrawCall::polyline(5, 0),
        );
        assert_eq!(
            DrawCall { offset: 3, count: 7, primitive: Primitive::Points },
            DrawCall::points(7, 3),
        );
    }
}
