/// 2D point with floating point coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Round to the nearest integer pixel position
    pub fn to_pixel(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

/// Ordered 4-point polygon marking a detected symbol's corners
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quad {
    /// Corners in detector order; `corners[0]` anchors the label
    pub corners: [Point; 4],
}

impl Quad {
    /// Create a quad from four corners
    pub fn new(corners: [Point; 4]) -> Self {
        Self { corners }
    }

    /// First corner, used as the text anchor
    pub fn first(&self) -> Point {
        self.corners[0]
    }

    /// Closed edge list: (0,1), (1,2), (2,3), (3,0)
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        (0..4).map(move |i| (self.corners[i], self.corners[(i + 1) % 4]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_edges_are_closed() {
        let quad = Quad::new([
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]);
        let edges: Vec<_> = quad.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3], (Point::new(0.0, 10.0), Point::new(0.0, 0.0)));
        assert_eq!(edges[0], (Point::new(0.0, 0.0), Point::new(10.0, 0.0)));
    }

    #[test]
    fn test_to_pixel_rounds() {
        assert_eq!(Point::new(1.4, 2.6).to_pixel(), (1, 3));
    }
}
