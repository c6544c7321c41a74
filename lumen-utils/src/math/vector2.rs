use std::fmt::{self, Display};

/// A two-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vector2<T> {
    /// The x component.
    pub x: T,
    /// The y component.
    pub y: T,
}

impl<T> Vector2<T> {
    /// Creates a new vector from its components.
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Display> Display for Vector2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
