/// A 2D vector, used for gesture translations and velocities
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Vector with only a vertical component
    pub const fn vertical(y: f32) -> Self {
        Self { x: 0.0, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Same rect moved so that its top edge sits at `y`
    pub fn with_y(&self, y: f32) -> Self {
        Self { y, ..*self }
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }
}
