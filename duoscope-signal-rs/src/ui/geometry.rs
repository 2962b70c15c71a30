use crate::channel::{FieldIndex, FIELD_COUNT};

/// Rounded highlight rectangle, corners inclusive, in display pixels.
///
/// Stored as floats so the selection animation can move it smoothly; the
/// composer snaps it to whole pixels with [`pixel_bounds()`](Self::pixel_bounds).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SelectionRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub radius: f32,
}

impl SelectionRect {
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32, radius: f32) -> Self {
        Self { x0, y0, x1, y1, radius }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Rectangle of the given size around a center point.
    pub fn centered(center: (f32, f32), width: f32, height: f32, radius: f32) -> Self {
        Self {
            x0: center.0 - width / 2.0,
            y0: center.1 - height / 2.0,
            x1: center.0 + width / 2.0,
            y1: center.1 + height / 2.0,
            radius,
        }
    }

    /// Rounded `(x0, y0, x1, y1, radius)`.
    pub fn pixel_bounds(&self) -> (i32, i32, i32, i32, u32) {
        let round = |v: f32| libm::roundf(v) as i32;
        (
            round(self.x0),
            round(self.y0),
            round(self.x1),
            round(self.y1),
            round(self.radius).max(0) as u32,
        )
    }
}

/// Resting highlight of each field, in [`FieldIndex`] order.
pub const FIELD_RECTS: [SelectionRect; FIELD_COUNT] = [
    SelectionRect::new(32.0, 17.0, 76.0, 29.0, 3.0),
    SelectionRect::new(80.0, 17.0, 126.0, 29.0, 3.0),
    SelectionRect::new(32.0, 33.0, 76.0, 45.0, 3.0),
    SelectionRect::new(80.0, 33.0, 126.0, 45.0, 3.0),
    SelectionRect::new(32.0, 49.0, 76.0, 61.0, 3.0),
    SelectionRect::new(80.0, 49.0, 126.0, 61.0, 3.0),
];

pub fn field_rect(index: FieldIndex) -> SelectionRect {
    FIELD_RECTS[index.index()]
}
