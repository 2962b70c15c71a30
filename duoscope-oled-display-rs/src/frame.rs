//! Page-organized monochrome frame buffer.
//!
//! The layout matches the SSD1306 graphics RAM, so a frame can be streamed
//! to the panel byte for byte:
//!
//! ```text
//!           x = 0     1     2   …  127
//! page 0   [byte][byte][byte] … [byte]   rows 0..=7   (bit 0 = row 0)
//! page 1   [byte][byte][byte] … [byte]   rows 8..=15
//!   ⋮
//! page 7   [byte][byte][byte] … [byte]   rows 56..=63
//! ```

use core::convert::Infallible;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

/// Frame width in pixels.
pub const FRAME_WIDTH: usize = 128;

/// Frame height in pixels.
pub const FRAME_HEIGHT: usize = 64;

/// Number of 8-row pages.
pub const FRAME_PAGES: usize = FRAME_HEIGHT / 8;

/// One full display frame.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bytes: [u8; FRAME_WIDTH * FRAME_PAGES],
}

impl FrameBuffer {
    /// An all-dark frame.
    pub const fn new() -> Self {
        Self {
            bytes: [0; FRAME_WIDTH * FRAME_PAGES],
        }
    }

    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    pub fn copy_from(&mut self, other: &FrameBuffer) {
        self.bytes.copy_from_slice(&other.bytes);
    }

    /// Light or darken one pixel. Off-frame positions are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if let Some((index, mask)) = Self::locate(x, y) {
            if on {
                self.bytes[index] |= mask;
            } else {
                self.bytes[index] &= !mask;
            }
        }
    }

    /// Toggle one pixel. Off-frame positions are ignored.
    pub fn invert_pixel(&mut self, x: usize, y: usize) {
        if let Some((index, mask)) = Self::locate(x, y) {
            self.bytes[index] ^= mask;
        }
    }

    /// `false` for off-frame positions.
    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        Self::locate(x, y).is_some_and(|(index, mask)| self.bytes[index] & mask != 0)
    }

    /// Number of lit pixels.
    pub fn lit_count(&self) -> u32 {
        self.bytes.iter().map(|b| b.count_ones()).sum()
    }

    /// Raw page-major bytes, `page_count() × width()` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub const fn page_count(&self) -> usize {
        FRAME_PAGES
    }

    pub const fn width(&self) -> usize {
        FRAME_WIDTH
    }

    /// Every lit pixel as an `embedded-graphics` pixel.
    pub fn lit_pixels(&self) -> impl Iterator<Item = Pixel<BinaryColor>> + '_ {
        (0..FRAME_HEIGHT)
            .flat_map(|y| (0..FRAME_WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get_pixel(x, y))
            .map(|(x, y)| Pixel(Point::new(x as i32, y as i32), BinaryColor::On))
    }

    fn locate(x: usize, y: usize) -> Option<(usize, u8)> {
        (x < FRAME_WIDTH && y < FRAME_HEIGHT).then(|| ((y / 8) * FRAME_WIDTH + x, 1 << (y % 8)))
    }

    fn locate_point(point: Point) -> Option<(usize, usize)> {
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        Some((x, y))
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(FRAME_WIDTH as u32, FRAME_HEIGHT as u32)
    }
}

// Drawing clips silently at the frame edge.
impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some((x, y)) = Self::locate_point(point) {
                self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.bytes.fill(if color.is_on() { 0xFF } else { 0x00 });
        Ok(())
    }
}

/// Copy a composed frame onto another target (e.g. the panel driver's
/// own buffer). Only lit pixels are drawn; clear the target first.
impl Drawable for FrameBuffer {
    type Color = BinaryColor;
    type Output = ();

    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        target.draw_iter(self.lit_pixels())
    }
}

/// Draw target that toggles every pixel drawn `On`.
///
/// Drawing a filled shape through it inverts the frame inside the shape,
/// which is how the selection highlight shows text in reverse video.
pub struct InvertTarget<'a> {
    frame: &'a mut FrameBuffer,
}

impl<'a> InvertTarget<'a> {
    pub fn new(frame: &'a mut FrameBuffer) -> Self {
        Self { frame }
    }
}

impl OriginDimensions for InvertTarget<'_> {
    fn size(&self) -> Size {
        self.frame.size()
    }
}

impl DrawTarget for InvertTarget<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if color.is_on() {
                if let Some((x, y)) = FrameBuffer::locate_point(point) {
                    self.frame.invert_pixel(x, y);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn pixel_maps_to_page_bit() {
        let mut frame = FrameBuffer::new();
        frame.set_pixel(5, 0, true);
        frame.set_pixel(5, 9, true);
        assert_eq!(frame.as_bytes()[5], 0b0000_0001);
        assert_eq!(frame.as_bytes()[FRAME_WIDTH + 5], 0b0000_0010);
        assert_eq!(frame.as_bytes().len(), frame.page_count() * frame.width());
    }

    #[test]
    fn off_frame_pixels_are_ignored() {
        let mut frame = FrameBuffer::new();
        frame.set_pixel(FRAME_WIDTH, 0, true);
        frame.invert_pixel(0, FRAME_HEIGHT);
        assert_eq!(frame.lit_count(), 0);
        assert!(!frame.get_pixel(FRAME_WIDTH, 0));
    }

    #[test]
    fn drawing_clips_at_edges() {
        let mut frame = FrameBuffer::new();
        let r = Rectangle::new(Point::new(-4, -4), Size::new(8, 8))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut frame);
        assert!(r.is_ok());
        assert_eq!(frame.lit_count(), 16);
    }

    #[test]
    fn invert_target_toggles() {
        let mut frame = FrameBuffer::new();
        frame.set_pixel(1, 1, true);
        let area = Rectangle::new(Point::new(0, 0), Size::new(3, 3))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On));
        let r = area.draw(&mut InvertTarget::new(&mut frame));
        assert!(r.is_ok());
        assert!(!frame.get_pixel(1, 1));
        assert!(frame.get_pixel(0, 0));
        assert_eq!(frame.lit_count(), 8);
    }

    #[test]
    fn drawable_copies_lit_pixels() {
        let mut source = FrameBuffer::new();
        source.set_pixel(10, 20, true);
        source.set_pixel(127, 63, true);

        let mut target = FrameBuffer::new();
        assert!(source.draw(&mut target).is_ok());
        assert!(target == source);
    }
}
