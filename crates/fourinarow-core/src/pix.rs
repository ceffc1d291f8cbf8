//! Pixel buffers
//!
//! A `Pix` is a small grid of palette indices. The screen is one, and so is
//! the board image that gets copied onto it every frame.

/// Palette indices understood by every screen
pub mod color {
    pub const OFF: u8 = 0;
    pub const GREEN: u8 = 1;
    pub const RED: u8 = 2;
    pub const YELLOW: u8 = 3;
}

/// Width and height of the physical screen
pub const SCREEN_SIZE: u8 = 8;

/// A rectangular buffer of palette indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pix {
    width: u8,
    height: u8,
    buffer: Vec<u8>,
}

impl Pix {
    /// Create a buffer with every pixel off
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            buffer: vec![color::OFF; width as usize * height as usize],
        }
    }

    /// Create a buffer the size of the screen
    pub fn screen() -> Self {
        Self::new(SCREEN_SIZE, SCREEN_SIZE)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    fn index(&self, x: u8, y: u8) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Color at `(x, y)`, or off when outside the buffer
    pub fn pixel(&self, x: u8, y: u8) -> u8 {
        self.index(x, y).map_or(color::OFF, |i| self.buffer[i])
    }

    /// Set the color at `(x, y)`. Writes outside the buffer are clipped.
    pub fn set_pixel(&mut self, x: u8, y: u8, color: u8) {
        if let Some(i) = self.index(x, y) {
            self.buffer[i] = color;
        }
    }

    /// Fill a `width` x `height` rectangle whose top-left corner is `(x, y)`
    pub fn fill_box(&mut self, x: u8, y: u8, color: u8, width: u8, height: u8) {
        for dy in 0..height {
            for dx in 0..width {
                self.set_pixel(x.saturating_add(dx), y.saturating_add(dy), color);
            }
        }
    }

    /// Copy all of `source` into this buffer with its top-left corner at `(dx, dy)`
    pub fn blit(&mut self, source: &Pix, dx: u8, dy: u8) {
        for y in 0..source.height {
            for x in 0..source.width {
                self.set_pixel(
                    dx.saturating_add(x),
                    dy.saturating_add(y),
                    source.pixel(x, y),
                );
            }
        }
    }

    /// Rows of the buffer, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.buffer.chunks(self.width.max(1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_outside_are_clipped() {
        let mut pix = Pix::new(2, 2);
        pix.set_pixel(5, 0, color::RED);
        pix.set_pixel(0, 9, color::RED);
        assert!(pix.rows().flatten().all(|&c| c == color::OFF));
        assert_eq!(pix.pixel(5, 0), color::OFF);
    }

    #[test]
    fn test_blit_with_offset() {
        let mut board = Pix::new(7, 6);
        board.set_pixel(0, 0, color::GREEN);
        board.set_pixel(6, 5, color::RED);

        let mut screen = Pix::screen();
        screen.blit(&board, 0, 2);

        assert_eq!(screen.pixel(0, 2), color::GREEN);
        assert_eq!(screen.pixel(6, 7), color::RED);
        assert_eq!(screen.pixel(0, 0), color::OFF);
    }

    #[test]
    fn test_fill_box_clears_region() {
        let mut screen = Pix::screen();
        screen.fill_box(0, 0, color::YELLOW, 8, 8);
        screen.fill_box(0, 0, color::OFF, 7, 2);

        assert_eq!(screen.pixel(6, 1), color::OFF);
        assert_eq!(screen.pixel(7, 1), color::YELLOW);
        assert_eq!(screen.pixel(0, 2), color::YELLOW);
    }
}
