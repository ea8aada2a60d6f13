pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// 64x32 monochrome screen, row-major: `index = x + y * WIDTH`.
///
/// Sprites are XORed on and wrap around both edges.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    cells: [bool; WIDTH * HEIGHT],
    dirty: bool,
}

impl Framebuffer {
    pub fn new() -> Framebuffer {
        Framebuffer {
            cells: [false; WIDTH * HEIGHT],
            dirty: false,
        }
    }

    pub fn clear(&mut self) {
        self.cells = [false; WIDTH * HEIGHT];
        self.dirty = true;
    }

    /// XOR one 8-pixel sprite row onto the screen with its left edge at
    /// (`x`, `y`). Returns true if any lit pixel was turned off.
    pub fn draw_row(&mut self, x: usize, y: usize, row: u8) -> bool {
        let mut collision = false;
        let y = y % HEIGHT;
        for bit in 0..8 {
            if row & (0x80 >> bit) == 0 {
                continue;
            }
            let cell = &mut self.cells[(x + bit) % WIDTH + y * WIDTH];
            collision |= *cell;
            *cell ^= true;
        }
        self.dirty = true;
        collision
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.cells[x % WIDTH + (y % HEIGHT) * WIDTH]
    }

    pub fn cells(&self) -> &[bool; WIDTH * HEIGHT] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks_exact(WIDTH)
    }

    /// Ask for a redraw without changing any pixels.
    pub fn touch(&mut self) {
        self.dirty = true;
    }

    /// Whether anything changed since the last call.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn reset(&mut self) {
        *self = Framebuffer::new();
    }
}

impl Default for Framebuffer {
    fn default() -> Framebuffer {
        Framebuffer::new()
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|&p| if p { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_then_erase() {
        let mut fb = Framebuffer::new();
        assert!(!fb.draw_row(0, 0, 0xFF));
        assert!((0..8).all(|x| fb.pixel(x, 0)));
        assert!(!fb.pixel(8, 0));
        assert!(fb.draw_row(0, 0, 0xFF));
        assert!(fb.cells().iter().all(|&p| !p));
    }

    #[test]
    fn test_draw_wraps_horizontally() {
        let mut fb = Framebuffer::new();
        fb.draw_row(62, 0, 0xF0);
        assert!(fb.pixel(62, 0) && fb.pixel(63, 0));
        assert!(fb.pixel(0, 0) && fb.pixel(1, 0));
        assert!(!fb.pixel(2, 0));
    }

    #[test]
    fn test_draw_wraps_vertically() {
        let mut fb = Framebuffer::new();
        fb.draw_row(0, 33, 0x80);
        assert!(fb.pixel(0, 1));
        assert!(fb.cells()[WIDTH]);
    }

    #[test]
    fn test_redraw_flag_consumed() {
        let mut fb = Framebuffer::new();
        assert!(!fb.take_redraw());
        fb.clear();
        assert!(fb.take_redraw());
        assert!(!fb.take_redraw());
    }
}
