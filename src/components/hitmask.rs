//! Per-pixel opacity masks for pixel-exact collision.
//!
//! A [`Hitmask`] is built once per sprite at load time from the sprite's alpha
//! channel and shared (behind an `Arc`) by every entity drawn with that sprite.
//! Cells are stored row-major; a cell is opaque iff its source alpha is
//! non-zero.

/// Boolean opacity grid with the same dimensions as its source sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hitmask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Hitmask {
    /// Build a mask from a row-major alpha buffer.
    ///
    /// Missing trailing samples are treated as transparent and extra samples
    /// are ignored, so the mask is always exactly `width * height` cells.
    pub fn from_alpha<I>(width: usize, height: usize, alpha: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let mut bits: Vec<bool> = alpha
            .into_iter()
            .take(width * height)
            .map(|a| a != 0)
            .collect();
        bits.resize(width * height, false);
        Self {
            width,
            height,
            bits,
        }
    }

    /// Build a mask by evaluating `opaque(x, y)` for every cell.
    pub fn from_fn(width: usize, height: usize, opaque: impl Fn(usize, usize) -> bool) -> Self {
        let mut bits = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                bits.push(opaque(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Fully opaque rectangle.
    pub fn filled(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![true; width * height],
        }
    }

    /// Fully transparent rectangle.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the cell at `(x, y)` is opaque. Out-of-range cells are transparent.
    pub fn is_opaque(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.bits[y * self.width + x]
    }

    /// Number of opaque cells.
    pub fn opaque_count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Copy of this mask mirrored top-to-bottom.
    ///
    /// The upper pipe piece is the lower piece's sprite flipped vertically.
    pub fn flipped_vertical(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| {
            self.is_opaque(x, self.height - 1 - y)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_alpha_nonzero_is_opaque() {
        let mask = Hitmask::from_alpha(2, 2, [0, 1, 255, 0]);
        assert!(!mask.is_opaque(0, 0));
        assert!(mask.is_opaque(1, 0));
        assert!(mask.is_opaque(0, 1));
        assert!(!mask.is_opaque(1, 1));
    }

    #[test]
    fn test_from_alpha_all_zero_is_empty() {
        let mask = Hitmask::from_alpha(3, 4, std::iter::repeat(0u8).take(12));
        assert_eq!(mask, Hitmask::empty(3, 4));
        assert_eq!(mask.opaque_count(), 0);
    }

    #[test]
    fn test_from_alpha_short_buffer_pads_transparent() {
        let mask = Hitmask::from_alpha(2, 2, [9]);
        assert!(mask.is_opaque(0, 0));
        assert_eq!(mask.opaque_count(), 1);
    }

    #[test]
    fn test_out_of_range_is_transparent() {
        let mask = Hitmask::filled(2, 2);
        assert!(!mask.is_opaque(2, 0));
        assert!(!mask.is_opaque(0, 2));
    }

    #[test]
    fn test_flipped_vertical() {
        let mask = Hitmask::from_fn(3, 4, |_, y| y == 0);
        let flipped = mask.flipped_vertical();
        assert!(flipped.is_opaque(1, 3));
        assert!(!flipped.is_opaque(1, 0));
        assert_eq!(flipped.opaque_count(), 3);
        assert_eq!(flipped.flipped_vertical(), mask);
    }
}
