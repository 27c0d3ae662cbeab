//! Bit mask of a sprite's opaque pixels.

use crate::core::ConfigError;

/// Opaque-pixel mask, one bit per pixel, rows packed into `u64` words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl Mask {
    /// Fully transparent mask.
    pub fn new(width: u32, height: u32) -> Self {
        let words_per_row = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    /// Fully opaque mask.
    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Build a mask by asking `opaque(x, y)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, opaque: F) -> Self
    where
        F: Fn(u32, u32) -> bool,
    {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if opaque(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Ellipse inscribed in the `width` x `height` box; corners stay transparent.
    pub fn ellipse(width: u32, height: u32) -> Self {
        let rx = width as f64 / 2.0;
        let ry = height as f64 / 2.0;
        Self::from_fn(width, height, |x, y| {
            let dx = (x as f64 + 0.5 - rx) / rx;
            let dy = (y as f64 + 0.5 - ry) / ry;
            dx * dx + dy * dy <= 1.0
        })
    }

    /// Mask from RGBA8 pixel data: a pixel is opaque when its alpha is above
    /// `threshold`.
    pub fn from_rgba(
        width: u32,
        height: u32,
        rgba: &[u8],
        threshold: u8,
    ) -> Result<Self, ConfigError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(ConfigError::sprite(format!(
                "expected {expected} bytes of RGBA data for {width}x{height}, got {}",
                rgba.len()
            )));
        }
        Ok(Self::from_fn(width, height, |x, y| {
            let idx = (y as usize * width as usize + x as usize) * 4 + 3;
            rgba[idx] > threshold
        }))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the pixel at (`x`, `y`) is opaque. Out-of-range reads are
    /// transparent.
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (word, bit) = self.locate(x, y);
        self.bits[word] & (1 << bit) != 0
    }

    pub fn set(&mut self, x: u32, y: u32, opaque: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (word, bit) = self.locate(x, y);
        if opaque {
            self.bits[word] |= 1 << bit;
        } else {
            self.bits[word] &= !(1 << bit);
        }
    }

    /// Number of opaque pixels.
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// Upside-down copy, used for the top pipe.
    pub fn flipped_vertical(&self) -> Self {
        let mut flipped = Self::new(self.width, self.height);
        for y in 0..self.height {
            let src = y as usize * self.words_per_row;
            let dst = (self.height - 1 - y) as usize * self.words_per_row;
            flipped.bits[dst..dst + self.words_per_row]
                .copy_from_slice(&self.bits[src..src + self.words_per_row]);
        }
        flipped
    }

    /// First point, in this mask's coordinates, where this mask and `other`
    /// are both opaque when `other`'s origin sits at `offset` from ours.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(i32, i32)> {
        let (ox, oy) = offset;
        let x_start = ox.max(0);
        let x_end = (ox + other.width as i32).min(self.width as i32);
        let y_start = oy.max(0);
        let y_end = (oy + other.height as i32).min(self.height as i32);
        if x_start >= x_end || y_start >= y_end {
            return None;
        }

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x as u32, y as u32) && other.get((x - ox) as u32, (y - oy) as u32) {
                    return Some((x, y));
                }
            }
        }
        None
    }

    pub fn overlaps(&self, other: &Mask, offset: (i32, i32)) -> bool {
        self.overlap(other, offset).is_some()
    }

    fn locate(&self, x: u32, y: u32) -> (usize, u32) {
        let word = y as usize * self.words_per_row + (x as usize / 64);
        (word, x % 64)
    }
}
