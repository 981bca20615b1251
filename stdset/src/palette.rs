//! 256-entry color tables used to resolve palette-indexed pixels.
//!
//! Lookups never fail. [`Palette::color_of`] takes a `u8` so every stored pixel maps
//! to an entry, and [`Palette::color_of_masked`] keeps the low 8 bits of wider input.

use image::Rgb;

use crate::constants::PALETTE_LENGTH;

/// Standard EGA/VGA 16-color set.
pub const EGA_COLORS: [[u8; 3]; 16] = [
    [0, 0, 0],       // black
    [0, 0, 170],     // blue
    [0, 170, 0],     // green
    [0, 170, 170],   // cyan
    [170, 0, 0],     // red
    [170, 0, 170],   // magenta
    [170, 85, 0],    // brown
    [170, 170, 170], // light gray
    [85, 85, 85],    // dark gray
    [85, 85, 255],   // light blue
    [85, 255, 85],   // light green
    [85, 255, 255],  // light cyan
    [255, 85, 85],   // light red
    [255, 85, 255],  // light magenta
    [255, 255, 85],  // yellow
    [255, 255, 255], // white
];

// 6 levels per channel. None of them is an EGA channel value or a gray ramp step
// so every entry of the table is unique.
const CUBE_LEVELS: [u8; 6] = [25, 70, 115, 160, 205, 250];
const CUBE_START: usize = 16;
const CUBE_LENGTH: usize = 6 * 6 * 6;
const GRAY_START: usize = CUBE_START + CUBE_LENGTH;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(pub [[u8; 3]; PALETTE_LENGTH]);

impl Palette {
    /// EGA colors at 0..16, a 6x6x6 color cube at 16..232 and a 24 step gray ramp at 232..256.
    pub fn vga() -> Self {
        let mut colors = [[0u8; 3]; PALETTE_LENGTH];

        colors[..CUBE_START].copy_from_slice(&EGA_COLORS);

        (0..CUBE_LENGTH).for_each(|i| {
            colors[CUBE_START + i] = [
                CUBE_LEVELS[i / 36],
                CUBE_LEVELS[(i / 6) % 6],
                CUBE_LEVELS[i % 6],
            ];
        });

        (GRAY_START..PALETTE_LENGTH).for_each(|index| {
            let level = 8 + 10 * (index - GRAY_START) as u8;
            colors[index] = [level; 3];
        });

        Self(colors)
    }

    /// Index `v` is drawn as `(v, v, v)`.
    pub fn grayscale() -> Self {
        let mut colors = [[0u8; 3]; PALETTE_LENGTH];

        colors
            .iter_mut()
            .enumerate()
            .for_each(|(index, color)| *color = [index as u8; 3]);

        Self(colors)
    }

    pub fn color_of(&self, index: u8) -> Rgb<u8> {
        Rgb(self.0[index as usize])
    }

    /// Keeps the low 8 bits of `index`.
    pub fn color_of_masked(&self, index: u32) -> Rgb<u8> {
        self.color_of((index & 0xFF) as u8)
    }

    pub fn get_colors(&self) -> &[[u8; 3]; PALETTE_LENGTH] {
        &self.0
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::vga()
    }
}
