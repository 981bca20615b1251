pub const SPRITE_WIDTH: usize = 16;
pub const SPRITE_HEIGHT: usize = 16;
/// One byte per pixel, no header.
pub const SPRITE_BLOCK_LENGTH: usize = SPRITE_WIDTH * SPRITE_HEIGHT;

pub const SHAPE_ROWS: usize = 10;
pub const SHAPE_COLUMNS: usize = 10;

/// Pixel block embedded after each shape header in the metadata file. Never decoded.
pub const SHAPE_BLOCK_LENGTH: usize = 256;

pub const LAYOUT_WIDTH: usize = 100;
pub const LAYOUT_HEIGHT: usize = 100;
pub const LAYOUT_EMPTY: i32 = -1;

pub const PALETTE_LENGTH: usize = 256;

pub const SPRITE_BACKGROUND_COLOR: [u8; 3] = [50, 50, 50];
pub const SPRITE_GRID_LINE_COLOR: [u8; 3] = [100, 100, 100];
pub const ACTIVE_BORDER_COLOR: [u8; 3] = [255, 0, 0];
pub const INACTIVE_BORDER_COLOR: [u8; 3] = [100, 100, 100];
pub const LAYOUT_BACKGROUND_COLOR: [u8; 3] = [40, 40, 40];
pub const LAYOUT_GRID_LINE_COLOR: [u8; 3] = [60, 60, 60];

pub const MIN_ZOOM: u32 = 1;
pub const MAX_ZOOM: u32 = 16;
