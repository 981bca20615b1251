use std::fmt;

use crate::constants::{
    LAYOUT_EMPTY, LAYOUT_HEIGHT, LAYOUT_WIDTH, SHAPE_COLUMNS, SHAPE_ROWS, SPRITE_BLOCK_LENGTH,
    SPRITE_WIDTH,
};

/// How a stored byte becomes a palette index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexPolicy {
    /// The byte is the index.
    #[default]
    Full,
    /// Only the low 4 bits are kept, for the 16-color palette.
    LowNibble,
}

impl IndexPolicy {
    pub fn apply(self, byte: u8) -> u8 {
        match self {
            IndexPolicy::Full => byte,
            IndexPolicy::LowNibble => byte & 0x0F,
        }
    }
}

/// 16x16 palette indices, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite(pub [u8; SPRITE_BLOCK_LENGTH]);

impl Sprite {
    pub fn index_at(&self, x: usize, y: usize) -> u8 {
        self.0[y * SPRITE_WIDTH + x]
    }

    pub fn get_bytes(&self) -> &[u8; SPRITE_BLOCK_LENGTH] {
        &self.0
    }
}

/// Header of one shape slot in the metadata file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShapeRecord {
    pub width: i32,
    pub height: i32,
    pub frame_count: i32,
    pub color_depth: i32,
    pub flag: i32,
    pub row_flag: i32,
}

impl ShapeRecord {
    pub fn is_active(&self) -> bool {
        self.flag != 0
    }

    pub fn row_continues(&self) -> bool {
        self.row_flag != 0
    }
}

/// Row summary. `max` is the highest column index the metadata declares for the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnimObject {
    pub max: Option<u8>,
}

impl AnimObject {
    pub fn is_populated(&self) -> bool {
        self.max.is_some()
    }
}

/// Shape metadata for the fixed 10x10 slot table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShapeMetadata {
    /// `None` for slots the metadata never described.
    pub slots: [[Option<ShapeRecord>; SHAPE_COLUMNS]; SHAPE_ROWS],
    pub rows: [AnimObject; SHAPE_ROWS],
}

impl ShapeMetadata {
    /// Zero-valued placeholder for undescribed or out of range slots.
    pub fn record(&self, row: usize, column: usize) -> ShapeRecord {
        self.get(row, column).copied().unwrap_or_default()
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&ShapeRecord> {
        self.slots.get(row)?.get(column)?.as_ref()
    }

    /// Records actually read for `row`, in column order.
    pub fn row_records(&self, row: usize) -> impl Iterator<Item = &ShapeRecord> {
        self.slots
            .get(row)
            .into_iter()
            .flat_map(|columns| columns.iter().flatten())
    }

    pub fn row(&self, row: usize) -> Option<&AnimObject> {
        self.rows.get(row)
    }

    pub fn populated_rows(&self) -> usize {
        self.rows.iter().filter(|row| row.is_populated()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutCell {
    #[default]
    Empty,
    /// `row * 10 + column`. Not validated until resolved.
    Shape(u32),
}

impl LayoutCell {
    pub fn from_value(value: i32) -> Self {
        if value <= LAYOUT_EMPTY {
            LayoutCell::Empty
        } else {
            LayoutCell::Shape(value as u32)
        }
    }

    /// `(row, column)` when both fall inside the slot table.
    pub fn slot(&self) -> Option<(usize, usize)> {
        let LayoutCell::Shape(value) = *self else {
            return None;
        };

        let row = (value / SHAPE_COLUMNS as u32) as usize;
        let column = (value % SHAPE_COLUMNS as u32) as usize;

        if row < SHAPE_ROWS && column < SHAPE_COLUMNS {
            Some((row, column))
        } else {
            None
        }
    }
}

/// 100x100 tile map, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutGrid(pub Vec<LayoutCell>);

impl LayoutGrid {
    pub fn new() -> Self {
        Self(vec![LayoutCell::Empty; LAYOUT_WIDTH * LAYOUT_HEIGHT])
    }

    pub fn get(&self, x: usize, y: usize) -> LayoutCell {
        if x >= LAYOUT_WIDTH || y >= LAYOUT_HEIGHT {
            return LayoutCell::Empty;
        }

        self.0[y * LAYOUT_WIDTH + x]
    }

    pub fn set(&mut self, x: usize, y: usize, cell: LayoutCell) {
        if x < LAYOUT_WIDTH && y < LAYOUT_HEIGHT {
            self.0[y * LAYOUT_WIDTH + x] = cell;
        }
    }

    pub fn occupied_cells(&self) -> usize {
        self.0
            .iter()
            .filter(|cell| !matches!(cell, LayoutCell::Empty))
            .count()
    }
}

impl Default for LayoutGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Companion files of one file set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// `.std`
    Sprites,
    /// `.inf`
    Shapes,
    /// `.map`
    Layout,
    /// `.dat`
    AnimObjects,
}

impl SourceKind {
    /// Lowercase file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            SourceKind::Sprites => "std",
            SourceKind::Shapes => "inf",
            SourceKind::Layout => "map",
            SourceKind::AnimObjects => "dat",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}
