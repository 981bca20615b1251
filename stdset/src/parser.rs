//! Parsers for the three companion files.
//!
//! The top level functions never fail. Short or garbled input truncates the result and
//! whatever was read before that point is kept.

use nom::{
    bytes::complete::{tag, take, take_till},
    combinator::{map, map_opt, opt},
    multi::many0,
    number::complete::le_i32,
    sequence::terminated,
    IResult as _IResult, Parser,
};

use crate::{
    constants::{
        LAYOUT_HEIGHT, LAYOUT_WIDTH, SHAPE_BLOCK_LENGTH, SHAPE_COLUMNS, SHAPE_ROWS,
        SPRITE_BLOCK_LENGTH,
    },
    IndexPolicy, LayoutCell, LayoutGrid, ShapeMetadata, ShapeRecord, Sprite,
};

pub type IResult<'a, T> = _IResult<&'a [u8], T>;

pub fn parse_sprite(i: &'_ [u8], policy: IndexPolicy) -> IResult<'_, Sprite> {
    map(take(SPRITE_BLOCK_LENGTH), |block: &[u8]| {
        let mut pixels = [0u8; SPRITE_BLOCK_LENGTH];

        pixels
            .iter_mut()
            .zip(block)
            .for_each(|(pixel, &byte)| *pixel = policy.apply(byte));

        Sprite(pixels)
    })
    .parse(i)
}

/// Splits the container into 256-byte blocks. A trailing partial block is dropped.
pub fn parse_sprites(i: &[u8], policy: IndexPolicy) -> Vec<Sprite> {
    let Ok((rest, sprites)) = many0(|i| parse_sprite(i, policy)).parse(i) else {
        return vec![];
    };

    if !rest.is_empty() {
        log::warn!(
            "Discarding {} trailing bytes after {} sprites",
            rest.len(),
            sprites.len()
        );
    }

    sprites
}

/// One line holding a decimal integer. Surrounding whitespace and `\r` are ignored.
pub fn parse_decimal_line(i: &'_ [u8]) -> IResult<'_, i32> {
    map_opt(
        terminated(take_till(|c: u8| c == b'\n'), opt(tag(&b"\n"[..]))),
        |line: &[u8]| std::str::from_utf8(line).ok()?.trim().parse::<i32>().ok(),
    )
    .parse(i)
}

pub fn parse_shape_record(i: &'_ [u8]) -> IResult<'_, ShapeRecord> {
    map(
        (le_i32, le_i32, le_i32, le_i32, le_i32, le_i32),
        |(width, height, frame_count, color_depth, flag, row_flag)| ShapeRecord {
            width,
            height,
            frame_count,
            color_depth,
            flag,
            row_flag,
        },
    )
    .parse(i)
}

// pixels are owned by the sprite container, only the length matters here
fn skip_shape_block(i: &'_ [u8]) -> IResult<'_, ()> {
    map(take(SHAPE_BLOCK_LENGTH), |_| ()).parse(i)
}

/// Reads up to 10 row groups: a count line with the row's max column index, then
/// `max + 1` shape records each followed by an embedded pixel block.
pub fn parse_shape_metadata(i: &[u8]) -> ShapeMetadata {
    let mut metadata = ShapeMetadata::default();
    let mut i = i;

    'rows: for row in 0..SHAPE_ROWS {
        let Ok((rest, max)) = parse_decimal_line(i) else {
            if !i.is_empty() {
                log::warn!("Malformed count line for shape row {row}, stop reading metadata");
            }

            break;
        };

        if max < 0 {
            log::warn!("Negative count ({max}) for shape row {row}, stop reading metadata");
            break;
        }

        i = rest;

        let declared = max as usize;
        let stored = declared.min(SHAPE_COLUMNS - 1);

        if declared != stored {
            log::warn!("Shape row {row} declares max column {declared}, keeping {stored}");
        }

        metadata.rows[row].max = Some(stored as u8);

        for column in 0..=declared {
            let Ok((rest, record)) = parse_shape_record(i) else {
                log::warn!("Incomplete shape record {column} in row {row}");
                break 'rows;
            };

            if column < SHAPE_COLUMNS {
                metadata.slots[row][column] = Some(record);
            }

            let Ok((rest, _)) = skip_shape_block(rest) else {
                log::warn!("Shape block {column} in row {row} is cut short");
                break 'rows;
            };

            i = rest;
        }
    }

    log::debug!(
        "Read shape metadata for {} rows",
        metadata.populated_rows()
    );

    metadata
}

/// One integer per line, row-major: line `k` fills `x = k % 100`, `y = k / 100`.
pub fn parse_layout(i: &[u8]) -> LayoutGrid {
    let mut grid = LayoutGrid::new();
    let mut i = i;

    for index in 0..(LAYOUT_WIDTH * LAYOUT_HEIGHT) {
        let Ok((rest, value)) = parse_decimal_line(i) else {
            if !i.is_empty() {
                log::warn!("Malformed layout record {index}, remaining cells stay empty");
            } else {
                log::debug!("Layout ends after {index} records");
            }

            break;
        };

        grid.set(
            index % LAYOUT_WIDTH,
            index / LAYOUT_WIDTH,
            LayoutCell::from_value(value),
        );

        i = rest;
    }

    grid
}
