//! Turns a loaded [`SpriteSet`] into RGB images for the three views.
//!
//! Every render call is a pure function of the snapshot, the palette and the options.
//! Out of range requests produce a 0x0 image instead of an error.

use std::sync::Arc;

use image::{Rgb, RgbImage};

use crate::{
    constants::{
        ACTIVE_BORDER_COLOR, INACTIVE_BORDER_COLOR, LAYOUT_BACKGROUND_COLOR, LAYOUT_GRID_LINE_COLOR,
        LAYOUT_HEIGHT, LAYOUT_WIDTH, MAX_ZOOM, MIN_ZOOM, SHAPE_COLUMNS, SHAPE_ROWS,
        SPRITE_BACKGROUND_COLOR, SPRITE_GRID_LINE_COLOR, SPRITE_HEIGHT, SPRITE_WIDTH,
    },
    loader::SpriteSet,
    palette::Palette,
    Sprite,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Sprite,
    Grid,
    Layout,
}

impl ViewMode {
    /// Sprite -> Grid -> Layout -> Sprite
    pub fn next(self) -> Self {
        match self {
            ViewMode::Sprite => ViewMode::Grid,
            ViewMode::Grid => ViewMode::Layout,
            ViewMode::Layout => ViewMode::Sprite,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Output pixels per sprite pixel.
    pub zoom: u32,
    pub grid_lines: bool,
}

impl RenderOptions {
    pub fn new(zoom: u32, grid_lines: bool) -> Self {
        Self {
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            grid_lines,
        }
    }

    fn tile_width(&self) -> u32 {
        SPRITE_WIDTH as u32 * self.zoom
    }

    fn tile_height(&self) -> u32 {
        SPRITE_HEIGHT as u32 * self.zoom
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new(8, true)
    }
}

#[derive(Debug, Clone)]
pub struct Compositor {
    set: Arc<SpriteSet>,
    palette: Arc<Palette>,
    options: RenderOptions,
}

impl Compositor {
    pub fn new(set: Arc<SpriteSet>, palette: Arc<Palette>, options: RenderOptions) -> Self {
        Self {
            set,
            palette,
            options: RenderOptions::new(options.zoom, options.grid_lines),
        }
    }

    pub fn set(&self) -> &SpriteSet {
        &self.set
    }

    /// One slot, index 0 drawn opaque. A slot without a sprite is just the backing color.
    pub fn render_sprite(&self, row: usize, column: usize) -> RgbImage {
        if row >= SHAPE_ROWS || column >= SHAPE_COLUMNS {
            return RgbImage::new(0, 0);
        }

        let zoom = self.options.zoom;
        let (width, height) = (self.options.tile_width(), self.options.tile_height());
        let mut image = RgbImage::from_pixel(width, height, Rgb(SPRITE_BACKGROUND_COLOR));

        if let Some(sprite) = self.set.sprite_at(row, column) {
            self.blit_sprite(&mut image, sprite, 0, 0, false);
        }

        // a line per sprite pixel would cover the whole image at zoom 1
        if self.options.grid_lines && zoom > 1 {
            draw_grid_lines(&mut image, zoom, zoom, Rgb(SPRITE_GRID_LINE_COLOR));
        }

        image
    }

    /// `rows` x `columns` slots from the top left of the slot table, each with a border
    /// showing whether the slot is active.
    pub fn render_grid(&self, rows: usize, columns: usize) -> RgbImage {
        let rows = rows.min(SHAPE_ROWS);
        let columns = columns.min(SHAPE_COLUMNS);

        if rows == 0 || columns == 0 {
            return RgbImage::new(0, 0);
        }

        let (tile_width, tile_height) = (self.options.tile_width(), self.options.tile_height());
        let mut image = RgbImage::from_pixel(
            columns as u32 * tile_width,
            rows as u32 * tile_height,
            Rgb(SPRITE_BACKGROUND_COLOR),
        );

        for row in 0..rows {
            for column in 0..columns {
                let shape = self.set.shape(row, column);

                let Some(sprite) = shape.sprite else {
                    continue;
                };

                let (x, y) = (column as u32 * tile_width, row as u32 * tile_height);

                self.blit_sprite(&mut image, sprite, x, y, false);

                let border = if shape.record.is_active() {
                    ACTIVE_BORDER_COLOR
                } else {
                    INACTIVE_BORDER_COLOR
                };

                draw_rect_outline(&mut image, x, y, tile_width, tile_height, Rgb(border));
            }
        }

        image
    }

    /// Window into the layout grid starting at cell `(x_offset, y_offset)`. Index 0 is
    /// transparent here. Cells referencing slots outside the table stay empty.
    pub fn render_layout_window(
        &self,
        x_offset: usize,
        y_offset: usize,
        width: usize,
        height: usize,
    ) -> RgbImage {
        if x_offset >= LAYOUT_WIDTH || y_offset >= LAYOUT_HEIGHT {
            return RgbImage::new(0, 0);
        }

        let visible_width = width.min(LAYOUT_WIDTH - x_offset);
        let visible_height = height.min(LAYOUT_HEIGHT - y_offset);

        if visible_width == 0 || visible_height == 0 {
            return RgbImage::new(0, 0);
        }

        let (tile_width, tile_height) = (self.options.tile_width(), self.options.tile_height());
        let mut image = RgbImage::from_pixel(
            visible_width as u32 * tile_width,
            visible_height as u32 * tile_height,
            Rgb(LAYOUT_BACKGROUND_COLOR),
        );

        for y in 0..visible_height {
            for x in 0..visible_width {
                let Some((row, column)) = self.set.layout.get(x + x_offset, y + y_offset).slot()
                else {
                    continue;
                };

                let Some(sprite) = self.set.sprite_at(row, column) else {
                    continue;
                };

                self.blit_sprite(
                    &mut image,
                    sprite,
                    x as u32 * tile_width,
                    y as u32 * tile_height,
                    true,
                );
            }
        }

        if self.options.grid_lines {
            draw_grid_lines(
                &mut image,
                tile_width,
                tile_height,
                Rgb(LAYOUT_GRID_LINE_COLOR),
            );
        }

        image
    }

    /// Sprite by its position in the container, no decorations.
    pub fn sprite_image(&self, index: usize) -> Option<RgbImage> {
        let sprite = self.set.sprites.get(index)?;
        let mut image = RgbImage::new(self.options.tile_width(), self.options.tile_height());

        self.blit_sprite(&mut image, sprite, 0, 0, false);

        Some(image)
    }

    fn blit_sprite(
        &self,
        image: &mut RgbImage,
        sprite: &Sprite,
        x: u32,
        y: u32,
        transparent_zero: bool,
    ) {
        let zoom = self.options.zoom;

        for sprite_y in 0..SPRITE_HEIGHT {
            for sprite_x in 0..SPRITE_WIDTH {
                let index = sprite.index_at(sprite_x, sprite_y);

                if transparent_zero && index == 0 {
                    continue;
                }

                fill_rect(
                    image,
                    x + sprite_x as u32 * zoom,
                    y + sprite_y as u32 * zoom,
                    zoom,
                    zoom,
                    self.palette.color_of(index),
                );
            }
        }
    }
}

fn fill_rect(image: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    let x_end = (x + width).min(image.width());
    let y_end = (y + height).min(image.height());

    for pixel_y in y..y_end {
        for pixel_x in x..x_end {
            image.put_pixel(pixel_x, pixel_y, color);
        }
    }
}

fn draw_rect_outline(image: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    if width == 0 || height == 0 {
        return;
    }

    fill_rect(image, x, y, width, 1, color);
    fill_rect(image, x, y + height - 1, width, 1, color);
    fill_rect(image, x, y, 1, height, color);
    fill_rect(image, x + width - 1, y, 1, height, color);
}

/// Lines every `step_x` columns and `step_y` rows, starting at 0.
fn draw_grid_lines(image: &mut RgbImage, step_x: u32, step_y: u32, color: Rgb<u8>) {
    let (width, height) = image.dimensions();

    (0..width)
        .step_by(step_x.max(1) as usize)
        .for_each(|x| fill_rect(image, x, 0, 1, height, color));

    (0..height)
        .step_by(step_y.max(1) as usize)
        .for_each(|y| fill_rect(image, 0, y, width, 1, color));
}
