use std::{path::Path, sync::Arc};

use image::{imageops, Rgb, RgbImage};
use stdset::{
    constants::SPRITE_WIDTH, decode_sprites, Compositor, IndexPolicy, Palette, RenderOptions,
    Sprite, SpriteSet,
};

use crate::source::DirectorySource;

const SHEET_COLUMNS: u32 = 5;
const SHEET_PADDING: u32 = 5;
const SHEET_BACKGROUND: [u8; 3] = [255, 255, 255];
const THUMBNAIL_ZOOM: u32 = 4;

/// First sprite of every container in the directory, five per row.
///
/// Containers that cannot be read or are too short to hold a sprite are skipped. Returns the sheet and the names
/// that made it in.
pub fn thumbnail_sheet(
    source: &DirectorySource,
    palette: Arc<Palette>,
    policy: IndexPolicy,
) -> eyre::Result<(RgbImage, Vec<String>)> {
    let options = RenderOptions::new(THUMBNAIL_ZOOM, false);

    let mut thumbnails = vec![];

    for base_name in source.base_names() {
        let Some(path) = source.find(&base_name, stdset::SourceKind::Sprites) else {
            continue;
        };

        let Some(sprite) = first_sprite(&path, policy) else {
            continue;
        };

        let set = SpriteSet::new(
            base_name.as_str(),
            vec![sprite],
            Default::default(),
            Default::default(),
        );
        let compositor = Compositor::new(Arc::new(set), palette.clone(), options);

        if let Some(image) = compositor.sprite_image(0) {
            thumbnails.push((base_name, image));
        }
    }

    let tile = SPRITE_WIDTH as u32 * THUMBNAIL_ZOOM + SHEET_PADDING * 2;
    let count = thumbnails.len() as u32;
    let columns = count.clamp(1, SHEET_COLUMNS);
    let rows = count.div_ceil(SHEET_COLUMNS).max(1);

    let mut sheet = RgbImage::from_pixel(columns * tile, rows * tile, Rgb(SHEET_BACKGROUND));

    thumbnails.iter().enumerate().for_each(|(index, (_, image))| {
        let index = index as u32;
        let x = (index % SHEET_COLUMNS) * tile + SHEET_PADDING;
        let y = (index / SHEET_COLUMNS) * tile + SHEET_PADDING;

        imageops::overlay(&mut sheet, image, x as i64, y as i64);
    });

    let names = thumbnails.into_iter().map(|(name, _)| name).collect();

    Ok((sheet, names))
}

fn first_sprite(path: &Path, policy: IndexPolicy) -> Option<Sprite> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("Cannot read {}: {err}", path.display());
            return None;
        }
    };

    let sprite = decode_sprites(&bytes, policy).into_iter().next();

    if sprite.is_none() {
        log::warn!("{} holds no complete sprite", path.display());
    }

    sprite
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    #[test]
    fn sheet_layout() {
        let dir = tempfile::tempdir().unwrap();

        for (index, name) in ["a", "b", "c", "d", "e", "f"].iter().enumerate() {
            fs::write(dir.path().join(format!("{name}.std")), [index as u8; 256]).unwrap();
        }
        fs::write(dir.path().join("short.std"), [1u8; 100]).unwrap();

        let source = DirectorySource::new(dir.path());
        let palette = Arc::new(Palette::vga());
        let (sheet, names) = thumbnail_sheet(&source, palette.clone(), IndexPolicy::Full).unwrap();

        assert_eq!(names.len(), 6);
        assert!(!names.contains(&"short".to_string()));
        assert_eq!(sheet.dimensions(), (5 * 74, 2 * 74));

        // "f" is the sixth name, first column of the second row
        assert_eq!(*sheet.get_pixel(5 + 10, 74 + 5 + 10), palette.color_of(5));
        assert_eq!(*sheet.get_pixel(74 + 5 + 10, 5 + 10), palette.color_of(1));
        assert_eq!(*sheet.get_pixel(0, 0), Rgb(SHEET_BACKGROUND));
    }

    #[test]
    fn unreadable_container_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.std");

        assert!(first_sprite(&path, IndexPolicy::Full).is_none());

        fs::write(&path, [3u8; 300]).unwrap();

        let sprite = first_sprite(&path, IndexPolicy::LowNibble).unwrap();
        assert_eq!(sprite.index_at(0, 0), 3);
    }
}
