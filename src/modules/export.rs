use std::path::Path;

use rayon::prelude::*;
use stdset::Compositor;

use crate::config::ExportFormat;

/// Writes every sprite of the loaded set as `<out>/<base>_<index>.<ext>`.
///
/// Returns how many images were written. Failures are logged and skipped.
pub fn export_sprites(
    compositor: &Compositor,
    out_dir: impl AsRef<Path>,
    format: ExportFormat,
) -> eyre::Result<usize> {
    let out_dir = out_dir.as_ref();
    let base_name = &compositor.set().base_name;

    std::fs::create_dir_all(out_dir)?;

    let written = (0..compositor.set().sprites.len())
        .into_par_iter()
        .filter(|&index| {
            let Some(image) = compositor.sprite_image(index) else {
                return false;
            };

            let path = out_dir.join(format!("{base_name}_{index}.{}", format.extension()));

            match image.save_with_format(&path, format.image_format()) {
                Ok(_) => true,
                Err(err) => {
                    log::error!("Error saving sprite #{index} to {}: {err}", path.display());
                    false
                }
            }
        })
        .count();

    Ok(written)
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use stdset::{decode_sprites, IndexPolicy, Palette, RenderOptions, SpriteSet};

    use super::*;

    #[test]
    fn export_writes_one_file_per_sprite() {
        let dir = tempfile::tempdir().unwrap();
        let set = SpriteSet::new(
            "hero",
            decode_sprites(&[4u8; 256 * 3 + 17], IndexPolicy::Full),
            Default::default(),
            Default::default(),
        );
        let compositor = Compositor::new(
            Arc::new(set),
            Arc::new(Palette::vga()),
            RenderOptions::new(1, false),
        );

        let written = export_sprites(&compositor, dir.path(), ExportFormat::Png).unwrap();

        assert_eq!(written, 3);

        let image = image::open(dir.path().join("hero_2.png")).unwrap().to_rgb8();

        assert_eq!(image.dimensions(), (16, 16));
        assert_eq!(*image.get_pixel(7, 7), Palette::vga().color_of(4));
        assert!(!dir.path().join("hero_3.png").exists());
    }
}
