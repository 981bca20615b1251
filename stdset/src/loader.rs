use std::{io, sync::Arc};

use crate::{
    compositor::{Compositor, RenderOptions},
    constants::{SHAPE_COLUMNS, SHAPE_ROWS},
    error::StdSetError,
    palette::Palette,
    parser::{parse_layout, parse_shape_metadata, parse_sprites},
    IndexPolicy, LayoutGrid, ShapeMetadata, ShapeRecord, SourceKind, Sprite,
};

/// Hands out the bytes of one companion file.
///
/// `Ok(None)` means the file does not exist. Finding the file (extension case, directory)
/// is entirely up to the implementor.
pub trait SourceResolver {
    fn resolve(&self, base_name: &str, kind: SourceKind) -> io::Result<Option<Vec<u8>>>;
}

impl<F> SourceResolver for F
where
    F: Fn(&str, SourceKind) -> io::Result<Option<Vec<u8>>>,
{
    fn resolve(&self, base_name: &str, kind: SourceKind) -> io::Result<Option<Vec<u8>>> {
        self(base_name, kind)
    }
}

/// A shape slot with its sprite, if the container holds one for it.
#[derive(Debug, Clone, Copy)]
pub struct Shape<'a> {
    pub record: ShapeRecord,
    pub sprite: Option<&'a Sprite>,
}

/// Everything decoded from one file set. Never mutated after [`SpriteSet::load`].
#[derive(Debug, Clone)]
pub struct SpriteSet {
    pub base_name: String,
    pub sprites: Vec<Sprite>,
    pub shapes: ShapeMetadata,
    pub layout: LayoutGrid,
    /// Raw `.dat` bytes. Not interpreted.
    pub anim_data: Option<Vec<u8>>,
}

impl SpriteSet {
    /// Builds the snapshot from already decoded parts.
    pub fn new(
        base_name: impl Into<String>,
        sprites: Vec<Sprite>,
        shapes: ShapeMetadata,
        layout: LayoutGrid,
    ) -> Self {
        Self {
            base_name: base_name.into(),
            sprites,
            shapes,
            layout,
            anim_data: None,
        }
    }

    /// Reads and decodes every companion file of `base_name`.
    ///
    /// Only the sprite container is required. Missing or unreadable metadata, layout and
    /// animation files fall back to empty tables.
    pub fn load(
        resolver: &impl SourceResolver,
        base_name: &str,
        policy: IndexPolicy,
    ) -> Result<Self, StdSetError> {
        let Some(sprite_bytes) = resolver.resolve(base_name, SourceKind::Sprites)? else {
            return Err(StdSetError::MissingSource {
                base_name: base_name.to_string(),
                kind: SourceKind::Sprites,
            });
        };

        let sprites = parse_sprites(&sprite_bytes, policy);

        if sprites.is_empty() {
            return Err(StdSetError::EmptySpriteContainer {
                base_name: base_name.to_string(),
                length: sprite_bytes.len(),
            });
        }

        log::debug!("Decoded {} sprites for `{base_name}`", sprites.len());

        let shapes = resolve_optional(resolver, base_name, SourceKind::Shapes)
            .map(|bytes| parse_shape_metadata(&bytes))
            .unwrap_or_default();

        let layout = resolve_optional(resolver, base_name, SourceKind::Layout)
            .map(|bytes| parse_layout(&bytes))
            .unwrap_or_default();

        let anim_data = resolve_optional(resolver, base_name, SourceKind::AnimObjects);

        Ok(Self {
            base_name: base_name.to_string(),
            sprites,
            shapes,
            layout,
            anim_data,
        })
    }

    /// Sprite `row * 10 + column`, only for slots inside the 10x10 table.
    pub fn sprite_at(&self, row: usize, column: usize) -> Option<&Sprite> {
        if row >= SHAPE_ROWS || column >= SHAPE_COLUMNS {
            return None;
        }

        self.sprites.get(row * SHAPE_COLUMNS + column)
    }

    pub fn shape(&self, row: usize, column: usize) -> Shape<'_> {
        Shape {
            record: self.shapes.record(row, column),
            sprite: self.sprite_at(row, column),
        }
    }

    pub fn anim_data_length(&self) -> usize {
        self.anim_data.as_ref().map(|data| data.len()).unwrap_or(0)
    }
}

fn resolve_optional(
    resolver: &impl SourceResolver,
    base_name: &str,
    kind: SourceKind,
) -> Option<Vec<u8>> {
    match resolver.resolve(base_name, kind) {
        Ok(Some(bytes)) => Some(bytes),
        Ok(None) => {
            log::info!("No {kind} file for `{base_name}`");
            None
        }
        Err(err) => {
            log::warn!("Cannot read {kind} file for `{base_name}`: {err}");
            None
        }
    }
}

/// Holds the palette and the current snapshot.
///
/// A load either replaces the snapshot entirely or leaves the previous one in place, so
/// renderers never see tables from two different file sets.
#[derive(Debug, Clone)]
pub struct Viewer {
    palette: Arc<Palette>,
    policy: IndexPolicy,
    current: Option<Arc<SpriteSet>>,
}

impl Viewer {
    pub fn new(palette: Palette, policy: IndexPolicy) -> Self {
        Self {
            palette: Arc::new(palette),
            policy,
            current: None,
        }
    }

    pub fn load(
        &mut self,
        resolver: &impl SourceResolver,
        base_name: &str,
    ) -> Result<Arc<SpriteSet>, StdSetError> {
        let set = Arc::new(SpriteSet::load(resolver, base_name, self.policy)?);

        self.current = Some(set.clone());

        Ok(set)
    }

    pub fn current(&self) -> Option<Arc<SpriteSet>> {
        self.current.clone()
    }

    pub fn palette(&self) -> Arc<Palette> {
        self.palette.clone()
    }

    /// `None` until a file set has been loaded.
    pub fn compositor(&self, options: RenderOptions) -> Option<Compositor> {
        let set = self.current.clone()?;

        Some(Compositor::new(set, self.palette.clone(), options))
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(Palette::vga(), IndexPolicy::Full)
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;

    fn memory_source(files: Vec<(&str, SourceKind, Vec<u8>)>) -> impl SourceResolver {
        let files = files
            .into_iter()
            .map(|(base_name, kind, bytes)| ((base_name.to_string(), kind), bytes))
            .collect::<HashMap<_, _>>();

        move |base_name: &str, kind: SourceKind| {
            Ok::<_, io::Error>(files.get(&(base_name.to_string(), kind)).cloned())
        }
    }

    #[test]
    fn load_sprites_only() {
        let source = memory_source(vec![("hero", SourceKind::Sprites, vec![1u8; 256 * 12])]);
        let set = SpriteSet::load(&source, "hero", IndexPolicy::Full).unwrap();

        assert_eq!(set.sprites.len(), 12);
        assert_eq!(set.shapes, ShapeMetadata::default());
        assert_eq!(set.layout.occupied_cells(), 0);
        assert!(set.anim_data.is_none());

        assert!(set.sprite_at(1, 1).is_some());
        assert!(set.sprite_at(1, 2).is_none());
        assert!(set.sprite_at(0, 10).is_none());
    }

    #[test]
    fn huge_slot_lookups_are_empty() {
        let source = memory_source(vec![("hero", SourceKind::Sprites, vec![1u8; 256 * 100])]);
        let set = SpriteSet::load(&source, "hero", IndexPolicy::Full).unwrap();

        assert!(set.sprite_at(9, 9).is_some());
        assert!(set.sprite_at(10, 0).is_none());
        assert!(set.sprite_at(usize::MAX / 2, 0).is_none());
        assert!(set.sprite_at(0, usize::MAX).is_none());

        let shape = set.shape(usize::MAX / 2, 3);

        assert!(shape.sprite.is_none());
        assert_eq!(shape.record, ShapeRecord::default());
    }

    #[test]
    fn load_full_set() {
        let mut shapes = b"0\n".to_vec();
        [16i32, 16, 1, 8, 1, 0]
            .iter()
            .for_each(|value| shapes.extend(value.to_le_bytes()));
        shapes.extend([0u8; 256]);

        let source = memory_source(vec![
            ("world", SourceKind::Sprites, vec![2u8; 256 * 3]),
            ("world", SourceKind::Shapes, shapes),
            ("world", SourceKind::Layout, b"2\n-1\n1\n".to_vec()),
            ("world", SourceKind::AnimObjects, vec![0u8; 33]),
        ]);

        let set = SpriteSet::load(&source, "world", IndexPolicy::Full).unwrap();

        assert_eq!(set.base_name, "world");
        assert!(set.shape(0, 0).record.is_active());
        assert!(set.shape(0, 0).sprite.is_some());
        assert!(!set.shape(0, 5).record.is_active());
        assert!(set.shape(0, 5).sprite.is_none());
        assert_eq!(set.layout.occupied_cells(), 2);
        assert_eq!(set.anim_data_length(), 33);
    }

    #[test]
    fn missing_sprite_container_is_fatal() {
        let source = memory_source(vec![("other", SourceKind::Sprites, vec![0u8; 256])]);
        let res = SpriteSet::load(&source, "hero", IndexPolicy::Full);

        assert!(matches!(
            res,
            Err(StdSetError::MissingSource {
                kind: SourceKind::Sprites,
                ..
            })
        ));
    }

    #[test]
    fn short_sprite_container_is_fatal() {
        let source = memory_source(vec![("hero", SourceKind::Sprites, vec![0u8; 255])]);
        let res = SpriteSet::load(&source, "hero", IndexPolicy::Full);

        assert!(matches!(
            res,
            Err(StdSetError::EmptySpriteContainer { length: 255, .. })
        ));
    }

    #[test]
    fn unreadable_companion_degrades() {
        let source = |_: &str, kind: SourceKind| match kind {
            SourceKind::Sprites => Ok(Some(vec![0u8; 256])),
            _ => Err(io::Error::other("denied")),
        };

        let set = SpriteSet::load(&source, "hero", IndexPolicy::Full).unwrap();

        assert_eq!(set.sprites.len(), 1);
        assert_eq!(set.shapes.populated_rows(), 0);
    }

    #[test]
    fn failed_load_keeps_previous_snapshot() {
        let source = memory_source(vec![
            ("first", SourceKind::Sprites, vec![1u8; 256 * 2]),
            ("broken", SourceKind::Sprites, vec![1u8; 10]),
            ("second", SourceKind::Sprites, vec![1u8; 256 * 5]),
        ]);

        let mut viewer = Viewer::default();

        assert!(viewer.current().is_none());
        assert!(viewer.compositor(RenderOptions::default()).is_none());

        let first = viewer.load(&source, "first").unwrap();

        assert!(viewer.load(&source, "broken").is_err());
        assert!(viewer.load(&source, "missing").is_err());

        let current = viewer.current().unwrap();
        assert!(Arc::ptr_eq(&first, &current));
        assert_eq!(current.sprites.len(), 2);

        viewer.load(&source, "second").unwrap();

        // the old handle is untouched by the swap
        assert_eq!(first.sprites.len(), 2);
        assert_eq!(viewer.current().unwrap().sprites.len(), 5);
    }
}
