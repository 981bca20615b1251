//! Finds the companion files of a file set inside one directory.
use std::{
    io,
    path::{Path, PathBuf},
};

use stdset::{SourceKind, SourceResolver};
use walkdir::WalkDir;

pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// `base.ext`, then `base.EXT`, then any other extension casing.
    pub fn find(&self, base_name: &str, kind: SourceKind) -> Option<PathBuf> {
        let lower = kind.extension();
        let upper = lower.to_uppercase();

        let found = [lower, upper.as_str()]
            .into_iter()
            .map(|extension| self.root.join(format!("{base_name}.{extension}")))
            .find(|path| path.is_file())
            .or_else(|| {
                self.files().find(|path| {
                    path.file_stem().and_then(|stem| stem.to_str()) == Some(base_name)
                        && has_extension(path, lower)
                })
            });

        found
    }

    /// Base names of every sprite container in the directory, sorted.
    pub fn base_names(&self) -> Vec<String> {
        let mut names = self
            .files()
            .filter(|path| has_extension(path, SourceKind::Sprites.extension()))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(|stem| stem.to_string())
            })
            .collect::<Vec<String>>();

        names.sort();
        names.dedup();

        names
    }

    fn files(&self) -> impl Iterator<Item = PathBuf> {
        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
    }
}

impl SourceResolver for DirectorySource {
    fn resolve(&self, base_name: &str, kind: SourceKind) -> io::Result<Option<Vec<u8>>> {
        let Some(path) = self.find(base_name, kind) else {
            return Ok(None);
        };

        log::info!("Loading {}", path.display());

        std::fs::read(path).map(Some)
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Base name `step` places away from `current` in `names`, wrapping around. An unknown
/// `current` counts from the first name.
pub fn step_base_name(names: &[String], current: &str, step: i64) -> Option<String> {
    if names.is_empty() {
        return None;
    }

    let start = names.iter().position(|name| name == current).unwrap_or(0) as i64;
    let index = (start + step).rem_euclid(names.len() as i64) as usize;

    names.get(index).cloned()
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    #[test]
    fn resolve_case_variants() {
        let dir = tempfile::tempdir().unwrap();

        fs::write(dir.path().join("hero.STD"), [1u8; 256]).unwrap();
        fs::write(dir.path().join("hero.inf"), b"0\n").unwrap();
        fs::write(dir.path().join("hero.Map"), b"1\n").unwrap();

        let source = DirectorySource::new(dir.path());

        assert_eq!(
            source.resolve("hero", SourceKind::Sprites).unwrap(),
            Some(vec![1u8; 256])
        );
        assert_eq!(
            source.resolve("hero", SourceKind::Shapes).unwrap(),
            Some(b"0\n".to_vec())
        );
        assert_eq!(
            source.resolve("hero", SourceKind::Layout).unwrap(),
            Some(b"1\n".to_vec())
        );
        assert_eq!(source.resolve("hero", SourceKind::AnimObjects).unwrap(), None);
        assert_eq!(source.resolve("villain", SourceKind::Sprites).unwrap(), None);
    }

    #[test]
    fn find_prefers_exact_casing() {
        let dir = tempfile::tempdir().unwrap();

        fs::write(dir.path().join("hero.MAP"), b"2\n").unwrap();
        fs::write(dir.path().join("hero.dat"), b"").unwrap();

        let source = DirectorySource::new(dir.path());

        assert_eq!(
            source.find("hero", SourceKind::Layout),
            Some(dir.path().join("hero.MAP"))
        );
        assert_eq!(
            source.find("hero", SourceKind::AnimObjects),
            Some(dir.path().join("hero.dat"))
        );
        assert_eq!(source.find("hero", SourceKind::Shapes), None);
    }

    #[test]
    fn scan_base_names() {
        let dir = tempfile::tempdir().unwrap();

        fs::write(dir.path().join("b.std"), [0u8; 256]).unwrap();
        fs::write(dir.path().join("a.STD"), [0u8; 256]).unwrap();
        fs::write(dir.path().join("a.inf"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("nested.std")).unwrap();

        let source = DirectorySource::new(dir.path());

        assert_eq!(source.base_names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn step_wraps() {
        let names = ["a", "b", "c"].map(String::from).to_vec();

        assert_eq!(step_base_name(&names, "a", 1).as_deref(), Some("b"));
        assert_eq!(step_base_name(&names, "a", -1).as_deref(), Some("c"));
        assert_eq!(step_base_name(&names, "c", 1).as_deref(), Some("a"));
        assert_eq!(step_base_name(&names, "zzz", 0).as_deref(), Some("a"));
        assert_eq!(step_base_name(&[], "a", 1), None);
    }
}
