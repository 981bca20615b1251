use crate::types::SourceKind;

#[derive(Debug, thiserror::Error)]
pub enum StdSetError {
    #[error("Cannot find {kind} file for `{base_name}`")]
    MissingSource {
        base_name: String,
        kind: SourceKind,
    },
    #[error("Sprite container for `{base_name}` holds no complete sprite ({length} bytes)")]
    EmptySpriteContainer { base_name: String, length: usize },
    #[error("IOError: {source}")]
    IOError {
        #[from]
        source: std::io::Error,
    },
}
