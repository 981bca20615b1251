pub mod export;
pub mod thumbnails;
