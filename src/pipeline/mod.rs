//! Processing pipeline components.

mod coordinator;
mod upload;

pub use coordinator::collect_input_images;
pub use upload::{ImageUpload, is_image_file, mime_type_for};
