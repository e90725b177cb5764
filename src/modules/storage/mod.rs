mod media_store;

pub use media_store::{MediaStore, MediaStorage};
