mod classification_handler;

pub use classification_handler::*;
