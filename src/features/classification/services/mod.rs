mod classification_service;

pub use classification_service::{ClassificationOutcome, ClassificationService};
