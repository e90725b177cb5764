mod classification_dto;

pub use classification_dto::{ClassificationResultDto, ClassifyImageDto};
