pub mod scorer;
pub mod spectrum;

pub use scorer::{score, score_files, score_images, SimilarityReport, SimilarityScore};
pub use spectrum::magnitude_spectrum;
