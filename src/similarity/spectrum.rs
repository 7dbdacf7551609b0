use image::GrayImage;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Magnitudes below this are treated as this value so `log10` stays finite
/// on flat images, where most frequency bins are exactly zero.
const MAGNITUDE_FLOOR: f64 = 1e-9;

/// Row-major `20 * log10(|F|)` of the centered 2D DFT of `image`.
pub fn magnitude_spectrum(image: &GrayImage) -> Vec<f64> {
    let (width, height) = (image.width() as usize, image.height() as usize);
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mut grid: Vec<Complex<f64>> = image
        .pixels()
        .map(|p| Complex::new(f64::from(p.0[0]), 0.0))
        .collect();

    let mut planner = FftPlanner::<f64>::new();

    let row_fft = planner.plan_fft_forward(width);
    for row in grid.chunks_exact_mut(width) {
        row_fft.process(row);
    }

    let column_fft = planner.plan_fft_forward(height);
    let mut column = vec![Complex::new(0.0, 0.0); height];
    for x in 0..width {
        for y in 0..height {
            column[y] = grid[y * width + x];
        }
        column_fft.process(&mut column);
        for y in 0..height {
            grid[y * width + x] = column[y];
        }
    }

    let mut spectrum = vec![0.0; width * height];
    for y in 0..height {
        let shifted_y = (y + height / 2) % height;
        for x in 0..width {
            let shifted_x = (x + width / 2) % width;
            let magnitude = grid[y * width + x].norm().max(MAGNITUDE_FLOOR);
            spectrum[shifted_y * width + shifted_x] = 20.0 * magnitude.log10();
        }
    }
    spectrum
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn flat_image_has_single_centered_peak() {
        let img = GrayImage::from_pixel(8, 6, Luma([100]));
        let spectrum = magnitude_spectrum(&img);
        assert_eq!(spectrum.len(), 48);

        // DC lands on (w/2, h/2) after the shift
        let dc = spectrum[3 * 8 + 4];
        let expected = 20.0 * (100.0f64 * 48.0).log10();
        assert!((dc - expected).abs() < 1e-9, "dc={dc}");

        let floor = 20.0 * MAGNITUDE_FLOOR.log10();
        for (i, value) in spectrum.iter().enumerate() {
            if i != 3 * 8 + 4 {
                assert!((value - floor).abs() < 1e-6, "bin {i} = {value}");
            }
        }
    }

    #[test]
    fn odd_sizes_shift_like_numpy() {
        // fftshift of length 5 moves index 0 to index 2
        let img = GrayImage::from_pixel(5, 5, Luma([1]));
        let spectrum = magnitude_spectrum(&img);
        let peak = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 2 * 5 + 2);
    }

    #[test]
    fn empty_image_has_empty_spectrum() {
        assert!(magnitude_spectrum(&GrayImage::new(0, 4)).is_empty());
    }
}
