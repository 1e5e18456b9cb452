use image::GrayImage;
use imageproc::morphology::{grayscale_dilate, Mask};

/// Grayscale dilation with a 3x3 (8-connected) max filter.
///
/// Each output pixel is the maximum of itself and its neighbours; neighbours
/// outside the image are ignored.
pub fn dilate_once(mask: &GrayImage) -> GrayImage {
    grayscale_dilate(mask, &Mask::square(1))
}

/// Applies [`dilate_once`] `iterations` times, stopping early once the mask
/// no longer changes.
pub fn dilate(mask: &GrayImage, iterations: u32) -> GrayImage {
    let kernel = Mask::square(1);
    let mut current = mask.clone();
    for i in 0..iterations {
        let next = grayscale_dilate(&current, &kernel);
        if next == current {
            tracing::trace!(iteration = i, "dilation saturated");
            break;
        }
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32, values: &[u8]) -> GrayImage {
        GrayImage::from_raw(width, height, values.to_vec()).unwrap()
    }

    #[test]
    fn test_single_pixel_grows_to_square() {
        let mut mask = GrayImage::new(5, 5);
        mask.put_pixel(2, 2, image::Luma([200]));

        let dilated = dilate_once(&mask);
        for (x, y, pixel) in dilated.enumerate_pixels() {
            let expected = if (1..=3).contains(&y) && (1..=3).contains(&x) {
                200
            } else {
                0
            };
            assert_eq!(pixel[0], expected, "at ({x}, {y})");
        }
    }

    #[test]
    fn test_keeps_maximum() {
        let mask = gray(3, 3, &[10, 0, 0, 0, 0, 0, 0, 0, 90]);
        let dilated = dilate_once(&mask);
        assert_eq!(dilated.into_raw(), vec![10, 10, 0, 10, 90, 90, 0, 90, 90]);
    }

    #[test]
    fn test_edges_do_not_wrap() {
        let mask = gray(4, 1, &[255, 0, 0, 0]);
        assert_eq!(dilate_once(&mask).into_raw(), vec![255, 255, 0, 0]);
    }

    #[test]
    fn test_iterations_and_saturation() {
        let mut mask = GrayImage::new(7, 3);
        mask.put_pixel(0, 1, image::Luma([255]));

        let row: Vec<u8> = (0..7).map(|x| dilate(&mask, 2).get_pixel(x, 1)[0]).collect();
        assert_eq!(row, vec![255, 255, 255, 0, 0, 0, 0]);
        assert!(dilate(&mask, 100).pixels().all(|p| p[0] == 255));
        assert_eq!(dilate(&mask, 0), mask);
    }

    #[test]
    fn test_empty_mask_stays_empty() {
        let mask = GrayImage::new(4, 4);
        assert_eq!(dilate(&mask, 10), mask);
    }

    #[test]
    fn test_one_by_one() {
        let mask = gray(1, 1, &[42]);
        assert_eq!(dilate_once(&mask), mask);
    }
}
