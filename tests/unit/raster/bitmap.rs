//! Tests for bitmap access, conversion and downscaling

#[cfg(test)]
mod tests {
    use dotraster::raster::{PixelFormat, RasterBitmap};
    use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

    // Tests out-of-bounds and negative coordinates yield no pixel
    // Verified by removing the u32 conversion guard
    #[test]
    fn test_pixel_access_outside_bounds_is_none() {
        let bitmap = RasterBitmap::from(RgbaImage::from_pixel(4, 3, Rgba([1, 2, 3, 255])));

        assert_eq!(bitmap.rgba(3, 2), Some(Rgba([1, 2, 3, 255])));
        assert_eq!(bitmap.rgba(4, 0), None);
        assert_eq!(bitmap.rgba(-1, 0), None);
        assert_eq!(bitmap.luma(0, 3), None);
    }

    // Tests gray pixels expand to opaque RGBA
    // Verified by returning alpha zero for gray pixels
    #[test]
    fn test_gray_expands_to_opaque_rgba() {
        let bitmap = RasterBitmap::from(GrayImage::from_pixel(2, 2, Luma([77])));

        assert_eq!(bitmap.pixel_format(), PixelFormat::Gray8);
        assert_eq!(bitmap.rgba(1, 1), Some(Rgba([77, 77, 77, 255])));
        assert_eq!(bitmap.luma(1, 1), Some(77));
        assert!(bitmap.as_gray().is_some());
        assert!(bitmap.as_rgba().is_none());
    }

    // Tests downscaling preserves aspect ratio and bounds the longest side
    // Verified by scaling against the shorter side
    #[test]
    fn test_fit_within_downscales_longest_side() {
        let bitmap = RasterBitmap::from(RgbaImage::new(400, 200));

        let resized = bitmap.fit_within(100);

        assert_eq!(resized.dimensions(), (100, 50));
        assert_eq!(resized.pixel_format(), PixelFormat::Rgba8);
    }

    // Tests images already within bounds are never upscaled
    // Verified by always resizing to max_size
    #[test]
    fn test_fit_within_never_upscales() {
        let bitmap = RasterBitmap::from(GrayImage::new(30, 60));

        let resized = bitmap.clone().fit_within(1800);

        assert_eq!(resized, bitmap);
    }

    // Tests dynamic images map to the matching variant
    // Verified by converting every dynamic image to RGBA
    #[test]
    fn test_from_dynamic_image_keeps_gray() {
        let gray = RasterBitmap::from(DynamicImage::ImageLuma8(GrayImage::new(2, 2)));
        let color = RasterBitmap::from(DynamicImage::new_rgb8(2, 2));

        assert_eq!(gray.pixel_format(), PixelFormat::Gray8);
        assert_eq!(color.pixel_format(), PixelFormat::Rgba8);
    }

    // Tests zero-sized bitmaps report empty
    // Verified by checking only width
    #[test]
    fn test_is_empty() {
        assert!(RasterBitmap::from(RgbaImage::new(5, 0)).is_empty());
        assert!(!RasterBitmap::from(RgbaImage::new(1, 1)).is_empty());
    }
}
