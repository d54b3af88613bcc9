//! Tests for image loading and PNG export

#[cfg(test)]
mod tests {
    use dotraster::RasterError;
    use dotraster::io::image::{is_supported_image, load_bitmap, save_bitmap};
    use dotraster::raster::{PixelFormat, RasterBitmap};
    use image::{Rgba, RgbaImage};
    use std::path::Path;

    // Tests extension matching ignores case and rejects other formats
    // Verified by matching case-sensitively
    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_image(Path::new("a.PNG")));
        assert!(is_supported_image(Path::new("b.jpeg")));
        assert!(!is_supported_image(Path::new("c.gif")));
        assert!(!is_supported_image(Path::new("noext")));
    }

    // Tests saving creates missing directories and the PNG decodes back
    // Verified by skipping directory creation
    #[test]
    fn test_save_creates_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("out.png");
        let bitmap = RasterBitmap::from(RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4])));

        save_bitmap(&bitmap, &path).expect("saves");
        let loaded = load_bitmap(&path).expect("loads");

        assert_eq!(loaded.pixel_format(), PixelFormat::Rgba8);
        assert_eq!(loaded.rgba(2, 1), Some(Rgba([1, 2, 3, 4])));
    }

    // Tests missing files surface as load errors with the path
    // Verified by mapping load failures to FileSystem
    #[test]
    fn test_missing_file_is_image_load_error() {
        let result = load_bitmap(Path::new("/definitely/not/here.png"));

        assert!(matches!(result, Err(RasterError::ImageLoad { .. })));
    }
}
