//! Tests for the staged pipeline and its progress contract

#[cfg(test)]
mod tests {
    use dotraster::RasterError;
    use dotraster::engine::{
        CancellationToken, Finish, LayerStrategy, RasterParameters, rasterize, run_pipeline,
    };
    use dotraster::progress::{NoProgress, ProgressTracker};
    use dotraster::raster::{PixelFormat, RasterBitmap};
    use image::{Rgba, RgbaImage};
    use std::sync::{Arc, Mutex};

    fn gradient(width: u32, height: u32) -> RasterBitmap {
        RasterBitmap::from(RgbaImage::from_fn(width, height, |x, y| {
            let v = ((x + y) * 255 / (width + height)) as u8;
            Rgba([v, v / 2, 255 - v, 255])
        }))
    }

    fn params() -> RasterParameters {
        RasterParameters {
            seed: Some(11),
            stall_guard: None,
            cluster_size: 6,
            ..RasterParameters::default()
        }
    }

    // Tests a transparent run keeps the source size and publishes monotonic progress
    // Verified by resetting progress between layers
    #[test]
    fn test_progress_is_monotonic_and_completes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let tracker = ProgressTracker::with_sink(Arc::new(move |value: f64| {
            sink.lock().expect("sink lock").push(value);
        }));

        let output = run_pipeline(
            gradient(64, 48),
            &params(),
            &tracker,
            &CancellationToken::new(),
        )
        .expect("pipeline succeeds");

        assert_eq!(output.image.dimensions(), (64, 48));
        assert_eq!(output.image.pixel_format(), PixelFormat::Rgba8);
        let seen = seen.lock().expect("sink lock");
        assert!((seen.first().copied().unwrap_or(1.0)).abs() < f64::EPSILON);
        assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(seen.iter().any(|v| (v - 0.1).abs() < 1e-12));
        assert!((seen.last().copied().unwrap_or_default() - 1.0).abs() < f64::EPSILON);
    }

    // Tests empty sources are rejected as invalid input
    // Verified by letting the resize step run on empty images
    #[test]
    fn test_empty_source_is_invalid_input() {
        let result = run_pipeline(
            RasterBitmap::from(RgbaImage::new(0, 10)),
            &params(),
            &ProgressTracker::new(),
            &CancellationToken::new(),
        );

        assert!(matches!(result, Err(RasterError::InvalidInput { .. })));
    }

    // Tests invalid parameters are rejected before any work
    // Verified by validating after resizing
    #[test]
    fn test_invalid_parameters_rejected() {
        let invalid = RasterParameters {
            cluster_size: 0,
            ..params()
        };

        let result = run_pipeline(
            gradient(8, 8),
            &invalid,
            &ProgressTracker::new(),
            &CancellationToken::new(),
        );

        assert!(result.is_err_and(|err| err.is_invalid_input()));
    }

    // Tests the source is downscaled to max_size before painting
    // Verified by skipping the resize step
    #[test]
    fn test_output_respects_max_size() {
        let small = RasterParameters {
            max_size: 50,
            ..params()
        };

        let image = rasterize(gradient(200, 100), &small, Arc::new(NoProgress))
            .expect("rasterizes");

        assert_eq!(image.dimensions(), (50, 25));
    }

    // Tests background and frame finishing
    // Verified by leaving framed output transparent
    #[test]
    fn test_finishing_modes() {
        let background = RasterParameters {
            finish: Finish::Background,
            ..params()
        };
        let framed = RasterParameters {
            finish: Finish::PrintFrame,
            ..params()
        };
        let tracker = ProgressTracker::new();
        let cancel = CancellationToken::new();

        let flat = run_pipeline(gradient(40, 20), &background, &tracker, &cancel)
            .expect("pipeline succeeds")
            .image;
        let frame = run_pipeline(gradient(40, 20), &framed, &tracker, &cancel)
            .expect("pipeline succeeds")
            .image;

        assert!(flat.to_rgba().pixels().all(|p| p.0[3] == 255));
        assert_eq!(frame.dimensions(), (58, 38));
        assert_eq!(frame.rgba(0, 0), Some(Rgba([255, 255, 255, 255])));
    }

    // Tests region strategy paints one layer per level
    // Verified by painting a single layer regardless of strategy
    #[test]
    fn test_regions_paint_one_layer_per_level() {
        let regions = RasterParameters {
            layers: 3,
            layer_strategy: LayerStrategy::Regions,
            ..params()
        };

        let output = run_pipeline(
            gradient(60, 60),
            &regions,
            &ProgressTracker::new(),
            &CancellationToken::new(),
        )
        .expect("pipeline succeeds");

        assert_eq!(output.layers.len(), 3);
        assert!(output.total_stats().dots_painted > 0);
        assert!(output.total_stats().dots_masked > 0);
    }

    // Tests identical seeds reproduce identical output
    // Verified by seeding from the OS
    #[test]
    fn test_seeded_runs_are_deterministic() {
        let tracker = ProgressTracker::new();
        let cancel = CancellationToken::new();

        let first = run_pipeline(gradient(32, 32), &params(), &tracker, &cancel)
            .expect("pipeline succeeds");
        let second = run_pipeline(gradient(32, 32), &params(), &tracker, &cancel)
            .expect("pipeline succeeds");

        assert_eq!(first, second);
    }

    // Tests a pre-cancelled token yields no bitmap
    // Verified by checking the token only inside the generator
    #[test]
    fn test_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = run_pipeline(gradient(16, 16), &params(), &ProgressTracker::new(), &cancel);

        assert!(matches!(
            result,
            Err(RasterError::Cancelled { cells_processed: 0 })
        ));
    }
}
