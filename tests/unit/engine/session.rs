//! Tests for background runs and supersession

#[cfg(test)]
mod tests {
    use dotraster::engine::{CancellationToken, RasterParameters, RasterSession};
    use dotraster::progress::NoProgress;
    use dotraster::raster::RasterBitmap;
    use image::{Rgba, RgbaImage};
    use std::sync::Arc;

    fn checker(size: u32) -> RasterBitmap {
        RasterBitmap::from(RgbaImage::from_fn(size, size, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                Rgba([20, 20, 20, 255])
            } else {
                Rgba([230, 230, 230, 255])
            }
        }))
    }

    fn quick() -> RasterParameters {
        RasterParameters {
            seed: Some(5),
            stall_guard: None,
            ..RasterParameters::default()
        }
    }

    fn slow() -> RasterParameters {
        RasterParameters {
            max_size: 2000,
            cluster_size: 1,
            ..quick()
        }
    }

    // Tests a started run completes and reports full progress
    // Verified by returning before the worker joins
    #[test]
    fn test_run_completes() {
        let session = RasterSession::new();

        let handle = session
            .start(checker(32), quick(), Arc::new(NoProgress))
            .expect("worker spawns");
        let output = handle.wait().expect("run succeeds");

        assert_eq!(output.image.dimensions(), (32, 32));
    }

    // Tests starting a new run cancels the previous one
    // Verified by leaving earlier runs running
    #[test]
    fn test_new_run_supersedes_previous() {
        let session = RasterSession::new();

        let first = session
            .start(checker(2000), slow(), Arc::new(NoProgress))
            .expect("worker spawns");
        let second = session
            .start(checker(32), quick(), Arc::new(NoProgress))
            .expect("worker spawns");

        assert!(first.token().is_cancelled());
        assert!(first.wait().is_err_and(|err| err.is_cancelled()));
        assert!(second.wait().is_ok());
    }

    // Tests cancel_current stops the most recent run
    // Verified by cancelling a fresh token instead of the stored one
    #[test]
    fn test_cancel_current() {
        let session = RasterSession::new();

        let handle = session
            .start(checker(2000), slow(), Arc::new(NoProgress))
            .expect("worker spawns");
        session.cancel_current();

        assert!(handle.wait().is_err_and(|err| err.is_cancelled()));
    }

    // Tests runs spawned with an external token honor it
    // Verified by spawning with a fresh token
    #[test]
    fn test_spawn_run_uses_given_token() {
        let token = CancellationToken::new();
        token.cancel();

        let handle = RasterSession::spawn_run(checker(16), quick(), Arc::new(NoProgress), token)
            .expect("worker spawns");

        assert!(handle.wait().is_err_and(|err| err.is_cancelled()));
    }
}
