//! Tests for the monotonic progress tracker

#[cfg(test)]
mod tests {
    use dotraster::progress::{ProgressSink, ProgressTracker};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use std::sync::{Arc, Mutex};
    use std::thread;

    fn recording() -> (ProgressTracker, Arc<Mutex<Vec<f64>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let tracker = ProgressTracker::with_sink(Arc::new(move |value: f64| {
            sink.lock().expect("sink lock").push(value);
        }));
        (tracker, seen)
    }

    // Tests lower candidates never move progress backwards
    // Verified by storing the candidate unconditionally
    #[test]
    fn test_update_is_monotonic() {
        let (tracker, seen) = recording();

        assert!((tracker.update(0.5) - 0.5).abs() < f64::EPSILON);
        assert!((tracker.update(0.3) - 0.5).abs() < f64::EPSILON);
        assert!((tracker.current() - 0.5).abs() < f64::EPSILON);
        assert_eq!(seen.lock().expect("sink lock").len(), 2);
    }

    // Tests reset forces zero and publishes it
    // Verified by applying the monotonic rule to reset
    #[test]
    fn test_reset_publishes_zero() {
        let (tracker, seen) = recording();

        tracker.update(0.8);
        tracker.reset();

        assert!(tracker.current().abs() < f64::EPSILON);
        let last = seen.lock().expect("sink lock").last().copied();
        assert!(last.is_some_and(|v| v.abs() < f64::EPSILON));
    }

    // Tests candidates are clamped and NaN is ignored
    // Verified by removing the clamp
    #[test]
    fn test_candidates_are_sanitized() {
        let tracker = ProgressTracker::new();

        tracker.update(f64::NAN);
        assert!(tracker.current().abs() < f64::EPSILON);
        tracker.update(3.0);
        assert!((tracker.current() - 1.0).abs() < f64::EPSILON);
    }

    // Tests clones share one value across threads
    // Verified by deep-copying state on clone
    #[test]
    fn test_clones_share_value_across_threads() {
        let tracker = ProgressTracker::new();
        let worker = tracker.clone();

        std::thread::spawn(move || {
            worker.update(0.42);
        })
        .join()
        .expect("worker joins");

        assert!((tracker.current() - 0.42).abs() < f64::EPSILON);
    }

    // Tests closures act as sinks
    // Verified by removing the blanket closure impl
    #[test]
    fn test_closure_sink() {
        let seen = Arc::new(Mutex::new(0.0));
        let target = Arc::clone(&seen);
        let sink = move |value: f64| *target.lock().expect("sink lock") = value;

        sink.report(0.25);

        assert!((*seen.lock().expect("sink lock") - 0.25).abs() < f64::EPSILON);
    }

    // Tests shuffled and repeated candidates from concurrent producers never move progress backwards
    // Verified by publishing outside the tracker lock
    #[test]
    fn test_concurrent_shuffled_updates_stay_monotonic() {
        let (tracker, seen) = recording();

        let producers: Vec<_> = (0..4u64)
            .map(|producer| {
                let shared = tracker.clone();
                thread::spawn(move || {
                    let mut rng = StdRng::seed_from_u64(producer + 100);
                    let mut candidates: Vec<f64> = (0..=200)
                        .map(|step| f64::from(step) / 200.0)
                        .chain((0..50).map(|_| rng.random_range(0.0..=1.0)))
                        .collect();
                    let repeats = candidates.clone();
                    candidates.extend(repeats);
                    candidates.shuffle(&mut rng);
                    for candidate in candidates {
                        shared.update(candidate);
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().expect("producer joins");
        }

        let seen = seen.lock().expect("sink lock");
        assert_eq!(seen.len(), 4 * 2 * 251);
        assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!((tracker.current() - 1.0).abs() < f64::EPSILON);
    }
}
