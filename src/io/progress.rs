//! Multi-file progress display with automatic batching for large sets

use crate::io::configuration::{MAX_INDIVIDUAL_PROGRESS_BARS, PROGRESS_BAR_RESOLUTION};
use crate::progress::ProgressSink;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

static FILE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix:>24} [{bar:30.cyan/blue}] {percent:>3}% {msg}")
        .unwrap_or_else(|_template| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_template| ProgressStyle::default_bar())
});

/// Forwards engine progress fractions to a terminal bar
#[derive(Debug, Clone)]
pub struct BarSink {
    bar: ProgressBar,
}

impl BarSink {
    /// Drive `bar`, whose length is [`PROGRESS_BAR_RESOLUTION`]
    pub const fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

impl ProgressSink for BarSink {
    fn report(&self, fraction: f64) {
        let position = (fraction.clamp(0.0, 1.0) * PROGRESS_BAR_RESOLUTION as f64).round() as u64;
        self.bar.set_position(position);
    }
}

/// Coordinates progress display for batch operations
///
/// Small batches get one bar per file. Larger batches get a batch bar plus
/// a rolling window of the most recent files.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    file_count: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: Vec::new(),
            file_count: 0,
        }
    }

    /// Number of files announced by [`ProgressManager::initialize`]
    pub const fn file_count(&self) -> usize {
        self.file_count
    }

    /// Initialize progress bars based on file count
    pub fn initialize(&mut self, file_count: usize) {
        self.file_count = file_count;

        // Switch to batch mode for large file sets to avoid terminal spam
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        let bars_to_create = file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS);
        for _ in 0..bars_to_create {
            let bar = ProgressBar::new(PROGRESS_BAR_RESOLUTION);
            bar.set_style(FILE_STYLE.clone());
            self.file_bars.push(self.multi_progress.add(bar));
        }
    }

    /// Reset the bar assigned to file `index` and return a sink driving it
    pub fn start_file(&self, index: usize, path: &Path) -> Option<Arc<dyn ProgressSink>> {
        let bar = self.bar_for(index)?;
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        bar.reset();
        bar.set_prefix(display_name);
        bar.set_message(String::new());
        Some(Arc::new(BarSink::new(bar.clone())))
    }

    /// Mark file `index` as completed and update batch progress
    pub fn complete_file(&self, index: usize, elapsed: Duration) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        if let Some(bar) = self.bar_for(index) {
            bar.set_position(PROGRESS_BAR_RESOLUTION);
            bar.set_message(format!("✓ {elapsed:.1?}"));
        }
    }

    /// Mark file `index` as failed
    pub fn fail_file(&self, index: usize, reason: &str) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        if let Some(bar) = self.bar_for(index) {
            bar.set_message(format!("✗ {reason}"));
        }
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        if let Err(reason) = self.multi_progress.clear() {
            log::debug!("Could not clear progress display: {reason}");
        }
    }

    // Files beyond the window reuse bars round-robin
    fn bar_for(&self, index: usize) -> Option<&ProgressBar> {
        if self.file_bars.is_empty() {
            return None;
        }
        self.file_bars.get(index % self.file_bars.len())
    }
}
