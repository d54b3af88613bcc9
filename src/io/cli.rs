//! Command-line interface for batch rasterization of image files

use crate::engine::parameters::{Finish, LayerStrategy, RasterParameters};
use crate::engine::{CancellationToken, rasterize_with_cancel};
use crate::io::configuration::{
    DEFAULT_BASE_DOT_SIZE, DEFAULT_CLUSTER_SIZE, DEFAULT_COLOR_ACCELERATION,
    DEFAULT_CONTRAST_THRESHOLD, DEFAULT_DOT_SIZE_FACTOR, DEFAULT_GAMMA,
    DEFAULT_INTENSITY_ACCELERATION, DEFAULT_LAYERS, DEFAULT_MAX_SIZE, DEFAULT_SPACING,
    OUTPUT_SUFFIX,
};
use crate::io::error::{RasterError, Result, invalid_input};
use crate::io::image::{is_supported_image, load_bitmap, save_bitmap};
use crate::io::progress::ProgressManager;
use crate::progress::{NoProgress, ProgressSink, StallPolicy};
use clap::{Parser, ValueEnum};
use image::Rgba;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Output finishing selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FinishArg {
    /// Leave uncovered pixels transparent
    Transparent,
    /// Flatten onto the background color
    Background,
    /// Flatten and add golden-ratio print margins
    Frame,
}

impl From<FinishArg> for Finish {
    fn from(arg: FinishArg) -> Self {
        match arg {
            FinishArg::Transparent => Self::Transparent,
            FinishArg::Background => Self::Background,
            FinishArg::Frame => Self::PrintFrame,
        }
    }
}

/// Parse `#RRGGBB`, `RRGGBB` or the same with a trailing alpha byte
///
/// # Errors
///
/// Returns a message when the text is not 6 or 8 hex digits.
pub fn parse_hex_color(text: &str) -> std::result::Result<Rgba<u8>, String> {
    let digits = text.trim().trim_start_matches('#');
    if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
        return Err(format!("expected RRGGBB or RRGGBBAA, got '{text}'"));
    }

    let channel = |at: usize| {
        digits
            .get(at..at + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .ok_or_else(|| format!("invalid hex digits in '{text}'"))
    };
    let alpha = if digits.len() == 8 { channel(6)? } else { u8::MAX };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

#[derive(Parser)]
#[command(name = "dotraster")]
#[command(author, version, about = "Render images as stippled halftone dot fields")]
/// Command-line arguments for the rasterization tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PNG/JPEG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Longest edge after downscaling
    #[arg(long, default_value_t = DEFAULT_MAX_SIZE)]
    pub max_size: u32,

    /// Posterize levels and region layers
    #[arg(short, long, default_value_t = DEFAULT_LAYERS)]
    pub layers: usize,

    /// Grid cell edge in pixels
    #[arg(short, long, default_value_t = DEFAULT_CLUSTER_SIZE)]
    pub cluster_size: u32,

    /// Intensity pivot of the dot radius formula
    #[arg(long, default_value_t = DEFAULT_DOT_SIZE_FACTOR)]
    pub dot_size_factor: f32,

    /// Base dot radius before per-layer scaling
    #[arg(long, default_value_t = DEFAULT_BASE_DOT_SIZE)]
    pub dot_size: f32,

    /// Minimum gap between dots
    #[arg(long, default_value_t = DEFAULT_SPACING)]
    pub spacing: f32,

    /// Strength of intensity influence on dot radius
    #[arg(long, default_value_t = DEFAULT_INTENSITY_ACCELERATION)]
    pub intensity_acceleration: f32,

    /// Darkening of the dot color per layer
    #[arg(long, default_value_t = DEFAULT_COLOR_ACCELERATION)]
    pub color_acceleration: f32,

    /// Exponent applied to sampled intensity
    #[arg(short, long, default_value_t = DEFAULT_GAMMA)]
    pub gamma: f32,

    /// Contrast stretch threshold
    #[arg(long, default_value_t = DEFAULT_CONTRAST_THRESHOLD)]
    pub contrast: f32,

    /// Desaturate instead of posterizing
    #[arg(long)]
    pub grayscale: bool,

    /// Sample dot colors from the source
    #[arg(short, long)]
    pub multicolor: bool,

    /// White dots on a dot-colored background (grayscale only)
    #[arg(short, long)]
    pub invert: bool,

    /// Dot color as hex RRGGBB or RRGGBBAA
    #[arg(long, value_parser = parse_hex_color, default_value = "#000000")]
    pub dot_color: Rgba<u8>,

    /// Paint one pass per posterized region
    #[arg(short, long)]
    pub regions: bool,

    /// Output finishing
    #[arg(short, long, value_enum, default_value_t = FinishArg::Transparent)]
    pub finish: FinishArg,

    /// Random seed for reproducible dot placement
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Rasterization parameters described by the flags
    pub fn parameters(&self) -> RasterParameters {
        RasterParameters {
            max_size: self.max_size,
            cluster_size: self.cluster_size,
            dot_size_factor: self.dot_size_factor,
            spacing: self.spacing,
            intensity_acceleration: self.intensity_acceleration,
            color_acceleration: self.color_acceleration,
            gamma: self.gamma,
            contrast_threshold: self.contrast,
            layers: self.layers,
            grayscale: self.grayscale,
            multicolor: self.multicolor,
            invert: self.invert,
            dot_color: self.dot_color,
            base_dot_size: self.dot_size,
            layer_strategy: if self.regions {
                LayerStrategy::Regions
            } else {
                LayerStrategy::Single
            },
            finish: self.finish.into(),
            seed: self.seed,
            stall_guard: self.should_show_progress().then(StallPolicy::default),
        }
    }
}

/// Orchestrates batch processing of image files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    params: RasterParameters,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);
        let params = cli.parameters();

        Self {
            cli,
            params,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// Parameters are validated once before any file is touched.
    ///
    /// # Errors
    ///
    /// Returns an error if parameter validation, target validation or file
    /// processing fails
    pub fn process(&mut self) -> Result<()> {
        self.params.validate()?;
        let files = self.collect_files()?;

        if files.is_empty() {
            log::info!("Nothing to process in {}", self.cli.target.display());
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        let outcome = files
            .iter()
            .enumerate()
            .try_for_each(|(index, file)| self.process_file(file, index));

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        outcome
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if !is_supported_image(target) {
                return Err(invalid_input(&"Target file must be a PNG or JPEG image"));
            }
            Ok(if self.should_process_file(target) {
                vec![target.clone()]
            } else {
                vec![]
            })
        } else if target.is_dir() {
            let entries = std::fs::read_dir(target).map_err(|source| RasterError::FileSystem {
                path: target.clone(),
                operation: "read directory",
                source,
            })?;

            let mut files = Vec::new();
            for entry in entries {
                let path = entry?.path();
                if is_supported_image(&path)
                    && !Self::is_own_output(&path)
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_input(&"Target must be an image file or directory"))
        }
    }

    fn is_own_output(path: &Path) -> bool {
        path.file_stem()
            .is_some_and(|stem| stem.to_string_lossy().ends_with(OUTPUT_SUFFIX))
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            // Allow print for user feedback for progress messages
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("Skipping: {} (output exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    fn process_file(&self, input_path: &Path, index: usize) -> Result<()> {
        let start_time = Instant::now();
        let output_path = Self::get_output_path(input_path);

        let sink: Arc<dyn ProgressSink> = self
            .progress_manager
            .as_ref()
            .and_then(|pm| pm.start_file(index, input_path))
            .unwrap_or_else(|| Arc::new(NoProgress));

        let rendered = load_bitmap(input_path).and_then(|bitmap| {
            rasterize_with_cancel(bitmap, &self.params, sink, &CancellationToken::new())
        });

        let output = match rendered {
            Ok(output) => output,
            Err(err) => {
                if let Some(ref pm) = self.progress_manager {
                    pm.fail_file(index, &err.to_string());
                }
                return Err(err);
            }
        };

        save_bitmap(&output.image, &output_path)?;

        let stats = output.total_stats();
        log::info!(
            "{} -> {} ({} dots, {} masked) in {:.2?}",
            input_path.display(),
            output_path.display(),
            stats.dots_painted,
            stats.dots_masked,
            start_time.elapsed()
        );

        if let Some(ref pm) = self.progress_manager {
            pm.complete_file(index, start_time.elapsed());
        }

        Ok(())
    }

    /// Output location for `input_path`: `<stem>_dots.png` beside the input
    pub fn get_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!("{}{}.png", stem.to_string_lossy(), OUTPUT_SUFFIX);

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }
}
