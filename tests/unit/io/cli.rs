//! Tests for command-line parsing and batch file processing

#[cfg(test)]
mod tests {
    use clap::Parser;
    use dotraster::engine::{Finish, LayerStrategy};
    use dotraster::io::cli::{Cli, FileProcessor, parse_hex_color};
    use dotraster::io::configuration::{DEFAULT_CLUSTER_SIZE, DEFAULT_LAYERS, DEFAULT_MAX_SIZE};
    use image::{Rgba, RgbaImage};
    use std::path::{Path, PathBuf};

    // Tests CLI parsing with only the required target argument
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_cli_parse_minimal_args() {
        let cli = Cli::parse_from(["program", "photo.jpg"]);

        assert_eq!(cli.target, PathBuf::from("photo.jpg"));
        assert_eq!(cli.max_size, DEFAULT_MAX_SIZE);
        assert_eq!(cli.layers, DEFAULT_LAYERS);
        assert_eq!(cli.cluster_size, DEFAULT_CLUSTER_SIZE);
        assert_eq!(cli.dot_color, Rgba([0, 0, 0, 255]));
        assert_eq!(cli.seed, None);
        assert!(!cli.quiet);
    }

    // Tests CLI flags flow into rasterization parameters
    // Verified by ignoring the regions flag
    #[test]
    fn test_cli_parameters() {
        let cli = Cli::parse_from([
            "program",
            "input.png",
            "--layers",
            "6",
            "--cluster-size",
            "9",
            "--grayscale",
            "--invert",
            "--regions",
            "--finish",
            "frame",
            "--dot-color",
            "#ff8000",
            "--seed",
            "123",
            "--quiet",
        ]);

        let params = cli.parameters();

        assert_eq!(params.layers, 6);
        assert_eq!(params.cluster_size, 9);
        assert!(params.grayscale && params.invert);
        assert_eq!(params.layer_strategy, LayerStrategy::Regions);
        assert_eq!(params.finish, Finish::PrintFrame);
        assert_eq!(params.dot_color, Rgba([255, 128, 0, 255]));
        assert_eq!(params.seed, Some(123));
        assert!(params.stall_guard.is_none());
    }

    // Tests hex colors with and without alpha and rejects malformed text
    // Verified by reading channels in reverse order
    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#102030"), Ok(Rgba([16, 32, 48, 255])));
        assert_eq!(parse_hex_color("10203040"), Ok(Rgba([16, 32, 48, 64])));
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("zzzzzz").is_err());
    }

    // Tests file skip behavior based on --no-skip flag
    // Verified by inverting boolean logic in skip_existing method
    #[test]
    fn test_skip_existing_logic() {
        assert!(Cli::parse_from(["program", "a.png"]).skip_existing());
        assert!(!Cli::parse_from(["program", "a.png", "--no-skip"]).skip_existing());
    }

    // Tests outputs are written as PNG beside the input
    // Verified by keeping the input extension
    #[test]
    fn test_output_path() {
        assert_eq!(
            FileProcessor::get_output_path(Path::new("dir/photo.jpg")),
            PathBuf::from("dir/photo_dots.png")
        );
    }

    // Tests a directory run writes outputs and skips them on the next run
    // Verified by processing generated outputs as inputs
    #[test]
    fn test_process_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("source.png");
        RgbaImage::from_fn(24, 16, |x, _| Rgba([(x * 10) as u8, 90, 160, 255]))
            .save(&input)
            .expect("writes source");
        let target = dir.path().to_string_lossy().to_string();

        let args = ["program", target.as_str(), "--quiet", "--seed", "1"];
        FileProcessor::new(Cli::parse_from(args))
            .process()
            .expect("first run succeeds");

        let output = dir.path().join("source_dots.png");
        let written = image::open(&output).expect("output decodes");
        assert_eq!((written.width(), written.height()), (24, 16));

        FileProcessor::new(Cli::parse_from(args))
            .process()
            .expect("second run succeeds");
        assert!(!dir.path().join("source_dots_dots.png").exists());
    }

    // Tests invalid parameters fail before any file is read
    // Verified by validating per file
    #[test]
    fn test_invalid_parameters_fail_fast() {
        let cli = Cli::parse_from(["program", "missing.png", "--cluster-size", "0", "--quiet"]);

        let result = FileProcessor::new(cli).process();

        assert!(result.is_err_and(|err| err.is_invalid_input()));
    }
}
