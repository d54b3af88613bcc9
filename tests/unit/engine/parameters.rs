//! Tests for parameter defaults, validation and derived values

#[cfg(test)]
mod tests {
    use dotraster::RasterError;
    use dotraster::engine::{Finish, FrameMargins, LayerSlot, LayerStrategy, RasterParameters};
    use dotraster::quantize::QuantizeMode;
    use image::Rgba;
    use rand::Rng;

    fn rejected_parameter(params: &RasterParameters) -> Option<&'static str> {
        match params.validate() {
            Err(RasterError::InvalidParameter { parameter, .. }) => Some(parameter),
            _ => None,
        }
    }

    // Tests defaults validate and match the documented values
    // Verified by changing the default cluster size
    #[test]
    fn test_defaults() {
        let params = RasterParameters::default();

        assert!(params.validate().is_ok());
        assert_eq!(params.max_size, 1800);
        assert_eq!(params.layers, 4);
        assert_eq!(params.cluster_size, 14);
        assert!((params.gamma - 1.5).abs() < f32::EPSILON);
        assert!((params.dot_size_factor - 0.5).abs() < f32::EPSILON);
        assert_eq!(params.dot_color, Rgba([0, 0, 0, 255]));
        assert_eq!(params.layer_strategy, LayerStrategy::Single);
        assert_eq!(params.finish, Finish::Transparent);
    }

    // Tests each out-of-range field is reported by name
    // Verified by skipping the non-negative checks
    #[test]
    fn test_validation_names_offending_field() {
        let base = RasterParameters::default();

        let cases = [
            (
                RasterParameters {
                    cluster_size: 0,
                    ..base.clone()
                },
                "cluster_size",
            ),
            (
                RasterParameters {
                    layers: 0,
                    ..base.clone()
                },
                "layers",
            ),
            (
                RasterParameters {
                    gamma: 0.0,
                    ..base.clone()
                },
                "gamma",
            ),
            (
                RasterParameters {
                    spacing: f32::NAN,
                    ..base.clone()
                },
                "spacing",
            ),
            (
                RasterParameters {
                    color_acceleration: 1.5,
                    ..base.clone()
                },
                "color_acceleration",
            ),
            (
                RasterParameters {
                    max_size: 0,
                    ..base.clone()
                },
                "max_size",
            ),
        ];

        for (params, expected) in &cases {
            assert_eq!(rejected_parameter(params), Some(*expected));
        }
    }

    // Tests the quantize mode follows multicolor, then grayscale, then posterize
    // Verified by checking grayscale before multicolor
    #[test]
    fn test_quantize_mode_priority() {
        let both = RasterParameters {
            multicolor: true,
            grayscale: true,
            ..RasterParameters::default()
        };
        let gray = RasterParameters {
            grayscale: true,
            ..RasterParameters::default()
        };

        assert_eq!(both.quantize_mode(), QuantizeMode::Multicolor);
        assert_eq!(gray.quantize_mode(), QuantizeMode::Grayscale);
        assert_eq!(
            RasterParameters::default().quantize_mode(),
            QuantizeMode::Posterize(4)
        );
    }

    // Tests inversion swaps dot and background colors only in grayscale mode
    // Verified by inverting regardless of grayscale
    #[test]
    fn test_inversion_colors() {
        let dot = Rgba([20, 40, 60, 255]);
        let inverted = RasterParameters {
            grayscale: true,
            invert: true,
            dot_color: dot,
            ..RasterParameters::default()
        };
        let color_invert = RasterParameters {
            invert: true,
            dot_color: dot,
            ..RasterParameters::default()
        };

        assert_eq!(inverted.effective_dot_color(), Rgba([255, 255, 255, 255]));
        assert_eq!(inverted.background_color(), dot);
        assert_eq!(color_invert.effective_dot_color(), dot);
        assert_eq!(color_invert.background_color(), Rgba([255, 255, 255, 255]));
    }

    // Tests per-layer base size scales with the layer index
    // Verified by scaling with index instead of index + 1
    #[test]
    fn test_layer_base_size() {
        let params = RasterParameters::default();

        assert!((params.layer_base_size(LayerSlot::new(0, 4)) - 1.25).abs() < 1e-6);
        assert!((params.layer_base_size(LayerSlot::new(3, 4)) - 5.0).abs() < 1e-6);
        assert!((params.layer_base_size(LayerSlot::SINGLE) - 5.0).abs() < 1e-6);
    }

    // Tests layer count and frame margins follow the strategy and finish
    // Verified by framing every finish
    #[test]
    fn test_layer_count_and_margins() {
        let framed = RasterParameters {
            layer_strategy: LayerStrategy::Regions,
            finish: Finish::PrintFrame,
            ..RasterParameters::default()
        };

        assert_eq!(framed.layer_count(), 4);
        assert_eq!(RasterParameters::default().layer_count(), 1);
        assert_eq!(framed.frame_margins(40, 20), FrameMargins::uniform(9));
        assert_eq!(
            RasterParameters::default().frame_margins(40, 20),
            FrameMargins::NONE
        );
    }

    // Tests print-frame margins come from the longest side
    // Verified by measuring margins from the shortest side
    #[test]
    fn test_print_frame_uses_longest_side() {
        let framed = RasterParameters {
            finish: Finish::PrintFrame,
            ..RasterParameters::default()
        };

        assert_eq!(framed.frame_margins(400, 200), FrameMargins::uniform(94));
        assert_eq!(framed.frame_margins(200, 400), FrameMargins::uniform(94));
        assert_eq!(
            framed.frame_margins(400, 200).framed_size(400, 200),
            (588, 388)
        );
    }

    // Tests a fixed seed reproduces the same random stream
    // Verified by ignoring the seed
    #[test]
    fn test_seeded_rng_is_reproducible() {
        let params = RasterParameters {
            seed: Some(99),
            ..RasterParameters::default()
        };

        let first: u64 = params.rng().random();
        let second: u64 = params.rng().random();

        assert_eq!(first, second);
    }
}
