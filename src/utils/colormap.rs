use image::Rgb;

/// JET colour ramp: 0 is dark blue, 255 is dark red.
///
/// Same piecewise-linear shape as the common JET lookup table, computed
/// instead of tabulated.
pub fn jet(value: u8) -> Rgb<u8> {
    let v = value as f32 / 255.0;
    let channel = |center: f32| -> u8 {
        let c = (1.5 - (4.0 * v - center).abs()).clamp(0.0, 1.0);
        (c * 255.0).round() as u8
    };
    Rgb([channel(3.0), channel(2.0), channel(1.0)])
}

/// Colour for entry `index` of `count` detections in the current frame.
///
/// Entries are spread evenly over the ramp (`255 / count` apart). Colours
/// are only distinct within one frame, not stable across frames.
pub fn detection_color(index: usize, count: usize) -> Rgb<u8> {
    if count == 0 {
        return jet(0);
    }
    let diff = 255 / count;
    jet((diff * index).min(255) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jet_endpoints() {
        assert_eq!(jet(0), Rgb([0, 0, 128]));
        assert_eq!(jet(255), Rgb([128, 0, 0]));
        let mid = jet(128);
        assert!(mid.0[1] > 200, "middle of the ramp should be greenish: {:?}", mid);
    }

    #[test]
    fn test_detection_colors_distinct_within_frame() {
        let colors: Vec<_> = (0..4).map(|i| detection_color(i, 4)).collect();
        for i in 0..colors.len() {
            for j in (i + 1)..colors.len() {
                assert_ne!(colors[i], colors[j]);
            }
        }
    }

    #[test]
    fn test_detection_color_deterministic() {
        assert_eq!(detection_color(2, 5), detection_color(2, 5));
        assert_eq!(detection_color(0, 1), jet(0));
    }
}
