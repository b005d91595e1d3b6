use super::*;

#[test]
fn luminance_of_black_and_white() {
    assert_eq!(luminance([0.0, 0.0, 0.0]), 0.0);
    assert!((luminance([255.0, 255.0, 255.0]) - 1.0).abs() < 1e-6);
}

#[test]
fn zero_weight_is_identity() {
    let target = [12.0, 250.0, 99.0];
    for r in (0..=255u8).step_by(15) {
        for g in (0..=255u8).step_by(17) {
            for b in (0..=255u8).step_by(51) {
                assert_eq!(blend_rgb8([r, g, b], 0, target), [r, g, b]);
            }
        }
    }
}

#[test]
fn white_source_with_full_weight_becomes_target() {
    for &(r, g, b) in &[(7u8, 130u8, 201u8), (0, 0, 255), (255, 255, 255), (1, 2, 3)] {
        let cfg = crate::BlendConfig::new(
            crate::RgbColor::new(r, g, b),
            crate::MaskChannel::Red,
        );
        let out = blend_rgb8([255, 255, 255], 255, cfg.target_color_255());
        assert_eq!(out, [r, g, b]);
    }
}

#[test]
fn black_source_is_never_recolored() {
    assert_eq!(blend_rgb8([0, 0, 0], 255, [255.0, 255.0, 255.0]), [0, 0, 0]);
}

#[test]
fn result_stays_between_source_and_target() {
    let targets = [[0.0, 0.0, 255.0], [255.0, 128.0, 0.0], [33.0, 33.0, 33.0]];
    for target in targets {
        for mask in (0..=255u8).step_by(32) {
            for v in (0..=255u8).step_by(37) {
                let src = [v, 255 - v, v / 2];
                let out = blend_rgb8(src, mask, target);
                for c in 0..3 {
                    let t = target[c] as u8;
                    assert!(out[c] >= src[c].min(t), "{src:?} {mask} {target:?}");
                    assert!(out[c] <= src[c].max(t), "{src:?} {mask} {target:?}");
                }
            }
        }
    }
}

#[test]
fn worked_example_matches_formula() {
    // luminance = 124.2 / 255, mix = 0.5 * luminance
    let out = blend([200.0, 100.0, 50.0], 0.5, [0.0, 0.0, 255.0]);
    assert!((out[0] - 151.294).abs() < 1e-2);
    assert!((out[1] - 75.647).abs() < 1e-2);
    assert!((out[2] - 99.924).abs() < 1e-2);
    assert_eq!(out.map(quantize), [151, 76, 100]);

    assert_eq!(blend_rgb8([200, 100, 50], 128, [0.0, 0.0, 255.0]), [151, 76, 100]);
    assert_eq!(blend_rgb8([200, 100, 50], 255, [0.0, 0.0, 255.0]), [103, 51, 150]);
}

#[test]
fn mix_amount_is_clamped() {
    assert_eq!(mix_amount(1.0, 1.5), 1.0);
    assert_eq!(mix_amount(-1.0, 0.5), 0.0);
    assert_eq!(mix_amount(0.5, 0.5), 0.25);
}

#[test]
fn quantize_rounds_half_to_even_and_saturates() {
    assert_eq!(quantize(2.5), 2);
    assert_eq!(quantize(3.5), 4);
    assert_eq!(quantize(3.49), 3);
    assert_eq!(quantize(-4.0), 0);
    assert_eq!(quantize(300.0), 255);
    assert_eq!(quantize(f32::NAN), 0);
}
