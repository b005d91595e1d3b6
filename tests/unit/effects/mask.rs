use super::*;

fn rgba_mask(w: u32, h: u32, red: u8, alpha: u8) -> ImageFrame {
    ImageFrame::filled(w, h, PixelFormat::Rgba8, &[red, 1, 2, alpha]).unwrap()
}

#[test]
fn gray_mask_is_used_directly_for_any_channel() {
    let mask = ImageFrame::new(2, 1, PixelFormat::Gray8, vec![10, 200]).unwrap();
    for ch in [MaskChannel::Red, MaskChannel::Alpha, MaskChannel::Unknown] {
        let plane = extract(&mask, ch, 2, 1).unwrap();
        assert_eq!(plane.as_raw(), &vec![10, 200]);
    }
}

#[test]
fn red_and_alpha_select_different_planes() {
    let mask = rgba_mask(3, 2, 40, 220);
    let red = extract(&mask, MaskChannel::Red, 3, 2).unwrap();
    let alpha = extract(&mask, MaskChannel::Alpha, 3, 2).unwrap();
    assert!(red.pixels().all(|p| p.0[0] == 40));
    assert!(alpha.pixels().all(|p| p.0[0] == 220));
}

#[test]
fn unknown_channel_reads_first_plane() {
    let mask = rgba_mask(1, 1, 77, 5);
    let plane = select_plane(&mask, MaskChannel::Unknown).unwrap();
    assert_eq!(plane.as_raw(), &vec![77]);
}

#[test]
fn rgb_mask_supports_red_only() {
    let mask = ImageFrame::filled(2, 2, PixelFormat::Rgb8, &[90, 0, 0]).unwrap();
    assert_eq!(
        select_plane(&mask, MaskChannel::Red).unwrap().as_raw(),
        &vec![90; 4]
    );
    let err = select_plane(&mask, MaskChannel::Alpha).unwrap_err();
    assert!(matches!(err, RecolorError::ContractViolation(_)));
}

#[test]
fn mask_is_resized_to_target() {
    let mask = rgba_mask(4, 4, 255, 0);
    let plane = extract(&mask, MaskChannel::Red, 9, 5).unwrap();
    assert_eq!(plane.dimensions(), (9, 5));
    assert!(plane.pixels().all(|p| p.0[0] == 255));
}

#[test]
fn downscale_blends_the_two_nearest_texels() {
    let mask = ImageFrame::new(2, 1, PixelFormat::Gray8, vec![0, 255]).unwrap();
    let plane = extract(&mask, MaskChannel::Red, 1, 1).unwrap();
    assert_eq!(plane.get_pixel(0, 0).0[0], 128);
}

#[test]
fn downscale_does_not_average_over_the_footprint() {
    // Every 8th column set; each output centre falls between two unset columns.
    let data = (0..64 * 64).map(|i| if i % 8 == 0 { 255 } else { 0 }).collect();
    let mask = ImageFrame::new(64, 64, PixelFormat::Gray8, data).unwrap();
    let plane = extract(&mask, MaskChannel::Red, 8, 8).unwrap();
    assert!(plane.pixels().all(|p| p.0[0] == 0));
}

#[test]
fn upscale_interpolates_between_texel_centres() {
    let mask = ImageFrame::new(2, 1, PixelFormat::Gray8, vec![0, 200]).unwrap();
    let plane = extract(&mask, MaskChannel::Red, 4, 1).unwrap();
    // Centres at 0.125 and 0.875 clamp to the edge texels; inner ones sit 1/4 and 3/4 across.
    assert_eq!(plane.as_raw(), &vec![0, 50, 150, 200]);
}

#[test]
fn zero_target_is_rejected() {
    let mask = rgba_mask(1, 1, 0, 0);
    assert!(extract(&mask, MaskChannel::Red, 0, 3).is_err());
}
