use super::*;

#[test]
fn presets_validate_to_their_residency() {
    assert_eq!(StreamContract::cpu().validate().unwrap(), Residency::Cpu);
    assert_eq!(StreamContract::gpu().validate().unwrap(), Residency::Gpu);
}

#[test]
fn empty_sides_are_rejected() {
    let c = StreamContract::new(vec![], vec![StreamTag::Image]);
    assert!(c.validate().is_err());
    let c = StreamContract::new(vec![StreamTag::Image, StreamTag::Mask], vec![]);
    assert!(c.validate().is_err());
}

#[test]
fn both_image_inputs_are_rejected() {
    let c = StreamContract::new(
        vec![StreamTag::Image, StreamTag::ImageGpu, StreamTag::Mask],
        vec![StreamTag::Image],
    );
    let err = c.validate().unwrap_err();
    assert!(matches!(err, RecolorError::Configuration(_)));
    assert!(err.to_string().contains("exactly one input image"));
}

#[test]
fn both_image_outputs_are_rejected() {
    let c = StreamContract::new(
        vec![StreamTag::Image, StreamTag::Mask],
        vec![StreamTag::Image, StreamTag::ImageGpu],
    );
    assert!(c.validate().is_err());
}

#[test]
fn cpu_in_gpu_out_is_rejected() {
    let c = StreamContract::new(
        vec![StreamTag::Image, StreamTag::Mask],
        vec![StreamTag::ImageGpu],
    );
    let err = c.validate().unwrap_err();
    assert!(err.to_string().contains("cannot mix"));
}

#[test]
fn mask_residency_must_match_image() {
    let c = StreamContract::new(
        vec![StreamTag::ImageGpu, StreamTag::Mask],
        vec![StreamTag::ImageGpu],
    );
    assert!(c.validate().is_err());
}

#[test]
fn missing_mask_or_mask_output_is_rejected() {
    let c = StreamContract::new(vec![StreamTag::Image], vec![StreamTag::Image]);
    assert!(c.validate().unwrap_err().to_string().contains("missing input mask"));

    let c = StreamContract::new(
        vec![StreamTag::Image, StreamTag::Mask],
        vec![StreamTag::Image, StreamTag::Mask],
    );
    assert!(c.validate().is_err());
}

#[test]
fn tags_display_as_stream_names() {
    assert_eq!(StreamTag::ImageGpu.to_string(), "IMAGE_GPU");
    assert_eq!(StreamTag::Mask.residency(), Residency::Cpu);
    assert_eq!(StreamTag::MaskGpu.residency(), Residency::Gpu);
}
