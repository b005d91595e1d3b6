use super::*;

#[test]
fn missing_color_is_configuration_error() {
    let err = BlendConfig::from_options(&RecolorOptions::default()).unwrap_err();
    assert!(matches!(err, RecolorError::Configuration(_)));
    assert!(err.to_string().contains("missing color"));
}

#[test]
fn color_is_normalized_and_channel_defaults_to_red() {
    let cfg = BlendConfig::from_options(&RecolorOptions {
        color: Some(RgbColor::new(255, 0, 51)),
        mask_channel: None,
    })
    .unwrap();
    assert_eq!(cfg.target_color(), [1.0, 0.0, 0.2]);
    assert_eq!(cfg.target_color_255()[0], 255.0);
    assert_eq!(cfg.mask_channel(), MaskChannel::Red);
}

#[test]
fn unknown_channel_resolves_to_red() {
    let cfg = BlendConfig::new(RgbColor::new(0, 0, 0), MaskChannel::Unknown);
    assert_eq!(cfg.mask_channel(), MaskChannel::Red);
    assert_eq!(MaskChannel::Unknown.plane_index(), 0);
    assert_eq!(MaskChannel::Unknown.shader_component(), "r");
    assert_eq!(MaskChannel::Alpha.plane_index(), 3);
    assert_eq!(MaskChannel::Alpha.shader_component(), "a");
}

#[test]
fn parses_color_triplets() {
    assert_eq!(
        "0, 128,255".parse::<RgbColor>().unwrap(),
        RgbColor::new(0, 128, 255)
    );
    assert!("1,2".parse::<RgbColor>().is_err());
    assert!("1,2,256".parse::<RgbColor>().is_err());
    assert!("a,b,c".parse::<RgbColor>().is_err());
}

#[test]
fn node_config_json_roundtrips_tags_and_options() {
    let cfg = NodeConfig::from_json_str(
        r#"{
            "inputs": ["IMAGE", "MASK"],
            "outputs": ["IMAGE"],
            "options": { "color": { "r": 0, "g": 0, "b": 255 }, "mask_channel": "ALPHA" }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.inputs, vec![StreamTag::Image, StreamTag::Mask]);
    assert_eq!(cfg.outputs, vec![StreamTag::Image]);
    assert_eq!(cfg.options.color, Some(RgbColor::new(0, 0, 255)));
    assert_eq!(cfg.options.mask_channel, Some(MaskChannel::Alpha));
}

#[test]
fn node_config_accepts_lowercase_channel() {
    let cfg = NodeConfig::from_json_str(
        r#"{ "inputs": ["IMAGE", "MASK"], "outputs": ["IMAGE"],
             "options": { "color": { "r": 1, "g": 2, "b": 3 }, "mask_channel": "red" } }"#,
    )
    .unwrap();
    assert_eq!(cfg.options.mask_channel, Some(MaskChannel::Red));
}

#[test]
fn node_config_rejects_unknown_fields_and_bad_values() {
    let err = NodeConfig::from_json_str(
        r#"{ "inputs": ["IMAGE"], "outputs": ["IMAGE"], "colour": {} }"#,
    )
    .unwrap_err();
    assert!(matches!(err, RecolorError::Serde(_)));

    let err = NodeConfig::from_json_str(
        r#"{ "inputs": ["IMAGE"], "outputs": ["IMAGE"],
             "options": { "color": { "r": 300, "g": 0, "b": 0 } } }"#,
    )
    .unwrap_err();
    assert!(matches!(err, RecolorError::Serde(_)));
}
