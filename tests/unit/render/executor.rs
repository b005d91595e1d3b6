use super::*;
use crate::config::{MaskChannel, RgbColor};
use crate::foundation::frame::PixelFormat;

fn config() -> BlendConfig {
    BlendConfig::new(RgbColor::new(10, 20, 30), MaskChannel::Red)
}

#[test]
fn cpu_resource_accessors() {
    let frame = ImageFrame::filled(5, 2, PixelFormat::Rgb8, &[1, 2, 3]).unwrap();
    let res = FrameResource::Cpu(frame.clone());
    assert_eq!(res.residency(), Residency::Cpu);
    assert_eq!(res.size(), (5, 2));
    assert_eq!(res.as_cpu(), Some(&frame));
    assert_eq!(res.into_cpu().unwrap(), frame);
}

#[test]
fn cpu_executor_is_always_available() {
    let exec = create_executor(Residency::Cpu, &config()).unwrap();
    assert_eq!(exec.residency(), Residency::Cpu);
}

#[cfg(not(feature = "gpu"))]
#[test]
fn gpu_executor_requires_the_feature() {
    let err = create_executor(Residency::Gpu, &config()).err().unwrap();
    assert!(matches!(err, RecolorError::Configuration(_)));
    assert!(err.to_string().contains("`gpu` feature"));
}
