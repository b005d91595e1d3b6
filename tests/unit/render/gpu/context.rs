use super::*;

fn context_or_skip() -> Option<GpuContext> {
    match GpuContext::new() {
        Ok(ctx) => Some(ctx),
        Err(e) if e.to_string().contains("no gpu adapter available") => None,
        Err(e) => panic!("unexpected gpu init error: {e}"),
    }
}

#[test]
fn align_to_rounds_up_to_copy_alignment() {
    assert_eq!(align_to(0, 256), 0);
    assert_eq!(align_to(4, 256), 256);
    assert_eq!(align_to(256, 256), 256);
    assert_eq!(align_to(257, 256), 512);
}

#[test]
fn upload_expands_rgb_and_gray_to_rgba() {
    let Some(ctx) = context_or_skip() else {
        return;
    };

    // 5 px wide so rows need readback padding.
    let rgb = ImageFrame::filled(5, 3, PixelFormat::Rgb8, &[10, 20, 30]).unwrap();
    let back = ctx.download(&ctx.upload(&rgb).unwrap()).unwrap();
    assert_eq!(back.format(), PixelFormat::Rgba8);
    assert_eq!((back.width(), back.height()), (5, 3));
    assert!(back.data().chunks_exact(4).all(|px| px == [10, 20, 30, 255]));

    let gray = ImageFrame::filled(2, 2, PixelFormat::Gray8, &[77]).unwrap();
    let back = ctx.download(&ctx.upload(&gray).unwrap()).unwrap();
    assert!(back.data().chunks_exact(4).all(|px| px == [77, 77, 77, 77]));
}

#[test]
fn download_requires_copy_src() {
    let Some(ctx) = context_or_skip() else {
        return;
    };
    let tex = ctx
        .create_texture("test", 2, 2, wgpu::TextureUsages::TEXTURE_BINDING)
        .unwrap();
    let err = ctx.download(&GpuFrame::new(tex)).unwrap_err();
    assert!(matches!(err, RecolorError::ContractViolation(_)));
}

#[test]
fn zero_sized_textures_are_rejected() {
    let Some(ctx) = context_or_skip() else {
        return;
    };
    assert!(ctx.create_target(0, 4).is_err());
}
