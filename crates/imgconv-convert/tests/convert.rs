use imgconv_convert::{u8_normalization, ConvertError, ConvertOptions, TypedImageConverter};
use imgconv_engine::{ColorConversionCode, CpuEngine, Engine, EngineError, InterpolationMode};
use imgconv_image::{ColorLayout, ImageSize, SampleDepth, TypedImage};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const SIZE: ImageSize = ImageSize {
    width: 4,
    height: 3,
};

/// Deterministic samples in `[lo, hi]` spread over the whole image.
fn ramp(size: ImageSize, layout: ColorLayout, lo: f64, hi: f64) -> Vec<f64> {
    let n = size.area() * layout.channels();
    (0..n)
        .map(|i| lo + (hi - lo) * ((i * 7) % n) as f64 / (n - 1) as f64)
        .collect()
}

fn ramp_image_f32(size: ImageSize, layout: ColorLayout, lo: f64, hi: f64) -> TypedImage {
    let data = ramp(size, layout, lo, hi)
        .into_iter()
        .map(|v| v as f32)
        .collect();
    TypedImage::from_vec(size, layout, data).unwrap()
}

fn ramp_image_u8(size: ImageSize, layout: ColorLayout, hi: f64) -> TypedImage {
    let data = ramp(size, layout, 0.0, hi)
        .into_iter()
        .map(|v| v.round() as u8)
        .collect();
    TypedImage::from_vec(size, layout, data).unwrap()
}

#[test]
fn same_tags_copy_bytes() -> Result<(), ConvertError> {
    init_logger();
    let engine = CpuEngine::default();
    let converter = TypedImageConverter::new(&engine);

    let data = ramp(SIZE, ColorLayout::Lab, -50.0, 120.0);
    let src = TypedImage::from_vec(SIZE, ColorLayout::Lab, data)?;
    let mut dst = TypedImage::new(SIZE, ColorLayout::Lab, SampleDepth::F64)?;

    converter.convert_into(&src, &mut dst)?;
    assert_eq!(dst.as_bytes(), src.as_bytes());

    Ok(())
}

#[test]
fn u8_to_u8_is_unchanged() -> Result<(), ConvertError> {
    let engine = CpuEngine::default();
    let converter = TypedImageConverter::new(&engine);

    let src = TypedImage::from_vec(SIZE, ColorLayout::Gray, (0u8..12).map(|v| v * 20).collect())?;
    let dst = converter.convert_to(&src, ColorLayout::Gray, SampleDepth::U8)?;

    assert_eq!(dst.as_slice::<u8>()?, src.as_slice::<u8>()?);

    Ok(())
}

#[test]
fn constant_image_to_u8_is_zero() -> Result<(), ConvertError> {
    let engine = CpuEngine::default();
    let converter = TypedImageConverter::new(&engine);

    let above = TypedImage::from_size_val(SIZE, ColorLayout::Rgb, 300.0f32)?;
    let dst = converter.convert_to(&above, ColorLayout::Rgb, SampleDepth::U8)?;
    assert!(dst.as_slice::<u8>()?.iter().all(|&v| v == 0));

    let below = TypedImage::from_size_val(SIZE, ColorLayout::Gray, -7i16)?;
    let dst = converter.convert_to(&below, ColorLayout::Gray, SampleDepth::U8)?;
    assert!(dst.as_slice::<u8>()?.iter().all(|&v| v == 0));

    Ok(())
}

#[test]
fn in_range_samples_are_not_stretched() -> Result<(), ConvertError> {
    let engine = CpuEngine::default();
    let converter = TypedImageConverter::new(&engine);

    let data = vec![0.0f64, 12.4, 12.6, 100.5, 199.0, 200.0];
    let src = TypedImage::from_vec([3, 2].into(), ColorLayout::Gray, data)?;
    let dst = converter.convert_to(&src, ColorLayout::Gray, SampleDepth::U8)?;

    assert_eq!(dst.as_slice::<u8>()?, &[0, 12, 13, 101, 199, 200]);

    Ok(())
}

#[test]
fn wide_range_is_rescaled() -> Result<(), ConvertError> {
    let engine = CpuEngine::default();
    let converter = TypedImageConverter::new(&engine);

    let src = TypedImage::from_vec(
        [2, 2].into(),
        ColorLayout::Gray,
        vec![-10i16, 300, 140, 0],
    )?;
    let dst = converter.convert_to(&src, ColorLayout::Gray, SampleDepth::U8)?;

    assert_eq!(dst.as_slice::<u8>()?, &[0, 255, 123, 8]);

    Ok(())
}

#[test]
fn wide_range_uses_all_channels() -> Result<(), ConvertError> {
    let engine = CpuEngine::default();
    let converter = TypedImageConverter::new(&engine);

    let src = ramp_image_f32(SIZE, ColorLayout::Bgr, -1000.0, 1000.0);
    let dst = converter.convert_to(&src, ColorLayout::Bgr, SampleDepth::U8)?;
    let out = dst.as_slice::<u8>()?;

    assert_eq!(out.iter().min(), Some(&0));
    assert_eq!(out.iter().max(), Some(&255));

    Ok(())
}

#[test]
fn depth_cast_saturates() -> Result<(), ConvertError> {
    let engine = CpuEngine::default();
    let converter = TypedImageConverter::new(&engine);

    let src = TypedImage::from_vec([3, 1].into(), ColorLayout::Gray, vec![-2.5f64, 1.5, 70000.0])?;
    let dst = converter.convert_to(&src, ColorLayout::Gray, SampleDepth::U16)?;
    assert_eq!(dst.as_slice::<u16>()?, &[0, 2, 65535]);

    let dst = converter.convert_to(&src, ColorLayout::Gray, SampleDepth::I8)?;
    assert_eq!(dst.as_slice::<i8>()?, &[-3, 2, 127]);

    Ok(())
}

#[test]
fn direct_color_conversion() -> Result<(), ConvertError> {
    let engine = CpuEngine::default();
    let converter = TypedImageConverter::new(&engine);

    let src = ramp_image_u8(SIZE, ColorLayout::Bgr, 255.0);
    let dst = converter.convert_to(&src, ColorLayout::Rgba, SampleDepth::U8)?;

    for (bgr, rgba) in src
        .as_slice::<u8>()?
        .chunks_exact(3)
        .zip(dst.as_slice::<u8>()?.chunks_exact(4))
    {
        assert_eq!(rgba, &[bgr[2], bgr[1], bgr[0], 255]);
    }

    Ok(())
}

#[test]
fn pivot_matches_manual_two_step() -> Result<(), ConvertError> {
    init_logger();
    let engine = CpuEngine::default();
    let converter = TypedImageConverter::new(&engine);

    // hue is stored as degrees / 2 in 8 bits
    let src = ramp_image_u8(SIZE, ColorLayout::Hsv, 180.0);
    assert_eq!(
        engine.lookup_conversion_code(ColorLayout::Hsv, ColorLayout::Gray),
        None
    );

    let dst = converter.convert_to(&src, ColorLayout::Gray, SampleDepth::U8)?;

    let mut bgr = TypedImage::new(SIZE, ColorLayout::Bgr, SampleDepth::U8)?;
    let mut gray = TypedImage::new(SIZE, ColorLayout::Gray, SampleDepth::U8)?;
    engine.color_convert(&src, &mut bgr, ColorConversionCode::HsvToBgr)?;
    engine.color_convert(&bgr, &mut gray, ColorConversionCode::BgrToGray)?;

    assert_eq!(dst.as_bytes(), gray.as_bytes());

    Ok(())
}

#[test]
fn pivot_with_alpha_source() -> Result<(), ConvertError> {
    let engine = CpuEngine::default();
    let converter = TypedImageConverter::new(&engine);

    let src = ramp_image_f32(SIZE, ColorLayout::Bgra, 0.0, 1.0);
    let dst = converter.convert_to(&src, ColorLayout::Hsv, SampleDepth::F32)?;

    let mut bgr = TypedImage::new(SIZE, ColorLayout::Bgr, SampleDepth::F32)?;
    let mut hsv = TypedImage::new(SIZE, ColorLayout::Hsv, SampleDepth::F32)?;
    engine.color_convert(&src, &mut bgr, ColorConversionCode::BgraToBgr)?;
    engine.color_convert(&bgr, &mut hsv, ColorConversionCode::BgrToHsv)?;

    assert_eq!(dst.as_slice::<f32>()?, hsv.as_slice::<f32>()?);

    Ok(())
}

#[test]
fn custom_pivot() -> Result<(), ConvertError> {
    let engine = CpuEngine::default();
    let options = ConvertOptions::default().with_pivot(ColorLayout::Rgb);
    let converter = TypedImageConverter::with_options(&engine, options);

    let src = ramp_image_f32(SIZE, ColorLayout::Xyz, 0.0, 0.9);
    let dst = converter.convert_to(&src, ColorLayout::Lab, SampleDepth::F32)?;

    let mut rgb = TypedImage::new(SIZE, ColorLayout::Rgb, SampleDepth::F32)?;
    let mut lab = TypedImage::new(SIZE, ColorLayout::Lab, SampleDepth::F32)?;
    engine.color_convert(&src, &mut rgb, ColorConversionCode::XyzToRgb)?;
    engine.color_convert(&rgb, &mut lab, ColorConversionCode::RgbToLab)?;

    assert_eq!(dst.as_slice::<f32>()?, lab.as_slice::<f32>()?);

    Ok(())
}

#[test]
fn no_viable_path_is_unsupported() -> Result<(), ConvertError> {
    init_logger();
    let engine = CpuEngine::default();
    let converter = TypedImageConverter::new(&engine);

    let src = TypedImage::new(SIZE, ColorLayout::Hsv, SampleDepth::U16)?;
    let err = converter
        .convert_to(&src, ColorLayout::Gray, SampleDepth::U16)
        .unwrap_err();

    assert_eq!(
        err,
        ConvertError::UnsupportedConversion {
            src: ColorLayout::Hsv,
            dst: ColorLayout::Gray,
            depth: SampleDepth::U16,
            cause: Some(EngineError::UnsupportedDepth(
                ColorConversionCode::HsvToBgr,
                SampleDepth::U16
            )),
        }
    );

    let message = err.to_string();
    assert!(message.contains("hsv"));
    assert!(message.contains("gray"));
    assert!(message.contains("u16"));
    assert!(std::error::Error::source(&err).is_some());

    Ok(())
}

#[test]
fn pivot_endpoint_is_not_bridged() -> Result<(), ConvertError> {
    let engine = CpuEngine::default();
    let converter = TypedImageConverter::new(&engine);

    let src = TypedImage::new(SIZE, ColorLayout::Bgr, SampleDepth::U16)?;
    let err = converter
        .convert_to(&src, ColorLayout::Luv, SampleDepth::U16)
        .unwrap_err();

    assert!(matches!(
        err,
        ConvertError::UnsupportedConversion {
            src: ColorLayout::Bgr,
            dst: ColorLayout::Luv,
            depth: SampleDepth::U16,
            cause: Some(EngineError::UnsupportedDepth(..)),
        }
    ));

    Ok(())
}

#[test]
fn resize_then_convert_matches_manual() -> Result<(), ConvertError> {
    let engine = CpuEngine::default();
    let converter = TypedImageConverter::new(&engine);

    let src = ramp_image_f32(SIZE, ColorLayout::Bgr, -20.0, 400.0);
    let size = ImageSize {
        width: 7,
        height: 5,
    };
    let mut dst = TypedImage::new(size, ColorLayout::Gray, SampleDepth::U8)?;
    converter.convert_into(&src, &mut dst)?;

    let mut resized = TypedImage::new(size, ColorLayout::Bgr, SampleDepth::F32)?;
    engine.resize(&src, &mut resized, InterpolationMode::Bilinear)?;

    let min_max = engine.min_max(&resized)?;
    let (scale, shift) = u8_normalization(min_max.overall_min(), min_max.overall_max());
    let mut narrowed = TypedImage::new(size, ColorLayout::Bgr, SampleDepth::U8)?;
    engine.linear_transform(&resized, &mut narrowed, scale, shift)?;

    let mut gray = TypedImage::new(size, ColorLayout::Gray, SampleDepth::U8)?;
    engine.color_convert(&narrowed, &mut gray, ColorConversionCode::BgrToGray)?;

    assert_eq!(dst.as_bytes(), gray.as_bytes());

    Ok(())
}

#[test]
fn resize_uses_configured_interpolation() -> Result<(), ConvertError> {
    let engine = CpuEngine::default();
    let options = ConvertOptions::default().with_interpolation(InterpolationMode::Nearest);
    let converter = TypedImageConverter::with_options(&engine, options);

    let src = TypedImage::from_vec([2, 1].into(), ColorLayout::Gray, vec![10u8, 20])?;
    let mut dst = TypedImage::new([3, 1].into(), ColorLayout::Gray, SampleDepth::U8)?;
    converter.convert_into(&src, &mut dst)?;
    assert_eq!(dst.as_slice::<u8>()?, &[10, 20, 20]);

    let bilinear = TypedImageConverter::new(&engine);
    bilinear.convert_into(&src, &mut dst)?;
    assert_eq!(dst.as_slice::<u8>()?, &[10, 15, 20]);

    Ok(())
}

#[test]
fn empty_destination_is_a_no_op() -> Result<(), ConvertError> {
    let engine = CpuEngine::default();
    let converter = TypedImageConverter::new(&engine);

    let src = ramp_image_f32(SIZE, ColorLayout::Rgb, 0.0, 1.0);
    let mut dst = TypedImage::empty(ColorLayout::Hsv, SampleDepth::U8);
    converter.convert_into(&src, &mut dst)?;
    assert!(dst.is_empty());

    Ok(())
}

#[test]
fn empty_source_cannot_be_resized() -> Result<(), ConvertError> {
    let engine = CpuEngine::default();
    let converter = TypedImageConverter::new(&engine);

    let src = TypedImage::empty(ColorLayout::Rgb, SampleDepth::U8);
    let mut dst = TypedImage::new(SIZE, ColorLayout::Rgb, SampleDepth::U8)?;

    assert_eq!(
        converter.convert_into(&src, &mut dst),
        Err(ConvertError::Engine(EngineError::InvalidImageSize(0, 0, 4, 3)))
    );

    Ok(())
}

#[test]
fn convert_into_foreign_buffer() -> Result<(), ConvertError> {
    let engine = CpuEngine::default();
    let converter = TypedImageConverter::new(&engine);

    let src = ramp_image_u8(SIZE, ColorLayout::Rgb, 255.0);
    let mut buffer = vec![0u8; SIZE.area() * 3];
    {
        // SAFETY: the buffer outlives the handle and is not accessed meanwhile
        let mut dst = unsafe {
            TypedImage::from_raw_parts(buffer.as_mut_ptr(), SIZE, ColorLayout::Bgr, SampleDepth::U8)?
        };
        converter.convert_into(&src, &mut dst)?;
        assert!(!dst.is_owned());
    }

    for (rgb, bgr) in src.as_slice::<u8>()?.chunks_exact(3).zip(buffer.chunks_exact(3)) {
        assert_eq!(bgr, &[rgb[2], rgb[1], rgb[0]]);
    }

    Ok(())
}

#[test]
fn split_and_resize_pass_through() -> Result<(), ConvertError> {
    let engine = CpuEngine::default();
    let converter = TypedImageConverter::new(&engine);

    let src = ramp_image_u8(SIZE, ColorLayout::Bgra, 255.0);
    let planes = converter.split(&src)?;
    assert_eq!(planes.len(), 4);
    for (c, plane) in planes.iter().enumerate() {
        assert_eq!(plane.layout(), ColorLayout::Gray);
        assert_eq!(plane.get::<u8>([2, 1, 0]), src.get::<u8>([2, 1, c]));
    }

    let resized = converter.resize(&src, [8, 6].into(), InterpolationMode::Nearest)?;
    assert_eq!(resized.size(), ImageSize { width: 8, height: 6 });
    assert_eq!(resized.layout(), ColorLayout::Bgra);
    assert_eq!(resized.get::<u8>([0, 0, 3]), src.get::<u8>([0, 0, 3]));
    assert_eq!(resized.get::<u8>([5, 7, 0]), src.get::<u8>([2, 3, 0]));

    Ok(())
}
