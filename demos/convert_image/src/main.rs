use argh::FromArgs;

use imgconv::convert::TypedImageConverter;
use imgconv::engine::{CpuEngine, Engine, ExecutionStrategy};
use imgconv::image::{ColorLayout, ImageSize, SampleDepth, TypedImage};

#[derive(FromArgs)]
/// Convert a synthetic gradient image between color layouts and depths
struct Args {
    /// width of the source image
    #[argh(option, default = "640")]
    width: usize,

    /// height of the source image
    #[argh(option, default = "480")]
    height: usize,

    /// color layout of the source image
    #[argh(option, default = "ColorLayout::Bgr")]
    from: ColorLayout,

    /// color layout of the destination image
    #[argh(option, default = "ColorLayout::Gray")]
    to: ColorLayout,

    /// sample depth of the destination image
    #[argh(option, default = "SampleDepth::U8")]
    depth: SampleDepth,

    /// run the engine on the current thread only
    #[argh(switch)]
    serial: bool,
}

/// A float gradient spanning [-100, 400] so narrowing to u8 has to rescale.
fn gradient(size: ImageSize, layout: ColorLayout) -> Result<TypedImage, Box<dyn std::error::Error>> {
    let channels = layout.channels();
    let mut data = Vec::with_capacity(size.area() * channels);
    for y in 0..size.height {
        for x in 0..size.width {
            let t = (x + y) as f32 / (size.width + size.height).max(1) as f32;
            for c in 0..channels {
                data.push(-100.0 + 500.0 * t * (c + 1) as f32 / channels as f32);
            }
        }
    }
    Ok(TypedImage::from_vec(size, layout, data)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let strategy = if args.serial {
        ExecutionStrategy::Serial
    } else {
        ExecutionStrategy::ParallelRows
    };
    let engine = CpuEngine::with_strategy(strategy);
    let converter = TypedImageConverter::new(&engine);

    let size = ImageSize {
        width: args.width,
        height: args.height,
    };
    let src = gradient(size, args.from)?;

    let now = std::time::Instant::now();
    let dst = converter.convert_to(&src, args.to, args.depth)?;
    let elapsed = now.elapsed();

    log::info!(
        "converted {} {} {} into {} {} in {:?}",
        src.size(),
        src.layout(),
        src.depth(),
        dst.layout(),
        dst.depth(),
        elapsed
    );

    let stats = engine.min_max(&dst)?;
    for (c, (min, max)) in stats.min.iter().zip(&stats.max).enumerate() {
        log::info!("channel {c}: min {min} max {max}");
    }

    Ok(())
}
