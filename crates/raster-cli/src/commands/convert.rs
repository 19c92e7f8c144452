//! Format conversion command.
//!
//! Decodes with the codec chosen by the input extension and encodes with the
//! codec chosen by the output extension.

use crate::ConvertArgs;
use anyhow::{Result, bail};
use raster_io::Image;
use raster_io::jpeg::JpegCodec;
use tracing::{info, trace};

/// Runs the convert command.
pub fn run(args: ConvertArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), output = %args.output.display(), "convert::run");

    let source = super::load_image(&args.input)?;
    let mut target = super::image_for_path(&args.output)?;

    if let Some(quality) = args.quality {
        if target.codec_name() != "JPEG" {
            bail!("--quality only applies to JPEG output, not {}", target.codec_name());
        }
        target = Image::new(Box::new(JpegCodec::with_quality(quality)));
    }

    info!(
        input = %args.input.display(),
        input_codec = source.codec_name(),
        output = %args.output.display(),
        output_codec = target.codec_name(),
        "Converting image"
    );
    if verbose > 0 {
        println!(
            "Converting {} ({}) -> {} ({})",
            args.input.display(),
            source.codec_name(),
            args.output.display(),
            target.codec_name()
        );
    }

    let (width, height) = (source.width(), source.height());
    target.set_buffer(source.into_buffer());
    super::save_image(&target, &args.output)?;

    if verbose > 0 {
        println!("Done: {}x{}", width, height);
    }
    Ok(())
}
