//! Image info command.
//!
//! Prints codec, dimensions, layout and file size for each input.

use crate::InfoArgs;
use anyhow::Result;
use std::fs;
use tracing::trace;

/// Runs the info command.
pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    for path in &args.input {
        trace!(path = %path.display(), "info::run");
        let file_size = fs::metadata(path)?.len();
        let image = super::load_image(path)?;

        println!("{}", path.display());
        println!("  Codec:      {}", image.codec_name());
        println!("  Resolution: {}x{}", image.width(), image.height());
        println!("  Format:     {} ({} channels)", image.format(), image.format().channels());
        println!("  File size:  {}", super::format_size(file_size));
        if verbose > 0 {
            println!("  Pixels:     {}", image.width() as u64 * image.height() as u64);
            println!("  Data size:  {}", super::format_size(image.data().len() as u64));
        }

        if args.input.len() > 1 {
            println!();
        }
    }

    Ok(())
}
