//! Lists the codec registry.

use anyhow::Result;
use raster_io::CodecRegistry;

/// Prints registered codecs in lookup order.
pub fn run() -> Result<()> {
    let registry = CodecRegistry::global();
    println!("{:<6} {}", "NAME", "EXTENSION");
    for descriptor in registry.descriptors() {
        println!("{:<6} .{}", descriptor.name, descriptor.extension);
    }
    println!("{} codecs", registry.len());
    Ok(())
}
