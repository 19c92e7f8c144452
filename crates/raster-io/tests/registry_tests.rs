//! Integration tests for CodecRegistry.

use raster_io::registry::default_factory;
use raster_io::tga::TgaCodec;
use raster_io::{CodecDescriptor, CodecRegistry, ErrorKind, Format, PixelBuffer};
use std::path::Path;

#[test]
fn registry_global_has_builtin_codecs() {
    let registry = CodecRegistry::global();
    let names: Vec<_> = registry.descriptors().iter().map(|d| d.name).collect();

    assert!(names.contains(&"BMP"));
    assert!(names.contains(&"TGA"));

    #[cfg(feature = "png")]
    assert!(names.contains(&"PNG"), "PNG not found in registry");

    #[cfg(feature = "jpeg")]
    {
        assert!(registry.supports_extension("jpg"));
        assert!(registry.supports_extension("jpeg"));
    }
}

#[test]
fn registry_global_is_shared() {
    let a = CodecRegistry::global() as *const CodecRegistry;
    let b = std::thread::spawn(|| CodecRegistry::global() as *const CodecRegistry as usize)
        .join()
        .unwrap();
    assert_eq!(a as usize, b);
}

#[test]
fn create_by_extension_returns_empty_image() {
    let image = CodecRegistry::global().create_by_extension("bmp").unwrap();
    assert_eq!(image.codec_name(), "BMP");
    assert_eq!((image.width(), image.height()), (0, 0));
    assert!(image.data().is_empty());
}

#[test]
fn unknown_extension_is_none() {
    assert!(CodecRegistry::global().create_by_extension("xyz").is_none());
}

#[test]
fn each_call_gets_a_fresh_image() {
    let registry = CodecRegistry::global();
    let mut first = registry.create_by_extension("tga").unwrap();
    first.set_buffer(PixelBuffer::zeroed(2, 2, Format::Rgb));

    let second = registry.create_by_extension("tga").unwrap();
    assert!(second.data().is_empty());
}

#[test]
fn custom_registry_extends_lookup() {
    let mut registry = CodecRegistry::new();
    assert!(registry.register(CodecDescriptor::new("Targa", "targa", default_factory::<TgaCodec>)));
    assert!(!registry.register(CodecDescriptor::new("Targa", "targa", default_factory::<TgaCodec>)));

    let image = registry.create_by_extension("targa").unwrap();
    assert_eq!(image.codec_name(), "TGA");
    assert!(registry.create_by_extension("tga").is_none());
}

#[test]
fn read_unknown_extension_is_invalid_argument() {
    let err = raster_io::read(Path::new("picture.xyz")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let buffer = PixelBuffer::zeroed(1, 1, Format::Rgb);
    let err = raster_io::write(Path::new("picture.xyz"), &buffer).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}
