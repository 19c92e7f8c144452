//! Codec registry keyed by file extension.
//!
//! The registry is an ordered list of [`CodecDescriptor`]s. Lookups scan it
//! front to back and return the first match, so registration order decides
//! which codec wins when two descriptors share an extension.
//!
//! # Architecture
//!
//! [`CodecRegistry::global()`] builds the process-wide instance once, inside
//! a `OnceLock` initializer, and never mutates it afterwards. Built-in
//! codecs are registered in a fixed order: `bmp`, `tga`, then `png`, `jpg`
//! and `jpeg` when their features are enabled.
//!
//! # Example
//!
//! ```ignore
//! use raster_io::CodecRegistry;
//!
//! let registry = CodecRegistry::global();
//! assert!(registry.supports_extension("tga"));
//!
//! let mut image = registry.create_by_extension("tga").unwrap();
//! image.load("input.tga")?;
//! ```

use crate::{Codec, Image};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Factory producing a fresh codec instance.
pub type CodecFactory = fn() -> Box<dyn Codec>;

/// One registry entry: a codec name, the extension it answers to, and how
/// to build it.
///
/// Two descriptors are the same entry when both `name` and `extension`
/// match; the factory is not compared.
#[derive(Clone, Copy)]
pub struct CodecDescriptor {
    /// Human-readable codec name (e.g. "BMP").
    pub name: &'static str,
    /// Extension without the leading dot (e.g. "bmp").
    pub extension: &'static str,
    /// Builds the codec.
    pub factory: CodecFactory,
}

impl CodecDescriptor {
    /// Creates a descriptor.
    pub const fn new(name: &'static str, extension: &'static str, factory: CodecFactory) -> Self {
        Self {
            name,
            extension,
            factory,
        }
    }

    /// Instantiates the codec.
    pub fn codec(&self) -> Box<dyn Codec> {
        (self.factory)()
    }

    /// Whether `other` names the same `(name, extension)` pair.
    pub fn same_entry(&self, other: &CodecDescriptor) -> bool {
        self.name == other.name && self.extension == other.extension
    }
}

impl fmt::Debug for CodecDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecDescriptor")
            .field("name", &self.name)
            .field("extension", &self.extension)
            .finish()
    }
}

/// Factory for any codec with a `Default` configuration.
pub fn default_factory<C: Codec + Default + 'static>() -> Box<dyn Codec> {
    Box::new(C::default())
}

/// Ordered table of codec descriptors.
///
/// # Thread Safety
///
/// The global instance is fully populated before any caller can observe it
/// and is read-only afterwards, so it can be shared across threads freely.
#[derive(Debug, Default)]
pub struct CodecRegistry {
    descriptors: Vec<CodecDescriptor>,
}

impl CodecRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the global registry with the built-in codecs.
    pub fn global() -> &'static CodecRegistry {
        static INSTANCE: OnceLock<CodecRegistry> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let mut registry = CodecRegistry::new();
            registry.register_builtin_codecs();
            debug!(codecs = registry.len(), "codec registry initialized");
            registry
        })
    }

    /// Registers the built-in codecs in their fixed order.
    fn register_builtin_codecs(&mut self) {
        use crate::bmp::BmpCodec;
        use crate::tga::TgaCodec;

        self.register(CodecDescriptor::new("BMP", "bmp", default_factory::<BmpCodec>));
        self.register(CodecDescriptor::new("TGA", "tga", default_factory::<TgaCodec>));

        #[cfg(feature = "png")]
        self.register(CodecDescriptor::new(
            "PNG",
            "png",
            default_factory::<crate::png::PngCodec>,
        ));

        #[cfg(feature = "jpeg")]
        {
            use crate::jpeg::JpegCodec;
            self.register(CodecDescriptor::new("JPEG", "jpg", default_factory::<JpegCodec>));
            self.register(CodecDescriptor::new("JPEG", "jpeg", default_factory::<JpegCodec>));
        }
    }

    /// Appends a descriptor.
    ///
    /// Returns `false` and leaves the table unchanged if an entry with the
    /// same name and extension already exists.
    pub fn register(&mut self, descriptor: CodecDescriptor) -> bool {
        if self.descriptors.iter().any(|d| d.same_entry(&descriptor)) {
            warn!(
                name = descriptor.name,
                extension = descriptor.extension,
                "duplicate codec registration ignored"
            );
            return false;
        }
        debug!(
            name = descriptor.name,
            extension = descriptor.extension,
            "registered codec"
        );
        self.descriptors.push(descriptor);
        true
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> &[CodecDescriptor] {
        &self.descriptors
    }

    /// Registered extensions in registration order.
    pub fn extensions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.iter().map(|d| d.extension)
    }

    /// First descriptor registered for `ext`.
    ///
    /// Matching is exact: case-sensitive and without a leading dot.
    pub fn find(&self, ext: &str) -> Option<&CodecDescriptor> {
        self.descriptors.iter().find(|d| d.extension == ext)
    }

    /// Checks if an extension is registered.
    pub fn supports_extension(&self, ext: &str) -> bool {
        self.find(ext).is_some()
    }

    /// Creates an empty [`Image`] bound to the codec registered for `ext`.
    ///
    /// Returns `None` for unknown extensions.
    pub fn create_by_extension(&self, ext: &str) -> Option<Image> {
        let descriptor = self.find(ext)?;
        debug!(extension = ext, codec = descriptor.name, "creating image");
        Some(Image::new(descriptor.codec()))
    }

    /// Creates an empty [`Image`] for the extension of `path`.
    pub fn create_for_path(&self, path: &Path) -> Option<Image> {
        let ext = path.extension()?.to_str()?;
        self.create_by_extension(ext)
    }

    /// Detects a codec from leading file bytes.
    ///
    /// Returns the first descriptor, in registration order, whose codec
    /// recognizes `header`.
    pub fn detect(&self, header: &[u8]) -> Option<&CodecDescriptor> {
        self.descriptors.iter().find(|d| d.codec().can_read(header))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bmp::BmpCodec;
    use crate::tga::TgaCodec;

    #[test]
    fn test_builtin_order() {
        let registry = CodecRegistry::global();
        let exts: Vec<_> = registry.extensions().collect();
        assert_eq!(&exts[..2], &["bmp", "tga"]);
        #[cfg(all(feature = "png", feature = "jpeg"))]
        assert_eq!(exts, ["bmp", "tga", "png", "jpg", "jpeg"]);
    }

    #[test]
    fn test_duplicate_is_noop() {
        let mut registry = CodecRegistry::new();
        let bmp = CodecDescriptor::new("BMP", "bmp", default_factory::<BmpCodec>);
        assert!(registry.register(bmp));
        assert!(!registry.register(bmp));
        assert_eq!(registry.len(), 1);

        // Same extension under another name is a distinct entry.
        assert!(registry.register(CodecDescriptor::new("Other", "bmp", default_factory::<TgaCodec>)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_first_match_wins() {
        let mut registry = CodecRegistry::new();
        registry.register(CodecDescriptor::new("TGA", "img", default_factory::<TgaCodec>));
        registry.register(CodecDescriptor::new("BMP", "img", default_factory::<BmpCodec>));
        let image = registry.create_by_extension("img").unwrap();
        assert_eq!(image.codec_name(), "TGA");
    }

    #[test]
    fn test_extension_is_exact() {
        let registry = CodecRegistry::global();
        assert!(registry.create_by_extension("bmp").is_some());
        assert!(registry.create_by_extension("BMP").is_none());
        assert!(registry.create_by_extension(".bmp").is_none());
        assert!(registry.create_by_extension("").is_none());
    }

    #[test]
    fn test_create_for_path() {
        let registry = CodecRegistry::global();
        let image = registry.create_for_path(Path::new("dir/frame.tga")).unwrap();
        assert_eq!(image.codec_name(), "TGA");
        assert!(registry.create_for_path(Path::new("no_extension")).is_none());
    }

    #[test]
    fn test_detect() {
        let registry = CodecRegistry::global();
        assert_eq!(registry.detect(b"BM\x36\x00").map(|d| d.name), Some("BMP"));
        assert!(registry.detect(b"\x00\x00\x00\x00").is_none());
    }

    #[test]
    fn test_empty_registry() {
        let registry = CodecRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.create_by_extension("bmp").is_none());
    }
}
