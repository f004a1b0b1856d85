//! Strip codecs
//!
//! The native strip decoder handles uncompressed, Deflate and ZSTD strips.
//! Other schemes found in scanner output (LZW, PackBits) go through the
//! image crate instead, see `loader::decoder_strategy`.

mod deflate;
mod factory;
mod handler;
mod zstd;

pub use deflate::AdobeDeflateHandler;
pub use factory::CompressionFactory;
pub use handler::{CompressionHandler, UncompressedHandler};
pub use zstd::ZstdHandler;
