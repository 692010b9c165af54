//! Response compression.

use tower_http::compression::CompressionLayer;
use tower_http::compression::predicate::SizeAbove;

/// Folder contexts smaller than this go out uncompressed.
const MIN_COMPRESS_BYTES: u16 = 1024;

/// Gzip for structure documents above [`MIN_COMPRESS_BYTES`].
pub fn build_compression_layer() -> CompressionLayer<SizeAbove> {
    CompressionLayer::new()
        .gzip(true)
        .compress_when(SizeAbove::new(MIN_COMPRESS_BYTES))
}
