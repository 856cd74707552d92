//! zlib codec boundary.
//!
//! Compression is an external collaborator with a load-bearing contract:
//! `decompress(compress(bytes)) == bytes`, and a stream that cannot be
//! decompressed is a corruption signal. Both calls are blocking and bounded
//! by input size; object files are small enough that no streaming is needed.

use std::io::{self, Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

/// Compress a byte stream.
pub fn compress(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Decompress a byte stream. Fails if the stream is not valid zlib.
pub fn decompress(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
