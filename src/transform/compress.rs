// Compression stage - gzip over backup payloads

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::backup::types::BackupError;

/// Compress a payload with gzip at the given level (0-9, clamped).
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>, BackupError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level.min(9)));
    encoder
        .write_all(data)
        .map_err(|e| BackupError::TransformFailed(format!("compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| BackupError::TransformFailed(format!("compression finish failed: {}", e)))
}

/// Reverse of [`compress`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, BackupError> {
    let mut decoder = GzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| BackupError::TransformFailed(format!("decompression failed: {}", e)))?;
    Ok(decompressed)
}
