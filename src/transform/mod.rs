// Transform stage - reversible compression and encryption over capture
// payloads, applied in a fixed order and reversed exactly.

mod compress;
mod crypto;
mod integrity;

pub use compress::{compress, decompress};
pub use crypto::{decrypt, encrypt, KeyStore, MemoryKeyStore};
pub use integrity::sha256_hex;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::backup::types::BackupError;

/// Which transform stages produced a stored blob.
///
/// Recorded on each `BackupResult` so restore can branch on persisted facts
/// rather than inspecting the blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformFlags {
    None,
    Compressed,
    Encrypted,
    CompressedEncrypted,
}

impl TransformFlags {
    /// Map a config's toggles onto the tagged variant.
    pub fn from_config(compression: bool, encryption: bool) -> Self {
        match (compression, encryption) {
            (false, false) => TransformFlags::None,
            (true, false) => TransformFlags::Compressed,
            (false, true) => TransformFlags::Encrypted,
            (true, true) => TransformFlags::CompressedEncrypted,
        }
    }

    pub fn compressed(&self) -> bool {
        matches!(
            self,
            TransformFlags::Compressed | TransformFlags::CompressedEncrypted
        )
    }

    pub fn encrypted(&self) -> bool {
        matches!(
            self,
            TransformFlags::Encrypted | TransformFlags::CompressedEncrypted
        )
    }
}

/// Applies and reverses the optional transform stages of the pipeline.
pub struct TransformStage {
    keys: Arc<dyn KeyStore>,
    compression_level: u32,
}

impl TransformStage {
    pub fn new(keys: Arc<dyn KeyStore>) -> Self {
        Self {
            keys,
            compression_level: 6,
        }
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    /// Forward pipeline: compress, then encrypt.
    pub async fn apply(
        &self,
        payload: Vec<u8>,
        flags: TransformFlags,
    ) -> Result<Vec<u8>, BackupError> {
        let mut data = payload;
        if flags.compressed() {
            data = compress(&data, self.compression_level)?;
        }
        if flags.encrypted() {
            data = encrypt(self.keys.as_ref(), &data).await?;
        }
        Ok(data)
    }

    /// Reverse pipeline: decrypt, then decompress.
    pub async fn reverse(
        &self,
        payload: Vec<u8>,
        flags: TransformFlags,
    ) -> Result<Vec<u8>, BackupError> {
        let mut data = payload;
        if flags.encrypted() {
            data = decrypt(self.keys.as_ref(), &data).await?;
        }
        if flags.compressed() {
            data = decompress(&data)?;
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_from_config_toggles() {
        assert_eq!(TransformFlags::from_config(false, false), TransformFlags::None);
        assert_eq!(
            TransformFlags::from_config(true, false),
            TransformFlags::Compressed
        );
        assert_eq!(
            TransformFlags::from_config(false, true),
            TransformFlags::Encrypted
        );
        assert_eq!(
            TransformFlags::from_config(true, true),
            TransformFlags::CompressedEncrypted
        );
    }

    #[tokio::test]
    async fn disabled_stages_are_no_ops() {
        let stage = TransformStage::new(Arc::new(MemoryKeyStore::new()));
        let payload = b"plain payload".to_vec();

        let out = stage
            .apply(payload.clone(), TransformFlags::None)
            .await
            .unwrap();
        assert_eq!(out, payload);
    }

    #[tokio::test]
    async fn reverse_undoes_apply_for_every_flag_combination() {
        let stage = TransformStage::new(Arc::new(MemoryKeyStore::new()));
        let payload = b"{\"products\": [\"sku-1\", \"sku-2\"]}".to_vec();

        for flags in [
            TransformFlags::None,
            TransformFlags::Compressed,
            TransformFlags::Encrypted,
            TransformFlags::CompressedEncrypted,
        ] {
            let transformed = stage.apply(payload.clone(), flags).await.unwrap();
            let reversed = stage.reverse(transformed, flags).await.unwrap();
            assert_eq!(reversed, payload, "round trip failed for {:?}", flags);
        }
    }
}
