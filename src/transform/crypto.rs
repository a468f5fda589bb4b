// Encryption stage - AES-256-GCM sealing for backup payloads
//
// Key material never travels with the ciphertext. Keys are minted and held
// by a KeyStore collaborator; the sealed blob carries only the key id, the
// nonce, and the ciphertext with its authentication tag.

use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use async_trait::async_trait;
use dashmap::DashMap;
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

use crate::backup::types::BackupError;

/// Associated data authenticated with every sealed payload.
const SEAL_CONTEXT: &[u8] = b"storevault.seal.v1";

const KEY_ID_LEN: usize = 16;
const NONCE_LEN: usize = 12;

/// External key-management collaborator.
///
/// Production deployments back this with a KMS; [`MemoryKeyStore`] serves
/// tests and single-process setups.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Mint a fresh 256-bit key and return its id.
    async fn issue_key(&self) -> anyhow::Result<(Uuid, [u8; 32])>;

    /// Look up previously issued key material.
    async fn lookup_key(&self, id: Uuid) -> anyhow::Result<Option<[u8; 32]>>;
}

/// In-memory key store.
#[derive(Default)]
pub struct MemoryKeyStore {
    keys: DashMap<Uuid, [u8; 32]>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn issue_key(&self) -> anyhow::Result<(Uuid, [u8; 32])> {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        let id = Uuid::new_v4();
        self.keys.insert(id, key);
        Ok((id, key))
    }

    async fn lookup_key(&self, id: Uuid) -> anyhow::Result<Option<[u8; 32]>> {
        Ok(self.keys.get(&id).map(|entry| *entry.value()))
    }
}

/// Seal a payload under a freshly issued key.
///
/// Layout of the sealed blob: `key_id (16) || nonce (12) || ciphertext+tag`.
pub async fn encrypt(keys: &dyn KeyStore, plaintext: &[u8]) -> Result<Vec<u8>, BackupError> {
    let (key_id, key_bytes) = keys
        .issue_key()
        .await
        .map_err(|e| BackupError::TransformFailed(format!("key issue failed: {:#}", e)))?;

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad: SEAL_CONTEXT,
            },
        )
        .map_err(|e| BackupError::TransformFailed(format!("encryption failed: {}", e)))?;

    let mut sealed = Vec::with_capacity(KEY_ID_LEN + NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(key_id.as_bytes());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Exact inverse of [`encrypt`] given the same key store.
pub async fn decrypt(keys: &dyn KeyStore, sealed: &[u8]) -> Result<Vec<u8>, BackupError> {
    if sealed.len() < KEY_ID_LEN + NONCE_LEN {
        return Err(BackupError::TransformFailed(
            "sealed payload too short".to_string(),
        ));
    }

    let key_id = Uuid::from_slice(&sealed[..KEY_ID_LEN])
        .map_err(|e| BackupError::TransformFailed(format!("malformed key id: {}", e)))?;
    let nonce = Nonce::from_slice(&sealed[KEY_ID_LEN..KEY_ID_LEN + NONCE_LEN]);

    let key_bytes = keys
        .lookup_key(key_id)
        .await
        .map_err(|e| BackupError::TransformFailed(format!("key lookup failed: {:#}", e)))?
        .ok_or_else(|| {
            BackupError::TransformFailed(format!("unknown encryption key: {}", key_id))
        })?;

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
    cipher
        .decrypt(
            nonce,
            Payload {
                msg: &sealed[KEY_ID_LEN + NONCE_LEN..],
                aad: SEAL_CONTEXT,
            },
        )
        .map_err(|e| BackupError::TransformFailed(format!("decryption failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seal_and_unseal_round_trip() {
        let keys = MemoryKeyStore::new();
        let payload = b"customer export, do not leak";

        let sealed = encrypt(&keys, payload).await.unwrap();
        assert_ne!(&sealed[KEY_ID_LEN + NONCE_LEN..], payload.as_slice());

        let opened = decrypt(&keys, &sealed).await.unwrap();
        assert_eq!(opened, payload);
    }

    #[tokio::test]
    async fn each_seal_uses_a_fresh_key_and_nonce() {
        let keys = MemoryKeyStore::new();
        let a = encrypt(&keys, b"same payload").await.unwrap();
        let b = encrypt(&keys, b"same payload").await.unwrap();

        assert_ne!(a[..KEY_ID_LEN], b[..KEY_ID_LEN]);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn tampered_ciphertext_is_rejected() {
        let keys = MemoryKeyStore::new();
        let mut sealed = encrypt(&keys, b"ledger").await.unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0xff;

        let err = decrypt(&keys, &sealed).await.unwrap_err();
        assert!(matches!(err, BackupError::TransformFailed(_)));
    }

    #[tokio::test]
    async fn unknown_key_id_is_rejected() {
        let keys = MemoryKeyStore::new();
        let sealed = encrypt(&keys, b"ledger").await.unwrap();

        let other = MemoryKeyStore::new();
        let err = decrypt(&other, &sealed).await.unwrap_err();
        assert!(matches!(err, BackupError::TransformFailed(_)));
    }

    #[tokio::test]
    async fn truncated_blob_is_rejected() {
        let keys = MemoryKeyStore::new();
        let err = decrypt(&keys, &[0u8; 10]).await.unwrap_err();
        assert!(matches!(err, BackupError::TransformFailed(_)));
    }
}
