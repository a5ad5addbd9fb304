//! Keypair loading for the scenario participants

use std::path::Path;

use solana_sdk::signature::{Keypair, Signer};
use thiserror::Error;

use crate::config::KeypairPaths;
use crate::structured_logging::ScenarioLogger;

const KEYPAIR_LEN: usize = 64;

/// Keypair file errors
#[derive(Error, Debug)]
pub enum KeypairError {
    #[error("Failed to read keypair file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse keypair JSON in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid keypair length in {path}: expected 64 bytes, got {len}")]
    InvalidLength { path: String, len: usize },

    #[error("Invalid keypair in {path}: all-zero key rejected")]
    AllZero { path: String },

    #[error("Invalid keypair bytes in {path}: {reason}")]
    InvalidBytes { path: String, reason: String },
}

/// Load a signing keypair from a file
///
/// Accepts the JSON byte-array format written by `solana-keygen`, a base58
/// secret key string (wallet export format) and a raw 64-byte file.
pub fn load_keypair(path: impl AsRef<Path>) -> Result<Keypair, KeypairError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let raw = std::fs::read(path).map_err(|source| KeypairError::Read {
        path: display.clone(),
        source,
    })?;

    let bytes: Vec<u8> = if let Some(decoded) = decode_base58(&raw) {
        decoded
    } else if raw.len() == KEYPAIR_LEN && !is_text(&raw) {
        raw
    } else {
        serde_json::from_slice(&raw).map_err(|source| KeypairError::Parse {
            path: display.clone(),
            source,
        })?
    };

    if bytes.len() != KEYPAIR_LEN {
        return Err(KeypairError::InvalidLength {
            path: display,
            len: bytes.len(),
        });
    }
    if bytes.iter().all(|&b| b == 0) {
        return Err(KeypairError::AllZero { path: display });
    }

    Keypair::try_from(bytes.as_slice()).map_err(|e| KeypairError::InvalidBytes {
        path: display,
        reason: e.to_string(),
    })
}

/// Printable UTF-8; such files are parsed, never taken as raw key bytes
fn is_text(raw: &[u8]) -> bool {
    std::str::from_utf8(raw)
        .map(|s| s.chars().all(|c| !c.is_control() || c.is_whitespace()))
        .unwrap_or(false)
}

fn decode_base58(raw: &[u8]) -> Option<Vec<u8>> {
    let text = std::str::from_utf8(raw).ok()?.trim();
    if text.is_empty() || text.starts_with('[') {
        return None;
    }
    bs58::decode(text).into_vec().ok()
}

/// The three fixed identities every scenario run uses
pub struct Participants {
    pub creator: Keypair,
    pub fee_payer: Keypair,
    pub leaf_owner: Keypair,
}

impl Participants {
    /// Load creator, fee payer and leaf owner from their configured paths
    pub fn load(paths: &KeypairPaths, logger: &ScenarioLogger) -> Result<Self, KeypairError> {
        let creator = load_keypair(&paths.creator)?;
        logger.address("creator", &creator.pubkey());

        let fee_payer = load_keypair(&paths.fee_payer)?;
        logger.address("fee_payer", &fee_payer.pubkey());

        let leaf_owner = load_keypair(&paths.leaf_owner)?;
        logger.address("leaf_owner", &leaf_owner.pubkey());

        Ok(Self {
            creator,
            fee_payer,
            leaf_owner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn test_load_json_keypair() {
        let keypair = Keypair::new();
        let json = serde_json::to_vec(&keypair.to_bytes().to_vec()).unwrap();
        let file = write_temp(&json);

        let loaded = load_keypair(file.path()).unwrap();
        assert_eq!(loaded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_load_raw_keypair() {
        let keypair = Keypair::new();
        let file = write_temp(&keypair.to_bytes());

        let loaded = load_keypair(file.path()).unwrap();
        assert_eq!(loaded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_load_base58_keypair() {
        let keypair = Keypair::new();
        let encoded = format!("{}\n", bs58::encode(keypair.to_bytes()).into_string());
        let file = write_temp(encoded.as_bytes());

        let loaded = load_keypair(file.path()).unwrap();
        assert_eq!(loaded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_missing_file() {
        let err = load_keypair("/nonexistent/keypairs/creator.json").unwrap_err();
        assert!(matches!(err, KeypairError::Read { .. }));
    }

    #[test]
    fn test_not_json() {
        let file = write_temp(b"definitely not a keypair");
        let err = load_keypair(file.path()).unwrap_err();
        assert!(matches!(err, KeypairError::Parse { .. }));
    }

    #[test]
    fn test_64_byte_text_is_parsed() {
        let text = [b'l'; 64];
        let file = write_temp(&text);
        let err = load_keypair(file.path()).unwrap_err();
        assert!(matches!(err, KeypairError::Parse { .. }));
    }

    #[test]
    fn test_raw_all_zero_rejected() {
        let file = write_temp(&[0u8; 64]);
        let err = load_keypair(file.path()).unwrap_err();
        assert!(matches!(err, KeypairError::AllZero { .. }));
    }

    #[test]
    fn test_wrong_length() {
        let file = write_temp(b"[1, 2, 3]");
        let err = load_keypair(file.path()).unwrap_err();
        assert!(matches!(err, KeypairError::InvalidLength { len: 3, .. }));
    }

    #[test]
    fn test_all_zero_rejected() {
        let json = serde_json::to_vec(&vec![0u8; 64]).unwrap();
        let file = write_temp(&json);
        let err = load_keypair(file.path()).unwrap_err();
        assert!(matches!(err, KeypairError::AllZero { .. }));
    }
}
