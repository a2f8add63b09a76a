//! Taker keypair loading and transaction signing
//!
//! Keypair files use the Solana CLI format: a JSON array of the 64 secret key
//! bytes (seed followed by public key).

use std::path::Path;

use base64::prelude::*;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::VersionedTransaction;

use crate::common::paths::expand_home;
use crate::common::{Error, Result};

/// Signing wallet of the taker
pub struct TakerKeypair {
    keypair: Keypair,
}

impl TakerKeypair {
    /// Load a keypair file, expanding a leading `~`
    pub fn load(path: &str) -> Result<Self> {
        let resolved = expand_home(path);
        Self::load_path(&resolved)
    }

    fn load_path(path: &Path) -> Result<Self> {
        let location = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: location.clone(),
            error: e.to_string(),
        })?;

        let bytes: Vec<u8> =
            serde_json::from_str(&content).map_err(|e| Error::keypair(&location, e))?;

        let keypair =
            Keypair::try_from(bytes.as_slice()).map_err(|e| Error::keypair(&location, e))?;

        tracing::debug!(path = %location, address = %keypair.pubkey(), "Loaded taker keypair");

        Ok(Self { keypair })
    }

    /// Fresh random keypair
    pub fn generate() -> Self {
        Self {
            keypair: Keypair::new(),
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Base58 address of the taker
    pub fn address(&self) -> String {
        self.keypair.pubkey().to_string()
    }

    /// Secret key bytes in keypair file order
    pub fn to_bytes(&self) -> [u8; 64] {
        self.keypair.to_bytes()
    }

    /// Sign a base64 wire transaction and return it re-encoded
    pub fn sign_transaction(&self, encoded: &str) -> Result<String> {
        let bytes = BASE64_STANDARD
            .decode(encoded.trim())
            .map_err(|e| Error::Transaction(e.to_string()))?;

        let mut transaction: VersionedTransaction =
            bincode::deserialize(&bytes).map_err(|e| Error::Transaction(e.to_string()))?;

        self.sign_versioned(&mut transaction)?;

        let signed =
            bincode::serialize(&transaction).map_err(|e| Error::Transaction(e.to_string()))?;
        Ok(BASE64_STANDARD.encode(signed))
    }

    /// Put the taker's signature in its slot; other signatures are untouched
    pub fn sign_versioned(&self, transaction: &mut VersionedTransaction) -> Result<()> {
        let taker = self.pubkey();
        let required = transaction.message.header().num_required_signatures as usize;

        let slot = transaction
            .message
            .static_account_keys()
            .iter()
            .take(required)
            .position(|key| *key == taker)
            .ok_or_else(|| {
                Error::Transaction(format!("{} is not a required signer", taker))
            })?;

        if transaction.signatures.len() < required {
            transaction
                .signatures
                .resize(required, Signature::default());
        }

        let message = transaction.message.serialize();
        transaction.signatures[slot] = self.keypair.sign_message(&message);

        tracing::debug!(slot, signer = %taker, "Signed transaction");
        Ok(())
    }
}
