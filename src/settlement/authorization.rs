use crate::Chips;
use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

/// Time-boxed, single-use, off-chain-signed transfer permission.
///
/// Lets the relayer move funds on a payer's behalf without the payer
/// submitting a transaction. The nonce is derived deterministically from
/// table, hand, and payer so a duplicate submission is detectable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    pub payer: String,
    pub payee: String,
    pub value: Chips,
    pub valid_after: u64,
    pub valid_before: u64,
    pub nonce: String,
    pub signature: String,
}

impl Authorization {
    pub fn nonce_for(table_id: &str, hand_no: u64, payer: &str) -> String {
        let material = format!("{}_{}_{}", table_id, hand_no, payer);
        hex::encode(Sha256::digest(material.as_bytes()))
    }

    /// Canonical signing payload over every field but the signature.
    pub fn message(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}",
            self.payer, self.payee, self.value, self.valid_after, self.valid_before, self.nonce
        )
    }
}

/// A payer's signing authority. Provided to the facilitator, never
/// generated by it: real deployments inject a wallet-backed signer holding
/// pre-provisioned session keys.
#[async_trait::async_trait]
pub trait Authorizer: Send + Sync {
    async fn sign(&self, payer: &str, message: &str) -> anyhow::Result<String>;
}

/// Deterministic digest signer standing in for wallet-held session keys.
pub struct SessionSigner;

#[async_trait::async_trait]
impl Authorizer for SessionSigner {
    async fn sign(&self, payer: &str, message: &str) -> anyhow::Result<String> {
        let material = format!("{}:{}", payer, message);
        Ok(hex::encode(Sha256::digest(material.as_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonce_is_deterministic_per_payer() {
        let a = Authorization::nonce_for("table-1", 7, "0xaa");
        let b = Authorization::nonce_for("table-1", 7, "0xaa");
        let c = Authorization::nonce_for("table-1", 8, "0xaa");
        let d = Authorization::nonce_for("table-1", 7, "0xbb");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn message_excludes_signature() {
        let mut auth = Authorization {
            payer: "0xaa".into(),
            payee: "0xee".into(),
            value: 50,
            valid_after: 100,
            valid_before: 400,
            nonce: "n".into(),
            signature: String::new(),
        };
        let unsigned = auth.message();
        auth.signature = "sig".into();
        assert_eq!(unsigned, auth.message());
    }
}
