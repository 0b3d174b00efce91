use super::authorization::Authorization;
use super::authorization::Authorizer;
use super::authorization::SessionSigner;
use super::backend::RelayBackend;
use super::backend::SettlementMode;
use super::backend::SimulatedBackend;
use super::backend::TransferBackend;
use super::net::NetPosition;
use crate::config::TableConfig;
use crate::receipt::HandReceipt;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Mutex;

/// Settlement failure, surfaced to the orchestrator. A failed settlement
/// never rolls the hand back; it stays eligible for out-of-band retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleError {
    HashMismatch { expected: String, computed: String },
    NonceReplay(String),
    Signing(String),
    Backend(String),
}

impl std::fmt::Display for SettleError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::HashMismatch { expected, computed } => {
                write!(f, "receipt hash mismatch: claimed {} computed {}", expected, computed)
            }
            Self::NonceReplay(nonce) => write!(f, "nonce already used: {}", nonce),
            Self::Signing(reason) => write!(f, "authorization signing failed: {}", reason),
            Self::Backend(reason) => write!(f, "transfer backend failed: {}", reason),
        }
    }
}

impl std::error::Error for SettleError {}

/// Immutable record binding a settled hand to its transaction reference.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRecord {
    pub hand_no: u64,
    pub receipt_hash: String,
    pub tx_ref: String,
    pub mode: SettlementMode,
    pub settled_at: u64,
}

/// Drives one hand's settlement: verify the receipt, collect every payer
/// debit under a signed authorization, then and only then pay the payees.
///
/// Payer collections within one settlement run concurrently (each debits a
/// distinct payer); the payout step is strictly ordered after all payer
/// confirmations. Nonces are single-use for the facilitator's lifetime.
pub struct Facilitator {
    table_id: String,
    escrow: String,
    backend: Box<dyn TransferBackend>,
    signer: Box<dyn Authorizer>,
    nonces: Mutex<HashSet<String>>,
}

impl Facilitator {
    pub fn new(
        table_id: &str,
        escrow: &str,
        backend: Box<dyn TransferBackend>,
        signer: Box<dyn Authorizer>,
    ) -> Self {
        Self {
            table_id: table_id.to_owned(),
            escrow: escrow.to_owned(),
            backend,
            signer,
            nonces: Mutex::new(HashSet::new()),
        }
    }

    /// Wire the facilitator from configuration. Missing on-chain addresses
    /// select the simulated backend rather than failing startup.
    pub fn from_config(config: &TableConfig) -> Self {
        let backend: Box<dyn TransferBackend> = if config.off_chain() {
            log::warn!(
                "[facilitator {}] contract addresses not configured, settlements will be simulated",
                config.table_id
            );
            Box::new(SimulatedBackend)
        } else {
            Box::new(RelayBackend::new(
                &config.rpc_url,
                &config.token_address,
                &config.escrow_address,
                config.chain_id,
            ))
        };
        Self::new(&config.table_id, &config.escrow_address, backend, Box::new(SessionSigner))
    }

    pub fn mode(&self) -> SettlementMode {
        self.backend.mode()
    }

    /// Settle one hand. Ordering is the one hard barrier in the system:
    /// every payer confirmation lands before the first payout call.
    pub async fn settle(
        &self,
        receipt: &HandReceipt,
        receipt_hash: &str,
        payers: &[NetPosition],
        payees: &[NetPosition],
    ) -> Result<SettlementRecord, SettleError> {
        let computed = receipt.hash();
        if computed != receipt_hash {
            return Err(SettleError::HashMismatch {
                expected: receipt_hash.to_owned(),
                computed,
            });
        }
        let now = crate::clock();
        let authorizations = self.authorize(receipt, payers, now).await?;
        log::debug!(
            "[facilitator {}] hand {} collecting from {} payers",
            self.table_id,
            receipt.hand_no,
            authorizations.len()
        );
        let debits = futures::future::join_all(
            authorizations.iter().map(|auth| self.backend.collect(auth)),
        )
        .await;
        for confirmation in debits {
            confirmation?;
        }
        if !payees.is_empty() {
            self.backend.payout(payees).await?;
        }
        let tx_ref = self.backend.finalize(receipt.hand_no, receipt_hash).await?;
        log::info!(
            "[facilitator {}] hand {} settled {} ({})",
            self.table_id,
            receipt.hand_no,
            tx_ref,
            self.backend.mode()
        );
        Ok(SettlementRecord {
            hand_no: receipt.hand_no,
            receipt_hash: receipt_hash.to_owned(),
            tx_ref,
            mode: self.backend.mode(),
            settled_at: now,
        })
    }

    /// Build and sign one time-boxed authorization per payer, reserving
    /// each nonce before anything is submitted.
    async fn authorize(
        &self,
        receipt: &HandReceipt,
        payers: &[NetPosition],
        now: u64,
    ) -> Result<Vec<Authorization>, SettleError> {
        let mut authorizations = Vec::with_capacity(payers.len());
        for payer in payers {
            let nonce = Authorization::nonce_for(&self.table_id, receipt.hand_no, &payer.address);
            {
                let mut used = self.nonces.lock().expect("poisoned nonce set");
                if !used.insert(nonce.clone()) {
                    return Err(SettleError::NonceReplay(nonce));
                }
            }
            let mut auth = Authorization {
                payer: payer.address.clone(),
                payee: self.escrow.clone(),
                value: payer.amount,
                valid_after: now.saturating_sub(60),
                valid_before: now + 300,
                nonce,
                signature: String::new(),
            };
            auth.signature = self
                .signer
                .sign(&auth.payer, &auth.message())
                .await
                .map_err(|e| SettleError::Signing(e.to_string()))?;
            authorizations.push(auth);
        }
        Ok(authorizations)
    }
}
