use super::authorization::Authorization;
use super::facilitator::SettleError;
use super::net::NetPosition;
use crate::Chips;
use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;

/// Whether a settlement moved real funds or was simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettlementMode {
    OnChain,
    OffChain,
}

impl std::fmt::Display for SettlementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::OnChain => write!(f, "on-chain"),
            Self::OffChain => write!(f, "off-chain"),
        }
    }
}

/// Escrow/transfer entry point, consumed only through its call signatures.
///
/// `collect` debits one payer against a signed authorization and resolves
/// when the transfer confirms; `payout` credits all payees in one batch;
/// `finalize` records the settled hand. The facilitator guarantees that no
/// payout is issued before every collect has confirmed.
#[async_trait::async_trait]
pub trait TransferBackend: Send + Sync {
    fn mode(&self) -> SettlementMode;
    async fn collect(&self, auth: &Authorization) -> Result<String, SettleError>;
    async fn payout(&self, payees: &[NetPosition]) -> Result<String, SettleError>;
    async fn finalize(&self, hand_no: u64, receipt_hash: &str) -> Result<String, SettleError>;
}

/// Degraded mode for tables with no transfer backend configured: every
/// call succeeds after a fixed short delay and returns a deterministic
/// synthetic reference, so orchestration runs and tests without funds.
pub struct SimulatedBackend;

const SIMULATED_DELAY: Duration = Duration::from_millis(100);

#[async_trait::async_trait]
impl TransferBackend for SimulatedBackend {
    fn mode(&self) -> SettlementMode {
        SettlementMode::OffChain
    }
    async fn collect(&self, auth: &Authorization) -> Result<String, SettleError> {
        tokio::time::sleep(SIMULATED_DELAY).await;
        Ok(format!("sim_debit_{}", &auth.nonce[..16]))
    }
    async fn payout(&self, payees: &[NetPosition]) -> Result<String, SettleError> {
        tokio::time::sleep(SIMULATED_DELAY).await;
        Ok(format!("sim_credit_{}", payees.len()))
    }
    async fn finalize(&self, _hand_no: u64, receipt_hash: &str) -> Result<String, SettleError> {
        Ok(format!("simulated_{}", &receipt_hash[..16]))
    }
}

/// HTTP relay gateway submitting gasless transfers against the configured
/// token and escrow contracts.
pub struct RelayBackend {
    http: reqwest::Client,
    base: String,
    token: String,
    escrow: String,
    chain_id: u64,
}

const RELAY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectRequest<'a> {
    chain_id: u64,
    token: &'a str,
    authorization: &'a Authorization,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PayoutRequest<'a> {
    escrow: &'a str,
    recipients: Vec<&'a str>,
    amounts: Vec<Chips>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FinalizeRequest<'a> {
    escrow: &'a str,
    hand_no: u64,
    receipt_hash: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayResponse {
    success: bool,
    #[serde(default)]
    tx_hash: String,
    #[serde(default)]
    error: Option<String>,
}

impl RelayBackend {
    pub fn new(base: &str, token: &str, escrow: &str, chain_id: u64) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
            escrow: escrow.to_owned(),
            chain_id,
        }
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<String, SettleError> {
        let url = format!("{}/{}", self.base, path);
        let response = self
            .http
            .post(&url)
            .timeout(RELAY_TIMEOUT)
            .json(body)
            .send()
            .await
            .map_err(|e| SettleError::Backend(e.to_string()))?
            .error_for_status()
            .map_err(|e| SettleError::Backend(e.to_string()))?
            .json::<RelayResponse>()
            .await
            .map_err(|e| SettleError::Backend(e.to_string()))?;
        if response.success {
            Ok(response.tx_hash)
        } else {
            Err(SettleError::Backend(
                response.error.unwrap_or_else(|| "relay refused".to_string()),
            ))
        }
    }
}

#[async_trait::async_trait]
impl TransferBackend for RelayBackend {
    fn mode(&self) -> SettlementMode {
        SettlementMode::OnChain
    }
    async fn collect(&self, auth: &Authorization) -> Result<String, SettleError> {
        let request = CollectRequest {
            chain_id: self.chain_id,
            token: &self.token,
            authorization: auth,
        };
        self.post("transfer-with-authorization", &request).await
    }
    async fn payout(&self, payees: &[NetPosition]) -> Result<String, SettleError> {
        let request = PayoutRequest {
            escrow: &self.escrow,
            recipients: payees.iter().map(|p| p.address.as_str()).collect(),
            amounts: payees.iter().map(|p| p.amount).collect(),
        };
        self.post("batch-debit", &request).await
    }
    async fn finalize(&self, hand_no: u64, receipt_hash: &str) -> Result<String, SettleError> {
        let request = FinalizeRequest {
            escrow: &self.escrow,
            hand_no,
            receipt_hash,
        };
        self.post("settled", &request).await
    }
}
