use crate::gameplay::GameObservation;
use crate::gameplay::PlayerAction;
use crate::gameroom::Agent;
use serde::Deserialize;
use serde::Serialize;

/// HTTP player agent: one request per decision.
///
/// The wire contract is `POST {endpoint}/act` with the observation;
/// the response carries one action. Transport failures and malformed
/// responses surface as errors and the room folds the seat.
pub struct RemoteAgent {
    address: String,
    endpoint: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct ActRequest<'a> {
    observation: &'a GameObservation,
}

#[derive(Deserialize)]
struct ActResponse {
    action: PlayerAction,
}

impl RemoteAgent {
    pub fn new(address: String, endpoint: String) -> Self {
        Self {
            address,
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl Agent for RemoteAgent {
    fn address(&self) -> &str {
        &self.address
    }

    async fn decide(&self, observation: &GameObservation) -> anyhow::Result<PlayerAction> {
        let response = self
            .http
            .post(format!("{}/act", self.endpoint))
            .json(&ActRequest { observation })
            .send()
            .await?
            .error_for_status()?
            .json::<ActResponse>()
            .await?;
        Ok(response.action)
    }
}
