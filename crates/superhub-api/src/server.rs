//! Servers owned by users, their panel-side view and pricing.

use crate::client::SuperhubClient;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use superhub_core::ids::{EggId, NestId, NodeId, PteroServerId, ServerId, UserId};
use superhub_core::Method;

/// Installation state of a server.
///
/// Says whether setup finished, not whether the server is reachable right
/// now. Encoded on the wire as an integer; codes outside the known set read
/// as [`ServerState::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ServerState {
    /// The system failed to create the server (`-1`).
    Failed,
    /// Still being created, or state unknown (`0`).
    #[default]
    Unknown,
    /// Ready for use (`1`).
    Normal,
}

impl ServerState {
    /// Wire code of the state.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Failed => -1,
            Self::Unknown => 0,
            Self::Normal => 1,
        }
    }
}

impl From<i64> for ServerState {
    fn from(code: i64) -> Self {
        match code {
            -1 => Self::Failed,
            1 => Self::Normal,
            _ => Self::Unknown,
        }
    }
}

impl From<ServerState> for i64 {
    fn from(state: ServerState) -> Self {
        state.code()
    }
}

/// Server as seen by the billing side: cost, discount, lifetime.
///
/// Resource limits and panel details live in [`ExternalServer`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    /// Billing id; unrelated to the panel id.
    pub id: ServerId,
    /// Id of the matching Pterodactyl server.
    pub ptero_id: PteroServerId,
    /// Owner of the server.
    pub owner_id: UserId,
    /// Installation state.
    pub state: ServerState,
    /// Base cost in roubles, discount applied.
    pub cost: f64,
    /// Discount between `0` (none) and `1` (free).
    pub sale: f64,
    /// Cost while frozen; only present for servers frozen by their owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeze_cost: Option<f64>,
    /// Tariff the server was bought on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tariff_id: Option<String>,
    /// Domain attached to the server.
    pub domain: String,
    /// TCPShield record, when protection is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcpshield_record: Option<String>,
    /// Embedded panel-side view, when the API includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_server: Option<ExternalServer>,
    /// Expiry of a temporary (test) server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// When the server was frozen or blocked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frozen_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Server {
    /// Frozen on the owner's request.
    ///
    /// Blocking for non-payment sets the same timestamp but no freeze cost.
    #[must_use]
    pub const fn is_frozen_by_user(&self) -> bool {
        self.frozen_at.is_some() && self.freeze_cost.is_some()
    }

    /// Frozen for any reason, including non-payment.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.frozen_at.is_some()
    }

    /// Test server that expires at [`Server::expires_at`].
    #[must_use]
    pub const fn is_temporary(&self) -> bool {
        self.expires_at.is_some()
    }

    /// Setup has finished.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state == ServerState::Normal
    }

    /// Fetch the panel-side view of this server.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn external_server(&self, client: &SuperhubClient) -> Result<ExternalServer> {
        client.get_external_server(self.id).await
    }

    /// Fetch the current pricing of this server.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn pricing(&self, client: &SuperhubClient) -> Result<ServerPricing> {
        client.get_server_pricing(self.id).await
    }
}

/// Server as seen by the Pterodactyl panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalServer {
    /// Link to the server in the panel.
    pub control_url: String,
    /// Server name.
    pub name: String,
    /// Short panel identifier.
    pub identifier: String,
    /// Resource limits.
    pub resource_limits: Resources,
    /// Feature limits.
    pub feature_limits: FeatureLimits,
    /// Suspended in the panel.
    #[serde(rename = "suspended")]
    pub is_suspended: bool,
    /// Node the server runs on.
    pub node_id: NodeId,
    /// Pterodactyl nest.
    pub nest_id: NestId,
    /// Pterodactyl egg.
    pub egg_id: EggId,
}

/// Resource amounts, used both for server limits and node capacity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resources {
    /// CPU share in percent of one core.
    pub cpu: i64,
    /// Memory in MiB.
    pub memory: i64,
    /// Disk in MiB.
    pub disk: i64,
}

/// Countable panel features.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureLimits {
    /// Number of databases.
    pub databases: i64,
    /// Number of backups.
    pub backups: i64,
}

/// Pricing projection of a [`Server`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerPricing {
    /// Base cost, discount applied.
    pub cost: f64,
    /// Discount between `0` and `1`.
    pub sale: f64,
    /// Cost while frozen by the owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeze_cost: Option<f64>,
}

impl SuperhubClient {
    /// List servers visible to the caller.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn list_servers(&self) -> Result<Vec<Server>> {
        self.core().get("/servers", &[]).await
    }

    /// Fetch a server by id.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn get_server(&self, id: ServerId) -> Result<Server> {
        self.core().get(&format!("/servers/{id}"), &[]).await
    }

    /// Fetch the panel-side view of a server.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn get_external_server(&self, id: ServerId) -> Result<ExternalServer> {
        self.core().get(&format!("/servers/{id}/external"), &[]).await
    }

    /// Fetch the pricing of a server.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn get_server_pricing(&self, id: ServerId) -> Result<ServerPricing> {
        self.core().get(&format!("/servers/{id}/pricing"), &[]).await
    }

    /// Freeze a server on the owner's behalf.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn block_server(&self, id: ServerId) -> Result<()> {
        self.core()
            .invoke_void_endpoint(
                Method::Post,
                &format!("/servers/{id}/blocking"),
                &[],
                Option::<&()>::None,
            )
            .await
    }

    /// Lift a freeze or block.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn unblock_server(&self, id: ServerId) -> Result<()> {
        self.core()
            .invoke_void_endpoint(
                Method::Delete,
                &format!("/servers/{id}/blocking"),
                &[],
                Option::<&()>::None,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::test_client;
    use crate::Error;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn server_json(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "pteroId": 310,
            "ownerId": 17,
            "state": 1,
            "cost": 249.5,
            "sale": 0.1,
            "freezeCost": null,
            "tariffId": "minecraft-start",
            "domain": "play.example.ru",
            "tcpshieldRecord": null,
            "expiresAt": null,
            "frozenAt": null,
            "createdAt": "2023-01-10T10:00:00Z",
            "updatedAt": "2023-02-01T08:30:00Z"
        })
    }

    fn server_with(frozen_at: Option<&str>, freeze_cost: Option<f64>) -> Server {
        let mut value = server_json(1);
        value["frozenAt"] = json!(frozen_at);
        value["freezeCost"] = json!(freeze_cost);
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn state_codes_round_trip() {
        assert_eq!(ServerState::from(-1), ServerState::Failed);
        assert_eq!(ServerState::from(0), ServerState::Unknown);
        assert_eq!(ServerState::from(1), ServerState::Normal);
        assert_eq!(ServerState::from(42), ServerState::Unknown);
        assert_eq!(serde_json::to_value(ServerState::Failed).unwrap(), json!(-1));
    }

    #[test]
    fn frozen_by_user_requires_cost_and_timestamp() {
        let never_frozen = server_with(None, None);
        assert!(!never_frozen.is_frozen_by_user());
        assert!(!never_frozen.is_blocked());

        let blocked_for_debt = server_with(Some("2023-03-01T00:00:00Z"), None);
        assert!(blocked_for_debt.is_blocked());
        assert!(!blocked_for_debt.is_frozen_by_user());

        let frozen = server_with(Some("2023-03-01T00:00:00Z"), Some(0.0));
        assert!(frozen.is_frozen_by_user());
        assert_eq!(frozen.freeze_cost, Some(0.0));
    }

    #[test]
    fn optional_fields_accept_missing_and_null() {
        let mut value = server_json(3);
        let object = value.as_object_mut().unwrap();
        object.remove("tariffId");
        object.remove("expiresAt");

        let server: Server = serde_json::from_value(value).unwrap();
        assert!(server.tariff_id.is_none());
        assert!(!server.is_temporary());
        assert!(server.is_ready());
        assert!(server.external_server.is_none());
    }

    #[tokio::test]
    async fn list_servers_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/servers"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([server_json(1), server_json(2)])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let servers = client.list_servers().await.unwrap();
        assert_eq!(servers.len(), 2);
        assert_eq!(servers[1].id, ServerId::new(2));
        assert_eq!(servers[0].tariff_id.as_deref(), Some("minecraft-start"));
    }

    #[tokio::test]
    async fn get_server_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/servers/5"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": "Not Found",
                "message": "No such server",
                "path": "/v1/servers/5",
                "status": 404,
                "timestamp": "2023-06-01T12:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.get_server(ServerId::new(5)).await.unwrap_err();
        let response = err.error_response().expect("structured error");
        assert_eq!(response.message, "No such server");
        assert_eq!(response.path, "/v1/servers/5");
        assert!(matches!(err, Error::Request(_)));
    }

    #[tokio::test]
    async fn external_server_through_dto() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/servers/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(server_json(9)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/servers/9/external"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "controlUrl": "https://panel.superhub.host/server/ab12cd34",
                "name": "Survival",
                "identifier": "ab12cd34",
                "resourceLimits": { "cpu": 200, "memory": 4096, "disk": 20480 },
                "featureLimits": { "databases": 2, "backups": 3 },
                "suspended": false,
                "nodeId": 4,
                "nestId": 1,
                "eggId": 5
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let owned = client.get_server(ServerId::new(9)).await.unwrap();
        let external = owned.external_server(&client).await.unwrap();

        assert_eq!(external.identifier, "ab12cd34");
        assert_eq!(external.resource_limits.memory, 4096);
        assert_eq!(external.feature_limits.backups, 3);
        assert_eq!(external.node_id, NodeId::new(4));
        assert!(!external.is_suspended);
    }

    #[tokio::test]
    async fn server_pricing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/servers/9/pricing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cost": 300.0,
                "sale": 0.25,
                "freezeCost": 30.0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let pricing = client.get_server_pricing(ServerId::new(9)).await.unwrap();
        assert_eq!(pricing.freeze_cost, Some(30.0));
        assert!((pricing.sale - 0.25).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn block_and_unblock_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/servers/9/blocking"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v1/servers/9/blocking"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.block_server(ServerId::new(9)).await.unwrap();
        client.unblock_server(ServerId::new(9)).await.unwrap();
    }

    #[tokio::test]
    async fn block_server_conflict_is_request_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/servers/9/blocking"))
            .respond_with(ResponseTemplate::new(409).set_body_string("already frozen"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.block_server(ServerId::new(9)).await.unwrap_err();
        assert!(matches!(err, Error::UnsuccessfulStatus(_)));
        assert_eq!(err.status(), Some(409));
    }
}
