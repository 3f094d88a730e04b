//! Hosting nodes: the physical machines servers are placed on.

use crate::client::SuperhubClient;
use crate::server::Resources;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use superhub_core::ids::NodeId;
use superhub_core::Method;

/// Installed hardware a node reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeComponent {
    /// Processor model.
    Cpu,
}

impl NodeComponent {
    /// Key of the component in [`Node::components`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
        }
    }
}

impl fmt::Display for NodeComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node information used when buying a server.
///
/// Only the id is shared with the Pterodactyl panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Node id, same as in the panel.
    pub id: NodeId,
    /// Display name.
    pub name: String,
    /// Host name resolving to the node address.
    pub hostname: String,
    /// Installed components keyed by [`NodeComponent::as_str`].
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub components: HashMap<String, String>,
    /// Resources users may buy on this node.
    pub limits: Resources,
    /// Load between `0` (idle) and `1` (full).
    pub load: f64,
    /// Physical location.
    pub location: NodeLocation,
    /// Price parameters for servers on this node.
    pub prices: NodePrices,
    /// Hidden from the purchase page.
    pub hidden: bool,
}

impl Node {
    /// Description of an installed component, if reported.
    #[must_use]
    pub fn component(&self, component: NodeComponent) -> Option<&str> {
        self.components.get(component.as_str()).map(String::as_str)
    }

    /// Fetch the current purchase limits of this node.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn fetch_limits(&self, client: &SuperhubClient) -> Result<Resources> {
        client.get_node_limits(self.id).await
    }

    /// Replace the purchase limits of this node.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn update_limits(
        &self,
        client: &SuperhubClient,
        limits: &Resources,
    ) -> Result<Resources> {
        client.update_node_limits(self.id, limits).await
    }

    /// Fetch the current load of this node.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn fetch_load(&self, client: &SuperhubClient) -> Result<NodeLoad> {
        client.get_node_load(self.id).await
    }

    /// Report a new load for this node.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn update_load(&self, client: &SuperhubClient, load: NodeLoad) -> Result<NodeLoad> {
        client.update_node_load(self.id, load).await
    }
}

/// Data center a node is hosted in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeLocation {
    /// Country.
    pub country: String,
    /// City.
    pub city: String,
    /// Location code, e.g. `MSK-1`.
    pub code: String,
}

/// Price parameters of a node. Amounts are per day.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodePrices {
    /// One CPU core.
    pub cpu: f64,
    /// One GB of memory.
    pub memory: f64,
    /// One GB of disk above the free allowance.
    pub disk: f64,
    /// One GB of extra backups.
    pub backups: f64,
    /// Free disk allowance in GB.
    pub free_disk: f64,
    /// Extra databases.
    pub databases: f64,
    /// Multiplier applied to the total.
    pub multiplier: f64,
    /// Migration discount between `0` and `1`.
    pub migration_bonus: f64,
}

/// Load wrapper used by the load endpoints.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeLoad {
    /// Load between `0` (idle) and `1` (full).
    pub load: f64,
}

impl NodeLoad {
    /// Wrap a load value.
    #[must_use]
    pub const fn new(load: f64) -> Self {
        Self { load }
    }
}

impl SuperhubClient {
    /// List all nodes.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn list_nodes(&self) -> Result<Vec<Node>> {
        self.core().get("/nodes", &[]).await
    }

    /// Fetch a node by id.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn get_node(&self, id: NodeId) -> Result<Node> {
        self.core().get(&format!("/nodes/{id}"), &[]).await
    }

    /// Fetch the purchase limits of a node.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn get_node_limits(&self, id: NodeId) -> Result<Resources> {
        self.core().get(&format!("/nodes/{id}/limits"), &[]).await
    }

    /// Replace the purchase limits of a node.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn update_node_limits(&self, id: NodeId, limits: &Resources) -> Result<Resources> {
        self.core()
            .fetch(Method::Put, &format!("/nodes/{id}/limits"), &[], Some(limits))
            .await
    }

    /// Fetch the load of a node.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn get_node_load(&self, id: NodeId) -> Result<NodeLoad> {
        self.core().get(&format!("/nodes/{id}/load"), &[]).await
    }

    /// Report a new load for a node.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn update_node_load(&self, id: NodeId, load: NodeLoad) -> Result<NodeLoad> {
        self.core()
            .fetch(Method::Put, &format!("/nodes/{id}/load"), &[], Some(&load))
            .await
    }
}
