//! Registered users and their linked accounts.

use crate::client::SuperhubClient;
use crate::payment::Payment;
use crate::server::Server;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use superhub_core::ids::UserId;

/// Path segment addressing the owner of the credentials in use.
pub const CURRENT_USER_REFERENCE: &str = "@self";

/// A user registered on the hosting site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User id; unrelated to any panel id.
    pub id: UserId,
    /// Login email, unique.
    pub email: String,
    /// Nickname, unique.
    pub name: String,
    /// Balance in roubles.
    pub balance: f64,
    /// Discord account, always present even if nothing is linked.
    pub discord: LinkedDiscord,
    /// VK account, always present even if nothing is linked.
    pub vk: LinkedVk,
    /// Referral program state.
    pub referral: Referral,
    /// Two-factor authentication is on.
    pub has_mfa_enabled: bool,
    /// The user has had a test server, so may not order another one.
    pub had_test_server: bool,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// A Discord account is linked.
    #[must_use]
    pub const fn has_linked_discord(&self) -> bool {
        self.discord.id.is_some()
    }

    /// A VK account is linked.
    #[must_use]
    pub const fn has_linked_vk(&self) -> bool {
        self.vk.id.is_some()
    }

    /// The user signed up with someone's referral code.
    #[must_use]
    pub const fn has_referral(&self) -> bool {
        self.referral.user_id.is_some()
    }

    /// Servers owned by this user.
    ///
    /// With `external` set, servers that have a panel counterpart come back
    /// with [`Server::external_server`] filled in.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn owned_servers(
        &self,
        client: &SuperhubClient,
        external: bool,
    ) -> Result<Vec<Server>> {
        client.list_owned_servers(self.id, external).await
    }

    /// Payments made by or for this user.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn payments(&self, client: &SuperhubClient) -> Result<Vec<Payment>> {
        client.list_user_payments(self.id).await
    }
}

/// Linked Discord account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkedDiscord {
    /// Discord user id.
    #[serde(default)]
    pub id: Option<String>,
    /// The link bonus was paid out.
    #[serde(rename = "linkBonus")]
    pub acquired_link_bonus: bool,
}

/// Linked VK account.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkedVk {
    /// VK user id.
    #[serde(default)]
    pub id: Option<i64>,
    /// The link bonus was paid out.
    #[serde(rename = "linkBonus")]
    pub acquired_link_bonus: bool,
    /// The feedback bonus was paid out.
    #[serde(rename = "feedbackBonus")]
    pub acquired_feedback_bonus: bool,
}

/// Referral program state of a user.
///
/// Covers both who invited this user and the user's own code.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Referral {
    /// The first top-up bonus was paid out.
    #[serde(rename = "bonus")]
    pub acquired_bonus: bool,
    /// The user's own referral code.
    pub code: String,
    /// Owner of the code used at sign-up.
    #[serde(default)]
    pub user_id: Option<UserId>,
}

impl SuperhubClient {
    async fn get_user_by_reference(&self, reference: &str) -> Result<User> {
        self.core().get(&format!("/users/{reference}"), &[]).await
    }

    /// Fetch a user by id. Use [`SuperhubClient::get_current_user`] for the
    /// owner of the credentials.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn get_user(&self, id: UserId) -> Result<User> {
        self.get_user_by_reference(&id.to_string()).await
    }

    /// Fetch the owner of the credentials in use.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn get_current_user(&self) -> Result<User> {
        self.get_user_by_reference(CURRENT_USER_REFERENCE).await
    }

    /// List servers owned by a user, optionally with their panel view.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn list_owned_servers(&self, owner: UserId, external: bool) -> Result<Vec<Server>> {
        self.core()
            .get(
                &format!("/users/{owner}/servers"),
                &[("external", external.to_string())],
            )
            .await
    }
}
