//! Payments: the history of balance changes.
//!
//! Positive amounts are top-ups, negative amounts are charges for services.

use crate::client::SuperhubClient;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use superhub_core::ids::{PaymentId, UserId};
use superhub_core::Method;

/// Amount and currency of a payment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentAmount {
    /// Sum in [`PaymentAmount::currency`].
    pub sum: f64,
    /// Currency code.
    pub currency: String,
}

/// What caused a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentSourceType {
    /// Balance top-up.
    TopUp,
    /// Charge for a game server.
    ServerService,
    /// Share of an invited user's top-ups.
    Referral,
    /// Welcome bonus for users who signed up by invitation.
    ReferralWelcomeBonus,
    /// Anything else, including types this client does not know yet.
    #[serde(other)]
    Other,
}

/// Source of a payment, used to filter and group them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentSource {
    /// Source type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PaymentSourceType>,
    /// Source id. Always empty for some types (`TOP_UP`, `OTHER`), always set
    /// for others; for `REFERRAL` it is the user the bonus came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl PaymentSource {
    /// Source of the given type without an id.
    #[must_use]
    pub const fn of(kind: PaymentSourceType) -> Self {
        Self {
            kind: Some(kind),
            id: None,
        }
    }

    /// Attach a source id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// How the system processes a payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    /// Fully processed.
    #[default]
    Production,
    /// Processed without touching the balance.
    Test,
    /// A mode this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// A single balance change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Opaque id; currently 16 hex-encoded bytes.
    pub id: PaymentId,
    /// User whose balance changed.
    pub user_id: UserId,
    /// Amount.
    pub amount: PaymentAmount,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// What caused the payment.
    #[serde(default, deserialize_with = "crate::de::null_as_default")]
    pub source: PaymentSource,
    /// Processing mode.
    pub mode: PaymentMode,
    /// The balance change was applied. Top-ups stay incomplete until paid.
    pub completed: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Processed in test mode.
    #[must_use]
    pub fn is_test(&self) -> bool {
        self.mode == PaymentMode::Test
    }
}

/// Body of a payment creation request.
///
/// Absent optional fields are sent as `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentCreationForm {
    /// Amount in roubles.
    pub amount: f64,
    /// Description.
    pub description: Option<String>,
    /// Source.
    pub source: Option<PaymentSource>,
}

impl PaymentCreationForm {
    /// Form for the given amount.
    #[must_use]
    pub const fn new(amount: f64) -> Self {
        Self {
            amount,
            description: None,
            source: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the source.
    #[must_use]
    pub fn with_source(mut self, source: PaymentSource) -> Self {
        self.source = Some(source);
        self
    }
}

impl SuperhubClient {
    /// List every payment in the system.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn list_payments(&self) -> Result<Vec<Payment>> {
        self.core().get("/payments", &[]).await
    }

    /// List payments of a user.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn list_user_payments(&self, user_id: UserId) -> Result<Vec<Payment>> {
        self.core()
            .get(&format!("/users/{user_id}/payments"), &[])
            .await
    }

    /// Create a payment for a user.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline error.
    pub async fn create_payment(
        &self,
        user_id: UserId,
        form: &PaymentCreationForm,
    ) -> Result<Payment> {
        self.core()
            .fetch(
                Method::Post,
                &format!("/users/{user_id}/payments"),
                &[],
                Some(form),
            )
            .await
    }
}
