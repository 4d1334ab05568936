use super::Subscription;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub name: Option<String>,
    pub active: Option<bool>,
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line3: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub free_trial_hours: Option<i32>,
    pub running_simulation_limit: Option<i32>,
    #[serde(default, rename = "allowNewUI", skip_serializing_if = "std::ops::Not::not")]
    pub allow_new_ui: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_processor_customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saas_agreement: Option<String>,
    pub saas_agreement_accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    pub subscriptions: Option<Vec<Subscription>>,
}
