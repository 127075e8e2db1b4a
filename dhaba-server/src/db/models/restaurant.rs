//! Restaurant Settings Model
//!
//! 单文档集合: 固定 id `restaurant:main`。

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;

/// Generate a short invite code for staff onboarding
pub fn generate_join_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|b| (b as char).to_ascii_uppercase())
        .collect()
}

/// Restaurant profile and billing rates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    /// GST registration number printed on receipts
    pub gstin: Option<String>,
    /// GST percentage applied to the subtotal
    #[serde(default)]
    pub gst_rate: f64,
    /// Service charge percentage
    #[serde(default)]
    pub service_rate: f64,
    /// Closing line on receipts
    #[serde(default = "default_footer")]
    pub receipt_footer: String,
    /// Invite code staff enter to self-register
    #[serde(default = "generate_join_code")]
    pub join_code: String,
}

fn default_footer() -> String {
    "Thank you, visit again!".to_string()
}

impl Default for Restaurant {
    fn default() -> Self {
        Self {
            id: None,
            name: "Dhaba".to_string(),
            address: String::new(),
            phone: String::new(),
            gstin: None,
            gst_rate: 0.0,
            service_rate: 0.0,
            receipt_footer: default_footer(),
            join_code: generate_join_code(),
        }
    }
}

/// Update restaurant settings payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RestaurantUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 80))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20))]
    pub gstin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub gst_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub service_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 120))]
    pub receipt_footer: Option<String>,
}
