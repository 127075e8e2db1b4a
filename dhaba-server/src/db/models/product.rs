//! Product Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;

/// Dietary classification shown next to menu items
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FoodType {
    #[default]
    Veg,
    NonVeg,
}

/// Product model (菜单项)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    /// Unit price in rupees
    pub price: f64,
    /// Free-form category label, e.g. "Starters"
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub food_type: FoodType,
    /// Serving unit, e.g. "plate" / "piece" / "glass"
    #[serde(default)]
    pub quantity_type: String,
    /// Hosted image URL (imgbb)
    pub image_url: Option<String>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub price: f64,
    #[validate(length(max = 40))]
    pub category: Option<String>,
    pub food_type: Option<FoodType>,
    #[validate(length(max = 20))]
    pub quantity_type: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 80))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 40))]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_type: Option<FoodType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20))]
    pub quantity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}
