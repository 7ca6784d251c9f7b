use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Preparer recorded on new projects
pub const DEFAULT_PREPARED_BY: &str = "GenBOQ AI Assistant";

/// Project and client metadata shown on the cover sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClientDetails {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub prepared_by: String,
    /// ISO date (`YYYY-MM-DD`)
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub design_engineer: String,
    #[serde(default)]
    pub account_manager: String,
    #[serde(default)]
    pub key_client_personnel: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub key_comments: String,
    /// Approximate budget in USD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

impl Default for ClientDetails {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            client_name: String::new(),
            prepared_by: DEFAULT_PREPARED_BY.to_string(),
            date: chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
            design_engineer: String::new(),
            account_manager: String::new(),
            key_client_personnel: String::new(),
            location: String::new(),
            key_comments: String::new(),
            budget: None,
        }
    }
}

impl ClientDetails {
    pub fn has_project_name(&self) -> bool {
        !self.project_name.trim().is_empty()
    }
}

/// A single BOQ line. `unit_price` is always stored in USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BoqItem {
    pub category: String,
    pub item_name: String,
    pub brand: String,
    pub model_number: String,
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl BoqItem {
    /// Line total in USD
    pub fn total_price(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

/// A named space with its own ordered BOQ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Room {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub boq: Vec<BoqItem>,
}

impl Room {
    /// Room total in USD, always derived from the items
    pub fn total(&self) -> f64 {
        self.boq.iter().map(BoqItem::total_price).sum()
    }
}

/// Grand total in USD across rooms
pub fn grand_total(rooms: &[Room]) -> f64 {
    rooms.iter().map(Room::total).sum()
}

/// Raw numeric input from an editing form; either a JSON number or the text typed by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

/// One field edit on a BOQ item, tagged by field.
///
/// `UnitPrice` carries a value in the currently displayed currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
#[ts(export)]
pub enum ItemFieldUpdate {
    Category(String),
    ItemName(String),
    Brand(String),
    ModelNumber(String),
    Description(String),
    Notes(String),
    ImageUrl(Option<String>),
    Quantity(NumericInput),
    UnitPrice(NumericInput),
}
