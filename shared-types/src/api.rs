use crate::boq::{BoqItem, ClientDetails, Room};
use crate::currency::{Currency, RateTable};
use crate::questionnaire::Answers;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// Body of `POST /api/generate-boq`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GenerateBoqRequest {
    pub requirements: Option<String>,
    pub client_details: Option<ClientDetails>,
}

/// Body of `POST /api/refine-boq`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RefineBoqRequest {
    pub existing_rooms: Option<Vec<Room>>,
    pub refinement_prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomsResponse {
    pub rooms: Vec<Room>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompileQuestionnaireRequest {
    #[serde(default)]
    pub answers: Answers,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompileQuestionnaireResponse {
    pub requirements: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CurrencyInfo {
    pub code: Currency,
    pub label: String,
    pub symbol: String,
    pub rate: f64,
    /// False until a real rate for this currency has been loaded
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RatesResponse {
    pub base: Currency,
    /// False until the startup rate fetch has resolved; rates are 1:1 until then
    pub loaded: bool,
    pub rates: RateTable,
    pub currencies: Vec<CurrencyInfo>,
}

/// Body of `POST /api/sessions/{id}/generate`; either free text or questionnaire answers
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionGenerateRequest {
    pub requirements: Option<String>,
    pub answers: Option<Answers>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionRefineRequest {
    pub instruction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SetCurrencyRequest {
    pub currency: Currency,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddRoomRequest {
    pub name: String,
    #[serde(default)]
    pub requirements: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RenameRoomRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddItemRequest {
    pub item: BoqItem,
}

/// Body of `PUT /api/sessions/{id}/rooms/{room_id}/items`; prices in USD
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReplaceItemsRequest {
    pub items: Vec<BoqItem>,
}

/// Body of `PUT /api/sessions/{id}/rooms`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReplaceRoomsRequest {
    pub rooms: Vec<Room>,
}

/// Room as displayed: stored USD values plus display-currency totals
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RoomView {
    #[serde(flatten)]
    pub room: Room,
    pub display_total: f64,
    pub formatted_total: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionView {
    pub id: String,
    pub client_details: ClientDetails,
    pub currency: Currency,
    pub exchange_rate: f64,
    pub rates_loaded: bool,
    pub busy: bool,
    pub rooms: Vec<RoomView>,
    pub grand_total: f64,
    pub formatted_grand_total: String,
    /// USD totals per room id
    pub reference_totals: BTreeMap<String, f64>,
}
