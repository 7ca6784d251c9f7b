//! Server-held editing model for one BOQ session.
//!
//! All mutation goes through [`Session`]. Totals are never stored; they are derived from
//! items on every read. A session allows one outstanding generation or refinement call,
//! tracked by a [`RequestTicket`].

use crate::currency::{format_currency, ExchangeRates};
use crate::error::BoqError;
use crate::export::{export_workbook, ExportRequest, ExportedWorkbook};
use crate::generation::new_room_id;
use shared_types::{
    BoqItem, ClientDetails, Currency, ItemFieldUpdate, NumericInput, Room, RoomView, SessionView,
};
use std::collections::{BTreeMap, HashSet};

/// Marker for the single in-flight generation or refinement call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// Outcome of handing a model result back to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The ticket no longer matches; the session moved on and the result was dropped
    Discarded,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    client_details: ClientDetails,
    rooms: Vec<Room>,
    currency: Currency,
    rates: ExchangeRates,
    in_flight: Option<RequestTicket>,
    next_ticket: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rates(rates: ExchangeRates) -> Self {
        Self {
            rates,
            ..Self::default()
        }
    }

    pub fn client_details(&self) -> &ClientDetails {
        &self.client_details
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn rates(&self) -> &ExchangeRates {
        &self.rates
    }

    pub fn exchange_rate(&self) -> f64 {
        self.rates.rate(self.currency)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn set_client_details(&mut self, details: ClientDetails) -> Result<(), BoqError> {
        self.ensure_idle()?;
        validate_client_details(&details)?;
        self.client_details = details;
        Ok(())
    }

    /// Installs the resolved startup rates
    pub fn install_rates(&mut self, rates: ExchangeRates) {
        if !rates.is_available(self.currency) {
            self.currency = Currency::REFERENCE;
        }
        self.rates = rates;
    }

    /// Changes only how prices are shown; stored USD values are untouched.
    pub fn set_currency(&mut self, currency: Currency) -> Result<(), BoqError> {
        if currency == Currency::REFERENCE {
            self.currency = currency;
            return Ok(());
        }
        if !self.rates.is_loaded() {
            return Err(BoqError::RatesPending);
        }
        if !self.rates.is_available(currency) {
            return Err(BoqError::invalid_value(
                "currency",
                format!("no exchange rate is available for {}", currency.code()),
            ));
        }
        self.currency = currency;
        Ok(())
    }

    /// Marks a generation or refinement call as outstanding
    pub fn begin_request(&mut self) -> Result<RequestTicket, BoqError> {
        if self.in_flight.is_some() {
            return Err(BoqError::Busy);
        }
        self.next_ticket += 1;
        let ticket = RequestTicket(self.next_ticket);
        self.in_flight = Some(ticket);
        Ok(ticket)
    }

    /// Hands the call's result back. On success the rooms replace the current list; on
    /// failure state is left as it was and the error is returned.
    pub fn complete_request(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<Room>, BoqError>,
    ) -> Result<Completion, BoqError> {
        if self.in_flight != Some(ticket) {
            tracing::warn!(ticket = ticket.0, "Discarding result for a stale request");
            return Ok(Completion::Discarded);
        }
        self.in_flight = None;

        let rooms = result?;
        tracing::info!(rooms = rooms.len(), "Installing generated rooms");
        self.rooms = rooms;
        Ok(Completion::Applied)
    }

    /// Drops the in-flight marker; a later completion for it is discarded
    pub fn abandon_request(&mut self) {
        self.in_flight = None;
    }

    /// Like [`Session::abandon_request`], but only while `ticket` is still the one in flight
    pub fn release_request(&mut self, ticket: RequestTicket) {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }
    }

    /// Installs a client-edited room list. Every room and item is checked first; a
    /// rejected list leaves the current rooms in place.
    pub fn replace_rooms(&mut self, rooms: Vec<Room>) -> Result<(), BoqError> {
        self.ensure_idle()?;
        validate_rooms(&rooms)?;
        self.rooms = rooms;
        Ok(())
    }

    pub fn add_room(&mut self, name: &str, requirements: &str) -> Result<&Room, BoqError> {
        self.ensure_idle()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(BoqError::invalid_value("name", "room name cannot be empty"));
        }
        self.rooms.push(Room {
            id: new_room_id(),
            name: name.to_string(),
            requirements: requirements.to_string(),
            boq: Vec::new(),
        });
        let index = self.rooms.len() - 1;
        Ok(&self.rooms[index])
    }

    pub fn rename_room(&mut self, room_id: &str, name: &str) -> Result<(), BoqError> {
        self.ensure_idle()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(BoqError::invalid_value("name", "room name cannot be empty"));
        }
        self.room_mut(room_id)?.name = name.to_string();
        Ok(())
    }

    pub fn delete_room(&mut self, room_id: &str) -> Result<Room, BoqError> {
        self.ensure_idle()?;
        let index = self
            .rooms
            .iter()
            .position(|r| r.id == room_id)
            .ok_or_else(|| room_not_found(room_id))?;
        Ok(self.rooms.remove(index))
    }

    /// Appends an item whose unit price is already in USD
    pub fn add_item(&mut self, room_id: &str, item: BoqItem) -> Result<usize, BoqError> {
        self.ensure_idle()?;
        validate_unit_price(item.unit_price)?;
        let room = self.room_mut(room_id)?;
        room.boq.push(item);
        Ok(room.boq.len() - 1)
    }

    /// Applies one field edit. Rejected input leaves the item unchanged.
    pub fn update_item(
        &mut self,
        room_id: &str,
        index: usize,
        update: ItemFieldUpdate,
    ) -> Result<&BoqItem, BoqError> {
        self.ensure_idle()?;
        let rate = self.exchange_rate();
        let item = self.item_mut(room_id, index)?;

        match update {
            ItemFieldUpdate::Category(v) => item.category = v,
            ItemFieldUpdate::ItemName(v) => item.item_name = v,
            ItemFieldUpdate::Brand(v) => item.brand = v,
            ItemFieldUpdate::ModelNumber(v) => item.model_number = v,
            ItemFieldUpdate::Description(v) => item.description = v,
            ItemFieldUpdate::Notes(v) => item.notes = v,
            ItemFieldUpdate::ImageUrl(v) => {
                item.image_url = v.filter(|url| !url.trim().is_empty());
            }
            ItemFieldUpdate::Quantity(input) => item.quantity = coerce_quantity(&input)?,
            ItemFieldUpdate::UnitPrice(input) => {
                let shown = coerce_price(&input)?;
                item.unit_price = shown / rate;
            }
        }
        Ok(item)
    }

    pub fn delete_item(&mut self, room_id: &str, index: usize) -> Result<BoqItem, BoqError> {
        self.ensure_idle()?;
        let room = self.room_mut(room_id)?;
        if index >= room.boq.len() {
            return Err(item_not_found(room_id, index));
        }
        Ok(room.boq.remove(index))
    }

    pub fn replace_items(&mut self, room_id: &str, items: Vec<BoqItem>) -> Result<(), BoqError> {
        self.ensure_idle()?;
        for item in &items {
            validate_unit_price(item.unit_price)?;
        }
        self.room_mut(room_id)?.boq = items;
        Ok(())
    }

    /// USD total of one room
    pub fn room_total(&self, room_id: &str) -> Result<f64, BoqError> {
        self.room(room_id)
            .map(Room::total)
            .ok_or_else(|| room_not_found(room_id))
    }

    /// USD total across rooms
    pub fn grand_total(&self) -> f64 {
        shared_types::grand_total(&self.rooms)
    }

    pub fn display_grand_total(&self) -> f64 {
        self.rates.to_display(self.grand_total(), self.currency)
    }

    pub fn view(&self, id: &str) -> SessionView {
        let rooms: Vec<RoomView> = self
            .rooms
            .iter()
            .map(|room| {
                let display_total = self.rates.to_display(room.total(), self.currency);
                RoomView {
                    room: room.clone(),
                    display_total,
                    formatted_total: format_currency(display_total, self.currency),
                }
            })
            .collect();

        let reference_totals: BTreeMap<String, f64> = self
            .rooms
            .iter()
            .map(|room| (room.id.clone(), room.total()))
            .collect();

        let display_grand_total = self.display_grand_total();

        SessionView {
            id: id.to_string(),
            client_details: self.client_details.clone(),
            currency: self.currency,
            exchange_rate: self.exchange_rate(),
            rates_loaded: self.rates.is_loaded(),
            busy: self.is_busy(),
            rooms,
            grand_total: display_grand_total,
            formatted_grand_total: format_currency(display_grand_total, self.currency),
            reference_totals,
        }
    }

    /// Builds the workbook from the current state without changing it
    pub fn export(&self) -> Result<ExportedWorkbook, BoqError> {
        if !self.rates.is_loaded() {
            return Err(BoqError::RatesPending);
        }
        export_workbook(&ExportRequest {
            rooms: &self.rooms,
            client_details: &self.client_details,
            currency: self.currency,
            rates: &self.rates,
        })
    }

    fn ensure_idle(&self) -> Result<(), BoqError> {
        if self.is_busy() {
            return Err(BoqError::Busy);
        }
        Ok(())
    }

    fn room_mut(&mut self, room_id: &str) -> Result<&mut Room, BoqError> {
        self.rooms
            .iter_mut()
            .find(|r| r.id == room_id)
            .ok_or_else(|| room_not_found(room_id))
    }

    fn item_mut(&mut self, room_id: &str, index: usize) -> Result<&mut BoqItem, BoqError> {
        self.room_mut(room_id)?
            .boq
            .get_mut(index)
            .ok_or_else(|| item_not_found(room_id, index))
    }
}

fn room_not_found(room_id: &str) -> BoqError {
    BoqError::not_found(format!("Room {room_id}"))
}

fn item_not_found(room_id: &str, index: usize) -> BoqError {
    BoqError::not_found(format!("Item {index} in room {room_id}"))
}

fn numeric_value(input: &NumericInput, field: &'static str) -> Result<f64, BoqError> {
    match input {
        NumericInput::Number(n) => Ok(*n),
        NumericInput::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| BoqError::invalid_value(field, format!("'{}' is not a number", text.trim()))),
    }
}

/// Non-negative whole number that fits a `u32`
pub fn coerce_quantity(input: &NumericInput) -> Result<u32, BoqError> {
    let value = numeric_value(input, "quantity")?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(BoqError::invalid_value(
            "quantity",
            "must be a non-negative whole number",
        ));
    }
    Ok(value as u32)
}

/// Finite non-negative amount, still in the display currency
pub fn coerce_price(input: &NumericInput) -> Result<f64, BoqError> {
    let value = numeric_value(input, "unitPrice")?;
    validate_unit_price(value)?;
    Ok(value)
}

/// Largest budget accepted, in USD
pub const MAX_BUDGET: f64 = 1_000_000_000_000.0;

/// Checks the fields that feed the generation prompt
pub fn validate_client_details(details: &ClientDetails) -> Result<(), BoqError> {
    if let Some(budget) = details.budget {
        if !budget.is_finite() || !(0.0..=MAX_BUDGET).contains(&budget) {
            return Err(BoqError::invalid_value(
                "budget",
                "must be a non-negative number no larger than 1,000,000,000,000",
            ));
        }
    }
    Ok(())
}

fn validate_rooms(rooms: &[Room]) -> Result<(), BoqError> {
    let mut seen = HashSet::new();
    for room in rooms {
        if room.id.trim().is_empty() {
            return Err(BoqError::invalid_value("id", "room id cannot be empty"));
        }
        if !seen.insert(room.id.as_str()) {
            return Err(BoqError::invalid_value(
                "id",
                format!("room id '{}' appears more than once", room.id),
            ));
        }
        if room.name.trim().is_empty() {
            return Err(BoqError::invalid_value("name", "room name cannot be empty"));
        }
        for item in &room.boq {
            validate_unit_price(item.unit_price)?;
        }
    }
    Ok(())
}

fn validate_unit_price(value: f64) -> Result<(), BoqError> {
    if !value.is_finite() || value < 0.0 {
        return Err(BoqError::invalid_value(
            "unitPrice",
            "must be a non-negative number",
        ));
    }
    Ok(())
}
