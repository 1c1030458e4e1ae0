//! Appointment booking selector
//!
//! Holds the pending choice of service, date and time slot. Confirming
//! resolves the price from the slot table and assigns a veterinarian at
//! random. Nothing leaves memory.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{AppointmentType, Catalog, TimeSlot};

use super::random::{pick, Chooser};

/// A confirmed booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub date: NaiveDate,
    pub time: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub price: u32,
    pub veterinarian: String,
}

/// Price panel for the selected slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub original_price: u32,
    pub price: u32,
    pub discount_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingState {
    Editing,
    Confirmed(Appointment),
}

/// The user's in-progress choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub type_id: String,
    pub date: NaiveDate,
    pub time: Option<String>,
}

pub struct BookingSelector {
    catalog: Arc<Catalog>,
    chooser: Box<dyn Chooser>,
    selection: Selection,
    state: BookingState,
    earliest: NaiveDate,
}

impl BookingSelector {
    pub fn new(catalog: Arc<Catalog>, chooser: Box<dyn Chooser>) -> Self {
        Self::starting_on(catalog, chooser, Utc::now().date_naive())
    }

    /// Open the view with `today` preselected; earlier dates can't be picked
    pub fn starting_on(catalog: Arc<Catalog>, chooser: Box<dyn Chooser>, today: NaiveDate) -> Self {
        let selection = Selection {
            type_id: catalog.booking.default_type.clone(),
            date: today,
            time: None,
        };
        Self {
            catalog,
            chooser,
            selection,
            state: BookingState::Editing,
            earliest: today,
        }
    }

    pub fn types(&self) -> &[AppointmentType] {
        &self.catalog.booking.appointment_types
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.catalog.booking.time_slots
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn state(&self) -> &BookingState {
        &self.state
    }

    pub fn appointment(&self) -> Option<&Appointment> {
        match &self.state {
            BookingState::Confirmed(appointment) => Some(appointment),
            BookingState::Editing => None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self.state, BookingState::Confirmed(_))
    }

    /// Unknown ids are ignored
    pub fn select_type(&mut self, id: &str) {
        if self.is_confirmed() || !self.types().iter().any(|t| t.id == id) {
            return;
        }
        self.selection.type_id = id.to_string();
    }

    /// Dates before the day the view opened are ignored
    pub fn select_date(&mut self, date: NaiveDate) {
        if self.is_confirmed() {
            return;
        }
        if date < self.earliest {
            tracing::debug!(%date, earliest = %self.earliest, "Ignoring past date");
            return;
        }
        self.selection.date = date;
    }

    /// Replace the pending slot; unavailable or unknown slots are ignored
    pub fn select_time(&mut self, time: &str) {
        if self.is_confirmed() {
            return;
        }
        let chosen = match self.slot(time) {
            Some(slot) if slot.available => slot.time.clone(),
            Some(_) => {
                tracing::debug!(time, "Ignoring unavailable slot");
                return;
            }
            None => {
                tracing::debug!(time, "Ignoring unknown slot");
                return;
            }
        };
        self.selection.time = Some(chosen);
    }

    /// Price breakdown for the selected slot
    pub fn quote(&self) -> Option<Quote> {
        let slot = self.slot(self.selection.time.as_deref()?)?;
        Some(Quote {
            original_price: slot.original_price,
            price: slot.price,
            discount_percent: slot.discount_percent(),
        })
    }

    /// Book the pending selection
    ///
    /// Does nothing without a selected time or while a booking is already
    /// shown.
    pub fn confirm(&mut self) -> Option<&Appointment> {
        if self.is_confirmed() {
            return None;
        }
        let catalog = &self.catalog.booking;
        let time = self.selection.time.as_deref()?;
        let slot = catalog.time_slots.iter().find(|slot| slot.time == time)?;
        let kind = catalog
            .appointment_types
            .iter()
            .find(|t| t.id == self.selection.type_id)?;
        let veterinarian = pick(self.chooser.as_mut(), &catalog.veterinarians)?;

        let appointment = Appointment {
            date: self.selection.date,
            time: slot.time.clone(),
            type_name: kind.name.clone(),
            price: slot.price,
            veterinarian: veterinarian.clone(),
        };
        tracing::info!(
            date = %appointment.date,
            time = %appointment.time,
            kind = %appointment.type_name,
            price = appointment.price,
            veterinarian = %appointment.veterinarian,
            "Appointment confirmed"
        );

        self.state = BookingState::Confirmed(appointment);
        self.appointment()
    }

    /// Close the confirmation and go back to editing the same selection
    pub fn dismiss(&mut self) {
        self.state = BookingState::Editing;
    }

    fn slot(&self, time: &str) -> Option<&TimeSlot> {
        self.slots().iter().find(|slot| slot.time == time)
    }
}
