//! Discount arithmetic and the home-page savings calculator

use serde::{Deserialize, Serialize};

/// Crest charges a fifth of the typical clinic price
const CREST_PRICE_RATIO: f64 = 0.2;

/// Bounds of the "typical vet visit" slider
pub const MIN_VET_PRICE: u32 = 100;
pub const MAX_VET_PRICE: u32 = 500;
pub const DEFAULT_VET_PRICE: u32 = 250;

/// `round((original - price) / original * 100)`, zero for a free or marked-up item
pub fn discount_percent(original_price: u32, price: u32) -> u32 {
    if original_price == 0 {
        return 0;
    }
    let saved = original_price.saturating_sub(price) as f64;
    (saved / original_price as f64 * 100.0).round() as u32
}

/// Crest's price for a visit that would cost `vet_price` at a clinic
pub fn crest_price(vet_price: u32) -> u32 {
    (vet_price as f64 * CREST_PRICE_RATIO).round() as u32
}

/// The comparison slider on the home view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsCalculator {
    vet_price: u32,
}

impl SavingsCalculator {
    pub fn new() -> Self {
        Self {
            vet_price: DEFAULT_VET_PRICE,
        }
    }

    /// Move the slider; values outside the range are clamped
    pub fn set_vet_price(&mut self, vet_price: u32) {
        self.vet_price = vet_price.clamp(MIN_VET_PRICE, MAX_VET_PRICE);
    }

    pub fn vet_price(&self) -> u32 {
        self.vet_price
    }

    pub fn crest_price(&self) -> u32 {
        crest_price(self.vet_price)
    }

    pub fn savings_amount(&self) -> u32 {
        self.vet_price - self.crest_price()
    }

    pub fn savings_percent(&self) -> u32 {
        discount_percent(self.vet_price, self.crest_price())
    }
}

impl Default for SavingsCalculator {
    fn default() -> Self {
        Self::new()
    }
}
