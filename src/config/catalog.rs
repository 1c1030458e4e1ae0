//! Static catalog loaded from TOML files
//!
//! Everything the simulators draw from lives here:
//! - Dr. Paw's greeting, canned replies and quick-reply sets
//! - Photo analysis messages
//! - Appointment types, time slots and veterinarians
//! - Dashboard sample data
//!
//! Every section falls back to the built-in values when omitted.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::core::pricing;

/// Root catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub chat: ChatCatalog,

    #[serde(default)]
    pub photo: PhotoCatalog,

    #[serde(default)]
    pub booking: BookingCatalog,

    #[serde(default)]
    pub dashboard: DashboardCatalog,
}

impl Catalog {
    /// Load a catalog from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a catalog from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chat.replies.is_empty() {
            return Err(ConfigError::Validation("chat.replies must not be empty".into()));
        }
        if self.chat.quick_reply_sets.is_empty() {
            return Err(ConfigError::Validation(
                "chat.quick_reply_sets must not be empty".into(),
            ));
        }
        if let Some(bad) = self
            .chat
            .quick_reply_sets
            .iter()
            .find(|set| set.len() != QUICK_REPLY_SET_LEN)
        {
            return Err(ConfigError::Validation(format!(
                "quick reply sets hold exactly {} entries, got {:?}",
                QUICK_REPLY_SET_LEN, bad
            )));
        }

        let booking = &self.booking;
        if booking.veterinarians.is_empty() {
            return Err(ConfigError::Validation(
                "booking.veterinarians must not be empty".into(),
            ));
        }

        let mut ids = HashSet::new();
        for kind in &booking.appointment_types {
            if !ids.insert(kind.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate appointment type '{}'",
                    kind.id
                )));
            }
        }
        if !ids.contains(booking.default_type.as_str()) {
            return Err(ConfigError::Validation(format!(
                "default appointment type '{}' is not in the catalog",
                booking.default_type
            )));
        }

        let mut labels = HashSet::new();
        for slot in &booking.time_slots {
            if !labels.insert(slot.time.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate time slot '{}'",
                    slot.time
                )));
            }
            if slot.original_price == 0 || slot.price > slot.original_price {
                return Err(ConfigError::Validation(format!(
                    "time slot '{}' must be discounted from a non-zero original price",
                    slot.time
                )));
            }
        }

        Ok(())
    }
}

/// Dr. Paw always offers three suggestions at a time
pub const QUICK_REPLY_SET_LEN: usize = 3;

/// Chat simulator content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatCatalog {
    /// Opening message of every conversation
    pub greeting: String,

    /// Suggestions attached to the greeting
    pub greeting_quick_replies: Vec<String>,

    /// Canned replies, one picked at random per user message
    pub replies: Vec<String>,

    /// Quick-reply triples, one picked at random per reply
    pub quick_reply_sets: Vec<Vec<String>>,
}

impl Default for ChatCatalog {
    fn default() -> Self {
        Self {
            greeting: "Hi there! I'm Dr. Paw, your AI vet assistant! 🐾 I'm here to help with any pet health questions. Feel free to share a photo or tell me what's going on with your furry friend!".into(),
            greeting_quick_replies: strings(&[
                "Upload a photo",
                "My pet is acting strange",
                "General checkup question",
            ]),
            replies: strings(&[
                "Based on what you're describing, I'd recommend a quick check-up. Let me analyze this further! 🔍",
                "That sounds concerning but treatable! I've seen similar cases before. Here's what I suggest... 💡",
                "Great question! This is actually quite common in pets. Let me break it down for you... 📚",
                "I'd love to help! Could you share a photo so I can get a better look? My ToothScan™ and PoopScan™ tech can provide instant insights! 📸",
                "Your pet's symptoms suggest we should book a vet visit. I can help you find the best price - up to 80% savings! 💰",
            ]),
            quick_reply_sets: vec![
                strings(&["Book appointment", "Tell me more", "Upload photo"]),
                strings(&["What's the cost?", "Is it urgent?", "Home remedies?"]),
                strings(&["Find nearby vet", "Schedule follow-up", "Get second opinion"]),
            ],
        }
    }
}

/// Photo analysis simulator content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoCatalog {
    pub analyzing: String,
    pub result: String,
    pub quick_replies: Vec<String>,
}

impl Default for PhotoCatalog {
    fn default() -> Self {
        Self {
            analyzing: "📸 Analyzing your pet's photo with ToothScan™ technology...".into(),
            result: "✅ Analysis complete! Your pet's teeth look healthy overall, but I notice some tartar buildup. I recommend a dental cleaning within the next 2-3 months. Would you like me to book an appointment?".into(),
            quick_replies: strings(&["Book dental cleaning", "Cost estimate", "Prevention tips"]),
        }
    }
}

/// A bookable service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentType {
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_price: u32,
}

impl AppointmentType {
    /// Advertised "From $X" price
    pub fn starting_price(&self) -> u32 {
        pricing::crest_price(self.base_price)
    }
}

/// A bookable time of day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub time: String,
    pub available: bool,
    pub price: u32,
    pub original_price: u32,
}

impl TimeSlot {
    pub fn discount_percent(&self) -> u32 {
        pricing::discount_percent(self.original_price, self.price)
    }
}

/// Booking selector content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingCatalog {
    /// Type selected when the booking view opens
    pub default_type: String,
    pub appointment_types: Vec<AppointmentType>,
    pub time_slots: Vec<TimeSlot>,
    pub veterinarians: Vec<String>,
}

impl Default for BookingCatalog {
    fn default() -> Self {
        let kind = |id: &str, name: &str, description: &str, base_price| AppointmentType {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            base_price,
        };
        let slot = |time: &str, available, price| TimeSlot {
            time: time.into(),
            available,
            price,
            original_price: 250,
        };

        Self {
            default_type: "wellness".into(),
            appointment_types: vec![
                kind("wellness", "Wellness Exam", "Complete health checkup for your pet", 250),
                kind(
                    "dental",
                    "Dental Cleaning",
                    "Professional teeth cleaning and oral health check",
                    400,
                ),
                kind("urgent", "Urgent Care", "Same-day care for non-emergency issues", 180),
            ],
            time_slots: vec![
                slot("9:00 AM", true, 49),
                slot("10:30 AM", true, 52),
                slot("12:00 PM", false, 49),
                slot("2:00 PM", true, 45),
                slot("3:30 PM", true, 49),
                slot("5:00 PM", true, 55),
            ],
            veterinarians: strings(&[
                "Dr. Sarah Mitchell",
                "Dr. James Rodriguez",
                "Dr. Emily Chen",
                "Dr. Michael Johnson",
            ]),
        }
    }
}

/// An appointment already on the books, shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingAppointment {
    #[serde(rename = "type")]
    pub kind: String,
    pub date: chrono::NaiveDate,
    pub time: String,
    pub vet: String,
    pub price: u32,
    pub original_price: u32,
}

impl UpcomingAppointment {
    pub fn discount_percent(&self) -> u32 {
        pricing::discount_percent(self.original_price, self.price)
    }
}

/// A past scan result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthInsight {
    pub date: chrono::NaiveDate,
    #[serde(rename = "type")]
    pub kind: String,
    pub result: String,
    pub confidence: u8,
}

/// Dashboard sample data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardCatalog {
    pub upcoming: Vec<UpcomingAppointment>,
    pub insights: Vec<HealthInsight>,
    pub total_savings: u32,
    pub month_savings: u32,
}

impl Default for DashboardCatalog {
    fn default() -> Self {
        let date = |y, m, d| chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
        let insight = |on, kind: &str, result: &str, confidence| HealthInsight {
            date: on,
            kind: kind.into(),
            result: result.into(),
            confidence,
        };

        Self {
            upcoming: vec![
                UpcomingAppointment {
                    kind: "Wellness Exam".into(),
                    date: date(2025, 1, 15),
                    time: "2:00 PM".into(),
                    vet: "Dr. Sarah Mitchell".into(),
                    price: 49,
                    original_price: 250,
                },
                UpcomingAppointment {
                    kind: "Dental Cleaning".into(),
                    date: date(2025, 2, 1),
                    time: "10:30 AM".into(),
                    vet: "Dr. James Rodriguez".into(),
                    price: 85,
                    original_price: 400,
                },
            ],
            insights: vec![
                insight(date(2025, 1, 2), "ToothScan™", "Good oral health detected", 92),
                insight(date(2024, 12, 28), "PoopScan™", "Normal digestive health", 88),
                insight(date(2024, 12, 15), "General Health", "Active and healthy", 95),
            ],
            total_savings: 516,
            month_savings: 201,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CATALOG: &str = r#"
[chat]
replies = ["Woof!", "Meow?"]
quick_reply_sets = [["a", "b", "c"]]

[booking]
default_type = "grooming"
veterinarians = ["Dr. Doolittle"]

[[booking.appointment_types]]
id = "grooming"
name = "Grooming"
description = "Bath and trim"
base_price = 90

[[booking.time_slots]]
time = "8:00 AM"
available = true
price = 30
original_price = 90
"#;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::default();
        tokio_test::assert_ok!(catalog.validate());
        assert_eq!(catalog.chat.replies.len(), 5);
        assert_eq!(catalog.chat.quick_reply_sets.len(), 3);
        assert_eq!(catalog.booking.time_slots.len(), 6);
        assert_eq!(catalog.booking.veterinarians.len(), 4);
    }

    #[test]
    fn test_builtin_slot_discounts() {
        let discounts: Vec<u32> = Catalog::default()
            .booking
            .time_slots
            .iter()
            .map(TimeSlot::discount_percent)
            .collect();
        assert_eq!(discounts, vec![80, 79, 80, 82, 80, 78]);
    }

    #[test]
    fn test_starting_prices() {
        let prices: Vec<u32> = Catalog::default()
            .booking
            .appointment_types
            .iter()
            .map(AppointmentType::starting_price)
            .collect();
        assert_eq!(prices, vec![50, 80, 36]);
    }

    #[test]
    fn test_parse_partial_catalog() {
        let catalog = Catalog::from_str(SAMPLE_CATALOG).unwrap();

        assert_eq!(catalog.chat.replies, vec!["Woof!", "Meow?"]);
        // Unspecified fields inside a present section keep the defaults
        assert!(catalog.chat.greeting.starts_with("Hi there!"));
        assert_eq!(catalog.booking.default_type, "grooming");
        assert_eq!(catalog.booking.time_slots[0].discount_percent(), 67);
        // Missing sections fall back entirely
        assert_eq!(catalog.photo.quick_replies.len(), 3);
        assert_eq!(catalog.dashboard.total_savings, 516);
    }

    #[test]
    fn test_empty_document_is_builtin() {
        let catalog = Catalog::from_str("").unwrap();
        assert_eq!(catalog.booking.default_type, "wellness");
    }

    #[test]
    fn test_rejects_empty_replies() {
        let err = Catalog::from_str("[chat]\nreplies = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_short_quick_reply_set() {
        let err = Catalog::from_str("[chat]\nquick_reply_sets = [[\"only one\"]]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_unknown_default_type() {
        let err = Catalog::from_str("[booking]\ndefault_type = \"spa\"\n").unwrap_err();
        assert!(err.to_string().contains("spa"));
    }

    #[test]
    fn test_rejects_markup_slot() {
        let toml = r#"
[[booking.time_slots]]
time = "1:00 PM"
available = true
price = 300
original_price = 250
"#;
        let err = Catalog::from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = Catalog::from_str("[chat\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Catalog::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
