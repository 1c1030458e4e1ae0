//! Dashboard summary built from the static sample data

use serde::Serialize;

use crate::config::{Catalog, HealthInsight, UpcomingAppointment};

/// Insights at or above this confidence are highlighted
const HIGH_CONFIDENCE: u8 = 90;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingCard {
    #[serde(flatten)]
    pub appointment: UpcomingAppointment,
    pub discount_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightCard {
    #[serde(flatten)]
    pub insight: HealthInsight,
    pub high_confidence: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub upcoming: Vec<UpcomingCard>,
    pub insights: Vec<InsightCard>,
    pub total_savings: u32,
    pub month_savings: u32,
}

impl Dashboard {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let data = &catalog.dashboard;
        Self {
            upcoming: data
                .upcoming
                .iter()
                .map(|appointment| UpcomingCard {
                    discount_percent: appointment.discount_percent(),
                    appointment: appointment.clone(),
                })
                .collect(),
            insights: data
                .insights
                .iter()
                .map(|insight| InsightCard {
                    high_confidence: insight.confidence >= HIGH_CONFIDENCE,
                    insight: insight.clone(),
                })
                .collect(),
            total_savings: data.total_savings,
            month_savings: data.month_savings,
        }
    }

    /// The soonest upcoming appointment
    pub fn next_appointment(&self) -> Option<&UpcomingAppointment> {
        self.upcoming
            .iter()
            .map(|card| &card.appointment)
            .min_by_key(|appointment| appointment.date)
    }
}
