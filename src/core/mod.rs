//! Core interaction simulators
//!
//! One controller per view, plus the shared timer and randomness plumbing
//! they are built on.

mod booking;
mod chat;
mod dashboard;
mod photo;
pub mod pricing;
pub mod random;
mod scheduler;
mod trial;

pub use booking::{Appointment, BookingSelector, BookingState, Quote, Selection};
pub use chat::{ChatSession, ChatState};
pub use dashboard::{Dashboard, InsightCard, UpcomingCard};
pub use photo::PhotoUpload;
pub use pricing::SavingsCalculator;
pub use random::{Chooser, RandomChooser, ScriptedChooser};
pub use scheduler::Scheduler;
pub use trial::{
    transition, PetType, TrialEvent, TrialField, TrialForm, TrialState, TrialStep, TrialWizard,
};
