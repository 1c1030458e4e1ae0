//! Crest - pet telehealth demo simulator
//!
//! Drives the interactive parts of the Crest demo without any backend:
//! Dr. Paw's canned chat, the fake photo analyzer, the booking selector and
//! the free-trial signup wizard. Every "network call" is a fixed delay that is
//! cancelled when its view is torn down.

pub mod app;
pub mod config;
pub mod conversation;
pub mod core;

pub use app::{App, Screen, View};
pub use config::{Catalog, Config, ConfigError, Timings};
