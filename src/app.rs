//! In-memory navigation between the demo's views
//!
//! Exactly one view is mounted at a time. Navigating away tears the current
//! controller down, cancelling whatever simulated work it still had queued.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{Catalog, Config, Timings};
use crate::core::{
    BookingSelector, ChatSession, Dashboard, RandomChooser, SavingsCalculator, TrialWizard,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Home,
    Chat,
    Booking,
    Trial,
    Dashboard,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Home,
        View::Chat,
        View::Booking,
        View::Trial,
        View::Dashboard,
    ];

    pub fn path(self) -> &'static str {
        match self {
            View::Home => "/",
            View::Chat => "/chat",
            View::Booking => "/booking",
            View::Trial => "/trial",
            View::Dashboard => "/dashboard",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        View::ALL.into_iter().find(|view| view.path() == path)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// The controller of the mounted view
pub enum Screen {
    Home(SavingsCalculator),
    Chat(ChatSession),
    Booking(BookingSelector),
    Trial(TrialWizard),
    Dashboard(Dashboard),
}

impl Screen {
    pub fn view(&self) -> View {
        match self {
            Screen::Home(_) => View::Home,
            Screen::Chat(_) => View::Chat,
            Screen::Booking(_) => View::Booking,
            Screen::Trial(_) => View::Trial,
            Screen::Dashboard(_) => View::Dashboard,
        }
    }

    fn teardown(&self) {
        match self {
            Screen::Chat(chat) => chat.teardown(),
            Screen::Trial(wizard) => wizard.teardown(),
            Screen::Home(_) | Screen::Booking(_) | Screen::Dashboard(_) => {}
        }
    }
}

pub struct App {
    session_id: Uuid,
    catalog: Arc<Catalog>,
    timings: Timings,
    rng: RandomChooser,
    screen: Screen,
}

impl App {
    /// Start on the home view
    pub fn new(config: &Config, catalog: Catalog) -> Self {
        let session_id = Uuid::new_v4();
        tracing::info!(%session_id, "Demo session started");

        Self {
            session_id,
            catalog: Arc::new(catalog),
            timings: config.timings,
            rng: RandomChooser::from_seed(config.rng_seed),
            screen: Screen::Home(SavingsCalculator::new()),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> View {
        self.screen.view()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Switch views; returns `false` when already there
    pub fn navigate(&mut self, view: View) -> bool {
        if self.view() == view {
            return false;
        }

        tracing::info!(from = %self.view(), to = %view, "Navigating");
        self.screen.teardown();
        self.screen = self.mount(view);
        true
    }

    /// Navigate by route path; unknown paths are ignored
    pub fn navigate_path(&mut self, path: &str) -> bool {
        match View::from_path(path) {
            Some(view) => self.navigate(view),
            None => {
                tracing::debug!(path, "Ignoring unknown route");
                false
            }
        }
    }

    pub fn home_mut(&mut self) -> Option<&mut SavingsCalculator> {
        match &mut self.screen {
            Screen::Home(calculator) => Some(calculator),
            _ => None,
        }
    }

    pub fn chat_mut(&mut self) -> Option<&mut ChatSession> {
        match &mut self.screen {
            Screen::Chat(chat) => Some(chat),
            _ => None,
        }
    }

    pub fn booking_mut(&mut self) -> Option<&mut BookingSelector> {
        match &mut self.screen {
            Screen::Booking(booking) => Some(booking),
            _ => None,
        }
    }

    pub fn trial_mut(&mut self) -> Option<&mut TrialWizard> {
        match &mut self.screen {
            Screen::Trial(wizard) => Some(wizard),
            _ => None,
        }
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        match &self.screen {
            Screen::Dashboard(dashboard) => Some(dashboard),
            _ => None,
        }
    }

    fn mount(&mut self, view: View) -> Screen {
        match view {
            View::Home => Screen::Home(SavingsCalculator::new()),
            View::Chat => Screen::Chat(ChatSession::new(
                self.catalog.clone(),
                self.timings,
                Box::new(self.rng.fork()),
            )),
            View::Booking => Screen::Booking(BookingSelector::new(
                self.catalog.clone(),
                Box::new(self.rng.fork()),
            )),
            View::Trial => Screen::Trial(TrialWizard::new(self.timings)),
            View::Dashboard => Screen::Dashboard(Dashboard::from_catalog(&self.catalog)),
        }
    }
}
