//! Free-trial signup wizard
//!
//! A linear state machine with guarded transitions:
//!
//! ```text
//! CollectingIdentity --Continue--> CollectingPet --Continue--> Submitting --(delay)--> Done
//!                    <---Back-----
//! ```
//!
//! Transitions are computed by the pure [`transition`] function; the
//! [`TrialWizard`] applies them and owns the simulated submit latency.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::Timings;

use super::scheduler::Scheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialStep {
    CollectingIdentity,
    CollectingPet,
    /// Continue is disabled while the fake signup call is in flight
    Submitting,
    Done,
}

impl TrialStep {
    /// Position in the three-step progress bar
    pub fn progress(self) -> u8 {
        match self {
            TrialStep::CollectingIdentity => 1,
            TrialStep::CollectingPet | TrialStep::Submitting => 2,
            TrialStep::Done => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetType {
    Dog,
    Cat,
    Bird,
    Rabbit,
    Other,
}

impl PetType {
    pub const ALL: [PetType; 5] = [
        PetType::Dog,
        PetType::Cat,
        PetType::Bird,
        PetType::Rabbit,
        PetType::Other,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PetType::Dog => "dog",
            PetType::Cat => "cat",
            PetType::Bird => "bird",
            PetType::Rabbit => "rabbit",
            PetType::Other => "other",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PetType::Dog => "Dog",
            PetType::Cat => "Cat",
            PetType::Bird => "Bird",
            PetType::Rabbit => "Rabbit",
            PetType::Other => "Other",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            PetType::Dog => "🐕",
            PetType::Cat => "🐱",
            PetType::Bird => "🐦",
            PetType::Rabbit => "🐰",
            PetType::Other => "🐾",
        }
    }
}

impl fmt::Display for PetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PetType::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown pet type: {}", s))
    }
}

/// Free-text fields of the signup form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialField {
    FirstName,
    LastName,
    Email,
    Phone,
    PetName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub pet_name: String,
    pub pet_type: Option<PetType>,
}

impl Default for TrialForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            pet_name: String::new(),
            pet_type: Some(PetType::Dog),
        }
    }
}

impl TrialForm {
    /// First name, last name and email are filled in; phone is optional
    pub fn identity_complete(&self) -> bool {
        !self.first_name.is_empty() && !self.last_name.is_empty() && !self.email.is_empty()
    }

    pub fn pet_complete(&self) -> bool {
        !self.pet_name.is_empty() && self.pet_type.is_some()
    }

    fn field_mut(&mut self, field: TrialField) -> &mut String {
        match field {
            TrialField::FirstName => &mut self.first_name,
            TrialField::LastName => &mut self.last_name,
            TrialField::Email => &mut self.email,
            TrialField::Phone => &mut self.phone,
            TrialField::PetName => &mut self.pet_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialEvent {
    Continue,
    Back,
    SubmissionComplete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialState {
    pub step: TrialStep,
    pub form: TrialForm,
}

impl TrialState {
    /// Whether the step's continue control is enabled
    pub fn can_continue(&self) -> bool {
        match self.step {
            TrialStep::CollectingIdentity => self.form.identity_complete(),
            TrialStep::CollectingPet => self.form.pet_complete(),
            TrialStep::Submitting | TrialStep::Done => false,
        }
    }

    fn accepts_edits(&self) -> bool {
        matches!(
            self.step,
            TrialStep::CollectingIdentity | TrialStep::CollectingPet
        )
    }

    /// Message shown on the final step
    pub fn welcome(&self) -> Option<String> {
        (self.step == TrialStep::Done)
            .then(|| format!("Your free trial is ready, {}!", self.form.first_name))
    }
}

/// Next step for `event`, or `None` when the event is not allowed
pub fn transition(state: &TrialState, event: TrialEvent) -> Option<TrialStep> {
    match (state.step, event) {
        (TrialStep::CollectingIdentity, TrialEvent::Continue) if state.can_continue() => {
            Some(TrialStep::CollectingPet)
        }
        (TrialStep::CollectingPet, TrialEvent::Continue) if state.can_continue() => {
            Some(TrialStep::Submitting)
        }
        (TrialStep::CollectingPet, TrialEvent::Back) => Some(TrialStep::CollectingIdentity),
        (TrialStep::Submitting, TrialEvent::SubmissionComplete) => Some(TrialStep::Done),
        _ => None,
    }
}

/// Controller of one mounted trial view
pub struct TrialWizard {
    state: Arc<watch::Sender<TrialState>>,
    timings: Timings,
    scheduler: Scheduler,
}

impl TrialWizard {
    pub fn new(timings: Timings) -> Self {
        let (state, _) = watch::channel(TrialState {
            step: TrialStep::CollectingIdentity,
            form: TrialForm::default(),
        });
        Self {
            state: Arc::new(state),
            timings,
            scheduler: Scheduler::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TrialState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> TrialState {
        self.state.borrow().clone()
    }

    pub fn step(&self) -> TrialStep {
        self.state.borrow().step
    }

    pub fn form(&self) -> TrialForm {
        self.state.borrow().form.clone()
    }

    pub fn can_continue(&self) -> bool {
        self.state.borrow().can_continue()
    }

    pub fn set_field(&mut self, field: TrialField, value: impl Into<String>) {
        let value = value.into();
        self.edit(|form| *form.field_mut(field) = value);
    }

    pub fn select_pet_type(&mut self, pet_type: PetType) {
        self.edit(|form| form.pet_type = Some(pet_type));
    }

    pub fn clear_pet_type(&mut self) {
        self.edit(|form| form.pet_type = None);
    }

    /// Press Continue; returns the step the wizard is now in
    ///
    /// From the pet step this starts the simulated submission, which lands
    /// in `Done` after the submit delay.
    pub fn advance(&mut self) -> TrialStep {
        let Some(next) = self.apply(TrialEvent::Continue) else {
            return self.step();
        };

        if next == TrialStep::Submitting {
            let state = self.state.clone();
            self.scheduler.after(self.timings.trial_submit_delay, move || {
                let mut finished = false;
                state.send_if_modified(|current| {
                    match transition(current, TrialEvent::SubmissionComplete) {
                        Some(step) => {
                            current.step = step;
                            finished = true;
                            true
                        }
                        None => false,
                    }
                });
                if finished {
                    tracing::info!("Trial signup complete");
                }
            });
        }
        next
    }

    /// Press Back; only the pet step goes back, keeping every field
    pub fn back(&mut self) -> TrialStep {
        self.apply(TrialEvent::Back).unwrap_or_else(|| self.step())
    }

    pub fn teardown(&self) {
        self.scheduler.shutdown();
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    fn apply(&mut self, event: TrialEvent) -> Option<TrialStep> {
        if self.scheduler.is_shut_down() {
            return None;
        }

        let mut moved = None;
        self.state.send_if_modified(|current| {
            let next = transition(current, event);
            if let Some(step) = next {
                tracing::debug!(from = ?current.step, to = ?step, ?event, "Trial wizard transition");
                current.step = step;
            }
            moved = next;
            next.is_some()
        });
        moved
    }

    fn edit(&mut self, change: impl FnOnce(&mut TrialForm)) {
        if self.scheduler.is_shut_down() {
            return;
        }
        self.state.send_if_modified(|current| {
            if !current.accepts_edits() {
                return false;
            }
            change(&mut current.form);
            true
        });
    }
}

impl Drop for TrialWizard {
    fn drop(&mut self) {
        self.scheduler.shutdown();
    }
}
