//! Crest demo walkthrough
//!
//! Visits every view of the demo the way a prospective customer would and
//! logs what each simulated interaction produces.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crest::core::{PhotoUpload, TrialField, TrialStep};
use crest::{App, Config, View};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crest=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let catalog = config.load_catalog()?;
    let timings = config.timings;

    let mut app = App::new(&config, catalog);

    // Home: savings slider
    if let Some(calculator) = app.home_mut() {
        calculator.set_vet_price(300);
        tracing::info!(
            vet_price = calculator.vet_price(),
            crest_price = calculator.crest_price(),
            savings_percent = calculator.savings_percent(),
            "🐾 Savings estimate"
        );
    }

    // Chat: one question, one photo
    app.navigate(View::Chat);
    if let Some(chat) = app.chat_mut() {
        let mut updates = chat.subscribe();
        chat.submit("My dog keeps scratching his ear");
        chat.submit_photo(Some(PhotoUpload::new("rex-teeth.jpg").with_content_type("image/jpeg")));

        while updates.changed().await.is_ok() {
            if !updates.borrow_and_update().is_composing() {
                break;
            }
        }

        for message in chat.messages() {
            tracing::info!(id = %message.id, role = ?message.role, "{}", message.content);
        }
    }

    // Booking: wellness exam at 2 PM
    app.navigate(View::Booking);
    if let Some(booking) = app.booking_mut() {
        booking.select_type("wellness");
        booking.select_time("2:00 PM");
        if let Some(quote) = booking.quote() {
            tracing::info!(
                original = quote.original_price,
                price = quote.price,
                discount = quote.discount_percent,
                "Slot quote"
            );
        }
        if let Some(appointment) = booking.confirm() {
            tracing::info!("📅 Booked: {}", serde_json::to_string(appointment)?);
        }
    }

    // Trial signup
    app.navigate(View::Trial);
    if let Some(wizard) = app.trial_mut() {
        wizard.set_field(TrialField::FirstName, "Jamie");
        wizard.set_field(TrialField::LastName, "Rivera");
        wizard.set_field(TrialField::Email, "jamie@example.com");
        wizard.advance();
        wizard.set_field(TrialField::PetName, "Biscuit");

        let mut updates = wizard.subscribe();
        if wizard.advance() == TrialStep::Submitting {
            tracing::info!(delay = ?timings.trial_submit_delay, "Setting up trial...");
            while updates.changed().await.is_ok() {
                if updates.borrow_and_update().step == TrialStep::Done {
                    break;
                }
            }
        }
        if let Some(welcome) = wizard.snapshot().welcome() {
            tracing::info!("🎉 {}", welcome);
        }
    }

    // Dashboard
    app.navigate(View::Dashboard);
    if let Some(dashboard) = app.dashboard() {
        tracing::info!(
            total = dashboard.total_savings,
            this_month = dashboard.month_savings,
            "Savings so far"
        );
        if let Some(next) = dashboard.next_appointment() {
            tracing::info!(date = %next.date, time = %next.time, vet = %next.vet, "Next appointment: {}", next.kind);
        }
    }

    tracing::info!(session_id = %app.session_id(), "🔥 Walkthrough complete");
    Ok(())
}
