mod cli;
mod services;

use anyhow::Context;
use clap::Parser;
use events_commands::{
    CreateEventCommand, CreateVenueCommand, DeleteEventCommand,
    InvalidateEventCommand, ReleaseTicketsCommand, ReserveTicketsCommand,
    UpdateEventCommand,
};
use events_models::{NewEvent, NewVenue, UpdateEvent};
use events_queries::{
    EventsByCategoryQuery, GetAllEventsQuery, GetEventQuery, GetVenueQuery,
    OngoingEventsQuery, SearchEventsQuery, UpcomingEventsQuery,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    cli::{Cli, Commands},
    services::EventServices,
};

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse<T: serde::de::DeserializeOwned>(json: &str) -> anyhow::Result<T> {
    serde_json::from_str(json).context("malformed JSON document")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let services = EventServices::connect(&cli.connect, &cli.cache).await?;
    info!("services ready");

    match cli.command {
        Commands::Get { id } => {
            print(&services.get_event.execute(GetEventQuery { event_id: id }).await?)
        }
        Commands::Venue { id } => {
            print(&services.get_venue.execute(GetVenueQuery { venue_id: id }).await?)
        }
        Commands::Search(args) => {
            let query = SearchEventsQuery {
                query: args.query,
                category: args.category,
                city: args.city,
                start_date: args.start_date,
                end_date: args.end_date,
            };
            print(&services.search.execute(query).await?)
        }
        Commands::Category { name } => print(
            &services
                .by_category
                .execute(EventsByCategoryQuery { category: name })
                .await?,
        ),
        Commands::Upcoming { after } => print(
            &services
                .upcoming
                .execute(UpcomingEventsQuery { after })
                .await?,
        ),
        Commands::Ongoing { at } => {
            print(&services.ongoing.execute(OngoingEventsQuery { at }).await?)
        }
        Commands::All => print(&services.all.execute(GetAllEventsQuery).await?),
        Commands::Create { json } => {
            let event: NewEvent = parse(&json)?;
            print(
                &services
                    .create_event
                    .execute(CreateEventCommand::from(event))
                    .await?,
            )
        }
        Commands::Update { id, json } => {
            let changes: UpdateEvent = parse(&json)?;
            let command = UpdateEventCommand {
                event_id: id,
                changes,
            };
            print(&services.update_event.execute(command).await?)
        }
        Commands::Delete { id } => {
            services
                .delete_event
                .execute(DeleteEventCommand { event_id: id })
                .await?;
            print(&serde_json::json!({ "deleted": id }))
        }
        Commands::Invalidate { id } => {
            services
                .invalidate_event
                .execute(InvalidateEventCommand { event_id: id })
                .await;
            print(&serde_json::json!({ "invalidated": id }))
        }
        Commands::Reserve { id, quantity } => {
            let command = ReserveTicketsCommand {
                event_id: id,
                quantity,
            };
            print(&services.reserve.execute(command).await?)
        }
        Commands::Release { id, quantity } => {
            let command = ReleaseTicketsCommand {
                event_id: id,
                quantity,
            };
            print(&services.release.execute(command).await?)
        }
        Commands::CreateVenue { json } => {
            let venue: NewVenue = parse(&json)?;
            print(
                &services
                    .create_venue
                    .execute(CreateVenueCommand { venue })
                    .await?,
            )
        }
    }
}
