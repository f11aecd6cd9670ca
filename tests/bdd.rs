use std::{collections::HashSet, fmt, net::SocketAddr};

use anyhow::Context;
use chrono::NaiveDate;
use cucumber::{given, then, when, World as _};
use fernweh::{
    config::AppConfig,
    models::trip::{initial_trips, Trip, TripForm},
    services::storage::StorageService,
    state::AppState,
};
use tempfile::TempDir;

#[derive(Debug, cucumber::World, Default)]
struct AppWorld {
    state: Option<TestState>,
    last_rejection: Option<String>,
}

impl AppWorld {
    fn app_state(&self) -> &AppState {
        self.state
            .as_ref()
            .expect("state must be initialised first")
            .app()
    }
}

struct TestState {
    app: AppState,
    _root: TempDir,
}

impl fmt::Debug for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestState").finish()
    }
}

impl TestState {
    async fn new() -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for bdd world")?;
        let data_root = root.path().join("data");

        let config = AppConfig {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            data_root: data_root.clone(),
        };

        let storage = StorageService::new(config.data_root.clone());
        storage.ensure_structure().await?;

        let app = AppState::new(config, storage);
        Ok(Self { app, _root: root })
    }

    fn app(&self) -> &AppState {
        &self.app
    }

    /// Rebuilds the application state on the same data root, the way a
    /// process restart would.
    async fn restart(&mut self) -> anyhow::Result<()> {
        let config = self.app.config.clone();
        let storage = StorageService::new(config.data_root.clone());
        storage.ensure_structure().await?;
        self.app = AppState::new(config, storage);
        Ok(())
    }
}

#[given("a fresh application state")]
async fn given_fresh_state(world: &mut AppWorld) {
    world.state = Some(TestState::new().await.expect("state"));
    world.last_rejection = None;
}

#[given("the default trips are seeded")]
async fn seed_default_trips(world: &mut AppWorld) {
    let storage = world.app_state().storage.clone();
    storage
        .seed_if_missing(initial_trips())
        .await
        .expect("seed trips");
}

#[when(regex = r#"^I submit a trip to "([^"]+)" from "([^"]+)" to "([^"]+)"$"#)]
async fn when_submit_trip(world: &mut AppWorld, destination: String, start: String, end: String) {
    submit_trip(world, destination, start, end, None).await;
}

#[when(
    regex = r#"^I submit a trip to "([^"]+)" from "([^"]+)" to "([^"]+)" with notes "([^"]*)"$"#
)]
async fn when_submit_trip_with_notes(
    world: &mut AppWorld,
    destination: String,
    start: String,
    end: String,
    notes: String,
) {
    submit_trip(world, destination, start, end, Some(notes)).await;
}

#[when("the application is restarted")]
async fn when_restarted(world: &mut AppWorld) {
    world
        .state
        .as_mut()
        .expect("state must be initialised first")
        .restart()
        .await
        .expect("restart");
}

// Restart plus the seeding step main performs on startup.
#[when("the application is restarted with default seeding")]
async fn when_restarted_with_seeding(world: &mut AppWorld) {
    when_restarted(world).await;
    let storage = world.app_state().storage.clone();
    storage
        .seed_if_missing(initial_trips())
        .await
        .expect("seed trips");
}

#[then(regex = r"^the trip collection has (\d+) trips$")]
async fn then_collection_has(world: &mut AppWorld, expected: usize) {
    let trips = world.app_state().storage.list_trips().await;
    assert_eq!(trips.len(), expected);
}

#[then("no rejection is reported")]
async fn then_no_rejection(world: &mut AppWorld) {
    assert_eq!(world.last_rejection, None);
}

#[then(regex = r#"^the submission is rejected with "([^"]+)"$"#)]
async fn then_rejected_with(world: &mut AppWorld, message: String) {
    assert_eq!(world.last_rejection.as_deref(), Some(message.as_str()));
}

#[then(regex = r#"^the latest trip destination is "([^"]+)"$"#)]
async fn then_latest_destination(world: &mut AppWorld, destination: String) {
    let latest = latest_trip(world).await;
    assert_eq!(latest.destination, destination);
}

#[then(regex = r#"^the latest trip runs from "([^"]+)" to "([^"]+)"$"#)]
async fn then_latest_dates(world: &mut AppWorld, start: String, end: String) {
    let latest = latest_trip(world).await;
    assert_eq!(latest.start_date, parse_date(&start));
    assert_eq!(latest.end_date, parse_date(&end));
}

#[then("all stored trips have distinct ids")]
async fn then_distinct_ids(world: &mut AppWorld) {
    let trips = world.app_state().storage.list_trips().await;
    let ids: HashSet<&str> = trips.iter().map(|trip| trip.id.as_str()).collect();
    assert_eq!(ids.len(), trips.len());
}

async fn submit_trip(
    world: &mut AppWorld,
    destination: String,
    start: String,
    end: String,
    notes: Option<String>,
) {
    let form = TripForm {
        destination,
        start_date: start,
        end_date: end,
        image_url: None,
        packing_list: None,
        notes,
    };
    match form.validate() {
        Ok(fields) => {
            let storage = world.app_state().storage.clone();
            storage
                .append_trip(Trip::new(fields))
                .await
                .expect("append trip");
            world.last_rejection = None;
        }
        Err(err) => world.last_rejection = Some(err.to_string()),
    }
}

async fn latest_trip(world: &mut AppWorld) -> Trip {
    let trips = world.app_state().storage.list_trips().await;
    trips.last().cloned().expect("at least one trip expected")
}

fn parse_date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date in feature file")
}

#[tokio::main]
async fn main() {
    AppWorld::cucumber()
        .fail_on_skipped()
        .with_default_cli()
        .run("tests/features")
        .await;
}
