//! Behaviour-driven step definitions driving the trail CLI scenarios.

use super::helpers::{StubGeocoderBuilder, run_trail_argv};
use super::*;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sightline_core::test_support::StubGeocoder;
use sightline_core::{Coordinate, fallback_label};
use std::cell::RefCell;
use std::path::PathBuf;
use tempfile::TempDir;

const SIGHTINGS: [Coordinate; 3] = [
    Coordinate::new(-23.561_414, -46.655_881),
    Coordinate::new(-23.550_520, -46.633_308),
    Coordinate::new(-23.561_414, -46.655_881),
];

#[derive(Debug)]
struct TrailWorld {
    _tmp: TempDir,
    coords_path: PathBuf,
    builder: RefCell<Option<StubGeocoderBuilder>>,
    stdout: RefCell<String>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl TrailWorld {
    fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let coords_path = tmp.path().join("sightings.json");
        Self {
            _tmp: tmp,
            coords_path,
            builder: RefCell::new(None),
            stdout: RefCell::new(String::new()),
            result: RefCell::new(None),
        }
    }

    fn install(&self, stub: StubGeocoder) {
        self.builder.replace(Some(StubGeocoderBuilder::new(stub)));
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> TrailWorld {
    TrailWorld::new()
}

#[given("a provider that names every street {road}")]
fn provider_names_every_street(#[from(world)] world: &TrailWorld, road: String) {
    world.install(StubGeocoder::with_road(road.trim_matches('"')));
}

#[given("a provider that refuses connections")]
fn provider_refuses_connections(#[from(world)] world: &TrailWorld) {
    world.install(StubGeocoder::refusing());
}

#[given("the sightings file lists 3 coordinates with one repeat")]
fn sightings_file_lists_coordinates(#[from(world)] world: &TrailWorld) {
    let payload = serde_json::to_string(&SIGHTINGS).expect("serialise sightings");
    std::fs::write(&world.coords_path, payload).expect("write sightings");
}

#[given("the sightings file does not exist")]
fn sightings_file_missing(#[from(world)] world: &TrailWorld) {
    assert!(!world.coords_path.exists());
}

#[given("the sightings file contains invalid JSON")]
fn sightings_file_invalid(#[from(world)] world: &TrailWorld) {
    std::fs::write(&world.coords_path, b"[{ lat: oops").expect("write sightings");
}

#[when("I run the trail command")]
fn run_trail_command(#[from(world)] world: &TrailWorld) {
    let path = world.coords_path.display().to_string();
    let builder = world.builder.borrow();
    let builder = builder.as_ref().expect("provider installed");
    let (result, stdout) = run_trail_argv(
        &[
            "sightline",
            "trail",
            "--coords-file",
            &path,
            "--delay-ms",
            "0",
        ],
        builder,
    );
    world.stdout.replace(stdout);
    world.result.replace(Some(result));
}

#[then("the command succeeds and prints {count:usize} rows")]
fn command_succeeds_with_rows(#[from(world)] world: &TrailWorld, count: usize) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");

    let stdout = world.stdout.borrow();
    let numbered = stdout
        .lines()
        .filter(|line| line.split_once(". ").is_some_and(|(n, _)| n.parse::<usize>().is_ok()))
        .count();
    assert_eq!(numbered, count);
}

#[then("the provider was asked {count:usize} times")]
fn provider_asked(#[from(world)] world: &TrailWorld, count: usize) {
    let builder = world.builder.borrow();
    let builder = builder.as_ref().expect("provider installed");
    assert_eq!(builder.stub.call_count(), count);
}

#[then("every row shows its coordinates as the address")]
fn rows_show_coordinates(#[from(world)] world: &TrailWorld) {
    let stdout = world.stdout.borrow();
    for (index, (line, coordinate)) in stdout.lines().zip(SIGHTINGS).enumerate() {
        let label = fallback_label(coordinate);
        assert_eq!(line, format!("{}. {label} ({label})", index + 1));
    }
}

#[then("the command fails because the coordinates file cannot be read")]
fn command_fails_unreadable_file(#[from(world)] world: &TrailWorld) {
    match &*world.error() {
        CliError::ReadCoordinates { path, .. } => assert_eq!(*path, world.coords_path),
        other => panic!("expected ReadCoordinates, found {other:?}"),
    }
}

#[then("the command fails because the coordinates JSON is invalid")]
fn command_fails_invalid_json(#[from(world)] world: &TrailWorld) {
    match &*world.error() {
        CliError::ParseCoordinates { .. } => {}
        other => panic!("expected ParseCoordinates, found {other:?}"),
    }
}

macro_rules! register_trail_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/trail_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: TrailWorld) {
            let _ = world;
        }
    };
}

register_trail_scenario!(trail_happy_path, "printing a numbered trail");
register_trail_scenario!(trail_provider_down, "printing coordinates when the provider is down");
register_trail_scenario!(trail_missing_file, "rejecting a missing coordinates file");
register_trail_scenario!(trail_invalid_json, "rejecting invalid coordinates JSON");
