//! Behavioural tests for [`AddressResolver`].
//!
//! These tests use [`StubGeocoder`] to verify caching and fallback behaviour
//! without contacting a geocoding service.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sightline_core::test_support::StubGeocoder;
use sightline_core::{
    AddressComponents, AddressResolver, Coordinate, PlaceDetails, ResolvedAddresses,
    ResolverConfig,
};
use std::cell::RefCell;
use std::time::Duration;
use tokio::runtime::Builder;

type ResolverCell = RefCell<Option<AddressResolver<StubGeocoder>>>;

fn block_on<F>(future: F) -> F::Output
where
    F: std::future::Future,
{
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build Tokio runtime")
        .block_on(future)
}

#[fixture]
fn resolver() -> ResolverCell {
    RefCell::new(None)
}

#[fixture]
fn answers() -> RefCell<Vec<String>> {
    RefCell::new(Vec::new())
}

#[fixture]
fn batch() -> RefCell<Option<ResolvedAddresses>> {
    RefCell::new(None)
}

fn install(cell: &ResolverCell, stub: StubGeocoder) {
    let config = ResolverConfig::default().with_polite_delay(Duration::ZERO);
    *cell.borrow_mut() = Some(AddressResolver::with_config(stub, config));
}

/// Strip Gherkin quotes and expand `\n` escapes in step arguments.
fn unquote(text: &str) -> String {
    text.trim_matches('"').replace("\\n", "\n")
}

// --- Given steps ---

#[given("a geocoder returning a street address")]
fn street_address(#[from(resolver)] resolver: &ResolverCell) {
    install(
        resolver,
        StubGeocoder::with_place(PlaceDetails::with_address(AddressComponents {
            road: Some("Rua A".to_owned()),
            house_number: Some("10".to_owned()),
            neighbourhood: Some("Centro".to_owned()),
            postcode: Some("01000-000".to_owned()),
            city: Some("São Paulo".to_owned()),
            state: Some("SP".to_owned()),
            ..AddressComponents::default()
        })),
    );
}

#[given("a geocoder that refuses connections")]
fn refusing(#[from(resolver)] resolver: &ResolverCell) {
    install(resolver, StubGeocoder::refusing());
}

#[given("a geocoder returning only the display name {name}")]
fn display_name_only(#[from(resolver)] resolver: &ResolverCell, name: String) {
    install(resolver, StubGeocoder::with_display_name(&unquote(&name)));
}

// --- When steps ---

#[when("I resolve the coordinate {lat:f64} {lng:f64} twice")]
fn resolve_twice(
    #[from(resolver)] resolver: &ResolverCell,
    #[from(answers)] answers: &RefCell<Vec<String>>,
    lat: f64,
    lng: f64,
) {
    let guard = resolver.borrow();
    let resolver = guard.as_ref().expect("resolver must be initialised");
    let coordinate = Coordinate::new(lat, lng);
    let results = block_on(async {
        let first = resolver.resolve_one(coordinate).await;
        let second = resolver.resolve_one(coordinate).await;
        vec![first, second]
    });
    *answers.borrow_mut() = results;
}

#[when("I resolve a batch containing {lat:f64} {lng:f64} twice")]
fn resolve_duplicate_batch(
    #[from(resolver)] resolver: &ResolverCell,
    #[from(batch)] batch: &RefCell<Option<ResolvedAddresses>>,
    lat: f64,
    lng: f64,
) {
    let guard = resolver.borrow();
    let resolver = guard.as_ref().expect("resolver must be initialised");
    let coordinate = Coordinate::new(lat, lng);
    *batch.borrow_mut() = Some(block_on(resolver.resolve_batch(&[coordinate, coordinate])));
}

// --- Then steps ---

#[then("both results are {expected}")]
fn both_results(#[from(answers)] answers: &RefCell<Vec<String>>, expected: String) {
    let expected = unquote(&expected);
    let answers = answers.borrow();
    assert_eq!(answers.len(), 2, "expected two answers");
    assert!(
        answers.iter().all(|answer| *answer == expected),
        "expected {expected:?}, got {answers:?}"
    );
}

#[then("the geocoder was called {count:usize} time")]
fn called(#[from(resolver)] resolver: &ResolverCell, count: usize) {
    let guard = resolver.borrow();
    let resolver = guard.as_ref().expect("resolver must be initialised");
    assert_eq!(resolver.geocoder().call_count(), count);
}

#[then("the batch has exactly the key {key}")]
fn batch_key(#[from(batch)] batch: &RefCell<Option<ResolvedAddresses>>, key: String) {
    let guard = batch.borrow();
    let addresses = guard.as_ref().expect("batch must have been resolved");
    let keys: Vec<&str> = addresses.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec![unquote(&key).as_str()]);
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/address_resolver.feature", name = $title)]
        fn $fn_name(
            resolver: ResolverCell,
            answers: RefCell<Vec<String>>,
            batch: RefCell<Option<ResolvedAddresses>>,
        ) {
            let _ = (resolver, answers, batch);
        }
    };
}

register_scenario!(resolving_twice, "resolving the same coordinate twice");
register_scenario!(
    falling_back_on_failure,
    "falling back to coordinates when the provider fails"
);
register_scenario!(deduplicating_batch, "deduplicating a batch");
register_scenario!(display_name_fallback, "falling back to the display name");
