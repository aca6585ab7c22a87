//! Direct-train route search over the static timetable.
//!
//! A train qualifies when it calls at the source and then, later in its
//! route, at the destination. Loops are handled by taking the first call at
//! the source and the first call at the destination after it.

use crate::domain::{SearchResult, StationCode, compare_raw_times};
use crate::timetable::{Route, Store};

/// Find every train running from `source` to `destination`.
///
/// Results are ordered by departure time at the source; trains with a
/// missing or unparseable departure come last. Trains with equal departure
/// keep the store's route order. An empty result is not an error.
pub fn search(store: &Store, source: &StationCode, destination: &StationCode) -> Vec<SearchResult> {
    // A loop route (A..B..A) is not a trip from A to A.
    if source == destination {
        return Vec::new();
    }

    let mut results: Vec<SearchResult> = store
        .routes()
        .iter()
        .filter_map(|route| connect(route, source, destination))
        .collect();

    sort_by_departure(&mut results);
    results
}

/// Stable sort by departure time, unparseable times last.
pub fn sort_by_departure(results: &mut [SearchResult]) {
    results.sort_by(|a, b| compare_raw_times(&a.departure_time, &b.departure_time));
}

/// The itinerary on `route`, if it runs from `source` to `destination`.
fn connect(route: &Route, source: &StationCode, destination: &StationCode) -> Option<SearchResult> {
    let board = route.position_of(source, 0)?;
    let alight = route.position_of(destination, board + 1)?;

    let from = &route.stops[board];
    let to = &route.stops[alight];

    Some(SearchResult {
        train_no: route.train_no.clone(),
        train_name: route.train_name.clone(),
        source_code: source.clone(),
        destination_code: destination.clone(),
        departure_time: from.departure.clone(),
        arrival_time: to.arrival.clone(),
    })
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
