//! In-memory timetable: routes and the station index.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::domain::StationCode;

use super::error::LoadError;
use super::raw::{RawStop, clean_key, clean_name, kind_of};

/// One call of a train at a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub station_code: StationCode,
    /// Uppercased station name.
    pub station_name: String,
    /// Raw arrival time; may be empty or a placeholder.
    pub arrival: String,
    /// Raw departure time; may be empty or a placeholder.
    pub departure: String,
    /// Position of the record in the source list for this train.
    pub sequence: usize,
}

/// A train and its ordered stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub train_no: String,
    pub train_name: String,
    pub stops: Vec<Stop>,
}

impl Route {
    /// Index of the first stop at `code` at or after `from`.
    pub fn position_of(&self, code: &StationCode, from: usize) -> Option<usize> {
        self.stops
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, stop)| &stop.station_code == code)
            .map(|(idx, _)| idx)
    }
}

/// Station name → code lookup, plus the set of known codes.
///
/// Both collections are ordered so iteration is deterministic.
#[derive(Debug, Clone, Default)]
pub struct StationIndex {
    names: BTreeMap<String, StationCode>,
    codes: BTreeSet<StationCode>,
}

impl StationIndex {
    /// Record a station. A name seen again maps to the latest code.
    pub fn insert(&mut self, name: String, code: StationCode) {
        if let Some(previous) = self.names.get(&name)
            && previous != &code
        {
            debug!(name = %name, previous = %previous, code = %code, "station name remapped");
        }
        self.codes.insert(code.clone());
        self.names.insert(name, code);
    }

    /// Code for an exact (canonical) name.
    pub fn code_for_name(&self, name: &str) -> Option<&StationCode> {
        self.names.get(name)
    }

    /// The known code equal to `code`, if any.
    pub fn known_code(&self, code: &str) -> Option<&StationCode> {
        let code = StationCode::parse(code).ok()?;
        self.codes.get(&code)
    }

    /// All `(name, code)` pairs in lexicographic name order.
    pub fn names(&self) -> impl Iterator<Item = (&str, &StationCode)> {
        self.names.iter().map(|(name, code)| (name.as_str(), code))
    }

    /// All known codes in lexicographic order.
    pub fn codes(&self) -> impl Iterator<Item = &StationCode> {
        self.codes.iter()
    }

    /// Number of distinct station names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// The loaded timetable. Built once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Store {
    routes: Vec<Route>,
    by_train_no: HashMap<String, usize>,
    stations: StationIndex,
}

impl Store {
    /// A store with no routes and no stations.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a store from a parsed timetable source.
    ///
    /// Accepts either a mapping of train number to stop records or a flat
    /// list of stop records. Unusable records are dropped with a warning.
    pub fn load(source: &Value) -> Result<Self, LoadError> {
        let mut builder = StoreBuilder::default();

        match source {
            Value::Object(trains) => {
                for (raw_train_no, stops) in trains {
                    let Value::Array(stops) = stops else {
                        warn!(
                            train_no = %raw_train_no,
                            found = kind_of(stops),
                            "skipping train whose stops are not a list"
                        );
                        continue;
                    };
                    builder.add_train(raw_train_no, stops);
                }
            }
            Value::Array(records) => {
                for record in records {
                    builder.add_flat_record(record);
                }
            }
            other => {
                return Err(LoadError::UnexpectedShape {
                    expected: "object or array",
                    found: kind_of(other),
                });
            }
        }

        let store = builder.build();
        info!(
            trains = store.len(),
            stations = store.station_count(),
            "loaded timetable"
        );
        Ok(store)
    }

    /// Like [`Store::load`], but any failure yields an empty store.
    pub fn load_or_empty(source: &Value) -> Self {
        Self::load(source).unwrap_or_else(|e| {
            error!(error = %e, "failed to load timetable, serving empty store");
            Self::empty()
        })
    }

    /// Parse a JSON string and load it.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(json)?;
        Self::load(&value)
    }

    /// Read a JSON file and load it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// All routes in source order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Look up a route by train number.
    pub fn route(&self, train_no: &str) -> Option<&Route> {
        let idx = self.by_train_no.get(&clean_key(train_no))?;
        self.routes.get(*idx)
    }

    /// The station index derived from all routes.
    pub fn station_index(&self) -> &StationIndex {
        &self.stations
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the store has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Number of distinct station names.
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }
}

/// A route under construction.
#[derive(Debug)]
struct PendingRoute {
    train_no: String,
    train_name: String,
    stops: Vec<Stop>,
    /// Records seen for this train, kept or dropped.
    records_seen: usize,
}

/// Accumulates routes in first-appearance order.
#[derive(Debug, Default)]
struct StoreBuilder {
    pending: Vec<PendingRoute>,
    by_train_no: HashMap<String, usize>,
}

impl StoreBuilder {
    /// Add one train from the mapping form.
    fn add_train(&mut self, raw_train_no: &str, records: &[Value]) {
        let train_no = clean_key(raw_train_no);
        if train_no.is_empty() {
            warn!(raw = %raw_train_no, "skipping train with empty train number");
            return;
        }
        if self.by_train_no.contains_key(&train_no) {
            warn!(train_no = %train_no, "skipping duplicate train");
            return;
        }

        for record in records {
            match parse_record(record) {
                Some(raw) => self.push(&train_no, raw),
                None => self.skip(&train_no),
            }
        }
    }

    /// Add one record from the flat list form.
    fn add_flat_record(&mut self, record: &Value) {
        let Some(raw) = parse_record(record) else {
            return;
        };
        let train_no = clean_key(&raw.train_no);
        if train_no.is_empty() {
            warn!(station = %raw.station_code, "dropping stop record without train number");
            return;
        }
        self.push(&train_no, raw);
    }

    fn entry(&mut self, train_no: &str) -> &mut PendingRoute {
        let idx = match self.by_train_no.get(train_no) {
            Some(idx) => *idx,
            None => {
                self.pending.push(PendingRoute {
                    train_no: train_no.to_string(),
                    train_name: String::new(),
                    stops: Vec::new(),
                    records_seen: 0,
                });
                let idx = self.pending.len() - 1;
                self.by_train_no.insert(train_no.to_string(), idx);
                idx
            }
        };
        &mut self.pending[idx]
    }

    /// Count a record that could not be parsed at all.
    fn skip(&mut self, train_no: &str) {
        self.entry(train_no).records_seen += 1;
    }

    fn push(&mut self, train_no: &str, raw: RawStop) {
        let route = self.entry(train_no);
        let sequence = route.records_seen;
        route.records_seen += 1;

        if route.train_name.is_empty() {
            route.train_name = raw.train_name.trim().to_string();
        }

        let station_name = clean_name(&raw.station_name);
        let station_code = StationCode::parse_normalized(&raw.station_code);

        match (station_name.is_empty(), station_code) {
            (false, Ok(station_code)) => route.stops.push(Stop {
                station_code,
                station_name,
                arrival: clean_key(&raw.arrival),
                departure: clean_key(&raw.departure),
                sequence,
            }),
            (_, code) => {
                warn!(
                    train_no = %train_no,
                    sequence,
                    station_name = %raw.station_name,
                    station_code = %raw.station_code,
                    valid_code = code.is_ok(),
                    "dropping stop without usable station name or code"
                );
            }
        }
    }

    fn build(self) -> Store {
        let mut routes = Vec::with_capacity(self.pending.len());
        let mut by_train_no = HashMap::with_capacity(self.pending.len());
        let mut stations = StationIndex::default();

        for pending in self.pending {
            if pending.stops.is_empty() {
                warn!(train_no = %pending.train_no, "dropping train with no usable stops");
                continue;
            }
            for stop in &pending.stops {
                stations.insert(stop.station_name.clone(), stop.station_code.clone());
            }
            by_train_no.insert(pending.train_no.clone(), routes.len());
            routes.push(Route {
                train_no: pending.train_no,
                train_name: pending.train_name,
                stops: pending.stops,
            });
        }

        Store {
            routes,
            by_train_no,
            stations,
        }
    }
}

/// Deserialize one stop record, warning on anything that is not an object.
fn parse_record(record: &Value) -> Option<RawStop> {
    if !record.is_object() {
        warn!(found = kind_of(record), "dropping stop record that is not an object");
        return None;
    }
    match serde_json::from_value(record.clone()) {
        Ok(raw) => Some(raw),
        Err(e) => {
            warn!(error = %e, "dropping malformed stop record");
            None
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    /// Stop records where some have blank codes or names.
    fn records() -> impl Strategy<Value = Vec<(String, String)>> {
        prop::collection::vec(("[A-C]{0,2}", "[a-c ]{0,4}"), 0..12)
    }

    proptest! {
        /// Sequences are strictly increasing within every route.
        #[test]
        fn sequences_strictly_increase(stops in records()) {
            let list: Vec<Value> = stops
                .iter()
                .map(|(code, name)| json!({"Station_Code": code, "Station_Name": name}))
                .collect();
            let store = Store::load(&json!({ "1": list })).unwrap();

            for route in store.routes() {
                for pair in route.stops.windows(2) {
                    prop_assert!(pair[0].sequence < pair[1].sequence);
                }
            }
        }
    }
}
