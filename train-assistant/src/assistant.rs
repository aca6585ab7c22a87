//! Query answering.
//!
//! Glues the interpreter, the station resolver and the route search together
//! into one call per user message. Optional hosted collaborators (an NLU
//! model and a live rail-status API) may refine the answer; they are always
//! bounded by a deadline and their failures never surface to the caller.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::cache::CachedRailStatusClient;
use crate::domain::{Answer, ExtractedEntities, Intent, SearchResult, StationCode};
use crate::interpret::{RawEntities, candidate_labels, classify, confident_intent, extract, parse_date};
use crate::nlu::{EntityKind, EntitySpan, Nlu, NluClient, NluError};
use crate::planner::{search, sort_by_departure};
use crate::railstatus::{RailStatus, RailStatusError};
use crate::stations::{DEFAULT_FUZZY_CUTOFF, StationResolver};
use crate::timetable::TimetableHandle;

/// Tunables for answering queries.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Minimum similarity for a fuzzy station-name match.
    pub fuzzy_cutoff: f64,

    /// Minimum classifier score for its label to override the keyword intent.
    pub nlu_confidence: f64,

    /// Deadline for each collaborator call.
    pub collaborator_timeout: Duration,
}

impl AssistantConfig {
    /// Set the fuzzy match cutoff.
    pub fn with_fuzzy_cutoff(mut self, cutoff: f64) -> Self {
        self.fuzzy_cutoff = cutoff;
        self
    }

    /// Set the classifier confidence threshold.
    pub fn with_nlu_confidence(mut self, threshold: f64) -> Self {
        self.nlu_confidence = threshold;
        self
    }

    /// Set the collaborator deadline.
    pub fn with_collaborator_timeout(mut self, timeout: Duration) -> Self {
        self.collaborator_timeout = timeout;
        self
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            fuzzy_cutoff: DEFAULT_FUZZY_CUTOFF,
            nlu_confidence: 0.5,
            collaborator_timeout: Duration::from_millis(3000),
        }
    }
}

/// What the NLU model had to say about one message.
#[derive(Debug, Default)]
struct NluAdvice {
    intent: Option<Intent>,
    entities: Vec<EntitySpan>,
}

/// Answers free-text train queries against the current timetable.
pub struct Assistant<N = NluClient, R = CachedRailStatusClient> {
    timetable: TimetableHandle,
    nlu: Option<N>,
    rail: Option<R>,
    config: AssistantConfig,
}

impl<N: Nlu, R: RailStatus> Assistant<N, R> {
    /// Create an assistant with no collaborators.
    pub fn new(timetable: TimetableHandle, config: AssistantConfig) -> Self {
        Self {
            timetable,
            nlu: None,
            rail: None,
            config,
        }
    }

    /// Consult an NLU model before the local heuristics.
    pub fn with_nlu(mut self, nlu: N) -> Self {
        self.nlu = Some(nlu);
        self
    }

    /// Supplement search results with live trains.
    pub fn with_rail_status(mut self, rail: R) -> Self {
        self.rail = Some(rail);
        self
    }

    /// The shared timetable.
    pub fn timetable(&self) -> &TimetableHandle {
        &self.timetable
    }

    /// Answer `text`, interpreting relative dates against the local date.
    pub async fn answer(&self, text: &str) -> Answer {
        self.answer_on(text, chrono::Local::now().date_naive()).await
    }

    /// Answer `text`, interpreting relative dates against `today`.
    pub async fn answer_on(&self, text: &str, today: NaiveDate) -> Answer {
        let text = text.trim();
        if text.is_empty() {
            return Answer::unknown();
        }

        let store = self.timetable.snapshot().await;

        let mut intent = classify(text);
        let spans = extract(text);
        let advice = self.consult_nlu(text).await;

        if let Some(suggested) = advice.intent
            && suggested != intent
        {
            debug!(keyword = %intent, classifier = %suggested, "classifier overrides intent");
            intent = suggested;
        }

        let resolver =
            StationResolver::new(store.station_index()).with_cutoff(self.config.fuzzy_cutoff);
        let entities = blend_entities(&resolver, spans, &advice.entities, today);

        let mut trains = Vec::new();
        if intent == Intent::TrainSearch
            && let Some((source, destination)) = entities.endpoints()
        {
            trains = search(&store, source, destination);
            if let Some(date) = entities.date {
                self.merge_live(&mut trains, source, destination, date).await;
            }
        }

        info!(
            intent = %intent,
            source = ?entities.source_code,
            destination = ?entities.destination_code,
            trains = trains.len(),
            "answered query"
        );

        Answer {
            intent,
            entities,
            trains,
        }
    }

    /// Ask the classifier and the entity recognizer concurrently.
    async fn consult_nlu(&self, text: &str) -> NluAdvice {
        let Some(nlu) = &self.nlu else {
            return NluAdvice::default();
        };

        let labels = candidate_labels();
        let deadline = self.config.collaborator_timeout;

        let (ranked, entities) = futures::join!(
            within(deadline, nlu.classify(text, &labels), NluError::Timeout),
            within(deadline, nlu.entities(text), NluError::Timeout),
        );

        let intent = match ranked {
            Ok(ranked) => confident_intent(&ranked, self.config.nlu_confidence),
            Err(e) => {
                log_nlu_failure(&e, "intent classifier");
                None
            }
        };

        let entities = entities.unwrap_or_else(|e| {
            log_nlu_failure(&e, "entity recognizer");
            Vec::new()
        });

        NluAdvice { intent, entities }
    }

    /// Add live trains not already present, then re-sort.
    async fn merge_live(
        &self,
        trains: &mut Vec<SearchResult>,
        source: &StationCode,
        destination: &StationCode,
        date: NaiveDate,
    ) {
        let Some(rail) = &self.rail else {
            return;
        };

        let deadline = self.config.collaborator_timeout;
        let live = match within(
            deadline,
            rail.trains_between(source, destination, date),
            RailStatusError::Timeout,
        )
        .await
        {
            Ok(live) => live,
            Err(e) => {
                warn!(error = %e, "rail-status lookup failed, using timetable only");
                return;
            }
        };

        let mut known: HashSet<String> = trains.iter().map(|t| t.train_no.clone()).collect();
        let before = trains.len();
        for train in live {
            if known.insert(train.train_no.clone()) {
                trains.push(train.into_result(source, destination));
            }
        }

        if trains.len() > before {
            debug!(added = trains.len() - before, "merged live trains");
            sort_by_departure(trains);
        }
    }
}

/// Resolve raw spans, filling gaps from recognized entities.
///
/// Recognized entities only fill fields the local extraction left missing or
/// unresolved; they never replace a resolved value.
fn blend_entities(
    resolver: &StationResolver<'_>,
    spans: RawEntities,
    recognized: &[EntitySpan],
    today: NaiveDate,
) -> ExtractedEntities {
    let mut source = spans
        .source
        .as_deref()
        .and_then(|s| resolve_station(resolver, s));
    let mut destination = spans
        .destination
        .as_deref()
        .and_then(|s| resolve_station(resolver, s));

    if source.is_none() || destination.is_none() {
        let mut located = recognized
            .iter()
            .filter(|span| span.kind == EntityKind::Location)
            .filter_map(|span| resolve_station(resolver, &span.text))
            .filter(|code| Some(code) != source.as_ref() && Some(code) != destination.as_ref())
            .collect::<Vec<_>>()
            .into_iter();

        if source.is_none() {
            source = located.next();
        }
        if destination.is_none() {
            destination = located.next();
        }
    }

    let date = spans
        .date
        .as_deref()
        .and_then(|d| parse_date(d, today))
        .or_else(|| {
            recognized
                .iter()
                .filter(|span| span.kind == EntityKind::Date)
                .find_map(|span| parse_date(&span.text, today))
        });

    let train_no = spans.train_no.or_else(|| {
        recognized
            .iter()
            .find(|span| span.kind == EntityKind::Number && is_digits(&span.text))
            .map(|span| span.text.clone())
    });

    ExtractedEntities {
        source_code: source,
        destination_code: destination,
        date,
        train_no,
    }
}

fn resolve_station(resolver: &StationResolver<'_>, mention: &str) -> Option<StationCode> {
    let resolved = resolver.resolve_detailed(mention)?;
    debug!(mention, code = %resolved.code, kind = ?resolved.kind, "resolved station");
    Some(resolved.code.clone())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Run `fut` with a deadline, mapping expiry to `on_timeout(millis)`.
async fn within<T, E>(
    deadline: Duration,
    fut: impl Future<Output = Result<T, E>>,
    on_timeout: impl FnOnce(u64) -> E,
) -> Result<T, E> {
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout(
            u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
        )),
    }
}

fn log_nlu_failure(err: &NluError, which: &str) {
    match err {
        NluError::NotConfigured(_) => debug!(collaborator = which, "skipped: not configured"),
        _ => warn!(collaborator = which, error = %err, "NLU call failed, using local heuristics"),
    }
}

#[cfg(test)]
#[path = "assistant_tests.rs"]
mod tests;
