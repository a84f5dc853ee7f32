use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::models::{event::Event, point::Point, visit::VisitRecord};
use crate::domain::services::search;

/// Dense visit-count matrix keyed event-first. Every (event, place) pair from
/// the two axes has an entry, zero when no visit was ever recorded.
pub type VisitMatrix = HashMap<String, HashMap<String, i64>>;

/// Temporal and spatial restriction of the research event axis. Unlike the
/// consumer search pipeline, a location here is always a hard radius filter,
/// and events without coordinates cannot satisfy it.
pub fn filter_events(
    events: Vec<Event>,
    earliest: Option<DateTime<Utc>>,
    latest: Option<DateTime<Utc>>,
    location: Option<(Point, f64)>,
) -> Vec<Event> {
    events
        .into_iter()
        .filter(|event| search::overlaps_window(event, earliest, latest))
        .filter(|event| match &location {
            Some((origin, radius)) => match event.coords() {
                Some(coords) => origin.distance_miles(&coords) <= *radius,
                None => false,
            },
            None => true,
        })
        .collect()
}

pub fn build_matrix(event_ids: &[String], place_ids: &[String], records: &[VisitRecord]) -> VisitMatrix {
    let mut matrix: VisitMatrix = event_ids
        .iter()
        .map(|eid| {
            let row = place_ids.iter().map(|pid| (pid.clone(), 0i64)).collect();
            (eid.clone(), row)
        })
        .collect();

    for record in records {
        if let Some(row) = matrix.get_mut(&record.event_id) {
            if let Some(cell) = row.get_mut(&record.place_id) {
                *cell = record.visits;
            }
        }
    }

    matrix
}
