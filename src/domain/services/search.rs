use chrono::{DateTime, Utc};

use crate::domain::models::{event::Event, point::Point};
use crate::domain::services::similarity;
use crate::error::AppError;

/// Validated search input for the event filter pipeline.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    /// Whitespace-normalized; never empty when present.
    pub query: Option<String>,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
    pub location: Option<Point>,
    pub radius_miles: Option<f64>,
}

impl SearchCriteria {
    pub fn build(
        query: Option<String>,
        earliest: Option<DateTime<Utc>>,
        latest: Option<DateTime<Utc>>,
        location: Option<Point>,
        radius_miles: Option<f64>,
    ) -> Result<Self, AppError> {
        if let Some(radius) = radius_miles {
            if radius < 0.0 {
                return Err(AppError::Validation("Search radius cannot be negative".into()));
            }
            if location.is_none() {
                return Err(AppError::Validation("A radius requires a location".into()));
            }
        }

        let query_given = query.is_some();
        let query = query
            .map(|q| similarity::normalize_query(&q))
            .filter(|q| !q.is_empty());

        if query.is_none() && location.is_none() {
            if query_given {
                return Err(AppError::Validation("Search query must not be empty".into()));
            }
            return Err(AppError::Validation("Either a query or a location is required".into()));
        }

        Ok(Self { query, earliest, latest, location, radius_miles })
    }
}

/// A candidate event with its ranking annotations.
#[derive(Debug, Clone)]
pub struct RankedEvent {
    pub event: Event,
    pub distance_miles: Option<f64>,
    pub similarity: Option<f32>,
}

/// True when the event's [start, end] interval overlaps [earliest, latest].
/// A missing bound on either side is treated as unbounded.
pub fn overlaps_window(event: &Event, earliest: Option<DateTime<Utc>>, latest: Option<DateTime<Utc>>) -> bool {
    if let (Some(earliest), Some(end)) = (earliest, event.end_at) {
        if end < earliest {
            return false;
        }
    }
    if let (Some(latest), Some(start)) = (latest, event.start_at) {
        if start > latest {
            return false;
        }
    }
    true
}

/// Applies the temporal and spatial stages of the pipeline and annotates
/// distances. With a query present, distance never excludes a candidate; it
/// is a bias annotation only.
pub fn filter(candidates: Vec<Event>, criteria: &SearchCriteria) -> Vec<RankedEvent> {
    let mut results = Vec::new();

    for event in candidates {
        if !overlaps_window(&event, criteria.earliest, criteria.latest) {
            continue;
        }

        let distance_miles = match (&criteria.location, event.coords()) {
            (Some(origin), Some(coords)) => Some(origin.distance_miles(&coords)),
            _ => None,
        };

        if criteria.query.is_none() && criteria.location.is_some() {
            if let Some(radius) = criteria.radius_miles {
                match distance_miles {
                    Some(d) if d <= radius => {}
                    _ => continue,
                }
            } else if distance_miles.is_none() {
                continue;
            }
        }

        results.push(RankedEvent { event, distance_miles, similarity: None });
    }

    results
}

/// Keyword ranking: descending cosine similarity between the query embedding
/// and each event's stored embedding. Events without an embedding sort last.
/// Only called with >= 2 candidates; the caller embeds the query once.
pub fn rank_by_similarity(results: &mut [RankedEvent], query_embedding: &[f32]) {
    for item in results.iter_mut() {
        item.similarity = item
            .event
            .embedding
            .as_ref()
            .map(|e| similarity::cosine(query_embedding, &e.0));
    }
    results.sort_by(|a, b| {
        let sa = a.similarity.unwrap_or(f32::MIN);
        let sb = b.similarity.unwrap_or(f32::MIN);
        sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Pure location ranking: ascending distance.
pub fn rank_by_distance(results: &mut [RankedEvent]) {
    results.sort_by(|a, b| {
        let da = a.distance_miles.unwrap_or(f64::MAX);
        let db = b.distance_miles.unwrap_or(f64::MAX);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::event::NewEventParams;
    use chrono::NaiveDateTime;
    use sqlx::types::Json;

    fn parse(s: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap().and_utc()
    }

    fn event(name: &str, start: Option<&str>, end: Option<&str>, coords: Option<(f64, f64)>) -> Event {
        Event::new(NewEventParams {
            displayname: name.to_string(),
            description: None,
            start_at: start.map(parse),
            end_at: end.map(parse),
            host: "host-1".to_string(),
            coords: coords.and_then(|(lat, lon)| Point::new(lat, lon)),
            embedding: None,
        })
    }

    fn criteria(
        query: Option<&str>,
        earliest: Option<&str>,
        latest: Option<&str>,
        location: Option<(f64, f64)>,
        radius: Option<f64>,
    ) -> SearchCriteria {
        SearchCriteria::build(
            query.map(String::from),
            earliest.map(parse),
            latest.map(parse),
            location.and_then(|(lat, lon)| Point::new(lat, lon)),
            radius,
        )
        .unwrap()
    }

    #[test]
    fn test_negative_radius_rejected() {
        let err = SearchCriteria::build(
            Some("jazz".into()),
            None,
            None,
            Point::new(40.0, -74.0),
            Some(-1.0),
        );
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_no_criteria_rejected() {
        let err = SearchCriteria::build(None, None, None, None, None);
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_whitespace_only_query_rejected_as_sole_criterion() {
        let err = SearchCriteria::build(Some("  \n ".into()), None, None, None, None);
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_interval_overlap_included() {
        // Event 06-01..06-03 overlaps the 06-02..06-02 window.
        let c = criteria(Some("q"), Some("2024-06-02 00:00"), Some("2024-06-02 23:59"), None, None);
        let out = filter(
            vec![event("picnic", Some("2024-06-01 00:00"), Some("2024-06-03 23:59"), None)],
            &c,
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_event_ending_before_earliest_excluded() {
        let c = criteria(Some("q"), Some("2024-06-04 00:00"), None, None, None);
        let out = filter(
            vec![event("picnic", Some("2024-06-01 00:00"), Some("2024-06-03 23:59"), None)],
            &c,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_event_without_window_passes_temporal_filter() {
        let c = criteria(Some("q"), Some("2024-06-04 00:00"), Some("2024-06-05 00:00"), None, None);
        let out = filter(vec![event("open-ended", None, None, None)], &c);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_location_search_excludes_outside_radius_and_null_coords() {
        let c = criteria(None, None, None, Some((40.0, -74.0)), Some(10.0));
        let out = filter(
            vec![
                event("near", None, None, Some((40.05, -74.0))),
                event("far", None, None, Some((45.0, -74.0))),
                event("nowhere", None, None, None),
            ],
            &c,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].event.displayname, "near");
        assert!(out[0].distance_miles.unwrap() <= 10.0);
    }

    #[test]
    fn test_query_with_location_annotates_without_excluding() {
        let c = criteria(Some("q"), None, None, Some((40.0, -74.0)), Some(10.0));
        let out = filter(
            vec![
                event("far", None, None, Some((45.0, -74.0))),
                event("nowhere", None, None, None),
            ],
            &c,
        );
        assert_eq!(out.len(), 2);
        assert!(out[0].distance_miles.unwrap() > 10.0);
        assert!(out[1].distance_miles.is_none());
    }

    #[test]
    fn test_rank_by_distance_is_non_decreasing() {
        let c = criteria(None, None, None, Some((40.0, -74.0)), Some(500.0));
        let mut out = filter(
            vec![
                event("mid", None, None, Some((41.0, -74.0))),
                event("close", None, None, Some((40.1, -74.0))),
                event("far", None, None, Some((44.0, -74.0))),
            ],
            &c,
        );
        rank_by_distance(&mut out);
        let names: Vec<_> = out.iter().map(|r| r.event.displayname.as_str()).collect();
        assert_eq!(names, vec!["close", "mid", "far"]);
        assert!(out.windows(2).all(|w| w[0].distance_miles <= w[1].distance_miles));
    }

    #[test]
    fn test_rank_by_similarity_is_non_increasing() {
        let mut a = event("a", None, None, None);
        a.embedding = Some(Json(vec![1.0, 0.0]));
        let mut b = event("b", None, None, None);
        b.embedding = Some(Json(vec![0.8, 0.6]));
        let c = event("c", None, None, None); // no embedding, sorts last

        let mut out: Vec<RankedEvent> = [c, a, b]
            .into_iter()
            .map(|event| RankedEvent { event, distance_miles: None, similarity: None })
            .collect();
        rank_by_similarity(&mut out, &[1.0, 0.0]);

        let names: Vec<_> = out.iter().map(|r| r.event.displayname.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(out[0].similarity.unwrap() >= out[1].similarity.unwrap());
    }
}
