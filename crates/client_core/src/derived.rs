//! Pure filter and sort helpers behind the derived list.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use shared::domain::{FilterType, SortType, TripEvent};

pub fn is_future(event: &TripEvent, now: DateTime<Utc>) -> bool {
    event.date_from > now
}

pub fn is_present(event: &TripEvent, now: DateTime<Utc>) -> bool {
    event.date_from <= now && now <= event.date_to
}

pub fn is_past(event: &TripEvent, now: DateTime<Utc>) -> bool {
    event.date_to < now
}

pub fn matches_filter(filter: FilterType, event: &TripEvent, now: DateTime<Utc>) -> bool {
    match filter {
        FilterType::Everything => true,
        FilterType::Future => is_future(event, now),
        FilterType::Present => is_present(event, now),
        FilterType::Past => is_past(event, now),
    }
}

pub fn filter_events(filter: FilterType, events: &[TripEvent], now: DateTime<Utc>) -> Vec<TripEvent> {
    events
        .iter()
        .filter(|event| matches_filter(filter, event, now))
        .cloned()
        .collect()
}

/// Shortest first.
pub fn compare_by_time(a: &TripEvent, b: &TripEvent) -> Ordering {
    a.duration().cmp(&b.duration())
}

/// Cheapest first.
pub fn compare_by_price(a: &TripEvent, b: &TripEvent) -> Ordering {
    a.base_price.cmp(&b.base_price)
}

/// Filters `events`, then stable-sorts the filtered sequence. `SortType::Day`
/// keeps the incoming order, which the trip events model keeps by date.
pub fn derive_list(
    events: &[TripEvent],
    filter: FilterType,
    sort: SortType,
    now: DateTime<Utc>,
) -> Vec<TripEvent> {
    let mut filtered = filter_events(filter, events, now);
    match sort {
        SortType::Day => {}
        SortType::Time => filtered.sort_by(compare_by_time),
        SortType::Price => filtered.sort_by(compare_by_price),
    }
    filtered
}

/// Whether each filter would show at least one event.
pub fn filter_availability(events: &[TripEvent], now: DateTime<Utc>) -> Vec<(FilterType, bool)> {
    FilterType::ALL
        .into_iter()
        .map(|filter| {
            let available = events
                .iter()
                .any(|event| matches_filter(filter, event, now));
            (filter, available)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::{DestinationId, EventId, EventType};

    fn at(raw: &str) -> DateTime<Utc> {
        raw.parse().expect("timestamp")
    }

    fn event(id: i64, price: u32, from: &str, to: &str) -> TripEvent {
        TripEvent {
            id: EventId(id),
            event_type: EventType::Taxi,
            base_price: price,
            date_from: at(from),
            date_to: at(to),
            destination: DestinationId(1),
            offers: Vec::new(),
            is_favorite: false,
        }
    }

    fn ids(events: &[TripEvent]) -> Vec<i64> {
        events.iter().map(|event| event.id.0).collect()
    }

    fn sample() -> Vec<TripEvent> {
        vec![
            event(1, 30, "2024-01-01T08:00:00Z", "2024-01-01T12:00:00Z"),
            event(2, 10, "2024-01-02T08:00:00Z", "2024-01-02T09:00:00Z"),
            event(3, 30, "2024-01-03T08:00:00Z", "2024-01-03T08:30:00Z"),
            event(4, 10, "2024-01-04T08:00:00Z", "2024-01-04T09:00:00Z"),
            event(5, 20, "2024-01-05T08:00:00Z", "2024-01-06T08:00:00Z"),
        ]
    }

    #[test]
    fn price_sort_orders_cheapest_first() {
        let events = vec![
            TripEvent {
                event_type: EventType::Taxi,
                ..event(1, 20, "2024-01-02T00:00:00Z", "2024-01-02T01:00:00Z")
            },
            TripEvent {
                event_type: EventType::Bus,
                ..event(2, 5, "2024-01-01T00:00:00Z", "2024-01-01T01:00:00Z")
            },
        ];

        let derived = derive_list(
            &events,
            FilterType::Everything,
            SortType::Price,
            at("2024-01-01T00:00:00Z"),
        );
        assert_eq!(ids(&derived), vec![2, 1]);
    }

    #[test]
    fn sorting_is_stable_for_ties() {
        let now = at("2023-12-01T00:00:00Z");
        let by_price = derive_list(&sample(), FilterType::Everything, SortType::Price, now);
        assert_eq!(ids(&by_price), vec![2, 4, 5, 1, 3]);

        let by_time = derive_list(&sample(), FilterType::Everything, SortType::Time, now);
        assert_eq!(ids(&by_time), vec![3, 2, 4, 1, 5]);
    }

    #[test]
    fn day_sort_keeps_filtered_order() {
        let now = at("2024-01-03T08:10:00Z");
        let derived = derive_list(&sample(), FilterType::Everything, SortType::Day, now);
        assert_eq!(ids(&derived), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn derived_list_is_deterministic_for_every_combination() {
        let events = sample();
        let now = at("2024-01-03T08:10:00Z");
        for filter in FilterType::ALL {
            for sort in SortType::ALL {
                let first = derive_list(&events, filter, sort, now);
                let second = derive_list(&events, filter, sort, now);
                assert_eq!(first, second, "filter={filter} sort={sort}");
            }
        }
    }

    #[test]
    fn resorting_is_a_permutation_of_the_filtered_set() {
        let events = sample();
        let now = at("2024-01-03T08:10:00Z");
        for filter in FilterType::ALL {
            let filtered = filter_events(filter, &events, now);
            let by_price = derive_list(&events, filter, SortType::Price, now);
            let then_time = derive_list(&by_price, filter, SortType::Time, now);

            let mut expected = ids(&filtered);
            let mut actual = ids(&then_time);
            expected.sort_unstable();
            actual.sort_unstable();
            assert_eq!(expected, actual, "filter={filter}");
        }
    }

    #[test]
    fn time_filters_split_around_now() {
        let events = sample();
        let now = at("2024-01-03T08:10:00Z");
        assert_eq!(ids(&filter_events(FilterType::Past, &events, now)), vec![1, 2]);
        assert_eq!(ids(&filter_events(FilterType::Present, &events, now)), vec![3]);
        assert_eq!(ids(&filter_events(FilterType::Future, &events, now)), vec![4, 5]);
    }

    #[test]
    fn availability_reports_empty_filters() {
        let events = vec![event(1, 1, "2024-01-01T00:00:00Z", "2024-01-01T01:00:00Z")];
        let availability = filter_availability(&events, at("2025-01-01T00:00:00Z"));
        assert_eq!(
            availability,
            vec![
                (FilterType::Everything, true),
                (FilterType::Future, false),
                (FilterType::Present, false),
                (FilterType::Past, true),
            ]
        );
    }
}
