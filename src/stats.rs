//! Delay and peak-hour aggregation over a flight log.
//!
//! Every function here is pure: it reads a slice of records and returns
//! value objects. Divisions by zero resolve to 0, and malformed records
//! (negative delays, inverted timestamps) flow into the aggregates as-is.

use crate::models::{AirportStatistics, DelayDistribution, FlightRecord, PeakHourBucket};

/// Upper bound (exclusive) of the minor delay bucket, in minutes
pub const MINOR_DELAY_LIMIT: i64 = 15;
/// Lower bound (inclusive) of the critical delay bucket, in minutes
pub const CRITICAL_DELAY_LIMIT: i64 = 60;

/// Round to two decimals, half away from zero
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Count flights per scheduled hour, in the order each hour is first seen
pub fn hourly_counts(flights: &[FlightRecord]) -> Vec<(u32, usize)> {
    let mut counts: Vec<(u32, usize)> = Vec::new();
    for flight in flights {
        match counts.iter_mut().find(|(hour, _)| *hour == flight.scheduled_hour) {
            Some((_, count)) => *count += 1,
            None => counts.push((flight.scheduled_hour, 1)),
        }
    }
    counts
}

/// Busiest scheduled hour and its flight count.
///
/// Only a strictly greater count replaces the current leader, so among
/// equally busy hours the one encountered first in the log wins.
pub fn peak_hour(flights: &[FlightRecord]) -> Option<(u32, usize)> {
    let mut peak: Option<(u32, usize)> = None;
    for (hour, count) in hourly_counts(flights) {
        if peak.map_or(true, |(_, best)| count > best) {
            peak = Some((hour, count));
        }
    }
    peak
}

/// Bucket flights by absolute delay; a missing delay counts as minor.
pub fn delay_distribution(flights: &[FlightRecord]) -> DelayDistribution {
    let mut dist = DelayDistribution::default();
    for flight in flights {
        let delay = flight.delay_or_zero().unsigned_abs();
        if delay < MINOR_DELAY_LIMIT.unsigned_abs() {
            dist.minor += 1;
        } else if delay < CRITICAL_DELAY_LIMIT.unsigned_abs() {
            dist.major += 1;
        } else {
            dist.critical += 1;
        }
    }
    dist
}

/// Summary statistics for one airport's log
pub fn airport_statistics(airport_code: &str, flights: &[FlightRecord]) -> AirportStatistics {
    let total_flights = flights.len();
    let delayed_flights = flights
        .iter()
        .filter(|f| f.delay_minutes.is_some_and(|d| d > 0))
        .count();

    let avg_delay = if total_flights == 0 {
        0.0
    } else {
        // Widened so extreme delays cannot overflow the sum
        let total_delay: i128 = flights.iter().map(|f| i128::from(f.delay_or_zero())).sum();
        round2(total_delay as f64 / total_flights as f64)
    };

    let (peak_hour, peak_flights) = match peak_hour(flights) {
        Some((hour, count)) => (Some(hour), count),
        None => (None, 0),
    };

    let capacity_utilization = if peak_flights == 0 {
        0.0
    } else {
        round2(total_flights as f64 / (peak_flights as f64 * 24.0) * 100.0)
    };

    AirportStatistics {
        airport_code: airport_code.to_string(),
        total_flights,
        delayed_flights,
        avg_delay,
        peak_hour,
        peak_flights,
        delay_distribution: delay_distribution(flights),
        capacity_utilization,
    }
}

/// Hourly buckets sorted by descending flight count.
///
/// Hours with no flights are omitted. The sort is stable, so equally busy
/// hours keep their first-seen order.
pub fn peak_hour_analysis(flights: &[FlightRecord]) -> Vec<PeakHourBucket> {
    let counts = hourly_counts(flights);
    let max = counts.iter().map(|(_, count)| *count).max().unwrap_or(0);

    let mut buckets: Vec<PeakHourBucket> = counts
        .into_iter()
        .map(|(hour, flight_count)| PeakHourBucket {
            hour,
            flight_count,
            utilization: if max == 0 {
                0
            } else {
                (flight_count as f64 / max as f64 * 100.0).round() as u32
            },
        })
        .collect();

    buckets.sort_by(|a, b| b.flight_count.cmp(&a.flight_count));
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlightStatus;
    use chrono::{Duration, TimeZone, Utc};

    fn flight(idx: usize, hour: u32, delay: Option<i64>) -> FlightRecord {
        let dep = Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap();
        let mut record = FlightRecord::new(
            idx.to_string(),
            format!("AA{}", 100 + idx),
            "JFK",
            "LAX",
            dep,
            dep + Duration::hours(5),
            FlightStatus::Scheduled,
            "JFK",
        );
        record.delay_minutes = delay;
        record
    }

    fn sample_log() -> Vec<FlightRecord> {
        [20, 17, 8, 0, 44]
            .iter()
            .enumerate()
            .map(|(i, d)| flight(i, 6, Some(*d)))
            .collect()
    }

    #[test]
    fn test_sample_scenario() {
        let stats = airport_statistics("JFK", &sample_log());

        assert_eq!(stats.total_flights, 5);
        assert_eq!(stats.delayed_flights, 4);
        assert_eq!(stats.avg_delay, 17.8);
        assert_eq!(
            stats.delay_distribution,
            DelayDistribution { minor: 2, major: 3, critical: 0 }
        );
        assert_eq!(stats.peak_hour, Some(6));
        assert_eq!(stats.peak_flights, 5);
        assert_eq!(stats.capacity_utilization, 4.17);
    }

    #[test]
    fn test_empty_log_is_quiet() {
        let stats = airport_statistics("JFK", &[]);

        assert_eq!(stats.total_flights, 0);
        assert_eq!(stats.delayed_flights, 0);
        assert_eq!(stats.avg_delay, 0.0);
        assert_eq!(stats.capacity_utilization, 0.0);
        assert_eq!(stats.peak_hour, None);
        assert_eq!(stats.peak_flights, 0);
        assert!(peak_hour_analysis(&[]).is_empty());
    }

    #[test]
    fn test_absent_delay_counts_as_minor() {
        let log = vec![flight(0, 8, None), flight(1, 8, Some(75)), flight(2, 9, Some(-30))];
        let stats = airport_statistics("JFK", &log);

        assert_eq!(stats.delayed_flights, 1);
        assert_eq!(
            stats.delay_distribution,
            DelayDistribution { minor: 1, major: 1, critical: 1 }
        );
        assert_eq!(stats.delay_distribution.total(), stats.total_flights);
        // (0 + 75 - 30) / 3
        assert_eq!(stats.avg_delay, 15.0);
    }

    #[test]
    fn test_bucket_boundaries() {
        let log: Vec<_> = [14, 15, 59, 60]
            .iter()
            .enumerate()
            .map(|(i, d)| flight(i, 10, Some(*d)))
            .collect();

        assert_eq!(
            delay_distribution(&log),
            DelayDistribution { minor: 1, major: 2, critical: 1 }
        );
    }

    #[test]
    fn test_extreme_delays_do_not_overflow() {
        let log = vec![
            flight(0, 6, Some(i64::MAX)),
            flight(1, 6, Some(i64::MAX)),
            flight(2, 7, Some(i64::MIN)),
        ];
        let stats = airport_statistics("JFK", &log);

        assert_eq!(stats.delayed_flights, 2);
        assert!(stats.avg_delay.is_finite() && stats.avg_delay > 0.0);
        assert_eq!(
            stats.delay_distribution,
            DelayDistribution { minor: 0, major: 0, critical: 3 }
        );
    }

    #[test]
    fn test_peak_tie_break_is_first_seen() {
        let log = vec![
            flight(0, 14, None),
            flight(1, 7, None),
            flight(2, 7, None),
            flight(3, 14, None),
        ];

        assert_eq!(peak_hour(&log), Some((14, 2)));
    }

    #[test]
    fn test_avg_delay_rounding() {
        let log = vec![flight(0, 6, Some(1)), flight(1, 6, Some(1)), flight(2, 6, Some(0))];
        assert_eq!(airport_statistics("JFK", &log).avg_delay, 0.67);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn test_peak_hour_analysis_ordering() {
        let log = vec![
            flight(0, 9, None),
            flight(1, 6, None),
            flight(2, 6, None),
            flight(3, 6, None),
            flight(4, 12, None),
            flight(5, 9, None),
            flight(6, 12, None),
            flight(7, 18, None),
        ];
        let buckets = peak_hour_analysis(&log);

        let hours: Vec<u32> = buckets.iter().map(|b| b.hour).collect();
        assert_eq!(hours, vec![6, 9, 12, 18]);
        assert!(buckets.windows(2).all(|w| w[0].flight_count >= w[1].flight_count));
        assert!(buckets.iter().all(|b| b.utilization <= 100));
        assert_eq!(buckets[0].utilization, 100);
        assert_eq!(buckets[1].utilization, 67);
        assert_eq!(buckets[3].utilization, 33);
    }

    #[test]
    fn test_capacity_utilization_multi_hour() {
        let log = vec![
            flight(0, 6, None),
            flight(1, 6, None),
            flight(2, 7, None),
        ];
        let stats = airport_statistics("JFK", &log);
        // 3 / (2 * 24) * 100
        assert_eq!(stats.capacity_utilization, 6.25);
    }
}
