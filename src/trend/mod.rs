//! Day-bucketed series and top-K extraction.
//!
//! Downstream charts need dense series: every calendar day in the requested
//! range gets a bucket, zero-valued when nothing happened that day, never a
//! gap.

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::domain::TrendBucket;

/// Average `value(record)` per calendar day over `[start, end]`, in calendar
/// order. Days without records get value 0 and count 0.
pub fn bucket_by_day<T>(
    entity_id: &str,
    records: &[T],
    start: NaiveDate,
    end: NaiveDate,
    timestamp: impl Fn(&T) -> DateTime<Utc>,
    value: impl Fn(&T) -> f64,
) -> Vec<TrendBucket> {
    let mut sums: HashMap<NaiveDate, (f64, usize)> = HashMap::new();
    for record in records {
        let date = timestamp(record).date_naive();
        if date >= start && date <= end {
            let entry = sums.entry(date).or_insert((0.0, 0));
            entry.0 += value(record);
            entry.1 += 1;
        }
    }

    let mut buckets = Vec::new();
    let mut date = start;
    while date <= end {
        let (sum, count) = sums.get(&date).copied().unwrap_or((0.0, 0));
        buckets.push(TrendBucket {
            entity_id: entity_id.to_string(),
            date,
            value: if count > 0 { sum / count as f64 } else { 0.0 },
            count,
        });
        match date.checked_add_days(Days::new(1)) {
            Some(next) => date = next,
            None => break,
        }
    }
    buckets
}

/// The `k` records with the largest `key`, descending. Ties keep the record
/// with the earliest timestamp first, so repeated runs over the same data
/// rank identically.
pub fn top_k<'a, T>(
    records: &'a [T],
    k: usize,
    key: impl Fn(&T) -> f64,
    timestamp: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<&'a T> {
    let mut ranked: Vec<&T> = records.iter().collect();
    ranked.sort_by(|a, b| {
        key(b)
            .total_cmp(&key(a))
            .then_with(|| timestamp(a).cmp(&timestamp(b)))
    });
    ranked.truncate(k);
    ranked
}
