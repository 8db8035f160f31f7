//! Multi-day counter-weighted heat with exponential smoothing.
//!
//! The per-day inputs are coarse activity counters (posts, comments, likes,
//! reposts for the whole entity on one day), not per-post engagement. Each
//! day's value is the exponentially smoothed tail of a short rolling window
//! ending on that day, which damps single-day spikes. Values live on an
//! unbounded raw scale; they are comparable day to day for one entity, not
//! against the bounded single-post scores in [`super::HeatScorer`].

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::WindowedHeatConfig;

/// Activity counters for one entity on one calendar day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyCounters {
    /// Calendar day
    pub date: NaiveDate,

    /// Posts published
    pub posts: u64,

    /// Comments received
    pub comments: u64,

    /// Likes received
    pub likes: u64,

    /// Reposts received
    pub reposts: u64,
}

/// Smoothed heat for one entity-day, with the raw counters it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowedHeat {
    /// Entity the value belongs to
    pub entity_id: String,

    /// Calendar day
    pub date: NaiveDate,

    /// Smoothed heat on the raw counter scale
    pub heat: f64,

    /// Change vs the previous day's smoothed heat
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,

    /// This day's raw counters
    pub counters: DailyCounters,
}

/// The windowed heat scorer.
#[derive(Debug, Clone, Default)]
pub struct WindowedHeatScorer {
    config: WindowedHeatConfig,
}

impl WindowedHeatScorer {
    pub fn new(config: WindowedHeatConfig) -> Self {
        Self { config }
    }

    /// Raw weighted heat for one day's counters.
    pub fn daily_heat(&self, counters: &DailyCounters) -> f64 {
        let c = &self.config;
        counters.posts as f64 * c.post_weight
            + counters.comments as f64 * c.comment_weight
            + counters.likes as f64 * c.like_weight
            + counters.reposts as f64 * c.repost_weight
    }

    /// Exponential moving average, new-data weight `smoothing_alpha`.
    ///
    /// Recurrence: `s[0] = x[0]`, `s[t] = alpha * x[t] + (1 - alpha) * s[t-1]`.
    fn smooth_tail(&self, values: &[f64]) -> f64 {
        let alpha = self.config.smoothing_alpha;
        let mut smoothed = match values.first() {
            Some(&first) => first,
            None => return 0.0,
        };
        for &value in &values[1..] {
            smoothed = alpha * value + (1.0 - alpha) * smoothed;
        }
        smoothed
    }

    /// Smoothed heat for one target day: the EMA tail of the rolling window
    /// of `window_days` days ending on `date`, missing days counted as zero
    /// activity.
    pub fn heat_for_day(&self, counters: &HashMap<NaiveDate, DailyCounters>, date: NaiveDate) -> f64 {
        let lookback = self.config.window_days.max(1) as u64;
        let mut values = Vec::with_capacity(lookback as usize);
        for offset in (0..lookback).rev() {
            let day = date
                .checked_sub_days(Days::new(offset))
                .unwrap_or(date);
            values.push(
                counters
                    .get(&day)
                    .map(|c| self.daily_heat(c))
                    .unwrap_or(0.0),
            );
        }
        self.smooth_tail(&values)
    }

    /// Dense smoothed series over `[start, end]`, each day carrying its delta
    /// vs the previous day.
    pub fn series(
        &self,
        entity_id: &str,
        counters: &[DailyCounters],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<WindowedHeat> {
        let by_date: HashMap<NaiveDate, DailyCounters> = counters
            .iter()
            .map(|c| (c.date, c.clone()))
            .collect();

        let mut series = Vec::new();
        let mut previous: Option<f64> = None;
        let mut date = start;
        while date <= end {
            let heat = self.heat_for_day(&by_date, date);
            series.push(WindowedHeat {
                entity_id: entity_id.to_string(),
                date,
                heat,
                delta: previous.map(|p| heat - p),
                counters: by_date.get(&date).cloned().unwrap_or(DailyCounters {
                    date,
                    ..DailyCounters::default()
                }),
            });
            previous = Some(heat);
            match date.checked_add_days(Days::new(1)) {
                Some(next) => date = next,
                None => break,
            }
        }
        series
    }
}
