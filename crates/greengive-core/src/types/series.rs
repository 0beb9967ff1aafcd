//! Date ranges and rate series.

use serde::{Deserialize, Serialize};

use super::{Date, RateObservation};
use crate::error::{CoreError, CoreResult};

/// Inclusive span of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Creates a range from `start` to `end`, both inclusive.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidRange` if `start` is after `end`.
    pub fn new(start: Date, end: Date) -> CoreResult<Self> {
        if start > end {
            return Err(CoreError::invalid_range(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// First day of the range.
    pub fn start(&self) -> Date {
        self.start
    }

    /// Last day of the range.
    pub fn end(&self) -> Date {
        self.end
    }

    /// Number of calendar days covered, always at least one.
    pub fn num_days(&self) -> usize {
        usize::try_from(self.end - self.start).unwrap_or(0) + 1
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every calendar day of the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = Date> {
        let start = self.start;
        (0..self.num_days()).map(move |offset| start.add_days(offset as i64))
    }
}

/// Observations sorted ascending by date with unique dates.
///
/// [`RateSeries::for_range`] additionally guarantees one observation for
/// every day of a [`DateRange`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RateSeries {
    observations: Vec<RateObservation>,
}

impl RateSeries {
    /// Creates a series from observations already in ascending date order.
    ///
    /// An empty series is allowed.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidSeries` if dates are not strictly ascending.
    pub fn new(observations: Vec<RateObservation>) -> CoreResult<Self> {
        if let Some(pair) = observations.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(CoreError::invalid_series(format!(
                "dates must be strictly ascending: {} followed by {}",
                pair[0].date, pair[1].date
            )));
        }
        Ok(Self { observations })
    }

    /// Creates a gap-free series covering every day of `range`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidSeries` unless observation `i` is dated
    /// `range.start() + i` for every day of the range.
    pub fn for_range(range: DateRange, observations: Vec<RateObservation>) -> CoreResult<Self> {
        if observations.len() != range.num_days() {
            return Err(CoreError::invalid_series(format!(
                "expected {} observations for {}..={}, got {}",
                range.num_days(),
                range.start(),
                range.end(),
                observations.len()
            )));
        }
        if let Some((expected, obs)) = range
            .days()
            .zip(observations.iter())
            .find(|(expected, obs)| obs.date != *expected)
        {
            return Err(CoreError::invalid_series(format!(
                "missing {expected}, found {} in its place",
                obs.date
            )));
        }
        Ok(Self { observations })
    }

    /// Observations in ascending date order.
    pub fn observations(&self) -> &[RateObservation] {
        &self.observations
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Earliest observation.
    pub fn first(&self) -> Option<&RateObservation> {
        self.observations.first()
    }

    /// Latest observation.
    pub fn last(&self) -> Option<&RateObservation> {
        self.observations.last()
    }

    /// Iterate observations in ascending date order.
    pub fn iter(&self) -> std::slice::Iter<'_, RateObservation> {
        self.observations.iter()
    }
}

impl<'a> IntoIterator for &'a RateSeries {
    type Item = &'a RateObservation;
    type IntoIter = std::slice::Iter<'a, RateObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
