use crate::error::DataError;
use chrono::{DateTime, Utc};
use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};

/// Native timestamp unit of an exchange candle API.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
}

impl TimeUnit {
    /// Number of native units per second.
    pub fn scale(&self) -> i64 {
        match self {
            TimeUnit::Seconds => 1,
            TimeUnit::Milliseconds => 1000,
        }
    }

    /// Express a [`DateTime`] as an integer timestamp in this unit.
    pub fn timestamp(&self, time: DateTime<Utc>) -> i64 {
        match self {
            TimeUnit::Seconds => time.timestamp(),
            TimeUnit::Milliseconds => time.timestamp_millis(),
        }
    }
}

/// One page of a paginated history request, `[start, end]` in the exchange's native unit.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Constructor,
    Display,
)]
#[display("{start}-{end}")]
pub struct Window {
    pub start: i64,
    pub end: i64,
}

/// Splits `[start, end)` into contiguous request [`Window`]s of `resolution * page_size` each.
///
/// Boundaries are `start, start + step, start + 2 * step, ...` for every value strictly below
/// `end`. Each consecutive pair of boundaries is one window, so the first boundary only seeds the
/// first window and is never a window end. Any tail between the last boundary and `end` is not
/// covered.
///
/// ```text
/// start=0 end=35 step=10  ->  boundaries 0,10,20,30  ->  windows (0,10) (10,20) (20,30)
/// ```
#[derive(Debug, Clone)]
pub struct IntervalPaginator {
    next: Option<i64>,
    end: i64,
    step: i64,
    previous: Option<i64>,
}

impl IntervalPaginator {
    /// Construct an [`IntervalPaginator`] over native timestamps `[start, end)`.
    ///
    /// `resolution` is the candle width in seconds and `page_size` the number of candles per
    /// request; both are scaled into the provided [`TimeUnit`].
    pub fn new(
        start: i64,
        end: i64,
        resolution: u32,
        page_size: u32,
        unit: TimeUnit,
    ) -> Result<Self, DataError> {
        if resolution == 0 {
            return Err(DataError::InvalidPagination(
                "resolution must be greater than zero".to_string(),
            ));
        }
        if page_size == 0 {
            return Err(DataError::InvalidPagination(
                "page size must be greater than zero".to_string(),
            ));
        }

        let step = i64::from(resolution)
            .checked_mul(i64::from(page_size))
            .and_then(|step| step.checked_mul(unit.scale()))
            .ok_or_else(|| {
                DataError::InvalidPagination(format!(
                    "step of {resolution}s x {page_size} overflows"
                ))
            })?;

        Ok(Self {
            next: Some(start),
            end,
            step,
            previous: None,
        })
    }

    /// Construct an [`IntervalPaginator`] from [`DateTime`]s, converting them into `unit`.
    pub fn from_range(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        resolution: u32,
        page_size: u32,
        unit: TimeUnit,
    ) -> Result<Self, DataError> {
        Self::new(
            unit.timestamp(start),
            unit.timestamp(end),
            resolution,
            page_size,
            unit,
        )
    }

    /// Native step between two boundaries.
    pub fn step(&self) -> i64 {
        self.step
    }

    /// Next boundary strictly below `end`, advancing the cursor.
    fn next_boundary(&mut self) -> Option<i64> {
        let boundary = self.next.filter(|boundary| *boundary < self.end)?;
        self.next = boundary.checked_add(self.step);
        Some(boundary)
    }
}

impl Iterator for IntervalPaginator {
    type Item = Window;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current = self.next_boundary()?;
            if let Some(previous) = self.previous.replace(current) {
                return Some(Window::new(previous, current));
            }
        }
    }
}
