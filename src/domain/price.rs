//! Closing-price series, the input to the pipeline.

use crate::domain::error::MacdError;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Time-ordered closing prices: strictly increasing dates, finite positive closes.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, MacdError> {
        for (i, point) in points.iter().enumerate() {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(MacdError::InvalidSeries {
                    reason: format!(
                        "close on {} must be finite and positive, got {}",
                        point.date, point.close
                    ),
                });
            }
            if i > 0 && points[i - 1].date >= point.date {
                return Err(MacdError::InvalidSeries {
                    reason: format!(
                        "dates must be strictly increasing: {} follows {}",
                        point.date,
                        points[i - 1].date
                    ),
                });
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}
