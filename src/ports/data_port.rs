//! Data access port trait.

use crate::domain::error::MacdError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Closing prices for `symbol` over `[start_date, end_date)`.
    /// Fails with `DataUnavailable` when nothing can be supplied.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, MacdError>;

    fn list_symbols(&self) -> Result<Vec<String>, MacdError>;

    /// First date, last date and bar count of everything stored for `symbol`.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MacdError>;
}
