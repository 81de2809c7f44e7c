//! Report generation port trait.

use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::MacdError;

/// Consumer of a finished backtest: charts, exports. Performs no computation
/// on the series it is handed.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult<'_>,
        symbol: &str,
        output_path: &Path,
    ) -> Result<(), MacdError>;
}
