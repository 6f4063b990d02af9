//! Report port: where a finished bundle goes.

use crate::domain::bundle::ChartBundle;
use crate::domain::error::TradelensError;

pub trait ReportPort {
    fn write(&self, bundle: &ChartBundle) -> Result<(), TradelensError>;
}
