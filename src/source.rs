//! Measurement sources.
//!
//! A source is whatever produces the value to report: a file, a local API, a database or a
//! fieldbus register. Implement [`MeasurementSource`] for it, or pass a closure.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("value could not be parsed: {0}")]
    Parse(String),

    #[error("{0}")]
    Other(String),
}

impl From<std::num::ParseFloatError> for AcquisitionError {
    fn from(error: std::num::ParseFloatError) -> Self {
        Self::Parse(error.to_string())
    }
}

/// Produces the current measurement. Called once per cycle.
pub trait MeasurementSource {
    fn produce(&mut self) -> Result<f64, AcquisitionError>;
}

impl<F> MeasurementSource for F
where
    F: FnMut() -> Result<f64, AcquisitionError>,
{
    fn produce(&mut self) -> Result<f64, AcquisitionError> {
        self()
    }
}

/// Always reports the same value. Replace it with a real source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixed(pub f64);

impl MeasurementSource for Fixed {
    fn produce(&mut self) -> Result<f64, AcquisitionError> {
        Ok(self.0)
    }
}
