//! Configuration access port trait.

use crate::domain::error::ActiveDcaError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    /// Like `get_double`, but a present value that does not parse is an error
    /// instead of silently falling back to `default`.
    fn require_double(&self, section: &str, key: &str, default: f64) -> Result<f64, ActiveDcaError> {
        match self.get_string(section, key) {
            None => Ok(default),
            Some(raw) if raw.trim().is_empty() => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| ActiveDcaError::ConfigInvalid {
                    section: section.to_string(),
                    key: key.to_string(),
                    reason: format!("'{}' is not a number", raw.trim()),
                }),
        }
    }

    /// Integer counterpart of `require_double`.
    fn require_int(&self, section: &str, key: &str, default: i64) -> Result<i64, ActiveDcaError> {
        match self.get_string(section, key) {
            None => Ok(default),
            Some(raw) if raw.trim().is_empty() => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ActiveDcaError::ConfigInvalid {
                    section: section.to_string(),
                    key: key.to_string(),
                    reason: format!("'{}' is not an integer", raw.trim()),
                }),
        }
    }
}
