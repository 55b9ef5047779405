use crate::error::{GeometryError, Result};

/// Default coincidence tolerance in document units.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Tunable policies of the connectivity engine.
#[derive(Debug, Clone, Copy)]
pub struct ConnectivitySettings {
    tolerance: f64,
    auto_merge: bool,
    connect_crossings: bool,
}

impl ConnectivitySettings {
    /// Creates settings with the given coincidence tolerance and default policies.
    ///
    /// # Errors
    ///
    /// Returns an error if `tolerance` is not a finite, positive number.
    pub fn new(tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(GeometryError::InvalidValue {
                name: "tolerance",
                value: tolerance,
            }
            .into());
        }
        Ok(Self {
            tolerance,
            ..Self::default()
        })
    }

    /// Enables or disables merging of wires whose endpoints an edit brings together.
    #[must_use]
    pub fn with_auto_merge(mut self, enabled: bool) -> Self {
        self.auto_merge = enabled;
        self
    }

    /// Enables or disables turning segment crossings into junctions.
    #[must_use]
    pub fn with_connect_crossings(mut self, enabled: bool) -> Self {
        self.connect_crossings = enabled;
        self
    }

    /// Returns the coincidence tolerance.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[must_use]
    pub fn auto_merge(&self) -> bool {
        self.auto_merge
    }

    #[must_use]
    pub fn connect_crossings(&self) -> bool {
        self.connect_crossings
    }
}

impl Default for ConnectivitySettings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            auto_merge: true,
            connect_crossings: true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_with_valid_tolerance() {
        let settings = ConnectivitySettings::new(0.5).unwrap();
        assert!((settings.tolerance() - 0.5).abs() < f64::EPSILON);
        assert!(settings.auto_merge());
        assert!(settings.connect_crossings());
    }

    #[test]
    fn new_with_zero_tolerance_fails() {
        assert!(ConnectivitySettings::new(0.0).is_err());
    }

    #[test]
    fn new_with_nan_tolerance_fails() {
        assert!(ConnectivitySettings::new(f64::NAN).is_err());
    }

    #[test]
    fn policies_can_be_disabled() {
        let settings = ConnectivitySettings::default()
            .with_auto_merge(false)
            .with_connect_crossings(false);
        assert!(!settings.auto_merge());
        assert!(!settings.connect_crossings());
    }
}
