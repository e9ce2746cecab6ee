//! Unit normalization and conversion
//!
//! XDR readings carry one-letter unit codes. The enricher normalizes them
//! into tagged [`ValueTuple`]s and converts each into the record's
//! declared unit system through the [`UnitConverter`] seam.

use serde::{Deserialize, Serialize};

/// Unit system a record declares its values in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    /// US customary units (degree_F, inHg).
    Us,
    /// Metric units (degree_C, millibar).
    #[default]
    Metric,
    /// Metric with weather-station conventions (degree_C, millibar).
    MetricWx,
}

/// Normalized measurement unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Degrees Celsius
    DegreeC,
    /// Degrees Fahrenheit
    DegreeF,
    /// Millibars
    Millibar,
    /// Inches of mercury
    InHg,
}

/// Measurement category a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitGroup {
    /// group_temperature
    Temperature,
    /// group_pressure
    Pressure,
}

impl UnitSystem {
    /// The unit this system expresses `group` in.
    pub fn unit_for(self, group: UnitGroup) -> Unit {
        match (self, group) {
            (UnitSystem::Us, UnitGroup::Temperature) => Unit::DegreeF,
            (UnitSystem::Us, UnitGroup::Pressure) => Unit::InHg,
            (_, UnitGroup::Temperature) => Unit::DegreeC,
            (_, UnitGroup::Pressure) => Unit::Millibar,
        }
    }
}

/// A value tagged with its unit and unit group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueTuple {
    /// The numeric value.
    pub value: f64,
    /// The unit the value is expressed in.
    pub unit: Unit,
    /// The unit group the unit belongs to.
    pub group: UnitGroup,
}

/// Maps an XDR unit code onto a normalized value tuple.
///
/// Bars are scaled to millibars here so downstream conversion only ever
/// sees one incoming pressure unit. Unit codes outside `C`, `F`, `B` are
/// not recognized and the whole reading is skipped.
pub fn normalize(value: f64, unit_code: &str) -> Option<ValueTuple> {
    match unit_code {
        "C" => Some(ValueTuple {
            value,
            unit: Unit::DegreeC,
            group: UnitGroup::Temperature,
        }),
        "F" => Some(ValueTuple {
            value,
            unit: Unit::DegreeF,
            group: UnitGroup::Temperature,
        }),
        "B" => Some(ValueTuple {
            value: value * 1000.0,
            unit: Unit::Millibar,
            group: UnitGroup::Pressure,
        }),
        _ => None,
    }
}

/// Conversion of a tagged value into a target unit system.
pub trait UnitConverter: Send + Sync {
    /// Converts `vt` into the unit the target system uses for its group.
    ///
    /// `None` means the converter does not cover the pairing; the caller
    /// drops the reading.
    fn convert(&self, vt: ValueTuple, target: UnitSystem) -> Option<f64>;
}

/// Millibars per inch of mercury.
const MBAR_PER_INHG: f64 = 33.863886666667;

/// Standard converter covering the temperature and pressure groups.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConverter;

impl UnitConverter for StdConverter {
    fn convert(&self, vt: ValueTuple, target: UnitSystem) -> Option<f64> {
        convert_value(vt.value, vt.unit, target.unit_for(vt.group))
    }
}

fn convert_value(value: f64, from: Unit, to: Unit) -> Option<f64> {
    if from == to {
        return Some(value);
    }
    match (from, to) {
        (Unit::DegreeC, Unit::DegreeF) => Some(value * 9.0 / 5.0 + 32.0),
        (Unit::DegreeF, Unit::DegreeC) => Some((value - 32.0) * 5.0 / 9.0),
        (Unit::Millibar, Unit::InHg) => Some(value / MBAR_PER_INHG),
        (Unit::InHg, Unit::Millibar) => Some(value * MBAR_PER_INHG),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_celsius() {
        let vt = normalize(23.4, "C").unwrap();
        assert_eq!(vt.unit, Unit::DegreeC);
        assert_eq!(vt.group, UnitGroup::Temperature);
        assert!((vt.value - 23.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_bars_scales_to_millibar() {
        let vt = normalize(1.013, "B").unwrap();
        assert_eq!(vt.unit, Unit::Millibar);
        assert_eq!(vt.group, UnitGroup::Pressure);
        assert!((vt.value - 1013.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_unknown_code_is_skipped() {
        assert!(normalize(1.0, "K").is_none());
        assert!(normalize(1.0, "").is_none());
        assert!(normalize(1.0, "CC").is_none());
    }

    #[test]
    fn test_convert_celsius_to_us() {
        let vt = normalize(23.4, "C").unwrap();
        let f = StdConverter.convert(vt, UnitSystem::Us).unwrap();
        assert!((f - 74.12).abs() < 1e-9);
    }

    #[test]
    fn test_convert_is_identity_within_system() {
        let vt = normalize(23.4, "C").unwrap();
        let c = StdConverter.convert(vt, UnitSystem::Metric).unwrap();
        assert!((c - 23.4).abs() < f64::EPSILON);
        let c = StdConverter.convert(vt, UnitSystem::MetricWx).unwrap();
        assert!((c - 23.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_convert_fahrenheit_to_metric() {
        let vt = normalize(32.0, "F").unwrap();
        let c = StdConverter.convert(vt, UnitSystem::Metric).unwrap();
        assert!(c.abs() < f64::EPSILON);
    }

    #[test]
    fn test_convert_pressure_to_us() {
        let vt = normalize(1.01325, "B").unwrap();
        let inhg = StdConverter.convert(vt, UnitSystem::Us).unwrap();
        assert!((inhg - 29.92).abs() < 0.01);
    }
}
