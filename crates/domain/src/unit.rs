use std::{fmt, slice::Iter};

use crate::round_to_two_places;

/// Weight units, converted through kilogram as the canonical base.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    const KG_PER_LBS: f32 = 1.0 / 2.20462;

    pub fn iter() -> Iter<'static, WeightUnit> {
        static UNITS: [WeightUnit; 2] = [WeightUnit::Kg, WeightUnit::Lbs];
        UNITS.iter()
    }

    fn kg_ratio(self) -> f32 {
        match self {
            WeightUnit::Kg => 1.0,
            WeightUnit::Lbs => WeightUnit::KG_PER_LBS,
        }
    }

    #[must_use]
    pub fn convert(self, value: f32, to: WeightUnit) -> f32 {
        if !is_positive(value) {
            return 0.0;
        }
        if self == to {
            return value;
        }
        value * self.kg_ratio() / to.kg_ratio()
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightUnit::Kg => write!(f, "kg"),
            WeightUnit::Lbs => write!(f, "lbs"),
        }
    }
}

impl TryFrom<&str> for WeightUnit {
    type Error = UnitError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "kg" => Ok(WeightUnit::Kg),
            "lbs" => Ok(WeightUnit::Lbs),
            _ => Err(UnitError::UnknownWeightUnit(value.to_string())),
        }
    }
}

/// Distance units, converted through meter as the canonical base.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum DistanceUnit {
    #[default]
    Km,
    M,
    Mi,
    Ft,
    Yd,
}

impl DistanceUnit {
    pub fn iter() -> Iter<'static, DistanceUnit> {
        static UNITS: [DistanceUnit; 5] = [
            DistanceUnit::Km,
            DistanceUnit::M,
            DistanceUnit::Mi,
            DistanceUnit::Ft,
            DistanceUnit::Yd,
        ];
        UNITS.iter()
    }

    fn meter_ratio(self) -> f32 {
        match self {
            DistanceUnit::Km => 1000.0,
            DistanceUnit::M => 1.0,
            DistanceUnit::Mi => 1609.34,
            DistanceUnit::Ft => 0.3048,
            DistanceUnit::Yd => 0.9144,
        }
    }

    #[must_use]
    pub fn convert(self, value: f32, to: DistanceUnit) -> f32 {
        if !is_positive(value) {
            return 0.0;
        }
        if self == to {
            return value;
        }
        value * self.meter_ratio() / to.meter_ratio()
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceUnit::Km => write!(f, "km"),
            DistanceUnit::M => write!(f, "m"),
            DistanceUnit::Mi => write!(f, "mi"),
            DistanceUnit::Ft => write!(f, "ft"),
            DistanceUnit::Yd => write!(f, "yd"),
        }
    }
}

impl TryFrom<&str> for DistanceUnit {
    type Error = UnitError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "km" => Ok(DistanceUnit::Km),
            "m" => Ok(DistanceUnit::M),
            "mi" => Ok(DistanceUnit::Mi),
            "ft" => Ok(DistanceUnit::Ft),
            "yd" => Ok(DistanceUnit::Yd),
            _ => Err(UnitError::UnknownDistanceUnit(value.to_string())),
        }
    }
}

/// Speed units, converted through meters per second.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum SpeedUnit {
    #[default]
    Kmh,
    Ms,
    Mph,
    Fps,
}

impl SpeedUnit {
    pub fn iter() -> Iter<'static, SpeedUnit> {
        static UNITS: [SpeedUnit; 4] = [
            SpeedUnit::Kmh,
            SpeedUnit::Ms,
            SpeedUnit::Mph,
            SpeedUnit::Fps,
        ];
        UNITS.iter()
    }

    fn meters_per_second_ratio(self) -> f32 {
        match self {
            SpeedUnit::Kmh => 1.0 / 3.6,
            SpeedUnit::Ms => 1.0,
            SpeedUnit::Mph => 1.0 / 2.23694,
            SpeedUnit::Fps => 1.0 / 3.28084,
        }
    }

    #[must_use]
    pub fn convert(self, value: f32, to: SpeedUnit) -> f32 {
        if !is_positive(value) {
            return 0.0;
        }
        if self == to {
            return value;
        }
        value * self.meters_per_second_ratio() / to.meters_per_second_ratio()
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedUnit::Kmh => write!(f, "km/h"),
            SpeedUnit::Ms => write!(f, "m/s"),
            SpeedUnit::Mph => write!(f, "mph"),
            SpeedUnit::Fps => write!(f, "fps"),
        }
    }
}

impl TryFrom<&str> for SpeedUnit {
    type Error = UnitError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "km/h" => Ok(SpeedUnit::Kmh),
            "m/s" => Ok(SpeedUnit::Ms),
            "mph" => Ok(SpeedUnit::Mph),
            "fps" => Ok(SpeedUnit::Fps),
            _ => Err(UnitError::UnknownSpeedUnit(value.to_string())),
        }
    }
}

/// Pace units, converted through seconds per meter.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum PaceUnit {
    #[default]
    MinPerKm,
    SPerM,
    MinPerMi,
    SPerYd,
}

impl PaceUnit {
    pub fn iter() -> Iter<'static, PaceUnit> {
        static UNITS: [PaceUnit; 4] = [
            PaceUnit::MinPerKm,
            PaceUnit::SPerM,
            PaceUnit::MinPerMi,
            PaceUnit::SPerYd,
        ];
        UNITS.iter()
    }

    fn seconds_per_meter_ratio(self) -> f32 {
        match self {
            PaceUnit::MinPerKm => 60.0 / 1000.0,
            PaceUnit::SPerM => 1.0,
            PaceUnit::MinPerMi => 60.0 / 1609.34,
            PaceUnit::SPerYd => 1.0 / 0.9144,
        }
    }

    #[must_use]
    pub fn convert(self, value: f32, to: PaceUnit) -> f32 {
        if !is_positive(value) {
            return 0.0;
        }
        if self == to {
            return value;
        }
        value * self.seconds_per_meter_ratio() / to.seconds_per_meter_ratio()
    }
}

impl fmt::Display for PaceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaceUnit::MinPerKm => write!(f, "min/km"),
            PaceUnit::SPerM => write!(f, "s/m"),
            PaceUnit::MinPerMi => write!(f, "min/mi"),
            PaceUnit::SPerYd => write!(f, "s/yd"),
        }
    }
}

impl TryFrom<&str> for PaceUnit {
    type Error = UnitError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "min/km" => Ok(PaceUnit::MinPerKm),
            "s/m" => Ok(PaceUnit::SPerM),
            "min/mi" => Ok(PaceUnit::MinPerMi),
            "s/yd" => Ok(PaceUnit::SPerYd),
            _ => Err(UnitError::UnknownPaceUnit(value.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum UnitError {
    #[error("Unknown weight unit: {0}")]
    UnknownWeightUnit(String),
    #[error("Unknown distance unit: {0}")]
    UnknownDistanceUnit(String),
    #[error("Unknown speed unit: {0}")]
    UnknownSpeedUnit(String),
    #[error("Unknown pace unit: {0}")]
    UnknownPaceUnit(String),
}

/// Converts a weight between unit strings.
///
/// Non-positive or non-finite input yields 0. An unrecognized unit on either
/// side is treated as a no-op conversion and the value is returned unchanged.
#[must_use]
pub fn convert_weight(value: f32, from: &str, to: &str) -> f32 {
    if !is_positive(value) {
        return 0.0;
    }
    match (WeightUnit::try_from(from), WeightUnit::try_from(to)) {
        (Ok(from), Ok(to)) => from.convert(value, to),
        _ => value,
    }
}

/// Converts a distance between unit strings, with the same lenient contract
/// as [`convert_weight`].
#[must_use]
pub fn convert_distance(value: f32, from: &str, to: &str) -> f32 {
    if !is_positive(value) {
        return 0.0;
    }
    match (DistanceUnit::try_from(from), DistanceUnit::try_from(to)) {
        (Ok(from), Ok(to)) => from.convert(value, to),
        _ => value,
    }
}

#[must_use]
pub fn convert_speed(value: f32, from: &str, to: &str) -> f32 {
    if !is_positive(value) {
        return 0.0;
    }
    match (SpeedUnit::try_from(from), SpeedUnit::try_from(to)) {
        (Ok(from), Ok(to)) => from.convert(value, to),
        _ => value,
    }
}

#[must_use]
pub fn convert_pace(value: f32, from: &str, to: &str) -> f32 {
    if !is_positive(value) {
        return 0.0;
    }
    match (PaceUnit::try_from(from), PaceUnit::try_from(to)) {
        (Ok(from), Ok(to)) => from.convert(value, to),
        _ => value,
    }
}

/// Average speed over a distance covered in the given time, rounded to two
/// places. Yields 0 for non-positive distance or time.
#[must_use]
pub fn speed_from_distance_and_time(
    distance: f32,
    distance_unit: DistanceUnit,
    time_in_seconds: f32,
    speed_unit: SpeedUnit,
) -> f32 {
    if !is_positive(distance) || !is_positive(time_in_seconds) {
        return 0.0;
    }
    let meters_per_second = distance * distance_unit.meter_ratio() / time_in_seconds;
    round_to_two_places(meters_per_second / speed_unit.meters_per_second_ratio())
}

/// Average pace over a distance covered in the given time, rounded to two
/// places. Yields 0 for non-positive distance or time.
#[must_use]
pub fn pace_from_distance_and_time(
    distance: f32,
    distance_unit: DistanceUnit,
    time_in_seconds: f32,
    pace_unit: PaceUnit,
) -> f32 {
    if !is_positive(distance) || !is_positive(time_in_seconds) {
        return 0.0;
    }
    let seconds_per_meter = time_in_seconds / (distance * distance_unit.meter_ratio());
    round_to_two_places(seconds_per_meter / pace_unit.seconds_per_meter_ratio())
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1.0, "kg", "lbs", 2.20462)]
    #[case(2.20462, "lbs", "kg", 1.0)]
    #[case(100.0, "kg", "kg", 100.0)]
    #[case(20.0, "kg", "stone", 20.0)]
    #[case(20.0, "st", "lbs", 20.0)]
    fn test_convert_weight(
        #[case] value: f32,
        #[case] from: &str,
        #[case] to: &str,
        #[case] expected: f32,
    ) {
        assert_approx_eq!(convert_weight(value, from, to), expected, 0.001);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f32::NAN)]
    #[case(f32::INFINITY)]
    fn test_convert_weight_invalid_value(#[case] value: f32) {
        assert_eq!(convert_weight(value, "kg", "lbs"), 0.0);
    }

    #[rstest]
    fn test_convert_weight_round_trip(#[values(0.5, 1.0, 20.0, 60.0, 110.0)] value: f32) {
        assert_approx_eq!(
            convert_weight(convert_weight(value, "kg", "lbs"), "lbs", "kg"),
            value,
            0.005
        );
    }

    #[rstest]
    #[case(1.0, "km", "m", 1000.0)]
    #[case(1.0, "mi", "m", 1609.34)]
    #[case(1.0, "yd", "m", 0.9144)]
    #[case(1.0, "ft", "m", 0.3048)]
    #[case(1.0, "mi", "km", 1.609_34)]
    #[case(5.0, "km", "mi", 3.106_86)]
    #[case(3.0, "furlong", "m", 3.0)]
    fn test_convert_distance(
        #[case] value: f32,
        #[case] from: &str,
        #[case] to: &str,
        #[case] expected: f32,
    ) {
        assert_approx_eq!(convert_distance(value, from, to), expected, 0.001);
    }

    #[rstest]
    #[case(36.0, "km/h", "m/s", 10.0)]
    #[case(10.0, "m/s", "km/h", 36.0)]
    #[case(1.0, "mph", "km/h", 1.609_34)]
    #[case(1.0, "fps", "m/s", 0.3048)]
    fn test_convert_speed(
        #[case] value: f32,
        #[case] from: &str,
        #[case] to: &str,
        #[case] expected: f32,
    ) {
        assert_approx_eq!(convert_speed(value, from, to), expected, 0.001);
    }

    #[rstest]
    #[case(6.0, "min/km", "s/m", 0.36)]
    #[case(0.36, "s/m", "min/km", 6.0)]
    #[case(6.0, "min/km", "min/mi", 9.656)]
    fn test_convert_pace(
        #[case] value: f32,
        #[case] from: &str,
        #[case] to: &str,
        #[case] expected: f32,
    ) {
        assert_approx_eq!(convert_pace(value, from, to), expected, 0.001);
    }

    #[rstest]
    #[case(10.0, DistanceUnit::Km, 3600.0, SpeedUnit::Kmh, 10.0)]
    #[case(100.0, DistanceUnit::M, 10.0, SpeedUnit::Ms, 10.0)]
    #[case(0.0, DistanceUnit::Km, 3600.0, SpeedUnit::Kmh, 0.0)]
    #[case(10.0, DistanceUnit::Km, 0.0, SpeedUnit::Kmh, 0.0)]
    fn test_speed_from_distance_and_time(
        #[case] distance: f32,
        #[case] distance_unit: DistanceUnit,
        #[case] time_in_seconds: f32,
        #[case] speed_unit: SpeedUnit,
        #[case] expected: f32,
    ) {
        assert_eq!(
            speed_from_distance_and_time(distance, distance_unit, time_in_seconds, speed_unit),
            expected
        );
    }

    #[rstest]
    #[case(10.0, DistanceUnit::Km, 3600.0, PaceUnit::MinPerKm, 6.0)]
    #[case(1000.0, DistanceUnit::M, 360.0, PaceUnit::SPerM, 0.36)]
    #[case(-1.0, DistanceUnit::M, 360.0, PaceUnit::SPerM, 0.0)]
    fn test_pace_from_distance_and_time(
        #[case] distance: f32,
        #[case] distance_unit: DistanceUnit,
        #[case] time_in_seconds: f32,
        #[case] pace_unit: PaceUnit,
        #[case] expected: f32,
    ) {
        assert_eq!(
            pace_from_distance_and_time(distance, distance_unit, time_in_seconds, pace_unit),
            expected
        );
    }

    #[test]
    fn test_unit_parsing() {
        for unit in WeightUnit::iter() {
            assert_eq!(WeightUnit::try_from(unit.to_string().as_str()), Ok(*unit));
        }
        for unit in DistanceUnit::iter() {
            assert_eq!(DistanceUnit::try_from(unit.to_string().as_str()), Ok(*unit));
        }
        for unit in SpeedUnit::iter() {
            assert_eq!(SpeedUnit::try_from(unit.to_string().as_str()), Ok(*unit));
        }
        for unit in PaceUnit::iter() {
            assert_eq!(PaceUnit::try_from(unit.to_string().as_str()), Ok(*unit));
        }
        assert_eq!(
            WeightUnit::try_from("stone"),
            Err(UnitError::UnknownWeightUnit("stone".to_string()))
        );
    }
}
