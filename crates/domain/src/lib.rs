#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod calc_string;
pub mod calculation;
pub mod error;
pub mod exercise;
pub mod expression;
pub mod name;
pub mod plates;
pub mod preset;
pub mod service;
pub mod unit;
pub mod validation;

pub use calc_string::{
    ParsedCalculation, SkipReason, SkippedToken, parse_calculation_string, serialize_segment,
    update_calculation_string,
};
pub use calculation::{
    CalculationItem, CalculationItemKind, CalculationList, Multiplier, MultiplierError,
};
pub use error::{CreateError, DeleteError, ReadError, StorageError, SyncError, UpdateError};
pub use exercise::{Exercise, ExerciseID, ExerciseRepository, ExerciseService};
pub use expression::{ExpressionError, evaluate_expression};
pub use name::{Name, NameError};
pub use plates::{
    DEFAULT_PLATE_WEIGHTS_KG, DEFAULT_PLATE_WEIGHTS_LBS, Handle, NumHandles, PlateBreakdown,
    PlateCollection, compute_plate_breakdown, format_available_plates,
};
pub use preset::{
    DistancePreset, DistancePresetRepository, EquipmentWeight, EquipmentWeightRepository,
    PresetID, PresetService, PresetsType, default_distance_presets, default_equipment_weights,
};
pub use service::Service;
pub use unit::{
    DistanceUnit, PaceUnit, SpeedUnit, UnitError, WeightUnit, convert_distance, convert_pace,
    convert_speed, convert_weight, pace_from_distance_and_time, speed_from_distance_and_time,
};

/// Rounds to two decimal places.
///
/// All user-facing and persisted values go through this at the point they are
/// stored or displayed, never at intermediate steps.
#[must_use]
pub fn round_to_two_places(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Formats a value with at most two fractional digits, trailing zeros
/// trimmed. Serialization goes through this rather than `Display`, whose
/// shortest-round-trip output can exceed two digits for magnitudes where
/// the rounded value is not exactly representable.
#[must_use]
pub fn format_two_places(value: f32) -> String {
    let mut text = format!("{:.2}", round_to_two_places(value));
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    text
}
