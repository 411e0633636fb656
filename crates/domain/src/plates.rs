//! Plate-loading calculator: which physical plates to put on a handle to
//! reach a target weight.
//!
//! The breakdown is greedy over descending denominations. That is minimal
//! for canonical plate sets (standard gyms), but not guaranteed optimal for
//! arbitrary denomination sets; this is a known, accepted limitation.

use std::fmt;

use crate::{
    Name,
    preset::{EquipmentWeight, PresetID},
    round_to_two_places,
    unit::WeightUnit,
};

pub const DEFAULT_PLATE_WEIGHTS_KG: [f32; 7] = [1.25, 2.5, 5.0, 10.0, 15.0, 20.0, 25.0];
pub const DEFAULT_PLATE_WEIGHTS_LBS: [f32; 6] = [2.5, 5.0, 10.0, 25.0, 35.0, 45.0];

/// The bar or apparatus plates are loaded onto. Contributes its own weight
/// to the target before plates are computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub weight: f32,
    pub unit: WeightUnit,
}

impl From<&EquipmentWeight> for Handle {
    fn from(equipment: &EquipmentWeight) -> Self {
        Self {
            weight: equipment.weight,
            unit: equipment.unit,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumHandles {
    #[default]
    One,
    Two,
}

impl NumHandles {
    /// Loadable sides: one handle has two, two handles double that.
    #[must_use]
    pub fn plate_factor(self) -> u32 {
        match self {
            NumHandles::One => 2,
            NumHandles::Two => 4,
        }
    }

    #[must_use]
    pub fn handle_count(self) -> u32 {
        match self {
            NumHandles::One => 1,
            NumHandles::Two => 2,
        }
    }
}

impl TryFrom<u32> for NumHandles {
    type Error = NumHandlesError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NumHandles::One),
            2 => Ok(NumHandles::Two),
            _ => Err(NumHandlesError::OutOfRange(value)),
        }
    }
}

impl fmt::Display for NumHandles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.handle_count())
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NumHandlesError {
    #[error("Number of handles must be 1 or 2 (got {0})")]
    OutOfRange(u32),
}

/// A saved plate-calculator configuration: a handle plus the plate
/// denominations available in a rack.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateCollection {
    pub id: PresetID,
    pub name: Name,
    pub handle: Option<EquipmentWeight>,
    pub num_handles: NumHandles,
    pub available_plates: Vec<f32>,
    pub unit: WeightUnit,
}

impl PlateCollection {
    #[must_use]
    pub fn breakdown(&self, target_weight: f32) -> PlateBreakdown {
        compute_plate_breakdown(
            target_weight,
            self.handle.as_ref().map(Handle::from).as_ref(),
            self.num_handles,
            &self.available_plates,
        )
    }
}

/// Result of a plate computation. Counts are totals across both sides and,
/// with two handles, across both handles.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateBreakdown {
    plate_map: Vec<(f32, u32)>,
    pub target_weight: f32,
    pub remaining_weight: f32,
    pub is_one_handle: bool,
}

impl PlateBreakdown {
    /// Plate counts ordered by descending denomination.
    #[must_use]
    pub fn plate_map(&self) -> &[(f32, u32)] {
        &self.plate_map
    }

    #[must_use]
    pub fn count_for(&self, plate: f32) -> u32 {
        self.plate_map
            .iter()
            .find(|(weight, _)| (*weight - plate).abs() < f32::EPSILON)
            .map_or(0, |(_, count)| *count)
    }

    /// True when the available denominations matched the target exactly.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.remaining_weight == 0.0
    }
}

impl Default for PlateBreakdown {
    fn default() -> Self {
        Self {
            plate_map: Vec::new(),
            target_weight: 0.0,
            remaining_weight: 0.0,
            is_one_handle: true,
        }
    }
}

/// Computes the greedy plate breakdown for a target weight.
///
/// Total over its inputs: when the preconditions are unmet (no handle,
/// non-positive target, nothing left to load once the handle weight is
/// subtracted) an empty breakdown is returned instead of an error.
#[must_use]
pub fn compute_plate_breakdown(
    target_weight: f32,
    handle: Option<&Handle>,
    num_handles: NumHandles,
    available_plates: &[f32],
) -> PlateBreakdown {
    let Some(handle) = handle else {
        return PlateBreakdown::default();
    };
    if !target_weight.is_finite() || target_weight <= 0.0 {
        return PlateBreakdown::default();
    }

    #[allow(clippy::cast_precision_loss)]
    let handle_weight = handle.weight * num_handles.handle_count() as f32;
    let weight_to_load = target_weight - handle_weight;
    if weight_to_load <= 0.0 {
        return PlateBreakdown::default();
    }

    let plate_factor = num_handles.plate_factor();
    #[allow(clippy::cast_precision_loss)]
    let mut weight_per_side = weight_to_load / plate_factor as f32;

    let mut denominations: Vec<f32> = available_plates
        .iter()
        .copied()
        .filter(|plate| plate.is_finite() && *plate > 0.0)
        .collect();
    denominations.sort_by(|a, b| b.total_cmp(a));
    denominations.dedup();

    let mut plate_map = Vec::new();
    for plate in denominations {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = (weight_per_side / plate).floor() as u32;
        if count > 0 {
            plate_map.push((plate, count * plate_factor));
            #[allow(clippy::cast_precision_loss)]
            {
                weight_per_side -= count as f32 * plate;
            }
        }
        if weight_per_side <= 0.0 {
            break;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let unloaded_weight = round_to_two_places(weight_per_side * plate_factor as f32);
    let remaining_weight = if plate_map.is_empty() {
        target_weight
    } else {
        unloaded_weight
    };

    PlateBreakdown {
        plate_map,
        target_weight,
        remaining_weight,
        is_one_handle: num_handles == NumHandles::One,
    }
}

/// Formats a denomination set for display, e.g. `1.25, 2.5, 5, 10`.
#[must_use]
pub fn format_available_plates(available_plates: &[f32]) -> String {
    let mut plates = available_plates.to_vec();
    plates.sort_by(f32::total_cmp);
    plates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
