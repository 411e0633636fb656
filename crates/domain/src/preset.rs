//! User-saved presets: named, unit-tagged magnitudes for reuse in
//! calculations (equipment weights and distances).

use std::{fmt, slice::Iter};

use derive_more::{Display, Into};

use crate::{
    CreateError, DeleteError, Name, ReadError, SyncError, UpdateError,
    unit::{DistanceUnit, WeightUnit},
};

/// Identifier of a preset within its relation.
///
/// The persisted calculation grammar references presets as `p<id>` with a
/// positive integer, so this wraps an integer rather than a UUID.
#[derive(Debug, Default, Display, Clone, Copy, Into, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PresetID(u32);

impl PresetID {
    #[must_use]
    pub fn nil() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn is_nil(self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for PresetID {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum PresetsType {
    #[default]
    Equipment,
    Distance,
}

impl PresetsType {
    pub fn iter() -> Iter<'static, PresetsType> {
        static TYPES: [PresetsType; 2] = [PresetsType::Equipment, PresetsType::Distance];
        TYPES.iter()
    }
}

impl fmt::Display for PresetsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetsType::Equipment => write!(f, "equipment"),
            PresetsType::Distance => write!(f, "distance"),
        }
    }
}

impl TryFrom<&str> for PresetsType {
    type Error = PresetsTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "equipment" => Ok(PresetsType::Equipment),
            "distance" => Ok(PresetsType::Distance),
            _ => Err(PresetsTypeError::Unknown(value.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PresetsTypeError {
    #[error("Unknown presets type: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentWeight {
    pub id: PresetID,
    pub name: Name,
    pub weight: f32,
    pub unit: WeightUnit,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistancePreset {
    pub id: PresetID,
    pub name: Name,
    pub distance: f32,
    pub unit: DistanceUnit,
    pub is_favorite: bool,
}

/// Looks up an equipment weight by id. Absence is data drift, not a fault.
#[must_use]
pub fn resolve_equipment_weight(
    equipment_weights: &[EquipmentWeight],
    id: PresetID,
) -> Option<&EquipmentWeight> {
    equipment_weights.iter().find(|e| e.id == id)
}

/// Looks up a distance preset by id. Absence is data drift, not a fault.
#[must_use]
pub fn resolve_distance_preset(
    distance_presets: &[DistancePreset],
    id: PresetID,
) -> Option<&DistancePreset> {
    distance_presets.iter().find(|d| d.id == id)
}

#[allow(async_fn_in_trait)]
pub trait EquipmentWeightRepository {
    async fn sync_equipment_weights(&self) -> Result<Vec<EquipmentWeight>, SyncError>;
    async fn read_equipment_weights(&self) -> Result<Vec<EquipmentWeight>, ReadError>;
    async fn create_equipment_weight(
        &self,
        name: Name,
        weight: f32,
        unit: WeightUnit,
    ) -> Result<EquipmentWeight, CreateError>;
    async fn replace_equipment_weight(
        &self,
        equipment_weight: EquipmentWeight,
    ) -> Result<EquipmentWeight, UpdateError>;
    async fn delete_equipment_weight(&self, id: PresetID) -> Result<PresetID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait DistancePresetRepository {
    async fn sync_distance_presets(&self) -> Result<Vec<DistancePreset>, SyncError>;
    async fn read_distance_presets(&self) -> Result<Vec<DistancePreset>, ReadError>;
    async fn create_distance_preset(
        &self,
        name: Name,
        distance: f32,
        unit: DistanceUnit,
    ) -> Result<DistancePreset, CreateError>;
    async fn replace_distance_preset(
        &self,
        distance_preset: DistancePreset,
    ) -> Result<DistancePreset, UpdateError>;
    async fn delete_distance_preset(&self, id: PresetID) -> Result<PresetID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait PresetService {
    async fn get_equipment_weights(&self) -> Result<Vec<EquipmentWeight>, ReadError>;
    async fn create_equipment_weight(
        &self,
        name: Name,
        weight: f32,
        unit: WeightUnit,
    ) -> Result<EquipmentWeight, CreateError>;
    async fn replace_equipment_weight(
        &self,
        equipment_weight: EquipmentWeight,
    ) -> Result<EquipmentWeight, UpdateError>;
    async fn delete_equipment_weight(&self, id: PresetID) -> Result<PresetID, DeleteError>;

    async fn get_distance_presets(&self) -> Result<Vec<DistancePreset>, ReadError>;
    async fn create_distance_preset(
        &self,
        name: Name,
        distance: f32,
        unit: DistanceUnit,
    ) -> Result<DistancePreset, CreateError>;
    async fn replace_distance_preset(
        &self,
        distance_preset: DistancePreset,
    ) -> Result<DistancePreset, UpdateError>;
    async fn delete_distance_preset(&self, id: PresetID) -> Result<PresetID, DeleteError>;
}

/// Default equipment weights for a fresh installation: a barbell, a dumbbell
/// and one preset per standard plate denomination. The seeding collaborator
/// validates the names when it creates the records.
#[must_use]
pub fn default_equipment_weights(metric: bool) -> Vec<(String, f32, WeightUnit)> {
    let (unit, bar, dumbbell, plates): (WeightUnit, f32, f32, &[f32]) = if metric {
        (
            WeightUnit::Kg,
            20.0,
            2.0,
            &crate::plates::DEFAULT_PLATE_WEIGHTS_KG,
        )
    } else {
        (
            WeightUnit::Lbs,
            45.0,
            5.0,
            &crate::plates::DEFAULT_PLATE_WEIGHTS_LBS,
        )
    };

    let mut defaults = vec![
        ("Barbell".to_string(), bar, unit),
        ("Dumbbell".to_string(), dumbbell, unit),
    ];
    for &weight in plates {
        defaults.push((format!("{weight} {unit}"), weight, unit));
    }
    defaults
}

/// Default distance presets for a fresh installation.
#[must_use]
pub fn default_distance_presets(metric: bool) -> Vec<(String, f32, DistanceUnit)> {
    let presets: [(&str, f32, f32); 3] =
        [("5K", 5.0, 3.1), ("10K", 10.0, 6.2), ("1 Mile", 1.6, 1.0)];
    let unit = if metric {
        DistanceUnit::Km
    } else {
        DistanceUnit::Mi
    };
    presets
        .into_iter()
        .map(|(name, km, mi)| (name.to_string(), if metric { km } else { mi }, unit))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn equipment_weights() -> Vec<EquipmentWeight> {
        vec![
            EquipmentWeight {
                id: PresetID::from(1),
                name: Name::new("Barbell").unwrap(),
                weight: 20.0,
                unit: WeightUnit::Kg,
                is_favorite: false,
            },
            EquipmentWeight {
                id: PresetID::from(3),
                name: Name::new("EZ Bar").unwrap(),
                weight: 7.5,
                unit: WeightUnit::Kg,
                is_favorite: true,
            },
        ]
    }

    #[rstest]
    #[case(1, Some("Barbell"))]
    #[case(3, Some("EZ Bar"))]
    #[case(2, None)]
    #[case(0, None)]
    fn test_resolve_equipment_weight(#[case] id: u32, #[case] expected: Option<&str>) {
        assert_eq!(
            resolve_equipment_weight(&equipment_weights(), PresetID::from(id))
                .map(|e| e.name.to_string()),
            expected.map(ToString::to_string)
        );
    }

    #[test]
    fn test_preset_id_nil() {
        assert!(PresetID::nil().is_nil());
        assert!(!PresetID::from(1).is_nil());
    }

    #[rstest]
    #[case("equipment", Ok(PresetsType::Equipment))]
    #[case("distance", Ok(PresetsType::Distance))]
    #[case("weight", Err(PresetsTypeError::Unknown("weight".to_string())))]
    fn test_presets_type_parsing(
        #[case] value: &str,
        #[case] expected: Result<PresetsType, PresetsTypeError>,
    ) {
        assert_eq!(PresetsType::try_from(value), expected);
    }

    #[test]
    fn test_default_equipment_weights() {
        let metric = default_equipment_weights(true);
        assert_eq!(metric[0], ("Barbell".to_string(), 20.0, WeightUnit::Kg));
        assert!(metric.iter().any(|(name, _, _)| name == "2.5 kg"));

        let imperial = default_equipment_weights(false);
        assert_eq!(imperial[0], ("Barbell".to_string(), 45.0, WeightUnit::Lbs));
        assert!(imperial.iter().any(|(name, _, _)| name == "45 lbs"));
    }

    #[test]
    fn test_default_distance_presets() {
        let metric = default_distance_presets(true);
        assert_eq!(metric.len(), 3);
        assert_eq!(metric[0], ("5K".to_string(), 5.0, DistanceUnit::Km));

        let imperial = default_distance_presets(false);
        assert_eq!(imperial[2], ("1 Mile".to_string(), 1.0, DistanceUnit::Mi));
    }
}
