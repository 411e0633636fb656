use log::{debug, error};

use crate::{
    CreateError, DeleteError, DistancePreset, DistancePresetRepository, EquipmentWeight,
    EquipmentWeightRepository, Exercise, ExerciseID, ExerciseRepository, ExerciseService, Name,
    PresetID, PresetService, ReadError, SyncError, UpdateError,
    calc_string::update_calculation_string,
    calculation::CalculationList,
    unit::{DistanceUnit, WeightUnit},
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R>
where
    R: ExerciseRepository + EquipmentWeightRepository + DistancePresetRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn sync(&self) -> Result<(), SyncError> {
        self.repository.sync_exercises().await?;
        self.repository.sync_equipment_weights().await?;
        self.repository.sync_distance_presets().await?;
        Ok(())
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_exercises(),
            ReadError,
            "get",
            "exercises"
        )
    }

    async fn create_exercise(&self, name: Name) -> Result<Exercise, CreateError> {
        log_on_error!(
            self.repository.create_exercise(name),
            CreateError,
            "create",
            "exercise"
        )
    }

    async fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError> {
        log_on_error!(
            self.repository.replace_exercise(exercise),
            UpdateError,
            "replace",
            "exercise"
        )
    }

    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError> {
        log_on_error!(
            self.repository.delete_exercise(id),
            DeleteError,
            "delete",
            "exercise"
        )
    }

    async fn save_calculation(
        &self,
        id: ExerciseID,
        list: &CalculationList,
    ) -> Result<Exercise, UpdateError> {
        let exercises = self.repository.read_exercises().await.map_err(UpdateError::from)?;
        let exercise = exercises
            .into_iter()
            .find(|exercise| exercise.id == id)
            .ok_or(UpdateError::NotFound)?;

        let calculation_string =
            update_calculation_string(exercise.calculation_string.as_deref(), list);

        log_on_error!(
            self.repository.update_calculation_string(id, calculation_string),
            UpdateError,
            "update",
            "calculation string"
        )
    }
}

impl<R: EquipmentWeightRepository + DistancePresetRepository> PresetService for Service<R> {
    async fn get_equipment_weights(&self) -> Result<Vec<EquipmentWeight>, ReadError> {
        log_on_error!(
            self.repository.read_equipment_weights(),
            ReadError,
            "get",
            "equipment weights"
        )
    }

    async fn create_equipment_weight(
        &self,
        name: Name,
        weight: f32,
        unit: WeightUnit,
    ) -> Result<EquipmentWeight, CreateError> {
        log_on_error!(
            self.repository.create_equipment_weight(name, weight, unit),
            CreateError,
            "create",
            "equipment weight"
        )
    }

    async fn replace_equipment_weight(
        &self,
        equipment_weight: EquipmentWeight,
    ) -> Result<EquipmentWeight, UpdateError> {
        log_on_error!(
            self.repository.replace_equipment_weight(equipment_weight),
            UpdateError,
            "replace",
            "equipment weight"
        )
    }

    async fn delete_equipment_weight(&self, id: PresetID) -> Result<PresetID, DeleteError> {
        log_on_error!(
            self.repository.delete_equipment_weight(id),
            DeleteError,
            "delete",
            "equipment weight"
        )
    }

    async fn get_distance_presets(&self) -> Result<Vec<DistancePreset>, ReadError> {
        log_on_error!(
            self.repository.read_distance_presets(),
            ReadError,
            "get",
            "distance presets"
        )
    }

    async fn create_distance_preset(
        &self,
        name: Name,
        distance: f32,
        unit: DistanceUnit,
    ) -> Result<DistancePreset, CreateError> {
        log_on_error!(
            self.repository.create_distance_preset(name, distance, unit),
            CreateError,
            "create",
            "distance preset"
        )
    }

    async fn replace_distance_preset(
        &self,
        distance_preset: DistancePreset,
    ) -> Result<DistancePreset, UpdateError> {
        log_on_error!(
            self.repository.replace_distance_preset(distance_preset),
            UpdateError,
            "replace",
            "distance preset"
        )
    }

    async fn delete_distance_preset(&self, id: PresetID) -> Result<PresetID, DeleteError> {
        log_on_error!(
            self.repository.delete_distance_preset(id),
            DeleteError,
            "delete",
            "distance preset"
        )
    }
}
