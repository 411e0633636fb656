//! In-memory model of a calculation: an ordered list of items (presets,
//! literal numbers, evaluated expressions) with per-item multipliers and a
//! total multiplier applied to the sum.

use std::fmt;

use derive_more::Into;

use crate::{
    expression::evaluate_expression,
    preset::{DistancePreset, EquipmentWeight, PresetID, PresetsType},
    round_to_two_places,
    unit::{convert_distance, convert_weight},
    validation,
};

/// Strictly positive factor applied to a calculation item or to the total.
///
/// A multiplier that rounds to exactly 1 is not serialized; absence always
/// reads back as 1.
#[derive(Debug, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Multiplier(f32);

impl Multiplier {
    pub fn new(value: f32) -> Result<Self, MultiplierError> {
        if !value.is_finite() {
            return Err(MultiplierError::ParseError);
        }
        if value <= 0.0 {
            return Err(MultiplierError::NotPositive(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }

    /// True if the multiplier would round to 1 and can thus be omitted from
    /// the serialized form.
    #[must_use]
    pub fn is_default(self) -> bool {
        (round_to_two_places(self.0) - 1.0).abs() < f32::EPSILON
    }

    /// Effective multiplier for a raw input string: empty or invalid input
    /// falls back to 1. The raw string stays with the caller for redisplay.
    #[must_use]
    pub fn effective(input: &str) -> Self {
        Multiplier::try_from(input).unwrap_or_default()
    }

    #[must_use]
    pub fn increment(self, step: f32) -> Self {
        let value = round_to_two_places(self.0 + step);
        if value.is_finite() && value > 0.0 {
            Self(value)
        } else {
            self
        }
    }

    /// Decrementing below or onto zero is a no-op; callers disable the
    /// decrement action when this returns `None`.
    #[must_use]
    pub fn decrement(self, step: f32) -> Option<Self> {
        if self.0 - step <= 0.0 {
            return None;
        }
        Some(Self(round_to_two_places(self.0 - step)))
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self(1.0)
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::format_two_places(self.0))
    }
}

impl TryFrom<&str> for Multiplier {
    type Error = MultiplierError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match validation::parse_number(value) {
            Some(parsed_value) => Multiplier::new(parsed_value),
            None => Err(MultiplierError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MultiplierError {
    #[error("Multiplier must be above 0 (got {0})")]
    NotPositive(f32),
    #[error("Multiplier must be a decimal number")]
    ParseError,
}

/// The source a calculation item was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculationItemKind {
    Preset(PresetID),
    Number,
    Expression(String),
}

/// One line contributing `value × multiplier` to a calculation total.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationItem {
    pub kind: CalculationItemKind,
    pub label: String,
    pub value: f32,
    pub unit: String,
    pub multiplier: Multiplier,
}

impl CalculationItem {
    /// Item backed by an equipment weight preset, converted into the
    /// calculation's working unit when the preset's native unit differs.
    #[must_use]
    pub fn from_equipment_weight(equipment: &EquipmentWeight, working_unit: &str) -> Self {
        Self {
            kind: CalculationItemKind::Preset(equipment.id),
            label: equipment.name.to_string(),
            value: round_to_two_places(convert_weight(
                equipment.weight,
                &equipment.unit.to_string(),
                working_unit,
            )),
            unit: working_unit.to_string(),
            multiplier: Multiplier::default(),
        }
    }

    /// Item backed by a distance preset, converted into the calculation's
    /// working unit when the preset's native unit differs.
    #[must_use]
    pub fn from_distance_preset(preset: &DistancePreset, working_unit: &str) -> Self {
        Self {
            kind: CalculationItemKind::Preset(preset.id),
            label: preset.name.to_string(),
            value: round_to_two_places(convert_distance(
                preset.distance,
                &preset.unit.to_string(),
                working_unit,
            )),
            unit: working_unit.to_string(),
            multiplier: Multiplier::default(),
        }
    }

    /// Item backed by a literal number. `None` unless the number is a
    /// positive finite value.
    #[must_use]
    pub fn from_number(number: f32, unit: &str) -> Option<Self> {
        if !number.is_finite() || number <= 0.0 {
            return None;
        }
        let value = round_to_two_places(number);
        Some(Self {
            kind: CalculationItemKind::Number,
            label: format!("{value} {unit}"),
            value,
            unit: unit.to_string(),
            multiplier: Multiplier::default(),
        })
    }

    /// Item backed by an arithmetic expression. `None` if the expression
    /// does not evaluate to a positive finite value.
    #[must_use]
    pub fn from_expression(text: &str, unit: &str) -> Option<Self> {
        let result = evaluate_expression(text).ok()?;
        Some(Self {
            kind: CalculationItemKind::Expression(text.to_string()),
            label: text.to_string(),
            value: round_to_two_places(result),
            unit: unit.to_string(),
            multiplier: Multiplier::default(),
        })
    }

    #[must_use]
    pub fn with_multiplier(mut self, multiplier: Multiplier) -> Self {
        self.multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn weighted_value(&self) -> f32 {
        self.value * self.multiplier.get()
    }
}

/// Ordered list of calculation items of one presets type, plus the total
/// multiplier applied to the sum of all items.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationList {
    presets_type: PresetsType,
    items: Vec<CalculationItem>,
    total_multiplier: Multiplier,
}

impl CalculationList {
    #[must_use]
    pub fn new(presets_type: PresetsType) -> Self {
        Self {
            presets_type,
            items: Vec::new(),
            total_multiplier: Multiplier::default(),
        }
    }

    #[must_use]
    pub fn presets_type(&self) -> PresetsType {
        self.presets_type
    }

    #[must_use]
    pub fn items(&self) -> &[CalculationItem] {
        &self.items
    }

    #[must_use]
    pub fn total_multiplier(&self) -> Multiplier {
        self.total_multiplier
    }

    pub fn set_total_multiplier(&mut self, total_multiplier: Multiplier) {
        self.total_multiplier = total_multiplier;
    }

    pub fn push(&mut self, item: CalculationItem) {
        self.items.push(item);
    }

    /// Replaces the item at `index`. Out of range is a no-op.
    pub fn replace(&mut self, index: usize, item: CalculationItem) {
        if let Some(slot) = self.items.get_mut(index) {
            *slot = item;
        }
    }

    /// Removes the item at `index`. Out of range is a no-op.
    pub fn remove(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    /// Sum of `value × multiplier` over all items, rounded to two places.
    #[must_use]
    pub fn total(&self) -> f32 {
        round_to_two_places(self.items.iter().map(CalculationItem::weighted_value).sum())
    }

    /// Total scaled by the total multiplier, rounded to two places.
    #[must_use]
    pub fn result(&self) -> f32 {
        round_to_two_places(self.total() * self.total_multiplier.get())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{Name, unit::WeightUnit};

    use super::*;

    fn barbell() -> EquipmentWeight {
        EquipmentWeight {
            id: PresetID::from(1),
            name: Name::new("Barbell").unwrap(),
            weight: 20.0,
            unit: WeightUnit::Kg,
            is_favorite: false,
        }
    }

    #[rstest]
    #[case(2.5, Ok(Multiplier(2.5)))]
    #[case(0.0, Err(MultiplierError::NotPositive(0.0)))]
    #[case(-1.0, Err(MultiplierError::NotPositive(-1.0)))]
    #[case(f32::NAN, Err(MultiplierError::ParseError))]
    fn test_multiplier_new(#[case] value: f32, #[case] expected: Result<Multiplier, MultiplierError>) {
        assert_eq!(Multiplier::new(value), expected);
    }

    #[rstest]
    #[case("2.5", Multiplier(2.5))]
    #[case("", Multiplier(1.0))]
    #[case("abc", Multiplier(1.0))]
    #[case("0", Multiplier(1.0))]
    #[case("-3", Multiplier(1.0))]
    fn test_multiplier_effective(#[case] input: &str, #[case] expected: Multiplier) {
        assert_eq!(Multiplier::effective(input), expected);
    }

    #[test]
    fn test_multiplier_decrement_clamp() {
        let multiplier = Multiplier::default();
        assert_eq!(multiplier.decrement(1.0), None);
        assert_eq!(multiplier.decrement(1.5), None);
        assert_eq!(multiplier.decrement(0.5), Some(Multiplier(0.5)));
        assert_eq!(Multiplier(0.5).decrement(0.5), None);
    }

    #[test]
    fn test_multiplier_increment() {
        assert_eq!(Multiplier::default().increment(0.5), Multiplier(1.5));
        assert_eq!(Multiplier(1.5).increment(1.0), Multiplier(2.5));
    }

    #[rstest]
    #[case(1.0, true)]
    #[case(1.004, true)]
    #[case(1.01, false)]
    #[case(2.0, false)]
    fn test_multiplier_is_default(#[case] value: f32, #[case] expected: bool) {
        assert_eq!(Multiplier(value).is_default(), expected);
    }

    #[test]
    fn test_item_from_equipment_weight() {
        let item = CalculationItem::from_equipment_weight(&barbell(), "kg");
        assert_eq!(item.kind, CalculationItemKind::Preset(PresetID::from(1)));
        assert_eq!(item.label, "Barbell");
        assert_eq!(item.value, 20.0);
        assert_eq!(item.unit, "kg");

        let converted = CalculationItem::from_equipment_weight(&barbell(), "lbs");
        assert_eq!(converted.value, 44.09);
    }

    #[test]
    fn test_item_from_number() {
        let item = CalculationItem::from_number(7.5, "kg").unwrap();
        assert_eq!(item.kind, CalculationItemKind::Number);
        assert_eq!(item.label, "7.5 kg");
        assert_eq!(item.value, 7.5);

        assert_eq!(CalculationItem::from_number(0.0, "kg"), None);
        assert_eq!(CalculationItem::from_number(-2.0, "kg"), None);
        assert_eq!(CalculationItem::from_number(f32::NAN, "kg"), None);
    }

    #[test]
    fn test_item_from_expression() {
        let item = CalculationItem::from_expression("20+5*2", "kg").unwrap();
        assert_eq!(
            item.kind,
            CalculationItemKind::Expression("20+5*2".to_string())
        );
        assert_eq!(item.label, "20+5*2");
        assert_eq!(item.value, 30.0);

        assert_eq!(CalculationItem::from_expression("2+", "kg"), None);
        assert_eq!(CalculationItem::from_expression("0-5", "kg"), None);
    }

    #[test]
    fn test_list_totals() {
        let mut list = CalculationList::new(PresetsType::Equipment);
        list.push(CalculationItem::from_equipment_weight(&barbell(), "kg"));
        list.push(
            CalculationItem::from_number(10.0, "kg")
                .unwrap()
                .with_multiplier(Multiplier(2.0)),
        );
        assert_eq!(list.total(), 40.0);
        assert_eq!(list.result(), 40.0);

        list.set_total_multiplier(Multiplier(1.5));
        assert_eq!(list.total(), 40.0);
        assert_eq!(list.result(), 60.0);
    }

    #[test]
    fn test_list_edit_in_place() {
        let mut list = CalculationList::new(PresetsType::Equipment);
        list.push(CalculationItem::from_number(10.0, "kg").unwrap());
        list.push(CalculationItem::from_number(20.0, "kg").unwrap());

        list.replace(1, CalculationItem::from_number(25.0, "kg").unwrap());
        assert_eq!(list.items()[1].value, 25.0);

        list.replace(5, CalculationItem::from_number(99.0, "kg").unwrap());
        assert_eq!(list.items().len(), 2);

        list.remove(0);
        assert_eq!(list.items().len(), 1);
        assert_eq!(list.items()[0].value, 25.0);

        list.remove(7);
        assert_eq!(list.items().len(), 1);
    }
}
