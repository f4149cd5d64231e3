// Model construction shared by every objective variant
//
// The variant only decides the objective term and its per-grain coefficient;
// quantity, capacity and characteristic constraints are identical.

use std::collections::{BTreeMap, BTreeSet};

use super::models::{BlendModel, CharacteristicBound, ConstraintBounds, Grain, Objective};
use super::value_objects::{ObjectiveVariant, OptimizationType};

/// Name of the total quantity equality constraint
pub const TOTAL_QUANTITY: &str = "totalQuantity";

/// Name of the objective term used by [`ObjectiveVariant::Slack`]
pub const SLACK_TERM: &str = "folgaTotal";

/// Name of the objective term used by [`ObjectiveVariant::LotCount`]
pub const LOT_UTILIZATION_TERM: &str = "lotUtilization";

/// Name of the objective term (and grain characteristic) used by [`ObjectiveVariant::Recency`]
pub const SAFRA_TERM: &str = "safra";

impl ObjectiveVariant {
    pub fn objective_name(self) -> &'static str {
        match self {
            ObjectiveVariant::Slack => SLACK_TERM,
            ObjectiveVariant::LotCount => LOT_UTILIZATION_TERM,
            ObjectiveVariant::Recency => SAFRA_TERM,
        }
    }

    /// Objective coefficient of a grain's variable
    pub fn objective_coefficient(self, grain: &Grain) -> f64 {
        match self {
            ObjectiveVariant::Slack => 1.0,
            ObjectiveVariant::LotCount => {
                if grain.qtd > 0.0 {
                    1.0 / grain.qtd
                } else {
                    0.0
                }
            }
            ObjectiveVariant::Recency => grain.characteristic(SAFRA_TERM).unwrap_or(0.0),
        }
    }

    /// Whether the objective term is set for every grain up front, rather than
    /// only while an active characteristic bound is applied.
    pub fn populates_unconditionally(self) -> bool {
        match self {
            ObjectiveVariant::Slack => false,
            ObjectiveVariant::LotCount | ObjectiveVariant::Recency => true,
        }
    }
}

/// Build the blend model for one request
pub fn build_model(
    variant: ObjectiveVariant,
    grains: &[Grain],
    bounds: &[CharacteristicBound],
    target_quantity: f64,
) -> BlendModel {
    let objective_name = variant.objective_name();

    let mut constraints = BTreeMap::new();
    let mut variables: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    let mut integers = BTreeSet::new();

    constraints.insert(
        TOTAL_QUANTITY.to_string(),
        ConstraintBounds::equal(target_quantity),
    );

    for grain in grains {
        let var = grain.variable_name();
        let column = variables.entry(var.clone()).or_default();
        column.insert(TOTAL_QUANTITY.to_string(), 1.0);
        // Self entry: the capacity row below reads this coefficient.
        column.insert(var.clone(), 1.0);
        if variant.populates_unconditionally() {
            column.insert(objective_name.to_string(), variant.objective_coefficient(grain));
        }

        constraints.insert(var.clone(), ConstraintBounds::at_most(grain.qtd));
        integers.insert(var);
    }

    for bound in bounds {
        constraints
            .entry(bound.characteristic.clone())
            .or_insert_with(ConstraintBounds::default)
            .set(bound.kind, bound.value);

        for grain in grains {
            let var = grain.variable_name();
            let column = variables.entry(var.clone()).or_default();
            column.insert(
                bound.characteristic.clone(),
                grain.characteristic(&bound.characteristic).unwrap_or(0.0),
            );
            column.insert(var, 1.0);
            if !variant.populates_unconditionally() {
                column.insert(objective_name.to_string(), variant.objective_coefficient(grain));
            }
        }
    }

    BlendModel {
        objective: Objective {
            name: objective_name.to_string(),
            direction: OptimizationType::Maximize,
        },
        constraints,
        variables,
        integers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bounds::extract_bounds;
    use crate::domain::models::BlendSpecification;
    use crate::domain::value_objects::BoundKind;

    fn grains() -> Vec<Grain> {
        vec![
            Grain::new(1u64, 100.0)
                .with_characteristic("protein", 30.0)
                .with_characteristic(SAFRA_TERM, 2023.0),
            Grain::new(2u64, 50.0).with_characteristic("protein", 20.0),
            Grain::new(3u64, 0.0).with_characteristic("protein", 25.0),
        ]
    }

    fn min_protein(value: f64) -> Vec<CharacteristicBound> {
        vec![CharacteristicBound {
            characteristic: "protein".to_string(),
            kind: BoundKind::Min,
            value,
        }]
    }

    #[test]
    fn shared_constraints() {
        let model = build_model(ObjectiveVariant::Slack, &grains(), &[], 100.0);

        assert_eq!(model.objective.direction, OptimizationType::Maximize);
        assert_eq!(
            model.constraints[TOTAL_QUANTITY],
            ConstraintBounds::equal(100.0)
        );
        assert_eq!(model.constraints["grain_2"], ConstraintBounds::at_most(50.0));
        assert_eq!(model.num_variables(), 3);
        assert!(model.is_integer("grain_1"));
        assert_eq!(model.coefficient("grain_1", TOTAL_QUANTITY), Some(1.0));
        assert_eq!(model.coefficient("grain_1", "grain_1"), Some(1.0));
        assert_eq!(model.coefficient("grain_1", "grain_2"), None);
    }

    #[test]
    fn characteristic_bound_adds_row_and_coefficients() {
        let model = build_model(ObjectiveVariant::Slack, &grains(), &min_protein(25.0), 100.0);

        let protein = model.constraints["protein"];
        assert_eq!(protein.min, Some(25.0));
        assert_eq!(protein.max, None);
        assert_eq!(model.coefficient("grain_1", "protein"), Some(30.0));
        assert_eq!(model.coefficient("grain_3", "protein"), Some(25.0));
    }

    #[test]
    fn missing_characteristic_is_zero() {
        let bounds = vec![CharacteristicBound {
            characteristic: "gluten".to_string(),
            kind: BoundKind::Max,
            value: 3.0,
        }];
        let model = build_model(ObjectiveVariant::Slack, &grains(), &bounds, 10.0);
        assert_eq!(model.coefficient("grain_2", "gluten"), Some(0.0));
        assert_eq!(model.constraints["gluten"].max, Some(3.0));
    }

    #[test]
    fn min_and_max_extend_one_constraint() {
        let mut bounds = min_protein(20.0);
        bounds.push(CharacteristicBound {
            characteristic: "protein".to_string(),
            kind: BoundKind::Max,
            value: 28.0,
        });
        let model = build_model(ObjectiveVariant::Slack, &grains(), &bounds, 1.0);
        let protein = model.constraints["protein"];
        assert_eq!((protein.min, protein.max), (Some(20.0), Some(28.0)));
    }

    #[test]
    fn slack_objective_only_with_active_bounds() {
        let without = build_model(ObjectiveVariant::Slack, &grains(), &[], 100.0);
        assert_eq!(without.objective_terms().count(), 0);

        let with = build_model(ObjectiveVariant::Slack, &grains(), &min_protein(1.0), 100.0);
        assert_eq!(with.objective.name, SLACK_TERM);
        assert_eq!(with.objective_terms().count(), 3);
        assert!(with.objective_terms().all(|(_, c)| c == 1.0));
    }

    #[test]
    fn lot_count_objective_is_inverse_capacity() {
        let model = build_model(ObjectiveVariant::LotCount, &grains(), &[], 10.0);
        assert_eq!(model.objective.name, LOT_UTILIZATION_TERM);
        assert_eq!(model.coefficient("grain_1", LOT_UTILIZATION_TERM), Some(0.01));
        assert_eq!(model.coefficient("grain_2", LOT_UTILIZATION_TERM), Some(0.02));
        assert_eq!(model.coefficient("grain_3", LOT_UTILIZATION_TERM), Some(0.0));
    }

    #[test]
    fn recency_objective_without_bounds() {
        let model = build_model(ObjectiveVariant::Recency, &grains(), &[], 10.0);
        assert_eq!(model.objective.name, SAFRA_TERM);
        assert_eq!(model.coefficient("grain_1", SAFRA_TERM), Some(2023.0));
        assert_eq!(model.coefficient("grain_2", SAFRA_TERM), Some(0.0));
    }

    #[test]
    fn non_positive_bounds_build_identical_models() {
        let base = BlendSpecification::new().with_bound("min_protein", 0.25);
        let noisy = base
            .clone()
            .with_bound("max_protein", 0.0)
            .with_bound("min_moisture", -1.0);

        for variant in [
            ObjectiveVariant::Slack,
            ObjectiveVariant::LotCount,
            ObjectiveVariant::Recency,
        ] {
            let a = build_model(variant, &grains(), &extract_bounds(&base, 100.0), 100.0);
            let b = build_model(variant, &grains(), &extract_bounds(&noisy, 100.0), 100.0);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn empty_grains_has_no_variables() {
        let model = build_model(ObjectiveVariant::LotCount, &[], &min_protein(5.0), 10.0);
        assert_eq!(model.num_variables(), 0);
        assert_eq!(model.num_constraints(), 2);
    }
}
