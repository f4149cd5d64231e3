// Turns raw solver output into the user-facing blend result

use std::collections::BTreeMap;

use super::models::{BlendResult, Grain, GrainUsage, OptimizationResult, SolveResult};

/// Truncate toward zero at two decimal places (12.349 -> 12.34)
pub fn truncate_2dp(value: f64) -> f64 {
    (value * 100.0).trunc() / 100.0
}

/// Aggregate a solve over the grains it was built from
pub fn aggregate(solution: &SolveResult, grains: &[Grain]) -> BlendResult {
    let mut grains_used = Vec::new();
    let mut total_quantity_used = 0.0;
    let mut weighted_sums: BTreeMap<&str, f64> = BTreeMap::new();

    for grain in grains {
        let quantity = solution.value(&grain.variable_name());
        if quantity <= 0.0 {
            continue;
        }

        grains_used.push(GrainUsage {
            id: grain.id.clone(),
            lote: grain.lote.clone(),
            quantity,
        });
        total_quantity_used += quantity;

        for (name, value) in &grain.characteristics {
            *weighted_sums.entry(name.as_str()).or_insert(0.0) += value * quantity;
        }
    }

    let characteristics_avg = if total_quantity_used > 0.0 {
        weighted_sums
            .into_iter()
            .map(|(name, sum)| (name.to_string(), truncate_2dp(sum / total_quantity_used)))
            .collect()
    } else {
        BTreeMap::new()
    };

    BlendResult {
        optimization_result: OptimizationResult {
            feasible: solution.feasible,
            result: solution.result,
            bounded: solution.bounded,
            is_integral: solution.is_integral,
            grains_used,
        },
        characteristics_avg,
        total_quantity_used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Identifier;
    use float_eq::assert_float_eq;

    fn solved(values: &[(&str, f64)]) -> SolveResult {
        SolveResult::optimal(
            42.0,
            values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            true,
        )
    }

    #[test]
    fn truncates_instead_of_rounding() {
        assert_eq!(truncate_2dp(12.349), 12.34);
        assert_eq!(truncate_2dp(-1.239), -1.23);
        assert_eq!(truncate_2dp(7.0), 7.0);
    }

    #[test]
    fn weighted_average_of_used_grains() {
        let grains = vec![
            Grain::new(1u64, 100.0)
                .with_lote("A1")
                .with_characteristic("protein", 30.0)
                .with_characteristic("moisture", 12.0),
            Grain::new(2u64, 50.0)
                .with_lote("B7")
                .with_characteristic("protein", 20.0)
                .with_characteristic("moisture", 14.0),
            Grain::new(3u64, 80.0).with_characteristic("protein", 99.0),
        ];
        let result = aggregate(&solved(&[("grain_1", 60.0), ("grain_2", 40.0)]), &grains);

        assert_eq!(result.total_quantity_used, 100.0);
        assert_eq!(result.optimization_result.result, 42.0);
        assert!(result.optimization_result.feasible);
        assert_eq!(result.optimization_result.grains_used.len(), 2);
        assert_eq!(
            result.optimization_result.grains_used[1],
            GrainUsage {
                id: Identifier::from(2u64),
                lote: Some(Identifier::from("B7")),
                quantity: 40.0,
            }
        );
        assert_float_eq!(result.characteristics_avg["protein"], 26.0, abs <= 1e-9);
        assert_float_eq!(result.characteristics_avg["moisture"], 12.8, abs <= 1e-9);
    }

    #[test]
    fn characteristic_only_on_some_used_grains() {
        let grains = vec![
            Grain::new(1u64, 10.0).with_characteristic("ash", 3.0),
            Grain::new(2u64, 10.0),
        ];
        let result = aggregate(&solved(&[("grain_1", 5.0), ("grain_2", 5.0)]), &grains);
        assert_float_eq!(result.characteristics_avg["ash"], 1.5, abs <= 1e-9);
    }

    #[test]
    fn nothing_used_gives_empty_averages() {
        let grains = vec![Grain::new(1u64, 10.0).with_characteristic("ash", 3.0)];
        let result = aggregate(&SolveResult::infeasible(), &grains);

        assert!(!result.optimization_result.feasible);
        assert!(result.optimization_result.grains_used.is_empty());
        assert!(result.characteristics_avg.is_empty());
        assert_eq!(result.total_quantity_used, 0.0);
    }

    #[test]
    fn zero_and_negative_values_are_not_used() {
        let grains = vec![Grain::new(1u64, 10.0), Grain::new(2u64, 10.0)];
        let result = aggregate(&solved(&[("grain_1", 0.0), ("grain_2", -0.0)]), &grains);
        assert!(result.optimization_result.grains_used.is_empty());
    }

    #[test]
    fn serializes_to_the_json_contract() {
        let grains = vec![Grain::new(1u64, 10.0).with_lote("L1").with_characteristic("ash", 2.0)];
        let result = aggregate(&solved(&[("grain_1", 10.0)]), &grains);
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["optimizationResult"]["isIntegral"], true);
        assert_eq!(value["optimizationResult"]["grainsUsed"][0]["lote"], "L1");
        assert_eq!(value["characteristicsAvg"]["ash"], 2.0);
        assert_eq!(value["totalQuantityUsed"], 10.0);
    }
}
