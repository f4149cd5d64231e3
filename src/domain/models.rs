use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::value_objects::{BoundKind, OptimizationType};

/// Opaque identifier carried through from the caller (a JSON number or string)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{}", n),
            Identifier::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Identifier::Number(value.into())
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Text(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::Text(value)
    }
}

/// A source lot available for blending
///
/// Every numeric attribute other than `id`, `lote` and `qtd` is a
/// characteristic (protein, moisture, safra, ...). Non-numeric extras are
/// dropped on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GrainRecord")]
pub struct Grain {
    pub id: Identifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lote: Option<Identifier>,
    /// Available quantity, the upper bound for allocation
    pub qtd: f64,
    #[serde(flatten)]
    pub characteristics: BTreeMap<String, f64>,
}

#[derive(Deserialize)]
struct GrainRecord {
    id: Identifier,
    #[serde(default)]
    lote: Option<Identifier>,
    qtd: f64,
    #[serde(flatten)]
    attributes: BTreeMap<String, serde_json::Value>,
}

impl From<GrainRecord> for Grain {
    fn from(record: GrainRecord) -> Self {
        let characteristics = record
            .attributes
            .into_iter()
            .filter_map(|(name, value)| value.as_f64().map(|v| (name, v)))
            .collect();

        Self {
            id: record.id,
            lote: record.lote,
            qtd: record.qtd,
            characteristics,
        }
    }
}

impl Grain {
    pub fn new(id: impl Into<Identifier>, qtd: f64) -> Self {
        Self {
            id: id.into(),
            lote: None,
            qtd,
            characteristics: BTreeMap::new(),
        }
    }

    pub fn with_lote(mut self, lote: impl Into<Identifier>) -> Self {
        self.lote = Some(lote.into());
        self
    }

    pub fn with_characteristic(mut self, name: impl Into<String>, value: f64) -> Self {
        self.characteristics.insert(name.into(), value);
        self
    }

    /// Name of this grain's decision variable in the model
    pub fn variable_name(&self) -> String {
        format!("grain_{}", self.id)
    }

    pub fn characteristic(&self, name: &str) -> Option<f64> {
        self.characteristics.get(name).copied()
    }
}

/// Raw `blendDetail` mapping; only numeric `min_*` / `max_*` keys matter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlendSpecification(pub BTreeMap<String, serde_json::Value>);

impl BlendSpecification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bound(mut self, key: impl Into<String>, fraction: f64) -> Self {
        self.0.insert(key.into(), serde_json::Value::from(fraction));
        self
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, f64)> for BlendSpecification {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k, serde_json::Value::from(v)))
                .collect(),
        )
    }
}

/// A weighted-sum bound on one characteristic, already scaled by the target quantity
#[derive(Debug, Clone, PartialEq)]
pub struct CharacteristicBound {
    pub characteristic: String,
    pub kind: BoundKind,
    pub value: f64,
}

/// Bounds of a named constraint row
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConstraintBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub equal: Option<f64>,
}

impl ConstraintBounds {
    pub fn equal(value: f64) -> Self {
        Self {
            equal: Some(value),
            ..Self::default()
        }
    }

    pub fn at_most(value: f64) -> Self {
        Self {
            max: Some(value),
            ..Self::default()
        }
    }

    pub fn set(&mut self, kind: BoundKind, value: f64) {
        match kind {
            BoundKind::Min => self.min = Some(value),
            BoundKind::Max => self.max = Some(value),
        }
    }

    /// Whether `value` satisfies every bound, within `tolerance`
    pub fn admits(&self, value: f64, tolerance: f64) -> bool {
        self.equal.map_or(true, |e| (value - e).abs() <= tolerance)
            && self.min.map_or(true, |m| value >= m - tolerance)
            && self.max.map_or(true, |m| value <= m + tolerance)
    }

    pub fn is_finite(&self) -> bool {
        [self.min, self.max, self.equal]
            .iter()
            .flatten()
            .all(|v| v.is_finite())
    }
}

/// Named objective term of a model
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub name: String,
    pub direction: OptimizationType,
}

/// Solver-ready blend model
///
/// Coefficients are stored per variable and keyed by constraint or objective
/// term name, so a constraint row is every variable's entry under that name.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendModel {
    pub objective: Objective,
    pub constraints: BTreeMap<String, ConstraintBounds>,
    pub variables: BTreeMap<String, BTreeMap<String, f64>>,
    pub integers: BTreeSet<String>,
}

/// One constraint row gathered from the variable columns
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRow<'a> {
    pub name: &'a str,
    pub bounds: ConstraintBounds,
    pub terms: Vec<(&'a str, f64)>,
}

impl BlendModel {
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_integer(&self, variable: &str) -> bool {
        self.integers.contains(variable)
    }

    pub fn coefficient(&self, variable: &str, term: &str) -> Option<f64> {
        self.variables.get(variable)?.get(term).copied()
    }

    /// Upper limit of a variable, read from its own capacity row
    pub fn capacity(&self, variable: &str) -> Option<f64> {
        if self.coefficient(variable, variable) != Some(1.0) {
            return None;
        }
        self.constraints.get(variable)?.max
    }

    /// Non-zero objective coefficients
    pub fn objective_terms(&self) -> impl Iterator<Item = (&str, f64)> {
        self.variables.iter().filter_map(|(name, column)| {
            column
                .get(&self.objective.name)
                .copied()
                .filter(|c| *c != 0.0)
                .map(|c| (name.as_str(), c))
        })
    }

    pub fn rows(&self) -> Vec<ModelRow<'_>> {
        self.constraints
            .iter()
            .map(|(name, bounds)| {
                let terms = self
                    .variables
                    .iter()
                    .filter_map(|(var, column)| {
                        column
                            .get(name)
                            .copied()
                            .filter(|c| *c != 0.0)
                            .map(|c| (var.as_str(), c))
                    })
                    .collect();
                ModelRow {
                    name,
                    bounds: *bounds,
                    terms,
                }
            })
            .collect()
    }

    /// Evaluate the objective at the given variable values
    pub fn objective_value(&self, values: &BTreeMap<String, f64>) -> f64 {
        self.objective_terms()
            .map(|(name, c)| c * values.get(name).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Raw outcome of a solve, before aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub feasible: bool,
    pub bounded: bool,
    pub is_integral: bool,
    /// Objective value
    pub result: f64,
    pub values: BTreeMap<String, f64>,
}

impl SolveResult {
    pub fn optimal(result: f64, values: BTreeMap<String, f64>, is_integral: bool) -> Self {
        Self {
            feasible: true,
            bounded: true,
            is_integral,
            result,
            values,
        }
    }

    pub fn infeasible() -> Self {
        Self {
            feasible: false,
            bounded: true,
            is_integral: false,
            result: 0.0,
            values: BTreeMap::new(),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            feasible: true,
            bounded: false,
            is_integral: false,
            result: 0.0,
            values: BTreeMap::new(),
        }
    }

    /// Assigned value of a variable; absent variables read as zero
    pub fn value(&self, variable: &str) -> f64 {
        self.values.get(variable).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrainUsage {
    pub id: Identifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lote: Option<Identifier>,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub feasible: bool,
    pub result: f64,
    pub bounded: bool,
    pub is_integral: bool,
    pub grains_used: Vec<GrainUsage>,
}

/// User-facing outcome of a blend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendResult {
    pub optimization_result: OptimizationResult,
    pub characteristics_avg: BTreeMap<String, f64>,
    pub total_quantity_used: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn grain_keeps_numeric_attributes_only() {
        let grain: Grain = serde_json::from_value(json!({
            "id": 7,
            "lote": "L-07",
            "qtd": 120,
            "proteina": 11.5,
            "umidade": 13,
            "variedade": "trigo duro"
        }))
        .unwrap();

        assert_eq!(grain.id, Identifier::from(7u64));
        assert_eq!(grain.lote, Some(Identifier::from("L-07")));
        assert_eq!(grain.qtd, 120.0);
        assert_eq!(grain.characteristics.len(), 2);
        assert_eq!(grain.characteristic("umidade"), Some(13.0));
        assert_eq!(grain.characteristic("variedade"), None);
        assert_eq!(grain.variable_name(), "grain_7");
    }

    #[test]
    fn text_and_numeric_ids_name_the_same_variable() {
        assert_eq!(
            Grain::new(3u64, 1.0).variable_name(),
            Grain::new("3", 1.0).variable_name()
        );
    }

    #[test]
    fn constraint_bounds_admit() {
        let b = ConstraintBounds::equal(100.0);
        assert!(!b.admits(0.0, 1e-9));
        assert!(b.admits(100.0, 1e-9));

        let b = ConstraintBounds::at_most(10.0);
        assert!(b.admits(0.0, 1e-9));

        let mut b = ConstraintBounds::default();
        b.set(BoundKind::Min, 5.0);
        assert!(!b.admits(0.0, 1e-9));
    }

    #[test]
    fn rows_gather_columns_by_name() {
        let mut variables = BTreeMap::new();
        variables.insert(
            "grain_1".to_string(),
            BTreeMap::from([("total".to_string(), 1.0), ("protein".to_string(), 30.0)]),
        );
        variables.insert(
            "grain_2".to_string(),
            BTreeMap::from([("total".to_string(), 1.0), ("protein".to_string(), 0.0)]),
        );
        let model = BlendModel {
            objective: Objective {
                name: "protein".to_string(),
                direction: OptimizationType::Maximize,
            },
            constraints: BTreeMap::from([
                ("total".to_string(), ConstraintBounds::equal(10.0)),
                ("protein".to_string(), ConstraintBounds::at_most(200.0)),
            ]),
            variables,
            integers: BTreeSet::new(),
        };

        let rows = model.rows();
        let protein = rows.iter().find(|r| r.name == "protein").unwrap();
        assert_eq!(protein.terms, vec![("grain_1", 30.0)]);
        let total = rows.iter().find(|r| r.name == "total").unwrap();
        assert_eq!(total.terms.len(), 2);

        let values = BTreeMap::from([("grain_1".to_string(), 2.0)]);
        assert_eq!(model.objective_value(&values), 60.0);
    }
}
