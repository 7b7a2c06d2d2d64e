use std::collections::BTreeMap;

use crate::models::NutrientGoals;
use crate::nutrients::catalogue::{CARBOHYDRATE, FATS, FIBRE, PROTEIN};

/// Macro goals whose upper limit may be relaxed, in search order.
pub const BASE_AXES: [&str; 3] = [PROTEIN, CARBOHYDRATE, FATS];

pub const DEFAULT_MAX_TOLERANCE: u32 = 10;

/// Percent overflow allowed above each relaxed macro goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tolerances {
    entries: Vec<(&'static str, u32)>,
}

impl Tolerances {
    pub fn new(entries: Vec<(&'static str, u32)>) -> Self {
        Self { entries }
    }

    /// Overflow percent for `axis`, `None` if the axis is not relaxed.
    pub fn get(&self, axis: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(name, _)| *name == axis)
            .map(|(_, pct)| *pct)
    }

    pub fn sum(&self) -> u32 {
        self.entries.iter().map(|(_, pct)| pct).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        self.entries.iter().copied()
    }

    pub fn values(&self) -> Vec<u32> {
        self.entries.iter().map(|(_, pct)| *pct).collect()
    }

    pub fn to_map(&self) -> BTreeMap<String, u32> {
        self.iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

/// Which macro goals may overflow, and by how much at most.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaxationPolicy {
    axes: Vec<&'static str>,
    max_tolerance: u32,
}

impl Default for RelaxationPolicy {
    fn default() -> Self {
        Self::new(false, DEFAULT_MAX_TOLERANCE)
    }
}

impl RelaxationPolicy {
    /// Protein, carbohydrate and fats always relax; fibre only when `relax_fibre`.
    pub fn new(relax_fibre: bool, max_tolerance: u32) -> Self {
        let mut axes = BASE_AXES.to_vec();
        if relax_fibre {
            axes.push(FIBRE);
        }
        Self {
            axes,
            max_tolerance,
        }
    }

    pub fn axes(&self) -> &[&'static str] {
        &self.axes
    }

    pub fn max_tolerance(&self) -> u32 {
        self.max_tolerance
    }

    pub fn relaxes(&self, nutrient: &str) -> bool {
        self.axes.contains(&nutrient)
    }

    /// Every tolerance combination in search order.
    ///
    /// Combinations are enumerated as a Cartesian product (last axis varying
    /// fastest), then stably sorted by their sum, so ties keep enumeration
    /// order and the first feasible combination has the least total overflow.
    pub fn combinations(&self) -> Vec<Tolerances> {
        self.product(&self.axes)
    }

    /// Combinations over the axes that `goals` actually sets.
    pub fn combinations_for(&self, goals: &NutrientGoals) -> Vec<Tolerances> {
        let axes: Vec<&'static str> = self
            .axes
            .iter()
            .copied()
            .filter(|axis| goals.get(axis).is_some())
            .collect();
        self.product(&axes)
    }

    fn product(&self, axes: &[&'static str]) -> Vec<Tolerances> {
        let steps = self.max_tolerance + 1;
        let mut combos: Vec<Vec<u32>> = vec![Vec::new()];
        for _ in axes {
            combos = combos
                .into_iter()
                .flat_map(|prefix| {
                    (0..steps).map(move |pct| {
                        let mut next = prefix.clone();
                        next.push(pct);
                        next
                    })
                })
                .collect();
        }
        combos.sort_by_key(|combo| combo.iter().sum::<u32>());

        combos
            .into_iter()
            .map(|combo| Tolerances::new(axes.iter().copied().zip(combo).collect()))
            .collect()
    }
}
