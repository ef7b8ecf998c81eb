use crate::core::{CellId, Factor, HouseholdType};
use serde::{Deserialize, Serialize};

/// Standardized geographic inputs of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorValues {
    pub temperature: f64,
    pub elevation: f64,
    pub port: f64,
    pub river: f64,
}

impl FactorValues {
    /// Value of a geographic factor. Infrastructure and social terms are not stored on the cell.
    pub fn get(&self, factor: Factor) -> Option<f64> {
        match factor {
            Factor::Temperature => Some(self.temperature),
            Factor::Elevation => Some(self.elevation),
            Factor::Port => Some(self.port),
            Factor::River => Some(self.river),
            Factor::Infrastructure | Factor::Social => None,
        }
    }

    pub fn get_mut(&mut self, factor: Factor) -> Option<&mut f64> {
        match factor {
            Factor::Temperature => Some(&mut self.temperature),
            Factor::Elevation => Some(&mut self.elevation),
            Factor::Port => Some(&mut self.port),
            Factor::River => Some(&mut self.river),
            Factor::Infrastructure | Factor::Social => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    pub mega_cell: u32,
    pub province: u32,
    pub households: u32,
    /// Classification as of the last world step.
    pub kind: HouseholdType,
    pub infrastructure: f64,
    /// Cumulative construction and maintenance charges. May go negative.
    pub net_assets: f64,
    pub bearing_capacity: f64,
    pub permafrost: bool,
    pub factors: FactorValues,
}

impl Cell {
    pub fn new(id: CellId, mega_cell: u32, province: u32) -> Self {
        Self {
            id,
            mega_cell,
            province,
            households: 0,
            kind: HouseholdType::Rural,
            infrastructure: 0.0,
            net_assets: 0.0,
            bearing_capacity: 1.0,
            permafrost: false,
            factors: FactorValues::default(),
        }
    }

    pub fn add_household(&mut self) {
        self.households += 1;
    }

    pub fn remove_household(&mut self) {
        assert!(
            self.households > 0,
            "removing a household from empty cell {}",
            self.id
        );
        self.households -= 1;
    }

    /// Recompute the classification. Returns the previous one.
    pub fn reclassify(&mut self, urban_density: f64) -> HouseholdType {
        let previous = self.kind;
        self.kind = HouseholdType::classify(self.households, urban_density);
        previous
    }
}
