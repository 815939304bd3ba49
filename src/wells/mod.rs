//! Well topology and controls.
//!
//! Wells are described once and observed by the solver for its whole
//! lifetime; only their controls may change between solves, which is why the
//! controls live in [`WellState`](crate::state::WellState).
//!
//! Rates follow a single sign convention throughout: positive means flow
//! from the well into the reservoir (injection), negative means production.

mod control;

pub use control::WellControl;

use crate::error::{PressureError, Result};

/// Injector or producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellType {
    Injector,
    Producer,
}

/// Static description of a single well.
#[derive(Debug, Clone)]
pub struct Well {
    /// Well name (for diagnostics)
    pub name: String,
    /// Injector or producer
    pub kind: WellType,
    /// Depth at which the bottom-hole pressure is measured
    pub depth_ref: f64,
    /// Phase fractions of injected fluid (`np`, injectors only)
    pub comp_frac: Vec<f64>,
    /// Initial control, copied into the well state
    pub control: WellControl,
}

/// All wells of a model with a flattened perforation list.
#[derive(Debug, Clone)]
pub struct Wells {
    number_of_phases: usize,
    wells: Vec<Well>,
    /// Offsets into the perforation arrays (`W + 1`)
    well_connpos: Vec<usize>,
    /// Perforated cell per perforation
    well_cells: Vec<usize>,
    /// Well index (connection transmissibility) per perforation
    wi: Vec<f64>,
}

impl Wells {
    /// Create an empty well set for `number_of_phases` phases.
    pub fn new(number_of_phases: usize) -> Self {
        Self {
            number_of_phases,
            wells: Vec::new(),
            well_connpos: vec![0],
            well_cells: Vec::new(),
            wi: Vec::new(),
        }
    }

    /// Add a producer perforating `cells` with well indices `wi`.
    pub fn add_producer(
        &mut self,
        name: impl Into<String>,
        depth_ref: f64,
        cells: &[usize],
        wi: &[f64],
        control: WellControl,
    ) -> Result<usize> {
        let well = Well {
            name: name.into(),
            kind: WellType::Producer,
            depth_ref,
            comp_frac: Vec::new(),
            control,
        };
        self.add_well(well, cells, wi)
    }

    /// Add an injector with injected phase fractions `comp_frac`.
    pub fn add_injector(
        &mut self,
        name: impl Into<String>,
        depth_ref: f64,
        comp_frac: &[f64],
        cells: &[usize],
        wi: &[f64],
        control: WellControl,
    ) -> Result<usize> {
        if comp_frac.len() != self.number_of_phases {
            return Err(PressureError::invalid_parameter(format!(
                "injection fractions have length {}, expected {}",
                comp_frac.len(),
                self.number_of_phases
            )));
        }
        let well = Well {
            name: name.into(),
            kind: WellType::Injector,
            depth_ref,
            comp_frac: comp_frac.to_vec(),
            control,
        };
        self.add_well(well, cells, wi)
    }

    fn add_well(&mut self, well: Well, cells: &[usize], wi: &[f64]) -> Result<usize> {
        if cells.is_empty() || cells.len() != wi.len() {
            return Err(PressureError::invalid_parameter(format!(
                "well '{}' needs one well index per perforation ({} cells, {} indices)",
                well.name,
                cells.len(),
                wi.len()
            )));
        }
        if wi.iter().any(|&w| !(w >= 0.0)) {
            return Err(PressureError::invalid_parameter(format!(
                "well '{}' has a negative well index",
                well.name
            )));
        }
        well.control.validate(self.number_of_phases)?;

        self.well_cells.extend_from_slice(cells);
        self.wi.extend_from_slice(wi);
        self.well_connpos.push(self.well_cells.len());
        self.wells.push(well);
        Ok(self.wells.len() - 1)
    }

    /// Number of phases the wells were described with.
    pub fn number_of_phases(&self) -> usize {
        self.number_of_phases
    }

    /// Number of wells.
    pub fn number_of_wells(&self) -> usize {
        self.wells.len()
    }

    /// Total number of perforations.
    pub fn number_of_perforations(&self) -> usize {
        self.well_cells.len()
    }

    /// Well `w`.
    pub fn well(&self, w: usize) -> &Well {
        &self.wells[w]
    }

    /// Iterate over wells.
    pub fn iter(&self) -> impl Iterator<Item = &Well> {
        self.wells.iter()
    }

    /// Perforation index range of well `w`.
    pub fn perforations(&self, w: usize) -> std::ops::Range<usize> {
        self.well_connpos[w]..self.well_connpos[w + 1]
    }

    /// Cell perforated by perforation `j`.
    pub fn perforation_cell(&self, j: usize) -> usize {
        self.well_cells[j]
    }

    /// Well index of perforation `j`.
    pub fn well_index(&self, j: usize) -> f64 {
        self.wi[j]
    }

    /// Initial controls of all wells, in well order.
    pub fn initial_controls(&self) -> Vec<WellControl> {
        self.wells.iter().map(|w| w.control.clone()).collect()
    }

    /// Check that every perforated cell exists in a grid with `num_cells` cells.
    pub fn validate(&self, num_cells: usize) -> Result<()> {
        for (w, well) in self.wells.iter().enumerate() {
            for j in self.perforations(w) {
                if self.well_cells[j] >= num_cells {
                    return Err(PressureError::invalid_parameter(format!(
                        "well '{}' perforates cell {}, grid has {} cells",
                        well.name, self.well_cells[j], num_cells
                    )));
                }
            }
        }
        Ok(())
    }
}
