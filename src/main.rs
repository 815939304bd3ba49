//! tpfa - Compressible pressure solve on a box
//!
//! Builds a Cartesian reservoir with a water injector in one corner and a
//! producer in the opposite corner, runs one pressure solve and prints the
//! resulting pressures and well rates.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug tpfa --nx 10 --ny 10 --nz 3 --dt 10 --rate 5
//! ```

use clap::Parser;
use compressible_tpfa::{
    error::Result,
    props::{CompressibleFluid, PhaseProps, Rock},
    CompressibleTpfa, DenseLu, Grid, SolverConfig, State, WellControl, WellState, Wells,
};
use log::info;

/// Compressible two-phase pressure solver demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cells in x
    #[arg(long, default_value_t = 5)]
    nx: usize,

    /// Cells in y
    #[arg(long, default_value_t = 5)]
    ny: usize,

    /// Cells in z
    #[arg(long, default_value_t = 2)]
    nz: usize,

    /// Cell size in x and y
    #[arg(long, default_value_t = 10.0)]
    dx: f64,

    /// Cell size in z
    #[arg(long, default_value_t = 2.0)]
    dz: f64,

    /// Time step length
    #[arg(long, default_value_t = 1.0)]
    dt: f64,

    /// Initial reservoir pressure
    #[arg(long, default_value_t = 100.0)]
    pressure: f64,

    /// Initial water saturation
    #[arg(long, default_value_t = 0.2)]
    sw: f64,

    /// Water injection rate at reservoir conditions
    #[arg(long, default_value_t = 2.0)]
    rate: f64,

    /// Producer bottom-hole pressure
    #[arg(long, default_value_t = 90.0)]
    bhp: f64,

    /// Vertical gravity component (0 disables gravity)
    #[arg(long, default_value_t = 0.0)]
    gravity: f64,

    /// Maximum Newton iterations
    #[arg(long, default_value_t = compressible_tpfa::solver::DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Build the model
    let grid = Grid::cartesian([args.nx, args.ny, args.nz], [args.dx, args.dx, args.dz])?;
    let water = PhaseProps::new(1.0, 1.0)
        .with_compressibility(1e-3, args.pressure)
        .with_corey_exponent(2.0);
    let oil = PhaseProps::new(0.8, 5.0)
        .with_compressibility(1e-2, args.pressure)
        .with_corey_exponent(2.0);
    let fluid = CompressibleFluid::new(Rock::uniform(&grid, 0.3, 1.0), vec![water, oil])?;

    let last = grid.number_of_cells - 1;
    let mut wells = Wells::new(2);
    wells.add_producer("PROD", grid.cell_depth(0), &[0], &[1.0], WellControl::Bhp(args.bhp))?;
    wells.add_injector(
        "INJ",
        grid.cell_depth(last),
        &[1.0, 0.0],
        &[last],
        &[1.0],
        WellControl::ReservoirRate(args.rate),
    )?;

    let gravity = [0.0, 0.0, args.gravity];
    let config = SolverConfig::new().with_max_iterations(args.max_iterations);
    let mut solver =
        CompressibleTpfa::new(&grid, &fluid, &DenseLu, config, Some(&gravity), Some(&wells))?;

    // Initial state
    let mut state = State::uniform(&grid, args.pressure, &[args.sw, 1.0 - args.sw]);
    state.init_surfacevol(&fluid)?;
    let mut well_state = WellState::new(&wells, args.pressure);

    let report = solver.solve(args.dt, &mut state, &mut well_state)?;
    info!("{report:?}");

    println!("converged in {} iterations", report.iterations);
    println!("cell pressures:");
    for (c, p) in state.pressure.iter().enumerate() {
        println!("  {c:>5} {p:>14.6}");
    }
    println!("wells:");
    for (w, well) in wells.iter().enumerate() {
        let rates = &well_state.rates[2 * w..2 * w + 2];
        println!(
            "  {:<6} bhp {:>12.6}  water {:>12.6}  oil {:>12.6}",
            well.name, well_state.bhp[w], rates[0], rates[1]
        );
    }

    Ok(())
}
