//! Value types shared by the engine, solver and analyzer

mod goal;
mod market;
mod params;
mod results;

pub use goal::Goal;
pub use market::ReturnModel;
pub use params::{MAX_HORIZON_YEARS, SimulationParameters};
pub use results::{SimulationResult, SimulationStatistics, YearProjection};
