// Office service: single owner of the office state

mod office;
mod random;
mod simulation;

pub use office::{is_healthy, OfficeService, SystemStatus, DEFAULT_EVENT_CAPACITY};
pub use random::{RandomSource, StdRandom};
pub use simulation::run_simulation;
