// Office state and derived status rules

mod office;

pub use office::{Level, OfficeState, DEFAULT_GARBAGE_LEVEL, DEFAULT_ROOM_TEMPERATURE};
pub(crate) use office::clamp_percent;
