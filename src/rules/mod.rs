//! Time-windowed override rules (Q/P/K) and their sweep-line structures

mod periods;
mod windows;

pub use periods::{
    validate_periods, EvalPeriod, ExtraPeriod, FixedPeriod, KMode, Period,
};
pub use windows::{EvalWindow, ExtraWindow, FixedWindow};
