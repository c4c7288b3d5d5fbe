//! Row types shown by the dashboard grids

pub mod kol;
pub mod signal;
pub mod token;

pub use kol::{KolDetail, KolTokenRow};
pub use signal::{available_dates, rows_for_date, SignalRow};
pub use token::{TokenMetadata, TokenRow};
