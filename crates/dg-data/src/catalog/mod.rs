//! Column catalogues for each dashboard grid

pub mod kol;
pub mod options;
pub mod signal;
pub mod token;

pub use kol::{
    kol_detail_binding, kol_detail_columns, kol_detail_state, kol_token_columns, KOL_DETAIL_PAGE_SIZES, KOL_TOKEN_PAGE_SIZES,
};
pub use signal::signal_columns;
pub use token::token_columns;

/// Characters of an address shown before truncation
pub const ADDRESS_CHARS: usize = 16;

/// External token page on Debot
pub fn debot_link(chain: &str, address: &str) -> String {
    format!("https://debot.ai/token/{chain}/{address}")
}
