//! Utils module - Funzioni di supporto condivise dagli handler

pub mod logging;
pub mod obfuscation;
pub mod params;

pub use logging::{log_error, log_info, logged};
pub use obfuscation::{decode_string, encode_string};
pub use params::{missing_params, read_body, text_param};
