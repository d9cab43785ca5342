mod asr;
mod health;

pub use asr::{AsrResponse, ErrorResponse, asr_handler};
pub use health::ping_handler;
