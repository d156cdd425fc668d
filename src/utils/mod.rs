pub mod errors;
pub mod format;
pub mod ids;
