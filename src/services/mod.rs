pub mod export;
pub mod file_processor;
pub mod roster;
