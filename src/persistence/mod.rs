//! Save/load persistence
//!
//! The save path is reserved; no save/load behavior exists yet.

/// Reserved save file name
pub const SAVE_FILE: &str = "monkey_siege.json";

// TODO: Implement persistence
// pub mod envelope;
// pub mod validation;
