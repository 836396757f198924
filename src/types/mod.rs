// Downbar shared type definitions
// Each submodule defines types used across the engine.

pub mod download;
pub mod errors;
pub mod item;
pub mod settings;
