// Domain layer - Core parsing and derivation logic

pub mod errors;
pub mod model;
pub mod rules;
