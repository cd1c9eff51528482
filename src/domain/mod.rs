// Domain layer - Core types and selection policy

pub mod errors;
pub mod model;
pub mod rules;
