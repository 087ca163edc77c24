// handlers/mod.rs - Public (no auth) and protected (Basic auth + card owner role) tiers

pub mod protected;
pub mod public;
