// src/models/mod.rs
//! Model Catalogue
//!
//! Factories that bundle named model parameters into SDE value objects.
//! The engine treats these as opaque producers: any `(drift, diffusion,
//! x0)` bundle works, the catalogue just covers the standard ones.

pub mod abm;
pub mod cev;
pub mod gbm;
pub mod heston;

pub use abm::ArithmeticBrownianMotion;
pub use cev::ConstantElasticityOfVariance;
pub use gbm::GeometricBrownianMotion;
pub use heston::HestonModel;
