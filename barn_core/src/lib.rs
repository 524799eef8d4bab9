//! # barn_core - Post-Frame Takeoff & Estimating Engine
//!
//! `barn_core` is the computational heart of Barnwright: it turns a
//! building's geometry, material choices, and pricing parameters into a
//! material takeoff, a packed bill of materials, and a fully priced
//! line-item breakdown with rollup totals.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions over immutable inputs and read-only
//!   catalog snapshots; no file I/O, no network, no shared mutable state
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Degrade, don't fail**: Mapping gaps, pricing gaps, and packing edge
//!   cases produce annotated results and diagnostics, never errors
//! - **Never under-order**: Stock-length and stick packing always cover at
//!   least the raw demand times waste
//!
//! ## Pipeline
//!
//! ```text
//! GeometryInputs ──► geometry::resolve ──► GeometryModel
//!                                             │
//!                          takeoff::calculate ▼
//!                     Vec<AssemblyQuantity> (raw units)
//!                        │                     │
//!   pricing::price_material_takeoff   bom::expand_to_parts
//!        │            │                        │
//!  PricedLineItems  PricingSummary       Vec<PartQuantity>
//!                                              │
//!                     bom::takeoff_from_bom ◄──┘  (reconciled takeoff)
//! ```
//!
//! [`estimate::Estimator`] runs the whole pipeline and returns every
//! artifact together.
//!
//! ## Quick Start
//!
//! ```rust
//! use barn_core::catalog::Catalogs;
//! use barn_core::estimate::Estimator;
//! use barn_core::inputs::BarnInputs;
//!
//! let estimator = Estimator::new(Catalogs::builtin()).unwrap();
//!
//! let mut inputs = BarnInputs::default();
//! inputs.geometry.length_ft = 40.0;
//! inputs.geometry.width_ft = 30.0;
//! inputs.geometry.eave_height_ft = 12.0;
//! inputs.geometry.roof_pitch = 4.0 / 12.0;
//!
//! let estimate = estimator.estimate(&inputs);
//! println!("Grand total: ${:.2}", estimate.summary.grand_total);
//! ```
//!
//! ## Modules
//!
//! - [`inputs`] - Input structs and material/assembly choice enums
//! - [`geometry`] - Geometry resolver (areas, bays, peak height)
//! - [`takeoff`] - Assembly quantity calculator
//! - [`catalog`] - Parts/pricing/mapping tables
//! - [`bom`] - BOM expansion and the packing algorithms
//! - [`pricing`] - Line-item pricing and rollups
//! - [`estimate`] - Pipeline orchestrator
//! - [`diagnostics`] - Structured non-fatal findings
//! - [`units`] - Units of measure
//! - [`errors`] - Structured error types

pub mod bom;
pub mod catalog;
pub mod diagnostics;
pub mod errors;
pub mod estimate;
pub mod geometry;
pub mod inputs;
pub mod pricing;
pub mod takeoff;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{EstimateError, EstimateResult};
pub use estimate::{Estimate, Estimator};
pub use inputs::BarnInputs;
