//! # Estimator
//!
//! Sequences the full pipeline: geometry resolution, assembly quantity
//! takeoff, pricing, BOM expansion, and the final reconciliation that
//! rebuilds the reported takeoff from the packed BOM so whole-unit counts
//! agree everywhere.
//!
//! Pricing operates on the pre-packed assembly quantities; BOM expansion
//! reads the same immutable takeoff independently, so the two stages have
//! no ordering dependency between them.
//!
//! Catalog problems are the only fatal errors and they surface in
//! [`Estimator::new`], before any calculation runs. `estimate` itself
//! always succeeds, degrading per line with diagnostics.
//!
//! ## Example
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
//! inputs.geometry.pole_spacing_length_ft = 10.0;
//!
//! let estimate = estimator.estimate(&inputs);
//! assert!(estimate.summary.grand_total > 0.0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::bom::{self, PartQuantity};
use crate::catalog::Catalogs;
use crate::diagnostics::Diagnostic;
use crate::errors::EstimateResult;
use crate::geometry::{self, GeometryModel};
use crate::inputs::BarnInputs;
use crate::pricing::{self, PricedLineItem, PricingSummary};
use crate::takeoff::{self, MaterialTakeoff};

/// Identity envelope for one estimate run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateMeta {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub project_name: Option<String>,
    pub notes: Option<String>,
}

/// All artifacts of one calculation.
///
/// `takeoff` holds the reconciled whole-unit counts aggregated from the
/// BOM, not the raw footage/area the calculator produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub meta: EstimateMeta,
    pub geometry: GeometryModel,
    pub takeoff: MaterialTakeoff,
    pub priced_items: Vec<PricedLineItem>,
    pub summary: PricingSummary,
    pub bom: Vec<PartQuantity>,
    pub diagnostics: Vec<Diagnostic>,
}

/// The pipeline orchestrator. Owns a validated catalog snapshot; catalogs
/// stay frozen for every estimate produced by this instance.
#[derive(Debug, Clone)]
pub struct Estimator {
    catalogs: Catalogs,
}

impl Estimator {
    /// Create an estimator over a catalog snapshot.
    ///
    /// Fails fast on structurally invalid catalogs (the only fatal error
    /// class); a valid snapshot can never fail later.
    pub fn new(catalogs: Catalogs) -> EstimateResult<Self> {
        catalogs.validate()?;
        Ok(Estimator { catalogs })
    }

    /// Estimator over the built-in demo catalog.
    pub fn with_builtin_catalogs() -> Self {
        Estimator {
            catalogs: Catalogs::builtin(),
        }
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    /// Run the full pipeline for one set of inputs.
    pub fn estimate(&self, inputs: &BarnInputs) -> Estimate {
        // 1. Geometry
        let geometry = geometry::resolve(&inputs.geometry);

        // 2. Assembly quantities
        let raw_takeoff = MaterialTakeoff::new(takeoff::calculate(
            &geometry,
            &inputs.materials,
            &inputs.assemblies,
            &inputs.geometry,
        ));
        debug!(assemblies = raw_takeoff.items.len(), "takeoff calculated");

        // 3. Price the assembly-level takeoff
        let (priced_items, summary, pricing_diagnostics) =
            pricing::price_material_takeoff(&raw_takeoff, &inputs.pricing, &self.catalogs);

        // 4. Expand to the packed BOM
        let (bom, bom_diagnostics) = bom::expand_to_parts(
            &raw_takeoff,
            &self.catalogs,
            Some(&geometry),
            Some(&inputs.geometry),
        );

        // 5. Reconcile: report the takeoff in the same whole-unit counts as
        //    the BOM
        let takeoff = bom::takeoff_from_bom(&bom);

        let mut diagnostics = pricing_diagnostics;
        for diag in bom_diagnostics {
            if !diagnostics.contains(&diag) {
                diagnostics.push(diag);
            }
        }

        Estimate {
            meta: EstimateMeta {
                id: Uuid::new_v4(),
                generated_at: Utc::now(),
                project_name: inputs.project_name.clone(),
                notes: inputs.notes.clone(),
            },
            geometry,
            takeoff,
            priced_items,
            summary,
            bom,
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EstimateError;
    use crate::takeoff::names;
    use crate::units::Unit;

    fn baseline_inputs() -> BarnInputs {
        let mut inputs = BarnInputs::default();
        inputs.geometry.length_ft = 40.0;
        inputs.geometry.width_ft = 30.0;
        inputs.geometry.eave_height_ft = 12.0;
        inputs.geometry.roof_pitch = 4.0 / 12.0;
        inputs.geometry.pole_spacing_length_ft = 10.0;
        inputs
    }

    #[test]
    fn test_empty_catalog_is_fatal_before_calculation() {
        let catalogs = Catalogs::new(Vec::new(), Vec::new(), Vec::new());
        assert!(matches!(
            Estimator::new(catalogs),
            Err(EstimateError::MissingCatalog { .. })
        ));
    }

    #[test]
    fn test_end_to_end_baseline_building() {
        let estimator = Estimator::with_builtin_catalogs();
        let estimate = estimator.estimate(&baseline_inputs());

        // Geometry expectations for 40x30, 12' eave, 4:12, 10' bays
        assert_eq!(estimate.geometry.bay_count, 4);
        assert_eq!(estimate.geometry.frame_line_count, 5);
        assert_eq!(estimate.geometry.footprint_area_sqft, 1200.0);
        assert!((estimate.geometry.peak_height_ft - 17.0).abs() < 0.01);

        // Priced line list covers the structural systems
        for name in [
            names::POSTS,
            names::TRUSSES,
            names::SIDEWALL_GIRTS,
            names::ROOF_PURLINS,
            names::ROOF_PANELS,
            names::SIDEWALL_PANELS,
        ] {
            assert!(
                estimate.priced_items.iter().any(|i| i.name == name),
                "missing priced line {name}"
            );
        }
        assert!(estimate.summary.grand_total > 0.0);

        // BOM is non-empty and countable rows are whole
        assert!(!estimate.bom.is_empty());
        for row in &estimate.bom {
            if row.unit == Unit::Each {
                assert_eq!(row.qty, row.qty.round(), "fractional count for {}", row.part_id);
            }
        }
    }

    #[test]
    fn test_takeoff_reconciled_to_bom() {
        let estimator = Estimator::with_builtin_catalogs();
        let estimate = estimator.estimate(&baseline_inputs());

        // Same total unit counts in both views
        let bom_total: f64 = estimate.bom.iter().map(|r| r.qty).sum();
        let takeoff_total: f64 = estimate.takeoff.items.iter().map(|i| i.quantity).sum();
        assert!((bom_total - takeoff_total).abs() < 1e-9);

        // The reconciled takeoff reports packed units, not raw footage: the
        // lumber entry counts sticks, far fewer than the ~1500 raw lf
        let lumber = estimate
            .takeoff
            .items
            .iter()
            .filter(|i| i.name.starts_with("lbr 2x6"))
            .map(|i| i.quantity)
            .sum::<f64>();
        assert!(lumber > 0.0);
        assert!(lumber < 200.0);
    }

    #[test]
    fn test_two_door_framing_formulas() {
        let mut inputs = baseline_inputs();
        inputs.geometry.door_count = 2;
        let estimator = Estimator::with_builtin_catalogs();
        let estimate = estimator.estimate(&inputs);

        // Per 3'x7' door: header 3.5' + 2 kings x 12' + 2 trimmers x 7'
        let framing = estimate
            .priced_items
            .iter()
            .find(|i| i.name == names::DOOR_FRAMING)
            .unwrap();
        assert!((framing.quantity - 2.0 * (3.5 + 24.0 + 14.0)).abs() < 1e-9);

        // Head + two jambs per door
        let trim = estimate
            .priced_items
            .iter()
            .find(|i| i.name == names::DOOR_TRIM)
            .unwrap();
        assert!((trim.quantity - 2.0 * 17.0).abs() < 1e-9);
        assert!(framing.total_cost > 0.0);
    }

    #[test]
    fn test_idempotent_runs() {
        let estimator = Estimator::with_builtin_catalogs();
        let inputs = baseline_inputs();
        let first = estimator.estimate(&inputs);
        let second = estimator.estimate(&inputs);

        // Byte-identical pricing summary and BOM (the meta envelope is the
        // only part that differs between runs)
        assert_eq!(
            serde_json::to_string(&first.summary).unwrap(),
            serde_json::to_string(&second.summary).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&first.bom).unwrap(),
            serde_json::to_string(&second.bom).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&first.takeoff).unwrap(),
            serde_json::to_string(&second.takeoff).unwrap()
        );
    }

    #[test]
    fn test_packed_cost_never_below_raw_demand() {
        let estimator = Estimator::with_builtin_catalogs();
        let estimate = estimator.estimate(&baseline_inputs());

        // Packed lumber footage covers at least the raw linear demand
        let raw_lumber_lf: f64 = [
            names::SIDEWALL_GIRTS,
            names::ENDWALL_GIRTS,
            names::ROOF_PURLINS,
        ]
        .iter()
        .filter_map(|n| estimate.priced_items.iter().find(|i| &i.name.as_str() == n))
        .map(|i| i.quantity)
        .sum();
        let packed_lf: f64 = estimate
            .bom
            .iter()
            .filter(|r| r.part_id == "LBR_2X6_LF")
            .map(|r| r.qty * r.length_in.unwrap() / 12.0)
            .sum();
        assert!(packed_lf >= raw_lumber_lf);
    }

    #[test]
    fn test_estimate_serializes() {
        let estimator = Estimator::with_builtin_catalogs();
        let estimate = estimator.estimate(&baseline_inputs());
        let json = serde_json::to_string_pretty(&estimate).unwrap();
        let roundtrip: Estimate = serde_json::from_str(&json).unwrap();
        assert_eq!(estimate, roundtrip);
    }
}
