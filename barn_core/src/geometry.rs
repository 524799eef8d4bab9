//! # Geometry Resolver
//!
//! Turns raw dimensional inputs into the derived geometry model the rest of
//! the pipeline consumes: bay layout, wall and roof areas, peak height, and
//! the roof slope factor.
//!
//! ## Assumptions
//!
//! - Bays run along the length axis; `frame_line_count = bay_count + 1`.
//! - Roof area applies the slope factor to the overhang-inclusive plan
//!   area: `sqrt(1 + pitch^2) * L_eff * W_eff`.
//! - A gable ridge sits centered on the width unless a peak height is
//!   supplied; a shed roof rises across the full width.
//!
//! This is a pure function with no failure modes: degenerate inputs (zero
//! length, zero spacing) produce a degenerate zero model, and validation
//! belongs to the layers above.
//!
//! ## Example
//!
//! ```rust
//! use barn_core::geometry::resolve;
//! use barn_core::inputs::GeometryInputs;
//!
//! let mut inputs = GeometryInputs::default();
//! inputs.length_ft = 40.0;
//! inputs.width_ft = 30.0;
//! inputs.eave_height_ft = 12.0;
//! inputs.roof_pitch = 4.0 / 12.0;
//! inputs.pole_spacing_length_ft = 10.0;
//!
//! let model = resolve(&inputs);
//! assert_eq!(model.bay_count, 4);
//! assert_eq!(model.frame_line_count, 5);
//! assert_eq!(model.footprint_area_sqft, 1200.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::inputs::{GeometryInputs, RoofStyle};

/// Derived, read-only geometry model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryModel {
    // Core dimensions (echoed from inputs for reference)
    pub overall_length_ft: f64,
    pub overall_width_ft: f64,
    pub eave_height_ft: f64,
    pub peak_height_ft: f64,
    pub sidewall_overhang_ft: f64,
    pub endwall_overhang_front_ft: f64,
    pub endwall_overhang_rear_ft: f64,

    // Bays / frames
    pub bay_spacing_ft: f64,
    pub bay_count: u32,
    /// Always `bay_count + 1`
    pub frame_line_count: u32,

    // Areas
    pub footprint_area_sqft: f64,
    /// Both sidewalls combined
    pub sidewall_area_sqft: f64,
    /// Both endwalls combined
    pub endwall_area_sqft: f64,
    pub total_wall_area_sqft: f64,
    /// Surface area including pitch and overhangs
    pub roof_area_sqft: f64,

    /// `sqrt(1 + pitch^2)`, the plan-to-surface multiplier for the roof
    pub slope_factor: f64,

    /// Box approximation at eave height
    pub building_volume_cuft: f64,
}

/// Slope factor for roof surface area.
///
/// The pitch is a rise/run ratio (4:12 roof = 0.333...), so the surface
/// length per unit of plan run is `sqrt(1 + pitch^2)`.
fn roof_slope_factor(roof_pitch: f64) -> f64 {
    (1.0 + roof_pitch * roof_pitch).sqrt()
}

/// Build the complete geometry model from raw inputs.
pub fn resolve(inputs: &GeometryInputs) -> GeometryModel {
    let length = inputs.length_ft;
    let width = inputs.width_ft;
    let eave = inputs.eave_height_ft;
    let bay_spacing = inputs.pole_spacing_length_ft;

    let bay_count = if bay_spacing > 0.0 {
        (length / bay_spacing).ceil() as u32
    } else {
        0
    };
    let frame_line_count = bay_count + 1;

    // Plan-view footprint, no overhangs
    let footprint_area_sqft = length * width;

    // Wall areas ignore door/window cut-outs; openings are tracked separately
    let sidewall_area_sqft = 2.0 * length * eave;
    let endwall_area_sqft = 2.0 * width * eave;
    let total_wall_area_sqft = sidewall_area_sqft + endwall_area_sqft;

    // Effective plan dimensions include overhangs
    let length_eff = length + inputs.overhang_front_ft + inputs.overhang_rear_ft;
    let width_eff = width + 2.0 * inputs.overhang_sides_ft;

    let slope_factor = roof_slope_factor(inputs.roof_pitch);
    let roof_area_sqft = length_eff * width_eff * slope_factor;

    let building_volume_cuft = footprint_area_sqft * eave;

    // Derive peak height when not supplied. The rise run is half the width
    // for a centered gable ridge, the full width for a shed.
    let peak_height_ft = match inputs.peak_height_ft {
        Some(peak) => peak,
        None => {
            let run_ft = match inputs.roof_style {
                RoofStyle::Gable => width / 2.0,
                RoofStyle::Shed => width,
            };
            eave + run_ft * inputs.roof_pitch
        }
    };

    GeometryModel {
        overall_length_ft: length,
        overall_width_ft: width,
        eave_height_ft: eave,
        peak_height_ft,
        sidewall_overhang_ft: inputs.overhang_sides_ft,
        endwall_overhang_front_ft: inputs.overhang_front_ft,
        endwall_overhang_rear_ft: inputs.overhang_rear_ft,
        bay_spacing_ft: bay_spacing,
        bay_count,
        frame_line_count,
        footprint_area_sqft,
        sidewall_area_sqft,
        endwall_area_sqft,
        total_wall_area_sqft,
        roof_area_sqft,
        slope_factor,
        building_volume_cuft,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_inputs() -> GeometryInputs {
        GeometryInputs {
            length_ft: 40.0,
            width_ft: 30.0,
            eave_height_ft: 12.0,
            roof_pitch: 4.0 / 12.0,
            pole_spacing_length_ft: 10.0,
            ..GeometryInputs::default()
        }
    }

    #[test]
    fn test_bay_and_frame_counts() {
        let model = resolve(&test_inputs());
        assert_eq!(model.bay_count, 4);
        assert_eq!(model.frame_line_count, model.bay_count + 1);

        // Non-even division rounds bays up
        let mut inputs = test_inputs();
        inputs.length_ft = 41.0;
        let model = resolve(&inputs);
        assert_eq!(model.bay_count, 5);
        assert_eq!(model.frame_line_count, 6);
    }

    #[test]
    fn test_areas() {
        let model = resolve(&test_inputs());
        assert_eq!(model.footprint_area_sqft, 1200.0);
        assert_eq!(model.sidewall_area_sqft, 2.0 * 40.0 * 12.0);
        assert_eq!(model.endwall_area_sqft, 2.0 * 30.0 * 12.0);
        assert_eq!(
            model.total_wall_area_sqft,
            model.sidewall_area_sqft + model.endwall_area_sqft
        );
        assert_eq!(model.building_volume_cuft, 1200.0 * 12.0);
    }

    #[test]
    fn test_roof_area_reflects_pitch_and_overhangs() {
        // Flat roof, no overhangs: roof area equals footprint exactly
        let mut inputs = test_inputs();
        inputs.roof_pitch = 0.0;
        let flat = resolve(&inputs);
        assert_eq!(flat.roof_area_sqft, flat.footprint_area_sqft);
        assert_eq!(flat.slope_factor, 1.0);

        // Pitched roof is always larger than the footprint
        let pitched = resolve(&test_inputs());
        assert!(pitched.roof_area_sqft > pitched.footprint_area_sqft);

        // Overhangs grow the plan area before the slope factor applies
        let mut inputs = test_inputs();
        inputs.overhang_front_ft = 1.0;
        inputs.overhang_rear_ft = 1.0;
        inputs.overhang_sides_ft = 1.5;
        let model = resolve(&inputs);
        let expected = 42.0 * 33.0 * (1.0f64 + (4.0f64 / 12.0).powi(2)).sqrt();
        assert!((model.roof_area_sqft - expected).abs() < 1e-9);
    }

    #[test]
    fn test_peak_height_derivation() {
        // Centered gable: 12 + 15 * 4/12 = 17
        let model = resolve(&test_inputs());
        assert!((model.peak_height_ft - 17.0).abs() < 1e-9);
        assert!(model.peak_height_ft >= model.eave_height_ft);

        // Shed rises across the full width: 12 + 30 * 4/12 = 22
        let mut inputs = test_inputs();
        inputs.roof_style = RoofStyle::Shed;
        let model = resolve(&inputs);
        assert!((model.peak_height_ft - 22.0).abs() < 1e-9);

        // Supplied peak wins over derivation
        let mut inputs = test_inputs();
        inputs.peak_height_ft = Some(16.0);
        let model = resolve(&inputs);
        assert_eq!(model.peak_height_ft, 16.0);
    }

    #[test]
    fn test_degenerate_inputs_degenerate_model() {
        let model = resolve(&GeometryInputs::default());
        assert_eq!(model.bay_count, 0);
        assert_eq!(model.frame_line_count, 1);
        assert_eq!(model.footprint_area_sqft, 0.0);
        assert_eq!(model.roof_area_sqft, 0.0);
    }
}
