//! Foundation quantities: slab concrete, slab reinforcement, and post
//! footing concrete.

use std::f64::consts::PI;

use crate::geometry::GeometryModel;
use crate::inputs::{FloorType, FoundationType, GeometryInputs, MaterialInputs, SlabReinforcement};
use crate::units::Unit;

use super::{framing, names, AssemblyQuantity, Category};

/// Assumed slab thickness when none is specified, in inches
const DEFAULT_SLAB_THICKNESS_IN: f64 = 4.0;

/// Wire mesh sheet coverage (5x10 or 6x6 sheets), in square feet
const MESH_SHEET_COVERAGE_SQFT: f64 = 50.0;

/// Augered footing hole diameter as a multiple of the post diameter
const FOOTING_HOLE_DIAMETER_FACTOR: f64 = 3.0;

pub(super) fn collect(
    out: &mut Vec<AssemblyQuantity>,
    geometry: &GeometryModel,
    materials: &MaterialInputs,
    geometry_inputs: &GeometryInputs,
) {
    collect_slab(out, geometry, materials);
    collect_footings(out, geometry, materials, geometry_inputs);
}

fn collect_slab(out: &mut Vec<AssemblyQuantity>, geometry: &GeometryModel, materials: &MaterialInputs) {
    if materials.floor_type != FloorType::Slab {
        return;
    }

    let footprint_sqft = geometry.footprint_area_sqft;
    let thickness_ft = materials.slab_thickness_in.unwrap_or(DEFAULT_SLAB_THICKNESS_IN) / 12.0;
    let volume_cy = footprint_sqft * thickness_ft / 27.0;

    out.push(
        AssemblyQuantity::new(
            names::SLAB_CONCRETE,
            "Concrete for slab",
            Category::Concrete,
            volume_cy,
            Unit::CubicYards,
        )
        .with_notes(format!(
            "Slab: {:.1} sqft x {:.1}\" thick",
            footprint_sqft,
            thickness_ft * 12.0
        )),
    );

    match materials.slab_reinforcement {
        SlabReinforcement::None => {}
        SlabReinforcement::Mesh => {
            let mesh_sheets = (footprint_sqft / MESH_SHEET_COVERAGE_SQFT).ceil();
            out.push(
                AssemblyQuantity::new(
                    names::SLAB_MESH,
                    "Wire mesh for slab reinforcement",
                    Category::Concrete,
                    mesh_sheets,
                    Unit::Each,
                )
                .with_notes("~50 sqft coverage per sheet"),
            );
        }
        SlabReinforcement::Rebar => {
            // Perimeter bars plus an interior grid at ~2' spacing
            let perimeter_lf = 2.0 * (geometry.overall_length_ft + geometry.overall_width_ft);
            let interior_lf =
                (geometry.overall_length_ft / 2.0) * (geometry.overall_width_ft / 2.0) * 2.0;
            out.push(
                AssemblyQuantity::new(
                    names::SLAB_REBAR,
                    "Rebar for slab reinforcement",
                    Category::Concrete,
                    perimeter_lf + interior_lf,
                    Unit::LinearFeet,
                )
                .with_notes("Grid pattern, ~2' spacing"),
            );
        }
    }
}

/// Concrete backfill for augered post holes. The hole diameter is taken as
/// three post diameters; the post's own displacement is ignored, which
/// over-orders slightly and never under-orders.
fn collect_footings(
    out: &mut Vec<AssemblyQuantity>,
    geometry: &GeometryModel,
    materials: &MaterialInputs,
    geometry_inputs: &GeometryInputs,
) {
    if materials.foundation_type != FoundationType::ConcretePad {
        return;
    }
    if geometry_inputs.pole_diameter_in <= 0.0 || geometry_inputs.pole_depth_ft <= 0.0 {
        return;
    }

    let post_count = framing::post_count(geometry) as f64;
    let hole_diameter_ft = geometry_inputs.pole_diameter_in * FOOTING_HOLE_DIAMETER_FACTOR / 12.0;
    let hole_area_sqft = PI * (hole_diameter_ft / 2.0).powi(2);
    let volume_cy = hole_area_sqft * geometry_inputs.pole_depth_ft * post_count / 27.0;

    out.push(
        AssemblyQuantity::new(
            names::FOOTING_CONCRETE,
            "Concrete for post footings",
            Category::Concrete,
            volume_cy,
            Unit::CubicYards,
        )
        .with_notes(format!(
            "{} holes, {:.0}\" dia x {:.1}' deep",
            post_count,
            hole_diameter_ft * 12.0,
            geometry_inputs.pole_depth_ft
        )),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::resolve;

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
    fn test_slab_volume() {
        let model = resolve(&test_inputs());
        let mut materials = MaterialInputs::default();
        materials.floor_type = FloorType::Slab;
        materials.slab_thickness_in = Some(4.0);
        let mut out = Vec::new();
        collect_slab(&mut out, &model, &materials);

        let slab = out.iter().find(|a| a.name == names::SLAB_CONCRETE).unwrap();
        // 1200 sqft * (4/12) ft / 27 = 14.81 cuyd
        assert!((slab.quantity - 1200.0 * (4.0 / 12.0) / 27.0).abs() < 1e-9);
        assert_eq!(slab.unit, Unit::CubicYards);
    }

    #[test]
    fn test_mesh_sheet_count() {
        let model = resolve(&test_inputs());
        let mut materials = MaterialInputs::default();
        materials.floor_type = FloorType::Slab;
        materials.slab_reinforcement = SlabReinforcement::Mesh;
        let mut out = Vec::new();
        collect_slab(&mut out, &model, &materials);

        let mesh = out.iter().find(|a| a.name == names::SLAB_MESH).unwrap();
        // ceil(1200 / 50) = 24 sheets
        assert_eq!(mesh.quantity, 24.0);
    }

    #[test]
    fn test_rebar_grid() {
        let model = resolve(&test_inputs());
        let mut materials = MaterialInputs::default();
        materials.floor_type = FloorType::Slab;
        materials.slab_reinforcement = SlabReinforcement::Rebar;
        let mut out = Vec::new();
        collect_slab(&mut out, &model, &materials);

        let rebar = out.iter().find(|a| a.name == names::SLAB_REBAR).unwrap();
        // Perimeter 140 + interior 20*15*2 = 740 lf
        assert_eq!(rebar.quantity, 740.0);
    }

    #[test]
    fn test_no_slab_no_concrete() {
        let model = resolve(&test_inputs());
        let mut out = Vec::new();
        collect_slab(&mut out, &model, &MaterialInputs::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_footing_volume() {
        let inputs = test_inputs();
        let model = resolve(&inputs);
        let mut out = Vec::new();
        collect_footings(&mut out, &model, &MaterialInputs::default(), &inputs);

        let footing = out.iter().find(|a| a.name == names::FOOTING_CONCRETE).unwrap();
        // 10 posts, 18" dia holes, 4' deep
        let hole_area = PI * (1.5f64 / 2.0).powi(2);
        let expected = hole_area * 4.0 * 10.0 / 27.0;
        assert!((footing.quantity - expected).abs() < 1e-9);

        // Gravel foundation skips footing concrete
        let mut materials = MaterialInputs::default();
        materials.foundation_type = FoundationType::Gravel;
        let mut out = Vec::new();
        collect_footings(&mut out, &model, &materials, &inputs);
        assert!(out.is_empty());
    }
}
