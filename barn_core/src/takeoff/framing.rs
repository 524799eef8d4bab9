//! Structural framing quantities: posts, trusses, wall girts, roof purlins.

use crate::geometry::GeometryModel;
use crate::inputs::{AssemblyInputs, MaterialInputs, PostType};
use crate::units::Unit;

use super::{names, AssemblyQuantity, Category};

/// Truss spacing within this tolerance of the bay spacing means one truss
/// per frame line; beyond it the count derives from the truss spacing.
const TRUSS_SPACING_TOLERANCE_FT: f64 = 0.5;

pub(super) fn collect(
    out: &mut Vec<AssemblyQuantity>,
    geometry: &GeometryModel,
    materials: &MaterialInputs,
    assemblies: &AssemblyInputs,
) {
    // Posts: one per frame line on each sidewall. Laminated columns route
    // to a different assembly name so the catalog maps a different part.
    let post_count = post_count(geometry);
    let (post_name, post_desc) = match assemblies.post_type {
        PostType::PtSolid => (names::POSTS, "Structural posts (pressure-treated solid)"),
        PostType::Laminated => (names::POSTS_LAMINATED, "Structural posts (laminated column)"),
    };
    out.push(
        AssemblyQuantity::new(post_name, post_desc, Category::Framing, post_count as f64, Unit::Each)
            .with_notes(format!(
                "One post per frame line on each sidewall ({} frame lines x 2 sidewalls)",
                geometry.frame_line_count
            )),
    );

    // Trusses
    let truss_count = truss_count(geometry, materials);
    out.push(
        AssemblyQuantity::new(
            names::TRUSSES,
            format!("{} trusses", materials.truss_style.display_name()),
            Category::Framing,
            truss_count as f64,
            Unit::Each,
        )
        .with_notes(format!(
            "Truss spacing: {}ft, {} post connection",
            materials.truss_spacing_ft,
            assemblies.connection.display_name()
        )),
    );

    // Wall girts
    let (sidewall_girt_lf, endwall_girt_lf) = girt_quantities(geometry, materials);
    out.push(
        AssemblyQuantity::new(
            names::SIDEWALL_GIRTS,
            "Horizontal girts for sidewalls",
            Category::Framing,
            sidewall_girt_lf,
            Unit::LinearFeet,
        )
        .with_notes(format!(
            "Girt spacing: {}ft, Height: {}ft",
            materials.girt_spacing_ft, geometry.eave_height_ft
        )),
    );
    if endwall_girt_lf > 0.0 {
        out.push(
            AssemblyQuantity::new(
                names::ENDWALL_GIRTS,
                "Horizontal girts for endwalls",
                Category::Framing,
                endwall_girt_lf,
                Unit::LinearFeet,
            )
            .with_notes(format!("Girt spacing: {}ft", materials.girt_spacing_ft)),
        );
    }

    // Roof purlins
    let purlin_lf = purlin_quantities(geometry, materials);
    out.push(
        AssemblyQuantity::new(
            names::ROOF_PURLINS,
            "Roof purlins (horizontal roof supports)",
            Category::Roof,
            purlin_lf,
            Unit::LinearFeet,
        )
        .with_notes(format!("Purlin spacing: {}ft", materials.purlin_spacing_ft)),
    );
}

/// One post per frame line on each sidewall.
pub fn post_count(geometry: &GeometryModel) -> u32 {
    geometry.frame_line_count * 2
}

/// Truss count: from truss spacing when it materially differs from the bay
/// spacing, otherwise one truss per frame line.
pub fn truss_count(geometry: &GeometryModel, materials: &MaterialInputs) -> u32 {
    if (materials.truss_spacing_ft - geometry.bay_spacing_ft).abs() > TRUSS_SPACING_TOLERANCE_FT {
        if materials.truss_spacing_ft > 0.0 {
            (geometry.overall_length_ft / materials.truss_spacing_ft).ceil() as u32 + 1
        } else {
            0
        }
    } else {
        geometry.frame_line_count
    }
}

/// Girt linear feet as `(sidewall_lf, endwall_lf)`.
///
/// Rows climb the wall at the girt spacing; each row runs the full wall
/// length on both walls of the pair.
pub fn girt_quantities(geometry: &GeometryModel, materials: &MaterialInputs) -> (f64, f64) {
    let rows = if materials.girt_spacing_ft > 0.0 {
        (geometry.eave_height_ft / materials.girt_spacing_ft).ceil()
    } else {
        0.0
    };

    let sidewall_lf = rows * geometry.overall_length_ft * 2.0;
    let endwall_lf = rows * geometry.overall_width_ft * 2.0;
    (sidewall_lf, endwall_lf)
}

/// Total purlin linear feet across both roof slopes.
///
/// Rows are spaced up the slope run (half the width per slope); each row
/// runs the building length plus both endwall overhangs.
pub fn purlin_quantities(geometry: &GeometryModel, materials: &MaterialInputs) -> f64 {
    let roof_run = geometry.overall_width_ft / 2.0;
    let rows = if materials.purlin_spacing_ft > 0.0 {
        (roof_run / materials.purlin_spacing_ft).ceil()
    } else {
        0.0
    };

    let effective_length = geometry.overall_length_ft
        + geometry.endwall_overhang_front_ft
        + geometry.endwall_overhang_rear_ft;

    rows * effective_length * 2.0
}
