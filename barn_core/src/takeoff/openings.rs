//! Opening quantities: door and window framing/trim, overhead doors, and
//! J-channel demand.
//!
//! Framing, exterior trim, and J-channel all read the opening dimensions
//! from [`GeometryInputs`]; the defaults there are the standard 3'x7' door
//! and 3'x3' window.

use crate::bom;
use crate::geometry::GeometryModel;
use crate::inputs::{GeometryInputs, MaterialInputs, OverheadDoorType};
use crate::units::Unit;

use super::{names, AssemblyQuantity, Category};

/// Header stock extends past the rough opening by 6" (3" bearing per side).
const HEADER_EXTRA_FT: f64 = 0.5;

pub(super) fn collect(
    out: &mut Vec<AssemblyQuantity>,
    geometry: &GeometryModel,
    materials: &MaterialInputs,
    geometry_inputs: &GeometryInputs,
) {
    collect_door_window(out, geometry, geometry_inputs);
    collect_overhead_doors(out, geometry_inputs);
    if materials.exterior_finish.is_metal() {
        collect_j_channel(out, geometry, geometry_inputs);
    }
}

fn collect_door_window(
    out: &mut Vec<AssemblyQuantity>,
    geometry: &GeometryModel,
    inputs: &GeometryInputs,
) {
    let doors = inputs.door_count as f64;
    let windows = inputs.window_count as f64;

    if inputs.door_count > 0 {
        // Per door: one header, two full-height king studs, two trimmers
        let header_lf = doors * (inputs.door_width_ft + HEADER_EXTRA_FT);
        let king_stud_lf = doors * 2.0 * geometry.eave_height_ft;
        let trimmer_lf = doors * 2.0 * inputs.door_height_ft;
        out.push(
            AssemblyQuantity::new(
                names::DOOR_FRAMING,
                "Extra framing lumber for doors (headers, studs, trimmers)",
                Category::Framing,
                header_lf + king_stud_lf + trimmer_lf,
                Unit::LinearFeet,
            )
            .with_notes(format!(
                "{}' x {}' doors",
                inputs.door_width_ft, inputs.door_height_ft
            )),
        );

        // Head plus two jambs; no trim across the threshold
        let door_trim_lf = doors * (inputs.door_width_ft + 2.0 * inputs.door_height_ft);
        out.push(
            AssemblyQuantity::new(
                names::DOOR_TRIM,
                "Exterior trim for doors (head + jambs)",
                Category::Trim,
                door_trim_lf,
                Unit::LinearFeet,
            )
            .with_notes(format!(
                "Per door: {}' head + 2 x {}' jambs",
                inputs.door_width_ft, inputs.door_height_ft
            )),
        );
    }

    if inputs.window_count > 0 {
        let header_lf = windows * (inputs.window_width_ft + HEADER_EXTRA_FT);
        let king_stud_lf = windows * 2.0 * geometry.eave_height_ft;
        let trimmer_lf = windows * 2.0 * inputs.window_height_ft;
        out.push(
            AssemblyQuantity::new(
                names::WINDOW_FRAMING,
                "Extra framing lumber for windows (headers, studs, trimmers)",
                Category::Framing,
                header_lf + king_stud_lf + trimmer_lf,
                Unit::LinearFeet,
            )
            .with_notes(format!(
                "{}' x {}' windows",
                inputs.window_width_ft, inputs.window_height_ft
            )),
        );

        // Head, sill, and two jambs
        let window_trim_lf =
            windows * (2.0 * inputs.window_width_ft + 2.0 * inputs.window_height_ft);
        out.push(
            AssemblyQuantity::new(
                names::WINDOW_TRIM,
                "Exterior trim for windows (head + sill + jambs)",
                Category::Trim,
                window_trim_lf,
                Unit::LinearFeet,
            )
            .with_notes(format!(
                "Per window: {}' head + {}' sill + 2 x {}' jambs",
                inputs.window_width_ft, inputs.window_width_ft, inputs.window_height_ft
            )),
        );
    }
}

fn collect_overhead_doors(out: &mut Vec<AssemblyQuantity>, inputs: &GeometryInputs) {
    if inputs.overhead_door_count == 0 || inputs.overhead_door_type == OverheadDoorType::None {
        return;
    }
    out.push(
        AssemblyQuantity::new(
            names::OVERHEAD_DOORS,
            format!(
                "Overhead doors ({})",
                inputs.overhead_door_type.display_name()
            ),
            Category::Doors,
            inputs.overhead_door_count as f64,
            Unit::Each,
        )
        .with_notes("8' x 7' typical"),
    );
}

/// J-channel demand in total inches. The segment list is regenerated during
/// BOM expansion for stick packing; this assembly carries the bulk demand
/// so pricing and takeoff reporting see it.
fn collect_j_channel(
    out: &mut Vec<AssemblyQuantity>,
    geometry: &GeometryModel,
    inputs: &GeometryInputs,
) {
    let segments = bom::j_channel_segments(geometry, inputs);
    if segments.is_empty() {
        return;
    }
    let total_inches: f64 = segments.iter().sum();
    out.push(
        AssemblyQuantity::new(
            names::J_CHANNEL,
            "J-channel trim (doors, windows, eave tops)",
            Category::Trim,
            total_inches,
            Unit::Inches,
        )
        .with_notes(format!(
            "{} segments, total {:.1}\"",
            segments.len(),
            total_inches
        )),
    );
}
