//! Building envelope quantities: panels, trim, insulation, sheathing, and
//! ventilation.
//!
//! Panels are emitted as *area* demand here; converting area to discrete
//! panel counts happens in BOM expansion, after waste factors, so the two
//! stages never double-count coverage.

use crate::geometry::GeometryModel;
use crate::inputs::{AssemblyInputs, ExteriorFinish, InsulationType, MaterialInputs, SheathingType, VentilationType};
use crate::units::Unit;

use super::{names, AssemblyQuantity, Category};

pub(super) fn collect(
    out: &mut Vec<AssemblyQuantity>,
    geometry: &GeometryModel,
    materials: &MaterialInputs,
    assemblies: &AssemblyInputs,
) {
    collect_panels(out, geometry, materials);
    collect_trim(out, geometry);
    collect_insulation(out, geometry, materials);
    collect_sheathing(out, geometry, materials);
    collect_ventilation(out, assemblies);
}

fn collect_panels(out: &mut Vec<AssemblyQuantity>, geometry: &GeometryModel, materials: &MaterialInputs) {
    // Heavier-gauge metal routes to distinct assembly names so the catalog
    // maps the 26ga parts; lap siding and stucco reuse the default names.
    let (roof_name, side_name, end_name, finish_note) = match materials.exterior_finish {
        ExteriorFinish::Metal26ga => (
            names::ROOF_PANELS_26GA,
            names::SIDEWALL_PANELS_26GA,
            names::ENDWALL_PANELS_26GA,
            "26ga metal panels",
        ),
        ExteriorFinish::Metal29ga => (
            names::ROOF_PANELS,
            names::SIDEWALL_PANELS,
            names::ENDWALL_PANELS,
            "29ga metal panels",
        ),
        ExteriorFinish::LapSiding | ExteriorFinish::Stucco => (
            names::ROOF_PANELS,
            names::SIDEWALL_PANELS,
            names::ENDWALL_PANELS,
            "non-metal exterior finish",
        ),
    };
    let finish = materials.exterior_finish.display_name();

    out.push(
        AssemblyQuantity::new(
            roof_name,
            format!("Roof panels ({finish})"),
            Category::Roof,
            geometry.roof_area_sqft,
            Unit::SquareFeet,
        )
        .with_notes(finish_note),
    );
    out.push(
        AssemblyQuantity::new(
            side_name,
            format!("Sidewall panels ({finish})"),
            Category::Wall,
            geometry.sidewall_area_sqft,
            Unit::SquareFeet,
        )
        .with_notes(finish_note),
    );
    out.push(
        AssemblyQuantity::new(
            end_name,
            format!("Endwall panels ({finish})"),
            Category::Wall,
            geometry.endwall_area_sqft,
            Unit::SquareFeet,
        )
        .with_notes(finish_note),
    );
}

/// Perimeter/height trim runs. Always emitted, even at zero, so downstream
/// consumers see the complete trim schedule.
fn collect_trim(out: &mut Vec<AssemblyQuantity>, geometry: &GeometryModel) {
    out.push(AssemblyQuantity::new(
        names::EAVE_TRIM,
        "Eave trim (along length)",
        Category::Trim,
        2.0 * geometry.overall_length_ft,
        Unit::LinearFeet,
    ));
    out.push(AssemblyQuantity::new(
        names::RAKE_TRIM,
        "Rake trim (gable edges)",
        Category::Trim,
        2.0 * geometry.overall_width_ft,
        Unit::LinearFeet,
    ));
    out.push(AssemblyQuantity::new(
        names::BASE_TRIM,
        "Base trim (perimeter)",
        Category::Trim,
        2.0 * (geometry.overall_length_ft + geometry.overall_width_ft),
        Unit::LinearFeet,
    ));
    out.push(AssemblyQuantity::new(
        names::CORNER_TRIM,
        "Corner trim (vertical corners)",
        Category::Trim,
        4.0 * geometry.eave_height_ft,
        Unit::LinearFeet,
    ));
}

fn collect_insulation(out: &mut Vec<AssemblyQuantity>, geometry: &GeometryModel, materials: &MaterialInputs) {
    if let Some(name) = wall_insulation_name(materials.wall_insulation) {
        out.push(
            AssemblyQuantity::new(
                name,
                format!("Wall insulation ({})", materials.wall_insulation.display_name()),
                Category::Insulation,
                geometry.total_wall_area_sqft,
                Unit::SquareFeet,
            )
            .with_notes(format!("Insulation type: {}", materials.wall_insulation.display_name())),
        );
    }
    if let Some(name) = roof_insulation_name(materials.roof_insulation) {
        out.push(
            AssemblyQuantity::new(
                name,
                format!("Roof insulation ({})", materials.roof_insulation.display_name()),
                Category::Insulation,
                geometry.roof_area_sqft,
                Unit::SquareFeet,
            )
            .with_notes(format!("Insulation type: {}", materials.roof_insulation.display_name())),
        );
    }
}

/// Distinct assembly name per insulation sub-type so the catalog maps the
/// correct part; `None` means no assembly at all.
fn wall_insulation_name(ins: InsulationType) -> Option<&'static str> {
    match ins {
        InsulationType::None => None,
        InsulationType::FiberglassBatts => Some(names::WALL_INSULATION),
        InsulationType::RockWool => Some(names::WALL_INSULATION_ROCKWOOL),
        InsulationType::RigidBoard => Some(names::WALL_INSULATION_RIGID),
        InsulationType::SprayFoam => Some(names::WALL_INSULATION_SPRAYFOAM),
    }
}

fn roof_insulation_name(ins: InsulationType) -> Option<&'static str> {
    match ins {
        InsulationType::None => None,
        InsulationType::FiberglassBatts => Some(names::ROOF_INSULATION),
        InsulationType::RockWool => Some(names::ROOF_INSULATION_ROCKWOOL),
        InsulationType::RigidBoard => Some(names::ROOF_INSULATION_RIGID),
        InsulationType::SprayFoam => Some(names::ROOF_INSULATION_SPRAYFOAM),
    }
}

fn collect_sheathing(out: &mut Vec<AssemblyQuantity>, geometry: &GeometryModel, materials: &MaterialInputs) {
    if let Some((name, label)) = sheathing_name(materials.wall_sheathing, true) {
        out.push(
            AssemblyQuantity::new(
                name,
                format!("Wall sheathing ({label})"),
                Category::Sheathing,
                geometry.total_wall_area_sqft,
                Unit::SquareFeet,
            )
            .with_notes(format!("{label} sheathing for walls")),
        );
    }
    if let Some((name, label)) = sheathing_name(materials.roof_sheathing, false) {
        out.push(
            AssemblyQuantity::new(
                name,
                format!("Roof sheathing ({label})"),
                Category::Sheathing,
                geometry.roof_area_sqft,
                Unit::SquareFeet,
            )
            .with_notes(format!("{label} sheathing for roof")),
        );
    }
}

fn sheathing_name(sheathing: SheathingType, wall: bool) -> Option<(&'static str, &'static str)> {
    match (sheathing, wall) {
        (SheathingType::None, _) => None,
        (SheathingType::Osb, true) => Some((names::WALL_SHEATHING_OSB, "OSB")),
        (SheathingType::Osb, false) => Some((names::ROOF_SHEATHING_OSB, "OSB")),
        (SheathingType::Plywood, true) => Some((names::WALL_SHEATHING_PLYWOOD, "Plywood")),
        (SheathingType::Plywood, false) => Some((names::ROOF_SHEATHING_PLYWOOD, "Plywood")),
    }
}

fn collect_ventilation(out: &mut Vec<AssemblyQuantity>, assemblies: &AssemblyInputs) {
    let name = match assemblies.ventilation {
        VentilationType::None => return,
        VentilationType::RidgeVent => names::RIDGE_VENT,
        VentilationType::GableVent => names::GABLE_VENT,
    };
    if assemblies.ventilation_count == 0 {
        return;
    }
    out.push(AssemblyQuantity::new(
        name,
        "Ventilation units",
        Category::Ventilation,
        assemblies.ventilation_count as f64,
        Unit::Each,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::resolve;
    use crate::inputs::GeometryInputs;

    fn test_model() -> GeometryModel {
        resolve(&GeometryInputs {
            length_ft: 40.0,
            width_ft: 30.0,
            eave_height_ft: 12.0,
            roof_pitch: 4.0 / 12.0,
            pole_spacing_length_ft: 10.0,
            ..GeometryInputs::default()
        })
    }

    #[test]
    fn test_panel_areas_match_geometry() {
        let model = test_model();
        let mut out = Vec::new();
        collect_panels(&mut out, &model, &MaterialInputs::default());
        let roof = out.iter().find(|a| a.name == names::ROOF_PANELS).unwrap();
        assert_eq!(roof.quantity, model.roof_area_sqft);
        assert_eq!(roof.unit, Unit::SquareFeet);
        let side = out.iter().find(|a| a.name == names::SIDEWALL_PANELS).unwrap();
        assert_eq!(side.quantity, model.sidewall_area_sqft);
    }

    #[test]
    fn test_26ga_finish_routes_names() {
        let mut out = Vec::new();
        let mut materials = MaterialInputs::default();
        materials.exterior_finish = ExteriorFinish::Metal26ga;
        collect_panels(&mut out, &test_model(), &materials);
        assert!(out.iter().any(|a| a.name == names::ROOF_PANELS_26GA));
        assert!(!out.iter().any(|a| a.name == names::ROOF_PANELS));
    }

    #[test]
    fn test_trim_always_emitted() {
        let mut out = Vec::new();
        collect_trim(&mut out, &test_model());
        assert_eq!(out.len(), 4);
        let base = out.iter().find(|a| a.name == names::BASE_TRIM).unwrap();
        assert_eq!(base.quantity, 140.0);
        let corner = out.iter().find(|a| a.name == names::CORNER_TRIM).unwrap();
        assert_eq!(corner.quantity, 48.0);
    }

    #[test]
    fn test_insulation_subtype_names() {
        let mut out = Vec::new();
        let mut materials = MaterialInputs::default();
        materials.wall_insulation = InsulationType::RockWool;
        materials.roof_insulation = InsulationType::RigidBoard;
        collect_insulation(&mut out, &test_model(), &materials);
        assert!(out.iter().any(|a| a.name == names::WALL_INSULATION_ROCKWOOL));
        assert!(out.iter().any(|a| a.name == names::ROOF_INSULATION_RIGID));
    }

    #[test]
    fn test_sheathing_gated_by_none() {
        let mut out = Vec::new();
        collect_sheathing(&mut out, &test_model(), &MaterialInputs::default());
        assert!(out.is_empty());

        let mut materials = MaterialInputs::default();
        materials.roof_sheathing = SheathingType::Osb;
        collect_sheathing(&mut out, &test_model(), &materials);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, names::ROOF_SHEATHING_OSB);
    }

    #[test]
    fn test_ventilation_counts() {
        let mut out = Vec::new();
        let mut assemblies = AssemblyInputs::default();
        assemblies.ventilation = VentilationType::RidgeVent;
        assemblies.ventilation_count = 3;
        collect_ventilation(&mut out, &assemblies);
        assert_eq!(out[0].name, names::RIDGE_VENT);
        assert_eq!(out[0].quantity, 3.0);
    }
}
