//! # Catalogs
//!
//! The three read-only tables a calculation consumes: the parts catalog,
//! part pricing, and the assembly→part mapping. The tables are owned by the
//! calling application (loaded from its own storage, typically CSV or JSON)
//! and passed in by reference; they are treated as frozen for the duration
//! of one calculation.
//!
//! The mapping table supports two schemas. The preferred schema is one row
//! per `(assembly_name, part_id)` pair with explicit `waste_factor` and
//! `labor_per_unit` columns. A legacy schema packs multiple part ids into a
//! single pipe-separated `parts` column with parallel `quantity_multiplier`
//! values; [`AssemblyMapping::resolve`] normalizes both into the same shape.
//!
//! A built-in fallback assembly→part table covers the canonical assembly
//! names when the caller's mapping table has no row. It is an explicit,
//! injectable field on [`Catalogs`] so tests can substitute or clear it.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::takeoff::names;
use crate::units::Unit;

// ============================================================================
// Rows
// ============================================================================

/// One parts-catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub part_id: String,
    pub part_name: String,
    /// Category for rollups (e.g. "framing", "trim")
    pub category: String,
    /// Grouping tab for downstream exporters
    pub export_category: String,
    pub unit: Unit,
    #[serde(default)]
    pub description: String,
    /// Coverage width for sheet/panel goods, in inches
    #[serde(default)]
    pub coverage_width_in: Option<f64>,
    /// Coverage height for sheet goods, in inches
    #[serde(default)]
    pub coverage_height_in: Option<f64>,
}

/// One pricing row. First match wins when a part_id is duplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub part_id: String,
    pub unit_price: f64,
}

/// One assembly→part mapping row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyMapping {
    pub assembly_name: String,
    /// Preferred schema: a single part id per row
    #[serde(default)]
    pub part_id: Option<String>,
    /// Legacy schema: pipe-separated part ids
    #[serde(default)]
    pub parts: Option<String>,
    /// Legacy schema: pipe-separated multipliers parallel to `parts`
    #[serde(default)]
    pub quantity_multiplier: Option<String>,
    #[serde(default = "default_waste_factor")]
    pub waste_factor: f64,
    #[serde(default)]
    pub labor_per_unit: f64,
    #[serde(default)]
    pub markup_percent_override: Option<f64>,
    /// Subcontracted work gets the subcontractor markup on top
    #[serde(default)]
    pub subcontractor: bool,
    #[serde(default)]
    pub category: String,
}

fn default_waste_factor() -> f64 {
    1.0
}

/// A mapping row normalized to the preferred schema: one part id, one waste
/// factor, one labor rate.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMapping {
    pub part_id: String,
    pub waste_factor: f64,
    pub labor_per_unit: f64,
    pub markup_percent_override: Option<f64>,
    pub subcontractor: bool,
}

impl AssemblyMapping {
    /// Normalize this row into per-part resolved mappings.
    ///
    /// The preferred `part_id` column wins; otherwise the legacy `parts`
    /// column is split on `|`, with `quantity_multiplier` values applied
    /// positionally as waste factors (first value reused when the lists are
    /// ragged, matching how the legacy data was written).
    pub fn resolve(&self) -> Vec<ResolvedMapping> {
        if let Some(part_id) = &self.part_id {
            let part_id = part_id.trim();
            if part_id.is_empty() {
                return Vec::new();
            }
            return vec![ResolvedMapping {
                part_id: part_id.to_string(),
                waste_factor: self.waste_factor,
                labor_per_unit: self.labor_per_unit,
                markup_percent_override: self.markup_percent_override,
                subcontractor: self.subcontractor,
            }];
        }

        let Some(parts) = &self.parts else {
            return Vec::new();
        };
        let part_ids: Vec<&str> = parts.split('|').map(str::trim).filter(|p| !p.is_empty()).collect();
        let multipliers: Vec<f64> = self
            .quantity_multiplier
            .as_deref()
            .map(|m| {
                m.split('|')
                    .filter_map(|v| v.trim().parse::<f64>().ok())
                    .collect()
            })
            .unwrap_or_default();

        part_ids
            .iter()
            .enumerate()
            .map(|(i, part_id)| ResolvedMapping {
                part_id: part_id.to_string(),
                waste_factor: multipliers
                    .get(i)
                    .or_else(|| multipliers.first())
                    .copied()
                    .unwrap_or(self.waste_factor),
                labor_per_unit: self.labor_per_unit,
                markup_percent_override: self.markup_percent_override,
                subcontractor: self.subcontractor,
            })
            .collect()
    }
}

// ============================================================================
// Container
// ============================================================================

/// The catalog tables for one calculation, plus the injectable fallback
/// assembly→part map consulted when the mapping table has no row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalogs {
    pub parts: Vec<Part>,
    pub prices: Vec<Price>,
    pub assembly_map: Vec<AssemblyMapping>,
    /// assembly_name → part_id defaults; see [`default_assembly_part_map`]
    #[serde(default)]
    pub fallback_map: HashMap<String, String>,
}

impl Catalogs {
    /// Catalogs with the built-in fallback map and empty tables.
    pub fn new(parts: Vec<Part>, prices: Vec<Price>, assembly_map: Vec<AssemblyMapping>) -> Self {
        Catalogs {
            parts,
            prices,
            assembly_map,
            fallback_map: default_assembly_part_map().clone(),
        }
    }

    /// Pre-flight structural check. An empty parts catalog is the one state
    /// the pipeline cannot degrade around; everything downstream would
    /// silently produce an empty BOM.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.parts.is_empty() {
            return Err(EstimateError::missing_catalog("parts"));
        }
        for part in &self.parts {
            if part.part_id.trim().is_empty() {
                return Err(EstimateError::catalog_error(
                    "parts",
                    format!("part '{}' has an empty part_id", part.part_name),
                ));
            }
        }
        Ok(())
    }

    /// Look up a part by id.
    pub fn part(&self, part_id: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.part_id == part_id)
    }

    /// Unit price for a part; first match wins.
    pub fn unit_price(&self, part_id: &str) -> Option<f64> {
        self.prices
            .iter()
            .find(|p| p.part_id == part_id)
            .map(|p| p.unit_price)
    }

    /// All resolved mappings for an assembly name, falling back to the
    /// injectable default table when the mapping catalog has no row.
    pub fn mappings_for(&self, assembly_name: &str) -> Vec<ResolvedMapping> {
        let mapped: Vec<ResolvedMapping> = self
            .assembly_map
            .iter()
            .filter(|m| m.assembly_name == assembly_name)
            .flat_map(|m| m.resolve())
            .collect();
        if !mapped.is_empty() {
            return mapped;
        }

        self.fallback_map
            .get(assembly_name)
            .map(|part_id| {
                vec![ResolvedMapping {
                    part_id: part_id.clone(),
                    waste_factor: 1.0,
                    labor_per_unit: 0.0,
                    markup_percent_override: None,
                    subcontractor: false,
                }]
            })
            .unwrap_or_default()
    }

    /// A self-contained demo catalog covering every canonical assembly.
    ///
    /// Prices are representative, not quotes. Real deployments replace all
    /// three tables; the demo exists so the engine is usable out of the box
    /// and so end-to-end tests have a stable fixture.
    pub fn builtin() -> Self {
        let parts = builtin_parts();
        let prices = builtin_prices();
        Catalogs::new(parts, prices, Vec::new())
    }
}

/// Built-in assembly_name → part_id defaults.
pub fn default_assembly_part_map() -> &'static HashMap<String, String> {
    static MAP: Lazy<HashMap<String, String>> = Lazy::new(|| {
        let entries: &[(&str, &str)] = &[
            (names::POSTS, "POST_6X6_PT"),
            (names::POSTS_LAMINATED, "POST_LAM_3PLY"),
            (names::TRUSSES, "TRUSS_STD"),
            (names::SIDEWALL_GIRTS, "LBR_2X6_LF"),
            (names::ENDWALL_GIRTS, "LBR_2X6_LF"),
            (names::ROOF_PURLINS, "LBR_2X6_LF"),
            (names::DOOR_FRAMING, "LBR_2X6_LF"),
            (names::WINDOW_FRAMING, "LBR_2X6_LF"),
            (names::ROOF_PANELS, "METAL_PANEL_29_SQFT"),
            (names::ROOF_PANELS_26GA, "METAL_PANEL_26_SQFT"),
            (names::SIDEWALL_PANELS, "METAL_PANEL_29_SQFT"),
            (names::SIDEWALL_PANELS_26GA, "METAL_PANEL_26_SQFT"),
            (names::ENDWALL_PANELS, "METAL_PANEL_29_SQFT"),
            (names::ENDWALL_PANELS_26GA, "METAL_PANEL_26_SQFT"),
            (names::EAVE_TRIM, "TRIM_EAVE"),
            (names::RAKE_TRIM, "TRIM_RAKE"),
            (names::BASE_TRIM, "TRIM_BASE"),
            (names::CORNER_TRIM, "TRIM_CORNER"),
            (names::DOOR_TRIM, "TRIM_DOOR"),
            (names::WINDOW_TRIM, "TRIM_WINDOW"),
            (names::J_CHANNEL, "JCHANNEL_120"),
            (names::SLAB_CONCRETE, "CONCRETE_CY"),
            (names::FOOTING_CONCRETE, "CONCRETE_CY"),
            (names::SLAB_MESH, "MESH_SHEET"),
            (names::SLAB_REBAR, "REBAR_LF"),
            (names::WALL_INSULATION, "INS_R19_SQFT"),
            (names::WALL_INSULATION_ROCKWOOL, "INS_ROCKWOOL_SQFT"),
            (names::WALL_INSULATION_RIGID, "INS_RIGID_SQFT"),
            (names::WALL_INSULATION_SPRAYFOAM, "INS_SPRAYFOAM_SQFT"),
            (names::ROOF_INSULATION, "INS_R19_SQFT"),
            (names::ROOF_INSULATION_ROCKWOOL, "INS_ROCKWOOL_SQFT"),
            (names::ROOF_INSULATION_RIGID, "INS_RIGID_SQFT"),
            (names::ROOF_INSULATION_SPRAYFOAM, "INS_SPRAYFOAM_SQFT"),
            (names::WALL_SHEATHING_OSB, "SHEATH_OSB_4X8"),
            (names::WALL_SHEATHING_PLYWOOD, "SHEATH_PLY_4X8"),
            (names::ROOF_SHEATHING_OSB, "SHEATH_OSB_4X8"),
            (names::ROOF_SHEATHING_PLYWOOD, "SHEATH_PLY_4X8"),
            (names::OVERHEAD_DOORS, "DOOR_OH_STEEL"),
            (names::RIDGE_VENT, "VENT_RIDGE"),
            (names::GABLE_VENT, "VENT_GABLE"),
        ];
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    });
    &MAP
}

fn part(
    part_id: &str,
    part_name: &str,
    category: &str,
    export_category: &str,
    unit: Unit,
) -> Part {
    Part {
        part_id: part_id.to_string(),
        part_name: part_name.to_string(),
        category: category.to_string(),
        export_category: export_category.to_string(),
        unit,
        description: String::new(),
        coverage_width_in: None,
        coverage_height_in: None,
    }
}

fn builtin_parts() -> Vec<Part> {
    let mut parts = vec![
        part("POST_6X6_PT", "6x6 pressure-treated post", "framing", "Framing", Unit::Each),
        part("POST_LAM_3PLY", "3-ply laminated column", "framing", "Framing", Unit::Each),
        part("TRUSS_STD", "Engineered truss", "framing", "Framing", Unit::Each),
        part("LBR_2X6_LF", "2x6 framing lumber", "framing", "Framing", Unit::LinearFeet),
        part("TRIM_EAVE", "Eave trim", "trim", "Trim", Unit::LinearFeet),
        part("TRIM_RAKE", "Rake trim", "trim", "Trim", Unit::LinearFeet),
        part("TRIM_BASE", "Base trim", "trim", "Trim", Unit::LinearFeet),
        part("TRIM_CORNER", "Corner trim", "trim", "Trim", Unit::LinearFeet),
        part("TRIM_DOOR", "Door trim", "trim", "Trim", Unit::LinearFeet),
        part("TRIM_WINDOW", "Window trim", "trim", "Trim", Unit::LinearFeet),
        part("JCHANNEL_120", "J-channel 10' stick", "trim", "Trim", Unit::Each),
        part("CONCRETE_CY", "Ready-mix concrete", "concrete", "Concrete", Unit::CubicYards),
        part("MESH_SHEET", "Wire mesh sheet", "concrete", "Concrete", Unit::Each),
        part("REBAR_LF", "#4 rebar", "concrete", "Concrete", Unit::LinearFeet),
        part("INS_R19_SQFT", "R-19 fiberglass batts", "insulation", "Insulation", Unit::SquareFeet),
        part("INS_ROCKWOOL_SQFT", "Rock wool batts", "insulation", "Insulation", Unit::SquareFeet),
        part("INS_RIGID_SQFT", "Rigid board insulation", "insulation", "Insulation", Unit::SquareFeet),
        part("INS_SPRAYFOAM_SQFT", "Closed-cell spray foam", "insulation", "Insulation", Unit::SquareFeet),
        part("DOOR_OH_STEEL", "Overhead door", "doors", "Doors", Unit::Each),
        part("VENT_RIDGE", "Ridge vent section", "ventilation", "Ventilation", Unit::Each),
        part("VENT_GABLE", "Gable vent", "ventilation", "Ventilation", Unit::Each),
    ];

    // Panel and sheet goods carry coverage dimensions for count conversion
    let mut panel29 = part("METAL_PANEL_29_SQFT", "29ga steel panel", "panels", "Panels", Unit::SquareFeet);
    panel29.coverage_width_in = Some(36.0);
    let mut panel26 = part("METAL_PANEL_26_SQFT", "26ga steel panel", "panels", "Panels", Unit::SquareFeet);
    panel26.coverage_width_in = Some(36.0);
    let mut osb = part("SHEATH_OSB_4X8", "7/16\" OSB 4x8", "sheathing", "Sheathing", Unit::SquareFeet);
    osb.coverage_width_in = Some(48.0);
    osb.coverage_height_in = Some(96.0);
    let mut ply = part("SHEATH_PLY_4X8", "1/2\" plywood 4x8", "sheathing", "Sheathing", Unit::SquareFeet);
    ply.coverage_width_in = Some(48.0);
    ply.coverage_height_in = Some(96.0);

    parts.push(panel29);
    parts.push(panel26);
    parts.push(osb);
    parts.push(ply);
    parts
}

fn builtin_prices() -> Vec<Price> {
    let entries: &[(&str, f64)] = &[
        ("POST_6X6_PT", 64.0),
        ("POST_LAM_3PLY", 96.0),
        ("TRUSS_STD", 240.0),
        ("LBR_2X6_LF", 0.95),
        ("METAL_PANEL_29_SQFT", 2.10),
        ("METAL_PANEL_26_SQFT", 2.65),
        ("TRIM_EAVE", 1.85),
        ("TRIM_RAKE", 1.85),
        ("TRIM_BASE", 1.60),
        ("TRIM_CORNER", 2.10),
        ("TRIM_DOOR", 1.75),
        ("TRIM_WINDOW", 1.75),
        ("JCHANNEL_120", 14.50),
        ("CONCRETE_CY", 165.0),
        ("MESH_SHEET", 12.0),
        ("REBAR_LF", 0.85),
        ("INS_R19_SQFT", 0.75),
        ("INS_ROCKWOOL_SQFT", 1.15),
        ("INS_RIGID_SQFT", 1.40),
        ("INS_SPRAYFOAM_SQFT", 2.80),
        ("SHEATH_OSB_4X8", 18.0),
        ("SHEATH_PLY_4X8", 32.0),
        ("DOOR_OH_STEEL", 1350.0),
        ("VENT_RIDGE", 42.0),
        ("VENT_GABLE", 65.0),
    ];
    entries
        .iter()
        .map(|(id, price)| Price {
            part_id: id.to_string(),
            unit_price: *price,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_complete() {
        let catalogs = Catalogs::builtin();
        catalogs.validate().unwrap();

        // Every fallback target exists in the parts table and has a price
        for part_id in catalogs.fallback_map.values() {
            assert!(catalogs.part(part_id).is_some(), "missing part {part_id}");
            assert!(
                catalogs.unit_price(part_id).is_some(),
                "missing price for {part_id}"
            );
        }
    }

    #[test]
    fn test_validate_rejects_empty_parts() {
        let catalogs = Catalogs::new(Vec::new(), Vec::new(), Vec::new());
        assert!(matches!(
            catalogs.validate(),
            Err(EstimateError::MissingCatalog { .. })
        ));
    }

    #[test]
    fn test_first_price_wins() {
        let mut catalogs = Catalogs::builtin();
        catalogs.prices.insert(
            0,
            Price {
                part_id: "TRUSS_STD".to_string(),
                unit_price: 999.0,
            },
        );
        assert_eq!(catalogs.unit_price("TRUSS_STD"), Some(999.0));
    }

    #[test]
    fn test_mapping_table_overrides_fallback() {
        let mut catalogs = Catalogs::builtin();
        catalogs.assembly_map.push(AssemblyMapping {
            assembly_name: names::TRUSSES.to_string(),
            part_id: Some("TRUSS_SCISSOR".to_string()),
            parts: None,
            quantity_multiplier: None,
            waste_factor: 1.05,
            labor_per_unit: 0.75,
            markup_percent_override: None,
            subcontractor: false,
            category: "framing".to_string(),
        });
        let mappings = catalogs.mappings_for(names::TRUSSES);
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].part_id, "TRUSS_SCISSOR");
        assert_eq!(mappings[0].waste_factor, 1.05);
    }

    #[test]
    fn test_legacy_pipe_schema() {
        let row = AssemblyMapping {
            assembly_name: "roof_panels".to_string(),
            part_id: None,
            parts: Some("METAL_PANEL_29_SQFT | SCREW_METAL".to_string()),
            quantity_multiplier: Some("1.1 | 2.0".to_string()),
            waste_factor: 1.0,
            labor_per_unit: 0.02,
            markup_percent_override: None,
            subcontractor: false,
            category: "roof".to_string(),
        };
        let resolved = row.resolve();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].part_id, "METAL_PANEL_29_SQFT");
        assert_eq!(resolved[0].waste_factor, 1.1);
        assert_eq!(resolved[1].part_id, "SCREW_METAL");
        assert_eq!(resolved[1].waste_factor, 2.0);
    }

    #[test]
    fn test_fallback_map_is_injectable() {
        let mut catalogs = Catalogs::builtin();
        catalogs.fallback_map.clear();
        assert!(catalogs.mappings_for(names::POSTS).is_empty());
    }
}
