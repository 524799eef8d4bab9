//! # Assembly Quantity Calculator
//!
//! Consumes the geometry model plus material/assembly choices and emits a
//! flat list of named, categorized raw quantities ("assemblies"): linear
//! feet of girts, square feet of panel, counts of posts and trusses.
//! Assemblies are the intermediate currency of the pipeline: the BOM engine
//! expands them into purchasable parts, the pricing engine costs them.
//!
//! Every branch keys off an enumerated material/assembly choice. An
//! unsupported combination simply emits no assembly for that system; the
//! calculator never fails and never emits partial quantities.
//!
//! Calculation families live in their own modules, one per subsystem:
//!
//! - [`framing`] - posts, trusses, girts, purlins
//! - [`envelope`] - panels, trim, insulation, sheathing, ventilation
//! - [`openings`] - door/window framing and trim, overhead doors, J-channel
//! - [`foundation`] - slab concrete, reinforcement, post footings

pub mod envelope;
pub mod foundation;
pub mod framing;
pub mod openings;

use serde::{Deserialize, Serialize};

use crate::inputs::{AssemblyInputs, GeometryInputs, MaterialInputs};
use crate::geometry::GeometryModel;
use crate::units::Unit;

/// Canonical assembly names shared by the calculator, the catalog fallback
/// map, and the BOM engine.
pub mod names {
    pub const POSTS: &str = "posts";
    pub const POSTS_LAMINATED: &str = "posts_laminated";
    pub const TRUSSES: &str = "trusses";
    pub const SIDEWALL_GIRTS: &str = "sidewall_girts";
    pub const ENDWALL_GIRTS: &str = "endwall_girts";
    pub const ROOF_PURLINS: &str = "roof_purlins";
    pub const ROOF_PANELS: &str = "roof_panels";
    pub const ROOF_PANELS_26GA: &str = "roof_panels_26ga";
    pub const SIDEWALL_PANELS: &str = "sidewall_panels";
    pub const SIDEWALL_PANELS_26GA: &str = "sidewall_panels_26ga";
    pub const ENDWALL_PANELS: &str = "endwall_panels";
    pub const ENDWALL_PANELS_26GA: &str = "endwall_panels_26ga";
    pub const EAVE_TRIM: &str = "eave_trim";
    pub const RAKE_TRIM: &str = "rake_trim";
    pub const BASE_TRIM: &str = "base_trim";
    pub const CORNER_TRIM: &str = "corner_trim";
    pub const DOOR_FRAMING: &str = "door_framing";
    pub const DOOR_TRIM: &str = "door_trim";
    pub const WINDOW_FRAMING: &str = "window_framing";
    pub const WINDOW_TRIM: &str = "window_trim";
    pub const OVERHEAD_DOORS: &str = "overhead_doors";
    pub const J_CHANNEL: &str = "j_channel";
    pub const WALL_INSULATION: &str = "wall_insulation";
    pub const WALL_INSULATION_ROCKWOOL: &str = "wall_insulation_rockwool";
    pub const WALL_INSULATION_RIGID: &str = "wall_insulation_rigid";
    pub const WALL_INSULATION_SPRAYFOAM: &str = "wall_insulation_sprayfoam";
    pub const ROOF_INSULATION: &str = "roof_insulation";
    pub const ROOF_INSULATION_ROCKWOOL: &str = "roof_insulation_rockwool";
    pub const ROOF_INSULATION_RIGID: &str = "roof_insulation_rigid";
    pub const ROOF_INSULATION_SPRAYFOAM: &str = "roof_insulation_sprayfoam";
    pub const WALL_SHEATHING_OSB: &str = "wall_sheathing_osb";
    pub const WALL_SHEATHING_PLYWOOD: &str = "wall_sheathing_plywood";
    pub const ROOF_SHEATHING_OSB: &str = "roof_sheathing_osb";
    pub const ROOF_SHEATHING_PLYWOOD: &str = "roof_sheathing_plywood";
    pub const SLAB_CONCRETE: &str = "slab_concrete";
    pub const SLAB_MESH: &str = "slab_mesh";
    pub const SLAB_REBAR: &str = "slab_rebar";
    pub const FOOTING_CONCRETE: &str = "footing_concrete";
    pub const RIDGE_VENT: &str = "ridge_vent";
    pub const GABLE_VENT: &str = "gable_vent";
    pub const ELECTRICAL_ALLOWANCE: &str = "electrical_allowance";
    pub const PLUMBING_ALLOWANCE: &str = "plumbing_allowance";
    pub const MECHANICAL_ALLOWANCE: &str = "mechanical_allowance";
}

/// Assembly category, used for grouping and rollups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Framing,
    Roof,
    Wall,
    Trim,
    Insulation,
    Sheathing,
    Concrete,
    Doors,
    Ventilation,
    Mep,
    Misc,
}

impl Category {
    /// Lenient parse from catalog category strings; unknown strings land in
    /// `Misc` rather than failing, since catalogs are caller-owned data.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "framing" => Category::Framing,
            "roof" | "roofing" | "panels" => Category::Roof,
            "wall" | "walls" | "siding" => Category::Wall,
            "trim" => Category::Trim,
            "insulation" => Category::Insulation,
            "sheathing" => Category::Sheathing,
            "concrete" | "foundation" => Category::Concrete,
            "doors" | "door" => Category::Doors,
            "ventilation" | "vents" => Category::Ventilation,
            "mep" => Category::Mep,
            _ => Category::Misc,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Framing => "framing",
            Category::Roof => "roof",
            Category::Wall => "wall",
            Category::Trim => "trim",
            Category::Insulation => "insulation",
            Category::Sheathing => "sheathing",
            Category::Concrete => "concrete",
            Category::Doors => "doors",
            Category::Ventilation => "ventilation",
            Category::Mep => "MEP",
            Category::Misc => "misc",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A single named raw material quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyQuantity {
    /// Stable assembly name, e.g. `"sidewall_girts"` (see [`names`])
    pub name: String,
    /// Human-readable description
    pub description: String,
    pub category: Category,
    /// Raw amount in `unit`; always >= 0
    pub quantity: f64,
    pub unit: Unit,
    pub notes: Option<String>,
}

impl AssemblyQuantity {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        quantity: f64,
        unit: Unit,
    ) -> Self {
        AssemblyQuantity {
            name: name.into(),
            description: description.into(),
            category,
            quantity,
            unit,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Container for all assembly quantities of one estimate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialTakeoff {
    pub items: Vec<AssemblyQuantity>,
}

impl MaterialTakeoff {
    pub fn new(items: Vec<AssemblyQuantity>) -> Self {
        MaterialTakeoff { items }
    }

    /// All items in a category
    pub fn get_by_category(&self, category: Category) -> Vec<&AssemblyQuantity> {
        self.items.iter().filter(|i| i.category == category).collect()
    }

    /// First item with the given assembly name
    pub fn get_by_name(&self, name: &str) -> Option<&AssemblyQuantity> {
        self.items.iter().find(|i| i.name == name)
    }
}

/// Calculate all material quantities for a building.
///
/// Deterministic and side-effect-free; the output order is stable (framing,
/// envelope, openings, foundation) so downstream artifacts serialize
/// identically across runs.
pub fn calculate(
    geometry: &GeometryModel,
    materials: &MaterialInputs,
    assemblies: &AssemblyInputs,
    geometry_inputs: &GeometryInputs,
) -> Vec<AssemblyQuantity> {
    let mut quantities: Vec<AssemblyQuantity> = Vec::new();

    framing::collect(&mut quantities, geometry, materials, assemblies);
    envelope::collect(&mut quantities, geometry, materials, assemblies);
    openings::collect(&mut quantities, geometry, materials, geometry_inputs);
    foundation::collect(&mut quantities, geometry, materials, geometry_inputs);

    quantities
}
