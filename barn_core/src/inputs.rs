//! # Estimate Inputs
//!
//! Immutable input structs for one calculation request, plus the enums for
//! every material and construction choice. Each enum mirrors the options a
//! front end would present: serde tokens are stable snake_case strings, and
//! `ALL` arrays support dropdown population.
//!
//! All choices are closed enums rather than free-text strings; an
//! unsupported combination simply produces no assembly for that system,
//! never an error.
//!
//! ## Example
//!
//! ```rust
//! use barn_core::inputs::{BarnInputs, RoofStyle};
//!
//! let mut inputs = BarnInputs::default();
//! inputs.geometry.length_ft = 40.0;
//! inputs.geometry.width_ft = 30.0;
//! inputs.geometry.eave_height_ft = 12.0;
//! inputs.geometry.roof_pitch = 4.0 / 12.0;
//! assert_eq!(inputs.geometry.roof_style, RoofStyle::Gable);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

// ============================================================================
// Material / construction choice enums
// ============================================================================

/// Roof shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoofStyle {
    /// Symmetric gable, ridge centered on the width
    #[default]
    Gable,
    /// Single-slope shed roof
    Shed,
}

impl RoofStyle {
    pub const ALL: [RoofStyle; 2] = [RoofStyle::Gable, RoofStyle::Shed];

    pub fn display_name(&self) -> &'static str {
        match self {
            RoofStyle::Gable => "Gable",
            RoofStyle::Shed => "Shed",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> EstimateResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "gable" => Ok(RoofStyle::Gable),
            "shed" | "mono" | "monoslope" => Ok(RoofStyle::Shed),
            _ => Err(EstimateError::invalid_input(
                "roof_style",
                s,
                "expected 'gable' or 'shed'",
            )),
        }
    }
}

/// Exterior cladding choice for walls and roof.
///
/// The gauge is part of the choice because it routes to a different catalog
/// part (29ga and 26ga panels price differently).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExteriorFinish {
    /// 29-gauge ribbed steel panel (most common)
    #[default]
    #[serde(rename = "metal_29ga")]
    Metal29ga,
    /// 26-gauge ribbed steel panel
    #[serde(rename = "metal_26ga")]
    Metal26ga,
    /// Lap siding over sheathing
    LapSiding,
    /// Stucco over sheathing
    Stucco,
}

impl ExteriorFinish {
    pub const ALL: [ExteriorFinish; 4] = [
        ExteriorFinish::Metal29ga,
        ExteriorFinish::Metal26ga,
        ExteriorFinish::LapSiding,
        ExteriorFinish::Stucco,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ExteriorFinish::Metal29ga => "29ga metal",
            ExteriorFinish::Metal26ga => "26ga metal",
            ExteriorFinish::LapSiding => "Lap siding",
            ExteriorFinish::Stucco => "Stucco",
        }
    }

    /// Metal panel systems get J-channel trim around openings and eave tops
    pub fn is_metal(&self) -> bool {
        matches!(self, ExteriorFinish::Metal29ga | ExteriorFinish::Metal26ga)
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> EstimateResult<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "metal_29ga" | "metal29" | "29ga" => Ok(ExteriorFinish::Metal29ga),
            "metal_26ga" | "metal26" | "26ga" => Ok(ExteriorFinish::Metal26ga),
            "lap_siding" | "lap" | "siding" => Ok(ExteriorFinish::LapSiding),
            "stucco" => Ok(ExteriorFinish::Stucco),
            _ => Err(EstimateError::invalid_input(
                "exterior_finish",
                s,
                "expected metal_29ga, metal_26ga, lap_siding, or stucco",
            )),
        }
    }
}

/// Insulation system per zone (walls and roof are chosen independently).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsulationType {
    #[default]
    None,
    FiberglassBatts,
    RockWool,
    RigidBoard,
    SprayFoam,
}

impl InsulationType {
    pub const ALL: [InsulationType; 5] = [
        InsulationType::None,
        InsulationType::FiberglassBatts,
        InsulationType::RockWool,
        InsulationType::RigidBoard,
        InsulationType::SprayFoam,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            InsulationType::None => "None",
            InsulationType::FiberglassBatts => "Fiberglass batts",
            InsulationType::RockWool => "Rock wool",
            InsulationType::RigidBoard => "Rigid board",
            InsulationType::SprayFoam => "Spray foam",
        }
    }
}

/// Sheathing layer per zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheathingType {
    #[default]
    None,
    Osb,
    Plywood,
}

impl SheathingType {
    pub const ALL: [SheathingType; 3] =
        [SheathingType::None, SheathingType::Osb, SheathingType::Plywood];

    pub fn display_name(&self) -> &'static str {
        match self {
            SheathingType::None => "None",
            SheathingType::Osb => "OSB",
            SheathingType::Plywood => "Plywood",
        }
    }
}

/// Floor system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorType {
    #[default]
    None,
    Slab,
    Gravel,
}

impl FloorType {
    pub const ALL: [FloorType; 3] = [FloorType::None, FloorType::Slab, FloorType::Gravel];

    pub fn display_name(&self) -> &'static str {
        match self {
            FloorType::None => "None",
            FloorType::Slab => "Concrete slab",
            FloorType::Gravel => "Gravel",
        }
    }
}

/// Slab reinforcement choice (only meaningful with [`FloorType::Slab`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlabReinforcement {
    #[default]
    None,
    Mesh,
    Rebar,
}

/// Foundation under the posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoundationType {
    /// Posts set in concrete-backfilled holes
    #[default]
    ConcretePad,
    /// Posts on compacted gravel
    Gravel,
    None,
}

/// Truss profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrussStyle {
    #[default]
    Standard,
    Scissor,
    Gambrel,
}

impl TrussStyle {
    pub const ALL: [TrussStyle; 3] =
        [TrussStyle::Standard, TrussStyle::Scissor, TrussStyle::Gambrel];

    pub fn display_name(&self) -> &'static str {
        match self {
            TrussStyle::Standard => "Standard",
            TrussStyle::Scissor => "Scissor",
            TrussStyle::Gambrel => "Gambrel",
        }
    }
}

/// Overhead (roll-up / sectional) door type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverheadDoorType {
    #[default]
    None,
    SteelRollup,
    Sectional,
}

impl OverheadDoorType {
    pub fn display_name(&self) -> &'static str {
        match self {
            OverheadDoorType::None => "None",
            OverheadDoorType::SteelRollup => "Steel roll-up",
            OverheadDoorType::Sectional => "Sectional",
        }
    }
}

/// Structural post type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    /// Solid pressure-treated post (6x6 typical)
    #[default]
    PtSolid,
    /// Glue/nail-laminated column
    Laminated,
}

/// Post-to-truss connection detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    #[default]
    Notched,
    Cleated,
}

impl ConnectionType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ConnectionType::Notched => "notched",
            ConnectionType::Cleated => "cleated",
        }
    }
}

/// Overall assembly method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssemblyMethod {
    #[default]
    Standard,
    Prefab,
    Custom,
}

/// Primary fastening system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FasteningType {
    #[default]
    Screws,
    Nails,
    Welded,
}

/// Ventilation system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VentilationType {
    #[default]
    None,
    RidgeVent,
    GableVent,
}

// ============================================================================
// Input structs
// ============================================================================

/// Geometric dimensions and layout for the building.
///
/// Opening dimensions are the single source of truth for door/window
/// framing, exterior trim, and J-channel; the defaults are the standard
/// 3'x7' entry door and 3'x3' window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryInputs {
    /// Building length in feet (the bay axis)
    pub length_ft: f64,
    /// Building width in feet (the truss span)
    pub width_ft: f64,
    /// Height to the eave in feet
    pub eave_height_ft: f64,
    /// Height to the ridge in feet; derived from pitch when `None`
    pub peak_height_ft: Option<f64>,
    /// Roof pitch as a rise/run ratio (4:12 = 4.0/12.0)
    pub roof_pitch: f64,
    pub roof_style: RoofStyle,
    /// Ridge offset from the left eave in feet (asymmetric gables)
    pub ridge_position_ft: Option<f64>,
    /// Front endwall overhang in feet
    pub overhang_front_ft: f64,
    /// Rear endwall overhang in feet
    pub overhang_rear_ft: f64,
    /// Sidewall (eave) overhang in feet
    pub overhang_sides_ft: f64,
    pub door_count: u32,
    pub door_width_ft: f64,
    pub door_height_ft: f64,
    pub window_count: u32,
    pub window_width_ft: f64,
    pub window_height_ft: f64,
    pub overhead_door_count: u32,
    pub overhead_door_type: OverheadDoorType,
    /// Post spacing along the length axis (bay spacing) in feet
    pub pole_spacing_length_ft: f64,
    /// Post spacing along the width axis in feet
    pub pole_spacing_width_ft: f64,
    /// Post diameter in inches (footing sizing)
    pub pole_diameter_in: f64,
    /// Post embedment depth in feet (footing sizing)
    pub pole_depth_ft: f64,
}

impl Default for GeometryInputs {
    fn default() -> Self {
        GeometryInputs {
            length_ft: 0.0,
            width_ft: 0.0,
            eave_height_ft: 0.0,
            peak_height_ft: None,
            roof_pitch: 0.0,
            roof_style: RoofStyle::Gable,
            ridge_position_ft: None,
            overhang_front_ft: 0.0,
            overhang_rear_ft: 0.0,
            overhang_sides_ft: 0.0,
            door_count: 0,
            door_width_ft: 3.0,
            door_height_ft: 7.0,
            window_count: 0,
            window_width_ft: 3.0,
            window_height_ft: 3.0,
            overhead_door_count: 0,
            overhead_door_type: OverheadDoorType::None,
            pole_spacing_length_ft: 8.0,
            pole_spacing_width_ft: 8.0,
            pole_diameter_in: 6.0,
            pole_depth_ft: 4.0,
        }
    }
}

impl GeometryInputs {
    /// Validate inputs for upstream layers (CLI/API).
    ///
    /// The resolver itself never fails; degenerate inputs produce degenerate
    /// zero-area models. Front ends call this before accepting a request.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.length_ft <= 0.0 {
            return Err(EstimateError::invalid_input(
                "length_ft",
                self.length_ft.to_string(),
                "Building length must be positive",
            ));
        }
        if self.width_ft <= 0.0 {
            return Err(EstimateError::invalid_input(
                "width_ft",
                self.width_ft.to_string(),
                "Building width must be positive",
            ));
        }
        if self.eave_height_ft <= 0.0 {
            return Err(EstimateError::invalid_input(
                "eave_height_ft",
                self.eave_height_ft.to_string(),
                "Eave height must be positive",
            ));
        }
        if self.pole_spacing_length_ft <= 0.0 {
            return Err(EstimateError::invalid_input(
                "pole_spacing_length_ft",
                self.pole_spacing_length_ft.to_string(),
                "Pole spacing must be positive",
            ));
        }
        if self.roof_pitch < 0.0 {
            return Err(EstimateError::invalid_input(
                "roof_pitch",
                self.roof_pitch.to_string(),
                "Roof pitch cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Material specifications and spacings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialInputs {
    pub truss_style: TrussStyle,
    /// Truss spacing in feet; when it materially differs from the bay
    /// spacing the truss count is derived from it instead of frame lines
    pub truss_spacing_ft: f64,
    /// Purlin row spacing up the roof slope, in feet
    pub purlin_spacing_ft: f64,
    /// Girt row spacing up the wall, in feet
    pub girt_spacing_ft: f64,
    pub exterior_finish: ExteriorFinish,
    pub wall_insulation: InsulationType,
    pub roof_insulation: InsulationType,
    pub wall_sheathing: SheathingType,
    pub roof_sheathing: SheathingType,
    pub foundation_type: FoundationType,
    pub floor_type: FloorType,
    /// Slab thickness in inches; 4" assumed when `None`
    pub slab_thickness_in: Option<f64>,
    pub slab_reinforcement: SlabReinforcement,
}

impl Default for MaterialInputs {
    fn default() -> Self {
        MaterialInputs {
            truss_style: TrussStyle::Standard,
            truss_spacing_ft: 8.0,
            purlin_spacing_ft: 2.0,
            girt_spacing_ft: 2.0,
            exterior_finish: ExteriorFinish::Metal29ga,
            wall_insulation: InsulationType::None,
            roof_insulation: InsulationType::None,
            wall_sheathing: SheathingType::None,
            roof_sheathing: SheathingType::None,
            foundation_type: FoundationType::ConcretePad,
            floor_type: FloorType::None,
            slab_thickness_in: None,
            slab_reinforcement: SlabReinforcement::None,
        }
    }
}

/// Construction method choices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyInputs {
    pub assembly_method: AssemblyMethod,
    pub fastening: FasteningType,
    pub post_type: PostType,
    pub connection: ConnectionType,
    pub ventilation: VentilationType,
    pub ventilation_count: u32,
}

/// Economic parameters.
///
/// Rates are decimals (`tax_rate: 0.08` is 8%); markup and overhead are
/// whole percentages (`material_markup_pct: 15.0` is 15%), matching how
/// estimators quote them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingInputs {
    /// Sales tax rate as a decimal (0.08 = 8%)
    pub tax_rate: f64,
    /// Labor cost per hour in dollars
    pub labor_rate: f64,
    pub material_markup_pct: f64,
    pub labor_markup_pct: f64,
    pub subcontractor_markup_pct: f64,
    /// Overhead applied once at the summary level on (material + labor)
    pub overhead_pct: f64,
    pub delivery_cost: Option<f64>,
    pub permit_cost: Option<f64>,
    pub site_prep_cost: Option<f64>,
    /// Flat electrical allowance in dollars; not marked up
    pub electrical_allowance: Option<f64>,
    /// Flat plumbing allowance in dollars; not marked up
    pub plumbing_allowance: Option<f64>,
    /// Flat mechanical (heat/vent) allowance in dollars; not marked up
    pub mechanical_allowance: Option<f64>,
}

impl Default for PricingInputs {
    fn default() -> Self {
        PricingInputs {
            tax_rate: 0.0,
            labor_rate: 50.0,
            material_markup_pct: 15.0,
            labor_markup_pct: 10.0,
            subcontractor_markup_pct: 10.0,
            overhead_pct: 0.0,
            delivery_cost: None,
            permit_cost: None,
            site_prep_cost: None,
            electrical_allowance: None,
            plumbing_allowance: None,
            mechanical_allowance: None,
        }
    }
}

/// Complete set of inputs for one estimate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BarnInputs {
    pub geometry: GeometryInputs,
    pub materials: MaterialInputs,
    pub assemblies: AssemblyInputs,
    pub pricing: PricingInputs,
    pub project_name: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_tokens() {
        assert_eq!(
            serde_json::to_string(&ExteriorFinish::Metal29ga).unwrap(),
            "\"metal_29ga\""
        );
        assert_eq!(
            serde_json::to_string(&InsulationType::RockWool).unwrap(),
            "\"rock_wool\""
        );
        assert_eq!(
            serde_json::to_string(&PostType::PtSolid).unwrap(),
            "\"pt_solid\""
        );
    }

    #[test]
    fn test_from_str_flexible() {
        assert_eq!(
            RoofStyle::from_str_flexible("GABLE").unwrap(),
            RoofStyle::Gable
        );
        assert_eq!(
            ExteriorFinish::from_str_flexible("metal 26ga").unwrap(),
            ExteriorFinish::Metal26ga
        );
        assert!(ExteriorFinish::from_str_flexible("brick").is_err());
    }

    #[test]
    fn test_default_opening_dimensions() {
        let geo = GeometryInputs::default();
        assert_eq!(geo.door_width_ft, 3.0);
        assert_eq!(geo.door_height_ft, 7.0);
        assert_eq!(geo.window_width_ft, 3.0);
        assert_eq!(geo.window_height_ft, 3.0);
    }

    #[test]
    fn test_validate_rejects_degenerate() {
        let mut geo = GeometryInputs::default();
        assert!(geo.validate().is_err());
        geo.length_ft = 40.0;
        geo.width_ft = 30.0;
        geo.eave_height_ft = 12.0;
        assert!(geo.validate().is_ok());
    }

    #[test]
    fn test_inputs_roundtrip() {
        let inputs = BarnInputs::default();
        let json = serde_json::to_string(&inputs).unwrap();
        let roundtrip: BarnInputs = serde_json::from_str(&json).unwrap();
        assert_eq!(inputs, roundtrip);
    }
}
