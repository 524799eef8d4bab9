//! # BOM Expansion Engine
//!
//! Expands assembly-level quantities into purchasable part quantities:
//! lumber sticks at stock lengths, whole panel sheets at cut lengths, trim
//! sticks, and bulk materials. Three packing algorithms do the work:
//!
//! 1. **Stock-length packing** for framing lumber: linear demand is covered
//!    by a fixed stock inventory (16/14/12/10/8 ft), longest first, always
//!    rounding up. Total covered footage is always >= demand.
//! 2. **First-fit decreasing bin packing** for J-channel: required segments
//!    are sorted longest-first and placed into the first open 120" stick
//!    with enough remaining capacity. A segment longer than the stock
//!    length orders `ceil(len / stock)` dedicated sticks instead of
//!    failing.
//! 3. **Gable panel length generation**: endwall panels on a gable wall are
//!    cut to the roof line, so lengths are generated walking from eave to
//!    ridge in coverage-width increments, each rounded up to the next whole
//!    inch with a 2" allowance.
//!
//! Packing reuses offcuts; it never drops required material. The sum of
//! packed quantities always covers at least the raw demand times waste.
//!
//! Assemblies with no resolvable part mapping are omitted from the BOM and
//! reported in the returned diagnostics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::Catalogs;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::geometry::GeometryModel;
use crate::inputs::{GeometryInputs, RoofStyle};
use crate::takeoff::{names, Category, MaterialTakeoff};
use crate::units::Unit;

/// Stock lumber lengths in feet, longest first
pub const DEFAULT_STOCK_LENGTHS_FT: [u32; 5] = [16, 14, 12, 10, 8];

/// J-channel stock stick length (10 ft)
pub const J_STOCK_LENGTH_IN: f64 = 120.0;

/// Cut allowance added to each J-channel segment around an opening
const J_SEGMENT_FUDGE_IN: f64 = 2.0;

/// Extra length above the roof line on gable endwall panels
const GABLE_PANEL_EXTRA_IN: f64 = 2.0;

/// Standard panel length assumed when converting a per-sqft panel price to
/// a per-piece price
const PANEL_PRICING_LENGTH_FT: f64 = 12.0;

/// One purchasable line in the bill of materials.
///
/// `qty` is a whole number for countable stock (sticks, sheets, panels);
/// bulk rows (concrete, insulation area) stay fractional. The same part may
/// appear on multiple rows at different stock lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartQuantity {
    pub part_id: String,
    pub part_name: String,
    pub category: String,
    /// Grouping tab for downstream exporters
    pub export_category: String,
    pub unit: Unit,
    pub qty: f64,
    pub unit_price: f64,
    pub ext_price: f64,
    /// Piece length in inches for length-broken stock
    pub length_in: Option<f64>,
    /// Logical tab name for flat exports
    pub sheet_name: Option<String>,
    #[serde(default)]
    pub notes: String,
}

// ============================================================================
// Packing algorithms
// ============================================================================

/// Split total linear feet into a stock-length breakdown.
///
/// Greedy longest-first: at each stock length, order `ceil(remaining /
/// length)` pieces and subtract the covered footage. Any residual (cannot
/// occur with an 8 ft floor, kept as a safety net) is covered by extra
/// pieces of the shortest length. Never under-orders.
pub fn split_lumber_into_stock_lengths(
    total_lf: f64,
    stock_lengths_ft: &[u32],
) -> BTreeMap<u32, u32> {
    let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
    if total_lf <= 0.0 || stock_lengths_ft.is_empty() {
        return counts;
    }

    let mut lengths: Vec<u32> = stock_lengths_ft.to_vec();
    lengths.sort_unstable_by(|a, b| b.cmp(a));

    let mut remaining_lf = total_lf;
    for &length_ft in &lengths {
        if remaining_lf <= 0.0 {
            break;
        }
        let pieces = (remaining_lf / length_ft as f64).ceil() as u32;
        *counts.entry(length_ft).or_insert(0) += pieces;
        remaining_lf -= pieces as f64 * length_ft as f64;
    }

    if remaining_lf > 0.0 {
        if let Some(&shortest) = lengths.last() {
            let extra = (remaining_lf / shortest as f64).ceil() as u32;
            *counts.entry(shortest).or_insert(0) += extra;
        }
    }

    counts
}

/// Pack segments into stock sticks, first-fit decreasing.
///
/// Segments are sorted longest first; each is placed in the first open
/// stick with enough remaining capacity, or a new stick is opened. An exact
/// fit uses the stick's full remainder. A segment longer than the stock
/// length consumes `ceil(len / stock)` dedicated sticks; the caller is
/// expected to flag it (see [`expand_to_parts`]) but packing itself never
/// fails.
///
/// Returns the number of sticks required.
pub fn pack_segments_into_sticks(segments_in: &[f64], stock_length_in: f64) -> u32 {
    if segments_in.is_empty() || stock_length_in <= 0.0 {
        return 0;
    }

    let mut segments: Vec<f64> = segments_in.to_vec();
    segments.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let mut open_sticks: Vec<f64> = Vec::new();
    let mut dedicated: u32 = 0;

    for segment in segments {
        if segment > stock_length_in {
            dedicated += (segment / stock_length_in).ceil() as u32;
            continue;
        }

        match open_sticks.iter_mut().find(|remaining| **remaining >= segment) {
            Some(remaining) => *remaining -= segment,
            None => open_sticks.push(stock_length_in - segment),
        }
    }

    open_sticks.len() as u32 + dedicated
}

/// Generate panel lengths for one gable endwall.
///
/// Walks from the eave toward the ridge in coverage-width increments. Each
/// increment's panel reaches the roof height at its *inner* edge (the tall
/// side) plus the extra allowance, rounded up to the next whole inch. Each
/// length applies to two panels (left/right symmetry) per gable end.
///
/// Returns `{panel_length_in: count}` for a single gable end.
pub fn gable_panel_lengths(
    eave_height_ft: f64,
    roof_pitch: f64,
    building_width_ft: f64,
    panel_coverage_width_ft: f64,
    extra_in: f64,
) -> BTreeMap<u32, u32> {
    let mut length_counts: BTreeMap<u32, u32> = BTreeMap::new();
    if panel_coverage_width_ft <= 0.0 || building_width_ft <= 0.0 {
        return length_counts;
    }

    let half_span_ft = building_width_ft / 2.0;
    let mut n: u32 = 0;
    // Small tolerance so a half-span that is an exact multiple of the
    // coverage width still yields its final increment.
    while (n + 1) as f64 * panel_coverage_width_ft <= half_span_ft + 0.01 {
        let x_inner_ft = ((n + 1) as f64 * panel_coverage_width_ft).min(half_span_ft);
        let height_inner_ft = eave_height_ft + roof_pitch * x_inner_ft;
        let panel_length_ft = height_inner_ft + extra_in / 12.0;
        let panel_length_in = (panel_length_ft * 12.0).ceil() as u32;

        *length_counts.entry(panel_length_in).or_insert(0) += 2;
        n += 1;
    }

    length_counts
}

// ============================================================================
// J-channel segment generation
// ============================================================================

/// J-channel run along the tops of both eave walls, present only when the
/// sidewall overhang exists. Returned as one bulk segment; packing breaks
/// it into sticks.
pub fn eave_top_j_segments(length_ft: f64, has_side_overhang: bool) -> Vec<f64> {
    if !has_side_overhang || length_ft <= 0.0 {
        return Vec::new();
    }
    vec![2.0 * length_ft * 12.0]
}

/// J-channel segment lengths for door and window openings.
///
/// Doors get two legs and a head (no threshold piece); windows are trimmed
/// on all four sides. Each segment must come from a single stick, so each
/// carries its own cut allowance.
pub fn opening_j_segments(
    door_count: u32,
    door_width_ft: f64,
    door_height_ft: f64,
    window_count: u32,
    window_width_ft: f64,
    window_height_ft: f64,
    fudge_in: f64,
) -> Vec<f64> {
    let mut segments = Vec::new();

    for _ in 0..door_count {
        let leg = door_height_ft * 12.0 + fudge_in;
        segments.push(leg);
        segments.push(leg);
        segments.push(door_width_ft * 12.0 + fudge_in);
    }

    for _ in 0..window_count {
        let vertical = window_height_ft * 12.0 + fudge_in;
        segments.push(vertical);
        segments.push(vertical);
        let horizontal = window_width_ft * 12.0 + fudge_in;
        segments.push(horizontal);
        segments.push(horizontal);
    }

    segments
}

/// The full J-channel segment list for a building: eave tops plus openings.
pub fn j_channel_segments(geometry: &GeometryModel, inputs: &GeometryInputs) -> Vec<f64> {
    let mut segments = eave_top_j_segments(
        geometry.overall_length_ft,
        inputs.overhang_sides_ft > 0.0,
    );
    if inputs.door_count > 0 || inputs.window_count > 0 {
        segments.extend(opening_j_segments(
            inputs.door_count,
            inputs.door_width_ft,
            inputs.door_height_ft,
            inputs.window_count,
            inputs.window_width_ft,
            inputs.window_height_ft,
            J_SEGMENT_FUDGE_IN,
        ));
    }
    segments
}

// ============================================================================
// Expansion
// ============================================================================

/// Accumulator key: part id plus piece length in whole inches.
type PartKey = (String, Option<u32>);

/// Expand assembly quantities into the normalized BOM.
///
/// The geometry model and inputs enable the length-aware expansions (gable
/// panels, panel counts, J-channel repacking); without them those
/// assemblies fall back to waste-adjusted accumulation.
pub fn expand_to_parts(
    takeoff: &MaterialTakeoff,
    catalogs: &Catalogs,
    geometry: Option<&GeometryModel>,
    geometry_inputs: Option<&GeometryInputs>,
) -> (Vec<PartQuantity>, Vec<Diagnostic>) {
    let mut accumulated: BTreeMap<PartKey, f64> = BTreeMap::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    for item in &takeoff.items {
        let mappings = catalogs.mappings_for(&item.name);
        if mappings.is_empty() {
            debug!(assembly = %item.name, "no part mapping; omitting from BOM");
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnmappedAssembly,
                &item.name,
                "no part mapping in catalog or fallback table; omitted from BOM",
            ));
            continue;
        }

        for mapping in mappings {
            let Some(part) = catalogs.part(&mapping.part_id) else {
                warn!(part_id = %mapping.part_id, assembly = %item.name, "mapped part not in catalog");
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MissingPart,
                    &mapping.part_id,
                    format!("assembly '{}' maps to a part missing from the parts catalog", item.name),
                ));
                continue;
            };

            let base_qty = item.quantity;
            let waste = mapping.waste_factor;
            let is_panel = part.part_id.to_lowercase().contains("panel")
                || item.name.contains("panel");
            let is_sheathing = part.part_id.to_lowercase().contains("sheath")
                || item.name.contains("sheathing");

            // Gable endwall panels: per-length breakdown up the roof line
            if item.name.contains("endwall")
                && is_panel
                && geometry_inputs.map(|g| g.roof_style == RoofStyle::Gable) == Some(true)
            {
                if let (Some(geom), Some(cov_in)) = (geometry, part.coverage_width_in) {
                    let lengths = gable_panel_lengths(
                        geom.eave_height_ft,
                        geometry_inputs.map(|g| g.roof_pitch).unwrap_or(0.0),
                        geom.overall_width_ft,
                        cov_in / 12.0,
                        GABLE_PANEL_EXTRA_IN,
                    );
                    for (length_in, per_end) in lengths {
                        // Both gable ends, then waste, then whole panels
                        let effective = ((per_end * 2) as f64 * waste).ceil();
                        *accumulated
                            .entry((part.part_id.clone(), Some(length_in)))
                            .or_insert(0.0) += effective;
                    }
                    continue;
                }
            }

            // Constant-length panels: counts from run / coverage width, not
            // from area, so waste never compounds with coverage rounding
            if is_panel && part.coverage_width_in.is_some() {
                if let Some(geom) = geometry {
                    let cov_ft = part.coverage_width_in.unwrap_or(36.0) / 12.0;
                    // A panel never spans two faces, so each face rounds up
                    // on its own
                    let (run_ft, faces, length_in) = if item.name.contains("sidewall") {
                        (geom.overall_length_ft, 2.0, geom.eave_height_ft * 12.0)
                    } else if item.name.contains("endwall") {
                        // Shed-style endwalls: both ends at eave height
                        (geom.overall_width_ft, 2.0, geom.eave_height_ft * 12.0)
                    } else {
                        // Roof: panels run eave to ridge on both slopes
                        let slope_len_in =
                            (geom.overall_width_ft / 2.0) * geom.slope_factor * 12.0;
                        (geom.overall_length_ft, 2.0, slope_len_in)
                    };
                    let num_panels = ((run_ft / cov_ft).ceil() * faces * waste).ceil();
                    let key_len = length_in.round() as u32;
                    *accumulated
                        .entry((part.part_id.clone(), Some(key_len)))
                        .or_insert(0.0) += num_panels;
                } else {
                    // No geometry: conservative fallback on raw quantity
                    let effective = (base_qty * waste).ceil();
                    *accumulated
                        .entry((part.part_id.clone(), None))
                        .or_insert(0.0) += effective;
                }
                continue;
            }

            // Sheet goods: area demand to whole 4x8 sheets
            if is_sheathing {
                if let (Some(cov_w), Some(cov_h)) =
                    (part.coverage_width_in, part.coverage_height_in)
                {
                    let sheet_area_sqft = (cov_w / 12.0) * (cov_h / 12.0);
                    let num_sheets = ((base_qty / sheet_area_sqft) * waste).ceil();
                    *accumulated
                        .entry((part.part_id.clone(), Some(cov_h.round() as u32)))
                        .or_insert(0.0) += num_sheets;
                    continue;
                }
            }

            // J-channel: regenerate segments and pack into 10' sticks
            if item.name == names::J_CHANNEL && item.unit == Unit::Inches {
                if let (Some(geom), Some(inputs)) = (geometry, geometry_inputs) {
                    let segments = j_channel_segments(geom, inputs);
                    for segment in &segments {
                        if *segment > J_STOCK_LENGTH_IN {
                            diagnostics.push(Diagnostic::new(
                                DiagnosticKind::OversizedSegment,
                                &item.name,
                                format!(
                                    "segment {:.0}\" exceeds {:.0}\" stock; ordering {} dedicated sticks",
                                    segment,
                                    J_STOCK_LENGTH_IN,
                                    (segment / J_STOCK_LENGTH_IN).ceil()
                                ),
                            ));
                        }
                    }
                    let sticks = pack_segments_into_sticks(&segments, J_STOCK_LENGTH_IN);
                    if sticks > 0 {
                        *accumulated
                            .entry((part.part_id.clone(), Some(J_STOCK_LENGTH_IN as u32)))
                            .or_insert(0.0) += sticks as f64;
                    }
                    continue;
                }
            }

            // Framing lumber: split linear demand into stock lengths
            let is_framing_lumber = part.unit == Unit::LinearFeet
                && (part.category.eq_ignore_ascii_case("framing")
                    || item.name.contains("girt")
                    || item.name.contains("purlin")
                    || item.name.contains(names::DOOR_FRAMING)
                    || item.name.contains(names::WINDOW_FRAMING));
            if is_framing_lumber {
                let total_lf = base_qty * waste;
                for (length_ft, count) in
                    split_lumber_into_stock_lengths(total_lf, &DEFAULT_STOCK_LENGTHS_FT)
                {
                    *accumulated
                        .entry((part.part_id.clone(), Some(length_ft * 12)))
                        .or_insert(0.0) += count as f64;
                }
                continue;
            }

            // Everything else accumulates by part id with waste applied
            *accumulated
                .entry((part.part_id.clone(), None))
                .or_insert(0.0) += base_qty * waste;
        }
    }

    let bom = build_rows(accumulated, catalogs, &mut diagnostics);
    (bom, diagnostics)
}

fn build_rows(
    accumulated: BTreeMap<PartKey, f64>,
    catalogs: &Catalogs,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<PartQuantity> {
    let mut rows = Vec::with_capacity(accumulated.len());

    for ((part_id, length_in), qty) in accumulated {
        let Some(part) = catalogs.part(&part_id) else {
            continue; // keys are only inserted for known parts
        };

        let lowered = part_id.to_lowercase();
        let is_panel = lowered.contains("panel");
        let is_sheathing = lowered.contains("sheath");

        // Panels and sheathing were counted into pieces above; the row unit
        // becomes discrete even when the catalog prices the part per sqft
        let mut unit = part.unit;
        if (is_panel || is_sheathing) && unit == Unit::SquareFeet {
            unit = Unit::Each;
        }

        let mut unit_price = catalogs.unit_price(&part_id).unwrap_or(0.0);
        if catalogs.unit_price(&part_id).is_none() && qty > 0.0 {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::MissingPrice,
                &part_id,
                "no pricing row; extended price is zero",
            ));
        }

        // A per-sqft panel price becomes per-piece via coverage width and a
        // standard panel length
        if is_panel && unit == Unit::Each {
            if let Some(cov_w) = part.coverage_width_in {
                unit_price *= PANEL_PRICING_LENGTH_FT * (cov_w / 12.0);
            }
        }

        // Lumber rows carry piece counts at a stock length; extend by the
        // footage each piece represents so per-foot pricing holds
        let ext_price = match (unit, length_in) {
            (Unit::LinearFeet, Some(len)) => qty * (len as f64 / 12.0) * unit_price,
            _ => qty * unit_price,
        };

        let mut notes = part.description.clone();
        if let Some(len) = length_in {
            let annotation = format!("Length: {:.1}ft ({}\")", len as f64 / 12.0, len);
            if notes.is_empty() {
                notes = annotation;
            } else {
                notes = format!("{notes}; {annotation}");
            }
        }

        let sheet_name = if part.export_category.is_empty() {
            part.category.clone()
        } else {
            part.export_category.clone()
        };

        rows.push(PartQuantity {
            part_id: part_id.clone(),
            part_name: part.part_name.clone(),
            category: part.category.clone(),
            export_category: part.export_category.clone(),
            unit,
            qty,
            unit_price,
            ext_price,
            length_in: length_in.map(|l| l as f64),
            sheet_name: Some(sheet_name),
            notes,
        });
    }

    rows
}

/// Rebuild a material takeoff from BOM rows, aggregated by
/// `(part_id, length)`.
///
/// The orchestrator swaps this in for the raw takeoff so a caller
/// inspecting "material takeoff" sees the same whole-unit counts (sticks,
/// sheets, panels) as the BOM rather than raw footage and area.
pub fn takeoff_from_bom(bom: &[PartQuantity]) -> MaterialTakeoff {
    use crate::takeoff::AssemblyQuantity;

    let mut aggregated: BTreeMap<PartKey, AssemblyQuantity> = BTreeMap::new();

    for row in bom {
        let key = (
            row.part_id.clone(),
            row.length_in.map(|l| l.round() as u32),
        );
        let entry = aggregated.entry(key.clone()).or_insert_with(|| {
            let mut notes = row.notes.clone();
            if notes.is_empty() {
                if let Some(len) = row.length_in {
                    notes = format!("Length: {:.1}ft", len / 12.0);
                }
            }
            AssemblyQuantity {
                name: row.part_id.to_lowercase().replace('_', " "),
                description: row.part_name.clone(),
                category: Category::parse(&row.category),
                quantity: 0.0,
                unit: row.unit,
                notes: if notes.is_empty() { None } else { Some(notes) },
            }
        });
        entry.quantity += row.qty;
    }

    MaterialTakeoff::new(aggregated.into_values().collect())
}
