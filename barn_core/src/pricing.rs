//! # Pricing Engine
//!
//! Prices the assembly-level takeoff (not the packed BOM): each assembly
//! resolves to a part, gets its waste-adjusted quantity, material and labor
//! costs, and markup. Overhead is applied once at the summary level, tax on
//! material plus markup, and flat costs (delivery, permit, site prep) after
//! tax. MEP allowances are appended as flat, un-marked-up line items folded
//! into the material subtotal.
//!
//! Missing mappings and missing prices are never fatal: the line degrades
//! to zero cost with a human-readable note, because a partial estimate is
//! still useful.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalogs;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::inputs::PricingInputs;
use crate::takeoff::{names, Category, MaterialTakeoff};
use crate::units::Unit;

/// One assembly's full cost breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedLineItem {
    pub name: String,
    pub description: String,
    pub category: Category,
    /// Quantity after the waste factor
    pub quantity: f64,
    pub unit: Unit,
    pub part_id: Option<String>,
    /// Material unit price before markup
    pub unit_price: f64,
    pub material_cost: f64,
    pub labor_hours: f64,
    pub labor_rate: f64,
    pub labor_cost: f64,
    /// Material markup percent applied to this line (override or global)
    pub markup_percent: f64,
    /// Total markup: material + labor + subcontractor
    pub markup_amount: f64,
    /// material_cost + labor_cost + markup_amount
    pub total_cost: f64,
    pub notes: Option<String>,
}

/// Rollup totals. `grand_total` always equals the sum of the other fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSummary {
    /// Material cost including MEP allowances
    pub material_subtotal: f64,
    pub labor_subtotal: f64,
    pub markup_total: f64,
    /// (material + labor) x overhead_pct, applied once here
    pub overhead_total: f64,
    /// (material + markup) x tax_rate
    pub tax_total: f64,
    /// Delivery + permit + site prep
    pub flat_costs_total: f64,
    pub grand_total: f64,
}

/// Price a material takeoff.
///
/// Returns the per-assembly line items, the summary rollup, and the
/// diagnostics for any mapping or pricing gaps encountered.
pub fn price_material_takeoff(
    takeoff: &MaterialTakeoff,
    pricing_inputs: &PricingInputs,
    catalogs: &Catalogs,
) -> (Vec<PricedLineItem>, PricingSummary, Vec<Diagnostic>) {
    let mut priced_items: Vec<PricedLineItem> = Vec::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    let labor_rate = pricing_inputs.labor_rate;
    let material_markup_pct = pricing_inputs.material_markup_pct;
    let labor_markup_pct = pricing_inputs.labor_markup_pct;
    let subcontractor_markup_pct = pricing_inputs.subcontractor_markup_pct;

    for assembly in &takeoff.items {
        let mapping = catalogs.mappings_for(&assembly.name).into_iter().next();

        let mut notes: Vec<String> = Vec::new();
        let (part_id, waste_factor, labor_per_unit, markup_override, is_subcontractor) =
            match &mapping {
                Some(m) => (
                    Some(m.part_id.clone()),
                    m.waste_factor,
                    m.labor_per_unit,
                    m.markup_percent_override,
                    m.subcontractor,
                ),
                None => {
                    debug!(assembly = %assembly.name, "no part mapping; pricing as zero");
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnmappedAssembly,
                        &assembly.name,
                        "no part mapping in catalog or fallback table; priced as zero",
                    ));
                    notes.push(format!("No part mapping for {}", assembly.name));
                    (None, 1.0, 0.0, None, false)
                }
            };

        let effective_qty = assembly.quantity * waste_factor;

        let mut unit_price = 0.0;
        if let Some(part_id) = &part_id {
            match catalogs.unit_price(part_id) {
                Some(price) => unit_price = price,
                None => {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::MissingPrice,
                        part_id.as_str(),
                        format!("no price for assembly '{}'; priced as zero", assembly.name),
                    ));
                    notes.push(format!("No price found for part {part_id}"));
                }
            }
        }

        let material_cost = effective_qty * unit_price;
        let labor_hours = effective_qty * labor_per_unit;
        let labor_cost = labor_hours * labor_rate;

        // Three independent markups summed into one line amount; the
        // material percentage honors a per-assembly override
        let material_markup_pct_effective = markup_override.unwrap_or(material_markup_pct);
        let material_markup = material_cost * material_markup_pct_effective / 100.0;
        let labor_markup = labor_cost * labor_markup_pct / 100.0;
        let subcontractor_markup = if is_subcontractor {
            (material_cost + labor_cost) * subcontractor_markup_pct / 100.0
        } else {
            0.0
        };
        let markup_amount = material_markup + labor_markup + subcontractor_markup;

        let total_cost = material_cost + labor_cost + markup_amount;

        priced_items.push(PricedLineItem {
            name: assembly.name.clone(),
            description: assembly.description.clone(),
            category: assembly.category,
            quantity: effective_qty,
            unit: assembly.unit,
            part_id,
            unit_price,
            material_cost,
            labor_hours,
            labor_rate,
            labor_cost,
            markup_percent: material_markup_pct_effective,
            markup_amount,
            total_cost,
            notes: if notes.is_empty() {
                assembly.notes.clone()
            } else {
                Some(notes.join("; "))
            },
        });
    }

    // Summary rollup. Overhead and tax apply to the core material/labor
    // base; MEP allowances and flat costs join afterwards, un-marked-up.
    let material_core: f64 = priced_items.iter().map(|i| i.material_cost).sum();
    let labor_subtotal: f64 = priced_items.iter().map(|i| i.labor_cost).sum();
    let markup_total: f64 = priced_items.iter().map(|i| i.markup_amount).sum();

    let overhead_total = (material_core + labor_subtotal) * pricing_inputs.overhead_pct / 100.0;
    let tax_total = (material_core + markup_total) * pricing_inputs.tax_rate;

    let flat_costs_total = pricing_inputs.delivery_cost.unwrap_or(0.0)
        + pricing_inputs.permit_cost.unwrap_or(0.0)
        + pricing_inputs.site_prep_cost.unwrap_or(0.0);

    let mep_items = mep_allowance_items(pricing_inputs);
    let mep_total: f64 = mep_items.iter().map(|i| i.material_cost).sum();
    priced_items.extend(mep_items);

    let material_subtotal = material_core + mep_total;
    let grand_total = material_subtotal
        + labor_subtotal
        + markup_total
        + overhead_total
        + tax_total
        + flat_costs_total;

    let summary = PricingSummary {
        material_subtotal,
        labor_subtotal,
        markup_total,
        overhead_total,
        tax_total,
        flat_costs_total,
        grand_total,
    };

    (priced_items, summary, diagnostics)
}

/// Flat MEP allowance lines. Allowances carry no markup and no labor; they
/// land in the material subtotal as lump sums.
fn mep_allowance_items(pricing_inputs: &PricingInputs) -> Vec<PricedLineItem> {
    let allowances = [
        (
            names::ELECTRICAL_ALLOWANCE,
            "Electrical allowance (basic lighting/outlets)",
            pricing_inputs.electrical_allowance,
        ),
        (
            names::PLUMBING_ALLOWANCE,
            "Plumbing allowance",
            pricing_inputs.plumbing_allowance,
        ),
        (
            names::MECHANICAL_ALLOWANCE,
            "Mechanical allowance (heat/vent)",
            pricing_inputs.mechanical_allowance,
        ),
    ];

    allowances
        .iter()
        .filter_map(|(name, description, amount)| {
            let amount = amount.filter(|a| *a > 0.0)?;
            Some(PricedLineItem {
                name: name.to_string(),
                description: description.to_string(),
                category: Category::Mep,
                quantity: 1.0,
                unit: Unit::Lump,
                part_id: None,
                unit_price: amount,
                material_cost: amount,
                labor_hours: 0.0,
                labor_rate: pricing_inputs.labor_rate,
                labor_cost: 0.0,
                markup_percent: 0.0,
                markup_amount: 0.0,
                total_cost: amount,
                notes: Some("MEP allowance - not marked up".to_string()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AssemblyMapping;
    use crate::takeoff::AssemblyQuantity;

    fn single_item_takeoff(name: &str, quantity: f64, unit: Unit) -> MaterialTakeoff {
        MaterialTakeoff::new(vec![AssemblyQuantity::new(
            name,
            "Test assembly",
            Category::Framing,
            quantity,
            unit,
        )])
    }

    fn catalogs_with_mapping(mapping: AssemblyMapping) -> Catalogs {
        let mut catalogs = Catalogs::builtin();
        catalogs.assembly_map.push(mapping);
        catalogs
    }

    fn posts_mapping() -> AssemblyMapping {
        AssemblyMapping {
            assembly_name: names::POSTS.to_string(),
            part_id: Some("POST_6X6_PT".to_string()),
            parts: None,
            quantity_multiplier: None,
            waste_factor: 1.1,
            labor_per_unit: 0.5,
            markup_percent_override: None,
            subcontractor: false,
            category: "framing".to_string(),
        }
    }

    #[test]
    fn test_line_item_math() {
        let takeoff = single_item_takeoff(names::POSTS, 10.0, Unit::Each);
        let catalogs = catalogs_with_mapping(posts_mapping());
        let pricing = PricingInputs {
            labor_rate: 50.0,
            material_markup_pct: 15.0,
            labor_markup_pct: 10.0,
            ..PricingInputs::default()
        };

        let (items, summary, diagnostics) =
            price_material_takeoff(&takeoff, &pricing, &catalogs);
        assert!(diagnostics.is_empty());
        let line = &items[0];

        // 10 x 1.1 waste = 11 posts at $64
        assert!((line.quantity - 11.0).abs() < 1e-9);
        assert!((line.material_cost - 11.0 * 64.0).abs() < 1e-9);
        // 11 x 0.5 hr x $50
        assert!((line.labor_hours - 5.5).abs() < 1e-9);
        assert!((line.labor_cost - 275.0).abs() < 1e-9);
        // 15% material + 10% labor markup
        let expected_markup = line.material_cost * 0.15 + line.labor_cost * 0.10;
        assert!((line.markup_amount - expected_markup).abs() < 1e-9);
        assert!(
            (line.total_cost - (line.material_cost + line.labor_cost + line.markup_amount)).abs()
                < 1e-9
        );
        assert!((summary.grand_total - line.total_cost).abs() < 1e-9);
    }

    #[test]
    fn test_markup_override() {
        let mut mapping = posts_mapping();
        mapping.markup_percent_override = Some(25.0);
        let takeoff = single_item_takeoff(names::POSTS, 10.0, Unit::Each);
        let catalogs = catalogs_with_mapping(mapping);

        let (items, _, _) =
            price_material_takeoff(&takeoff, &PricingInputs::default(), &catalogs);
        assert_eq!(items[0].markup_percent, 25.0);
    }

    #[test]
    fn test_subcontractor_markup() {
        let mut mapping = posts_mapping();
        mapping.subcontractor = true;
        let takeoff = single_item_takeoff(names::POSTS, 10.0, Unit::Each);
        let catalogs = catalogs_with_mapping(mapping);
        let pricing = PricingInputs {
            material_markup_pct: 0.0,
            labor_markup_pct: 0.0,
            subcontractor_markup_pct: 10.0,
            ..PricingInputs::default()
        };

        let (items, _, _) = price_material_takeoff(&takeoff, &pricing, &catalogs);
        let line = &items[0];
        let expected = (line.material_cost + line.labor_cost) * 0.10;
        assert!((line.markup_amount - expected).abs() < 1e-9);
    }

    #[test]
    fn test_overhead_applied_at_summary_not_per_line() {
        let takeoff = single_item_takeoff(names::POSTS, 10.0, Unit::Each);
        let catalogs = catalogs_with_mapping(posts_mapping());
        let pricing = PricingInputs {
            overhead_pct: 10.0,
            material_markup_pct: 0.0,
            labor_markup_pct: 0.0,
            ..PricingInputs::default()
        };

        let (items, summary, _) = price_material_takeoff(&takeoff, &pricing, &catalogs);
        assert_eq!(items[0].markup_amount, 0.0);
        let expected =
            (summary.material_subtotal + summary.labor_subtotal) * 0.10;
        assert!((summary.overhead_total - expected).abs() < 1e-9);
    }

    #[test]
    fn test_tax_on_material_plus_markup() {
        let takeoff = single_item_takeoff(names::POSTS, 10.0, Unit::Each);
        let catalogs = catalogs_with_mapping(posts_mapping());
        let pricing = PricingInputs {
            tax_rate: 0.08,
            ..PricingInputs::default()
        };

        let (items, summary, _) = price_material_takeoff(&takeoff, &pricing, &catalogs);
        let material: f64 = items.iter().map(|i| i.material_cost).sum();
        let expected = (material + summary.markup_total) * 0.08;
        assert!((summary.tax_total - expected).abs() < 1e-9);
    }

    #[test]
    fn test_missing_mapping_degrades_to_zero() {
        let takeoff = single_item_takeoff("mystery_assembly", 3.0, Unit::Each);
        let (items, summary, diagnostics) = price_material_takeoff(
            &takeoff,
            &PricingInputs::default(),
            &Catalogs::builtin(),
        );

        let line = &items[0];
        assert_eq!(line.part_id, None);
        assert_eq!(line.total_cost, 0.0);
        assert!(line.notes.as_deref().unwrap().contains("No part mapping"));
        assert_eq!(summary.grand_total, 0.0);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnmappedAssembly);
    }

    #[test]
    fn test_missing_price_degrades_to_zero() {
        let mut catalogs = catalogs_with_mapping(posts_mapping());
        catalogs.prices.retain(|p| p.part_id != "POST_6X6_PT");
        let takeoff = single_item_takeoff(names::POSTS, 10.0, Unit::Each);

        let (items, _, diagnostics) =
            price_material_takeoff(&takeoff, &PricingInputs::default(), &catalogs);
        assert_eq!(items[0].material_cost, 0.0);
        assert!(items[0].notes.as_deref().unwrap().contains("No price found"));
        assert!(diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::MissingPrice));
    }

    #[test]
    fn test_mep_allowances_and_flat_costs() {
        let takeoff = MaterialTakeoff::default();
        let pricing = PricingInputs {
            electrical_allowance: Some(2500.0),
            mechanical_allowance: Some(1800.0),
            delivery_cost: Some(400.0),
            permit_cost: Some(250.0),
            ..PricingInputs::default()
        };

        let (items, summary, _) =
            price_material_takeoff(&takeoff, &pricing, &Catalogs::builtin());

        // Allowances become lump line items with no markup
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.markup_amount == 0.0));
        assert!(items.iter().all(|i| i.unit == Unit::Lump));

        assert!((summary.material_subtotal - 4300.0).abs() < 1e-9);
        assert!((summary.flat_costs_total - 650.0).abs() < 1e-9);
        assert!((summary.grand_total - 4950.0).abs() < 1e-9);
    }

    #[test]
    fn test_grand_total_identity() {
        let takeoff = single_item_takeoff(names::POSTS, 10.0, Unit::Each);
        let catalogs = catalogs_with_mapping(posts_mapping());
        let pricing = PricingInputs {
            tax_rate: 0.07,
            overhead_pct: 5.0,
            delivery_cost: Some(300.0),
            plumbing_allowance: Some(1000.0),
            ..PricingInputs::default()
        };

        let (_, summary, _) = price_material_takeoff(&takeoff, &pricing, &catalogs);
        let reconstructed = summary.material_subtotal
            + summary.labor_subtotal
            + summary.markup_total
            + summary.overhead_total
            + summary.tax_total
            + summary.flat_costs_total;
        assert!((summary.grand_total - reconstructed).abs() < 1e-9);
    }
}
