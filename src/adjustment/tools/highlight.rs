use crate::adjustment::tools::config::HighlightRules;
use crate::adjustment::tools::model::{CellValue, Fill};

/// Chooses the fill for a cost cell given the row's adjustment type.
///
/// Rules are tried in order; the first one that matches wins and anything
/// left over is yellow. A non-numeric cost is always yellow.
pub fn classify(rules: &HighlightRules, adjustment_type: &CellValue, abs_cost: &CellValue) -> Fill {
    let Some(cost) = abs_cost.as_number() else {
        return Fill::Yellow;
    };
    let code = adjustment_type.code_text();

    if contains(&rules.threshold_types, &code) && cost > rules.threshold {
        return Fill::Green;
    }

    if contains(&rules.tiered_types, &code) {
        if cost > rules.tier_upper {
            return Fill::Red;
        }
        if cost > rules.tier_lower {
            return Fill::Green;
        }
    }

    if contains(&rules.always_types, &code) {
        return Fill::Green;
    }

    Fill::Yellow
}

fn contains(codes: &[String], code: &str) -> bool {
    codes.iter().any(|candidate| candidate == code)
}
