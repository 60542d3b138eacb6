// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model pricing table and cost estimation.
//!
//! GPT-4o list prices: input $2.50/MTok, output $10.00/MTok.
//! GPT-4o mini:        input $0.15/MTok, output $0.60/MTok.

/// Per-model pricing in USD per million tokens.
#[derive(Debug, Clone, Copy)]
pub struct ModelPricing {
    /// Cost per million prompt tokens.
    pub input_per_mtok: f64,
    /// Cost per million completion tokens.
    pub output_per_mtok: f64,
}

/// Look up pricing for a model identifier.
///
/// Matches on substrings; unknown models fall back to GPT-4o pricing so cost
/// receipts never silently drop to zero.
pub fn get_pricing(model: &str) -> ModelPricing {
    let lower = model.to_lowercase();

    if lower.contains("4o-mini") {
        ModelPricing {
            input_per_mtok: 0.15,
            output_per_mtok: 0.60,
        }
    } else {
        // GPT-4o pricing (including unknown models).
        ModelPricing {
            input_per_mtok: 2.50,
            output_per_mtok: 10.0,
        }
    }
}

/// Estimated USD cost of one call.
pub fn estimate_cost(model: &str, prompt_tokens: i64, completion_tokens: i64) -> f64 {
    let pricing = get_pricing(model);
    (prompt_tokens as f64 / 1_000_000.0) * pricing.input_per_mtok
        + (completion_tokens as f64 / 1_000_000.0) * pricing.output_per_mtok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpt_4o_cost_matches_list_prices() {
        // 1M prompt + 1M completion = $2.50 + $10.00.
        let cost = estimate_cost("gpt-4o", 1_000_000, 1_000_000);
        assert!((cost - 12.5).abs() < 1e-9, "got {cost}");
    }

    #[test]
    fn per_token_rates() {
        let cost = estimate_cost("gpt-4o-2024-08-06", 1000, 100);
        let expected = 1000.0 * 2.5e-6 + 100.0 * 1.0e-5;
        assert!((cost - expected).abs() < 1e-12, "got {cost}");
    }

    #[test]
    fn mini_pricing_is_cheaper() {
        let p = get_pricing("gpt-4o-mini");
        assert!((p.input_per_mtok - 0.15).abs() < f64::EPSILON);
        assert!((p.output_per_mtok - 0.60).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_model_falls_back_to_gpt_4o() {
        let p = get_pricing("experimental-model");
        assert!((p.input_per_mtok - 2.50).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_tokens_zero_cost() {
        assert_eq!(estimate_cost("gpt-4o", 0, 0), 0.0);
    }
}
