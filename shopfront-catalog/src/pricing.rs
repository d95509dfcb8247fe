use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Time-boxed promotional multiplier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// e.g. 0.8 for 20% off
    pub multiplier: f64,
}

impl SaleWindow {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now < self.end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Prices are rounded to a multiple of this (in cents)
    pub min_adjustment_cents: i64,

    /// Maximum multiplier allowed
    pub max_multiplier: f64,

    /// Minimum multiplier allowed
    pub min_multiplier: f64,

    /// Applied to every base price
    pub global_multiplier: f64,

    /// Added after the multiplier, may be negative
    pub flat_adjustment_cents: i64,

    pub tax_rate: f64,

    pub sale: Option<SaleWindow>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            min_adjustment_cents: 1,
            max_multiplier: 3.0,
            min_multiplier: 0.5,
            global_multiplier: 1.0,
            flat_adjustment_cents: 0,
            tax_rate: 0.0,
            sale: None,
        }
    }
}

/// Business rules turning a list price into the current selling price
#[derive(Debug, Clone)]
pub struct PricingRules {
    config: PricingConfig,
}

impl PricingRules {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Effective multiplier at `now`, clamped to the configured limits
    pub fn multiplier_at(&self, now: DateTime<Utc>) -> f64 {
        let mut multiplier = self.config.global_multiplier;

        if let Some(sale) = &self.config.sale {
            if sale.is_active(now) {
                multiplier *= sale.multiplier;
            }
        }

        multiplier.max(self.config.min_multiplier).min(self.config.max_multiplier)
    }

    /// Selling price in cents for a list price at `now`
    pub fn price_at(&self, base_price_cents: i64, now: DateTime<Utc>) -> i64 {
        let multiplier = self.multiplier_at(now);
        // Float to int casts saturate; keep the integer steps saturating too
        let adjusted = ((base_price_cents as f64 * multiplier).round() as i64)
            .saturating_add(self.config.flat_adjustment_cents);

        let rounded = self.round_to_step(adjusted);
        let taxed = (rounded as f64 * (1.0 + self.config.tax_rate)).round() as i64;

        taxed.max(0)
    }

    // Nearest multiple of min_adjustment_cents, halves round up
    fn round_to_step(&self, cents: i64) -> i64 {
        let step = self.config.min_adjustment_cents.max(1);
        let remainder = cents.rem_euclid(step);
        if remainder >= step - remainder {
            cents.saturating_add(step - remainder)
        } else {
            cents.saturating_sub(remainder)
        }
    }
}

impl Default for PricingRules {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}
