//! PostgreSQL rules. The trait defaults already implement the PostgreSQL
//! behavior; only the feature set and NULL ordering live here.

use crate::render::dialect::DialectConfig;
use crate::render::traits::{null_order_text, DialectRules, Feature};

pub struct PostgresRules;

impl DialectRules for PostgresRules {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn unsupported(&self) -> &'static [Feature] {
        &[Feature::Replace, Feature::OnDuplicate, Feature::OrIgnore]
    }

    fn null_order_suffix(&self, config: &DialectConfig) -> Option<&'static str> {
        config.null_order.map(null_order_text)
    }
}
