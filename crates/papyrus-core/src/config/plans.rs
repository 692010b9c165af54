//! Favorites selection limits per subscription plan.

use serde::{Deserialize, Serialize};

/// Maximum number of favorite agents per plan. `None` means unlimited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanLimits {
    /// Free plan.
    #[serde(default = "default_plan1")]
    pub plan1: Option<usize>,
    /// Basic plan.
    #[serde(default = "default_plan2")]
    pub plan2: Option<usize>,
    /// Professional plan.
    #[serde(default = "default_plan3")]
    pub plan3: Option<usize>,
    /// Enterprise plan.
    #[serde(default)]
    pub plan4: Option<usize>,
    /// Limit for users without a recognised plan.
    #[serde(default)]
    pub fallback: usize,
}

impl PlanLimits {
    /// Resolve the selection limit for a plan name.
    pub fn limit_for(&self, plan: &str) -> Option<usize> {
        match plan {
            "plan1" => self.plan1,
            "plan2" => self.plan2,
            "plan3" => self.plan3,
            "plan4" => self.plan4,
            _ => Some(self.fallback),
        }
    }
}

impl Default for PlanLimits {
    fn default() -> Self {
        Self {
            plan1: default_plan1(),
            plan2: default_plan2(),
            plan3: default_plan3(),
            plan4: None,
            fallback: 0,
        }
    }
}

fn default_plan1() -> Option<usize> {
    Some(0)
}

fn default_plan2() -> Option<usize> {
    Some(5)
}

fn default_plan3() -> Option<usize> {
    Some(10)
}
