//! 库存台账
//!
//! 原料库存 + 只追加的流水 (IN / ADJUST / CONSUME)。库存永不为负：
//! 扣减超出部分记为 shortfall。

mod error;
mod ledger;
mod service;

pub use error::InventoryError;
pub use ledger::{ConsumptionLine, InventoryLedger};
pub use service::InventoryService;
pub(crate) use service::newly_low;

use std::fmt;
use std::str::FromStr;

/// 消耗超过库存时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverconsumptionPolicy {
    /// Clamp stock at zero and record the shortfall
    #[default]
    Clamp,
    /// Refuse the whole consumption before touching stock
    Reject,
}

impl FromStr for OverconsumptionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clamp" => Ok(OverconsumptionPolicy::Clamp),
            "reject" => Ok(OverconsumptionPolicy::Reject),
            other => Err(format!("unknown overconsumption policy: {}", other)),
        }
    }
}

impl fmt::Display for OverconsumptionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverconsumptionPolicy::Clamp => write!(f, "clamp"),
            OverconsumptionPolicy::Reject => write!(f, "reject"),
        }
    }
}
