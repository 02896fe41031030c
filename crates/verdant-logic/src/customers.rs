//! Weighted customer-kind selection.

use serde::{Deserialize, Serialize};

use crate::constants::{REGULAR_WEIGHT, VIP_WEIGHT};

/// The three kinds of visitor the nursery attracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerKind {
    Regular,
    Vip,
    Robber,
}

impl CustomerKind {
    pub fn name(&self) -> &'static str {
        match self {
            CustomerKind::Regular => "Regular",
            CustomerKind::Vip => "VIP",
            CustomerKind::Robber => "Robber",
        }
    }
}

/// Maps a uniform roll in `0..100` to a customer kind: 85% regular,
/// 10% VIP, 5% robber.
pub fn kind_for_roll(roll: u32) -> CustomerKind {
    if roll < REGULAR_WEIGHT {
        CustomerKind::Regular
    } else if roll < REGULAR_WEIGHT + VIP_WEIGHT {
        CustomerKind::Vip
    } else {
        CustomerKind::Robber
    }
}
