use serde::{Serialize, Deserialize};
use std::collections::HashMap;

pub const UP_VOTE: &str = "1";
pub const DOWN_VOTE: &str = "-1";

/// Up/down counters for one site, stored on disk as `[up, down]`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tally(pub i64, pub i64);

impl Tally {
    pub fn up(&self) -> i64 {
        self.0
    }

    pub fn down(&self) -> i64 {
        self.1
    }

    pub fn total(&self) -> i64 {
        self.0.saturating_add(self.1)
    }

    /// `floor(100 * (up - down) / (up + down))`, or 0 for an empty tally.
    ///
    /// Counts come from disk unchecked, so the arithmetic is done in `i128` and the
    /// result clamped to the `i64` range.
    pub fn percent(&self) -> i64 {
        let (up, down) = (i128::from(self.0), i128::from(self.1));
        let total = up + down;
        if total == 0 {
            return 0;
        }
        let percent = floor_div(100 * (up - down), total);
        i64::try_from(percent).unwrap_or(if percent < 0 { i64::MIN } else { i64::MAX })
    }

    pub fn record(&mut self, kind: VoteKind) {
        match kind {
            VoteKind::Up => self.0 = self.0.saturating_add(1),
            VoteKind::Down => self.1 = self.1.saturating_add(1),
        }
    }

    pub fn retract(&mut self, kind: VoteKind) {
        match kind {
            VoteKind::Up => self.0 = self.0.saturating_sub(1),
            VoteKind::Down => self.1 = self.1.saturating_sub(1),
        }
    }
}

fn floor_div(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    if numerator % denominator != 0 && (numerator < 0) != (denominator < 0) {
        quotient - 1
    } else {
        quotient
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteKind {
    Up,
    Down,
}

impl VoteKind {
    /// Only the exact strings `"1"` and `"-1"` count; everything else is `None`.
    pub fn classify(vote: &str) -> Option<Self> {
        match vote {
            UP_VOTE => Some(VoteKind::Up),
            DOWN_VOTE => Some(VoteKind::Down),
            _ => None,
        }
    }
}

/// The persisted document: `{"counts": {...}, "latest": {...}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreData {
    #[serde(default)]
    pub counts: HashMap<String, Tally>,
    #[serde(default)]
    pub latest: HashMap<String, HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PercentResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<i64>,
}

impl PercentResponse {
    pub fn ok(percent: i64) -> Self {
        Self {
            success: true,
            percent: Some(percent),
        }
    }

    pub fn failure() -> Self {
        Self {
            success: false,
            percent: None,
        }
    }
}
