use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::risk::classifier::RiskAnnotatedPoint;
use crate::types::Money;

/// A run of at-risk points on consecutive calendar days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Number of flagged points in the run.
    pub points: usize,
    pub lowest_balance: Money,
}

/// Group flagged points on consecutive days into windows.
///
/// An unflagged point or a missing date between two flagged points closes
/// the window.
pub fn risk_windows(points: &[RiskAnnotatedPoint]) -> Vec<RiskWindow> {
    let mut windows: Vec<RiskWindow> = Vec::new();
    let mut open: Option<RiskWindow> = None;

    for p in points {
        if !p.is_risk_date {
            windows.extend(open.take());
            continue;
        }
        match open.as_mut() {
            Some(w) if p.point.date - w.end <= Duration::days(1) => {
                w.end = p.point.date;
                w.points += 1;
                w.lowest_balance = w.lowest_balance.min(p.point.balance);
            }
            _ => {
                windows.extend(open.take());
                open = Some(RiskWindow {
                    start: p.point.date,
                    end: p.point.date,
                    points: 1,
                    lowest_balance: p.point.balance,
                });
            }
        }
    }
    windows.extend(open);
    windows
}
