//! Pure allocation logic for the income goal allocator.
//!
//! The side-effecting loop lives in `ops::goals`; this module contains the
//! decision rules so they can be tested without a database: the funding
//! order and the per-goal split of the allocation pool.

use std::cmp::Reverse;

use uuid::Uuid;

use crate::Goal;

/// Default allocation rate in basis points: 10% of each income transaction
/// is routed to active goals.
pub(crate) const DEFAULT_ALLOCATION_RATE_BPS: u32 = 1_000;

/// The slice of an income amount reserved for goal funding.
///
/// Widened to `i128` so an income near `i64::MAX` cannot overflow the
/// multiply; a pool outside the `i64` range saturates.
pub(crate) fn allocation_pool(income_minor: i64, rate_bps: u32) -> i64 {
    let pool = i128::from(income_minor) * i128::from(rate_bps) / 10_000;
    i64::try_from(pool).unwrap_or(if pool > 0 { i64::MAX } else { i64::MIN })
}

/// Sorts goals into funding order: priority descending, then deadline
/// ascending. Goals without a deadline are funded after all dated goals of
/// the same priority; a deadline expresses urgency, its absence means
/// "whenever". The sort is stable, so equal goals keep their fetch order.
pub(crate) fn allocation_order(goals: &mut [Goal]) {
    goals.sort_by_key(|goal| {
        (
            Reverse(goal.priority),
            goal.deadline.is_none(),
            goal.deadline,
        )
    });
}

/// Splits `pool_minor` across `goals` (already in funding order): each goal
/// receives `min(pool, remaining capacity)`, full goals are skipped, and
/// the iteration stops as soon as the pool runs out.
pub(crate) fn plan_allocation(pool_minor: i64, goals: &[Goal]) -> Vec<(Uuid, i64)> {
    let mut pool = pool_minor;
    let mut plan = Vec::new();

    for goal in goals {
        if pool <= 0 {
            break;
        }
        let capacity = goal.remaining_capacity_minor();
        if capacity <= 0 {
            continue;
        }
        let share = pool.min(capacity);
        plan.push((goal.id, share));
        pool -= share;
    }

    plan
}
