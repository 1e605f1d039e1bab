// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Months, Utc};
use uuid::Uuid;

use crate::models::{RecurringFrequency, Spend};

/// Compute the next occurrence of a recurring spend, one period ahead.
/// Month arithmetic preserves the day-of-month where possible and clamps to
/// the target month's length (Jan 31 -> Feb 28/29).
///
/// Returns `None` when the occurrence after `current` would fall strictly
/// past `emi_end_date`; the chain is terminal and `current` stays untouched.
pub fn next_occurrence(current: &Spend) -> Option<Spend> {
    let step = match current.frequency() {
        RecurringFrequency::Monthly => Months::new(1),
        RecurringFrequency::Yearly => Months::new(12),
    };

    let next_date = current.date.checked_add_months(step)?;
    if let Some(end) = current.emi_end_date {
        if next_date > end {
            return None;
        }
    }

    // The due date shifts by the same offset, independently of the spend date.
    let next_due = current.due_date.and_then(|d| d.checked_add_months(step));

    Some(Spend {
        id: Uuid::new_v4(),
        amount: current.amount,
        description: current.description.clone(),
        date: next_date,
        category_id: current.category_id,
        subcategory: current.subcategory.clone(),
        is_paid: false,
        is_recurring: true,
        recurring_frequency: current.recurring_frequency,
        due_date: next_due,
        emi_end_date: current.emi_end_date,
        paid_date: None,
        created_at: Utc::now(),
    })
}
