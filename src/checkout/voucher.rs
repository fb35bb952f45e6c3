//! Voucher Evaluator
//!
//! Pure eligibility + discount computation. Rules run in a fixed order and
//! the first failing rule short-circuits with a human-readable reason —
//! the storefront surfaces that string verbatim.

use chrono::{DateTime, Utc};

use crate::models::{Money, Voucher, VoucherType};
use crate::store::BuyerSpend;

/// Evaluation outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub eligible: bool,
    pub reason: Option<String>,
    pub discount: Money,
}

impl Evaluation {
    fn ineligible(reason: impl Into<String>) -> Self {
        Self {
            eligible: false,
            reason: Some(reason.into()),
            discount: 0,
        }
    }
}

/// Evaluate a voucher against a subtotal and the buyer's trailing spend.
///
/// `subtotal` is the scope the voucher applies to: the group subtotal for
/// shop vouchers, the whole-draft subtotal for platform vouchers. The
/// computed discount never exceeds it.
pub fn evaluate(
    voucher: &Voucher,
    subtotal: Money,
    buyer_spend: BuyerSpend,
    now: DateTime<Utc>,
) -> Evaluation {
    // 1. Active flag and validity window
    if !voucher.is_active {
        return Evaluation::ineligible(format!("Voucher {} is no longer active", voucher.code));
    }
    if now < voucher.start_at {
        return Evaluation::ineligible(format!("Voucher {} is not valid yet", voucher.code));
    }
    if now > voucher.end_at {
        return Evaluation::ineligible(format!("Voucher {} has expired", voucher.code));
    }

    // 2. Usage limit
    if let Some(limit) = voucher.usage_limit
        && voucher.used_count >= limit
    {
        return Evaluation::ineligible(format!("Voucher {} has been fully redeemed", voucher.code));
    }

    // 3. Minimum subtotal
    if subtotal < voucher.min_subtotal {
        return Evaluation::ineligible(format!(
            "Order subtotal must be at least {} to use voucher {}",
            voucher.min_subtotal, voucher.code
        ));
    }

    // 4. Loyalty gates（面向回头客的门槛）
    if let Some(min_month) = voucher.min_buyer_spend_month
        && buyer_spend.month < min_month
    {
        return Evaluation::ineligible(format!(
            "Voucher {} requires at least {} spent in the last 30 days",
            voucher.code, min_month
        ));
    }
    if let Some(min_year) = voucher.min_buyer_spend_year
        && buyer_spend.year < min_year
    {
        return Evaluation::ineligible(format!(
            "Voucher {} requires at least {} spent in the last year",
            voucher.code, min_year
        ));
    }

    Evaluation {
        eligible: true,
        reason: None,
        discount: compute_discount(voucher, subtotal),
    }
}

/// PERCENT → `min(subtotal * value / 100, max_discount)`;
/// FIXED → `min(value, subtotal)`. Always clamped to the subtotal.
fn compute_discount(voucher: &Voucher, subtotal: Money) -> Money {
    let raw = match voucher.voucher_type {
        VoucherType::Percent => {
            let pct = subtotal * voucher.value / 100;
            match voucher.max_discount {
                Some(cap) => pct.min(cap),
                None => pct,
            }
        }
        VoucherType::Fixed => voucher.value,
    };
    raw.min(subtotal).max(0)
}
