//! Mortgage estimate — principal and interest only.

/// Loan terms offered by the calculator, in years.
pub const LOAN_TERMS: [u32; 3] = [15, 20, 30];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MortgageInputs {
    pub price: u64,
    pub down_payment: u64,
    /// Annual rate in percent, e.g. `6.5`.
    pub annual_rate_pct: f64,
    pub term_years: u32,
}

impl Default for MortgageInputs {
    fn default() -> Self {
        Self { price: 500_000, down_payment: 100_000, annual_rate_pct: 6.5, term_years: 30 }
    }
}

impl MortgageInputs {
    /// Change the price, pulling the down payment down if it now exceeds it.
    pub fn set_price(&mut self, price: u64) {
        self.price = price;
        self.down_payment = self.down_payment.min(price);
    }

    /// Accept a down payment only when it does not exceed the price.
    /// Returns whether the value was taken.
    pub fn set_down_payment(&mut self, down_payment: u64) -> bool {
        if down_payment > self.price {
            return false;
        }
        self.down_payment = down_payment;
        true
    }

    /// Down payment as a percentage of price; 0 for a zero price.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn down_payment_pct(&self) -> f64 {
        if self.price == 0 {
            return 0.0;
        }
        self.down_payment as f64 / self.price as f64 * 100.0
    }

    #[must_use]
    pub fn monthly_payment(&self) -> f64 {
        monthly_payment(self.price, self.down_payment, self.annual_rate_pct, self.term_years)
    }
}

/// Standard amortized monthly payment.
///
/// A non-positive principal or a zero-length term yields 0; a non-positive
/// rate spreads the principal evenly over the term.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn monthly_payment(price: u64, down_payment: u64, annual_rate_pct: f64, term_years: u32) -> f64 {
    let principal = price.saturating_sub(down_payment.min(price));
    let payments = term_years.saturating_mul(12);
    if principal == 0 || payments == 0 {
        return 0.0;
    }
    let principal = principal as f64;
    let n = f64::from(payments);

    let monthly_rate = annual_rate_pct / 100.0 / 12.0;
    if monthly_rate <= 0.0 || !monthly_rate.is_finite() {
        return principal / n;
    }

    let growth = (1.0 + monthly_rate).powf(n);
    let denominator = growth - 1.0;
    if denominator <= 0.0 {
        return 0.0;
    }
    principal * (monthly_rate * growth / denominator)
}

#[cfg(test)]
#[path = "mortgage_test.rs"]
mod tests;
