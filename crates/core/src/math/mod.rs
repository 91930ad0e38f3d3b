/// Spot exchange rate of a constant product pool (units of out per unit of in)
pub fn spot_rate(reserve_in: i128, reserve_out: i128) -> f64 {
    if reserve_in <= 0 || reserve_out <= 0 {
        return 0.0;
    }

    reserve_out as f64 / reserve_in as f64
}

/// Relative shortfall of an executed rate against the spot rate.
///
/// Fees and pool depth both show up here; 0.0 means the trade filled at spot.
pub fn price_impact(spot_rate: f64, effective_rate: f64) -> f64 {
    if spot_rate <= 0.0 || !effective_rate.is_finite() {
        return 0.0;
    }

    ((spot_rate - effective_rate) / spot_rate).max(0.0)
}
