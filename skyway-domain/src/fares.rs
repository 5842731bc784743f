//! Fare arithmetic. Amounts are integer minor units; surcharges are fixed
//! per-booking add-ons, not per-passenger.

pub const PRIORITY_SUPPORT_FEE: i64 = 50;
pub const FAST_TRACK_FEE: i64 = 30;

pub fn booking_total(seat_prices: &[i64], priority_support: bool, fast_track: bool) -> i64 {
    let mut total: i64 = seat_prices.iter().sum();
    if priority_support {
        total += PRIORITY_SUPPORT_FEE;
    }
    if fast_track {
        total += FAST_TRACK_FEE;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_seat_prices_without_flags() {
        assert_eq!(booking_total(&[120, 80], false, false), 200);
    }

    #[test]
    fn applies_each_surcharge_once() {
        assert_eq!(booking_total(&[100], true, false), 150);
        assert_eq!(booking_total(&[100], false, true), 130);
        assert_eq!(booking_total(&[100, 100, 100], true, true), 380);
    }

    #[test]
    fn empty_seat_list_yields_only_fees() {
        assert_eq!(booking_total(&[], true, true), 80);
    }
}
