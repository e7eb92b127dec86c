use crate::domain::models::quote::{Quote, QuoteItem};
use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};

/// Deposit securing a confirmed booking: 25% of the total, rounded up
/// to the next whole currency unit.
pub fn deposit_for(total: i64) -> i64 {
    (total + 3) / 4
}

/// Human-readable quote number: millisecond-timestamp suffix plus a
/// short random token, e.g. `QT-483920-X7KQ`.
pub fn quote_number() -> String {
    let millis = Utc::now().timestamp_millis().to_string();
    let suffix = &millis[millis.len().saturating_sub(6)..];
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(4)
        .map(char::from)
        .collect();
    format!("QT-{}-{}", suffix, token.to_uppercase())
}

/// Pure computation: sums the line items and derives the deposit. Does
/// not touch booking state; a quote is informational until converted
/// into a booking.
pub fn generate_quote(items: &[QuoteItem]) -> Quote {
    let subtotal: i64 = items
        .iter()
        .map(|item| item.unit_price * item.quantity as i64)
        .sum();
    Quote {
        quote_number: quote_number(),
        subtotal,
        deposit: deposit_for(subtotal),
        total: subtotal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(unit_price: i64, quantity: i32) -> QuoteItem {
        QuoteItem {
            id: "item".to_string(),
            name: "Item".to_string(),
            unit_price,
            category: "venue".to_string(),
            quantity,
        }
    }

    #[test]
    fn deposit_is_a_quarter_rounded_up() {
        assert_eq!(deposit_for(1800), 450);
        assert_eq!(deposit_for(1300), 325);
        assert_eq!(deposit_for(2500), 625);
        // Not divisible by four: rounds up to the whole unit.
        assert_eq!(deposit_for(999), 250);
        assert_eq!(deposit_for(1), 1);
        assert_eq!(deposit_for(0), 0);
    }

    #[test]
    fn remaining_complements_deposit() {
        for total in [1800i64, 1300, 2500, 999, 77] {
            let deposit = deposit_for(total);
            assert_eq!(total - deposit + deposit, total);
            assert!(deposit * 4 >= total);
            assert!((deposit - 1) * 4 < total);
        }
    }

    #[test]
    fn quote_sums_quantity_times_unit_price() {
        let quote = generate_quote(&[item(500, 2), item(100, 8)]);
        assert_eq!(quote.subtotal, 1800);
        assert_eq!(quote.total, 1800);
        assert_eq!(quote.deposit, 450);
    }

    #[test]
    fn empty_quote_is_zero() {
        let quote = generate_quote(&[]);
        assert_eq!(quote.subtotal, 0);
        assert_eq!(quote.deposit, 0);
    }

    #[test]
    fn quote_number_has_expected_shape() {
        let number = quote_number();
        assert!(number.starts_with("QT-"));
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 6);
        assert_eq!(parts[2].len(), 4);
    }
}
