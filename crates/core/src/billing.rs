//! Invoice numbering.
//!
//! Invoice numbers are `INV<year><month>-<4-digit-sequence>`, e.g.
//! `INV202608-0007`. The sequence restarts every month; the next number is
//! max(existing sequence under the month prefix) + 1. Reading the maximum
//! and inserting must happen inside one database transaction; the unique
//! index on the number column backstops the race.

use chrono::{Datelike, NaiveDate};

/// Month prefix for invoice numbers, e.g. `INV202608`.
#[must_use]
pub fn invoice_prefix(date: NaiveDate) -> String {
    format!("INV{:04}{:02}", date.year(), date.month())
}

/// Formats a full invoice number from a prefix and sequence.
#[must_use]
pub fn invoice_number(prefix: &str, sequence: u32) -> String {
    format!("{prefix}-{sequence:04}")
}

/// Extracts the sequence from an existing invoice number.
///
/// Returns `None` when the number does not carry a numeric suffix; such
/// rows are skipped when computing the next sequence.
#[must_use]
pub fn invoice_sequence(number: &str) -> Option<u32> {
    number.rsplit('-').next()?.parse().ok()
}

/// Next sequence given the existing numbers under the same prefix.
///
/// The maximum is taken over the parsed suffixes, not the raw strings:
/// once a month reaches five digits, `-10000` must beat `-9999` even
/// though it sorts below it lexicographically.
pub fn next_sequence<'a, I>(existing: I) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    existing
        .into_iter()
        .filter_map(invoice_sequence)
        .max()
        .map_or(1, |seq| seq + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_zero_pads_month() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        assert_eq!(invoice_prefix(d), "INV202603");
    }

    #[test]
    fn number_zero_pads_sequence() {
        assert_eq!(invoice_number("INV202608", 7), "INV202608-0007");
        assert_eq!(invoice_number("INV202608", 1234), "INV202608-1234");
    }

    #[test]
    fn sequence_parses_suffix() {
        assert_eq!(invoice_sequence("INV202608-0007"), Some(7));
        assert_eq!(invoice_sequence("INV202608-9999"), Some(9999));
        assert_eq!(invoice_sequence("INV202608"), None);
        assert_eq!(invoice_sequence("draft"), None);
    }

    #[test]
    fn first_invoice_of_month_is_one() {
        assert_eq!(next_sequence(std::iter::empty()), 1);
    }

    #[test]
    fn serial_invoices_differ_by_one() {
        let first = invoice_number("INV202608", next_sequence(std::iter::empty()));
        let second = invoice_number("INV202608", next_sequence(Some(first.as_str())));
        assert_eq!(first, "INV202608-0001");
        assert_eq!(second, "INV202608-0002");
    }

    #[test]
    fn sequence_past_four_digits_still_increments() {
        assert_eq!(next_sequence(Some("INV202608-9999")), 10000);
        assert_eq!(invoice_number("INV202608", 10000), "INV202608-10000");
    }

    #[test]
    fn numeric_max_survives_five_digit_sequences() {
        // "INV202608-9999" sorts above "-10000" as a string; the max
        // must still be 10000.
        let numbers = ["INV202608-10000", "INV202608-9999"];
        assert_eq!(next_sequence(numbers), 10001);
    }
}
