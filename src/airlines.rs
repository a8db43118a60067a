//! Carrier-code lookup for flight numbers

/// Name returned for carrier codes missing from the table
pub const UNKNOWN_AIRLINE: &str = "Unknown Airline";

const CARRIERS: &[(&str, &str)] = &[
    ("AA", "American Airlines"),
    ("AS", "Alaska Airlines"),
    ("B6", "JetBlue Airways"),
    ("DL", "Delta Air Lines"),
    ("F9", "Frontier Airlines"),
    ("HA", "Hawaiian Airlines"),
    ("NK", "Spirit Airlines"),
    ("UA", "United Airlines"),
    ("WN", "Southwest Airlines"),
];

/// Resolve the airline operating `flight_number` from its first two
/// characters, case-insensitively.
pub fn airline_name(flight_number: &str) -> &'static str {
    let code: String = flight_number
        .chars()
        .take(2)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    CARRIERS
        .iter()
        .find(|(carrier, _)| *carrier == code)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_AIRLINE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_carriers() {
        assert_eq!(airline_name("AA1234"), "American Airlines");
        assert_eq!(airline_name("dl5678"), "Delta Air Lines");
        assert_eq!(airline_name("B61234"), "JetBlue Airways");
    }

    #[test]
    fn test_unknown_carriers() {
        assert_eq!(airline_name("ZZ100"), UNKNOWN_AIRLINE);
        assert_eq!(airline_name("A"), UNKNOWN_AIRLINE);
        assert_eq!(airline_name(""), UNKNOWN_AIRLINE);
    }
}
