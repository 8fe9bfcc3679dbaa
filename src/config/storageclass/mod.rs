use crate::errors::HealStatusError;

// Reduced redundancy storage class
pub const RRS: &str = "REDUCED_REDUNDANCY";
// Standard storage class
pub const STANDARD: &str = "STANDARD";

pub const CLASS_STANDARD: &str = "standard";
pub const CLASS_RRS: &str = "rrs";

// Supported storage class scheme is EC
const SCHEME_PREFIX: &str = "EC";

/// Maps a user supplied storage class name onto its canonical form.
/// Matching is case-insensitive and accepts the short config aliases.
pub fn canonical_name(sc: &str) -> Result<&'static str, HealStatusError> {
    let sc = sc.trim();
    if sc.eq_ignore_ascii_case(STANDARD) || sc.eq_ignore_ascii_case(CLASS_STANDARD) {
        Ok(STANDARD)
    } else if sc.eq_ignore_ascii_case(RRS) || sc.eq_ignore_ascii_case(CLASS_RRS) {
        Ok(RRS)
    } else {
        Err(HealStatusError::UnknownStorageClass(sc.to_owned()))
    }
}

/// Canonical form of a storage class name. Names other than the two known
/// classes are upper-cased so that they still match a parity map entry.
pub fn normalize_name(sc: &str) -> String {
    match canonical_name(sc) {
        Ok(name) => name.to_owned(),
        Err(_) => sc.trim().to_ascii_uppercase(),
    }
}

/// Parses a parity count given either as a plain integer or as `EC:<n>`.
pub fn parse_parity(value: &str) -> Result<usize, HealStatusError> {
    let value = value.trim();
    let invalid = || HealStatusError::InvalidParity(value.to_owned());
    let count = match value.split_once(':') {
        Some((scheme, count)) => {
            if scheme != SCHEME_PREFIX {
                return Err(invalid());
            }
            count
        }
        None => value,
    };
    count.parse::<usize>().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name() {
        let cases = [
            ("STANDARD", Some(STANDARD)),
            ("standard", Some(STANDARD)),
            (" Standard ", Some(STANDARD)),
            ("REDUCED_REDUNDANCY", Some(RRS)),
            ("reduced_redundancy", Some(RRS)),
            ("rrs", Some(RRS)),
            ("RRS", Some(RRS)),
            ("GLACIER", None),
            ("", None),
        ];
        for (sc, expected) in cases {
            assert_eq!(canonical_name(sc).ok(), expected);
        }
    }

    #[test]
    fn test_normalize_name() {
        let cases = [
            ("rrs", RRS),
            ("Standard", STANDARD),
            (" glacier ", "GLACIER"),
            ("custom_Class", "CUSTOM_CLASS"),
        ];
        for (sc, expected) in cases {
            assert_eq!(normalize_name(sc), expected);
        }
    }

    #[test]
    fn test_parse_parity() {
        let cases = [
            ("EC:4", Some(4)),
            ("EC:0", Some(0)),
            ("2", Some(2)),
            (" EC:2 ", Some(2)),
            ("ec:2", None),
            ("EC:", None),
            ("EC:-1", None),
            ("RS:2", None),
            ("two", None),
        ];
        for (value, expected) in cases {
            assert_eq!(parse_parity(value).ok(), expected);
        }
    }
}
