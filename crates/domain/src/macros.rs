//! Macro for implementing Display and FromStr for named enums
//!
//! Closed enums whose variants have a canonical wire name (for example the
//! measurement request types) get both conversions from a single mapping.
//! Parsing is case-insensitive; display always uses the canonical spelling.
//!
//! # Example
//!
//! ```rust
//! use eagleview_domain::impl_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum FileFormat {
//!     Pdf,
//!     Json,
//! }
//!
//! impl_name_conversions!(FileFormat {
//!     Pdf => "PDF",
//!     Json => "Json",
//! });
//!
//! assert_eq!(FileFormat::Pdf.to_string(), "PDF");
//! assert_eq!("json".parse::<FileFormat>().unwrap(), FileFormat::Json);
//! ```

/// Implements Display and FromStr traits for named enums
///
/// This macro generates:
/// - Display trait: writes the canonical name of the variant
/// - FromStr trait: parses case-insensitive names back to the variant
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their canonical names
#[macro_export]
macro_rules! impl_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestKind {
        RoofOnly,
        FullHouse,
    }

    impl_name_conversions!(TestKind {
        RoofOnly => "RoofOnly",
        FullHouse => "FullHouse",
    });

    #[test]
    fn test_display_uses_canonical_name() {
        assert_eq!(TestKind::RoofOnly.to_string(), "RoofOnly");
        assert_eq!(TestKind::FullHouse.to_string(), "FullHouse");
    }

    #[test]
    fn test_fromstr_mixed_case() {
        assert_eq!(TestKind::from_str("roofonly").unwrap(), TestKind::RoofOnly);
        assert_eq!(TestKind::from_str("FULLHOUSE").unwrap(), TestKind::FullHouse);
        assert_eq!(TestKind::from_str("FullHouse").unwrap(), TestKind::FullHouse);
    }

    #[test]
    fn test_fromstr_invalid() {
        let result = TestKind::from_str("garage");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid TestKind: garage"));
    }

    #[test]
    fn test_roundtrip() {
        for kind in [TestKind::RoofOnly, TestKind::FullHouse] {
            let parsed = TestKind::from_str(&kind.to_string()).unwrap();
            assert_eq!(kind, parsed);
        }
    }
}
