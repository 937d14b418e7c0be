//! Macro for implementing Display and FromStr for status enums
//!
//! This macro eliminates boilerplate for status enum conversions by providing
//! a single implementation for both Display and FromStr traits. It handles
//! case-insensitive parsing and consistent string representation.
//!
//! # Example
//!
//! ```rust
//! use cadence_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Attendance {
//!     Accepted,
//!     Declined,
//!     NeedsAction,
//! }
//!
//! impl_domain_status_conversions!(Attendance {
//!     Accepted => "accepted",
//!     Declined => "declined",
//!     NeedsAction => "needs-action",
//! });
//!
//! assert_eq!(Attendance::NeedsAction.to_string(), "needs-action");
//! assert_eq!("ACCEPTED".parse::<Attendance>(), Ok(Attendance::Accepted));
//! ```

/// Implements Display and FromStr traits for status enums
///
/// This macro generates:
/// - Display trait: writes the variant's wire tag
/// - FromStr trait: parses case-insensitive tags, accepting `_` for `-`
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their string
///   representations
///
/// # Features
///
/// - Case-insensitive parsing (e.g., "EARLIEST-AVAILABLE" and
///   "earliest_available" both work)
/// - Descriptive error messages with enum name
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
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
                match s.trim().to_lowercase().replace('_', "-").as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
