//! Macro for implementing Display and FromStr for status enums
//!
//! Fleet entities carry small status enums (trip status, shift status,
//! driver status) that need a stable lowercase string form for log fields
//! and query parameters, plus case-insensitive parsing. This macro provides
//! both trait impls from a single mapping.
//!
//! # Example
//!
//! ```rust
//! use fleetline_domain::impl_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ShiftStatus {
//!     Planned,
//!     InProgress,
//!     Completed,
//!     Missed,
//! }
//!
//! impl_status_conversions!(ShiftStatus {
//!     Planned => "planned",
//!     InProgress => "in_progress",
//!     Completed => "completed",
//!     Missed => "missed",
//! });
//! ```

/// Implements Display and FromStr traits for status enums
///
/// Display produces the mapped lowercase string; FromStr parses it back
/// case-insensitively and reports the enum name on failure.
#[macro_export]
macro_rules! impl_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum SampleStatus {
        Scheduled,
        EnRoute,
        Completed,
    }

    impl_status_conversions!(SampleStatus {
        Scheduled => "scheduled",
        EnRoute => "en_route",
        Completed => "completed",
    });

    #[test]
    fn display_uses_mapped_strings() {
        assert_eq!(SampleStatus::Scheduled.to_string(), "scheduled");
        assert_eq!(SampleStatus::EnRoute.to_string(), "en_route");
        assert_eq!(SampleStatus::Completed.to_string(), "completed");
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(SampleStatus::from_str("SCHEDULED").unwrap(), SampleStatus::Scheduled);
        assert_eq!(SampleStatus::from_str("En_Route").unwrap(), SampleStatus::EnRoute);
        assert_eq!(SampleStatus::from_str("completed").unwrap(), SampleStatus::Completed);
    }

    #[test]
    fn parse_rejects_unknown_with_enum_name() {
        let err = SampleStatus::from_str("parked").unwrap_err();
        assert!(err.contains("Invalid SampleStatus: parked"));
    }

    #[test]
    fn roundtrip_through_display() {
        for status in [SampleStatus::Scheduled, SampleStatus::EnRoute, SampleStatus::Completed] {
            assert_eq!(SampleStatus::from_str(&status.to_string()).unwrap(), status);
        }
    }
}
