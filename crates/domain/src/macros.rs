//! Macro for string conversions on identifier-like enums
//!
//! Platforms and campaign statuses are exchanged as lowercase strings with
//! the onboarding UI and in configuration files. The macro generates one
//! canonical mapping for `as_str`, `Display` and `FromStr`, so the three can
//! never drift apart.
//!
//! # Example
//!
//! ```rust
//! use mailbridge_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum SendWindow {
//!     Morning,
//!     Evening,
//! }
//!
//! impl_domain_status_conversions!(SendWindow {
//!     Morning => "morning",
//!     Evening => "evening",
//! });
//!
//! assert_eq!(SendWindow::Morning.as_str(), "morning");
//! assert_eq!(" EVENING ".parse::<SendWindow>(), Ok(SendWindow::Evening));
//! ```

/// Implements `as_str`, `Display` and `FromStr` for identifier enums
///
/// - `as_str` returns the canonical lowercase identifier
/// - `FromStr` trims surrounding whitespace and ignores case
/// - Parse errors name the enum and echo the rejected input
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical lowercase identifier.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
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
    enum Channel {
        Email,
        Sms,
        Push,
    }

    impl_domain_status_conversions!(Channel {
        Email => "email",
        Sms => "sms",
        Push => "push",
    });

    #[test]
    fn display_matches_as_str() {
        for channel in [Channel::Email, Channel::Sms, Channel::Push] {
            assert_eq!(channel.to_string(), channel.as_str());
        }
    }

    #[test]
    fn parse_ignores_case_and_whitespace() {
        assert_eq!(Channel::from_str("EMAIL").unwrap(), Channel::Email);
        assert_eq!(Channel::from_str("  Sms ").unwrap(), Channel::Sms);
    }

    mod with_result_alias {
        #[allow(unused_imports)]
        use crate::errors::Result;

        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum Tier {
            Free,
            Paid,
        }

        impl_domain_status_conversions!(Tier {
            Free => "free",
            Paid => "paid",
        });

        #[test]
        fn expands_beside_single_parameter_result_alias() {
            assert_eq!("PAID".parse::<Tier>(), Ok(Tier::Paid));
            assert_eq!(Tier::Free.to_string(), "free");
        }
    }

    #[test]
    fn parse_rejects_unknown_values() {
        let err = Channel::from_str("fax").unwrap_err();
        assert!(err.contains("Invalid Channel: fax"));
        assert!(Channel::from_str("").is_err());
    }
}
