//! Macro for implementing Display and FromStr for wire state enums
//!
//! The API reports lifecycle states as upper-case strings (`IN_PROGRESS`,
//! `FINISHED`, ...). This macro keeps the variant ⇄ string mapping in one
//! place.
//!
//! # Example
//!
//! ```rust
//! use airvantage_domain::impl_wire_state_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum LifeCycle {
//!     Ready,
//!     Deployed,
//! }
//!
//! impl_wire_state_conversions!(LifeCycle {
//!     Ready => "READY",
//!     Deployed => "DEPLOYED",
//! });
//!
//! assert_eq!(LifeCycle::Ready.to_string(), "READY");
//! assert_eq!("deployed".parse::<LifeCycle>().unwrap(), LifeCycle::Deployed);
//! ```

/// Implements Display, FromStr and `as_str` for wire state enums
///
/// - Display / `as_str`: the exact wire string
/// - FromStr: case-insensitive match against the wire strings
#[macro_export]
macro_rules! impl_wire_state_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire representation of this state.
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
