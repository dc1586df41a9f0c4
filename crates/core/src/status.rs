//! Webcam online status.
//!
//! Each variant carries the integer code stored in `webcams.online`, a short
//! machine name used in API payloads, and the human-readable label shown in
//! the list UI and accepted by the `online` filter.

use serde::{Serialize, Serializer};

/// Status code type matching SMALLINT in the database.
pub type StatusCode = i16;

macro_rules! define_choices {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = ($code:expr, $key:expr, $label:expr) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $code ),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the database code.
            pub fn code(self) -> StatusCode {
                self as StatusCode
            }

            /// Return the machine name (`"off"`, `"on"`, ...).
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $key ),+
                }
            }

            /// Return the display label.
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            /// Look up a variant by its database code.
            pub fn from_code(code: StatusCode) -> Option<Self> {
                match code {
                    $( c if c == $code => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// Look up a variant by its display label.
            pub fn from_label(label: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|s| s.label() == label)
            }

            /// Look up a variant by its machine name.
            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|s| s.name() == name)
            }
        }

        impl From<$name> for StatusCode {
            fn from(value: $name) -> Self {
                value as StatusCode
            }
        }

        impl TryFrom<StatusCode> for $name {
            type Error = StatusCode;

            fn try_from(code: StatusCode) -> Result<Self, StatusCode> {
                $name::from_code(code).ok_or(code)
            }
        }
    };
}

define_choices! {
    /// Reachability of a webcam as last observed by the status poller.
    WebcamStatus {
        /// No hardware configured or never seen.
        Off = (0, "off", "не подключена"),
        /// The camera answered the last probe.
        On = (10, "on", "работает"),
        /// The last probe failed at transport level.
        Error = (20, "error", "нет сигнала"),
    }
}

impl Default for WebcamStatus {
    fn default() -> Self {
        WebcamStatus::Off
    }
}

impl Serialize for WebcamStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Status labels containing `query`, sorted.
///
/// Backs autocomplete for the `online` field, which has no distinct column
/// values worth querying.
pub fn labels_matching(query: &str) -> Vec<&'static str> {
    let mut labels: Vec<&'static str> = WebcamStatus::ALL
        .iter()
        .map(|s| s.label())
        .filter(|label| label.contains(query))
        .collect();
    labels.sort_unstable();
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_stored_values() {
        assert_eq!(WebcamStatus::Off.code(), 0);
        assert_eq!(WebcamStatus::On.code(), 10);
        assert_eq!(WebcamStatus::Error.code(), 20);
    }

    #[test]
    fn label_round_trips_to_code() {
        let status = WebcamStatus::from_label("работает").unwrap();
        assert_eq!(status.code(), 10);
        assert_eq!(status.name(), "on");
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(WebcamStatus::from_code(5), None);
        assert_eq!(WebcamStatus::try_from(-1), Err(-1));
    }

    #[test]
    fn every_code_converts_back() {
        for status in WebcamStatus::ALL {
            assert_eq!(WebcamStatus::try_from(status.code()), Ok(*status));
        }
        assert_eq!(StatusCode::from(WebcamStatus::Error), 20);
    }

    #[test]
    fn serializes_as_machine_name() {
        let json = serde_json::to_string(&WebcamStatus::Error).unwrap();
        assert_eq!(json, "\"error\"");
    }

    #[test]
    fn label_search_is_sorted_and_substring_based() {
        assert_eq!(labels_matching("н"), vec!["не подключена", "нет сигнала"]);
        assert_eq!(labels_matching(""), vec!["не подключена", "нет сигнала", "работает"]);
        assert!(labels_matching("xyz").is_empty());
    }
}
