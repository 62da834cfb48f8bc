//! Client classification labels attached to every recorded visit.
//!
//! The labels are stable strings: they are what gets persisted and what the
//! dashboard receives, so renaming a variant label is a schema change.

use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Returns the persisted label of this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = StorageError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(StorageError::InvalidData(format!(
                        "unknown {} label '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

labelled_enum!(
    /// Browser family of the visiting client.
    Browser {
        Chrome => "Chrome",
        Firefox => "Firefox",
        Safari => "Safari",
        Other => "Other",
    }
);

labelled_enum!(
    /// Operating system of the visiting client.
    Os {
        Windows => "Windows",
        MacOs => "MacOS",
        Linux => "Linux",
        Android => "Android",
        Ios => "iOS",
        Other => "Other",
    }
);

labelled_enum!(
    /// Coarse device class of the visiting client.
    Device {
        Mobile => "Mobile",
        Desktop => "Desktop",
    }
);

/// The classification derived from a raw client agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientInfo {
    pub browser: Browser,
    pub os: Os,
    pub device: Device,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            browser: Browser::Other,
            os: Os::Other,
            device: Device::Desktop,
        }
    }
}
