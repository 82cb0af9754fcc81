//! Drink classification enums.
//!
//! Each enum carries a raw string value that is shown to users and used on the
//! wire (deep-link records). Raw values are stable; renaming one breaks links
//! that are already shared.

use serde::{Deserialize, Serialize};

macro_rules! raw_value_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident {
            $($variant:ident => $raw:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $raw)]
                $variant,
            )+
        }

        impl $name {
            /// All cases in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $raw,)+
                }
            }

            /// Look up a case by its raw value (exact match).
            pub fn from_raw(raw: &str) -> Option<Self> {
                match raw {
                    $($raw => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

raw_value_enum! {
    /// How much skill a recipe needs.
    Difficulty, default = Easy {
        Easy => "Beginner",
        Medium => "Medium",
        Hard => "Hard",
        Expert => "Expert Barista",
    }
}

raw_value_enum! {
    Category, default = Coffee {
        Coffee => "Coffee",
        Tea => "Tea",
        Smoothie => "Smoothie",
        Juice => "Juice",
        Soda => "Soda",
        Water => "Infused Water",
        Other => "Other",
    }
}

raw_value_enum! {
    Temperature, default = Hot {
        Hot => "Hot",
        Cold => "Cold",
        Both => "Hot or Cold",
    }
}

raw_value_enum! {
    CaffeineLevel, default = Caffeinated {
        Decaf => "Decaf",
        Caffeinated => "Caffeinated",
        Optional => "Optional Caffeine",
    }
}

raw_value_enum! {
    TimeOfDay, default = Anytime {
        Morning => "Morning",
        Afternoon => "Afternoon",
        Night => "Night",
        Anytime => "Anytime",
    }
}

raw_value_enum! {
    Season, default = Any {
        Spring => "Spring",
        Summer => "Summer",
        Fall => "Fall",
        Winter => "Winter",
        Any => "Any Season",
    }
}
