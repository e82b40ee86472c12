use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ParseEnumError;

/// Defines a closed vocabulary whose wire form is the variant name.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok($name::$variant),)+
                    _ => Err(ParseEnumError::new(stringify!($name), s)),
                }
            }
        }
    };
}

string_enum! {
    /// Evolutionary class of a star.
    pub enum StarType {
        MainSeqStar,
        GiantStar,
        WhiteDwarf,
        NeutronStar,
        BlackHole,
    }
}

string_enum! {
    /// Spectral class of a star, coolest (`M`) to hottest (`O`). `X` marks
    /// stars without a meaningful spectrum.
    pub enum SpectrType {
        M,
        K,
        G,
        F,
        A,
        B,
        O,
        X,
    }
}

string_enum! {
    pub enum PlanetType {
        None,
        Vocano,
        Ocean,
        Desert,
        Ice,
        Gas,
    }
}

string_enum! {
    /// Resource deposit kinds. `None` is the unselected placeholder.
    pub enum VeinType {
        None,
        Iron,
        Copper,
        Silicium,
        Titanium,
        Stone,
        Coal,
        Oil,
        Fireice,
        Diamond,
        Fractal,
        Crysrub,
        Grat,
        Bamboo,
        Mag,
    }
}

string_enum! {
    /// Discriminator of every rule node. `And`/`Or` tag interior nodes of a
    /// canonical [`Rule`](crate::Rule); `None` is the unset sentinel.
    pub enum RuleType {
        None,
        And,
        Or,
        Luminosity,
        DysonRadius,
        AverageVeinAmount,
        AverageVeinPatch,
        Spectr,
        TidalLockCount,
        OceanType,
        StarType,
        GasCount,
        SatelliteCount,
        Birth,
    }
}

string_enum! {
    pub enum ConditionType {
        Eq,
        Neq,
        Lt,
        Lte,
        Gt,
        Gte,
        Between,
        NotBetween,
    }
}

string_enum! {
    /// Discriminator of [`CompositeRule`](crate::CompositeRule) nodes.
    pub enum CompositeRuleType {
        Composite,
        CompositeOr,
        CompositeAnd,
    }
}

/// Gas harvested from gas giants. Serialized as the in-game item id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum GasType {
    Fireice = 1011,
    Hydrogen = 1120,
    Deuterium = 1121,
}

impl GasType {
    pub const ALL: &'static [GasType] = &[GasType::Fireice, GasType::Hydrogen, GasType::Deuterium];

    #[must_use]
    pub fn item_id(self) -> u32 {
        self as u32
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GasType::Fireice => "Fireice",
            GasType::Hydrogen => "Hydrogen",
            GasType::Deuterium => "Deuterium",
        }
    }
}

impl From<GasType> for u32 {
    fn from(gas: GasType) -> u32 {
        gas.item_id()
    }
}

impl TryFrom<u32> for GasType {
    type Error = ParseEnumError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        match id {
            1011 => Ok(GasType::Fireice),
            1120 => Ok(GasType::Hydrogen),
            1121 => Ok(GasType::Deuterium),
            other => Err(ParseEnumError::new("GasType", &other.to_string())),
        }
    }
}

impl fmt::Display for GasType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GasType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fireice" => Ok(GasType::Fireice),
            "Hydrogen" => Ok(GasType::Hydrogen),
            "Deuterium" => Ok(GasType::Deuterium),
            _ => s
                .parse::<u32>()
                .map_err(|_| ParseEnumError::new("GasType", s))
                .and_then(GasType::try_from),
        }
    }
}

/// Display order of veins in result tables.
pub const VEIN_ORDER: [VeinType; 14] = [
    VeinType::Iron,
    VeinType::Copper,
    VeinType::Silicium,
    VeinType::Titanium,
    VeinType::Stone,
    VeinType::Coal,
    VeinType::Oil,
    VeinType::Fireice,
    VeinType::Diamond,
    VeinType::Fractal,
    VeinType::Crysrub,
    VeinType::Grat,
    VeinType::Bamboo,
    VeinType::Mag,
];

pub const GAS_ORDER: [GasType; 3] = [GasType::Fireice, GasType::Hydrogen, GasType::Deuterium];

/// Observable class of a star, combining its type with its spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StarClass {
    MainSequence(SpectrType),
    RedGiant,
    YellowGiant,
    WhiteGiant,
    BlueGiant,
    WhiteDwarf,
    NeutronStar,
    BlackHole,
}

impl StarClass {
    #[must_use]
    pub fn classify(star_type: StarType, spectr: SpectrType) -> StarClass {
        match star_type {
            StarType::GiantStar => match spectr {
                SpectrType::M | SpectrType::K => StarClass::RedGiant,
                SpectrType::G | SpectrType::F => StarClass::YellowGiant,
                SpectrType::A => StarClass::WhiteGiant,
                _ => StarClass::BlueGiant,
            },
            StarType::WhiteDwarf => StarClass::WhiteDwarf,
            StarType::NeutronStar => StarClass::NeutronStar,
            StarType::BlackHole => StarClass::BlackHole,
            StarType::MainSeqStar => StarClass::MainSequence(spectr),
        }
    }
}
