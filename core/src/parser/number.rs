//! Decimal quantities with binary unit suffixes

/// Binary multiplier selected by a suffix character
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Unit {
    Byte,
    Kilo,
    Mega,
    Giga,
    Tera,
    Peta,
    Exa,
}

impl Unit {
    /// Suffix letter, either case
    pub fn from_suffix(c: char) -> Option<Self> {
        match c {
            'K' | 'k' => Some(Unit::Kilo),
            'M' | 'm' => Some(Unit::Mega),
            'G' | 'g' => Some(Unit::Giga),
            'T' | 't' => Some(Unit::Tera),
            'P' | 'p' => Some(Unit::Peta),
            'E' | 'e' => Some(Unit::Exa),
            _ => None,
        }
    }

    pub const fn multiplier(self) -> u64 {
        match self {
            Unit::Byte => 1,
            Unit::Kilo => 1 << 10,
            Unit::Mega => 1 << 20,
            Unit::Giga => 1 << 30,
            Unit::Tera => 1 << 40,
            Unit::Peta => 1 << 50,
            Unit::Exa => 1 << 60,
        }
    }
}

/// Scale `magnitude` by `unit`, saturating at `u64::MAX`
pub fn to_bytes(magnitude: u64, unit: Unit) -> u64 {
    magnitude.saturating_mul(unit.multiplier())
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QuantityError {
    /// Field does not start with a digit
    NoDigits,
    /// Character after the digits is neither a suffix nor a terminator
    Suffix(char),
}

/// Parse `digits [suffix]` at the start of `field` into bytes.
///
/// After the digits either the field ends, one of `terminators` follows, or
/// a unit suffix follows. Whatever comes after a suffix is not examined.
pub fn parse_quantity(field: &str, terminators: &[char]) -> Result<u64, QuantityError> {
    let digits = field.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(QuantityError::NoDigits);
    }

    let magnitude = field.as_bytes()[..digits].iter().fold(0u64, |acc, d| {
        acc.saturating_mul(10).saturating_add(u64::from(d - b'0'))
    });

    let unit = match field[digits..].chars().next() {
        None => Unit::Byte,
        Some(c) if terminators.contains(&c) => Unit::Byte,
        Some(c) => Unit::from_suffix(c).ok_or(QuantityError::Suffix(c))?,
    };

    Ok(to_bytes(magnitude, unit))
}
