use chrono::Weekday;
use num_traits::FromPrimitive;
use phf::phf_map;
use serde_with::DeserializeFromStr;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// The thirteen months of the Ethiopian year. Meskerem begins the year and
/// Pagume is the short epagomenal month closing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EthiopianMonth {
    Meskerem = 1,
    Tikimt,
    Hidar,
    Tahsas,
    Tir,
    Yekatit,
    Megabit,
    Miyazya,
    Ginbot,
    Sene,
    Hamle,
    Nehase,
    Pagume,
}

/// Script used for month and weekday labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr)]
pub enum NameStyle {
    Amharic,
    Latin,
}

impl Default for NameStyle {
    fn default() -> Self {
        NameStyle::Amharic
    }
}

impl FromStr for NameStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "amharic" | "am" | "geez" => Ok(NameStyle::Amharic),
            "latin" | "en" | "transliterated" => Ok(NameStyle::Latin),
            other => Err(Error::new(
                ErrorKind::InvalidArgument,
                &format!("unknown name style '{}'", other),
            )),
        }
    }
}

const AMHARIC_MONTH_NAMES: [&str; 13] = [
    "መስከረም",
    "ጥቅምት",
    "ኅዳር",
    "ታህሳስ",
    "ጥር",
    "የካቲት",
    "መጋቢት",
    "ሚያዝያ",
    "ግንቦት",
    "ሰኔ",
    "ሐምሌ",
    "ነሐሴ",
    "ጳጉሜን",
];

const LATIN_MONTH_NAMES: [&str; 13] = [
    "Meskerem", "Tikimt", "Hidar", "Tahsas", "Tir", "Yekatit", "Megabit", "Miyazya", "Ginbot",
    "Sene", "Hamle", "Nehase", "Pagume",
];

// Sunday first, matching the grid layout.
const AMHARIC_WEEKDAY_NAMES: [&str; 7] = ["እሑድ", "ሰኞ", "ማክሰኞ", "ረቡዕ", "ሐሙስ", "ዓርብ", "ቅዳሜ"];
const LATIN_WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

// Lower-cased Latin spellings plus the Amharic names.
static MONTH_LOOKUP: phf::Map<&'static str, u8> = phf_map! {
    "meskerem" => 1,
    "meskarem" => 1,
    "tikimt" => 2,
    "tikemt" => 2,
    "tekemt" => 2,
    "hidar" => 3,
    "hedar" => 3,
    "tahsas" => 4,
    "tahesas" => 4,
    "tir" => 5,
    "ter" => 5,
    "yekatit" => 6,
    "megabit" => 7,
    "miyazya" => 8,
    "miazia" => 8,
    "ginbot" => 9,
    "genbot" => 9,
    "sene" => 10,
    "hamle" => 11,
    "nehase" => 12,
    "nehasse" => 12,
    "pagume" => 13,
    "pagumen" => 13,
    "መስከረም" => 1,
    "ጥቅምት" => 2,
    "ኅዳር" => 3,
    "ታህሳስ" => 4,
    "ጥር" => 5,
    "የካቲት" => 6,
    "መጋቢት" => 7,
    "ሚያዝያ" => 8,
    "ግንቦት" => 9,
    "ሰኔ" => 10,
    "ሐምሌ" => 11,
    "ነሐሴ" => 12,
    "ጳጉሜን" => 13,
};

impl EthiopianMonth {
    pub const COUNT: u8 = 13;

    pub fn number_from_month(&self) -> u8 {
        *self as u8
    }

    pub fn succ(&self) -> Self {
        match self {
            EthiopianMonth::Pagume => EthiopianMonth::Meskerem,
            m => Self::from_u8(m.number_from_month() + 1).unwrap_or(EthiopianMonth::Meskerem),
        }
    }

    pub fn pred(&self) -> Self {
        match self {
            EthiopianMonth::Meskerem => EthiopianMonth::Pagume,
            m => Self::from_u8(m.number_from_month() - 1).unwrap_or(EthiopianMonth::Pagume),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name_in(NameStyle::Latin)
    }

    pub fn name_in(&self, style: NameStyle) -> &'static str {
        let idx = (self.number_from_month() - 1) as usize;
        match style {
            NameStyle::Amharic => AMHARIC_MONTH_NAMES[idx],
            NameStyle::Latin => LATIN_MONTH_NAMES[idx],
        }
    }
}

impl FromPrimitive for EthiopianMonth {
    fn from_i64(n: i64) -> Option<Self> {
        if n < 0 {
            None
        } else {
            Self::from_u64(n as u64)
        }
    }

    fn from_u64(n: u64) -> Option<Self> {
        use EthiopianMonth::*;
        match n {
            1 => Some(Meskerem),
            2 => Some(Tikimt),
            3 => Some(Hidar),
            4 => Some(Tahsas),
            5 => Some(Tir),
            6 => Some(Yekatit),
            7 => Some(Megabit),
            8 => Some(Miyazya),
            9 => Some(Ginbot),
            10 => Some(Sene),
            11 => Some(Hamle),
            12 => Some(Nehase),
            13 => Some(Pagume),
            _ => None,
        }
    }
}

impl FromStr for EthiopianMonth {
    type Err = Error;

    /// Accepts a month number (`1`..=`13`), a Latin transliteration in any
    /// case, or the Amharic name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = if let Ok(n) = trimmed.parse::<u8>() {
            Some(n)
        } else {
            MONTH_LOOKUP
                .get(trimmed)
                .or_else(|| MONTH_LOOKUP.get(trimmed.to_lowercase().as_str()))
                .copied()
        };

        number.and_then(Self::from_u8).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidArgument,
                &format!("'{}' is not an Ethiopian month", trimmed),
            )
        })
    }
}

impl fmt::Display for EthiopianMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Weekday label for a Sunday-first grid column.
pub fn weekday_name(weekday: Weekday, style: NameStyle) -> &'static str {
    let idx = weekday.num_days_from_sunday() as usize;
    match style {
        NameStyle::Amharic => AMHARIC_WEEKDAY_NAMES[idx],
        NameStyle::Latin => LATIN_WEEKDAY_NAMES[idx],
    }
}

/// The seven column labels, Sunday first.
pub fn weekday_header(style: NameStyle) -> [&'static str; 7] {
    match style {
        NameStyle::Amharic => AMHARIC_WEEKDAY_NAMES,
        NameStyle::Latin => LATIN_WEEKDAY_NAMES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn succ_and_pred_wrap_around() {
        assert_eq!(EthiopianMonth::Pagume.succ(), EthiopianMonth::Meskerem);
        assert_eq!(EthiopianMonth::Meskerem.pred(), EthiopianMonth::Pagume);
        assert_eq!(EthiopianMonth::Hidar.succ(), EthiopianMonth::Tahsas);
        assert_eq!(EthiopianMonth::Hidar.pred(), EthiopianMonth::Tikimt);
    }

    #[test]
    fn from_primitive_covers_all_months() {
        for n in 1..=EthiopianMonth::COUNT as u32 {
            let month = EthiopianMonth::from_u32(n).expect("month in range");
            assert_eq!(month.number_from_month() as u32, n);
        }
        assert_eq!(EthiopianMonth::from_u32(0), None);
        assert_eq!(EthiopianMonth::from_u32(14), None);
        assert_eq!(EthiopianMonth::from_i32(-1), None);
    }

    #[test]
    fn names() {
        assert_eq!(EthiopianMonth::Meskerem.name_in(NameStyle::Amharic), "መስከረም");
        assert_eq!(EthiopianMonth::Pagume.name_in(NameStyle::Amharic), "ጳጉሜን");
        assert_eq!(EthiopianMonth::Tir.name(), "Tir");
        assert_eq!(EthiopianMonth::Nehase.to_string(), "Nehase");
    }

    #[test]
    fn parse_month() {
        assert_eq!("1".parse::<EthiopianMonth>().unwrap(), EthiopianMonth::Meskerem);
        assert_eq!("13".parse::<EthiopianMonth>().unwrap(), EthiopianMonth::Pagume);
        assert_eq!("ginbot".parse::<EthiopianMonth>().unwrap(), EthiopianMonth::Ginbot);
        assert_eq!("Genbot".parse::<EthiopianMonth>().unwrap(), EthiopianMonth::Ginbot);
        assert_eq!("ሰኔ".parse::<EthiopianMonth>().unwrap(), EthiopianMonth::Sene);
        assert!("0".parse::<EthiopianMonth>().is_err());
        assert!("14".parse::<EthiopianMonth>().is_err());
        assert!("January".parse::<EthiopianMonth>().is_err());
    }

    #[test]
    fn weekday_labels_start_on_sunday() {
        assert_eq!(weekday_header(NameStyle::Latin)[0], "Sun");
        assert_eq!(weekday_header(NameStyle::Amharic)[0], "እሑድ");
        assert_eq!(weekday_name(Weekday::Wed, NameStyle::Latin), "Wed");
        assert_eq!(weekday_name(Weekday::Sat, NameStyle::Amharic), "ቅዳሜ");
    }

    #[test]
    fn parse_name_style() {
        assert_eq!("Amharic".parse::<NameStyle>().unwrap(), NameStyle::Amharic);
        assert_eq!("latin".parse::<NameStyle>().unwrap(), NameStyle::Latin);
        assert!("klingon".parse::<NameStyle>().is_err());
    }
}
