//! Currency registry: which currencies the service publishes and in which tables.

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;
use std::str::FromStr;

/// Publication snapshot the bundled currency table was taken from.
pub const REGISTRY_VERSION: &str = "2017-10";

/// A rate table published by the service.
///
/// Tables A and B carry mid rates only; table C carries bid/ask quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Table {
    A,
    B,
    C,
}

impl Table {
    pub fn publishes_bid_ask(&self) -> bool {
        matches!(self, Table::C)
    }

    /// Lower-case form used in request paths.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Table::A => "a",
            Table::B => "b",
            Table::C => "c",
        }
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Table::A => "A",
                Table::B => "B",
                Table::C => "C",
            }
        )
    }
}

impl FromStr for Table {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Table::A),
            "B" => Ok(Table::B),
            "C" => Ok(Table::C),
            _ => Err(Error::InvalidArgument(format!("Unknown rate table: {s}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    code: String,
    name: String,
    tables: BTreeSet<Table>,
}

impl Currency {
    pub fn new<I>(code: &str, name: &str, tables: I) -> Self
    where
        I: IntoIterator<Item = Table>,
    {
        Self {
            code: code.trim().to_uppercase(),
            name: name.to_string(),
            tables: tables.into_iter().collect(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tables(&self) -> &BTreeSet<Table> {
        &self.tables
    }

    pub fn publishes_bid_ask(&self) -> bool {
        self.tables.contains(&Table::C)
    }

    /// The mid-rate table for this currency, preferring the daily table A
    /// over the weekly table B.
    pub fn mid_table(&self) -> Option<Table> {
        self.tables
            .iter()
            .copied()
            .find(|table| !table.publishes_bid_ask())
    }
}

/// Read-only mapping of currency code to [`Currency`].
///
/// Build it once and share it between clients behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CurrencyRegistry {
    currencies: HashMap<String, Currency>,
}

impl CurrencyRegistry {
    /// Registry populated from the bundled currency table.
    pub fn bundled() -> Self {
        Self::from_currencies(BUNDLED_CURRENCIES.iter().map(|(code, name, tables)| {
            Currency::new(code, name, tables.iter().copied())
        }))
    }

    pub fn from_currencies<I>(currencies: I) -> Self
    where
        I: IntoIterator<Item = Currency>,
    {
        Self {
            currencies: currencies
                .into_iter()
                .map(|currency| (currency.code.clone(), currency))
                .collect(),
        }
    }

    pub fn lookup(&self, code: &str) -> Result<&Currency> {
        let normalized = code.to_uppercase();
        self.currencies
            .get(&normalized)
            .ok_or(Error::UnknownCurrencyCode(normalized))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.currencies.contains_key(&code.to_uppercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.values()
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }
}

impl Default for CurrencyRegistry {
    fn default() -> Self {
        Self::bundled()
    }
}

use Table::{A, B, C};

const BUNDLED_CURRENCIES: &[(&str, &str, &[Table])] = &[
    // Table A (and C where bid/ask is quoted)
    ("THB", "Thai baht", &[A]),
    ("USD", "US dollar", &[A, C]),
    ("AUD", "Australian dollar", &[A, C]),
    ("HKD", "Hong Kong dollar", &[A]),
    ("CAD", "Canadian dollar", &[A, C]),
    ("NZD", "New Zealand dollar", &[A]),
    ("SGD", "Singapore dollar", &[A]),
    ("EUR", "Euro", &[A, C]),
    ("HUF", "Hungarian forint", &[A, C]),
    ("CHF", "Swiss franc", &[A, C]),
    ("GBP", "Pound sterling", &[A, C]),
    ("UAH", "Ukrainian hryvnia", &[A]),
    ("JPY", "Japanese yen", &[A, C]),
    ("CZK", "Czech koruna", &[A, C]),
    ("DKK", "Danish krone", &[A, C]),
    ("ISK", "Icelandic krona", &[A]),
    ("NOK", "Norwegian krone", &[A, C]),
    ("SEK", "Swedish krona", &[A, C]),
    ("HRK", "Croatian kuna", &[A]),
    ("RON", "Romanian leu", &[A]),
    ("BGN", "Bulgarian lev", &[A]),
    ("TRY", "Turkish lira", &[A]),
    ("ILS", "Israeli new shekel", &[A]),
    ("CLP", "Chilean peso", &[A]),
    ("PHP", "Philippine peso", &[A]),
    ("MXN", "Mexican peso", &[A]),
    ("ZAR", "South African rand", &[A]),
    ("BRL", "Brazilian real", &[A]),
    ("MYR", "Malaysian ringgit", &[A]),
    ("RUB", "Russian ruble", &[A]),
    ("IDR", "Indonesian rupiah", &[A]),
    ("INR", "Indian rupee", &[A]),
    ("KRW", "South Korean won", &[A]),
    ("CNY", "Chinese yuan renminbi", &[A]),
    ("XDR", "Special drawing rights (IMF)", &[A, C]),
    // Table B
    ("AFN", "Afghan afghani", &[B]),
    ("MGA", "Malagasy ariary", &[B]),
    ("PAB", "Panamanian balboa", &[B]),
    ("ETB", "Ethiopian birr", &[B]),
    ("VEF", "Venezuelan bolivar", &[B]),
    ("BOB", "Bolivian boliviano", &[B]),
    ("CRC", "Costa Rican colon", &[B]),
    ("SVC", "Salvadoran colon", &[B]),
    ("NIO", "Nicaraguan cordoba", &[B]),
    ("GMD", "Gambian dalasi", &[B]),
    ("MKD", "Macedonian denar", &[B]),
    ("DZD", "Algerian dinar", &[B]),
    ("BHD", "Bahraini dinar", &[B]),
    ("IQD", "Iraqi dinar", &[B]),
    ("JOD", "Jordanian dinar", &[B]),
    ("KWD", "Kuwaiti dinar", &[B]),
    ("LYD", "Libyan dinar", &[B]),
    ("RSD", "Serbian dinar", &[B]),
    ("TND", "Tunisian dinar", &[B]),
    ("MAD", "Moroccan dirham", &[B]),
    ("AED", "UAE dirham", &[B]),
    ("STD", "Sao Tome and Principe dobra", &[B]),
    ("BSD", "Bahamian dollar", &[B]),
    ("BBD", "Barbados dollar", &[B]),
    ("BZD", "Belize dollar", &[B]),
    ("BND", "Brunei dollar", &[B]),
    ("FJD", "Fiji dollar", &[B]),
    ("GYD", "Guyana dollar", &[B]),
    ("JMD", "Jamaican dollar", &[B]),
    ("LRD", "Liberian dollar", &[B]),
    ("NAD", "Namibian dollar", &[B]),
    ("SRD", "Surinamese dollar", &[B]),
    ("TTD", "Trinidad and Tobago dollar", &[B]),
    ("XCD", "East Caribbean dollar", &[B]),
    ("SBD", "Solomon Islands dollar", &[B]),
    ("ZWL", "Zimbabwean dollar", &[B]),
    ("VND", "Vietnamese dong", &[B]),
    ("AMD", "Armenian dram", &[B]),
    ("CVE", "Cape Verde escudo", &[B]),
    ("AWG", "Aruban florin", &[B]),
    ("BIF", "Burundian franc", &[B]),
    ("XOF", "CFA franc BCEAO", &[B]),
    ("XAF", "CFA franc BEAC", &[B]),
    ("XPF", "CFP franc", &[B]),
    ("DJF", "Djiboutian franc", &[B]),
    ("GNF", "Guinean franc", &[B]),
    ("KMF", "Comorian franc", &[B]),
    ("CDF", "Congolese franc", &[B]),
    ("RWF", "Rwandan franc", &[B]),
    ("EGP", "Egyptian pound", &[B]),
    ("GIP", "Gibraltar pound", &[B]),
    ("LBP", "Lebanese pound", &[B]),
    ("SSP", "South Sudanese pound", &[B]),
    ("SDG", "Sudanese pound", &[B]),
    ("SYP", "Syrian pound", &[B]),
    ("GHS", "Ghanaian cedi", &[B]),
    ("HTG", "Haitian gourde", &[B]),
    ("PYG", "Paraguayan guarani", &[B]),
    ("ANG", "Netherlands Antillean guilder", &[B]),
    ("PGK", "Papua New Guinean kina", &[B]),
    ("LAK", "Lao kip", &[B]),
    ("MWK", "Malawian kwacha", &[B]),
    ("ZMW", "Zambian kwacha", &[B]),
    ("AOA", "Angolan kwanza", &[B]),
    ("MMK", "Myanmar kyat", &[B]),
    ("GEL", "Georgian lari", &[B]),
    ("MDL", "Moldovan leu", &[B]),
    ("ALL", "Albanian lek", &[B]),
    ("HNL", "Honduran lempira", &[B]),
    ("SLL", "Sierra Leonean leone", &[B]),
    ("SZL", "Swazi lilangeni", &[B]),
    ("LSL", "Lesotho loti", &[B]),
    ("AZN", "Azerbaijani manat", &[B]),
    ("MZN", "Mozambican metical", &[B]),
    ("NGN", "Nigerian naira", &[B]),
    ("ERN", "Eritrean nakfa", &[B]),
    ("TWD", "New Taiwan dollar", &[B]),
    ("TMT", "Turkmenistani manat", &[B]),
    ("MRO", "Mauritanian ouguiya", &[B]),
    ("TOP", "Tongan pa'anga", &[B]),
    ("MOP", "Macanese pataca", &[B]),
    ("ARS", "Argentine peso", &[B]),
    ("DOP", "Dominican peso", &[B]),
    ("COP", "Colombian peso", &[B]),
    ("CUP", "Cuban peso", &[B]),
    ("UYU", "Uruguayan peso", &[B]),
    ("BWP", "Botswana pula", &[B]),
    ("GTQ", "Guatemalan quetzal", &[B]),
    ("IRR", "Iranian rial", &[B]),
    ("YER", "Yemeni rial", &[B]),
    ("QAR", "Qatari riyal", &[B]),
    ("OMR", "Omani rial", &[B]),
    ("SAR", "Saudi riyal", &[B]),
    ("KHR", "Cambodian riel", &[B]),
    ("BYN", "Belarusian ruble", &[B]),
    ("LKR", "Sri Lankan rupee", &[B]),
    ("MVR", "Maldivian rufiyaa", &[B]),
    ("MUR", "Mauritian rupee", &[B]),
    ("NPR", "Nepalese rupee", &[B]),
    ("PKR", "Pakistani rupee", &[B]),
    ("SCR", "Seychellois rupee", &[B]),
    ("PEN", "Peruvian sol", &[B]),
    ("KGS", "Kyrgyzstani som", &[B]),
    ("TJS", "Tajikistani somoni", &[B]),
    ("UZS", "Uzbekistani som", &[B]),
    ("KES", "Kenyan shilling", &[B]),
    ("SOS", "Somali shilling", &[B]),
    ("TZS", "Tanzanian shilling", &[B]),
    ("UGX", "Ugandan shilling", &[B]),
    ("BDT", "Bangladeshi taka", &[B]),
    ("WST", "Samoan tala", &[B]),
    ("KZT", "Kazakhstani tenge", &[B]),
    ("MNT", "Mongolian tugrik", &[B]),
    ("VUV", "Vanuatu vatu", &[B]),
    ("BAM", "Bosnia and Herzegovina convertible mark", &[B]),
];
