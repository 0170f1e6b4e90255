//! Currency cell codec.
//!
//! Currency values are persisted in a canonical decimal-comma form with
//! exactly two fractional digits and no symbol or grouping (`"1234,50"`).
//! [`canonicalize`] turns user input into that form; [`format`] renders a
//! persisted value for display in a given [`CurrencyLocale`].
//!
//! `format` is lossy and its output is never fed back into `canonicalize`:
//! edits always start from the raw persisted value.

use regex::Regex;
use std::sync::OnceLock;

/// Where the currency symbol is placed relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    /// Symbol before the amount. With `space`, the sign follows the symbol
    /// (`€ -1,00`); without, the sign leads (`-€1.00`).
    Prefix { space: bool },
    /// Symbol after the amount, separated by a space (`-1,00 €`).
    Suffix,
}

/// Display conventions for monetary amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyLocale {
    pub id: &'static str,
    pub symbol: &'static str,
    pub decimal_separator: char,
    pub thousands_separator: Option<char>,
    pub symbol_position: SymbolPosition,
}

pub static NL_NL: CurrencyLocale = CurrencyLocale {
    id: "nl-NL",
    symbol: "€",
    decimal_separator: ',',
    thousands_separator: Some('.'),
    symbol_position: SymbolPosition::Prefix { space: true },
};

pub static DE_DE: CurrencyLocale = CurrencyLocale {
    id: "de-DE",
    symbol: "€",
    decimal_separator: ',',
    thousands_separator: Some('.'),
    symbol_position: SymbolPosition::Suffix,
};

/// French grouping uses U+00A0 NO-BREAK SPACE.
pub static FR_FR: CurrencyLocale = CurrencyLocale {
    id: "fr-FR",
    symbol: "€",
    decimal_separator: ',',
    thousands_separator: Some('\u{a0}'),
    symbol_position: SymbolPosition::Suffix,
};

pub static EN_US: CurrencyLocale = CurrencyLocale {
    id: "en-US",
    symbol: "€",
    decimal_separator: '.',
    thousands_separator: Some(','),
    symbol_position: SymbolPosition::Prefix { space: false },
};

/// Look up a currency locale by tag.
///
/// Accepts `-`/`_` spellings, any case, POSIX suffixes (`nl_NL.UTF-8`) and
/// falls back to the language part for unlisted regions (`nl-BE` → `nl-NL`).
pub fn currency_locale(id: &str) -> Option<&'static CurrencyLocale> {
    let mut key: String = id
        .trim()
        .chars()
        .map(|ch| if ch == '_' { '-' } else { ch.to_ascii_lowercase() })
        .collect();
    if let Some(idx) = key.find(['.', '@']) {
        key.truncate(idx);
    }
    if key.is_empty() {
        return None;
    }

    let lang = key.split('-').next().unwrap_or("");
    match (key.as_str(), lang) {
        ("nl-nl", _) | (_, "nl") => Some(&NL_NL),
        ("de-de", _) | (_, "de") => Some(&DE_DE),
        ("fr-fr", _) | (_, "fr") => Some(&FR_FR),
        ("en-us", _) | (_, "en") => Some(&EN_US),
        _ => None,
    }
}

/// Normalize user input into the canonical persisted form.
///
/// Returns the empty string ("no value") for blank input or input without
/// any digits. Fractions longer than two digits are truncated, not rounded.
/// Values already in canonical form are returned unchanged.
pub fn canonicalize(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut kept = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        match ch {
            '0'..='9' | ',' | '.' => kept.push(ch),
            '-' if kept.is_empty() => kept.push(ch),
            _ => {}
        }
    }

    let negative = kept.starts_with('-');
    let body = kept.trim_start_matches('-');

    // With a comma present, periods are grouping. Without one, a lone period
    // is the decimal mark and several periods are grouping.
    let (int_raw, frac_raw) = match body.find(',') {
        Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
        None if body.matches('.').count() == 1 => match body.split_once('.') {
            Some((int, frac)) => (int, Some(frac)),
            None => (body, None),
        },
        None => (body, None),
    };

    let int_digits: String = int_raw.chars().filter(char::is_ascii_digit).collect();
    let frac_digits: String = frac_raw
        .unwrap_or("")
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    if int_digits.is_empty() && frac_digits.is_empty() {
        return String::new();
    }

    let mut frac: String = frac_digits.chars().take(2).collect();
    while frac.len() < 2 {
        frac.push('0');
    }

    let int_part = if int_digits.is_empty() {
        "0"
    } else {
        int_digits.as_str()
    };
    let sign = if negative { "-" } else { "" };
    format!("{sign}{int_part},{frac}")
}

/// Whether `value` is already in canonical form (`-?\d+,\d{2}`).
pub fn is_canonical(value: &str) -> bool {
    canonical_re().is_match(value)
}

/// Render a persisted value for display.
///
/// Empty values render empty. Values that do not parse as a decimal amount
/// are returned verbatim.
pub fn format(persisted: &str, locale: &CurrencyLocale) -> String {
    let trimmed = persisted.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match parse_amount(trimmed) {
        Some(amount) => render(&amount, locale),
        None => persisted.to_string(),
    }
}

fn canonical_re() -> &'static Regex {
    static CANONICAL_RE: OnceLock<Regex> = OnceLock::new();
    CANONICAL_RE.get_or_init(|| {
        Regex::new(r"^-?[0-9]+,[0-9]{2}$").expect("canonical currency regex must compile")
    })
}

fn amount_re() -> &'static Regex {
    static AMOUNT_RE: OnceLock<Regex> = OnceLock::new();
    AMOUNT_RE.get_or_init(|| {
        Regex::new(r"^(?<sign>-)?(?<int>[0-9]*)(?:[.,](?<frac>[0-9]*))?$")
            .expect("currency amount regex must compile")
    })
}

/// An amount rounded to cents, as decimal digits.
#[derive(Debug, PartialEq, Eq)]
struct Amount {
    negative: bool,
    /// Integer digits without leading zeros ("0" for zero).
    units: String,
    cents: String,
}

fn parse_amount(s: &str) -> Option<Amount> {
    let caps = amount_re().captures(s)?;
    let negative = caps.name("sign").is_some();
    let int = caps.name("int").map_or("", |m| m.as_str());
    let frac = caps.name("frac").map_or("", |m| m.as_str());
    if int.is_empty() && frac.is_empty() {
        return None;
    }

    // Digits of the amount in cents, plus the third fractional digit for rounding.
    let mut digits: Vec<u8> = int.bytes().map(|b| b - b'0').collect();
    let mut frac_digits = frac.bytes().map(|b| b - b'0');
    for _ in 0..2 {
        digits.push(frac_digits.next().unwrap_or(0));
    }
    if frac_digits.next().unwrap_or(0) >= 5 {
        round_up(&mut digits);
    }

    let split = digits.len() - 2;
    let units: String = digits[..split]
        .iter()
        .map(|d| char::from(b'0' + d))
        .collect::<String>()
        .trim_start_matches('0')
        .to_string();
    let cents: String = digits[split..].iter().map(|d| char::from(b'0' + d)).collect();

    Some(Amount {
        negative,
        units: if units.is_empty() { "0".to_string() } else { units },
        cents,
    })
}

/// Add one to the last digit, carrying to the left.
fn round_up(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == 9 {
            *digit = 0;
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, 1);
}

fn group_thousands(units: &str, separator: Option<char>) -> String {
    let Some(sep) = separator else {
        return units.to_string();
    };
    let len = units.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in units.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

fn render(amount: &Amount, locale: &CurrencyLocale) -> String {
    let is_zero = amount.units == "0" && amount.cents == "00";
    let sign = if amount.negative && !is_zero { "-" } else { "" };
    let number = format!(
        "{}{}{}",
        group_thousands(&amount.units, locale.thousands_separator),
        locale.decimal_separator,
        amount.cents
    );
    match locale.symbol_position {
        SymbolPosition::Prefix { space: true } => format!("{} {sign}{number}", locale.symbol),
        SymbolPosition::Prefix { space: false } => format!("{sign}{}{number}", locale.symbol),
        SymbolPosition::Suffix => format!("{sign}{number} {}", locale.symbol),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_pads_and_appends_fraction() {
        assert_eq!(canonicalize("15"), "15,00");
        assert_eq!(canonicalize("15,5"), "15,50");
        assert_eq!(canonicalize("15,"), "15,00");
        assert_eq!(canonicalize("1234,50"), "1234,50");
    }

    #[test]
    fn canonicalize_treats_lone_period_as_decimal() {
        assert_eq!(canonicalize("15.5"), "15,50");
        assert_eq!(canonicalize("0.99"), "0,99");
        assert_eq!(canonicalize(".5"), "0,50");
    }

    #[test]
    fn canonicalize_drops_grouping_periods() {
        assert_eq!(canonicalize("1.234,56"), "1234,56");
        assert_eq!(canonicalize("1.234.567"), "1234567,00");
    }

    #[test]
    fn canonicalize_strips_symbols_and_spaces() {
        assert_eq!(canonicalize("€ 1.234,50"), "1234,50");
        assert_eq!(canonicalize("  EUR 12 "), "12,00");
    }

    #[test]
    fn canonicalize_truncates_extra_fraction_digits() {
        assert_eq!(canonicalize("1,999"), "1,99");
        assert_eq!(canonicalize("2,5,7"), "2,57");
    }

    #[test]
    fn canonicalize_keeps_only_leading_minus() {
        assert_eq!(canonicalize("-12,5"), "-12,50");
        assert_eq!(canonicalize("€ -3"), "-3,00");
        assert_eq!(canonicalize("5-3"), "53,00");
    }

    #[test]
    fn canonicalize_empty_or_digitless_input_is_no_value() {
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize("   "), "");
        assert_eq!(canonicalize("abc"), "");
        assert_eq!(canonicalize("-"), "");
        assert_eq!(canonicalize(",."), "");
    }

    #[test]
    fn canonical_values_round_trip() {
        for v in ["0,00", "15,50", "-0,01", "007,10", "1234567,89"] {
            assert!(is_canonical(v), "{v} should be canonical");
            assert_eq!(canonicalize(v), v);
        }
    }

    #[test]
    fn format_nl_matches_display_rule() {
        assert_eq!(format("15,5", &NL_NL), "€ 15,50");
        assert_eq!(format("15,50", &NL_NL), "€ 15,50");
        assert_eq!(format("1234567,8", &NL_NL), "€ 1.234.567,80");
        assert_eq!(format("-42,00", &NL_NL), "€ -42,00");
    }

    #[test]
    fn format_rounds_half_away_from_zero() {
        assert_eq!(format("2,675", &NL_NL), "€ 2,68");
        assert_eq!(format("9,995", &NL_NL), "€ 10,00");
        assert_eq!(format("999,999", &NL_NL), "€ 1.000,00");
        assert_eq!(format("-0,001", &NL_NL), "€ 0,00");
    }

    #[test]
    fn format_other_locales() {
        assert_eq!(format("1234,5", &DE_DE), "1.234,50 €");
        assert_eq!(format("1234,5", &EN_US), "€1,234.50");
        assert_eq!(format("-1234,5", &EN_US), "-€1,234.50");
        assert_eq!(format("1234,5", &FR_FR), "1\u{a0}234,50 €");
    }

    #[test]
    fn format_empty_and_unparseable() {
        assert_eq!(format("", &NL_NL), "");
        assert_eq!(format("  ", &NL_NL), "");
        assert_eq!(format("n.v.t.", &NL_NL), "n.v.t.");
        assert_eq!(format("12,5 euro", &NL_NL), "12,5 euro");
    }

    #[test]
    fn currency_locale_normalizes_tags() {
        assert_eq!(currency_locale("nl-NL").map(|l| l.id), Some("nl-NL"));
        assert_eq!(currency_locale("nl_NL.UTF-8").map(|l| l.id), Some("nl-NL"));
        assert_eq!(currency_locale("NL-be").map(|l| l.id), Some("nl-NL"));
        assert_eq!(currency_locale("de").map(|l| l.id), Some("de-DE"));
        assert_eq!(currency_locale("en-GB").map(|l| l.id), Some("en-US"));
        assert_eq!(currency_locale("ja-JP"), None);
        assert_eq!(currency_locale(""), None);
    }
}
