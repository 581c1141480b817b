//! # Locale Detection
//!
//! Picks a best-guess country and language for the device, falling back
//! through progressively weaker signals:
//!
//! ```text
//! language: primary locale language code ─────────────────▶ catalog?
//! country:  primary region ▶ secondary region ▶ [timezone] ▶ currency ▶ catalog?
//! ```
//!
//! Detection never fails. A missing or broken locale capability yields
//! the default result (first catalog entries, nothing marked detected).
//! Persisting the choice is the caller's job.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Catalog
// ============================================================================

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
    pub flag: &'static str,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
}

/// Supported countries. The first entry is the default.
pub const COUNTRIES: &[Country] = &[
    Country { code: "US", name: "United States", native_name: "United States", flag: "🇺🇸" },
    Country { code: "IN", name: "India", native_name: "भारत", flag: "🇮🇳" },
    Country { code: "GB", name: "United Kingdom", native_name: "United Kingdom", flag: "🇬🇧" },
    Country { code: "CA", name: "Canada", native_name: "Canada", flag: "🇨🇦" },
    Country { code: "AU", name: "Australia", native_name: "Australia", flag: "🇦🇺" },
    Country { code: "DE", name: "Germany", native_name: "Deutschland", flag: "🇩🇪" },
    Country { code: "FR", name: "France", native_name: "France", flag: "🇫🇷" },
    Country { code: "IT", name: "Italy", native_name: "Italia", flag: "🇮🇹" },
    Country { code: "ES", name: "Spain", native_name: "España", flag: "🇪🇸" },
    Country { code: "JP", name: "Japan", native_name: "日本", flag: "🇯🇵" },
    Country { code: "CN", name: "China", native_name: "中国", flag: "🇨🇳" },
    Country { code: "KR", name: "South Korea", native_name: "대한민국", flag: "🇰🇷" },
    Country { code: "MX", name: "Mexico", native_name: "México", flag: "🇲🇽" },
    Country { code: "BR", name: "Brazil", native_name: "Brasil", flag: "🇧🇷" },
    Country { code: "RU", name: "Russia", native_name: "Россия", flag: "🇷🇺" },
    Country { code: "AE", name: "United Arab Emirates", native_name: "الإمارات", flag: "🇦🇪" },
];

/// Supported languages. The first entry is the default.
pub const LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English", native_name: "English" },
    Language { code: "hi", name: "Hindi", native_name: "हिन्दी" },
    Language { code: "es", name: "Spanish", native_name: "Español" },
    Language { code: "fr", name: "French", native_name: "Français" },
    Language { code: "de", name: "German", native_name: "Deutsch" },
    Language { code: "it", name: "Italian", native_name: "Italiano" },
    Language { code: "pt", name: "Portuguese", native_name: "Português" },
    Language { code: "ja", name: "Japanese", native_name: "日本語" },
    Language { code: "zh", name: "Chinese", native_name: "中文" },
    Language { code: "ko", name: "Korean", native_name: "한국어" },
    Language { code: "ru", name: "Russian", native_name: "Русский" },
    Language { code: "ar", name: "Arabic", native_name: "العربية" },
];

pub fn default_country() -> Country {
    COUNTRIES[0]
}

pub fn default_language() -> Language {
    LANGUAGES[0]
}

pub fn find_country(code: &str) -> Option<Country> {
    let code = code.trim();
    COUNTRIES.iter().copied().find(|c| c.code.eq_ignore_ascii_case(code))
}

pub fn find_language(code: &str) -> Option<Language> {
    let code = code.trim();
    LANGUAGES.iter().copied().find(|l| l.code.eq_ignore_ascii_case(code))
}

// ============================================================================
// Fallback Tables
// ============================================================================

/// Currency → country. EUR defaults to Germany.
pub fn country_from_currency(currency: &str) -> Option<&'static str> {
    let code = match currency.trim().to_uppercase().as_str() {
        "USD" => "US",
        "EUR" => "DE",
        "GBP" => "GB",
        "INR" => "IN",
        "JPY" => "JP",
        "CNY" => "CN",
        "KRW" => "KR",
        "CAD" => "CA",
        "AUD" => "AU",
        "MXN" => "MX",
        "BRL" => "BR",
        "RUB" => "RU",
        _ => return None,
    };
    Some(code)
}

/// IANA timezone → country.
pub fn country_from_timezone(timezone: &str) -> Option<&'static str> {
    let code = match timezone.trim() {
        // Asia
        "Asia/Kolkata" | "Asia/Mumbai" | "Asia/Delhi" => "IN",
        "Asia/Tokyo" => "JP",
        "Asia/Shanghai" | "Asia/Hong_Kong" => "CN",
        "Asia/Seoul" => "KR",
        "Asia/Dubai" => "AE",
        // Europe
        "Europe/London" => "GB",
        "Europe/Paris" => "FR",
        "Europe/Berlin" => "DE",
        "Europe/Rome" => "IT",
        "Europe/Madrid" => "ES",
        "Europe/Moscow" => "RU",
        // Americas
        "America/New_York" | "America/Los_Angeles" | "America/Chicago" | "America/Denver" => "US",
        "America/Toronto" | "America/Vancouver" => "CA",
        "America/Mexico_City" => "MX",
        "America/Sao_Paulo" => "BR",
        // Australia
        "Australia/Sydney" | "Australia/Melbourne" | "Australia/Perth" => "AU",
        _ => return None,
    };
    Some(code)
}

// ============================================================================
// Device Capability
// ============================================================================

/// One locale as reported by the device. Any field may be missing.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleSignal {
    pub region_code: Option<String>,
    pub language_code: Option<String>,
    pub currency_code: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug)]
pub enum LocaleError {
    /// The platform exposes no locale information at all.
    Unavailable(String),
    /// Locale information exists but could not be understood.
    Malformed(String),
}

impl fmt::Display for LocaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocaleError::Unavailable(msg) => write!(f, "locale unavailable: {msg}"),
            LocaleError::Malformed(msg) => write!(f, "malformed locale: {msg}"),
        }
    }
}

impl std::error::Error for LocaleError {}

/// Where locale signals come from.
pub trait LocaleSource {
    /// Device locales, most preferred first.
    fn locales(&self) -> Result<Vec<LocaleSignal>, LocaleError>;

    /// Region code through the platform's secondary accessor.
    /// Defaults to the primary locale's region.
    fn region(&self) -> Option<String> {
        self.locales()
            .ok()
            .and_then(|locales| locales.into_iter().next())
            .and_then(|primary| primary.region_code)
    }
}

/// A fixed list of locales. Used for tests and explicit overrides.
#[derive(Debug, Clone, Default)]
pub struct StaticLocaleSource {
    pub locales: Vec<LocaleSignal>,
}

impl StaticLocaleSource {
    pub fn new(locales: Vec<LocaleSignal>) -> Self {
        Self { locales }
    }
}

impl LocaleSource for StaticLocaleSource {
    fn locales(&self) -> Result<Vec<LocaleSignal>, LocaleError> {
        Ok(self.locales.clone())
    }
}

/// Reads POSIX locale variables and the system timezone.
///
/// `LC_ALL` wins over `LC_MESSAGES`, which wins over `LANG`. Values look
/// like `en_IN.UTF-8` or `de_DE@euro`. `C` and `POSIX` carry no locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvLocaleSource;

const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

impl LocaleSource for EnvLocaleSource {
    fn locales(&self) -> Result<Vec<LocaleSignal>, LocaleError> {
        let raw = LOCALE_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty())
            .ok_or_else(|| LocaleError::Unavailable("no LC_ALL, LC_MESSAGES or LANG set".into()))?;

        let timezone = match iana_time_zone::get_timezone() {
            Ok(tz) => Some(tz),
            Err(e) => {
                debug!("System timezone unavailable: {}", e);
                None
            }
        };

        // LANGUAGE may list extra preferences after the primary locale.
        let mut locales = vec![parse_posix_locale(&raw, timezone.clone())?];
        if let Ok(extra) = std::env::var("LANGUAGE") {
            for entry in extra.split(':').filter(|e| !e.trim().is_empty()) {
                if let Ok(signal) = parse_posix_locale(entry, timezone.clone())
                    && !locales.contains(&signal)
                {
                    locales.push(signal);
                }
            }
        }
        Ok(locales)
    }
}

/// Parses `ll[_RR][.codeset][@modifier]`.
pub fn parse_posix_locale(raw: &str, timezone: Option<String>) -> Result<LocaleSignal, LocaleError> {
    let without_modifier = raw.trim().split('@').next().unwrap_or_default();
    let name = without_modifier.split('.').next().unwrap_or_default();

    // `C`, `C.UTF-8` and `POSIX` name no language or region.
    if name.eq_ignore_ascii_case("C") || name.eq_ignore_ascii_case("POSIX") {
        return Ok(LocaleSignal {
            timezone,
            ..Default::default()
        });
    }

    let mut parts = name.split(['_', '-']);

    let language = parts.next().unwrap_or_default();
    if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(LocaleError::Malformed(raw.to_string()));
    }
    let region = parts.next().filter(|r| !r.is_empty());

    Ok(LocaleSignal {
        region_code: region.map(str::to_uppercase),
        language_code: Some(language.to_lowercase()),
        currency_code: None,
        timezone,
    })
}

// ============================================================================
// Detection
// ============================================================================

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WasDetected {
    pub country: bool,
    pub language: bool,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedLocale {
    pub country: Country,
    pub language: Language,
    pub was_detected: WasDetected,
}

impl Default for DetectedLocale {
    fn default() -> Self {
        Self {
            country: default_country(),
            language: default_language(),
            was_detected: WasDetected::default(),
        }
    }
}

impl DetectedLocale {
    /// User-facing description of how much came from the device.
    pub fn summary(&self) -> &'static str {
        match (self.was_detected.country, self.was_detected.language) {
            (true, true) => "Detected from device settings",
            (true, false) | (false, true) => "Partially detected from device",
            (false, false) => "Using default settings",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectOptions {
    /// Consult the timezone table after the region tiers, before currency.
    pub timezone_fallback: bool,
}

/// Detects the device locale with the default tier chain.
pub fn detect_device_locale(source: &dyn LocaleSource) -> DetectedLocale {
    detect_device_locale_with(source, DetectOptions::default())
}

pub fn detect_device_locale_with(source: &dyn LocaleSource, options: DetectOptions) -> DetectedLocale {
    match try_detect(source, options) {
        Ok(detected) => detected,
        Err(e) => {
            warn!("Failed to detect device locale: {}", e);
            DetectedLocale::default()
        }
    }
}

fn try_detect(source: &dyn LocaleSource, options: DetectOptions) -> Result<DetectedLocale, LocaleError> {
    let locales = source.locales()?;
    let Some(primary) = locales.first() else {
        debug!("Device reported no locales, using defaults");
        return Ok(DetectedLocale::default());
    };

    let language = primary
        .language_code
        .as_deref()
        .map(str::to_lowercase)
        .and_then(|code| find_language(&code));

    let country = resolve_country(primary, source, options);

    debug!(
        "Locale detection: region={:?} language={:?} currency={:?} timezone={:?} -> country={:?} language={:?}",
        primary.region_code,
        primary.language_code,
        primary.currency_code,
        primary.timezone,
        country.map(|c| c.code),
        language.map(|l| l.code),
    );

    Ok(DetectedLocale {
        country: country.unwrap_or_else(default_country),
        language: language.unwrap_or_else(default_language),
        was_detected: WasDetected {
            country: country.is_some(),
            language: language.is_some(),
        },
    })
}

/// Walks the country tiers, stopping at the first catalog hit.
fn resolve_country(primary: &LocaleSignal, source: &dyn LocaleSource, options: DetectOptions) -> Option<Country> {
    primary
        .region_code
        .as_deref()
        .and_then(find_country)
        .or_else(|| source.region().as_deref().and_then(find_country))
        .or_else(|| {
            if !options.timezone_fallback {
                return None;
            }
            primary
                .timezone
                .as_deref()
                .and_then(country_from_timezone)
                .and_then(find_country)
        })
        .or_else(|| {
            primary
                .currency_code
                .as_deref()
                .and_then(country_from_currency)
                .and_then(find_country)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingLocaleSource, SecondaryRegionSource, signal};

    #[test]
    fn test_no_locales_returns_default() {
        let detected = detect_device_locale(&StaticLocaleSource::default());
        assert_eq!(detected.country.code, "US");
        assert_eq!(detected.language.code, "en");
        assert_eq!(detected.was_detected, WasDetected { country: false, language: false });
    }

    #[test]
    fn test_region_and_language_detected() {
        let source = StaticLocaleSource::new(vec![signal(Some("IN"), Some("en"), None, None)]);
        let detected = detect_device_locale(&source);
        assert_eq!(detected.country.code, "IN");
        assert_eq!(detected.language.code, "en");
        assert!(detected.was_detected.country);
        assert!(detected.was_detected.language);
    }

    #[test]
    fn test_currency_fallback_for_unknown_region() {
        let source = StaticLocaleSource::new(vec![signal(Some("ZZ"), Some("ja"), Some("JPY"), None)]);
        let detected = detect_device_locale(&source);
        assert_eq!(detected.country.code, "JP");
        assert!(detected.was_detected.country);
    }

    #[test]
    fn test_language_is_lower_cased_before_lookup() {
        let source = StaticLocaleSource::new(vec![signal(Some("de"), Some("DE"), None, None)]);
        let detected = detect_device_locale(&source);
        assert_eq!(detected.language.code, "de");
        assert_eq!(detected.country.code, "DE");
    }

    #[test]
    fn test_only_unresolved_field_is_defaulted() {
        let source = StaticLocaleSource::new(vec![signal(Some("FR"), Some("tlh"), None, None)]);
        let detected = detect_device_locale(&source);
        assert_eq!(detected.country.code, "FR");
        assert_eq!(detected.language.code, "en");
        assert_eq!(detected.was_detected, WasDetected { country: true, language: false });
        assert_eq!(detected.summary(), "Partially detected from device");
    }

    #[test]
    fn test_timezone_tier_is_opt_in() {
        let source = StaticLocaleSource::new(vec![signal(None, Some("en"), None, Some("Asia/Kolkata"))]);
        let off = detect_device_locale(&source);
        assert!(!off.was_detected.country);
        assert_eq!(off.country.code, "US");

        let on = detect_device_locale_with(&source, DetectOptions { timezone_fallback: true });
        assert!(on.was_detected.country);
        assert_eq!(on.country.code, "IN");
    }

    #[test]
    fn test_timezone_tier_runs_before_currency() {
        let source =
            StaticLocaleSource::new(vec![signal(None, Some("en"), Some("EUR"), Some("Europe/Paris"))]);
        let with_tz = detect_device_locale_with(&source, DetectOptions { timezone_fallback: true });
        assert_eq!(with_tz.country.code, "FR");
        let without_tz = detect_device_locale(&source);
        assert_eq!(without_tz.country.code, "DE");
    }

    #[test]
    fn test_secondary_region_wins_over_currency() {
        let source = SecondaryRegionSource {
            primary: signal(Some("ZZ"), Some("en"), Some("JPY"), None),
            region: Some("GB".into()),
        };
        let detected = detect_device_locale(&source);
        assert_eq!(detected.country.code, "GB");
        assert!(detected.was_detected.country);
    }

    #[test]
    fn test_primary_region_wins_over_secondary_region() {
        let source = SecondaryRegionSource {
            primary: signal(Some("IN"), Some("hi"), Some("JPY"), None),
            region: Some("GB".into()),
        };
        assert_eq!(detect_device_locale(&source).country.code, "IN");
    }

    #[test]
    fn test_secondary_region_runs_before_timezone() {
        let source = SecondaryRegionSource {
            primary: signal(None, Some("en"), None, Some("Asia/Tokyo")),
            region: Some("ca".into()),
        };
        let detected = detect_device_locale_with(&source, DetectOptions { timezone_fallback: true });
        assert_eq!(detected.country.code, "CA");
    }

    #[test]
    fn test_unknown_secondary_region_falls_through_to_currency() {
        let source = SecondaryRegionSource {
            primary: signal(Some("ZZ"), Some("en"), Some("JPY"), None),
            region: Some("QQ".into()),
        };
        assert_eq!(detect_device_locale(&source).country.code, "JP");
    }

    #[test]
    fn test_only_primary_locale_is_consulted() {
        let source = StaticLocaleSource::new(vec![
            signal(None, None, None, None),
            signal(Some("JP"), Some("ja"), None, None),
        ]);
        let detected = detect_device_locale(&source);
        assert_eq!(detected.was_detected, WasDetected::default());
    }

    #[test]
    fn test_source_error_becomes_default() {
        let detected = detect_device_locale(&FailingLocaleSource);
        assert_eq!(detected, DetectedLocale::default());
        assert_eq!(detected.summary(), "Using default settings");
    }

    #[test]
    fn test_summary_both_detected() {
        let source = StaticLocaleSource::new(vec![signal(Some("BR"), Some("pt"), None, None)]);
        assert_eq!(detect_device_locale(&source).summary(), "Detected from device settings");
    }

    #[test]
    fn test_parse_posix_locale() {
        let signal = parse_posix_locale("en_IN.UTF-8", None).unwrap();
        assert_eq!(signal.language_code.as_deref(), Some("en"));
        assert_eq!(signal.region_code.as_deref(), Some("IN"));

        let signal = parse_posix_locale("de_DE@euro", Some("Europe/Berlin".into())).unwrap();
        assert_eq!(signal.region_code.as_deref(), Some("DE"));
        assert_eq!(signal.timezone.as_deref(), Some("Europe/Berlin"));

        let signal = parse_posix_locale("fr", None).unwrap();
        assert!(signal.region_code.is_none());

        let c = parse_posix_locale("C", None).unwrap();
        assert!(c.language_code.is_none());
    }

    #[test]
    fn test_c_locale_with_codeset_has_no_language() {
        for raw in ["C.UTF-8", "c.utf8", "POSIX.UTF-8", "C@euro"] {
            let parsed = parse_posix_locale(raw, Some("UTC".into())).unwrap();
            assert!(parsed.language_code.is_none(), "{raw} should carry no language");
            assert!(parsed.region_code.is_none(), "{raw} should carry no region");
            assert_eq!(parsed.timezone.as_deref(), Some("UTC"));
        }

        let source = StaticLocaleSource::new(vec![parse_posix_locale("C.UTF-8", None).unwrap()]);
        assert_eq!(detect_device_locale(&source), DetectedLocale::default());

        assert!(matches!(parse_posix_locale(".UTF-8", None), Err(LocaleError::Malformed(_))));
    }

    #[test]
    fn test_lookup_tables() {
        assert_eq!(country_from_currency("eur"), Some("DE"));
        assert_eq!(country_from_currency("CHF"), None);
        assert_eq!(country_from_timezone("America/Sao_Paulo"), Some("BR"));
        assert_eq!(country_from_timezone("Africa/Lagos"), None);
        assert_eq!(find_country("gb").map(|c| c.name), Some("United Kingdom"));
        assert!(find_language("xx").is_none());
    }
}
