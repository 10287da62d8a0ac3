//! Accept-Language negotiation
//!
//! Used only for the root-path locale redirect: pick the best configured
//! locale for the request, or nothing. Unparsable headers never fault —
//! they simply express no preference.

/// One parsed Accept-Language entry
#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePreference {
    pub tag: String,
    pub quality: f32,
}

/// Parses an Accept-Language header into quality-ordered preferences
///
/// Entries with a malformed `q` value default to quality 1.0; wildcard
/// entries are dropped (they express no locale preference).
///
/// # Examples
///
/// ```
/// use caret_edge::parse_accept_language;
///
/// let prefs = parse_accept_language("fr-CH, fr;q=0.9, en;q=0.8, *;q=0.5");
/// let tags: Vec<&str> = prefs.iter().map(|p| p.tag.as_str()).collect();
/// assert_eq!(tags, vec!["fr-CH", "fr", "en"]);
/// ```
pub fn parse_accept_language(header: &str) -> Vec<LanguagePreference> {
    let mut preferences: Vec<LanguagePreference> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.trim().split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let quality = parts
                .find_map(|p| p.trim().strip_prefix("q=").map(str::to_string))
                .and_then(|q| q.parse::<f32>().ok())
                .unwrap_or(1.0);
            Some(LanguagePreference {
                tag: tag.to_string(),
                quality,
            })
        })
        .collect();

    // Stable sort keeps declaration order among equal qualities
    preferences.sort_by(|a, b| {
        b.quality
            .partial_cmp(&a.quality)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    preferences
}

/// Picks the best configured locale for an Accept-Language header
///
/// For each preference in quality order: an exact case-insensitive match
/// wins, then a primary-subtag match (`fr-CH` matches configured `fr`).
/// Returns the configured locale's own spelling, or `None` when nothing
/// overlaps.
///
/// # Examples
///
/// ```
/// use caret_edge::preferred_locale;
///
/// let locales = vec!["en".to_string(), "fr".to_string(), "nl".to_string()];
/// assert_eq!(preferred_locale("fr", &locales), Some("fr".to_string()));
/// assert_eq!(preferred_locale("fr-CH", &locales), Some("fr".to_string()));
/// assert_eq!(preferred_locale("de, nl;q=0.7", &locales), Some("nl".to_string()));
/// assert_eq!(preferred_locale("de", &locales), None);
/// ```
pub fn preferred_locale(header: &str, locales: &[String]) -> Option<String> {
    for preference in parse_accept_language(header) {
        if let Some(exact) = locales
            .iter()
            .find(|l| l.eq_ignore_ascii_case(&preference.tag))
        {
            return Some(exact.clone());
        }

        let primary = preference.tag.split('-').next().unwrap_or(&preference.tag);
        if let Some(subtag) = locales.iter().find(|l| {
            l.split('-')
                .next()
                .map(|p| p.eq_ignore_ascii_case(primary))
                .unwrap_or(false)
        }) {
            return Some(subtag.clone());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locales() -> Vec<String> {
        vec!["en".to_string(), "fr".to_string(), "nl".to_string()]
    }

    #[test]
    fn test_quality_ordering() {
        let prefs = parse_accept_language("en;q=0.3, fr;q=0.9");
        assert_eq!(prefs[0].tag, "fr");
        assert_eq!(prefs[1].tag, "en");
    }

    #[test]
    fn test_missing_quality_defaults_to_one() {
        let prefs = parse_accept_language("nl, fr;q=0.9");
        assert_eq!(prefs[0].tag, "nl");
    }

    #[test]
    fn test_preferred_locale_exact() {
        assert_eq!(preferred_locale("fr", &locales()), Some("fr".to_string()));
        assert_eq!(preferred_locale("FR", &locales()), Some("fr".to_string()));
    }

    #[test]
    fn test_preferred_locale_primary_subtag() {
        assert_eq!(
            preferred_locale("fr-CH, en;q=0.5", &locales()),
            Some("fr".to_string())
        );
    }

    #[test]
    fn test_no_overlap() {
        assert_eq!(preferred_locale("de, ja;q=0.8", &locales()), None);
    }

    #[test]
    fn test_garbage_header_is_none_not_a_fault() {
        assert_eq!(preferred_locale(";;;,,q=", &locales()), None);
        assert_eq!(preferred_locale("", &locales()), None);
    }
}
