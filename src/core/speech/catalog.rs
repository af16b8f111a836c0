//! Voice catalog filtering.
//!
//! The picker offers exactly the platform voices whose language code equals
//! the current locale code. The scan happens once at startup; the resulting
//! option set never changes while the app runs.

use super::types::{PlatformVoice, RateBounds, Result, VoiceOption};

/// Source of platform voices and the locale they are filtered against.
///
/// The UI and the filter only ever see this seam; the concrete platform
/// binding lives behind it.
#[cfg_attr(test, mockall::automock)]
pub trait VoiceCatalogProvider {
    /// Every installed voice, in the platform's reported order.
    fn all_voices(&self) -> Result<Vec<PlatformVoice>>;

    /// The locale code voices are matched against (e.g. "en-US").
    fn current_locale(&self) -> String;
}

/// Builds the picker options: keeps voices whose language code is
/// string-equal to the current locale (no prefix or case fallback),
/// preserving platform order and labeling each `"{name} ({language})"`.
///
/// An empty result is valid; the picker simply offers nothing.
pub fn available_voice_options(provider: &dyn VoiceCatalogProvider) -> Result<Vec<VoiceOption>> {
    let locale = provider.current_locale();
    let options = provider
        .all_voices()?
        .into_iter()
        .filter(|voice| voice.language == locale)
        .map(VoiceOption::new)
        .collect();
    Ok(options)
}

/// Provider over a voice list that has already been collected. The platform
/// worker scans once and filters through this; tests feed it fixtures.
#[derive(Debug, Clone)]
pub struct ScannedCatalog {
    pub voices: Vec<PlatformVoice>,
    pub locale: String,
}

impl VoiceCatalogProvider for ScannedCatalog {
    fn all_voices(&self) -> Result<Vec<PlatformVoice>> {
        Ok(self.voices.clone())
    }

    fn current_locale(&self) -> String {
        self.locale.clone()
    }
}

/// Locale code for filtering, as the OS reports it.
///
/// `sys-locale` already normalizes to BCP-47 on most platforms; the POSIX
/// `LANG` fallback covers stripped-down environments. The final "en-US"
/// default keeps the filter deterministic when nothing is reported.
pub fn detect_locale() -> String {
    sys_locale::get_locale()
        .or_else(|| std::env::var("LANG").ok().and_then(normalize_posix_locale))
        .unwrap_or_else(|| "en-US".to_string())
}

/// Turns "en_US.UTF-8" style POSIX locale strings into "en-US".
fn normalize_posix_locale(raw: String) -> Option<String> {
    let tag = raw.split(['.', '@']).next().unwrap_or("").replace('_', "-");
    if tag.is_empty() || tag == "C" || tag == "POSIX" {
        None
    } else {
        Some(tag)
    }
}

/// What the backend reports once its startup scan finishes.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    /// Filtered, labeled picker options in platform order
    pub options: Vec<VoiceOption>,
    /// Locale code the options were filtered against
    pub locale: String,
    /// Speed slider range reported by the engine
    pub rate: RateBounds,
}

impl CatalogSnapshot {
    /// Snapshot for a backend with nothing to offer (engine missing or
    /// scan failed). The picker stays empty and Speak stays inert.
    pub fn empty(locale: String) -> Self {
        Self { options: Vec::new(), locale, rate: RateBounds::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn voice(id: &str, name: &str, language: &str) -> PlatformVoice {
        PlatformVoice {
            id: id.to_string(),
            name: name.to_string(),
            language: language.to_string(),
        }
    }

    fn catalog(locale: &str, voices: Vec<PlatformVoice>) -> ScannedCatalog {
        ScannedCatalog { voices, locale: locale.to_string() }
    }

    #[test]
    fn keeps_only_exact_locale_matches() {
        let provider = catalog(
            "en-US",
            vec![
                voice("a", "Alice", "en-US"),
                voice("b", "Bob", "en-GB"),
                voice("c", "Carol", "en-US"),
                voice("d", "Dieter", "de-DE"),
            ],
        );
        let options = available_voice_options(&provider).unwrap();
        let ids: Vec<&str> = options.iter().map(|o| o.handle.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert!(options.iter().all(|o| o.voice.language == "en-US"));
    }

    #[rstest]
    #[case("en", "en-US")] // bare language does not match a region-qualified code
    #[case("en-US", "en")] // and the reverse
    #[case("en-us", "en-US")] // no case folding
    #[case("EN-US", "en-US")]
    fn no_prefix_or_case_fallback(#[case] locale: &str, #[case] voice_lang: &str) {
        let provider = catalog(locale, vec![voice("a", "Alice", voice_lang)]);
        let options = available_voice_options(&provider).unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn preserves_platform_order_and_labels() {
        let provider = catalog(
            "fr-FR",
            vec![
                voice("z", "Zoé", "fr-FR"),
                voice("m", "Marc", "fr-FR"),
                voice("a", "Amélie", "fr-FR"),
            ],
        );
        let options = available_voice_options(&provider).unwrap();
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["Zoé (fr-FR)", "Marc (fr-FR)", "Amélie (fr-FR)"]);
    }

    #[test]
    fn empty_catalog_is_valid() {
        let provider = catalog("en-US", vec![]);
        assert!(available_voice_options(&provider).unwrap().is_empty());

        // No voice for the locale either
        let provider = catalog("ja-JP", vec![voice("a", "Alice", "en-US")]);
        assert!(available_voice_options(&provider).unwrap().is_empty());
    }

    #[rstest]
    #[case("en_US.UTF-8", Some("en-US"))]
    #[case("de_DE", Some("de-DE"))]
    #[case("sr_RS@latin", Some("sr-RS"))]
    #[case("C", None)]
    #[case("POSIX", None)]
    #[case("", None)]
    fn posix_locale_normalization(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            normalize_posix_locale(raw.to_string()).as_deref(),
            expected
        );
    }

    #[test]
    fn mocked_provider_is_queried_once_each() {
        let mut provider = MockVoiceCatalogProvider::new();
        provider
            .expect_current_locale()
            .times(1)
            .return_const("en-US".to_string());
        provider
            .expect_all_voices()
            .times(1)
            .returning(|| Ok(vec![]));
        assert!(available_voice_options(&provider).unwrap().is_empty());
    }

    #[test]
    fn enumeration_failure_propagates() {
        use crate::core::speech::SpeechError;

        let mut provider = MockVoiceCatalogProvider::new();
        provider
            .expect_current_locale()
            .return_const("en-US".to_string());
        provider
            .expect_all_voices()
            .returning(|| Err(SpeechError::Enumeration("engine hung up".to_string())));

        let err = available_voice_options(&provider).unwrap_err();
        assert!(matches!(err, SpeechError::Enumeration(_)));
    }

    fn lang_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec![
            "en-US".to_string(),
            "en-GB".to_string(),
            "fr-FR".to_string(),
            "de-DE".to_string(),
            "ja-JP".to_string(),
        ])
    }

    proptest! {
        #[test]
        fn filter_is_exact_and_order_preserving(
            langs in prop::collection::vec(lang_strategy(), 0..24),
            locale in lang_strategy(),
        ) {
            let voices: Vec<PlatformVoice> = langs
                .iter()
                .enumerate()
                .map(|(i, lang)| voice(&format!("v{i}"), &format!("Voice {i}"), lang))
                .collect();
            let expected_ids: Vec<String> = voices
                .iter()
                .filter(|v| v.language == locale)
                .map(|v| v.id.clone())
                .collect();

            let provider = catalog(&locale, voices);
            let options = available_voice_options(&provider).unwrap();

            let got_ids: Vec<String> =
                options.iter().map(|o| o.handle.as_str().to_string()).collect();
            prop_assert_eq!(got_ids, expected_ids);
            for opt in &options {
                prop_assert_eq!(&opt.voice.language, &locale);
                prop_assert_eq!(
                    opt.label.clone(),
                    format!("{} ({})", opt.voice.name, opt.voice.language)
                );
            }
        }
    }
}
