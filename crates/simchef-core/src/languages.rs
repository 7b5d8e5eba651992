//! Display name → canonical language code.
//!
//! The source site labels each translation with its native name ("Français",
//! "日本語"). Resolution checks configured overrides first, then the built-in
//! table by native name (exact, then case-insensitive), then by English name.

use std::collections::BTreeMap;

/// (code, native name, English name)
const LANGUAGES: &[(&str, &str, &str)] = &[
    ("ar", "العربية", "Arabic"),
    ("bg", "Български", "Bulgarian"),
    ("bn", "বাংলা", "Bengali"),
    ("ca", "Català", "Catalan"),
    ("cs", "Čeština", "Czech"),
    ("da", "Dansk", "Danish"),
    ("de", "Deutsch", "German"),
    ("el", "Ελληνικά", "Greek"),
    ("en", "English", "English"),
    ("es", "Español", "Spanish"),
    ("et", "Eesti", "Estonian"),
    ("eu", "Euskara", "Basque"),
    ("fa", "فارسی", "Persian"),
    ("fi", "Suomi", "Finnish"),
    ("fr", "Français", "French"),
    ("gl", "Galego", "Galician"),
    ("he", "עברית", "Hebrew"),
    ("hi", "हिन्दी", "Hindi"),
    ("hr", "Hrvatski", "Croatian"),
    ("hu", "Magyar", "Hungarian"),
    ("id", "Bahasa Indonesia", "Indonesian"),
    ("it", "Italiano", "Italian"),
    ("ja", "日本語", "Japanese"),
    ("ko", "한국어", "Korean"),
    ("lt", "Lietuvių", "Lithuanian"),
    ("lv", "Latviešu", "Latvian"),
    ("ms", "Bahasa Melayu", "Malay"),
    ("nl", "Nederlands", "Dutch"),
    ("no", "Norsk", "Norwegian"),
    ("pl", "Polski", "Polish"),
    ("pt", "Português", "Portuguese"),
    ("pt-BR", "Português (Brasil)", "Portuguese, Brazil"),
    ("ro", "Română", "Romanian"),
    ("ru", "Русский", "Russian"),
    ("sk", "Slovenčina", "Slovak"),
    ("sl", "Slovenščina", "Slovenian"),
    ("sr", "Српски", "Serbian"),
    ("sv", "Svenska", "Swedish"),
    ("sw", "Kiswahili", "Swahili"),
    ("ta", "தமிழ்", "Tamil"),
    ("th", "ไทย", "Thai"),
    ("tr", "Türkçe", "Turkish"),
    ("uk", "Українська", "Ukrainian"),
    ("ur", "اردو", "Urdu"),
    ("vi", "Tiếng Việt", "Vietnamese"),
    ("zh-CN", "简体中文", "Chinese, Simplified"),
    ("zh-TW", "繁體中文", "Chinese, Traditional"),
];

/// A resolved language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub code: String,
    /// The display name it was resolved from.
    pub display_name: String,
}

/// Read-only lookup table plus configured overrides.
#[derive(Debug, Clone, Default)]
pub struct LanguageTable {
    overrides: BTreeMap<String, String>,
}

impl LanguageTable {
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Resolve a scraped display name. `None` when nothing matches.
    pub fn resolve(&self, display_name: &str) -> Option<Language> {
        let name = display_name.trim();
        let code = self
            .overrides
            .get(name)
            .map(String::as_str)
            .or_else(|| {
                LANGUAGES
                    .iter()
                    .find(|(_, native, _)| *native == name)
                    .or_else(|| {
                        let lower = name.to_lowercase();
                        LANGUAGES.iter().find(|(_, native, english)| {
                            native.to_lowercase() == lower || english.to_lowercase() == lower
                        })
                    })
                    .map(|(code, _, _)| *code)
            })?;
        Some(Language {
            code: code.to_string(),
            display_name: display_name.to_string(),
        })
    }

    /// Code if resolvable, otherwise the display name itself (with a warning).
    pub fn code_or_display_name(&self, display_name: &str) -> String {
        match self.resolve(display_name) {
            Some(lang) => {
                tracing::info!("Language: {} -> {}", display_name, lang.code);
                lang.code
            }
            None => {
                tracing::warn!("Unable to find language for {}", display_name);
                display_name.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_native_names() {
        let table = LanguageTable::default();
        assert_eq!(table.resolve("English").unwrap().code, "en");
        assert_eq!(table.resolve("Français").unwrap().code, "fr");
        assert_eq!(table.resolve("Español").unwrap().code, "es");
        assert_eq!(table.resolve("日本語").unwrap().code, "ja");
    }

    #[test]
    fn resolves_case_insensitively_and_by_english_name() {
        let table = LanguageTable::default();
        assert_eq!(table.resolve("français").unwrap().code, "fr");
        assert_eq!(table.resolve("German").unwrap().code, "de");
        assert_eq!(table.resolve("  Deutsch ").unwrap().code, "de");
    }

    #[test]
    fn unknown_name_falls_back_to_display_name() {
        let table = LanguageTable::default();
        assert!(table.resolve("Klingon").is_none());
        assert_eq!(table.code_or_display_name("Klingon"), "Klingon");
    }

    #[test]
    fn overrides_win_over_builtin_table() {
        let mut overrides = BTreeMap::new();
        overrides.insert("Klingon".to_string(), "tlh".to_string());
        overrides.insert("Português".to_string(), "pt-PT".to_string());
        let table = LanguageTable::new(overrides);
        assert_eq!(table.code_or_display_name("Klingon"), "tlh");
        assert_eq!(table.resolve("Português").unwrap().code, "pt-PT");
    }
}
