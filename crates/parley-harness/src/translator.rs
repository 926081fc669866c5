//! Translation stand-ins for the simulated server.
//!
//! The real server calls out to a language model. The simulation only needs
//! the output to be recognisably different per target language.

use parley_proto::Language;

/// Translates message text between languages.
pub trait Translator: Send {
    /// Translate `text` written in `from` into `to`.
    ///
    /// Failures fall back to the original text, as the real server does.
    fn translate(&self, text: &str, from: Language, to: Language) -> String;
}

/// Prefixes the target language code: `"[es] hello"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaggingTranslator;

impl Translator for TaggingTranslator {
    fn translate(&self, text: &str, _from: Language, to: Language) -> String {
        format!("[{}] {text}", to.code())
    }
}

/// Always fails, so every message comes back untranslated.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableTranslator;

impl Translator for UnavailableTranslator {
    fn translate(&self, text: &str, _from: Language, _to: Language) -> String {
        text.to_string()
    }
}
