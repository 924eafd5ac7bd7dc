//! Message lookup for everything the login core shows to the user.
//!
//! The core only names messages ([`MessageKey`]) and supplies positional
//! arguments; the text comes from catalogs owned by the packaging side.
//! [`CatalogLocalization`] reads `<lang>.lang` files in the preference line
//! format (`key=value`, `{0}` placeholders).

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::preferences::codec;

/// Every message the login core can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// User number left blank.
    ErrorUserRequired,
    /// Password left blank.
    ErrorPasswordRequired,
    /// `{0}`: minimum length.
    ErrorPasswordMinLength,
    /// Office code left blank.
    ErrorOfficeRequired,
    /// Unknown user number.
    ErrorUserNotFound,
    /// `{0}`: attempts left before lockout.
    ErrorPasswordIncorrect,
    /// Account blocked on the server side.
    ErrorAccountBlocked,
    /// `{0}`: lockout minutes. Shown when the local lockout starts.
    ErrorUserBlocked,
    /// `{0}`: lockout minutes left. Shown on every countdown tick.
    ErrorUserBlockedRemaining,
    /// Unknown office code.
    ErrorOfficeInvalid,
    /// User may not sign in to that office.
    ErrorNoPermission,
    /// Company disabled.
    ErrorCompanyInactive,
    /// Device not allowed.
    ErrorDeviceUnauthorized,
    /// Any other rejection.
    ErrorGeneric,
    /// Service unreachable or timed out.
    ErrorConnection,
    /// Recovery requested with a blank user number.
    RecoveryUserRequiredMessage,
    /// Recovery mail sent.
    RecoverySuccessMessage,
    /// Recovery failed.
    RecoveryErrorGeneric,
}

impl MessageKey {
    /// Key used in the catalog files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ErrorUserRequired => "Error_UserRequired",
            Self::ErrorPasswordRequired => "Error_PasswordRequired",
            Self::ErrorPasswordMinLength => "Error_PasswordMinLength",
            Self::ErrorOfficeRequired => "Error_OfficeRequired",
            Self::ErrorUserNotFound => "Error_UserNotFound",
            Self::ErrorPasswordIncorrect => "Error_PasswordIncorrect",
            Self::ErrorAccountBlocked => "Error_AccountBlocked",
            Self::ErrorUserBlocked => "Error_UserBlocked",
            Self::ErrorUserBlockedRemaining => "Error_UserBlockedRemaining",
            Self::ErrorOfficeInvalid => "Error_OfficeInvalid",
            Self::ErrorNoPermission => "Error_NoPermission",
            Self::ErrorCompanyInactive => "Error_CompanyInactive",
            Self::ErrorDeviceUnauthorized => "Error_DeviceUnauthorized",
            Self::ErrorGeneric => "Error_Generic",
            Self::ErrorConnection => "Error_Connection",
            Self::RecoveryUserRequiredMessage => "Recovery_UserRequiredMessage",
            Self::RecoverySuccessMessage => "Recovery_SuccessMessage",
            Self::RecoveryErrorGeneric => "Recovery_ErrorGeneric",
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Localization collaborator used by the controller.
pub trait Localization: Send + Sync {
    /// Text for `key` with `{n}` placeholders replaced by `args[n]`.
    fn format(&self, key: MessageKey, args: &[String]) -> String;

    /// Text for a message without arguments.
    fn get(&self, key: MessageKey) -> String {
        self.format(key, &[])
    }

    /// Switch to the next configured language.
    fn toggle_language(&self);

    /// Active language code.
    fn language(&self) -> String;
}

/// Localization backed by `<lang>.lang` catalog files.
///
/// Missing catalogs and missing keys are not errors: the key itself is
/// rendered, followed by the arguments in parentheses.
#[derive(Debug)]
pub struct CatalogLocalization {
    languages: Vec<String>,
    catalogs: HashMap<String, HashMap<String, String>>,
    active: AtomicUsize,
}

impl CatalogLocalization {
    /// Read `<catalog_dir>/<lang>.lang` for each language. Unreadable
    /// catalogs are logged and skipped. The first language starts active.
    pub fn load(catalog_dir: Option<&Path>, languages: &[String]) -> Self {
        let mut catalogs = HashMap::new();
        if let Some(dir) = catalog_dir {
            for lang in languages {
                let path = dir.join(format!("{lang}.lang"));
                match std::fs::read_to_string(&path) {
                    Ok(contents) => {
                        let entries: HashMap<_, _> =
                            codec::decode_all(&contents).collect();
                        log::debug!(
                            "[Localization] Loaded {} messages for {lang}",
                            entries.len()
                        );
                        catalogs.insert(lang.clone(), entries);
                    }
                    Err(err) => log::warn!(
                        "[Localization] No catalog for {lang} at {}: {err}",
                        path.display()
                    ),
                }
            }
        }
        Self::from_catalogs(languages.to_vec(), catalogs)
    }

    /// Build from catalogs already in memory, keyed by language.
    pub fn from_catalogs(
        languages: Vec<String>,
        catalogs: HashMap<String, HashMap<String, String>>,
    ) -> Self {
        Self {
            languages,
            catalogs,
            active: AtomicUsize::new(0),
        }
    }

    /// No catalogs at all; every message renders as its key.
    pub fn keys_only() -> Self {
        Self::from_catalogs(vec!["keys".to_string()], HashMap::new())
    }

    fn active_language(&self) -> Option<&str> {
        if self.languages.is_empty() {
            return None;
        }
        let idx = self.active.load(Ordering::Relaxed) % self.languages.len();
        Some(self.languages[idx].as_str())
    }
}

impl Localization for CatalogLocalization {
    fn format(&self, key: MessageKey, args: &[String]) -> String {
        let template = self
            .active_language()
            .and_then(|lang| self.catalogs.get(lang))
            .and_then(|catalog| catalog.get(key.as_str()));

        match template {
            Some(template) => render(template, args),
            None if args.is_empty() => key.as_str().to_string(),
            None => format!("{}({})", key.as_str(), args.join(", ")),
        }
    }

    fn toggle_language(&self) {
        self.active.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "[Localization] Active language is now {}",
            self.language()
        );
    }

    fn language(&self) -> String {
        self.active_language().unwrap_or_default().to_string()
    }
}

/// Replace `{0}`, `{1}`, ... in `template` with the matching argument.
///
/// The template is scanned once, so placeholders that appear inside an
/// argument are copied through untouched. Indices with no argument stay
/// literal.
pub fn render(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let arg = if digits > 0 && after[digits..].starts_with('}') {
            after[..digits]
                .parse::<usize>()
                .ok()
                .and_then(|idx| args.get(idx))
        } else {
            None
        };

        match arg {
            Some(arg) => {
                out.push_str(arg);
                rest = &after[digits + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bilingual() -> CatalogLocalization {
        let es = HashMap::from([(
            "Error_PasswordIncorrect".to_string(),
            "Contraseña incorrecta. Quedan {0} intentos".to_string(),
        )]);
        let en = HashMap::from([(
            "Error_PasswordIncorrect".to_string(),
            "Incorrect password. {0} attempts left".to_string(),
        )]);
        CatalogLocalization::from_catalogs(
            vec!["es".into(), "en".into()],
            HashMap::from([("es".into(), es), ("en".into(), en)]),
        )
    }

    #[test]
    fn placeholders_are_filled() {
        let loc = bilingual();
        assert_eq!(
            loc.format(MessageKey::ErrorPasswordIncorrect, &["3".into()]),
            "Contraseña incorrecta. Quedan 3 intentos"
        );
    }

    #[test]
    fn toggle_cycles_languages() {
        let loc = bilingual();
        assert_eq!(loc.language(), "es");
        loc.toggle_language();
        assert_eq!(loc.language(), "en");
        assert_eq!(
            loc.format(MessageKey::ErrorPasswordIncorrect, &["1".into()]),
            "Incorrect password. 1 attempts left"
        );
        loc.toggle_language();
        assert_eq!(loc.language(), "es");
    }

    #[test]
    fn arguments_are_not_rescanned_for_placeholders() {
        let args = ["{1}".to_string(), "x".to_string()];
        assert_eq!(render("{0}-{1}", &args), "{1}-x");
        assert_eq!(render("{1}{0}", &args), "x{1}");
    }

    #[test]
    fn unmatched_braces_stay_literal() {
        let args = ["a".to_string()];
        assert_eq!(render("{0} {1} {x} {", &args), "a {1} {x} {");
        assert_eq!(render("{{0}}", &args), "{a}");
        assert_eq!(render("ñ{0}ñ", &args), "ñañ");
    }

    #[test]
    fn missing_messages_render_as_keys() {
        let loc = CatalogLocalization::keys_only();
        assert_eq!(loc.get(MessageKey::ErrorGeneric), "Error_Generic");
        assert_eq!(
            loc.format(MessageKey::ErrorUserBlocked, &["15".into()]),
            "Error_UserBlocked(15)"
        );
    }
}
