//! Conversions between typed preference values and their stored strings.

/// Values the store can persist.
pub trait ToPreference {
    /// String written to the file.
    fn to_preference(&self) -> String;
}

/// Values the store can read back.
pub trait FromPreference: Sized {
    /// `None` when the stored string does not parse as `Self`.
    fn from_preference(raw: &str) -> Option<Self>;
}

impl ToPreference for str {
    fn to_preference(&self) -> String {
        self.to_string()
    }
}

impl ToPreference for String {
    fn to_preference(&self) -> String {
        self.clone()
    }
}

impl ToPreference for bool {
    fn to_preference(&self) -> String {
        self.to_string()
    }
}

impl<T: ToPreference + ?Sized> ToPreference for &T {
    fn to_preference(&self) -> String {
        (**self).to_preference()
    }
}

impl FromPreference for String {
    fn from_preference(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl FromPreference for bool {
    fn from_preference(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            Some(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}
