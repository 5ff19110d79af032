//! Translation lookup for every user-facing message.
//!
//! Keys and `{{param}}` placeholders follow i18next resource conventions, so the
//! same resource files the hosting page ships can be loaded with [`Catalog`].

mod catalog;
pub mod messages;

pub use catalog::Catalog;

/// Named values substituted into a message template.
pub type Params<'a> = &'a [(&'a str, String)];

pub trait Translator: Send + Sync {
    /// Looks up `key`, falling back to `default_text`, and interpolates `params`.
    fn translate(&self, key: &str, params: Params<'_>, default_text: &str) -> String;
}

/// Translator without resources: always renders the fallback text.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultText;

impl Translator for DefaultText {
    fn translate(&self, _key: &str, params: Params<'_>, default_text: &str) -> String {
        interpolate(default_text, params)
    }
}

/// Replaces each `{{name}}` with its value. Unknown placeholders are kept as is.
pub fn interpolate(template: &str, params: Params<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = after[..end].trim();
                match params.iter().find(|(key, _)| *key == name) {
                    Some((_, value)) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
