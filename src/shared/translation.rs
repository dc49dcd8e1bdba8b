//! Localized labels for search commands.
//!
//! English labels are built in. `fr` and `de` ship as JSON catalogs, and a
//! deployment can point at a directory of `<locale>.json` files to add or
//! override locales. Catalogs map translation keys to labels and are
//! layered over English, so a partial catalog is valid.

use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;
use thiserror::Error;

/// Key of the keyword that prefixes flag commands such as `is:admin`.
pub const IS_COMMAND_KEY: &str = "core.searchcommand.is";

const ENGLISH: &[(&str, &str)] = &[
    (IS_COMMAND_KEY, "is"),
    ("core.searchcommand.name", "name"),
    ("user.searchcommand.isadmin", "is:admin"),
];

const BUNDLED: &[(&str, &str)] = &[
    ("fr", include_str!("catalogs/fr.json")),
    ("de", include_str!("catalogs/de.json")),
];

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read label catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid label catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

fn parse_catalog(source: &str) -> Result<HashMap<String, String>, serde_json::Error> {
    serde_json::from_str(source)
}

/// Maps translation keys to the labels of one locale.
#[derive(Debug, Clone)]
pub struct Translator {
    locale: String,
    catalog: HashMap<String, String>,
}

impl Translator {
    pub fn english() -> Self {
        Self {
            locale: "en".to_string(),
            catalog: ENGLISH
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Builds the translator for `locale` from the bundled catalogs. Locales
    /// without a catalog fall back to English and report `en`.
    pub fn for_locale(locale: &str) -> Self {
        if locale == "en" {
            return Self::english();
        }

        let Some((_, source)) = BUNDLED.iter().find(|(name, _)| *name == locale) else {
            tracing::debug!(locale, "no catalog for locale, using english labels");
            return Self::english();
        };

        match parse_catalog(source) {
            Ok(entries) => Self::english().with_entries(entries).with_locale(locale),
            Err(e) => {
                tracing::warn!(locale, "bundled catalog is invalid: {}", e);
                Self::english()
            }
        }
    }

    /// Loads `<dir>/<locale>.json` over the bundled labels for `locale`.
    /// Without such a file this is [`Translator::for_locale`].
    pub fn from_dir(dir: &Path, locale: &str) -> Result<Self, CatalogError> {
        let path = dir.join(format!("{}.json", locale));
        if !path.is_file() {
            return Ok(Self::for_locale(locale));
        }

        let display_path = path.display().to_string();
        let source = std::fs::read_to_string(&path).map_err(|source| CatalogError::Read {
            path: display_path.clone(),
            source,
        })?;
        let entries = parse_catalog(&source).map_err(|source| CatalogError::Parse {
            path: display_path.clone(),
            source,
        })?;

        tracing::debug!(locale, path = %display_path, entries = entries.len(), "loaded label catalog");
        Ok(Self::for_locale(locale)
            .with_entries(entries)
            .with_locale(locale))
    }

    fn with_locale(mut self, locale: &str) -> Self {
        self.locale = locale.to_string();
        self
    }

    pub fn with_entries<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.catalog
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Returns the label for `key`, or the key itself when it is missing.
    pub fn trans<'a>(&'a self, key: &'a str) -> &'a str {
        self.catalog.get(key).map(String::as_str).unwrap_or(key)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::english()
    }
}

/// Lookup from localized command labels to a command enum.
#[derive(Debug, Clone)]
pub struct CommandTable<C> {
    labels: HashMap<String, C>,
}

impl<C: Copy + Eq + Hash> CommandTable<C> {
    pub fn new(translator: &Translator, commands: &[C], key: impl Fn(C) -> &'static str) -> Self {
        let labels = commands
            .iter()
            .map(|&command| (translator.trans(key(command)).to_string(), command))
            .collect();
        Self { labels }
    }

    pub fn resolve(&self, label: &str) -> Option<C> {
        self.labels.get(label).copied()
    }
}
