//! Search string parsing.
//!
//! A search string is a list of whitespace separated terms. Each term is
//! either free text or `command:value`. Terms may be prefixed with `!` to
//! negate them and `+` to match exactly. Double quotes group a phrase.

use crate::shared::translation::{IS_COMMAND_KEY, Translator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connective {
    #[default]
    And,
    Or,
}

/// One parsed search term.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchFilter {
    /// Localized command label, empty for free text.
    pub command: String,
    pub string: String,
    pub strict: bool,
    pub not: bool,
}

impl SearchFilter {
    pub fn text(string: impl Into<String>) -> Self {
        Self {
            string: string.into(),
            ..Self::default()
        }
    }

    pub fn command(command: impl Into<String>, string: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            string: string.into(),
            ..Self::default()
        }
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn negated(mut self) -> Self {
        self.not = true;
        self
    }

    pub fn is_command(&self) -> bool {
        !self.command.is_empty()
    }

    /// Value for a LIKE comparison: wrapped in `%` unless strict.
    pub fn like_value(&self) -> String {
        if self.strict {
            self.string.clone()
        } else {
            format!("%{}%", self.string)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    pub connective: Connective,
    pub filter: SearchFilter,
}

pub fn parse(input: &str, translator: &Translator) -> Vec<SearchTerm> {
    let is_keyword = translator.trans(IS_COMMAND_KEY);
    let mut terms = Vec::new();
    let mut connective = Connective::And;

    for token in tokenize(input) {
        if !token.quoted {
            if token.text.eq_ignore_ascii_case("or") {
                connective = Connective::Or;
                continue;
            }
            if token.text.eq_ignore_ascii_case("and") {
                continue;
            }
        }

        let filter = parse_filter(token, is_keyword);
        if filter.string.is_empty() && filter.command.is_empty() {
            continue;
        }

        terms.push(SearchTerm {
            connective,
            filter,
        });
        connective = Connective::And;
    }

    terms
}

struct Token {
    text: String,
    quoted: bool,
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_quotes = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    tokens.push(Token {
                        text: std::mem::take(&mut current),
                        quoted,
                    });
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() || quoted {
        tokens.push(Token {
            text: current,
            quoted,
        });
    }

    tokens
}

fn parse_filter(token: Token, is_keyword: &str) -> SearchFilter {
    let mut filter = SearchFilter::default();
    let mut text = token.text.as_str();

    loop {
        if let Some(rest) = text.strip_prefix('!') {
            filter.not = true;
            text = rest;
        } else if let Some(rest) = text.strip_prefix('+') {
            filter.strict = true;
            text = rest;
        } else {
            break;
        }
    }

    match text.split_once(':') {
        Some((command, value)) if !command.is_empty() && !command.contains(' ') => {
            filter.string = value.to_string();
            filter.command = if command == is_keyword {
                format!("{}:{}", command, value)
            } else {
                command.to_string()
            };
        }
        _ => filter.string = text.to_string(),
    }

    filter
}
