//! Identifier casing predicates and converters.
//!
//! Identifiers are split into words on underscores and lower-to-upper
//! transitions; digits stay attached to the preceding word.

/// Target identifier style for a declaration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStyle {
    /// `camelCase`
    Camel,
    /// `PascalCase`
    Pascal,
    /// `snake_case`
    Snake,
}

impl CaseStyle {
    /// Whether `name` already conforms to this style.
    pub fn matches(self, name: &str) -> bool {
        match self {
            CaseStyle::Camel => is_camel_case(name),
            CaseStyle::Pascal => is_pascal_case(name),
            CaseStyle::Snake => is_snake_case(name),
        }
    }

    /// Convert `name` to this style.
    pub fn convert(self, name: &str) -> String {
        let words = split_words(name);
        match self {
            CaseStyle::Camel => to_camel(&words),
            CaseStyle::Pascal => to_pascal(&words),
            CaseStyle::Snake => words.join("_"),
        }
    }

    /// Rule identifier suffix for findings.
    pub fn rule_name(self) -> &'static str {
        match self {
            CaseStyle::Camel => "camel-case",
            CaseStyle::Pascal => "pascal-case",
            CaseStyle::Snake => "snake-case",
        }
    }
}

/// `snake_case`: lowercase letters, digits, and underscores only.
pub fn is_snake_case(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// `camelCase`: starts lowercase, no underscores.
pub fn is_camel_case(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {}
        _ => return false,
    }
    name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// `PascalCase`: starts uppercase, no underscores.
pub fn is_pascal_case(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {}
        _ => return false,
    }
    name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Constants like `MAX_RETRIES` are exempt from casing checks.
pub fn is_screaming_snake_case(name: &str) -> bool {
    !name.is_empty()
        && name.chars().any(|c| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Split an identifier into lowercase words.
fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower_or_digit = false;

    for c in name.chars() {
        if c == '_' {
            if !current.is_empty() {
                words.push(current.clone());
                current.clear();
            }
            prev_lower_or_digit = false;
        } else if c.is_ascii_uppercase() && prev_lower_or_digit {
            words.push(current.clone());
            current.clear();
            current.push(c.to_ascii_lowercase());
            prev_lower_or_digit = false;
        } else {
            current.push(c.to_ascii_lowercase());
            prev_lower_or_digit = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn to_camel(words: &[String]) -> String {
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

fn to_pascal(words: &[String]) -> String {
    words.iter().map(|w| capitalize(w)).collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
