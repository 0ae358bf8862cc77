//! Character-level restriction policies for text inputs.
//!
//! [`Restriction::filter`] is the authoritative sanitizer: it runs on every
//! change and on paste. [`Restriction::allows_key`] is the keystroke gate and
//! only improves typing feedback.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Enumerated input filtering policy.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum RestrictionKind {
    Numeric,
    Alphabetic,
    Alphanumeric,
    NoSpaces,
    Uppercase,
    Lowercase,
    Email,
    #[default]
    Custom,
}

/// Keys that are never vetoed by the gate.
pub const CONTROL_KEYS: &[&str] = &[
    "Backspace",
    "Delete",
    "Tab",
    "Escape",
    "Enter",
    "ArrowLeft",
    "ArrowRight",
    "ArrowUp",
    "ArrowDown",
    "Home",
    "End",
];

/// Keyboard event as reported by the browser.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyPress {
    pub key: String,
    pub ctrl_key: bool,
    pub meta_key: bool,
    pub alt_key: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }

    /// The printable character carried by this key, if any.
    fn printable(&self) -> Option<char> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

/// Result of filtering a raw value.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct Filtered {
    pub value: String,
    /// Characters dropped by the filter, in input order.
    pub removed: String,
}

/// A restriction kind plus the custom pattern/allow-list it may need.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Restriction {
    pub kind: RestrictionKind,
    /// Single-character pattern for `custom`, e.g. `[A-Z0-9/]`.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Explicit allow-list for `custom`.
    #[serde(default)]
    pub allowed_chars: Option<String>,
}

enum CharPolicy {
    Keep(Box<dyn Fn(char) -> bool>),
    Map(fn(&str) -> String),
    Identity,
}

impl Restriction {
    pub fn new(kind: RestrictionKind) -> Self {
        Self {
            kind,
            pattern: None,
            allowed_chars: None,
        }
    }

    pub fn custom_pattern(pattern: impl Into<String>) -> Self {
        Self {
            kind: RestrictionKind::Custom,
            pattern: Some(pattern.into()),
            allowed_chars: None,
        }
    }

    pub fn custom_allow_list(allowed: impl Into<String>) -> Self {
        Self {
            kind: RestrictionKind::Custom,
            pattern: None,
            allowed_chars: Some(allowed.into()),
        }
    }

    fn policy(&self) -> CharPolicy {
        match self.kind {
            RestrictionKind::Numeric => CharPolicy::Keep(Box::new(|c| c.is_ascii_digit())),
            RestrictionKind::Alphabetic => {
                CharPolicy::Keep(Box::new(|c| c.is_ascii_alphabetic() || c == ' '))
            }
            RestrictionKind::Alphanumeric => {
                CharPolicy::Keep(Box::new(|c| c.is_ascii_alphanumeric()))
            }
            RestrictionKind::NoSpaces => CharPolicy::Keep(Box::new(|c| !c.is_whitespace())),
            RestrictionKind::Uppercase => CharPolicy::Map(str::to_uppercase),
            RestrictionKind::Lowercase => CharPolicy::Map(str::to_lowercase),
            RestrictionKind::Email => CharPolicy::Keep(Box::new(|c| {
                c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '_' | '+' | '-')
            })),
            RestrictionKind::Custom => self.custom_policy(),
        }
    }

    fn custom_policy(&self) -> CharPolicy {
        if let Some(allowed) = self.allowed_chars.as_deref().filter(|a| !a.is_empty()) {
            let allowed: Vec<char> = allowed.chars().collect();
            return CharPolicy::Keep(Box::new(move |c| allowed.contains(&c)));
        }

        if let Some(pattern) = self.pattern.as_deref().filter(|p| !p.is_empty()) {
            match Regex::new(&format!("^(?:{pattern})$")) {
                Ok(re) => {
                    return CharPolicy::Keep(Box::new(move |c| {
                        let mut buf = [0u8; 4];
                        re.is_match(c.encode_utf8(&mut buf))
                    }));
                }
                Err(err) => {
                    log::warn!("Ignoring invalid custom restriction pattern `{pattern}`: {err}");
                }
            }
        }

        CharPolicy::Identity
    }

    /// Filters `value` down to the characters this restriction allows.
    pub fn filter(&self, value: &str) -> Filtered {
        match self.policy() {
            CharPolicy::Keep(keep) => {
                let (kept, removed): (String, String) = value.chars().partition(|c| keep(*c));
                Filtered {
                    value: kept,
                    removed,
                }
            }
            CharPolicy::Map(map) => Filtered {
                value: map(value),
                removed: String::new(),
            },
            CharPolicy::Identity => Filtered {
                value: value.to_string(),
                removed: String::new(),
            },
        }
    }

    /// Filters `value`, reporting removed characters to `on_removed` when the
    /// input contained anything disallowed.
    pub fn filter_with(&self, value: &str, mut on_removed: impl FnMut(&str)) -> String {
        let filtered = self.filter(value);
        if !filtered.removed.is_empty() {
            on_removed(&filtered.removed);
        }
        filtered.value
    }

    /// Decides whether a keystroke may reach the input value.
    pub fn allows_key(&self, event: &KeyPress) -> bool {
        if event.ctrl_key || event.meta_key || CONTROL_KEYS.contains(&event.key.as_str()) {
            return true;
        }

        let Some(c) = event.printable() else {
            // Named non-printing keys (Shift, F5, ...) never alter the value.
            return true;
        };

        // A custom restriction only gates keys through its allow-list; the
        // pattern is applied by `filter` alone.
        if self.kind == RestrictionKind::Custom && !self.has_allow_list() {
            return true;
        }

        match self.policy() {
            CharPolicy::Keep(keep) => keep(c),
            CharPolicy::Map(_) | CharPolicy::Identity => true,
        }
    }

    fn has_allow_list(&self) -> bool {
        self.allowed_chars.as_deref().is_some_and(|a| !a.is_empty())
    }
}
