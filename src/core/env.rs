//! Shell variables.
//!
//! A case-sensitive name → value map seeded with the login defaults, plus
//! `$NAME` / `${NAME}` expansion. Unknown names expand to themselves.

use std::collections::{BTreeMap, HashMap};

use crate::config::DEFAULT_ENV;

/// Check if a variable name is valid.
///
/// Valid names must:
/// - Not be empty
/// - Start with a letter or underscore
/// - Contain only alphanumeric characters and underscores
pub fn is_valid_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[derive(Clone, Debug)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Environment with HOME, USER, PATH, PWD, SHELL, TERM and HOSTNAME set.
    pub fn new() -> Self {
        let vars = DEFAULT_ENV
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { vars }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Returns `true` if the variable existed.
    pub fn unset(&mut self, name: &str) -> bool {
        self.vars.remove(name).is_some()
    }

    pub fn has(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Sorted snapshot of every variable.
    pub fn all(&self) -> BTreeMap<String, String> {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn pwd(&self) -> &str {
        self.get("PWD").unwrap_or("/")
    }

    pub fn set_pwd(&mut self, path: impl Into<String>) {
        self.set("PWD", path);
    }

    pub fn home(&self) -> &str {
        self.get("HOME").unwrap_or("/")
    }

    pub fn user(&self) -> &str {
        self.get("USER").unwrap_or("")
    }

    /// PATH split on `:`, empty segments dropped.
    pub fn path(&self) -> Vec<String> {
        self.get("PATH")
            .unwrap_or("")
            .split(':')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Replace `$NAME` and `${NAME}` with their values.
    ///
    /// References to unset variables, a bare `$`, and an unclosed `${` are
    /// left exactly as written.
    pub fn expand(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(braced) = after.strip_prefix('{') {
                match braced.find('}') {
                    Some(end) if end > 0 => {
                        let name = &braced[..end];
                        match self.get(name) {
                            Some(value) => out.push_str(value),
                            None => out.push_str(&rest[pos..pos + end + 3]),
                        }
                        rest = &braced[end + 1..];
                    }
                    _ => {
                        out.push('$');
                        rest = after;
                    }
                }
                continue;
            }

            let name_len = leading_name_len(after);
            if name_len == 0 {
                out.push('$');
                rest = after;
                continue;
            }
            let name = &after[..name_len];
            match self.get(name) {
                Some(value) => out.push_str(value),
                None => {
                    out.push('$');
                    out.push_str(name);
                }
            }
            rest = &after[name_len..];
        }

        out.push_str(rest);
        out
    }
}

/// Length of the `[A-Za-z_][A-Za-z0-9_]*` prefix of `s`.
fn leading_name_len(s: &str) -> usize {
    let mut len = 0;
    for (i, c) in s.char_indices() {
        let ok = if i == 0 {
            c.is_ascii_alphabetic() || c == '_'
        } else {
            c.is_ascii_alphanumeric() || c == '_'
        };
        if !ok {
            break;
        }
        len = i + c.len_utf8();
    }
    len
}
