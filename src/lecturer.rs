//! Lecturer code resolution: builds the code → display-name directory and
//! maps composite teacher-code strings onto the two output slots.

use std::collections::BTreeMap;

use crate::text;

/// Lookup table from normalized uppercase lecturer code to display name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LecturerDirectory {
    entries: BTreeMap<String, String>,
}

/// Outcome of resolving one composite teacher-code string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedTeachers {
    /// First entry, or "" when the row names no teachers.
    pub primary: String,
    /// Second entry ("Teacher1"), or "".
    pub secondary: String,
    /// Entries beyond the second, in input order.
    pub overflow: Vec<String>,
    /// Codes missing from the directory, kept verbatim.
    pub unknown: Vec<String>,
}

impl LecturerDirectory {
    /// Builds the directory from (Code, User name) pairs. Both sides are
    /// whitespace-normalized, the code is uppercased, pairs with a blank
    /// side are dropped, and the first occurrence of a code wins.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut entries = BTreeMap::new();
        for (code, name) in rows {
            let code = text::clean(&code).to_uppercase();
            let name = text::clean(&name);
            if code.is_empty() || name.is_empty() {
                continue;
            }
            entries.entry(code).or_insert(name);
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a single code, ignoring case and surrounding whitespace.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries
            .get(&code.trim().to_uppercase())
            .map(String::as_str)
    }

    /// Splits a `+`-joined code string and resolves each token. Tokens
    /// found in the directory become display names; the rest stay verbatim
    /// and are recorded as unknown. Entry order is preserved from the
    /// input; nothing is deduplicated.
    pub fn resolve(&self, raw_teachers: &str) -> ResolvedTeachers {
        let mut mapped = Vec::new();
        let mut unknown = Vec::new();

        for token in raw_teachers.split('+') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match self.entries.get(&token.to_uppercase()) {
                Some(name) => mapped.push(name.clone()),
                None => {
                    unknown.push(token.to_string());
                    mapped.push(token.to_string());
                }
            }
        }

        let mut mapped = mapped.into_iter();
        ResolvedTeachers {
            primary: mapped.next().unwrap_or_default(),
            secondary: mapped.next().unwrap_or_default(),
            overflow: mapped.collect(),
            unknown,
        }
    }
}
