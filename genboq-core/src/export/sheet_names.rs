//! Worksheet naming within Excel's limits.

/// Excel's hard limit on worksheet name length, in characters
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// Names taken by the fixed sheets, plus `History` which Excel reserves
const RESERVED: &[&str] = &["Version", "Scope", "Terms", "Summary", "History"];

/// Hands out unique worksheet names for rooms.
///
/// Uniqueness is case-insensitive, matching how Excel compares sheet names.
#[derive(Debug, Clone)]
pub struct SheetNamer {
    taken: Vec<String>,
}

impl Default for SheetNamer {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetNamer {
    pub fn new() -> Self {
        Self {
            taken: RESERVED.iter().map(|n| n.to_lowercase()).collect(),
        }
    }

    pub fn name_for(&mut self, room_name: &str) -> String {
        let base = sanitize(room_name);
        let mut candidate = base.clone();
        let mut n = 2;

        while self.is_taken(&candidate) {
            let suffix = format!(" ({n})");
            let room = MAX_SHEET_NAME_LEN - suffix.chars().count();
            let stem = trim_edges(&truncate(&base, room)).to_string();
            candidate = format!("{stem}{suffix}");
            n += 1;
        }

        self.taken.push(candidate.to_lowercase());
        candidate
    }

    fn is_taken(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.taken.iter().any(|t| *t == lower)
    }
}

/// Removes forbidden characters, strips edge apostrophes and whitespace, and truncates.
/// Never returns an empty string.
pub fn sanitize(name: &str) -> String {
    let cleaned: String = name.chars().filter(|c| !FORBIDDEN.contains(c)).collect();
    let trimmed = trim_edges(&cleaned);
    if trimmed.is_empty() {
        return "Room".to_string();
    }
    trim_edges(&truncate(trimmed, MAX_SHEET_NAME_LEN)).to_string()
}

fn trim_edges(name: &str) -> &str {
    name.trim_matches(|c: char| c.is_whitespace() || c == '\'')
}

fn truncate(name: &str, max_chars: usize) -> String {
    name.chars().take(max_chars).collect()
}
