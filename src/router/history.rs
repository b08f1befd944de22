//! Session history abstraction.
//!
//! In a browser this is `window.history`; the host and the tests use
//! [`MemoryHistory`]. Entries are canonical path-and-query strings.

/// How a navigation enters the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Adds a new entry (user-driven changes).
    Push,
    /// Overwrites the current entry (corrective or default navigations).
    Replace,
}

/// Browser-like session history.
pub trait History {
    /// The current entry.
    fn current(&self) -> &str;

    /// Appends an entry after the current one, dropping any forward entries.
    fn push(&mut self, url: String);

    /// Overwrites the current entry.
    fn replace(&mut self, url: String);

    /// Steps back one entry, returning the new current URL.
    fn back(&mut self) -> Option<&str>;

    /// Steps forward one entry, returning the new current URL.
    fn forward(&mut self) -> Option<&str>;

    /// Applies a navigation in the given mode.
    fn navigate(&mut self, url: String, mode: NavigationMode) {
        match mode {
            NavigationMode::Push => self.push(url),
            NavigationMode::Replace => self.replace(url),
        }
    }
}

/// In-memory [`History`] with a cursor over its entries.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl MemoryHistory {
    /// Starts a history at `initial`.
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            cursor: 0,
        }
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    fn push(&mut self, url: String) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(url);
        self.cursor = self.entries.len() - 1;
    }

    fn replace(&mut self, url: String) {
        self.entries[self.cursor] = url;
    }

    fn back(&mut self) -> Option<&str> {
        self.cursor = self.cursor.checked_sub(1)?;
        Some(self.current())
    }

    fn forward(&mut self) -> Option<&str> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }
}
