//! Form fields and their edit state machine.
//!
//! Each [`Field`] is either idle, showing its committed `saved` text, or
//! editing, showing the in-progress `typed` text. Only [`Field::commit`] and
//! the programmatic [`Field::set_saved`] change `saved`, and `saved` is always
//! a fixed point of the field's formatter.
//!
//! ```text
//!            focus                 input
//!   Idle ───────────▶ Editing ◀─────────┐
//!    ▲                  │  └────────────┘
//!    └── commit/cancel ─┘
//! ```

use crate::domain::format::format;
use std::fmt;
use std::str::FromStr;

/// Identifies one of the three form inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Lon,
    Lat,
    Place,
}

impl FieldId {
    /// All fields in display order.
    pub const ALL: [Self; 3] = [Self::Lon, Self::Lat, Self::Place];

    /// DOM-style element id of the input.
    #[must_use]
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::Lon => "lon",
            Self::Lat => "lat",
            Self::Place => "place",
        }
    }

    /// Whether focusing the field selects its whole text.
    ///
    /// Free text is usually replaced wholesale; coordinate edits are partial.
    #[must_use]
    pub const fn select_on_focus(self) -> bool {
        matches!(self, Self::Place)
    }

    /// Whether the field holds one half of the coordinate pair.
    #[must_use]
    pub const fn is_coordinate(self) -> bool {
        matches!(self, Self::Lon | Self::Lat)
    }

    /// Normalizes committed text for this field.
    ///
    /// Coordinates go through the decimal formatter; the place name is trimmed.
    #[must_use]
    pub fn format(self, raw: &str) -> String {
        match self {
            Self::Lon | Self::Lat => format(raw),
            Self::Place => raw.trim().to_string(),
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

impl FromStr for FieldId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lon" | "longitude" => Ok(Self::Lon),
            "lat" | "latitude" => Ok(Self::Lat),
            "place" => Ok(Self::Place),
            other => Err(format!("unknown field {other:?}")),
        }
    }
}

/// Edit state of one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub id: FieldId,
    /// In-progress text, shown while focused.
    pub typed: String,
    /// Last committed text, shown while idle.
    pub saved: String,
    pub focused: bool,
}

impl Field {
    #[must_use]
    pub const fn new(id: FieldId) -> Self {
        Self {
            id,
            typed: String::new(),
            saved: String::new(),
            focused: false,
        }
    }

    /// Text the input currently shows.
    #[must_use]
    pub fn displayed(&self) -> &str {
        if self.focused {
            &self.typed
        } else {
            &self.saved
        }
    }

    /// Idle → Editing. Returns whether the host should select the text.
    pub fn focus(&mut self) -> bool {
        self.typed.clone_from(&self.saved);
        self.focused = true;
        self.id.select_on_focus()
    }

    pub fn input(&mut self, text: &str) {
        self.typed = text.to_string();
        self.focused = true;
    }

    /// Commits `text`, returning the new saved value.
    ///
    /// Text that formats to nothing cancels the edit and returns `None`.
    pub fn commit(&mut self, text: &str) -> Option<&str> {
        let formatted = self.id.format(text);
        if formatted.is_empty() {
            self.cancel();
            return None;
        }
        self.typed.clone_from(&formatted);
        self.saved = formatted;
        self.focused = false;
        Some(&self.saved)
    }

    /// Editing → Idle without touching `saved`.
    pub fn cancel(&mut self) {
        self.typed.clone_from(&self.saved);
        self.focused = false;
    }

    /// Programmatic update from a map move or a geocode result.
    ///
    /// A focused field keeps showing what the user is typing.
    pub fn set_saved(&mut self, value: &str) {
        self.saved = self.id.format(value);
        if !self.focused {
            self.typed.clone_from(&self.saved);
        }
    }

    pub fn clear(&mut self) {
        self.saved.clear();
        if !self.focused {
            self.typed.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lon(saved: &str) -> Field {
        let mut field = Field::new(FieldId::Lon);
        field.set_saved(saved);
        field
    }

    #[test]
    fn focus_copies_saved_into_typed() {
        let mut field = lon("5.3876");
        assert!(!field.focus());
        assert!(field.focused);
        assert_eq!(field.displayed(), "5.3876");
    }

    #[test]
    fn place_focus_requests_selection() {
        assert!(Field::new(FieldId::Place).focus());
    }

    #[test]
    fn input_changes_only_typed() {
        let mut field = lon("5.3876");
        field.focus();
        field.input("5.4");
        assert_eq!(field.displayed(), "5.4");
        assert_eq!(field.saved, "5.3876");
    }

    #[test]
    fn commit_formats_and_leaves_editing() {
        let mut field = lon("5.3876");
        field.focus();
        field.input("5.1234567");
        assert_eq!(field.commit("5.1234567"), Some("5.12346"));
        assert!(!field.focused);
        assert_eq!(field.typed, "5.12346");
        assert_eq!(field.displayed(), "5.12346");
    }

    #[test]
    fn unparseable_commit_reverts() {
        let mut field = lon("5.3876");
        field.focus();
        field.input("east");
        assert_eq!(field.commit("east"), None);
        assert_eq!(field.saved, "5.3876");
        assert_eq!(field.displayed(), "5.3876");
    }

    #[test]
    fn cancel_discards_typed_text() {
        let mut field = lon("5.3876");
        field.focus();
        field.input("7");
        field.cancel();
        assert!(!field.focused);
        assert_eq!(field.typed, "5.3876");
    }

    #[test]
    fn programmatic_update_spares_focused_text() {
        let mut field = lon("5.3876");
        field.focus();
        field.input("6");
        field.set_saved("6.5");
        assert_eq!(field.saved, "6.5");
        assert_eq!(field.displayed(), "6");
    }

    #[test]
    fn place_commit_trims() {
        let mut field = Field::new(FieldId::Place);
        assert_eq!(field.commit("  amersfoort "), Some("amersfoort"));
        assert_eq!(field.commit("   "), None);
        assert_eq!(field.saved, "amersfoort");
    }

    #[test]
    fn field_ids_parse_from_names() {
        assert_eq!("lat".parse::<FieldId>(), Ok(FieldId::Lat));
        assert_eq!("Longitude".parse::<FieldId>(), Ok(FieldId::Lon));
        assert!("zoom".parse::<FieldId>().is_err());
    }
}
