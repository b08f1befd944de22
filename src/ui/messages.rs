//! Localized user-facing texts.
//!
//! Toasts and labels come from a [`Messages`] catalog selected by [`Locale`].
//! The update core only asks for texts by meaning and never builds them from
//! error `Display` impls, which are meant for logs.

use crate::app::FieldId;
use crate::domain::{CoordinateError, GeocodeError, RouteError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported interface languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Nl,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            "nl" | "nl-nl" | "nl-be" => Ok(Self::Nl),
            other => Err(format!("unsupported locale {other:?}")),
        }
    }
}

/// Text catalog for one locale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    #[must_use]
    pub const fn new(locale: Locale) -> Self {
        Self { locale }
    }

    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    #[must_use]
    pub const fn field_label(&self, field: FieldId) -> &'static str {
        match (self.locale, field) {
            (Locale::En, FieldId::Lon) => "Longitude",
            (Locale::En, FieldId::Lat) => "Latitude",
            (Locale::En, FieldId::Place) => "Place",
            (Locale::Nl, FieldId::Lon) => "Lengtegraad",
            (Locale::Nl, FieldId::Lat) => "Breedtegraad",
            (Locale::Nl, FieldId::Place) => "Plaats",
        }
    }

    #[must_use]
    pub const fn candidates_heading(&self) -> &'static str {
        match self.locale {
            Locale::En => "Did you mean",
            Locale::Nl => "Bedoelde u",
        }
    }

    #[must_use]
    pub fn nothing_found(&self) -> String {
        match self.locale {
            Locale::En => "Nothing found".to_string(),
            Locale::Nl => "Niets gevonden".to_string(),
        }
    }

    #[must_use]
    pub fn empty_query(&self) -> String {
        match self.locale {
            Locale::En => "Type a place to search for".to_string(),
            Locale::Nl => "Typ een plaats om te zoeken".to_string(),
        }
    }

    /// Toast for a rejected coordinate candidate.
    #[must_use]
    pub fn coordinate_rejected(&self, error: &CoordinateError) -> String {
        match (self.locale, error) {
            (Locale::En, CoordinateError::NotANumber(text)) => {
                format!("{text:?} is not a coordinate")
            }
            (Locale::En, CoordinateError::LongitudeOutOfRange(lon)) => {
                format!("Longitude {lon} is outside -180 to 180")
            }
            (Locale::En, CoordinateError::LatitudeOutOfRange(lat)) => {
                format!("Latitude {lat} is outside -90 to 90")
            }
            (Locale::Nl, CoordinateError::NotANumber(text)) => {
                format!("{text:?} is geen coördinaat")
            }
            (Locale::Nl, CoordinateError::LongitudeOutOfRange(lon)) => {
                format!("Lengtegraad {lon} ligt buiten -180 tot 180")
            }
            (Locale::Nl, CoordinateError::LatitudeOutOfRange(lat)) => {
                format!("Breedtegraad {lat} ligt buiten -90 tot 90")
            }
        }
    }

    /// Toast for a failed geocoding request.
    #[must_use]
    pub fn geocode_failed(&self, error: &GeocodeError) -> String {
        match (self.locale, error) {
            (Locale::En, GeocodeError::InvalidUrl(url)) => {
                format!("The geocoding service address {url:?} is invalid")
            }
            (Locale::En, GeocodeError::Timeout) => {
                "The geocoding service did not answer in time".to_string()
            }
            (Locale::En, GeocodeError::NetworkUnavailable(_)) => {
                "The geocoding service cannot be reached".to_string()
            }
            (Locale::En, GeocodeError::BadStatus { code, message }) => {
                format!("The geocoding service answered {code} {message}")
            }
            (Locale::En, GeocodeError::UndecodableResponse(_)) => {
                "The geocoding service sent an unreadable answer".to_string()
            }
            (Locale::Nl, GeocodeError::InvalidUrl(url)) => {
                format!("Het adres van de geocodeerdienst {url:?} is ongeldig")
            }
            (Locale::Nl, GeocodeError::Timeout) => {
                "De geocodeerdienst antwoordde niet op tijd".to_string()
            }
            (Locale::Nl, GeocodeError::NetworkUnavailable(_)) => {
                "De geocodeerdienst is niet bereikbaar".to_string()
            }
            (Locale::Nl, GeocodeError::BadStatus { code, message }) => {
                format!("De geocodeerdienst antwoordde {code} {message}")
            }
            (Locale::Nl, GeocodeError::UndecodableResponse(_)) => {
                "De geocodeerdienst stuurde een onleesbaar antwoord".to_string()
            }
        }
    }

    /// Toast for a URL that does not map to a route.
    #[must_use]
    pub fn route_rejected(&self, error: &RouteError) -> String {
        match error {
            RouteError::MissingQuery => self.empty_query(),
            RouteError::OutOfRange(inner) => self.coordinate_rejected(inner),
            RouteError::Malformed(url) | RouteError::UnknownPath(url) => match self.locale {
                Locale::En => format!("There is no page at {url:?}"),
                Locale::Nl => format!("Er is geen pagina op {url:?}"),
            },
            RouteError::MissingParameter(param) => match self.locale {
                Locale::En => format!("The link is missing {param}"),
                Locale::Nl => format!("De link mist {param}"),
            },
            RouteError::InvalidNumber { param, value } => match self.locale {
                Locale::En => format!("The link has {param}={value:?}, which is not a number"),
                Locale::Nl => format!("De link bevat {param}={value:?}, dat is geen getal"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_status_toast_contains_code() {
        let error = GeocodeError::BadStatus {
            code: 500,
            message: "Internal Server Error".to_string(),
        };
        for locale in [Locale::En, Locale::Nl] {
            assert!(Messages::new(locale).geocode_failed(&error).contains("500"));
        }
    }

    #[test]
    fn locale_parses_region_variants() {
        assert_eq!("nl-BE".parse::<Locale>(), Ok(Locale::Nl));
        assert_eq!("EN".parse::<Locale>(), Ok(Locale::En));
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn missing_query_reuses_empty_query_text() {
        let messages = Messages::new(Locale::Nl);
        assert_eq!(messages.route_rejected(&RouteError::MissingQuery), messages.empty_query());
    }
}
