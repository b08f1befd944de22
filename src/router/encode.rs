//! Percent-encoding for URL components.
//!
//! Matches the browser's `encodeURIComponent`: everything except ASCII
//! alphanumerics and `- _ . ! ~ * ' ( )` is escaped byte-wise, so a space
//! becomes `%20` (not `+`) and a comma becomes `%2C`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes `encodeURIComponent` leaves alone, removed from the escape set.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encodes one query-parameter value.
///
/// # Examples
///
/// ```
/// use geoform::router::encode_component;
///
/// assert_eq!(
///     encode_component("onze lieve vrouwetoren, amersfoort"),
///     "onze%20lieve%20vrouwetoren%2C%20amersfoort"
/// );
/// ```
#[must_use]
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}
