//! Predicate naming conventions shared with the backing store.
//!
//! Scalar predicates may carry per-locale variants. In memory a variant lives
//! under `name$locale`; on the wire the store spells it `name@locale`.

use std::borrow::Cow;

use crate::error::{ModelError, ModelResult};

/// Predicate holding the store-assigned identifier.
pub const ID_PREDICATE: &str = "uid";

/// Predicate holding the entity type discriminator.
pub const TYPE_PREDICATE: &str = "dgraph.type";

/// Prefix the store puts in front of a reverse-edge projection.
pub const REVERSE_MARKER: char = '~';

/// Locale separator in store predicate names.
pub const LOCALE_TAG: char = '@';

/// Locale separator in in-memory field names.
pub const LOCALE_DELIMITER: char = '$';

/// Fields starting with this prefix are internal and never marshaled.
pub const PRIVATE_PREFIX: char = '_';

/// Blank-node name used for a vertex that has no id yet.
pub const PLACEHOLDER: &str = "uid.placeholder";

const FIELD_NAME_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_.]*(\$[A-Za-z][A-Za-z0-9-]*)?$";

/// Returns true if the key is internal and must be skipped.
pub fn is_private(key: &str) -> bool {
    key.starts_with(PRIVATE_PREFIX)
}

/// Build the in-memory field name for a locale variant (`name$ur`).
pub fn locale_key(name: &str, locale: &str) -> String {
    format!("{}{}{}", name, LOCALE_DELIMITER, locale)
}

/// Split an in-memory field name into base name and optional locale.
pub fn split_locale(key: &str) -> (&str, Option<&str>) {
    match key.split_once(LOCALE_DELIMITER) {
        Some((name, locale)) => (name, Some(locale)),
        None => (key, None),
    }
}

/// Rewrite an in-memory field name into the store's predicate name.
pub fn to_store_key(key: &str) -> Cow<'_, str> {
    if key.contains(LOCALE_DELIMITER) {
        Cow::Owned(key.replace(LOCALE_DELIMITER, &LOCALE_TAG.to_string()))
    } else {
        Cow::Borrowed(key)
    }
}

/// Rewrite a store predicate name into the in-memory field name.
pub fn from_store_key(key: &str) -> Cow<'_, str> {
    if key.contains(LOCALE_TAG) {
        Cow::Owned(key.replace(LOCALE_TAG, &LOCALE_DELIMITER.to_string()))
    } else {
        Cow::Borrowed(key)
    }
}

/// The payload key under which the store projects the reverse of `predicate`.
pub fn reverse_key(predicate: &str) -> String {
    format!("{}{}", REVERSE_MARKER, predicate)
}

/// The blank-node reference used in outgoing write payloads.
pub fn blank_node() -> String {
    format!("_:{}", PLACEHOLDER)
}

/// Returns true if `id` is a blank-node reference rather than a store id.
pub fn is_blank_node(id: &str) -> bool {
    id.starts_with("_:")
}

/// Validate a declared field name (optionally locale-suffixed).
pub fn validate_field_name(name: &str) -> ModelResult<()> {
    let re = regex_lite::Regex::new(FIELD_NAME_PATTERN)
        .map_err(|e| ModelError::invalid_field_name(name, e.to_string()))?;
    if name == ID_PREDICATE || name == TYPE_PREDICATE {
        return Err(ModelError::invalid_field_name(name, "reserved predicate"));
    }
    if !re.is_match(name) {
        return Err(ModelError::invalid_field_name(
            name,
            "expected a letter followed by letters, digits, '_' or '.', with an optional $locale suffix",
        ));
    }
    Ok(())
}
