//! Variable bindings supplied to a render.

use serde_json::Value;
use std::collections::BTreeMap;

/// String-keyed variable mapping used as the template binding environment.
///
/// Values are arbitrary JSON-like data, so templates can loop over lists or
/// branch on booleans as well as interpolate strings.
pub type Variables = BTreeMap<String, Value>;

/// Builds a [`Variables`] mapping from key/value pairs.
///
/// # Examples
///
/// ```
/// use promptsmith_core::variables;
///
/// let vars = variables([("question", "2+2?"), ("tone", "terse")]);
/// assert_eq!(vars["question"], "2+2?");
/// assert_eq!(vars.len(), 2);
/// ```
pub fn variables<I, K, V>(pairs: I) -> Variables
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Returns the declared names that are absent from `vars`, preserving
/// declaration order. With `null_is_missing`, names bound to null count too.
pub(crate) fn missing_from<'a>(
    declared: &'a [String],
    vars: &Variables,
    null_is_missing: bool,
) -> Vec<&'a str> {
    declared
        .iter()
        .filter(|name| match vars.get(name.as_str()) {
            None => true,
            Some(value) => null_is_missing && value.is_null(),
        })
        .map(String::as_str)
        .collect()
}

/// Returns the keys of `vars` that are not declared, in key order.
pub(crate) fn undeclared_in<'a>(declared: &[String], vars: &'a Variables) -> Vec<&'a str> {
    vars.keys()
        .filter(|key| !declared.contains(*key))
        .map(String::as_str)
        .collect()
}
