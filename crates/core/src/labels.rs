//! Label selector serialization for list filtering.

use std::collections::BTreeMap;

/// Serialize a label set into the `key=value,key2=value2` selector syntax.
///
/// Keys are emitted in sorted order so the same label set always yields the
/// same selector string. A key given more than once keeps its last value.
pub fn flatten_labels<I, K, V>(labels: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let sorted: BTreeMap<String, String> = labels
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
        .collect();
    sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(",")
}
