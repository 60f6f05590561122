// src/normalizer/mod.rs
//
// Boundary adapter between database column names and the external JSON
// contract. Everything here is pure.

mod aliases;
mod record;

pub use aliases::AliasTable;
pub use record::{Field, Record, Scalar};

pub const RECURRENCE_FLAG: &str = "is_rechute";
pub const RECURRENCE_OUTPUT: &str = "rechute-line";
pub const DAY_COUNT: &str = "arret_diff";
pub const DAY_COUNT_OUTPUT: &str = "arret-diff-line";
pub const EFFECTIVE_DATE: &str = "date-effet";
pub const OPENING_DATE_OUTPUT: &str = "ouverture-date-line";

/// Renames every key found in `aliases`, recursing into nested records and
/// lists. Unknown keys pass through. When two keys resolve to the same
/// name the later one wins.
pub fn rename_keys(record: &Record, aliases: &AliasTable) -> Record {
    record
        .iter()
        .map(|(key, value)| {
            let target = aliases.resolve(key).unwrap_or(key);
            (target.to_owned(), rename_field(value, aliases))
        })
        .collect()
}

fn rename_field(field: &Field, aliases: &AliasTable) -> Field {
    match field {
        Field::Scalar(scalar) => Field::Scalar(scalar.clone()),
        Field::Record(record) => Field::Record(rename_keys(record, aliases)),
        Field::List(items) => Field::List(items.iter().map(|item| rename_field(item, aliases)).collect()),
    }
}

/// Adds the derived output fields to each leave period, keeping order.
pub fn format_for_output(records: &[Record]) -> Vec<Record> {
    records.iter().map(format_record).collect()
}

fn format_record(record: &Record) -> Record {
    let mut out = record.clone();

    match record.get(RECURRENCE_FLAG) {
        None | Some(Field::Scalar(Scalar::Null)) => {
            out.insert(RECURRENCE_FLAG, false);
            out.insert(RECURRENCE_OUTPUT, 0i64);
        }
        Some(Field::Scalar(flag)) => {
            out.insert(RECURRENCE_OUTPUT, i64::from(flag.is_truthy()));
        }
        // a nested value under the flag still counts as set
        Some(_) => {
            out.insert(RECURRENCE_OUTPUT, 1i64);
        }
    }

    if let Some(days) = record.get(DAY_COUNT) {
        out.insert(DAY_COUNT_OUTPUT, days.clone());
    }

    if let Some(date) = record.get(EFFECTIVE_DATE) {
        out.insert(OPENING_DATE_OUTPUT, date.clone());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    use super::aliases::ARRET_FIELD_ALIASES;

    fn rec(value: Value) -> Record {
        Record::try_from(value).unwrap()
    }

    fn table() -> AliasTable {
        AliasTable::arrets().unwrap()
    }

    #[test]
    fn renames_known_keys_and_keeps_unknown() {
        let out = rename_keys(
            &rec(json!({ "date_start": "2024-01-01", "is_rechute": true, "date_naissance": "1980-06-02" })),
            &table(),
        );
        assert_eq!(
            Value::from(out),
            json!({ "arret-from-line": "2024-01-01", "is_rechute": true, "birth_date": "1980-06-02" })
        );
    }

    #[test]
    fn renames_nested_records() {
        let out = rename_keys(
            &rec(json!({ "date_start": "2024-01-01", "nested": { "date_end": "2024-02-01" } })),
            &table(),
        );
        assert_eq!(
            Value::from(out),
            json!({ "arret-from-line": "2024-01-01", "nested": { "arret-to-line": "2024-02-01" } })
        );
    }

    #[test]
    fn renames_records_inside_lists() {
        let out = rename_keys(
            &rec(json!({ "arrets": [{ "date_end": "2024-02-01" }, 3, null] })),
            &table(),
        );
        assert_eq!(Value::from(out), json!({ "arrets": [{ "arret-to-line": "2024-02-01" }, 3, null] }));
    }

    #[test]
    fn preserves_iteration_order() {
        let out = rename_keys(&rec(json!({ "z": 1, "date_end": 2, "a": 3 })), &table());
        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["z", "arret-to-line", "a"]);
    }

    #[test]
    fn colliding_keys_overwrite_silently() {
        // the raw external name and the internal name both land on "arret-from-line"
        let out = rename_keys(
            &rec(json!({ "arret-from-line": "first", "date_start": "second" })),
            &table(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("arret-from-line").and_then(Field::as_str), Some("second"));
    }

    #[test]
    fn empty_record_stays_empty() {
        assert!(rename_keys(&Record::new(), &table()).is_empty());
    }

    #[test]
    fn input_is_not_mutated() {
        let input = rec(json!({ "date_start": "2024-01-01" }));
        let before = input.clone();
        let _ = rename_keys(&input, &table());
        assert_eq!(input, before);
    }

    #[test]
    fn recurrence_defaults_when_absent() {
        let out = format_for_output(&[Record::new()]);
        assert_eq!(Value::from(out[0].clone()), json!({ "is_rechute": false, "rechute-line": 0 }));
    }

    #[test]
    fn recurrence_projected_to_integer() {
        let out = format_for_output(&[rec(json!({ "is_rechute": true })), rec(json!({ "is_rechute": false }))]);
        assert_eq!(Value::from(out[0].clone()), json!({ "is_rechute": true, "rechute-line": 1 }));
        assert_eq!(Value::from(out[1].clone()), json!({ "is_rechute": false, "rechute-line": 0 }));
    }

    #[test]
    fn null_recurrence_counts_as_absent() {
        let out = format_for_output(&[rec(json!({ "is_rechute": null }))]);
        assert_eq!(Value::from(out[0].clone()), json!({ "is_rechute": false, "rechute-line": 0 }));
    }

    #[test]
    fn legacy_integer_recurrence_is_kept_as_sent() {
        let out = format_for_output(&[rec(json!({ "is_rechute": 1 }))]);
        assert_eq!(Value::from(out[0].clone()), json!({ "is_rechute": 1, "rechute-line": 1 }));
    }

    #[test]
    fn day_count_exposed_under_both_names() {
        let out = format_for_output(&[rec(json!({ "arret_diff": 12 }))]);
        assert_eq!(out[0].get(DAY_COUNT), Some(&Field::from(12i64)));
        assert_eq!(out[0].get(DAY_COUNT_OUTPUT), Some(&Field::from(12i64)));
    }

    #[test]
    fn effective_date_copied_to_opening_date() {
        let out = format_for_output(&[rec(json!({ "date-effet": "2024-05-01", "ouverture-date-line": "old" }))]);
        assert_eq!(out[0].get(OPENING_DATE_OUTPUT).and_then(Field::as_str), Some("2024-05-01"));
        assert_eq!(out[0].get(EFFECTIVE_DATE).and_then(Field::as_str), Some("2024-05-01"));
    }

    #[test]
    fn output_keeps_length_and_order() {
        let input: Vec<Record> = (0..5i64).map(|i| rec(json!({ "id": i }))).collect();
        let out = format_for_output(&input);
        let ids: Vec<_> = out.iter().map(|r| r.get("id").cloned()).collect();
        assert_eq!(ids, (0..5i64).map(|i| Some(Field::from(i))).collect::<Vec<_>>());
    }

    fn internal_key() -> impl Strategy<Value = String> {
        prop_oneof![
            proptest::sample::select(ARRET_FIELD_ALIASES.iter().map(|(k, _)| k.to_string()).collect::<Vec<_>>()),
            "[a-z]{1,3}_[0-9]{1,2}",
        ]
    }

    proptest! {
        #[test]
        fn inverse_restores_original_keys(
            pairs in proptest::collection::vec((internal_key(), any::<i64>()), 0..12)
        ) {
            let record: Record = pairs.into_iter().map(|(k, v)| (k, Field::from(v))).collect();
            let aliases = table();
            let back = rename_keys(&rename_keys(&record, &aliases), &aliases.inverse());
            prop_assert_eq!(back, record);
        }

        #[test]
        fn records_without_aliased_keys_are_untouched(
            pairs in proptest::collection::vec(("[a-z]{1,3}_[0-9]{1,2}", any::<bool>()), 0..12)
        ) {
            let record: Record = pairs.into_iter().map(|(k, v)| (k, Field::from(v))).collect();
            prop_assert_eq!(rename_keys(&record, &table()), record);
        }
    }
}
