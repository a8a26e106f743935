//! Property-based tests - the round-trip and update guarantees
//!
//! Values are printable text. Only values containing the literal text that
//! frames them in the template are filtered out, since those cannot be told
//! apart from their delimiters, along with template syntax (`{{`, `{@`).

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_prose::{
    extract, from_document, generate, to_document, update, Delimiter, ValueMap,
};

/// Printable text of up to `max` characters avoiding every string in `frames`.
fn text(max: usize, frames: &'static [&'static str]) -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[ -~]{{0,{}}}", max))
        .unwrap()
        .prop_filter("value contains its own frame", move |value| {
            !value.contains("{{")
                && !value.contains("{@")
                && frames.iter().all(|frame| !value.contains(frame))
        })
}

const TEMPLATE: &str = "\
# Catalogue

Title: [{{title}}] by ({{author}}).
Shelf: {{shelf}}

- {{items.*.name}}

Compiled by hand.
";

fn values(title: &str, author: &str, shelf: u32, items: &[String]) -> ValueMap {
    let mut values = ValueMap::new();
    values.put("title", title);
    values.put("author", author);
    values.put("shelf", shelf.to_string());
    for item in items {
        let mut entry = ValueMap::new();
        entry.put("name", item.as_str());
        values.add("items", entry);
    }
    values
}

prop_compose! {
    fn catalogue()(
        title in text(16, &["] by ("]),
        author in text(16, &[")."]),
        shelf in any::<u32>(),
        items in prop::collection::vec(text(12, &["- "]), 0..5),
    ) -> ValueMap {
        values(&title, &author, shelf, &items)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Record {
    id: i64,
    ratio: f64,
    flag: bool,
    label: String,
}

fn record_roundtrip(record: &Record) -> bool {
    let template = "Record {{id}}: [{{label}}] ratio={{ratio}}, flag={{flag}}\n";
    match to_document(record, template) {
        Ok(document) => match from_document::<Record>(&document) {
            Ok(back) => *record == back,
            Err(e) => {
                eprintln!("Deserialize failed: {}", e);
                eprintln!("Document was: {}", document);
                false
            }
        },
        Err(e) => {
            eprintln!("Generate failed: {}", e);
            false
        }
    }
}

proptest! {
    #[test]
    fn prop_extract_inverts_generate(map in catalogue()) {
        let document = generate(&map, TEMPLATE).unwrap();
        prop_assert_eq!(extract(&document).unwrap(), map);
    }

    #[test]
    fn prop_generated_document_is_a_fixed_point(map in catalogue()) {
        let document = generate(&map, TEMPLATE).unwrap();
        prop_assert_eq!(generate(&map, &document).unwrap(), document);
    }

    #[test]
    fn prop_update_equals_regeneration(old in catalogue(), new in catalogue()) {
        let document = generate(&old, TEMPLATE).unwrap();
        prop_assert_eq!(
            update(&document, &new).unwrap(),
            generate(&new, TEMPLATE).unwrap()
        );
    }

    #[test]
    fn prop_update_preserves_untouched_text(
        old in catalogue(),
        new in catalogue(),
        note in "[A-Za-z][A-Za-z ]{0,29}",
    ) {
        // Prose added after generation must survive both updates.
        let document = generate(&old, TEMPLATE).unwrap()
            .replacen("# Catalogue\n", &format!("# Catalogue\n{}\n", note), 1)
            + &format!("\n{}\n", note);
        let updated = update(&document, &new).unwrap();
        let ends_with_note = updated.ends_with(&format!("\n{}\n", note));
        prop_assert!(ends_with_note);
        prop_assert_eq!(update(&updated, &old).unwrap(), document);
    }

    #[test]
    fn prop_pair_pattern_matches_shortest_span(
        first in "[a-z ]{0,10}",
        second in "[a-z ]{0,10}",
    ) {
        let pattern = Delimiter::pair("[]").unwrap().pattern().unwrap();
        let text = format!("x [{}] y [{}] z", first, second);
        let caps = pattern.captures(&text).unwrap();
        prop_assert_eq!(&caps[1], first.as_str());
    }

    #[test]
    fn prop_record_roundtrip(
        id in any::<i64>(),
        ratio in -1.0e9f64..1.0e9,
        flag in any::<bool>(),
        label in text(20, &["] ratio="]),
    ) {
        let roundtrips = record_roundtrip(&Record { id, ratio, flag, label });
        prop_assert!(roundtrips);
    }
}
