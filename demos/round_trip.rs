//! Generate a prose document, read it back, edit it by hand, then update it.
//!
//! Run with: cargo run --example round_trip

use serde::{Deserialize, Serialize};
use serde_prose::{from_document, to_document, update_document};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Reference {
    title: String,
    year: i32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Notes {
    author: String,
    refs: Vec<Reference>,
}

const TEMPLATE: &str = "\
# Reading notes

These notes were written by {{author}}.

- {{refs.*.title}} ({{refs.*.year}})

Nothing below this line is data.
";

fn main() -> Result<(), Box<dyn Error>> {
    let notes = Notes {
        author: "Alice".to_string(),
        refs: vec![
            Reference {
                title: "Republic".to_string(),
                year: -375,
            },
            Reference {
                title: "Meno".to_string(),
                year: -385,
            },
        ],
    };

    // Render into the template
    let document = to_document(&notes, TEMPLATE)?;
    println!("Generated:\n{}", document);

    // Read the data back
    let notes_back: Notes = from_document(&document)?;
    assert_eq!(notes, notes_back);
    println!("✓ Round-trip successful\n");

    // A hand edit outside the values survives updates
    let edited = document.replace("Nothing below", "Really, nothing below");

    let revised = Notes {
        author: "Bob".to_string(),
        refs: vec![Reference {
            title: "Phaedo".to_string(),
            year: -360,
        }],
    };
    let updated = update_document(&edited, &revised)?;
    println!("Updated:\n{}", updated);

    assert!(updated.contains("Really, nothing below"));
    assert_eq!(from_document::<Notes>(&updated)?, revised);
    println!("✓ Update kept the hand edit");

    Ok(())
}
