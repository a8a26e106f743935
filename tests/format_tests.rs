//! Conformance tests for the document directive surface.
//!
//! Each test feeds a small hand-written document or template through the
//! public pipelines and checks the exact bytes or values that come out.

use serde_prose::{
    extract, extract_with_options, generate, generate_with_options, update, value_map,
    CommentFraming, Delimiter, Directive, Error, FieldSpec, ProseOptions, Segment, Segmenter,
    ValueMap,
};

// Field specs

#[test]
fn test_field_spec_canonical_forms() {
    let spec = FieldSpec::parse(r#"{{title:pattern="[%s]"}}"#).unwrap();
    assert_eq!(spec.name(), "title");
    assert_eq!(spec.delimiter(), &Delimiter::pair("[]").unwrap());
    assert_eq!(spec.to_string(), r#"{{title:pattern="[%s]"}}"#);

    let bare = FieldSpec::parse("{{bio}}").unwrap();
    assert!(!bare.delimiter().is_set());
    assert_eq!(bare.to_string(), "{{bio}}");

    let start_only = FieldSpec::parse(r#"{{who:pattern="By %s"}}"#).unwrap();
    assert_eq!(start_only.delimiter().start(), Some("By "));
    assert_eq!(start_only.delimiter().end(), None);
}

#[test]
fn test_field_spec_rejects_near_misses() {
    for token in [
        "{{title:pattern=[%s]}}",
        r#"{{title:pattern="[]"}}"#,
        r#"{title:pattern="[%s]"}"#,
        r#"{{title:pattern="[%s]"}} trailing"#,
        "{{}}",
    ] {
        assert!(
            matches!(FieldSpec::parse(token), Err(Error::Grammar { .. })),
            "accepted {}",
            token
        );
    }
}

#[test]
fn test_header_with_stray_text_is_rejected() {
    let document = "<!--{{a:pattern=\"[%s]\"}} and more-->\n[x]\n";
    assert!(matches!(
        extract(document),
        Err(Error::Grammar { line: 1, .. })
    ));
}

// Delimiter patterns

#[test]
fn test_delimiter_pattern_cases() {
    let body = |delimiter: Delimiter, text: &str| {
        delimiter
            .pattern()
            .unwrap()
            .captures(text)
            .map(|caps| caps[1].to_string())
    };

    assert_eq!(body(Delimiter::pair("[]").unwrap(), "a [x] [y]"), Some("x".into()));
    assert_eq!(
        body(Delimiter::new().with_start("("), "a (b (c d\ne"),
        Some("c d".into())
    );
    assert_eq!(body(Delimiter::new().with_end("."), "Plato. Meno."), Some("Plato".into()));
    assert_eq!(body(Delimiter::new(), "whole line\n"), Some("whole line".into()));
    assert_eq!(body(Delimiter::new(), "two\nlines\n"), Some("two\nlines".into()));
}

#[test]
fn test_pair_directive_requires_two_characters() {
    let template = "<!--{@template.delimiter.pair:\"[\"}}-->\n";
    assert!(matches!(
        generate(&ValueMap::new(), template),
        Err(Error::Grammar { line: 1, .. })
    ));
    assert!(matches!(Delimiter::pair("[]]"), Err(Error::InvalidArgument(_))));
}

// Configuration directives

#[test]
fn test_comment_directive_takes_surrounding_text() {
    let found = Directive::find("/* {@template.comment}} */", 1).unwrap();
    assert_eq!(
        found,
        Some(Directive::Comment(CommentFraming::new("/* ", " */")))
    );

    let template = "/* {@template.comment}} */\nBy {{who}}.\n";
    let document = generate(&value_map!({ "who": "Plato" }), template).unwrap();
    assert_eq!(
        document,
        "/* {@template.comment}} */\n/* {{who:pattern=\"By %s.\"}} */\nBy Plato.\n"
    );
    assert_eq!(extract(&document).unwrap(), value_map!({ "who": "Plato" }));
}

#[test]
fn test_delimiter_directives_compose() {
    let template = "\
<!--{@template.delimiter.start:\"<\"}}-->
<!--{@template.delimiter.end:\">\"}}-->
Cast: <{{a}}> and <{{b}}>.
";
    let document = generate(&value_map!({ "a": "Ann", "b": "Bob" }), template).unwrap();
    assert!(document.contains("<!--{{a:pattern=\"<%s>\"}} {{b:pattern=\"<%s>\"}}-->\n"));
    assert!(document.ends_with("Cast: <Ann> and <Bob>.\n"));
}

#[test]
fn test_document_directives_override_options() {
    let options = ProseOptions::new().with_delimiter(Delimiter::pair("()").unwrap());
    let template = "<!--{@template.delimiter.pair:\"[]\"}}-->\nSee [{{a}}] (not {{b}}).\n";
    let values = value_map!({ "a": "one", "b": "two" });

    let document = generate_with_options(&values, template, &options).unwrap();
    assert!(document.contains("{{a:pattern=\"[%s]\"}}"));
    assert!(document.contains("{{b:pattern=\"] (not %s).\"}}"));
    assert_eq!(extract_with_options(&document, &options).unwrap(), values);
}

#[test]
fn test_unrecognised_directive_is_an_error() {
    let document = "prose\n<!--{@template.colour:\"red\"}}-->\n";
    assert!(matches!(
        extract(document),
        Err(Error::Grammar { line: 2, .. })
    ));
}

// List templates

#[test]
fn test_list_template_escapes_round_trip() {
    let template = "Quote: \"{{quotes.*.text}}\" \\ end\n";
    let values = value_map!({ "quotes": [{ "text": "hi" }] });

    let document = generate(&values, template).unwrap();
    let directive = document.lines().next().unwrap();
    assert_eq!(
        directive,
        r#"<!--{@list-template="Quote: \"{{quotes.*.text}}\" \\ end\n"}}-->"#
    );
    assert_eq!(
        Directive::find(directive, 1).unwrap(),
        Some(Directive::ListTemplate(template.to_string()))
    );
    assert_eq!(extract(&document).unwrap(), values);
}

#[test]
fn test_unknown_escape_is_kept_literally() {
    assert_eq!(
        Directive::find(r#"<!--{@list-template="a\tb"}}-->"#, 1).unwrap(),
        Some(Directive::ListTemplate("a\\tb".to_string()))
    );
}

#[test]
fn test_list_markers_must_agree() {
    let err = generate(&ValueMap::new(), "x\n\n{{a.*.b}} and {{c.*.d}}\n").unwrap_err();
    assert!(matches!(err, Error::Grammar { line: 3, .. }));

    let err = generate(&ValueMap::new(), "- {{a.*.b.*.c}}\n").unwrap_err();
    assert!(matches!(err, Error::Grammar { line: 1, .. }));
}

#[test]
fn test_root_list() {
    let mut values = ValueMap::new();
    values.add_value("", "first");
    values.add_value("", "second");

    let document = generate(&values, "- {{*}}\n").unwrap();
    assert!(document.contains("<!--{{0:pattern=\"- %s\"}}-->\n- first\n"));
    assert!(document.contains("<!--{{1:pattern=\"- %s\"}}-->\n- second\n"));
    assert_eq!(extract(&document).unwrap(), values);
}

// Segmentation

#[test]
fn test_segments_reproduce_the_document() {
    let document = "\
# Title
<!--{{a:pattern=\"[%s]\"}}-->
[x]

<!--{@list-template=\"- {{r.*}}\\n\"}}-->
tail";
    let segments: Vec<Segment> = Segmenter::new(document, CommentFraming::default())
        .collect::<serde_prose::Result<_>>()
        .unwrap();
    let raw: String = segments.iter().map(Segment::raw).collect();
    assert_eq!(raw, document);
    assert_eq!(segments.len(), 4);
}

#[test]
fn test_prose_braces_are_not_headers() {
    let document = "Use {{name}} in templates.\n\n<!--{{a:pattern=\"[%s]\"}}-->\n[x]\n";
    assert_eq!(extract(document).unwrap(), value_map!({ "a": "x" }));
}

// Sentinel

#[test]
fn test_sentinel_on_generate_and_empty_on_update() {
    let document = generate(&ValueMap::new(), "By {{who}}.\n").unwrap();
    assert_eq!(document, "<!--{{who:pattern=\"By %s.\"}}-->\nBy UNKNOWN.\n");
    assert_eq!(extract(&document).unwrap(), value_map!({ "who": "UNKNOWN" }));

    let updated = update(&document, &ValueMap::new()).unwrap();
    assert_eq!(updated, "<!--{{who:pattern=\"By %s.\"}}-->\nBy .\n");
}
