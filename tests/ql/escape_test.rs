//! `esc` as seen by callers building AGQL strings from user input.

use agql::prelude::*;

#[test]
fn test_esc_cases() {
    let cases = [
        ("", ""),
        ("CC", "CC"),
        ("O'Reilly", "O\\'Reilly"),
        ("O\\'Reilly", "O\\'Reilly"),
        ("''", "\\'\\'"),
        ("a\\\\'b", "a\\\\\\'b"),
        ("end'", "end\\'"),
        ("'start", "\\'start"),
        ("no \\ quote", "no \\ quote"),
    ];
    for (input, expected) in cases {
        assert_eq!(esc(input), expected, "input: {input}");
    }
}

#[test]
fn test_esc_is_stable() {
    for s in ["O'Reilly", "a\\\\'b", "'''", "\\'\\'", "mixed 'quotes' and \\'escapes\\'"] {
        let once = esc(s);
        assert_eq!(esc(&once), once, "input: {s}");
    }
}

#[test]
fn test_escaped_value_round_trips_through_compiler() {
    let schema = Schema::from_toml_str(include_str!("../fixtures/schema.toml")).unwrap();
    let participant = "Mary O'Brien";
    let expression = format!("id = '{}'", esc(participant));

    let query = ParticipantAgqlToSql::new(&schema)
        .sql_for(&expression, "speaker_number", None, None, None)
        .unwrap();
    assert_eq!(
        query.sql,
        "SELECT speaker_number FROM speaker \
         WHERE speaker.name = 'Mary O\\'Brien' ORDER BY speaker.name"
    );
}

#[test]
fn test_quote() {
    assert_eq!(quote("it's"), "'it\\'s'");
    assert_eq!(quote(""), "''");
}
