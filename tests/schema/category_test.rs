//! Storage categories assigned to the layers of a loaded schema.

use agql::prelude::*;

fn schema() -> Schema {
    Schema::from_toml_str(include_str!("../fixtures/schema.toml")).unwrap()
}

fn category_name(schema: &Schema, id: &str) -> Option<&'static str> {
    schema.category(id).map(LayerCategory::name)
}

#[test]
fn test_fixture_categories() {
    let schema = schema();
    let expected = [
        ("graph", Some("graph root")),
        ("transcript_language", Some("transcript attribute")),
        ("transcript_scribe", Some("transcript attribute")),
        ("transcript_rating", Some("transcript attribute")),
        ("corpus", Some("corpus")),
        ("episode", Some("episode")),
        ("recording_date", Some("episode layer")),
        ("who", Some("participant")),
        ("main_participant", None),
        ("participant_gender", Some("participant attribute")),
        ("participant_age", Some("participant attribute")),
        ("comment", Some("annotation layer")),
        ("noise", Some("annotation layer")),
        ("turn", Some("annotation layer")),
        ("utterance", Some("annotation layer")),
        ("transcript", Some("annotation layer")),
        ("orthography", Some("annotation layer")),
        ("segments", Some("annotation layer")),
        ("pronounce", Some("annotation layer")),
    ];
    for (id, name) in expected {
        assert!(schema.layer(id).is_some(), "{} missing", id);
        assert_eq!(category_name(&schema, id), name, "{}", id);
    }
    assert_eq!(schema.layers().len(), expected.len());
}

#[test]
fn test_root_layer_is_added() {
    let schema = schema();
    assert_eq!(schema.root_layer_id(), "graph");
    assert_eq!(schema.layers()[0].id, "graph");
    assert_eq!(schema.participant_layer_id(), Some("who"));
    assert_eq!(schema.corpus_layer_id(), Some("corpus"));
}

#[test]
fn test_category_sql_by_root() {
    let schema = schema();
    let corpus = schema.category("corpus").unwrap();
    assert_eq!(
        corpus.label(Root::Transcript).as_deref(),
        Some("transcript.corpus_name")
    );
    assert!(corpus.label(Root::Participant).is_some());

    let noise = schema.category("noise").unwrap();
    assert!(noise.labels(Root::Transcript).is_some());
    assert_eq!(noise.labels(Root::Participant), None);
}

#[test]
fn test_json_schema() {
    let schema = Schema::from_json_str(
        r#"{
            "root_layer_id": "transcript_root",
            "participant_layer_id": "speakers",
            "layers": [
                { "id": "speakers", "layer_id": -2 },
                { "id": "speaker_dialect", "class_id": "speaker" },
                { "id": "phones", "layer_id": 5, "alignment": "interval" }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(schema.root_layer_id(), "transcript_root");
    assert_eq!(category_name(&schema, "transcript_root"), Some("graph root"));
    assert_eq!(category_name(&schema, "speakers"), Some("participant"));
    assert_eq!(category_name(&schema, "phones"), Some("annotation layer"));

    // no prefix to strip, so the whole id is the attribute name
    let query = ParticipantAgqlToSql::new(&schema)
        .sql_for("'x' IN labels('speaker_dialect')", "name", None, None, None)
        .unwrap();
    assert!(query
        .sql
        .contains("annotation_participant.layer = 'speaker_dialect'"));
}

#[test]
fn test_duplicate_layer() {
    let result = Schema::from_toml_str(
        r#"
        [[layers]]
        id = "noise"
        layer_id = 32

        [[layers]]
        id = "noise"
        layer_id = 33
        "#,
    );
    assert!(matches!(result, Err(SchemaError::DuplicateLayer(id)) if id == "noise"));
}

#[test]
fn test_attribute_ending_in_backslash() {
    let result = Schema::from_toml_str(
        r#"
        [[layers]]
        id = "transcript_notes"
        class_id = "transcript"
        attribute = 'notes\'
        "#,
    );
    match result {
        Err(SchemaError::InvalidAttribute { layer, attribute }) => {
            assert_eq!(layer, "transcript_notes");
            assert_eq!(attribute, "notes\\");
        }
        other => panic!("expected InvalidAttribute, got {:?}", other.map(|_| ())),
    }

    // a derived name is checked too; an escaped backslash is fine
    let result = Schema::builder()
        .layer(Layer::new("participant_x\\", "X").with_class_id("speaker"))
        .build();
    assert!(matches!(result, Err(SchemaError::InvalidAttribute { .. })));
    let schema = Schema::builder()
        .layer(
            Layer::new("participant_x", "X")
                .with_class_id("speaker")
                .with_attribute("x\\\\"),
        )
        .build()
        .unwrap();
    assert!(schema.category("participant_x").is_some());
}

#[test]
fn test_malformed_toml() {
    assert!(matches!(
        Schema::from_toml_str("[[layers]]\nlayer_id = 3"),
        Err(SchemaError::TomlError(_))
    ));
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        Schema::from_file("does/not/exist.toml"),
        Err(SchemaError::FileNotFound(_))
    ));
}

#[test]
fn test_builder_matches_file() {
    let built = Schema::builder()
        .layer(Layer::new("corpus", "Corpus").with_layer_id(-100))
        .layer(
            Layer::new("participant_gender", "Gender")
                .with_class_id("speaker")
                .with_attribute("gender"),
        )
        .corpus_layer("corpus")
        .build()
        .unwrap();
    let loaded = Schema::from_toml_str(
        r#"
        corpus_layer_id = "corpus"

        [[layers]]
        id = "corpus"
        description = "Corpus"
        layer_id = -100

        [[layers]]
        id = "participant_gender"
        description = "Gender"
        class_id = "speaker"
        attribute = "gender"
        "#,
    )
    .unwrap();
    assert_eq!(built.layers(), loaded.layers());
    assert_eq!(built.category("corpus"), loaded.category("corpus"));
    assert_eq!(
        built.category("participant_gender"),
        loaded.category("participant_gender")
    );
}
