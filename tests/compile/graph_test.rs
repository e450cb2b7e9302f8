//! Integration tests for transcript queries.
//!
//! Each test compiles an AGQL expression against the fixture schema and
//! checks the exact MySQL produced.

use agql::prelude::*;

fn schema() -> Schema {
    Schema::from_toml_str(include_str!("../fixtures/schema.toml")).unwrap()
}

fn sql(expression: &str, select: &str) -> String {
    let schema = schema();
    let query = GraphAgqlToSql::new(&schema)
        .sql_for(expression, select, None, None, None)
        .unwrap_or_else(|e| panic!("{} failed: {}", expression, e));
    assert!(query.parameters.is_empty());
    query.sql
}

// ============================================================================
// Root identifiers
// ============================================================================

#[test]
fn test_label_matches() {
    let schema = schema();
    let query = GraphAgqlToSql::new(&schema)
        .sql_for(
            "label MATCHES \"Ada.+\"",
            "transcript.transcript_id, transcript.ag_id",
            None,
            None,
            None,
        )
        .unwrap();
    assert_eq!(
        query.sql,
        "SELECT transcript.transcript_id, transcript.ag_id FROM transcript \
         WHERE transcript.transcript_id REGEXP 'Ada.+' \
         ORDER BY transcript.transcript_id"
    );
    assert_eq!(query.parameters.len(), 0);
}

#[test]
fn test_id_not_matches_with_limit() {
    let schema = schema();
    let compiler = GraphAgqlToSql::new(&schema);

    for expression in ["id NOT MATCHES \"Ada.+\"", "my('graph').label NOT MATCHES \"Ada.+\""] {
        let query = compiler
            .sql_for(
                expression,
                "transcript.transcript_id, transcript.ag_id",
                None,
                Some("id ASC"),
                Some("LIMIT 1,1"),
            )
            .unwrap();
        assert_eq!(
            query.sql,
            "SELECT transcript.transcript_id, transcript.ag_id FROM transcript \
             WHERE transcript.transcript_id NOT REGEXP 'Ada.+' \
             ORDER BY transcript.transcript_id LIMIT 1,1",
            "{}",
            expression
        );
    }
}

// ============================================================================
// Empty expressions and ordering
// ============================================================================

#[test]
fn test_empty_expression() {
    let schema = schema();
    let compiler = GraphAgqlToSql::new(&schema);

    let query = compiler
        .sql_for("", "transcript.transcript_id, transcript.ag_id", None, None, None)
        .unwrap();
    insta::assert_snapshot!(
        query.sql,
        @"SELECT transcript.transcript_id, transcript.ag_id FROM transcript ORDER BY transcript.transcript_id"
    );

    let query = compiler
        .sql_for(
            "",
            "transcript.transcript_id",
            Some("transcript.annotated_by = 'user'"),
            Some("label DESC"),
            None,
        )
        .unwrap();
    assert_eq!(
        query.sql,
        "SELECT transcript.transcript_id FROM transcript \
         WHERE transcript.annotated_by = 'user' \
         ORDER BY transcript.transcript_id DESC"
    );
}

#[test]
fn test_order_by() {
    let schema = schema();
    let query = GraphAgqlToSql::new(&schema)
        .sql_for(
            "",
            "transcript.transcript_id, transcript.ag_id",
            None,
            Some("my(\"corpus\").label ASC, my(\"episode\").label DESC, ordinal ASC"),
            None,
        )
        .unwrap();
    assert_eq!(
        query.sql,
        "SELECT transcript.transcript_id, transcript.ag_id FROM transcript \
         ORDER BY transcript.corpus_name, (SELECT name \
         FROM transcript_family \
         WHERE transcript_family.family_id = transcript.family_id) DESC, \
         transcript.family_sequence"
    );
}

// ============================================================================
// Corpus and episode
// ============================================================================

#[test]
fn test_corpus_label() {
    insta::assert_snapshot!(
        sql("my(\"corpus\").label = \"CC\"", "transcript.transcript_id"),
        @"SELECT transcript.transcript_id FROM transcript WHERE transcript.corpus_name = 'CC' ORDER BY transcript.transcript_id"
    );
}

#[test]
fn test_literal_list() {
    assert_eq!(
        sql(
            "my(\"corpus\").label IN (\"CC\", 'IA', 'MU', 'corpus', \"episode\")",
            "transcript.transcript_id"
        ),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE transcript.corpus_name IN ( 'CC', 'IA', 'MU', 'corpus', 'episode') \
         ORDER BY transcript.transcript_id"
    );
}

#[test]
fn test_corpus_labels() {
    assert_eq!(
        sql("'CC' IN labels('corpus')", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE 'CC' IN (SELECT transcript.corpus_name) \
         ORDER BY transcript.transcript_id"
    );
}

#[test]
fn test_episode_label() {
    assert_eq!(
        sql("my(\"episode\").label = 'some-episode'", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE (SELECT name \
         FROM transcript_family \
         WHERE transcript_family.family_id = transcript.family_id) = 'some-episode' \
         ORDER BY transcript.transcript_id"
    );
}

// ============================================================================
// Participants
// ============================================================================

#[test]
fn test_who_labels() {
    assert_eq!(
        sql("'someone' IN labels('who')", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE 'someone' IN \
         (SELECT speaker.name \
         FROM transcript_speaker \
         INNER JOIN speaker \
         ON transcript_speaker.speaker_number = speaker.speaker_number \
         WHERE transcript_speaker.ag_id = transcript.ag_id) \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("my('who').label = 'someone'", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE \
         (SELECT speaker.name \
         FROM transcript_speaker \
         INNER JOIN speaker \
         ON transcript_speaker.speaker_number = speaker.speaker_number \
         WHERE transcript_speaker.ag_id = transcript.ag_id \
         ORDER BY speaker.name LIMIT 1) = 'someone' \
         ORDER BY transcript.transcript_id"
    );
}

// ============================================================================
// labels()
// ============================================================================

#[test]
fn test_labels() {
    assert_eq!(
        sql("'10' IN labels('transcript_rating')", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE '10' IN \
         (SELECT DISTINCT label \
         FROM annotation_transcript USE INDEX(IDX_AG_ID_NAME) \
         WHERE annotation_transcript.layer = 'rating' \
         AND transcript_speaker.ag_id = transcript.ag_id) \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("'NA' IN labels('participant_gender')", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE 'NA' IN \
         (SELECT DISTINCT label \
         FROM annotation_participant \
         INNER JOIN transcript_speaker \
         ON annotation_participant.speaker_number = transcript_speaker.speaker_number \
         AND annotation_participant.layer = 'gender' \
         WHERE transcript_speaker.ag_id = transcript.ag_id) \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("'2019-06-17' IN labels('recording_date')", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE \
         '2019-06-17' IN (SELECT label \
         FROM `annotation_layer_-200` annotation \
         WHERE annotation.family_id = transcript.family_id) \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("'pilot' IN labels('episode')", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE 'pilot' IN (SELECT name FROM transcript_family \
         WHERE transcript_family.family_id = transcript.family_id) \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("'ada.trs' IN labels('graph')", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE 'ada.trs' IN (SELECT transcript.transcript_id) \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("'bell' IN labels('noise')", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE 'bell' IN (SELECT label \
         FROM annotation_layer_32 annotation \
         WHERE annotation.ag_id = transcript.ag_id) \
         ORDER BY transcript.transcript_id"
    );
}

// ============================================================================
// my().label
// ============================================================================

#[test]
fn test_attribute_label() {
    assert_eq!(
        sql("my('transcript_scribe').label = 'someone'", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE \
         (SELECT label \
         FROM annotation_transcript USE INDEX(IDX_AG_ID_NAME) \
         WHERE annotation_transcript.layer = 'scribe' \
         AND annotation_transcript.ag_id = transcript.ag_id ORDER BY annotation_id \
         LIMIT 1) = 'someone' \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("my('participant_gender').label = 'NA'", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE \
         (SELECT label \
         FROM annotation_participant \
         INNER JOIN transcript_speaker \
         ON annotation_participant.speaker_number = transcript_speaker.speaker_number \
         AND annotation_participant.layer = 'gender' \
         WHERE transcript_speaker.ag_id = transcript.ag_id \
         ORDER BY annotation_id LIMIT 1) = 'NA' \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("my('recording_date').label > '2019-06-17'", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE \
         (SELECT label \
         FROM `annotation_layer_-200` annotation \
         WHERE annotation.family_id = transcript.family_id \
         ORDER BY annotation.ordinal LIMIT 1) > '2019-06-17' \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("my('noise').label MATCHES '.*bell.*'", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE \
         (SELECT label \
         FROM annotation_layer_32 annotation \
         INNER JOIN anchor ON annotation.start_anchor_id = anchor.anchor_id \
         WHERE annotation.ag_id = transcript.ag_id \
         ORDER BY anchor.offset, annotation.annotation_id LIMIT 1) REGEXP '.*bell.*' \
         ORDER BY transcript.transcript_id"
    );
}

#[test]
fn test_tag_layer_label() {
    assert_eq!(
        sql("my('pronounce').label = 'x'", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE (SELECT label FROM annotation_layer_23 annotation \
         WHERE annotation.ag_id = transcript.ag_id \
         ORDER BY annotation.annotation_id LIMIT 1) = 'x' \
         ORDER BY transcript.transcript_id"
    );
}

// ============================================================================
// list().length
// ============================================================================

#[test]
fn test_list_length() {
    assert_eq!(
        sql("list('transcript_rating').length > 10", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE (SELECT COUNT(*) \
         FROM annotation_transcript USE INDEX(IDX_AG_ID_NAME) \
         WHERE annotation_transcript.layer = 'rating' \
         AND transcript_speaker.ag_id = transcript.ag_id) > 10 \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("list('participant_gender').length < 1", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE (SELECT COUNT(*) \
         FROM annotation_participant \
         INNER JOIN transcript_speaker \
         ON annotation_participant.speaker_number = transcript_speaker.speaker_number \
         AND annotation_participant.layer = 'gender' \
         WHERE transcript_speaker.ag_id = transcript.ag_id) < 1 \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("list('recording_date').length > 0", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE \
         (SELECT COUNT(*) \
         FROM `annotation_layer_-200` annotation \
         WHERE annotation.family_id = transcript.family_id) > 0 \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("list('corpus').length = 1", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE (SELECT COUNT(transcript.corpus_name)) = 1 \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("list('episode').length > 0", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE (SELECT COUNT(*) FROM transcript_family \
         WHERE transcript_family.family_id = transcript.family_id) > 0 \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("list('who').length > 2", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE (SELECT COUNT(*) FROM transcript_speaker \
         INNER JOIN speaker ON transcript_speaker.speaker_number = speaker.speaker_number \
         WHERE transcript_speaker.ag_id = transcript.ag_id) > 2 \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("list('transcript').length > 100", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE (SELECT COUNT(*) \
         FROM annotation_layer_0 annotation \
         WHERE annotation.ag_id = transcript.ag_id) > 100 \
         ORDER BY transcript.transcript_id"
    );
}

// ============================================================================
// annotators()
// ============================================================================

#[test]
fn test_annotators() {
    assert_eq!(
        sql("'someone' IN annotators('transcript_rating')", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE 'someone' IN \
         (SELECT DISTINCT annotated_by \
         FROM annotation_transcript USE INDEX(IDX_AG_ID_NAME) \
         WHERE annotation_transcript.layer = 'rating' \
         AND transcript_speaker.ag_id = transcript.ag_id) \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("'someone' IN annotators('participant_gender')", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE 'someone' IN \
         (SELECT DISTINCT annotated_by \
         FROM annotation_participant \
         INNER JOIN transcript_speaker \
         ON annotation_participant.speaker_number = transcript_speaker.speaker_number \
         AND annotation_participant.layer = 'gender' \
         WHERE transcript_speaker.ag_id = transcript.ag_id) \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("'someone' IN annotators('recording_date')", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE 'someone' IN (SELECT DISTINCT annotated_by \
         FROM `annotation_layer_-200` annotation \
         WHERE annotation.family_id = transcript.family_id) \
         ORDER BY transcript.transcript_id"
    );

    assert_eq!(
        sql("'someone' IN annotators('noise')", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE 'someone' IN (SELECT DISTINCT annotated_by \
         FROM annotation_layer_32 annotation \
         WHERE annotation.ag_id = transcript.ag_id) \
         ORDER BY transcript.transcript_id"
    );
}

// ============================================================================
// Boolean structure and extra WHERE
// ============================================================================

#[test]
fn test_user_where_clause() {
    let extra = "(EXISTS (SELECT * FROM role \
                 INNER JOIN role_permission ON role.role_id = role_permission.role_id \
                 INNER JOIN annotation_transcript access_attribute \
                 ON access_attribute.layer = role_permission.attribute_name \
                 AND access_attribute.label REGEXP role_permission.value_pattern \
                 AND role_permission.entity REGEXP '.*t.*' \
                 WHERE user_id = 'test' \
                 AND access_attribute.ag_id = transcript.ag_id) \
                 OR EXISTS (SELECT * FROM role \
                 INNER JOIN role_permission ON role.role_id = role_permission.role_id \
                 AND role_permission.attribute_name = 'corpus' \
                 AND role_permission.entity REGEXP '.*t.*' \
                 WHERE transcript.corpus_name REGEXP role_permission.value_pattern \
                 AND user_id = 'test') \
                 OR NOT EXISTS (SELECT * FROM role_permission))";

    let schema = schema();
    let query = GraphAgqlToSql::new(&schema)
        .sql_for(
            "label MATCHES \"Ada.+\"",
            "transcript.transcript_id, transcript.ag_id",
            Some(extra),
            None,
            None,
        )
        .unwrap();
    assert_eq!(
        query.sql,
        format!(
            "SELECT transcript.transcript_id, transcript.ag_id FROM transcript \
             WHERE transcript.transcript_id REGEXP 'Ada.+' \
             AND {} \
             ORDER BY transcript.transcript_id",
            extra
        )
    );
    assert_eq!(query.parameters.len(), 0);
}

#[test]
fn test_or_filter_is_parenthesized_with_extra_where() {
    let schema = schema();
    let query = GraphAgqlToSql::new(&schema)
        .sql_for(
            "id = 'a' OR my('corpus').label = 'CC'",
            "transcript.transcript_id",
            Some("transcript.annotated_by = 'user'"),
            None,
            None,
        )
        .unwrap();
    assert_eq!(
        query.sql,
        "SELECT transcript.transcript_id FROM transcript \
         WHERE (transcript.transcript_id = 'a' OR transcript.corpus_name = 'CC') \
         AND (transcript.annotated_by = 'user') \
         ORDER BY transcript.transcript_id"
    );
}

#[test]
fn test_not_and_groups() {
    assert_eq!(
        sql(
            "NOT ('bell' IN labels('noise') OR list('comment').length > 2) AND id <> 'x'",
            "transcript.transcript_id"
        ),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE NOT ('bell' IN (SELECT label FROM annotation_layer_32 annotation \
         WHERE annotation.ag_id = transcript.ag_id) \
         OR (SELECT COUNT(*) FROM annotation_layer_31 annotation \
         WHERE annotation.ag_id = transcript.ag_id) > 2) \
         AND transcript.transcript_id <> 'x' \
         ORDER BY transcript.transcript_id"
    );
}

#[test]
fn test_literals_are_escaped() {
    assert_eq!(
        sql("my('corpus').label = \"O'Brien\"", "transcript.transcript_id"),
        "SELECT transcript.transcript_id FROM transcript \
         WHERE transcript.corpus_name = 'O\\'Brien' \
         ORDER BY transcript.transcript_id"
    );
}

#[test]
fn test_member_access_form() {
    assert_eq!(
        sql("corpus.label = 'CC'", "transcript.transcript_id"),
        sql("my('corpus').label = 'CC'", "transcript.transcript_id")
    );
}
