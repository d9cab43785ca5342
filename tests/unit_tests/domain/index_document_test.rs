use serde_json::json;

use transcript_pipeline::domain::{DatasetRow, IndexDocument};

#[test]
fn given_row_with_nan_text_and_duration_when_mapping_then_empty_text_and_null_duration() {
    let row = DatasetRow::from_pairs([
        ("filename", "a.mp3"),
        ("generated_text", "NaN"),
        ("duration", "NaN"),
        ("age", "30"),
    ]);

    let document = IndexDocument::from_row(&row);

    assert_eq!(document.generated_text, "");
    assert_eq!(document.duration, None);
    assert_eq!(document.age, Some(json!(30)));
}

#[test]
fn given_document_with_absent_fields_when_serialized_then_nulls_are_explicit() {
    let row = DatasetRow::from_pairs([("generated_text", "hello"), ("age", "30")]);

    let value = serde_json::to_value(IndexDocument::from_row(&row)).unwrap();

    assert_eq!(
        value,
        json!({
            "generated_text": "hello",
            "duration": null,
            "age": 30,
            "gender": null,
            "accent": null,
        })
    );
}

#[test]
fn given_textual_age_and_fractional_duration_when_mapping_then_both_kept() {
    let row = DatasetRow::from_pairs([
        ("generated_text", "hi"),
        ("duration", "2.5"),
        ("age", "twenties"),
        ("gender", "female"),
        ("accent", "us"),
    ]);

    let document = IndexDocument::from_row(&row);

    assert_eq!(document.duration, Some(2.5));
    assert_eq!(document.age, Some(json!("twenties")));
    assert_eq!(document.gender.as_deref(), Some("female"));
    assert_eq!(document.accent.as_deref(), Some("us"));
}

#[test]
fn given_textual_and_fractional_ages_when_serialized_then_string_and_number_are_kept() {
    let textual = DatasetRow::from_pairs([("generated_text", "hi"), ("age", "twenties")]);
    let fractional = DatasetRow::from_pairs([("generated_text", "hi"), ("age", "30.5")]);

    let textual = serde_json::to_value(IndexDocument::from_row(&textual)).unwrap();
    let fractional = serde_json::to_value(IndexDocument::from_row(&fractional)).unwrap();

    assert_eq!(textual["age"], json!("twenties"));
    assert_eq!(fractional["age"], json!(30.5));
}
