use transcript_pipeline::application::ports::DatasetError;
use transcript_pipeline::infrastructure::dataset::{parse_csv, write_csv};

const MANIFEST: &str = "filename,text,up_votes,age,gender,accent,duration\n\
cv-valid-dev/sample-000000.mp3,be careful,1,,,,\n\
cv-valid-dev/sample-000001.mp3,\"hello, world\",2,twenties,male,us,\n";

#[test]
fn given_common_voice_manifest_when_parsing_then_columns_and_rows_kept() {
    let dataset = parse_csv(MANIFEST.as_bytes()).unwrap();

    assert_eq!(dataset.len(), 2);
    assert_eq!(
        dataset.columns(),
        ["filename", "text", "up_votes", "age", "gender", "accent", "duration"]
    );
    assert_eq!(dataset.rows()[1].get("text"), Some("hello, world"));
    assert_eq!(dataset.rows()[0].get("age"), None);
}

#[test]
fn given_transcribed_dataset_when_writing_then_generated_text_is_last_column() {
    let dataset = parse_csv(MANIFEST.as_bytes()).unwrap();
    let rows = dataset
        .rows()
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, row)| row.with_generated_text((i == 0).then(|| "BE CAREFUL".to_string())))
        .collect();
    let dataset = dataset.with_rows(rows);

    let written = String::from_utf8(write_csv(&dataset).unwrap()).unwrap();
    let mut lines = written.lines();

    assert_eq!(
        lines.next(),
        Some("filename,text,up_votes,age,gender,accent,duration,generated_text")
    );
    assert_eq!(
        lines.next(),
        Some("cv-valid-dev/sample-000000.mp3,be careful,1,,,,,BE CAREFUL")
    );
    assert_eq!(
        lines.next(),
        Some("cv-valid-dev/sample-000001.mp3,\"hello, world\",2,twenties,male,us,,")
    );
}

#[test]
fn given_augmented_file_when_reparsed_and_written_then_generated_text_not_duplicated() {
    let input = "filename,generated_text\na.mp3,hi\n";

    let dataset = parse_csv(input.as_bytes()).unwrap();
    let written = String::from_utf8(write_csv(&dataset).unwrap()).unwrap();

    assert_eq!(written, input);
}

#[test]
fn given_ragged_record_when_parsing_then_malformed() {
    let result = parse_csv(b"filename,age\na.mp3,30,extra\n");

    assert!(matches!(result, Err(DatasetError::Malformed(_))));
}

#[test]
fn given_empty_input_when_parsing_then_malformed() {
    let result = parse_csv(b"");

    assert!(matches!(result, Err(DatasetError::Malformed(_))));
}

#[test]
fn given_repeated_column_names_when_round_tripping_then_every_cell_survives() {
    let dataset = parse_csv(b"filename,note,note,note.1\na.wav,x,y,z\n").unwrap();

    assert_eq!(dataset.columns(), ["filename", "note", "note.2", "note.1"]);
    assert_eq!(dataset.rows()[0].get("note"), Some("x"));
    assert_eq!(dataset.rows()[0].get("note.2"), Some("y"));

    let written = String::from_utf8(write_csv(&dataset).unwrap()).unwrap();

    assert_eq!(
        written,
        "filename,note,note.2,note.1,generated_text\na.wav,x,y,z,\n"
    );
}
