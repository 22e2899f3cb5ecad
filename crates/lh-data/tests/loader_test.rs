use std::fs;

use lh_core::{DataSource, ViewFilter};
use lh_data::{load_dataset, DataError, DataFormat, DatasetConfig};

#[test]
fn test_load_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("animals.json");
    fs::write(
        &path,
        r#"[
            {"filepath": "a.jpg", "tags": ["train"], "ground_truth": {"detections": [{"label": "cat"}, {"label": "cat"}]}},
            {"filepath": "b.jpg", "tags": ["test"], "ground_truth": {"detections": [{"label": "dog"}]}}
        ]"#,
    )
    .unwrap();

    let dataset = load_dataset(&DatasetConfig::new(&path)).unwrap();
    assert_eq!(dataset.name(), "animals");
    assert_eq!(dataset.len(), 2);

    let view = dataset.into_view();
    let counts = view.count_values("ground_truth.detections.label").unwrap();
    assert_eq!(counts.get("cat"), Some(&2));
    assert_eq!(counts.get("dog"), Some(&1));
}

#[test]
fn test_load_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weather.jsonl");
    fs::write(
        &path,
        "{\"weather\": {\"label\": \"rain\"}}\n\n{\"weather\": {\"label\": \"sun\"}}\n",
    )
    .unwrap();

    let view = load_dataset(&DatasetConfig::new(&path)).unwrap().into_view();
    assert_eq!(view.len(), 2);
    assert_eq!(view.count_values("weather.label").unwrap().len(), 2);
}

#[test]
fn test_load_csv_with_tags_and_nested_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flat.csv");
    fs::write(
        &path,
        "filepath,size,width,tags,ground_truth.label\n\
         a.jpg,small,640,train;hard,cat\n\
         b.jpg,large,1280,test,dog\n\
         c.jpg,small,N/A,,cat\n",
    )
    .unwrap();

    let view = load_dataset(&DatasetConfig::new(&path)).unwrap().into_view();
    assert_eq!(view.len(), 3);

    let tags = view.count_values("tags").unwrap();
    assert_eq!(tags.get("train"), Some(&1));
    assert_eq!(tags.get("hard"), Some(&1));
    assert_eq!(tags.get("test"), Some(&1));

    let widths = view.count_values("width").unwrap();
    assert_eq!(widths.get("640"), Some(&1));
    assert_eq!(widths.len(), 2);

    let cats = view
        .apply_filter(&ViewFilter::label_contains("ground_truth", "cat").unwrap())
        .unwrap();
    assert_eq!(cats.len(), 2);
}

#[test]
fn test_declared_fields_exist_on_empty_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");
    fs::write(&path, "[]").unwrap();

    let config = DatasetConfig {
        declared_fields: vec!["ground_truth.detections.label".to_string()],
        ..DatasetConfig::new(&path)
    };
    let view = load_dataset(&config).unwrap().into_view();

    assert!(view.is_empty());
    assert!(view.count_values("ground_truth.detections.label").unwrap().is_empty());
}

#[test]
fn test_explicit_format_and_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("samples.txt");
    fs::write(&path, "{\"size\": \"small\"}\n").unwrap();

    assert!(matches!(
        load_dataset(&DatasetConfig::new(&path)),
        Err(DataError::UnsupportedFormat(_))
    ));

    let config = DatasetConfig {
        format: Some(DataFormat::JsonLines),
        ..DatasetConfig::new(&path)
    };
    assert_eq!(load_dataset(&config).unwrap().len(), 1);

    let missing = DatasetConfig::new(dir.path().join("missing.json"));
    assert!(matches!(load_dataset(&missing), Err(DataError::Io(_))));
}
