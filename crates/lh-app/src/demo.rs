//! Demo dataset
//! Synthetic detection samples so the histogram can be explored without a file

use lh_data::{DataError, Dataset};
use serde_json::{json, Value};

const SAMPLE_COUNT: usize = 120;

const LABELS: [&str; 5] = ["bird", "cat", "dog", "horse", "person"];
const WEATHER: [&str; 3] = ["cloudy", "rain", "sunny"];
const SIZES: [&str; 3] = ["small", "medium", "large"];

/// Build the demo dataset. The same samples come out on every call.
pub fn demo_dataset() -> Result<Dataset, DataError> {
    let mut dataset = Dataset::new("demo-detections");
    dataset.add_samples((0..SAMPLE_COUNT).map(demo_sample))?;
    Ok(dataset)
}

fn demo_sample(i: usize) -> Value {
    let detection_count = (i * 7 + 3) % 4;
    let detections: Vec<Value> = (0..detection_count)
        .map(|j| {
            let label = LABELS[(i * 3 + j * 5 + i / 7) % LABELS.len()];
            let x = ((i + j) % 10) as f64 / 10.0;
            let y = ((i * 2 + j) % 10) as f64 / 10.0;
            json!({
                "label": label,
                "bounding_box": [x, y, 0.1 + (j as f64) * 0.05, 0.2],
            })
        })
        .collect();

    let mut tags = vec![match i % 10 {
        0..=6 => "train",
        7 | 8 => "validation",
        _ => "test",
    }];
    if i % 4 == 0 {
        tags.push("reviewed");
    }

    json!({
        "id": format!("demo-{i:04}"),
        "filepath": format!("/datasets/demo/images/{i:04}.jpg"),
        "tags": tags,
        "size": SIZES[i % SIZES.len()],
        "weather": {"label": WEATHER[i % WEATHER.len()]},
        "ground_truth": {"detections": detections},
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lh_core::DataSource;

    #[test]
    fn test_demo_dataset_is_deterministic() {
        let first = demo_dataset().unwrap();
        let second = demo_dataset().unwrap();
        assert_eq!(first.len(), SAMPLE_COUNT);
        assert_eq!(first.samples(), second.samples());
    }

    #[test]
    fn test_demo_dataset_counts() {
        let view = demo_dataset().unwrap().into_view();

        let labels = view.count_values("ground_truth.detections.label").unwrap();
        assert_eq!(labels.values().sum::<u64>(), 180);

        let tags = view.count_values("tags").unwrap();
        assert_eq!(tags.get("test"), Some(&12));
        assert_eq!(tags.get("reviewed"), Some(&30));

        assert_eq!(view.count_values("weather.label").unwrap().len(), WEATHER.len());
    }

    #[test]
    fn test_demo_dataset_exposes_label_fields() {
        let view = demo_dataset().unwrap().into_view();
        let fields = view.countable_fields();
        assert!(fields.iter().any(|f| f == "ground_truth.detections.label"));
        assert!(fields.iter().any(|f| f == "weather.label"));
        assert!(fields.iter().any(|f| f == "tags"));
    }
}
