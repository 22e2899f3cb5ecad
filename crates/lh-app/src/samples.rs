//! Sample browser shown in the companion tab

use egui::{RichText, ScrollArea, Ui};
use lh_data::SampleView;
use lh_views::ViewSlot;
use serde_json::Value;

/// List the samples of the current view
pub fn show(ui: &mut Ui, view: &ViewSlot) {
    let guard = view.read();
    let Some(source) = guard.as_deref() else {
        ui.label("No dataset loaded");
        return;
    };

    ui.horizontal(|ui| {
        ui.strong(source.source_name());
        ui.label(format!("{} samples", source.len()));
    });
    match source.active_filter() {
        Some(filter) => ui.label(RichText::new(format!("Filter: {filter}")).italics()),
        None => ui.label(RichText::new("No filter").weak()),
    };
    ui.separator();

    let Some(samples) = source.as_any().downcast_ref::<SampleView>() else {
        ui.label("This source cannot list its samples");
        return;
    };

    let rows = samples.samples();
    let row_height = ui.text_style_height(&egui::TextStyle::Body);
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show_rows(ui, row_height, rows.len(), |ui, range| {
            for sample in &rows[range] {
                let details = serde_json::to_string_pretty(sample).unwrap_or_default();
                ui.label(RichText::new(summary(sample)).monospace())
                    .on_hover_text(details);
            }
        });
}

/// One-line description: id, file name, tags and visible labels
fn summary(sample: &Value) -> String {
    let id = sample.get("id").and_then(Value::as_str).unwrap_or("?");
    let file = sample
        .get("filepath")
        .and_then(Value::as_str)
        .and_then(|path| path.rsplit(['/', '\\']).next())
        .unwrap_or("");
    let tags: Vec<&str> = sample
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| tags.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut labels = Vec::new();
    collect_labels(sample, &mut labels);

    let mut line = id.to_string();
    if !file.is_empty() {
        line.push_str(&format!("  {file}"));
    }
    if !tags.is_empty() {
        line.push_str(&format!("  [{}]", tags.join(", ")));
    }
    if !labels.is_empty() {
        line.push_str(&format!("  {}", labels.join(" ")));
    }
    line
}

fn collect_labels<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => {
            if let Some(label) = map.get("label").and_then(Value::as_str) {
                out.push(label);
            }
            for (key, child) in map {
                if key != "label" {
                    collect_labels(child, out);
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_labels(item, out)),
        _ => {}
    }
}
