//! Stacked histogram panel

use egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};
use lh_core::events::events::{HistogramComputed, SplitRequested, ViewCleared, ViewFiltered};
use serde_json::{json, Value};

use crate::chart::{bar_index_at, BarMode, ChartData, PlotLayout};
use crate::config::HistogramConfig;
use crate::controller::HistogramController;
use crate::panel::{Panel, PanelConfig, PanelContext, PanelError, PanelId, SplitLayout};

pub const PANEL_NAME: &str = "example_stacked_histogram";
pub const PANEL_LABEL: &str = "Example: Stacked Histogram";

/// Action name of the reset button
pub const RESET_ACTION: &str = "reset";

const SERIES_COLORS: [Color32; 2] = [
    Color32::from_rgb(92, 140, 97),
    Color32::from_rgb(100, 150, 250),
];

/// Histogram of a field's values, stacked, with click-to-filter
pub struct StackedHistogramPanel {
    id: PanelId,
    controller: HistogramController,
    last_error: Option<String>,
}

impl StackedHistogramPanel {
    pub fn new(config: HistogramConfig) -> Self {
        Self {
            id: PanelId::new_v4(),
            controller: HistogramController::new(config),
            last_error: None,
        }
    }

    pub fn controller(&self) -> &HistogramController {
        &self.controller
    }

    /// Error from the last hook run through the UI, if it failed
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Switch the histogram to `field`
    pub fn select_field(&mut self, ctx: &PanelContext, field: &str) -> Result<(), PanelError> {
        self.load(ctx, Some(field))
    }

    fn load(&mut self, ctx: &PanelContext, field: Option<&str>) -> Result<(), PanelError> {
        {
            let guard = ctx.view.read();
            let source = guard.as_deref().ok_or(PanelError::NoDataSource)?;
            self.controller.load(source, field)?;
        }
        self.announce_load(ctx);
        Ok(())
    }

    /// Tell the host a new histogram is ready and ask for the companion view
    fn announce_load(&self, ctx: &PanelContext) {
        if let Some(chart) = self.controller.chart() {
            ctx.events.publish(HistogramComputed {
                panel: PANEL_NAME.to_string(),
                field: chart.field.clone(),
                buckets: chart.len(),
                total: chart.total(),
            });
        }

        let companion = &self.controller.config().companion_panel;
        ctx.ops.split_panel(companion, SplitLayout::Horizontal);
        ctx.events.publish(SplitRequested {
            panel: PANEL_NAME.to_string(),
            companion: companion.clone(),
        });
    }

    fn record(&mut self, result: Result<(), PanelError>) {
        match result {
            Ok(()) => self.last_error = None,
            Err(e) => {
                tracing::error!("Histogram panel: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Draw the chart; returns the key of a clicked bar
    fn show_chart(id: PanelId, bar_width: f64, ui: &mut Ui, chart: &ChartData, layout: &PlotLayout) -> Option<String> {
        let keys = chart.keys().to_vec();
        let axis_keys = keys.clone();
        let series_count = chart.series.len().max(1) as f64;

        let plot = Plot::new(("stacked_histogram", id))
            .legend(Legend::default())
            .x_axis_label(layout.x_label.clone())
            .y_axis_label(layout.y_label.clone())
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .x_axis_formatter(move |value, _max_chars, _range| {
                let nearest = value.round();
                if nearest < 0.0 || (value - nearest).abs() > 1e-6 {
                    return String::new();
                }
                axis_keys.get(nearest as usize).cloned().unwrap_or_default()
            });

        let response = plot.show(ui, |plot_ui| {
            let mut charts: Vec<BarChart> = Vec::new();

            for (idx, series) in chart.series.iter().enumerate() {
                let (offset, width) = match layout.bar_mode {
                    BarMode::Stack => (0.0, bar_width),
                    BarMode::Group => {
                        let width = bar_width / series_count;
                        ((idx as f64 - (series_count - 1.0) / 2.0) * width, width)
                    }
                };

                let bars = series
                    .keys
                    .iter()
                    .zip(&series.values)
                    .enumerate()
                    .map(|(i, (key, value))| {
                        Bar::new(i as f64 + offset, *value as f64)
                            .width(width)
                            .name(key)
                    })
                    .collect();

                let mut bar_chart = BarChart::new(bars)
                    .color(SERIES_COLORS[idx % SERIES_COLORS.len()])
                    .name(&series.name);

                if layout.bar_mode == BarMode::Stack && !charts.is_empty() {
                    let below: Vec<&BarChart> = charts.iter().collect();
                    bar_chart = bar_chart.stack_on(&below);
                }
                charts.push(bar_chart);
            }

            for bar_chart in charts {
                plot_ui.bar_chart(bar_chart);
            }

            plot_ui.pointer_coordinate()
        });

        if response.response.clicked() {
            if let Some(point) = response.inner {
                return bar_index_at(point.x, keys.len(), bar_width).map(|i| keys[i].clone());
            }
        }
        None
    }
}

impl Default for StackedHistogramPanel {
    fn default() -> Self {
        Self::new(HistogramConfig::default())
    }
}

impl Panel for StackedHistogramPanel {
    fn id(&self) -> PanelId {
        self.id
    }

    fn config(&self) -> PanelConfig {
        PanelConfig {
            name: PANEL_NAME.to_string(),
            label: PANEL_LABEL.to_string(),
        }
    }

    fn on_load(&mut self, ctx: &PanelContext) -> Result<(), PanelError> {
        self.load(ctx, None)
    }

    fn on_change_view(&mut self, ctx: &PanelContext) -> Result<(), PanelError> {
        self.load(ctx, None)
    }

    fn on_user_action(&mut self, ctx: &PanelContext, action: &str) -> Result<(), PanelError> {
        if action != RESET_ACTION {
            return Err(PanelError::UnknownAction(action.to_string()));
        }

        let cleared = {
            let guard = ctx.view.read();
            let source = guard.as_deref().ok_or(PanelError::NoDataSource)?;
            self.controller.reset(source)?
        };

        ctx.ops.set_view(cleared);
        ctx.events.publish(ViewCleared {
            panel: PANEL_NAME.to_string(),
        });
        self.announce_load(ctx);
        Ok(())
    }

    fn on_chart_click(&mut self, ctx: &PanelContext, key: &str) -> Result<(), PanelError> {
        let view = {
            let guard = ctx.view.read();
            let source = guard.as_deref().ok_or(PanelError::NoDataSource)?;
            match self.controller.select_bar(source, key)? {
                Some(view) => view,
                None => return Ok(()),
            }
        };

        let filter = view.active_filter().map(ToString::to_string).unwrap_or_default();
        let matching = view.len();
        ctx.ops.set_view(view);
        ctx.events.publish(ViewFiltered {
            panel: PANEL_NAME.to_string(),
            filter,
            matching,
        });
        Ok(())
    }

    fn ui(&mut self, ctx: &PanelContext, ui: &mut Ui) {
        let layout = self.controller.config().layout.clone();
        let bar_width = self.controller.config().bar_width as f64;
        let fields = ctx
            .view
            .read()
            .as_ref()
            .map(|view| view.countable_fields())
            .unwrap_or_default();

        let mut selected_field = None;
        let mut reset_clicked = false;

        ui.vertical_centered(|ui| {
            ui.heading(layout.title.as_str());
        });

        ui.horizontal(|ui| {
            let current = self.controller.target_field().unwrap_or_default();
            egui::ComboBox::from_id_source((self.id, "target_field"))
                .selected_text(if current.is_empty() { "Select field" } else { current })
                .show_ui(ui, |ui| {
                    for field in &fields {
                        if ui.selectable_label(field == current, field.as_str()).clicked() {
                            selected_field = Some(field.clone());
                        }
                    }
                });

            if ui.button("Reset Chart").clicked() {
                reset_clicked = true;
            }
        });

        if let Some(err) = &self.last_error {
            ui.colored_label(Color32::from_rgb(220, 90, 90), err.as_str());
        }

        let clicked_key = match self.controller.chart() {
            Some(chart) if !chart.is_empty() => Self::show_chart(self.id, bar_width, ui, chart, &layout),
            Some(_) => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No values to display").weak());
                });
                None
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label("No data to display");
                });
                None
            }
        };

        if let Some(field) = selected_field {
            let result = self.select_field(ctx, &field);
            self.record(result);
        }
        if let Some(key) = clicked_key {
            let result = self.on_chart_click(ctx, &key);
            self.record(result);
        }
        if reset_clicked {
            let result = self.on_user_action(ctx, RESET_ACTION);
            self.record(result);
        }
    }

    fn save_state(&self) -> Value {
        json!({
            "target_field": self.controller.target_field(),
        })
    }

    fn load_state(&mut self, state: Value) {
        if let Some(field) = state.get("target_field").and_then(Value::as_str) {
            self.controller.restore_target_field(field);
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
