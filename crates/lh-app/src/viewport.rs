//! Viewport - dockable panel tabs and their companion views

use std::collections::HashMap;

use egui::Ui;
use egui_dock::{DockArea, DockState, NodeIndex, TabViewer};
use lh_views::{Panel, PanelContext, PanelError, PanelId, SplitLayout};
use tracing::{debug, error};

use crate::samples;

/// A tab in the dock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tab {
    Panel(PanelId),
    /// Companion region requested by a panel, shows the current samples
    Companion(String),
}

/// Dock layout owning every panel
pub struct Viewport {
    dock_state: DockState<Tab>,
    panels: HashMap<PanelId, Box<dyn Panel>>,
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            dock_state: DockState::new(vec![]),
            panels: HashMap::new(),
        }
    }

    /// Add a panel as a tab
    pub fn add_panel(&mut self, panel: Box<dyn Panel>) {
        let id = panel.id();
        self.panels.insert(id, panel);

        if self.dock_state.main_surface().is_empty() {
            self.dock_state = DockState::new(vec![Tab::Panel(id)]);
        } else {
            self.dock_state.push_to_first_leaf(Tab::Panel(id));
        }
    }

    pub fn panels(&self) -> impl Iterator<Item = &dyn Panel> {
        self.panels.values().map(|panel| panel.as_ref())
    }

    /// Open the companion region `name` beside the panels, once
    pub fn open_companion(&mut self, name: &str, layout: SplitLayout) {
        let tab = Tab::Companion(name.to_string());
        if self.dock_state.find_tab(&tab).is_some() {
            return;
        }

        debug!("Opening companion view '{}' ({:?})", name, layout);
        if self.dock_state.main_surface().is_empty() {
            self.dock_state = DockState::new(vec![tab]);
            return;
        }

        let surface = self.dock_state.main_surface_mut();
        match layout {
            SplitLayout::Horizontal => surface.split_right(NodeIndex::root(), 0.6, vec![tab]),
            SplitLayout::Vertical => surface.split_below(NodeIndex::root(), 0.6, vec![tab]),
        };
    }

    /// Run a lifecycle hook on every panel; returns the last failure
    pub fn notify<F>(&mut self, ctx: &PanelContext, mut hook: F) -> Option<PanelError>
    where
        F: FnMut(&mut dyn Panel, &PanelContext) -> Result<(), PanelError>,
    {
        let mut failure = None;
        for panel in self.panels.values_mut() {
            if let Err(e) = hook(panel.as_mut(), ctx) {
                error!("Panel '{}' failed: {}", panel.config().name, e);
                failure = Some(e);
            }
        }
        failure
    }

    /// Draw the viewport
    pub fn ui(&mut self, ui: &mut Ui, ctx: &PanelContext) {
        DockArea::new(&mut self.dock_state)
            .show_close_buttons(true)
            .draggable_tabs(true)
            .show_inside(
                ui,
                &mut ViewportTabViewer {
                    panels: &mut self.panels,
                    ctx,
                },
            );
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

/// Tab viewer for egui_dock
struct ViewportTabViewer<'a> {
    panels: &'a mut HashMap<PanelId, Box<dyn Panel>>,
    ctx: &'a PanelContext,
}

impl<'a> TabViewer for ViewportTabViewer<'a> {
    type Tab = Tab;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        match tab {
            Tab::Panel(id) => match self.panels.get(id) {
                Some(panel) => panel.config().label.into(),
                None => "Unknown".into(),
            },
            Tab::Companion(_) => "Samples".into(),
        }
    }

    fn ui(&mut self, ui: &mut Ui, tab: &mut Self::Tab) {
        match tab {
            Tab::Panel(id) => {
                if let Some(panel) = self.panels.get_mut(id) {
                    panel.ui(self.ctx, ui);
                }
            }
            Tab::Companion(_) => samples::show(ui, &self.ctx.view),
        }
    }

    fn on_close(&mut self, tab: &mut Self::Tab) -> bool {
        if let Tab::Panel(id) = tab {
            self.panels.remove(id);
        }
        true
    }
}
