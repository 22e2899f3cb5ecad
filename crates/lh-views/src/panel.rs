//! Panel abstraction - lifecycle hooks a host drives

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use egui::Ui;
use lh_core::{DataSource, EventBus, QueryError};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a panel instance
pub type PanelId = Uuid;

/// Slot holding the view currently shown by the host
pub type ViewSlot = Arc<RwLock<Option<Box<dyn DataSource>>>>;

/// Errors surfaced by panel hooks
#[derive(Error, Debug)]
pub enum PanelError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("No data source is loaded")]
    NoDataSource,

    #[error("Unknown panel action '{0}'")]
    UnknownAction(String),
}

/// Static description of a panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    /// Stable name the host registers the panel under
    pub name: String,
    /// Human readable label
    pub label: String,
}

/// Orientation of a split requested by a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitLayout {
    Horizontal,
    Vertical,
}

/// Operations a panel may ask of its host
pub trait HostOps: Send + Sync {
    /// Open `companion` next to the requesting panel
    fn split_panel(&self, companion: &str, layout: SplitLayout);

    /// Replace the view the host displays
    fn set_view(&self, view: Box<dyn DataSource>);
}

/// Context passed to panels on every hook
#[derive(Clone)]
pub struct PanelContext {
    /// Current view
    pub view: ViewSlot,

    /// Host operations
    pub ops: Arc<dyn HostOps>,

    /// Event bus shared with the host
    pub events: EventBus,
}

impl PanelContext {
    pub fn new(view: ViewSlot, ops: Arc<dyn HostOps>, events: EventBus) -> Self {
        Self { view, ops, events }
    }
}

/// Base trait for all panels
pub trait Panel: Send + Sync {
    /// Get the unique ID of this panel
    fn id(&self) -> PanelId;

    /// Get the panel's registration info
    fn config(&self) -> PanelConfig;

    /// Called when the panel is opened
    fn on_load(&mut self, ctx: &PanelContext) -> Result<(), PanelError>;

    /// Called after the host's current view changed
    fn on_change_view(&mut self, ctx: &PanelContext) -> Result<(), PanelError>;

    /// Called for named user actions (buttons)
    fn on_user_action(&mut self, ctx: &PanelContext, action: &str) -> Result<(), PanelError>;

    /// Called when the user clicks a chart element
    fn on_chart_click(&mut self, ctx: &PanelContext, key: &str) -> Result<(), PanelError>;

    /// Draw the UI
    fn ui(&mut self, ctx: &PanelContext, ui: &mut Ui);

    /// Save panel state
    fn save_state(&self) -> Value;

    /// Restore panel state
    fn load_state(&mut self, state: Value);

    /// Get as any for downcasting
    fn as_any(&self) -> &dyn std::any::Any;

    /// Get as any mut for downcasting
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// [`HostOps`] writing into a shared [`ViewSlot`] and queueing split requests.
///
/// The host polls [`SharedViewHost::take_view_changed`] and
/// [`SharedViewHost::take_split_requests`] once per frame.
pub struct SharedViewHost {
    view: ViewSlot,
    view_changed: AtomicBool,
    splits: Mutex<Vec<(String, SplitLayout)>>,
}

impl SharedViewHost {
    pub fn new(view: ViewSlot) -> Self {
        Self {
            view,
            view_changed: AtomicBool::new(false),
            splits: Mutex::new(Vec::new()),
        }
    }

    /// Whether the view was replaced since the last call
    pub fn take_view_changed(&self) -> bool {
        self.view_changed.swap(false, Ordering::SeqCst)
    }

    /// Split requests received since the last call
    pub fn take_split_requests(&self) -> Vec<(String, SplitLayout)> {
        std::mem::take(&mut *self.splits.lock())
    }
}

impl HostOps for SharedViewHost {
    fn split_panel(&self, companion: &str, layout: SplitLayout) {
        self.splits.lock().push((companion.to_string(), layout));
    }

    fn set_view(&self, view: Box<dyn DataSource>) {
        *self.view.write() = Some(view);
        self.view_changed.store(true, Ordering::SeqCst);
    }
}
