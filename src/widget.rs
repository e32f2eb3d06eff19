//! Toolkit-independent core of the widget. The gpui view in `app` forwards
//! pointer, timer and close events here and renders [DisplayFields].

use log::{debug, info, warn};
use std::time::Duration;

use crate::error::PersistenceError;
use crate::settings::{Position, Settings, SettingsStore};
use crate::state::{ConnectionState, DisplayFields, DragAnchor, Labels, WidgetState};
use crate::weather::WeatherSnapshot;

#[derive(Debug)]
pub struct WidgetController {
    store: SettingsStore,
    settings: Settings,
    position: Position,
    drag: Option<DragAnchor>,
    fields: DisplayFields,
    state: WidgetState,
}

impl WidgetController {
    /// Load settings and place the widget at the last saved position
    pub fn new(store: SettingsStore, labels: &'static Labels) -> Self {
        let settings = store.load();
        let position = settings.last_position;
        info!(
            "Starting at ({}, {}), refreshing every {}ms",
            position.x, position.y, settings.update_interval
        );

        Self {
            store,
            settings,
            position,
            drag: None,
            fields: DisplayFields::new(labels),
            state: WidgetState::Initializing,
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        self.settings.refresh_interval()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn fields(&self) -> &DisplayFields {
        &self.fields
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Apply the outcome of one poll. Ignored once the widget is closed.
    pub fn apply_poll(&mut self, result: Option<WeatherSnapshot>) {
        if self.state.is_closed() {
            debug!("Dropping poll result that arrived after close");
            return;
        }

        let previous = self.state.connection();
        self.state = match result {
            Some(snapshot) => {
                self.fields.show_snapshot(&snapshot);
                WidgetState::DisplayingOk
            }
            None => {
                self.fields.show_error();
                WidgetState::DisplayingError
            }
        };

        match (previous, self.state.connection()) {
            (Some(ConnectionState::Ok), Some(ConnectionState::Error)) => {
                warn!("Weather unavailable, showing error text")
            }
            (Some(ConnectionState::Error), Some(ConnectionState::Ok)) => {
                info!("Weather available again")
            }
            _ => {}
        }
    }

    /// Left button pressed on the body, `pointer` in screen coordinates
    pub fn begin_drag(&mut self, pointer: Position) {
        self.drag = Some(DragAnchor::new(pointer, self.position));
    }

    /// Pointer moved with the button held. Returns the new window origin, or
    /// `None` if no drag is active.
    pub fn drag_to(&mut self, pointer: Position) -> Option<Position> {
        let anchor = self.drag?;
        self.position = anchor.window_origin(pointer);
        Some(self.position)
    }

    /// The platform moved the window
    pub fn window_moved(&mut self, position: Position) {
        self.position = position;
    }

    /// The platform moved the window while it may own the pointer. An
    /// inactive window means the release went elsewhere, so a pending drag
    /// ends here. Returns whether a drag was finished.
    pub fn platform_moved(
        &mut self,
        position: Position,
        window_active: bool,
    ) -> Result<bool, PersistenceError> {
        self.position = position;
        if window_active {
            return Ok(false);
        }
        self.end_drag()
    }

    /// Button released. Persists the position if a drag was active and
    /// reports whether it was.
    pub fn end_drag(&mut self) -> Result<bool, PersistenceError> {
        if self.drag.take().is_none() {
            return Ok(false);
        }
        self.persist_position()?;
        Ok(true)
    }

    /// Save the current position and enter the terminal state. The state
    /// changes even if saving fails.
    pub fn close(&mut self) -> Result<(), PersistenceError> {
        if self.state.is_closed() {
            return Ok(());
        }
        self.drag = None;
        self.state = WidgetState::Closed;
        self.persist_position()
    }

    fn persist_position(&mut self) -> Result<(), PersistenceError> {
        self.settings.last_position = self.position;
        debug!(
            "Saving position ({}, {}) to {}",
            self.position.x,
            self.position.y,
            self.store.path().display()
        );
        self.store.save(&self.settings)
    }
}
