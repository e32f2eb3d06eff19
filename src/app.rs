use gpui::prelude::*;
use gpui::*;
use log::{debug, error, info};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::settings::Position;
use crate::theme::{Theme, ThemeMode};
use crate::weather::WeatherClient;
use crate::widget::WidgetController;

actions!(weather_widget, [CloseWidget]);

pub const WIDGET_WIDTH: f32 = 200.0;
pub const WIDGET_HEIGHT: f32 = 160.0;

pub struct WeatherWidget {
    controller: WidgetController,
    /// Dropping this stops the refresh timer
    refresh_task: Option<Task<()>>,
    focus_handle: FocusHandle,
    _bounds_subscription: Subscription,
}

impl WeatherWidget {
    pub fn new(
        controller: WidgetController,
        client: Arc<WeatherClient>,
        window: &mut Window,
        cx: &mut Context<'_, Self>,
    ) -> Self {
        // Keep the tracked position in sync with moves done by the platform.
        // A drag whose release was swallowed by the platform is finished
        // here once the window loses activation; otherwise the next
        // button-less mouse move over the window or close saves it.
        let bounds_subscription = cx.observe_window_bounds(window, |widget, window, _cx| {
            let origin = window_origin(window);
            match widget
                .controller
                .platform_moved(origin, window.is_window_active())
            {
                Ok(true) => info!("Widget moved to ({}, {})", origin.x, origin.y),
                Ok(false) => {}
                Err(err) => error!("Failed to save widget position: {err}"),
            }
        });

        let view = cx.weak_entity();
        window.on_window_should_close(cx, move |window, cx| {
            let _ = view.update(cx, |widget, _cx| widget.shutdown(window));
            cx.quit();
            true
        });

        info!("Polling weather for {}", client.city());
        let refresh_task = Self::spawn_refresh(controller.refresh_interval(), client, cx);

        Self {
            controller,
            refresh_task: Some(refresh_task),
            focus_handle: cx.focus_handle(),
            _bounds_subscription: bounds_subscription,
        }
    }

    /// Poll immediately, then once per interval. Each request runs on the
    /// background executor and its result is applied back on the UI thread
    /// before the next tick is scheduled, so polls never overlap.
    fn spawn_refresh(
        interval: Duration,
        client: Arc<WeatherClient>,
        cx: &mut Context<'_, Self>,
    ) -> Task<()> {
        cx.spawn(async move |this, cx| loop {
            let started = Instant::now();

            let client = client.clone();
            let result = cx
                .background_spawn(async move { client.get_weather() })
                .await;

            let applied = this.update(cx, |widget, cx| {
                widget.controller.apply_poll(result);
                debug!("Display state: {:?}", widget.controller.state());
                cx.notify();
            });
            if applied.is_err() {
                break;
            }

            cx.background_executor()
                .timer(interval.saturating_sub(started.elapsed()))
                .await;
        })
    }

    fn finish_drag(&mut self, window: &Window) {
        self.controller.window_moved(window_origin(window));
        match self.controller.end_drag() {
            Ok(true) => {
                let position = self.controller.position();
                info!("Widget moved to ({}, {})", position.x, position.y);
            }
            Ok(false) => {}
            Err(err) => error!("Failed to save widget position: {err}"),
        }
    }

    /// Persist the position and stop polling
    fn shutdown(&mut self, window: &Window) {
        self.controller.window_moved(window_origin(window));
        if let Err(err) = self.controller.close() {
            error!("Failed to save widget position: {err}");
        }
        self.refresh_task = None;
        info!("Widget closed");
    }

    fn close(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) {
        self.shutdown(window);
        window.remove_window();
        cx.quit();
    }

    fn render_close_button(&self, theme: &Theme, cx: &mut Context<'_, Self>) -> impl IntoElement {
        let hover = theme.close_hover;

        div()
            .flex()
            .items_center()
            .justify_center()
            .size(px(20.0))
            .rounded(px(3.0))
            .bg(theme.close_background)
            .text_color(theme.foreground)
            .text_size(px(12.0))
            .cursor_pointer()
            .hover(move |style| style.bg(hover))
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|widget, _event: &MouseDownEvent, window, cx| {
                    // Don't let the body start a drag
                    cx.stop_propagation();
                    widget.close(window, cx);
                }),
            )
            .child("×")
    }
}

impl Render for WeatherWidget {
    fn render(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
        self.focus_handle.focus(window);

        let theme = Theme::from_mode(ThemeMode::from_appearance(window.appearance()));
        let lines = self.controller.fields().lines().map(str::to_string);

        div()
            .size_full()
            .flex()
            .flex_col()
            .pb_2()
            .rounded(px(15.0))
            .bg(theme.background)
            .text_color(theme.foreground)
            .track_focus(&self.focus_handle)
            .on_action(cx.listener(|widget, _: &CloseWidget, window, cx| {
                widget.close(window, cx);
            }))
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|widget, event: &MouseDownEvent, window, _cx| {
                    let origin = window_origin(window);
                    widget.controller.window_moved(origin);
                    widget
                        .controller
                        .begin_drag(screen_point(origin, event.position));
                    window.start_window_move();
                }),
            )
            .on_mouse_move(cx.listener(|widget, event: &MouseMoveEvent, window, _cx| {
                if !widget.controller.is_dragging() {
                    return;
                }
                if event.pressed_button == Some(MouseButton::Left) {
                    let pointer = screen_point(window_origin(window), event.position);
                    widget.controller.drag_to(pointer);
                } else {
                    // The release went to the platform while it owned the move
                    widget.finish_drag(window);
                }
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|widget, _event: &MouseUpEvent, window, _cx| {
                    widget.finish_drag(window);
                }),
            )
            .child(
                // Title bar, close button pushed to the right
                div()
                    .flex()
                    .flex_row()
                    .justify_end()
                    .px_1()
                    .pt_1()
                    .child(self.render_close_button(&theme, cx)),
            )
            .child(
                div()
                    .flex()
                    .flex_col()
                    .items_center()
                    .gap_1()
                    .text_sm()
                    .children(lines.map(|line| div().child(line))),
            )
    }
}

fn window_origin(window: &Window) -> Position {
    let origin = window.bounds().origin;
    Position {
        x: f32::from(origin.x).round() as i32,
        y: f32::from(origin.y).round() as i32,
    }
}

/// Window-relative pointer position to screen coordinates
fn screen_point(origin: Position, pointer: Point<Pixels>) -> Position {
    Position {
        x: origin.x + f32::from(pointer.x).round() as i32,
        y: origin.y + f32::from(pointer.y).round() as i32,
    }
}
