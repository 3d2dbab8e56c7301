//! Terminal view component.
//!
//! Renders the session's [`ScreenBuffer`] and turns browser key events into
//! terminal input.

use std::rc::Rc;

use leptos::{ev, prelude::*};

use crate::core::terminal::{ScreenBuffer, Terminal};
use crate::core::TerminalSession;
use crate::models::key::data_for_key;

stylance::import_crate_style!(css, "src/components/terminal/terminal.module.css");

// ============================================================================
// LiveScreen
// ============================================================================

/// A [`ScreenBuffer`] that publishes its revision to a signal, so the view
/// re-renders after writes made outside the reactive system (timers,
/// command handlers).
pub struct LiveScreen {
    buffer: ScreenBuffer,
    revision: RwSignal<u64>,
}

impl LiveScreen {
    pub fn new() -> Self {
        Self {
            buffer: ScreenBuffer::new(),
            revision: RwSignal::new(0),
        }
    }

    pub fn revision(&self) -> RwSignal<u64> {
        self.revision
    }

    pub fn buffer(&self) -> &ScreenBuffer {
        &self.buffer
    }

    fn publish(&self) {
        self.revision.set(self.buffer.revision());
    }
}

impl Default for LiveScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for LiveScreen {
    fn write(&self, text: &str) {
        self.buffer.write(text);
        self.publish();
    }

    fn clear(&self) {
        self.buffer.clear();
        self.publish();
    }
}

// ============================================================================
// Component
// ============================================================================

/// Auto-scroll to the bottom whenever the screen changes.
fn setup_autoscroll_effect(revision: RwSignal<u64>, container_ref: NodeRef<leptos::html::Div>) {
    Effect::new(move || {
        revision.track();
        if let Some(el) = container_ref.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });
}

#[component]
pub fn TerminalView(session: TerminalSession, screen: Rc<LiveScreen>) -> impl IntoView {
    let container_ref = NodeRef::<leptos::html::Div>::new();
    let revision = screen.revision();
    let session = StoredValue::new_local(session);
    let screen = StoredValue::new_local(screen);

    setup_autoscroll_effect(revision, container_ref);

    // Focus on mount so typing works without a click
    Effect::new(move || {
        if let Some(el) = container_ref.get() {
            let _ = el.focus();
        }
    });

    let handle_keydown = move |ev: ev::KeyboardEvent| {
        if ev.meta_key() || ev.alt_key() {
            return;
        }
        let Some(data) = data_for_key(&ev.key(), ev.ctrl_key()) else {
            return;
        };
        ev.prevent_default();
        let session = session.get_value();
        wasm_bindgen_futures::spawn_local(async move {
            session.handle_data(&data).await;
        });
    };

    let rows = move || {
        revision.track();
        screen.with_value(|s| s.buffer().rows())
    };

    let cursor_style = move || {
        revision.track();
        let (row, col) = screen.with_value(|s| s.buffer().cursor());
        format!("top:calc({} * var(--line-height));left:{}ch;", row, col)
    };

    view! {
        <div
            class=css::terminal
            node_ref=container_ref
            tabindex="0"
            on:keydown=handle_keydown
        >
            <div class=css::screen>
                {move || {
                    rows()
                        .into_iter()
                        .map(|row| {
                            view! {
                                <div class=css::row>
                                    {row
                                        .into_iter()
                                        .map(|span| {
                                            view! { <span style=span.style.css()>{span.text}</span> }
                                        })
                                        .collect_view()}
                                </div>
                            }
                        })
                        .collect_view()
                }}
                <div class=css::cursor style=cursor_style></div>
            </div>
        </div>
    }
}
