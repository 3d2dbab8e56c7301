//! Root application module.
//!
//! Builds the [`TerminalSession`] for this page load and starts the boot
//! sequence.

use std::rc::Rc;

use leptos::prelude::*;

use crate::components::{LiveScreen, TerminalView};
use crate::config::DeviceProfile;
use crate::core::{LocalStorageStore, TerminalSession};
use crate::utils::dom;

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    let screen = Rc::new(LiveScreen::new());
    let device = DeviceProfile::from_user_agent(&dom::user_agent());
    log::info!("starting terminal (mobile: {})", device.mobile);

    let session = TerminalSession::builder(screen.clone())
        .device(device)
        .store(Rc::new(LocalStorageStore::default()))
        .build();

    let booting = session.clone();
    wasm_bindgen_futures::spawn_local(async move {
        booting.boot().await;
    });

    view! { <TerminalView session=session screen=screen /> }
}
