use crt_term::App;
use crt_term::utils::logger;
use leptos::prelude::*;
use log::LevelFilter;
use wasm_bindgen::JsCast;

/// Shown instead of the terminal when the page has no mount point.
#[component]
fn MountError() -> impl IntoView {
    view! {
        <pre style="color:#ff5555;padding:1rem;">
            "Terminal failed to start: element #app not found."
        </pre>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    logger::init(if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    match document().get_element_by_id("app") {
        Some(root) => mount_to(root.unchecked_into::<web_sys::HtmlElement>(), App).forget(),
        None => {
            log::error!("mount point #app missing");
            mount_to_body(MountError);
        }
    }
}
