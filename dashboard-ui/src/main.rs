//! SIC3PRO Dashboard
//!
//! Project-control dashboard built with Leptos (WASM).
//!
//! # Architecture
//!
//! A client-side rendered (CSR) Leptos application. The page fetches its
//! datasets from `data/datasets/` relative to itself, so it runs under any
//! static file server, including `sic3pro-dashboard serve`.

use leptos::*;

mod api;
mod app;
mod components;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
