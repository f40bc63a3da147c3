//! Toast Notification Component
//!
//! Stacks the visible notifications, newest last. Each can be closed early.

use leptos::*;

use crate::state::global::{GlobalState, Notification};

/// Toast notification container
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div class="toast-stack">
            <For
                each=move || state.notifications.get()
                key=|n| n.id
                children=move |n: Notification| view! { <ToastMessage notification=n /> }
            />
        </div>
    }
}

#[component]
fn ToastMessage(notification: Notification) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let id = notification.id;

    view! {
        <div class=format!("toast {}", notification.severity.css_class()) role="alert">
            <span>{notification.message}</span>
            <button
                class="btn-close"
                aria-label="Close"
                on:click=move |_| state.dismiss(id)
            >
                "×"
            </button>
        </div>
    }
}
