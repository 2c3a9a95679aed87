//! Notifications
//!
//! Transient messages shown when a request to the backend fails.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u32,
    pub text: String,
}

/// Handle used by editors to raise notifications
#[derive(Clone, Copy)]
pub struct Notifier {
    notices: RwSignal<Vec<Notice>>,
    next_id: StoredValue<u32>,
    timeout_ms: u32,
}

impl Notifier {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            notices: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
            timeout_ms,
        }
    }

    /// Show an error for the configured duration
    pub fn error(&self, text: impl Into<String>) {
        let text = text.into();
        log::error!("{}", text);

        let id = self.next_id.get_value();
        self.next_id.set_value(id.wrapping_add(1));
        self.notices.update(|list| list.push(Notice { id, text }));

        let this = *self;
        spawn_local(async move {
            TimeoutFuture::new(this.timeout_ms).await;
            this.dismiss(id);
        });
    }

    pub fn dismiss(&self, id: u32) {
        self.notices.update(|list| list.retain(|n| n.id != id));
    }
}

/// Bootstrap toast container pinned to the top-right corner of the viewport
const STACK_CLASS: &str = "toast-container position-fixed top-0 end-0 p-3";
/// Inline fallback for pages that do not load Bootstrap
const STACK_STYLE: &str = "position: fixed; top: 0; right: 0; z-index: 1090;";
const NOTICE_CLASS: &str = "alert alert-danger alert-dismissible shadow-sm";
const CLOSE_CLASS: &str = "btn-close";

/// Stack of active notifications
#[component]
pub fn NoticeStack(notifier: Notifier) -> impl IntoView {
    view! {
        <div class=STACK_CLASS style=STACK_STYLE aria-live="polite">
            <For
                each=move || notifier.notices.get()
                key=|notice| notice.id
                children=move |notice| {
                    let id = notice.id;
                    view! {
                        <div class=NOTICE_CLASS role="alert">
                            <span>{notice.text}</span>
                            <button
                                type="button"
                                class=CLOSE_CLASS
                                aria-label="Close"
                                on:click=move |_| notifier.dismiss(id)
                            ></button>
                        </div>
                    }
                }
            />
        </div>
    }
}
