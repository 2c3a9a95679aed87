//! Task Chain UI App
//!
//! Attaches reorder editors to the server-rendered task tables and
//! renders the notification stack.

use leptos::prelude::*;

use chain_reorder::EditorConfig;

use crate::editor;
use crate::notify::{NoticeStack, Notifier};

#[component]
pub fn App(config: EditorConfig) -> impl IntoView {
    let notifier = Notifier::new(config.notice_timeout_ms);

    let attached = editor::attach_all(&config, notifier);
    log::info!("{} task chain editor(s) attached", attached);

    view! { <NoticeStack notifier=notifier /> }
}
