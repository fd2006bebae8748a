//! Transient success/error banner.
//!
//! SYSTEM CONTEXT
//! ==============
//! Any page may raise a notice through `UiState::notify`; this component
//! renders the current one and dismisses it after a few seconds. Each notice
//! carries a sequence number so a stale timer cannot close a newer notice.

use leptos::prelude::*;

use crate::state::ui::{NoticeKind, UiState};

#[cfg(feature = "csr")]
const NOTICE_TTL_MS: u32 = 4_000;

#[component]
pub fn NoticeBanner() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();

    Effect::new(move || {
        let Some(seq) = ui.with(|u| u.notice.as_ref().map(|n| n.seq)) else {
            return;
        };
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(NOTICE_TTL_MS).await;
            ui.update(|u| u.dismiss(seq));
        });
        #[cfg(not(feature = "csr"))]
        let _ = seq;
    });

    let notice = move || ui.with(|u| u.notice.clone());

    view! {
        {move || {
            notice()
                .map(|n| {
                    let seq = n.seq;
                    let class = match n.kind {
                        NoticeKind::Success => "notice notice--success",
                        NoticeKind::Error => "notice notice--error",
                    };
                    view! {
                        <div class=class role="status">
                            <strong class="notice__title">{n.title}</strong>
                            <span class="notice__text">{n.text}</span>
                            <button
                                class="notice__close"
                                type="button"
                                on:click=move |_| ui.update(|u| u.dismiss(seq))
                            >
                                "\u{00D7}"
                            </button>
                        </div>
                    }
                })
        }}
    }
}
