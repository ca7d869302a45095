use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use wry::WebViewBuilder;

use crate::events::{PageLoadState, PageMessage, WebViewEvent};

use super::{Waker, WebViewHost};

// =============================================================================
// HANDLER ATTACHMENTS
// =============================================================================

impl WebViewHost {
    pub(super) fn attach_ipc_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
        waker: Waker,
    ) -> WebViewBuilder<'a> {
        builder.with_ipc_handler(move |request| {
            let body = request.body();

            let Some(message) = PageMessage::from_json(body) else {
                warn!(body_len = body.len(), "page message rejected: unrecognised");
                return;
            };

            debug!(body_len = body.len(), "page message");
            if let Ok(mut evts) = events.lock() {
                evts.push(WebViewEvent::Message(message));
            }
            waker();
        })
    }

    pub(super) fn attach_page_load_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
        waker: Waker,
    ) -> WebViewBuilder<'a> {
        builder.with_on_page_load_handler(move |event, url| {
            let state = PageLoadState::from(event);
            debug!(?state, url = %url, "page load");
            if let Ok(mut evts) = events.lock() {
                evts.push(WebViewEvent::PageLoad { state, url });
            }
            waker();
        })
    }
}
