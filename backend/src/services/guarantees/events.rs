use crate::live::state::AppState;
use crate::store::{ChangeSubscription, Delivery};
use actix_web::web::Bytes;
use actix_web::{web, HttpResponse};
use common::model::ChangePayload;
use futures_util::stream;
use log::{info, warn};
use std::convert::Infallible;

/// Streams every committed change as a server-sent event.
///
/// Each connection owns its own subscription; it is released when the
/// client disconnects and the stream is dropped.
pub(crate) async fn process(state: web::Data<AppState>) -> HttpResponse {
    info!("New SSE client connected to guarantee changes");
    let subscription = state.store.subscribe();

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(stream::unfold(subscription, next_frame))
}

async fn next_frame(
    mut subscription: ChangeSubscription,
) -> Option<(Result<Bytes, Infallible>, ChangeSubscription)> {
    loop {
        let frame = match subscription.next().await? {
            Delivery::Event(event) => match serde_json::to_string(&ChangePayload::from(&event)) {
                Ok(json) => format!("data: {}\n\n", json),
                Err(e) => {
                    warn!("Could not encode change event: {}", e);
                    continue;
                }
            },
            Delivery::Lagged(skipped) => format!("event: lagged\ndata: {}\n\n", skipped),
        };
        return Some((Ok(Bytes::from(frame)), subscription));
    }
}
