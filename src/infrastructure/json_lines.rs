// Newline-delimited JSON streaming responses
use crate::domain::sample::Sample;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use tokio::sync::broadcast;

/// Create a chunked NDJSON streaming response: one JSON object per line.
pub fn json_lines_response<S>(stream: S) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = Sample> + Send + 'static,
{
    let byte_stream = stream.map(|sample| encode_line(&sample));
    let body = Body::from_stream(byte_stream);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

fn encode_line(sample: &Sample) -> Result<Bytes, serde_json::Error> {
    let json = serde_json::to_vec(sample)?;
    let mut line = BytesMut::with_capacity(json.len() + 1);
    line.put_slice(&json);
    line.put_u8(b'\n');
    Ok(line.freeze())
}

/// Bridge a live broadcast subscription into a streaming response. The stream
/// ends when the sender side is dropped; lagged receivers skip missed samples
/// rather than erroring the response.
pub fn stream_from_subscription(mut rx: broadcast::Receiver<Sample>) -> axum::response::Response {
    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(sample) => yield sample,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!("live stream lagged, skipped {skipped} samples");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    match json_lines_response(stream) {
        Ok(response) => response.into_response(),
        Err(status) => status.into_response(),
    }
}
