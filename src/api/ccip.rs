/// EIP-3668 (CCIP-Read) gateway endpoints
///
/// - `GET /{sender}/{calldata}.json`
/// - `POST /` with `{"sender": "0x…", "data": "0x…"}`
///
/// Both answer `{"data": "0x…"}` where the payload is
/// `abi.encode(bytes result, uint64 expires, bytes signature)`.
use crate::{
    abi::LookupRequest,
    context::AppContext,
    encoding,
    error::{GatewayError, GatewayResult},
    metrics,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error, field, info_span, Instrument, Span};

/// POST body
#[derive(Debug, Deserialize)]
pub struct CcipRequest {
    /// Resolver contract that raised `OffchainLookup`
    pub sender: String,
    /// Outer calldata (`resolve(bytes,bytes)`)
    pub data: String,
}

/// Successful response body
#[derive(Debug, Serialize, Deserialize)]
pub struct CcipResponse {
    pub data: String,
}

/// A signed answer plus what the response layer needs to know about it
struct SignedLookup {
    data: String,
    function: &'static str,
    max_age: u64,
}

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/", post(lookup_post))
        .route("/:sender/:calldata", get(lookup_get))
}

pub async fn lookup_get(
    State(ctx): State<AppContext>,
    Path((sender, calldata)): Path<(String, String)>,
) -> Response {
    let calldata = calldata.strip_suffix(".json").unwrap_or(&calldata);
    handle(&ctx, "get", &sender, calldata).await
}

pub async fn lookup_post(
    State(ctx): State<AppContext>,
    body: Result<Json<CcipRequest>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(request)) => handle(&ctx, "post", &request.sender, &request.data).await,
        Err(rejection) => {
            let err = GatewayError::Validation(rejection.body_text());
            metrics::record_request("post", "unknown", err.status().as_u16(), 0.0);
            debug!(error = %err, "rejected_request_body");
            err.into_response()
        }
    }
}

/// Shared pipeline: validate → decode → resolve → sign, under the request deadline
async fn handle(
    ctx: &AppContext,
    transport: &'static str,
    sender: &str,
    calldata: &str,
) -> Response {
    let started = Instant::now();
    let span = info_span!(
        "ccip_request",
        transport,
        sender = %sender,
        function = field::Empty,
        name = field::Empty,
    );

    let deadline = ctx.config.request_timeout();
    let outcome = tokio::time::timeout(deadline, lookup(ctx, sender, calldata))
        .instrument(span.clone())
        .await
        .unwrap_or_else(|_| {
            Err(GatewayError::Timeout(format!(
                "no answer within {}s",
                ctx.config.service.request_timeout_secs
            )))
        });

    let elapsed = started.elapsed().as_secs_f64();

    span.in_scope(|| match outcome {
        Ok(signed) => {
            metrics::record_request(transport, signed.function, 200, elapsed);
            debug!(elapsed_ms = (elapsed * 1000.0) as u64, "signed_response");
            (
                [(
                    header::CACHE_CONTROL,
                    format!("public, max-age={}", signed.max_age),
                )],
                Json(CcipResponse { data: signed.data }),
            )
                .into_response()
        }
        Err(err) => {
            let status = err.status();
            metrics::record_request(transport, "unknown", status.as_u16(), elapsed);
            if status.is_server_error() {
                error!(error = %err, "request_failed");
            } else {
                debug!(error = %err, "request_rejected");
            }
            err.into_response()
        }
    })
}

async fn lookup(ctx: &AppContext, sender: &str, calldata: &str) -> GatewayResult<SignedLookup> {
    let received_at = u64::try_from(chrono::Utc::now().timestamp())
        .map_err(|_| GatewayError::Internal("system clock is before the Unix epoch".into()))?;

    let target = encoding::parse_address(sender).map_err(GatewayError::InvalidSender)?;
    let request = encoding::decode_calldata(calldata).map_err(GatewayError::InvalidCalldata)?;
    let lookup = LookupRequest::decode(target, &request)?;

    let span = Span::current();
    span.record("function", lookup.query.function());
    span.record("name", lookup.name.as_str());

    let resolution = ctx.dispatcher.resolve(&lookup).await;

    let ttl = ctx.config.service.signature_ttl_secs;
    let expires_at = received_at
        .checked_add(ttl)
        .ok_or_else(|| GatewayError::Internal("expiry overflows u64".into()))?;

    let signed = ctx
        .signer
        .sign_response(target, expires_at, &request, resolution.result)?;
    metrics::record_signature();

    Ok(SignedLookup {
        data: encoding::to_hex(&signed.abi_encode()),
        function: resolution.function,
        max_age: resolution.ttl.min(ttl),
    })
}
