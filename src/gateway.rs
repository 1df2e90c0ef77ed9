/*
 * Copyright 2024 Google LLC
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! The HTTP/JSON gateway, translating a fixed route table onto the same
//! service implementation the gRPC endpoint uses.

use std::{convert::Infallible, sync::Arc};

use futures::StreamExt;
use hyper::{
    server::conn::AddrIncoming,
    service::{make_service_fn, service_fn},
    Body, Method, Request, Response, Server as HyperServer, StatusCode,
};
use percent_encoding::percent_decode_str;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tonic::{Code, Status};

use crate::{
    generated::sdk::{self, alpha, beta},
    service::SdkService,
};

use alpha::sdk_server::Sdk as _;
use beta::sdk_server::Sdk as _;
use sdk::sdk_server::Sdk as _;

type Reply = Result<Response<Body>, Status>;

/// Serves the gateway on `listener` until the returned future is dropped.
pub async fn serve(listener: tokio::net::TcpListener, service: SdkService) -> crate::Result<()> {
    let address = listener.local_addr()?;
    let incoming = AddrIncoming::from_listener(listener)?;
    let service = Arc::new(service);
    tracing::info!(%address, "starting http gateway");

    let make_svc = make_service_fn(move |_conn| {
        let service = service.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |request| {
                let service = service.clone();
                async move { Ok::<_, Infallible>(handle_request(&service, request).await) }
            }))
        }
    });

    HyperServer::builder(incoming).serve(make_svc).await?;
    Ok(())
}

#[tracing::instrument(skip_all, fields(method = %request.method(), path = %request.uri().path()))]
pub async fn handle_request(service: &SdkService, request: Request<Body>) -> Response<Body> {
    tracing::trace!("handling request");
    match route(service, request).await {
        Ok(response) => response,
        Err(status) => error_response(&status),
    }
}

async fn route(service: &SdkService, request: Request<Body>) -> Reply {
    let (parts, body) = request.into_parts();
    let body = hyper::body::to_bytes(body)
        .await
        .map_err(|error| Status::invalid_argument(error.to_string()))?;
    let segments = path_segments(parts.uri.path())?;
    let segments = segments.iter().map(String::as_str).collect::<Vec<_>>();
    let query = parts.uri.query().unwrap_or_default();

    match (&parts.method, segments.as_slice()) {
        (&Method::POST, ["ready"]) => reply(service.ready(decode(&body)?).await?),
        (&Method::POST, ["allocate"]) => reply(service.allocate(decode(&body)?).await?),
        (&Method::POST, ["shutdown"]) => reply(service.shutdown(decode(&body)?).await?),
        (&Method::POST, ["health"]) => health(service, &body),
        (&Method::GET, ["gameserver"]) => {
            reply(service.get_game_server(request_of(sdk::Empty {})).await?)
        }
        (&Method::GET, ["watch", "gameserver"]) => watch(service).await,
        (&Method::PUT, ["metadata", "label"]) => reply(service.set_label(decode(&body)?).await?),
        (&Method::PUT, ["metadata", "annotation"]) => {
            reply(service.set_annotation(decode(&body)?).await?)
        }
        (&Method::POST, ["reserve"]) => reply(service.reserve(decode(&body)?).await?),

        (&Method::POST, ["alpha", "player", "connect"]) => {
            reply(service.player_connect(decode(&body)?).await?)
        }
        (&Method::POST, ["alpha", "player", "disconnect"]) => {
            reply(service.player_disconnect(decode(&body)?).await?)
        }
        (&Method::PUT, ["alpha", "player", "capacity"]) => {
            reply(service.set_player_capacity(decode(&body)?).await?)
        }
        (&Method::GET, ["alpha", "player", "capacity"]) => reply(
            service
                .get_player_capacity(request_of(alpha::Empty {}))
                .await?,
        ),
        (&Method::GET, ["alpha", "player", "count"]) => {
            reply(service.get_player_count(request_of(alpha::Empty {})).await?)
        }
        (&Method::GET, ["alpha", "player", "connected", player_id]) => reply(
            service
                .is_player_connected(request_of(alpha::PlayerId {
                    player_id: (*player_id).into(),
                }))
                .await?,
        ),
        (&Method::GET, ["alpha", "player", "connected"]) => reply(
            service
                .get_connected_players(request_of(alpha::Empty {}))
                .await?,
        ),

        (&Method::GET, ["v1beta1", "counters", name]) => reply(
            service
                .get_counter(request_of(beta::GetCounterRequest {
                    name: (*name).into(),
                }))
                .await?,
        ),
        (&Method::PATCH, ["v1beta1", "counters", name]) => {
            let mut update = message::<beta::CounterUpdateRequest>(&body)?;
            update.name = (*name).into();
            let request = beta::UpdateCounterRequest {
                counter_update_request: Some(update),
            };
            reply(service.update_counter(request_of(request)).await?)
        }
        (&Method::GET, ["v1beta1", "lists", name]) => reply(
            service
                .get_list(request_of(beta::GetListRequest {
                    name: (*name).into(),
                }))
                .await?,
        ),
        (&Method::PATCH, ["v1beta1", "lists", name]) => {
            let object = object(&body)?;
            let update_mask = update_mask(query, &object);
            let mut list = from_value::<beta::List>(object)?;
            list.name = (*name).into();
            let request = beta::UpdateListRequest {
                update_mask: Some(update_mask),
                list: Some(list),
            };
            reply(service.update_list(request_of(request)).await?)
        }
        (&Method::POST, ["v1beta1", "lists", action]) => match action.rsplit_once(':') {
            Some((name, "addValue")) => {
                let mut request = message::<beta::AddListValueRequest>(&body)?;
                request.name = name.into();
                reply(service.add_list_value(request_of(request)).await?)
            }
            Some((name, "removeValue")) => {
                let mut request = message::<beta::RemoveListValueRequest>(&body)?;
                request.name = name.into();
                reply(service.remove_list_value(request_of(request)).await?)
            }
            _ => Err(not_found()),
        },

        _ => Err(not_found()),
    }
}

/// Splits the path and percent-decodes each segment.
fn path_segments(path: &str) -> Result<Vec<String>, Status> {
    path.trim_matches('/')
        .split('/')
        .map(|segment| {
            percent_decode_str(segment)
                .decode_utf8()
                .map(|segment| segment.into_owned())
                .map_err(|_| Status::invalid_argument(format!("invalid path segment: {segment}")))
        })
        .collect()
}

fn request_of<T>(message: T) -> tonic::Request<T> {
    tonic::Request::new(message)
}

fn not_found() -> Status {
    Status::not_found("Not Found")
}

fn invalid(error: serde_json::Error) -> Status {
    Status::invalid_argument(error.to_string())
}

/// Parses a request body as a JSON object. An empty body is an empty
/// message.
fn object(body: &[u8]) -> Result<Value, Status> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(<_>::default()));
    }

    serde_json::from_slice(body).map_err(invalid)
}

fn from_value<T: DeserializeOwned + Default>(value: Value) -> Result<T, Status> {
    match value {
        Value::Null => Ok(T::default()),
        value @ Value::Object(_) => serde_json::from_value(value).map_err(invalid),
        other => Err(Status::invalid_argument(format!(
            "expected a JSON object, found {other}"
        ))),
    }
}

fn message<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, Status> {
    from_value(object(body)?)
}

fn decode<T: DeserializeOwned + Default>(body: &[u8]) -> Result<tonic::Request<T>, Status> {
    message(body).map(request_of)
}

/// The field mask for a list update: the `update_mask` query parameter when
/// present, otherwise the list fields present in the body.
fn update_mask(query: &str, body: &Value) -> prost_types::FieldMask {
    let from_query = form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == "update_mask" || key == "updateMask" || key == "update_mask.paths")
        .flat_map(|(_, value)| {
            value
                .split(',')
                .map(str::trim)
                .filter(|path| !path.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let paths = if from_query.is_empty() {
        ["capacity", "values"]
            .into_iter()
            .filter(|field| body.get(field).is_some_and(|value| !value.is_null()))
            .map(String::from)
            .collect()
    } else {
        from_query
    };

    prost_types::FieldMask { paths }
}

/// Each JSON message in the body counts as one health ping.
fn health(service: &SdkService, body: &[u8]) -> Reply {
    let pings = serde_json::Deserializer::from_slice(body).into_iter::<Value>();
    for ping in pings {
        from_value::<sdk::Empty>(ping.map_err(invalid)?)?;
        service.engine().health();
    }

    reply(crate::service::respond("Health", Ok(sdk::Empty {}))?)
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum WatchLine<'a> {
    Result(&'a sdk::GameServer),
    Error(ErrorBody<'a>),
}

/// The body of an error response.
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    code: i32,
    message: &'a str,
}

impl<'a> From<&'a Status> for ErrorBody<'a> {
    fn from(status: &'a Status) -> Self {
        Self {
            error: status.message(),
            code: status.code() as i32,
            message: status.message(),
        }
    }
}

/// Streams newline delimited `{"result": ...}` objects until the client
/// goes away.
async fn watch(service: &SdkService) -> Reply {
    let updates = service
        .watch_game_server(request_of(sdk::Empty {}))
        .await?
        .into_inner();

    let lines = updates.map(|update| {
        let mut line = match &update {
            Ok(game_server) => serde_json::to_vec(&WatchLine::Result(game_server)),
            Err(status) => serde_json::to_vec(&WatchLine::Error(status.into())),
        }?;
        line.push(b'\n');
        Ok::<_, serde_json::Error>(bytes::Bytes::from(line))
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(hyper::header::CONTENT_TYPE, "application/json")
        .body(Body::wrap_stream(lines))
        .map_err(|error| Status::internal(error.to_string()))
}

fn reply<T: Serialize>(response: tonic::Response<T>) -> Reply {
    let body = serde_json::to_vec(response.get_ref())
        .map_err(|error| Status::internal(error.to_string()))?;
    Response::builder()
        .status(StatusCode::OK)
        .header(hyper::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .map_err(|error| Status::internal(error.to_string()))
}

fn error_response(status: &Status) -> Response<Body> {
    tracing::debug!(code = ?status.code(), message = status.message(), "request failed");
    let body = serde_json::to_vec(&ErrorBody::from(status)).unwrap_or_default();
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = http_status(status.code());
    response.headers_mut().insert(
        hyper::header::CONTENT_TYPE,
        hyper::header::HeaderValue::from_static("application/json"),
    );
    response
}

/// The HTTP status a gRPC code is reported with.
pub fn http_status(code: Code) -> StatusCode {
    match code {
        Code::Ok => StatusCode::OK,
        Code::Cancelled => StatusCode::REQUEST_TIMEOUT,
        Code::InvalidArgument | Code::OutOfRange => StatusCode::BAD_REQUEST,
        Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists | Code::Aborted => StatusCode::CONFLICT,
        Code::PermissionDenied => StatusCode::FORBIDDEN,
        Code::Unauthenticated => StatusCode::UNAUTHORIZED,
        Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
        Code::FailedPrecondition => StatusCode::PRECONDITION_FAILED,
        Code::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        Code::Unknown | Code::Internal | Code::DataLoss => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Config, FeatureGates},
        engine::LocalEngine,
        gameserver,
    };
    use pretty_assertions::assert_eq;

    fn service() -> SdkService {
        let gates = FeatureGates::all();
        let config = Config {
            is_local: true,
            feature_gates: gates.clone(),
            ..<_>::default()
        };
        let engine = LocalEngine::new(&config, gameserver::local_default(&gates));
        SdkService::new(Arc::new(engine))
    }

    async fn call(service: &SdkService, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_owned()))
            .unwrap();
        let response = handle_request(service, request).await;
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn stable_routes() {
        let service = service();

        let (status, body) = call(&service, Method::POST, "/ready", "{}").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({}));

        let (status, _) = call(&service, Method::POST, "/allocate", "").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(
            &service,
            Method::PUT,
            "/metadata/label",
            r#"{"key": "mode", "value": "deathmatch"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(&service, Method::GET, "/gameserver", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["object_meta"]["labels"]["agones.dev/sdk-mode"], "deathmatch");
        assert_eq!(body["object_meta"]["generation"], "1");
        assert_eq!(body["status"]["ports"][0]["port"], 7777);

        let (status, _) = call(&service, Method::POST, "/reserve", r#"{"seconds": "0"}"#).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(&service, Method::POST, "/health", "{}{}").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn alpha_routes() {
        let service = service();

        let (status, body) = call(
            &service,
            Method::POST,
            "/alpha/player/connect",
            r#"{"playerID": "one"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"bool": true}));

        let (_, body) = call(&service, Method::GET, "/alpha/player/connected/one", "").await;
        assert_eq!(body, serde_json::json!({"bool": true}));

        let (_, body) = call(&service, Method::GET, "/alpha/player/count", "").await;
        assert_eq!(body, serde_json::json!({"count": "1"}));

        let (_, body) = call(&service, Method::GET, "/alpha/player/connected", "").await;
        assert_eq!(body, serde_json::json!({"list": ["one"]}));
    }

    #[tokio::test]
    async fn path_parameters_are_decoded() {
        let service = service();

        let (status, _) = call(
            &service,
            Method::POST,
            "/alpha/player/connect",
            r#"{"playerID": "player 1"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = call(
            &service,
            Method::GET,
            "/alpha/player/connected/player%201",
            "",
        )
        .await;
        assert_eq!(body, serde_json::json!({"bool": true}));

        let (status, _) = call(
            &service,
            Method::GET,
            "/alpha/player/connected/%FF",
            "",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn beta_routes() {
        let service = service();

        let (status, body) = call(
            &service,
            Method::PATCH,
            "/v1beta1/counters/rooms",
            r#"{"name": "other", "countDiff": "2"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"name": "rooms", "count": "3", "capacity": "10"})
        );

        let (status, body) = call(
            &service,
            Method::POST,
            "/v1beta1/lists/players:addValue",
            r#"{"value": "test3"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["values"].as_array().unwrap().len(), 4);

        let (status, body) = call(
            &service,
            Method::PATCH,
            "/v1beta1/lists/players?update_mask=capacity",
            r#"{"capacity": "2", "values": ["ignored"]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["capacity"], "2");
        assert_eq!(body["values"], serde_json::json!(["test0", "test1"]));
    }

    #[tokio::test]
    async fn errors() {
        let service = service();

        let (status, body) = call(&service, Method::GET, "/v1beta1/counters/missing", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], Code::NotFound as i32);
        assert_eq!(body["error"], body["message"]);

        let (status, _) = call(&service, Method::POST, "/reserve", r#"{"seconds": "x"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&service, Method::POST, "/ready", "[1]").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&service, Method::PUT, "/alpha/player/capacity", "{").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&service, Method::GET, "/nowhere", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(
            &service,
            Method::POST,
            "/v1beta1/lists/players:removeValue",
            r#"{"value": "nobody"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
