use jwt_debugger::common::service::JwtService;
use jwt_debugger::config::Config;
use jwt_debugger::logging;
use jwt_debugger::common::types::{DecodeRequest, EncodeRequest, ErrorResponse, VerifyRequest};
use lambda_http::http::Method;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Endpoint {
    Decode,
    Encode,
    Verify,
}

impl Endpoint {
    /// Accepts the API paths with or without the `/api` prefix, since
    /// gateway mappings often strip it.
    fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        let path = path.strip_prefix("/api").unwrap_or(path);
        match path {
            "/decode" => Some(Endpoint::Decode),
            "/encode" => Some(Endpoint::Encode),
            "/verify" => Some(Endpoint::Verify),
            _ => None,
        }
    }
}

/// Main function for the Lambda handler
#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;
    logging::init(config.mode);

    let service = JwtService::new();
    run(service_fn(|event| handle_request(event, service))).await
}

async fn handle_request(event: Request, service: JwtService) -> Result<Response<Body>, Error> {
    let path = event.uri().path().to_string();
    info!(method = %event.method(), %path, "received request");

    let Some(endpoint) = Endpoint::from_path(&path) else {
        return text_response(404, "Not Found");
    };
    if event.method() != Method::POST {
        return text_response(405, "Method Not Allowed");
    }

    let body: &[u8] = event.body();
    match endpoint {
        Endpoint::Decode => match parse::<DecodeRequest>(body, DecodeRequest::validate) {
            Some(request) => json_response(200, &service.decode(&request.token)),
            None => json_response(400, &ErrorResponse::invalid_request()),
        },
        Endpoint::Encode => match parse::<EncodeRequest>(body, EncodeRequest::validate) {
            Some(request) => json_response(200, &service.encode(&request)),
            None => json_response(400, &ErrorResponse::invalid_request()),
        },
        Endpoint::Verify => match parse::<VerifyRequest>(body, VerifyRequest::validate) {
            Some(request) => json_response(200, &service.verify(&request)),
            None => json_response(400, &ErrorResponse::invalid_request()),
        },
    }
}

fn parse<T: DeserializeOwned>(
    body: &[u8],
    validate: fn(&T) -> Result<(), &'static str>,
) -> Option<T> {
    let request: T = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "invalid request body");
            return None;
        }
    };
    validate(&request).ok()?;
    Some(request)
}

fn json_response<T: Serialize>(status: u16, body: &T) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(body)?))?)
}

fn text_response(status: u16, body: &str) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .body(Body::from(body.to_string()))?)
}
