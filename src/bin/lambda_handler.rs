//! AWS Lambda handler exposing the savings engine over HTTP
//!
//! Dispatches on the request path to the four engine operations. Inputs and
//! outputs use the engine's JSON wire shapes; request-level validation
//! failures map to 422, malformed JSON to 400.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use savings_system::{
    EvalPeriod, Expense, ExtraPeriod, FixedPeriod, KMode, SavingsEngine, Transaction,
};

#[derive(Debug, Deserialize)]
struct ParseRequest {
    #[serde(default)]
    expenses: Vec<Expense>,
}

#[derive(Debug, Deserialize)]
struct ValidationRequest {
    wage: Decimal,
    #[serde(default, rename = "maxInvest")]
    max_invest: Option<Decimal>,
    #[serde(default)]
    transactions: Vec<Transaction>,
}

#[derive(Debug, Deserialize)]
struct TemporalFilterRequest {
    #[serde(default)]
    q: Vec<FixedPeriod>,
    #[serde(default)]
    p: Vec<ExtraPeriod>,
    #[serde(default)]
    k: Vec<EvalPeriod>,
    #[serde(default, rename = "kMode")]
    k_mode: KMode,
    #[serde(default)]
    transactions: Vec<Transaction>,
}

#[derive(Debug, Deserialize)]
struct ReturnsRequest {
    age: u32,
    wage: Decimal,
    inflation: Decimal,
    #[serde(default)]
    q: Vec<FixedPeriod>,
    #[serde(default)]
    p: Vec<ExtraPeriod>,
    #[serde(default)]
    k: Vec<EvalPeriod>,
    #[serde(default, rename = "kMode")]
    k_mode: KMode,
    #[serde(default)]
    transactions: Vec<Transaction>,
}

fn error_response(status: u16, message: &str) -> Response<Body> {
    #[derive(Serialize)]
    struct ErrorBody<'a> {
        detail: &'a str,
    }
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(
            serde_json::to_string(&ErrorBody { detail: message }).unwrap_or_default(),
        ))
        .unwrap()
}

fn json_response<T: Serialize>(body: &T) -> Response<Body> {
    Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)
            .unwrap());
    }

    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let engine = SavingsEngine::new();
    let path = event.uri().path().to_string();

    let response = match path.rsplit('/').next().unwrap_or_default() {
        "transactions:parse" => {
            let request: ParseRequest = match serde_json::from_str(&body_str) {
                Ok(r) => r,
                Err(e) => return Ok(error_response(400, &format!("Invalid JSON: {}", e))),
            };
            match engine.parse_expenses(&request.expenses) {
                Ok(parsed) => json_response(&parsed),
                Err(e) => error_response(422, &e.to_string()),
            }
        }
        "transactions:validator" => {
            let request: ValidationRequest = match serde_json::from_str(&body_str) {
                Ok(r) => r,
                Err(e) => return Ok(error_response(400, &format!("Invalid JSON: {}", e))),
            };
            let buckets = engine.validate_transactions(
                request.wage,
                request.max_invest,
                &request.transactions,
            );
            json_response(&buckets)
        }
        "transactions:filter" => {
            let request: TemporalFilterRequest = match serde_json::from_str(&body_str) {
                Ok(r) => r,
                Err(e) => return Ok(error_response(400, &format!("Invalid JSON: {}", e))),
            };
            match engine.filter_temporal_constraints(
                &request.q,
                &request.p,
                &request.k,
                request.k_mode,
                &request.transactions,
            ) {
                Ok(resolved) => json_response(&resolved),
                Err(e) => error_response(422, &e.to_string()),
            }
        }
        op @ ("returns:retirement" | "returns:index") => {
            let request: ReturnsRequest = match serde_json::from_str(&body_str) {
                Ok(r) => r,
                Err(e) => return Ok(error_response(400, &format!("Invalid JSON: {}", e))),
            };
            let channel = op.trim_start_matches("returns:");
            match engine.calculate_returns(
                request.age,
                request.wage,
                request.inflation,
                &request.q,
                &request.p,
                &request.k,
                request.k_mode,
                &request.transactions,
                channel,
            ) {
                Ok(projection) => json_response(&projection),
                Err(e) => error_response(422, &e.to_string()),
            }
        }
        _ => error_response(404, &format!("Unknown operation: {}", path)),
    };

    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
