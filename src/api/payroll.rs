//! HTTP request handlers for the payroll endpoints.
//!
//! All responses use the uniform `{success, message, data?, errors?}`
//! envelope. Paths keep a trailing slash, matching the documented API
//! surface.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{PayCycle, PayrollRecord};

use super::request::{AdjustmentRequest, ApproveCycleRequest, MarkPaidRequest, PayrollRunRequest};
use super::response::{ApiErrorResponse, ApiResponse};
use super::state::AppState;

/// Creates the API router with every payroll and auth endpoint.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/", get(dashboard_handler))
        .route("/payroll/preview/", post(preview_handler))
        .route("/payroll/generate/", post(generate_handler))
        .route("/payroll/cycles/", get(list_cycles_handler))
        .route("/payroll/cycles/:id/", get(cycle_detail_handler))
        .route("/payroll/cycles/:id/export/", get(export_handler))
        .route("/payroll/cycles/:id/approve/", post(approve_handler))
        .route("/payroll/records/:id/mark-paid/", post(mark_paid_handler))
        .route("/payroll/records/:id/adjustments/", post(add_adjustment_handler))
        .route(
            "/payroll/records/:id/adjustments/:adjustment_id/",
            delete(remove_adjustment_handler),
        )
        .merge(crate::auth::router())
        .with_state(state)
}

/// Unwraps a JSON body, converting axum's rejection into the envelope.
pub(crate) fn parse_json<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, ApiErrorResponse> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let message = match &rejection {
                JsonRejection::JsonDataError(err) => err.body_text(),
                JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {err}"),
                JsonRejection::MissingJsonContentType(_) => {
                    "Content-Type must be application/json".to_string()
                }
                _ => "Failed to parse request body".to_string(),
            };
            warn!(correlation_id = %correlation_id, error = %message, "Rejected request body");
            Err(ApiErrorResponse::malformed_json(message))
        }
    }
}

/// Handler for GET /payroll/.
///
/// Returns store-wide statistics, the loaded template names, and the most
/// recent cycles.
async fn dashboard_handler(State(state): State<AppState>) -> Response {
    let stats = state.store().stats();
    let templates: Vec<&str> = state
        .templates()
        .list()
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    let recent: Vec<PayCycle> = state.store().list_cycles().into_iter().take(5).collect();

    Json(ApiResponse::ok(
        "Payroll dashboard",
        json!({
            "stats": stats,
            "templates": templates,
            "recent_cycles": recent,
        }),
    ))
    .into_response()
}

/// Handler for POST /payroll/preview/.
///
/// Runs the full calculation without persisting anything.
async fn preview_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response.into_response(),
    };
    info!(
        correlation_id = %correlation_id,
        start = %request.cycle.start_date,
        end = %request.cycle.end_date,
        employees = request.employees.len(),
        "Previewing payroll"
    );

    let rules = match request.resolve_rules(state.templates()) {
        Ok(rules) => rules,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Rule resolution failed");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    match state.store().preview(
        request.cycle.period(),
        &request.employees,
        &request.attendance,
        &request.holidays,
        &rules,
    ) {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                records = outcome.records.len(),
                warnings = outcome.warnings.len(),
                "Preview complete"
            );
            Json(ApiResponse::ok(
                "Payroll preview generated",
                json!({
                    "period": request.cycle.period(),
                    "records": outcome.records,
                    "warnings": outcome.warnings,
                    "summary": {
                        "employee_count": outcome.records.len(),
                        "total_gross": outcome.total_gross(),
                        "total_net": outcome.total_net(),
                        "total_deductions": outcome.total_deductions(),
                    },
                }),
            ))
            .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Preview failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /payroll/generate/.
///
/// Persists a cycle and its records for the requested period.
async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response.into_response(),
    };
    info!(
        correlation_id = %correlation_id,
        start = %request.cycle.start_date,
        end = %request.cycle.end_date,
        employees = request.employees.len(),
        "Generating payroll"
    );

    let rules = match request.resolve_rules(state.templates()) {
        Ok(rules) => rules,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Rule resolution failed");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    match state.store().generate(
        request.cycle.name.clone(),
        request.cycle.cycle_type,
        request.cycle.period(),
        &request.employees,
        &request.attendance,
        &request.holidays,
        &rules,
    ) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                cycle_id = %result.cycle.id,
                records = result.records.len(),
                total_net = %result.cycle.totals.net,
                "Payroll generated"
            );
            (
                StatusCode::CREATED,
                Json(ApiResponse::ok(
                    "Payroll generated",
                    json!({
                        "cycle": result.cycle,
                        "records": result.records,
                        "warnings": result.warnings,
                    }),
                )),
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Generation failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /payroll/cycles/.
async fn list_cycles_handler(State(state): State<AppState>) -> Response {
    let cycles = state.store().list_cycles();
    Json(ApiResponse::ok(
        "Pay cycles",
        json!({
            "count": cycles.len(),
            "cycles": cycles,
        }),
    ))
    .into_response()
}

/// Handler for GET /payroll/cycles/:id/.
async fn cycle_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    let cycle = match state.store().get_cycle(id) {
        Ok(cycle) => cycle,
        Err(err) => return ApiErrorResponse::from(err).into_response(),
    };
    let records = match state.store().records_for_cycle(id) {
        Ok(records) => records,
        Err(err) => return ApiErrorResponse::from(err).into_response(),
    };

    Json(ApiResponse::ok(
        "Pay cycle detail",
        json!({
            "cycle": cycle,
            "records": records,
        }),
    ))
    .into_response()
}

/// Handler for GET /payroll/cycles/:id/export/.
///
/// Streams the cycle's records as CSV. The body starts with a UTF-8 BOM
/// so spreadsheet applications pick up the encoding.
async fn export_handler(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let cycle = match state.store().get_cycle(id) {
        Ok(cycle) => cycle,
        Err(err) => return ApiErrorResponse::from(err).into_response(),
    };
    let records = match state.store().records_for_cycle(id) {
        Ok(records) => records,
        Err(err) => return ApiErrorResponse::from(err).into_response(),
    };

    let filename = format!(
        "payroll_{}_{}.csv",
        cycle.period.start_date, cycle.period.end_date
    );
    let body = render_csv(&records);
    info!(cycle_id = %id, records = records.len(), "Exported cycle as CSV");

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// Handler for POST /payroll/cycles/:id/approve/.
async fn approve_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<ApproveCycleRequest>>,
) -> Response {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    match state.store().advance_cycle(id, request.status) {
        Ok(cycle) => {
            info!(cycle_id = %id, status = %cycle.status, "Cycle status advanced");
            Json(ApiResponse::ok(
                format!("Cycle marked '{}'", cycle.status),
                json!({ "cycle": cycle }),
            ))
            .into_response()
        }
        Err(err) => {
            warn!(cycle_id = %id, error = %err, "Status change rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /payroll/records/:id/mark-paid/.
async fn mark_paid_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<MarkPaidRequest>>,
) -> Response {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    match state.store().mark_paid(
        id,
        request.amount,
        request.payment_date,
        request.payment_method,
        request.payment_reference,
    ) {
        Ok(record) => {
            info!(
                record_id = %id,
                employee_id = %record.employee_id,
                paid_total = %record.paid_total(),
                "Payment recorded"
            );
            let message = if record.is_paid() {
                "Record marked as paid"
            } else {
                "Partial payment recorded"
            };
            Json(ApiResponse::ok(message, json!({ "record": record }))).into_response()
        }
        Err(err) => {
            warn!(record_id = %id, error = %err, "Payment rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /payroll/records/:id/adjustments/.
async fn add_adjustment_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<AdjustmentRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response.into_response(),
    };

    match state.store().add_adjustment(
        id,
        request.adjustment_type,
        request.title,
        request.amount,
        request.description,
    ) {
        Ok(record) => {
            info!(
                correlation_id = %correlation_id,
                record_id = %id,
                net_salary = %record.net_salary,
                "Adjustment added"
            );
            (
                StatusCode::CREATED,
                Json(ApiResponse::ok("Adjustment added", json!({ "record": record }))),
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, record_id = %id, error = %err, "Adjustment rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for DELETE /payroll/records/:id/adjustments/:adjustment_id/.
async fn remove_adjustment_handler(
    State(state): State<AppState>,
    Path((id, adjustment_id)): Path<(Uuid, Uuid)>,
) -> Response {
    match state.store().remove_adjustment(id, adjustment_id) {
        Ok(record) => {
            info!(record_id = %id, adjustment_id = %adjustment_id, "Adjustment removed");
            Json(ApiResponse::ok(
                "Adjustment removed",
                json!({ "record": record }),
            ))
            .into_response()
        }
        Err(err) => {
            warn!(record_id = %id, adjustment_id = %adjustment_id, error = %err, "Removal rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

const CSV_HEADER: &str = "Employee ID,Employee Name,Department,Working Days,Present Days,\
Absent Days,Leave Days,Late Arrivals,Attendance %,Basic Salary,Allowances,Overtime Hours,\
Overtime Amount,Bonuses,Deductions,Gross Salary,Net Salary,Payment Status";

/// Renders a cycle's records as CSV with a leading UTF-8 BOM.
fn render_csv(records: &[PayrollRecord]) -> String {
    let mut out = String::from("\u{feff}");
    out.push_str(CSV_HEADER);
    out.push('\n');

    for record in records {
        let status = match record.payment_status {
            crate::models::PaymentStatus::Pending => "pending",
            crate::models::PaymentStatus::Paid => "paid",
        };
        let fields = [
            csv_field(&record.employee_id),
            csv_field(&record.employee_name),
            csv_field(record.department.as_deref().unwrap_or("")),
            record.working_days.to_string(),
            record.present_days.to_string(),
            record.absent_days.to_string(),
            record.leave_days.to_string(),
            record.late_arrivals.to_string(),
            record.attendance_percentage.to_string(),
            record.basic_salary.to_string(),
            record.allowances.to_string(),
            record.overtime_hours.to_string(),
            record.overtime_amount.to_string(),
            record.bonuses.to_string(),
            record.deductions.to_string(),
            record.gross_salary.to_string(),
            record.net_salary.to_string(),
            status.to_string(),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Quotes a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
