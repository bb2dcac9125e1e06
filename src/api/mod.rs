//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints for payroll preview,
//! generation, cycle lifecycle, adjustments, payments, and CSV export.
//! The auth endpoints from [`crate::auth`] are merged into the same
//! router.

pub(crate) mod payroll;
mod request;
mod response;
mod state;

pub use payroll::create_router;
pub use request::{
    AdjustmentRequest, ApproveCycleRequest, CycleSpec, MarkPaidRequest, PayrollRunRequest,
};
pub use response::{ApiErrorResponse, ApiResponse};
pub use state::AppState;
