//! HTTP service that trains a decision-tree classifier on the UCI car
//! evaluation schema from an uploaded CSV and serves single-row predictions
//! from the persisted model.

pub mod bundle;
pub mod dataset;
pub mod encoding;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod split;
pub mod tree;

use actix_web::web;

/// Registers every route on an actix `App`; shared between the binary and
/// the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::health)
        .service(routes::train)
        .service(routes::predict);
}
