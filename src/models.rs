use serde::Serialize;

/// Feature columns expected in every training CSV, in pipeline order.
pub const FEATURE_COLS: [&str; 6] = ["buying", "maint", "doors", "persons", "lug_boot", "safety"];

/// Target column of the training CSV.
pub const TARGET_COL: &str = "class";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub message: String,
    /// Holdout accuracy in percent, rounded to two decimals.
    pub accuracy: f64,
    pub model_path: String,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: String,
}
