//! Train and predict pipelines, glued out of the encoding, split, tree and
//! bundle modules. Route handlers call in here; everything below is
//! synchronous and runs inside `web::block` on the train path.

use std::collections::HashMap;
use std::path::Path;

use anyhow::anyhow;
use log::info;

use crate::bundle::ModelBundle;
use crate::dataset;
use crate::encoding::{LabelCodec, OneHotEncoder};
use crate::error::ServiceError;
use crate::models::{TrainResponse, FEATURE_COLS};
use crate::split::{stratified_split, HOLDOUT_FRACTION, SPLIT_SEED};
use crate::tree::{Criterion, DecisionTree};

/// Runs the full training pipeline on an uploaded CSV and persists the
/// fitted bundle at `model_path`. The previous bundle, if any, is only
/// replaced once everything has succeeded.
pub fn train_from_csv(csv_bytes: &[u8], model_path: &Path) -> Result<TrainResponse, ServiceError> {
    let ds = dataset::parse_csv(csv_bytes)?;
    info!("training on {} rows", ds.rows.len());

    let labels = LabelCodec::fit(&ds.labels);
    let y: Vec<usize> = ds
        .labels
        .iter()
        .map(|l| {
            labels
                .encode(l)
                .ok_or_else(|| anyhow!("label {l:?} missing from freshly fitted codec"))
        })
        .collect::<Result<_, _>>()?;

    let encoder = OneHotEncoder::fit(&ds.rows);
    let x = encoder.transform(&ds.rows);

    let (train_idx, holdout_idx) =
        stratified_split(&y, labels.n_classes(), HOLDOUT_FRACTION, SPLIT_SEED).map_err(|e| {
            let class = labels.decode(e.class).unwrap_or("?").to_string();
            ServiceError::InsufficientData(format!(
                "class {class:?} has only {} row(s); at least 2 are needed",
                e.count
            ))
        })?;

    let x_train = x.select(ndarray::Axis(0), &train_idx);
    let y_train: Vec<usize> = train_idx.iter().map(|&i| y[i]).collect();

    let mut tree = DecisionTree::new(Criterion::Entropy);
    tree.fit(x_train.view(), &y_train, labels.n_classes());

    let x_holdout = x.select(ndarray::Axis(0), &holdout_idx);
    let correct = tree
        .predict(x_holdout.view())
        .iter()
        .zip(holdout_idx.iter())
        .filter(|(pred, &i)| **pred == Some(y[i]))
        .count();
    let accuracy = round2(correct as f64 / holdout_idx.len() as f64 * 100.0);
    info!(
        "holdout accuracy {accuracy}% ({correct}/{} rows)",
        holdout_idx.len()
    );

    let bundle = ModelBundle {
        encoder,
        tree,
        labels,
        feature_order: FEATURE_COLS.iter().map(|c| c.to_string()).collect(),
    };
    bundle.save(model_path)?;

    Ok(TrainResponse {
        message: "Model trained and saved.".to_string(),
        accuracy,
        model_path: artifact_name(model_path),
    })
}

/// Loads the current bundle and classifies one record supplied as a
/// name→value map. Field order in the map is irrelevant; assembly follows
/// the bundle's recorded feature order. Unknown extra fields are ignored
/// and unseen category values encode to the neutral zero slice.
pub fn predict_record(
    fields: &HashMap<String, String>,
    model_path: &Path,
) -> Result<String, ServiceError> {
    let bundle = ModelBundle::load(model_path)?.ok_or(ServiceError::ModelNotTrained)?;

    let missing: Vec<String> = bundle
        .feature_order
        .iter()
        .filter(|name| !fields.contains_key(*name))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(ServiceError::MissingInputs(missing));
    }

    let row: Vec<String> = bundle
        .feature_order
        .iter()
        .map(|name| fields[name].clone())
        .collect();

    let encoded = bundle.encoder.transform_row(&row);
    let class = bundle
        .tree
        .predict_row(&encoded)
        .ok_or_else(|| anyhow!("persisted bundle holds an unfitted tree"))?;
    let label = bundle
        .labels
        .decode(class)
        .ok_or_else(|| anyhow!("class index {class} outside the label mapping"))?;

    Ok(label.to_string())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn artifact_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
