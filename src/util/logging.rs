use std::path::Path;

use log::info;

use crate::model::EpochMetrics;

/// Format one epoch summary, e.g.
/// `Epoch 3/128 - loss: 0.6931 - accuracy: 0.5000 - val_loss: ... - val_accuracy: ...`.
pub fn format_epoch(epoch: usize, epochs: usize, m: &EpochMetrics) -> String {
    let mut line = format!(
        "Epoch {}/{} - loss: {:.4} - accuracy: {:.4}",
        epoch, epochs, m.loss, m.accuracy
    );
    if let (Some(vl), Some(va)) = (m.val_loss, m.val_accuracy) {
        line.push_str(&format!(" - val_loss: {:.4} - val_accuracy: {:.4}", vl, va));
    }
    line
}

/// Log an epoch summary at info level.
pub fn log_epoch(epoch: usize, epochs: usize, m: &EpochMetrics) {
    info!("{}", format_epoch(epoch, epochs, m));
}

/// Format a message reporting how many windows a CSV file provided.
pub fn format_dataset_loaded(path: &Path, rows: usize, is_fake: bool) -> String {
    let kind = if is_fake { "fake" } else { "real" };
    format!("Loaded {} {} windows from {}", rows, kind, path.display())
}

pub fn log_dataset_loaded(path: &Path, rows: usize, is_fake: bool) {
    info!("{}", format_dataset_loaded(path, rows, is_fake));
}

/// Format the train/test partition sizes of a scenario.
pub fn format_split(name: &str, n_train: usize, n_test: usize) -> String {
    format!("{}: {} training and {} test windows", name, n_train, n_test)
}

pub fn log_split(name: &str, n_train: usize, n_test: usize) {
    info!("{}", format_split(name, n_train, n_test));
}

/// Format the final test accuracy of a scenario.
pub fn format_scenario_done(name: &str, accuracy: f64) -> String {
    format!("{} classifier test accuracy: {:.2}%", name, accuracy * 100.0)
}

pub fn log_scenario_done(name: &str, accuracy: f64) {
    info!("{}", format_scenario_done(name, accuracy));
}
