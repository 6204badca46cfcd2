// ============================================================
// Layer 4 — Stratified Train/Validation Splitter
// ============================================================
// Shuffles prompts and splits them into training and validation
// sets while preserving the SAFE/JAILBREAK class ratio in both.
//
// The corpus is small and the classes are roughly balanced only
// by construction, so a plain random split could easily put all
// jailbreak prompts on one side. Stratifying guarantees both
// sets see both classes.
//
// The shuffle uses a seeded StdRng so a training run is
// reproducible end to end from its configuration.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::domain::prompt::{Label, LabeledPrompt};

/// Shuffle `prompts` and split into (train, validation),
/// stratified by label.
///
/// # Arguments
/// * `prompts`        - All labelled prompts (consumed)
/// * `train_fraction` - Proportion for training, e.g. 0.75
/// * `seed`           - RNG seed for a reproducible split
pub fn split_stratified(
    prompts:        Vec<LabeledPrompt>,
    train_fraction: f64,
    seed:           u64,
) -> (Vec<LabeledPrompt>, Vec<LabeledPrompt>) {
    let mut rng = StdRng::seed_from_u64(seed);

    // Partition by class, then split each class at the fraction
    let (mut safe, mut jailbreak): (Vec<_>, Vec<_>) = prompts
        .into_iter()
        .partition(|p| p.label == Label::Safe);

    safe.shuffle(&mut rng);
    jailbreak.shuffle(&mut rng);

    let mut train = Vec::new();
    let mut val   = Vec::new();

    for mut class in [safe, jailbreak] {
        let total    = class.len();
        let split_at = (((total as f64) * train_fraction).round() as usize).min(total);
        let class_val = class.split_off(split_at);
        train.extend(class);
        val.extend(class_val);
    }

    // Re-shuffle so batches are not grouped by class
    train.shuffle(&mut rng);
    val.shuffle(&mut rng);

    tracing::debug!(
        "Dataset split: {} training, {} validation",
        train.len(),
        val.len(),
    );

    (train, val)
}
