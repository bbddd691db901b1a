use crate::{
    config::{TrainPaths, TrainingConfig},
    data::{ImageBatcher, ImageFolder},
    error::TrainError,
    model::ResNet18,
};
use burn::{
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    nn::loss::CrossEntropyLossConfig,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder},
    tensor::{ElementConversion, backend::AutodiffBackend},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// Fine-tunes a ResNet-18 on `paths.dataset_dir` and writes the weights.
///
/// Returns the path of the written `.mpk` record. Nothing is saved unless
/// every epoch completes.
pub fn train<B: AutodiffBackend>(
    config: &TrainingConfig,
    paths: &TrainPaths,
    device: &B::Device,
) -> Result<PathBuf, TrainError> {
    B::seed(config.seed);

    let dataset = ImageFolder::load(&paths.dataset_dir, config.image_size)?;
    if dataset.classes().len() != config.num_classes {
        return Err(TrainError::ClassCount {
            expected: config.num_classes,
            classes: dataset.classes().to_vec(),
        });
    }
    if dataset.is_empty() {
        return Err(TrainError::EmptyDataset(paths.dataset_dir.clone()));
    }

    let mut model = match &paths.pretrained_weights {
        Some(weights) => ResNet18::<B>::load_pretrained(weights, device)?
            .with_num_classes(config.num_classes, device),
        None => {
            tracing::warn!("No pretrained weights configured, starting from random initialisation");
            ResNet18::<B>::new(config.num_classes, device)
        }
    };

    let num_samples = dataset.len();
    let num_batches = num_samples.div_ceil(config.batch_size);
    let batcher = ImageBatcher::<B>::new(device.clone(), dataset.image_size());
    let dataloader = DataLoaderBuilder::new(batcher)
        .batch_size(config.batch_size)
        .shuffle(config.seed)
        .num_workers(config.num_workers)
        .build(dataset);

    let mut optimizer = AdamConfig::new().init();
    let loss_fn = CrossEntropyLossConfig::new().init(device);

    tracing::info!(%config, samples = num_samples, batches = num_batches, "Training started");

    for epoch in 1..=config.num_epochs {
        let progress = epoch_progress(num_batches as u64, epoch, config.num_epochs);
        let mut running_loss = 0.0;

        for batch in dataloader.iter() {
            let batch_len = batch.targets.dims()[0];

            let logits = model.forward(batch.images);
            let loss = loss_fn.forward(logits, batch.targets);
            running_loss += loss.clone().into_scalar().elem::<f64>() * batch_len as f64;

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optimizer.step(config.learning_rate, model, grads);

            progress.inc(1);
        }

        progress.finish_and_clear();
        let epoch_loss = running_loss / num_samples as f64;
        tracing::info!(
            epoch,
            epoch_loss,
            "Epoch {}/{}, Loss: {:.4}",
            epoch,
            config.num_epochs,
            epoch_loss
        );
    }

    let artifact = paths.artifact.with_extension("mpk");
    model
        .save_file(
            paths.artifact.clone(),
            &NamedMpkFileRecorder::<FullPrecisionSettings>::new(),
        )
        .map_err(TrainError::Save)?;

    tracing::info!(artifact = %artifact.display(), "Model saved");
    Ok(artifact)
}

fn epoch_progress(num_batches: u64, epoch: usize, num_epochs: usize) -> ProgressBar {
    let progress = ProgressBar::new(num_batches);
    if let Ok(style) =
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} batches ({eta})")
    {
        progress.set_style(style.progress_chars("=> "));
    }
    progress.set_message(format!("Epoch {}/{}", epoch, num_epochs));
    progress
}
