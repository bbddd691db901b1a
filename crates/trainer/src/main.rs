use common::{Environment, LogLevel};
use trainer::{TrainBackend, TrainPaths, TrainingConfig};

fn main() -> anyhow::Result<()> {
    common::setup_logging(LogLevel::Info, Environment::from_env());

    let config = TrainingConfig::new();
    let paths = TrainPaths::default();
    let device = Default::default();

    tracing::info!(
        dataset = %paths.dataset_dir.display(),
        "Trainer starting"
    );

    let artifact = trainer::train::<TrainBackend>(&config, &paths, &device)?;

    tracing::info!(artifact = %artifact.display(), "Training complete and model saved");
    Ok(())
}
