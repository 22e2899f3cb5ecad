pub mod csv_source;
pub mod json_source;

pub use csv_source::read_csv_samples;
pub use json_source::read_json_samples;

use crate::config::{DataFormat, DatasetConfig};
use crate::dataset::Dataset;
use crate::schema::FieldType;
use crate::DataError;

/// Load the dataset described by `config`
pub fn load_dataset(config: &DatasetConfig) -> Result<Dataset, DataError> {
    let format = config.resolved_format()?;
    tracing::info!("Loading {:?} dataset from {:?}", format, config.path);

    let samples = match format {
        DataFormat::Json | DataFormat::JsonLines => read_json_samples(&config.path, format)?,
        DataFormat::Csv => read_csv_samples(config)?,
    };

    let mut dataset = Dataset::new(config.dataset_name());
    for field in &config.declared_fields {
        dataset.declare_field(field, FieldType::Scalar);
    }
    let added = dataset.add_samples(samples)?;

    tracing::info!(
        "Loaded dataset '{}' with {} samples and {} fields",
        dataset.name(),
        added,
        dataset.schema().len()
    );
    Ok(dataset)
}
