use std::{fs, path::PathBuf};

use anyhow::Error;
use schemars::schema_for;

use crate::options::TourOptions;
use crate::widget::TourEvent;

/// Writes the JSON Schemas for the boundary payloads, so widget-side code
/// can validate what arrives before handing it to the tour constructor.
pub fn write_schema(out_dir: PathBuf) -> Result<(), Error> {
    fs::create_dir_all(&out_dir)?;

    let options_schema = schema_for!(TourOptions);
    let options_json = serde_json::to_string_pretty(&options_schema)?;
    fs::write(out_dir.join("tour-options.schema.json"), options_json)?;

    let event_schema = schema_for!(TourEvent);
    let event_json = serde_json::to_string_pretty(&event_schema)?;
    fs::write(out_dir.join("tour-event.schema.json"), event_json)?;

    Ok(())
}
