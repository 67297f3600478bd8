//! Loading and saving model descriptions as JSON.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::viterbi_solver::hmm::{ModelDescription, Symbol, HMM};

/// Reads a JSON [`ModelDescription`] from `path` and builds the model.
///
/// The model is not validated here; validation happens when a decoding
/// session is created.
pub fn load_model<S, O, P>(path: P) -> Result<HMM<S, O>, S>
where
    S: Symbol + DeserializeOwned,
    O: Symbol + DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    let desc: ModelDescription<S, O> = serde_json::from_reader(BufReader::new(file))?;
    debug!(path = %path.as_ref().display(), states = desc.initial.len(), "model description loaded");
    Ok(desc.into())
}

pub fn model_from_str<S, O>(s: &str) -> Result<HMM<S, O>, S>
where
    S: Symbol + DeserializeOwned,
    O: Symbol + DeserializeOwned,
{
    let desc: ModelDescription<S, O> = serde_json::from_str(s)?;
    Ok(desc.into())
}

pub fn write_model<S, O, P>(hmm: &HMM<S, O>, path: P) -> Result<(), S>
where
    S: Symbol + Serialize,
    O: Symbol + Serialize,
    P: AsRef<Path>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &hmm.describe())?;
    writer.flush()?;
    Ok(())
}
