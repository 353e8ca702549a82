// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid pitch: '{0}'")]
    InvalidPitch(String),

    #[error("Cannot extend '{symbol}' to 8 voices: octave range exhausted after {collected} pitches")]
    VoicingExhausted { symbol: String, collected: usize },

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Invalid parameters for {function}: {message}")]
    InvalidParams { function: String, message: String },

    #[error("Export error: {0}")]
    Export(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
