//! Dense probability table addressed by an affine encoding of the parameters.
//!
//! Row-major over `(turn, reqA, reqB, landA, landB, landAB)`, outermost first.

use crate::config::{Denominator, EngineConfig};
use crate::enumerate::DomainBounds;
use crate::requirement::Requirement;
use crate::simulation::Estimate;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Read, Write};
use thiserror::Error;

/// Slot no requirement wrote to
pub const UNSET: f32 = -1.0;
/// Requirement whose estimate has a zero denominator
pub const UNDEFINED: f32 = -2.0;

pub const DIMENSIONS: [&str; 6] = ["turn", "req_a", "req_b", "land_a", "land_b", "land_ab"];

#[derive(Error, Debug)]
pub enum TableError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("requirement {0} lies outside the table domain")]
    OutOfDomain(String),
    #[error("expected {expected} values, found {found}")]
    SizeMismatch { expected: usize, found: usize },
    #[error("{requirements} requirements but {results} results")]
    LengthMismatch { requirements: usize, results: usize },
}

/// Parameter tuple of one table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableKey {
    pub target_turn: u32,
    pub color_requirement: [u32; 2],
    pub land_split: [u32; 3],
}

impl TableKey {
    fn fields(&self) -> [u32; 6] {
        [
            self.target_turn,
            self.color_requirement[0],
            self.color_requirement[1],
            self.land_split[0],
            self.land_split[1],
            self.land_split[2],
        ]
    }

    fn from_fields(f: [u32; 6]) -> Self {
        TableKey {
            target_turn: f[0],
            color_requirement: [f[1], f[2]],
            land_split: [f[3], f[4], f[5]],
        }
    }
}

impl From<&Requirement> for TableKey {
    fn from(req: &Requirement) -> Self {
        TableKey {
            target_turn: req.target_turn,
            color_requirement: req.color_requirement,
            land_split: req.land_split,
        }
    }
}

/// Lowest value and number of values per dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableShape {
    pub min: [u32; 6],
    pub extent: [u32; 6],
}

impl TableShape {
    pub fn from_bounds(bounds: &DomainBounds) -> Self {
        let lands = bounds.land_count + 1;
        TableShape {
            min: [1, 0, 0, 0, 0, 0],
            extent: [
                bounds.max_turn,
                bounds.max_color_a + 1,
                bounds.max_color_b + 1,
                lands,
                lands,
                lands,
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.extent.iter().map(|&e| e as usize).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index of `key`, or None when a field is out of range
    pub fn encode(&self, key: &TableKey) -> Option<usize> {
        let mut index = 0usize;
        for (d, value) in key.fields().into_iter().enumerate() {
            let offset = value.checked_sub(self.min[d])?;
            if offset >= self.extent[d] {
                return None;
            }
            index = index * self.extent[d] as usize + offset as usize;
        }
        Some(index)
    }

    pub fn decode(&self, mut index: usize) -> Option<TableKey> {
        if index >= self.len() {
            return None;
        }
        let mut fields = [0u32; 6];
        for d in (0..6).rev() {
            let extent = self.extent[d] as usize;
            fields[d] = (index % extent) as u32 + self.min[d];
            index /= extent;
        }
        Some(TableKey::from_fields(fields))
    }
}

/// Probability per table cell, sentinels where nothing was estimated
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    shape: TableShape,
    values: Vec<f32>,
}

impl ResultTable {
    pub fn new(shape: TableShape) -> Self {
        ResultTable {
            shape,
            values: vec![UNSET; shape.len()],
        }
    }

    /// Scatter per-requirement results into their cells.
    ///
    /// A `None` result (the evaluation failed) leaves the cell `UNSET`; an
    /// undefined probability becomes `UNDEFINED`.
    pub fn from_estimates(
        shape: TableShape,
        requirements: &[Requirement],
        estimates: &[Option<Estimate>],
        denominator: Denominator,
    ) -> Result<Self, TableError> {
        if requirements.len() != estimates.len() {
            return Err(TableError::LengthMismatch {
                requirements: requirements.len(),
                results: estimates.len(),
            });
        }
        let mut table = ResultTable::new(shape);
        for (req, estimate) in requirements.iter().zip(estimates) {
            let index = shape
                .encode(&TableKey::from(req))
                .ok_or_else(|| TableError::OutOfDomain(req.to_string()))?;
            if let Some(estimate) = estimate {
                table.values[index] = match estimate.probability(denominator) {
                    Some(p) => p as f32,
                    None => UNDEFINED,
                };
            }
        }
        Ok(table)
    }

    pub fn shape(&self) -> &TableShape {
        &self.shape
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, key: &TableKey) -> Option<f32> {
        self.shape.encode(key).map(|i| self.values[i])
    }

    /// Write every cell as a little-endian f32, in one contiguous block
    pub fn write_binary<W: Write>(&self, mut writer: W) -> Result<(), TableError> {
        let mut bytes = Vec::with_capacity(self.values.len() * 4);
        for value in &self.values {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_binary<R: Read>(mut reader: R, shape: TableShape) -> Result<Self, TableError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let expected = shape.len();
        if bytes.len() != expected * 4 {
            return Err(TableError::SizeMismatch {
                expected,
                found: bytes.len() / 4,
            });
        }
        let values = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(ResultTable { shape, values })
    }
}

/// CSV dump, one line per requirement in enumeration order.
///
/// The first line is a column header. Readers of the headerless format must
/// skip it. Undefined estimates are written as `NaN` and failed ones as `-1`.
pub fn write_csv<W: Write>(
    mut writer: W,
    requirements: &[Requirement],
    estimates: &[Option<Estimate>],
    denominator: Denominator,
) -> Result<(), TableError> {
    if requirements.len() != estimates.len() {
        return Err(TableError::LengthMismatch {
            requirements: requirements.len(),
            results: estimates.len(),
        });
    }
    writeln!(
        writer,
        "deck_size,land_count,turn,req_a,req_b,land_a,land_b,land_ab,probability"
    )?;
    for (req, estimate) in requirements.iter().zip(estimates) {
        match estimate {
            Some(estimate) => match estimate.probability(denominator) {
                Some(p) => writeln!(writer, "{},{:.12}", req, p)?,
                None => writeln!(writer, "{},NaN", req)?,
            },
            None => writeln!(writer, "{},{}", req, UNSET)?,
        }
    }
    writer.flush()?;
    Ok(())
}

/// Sidecar describing a binary table so it can be reloaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub dimensions: Vec<String>,
    pub shape: TableShape,
    pub bounds: DomainBounds,
    pub config: EngineConfig,
    /// Seed the requirement seeds were drawn from
    pub run_seed: u64,
    pub requirements: usize,
    pub unset: f32,
    pub undefined: f32,
    pub generated_at: String,
}

impl TableMetadata {
    pub fn new(
        bounds: DomainBounds,
        config: &EngineConfig,
        run_seed: u64,
        requirements: usize,
    ) -> Self {
        TableMetadata {
            dimensions: DIMENSIONS.iter().map(|d| d.to_string()).collect(),
            shape: TableShape::from_bounds(&bounds),
            bounds,
            config: config.clone(),
            run_seed,
            requirements,
            unset: UNSET,
            undefined: UNDEFINED,
            generated_at: chrono::Local::now().to_rfc3339(),
        }
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), TableError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn read_json<R: BufRead>(reader: R) -> Result<Self, TableError> {
        Ok(serde_json::from_reader(reader)?)
    }
}
