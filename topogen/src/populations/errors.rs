use std::error::Error;
use std::fmt;

/// An error type indicating an invalid operation
/// on a species.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeciesError {
    /// The species is extinct. Extinction is terminal: an
    /// extinct species never regains members.
    ExtinctSpecies(usize),
}

/// An error type indicating a failure to advance
/// a population by a generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopulationError {
    /// A species operation was invalid.
    Species(SpeciesError),
    /// Every client of the population was culled, leaving
    /// no survivor to regrow genomes from.
    NoSurvivors,
}

impl fmt::Display for SpeciesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExtinctSpecies(id) => {
                write!(f, "attempted to add a client to extinct species {}", id)
            }
        }
    }
}

impl fmt::Display for PopulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Species(e) => write!(f, "{}", e),
            Self::NoSurvivors => write!(f, "culling left no survivors to breed from"),
        }
    }
}

impl From<SpeciesError> for PopulationError {
    fn from(e: SpeciesError) -> PopulationError {
        PopulationError::Species(e)
    }
}

impl Error for SpeciesError {}
impl Error for PopulationError {}
