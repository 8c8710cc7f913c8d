// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the error types shared by the scene, display and engine contracts.

use std::fmt;

/// An error raised while reading or mutating the live scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// The scene has no active camera.
    MissingActiveCamera,
    /// The translation layer failed to build an entity from host data.
    TranslationFailed {
        /// The host node or material the entity was built from.
        source_name: String,
        /// A description of the failure.
        details: String,
    },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::MissingActiveCamera => write!(f, "The scene has no active camera"),
            SceneError::TranslationFailed {
                source_name,
                details,
            } => {
                write!(f, "Failed to translate '{source_name}': {details}")
            }
        }
    }
}

impl std::error::Error for SceneError {}

/// A contract breach between a rendered frame and the display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// The display does not have the frame's dimensions or channel count.
    CanvasMismatch {
        /// `(width, height, channels)` of the frame canvas.
        canvas: (usize, usize, usize),
        /// `(width, height, channels)` of the display surface.
        display: (usize, usize, usize),
    },
    /// A tile coordinate outside of the frame's tile grid.
    TileOutOfRange {
        /// Tile column.
        tile_x: usize,
        /// Tile row.
        tile_y: usize,
    },
    /// The display surface lock was poisoned by a panicking writer.
    SurfacePoisoned,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::CanvasMismatch { canvas, display } => write!(
                f,
                "Frame canvas {}x{}x{} does not match display surface {}x{}x{}",
                canvas.0, canvas.1, canvas.2, display.0, display.1, display.2
            ),
            DisplayError::TileOutOfRange { tile_x, tile_y } => {
                write!(f, "Tile ({tile_x}, {tile_y}) is outside of the frame")
            }
            DisplayError::SurfacePoisoned => write!(f, "The display surface lock is poisoned"),
        }
    }
}

impl std::error::Error for DisplayError {}

/// An error that ends a call to a render engine's `render` entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Delivering pixels to the display failed.
    Display(DisplayError),
    /// The scene could not be rendered.
    Scene(SceneError),
    /// The project lock was poisoned by a panicking writer.
    ProjectPoisoned,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Display(e) => write!(f, "Display error: {e}"),
            EngineError::Scene(e) => write!(f, "Scene error: {e}"),
            EngineError::ProjectPoisoned => write!(f, "The project lock is poisoned"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Display(e) => Some(e),
            EngineError::Scene(e) => Some(e),
            EngineError::ProjectPoisoned => None,
        }
    }
}

impl From<DisplayError> for EngineError {
    fn from(e: DisplayError) -> Self {
        EngineError::Display(e)
    }
}

impl From<SceneError> for EngineError {
    fn from(e: SceneError) -> Self {
        EngineError::Scene(e)
    }
}
