// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation, welding, validation, statistics

mod analytics;
mod bbox;
mod mesh;
mod topology;
mod weld;

pub use analytics::{surface_area, volume, ConversionStats};
pub use bbox::BoundingBox;
pub use mesh::{Face, Mesh};
pub use topology::{is_closed, validate, Diagnostic, DEGENERATE_AREA_EPSILON};
pub use weld::deduplicate;
