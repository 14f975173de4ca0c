// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - STL loading, polyhedron emission, script parsing

mod emitter;
mod loader;
mod parser;

pub use emitter::emit;
pub use loader::load;
pub use parser::parse_polyhedron;
