// Copyright 2026 Tablehop Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tablehop — two-hop table harvester for script-rendered listing sites.
//!
//! A listing page enumerates items; each item's detail page embeds a
//! third-party frame; the frame renders the item's actual data table.
//! Tablehop walks that indirection chain with a headless browser, parses
//! each table into typed columns, resolves `MANUAL` link cells into header
//! annotations, and exports one worksheet per item.

pub mod assemble;
pub mod cli;
pub mod enrich;
pub mod error;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod progress;
pub mod renderer;
