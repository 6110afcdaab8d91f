//! Heartdown Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Heartdown
//! document pipeline. It includes:
//!
//! - **Equations**: Records returned by the equation compiler ([`equation::EquationRecord`],
//!   [`equation::CompiledUnit`])
//! - **Graph**: The undirected symbol co-occurrence graph ([`graph::SymbolGraph`])
//! - **Colors**: Palettes and recyclable symbol colors ([`color::Palette`])
//! - **Coloring**: Deterministic greedy coloring ([`coloring::GraphColorer`])
//! - **Symbols**: The cross-module symbol table ([`symbol::SymbolTable`])

pub mod color;
pub mod coloring;
pub mod equation;
pub mod graph;
pub mod symbol;
