//! Writing compiled equations back into the document.
//!
//! The compiler returns, per module, a map from raw source snippets to their
//! compiled markup. Each snippet is claimed by the first block of the module
//! whose code contains it, and every block that claimed something is replaced
//! with its wrapped markup.

use indexmap::IndexMap;
use log::{debug, warn};

use heartdown_core::equation::CompiledUnit;
use heartdown_parser::{BlockKind, BlockOccurrence, ErrorCode, Module, Span};

use crate::stash::Stash;

/// The document after splicing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spliced {
    /// The document with each replaced block swapped for its placeholder.
    pub text: String,
    /// The replaced blocks, keyed by their span in document order.
    pub substitutions: IndexMap<Span, Substitution>,
}

/// A block swapped for a stash placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// The block as written.
    pub raw: String,
    pub placeholder: String,
}

/// Replaces the blocks of `modules` in `text` with their compiled markup.
///
/// `text` must be the document the blocks were scanned from. Blocks of modules
/// without a compiled unit are left in place.
pub fn splice(
    text: &str,
    modules: &IndexMap<String, Module>,
    units: &IndexMap<String, CompiledUnit>,
    stash: &mut Stash,
) -> Spliced {
    let mut replacements: Vec<(Span, Substitution)> = Vec::new();

    for (name, module) in modules {
        let Some(unit) = units.get(name) else {
            continue;
        };

        for (occurrence, content) in module_markup(text.len(), module, unit) {
            let substitution = Substitution {
                raw: occurrence.raw().to_string(),
                placeholder: stash.store(content),
            };
            replacements.push((occurrence.span(), substitution));
        }
    }

    replacements.sort_by_key(|(span, _)| span.start());
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (span, substitution) in &replacements {
        out.push_str(&text[last..span.start()]);
        out.push_str(&substitution.placeholder);
        last = span.end();
    }
    out.push_str(&text[last..]);

    debug!(blocks = replacements.len(); "Compiled equations spliced");
    Spliced {
        text: out,
        substitutions: replacements.into_iter().collect(),
    }
}

/// Returns the wrapped markup of every occurrence of `module` that claimed a
/// fragment.
fn module_markup<'m>(
    text_len: usize,
    module: &'m Module,
    unit: &CompiledUnit,
) -> Vec<(&'m BlockOccurrence, String)> {
    let occurrences = module.occurrences();
    let mut claimed: Vec<Vec<(usize, &str)>> = vec![Vec::new(); occurrences.len()];

    for (raw, compiled) in unit.fragments() {
        let claim = occurrences.iter().enumerate().find_map(|(index, occurrence)| {
            occurrence
                .payload()
                .find(raw.as_str())
                .map(|offset| (index, position(text_len, occurrence, offset)))
        });
        match claim {
            Some((index, position)) => claimed[index].push((position, compiled.as_str())),
            None => warn!(
                code:% = ErrorCode::E301, module = module.name(), fragment = raw.as_str();
                "Compiled fragment matches no block"
            ),
        }
    }

    occurrences
        .iter()
        .zip(claimed)
        .filter_map(|(occurrence, mut fragments)| {
            if fragments.is_empty() {
                warn!(
                    code:% = ErrorCode::E300, module = module.name(), span:% = occurrence.span();
                    "Block has no compiled output"
                );
                return None;
            }

            fragments.sort_by_key(|(position, _)| *position);
            let content: String = fragments.iter().map(|(_, compiled)| *compiled).collect();
            Some((occurrence, wrap(module.name(), occurrence.kind(), unit, &content)))
        })
        .collect()
}

/// Orders fragments by where their source appears. Code loaded from a file
/// sorts after the document.
fn position(text_len: usize, occurrence: &BlockOccurrence, offset: usize) -> usize {
    match occurrence.payload_offset() {
        Some(start) => start + offset,
        None => text_len + offset,
    }
}

fn wrap(module: &str, kind: BlockKind, unit: &CompiledUnit, content: &str) -> String {
    let (pre, post) = (unit.pre(), unit.post());
    match kind {
        BlockKind::Inline => format!(
            "<span class='equation' code_block=\"{module}\">${pre}{content}{post}$</span>"
        ),
        BlockKind::Fenced => format!(
            "\n<div class='equation' code_block=\"{module}\">\n$${pre}{content}{post}$$</div>\n"
        ),
    }
}
