//! Rextra Pattern Compiler
//!
//! An extended regex dialect compiled down to plain target-engine syntax:
//! insignificant whitespace and comments, context-aware interpolation of
//! typed substitution values, atomic groups, subroutines, and emulation
//! bookkeeping that hides synthetic captures from match results.

pub mod context;
pub mod engine;
pub mod error;
pub mod extended;
pub mod interpolate;
pub mod options;
pub mod pipeline;
pub mod stages;

pub use engine::{Match, Matcher};
pub use error::{Error, InterpolationError, OptionError, Result, SyntaxError};
pub use interpolate::{Boundary, Embedded, Substitution, embed};
pub use options::{Capabilities, Disable, Force, Options};
pub use pipeline::{Plugin, StageData};

use crate::extended::ExtendedState;
use crate::options::{Resolved, resolve};

/// Zero-width separator keeping adjacent tokens from merging
pub(crate) const SEPARATOR: &str = "(?:)";

/// Marker identifying a synthetic capture, placed right after its `(`
///
/// Pipeline stages that introduce helper captures tag them with this text
/// so emulation mode can filter them out of match results. Markers are
/// stripped before the pattern reaches the engine.
pub const EMULATION_MARKER: &str = "$E$";

/// Compile a template into a matcher bound to the target engine
///
/// `segments` are the literal pieces of the pattern and `values` the
/// substitutions between them, so `segments.len()` must be
/// `values.len() + 1`.
pub fn compile(segments: &[&str], values: &[Substitution], options: &Options) -> Result<Matcher> {
    let resolved = resolve(options, Capabilities::TARGET)?;
    let expr = assemble(segments, values, &resolved)?;
    let expr = pipeline::run(expr, &resolved)?;
    Matcher::new(&expr, &resolved.flags, resolved.emulation)
}

/// Compile a template to its raw pattern and flag strings
///
/// Runs the full pipeline and strips markers, but never touches the target
/// engine; the result can be handed to any compatible matcher.
pub fn compile_source(
    segments: &[&str],
    values: &[Substitution],
    options: &Options,
) -> Result<(String, String)> {
    let resolved = resolve(options, Capabilities::TARGET)?;
    let expr = assemble(segments, values, &resolved)?;
    let expr = pipeline::run(expr, &resolved)?;
    let (source, _) = engine::extract_capture_map(&expr);
    Ok((source, resolved.flags.as_string()))
}

/// Compile a template and build the matcher through `factory`
///
/// The factory receives the pattern source, the flag string, and the
/// capture map (`Some` only in emulation mode; `false` entries are
/// synthetic captures the caller should hide).
pub fn compile_with<T, F>(
    segments: &[&str],
    values: &[Substitution],
    options: &Options,
    factory: F,
) -> Result<T>
where
    F: FnOnce(&str, &str, Option<&[bool]>) -> Result<T>,
{
    let resolved = resolve(options, Capabilities::TARGET)?;
    let expr = assemble(segments, values, &resolved)?;
    let expr = pipeline::run(expr, &resolved)?;
    let (source, map) = engine::extract_capture_map(&expr);
    let map = resolved.emulation.then_some(map);
    factory(&source, &resolved.flags.as_string(), map.as_deref())
}

/// Interleave literal segments and compiled substitution fragments
fn assemble(segments: &[&str], values: &[Substitution], resolved: &Resolved) -> Result<String> {
    if segments.len() != values.len() + 1 {
        return Err(OptionError::MalformedTemplate {
            segments: segments.len(),
            values: values.len(),
        }
        .into());
    }
    let mut state = ExtendedState::new(resolved.modes.modern);
    let mut expr = String::new();
    for (i, segment) in segments.iter().enumerate() {
        expr.push_str(&extended::apply(segment, &mut state, &resolved.modes)?);
        if i < values.len() {
            let boundary = Boundary {
                before: !expr.is_empty(),
                after: i + 1 < values.len()
                    || segments[i + 1..].iter().any(|s| !s.is_empty()),
            };
            let embedded = embed(
                &values[i],
                &resolved.flags,
                &state.context,
                boundary,
                state.captures,
                &resolved.caps,
                resolved.modes.modern,
            )?;
            let mut text = embedded.text;
            if state.needs_separator_before(&text) {
                // `\1` followed by an interpolated `0` must not become `\10`.
                text.insert_str(0, SEPARATOR);
            }
            expr.push_str(&text);
            state.note_external(&text, embedded.captures);
        }
    }
    if state.context.is_incomplete() {
        return Err(SyntaxError::IncompleteToken.into());
    }
    Ok(expr)
}
