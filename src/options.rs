//! Compile options, target capabilities, and flag resolution
//!
//! Options are resolved once per compile call into an immutable value that
//! is threaded through every stage; there is no global configuration.
//! Capability defaults for the target engine are computed once as constants
//! and passed in, never toggled.

use crate::error::{Error, OptionError};
use crate::pipeline::Plugin;

/// What the target regex engine supports natively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Nested character classes and the `--`/`&&` set operators
    pub modern_classes: bool,
    /// Scoped flag-modifier groups such as `(?i:...)` and `(?-i:...)`
    pub scoped_flag_groups: bool,
}

impl Capabilities {
    /// Capabilities of the bundled target engine (`fancy-regex`)
    pub const TARGET: Capabilities = Capabilities {
        modern_classes: true,
        scoped_flag_groups: true,
    };
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities::TARGET
    }
}

/// Toggles for the default modes and stages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Disable {
    /// Turn off extended mode (insignificant whitespace and comments)
    pub x: bool,
    /// Turn off named-only mode (bare `(` stays capturing)
    pub n: bool,
    /// Turn off the modern class dialect (`--`/`&&`, nested classes)
    pub v: bool,
    /// Skip the atomic-group/possessive-quantifier emulation stage
    pub atomic: bool,
    /// Skip the subroutine-expansion stage
    pub subroutines: bool,
}

/// Forced behaviors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Force {
    /// Require the modern class dialect even without native support
    pub v: bool,
}

/// Options for one compile call, immutable once resolved
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Target-engine flags to request (`i`, `m`, `s`)
    pub flags: String,
    /// Enable emulation mode: synthetic captures are tracked and filtered
    /// out of match results
    pub subclass: bool,
    /// User-supplied pipeline stages, run first in the given order
    pub plugins: Vec<Plugin>,
    /// Replacement dialect-backport stage, run last when the target lacks
    /// native modern-dialect support
    pub backport: Option<Plugin>,
    /// Mode and stage toggles
    pub disable: Disable,
    /// Forced behaviors
    pub force: Force,
}

/// The three flags the target engine accepts from callers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagSet {
    /// `i`: case-insensitive matching
    pub case_insensitive: bool,
    /// `m`: `^`/`$` match at line boundaries
    pub multiline: bool,
    /// `s`: `.` matches any character including newline
    pub dot_all: bool,
}

/// Mode letters that are implicit and may never be requested explicitly
const RESERVED_FLAGS: [char; 4] = ['x', 'n', 'u', 'v'];

impl FlagSet {
    /// Parse caller-supplied flags, rejecting reserved, unknown, and
    /// duplicated letters
    pub(crate) fn parse_checked(flags: &str) -> Result<FlagSet, OptionError> {
        let mut set = FlagSet::default();
        for c in flags.chars() {
            if RESERVED_FLAGS.contains(&c) {
                return Err(OptionError::ReservedFlag(c));
            }
            let slot = match c {
                'i' => &mut set.case_insensitive,
                'm' => &mut set.multiline,
                's' => &mut set.dot_all,
                _ => return Err(OptionError::UnknownFlag(c)),
            };
            if *slot {
                return Err(OptionError::DuplicateFlag(c));
            }
            *slot = true;
        }
        Ok(set)
    }

    /// Parse the flags of an interpolated native regex, keeping only the
    /// letters that affect sub-pattern semantics
    pub(crate) fn parse_lenient(flags: &str) -> FlagSet {
        FlagSet {
            case_insensitive: flags.contains('i'),
            multiline: flags.contains('m'),
            dot_all: flags.contains('s'),
        }
    }

    /// Canonical flag string, in `i` `m` `s` order
    pub fn as_string(&self) -> String {
        let mut out = String::new();
        if self.case_insensitive {
            out.push('i');
        }
        if self.multiline {
            out.push('m');
        }
        if self.dot_all {
            out.push('s');
        }
        out
    }

    /// Letters to enable and to disable when expressing `self` inside a
    /// pattern compiled under `outer`
    pub(crate) fn diff(&self, outer: &FlagSet) -> (String, String) {
        let mut enable = String::new();
        let mut disable = String::new();
        for (local, out, letter) in [
            (self.case_insensitive, outer.case_insensitive, 'i'),
            (self.multiline, outer.multiline, 'm'),
            (self.dot_all, outer.dot_all, 's'),
        ] {
            if local && !out {
                enable.push(letter);
            } else if !local && out {
                disable.push(letter);
            }
        }
        (enable, disable)
    }
}

/// Mode switches derived from the options, as consumed by the preprocessor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modes {
    /// Extended mode: whitespace and comments are insignificant
    pub extended: bool,
    /// Named-only mode: bare `(` in literal text does not capture
    pub named_only: bool,
    /// Modern class dialect active
    pub modern: bool,
}

impl Modes {
    #[cfg(test)]
    pub(crate) fn extended_only() -> Modes {
        Modes {
            extended: true,
            named_only: false,
            modern: true,
        }
    }
}

/// Options resolved against the target capabilities
#[derive(Clone)]
pub(crate) struct Resolved<'a> {
    pub flags: FlagSet,
    pub modes: Modes,
    pub emulation: bool,
    pub plugins: &'a [Plugin],
    pub backport: Option<Plugin>,
    pub disable_atomic: bool,
    pub disable_subroutines: bool,
    pub caps: Capabilities,
}

pub(crate) fn resolve(options: &Options, caps: Capabilities) -> Result<Resolved<'_>, Error> {
    let flags = FlagSet::parse_checked(&options.flags).map_err(Error::Option)?;
    if options.force.v && !caps.modern_classes {
        return Err(OptionError::UnsupportedDialect.into());
    }
    Ok(Resolved {
        flags,
        modes: Modes {
            extended: !options.disable.x,
            named_only: !options.disable.n,
            modern: (caps.modern_classes && !options.disable.v) || options.force.v,
        },
        emulation: options.subclass,
        plugins: &options.plugins,
        backport: options.backport,
        disable_atomic: options.disable.atomic,
        disable_subroutines: options.disable.subroutines,
        caps,
    })
}
