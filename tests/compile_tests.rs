//! End-to-end compilation tests
//!
//! Each group covers one user-visible guarantee of the compiler, from
//! template text through the pipeline to matches executed on the target
//! engine.

use rextra::{
    Disable, Error, InterpolationError, Match, Matcher, OptionError, Options, StageData,
    Substitution, SyntaxError, compile, compile_source,
};

fn verbatim_options() -> Options {
    Options {
        disable: Disable {
            x: true,
            n: true,
            ..Disable::default()
        },
        ..Options::default()
    }
}

fn no_rewrite_options() -> Options {
    Options {
        disable: Disable {
            n: true,
            ..Disable::default()
        },
        ..Options::default()
    }
}

mod verbatim {
    use super::*;

    #[test]
    fn test_no_values_no_whitespace_mode_is_identity() {
        for pattern in ["a b", "x#y z", "(?<n>a) {2}", "[a b]", r"\d+ \w*"] {
            let (source, _) = compile_source(&[pattern], &[], &verbatim_options()).unwrap();
            assert_eq!(source, pattern);
        }
    }

    #[test]
    fn test_segments_concatenated() {
        let (source, _) = compile_source(
            &["a b", "c d"],
            &[Substitution::pattern("x")],
            &verbatim_options(),
        )
        .unwrap();
        assert_eq!(source, "a b(?:x)c d");
    }
}

mod whitespace_mode {
    use super::*;

    #[test]
    fn test_comment_and_whitespace_densified() {
        let (source, _) = compile_source(&["a b#c\nd"], &[], &no_rewrite_options()).unwrap();
        assert_eq!(source, "abd");

        let matcher = compile(&["a b#c\nd"], &[], &no_rewrite_options()).unwrap();
        assert!(matcher.is_match("xabdy").unwrap());
        assert!(!matcher.is_match("a b d").unwrap());
        assert!(!matcher.is_match("abcd").unwrap());
    }

    #[test]
    fn test_spaced_class_hyphen_is_error() {
        let err = compile(&["[a b - z]"], &[], &no_rewrite_options()).unwrap_err();
        assert!(matches!(
            err,
            Error::Syntax(SyntaxError::AmbiguousRangeHyphen)
        ));
        let matcher = compile(&["[a-z]"], &[], &no_rewrite_options()).unwrap();
        assert!(matcher.is_match("m").unwrap());
    }

    #[test]
    fn test_short_escape_not_merged_across_whitespace() {
        let (source, _) = compile_source(&[r"a\x4 1"], &[], &no_rewrite_options()).unwrap();
        assert_eq!(source, r"a\x4(?:)1");
        // The malformed escape stays malformed instead of silently
        // becoming the escape for `A`.
        assert!(matches!(
            compile(&[r"a\x4 1"], &[], &no_rewrite_options()),
            Err(Error::Engine(_))
        ));
        let matcher = compile(&[r"a\x41 b"], &[], &no_rewrite_options()).unwrap();
        assert!(matcher.is_match("aAb").unwrap());
    }

    #[test]
    fn test_quantifier_binds_across_stripped_whitespace() {
        let matcher = compile(&["ab *c"], &[], &no_rewrite_options()).unwrap();
        assert!(matcher.is_match("abbbc").unwrap());
        assert!(matcher.is_match("ac").unwrap());
        assert!(!matcher.is_match("a c").unwrap());
    }
}

mod emulation {
    use super::*;

    fn wrap_in_synthetic_group(expr: &str, _data: &StageData) -> Result<String, Error> {
        Ok(format!("({}{})", rextra::EMULATION_MARKER, expr))
    }

    fn emulating(plugins: Vec<rextra::Plugin>) -> Options {
        Options {
            subclass: true,
            plugins,
            disable: Disable {
                n: true,
                ..Disable::default()
            },
            ..Options::default()
        }
    }

    fn positional(m: &Match) -> usize {
        m.groups.len()
    }

    #[test]
    fn test_synthetic_group_hidden_from_results() {
        let options = emulating(vec![wrap_in_synthetic_group]);
        let matcher = compile(&["(?<w>a)(b)"], &[], &options).unwrap();
        let m = matcher.find("ab").unwrap().unwrap();

        // Two author-declared captures; the plugin's wrapper group is gone.
        assert_eq!(positional(&m), 2);
        assert_eq!(m.group_str("ab", 1), Some("a"));
        assert_eq!(m.group_str("ab", 2), Some("b"));
        assert_eq!(m.group(3), None);
        assert_eq!(m.named_group_str("ab", "w"), Some("a"));
        assert_eq!(m.as_str("ab"), "ab");
    }

    #[test]
    fn test_atomic_group_cuts_backtracking() {
        let options = emulating(vec![]);
        let matcher = compile(&["a(?>bc|b)c"], &[], &options).unwrap();
        assert!(matcher.is_match("abcc").unwrap());
        // `bc` is committed, so the trailing `c` of "abc" is unreachable.
        assert!(!matcher.is_match("abc").unwrap());
        let m = matcher.find("abcc").unwrap().unwrap();
        assert_eq!(positional(&m), 0);
    }

    #[test]
    fn test_possessive_quantifier() {
        let options = emulating(vec![]);
        let matcher = compile(&["a*+a"], &[], &options).unwrap();
        assert!(!matcher.is_match("aaa").unwrap());
        let matcher = compile(&["a*+b"], &[], &options).unwrap();
        assert!(matcher.is_match("aab").unwrap());
    }

    #[test]
    fn test_subroutine_call() {
        let options = emulating(vec![]);
        let matcher = compile(&[r"(?<year>\d{4})-\g<year>"], &[], &options).unwrap();
        let input = "2024-2025";
        let m = matcher.find(input).unwrap().unwrap();
        assert_eq!(m.as_str(input), "2024-2025");
        assert_eq!(m.named_group_str(input, "year"), Some("2024"));
        // Only the author-declared group is positional.
        assert_eq!(positional(&m), 1);
    }
}

mod interpolation {
    use super::*;

    #[test]
    fn test_native_regex_backrefs_shifted() {
        let value = Substitution::regex(r"(x)(y)\2", "");
        let (source, _) = compile_source(
            &["(a)(b)(c)", ""],
            &[value.clone()],
            &no_rewrite_options(),
        )
        .unwrap();
        assert_eq!(source, r"(a)(b)(c)(?:(x)(y)\5)");

        let matcher = compile(&["(a)(b)(c)", ""], &[value], &no_rewrite_options()).unwrap();
        let input = "abcxyy";
        let m = matcher.find(input).unwrap().unwrap();
        // 3 + 2 capturing groups survive composition.
        assert_eq!(m.groups.len(), 5);
        assert_eq!(m.group_str(input, 4), Some("x"));
        assert_eq!(m.group_str(input, 5), Some("y"));
    }

    #[test]
    fn test_alternation_bar_in_class_stays_a_class() {
        let matcher = compile(
            &["[", "]"],
            &[Substitution::from("a|b")],
            &no_rewrite_options(),
        )
        .unwrap();
        // The bar is a listed character, not a top-level alternation.
        for yes in ["a", "b", "|"] {
            assert!(matcher.is_match(yes).unwrap(), "expected match for {yes:?}");
        }
        assert!(!matcher.is_match("c").unwrap());
    }

    #[test]
    fn test_number_in_code_point_escape() {
        let (source, flags) = compile_source(
            &[r"^\u{", "}:"],
            &[Substitution::Number(65)],
            &no_rewrite_options(),
        )
        .unwrap();
        assert_eq!(source, r"^\u{41}:");
        assert_eq!(flags, "");

        let matcher = compile(
            &[r"^\u{", "}:"],
            &[Substitution::Number(65)],
            &no_rewrite_options(),
        )
        .unwrap();
        assert!(matcher.is_match("A:").unwrap());
        assert!(!matcher.is_match("B:").unwrap());
    }

    #[test]
    fn test_group_name_holes() {
        let matcher = compile(
            &["(?<", r">a)\k<", ">"],
            &[Substitution::from("w"), Substitution::from("w")],
            &no_rewrite_options(),
        )
        .unwrap();
        let m = matcher.find("aa").unwrap().unwrap();
        assert_eq!(m.as_str("aa"), "aa");
        assert_eq!(m.named_group_str("aa", "w"), Some("a"));
    }

    #[test]
    fn test_text_is_matched_literally() {
        let matcher = compile(
            &["^", "$"],
            &[Substitution::from("a.c")],
            &no_rewrite_options(),
        )
        .unwrap();
        assert!(matcher.is_match("a.c").unwrap());
        assert!(!matcher.is_match("abc").unwrap());
    }

    #[test]
    fn test_regex_value_rejected_in_class() {
        let err = compile(
            &["[", "]"],
            &[Substitution::regex("a", "")],
            &no_rewrite_options(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Interpolation(InterpolationError::ValueNotAllowed { .. })
        ));
    }
}

mod options {
    use super::*;

    #[test]
    fn test_reserved_flags_rejected() {
        for flag in ["x", "n", "u", "v"] {
            let options = Options {
                flags: flag.to_string(),
                ..Options::default()
            };
            let err = compile(&["a"], &[], &options).unwrap_err();
            assert!(
                matches!(err, Error::Option(OptionError::ReservedFlag(_))),
                "expected reserved-flag error for {flag:?}"
            );
            // Still rejected when other options are set.
            let options = Options {
                flags: format!("i{flag}"),
                subclass: true,
                ..Options::default()
            };
            assert!(matches!(
                compile(&["a"], &[], &options).unwrap_err(),
                Error::Option(OptionError::ReservedFlag(_))
            ));
        }
    }

    #[test]
    fn test_allowed_flags_applied() {
        let options = Options {
            flags: "i".to_string(),
            ..Options::default()
        };
        let matcher = compile(&["abc"], &[], &options).unwrap();
        assert!(matcher.is_match("xABCy").unwrap());
        assert_eq!(matcher.flags(), "i");
    }

    #[test]
    fn test_named_only_mode_default() {
        // Bare groups in literal text do not capture unless disabled.
        let matcher = compile(
            &["(a)(?<x>b)"],
            &[],
            &Options {
                subclass: true,
                ..Options::default()
            },
        )
        .unwrap();
        let m = matcher.find("ab").unwrap().unwrap();
        assert_eq!(m.groups.len(), 1);
        assert_eq!(m.named_group_str("ab", "x"), Some("b"));
    }

    #[test]
    fn test_derived_matcher_shares_filter() {
        let options = Options {
            subclass: true,
            disable: Disable {
                n: true,
                ..Disable::default()
            },
            ..Options::default()
        };
        let matcher = compile(&["(a)(?>b)"], &[], &options).unwrap();
        let derived: Matcher = matcher.clone();
        let m = derived.find("ab").unwrap().unwrap();
        assert_eq!(m.groups.len(), 1);
        assert_eq!(m.group_str("ab", 1), Some("a"));
    }
}
