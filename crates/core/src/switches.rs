//! cl.exe switch translation table
//!
//! Maps the `cl.exe` switches used by the project build onto their `gcc`
//! equivalents. Lookups are exact and case-sensitive. Switches that map to
//! [`SwitchEffect::Drop`] are either not applicable to gcc or are gcc's
//! default behaviour already.
//!
//! Adding a switch means adding a row to [`SWITCH_TABLE`]. Spellings include
//! the leading `/`, since that is how the tokenizer hands them over.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Switch whose presence routes the build through gcc instead of cl.exe.
pub const GCC_BUILD_MARKER: &str = "/GCCBuild";

/// Include-path switch. cl.exe accepts it glued to the directory (`/Iinclude`),
/// so it never tokenizes on its own and is matched by prefix instead.
pub const INCLUDE_PREFIX: &str = "/I";

/// Define switch in its glued spelling (`/DNAME=VALUE`), matched by prefix.
pub const DEFINE_PREFIX: &str = "/D";

/// Output switch in its glued spelling (`/FoDebug\`), matched by prefix.
pub const OUTPUT_PREFIX: &str = "/Fo";

/// What a recognized switch does to the gcc command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchEffect {
    /// Absorbed: contributes nothing
    Drop,
    /// Replaced one-to-one by a gcc fragment
    Direct(&'static str),
    /// `/D`: appends ` -D`, the following token is the macro text
    Define,
    /// `/Fo`: appends nothing, the following token is the output directory
    Output,
}

impl SwitchEffect {
    /// Fragment appended to the gcc flags when the switch is seen.
    ///
    /// `/Fo` has no fixed fragment; its `-o` is emitted once, after scanning.
    pub fn fragment(self) -> &'static str {
        match self {
            SwitchEffect::Drop | SwitchEffect::Output => "",
            SwitchEffect::Direct(fragment) => fragment,
            SwitchEffect::Define => " -D",
        }
    }
}

/// Every switch the wrapper understands.
pub static SWITCH_TABLE: &[(&str, SwitchEffect)] = &[
    ("/c", SwitchEffect::Direct(" -c")),
    ("/Zi", SwitchEffect::Drop),
    ("/nologo", SwitchEffect::Drop),
    ("/Wall", SwitchEffect::Direct(" -Wall")),
    ("/WX", SwitchEffect::Direct(" -Werror")),
    ("/WX-", SwitchEffect::Drop),
    ("/Ox", SwitchEffect::Direct(" -O3")),
    ("/Ob2", SwitchEffect::Drop),
    ("/Oi", SwitchEffect::Drop),
    ("/Ot", SwitchEffect::Drop),
    ("/Oy", SwitchEffect::Drop),
    ("/Oy-", SwitchEffect::Direct(" -fno-omit-frame-pointer")),
    ("/GT", SwitchEffect::Drop),
    ("/GL", SwitchEffect::Direct(" -flto")),
    ("/D", SwitchEffect::Define),
    ("/Gm-", SwitchEffect::Drop),
    ("/EHa", SwitchEffect::Drop),
    // The link step has to pull in LIBCMT.lib for this to mean anything
    ("/MT", SwitchEffect::Direct(" -D_MT")),
    ("/GS-", SwitchEffect::Drop),
    (
        "/fp:precise",
        SwitchEffect::Direct(" -frounding-math -fsignaling-nans"),
    ),
    ("/Zc:auto", SwitchEffect::Drop),
    ("/Zc:wchar_t", SwitchEffect::Drop),
    ("/Zc:forScope", SwitchEffect::Drop),
    ("/Fo", SwitchEffect::Output),
    ("/Fd", SwitchEffect::Drop),
    ("/Gd", SwitchEffect::Drop),
    ("/TP", SwitchEffect::Drop),
    ("/analyze-", SwitchEffect::Drop),
    ("/errorReport:prompt", SwitchEffect::Drop),
    (GCC_BUILD_MARKER, SwitchEffect::Drop),
];

static SWITCH_INDEX: LazyLock<HashMap<&'static str, SwitchEffect>> =
    LazyLock::new(|| SWITCH_TABLE.iter().copied().collect());

/// Look up a token in the switch table.
///
/// `None` just means the token is not a known switch; the synthesizer then
/// treats it as a file, include path or switch value.
pub fn lookup(spelling: &str) -> Option<SwitchEffect> {
    SWITCH_INDEX.get(spelling).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_has_unique_keys() {
        let keys: HashSet<_> = SWITCH_TABLE.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.len(), SWITCH_TABLE.len());
    }

    #[test]
    fn test_lookup_direct() {
        assert_eq!(lookup("/c"), Some(SwitchEffect::Direct(" -c")));
        assert_eq!(lookup("/WX"), Some(SwitchEffect::Direct(" -Werror")));
        assert_eq!(lookup("/Ox").map(SwitchEffect::fragment), Some(" -O3"));
    }

    #[test]
    fn test_lookup_is_exact_and_case_sensitive() {
        assert_eq!(lookup("/C"), None);
        assert_eq!(lookup("/WX-"), Some(SwitchEffect::Drop));
        assert_eq!(lookup("/WX-x"), None);
        assert_eq!(lookup("c"), None);
    }

    #[test]
    fn test_marked_switches() {
        assert_eq!(lookup("/D"), Some(SwitchEffect::Define));
        assert_eq!(lookup("/Fo"), Some(SwitchEffect::Output));
        assert_eq!(SwitchEffect::Define.fragment(), " -D");
        assert_eq!(SwitchEffect::Output.fragment(), "");
    }

    #[test]
    fn test_include_switch_is_not_in_table() {
        // Only ever seen glued to its directory
        assert_eq!(lookup("/I"), None);
        assert_eq!(lookup("/Iinclude"), None);
    }

    #[test]
    fn test_marker_is_absorbed() {
        assert_eq!(lookup(GCC_BUILD_MARKER), Some(SwitchEffect::Drop));
    }

    #[test]
    fn test_direct_fragments_are_space_prefixed() {
        for (spelling, effect) in SWITCH_TABLE {
            if let SwitchEffect::Direct(fragment) = effect {
                assert!(
                    fragment.starts_with(" -"),
                    "{} maps to malformed fragment {:?}",
                    spelling,
                    fragment
                );
            }
        }
    }
}
