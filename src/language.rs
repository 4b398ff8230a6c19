//! Maps a filename to one of a fixed set of source-language tags.
//!
//! Resolution order: exact filename match, then final-extension match,
//! then `None`. The tables are literal and fixed at build time, reproduced
//! from the original classifier's extension map.

use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Language {
    Bash,
    C,
    CSharp,
    CommonLisp,
    Cpp,
    Css,
    Dockerfile,
    Dot,
    Elisp,
    Elixir,
    Elm,
    EmbeddedTemplate,
    Erlang,
    FixedFormFortran,
    Fortran,
    Go,
    GoMod,
    Hack,
    Haskell,
    Hcl,
    Html,
    Java,
    JavaScript,
    Json,
    Julia,
    Kotlin,
    Lua,
    Make,
    Markdown,
    ObjC,
    OCaml,
    Perl,
    Php,
    Python,
    Ql,
    R,
    Regex,
    Rst,
    Ruby,
    Rust,
    Scala,
    Sql,
    Sqlite,
    Toml,
    Tsq,
    TypeScript,
    Yaml,
}

impl Language {
    /// Stable lowercase tag, matching the tree-sitter grammar names the
    /// original classifier's table was keyed on.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Bash => "bash",
            Language::C => "c",
            Language::CSharp => "c_sharp",
            Language::CommonLisp => "commonlisp",
            Language::Cpp => "cpp",
            Language::Css => "css",
            Language::Dockerfile => "dockerfile",
            Language::Dot => "dot",
            Language::Elisp => "elisp",
            Language::Elixir => "elixir",
            Language::Elm => "elm",
            Language::EmbeddedTemplate => "embedded_template",
            Language::Erlang => "erlang",
            Language::FixedFormFortran => "fixed_form_fortran",
            Language::Fortran => "fortran",
            Language::Go => "go",
            Language::GoMod => "gomod",
            Language::Hack => "hack",
            Language::Haskell => "haskell",
            Language::Hcl => "hcl",
            Language::Html => "html",
            Language::Java => "java",
            Language::JavaScript => "javascript",
            Language::Json => "json",
            Language::Julia => "julia",
            Language::Kotlin => "kotlin",
            Language::Lua => "lua",
            Language::Make => "make",
            Language::Markdown => "markdown",
            Language::ObjC => "objc",
            Language::OCaml => "ocaml",
            Language::Perl => "perl",
            Language::Php => "php",
            Language::Python => "python",
            Language::Ql => "ql",
            Language::R => "r",
            Language::Regex => "regex",
            Language::Rst => "rst",
            Language::Ruby => "ruby",
            Language::Rust => "rust",
            Language::Scala => "scala",
            Language::Sql => "sql",
            Language::Sqlite => "sqlite",
            Language::Toml => "toml",
            Language::Tsq => "tsq",
            Language::TypeScript => "typescript",
            Language::Yaml => "yaml",
        }
    }

    pub fn all() -> &'static [Language] {
        &[
            Language::Bash,
            Language::C,
            Language::CSharp,
            Language::CommonLisp,
            Language::Cpp,
            Language::Css,
            Language::Dockerfile,
            Language::Dot,
            Language::Elisp,
            Language::Elixir,
            Language::Elm,
            Language::EmbeddedTemplate,
            Language::Erlang,
            Language::FixedFormFortran,
            Language::Fortran,
            Language::Go,
            Language::GoMod,
            Language::Hack,
            Language::Haskell,
            Language::Hcl,
            Language::Html,
            Language::Java,
            Language::JavaScript,
            Language::Json,
            Language::Julia,
            Language::Kotlin,
            Language::Lua,
            Language::Make,
            Language::Markdown,
            Language::ObjC,
            Language::OCaml,
            Language::Perl,
            Language::Php,
            Language::Python,
            Language::Ql,
            Language::R,
            Language::Regex,
            Language::Rst,
            Language::Ruby,
            Language::Rust,
            Language::Scala,
            Language::Sql,
            Language::Sqlite,
            Language::Toml,
            Language::Tsq,
            Language::TypeScript,
            Language::Yaml,
        ]
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::all().iter().copied().find(|lang| lang.as_str() == tag)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl serde::Serialize for Language {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Language {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Language::parse(&tag)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown language tag `{tag}`")))
    }
}

/// Whole-filename matches checked before falling back to extension.
const EXACT_NAME_TABLE: &[(&str, Language)] = &[
    ("Dockerfile", Language::Dockerfile),
    ("Makefile", Language::Make),
    ("go.mod", Language::GoMod),
];

/// Final-extension (lowercased, including the leading dot) to language.
const EXTENSION_TABLE: &[(&str, Language)] = &[
    (".sh", Language::Bash),
    (".bash", Language::Bash),
    (".c", Language::C),
    (".cs", Language::CSharp),
    (".lisp", Language::CommonLisp),
    (".lsp", Language::CommonLisp),
    (".cpp", Language::Cpp),
    (".cc", Language::Cpp),
    (".cxx", Language::Cpp),
    (".hpp", Language::Cpp),
    (".h", Language::C),
    (".css", Language::Css),
    (".dockerfile", Language::Dockerfile),
    (".dot", Language::Dot),
    (".el", Language::Elisp),
    (".ex", Language::Elixir),
    (".exs", Language::Elixir),
    (".elm", Language::Elm),
    (".ejs", Language::EmbeddedTemplate),
    (".erl", Language::Erlang),
    (".hrl", Language::Erlang),
    (".f", Language::FixedFormFortran),
    (".for", Language::FixedFormFortran),
    (".f90", Language::Fortran),
    (".f95", Language::Fortran),
    (".go", Language::Go),
    (".mod", Language::GoMod),
    (".hack", Language::Hack),
    (".hs", Language::Haskell),
    (".hcl", Language::Hcl),
    (".tf", Language::Hcl),
    (".html", Language::Html),
    (".htm", Language::Html),
    (".java", Language::Java),
    (".js", Language::JavaScript),
    (".jsx", Language::JavaScript),
    (".json", Language::Json),
    (".jl", Language::Julia),
    (".kt", Language::Kotlin),
    (".kts", Language::Kotlin),
    (".lua", Language::Lua),
    (".mk", Language::Make),
    (".md", Language::Markdown),
    (".m", Language::ObjC),
    (".mm", Language::ObjC),
    (".ml", Language::OCaml),
    (".mli", Language::OCaml),
    (".pl", Language::Perl),
    (".pm", Language::Perl),
    (".php", Language::Php),
    (".py", Language::Python),
    (".ql", Language::Ql),
    (".r", Language::R),
    (".regex", Language::Regex),
    (".rst", Language::Rst),
    (".rb", Language::Ruby),
    (".rs", Language::Rust),
    (".scala", Language::Scala),
    (".sc", Language::Scala),
    (".sql", Language::Sql),
    (".sqlite", Language::Sqlite),
    (".db", Language::Sqlite),
    (".toml", Language::Toml),
    (".tsq", Language::Tsq),
    (".ts", Language::TypeScript),
    (".tsx", Language::TypeScript),
    (".yaml", Language::Yaml),
    (".yml", Language::Yaml),
];

/// Classify a path by filename, falling back to its final extension.
///
/// Matches the original's two-stage lookup: the exact-name table is matched
/// against the whole path string, not its basename, so `Dockerfile`/
/// `Makefile`/`go.mod` only hit at repo root; a nested `tools/Dockerfile`
/// falls through to the extension table (and misses it, since it has none).
pub fn classify(path: &str) -> Option<Language> {
    if let Some((_, lang)) = EXACT_NAME_TABLE.iter().find(|(name, _)| *name == path) {
        return Some(*lang);
    }

    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))?;

    EXTENSION_TABLE
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, lang)| *lang)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_exact_filenames_before_extension() {
        assert_eq!(classify("Dockerfile"), Some(Language::Dockerfile));
        assert_eq!(classify("Makefile"), Some(Language::Make));
        assert_eq!(classify("go.mod"), Some(Language::GoMod));
        assert_eq!(classify("src/go.mod"), Some(Language::GoMod));
    }

    #[test]
    fn matches_final_extension_case_insensitively() {
        assert_eq!(classify("main.py"), Some(Language::Python));
        assert_eq!(classify("Main.PY"), Some(Language::Python));
        assert_eq!(classify("src/lib.rs"), Some(Language::Rust));
        assert_eq!(classify("module.TS"), Some(Language::TypeScript));
    }

    #[test]
    fn unrecognized_extension_is_none() {
        assert_eq!(classify("README"), None);
        assert_eq!(classify("archive.tar.gz"), None);
        assert_eq!(classify("no_extension_at_all"), None);
    }

    #[test]
    fn exact_name_table_only_matches_at_repo_root() {
        assert_eq!(classify("Dockerfile"), Some(Language::Dockerfile));
        assert_eq!(classify("tools/Dockerfile"), None);
        assert_eq!(classify("Makefile"), Some(Language::Make));
        assert_eq!(classify("sub/Makefile"), None);
    }

    #[test]
    fn round_trips_through_tag_string() {
        for lang in Language::all() {
            assert_eq!(Language::parse(lang.as_str()), Some(*lang));
        }
    }
}
