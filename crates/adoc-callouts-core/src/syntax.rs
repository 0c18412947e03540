//! Comment syntax per code block language

/// How a language writes a trailing comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    /// Opening delimiter (`#`, `//`, `<!--`, ...)
    pub prefix: &'static str,
    /// Closing delimiter for block-style comments (`-->`, `*/`)
    pub suffix: Option<&'static str>,
}

impl CommentSyntax {
    const fn line(prefix: &'static str) -> Self {
        Self {
            prefix,
            suffix: None,
        }
    }

    const fn wrapped(prefix: &'static str, suffix: &'static str) -> Self {
        Self {
            prefix,
            suffix: Some(suffix),
        }
    }

    /// Wrap text in this comment syntax
    pub fn comment(&self, text: &str) -> String {
        match self.suffix {
            Some(suffix) => format!("{} {} {}", self.prefix, text, suffix),
            None => format!("{} {}", self.prefix, text),
        }
    }
}

const HASH: CommentSyntax = CommentSyntax::line("#");
const SLASHES: CommentSyntax = CommentSyntax::line("//");
const DASHES: CommentSyntax = CommentSyntax::line("--");
const SEMICOLON: CommentSyntax = CommentSyntax::line(";");
const PERCENT: CommentSyntax = CommentSyntax::line("%");
const QUOTE: CommentSyntax = CommentSyntax::line("\"");
const MARKUP: CommentSyntax = CommentSyntax::wrapped("<!--", "-->");
const C_BLOCK: CommentSyntax = CommentSyntax::wrapped("/*", "*/");
const JINJA: CommentSyntax = CommentSyntax::wrapped("{#", "#}");

/// Comment syntax used when the language is missing or unknown
pub const DEFAULT_SYNTAX: CommentSyntax = HASH;

/// Language tag to comment syntax, sorted by tag
static LANGUAGES: &[(&str, CommentSyntax)] = &[
    ("ada", DASHES),
    ("asciidoc", SLASHES),
    ("bash", HASH),
    ("c", SLASHES),
    ("c#", SLASHES),
    ("c++", SLASHES),
    ("clj", SEMICOLON),
    ("clojure", SEMICOLON),
    ("cmake", HASH),
    ("conf", HASH),
    ("console", HASH),
    ("containerfile", HASH),
    ("cpp", SLASHES),
    ("cs", SLASHES),
    ("csharp", SLASHES),
    ("css", C_BLOCK),
    ("dart", SLASHES),
    ("dockerfile", HASH),
    ("elixir", HASH),
    ("elm", DASHES),
    ("erlang", PERCENT),
    ("go", SLASHES),
    ("golang", SLASHES),
    ("gradle", SLASHES),
    ("graphql", HASH),
    ("groovy", SLASHES),
    ("haskell", DASHES),
    ("hcl", HASH),
    ("hs", DASHES),
    ("html", MARKUP),
    ("ini", SEMICOLON),
    ("java", SLASHES),
    ("javascript", SLASHES),
    ("jinja", JINJA),
    ("jinja2", JINJA),
    ("js", SLASHES),
    ("json", SLASHES),
    ("json5", SLASHES),
    ("jsonc", SLASHES),
    ("jsx", SLASHES),
    ("kotlin", SLASHES),
    ("kt", SLASHES),
    ("latex", PERCENT),
    ("less", SLASHES),
    ("lisp", SEMICOLON),
    ("lua", DASHES),
    ("make", HASH),
    ("makefile", HASH),
    ("markdown", MARKUP),
    ("matlab", PERCENT),
    ("md", MARKUP),
    ("nginx", HASH),
    ("objc", SLASHES),
    ("perl", HASH),
    ("php", SLASHES),
    ("powershell", HASH),
    ("properties", HASH),
    ("proto", SLASHES),
    ("protobuf", SLASHES),
    ("ps1", HASH),
    ("py", HASH),
    ("python", HASH),
    ("r", HASH),
    ("rb", HASH),
    ("rs", SLASHES),
    ("ruby", HASH),
    ("rust", SLASHES),
    ("scala", SLASHES),
    ("scheme", SEMICOLON),
    ("scss", SLASHES),
    ("sh", HASH),
    ("shell", HASH),
    ("sql", DASHES),
    ("svg", MARKUP),
    ("swift", SLASHES),
    ("terminal", HASH),
    ("terraform", HASH),
    ("tex", PERCENT),
    ("tf", HASH),
    ("toml", HASH),
    ("ts", SLASHES),
    ("tsx", SLASHES),
    ("typescript", SLASHES),
    ("vb", QUOTE),
    ("vim", QUOTE),
    ("xhtml", MARKUP),
    ("xml", MARKUP),
    ("xsl", MARKUP),
    ("xslt", MARKUP),
    ("yaml", HASH),
    ("yml", HASH),
    ("zsh", HASH),
];

/// Comment syntaxes recognized in blocks with a missing or unknown language
pub const GENERIC_SYNTAXES: &[CommentSyntax] = &[HASH, SLASHES, MARKUP, C_BLOCK];

/// Find the table entry of a language tag, case-insensitively
pub fn find(language: &str) -> Option<CommentSyntax> {
    let lang = language.trim().to_lowercase();
    LANGUAGES
        .binary_search_by(|(tag, _)| tag.cmp(&lang.as_str()))
        .ok()
        .map(|index| LANGUAGES[index].1)
}

/// Look up the comment syntax of a language tag
///
/// Missing or unknown languages get [`DEFAULT_SYNTAX`].
pub fn lookup(language: Option<&str>) -> CommentSyntax {
    language.and_then(find).unwrap_or(DEFAULT_SYNTAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        assert!(LANGUAGES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_lookup_common_languages() {
        assert_eq!(lookup(Some("yaml")).prefix, "#");
        assert_eq!(lookup(Some("Java")).prefix, "//");
        assert_eq!(lookup(Some("sql")).prefix, "--");
        assert_eq!(lookup(Some("xml")), CommentSyntax::wrapped("<!--", "-->"));
        assert_eq!(lookup(Some("css")).suffix, Some("*/"));
    }

    #[test]
    fn test_lookup_fallback() {
        assert_eq!(lookup(None), DEFAULT_SYNTAX);
        assert_eq!(lookup(Some("brainfuck")), DEFAULT_SYNTAX);
        assert!(find("brainfuck").is_none());
        assert_eq!(find("TOML"), Some(HASH));
    }

    #[test]
    fn test_comment_rendering() {
        assert_eq!(lookup(Some("bash")).comment("Lists files."), "# Lists files.");
        assert_eq!(
            lookup(Some("html")).comment("The title."),
            "<!-- The title. -->"
        );
    }
}
