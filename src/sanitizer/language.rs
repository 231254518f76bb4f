//! Language labels for code blocks.

/// Token heuristics in precedence order. The first row with a token contained
/// in the code wins, even when later rows would also match.
const HEURISTICS: &[(&[&str], &str)] = &[
    (&["git "], "Bash"),
    (&["npm ", "pnpm "], "Shell"),
    (&["function", "const "], "JavaScript"),
    (&["interface", "type "], "TypeScript"),
    (&["<?php"], "PHP"),
    (&["def ", "import "], "Python"),
];

/// Prefix Code Block Pro puts in front of its font names.
const FONT_FAMILY_PREFIX: &str = "Code-Pro-";

/// Guess a language label from characteristic tokens in `code`.
///
/// ```
/// use wp_content::detect_language;
///
/// assert_eq!(detect_language("git commit -m \"init\""), Some("Bash"));
/// assert_eq!(detect_language("SELECT 1;"), None);
/// ```
pub fn detect_language(code: &str) -> Option<&'static str> {
    HEURISTICS
        .iter()
        .find(|(tokens, _)| tokens.iter().any(|token| code.contains(token)))
        .map(|(_, label)| *label)
}

/// Label derived from a `data-code-block-pro-font-family` value, e.g.
/// `Code-Pro-JetBrains-Mono` becomes `JetBrains Mono`.
pub(crate) fn font_family_label(value: &str) -> Option<String> {
    let name = value.trim();
    let name = name.strip_prefix(FONT_FAMILY_PREFIX).unwrap_or(name);
    let label = name.replace('-', " ").trim().to_string();
    (!label.is_empty()).then_some(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_heuristic() {
        assert_eq!(detect_language("git push origin main"), Some("Bash"));
        assert_eq!(detect_language("npm install"), Some("Shell"));
        assert_eq!(detect_language("pnpm add -D vitest"), Some("Shell"));
        assert_eq!(detect_language("const x = 1;"), Some("JavaScript"));
        assert_eq!(detect_language("function go() {}"), Some("JavaScript"));
        assert_eq!(detect_language("interface Props { a: string }"), Some("TypeScript"));
        assert_eq!(detect_language("type A = string"), Some("TypeScript"));
        assert_eq!(detect_language("<?php echo 1;"), Some("PHP"));
        assert_eq!(detect_language("def main():\n    pass"), Some("Python"));
        assert_eq!(detect_language("import os"), Some("Python"));
    }

    #[test]
    fn earlier_heuristics_win() {
        assert_eq!(detect_language("git clone x && function f() {}"), Some("Bash"));
        assert_eq!(detect_language("npm run build # const"), Some("Shell"));
        assert_eq!(detect_language("import { a } from 'b'\nconst c = a"), Some("JavaScript"));
        assert_eq!(detect_language("<?php function f() {}"), Some("JavaScript"));
    }

    #[test]
    fn no_match() {
        assert_eq!(detect_language(""), None);
        assert_eq!(detect_language("fn main() {}"), None);
    }

    #[test]
    fn font_family_labels() {
        assert_eq!(font_family_label("Code-Pro-JetBrains-Mono").as_deref(), Some("JetBrains Mono"));
        assert_eq!(font_family_label("Code-Pro-JavaScript").as_deref(), Some("JavaScript"));
        assert_eq!(font_family_label("Fira-Code").as_deref(), Some("Fira Code"));
        assert_eq!(font_family_label("Code-Pro-"), None);
        assert_eq!(font_family_label("  "), None);
    }
}
