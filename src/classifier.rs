//! Per-line comment and import-clause state machine.
//!
//! The classifier looks at one physical line at a time and decides whether
//! the line is worth keeping for package/import extraction. The only memory
//! it needs across lines is the [`LineState`] the caller threads through.

const BLOCK_OPEN: &str = "/*";
const BLOCK_CLOSE: &str = "*/";
const LINE_COMMENT: &str = "//";
const IMPORT_KEYWORD: &str = "import";
const CLAUSE_TERMINATOR: &str = ")";

/// Where the scanner currently is relative to comments and import clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineState {
    #[default]
    Normal,
    /// Inside `import ( ... )`, waiting for the closing `)`.
    InImportClause,
    /// Inside `/* ... */`. `within_imports` remembers whether the comment
    /// opened inside an import clause so the clause resumes afterwards.
    InBlockComment { within_imports: bool },
}

impl LineState {
    pub fn in_block_comment(self) -> bool {
        matches!(self, LineState::InBlockComment { .. })
    }

    pub fn in_import_clause(self) -> bool {
        matches!(
            self,
            LineState::InImportClause
                | LineState::InBlockComment {
                    within_imports: true
                }
        )
    }

    fn enter_block_comment(self) -> Self {
        LineState::InBlockComment {
            within_imports: self.in_import_clause(),
        }
    }

    fn leave_block_comment(self) -> Self {
        match self {
            LineState::InBlockComment {
                within_imports: true,
            } => LineState::InImportClause,
            LineState::InBlockComment {
                within_imports: false,
            } => LineState::Normal,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    None,
    /// The import clause is complete; nothing after this line is needed.
    EndOfImportClause,
}

/// Which rule fired; the scanner traces it for every line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    BlockCommentOpen,
    LineComment,
    BlockCommentClose,
    GroupedImportOpen,
    GroupedImportClose,
    SingleImport,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub keep: bool,
    pub next: LineState,
    pub signal: Signal,
    pub rule: Rule,
}

impl Classification {
    fn new(keep: bool, next: LineState, rule: Rule) -> Self {
        Self {
            keep,
            next,
            signal: Signal::None,
            rule,
        }
    }

    fn ending(keep: bool, next: LineState, rule: Rule) -> Self {
        Self {
            keep,
            next,
            signal: Signal::EndOfImportClause,
            rule,
        }
    }
}

/// Classify one line given the state left behind by the previous line.
///
/// Rules are tried in a fixed priority order; the first one that applies
/// decides the outcome.
pub fn classify(line: &str, state: LineState) -> Classification {
    let trimmed = line.trim();
    let in_block = state.in_block_comment();

    if trimmed.contains(BLOCK_OPEN) && !trimmed.contains(BLOCK_CLOSE) {
        let has_content_before = !trimmed.starts_with(BLOCK_OPEN);
        return Classification::new(
            has_content_before,
            state.enter_block_comment(),
            Rule::BlockCommentOpen,
        );
    }

    if trimmed.starts_with(LINE_COMMENT) {
        return Classification::new(false, state, Rule::LineComment);
    }

    if in_block && trimmed.contains(BLOCK_CLOSE) {
        return Classification::new(false, state.leave_block_comment(), Rule::BlockCommentClose);
    }

    if !in_block && opens_grouped_import(trimmed) {
        if closes_on_same_line(trimmed) {
            return Classification::ending(true, LineState::Normal, Rule::GroupedImportClose);
        }
        return Classification::new(true, LineState::InImportClause, Rule::GroupedImportOpen);
    }

    if state == LineState::InImportClause && trimmed == CLAUSE_TERMINATOR {
        return Classification::ending(true, LineState::Normal, Rule::GroupedImportClose);
    }

    if !in_block && is_single_import(trimmed) {
        return Classification::ending(true, state, Rule::SingleImport);
    }

    Classification::new(!in_block, state, Rule::Content)
}

/// `import (` with any spacing before the parenthesis.
pub fn opens_grouped_import(trimmed: &str) -> bool {
    trimmed
        .strip_prefix(IMPORT_KEYWORD)
        .is_some_and(|rest| rest.trim_start().starts_with('('))
}

/// `import ("fmt")`: the whole clause fits on the opening line.
fn closes_on_same_line(trimmed: &str) -> bool {
    trimmed
        .split_once('(')
        .is_some_and(|(_, rest)| rest.contains(CLAUSE_TERMINATOR))
}

/// `import "fmt"` or `import f "fmt"`, but not `imports := 1`.
pub fn is_single_import(trimmed: &str) -> bool {
    let Some(rest) = trimmed.strip_prefix(IMPORT_KEYWORD) else {
        return false;
    };
    let starts_cleanly = rest.starts_with(char::is_whitespace) || rest.starts_with('"');
    let rest = rest.trim_start();
    starts_cleanly && !rest.is_empty() && !rest.starts_with('(')
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: LineState = LineState::InBlockComment {
        within_imports: false,
    };

    #[test]
    fn indentation_does_not_hide_comments() {
        let c = classify("\t   // import (", LineState::Normal);
        assert!(!c.keep);
        assert_eq!(c.rule, Rule::LineComment);
        assert_eq!(c.next, LineState::Normal);
    }

    #[test]
    fn block_opener_at_line_start_is_dropped() {
        let c = classify("/* start of a long comment", LineState::Normal);
        assert!(!c.keep);
        assert_eq!(c.next, BLOCK);
    }

    #[test]
    fn block_opener_after_content_keeps_the_line() {
        let c = classify("package app /* trailing", LineState::Normal);
        assert!(c.keep);
        assert_eq!(c.next, BLOCK);
        assert_eq!(c.rule, Rule::BlockCommentOpen);
    }

    #[test]
    fn one_line_block_comment_is_plain_content() {
        let c = classify("/* short */", LineState::Normal);
        assert_eq!(c.rule, Rule::Content);
        assert_eq!(c.next, LineState::Normal);
    }

    #[test]
    fn closer_leaves_block_comment() {
        let c = classify("end of comment */", BLOCK);
        assert!(!c.keep);
        assert_eq!(c.next, LineState::Normal);
    }

    #[test]
    fn import_inside_block_comment_is_ignored() {
        let c = classify("import (", BLOCK);
        assert!(!c.keep);
        assert_eq!(c.next, BLOCK);
        assert_eq!(c.signal, Signal::None);

        let c = classify("import \"os\"", BLOCK);
        assert_eq!(c.signal, Signal::None);
    }

    #[test]
    fn grouped_import_opens_clause() {
        for line in ["import (", "import(", "  import   (  "] {
            let c = classify(line, LineState::Normal);
            assert!(c.keep, "{line}");
            assert_eq!(c.next, LineState::InImportClause, "{line}");
        }
    }

    #[test]
    fn one_line_grouped_import_ends_immediately() {
        for line in ["import (\"b\")", "import()", "import ( \"fmt\"; \"os\" )"] {
            let c = classify(line, LineState::Normal);
            assert!(c.keep, "{line}");
            assert_eq!(c.rule, Rule::GroupedImportClose, "{line}");
            assert_eq!(c.signal, Signal::EndOfImportClause, "{line}");
            assert_eq!(c.next, LineState::Normal, "{line}");
        }
    }

    #[test]
    fn terminator_ends_clause() {
        let c = classify("  )", LineState::InImportClause);
        assert!(c.keep);
        assert_eq!(c.signal, Signal::EndOfImportClause);
        assert_eq!(c.next, LineState::Normal);
    }

    #[test]
    fn terminator_outside_clause_is_content() {
        let c = classify(")", LineState::Normal);
        assert_eq!(c.signal, Signal::None);
        assert_eq!(c.rule, Rule::Content);
    }

    #[test]
    fn single_import_ends_immediately() {
        let c = classify("import \"fmt\"", LineState::Normal);
        assert!(c.keep);
        assert_eq!(c.signal, Signal::EndOfImportClause);
        assert_eq!(c.rule, Rule::SingleImport);
    }

    #[test]
    fn identifiers_prefixed_with_import_are_content() {
        let c = classify("imports := load()", LineState::Normal);
        assert_eq!(c.rule, Rule::Content);
        assert!(!is_single_import("import"));
    }

    #[test]
    fn comment_inside_clause_resumes_clause() {
        let c = classify("/* disabled:", LineState::InImportClause);
        assert_eq!(
            c.next,
            LineState::InBlockComment {
                within_imports: true
            }
        );

        let c = classify(")", c.next);
        assert_eq!(c.signal, Signal::None);
        assert!(!c.keep);

        let c = classify("*/", LineState::InBlockComment { within_imports: true });
        assert_eq!(c.next, LineState::InImportClause);
    }

    #[test]
    fn content_inside_block_comment_is_dropped() {
        let c = classify("package decoy", BLOCK);
        assert!(!c.keep);
        assert_eq!(c.next, BLOCK);
    }
}
