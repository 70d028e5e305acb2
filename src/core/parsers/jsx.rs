use std::sync::Arc;

use anyhow::{Result, anyhow};
use swc_common::{BytePos, FileName, Globals, Loc, SourceMap, Span};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

/// A parsed module together with the source text its spans point into.
pub struct ParsedJSX {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    /// Full source text of the file.
    pub code: String,
    /// Position of the first byte of `code` inside `source_map`.
    pub start_pos: BytePos,
}

impl ParsedJSX {
    /// Byte offset of `pos` inside `code`.
    pub fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.start_pos.0) as usize
    }

    /// Source text covered by `span`.
    pub fn snippet(&self, span: Span) -> &str {
        let lo = self.offset(span.lo).min(self.code.len());
        let hi = self.offset(span.hi).clamp(lo, self.code.len());
        self.code.get(lo..hi).unwrap_or_default()
    }

    /// Line/column lookup for diagnostics.
    pub fn loc(&self, pos: BytePos) -> Loc {
        self.source_map.lookup_char_pos(pos)
    }
}

/// Parse JS/TS source code string into an AST.
///
/// `jsx` selects TSX syntax; plain `.ts` files are parsed without JSX so that
/// angle-bracket type assertions keep working.
pub fn parse_jsx_source(code: String, file_path: &str, jsx: bool) -> Result<ParsedJSX> {
    use swc_common::GLOBALS;

    let source_map: Arc<SourceMap> = Default::default();

    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.into()).into(), code.clone());

        let syntax = Syntax::Typescript(TsSyntax {
            tsx: jsx,
            decorators: true,
            ..Default::default()
        });

        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path, e))?;

        Ok(ParsedJSX {
            module,
            start_pos: source_file.start_pos,
            source_map: source_map.clone(),
            code,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_common::Spanned;

    #[test]
    fn test_parse_and_snippet() {
        let parsed = parse_jsx_source(
            "const a = \"保存\";\n".to_string(),
            "a.tsx",
            true,
        )
        .unwrap();
        let item = &parsed.module.body[0];
        assert!(parsed.snippet(item.span()).starts_with("const a = \"保存\""));
        assert_eq!(parsed.loc(item.span().lo).line, 1);
    }

    #[test]
    fn test_parse_error() {
        let result = parse_jsx_source("const = ;".to_string(), "broken.ts", false);
        assert!(result.is_err());
    }

    #[test]
    fn test_ts_file_allows_angle_bracket_assertions() {
        let result = parse_jsx_source("const a = <string>b;".to_string(), "a.ts", false);
        assert!(result.is_ok());
    }
}
