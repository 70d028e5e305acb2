//! Lookup-function import injection.

use std::collections::HashSet;

use swc_common::Spanned;
use swc_ecma_ast::{
    BindingIdent, Decl, Expr, ImportDecl, ImportSpecifier, Lit, ModuleDecl, ModuleItem, Pat, Stmt,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::{
    core::{
        extract::{EngineOptions, edits::Edit},
        parsers::jsx::ParsedJSX,
    },
    utils::contains_target_text,
};

const IMPORT_KEYWORD_LEN: usize = "import".len();

/// Edits that make the lookup function available in a file that now calls it.
pub fn import_edits(parsed: &ParsedJSX, options: &EngineOptions) -> Vec<Edit> {
    let name = options.lookup_function.as_str();
    let body = &parsed.module.body;

    let source = Some(options.import_source.as_str());
    let from_source: Vec<&ImportDecl> = body
        .iter()
        .filter_map(|item| match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import))
                if !import.type_only && import.src.value.as_str() == source =>
            {
                Some(import)
            }
            _ => None,
        })
        .collect();

    let default_local = from_source.iter().find_map(|import| {
        import.specifiers.iter().find_map(|spec| match spec {
            ImportSpecifier::Default(default) => Some((*import, default.local.sym.as_str())),
            _ => None,
        })
    });

    if default_local.is_some_and(|(_, local)| local == name) {
        return Vec::new();
    }
    if module_bindings(body).contains(name) {
        return Vec::new();
    }

    if let Some((import, alias)) = default_local {
        let at = parsed.offset(import.span.hi);
        return vec![Edit::insert(at, format!("\nconst {} = {};", name, alias))];
    }

    if let Some(import) = from_source.first() {
        let at = parsed.offset(import.span.lo) + IMPORT_KEYWORD_LEN;
        let text = if import.specifiers.is_empty() {
            format!(" {} from", name)
        } else {
            format!(" {},", name)
        };
        return vec![Edit::insert(at, text)];
    }

    let statement = format!(
        "import {} from {};",
        name,
        serde_json::Value::from(options.import_source.as_str())
    );
    match body.iter().take_while(|item| is_directive(item)).last() {
        Some(directive) => vec![Edit::insert(
            parsed.offset(directive.span().hi),
            format!("\n{}", statement),
        )],
        None => match body.first() {
            Some(first) => vec![Edit::insert(
                parsed.offset(first.span().lo),
                format!("{}\n", statement),
            )],
            None => vec![Edit::insert(0, format!("{}\n", statement))],
        },
    }
}

/// `"use client";` style prologue statements.
fn is_directive(item: &ModuleItem) -> bool {
    match item {
        ModuleItem::Stmt(Stmt::Expr(stmt)) => match &*stmt.expr {
            Expr::Lit(Lit::Str(s)) => s.value.as_str().is_some_and(|v| !contains_target_text(v)),
            _ => false,
        },
        _ => false,
    }
}

/// Names bound at module level by imports and declarations.
fn module_bindings(body: &[ModuleItem]) -> HashSet<String> {
    let mut names = HashSet::new();
    for item in body {
        let decl = match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                names.extend(import.specifiers.iter().map(|spec| match spec {
                    ImportSpecifier::Named(named) => named.local.sym.to_string(),
                    ImportSpecifier::Default(default) => default.local.sym.to_string(),
                    ImportSpecifier::Namespace(ns) => ns.local.sym.to_string(),
                }));
                continue;
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => &export.decl,
            ModuleItem::Stmt(Stmt::Decl(decl)) => decl,
            _ => continue,
        };
        match decl {
            Decl::Var(var) => {
                for declarator in &var.decls {
                    collect_pattern(&declarator.name, &mut names);
                }
            }
            Decl::Fn(f) => {
                names.insert(f.ident.sym.to_string());
            }
            Decl::Class(c) => {
                names.insert(c.ident.sym.to_string());
            }
            _ => {}
        }
    }
    names
}

fn collect_pattern(pat: &Pat, names: &mut HashSet<String>) {
    struct Bindings<'a>(&'a mut HashSet<String>);

    impl Visit for Bindings<'_> {
        fn visit_binding_ident(&mut self, node: &BindingIdent) {
            self.0.insert(node.id.sym.to_string());
        }

        // Default values are not bindings.
        fn visit_expr(&mut self, _: &Expr) {}
    }

    pat.visit_with(&mut Bindings(names));
}
