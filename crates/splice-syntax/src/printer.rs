//! Renders AST nodes back into Mica source text.
//!
//! The engine splices rendered text into documents with span-based edits, so
//! the printer only ever has to produce the inserted fragment; everything
//! around the splice point keeps its original formatting.

use crate::ast::{
    Argument, ElseBranch, Expression, ExpressionKind, LambdaBody, Literal, Pattern, Statement,
    TypeExpr, TypeKind, UnaryOp,
};
use crate::string_interner::StringInterner;

const POSTFIX_PREC: u8 = 7;

pub struct Printer<'i> {
    output: String,
    indent_level: usize,
    indent_str: String,
    interner: &'i StringInterner,
}

impl<'i> Printer<'i> {
    pub fn new(interner: &'i StringInterner) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_str: "    ".to_string(),
            interner,
        }
    }

    pub fn with_indent_str(mut self, indent_str: impl Into<String>) -> Self {
        self.indent_str = indent_str.into();
        self
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.indent_str);
        }
    }

    // Expressions

    pub fn expression(&mut self, expr: &Expression<'_>) {
        self.expression_prec(expr, 0);
    }

    fn expression_prec(&mut self, expr: &Expression<'_>, min_prec: u8) {
        match &expr.kind {
            ExpressionKind::Literal(lit) => self.literal(lit),
            ExpressionKind::Identifier(id) => {
                let name = self.interner.resolve(*id);
                self.write(&name);
            }
            ExpressionKind::SelfRef => self.write("self"),
            ExpressionKind::Unary(op, operand) => {
                self.write(match op {
                    UnaryOp::Neg => "-",
                    UnaryOp::Not => "!",
                });
                self.expression_prec(operand, POSTFIX_PREC);
            }
            ExpressionKind::Binary(op, left, right) => {
                let prec = op.precedence();
                let needs_parens = prec < min_prec;
                if needs_parens {
                    self.write("(");
                }
                self.expression_prec(left, prec);
                self.write(" ");
                self.write(op.symbol());
                self.write(" ");
                self.expression_prec(right, prec + 1);
                if needs_parens {
                    self.write(")");
                }
            }
            ExpressionKind::Call(callee, args, type_args) => {
                self.expression_prec(callee, POSTFIX_PREC);
                if !type_args.is_empty() {
                    self.write("<");
                    for (i, ty) in type_args.iter().enumerate() {
                        if i > 0 {
                            self.write(", ");
                        }
                        self.type_expr(ty);
                    }
                    self.write(">");
                }
                self.write("(");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.argument(arg);
                }
                self.write(")");
            }
            ExpressionKind::Member(receiver, name) => {
                self.expression_prec(receiver, POSTFIX_PREC);
                self.write(".");
                let name = self.interner.resolve(name.node);
                self.write(&name);
            }
            ExpressionKind::Index(base, index) => {
                self.expression_prec(base, POSTFIX_PREC);
                self.write("[");
                self.expression(index);
                self.write("]");
            }
            ExpressionKind::Tuple(elements) => {
                self.write("(");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.expression(element);
                }
                self.write(")");
            }
            ExpressionKind::Lambda(params, body) => {
                let needs_parens = min_prec > 0;
                if needs_parens {
                    self.write("(");
                }
                if params.is_empty() {
                    self.write("||");
                } else {
                    self.write("|");
                    for (i, param) in params.iter().enumerate() {
                        if i > 0 {
                            self.write(", ");
                        }
                        let name = self.interner.resolve(param.node);
                        self.write(&name);
                    }
                    self.write("|");
                }
                self.write(" ");
                match body {
                    LambdaBody::Expression(expr) => self.expression(expr),
                    LambdaBody::Block(block) => {
                        self.write("{\n");
                        self.indent_level += 1;
                        for statement in block.statements {
                            self.write_indent();
                            self.statement(statement);
                            self.write("\n");
                        }
                        self.indent_level -= 1;
                        self.write_indent();
                        self.write("}");
                    }
                }
                if needs_parens {
                    self.write(")");
                }
            }
            ExpressionKind::Cast(operand, ty) => {
                let needs_parens = min_prec > 0;
                if needs_parens {
                    self.write("(");
                }
                self.expression_prec(operand, POSTFIX_PREC);
                self.write(" as ");
                self.type_expr(ty);
                if needs_parens {
                    self.write(")");
                }
            }
            ExpressionKind::Parenthesized(inner) => {
                self.write("(");
                self.expression(inner);
                self.write(")");
            }
        }
    }

    fn argument(&mut self, arg: &Argument<'_>) {
        if let Some(name) = &arg.name {
            let name = self.interner.resolve(name.node);
            self.write(&name);
            self.write(": ");
        }
        self.expression(&arg.value);
    }

    fn literal(&mut self, lit: &Literal) {
        match lit {
            Literal::Int(value) => self.write(&value.to_string()),
            Literal::Float(value) => self.write(&format!("{value:?}")),
            Literal::Str(id) => {
                let text = self.interner.resolve(*id);
                self.write("\"");
                for ch in text.chars() {
                    match ch {
                        '\n' => self.write("\\n"),
                        '\t' => self.write("\\t"),
                        '"' => self.write("\\\""),
                        '\\' => self.write("\\\\"),
                        other => self.output.push(other),
                    }
                }
                self.write("\"");
            }
            Literal::Bool(true) => self.write("true"),
            Literal::Bool(false) => self.write("false"),
            Literal::Nil => self.write("nil"),
        }
    }

    // Statements

    /// Render one statement. The cursor is assumed to sit at an indented
    /// line start; no trailing newline is written.
    pub fn statement(&mut self, statement: &Statement<'_>) {
        match statement {
            Statement::Let(stmt) => {
                self.write("let ");
                self.pattern(&stmt.pattern);
                if let Some(ty) = &stmt.ty {
                    self.write(": ");
                    self.type_expr(ty);
                }
                self.write(" = ");
                self.expression(&stmt.value);
            }
            Statement::Assign(stmt) => {
                self.expression(&stmt.target);
                self.write(" = ");
                self.expression(&stmt.value);
            }
            Statement::Expression(expr) => self.expression(expr),
            Statement::If(stmt) => {
                self.write("if ");
                self.expression(&stmt.condition);
                self.write(" ");
                self.block_body(stmt.then_block.statements);
                let mut else_branch = &stmt.else_branch;
                while let Some(branch) = else_branch {
                    match branch {
                        ElseBranch::If(elif) => {
                            self.write(" else if ");
                            self.expression(&elif.condition);
                            self.write(" ");
                            self.block_body(elif.then_block.statements);
                            else_branch = &elif.else_branch;
                        }
                        ElseBranch::Block(block) => {
                            self.write(" else ");
                            self.block_body(block.statements);
                            break;
                        }
                    }
                }
            }
            Statement::While(stmt) => {
                self.write("while ");
                self.expression(&stmt.condition);
                self.write(" ");
                self.block_body(stmt.body.statements);
            }
            Statement::For(stmt) => {
                self.write("for ");
                let name = self.interner.resolve(stmt.variable.node);
                self.write(&name);
                self.write(" in ");
                self.expression(&stmt.iterable);
                self.write(" ");
                self.block_body(stmt.body.statements);
            }
            Statement::Return(stmt) => {
                self.write("return");
                if let Some(value) = &stmt.value {
                    self.write(" ");
                    self.expression(value);
                }
            }
            Statement::Block(block) => self.block_body(block.statements),
        }
    }

    fn block_body(&mut self, statements: &[Statement<'_>]) {
        self.write("{\n");
        self.indent_level += 1;
        for statement in statements {
            self.write_indent();
            self.statement(statement);
            self.write("\n");
        }
        self.indent_level -= 1;
        self.write_indent();
        self.write("}");
    }

    fn pattern(&mut self, pattern: &Pattern<'_>) {
        match pattern {
            Pattern::Identifier(name) => {
                let name = self.interner.resolve(name.node);
                self.write(&name);
            }
            Pattern::Tuple(names, _) => {
                self.write("(");
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    let name = self.interner.resolve(name.node);
                    self.write(&name);
                }
                self.write(")");
            }
        }
    }

    // Types

    pub fn type_expr(&mut self, ty: &TypeExpr<'_>) {
        match &ty.kind {
            TypeKind::Named(id, args) => {
                let name = self.interner.resolve(*id);
                self.write(&name);
                if !args.is_empty() {
                    self.write("<");
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            self.write(", ");
                        }
                        self.type_expr(arg);
                    }
                    self.write(">");
                }
            }
            TypeKind::Function(params, ret) => {
                self.write("(");
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.type_expr(param);
                }
                self.write(") -> ");
                self.type_expr(ret);
            }
            TypeKind::Tuple(elements) => {
                self.write("(");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.type_expr(element);
                }
                self.write(")");
            }
        }
    }
}

/// Render a single expression to a string.
pub fn print_expression(interner: &StringInterner, expr: &Expression<'_>) -> String {
    let mut printer = Printer::new(interner);
    printer.expression(expr);
    printer.take_output()
}

/// Render a statement list for splicing at a call site.
///
/// Every statement after the first is prefixed with `base_indent` so the
/// spliced lines align with the statement they replace; the first statement
/// starts at the splice column, which already carries that indentation.
pub fn print_statements_indented(
    interner: &StringInterner,
    statements: &[Statement<'_>],
    base_indent: &str,
) -> String {
    let mut rendered = Vec::with_capacity(statements.len());
    for statement in statements {
        let mut printer = Printer::new(interner);
        printer.statement(statement);
        let text = printer.take_output();
        // Re-indent continuation lines of multi-line statements.
        let mut lines = text.lines();
        let mut out = String::new();
        if let Some(first) = lines.next() {
            out.push_str(first);
        }
        for line in lines {
            out.push('\n');
            out.push_str(base_indent);
            out.push_str(line);
        }
        rendered.push(out);
    }
    rendered.join(&format!("\n{base_indent}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::ast::{FunctionBody, Item, Module};
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use std::sync::Arc;

    fn parse<'a>(
        source: &str,
        arena: &'a Arena,
        interner: &Arc<StringInterner>,
    ) -> &'a Module<'a> {
        let tokens = Lexer::new(source, interner).tokenize().unwrap();
        Parser::new(tokens, arena, interner).parse().unwrap()
    }

    fn roundtrip_expr(source: &str) -> String {
        let arena = Arena::new();
        let interner = Arc::new(StringInterner::new());
        let module = parse(&format!("fn probe() -> Int = {source}"), &arena, &interner);
        let Item::Function(decl) = &module.items[0] else {
            panic!("expected function");
        };
        let FunctionBody::Expression(expr) = &decl.body else {
            panic!("expected expression body");
        };
        print_expression(&interner, expr)
    }

    #[test]
    fn prints_binary_with_minimal_parens() {
        assert_eq!(roundtrip_expr("a + b * c"), "a + b * c");
        assert_eq!(roundtrip_expr("(a + b) * c"), "(a + b) * c");
    }

    #[test]
    fn prints_calls_and_members() {
        assert_eq!(roundtrip_expr("list.take(n).sum()"), "list.take(n).sum()");
        assert_eq!(roundtrip_expr("first<Int>(xs)"), "first<Int>(xs)");
        assert_eq!(roundtrip_expr("pad(s, n: 2)"), "pad(s, n: 2)");
    }

    #[test]
    fn prints_string_escapes() {
        assert_eq!(roundtrip_expr(r#""a\nb""#), r#""a\nb""#);
    }

    #[test]
    fn prints_statements_with_indentation() {
        let arena = Arena::new();
        let interner = Arc::new(StringInterner::new());
        let module = parse(
            "fn probe() { if ok { use(1) } }",
            &arena,
            &interner,
        );
        let Item::Function(decl) = &module.items[0] else {
            panic!("expected function");
        };
        let FunctionBody::Block(block) = &decl.body else {
            panic!("expected block");
        };
        let text = print_statements_indented(&interner, block.statements, "    ");
        assert_eq!(text, "if ok {\n        use(1)\n    }");
    }
}
