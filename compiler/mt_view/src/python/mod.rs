//! Python viewer.
//!
//! Python has no braces and no declarations, so statements are rendered
//! here rather than through the C-family layer. Where a construct has no
//! direct Python form it is lowered:
//! - `++`/`--` become `x += 1`, or `(x := x + 1)` inside an expression
//! - C-style `for` becomes `for .. in range(..)` or a `while` loop
//! - `do`/`while` becomes `while True:` with a conditional `break`
//! - `switch` becomes `match`
//!
//! In translation unit mode, loose statements move into `def main():`,
//! called from an `if __name__ == "__main__":` guard.

use mt_ir::{
    AssignOp, Ast, BinaryOp, Branch, Case, CaseKind, CollectionKind, Decl, DeclId, Def, DefId,
    Expr, ExprId, Handle, ImportItems, MeaningTree, Modifiers, Name, Node, NodeId, Range, Stmt,
    StmtId, StringKind, Type, TypeId, UnaryOp,
};
use mt_tokens::lang::quote_string;
use mt_tokens::{Language, OperandPosition, OperatorToken, Python};
use mt_types::TypeScope;

use crate::config::INDENT_WIDTH;
use crate::expr::{join_path, ExprSyntax};
use crate::layout::{self, is_definition, Sections};
use crate::{Config, ConfigKind, ConfigParameter, ViewContext, ViewError};

/// Renders a meaning tree as Python source.
#[derive(Debug)]
pub struct PythonViewer<'a> {
    tree: &'a MeaningTree,
    ctx: ViewContext,
    scope: TypeScope,
    /// Enclosing loops, innermost last.
    loops: Vec<Loop>,
}

/// A loop being rendered and what a `continue` inside it must run first.
#[derive(Debug, Clone, Copy)]
struct Loop {
    id: StmtId,
    tail: Option<LoopTail>,
}

/// Work a lowered loop does after its body, repeated before `continue`.
#[derive(Debug, Clone, Copy)]
enum LoopTail {
    /// The update of a `for` lowered to `while`.
    Update(ExprId),
    /// The condition of a `do`/`while`, checked before the next pass.
    Check(ExprId),
}

/// A C-style loop that counts through a range.
struct Counter {
    var: Name,
    start: ExprId,
    stop: ExprId,
    cmp: BinaryOp,
    /// Explicit step and whether it is subtracted.
    step: Option<(ExprId, bool)>,
}

impl<'a> PythonViewer<'a> {
    /// A fresh viewer; `config` overrides the Python defaults.
    pub fn new(tree: &'a MeaningTree, config: &Config) -> Self {
        Self {
            tree,
            ctx: ViewContext::new(Self::defaults().merge(config)),
            scope: TypeScope::new(),
            loops: Vec::new(),
        }
    }

    pub fn defaults() -> Config {
        Config::new([
            ConfigParameter::TranslationUnitMode(true),
            ConfigParameter::IndentWidth(INDENT_WIDTH),
        ])
    }

    #[tracing::instrument(level = "trace", skip_all, fields(language = "python"))]
    pub fn emit(mut self) -> Result<String, ViewError> {
        let ast = self.tree.ast();
        let root = self.tree.root();
        if self.ctx.flag(ConfigKind::ExpressionMode) {
            if let Some(expr) = layout::lone_expression(ast, root) {
                return self.expr(expr);
            }
        }
        layout::declare_functions(ast, root, &mut self.scope);
        self.node(root)?;
        Ok(self.ctx.take_output())
    }

    /// Render one expression of the tree.
    pub fn expression(&mut self, id: ExprId) -> Result<String, ViewError> {
        self.expr(id)
    }

    fn line(&mut self, text: &str) {
        self.ctx.writeln(text);
    }

    fn node(&mut self, id: NodeId) -> Result<(), ViewError> {
        let ast = self.tree.ast();
        match ast.handle(id) {
            Handle::Expr(expr) => {
                let text = self.expr(expr)?;
                self.line(&text);
                Ok(())
            }
            Handle::Stmt(stmt) => self.stmt(stmt),
            Handle::Decl(decl) => self.decl(decl),
            Handle::Def(def) => self.def(def),
            Handle::Type(ty) => {
                let text = self.type_name(ast.ty(ty))?;
                self.line(&text);
                Ok(())
            }
        }
    }

    /// Top-level items, separated by a blank line around definitions.
    fn items(&mut self, items: &[NodeId]) -> Result<(), ViewError> {
        let ast = self.tree.ast();
        for (i, &item) in items.iter().enumerate() {
            if i > 0 && (is_definition(ast, item) || is_definition(ast, items[i - 1])) {
                self.ctx.newline();
            }
            self.node(item)?;
        }
        Ok(())
    }

    /// `header:` followed by `body` one level deeper in its own scope frame.
    fn suite(&mut self, header: &str, body: StmtId) -> Result<(), ViewError> {
        self.line(&format!("{header}:"));
        self.ctx.indent();
        self.scope.enter();
        self.statements(body, false)?;
        self.scope.leave(true)?;
        self.ctx.dedent()
    }

    /// The statements of `body` at the current level, `pass` if there are
    /// none. With `in_case`, a trailing `break` leaving the `switch` is
    /// dropped.
    fn statements(&mut self, body: StmtId, in_case: bool) -> Result<(), ViewError> {
        let ast = self.tree.ast();
        let Stmt::Block(items) = ast.stmt(body) else {
            if in_case && matches!(ast.stmt(body), Stmt::Break { target: None }) {
                self.line("pass");
                return Ok(());
            }
            return self.stmt(body);
        };
        let items = match items.split_last() {
            Some((&last, rest))
                if in_case
                    && matches!(ast.node(last), Node::Stmt(Stmt::Break { target: None })) =>
            {
                rest
            }
            _ => items,
        };
        if items.is_empty() {
            self.line("pass");
        }
        for &item in items {
            self.node(item)?;
        }
        Ok(())
    }

    fn stmt(&mut self, id: StmtId) -> Result<(), ViewError> {
        let ast = self.tree.ast();
        match ast.stmt(id) {
            Stmt::Block(items) => {
                self.scope.enter();
                for &item in items {
                    self.node(item)?;
                }
                self.scope.leave(true)?;
            }
            Stmt::Expr(expr) => {
                let text = self.expr(*expr)?;
                self.line(&text);
            }
            Stmt::Assign { op, target, value } => {
                let text = self.assignment(*op, *target, *value)?;
                self.line(&text);
            }
            Stmt::MultiAssign(items) => {
                for &item in items {
                    self.stmt(item)?;
                }
            }
            Stmt::If {
                branches,
                otherwise,
            } => self.if_chain(branches, *otherwise)?,
            Stmt::Switch { subject, cases } => self.match_statement(*subject, cases)?,
            Stmt::While { cond, body } => {
                let cond = self.expr(*cond)?;
                self.looping(id, None, |this| this.suite(&format!("while {cond}"), *body))?;
            }
            Stmt::DoWhile { body, cond } => {
                self.looping(id, Some(LoopTail::Check(*cond)), |this| {
                    this.do_while(*body, *cond)
                })?;
            }
            Stmt::For {
                init,
                cond,
                update,
                body,
            } => self.c_for(id, *init, *cond, *update, *body)?,
            Stmt::RangeFor { var, range, body } => {
                self.looping(id, None, |this| this.range_for(var, range, *body))?;
            }
            Stmt::ForEach {
                var,
                ty,
                iterable,
                body,
            } => {
                self.looping(id, None, |this| this.for_each(var, *ty, *iterable, *body))?;
            }
            Stmt::Infinite { body } => {
                self.looping(id, None, |this| this.suite("while True", *body))?;
            }
            Stmt::Break { .. } => self.line("break"),
            Stmt::Continue { target } => self.continue_stmt(*target)?,
            Stmt::Return(None) => self.line("return"),
            Stmt::Return(Some(value)) => {
                let value = self.expr(*value)?;
                self.line(&format!("return {value}"));
            }
            Stmt::Delete { target, .. } => {
                let target = self.expr(*target)?;
                self.line(&format!("del {target}"));
            }
            Stmt::Comment { text, .. } => {
                for line in text.lines() {
                    self.line(format!("# {line}").trim_end());
                }
            }
        }
        Ok(())
    }

    /// An assignment statement. With automatic declaration enabled, the
    /// first assignment to an undeclared name carries a type annotation.
    fn assignment(
        &mut self,
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    ) -> Result<String, ViewError> {
        let ast = self.tree.ast();
        let value_text = match ast.expr(value) {
            // A walrus directly on the right of `=` must be grouped.
            Expr::Assign { .. } => format!("({})", self.expr(value)?),
            _ => self.expr(value)?,
        };
        if let (AssignOp::Assign, Expr::Ident(name)) = (op, ast.expr(target)) {
            if self.ctx.flag(ConfigKind::AutoVariableDeclaration)
                && !self.scope.has_variable(name.as_str())
            {
                let ty = self.inferred(value);
                tracing::trace!(%name, %ty, "declare on first assignment");
                let text = if ty.is_known() {
                    format!("{name}: {} = {value_text}", self.type_name(&ty)?)
                } else {
                    format!("{name} = {value_text}")
                };
                self.scope.add_variable(name.clone(), ty);
                return Ok(text);
            }
        }
        let target_text = self.expr(target)?;
        let symbol = match Python.assign_statement(op) {
            Some(token) => token.value,
            None => op.as_symbol(),
        };
        mt_types::infer_assignment(ast, op, target, value, &mut self.scope);
        Ok(format!("{target_text} {symbol} {value_text}"))
    }

    fn if_chain(&mut self, branches: &[Branch], otherwise: Option<StmtId>) -> Result<(), ViewError> {
        for (i, branch) in branches.iter().enumerate() {
            let cond = self.expr(branch.cond)?;
            let keyword = if i == 0 { "if" } else { "elif" };
            self.suite(&format!("{keyword} {cond}"), branch.body)?;
        }
        if let Some(otherwise) = otherwise {
            self.suite("else", otherwise)?;
        }
        Ok(())
    }

    /// `match` over the switch subject. Empty fall-through cases join the
    /// pattern of the case they fall into.
    fn match_statement(&mut self, subject: ExprId, cases: &[Case]) -> Result<(), ViewError> {
        let ast = self.tree.ast();
        let subject = self.expr(subject)?;
        self.line(&format!("match {subject}:"));
        self.ctx.indent();
        let mut patterns: Vec<String> = Vec::new();
        for case in cases {
            let pattern = match case.kind {
                CaseKind::Match(value) | CaseKind::Fallthrough(value) => self.expr(value)?,
                CaseKind::Default => "_".to_owned(),
            };
            if let CaseKind::Fallthrough(_) = case.kind {
                if !is_empty(ast, case.body) {
                    return Err(self.unsupported("fall-through case with a body"));
                }
                patterns.push(pattern);
                continue;
            }
            patterns.push(pattern);
            let label = if patterns.iter().any(|p| p == "_") {
                "_".to_owned()
            } else {
                patterns.join(" | ")
            };
            patterns.clear();
            self.line(&format!("case {label}:"));
            self.ctx.indent();
            self.scope.enter();
            self.statements(case.body, true)?;
            self.scope.leave(true)?;
            self.ctx.dedent()?;
        }
        if !patterns.is_empty() {
            self.line(&format!("case {}:", patterns.join(" | ")));
            self.ctx.indent();
            self.line("pass");
            self.ctx.dedent()?;
        }
        self.ctx.dedent()
    }

    /// Render `f` as the body of loop `id`.
    fn looping(
        &mut self,
        id: StmtId,
        tail: Option<LoopTail>,
        f: impl FnOnce(&mut Self) -> Result<(), ViewError>,
    ) -> Result<(), ViewError> {
        self.loops.push(Loop { id, tail });
        let result = f(self);
        self.loops.pop();
        result
    }

    /// `continue`, preceded by the tail of a lowered loop so the update or
    /// exit check still runs.
    fn continue_stmt(&mut self, target: Option<StmtId>) -> Result<(), ViewError> {
        if let Some(innermost) = self.loops.last().copied() {
            if target.is_some_and(|target| target != innermost.id) {
                return Err(self.unsupported("continue of an outer loop"));
            }
            match innermost.tail {
                Some(LoopTail::Update(update)) => {
                    let text = self.expr(update)?;
                    self.line(&text);
                }
                Some(LoopTail::Check(cond)) => self.exit_check(cond)?,
                None => {}
            }
        }
        self.line("continue");
        Ok(())
    }

    /// `while True:` with the condition checked at the end of each pass.
    fn do_while(&mut self, body: StmtId, cond: ExprId) -> Result<(), ViewError> {
        self.line("while True:");
        self.ctx.indent();
        self.scope.enter();
        if !is_empty(self.tree.ast(), body) {
            self.statements(body, false)?;
        }
        self.exit_check(cond)?;
        self.scope.leave(true)?;
        self.ctx.dedent()
    }

    /// `if not cond: break`.
    fn exit_check(&mut self, cond: ExprId) -> Result<(), ViewError> {
        let negated = match Python.unary(UnaryOp::Not) {
            Some(not) => self.apply_unary(&not, UnaryOp::Not, cond)?,
            None => return Err(self.unsupported("operator `!`")),
        };
        self.line(&format!("if {negated}:"));
        self.ctx.indent();
        self.line("break");
        self.ctx.dedent()
    }

    /// A C-style `for`, as a `range` loop when it counts one variable
    /// through an interval and as a `while` loop otherwise.
    fn c_for(
        &mut self,
        id: StmtId,
        init: Option<NodeId>,
        cond: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
    ) -> Result<(), ViewError> {
        if let Some(counter) = counter(self.tree.ast(), init, cond, update, body) {
            return self.looping(id, None, |this| this.counting_loop(&counter, body));
        }
        tracing::trace!("for loop lowered to while");
        self.scope.enter();
        if let Some(init) = init {
            self.node(init)?;
        }
        let cond = match cond {
            Some(cond) => self.expr(cond)?,
            None => "True".to_owned(),
        };
        self.line(&format!("while {cond}:"));
        self.ctx.indent();
        self.scope.enter();
        self.looping(id, update.map(LoopTail::Update), |this| {
            if !(update.is_some() && is_empty(this.tree.ast(), body)) {
                this.statements(body, false)?;
            }
            if let Some(update) = update {
                let text = this.expr(update)?;
                this.line(&text);
            }
            Ok(())
        })?;
        self.scope.leave(true)?;
        self.ctx.dedent()?;
        self.scope.leave(true)?;
        Ok(())
    }

    fn counting_loop(&mut self, counter: &Counter, body: StmtId) -> Result<(), ViewError> {
        let descending = matches!(counter.cmp, BinaryOp::Gt | BinaryOp::GtEq);
        let inclusive = matches!(counter.cmp, BinaryOp::LtEq | BinaryOp::GtEq);
        self.scope.enter();
        let range = self.range_call(
            counter.start,
            counter.stop,
            counter.step,
            inclusive,
            descending,
        )?;
        self.scope.add_variable(counter.var.clone(), Type::Int);
        self.suite(&format!("for {} in {range}", counter.var), body)?;
        self.scope.leave(true)?;
        Ok(())
    }

    fn range_for(&mut self, var: &Name, range: &Range, body: StmtId) -> Result<(), ViewError> {
        self.scope.enter();
        let step = range.step.map(|step| (step, range.descending));
        let call = self.range_call(
            range.start,
            range.stop,
            step,
            range.inclusive,
            range.descending,
        )?;
        self.scope.add_variable(var.clone(), Type::Int);
        self.suite(&format!("for {var} in {call}"), body)?;
        self.scope.leave(true)?;
        Ok(())
    }

    /// `range(start, stop[, step])`, shortened to `range(stop)` when
    /// counting up by one from zero.
    fn range_call(
        &mut self,
        start: ExprId,
        stop: ExprId,
        step: Option<(ExprId, bool)>,
        inclusive: bool,
        descending: bool,
    ) -> Result<String, ViewError> {
        let ast = self.tree.ast();
        let stop_text = match (inclusive, descending) {
            (false, _) => self.expr(stop)?,
            (true, false) => self.offset(stop, 1)?,
            (true, true) => self.offset(stop, -1)?,
        };
        let step_text = match step {
            Some((step, true)) => Some(self.negated(step)?),
            Some((step, false)) => Some(self.expr(step)?),
            None if descending => Some("-1".to_owned()),
            None => None,
        };
        if step_text.is_none() && matches!(ast.expr(start), Expr::Int(0)) {
            return Ok(format!("range({stop_text})"));
        }
        let start_text = self.expr(start)?;
        Ok(match step_text {
            Some(step) => format!("range({start_text}, {stop_text}, {step})"),
            None => format!("range({start_text}, {stop_text})"),
        })
    }

    /// `value + delta`, folded when `value` is an integer literal.
    fn offset(&mut self, value: ExprId, delta: i64) -> Result<String, ViewError> {
        if let Expr::Int(n) = self.tree.ast().expr(value) {
            return Ok((n + delta).to_string());
        }
        let (op, amount) = if delta < 0 {
            (BinaryOp::Sub, -delta)
        } else {
            (BinaryOp::Add, delta)
        };
        match Python.binary(op) {
            Some(token) => {
                let text = self.operand(&token, value, OperandPosition::Left)?;
                Ok(format!("{text} {} {amount}", token.value))
            }
            None => Err(self.unsupported(format!("operator `{}`", op.as_symbol()))),
        }
    }

    fn negated(&mut self, value: ExprId) -> Result<String, ViewError> {
        if let Expr::Int(n) = self.tree.ast().expr(value) {
            return Ok((-n).to_string());
        }
        match Python.unary(UnaryOp::Neg) {
            Some(neg) => self.apply_unary(&neg, UnaryOp::Neg, value),
            None => Err(self.unsupported("operator `-`")),
        }
    }

    fn for_each(
        &mut self,
        var: &Name,
        ty: TypeId,
        iterable: ExprId,
        body: StmtId,
    ) -> Result<(), ViewError> {
        self.scope.enter();
        let iterable_text = self.expr(iterable)?;
        let declared = self.tree.ast().ty(ty);
        let item = if declared.is_known() {
            declared.clone()
        } else {
            self.inferred(iterable)
                .element()
                .cloned()
                .unwrap_or(Type::Unknown)
        };
        self.scope.add_variable(var.clone(), item);
        self.suite(&format!("for {var} in {iterable_text}"), body)?;
        self.scope.leave(true)?;
        Ok(())
    }

    fn decl(&mut self, id: DeclId) -> Result<(), ViewError> {
        let ast = self.tree.ast();
        match ast.decl(id) {
            Decl::Variable {
                ty, declarators, ..
            } => {
                let declared = ast.ty(*ty);
                let annotation = if declared.is_known() {
                    Some(self.type_name(declared)?)
                } else {
                    None
                };
                for declarator in declarators {
                    let text = match (&annotation, declarator.init) {
                        (Some(ty), Some(init)) => {
                            format!("{}: {ty} = {}", declarator.name, self.expr(init)?)
                        }
                        (None, Some(init)) => format!("{} = {}", declarator.name, self.expr(init)?),
                        (Some(ty), None) => format!("{}: {ty}", declarator.name),
                        (None, None) => format!("{} = None", declarator.name),
                    };
                    self.line(&text);
                }
                mt_types::declare(ast, id, &mut self.scope);
            }
            Decl::Function { name, .. } | Decl::Class { name, .. } => {
                tracing::trace!(%name, "forward declaration dropped");
                mt_types::declare(ast, id, &mut self.scope);
            }
            Decl::Import { path, items, .. } => {
                let path = join_path(path, ".");
                match items {
                    ImportItems::Module => self.line(&format!("import {path}")),
                    ImportItems::All => self.line(&format!("from {path} import *")),
                    ImportItems::Members(members) => {
                        let members = join_path(members, ", ");
                        self.line(&format!("from {path} import {members}"));
                    }
                }
            }
            Decl::Package(path) => {
                tracing::trace!(package = %join_path(path, "."), "package declaration dropped");
            }
            Decl::Include { .. } => return Err(self.unsupported("include")),
        }
        Ok(())
    }

    fn def(&mut self, id: DefId) -> Result<(), ViewError> {
        match self.tree.ast().def(id) {
            Def::Program {
                body, entry_point, ..
            } => self.program(body, *entry_point),
            Def::Function { decl, body } => self.function(*decl, *body),
            Def::Class { decl, members } => self.class(*decl, members),
        }
    }

    fn program(&mut self, body: &[NodeId], entry_point: Option<DefId>) -> Result<(), ViewError> {
        if !self.ctx.flag(ConfigKind::TranslationUnitMode) {
            return self.items(body);
        }
        let ast = self.tree.ast();
        if let Some(entry) = entry_point {
            self.items(body)?;
            let Def::Function { decl, .. } = ast.def(entry) else {
                return Err(self.unsupported(format!("{} as entry point", ast.def(entry).kind_name())));
            };
            let Decl::Function { name, .. } = ast.decl(*decl) else {
                return Err(self.unsupported(format!("{} as entry point", ast.decl(*decl).kind_name())));
            };
            let name = name.clone();
            self.main_guard(&name)?;
            return Ok(());
        }
        let sections = Sections::split(ast, body);
        tracing::debug!(
            definitions = sections.definitions.len(),
            statements = sections.statements.len(),
            "wrapping program in main"
        );
        for &item in &sections.preamble {
            self.node(item)?;
        }
        if !sections.preamble.is_empty() {
            self.ctx.newline();
        }
        for &item in &sections.definitions {
            self.node(item)?;
            self.ctx.newline();
        }
        self.line("def main():");
        self.ctx.indent();
        self.scope.enter();
        if sections.statements.is_empty() {
            self.line("pass");
        }
        for &item in &sections.statements {
            self.node(item)?;
        }
        self.scope.leave(true)?;
        self.ctx.dedent()?;
        self.main_guard(&Name::from("main"))
    }

    fn main_guard(&mut self, entry: &Name) -> Result<(), ViewError> {
        self.ctx.newline();
        self.line("if __name__ == \"__main__\":");
        self.ctx.indent();
        self.line(&format!("{entry}()"));
        self.ctx.dedent()
    }

    fn function(&mut self, decl: DeclId, body: StmtId) -> Result<(), ViewError> {
        let ast = self.tree.ast();
        let Decl::Function {
            name,
            params,
            ret,
            modifiers,
            owner,
        } = ast.decl(decl)
        else {
            return Err(self.unsupported(format!("{} as function", ast.decl(decl).kind_name())));
        };
        mt_types::declare(ast, decl, &mut self.scope);
        let mut list = Vec::with_capacity(params.len() + 1);
        if owner.is_some() && !modifiers.contains(Modifiers::STATIC) {
            list.push("self".to_owned());
        }
        for param in params {
            let ty = ast.ty(param.ty);
            list.push(if ty.is_known() {
                format!("{}: {}", param.name, self.type_name(ty)?)
            } else {
                param.name.to_string()
            });
        }
        let ret = ast.ty(*ret);
        let mut header = format!("def {name}({})", list.join(", "));
        if ret.is_known() {
            header.push_str(&format!(" -> {}", self.type_name(ret)?));
        }
        if owner.is_some() && modifiers.contains(Modifiers::STATIC) {
            self.line("@staticmethod");
        }
        self.scope.enter();
        for param in params {
            self.scope
                .add_variable(param.name.clone(), ast.ty(param.ty).clone());
        }
        self.suite(&header, body)?;
        self.scope.leave(true)?;
        Ok(())
    }

    fn class(&mut self, decl: DeclId, members: &[NodeId]) -> Result<(), ViewError> {
        let ast = self.tree.ast();
        let Decl::Class { name, parents, .. } = ast.decl(decl) else {
            return Err(self.unsupported(format!("{} as class", ast.decl(decl).kind_name())));
        };
        let mut header = format!("class {name}");
        if !parents.is_empty() {
            let mut list = Vec::with_capacity(parents.len());
            for &parent in parents {
                list.push(self.type_name(ast.ty(parent))?);
            }
            header.push_str(&format!("({})", list.join(", ")));
        }
        self.line(&format!("{header}:"));
        self.ctx.indent();
        self.scope.enter();
        if members.is_empty() {
            self.line("pass");
        }
        for (i, &member) in members.iter().enumerate() {
            if i > 0 && (is_definition(ast, member) || is_definition(ast, members[i - 1])) {
                self.ctx.newline();
            }
            self.node(member)?;
        }
        self.scope.leave(true)?;
        self.ctx.dedent()
    }

    /// Whether `id` is an expression whose value is discarded, so an
    /// assignment or step in it can be a plain statement.
    fn in_statement_position(&self, id: ExprId) -> bool {
        let ast = self.tree.ast();
        match self.tree.find_parent(id.node()) {
            Some(parent) => match ast.node(parent) {
                Node::Stmt(Stmt::Expr(_)) => true,
                Node::Stmt(Stmt::For { init, update, .. }) => {
                    *update == Some(id) || *init == Some(id.node())
                }
                _ => false,
            },
            None => !self.ctx.flag(ConfigKind::ExpressionMode),
        }
    }

    /// Whether the walrus `id` may go without its own parentheses: as a call
    /// argument or a branch condition, or where its parent already groups it
    /// as an operand.
    fn walrus_is_bare(&self, id: ExprId) -> bool {
        let ast = self.tree.ast();
        let Some(parent) = self.tree.find_parent(id.node()) else {
            return false;
        };
        match ast.node(parent) {
            Node::Expr(
                Expr::Binary { .. }
                | Expr::Unary { .. }
                | Expr::Ternary { .. }
                | Expr::CompoundComparison(_)
                | Expr::Assign { .. }
                | Expr::Call { .. }
                | Expr::MethodCall { .. }
                | Expr::Member { .. }
                | Expr::New { .. },
            ) => true,
            Node::Expr(Expr::Index { target, .. }) => *target == id,
            Node::Stmt(Stmt::If { branches, .. }) => branches.iter().any(|b| b.cond == id),
            Node::Stmt(Stmt::While { cond, .. }) => *cond == id,
            // `assignment` groups an assignment value itself.
            Node::Stmt(Stmt::Assign { value, .. }) => *value == id,
            _ => false,
        }
    }

    /// Conjuncts of `left and right` when every one is a comparison whose
    /// left operand repeats the previous comparison's right operand.
    fn comparison_chain(&self, left: ExprId, right: ExprId) -> Option<Vec<ExprId>> {
        let ast = self.tree.ast();
        let mut conjuncts = Vec::new();
        flatten_and(ast, left, &mut conjuncts);
        flatten_and(ast, right, &mut conjuncts);
        let mut previous: Option<ExprId> = None;
        for &item in &conjuncts {
            let Expr::Binary { op, left, right } = ast.expr(item) else {
                return None;
            };
            if !op.is_comparison() {
                return None;
            }
            if let Some(previous) = previous {
                if !ast.structurally_eq(previous.node(), ast, left.node()) {
                    return None;
                }
            }
            previous = Some(*right);
        }
        Some(conjuncts)
    }
}

impl<'a> ExprSyntax<'a> for PythonViewer<'a> {
    fn lang(&self) -> &'static dyn Language {
        &Python
    }

    fn tree(&self) -> &'a MeaningTree {
        self.tree
    }

    fn ctx(&self) -> &ViewContext {
        &self.ctx
    }

    fn scope(&mut self) -> &mut TypeScope {
        &mut self.scope
    }

    /// Annotation spelling. Callers omit annotations for unknown types.
    fn type_name(&self, ty: &Type) -> Result<String, ViewError> {
        Ok(match ty {
            Type::Int => "int".to_owned(),
            Type::Float => "float".to_owned(),
            Type::Bool => "bool".to_owned(),
            Type::Char | Type::Str => "str".to_owned(),
            Type::Void => "None".to_owned(),
            Type::Unknown => "object".to_owned(),
            Type::Pointer(_) => return Err(self.unsupported("pointer type")),
            Type::Reference(inner) => self.type_name(inner)?,
            Type::Array(item) | Type::List(item) => format!("list[{}]", self.type_name(item)?),
            Type::Set(item) => format!("set[{}]", self.type_name(item)?),
            Type::Dict(key, value) => {
                format!("dict[{}, {}]", self.type_name(key)?, self.type_name(value)?)
            }
            Type::Tuple(items) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    list.push(self.type_name(item)?);
                }
                format!("tuple[{}]", list.join(", "))
            }
            Type::User(name) => name.to_string(),
            Type::Generic { name, args } => {
                let mut list = Vec::with_capacity(args.len());
                for arg in args {
                    list.push(self.type_name(arg)?);
                }
                format!("{name}[{}]", list.join(", "))
            }
        })
    }

    fn char_literal(&self, c: char) -> String {
        quote_string(&c.to_string())
    }

    fn string_literal(&self, value: &str, kind: StringKind) -> String {
        match kind {
            StringKind::Plain => quote_string(value),
            StringKind::Raw => format!("r\"{value}\""),
            StringKind::Multiline => format!("\"\"\"{value}\"\"\""),
        }
    }

    fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> Result<String, ViewError> {
        match op {
            BinaryOp::InstanceOf => {
                return Ok(format!(
                    "isinstance({}, {})",
                    self.expr(left)?,
                    self.expr(right)?
                ));
            }
            BinaryOp::And if !self.ctx.flag(ConfigKind::DisableCompoundComparisonConversion) => {
                if let Some(items) = self.comparison_chain(left, right) {
                    tracing::trace!(len = items.len(), "and of comparisons chained");
                    return self.chain(&items);
                }
            }
            _ => {}
        }
        match self.binary_operator(op, left, right) {
            Some(token) => self.infix(&token, left, right),
            None => Err(self.unsupported(format!("operator `{}`", op.as_symbol()))),
        }
    }

    /// `is`/`is not` against `None`.
    fn binary_operator(&self, op: BinaryOp, left: ExprId, right: ExprId) -> Option<OperatorToken> {
        let ast = self.tree.ast();
        let null = layout::is_null(ast, left) || layout::is_null(ast, right);
        match op {
            BinaryOp::Eq if null => Python.binary(BinaryOp::RefEq),
            BinaryOp::NotEq if null => Python.binary(BinaryOp::RefNotEq),
            _ => Python.binary(op),
        }
    }

    fn unary(&mut self, id: ExprId, op: UnaryOp, operand: ExprId) -> Result<String, ViewError> {
        if !op.is_step() {
            let Some(token) = Python.unary(op) else {
                return Err(self.unsupported(format!("operator `{}`", op.as_symbol())));
            };
            return self.apply_unary(&token, op, operand);
        }
        let assign = if matches!(op, UnaryOp::PreInc | UnaryOp::PostInc) {
            AssignOp::Add
        } else {
            AssignOp::Sub
        };
        let target = self.expr(operand)?;
        if self.in_statement_position(id) {
            return Ok(format!("{target} {} 1", assign.as_symbol()));
        }
        if !matches!(self.tree.ast().expr(operand), Expr::Ident(_)) {
            return Err(self.unsupported(format!("operator `{}` inside an expression", op.as_symbol())));
        }
        let symbol = assign.binary().map_or("+", BinaryOp::as_symbol);
        Ok(format!("({target} := {target} {symbol} 1)"))
    }

    /// `x = v` as a statement, the walrus `x := v` inside an expression.
    fn assign_expr(
        &mut self,
        id: ExprId,
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    ) -> Result<String, ViewError> {
        if self.in_statement_position(id) {
            return self.assignment(op, target, value);
        }
        if !matches!(self.tree.ast().expr(target), Expr::Ident(_)) {
            return Err(self.unsupported("assignment expression to a non-name target"));
        }
        let text = match op.binary() {
            None => match Python.assign(op) {
                Some(walrus) => self.infix(&walrus, target, value)?,
                None => return Err(self.unsupported(format!("operator `{}`", op.as_symbol()))),
            },
            Some(binary) => {
                let target_text = self.expr(target)?;
                let value_text = self.binary(binary, target, value)?;
                format!("{target_text} := {value_text}")
            }
        };
        if self.walrus_is_bare(id) {
            Ok(text)
        } else {
            Ok(format!("({text})"))
        }
    }

    fn cast(&mut self, ty: TypeId, value: ExprId) -> Result<String, ViewError> {
        let convert = match self.tree.ast().ty(ty) {
            Type::Int => "int",
            Type::Float => "float",
            Type::Str | Type::Char => "str",
            Type::Bool => "bool",
            _ => return self.expr(value),
        };
        Ok(format!("{convert}({})", self.expr(value)?))
    }

    fn new_object(&mut self, ty: &Type, args: &[ExprId]) -> Result<String, ViewError> {
        let ty = self.type_name(ty)?;
        Ok(format!("{ty}({})", self.args(args)?))
    }

    fn collection(
        &mut self,
        _id: ExprId,
        kind: CollectionKind,
        items: &[ExprId],
    ) -> Result<String, ViewError> {
        let list = self.args(items)?;
        Ok(match kind {
            CollectionKind::List | CollectionKind::Array => format!("[{list}]"),
            CollectionKind::Set if items.is_empty() => "set()".to_owned(),
            CollectionKind::Set => format!("{{{list}}}"),
            CollectionKind::Tuple if items.len() == 1 => format!("({list},)"),
            CollectionKind::Tuple => format!("({list})"),
        })
    }

    fn dict(&mut self, _id: ExprId, entries: &[(ExprId, ExprId)]) -> Result<String, ViewError> {
        let mut list = Vec::with_capacity(entries.len());
        for &(key, value) in entries {
            list.push(format!("{}: {}", self.expr(key)?, self.expr(value)?));
        }
        Ok(format!("{{{}}}", list.join(", ")))
    }

    fn interpolated(&mut self, parts: &[ExprId]) -> Result<String, ViewError> {
        let ast = self.tree.ast();
        let mut out = String::from("f\"");
        for &part in parts {
            match ast.expr(part) {
                Expr::Str { value, .. } => {
                    let quoted = quote_string(value);
                    let inner = &quoted[1..quoted.len() - 1];
                    out.push_str(&inner.replace('{', "{{").replace('}', "}}"));
                }
                _ => {
                    out.push('{');
                    out.push_str(&self.expr(part)?);
                    out.push('}');
                }
            }
        }
        out.push('"');
        Ok(out)
    }

    /// A list literal for an initialized array, nested `[fill] * n` lists
    /// otherwise.
    fn new_array(
        &mut self,
        ty: &Type,
        dims: &[ExprId],
        init: Option<ExprId>,
    ) -> Result<String, ViewError> {
        let ast = self.tree.ast();
        if let Some(init) = init {
            return match ast.expr(init) {
                Expr::Collection { items, .. } => Ok(format!("[{}]", self.args(items)?)),
                _ => self.expr(init),
            };
        }
        let fill = match ty {
            Type::Int => "0",
            Type::Float => "0.0",
            Type::Bool => "False",
            Type::Str => "\"\"",
            _ => "None",
        };
        let Some((&innermost, outer)) = dims.split_last() else {
            return Ok("[]".to_owned());
        };
        let mut out = format!("[{fill}] * {}", self.expr(innermost)?);
        for &dim in outer.iter().rev() {
            out = format!("[{out} for _ in range({})]", self.expr(dim)?);
        }
        Ok(out)
    }
}

/// Conjuncts of a left-nested `and` chain, in source order.
fn flatten_and(ast: &Ast, id: ExprId, out: &mut Vec<ExprId>) {
    match ast.expr(id) {
        Expr::Binary {
            op: BinaryOp::And,
            left,
            right,
        } => {
            flatten_and(ast, *left, out);
            flatten_and(ast, *right, out);
        }
        _ => out.push(id),
    }
}

fn is_empty(ast: &Ast, body: StmtId) -> bool {
    matches!(ast.stmt(body), Stmt::Block(items) if items.is_empty())
}

/// Recognize `for (i = a; i < b; i++)` and its variants.
///
/// `range` fixes the bound and the step when the loop starts, so the loop
/// only counts if they cannot change and `body` leaves the counter alone.
fn counter(
    ast: &Ast,
    init: Option<NodeId>,
    cond: Option<ExprId>,
    update: Option<ExprId>,
    body: StmtId,
) -> Option<Counter> {
    let (var, start) = match ast.node(init?) {
        Node::Decl(Decl::Variable { declarators, .. }) => match declarators.as_slice() {
            [only] => (only.name.clone(), only.init?),
            _ => return None,
        },
        Node::Stmt(Stmt::Assign {
            op: AssignOp::Assign,
            target,
            value,
        })
        | Node::Expr(Expr::Assign {
            op: AssignOp::Assign,
            target,
            value,
        }) => match ast.expr(*target) {
            Expr::Ident(name) => (name.clone(), *value),
            _ => return None,
        },
        Node::Stmt(Stmt::Expr(expr)) => match ast.expr(*expr) {
            Expr::Assign {
                op: AssignOp::Assign,
                target,
                value,
            } => match ast.expr(*target) {
                Expr::Ident(name) => (name.clone(), *value),
                _ => return None,
            },
            _ => return None,
        },
        _ => return None,
    };
    let is_var = |id: ExprId| matches!(ast.expr(id), Expr::Ident(name) if *name == var);
    let Expr::Binary { op: cmp, left, right: stop } = ast.expr(cond?) else {
        return None;
    };
    if !matches!(cmp, BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq)
        || !is_var(*left)
    {
        return None;
    }
    let descending = matches!(cmp, BinaryOp::Gt | BinaryOp::GtEq);
    let step = match ast.expr(update?) {
        Expr::Unary { op, operand } if is_var(*operand) => match op {
            UnaryOp::PreInc | UnaryOp::PostInc if !descending => None,
            UnaryOp::PreDec | UnaryOp::PostDec if descending => None,
            _ => return None,
        },
        Expr::Assign { op, target, value } if is_var(*target) => match op {
            AssignOp::Add if !descending => Some((*value, false)),
            AssignOp::Sub if descending => Some((*value, true)),
            _ => return None,
        },
        _ => return None,
    };
    let step_value = step.map(|(value, _)| value);
    if !is_stable(ast, *stop) || step_value.is_some_and(|value| !is_stable(ast, value)) {
        return None;
    }
    let mut watched = vec![var.clone()];
    names_in(ast, stop.node(), &mut watched);
    if let Some(value) = step_value {
        names_in(ast, value.node(), &mut watched);
    }
    if writes_any(ast, body.node(), &watched) {
        tracing::trace!(%var, "counter or bound written in loop body");
        return None;
    }
    Some(Counter {
        var,
        start,
        stop: *stop,
        cmp: *cmp,
        step,
    })
}

/// Whether evaluating `id` twice yields the same value when no name in it
/// is reassigned between.
fn is_stable(ast: &Ast, id: ExprId) -> bool {
    match ast.expr(id) {
        Expr::Int(_)
        | Expr::Float(_)
        | Expr::Bool(_)
        | Expr::Char(_)
        | Expr::Str { .. }
        | Expr::Null
        | Expr::Ident(_)
        | Expr::Scoped(_)
        | Expr::SelfRef => true,
        Expr::Binary { left, right, .. } => is_stable(ast, *left) && is_stable(ast, *right),
        Expr::Unary { op, operand } => !op.is_step() && is_stable(ast, *operand),
        Expr::Paren(inner) => is_stable(ast, *inner),
        Expr::Member { target, .. } => is_stable(ast, *target),
        _ => false,
    }
}

/// Identifiers read anywhere under `id`.
fn names_in(ast: &Ast, id: NodeId, out: &mut Vec<Name>) {
    if let Node::Expr(Expr::Ident(name)) = ast.node(id) {
        out.push(name.clone());
    }
    for (child, _) in ast.children(id) {
        names_in(ast, child, out);
    }
}

/// Whether anything under `id` assigns, steps or rebinds one of `names`.
fn writes_any(ast: &Ast, id: NodeId, names: &[Name]) -> bool {
    let named = |expr: ExprId| matches!(ast.expr(expr), Expr::Ident(name) if names.contains(name));
    let writes = match ast.node(id) {
        Node::Expr(Expr::Assign { target, .. }) | Node::Stmt(Stmt::Assign { target, .. }) => {
            named(*target)
        }
        Node::Expr(Expr::Unary { op, operand }) => op.is_step() && named(*operand),
        Node::Decl(Decl::Variable { declarators, .. }) => {
            declarators.iter().any(|d| names.contains(&d.name))
        }
        Node::Stmt(Stmt::RangeFor { var, .. } | Stmt::ForEach { var, .. }) => names.contains(var),
        _ => false,
    };
    writes
        || ast
            .children(id)
            .into_iter()
            .any(|(child, _)| writes_any(ast, child, names))
}

#[cfg(test)]
mod tests;
