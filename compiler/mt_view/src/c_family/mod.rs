//! Statement rendering for brace-delimited targets (Java and C++).
//!
//! [`CFamily`] renders every statement kind the two targets share: blocks,
//! conditionals, loops, `switch`, assignments with automatic declaration
//! and variable declarations. Declarations and definitions that differ
//! between the targets stay with each viewer.

use mt_ir::{
    AssignOp, Branch, Case, CaseKind, Decl, DeclId, DefId, Expr, ExprId, Handle, Modifiers, Name,
    NodeId, Range, Stmt, StmtId, Type,
};
use mt_tokens::OperandPosition;

use crate::expr::ExprSyntax;
use crate::layout::{declares_variables, is_definition, terminates};
use crate::{ConfigKind, ViewContext, ViewError};

pub(crate) trait CFamily<'a>: ExprSyntax<'a> {
    fn ctx_mut(&mut self) -> &mut ViewContext;

    /// Spelling of a variable's type. `inferable` is set when the compiler
    /// can deduce an unknown type from a lone initializer.
    fn variable_type(&self, ty: &Type, inferable: bool) -> Result<String, ViewError>;

    /// Declaration modifiers, each followed by a space.
    fn modifiers(&self, modifiers: Modifiers) -> String;

    fn decl(&mut self, id: DeclId) -> Result<(), ViewError>;

    fn def(&mut self, id: DefId) -> Result<(), ViewError>;

    fn delete(&mut self, target: ExprId, array: bool) -> Result<(), ViewError>;

    fn node(&mut self, id: NodeId) -> Result<(), ViewError> {
        let ast = self.ast();
        match ast.handle(id) {
            Handle::Expr(expr) => {
                let text = self.expr(expr)?;
                self.line(&format!("{text};"));
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
        let ast = self.ast();
        for (i, &item) in items.iter().enumerate() {
            if i > 0 && (is_definition(ast, item) || is_definition(ast, items[i - 1])) {
                self.ctx_mut().newline();
            }
            self.node(item)?;
        }
        Ok(())
    }

    fn line(&mut self, text: &str) {
        self.ctx_mut().writeln(text);
    }

    /// `header {`, or the brace on its own line.
    fn open(&mut self, header: &str) {
        if self.ctx().flag(ConfigKind::BracesOnSameLine) {
            self.line(&format!("{header} {{"));
        } else {
            self.line(header);
            self.line("{");
        }
    }

    /// Close the current block and open the next arm of the same statement.
    fn reopen(&mut self, header: &str) {
        if self.ctx().flag(ConfigKind::BracesOnSameLine) {
            self.line(&format!("}} {header} {{"));
        } else {
            self.line("}");
            self.line(header);
            self.line("{");
        }
    }

    /// Statements of `body` one level deeper, inside their own scope frame,
    /// followed by `tail` when given.
    fn body(&mut self, body: StmtId, tail: Option<&str>) -> Result<(), ViewError> {
        let ast = self.ast();
        self.ctx_mut().indent();
        self.scope().enter();
        match ast.stmt(body) {
            Stmt::Block(items) => {
                for &item in items {
                    self.node(item)?;
                }
            }
            _ => self.stmt(body)?,
        }
        if let Some(tail) = tail {
            self.line(tail);
        }
        self.scope().leave(true)?;
        self.ctx_mut().dedent()
    }

    fn stmt(&mut self, id: StmtId) -> Result<(), ViewError> {
        let ast = self.ast();
        match ast.stmt(id) {
            Stmt::Block(_) => {
                self.line("{");
                self.body(id, None)?;
                self.line("}");
            }
            Stmt::Expr(expr) => {
                let text = self.expr(*expr)?;
                self.line(&format!("{text};"));
            }
            Stmt::Assign { op, target, value } => {
                let text = self.assignment(*op, *target, *value)?;
                self.line(&format!("{text};"));
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
            Stmt::Switch { subject, cases } => self.switch(*subject, cases)?,
            Stmt::While { cond, body } => {
                let cond = self.expr(*cond)?;
                self.open(&format!("while ({cond})"));
                self.body(*body, None)?;
                self.line("}");
            }
            Stmt::DoWhile { body, cond } => {
                self.open("do");
                self.body(*body, None)?;
                let cond = self.expr(*cond)?;
                self.line(&format!("}} while ({cond});"));
            }
            Stmt::For {
                init,
                cond,
                update,
                body,
            } => {
                self.scope().enter();
                let init = match init {
                    Some(init) => self.inline(*init)?,
                    None => String::new(),
                };
                let cond = match cond {
                    Some(cond) => format!(" {}", self.expr(*cond)?),
                    None => String::new(),
                };
                let update = match update {
                    Some(update) => format!(" {}", self.expr(*update)?),
                    None => String::new(),
                };
                self.open(&format!("for ({init};{cond};{update})"));
                self.body(*body, None)?;
                self.line("}");
                self.scope().leave(true)?;
            }
            Stmt::RangeFor { var, range, body } => self.range_for(var, range, *body)?,
            Stmt::ForEach {
                var,
                ty,
                iterable,
                body,
            } => {
                self.scope().enter();
                let iterable_text = self.expr(*iterable)?;
                let declared = ast.ty(*ty);
                let item = if declared.is_known() {
                    declared.clone()
                } else {
                    self.inferred(*iterable)
                        .element()
                        .cloned()
                        .unwrap_or(Type::Unknown)
                };
                let ty_text = self.variable_type(&item, true)?;
                self.scope().add_variable(var.clone(), item);
                self.open(&format!("for ({ty_text} {var} : {iterable_text})"));
                self.body(*body, None)?;
                self.line("}");
                self.scope().leave(true)?;
            }
            Stmt::Infinite { body } => {
                self.open("while (true)");
                self.body(*body, None)?;
                self.line("}");
            }
            Stmt::Break { .. } => self.line("break;"),
            Stmt::Continue { .. } => self.line("continue;"),
            Stmt::Return(None) => self.line("return;"),
            Stmt::Return(Some(value)) => {
                let value = self.expr(*value)?;
                self.line(&format!("return {value};"));
            }
            Stmt::Delete { target, array } => self.delete(*target, *array)?,
            Stmt::Comment { text, multiline } => self.comment(text, *multiline),
        }
        Ok(())
    }

    /// An assignment statement without its terminator.
    ///
    /// With automatic declaration enabled, the first assignment to an
    /// undeclared name becomes its declaration.
    fn assignment(
        &mut self,
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    ) -> Result<String, ViewError> {
        let ast = self.ast();
        if let (AssignOp::Assign, Expr::Ident(name)) = (op, ast.expr(target)) {
            if self.ctx().flag(ConfigKind::AutoVariableDeclaration)
                && !self.scope().has_variable(name.as_str())
            {
                let value_text = self.expr(value)?;
                let ty = self.inferred(value);
                let ty_text = self.variable_type(&ty, true)?;
                tracing::trace!(%name, %ty, "declare on first assignment");
                self.scope().add_variable(name.clone(), ty);
                return Ok(format!("{ty_text} {name} = {value_text}"));
            }
        }
        let text = match self.lang().assign_statement(op) {
            Some(token) => self.infix(&token, target, value)?,
            None => {
                let plain = self.lang().assign_statement(AssignOp::Assign);
                self.expanded_assignment(plain, op, target, value)?
            }
        };
        mt_types::infer_assignment(ast, op, target, value, self.scope());
        Ok(text)
    }

    /// A variable declaration without its terminator. Registers the
    /// declared names in the current frame.
    fn variable_declaration(&mut self, id: DeclId) -> Result<String, ViewError> {
        let ast = self.ast();
        let Decl::Variable {
            ty,
            declarators,
            modifiers,
        } = ast.decl(id)
        else {
            return Err(self.unsupported(format!("{} as a statement", ast.decl(id).kind_name())));
        };
        let declared = ast.ty(*ty);
        let ty_text = if declared.is_known() {
            self.type_name(declared)?
        } else {
            let lone = matches!(declarators.as_slice(), [only] if only.init.is_some());
            self.variable_type(declared, lone)?
        };
        let mut parts = Vec::with_capacity(declarators.len());
        for declarator in declarators {
            parts.push(match declarator.init {
                Some(init) => format!("{} = {}", declarator.name, self.expr(init)?),
                None => declarator.name.to_string(),
            });
        }
        mt_types::declare(ast, id, self.scope());
        Ok(format!(
            "{}{ty_text} {}",
            self.modifiers(*modifiers),
            parts.join(", ")
        ))
    }

    /// The initializer of a `for` header.
    fn inline(&mut self, id: NodeId) -> Result<String, ViewError> {
        let ast = self.ast();
        match ast.handle(id) {
            Handle::Decl(decl) => self.variable_declaration(decl),
            Handle::Expr(expr) => self.expr(expr),
            Handle::Stmt(stmt) => match ast.stmt(stmt) {
                Stmt::Expr(expr) => self.expr(*expr),
                Stmt::Assign { op, target, value } => self.assignment(*op, *target, *value),
                Stmt::MultiAssign(items) => {
                    let mut parts = Vec::with_capacity(items.len());
                    for &item in items {
                        parts.push(self.inline(item.node())?);
                    }
                    Ok(parts.join(", "))
                }
                other => Err(self.unsupported(format!("{} in a loop header", other.kind_name()))),
            },
            Handle::Def(_) | Handle::Type(_) => Err(self.unsupported(format!(
                "{} in a loop header",
                ast.node(id).kind_name()
            ))),
        }
    }

    fn if_chain(&mut self, branches: &[Branch], otherwise: Option<StmtId>) -> Result<(), ViewError> {
        for (i, branch) in branches.iter().enumerate() {
            let cond = self.expr(branch.cond)?;
            if i == 0 {
                self.open(&format!("if ({cond})"));
            } else {
                self.reopen(&format!("else if ({cond})"));
            }
            self.body(branch.body, None)?;
        }
        if let Some(otherwise) = otherwise {
            self.reopen("else");
            self.body(otherwise, None)?;
        }
        self.line("}");
        Ok(())
    }

    /// `switch` with a `break` closing every case that does not fall
    /// through or leave on its own.
    fn switch(&mut self, subject: ExprId, cases: &[Case]) -> Result<(), ViewError> {
        let ast = self.ast();
        let subject = self.expr(subject)?;
        self.open(&format!("switch ({subject})"));
        self.ctx_mut().indent();
        for case in cases {
            let label = match case.kind {
                CaseKind::Match(value) | CaseKind::Fallthrough(value) => {
                    format!("case {}:", self.expr(value)?)
                }
                CaseKind::Default => "default:".to_owned(),
            };
            let braces = self.ctx().flag(ConfigKind::BracesAroundCaseBranches)
                || declares_variables(ast, case.body.node());
            let tail = (matches!(case.kind, CaseKind::Match(_))
                && !terminates(ast, case.body.node()))
            .then_some("break;");
            if braces {
                self.line(&format!("{label} {{"));
                self.body(case.body, tail)?;
                self.line("}");
            } else {
                self.line(&label);
                self.body(case.body, tail)?;
            }
        }
        self.ctx_mut().dedent()?;
        self.line("}");
        Ok(())
    }

    /// Counting loop over `range`, counter declared in the header.
    fn range_for(&mut self, var: &Name, range: &Range, body: StmtId) -> Result<(), ViewError> {
        self.scope().enter();
        let start_ty = self.inferred(range.start);
        let stop_ty = self.inferred(range.stop);
        let counter = start_ty.wider(&stop_ty).unwrap_or(Type::Int);
        let ty_text = self.type_name(&counter)?;
        let start = self.expr(range.start)?;
        let cmp = match (range.descending, range.inclusive) {
            (false, false) => mt_ir::BinaryOp::Lt,
            (false, true) => mt_ir::BinaryOp::LtEq,
            (true, false) => mt_ir::BinaryOp::Gt,
            (true, true) => mt_ir::BinaryOp::GtEq,
        };
        let Some(cmp) = self.lang().binary(cmp) else {
            return Err(self.unsupported(format!("operator `{}`", cmp.as_symbol())));
        };
        let stop = self.operand(&cmp, range.stop, OperandPosition::Right)?;
        let update = match (range.step, range.descending) {
            (None, false) => format!("{var}++"),
            (None, true) => format!("{var}--"),
            (Some(step), descending) => {
                let op = if descending { "-=" } else { "+=" };
                format!("{var} {op} {}", self.expr(step)?)
            }
        };
        self.scope().add_variable(var.clone(), counter);
        self.open(&format!(
            "for ({ty_text} {var} = {start}; {var} {} {stop}; {update})",
            cmp.value
        ));
        self.body(body, None)?;
        self.line("}");
        self.scope().leave(true)?;
        Ok(())
    }

    fn comment(&mut self, text: &str, multiline: bool) {
        if multiline {
            self.line("/*");
            for line in text.lines() {
                self.line(format!(" * {line}").trim_end());
            }
            self.line(" */");
        } else {
            for line in text.lines() {
                self.line(format!("// {line}").trim_end());
            }
        }
    }
}
