//! C++ viewer.
//!
//! In translation unit mode, loose statements move into `int main()`
//! ending in `return 0;`, after the includes and definitions.

use mt_ir::{
    BinaryOp, CollectionKind, Decl, DeclId, Def, DefId, Expr, ExprId, ImportItems, IrError,
    MeaningTree, Modifiers, NodeId, StmtId, StringKind, Type,
};
use mt_tokens::lang::quote_string;
use mt_tokens::{Cpp, Language};
use mt_types::TypeScope;

use crate::c_family::CFamily;
use crate::config::INDENT_WIDTH;
use crate::expr::{join_path, ExprSyntax};
use crate::layout::{self, Sections};
use crate::{Config, ConfigKind, ConfigParameter, ViewContext, ViewError};

/// Renders a meaning tree as C++ source.
#[derive(Debug)]
pub struct CppViewer<'a> {
    tree: &'a MeaningTree,
    ctx: ViewContext,
    scope: TypeScope,
}

impl<'a> CppViewer<'a> {
    /// A fresh viewer; `config` overrides the C++ defaults.
    pub fn new(tree: &'a MeaningTree, config: &Config) -> Self {
        Self {
            tree,
            ctx: ViewContext::new(Self::defaults().merge(config)),
            scope: TypeScope::new(),
        }
    }

    pub fn defaults() -> Config {
        Config::new([
            ConfigParameter::BracesOnSameLine(true),
            ConfigParameter::AutoVariableDeclaration(true),
            ConfigParameter::IndentWidth(INDENT_WIDTH),
        ])
    }

    #[tracing::instrument(level = "trace", skip_all, fields(language = "c++"))]
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

    fn program(&mut self, body: &[NodeId], entry_point: Option<DefId>) -> Result<(), ViewError> {
        if entry_point.is_some() || !self.ctx.flag(ConfigKind::TranslationUnitMode) {
            return self.items(body);
        }
        let sections = Sections::split(self.tree.ast(), body);
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
        self.open("int main()");
        self.ctx.indent();
        self.scope.enter();
        for &item in &sections.statements {
            self.node(item)?;
        }
        self.line("return 0;");
        self.scope.leave(true)?;
        self.ctx.dedent()?;
        self.line("}");
        Ok(())
    }

    fn signature(&self, decl: DeclId) -> Result<String, ViewError> {
        let ast = self.tree.ast();
        let Decl::Function {
            name,
            params,
            ret,
            modifiers,
            ..
        } = ast.decl(decl)
        else {
            return Err(IrError::Malformed {
                node: "function definition",
                reason: format!("declaration is a {}", ast.decl(decl).kind_name()),
            }
            .into());
        };
        let mut list = Vec::with_capacity(params.len());
        for param in params {
            list.push(format!("{} {}", self.type_name(ast.ty(param.ty))?, param.name));
        }
        Ok(format!(
            "{}{} {name}({})",
            self.modifiers(*modifiers),
            self.type_name(ast.ty(*ret))?,
            list.join(", ")
        ))
    }

    fn function(&mut self, decl: DeclId, body: StmtId) -> Result<(), ViewError> {
        let ast = self.tree.ast();
        let header = self.signature(decl)?;
        mt_types::declare(ast, decl, &mut self.scope);
        self.scope.enter();
        if let Decl::Function { params, .. } = ast.decl(decl) {
            for param in params {
                self.scope
                    .add_variable(param.name.clone(), ast.ty(param.ty).clone());
            }
        }
        self.open(&header);
        self.body(body, None)?;
        self.line("}");
        self.scope.leave(true)?;
        Ok(())
    }

    fn class_header(&self, decl: DeclId) -> Result<String, ViewError> {
        let ast = self.tree.ast();
        let Decl::Class { name, parents, .. } = ast.decl(decl) else {
            return Err(IrError::Malformed {
                node: "class definition",
                reason: format!("declaration is a {}", ast.decl(decl).kind_name()),
            }
            .into());
        };
        if parents.is_empty() {
            return Ok(format!("class {name}"));
        }
        let mut list = Vec::with_capacity(parents.len());
        for &parent in parents {
            list.push(format!("public {}", self.type_name(ast.ty(parent))?));
        }
        Ok(format!("class {name} : {}", list.join(", ")))
    }

    /// Class body with every member public.
    fn class(&mut self, decl: DeclId, members: &[NodeId]) -> Result<(), ViewError> {
        let header = self.class_header(decl)?;
        self.open(&header);
        self.line("public:");
        self.ctx.indent();
        self.scope.enter();
        for (i, &member) in members.iter().enumerate() {
            if i > 0 {
                self.ctx.newline();
            }
            self.node(member)?;
        }
        self.scope.leave(true)?;
        self.ctx.dedent()?;
        self.line("};");
        Ok(())
    }

    /// `Container<T>{items}` when the element type is known, a braced
    /// initializer list otherwise.
    fn typed_init(&mut self, id: ExprId, list: &str) -> Result<String, ViewError> {
        let ty = self.inferred(id);
        let known = match &ty {
            Type::Dict(key, value) => key.is_known() && value.is_known(),
            other => other.element().is_some_and(Type::is_known),
        };
        if known {
            Ok(format!("{}{{{list}}}", self.type_name(&ty)?))
        } else {
            Ok(format!("{{{list}}}"))
        }
    }
}

impl<'a> ExprSyntax<'a> for CppViewer<'a> {
    fn lang(&self) -> &'static dyn Language {
        &Cpp
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

    fn type_name(&self, ty: &Type) -> Result<String, ViewError> {
        Ok(match ty {
            Type::Int => "int".to_owned(),
            Type::Float => "double".to_owned(),
            Type::Bool => "bool".to_owned(),
            Type::Char => "char".to_owned(),
            Type::Str => "std::string".to_owned(),
            Type::Void => "void".to_owned(),
            Type::Unknown => "auto".to_owned(),
            Type::Pointer(inner) => format!("{}*", self.type_name(inner)?),
            Type::Reference(inner) => format!("{}&", self.type_name(inner)?),
            Type::Array(item) | Type::List(item) => {
                format!("std::vector<{}>", self.type_name(item)?)
            }
            Type::Set(item) => format!("std::set<{}>", self.type_name(item)?),
            Type::Dict(key, value) => format!(
                "std::map<{}, {}>",
                self.type_name(key)?,
                self.type_name(value)?
            ),
            Type::Tuple(items) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    list.push(self.type_name(item)?);
                }
                format!("std::tuple<{}>", list.join(", "))
            }
            Type::User(name) => name.to_string(),
            Type::Generic { name, args } => {
                let mut list = Vec::with_capacity(args.len());
                for arg in args {
                    list.push(self.type_name(arg)?);
                }
                format!("{name}<{}>", list.join(", "))
            }
        })
    }

    fn string_literal(&self, value: &str, kind: StringKind) -> String {
        match kind {
            StringKind::Raw => format!("R\"({value})\""),
            StringKind::Plain | StringKind::Multiline => quote_string(value),
        }
    }

    fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> Result<String, ViewError> {
        match op {
            BinaryOp::Pow => Ok(format!("pow({}, {})", self.expr(left)?, self.expr(right)?)),
            BinaryOp::FloorDiv => match Cpp.binary(BinaryOp::Div) {
                Some(div) => Ok(format!("(int)({})", self.infix(&div, left, right)?)),
                None => Err(self.unsupported("operator `//`")),
            },
            _ => match Cpp.binary(op) {
                Some(token) => self.infix(&token, left, right),
                None => Err(self.unsupported(format!("operator `{}`", op.as_symbol()))),
            },
        }
    }

    fn collection(
        &mut self,
        id: ExprId,
        kind: CollectionKind,
        items: &[ExprId],
    ) -> Result<String, ViewError> {
        let list = self.args(items)?;
        match kind {
            CollectionKind::Tuple => Ok(format!("std::make_tuple({list})")),
            CollectionKind::List | CollectionKind::Array | CollectionKind::Set => {
                self.typed_init(id, &list)
            }
        }
    }

    fn dict(&mut self, id: ExprId, entries: &[(ExprId, ExprId)]) -> Result<String, ViewError> {
        let mut list = Vec::with_capacity(entries.len());
        for &(key, value) in entries {
            list.push(format!("{{{}, {}}}", self.expr(key)?, self.expr(value)?));
        }
        self.typed_init(id, &list.join(", "))
    }

    /// `std::format` with a `{}` placeholder per embedded expression.
    fn interpolated(&mut self, parts: &[ExprId]) -> Result<String, ViewError> {
        let ast = self.tree.ast();
        let mut format = String::new();
        let mut args = Vec::new();
        for &part in parts {
            match ast.expr(part) {
                Expr::Str { value, .. } => {
                    format.push_str(&value.replace('{', "{{").replace('}', "}}"));
                }
                _ => {
                    format.push_str("{}");
                    args.push(self.expr(part)?);
                }
            }
        }
        let mut call = format!("std::format({}", quote_string(&format));
        for arg in args {
            call.push_str(", ");
            call.push_str(&arg);
        }
        call.push(')');
        Ok(call)
    }

    fn size_of(&mut self, value: ExprId) -> Result<String, ViewError> {
        Ok(format!("sizeof({})", self.expr(value)?))
    }

    fn new_array(
        &mut self,
        ty: &Type,
        dims: &[ExprId],
        init: Option<ExprId>,
    ) -> Result<String, ViewError> {
        let ast = self.tree.ast();
        let item = self.type_name(ty)?;
        if let Some(init) = init {
            if let Expr::Collection { items, .. } = ast.expr(init) {
                let list = self.args(items)?;
                return Ok(format!("new {item}[{}]{{{list}}}", items.len()));
            }
        }
        let mut out = format!("new {item}");
        for &dim in dims {
            out.push_str(&format!("[{}]", self.expr(dim)?));
        }
        Ok(out)
    }
}

impl<'a> CFamily<'a> for CppViewer<'a> {
    fn ctx_mut(&mut self) -> &mut ViewContext {
        &mut self.ctx
    }

    /// `auto` for an initialized variable of unknown type.
    fn variable_type(&self, ty: &Type, inferable: bool) -> Result<String, ViewError> {
        match ty {
            Type::Unknown if !inferable => {
                Err(self.unsupported("untyped declaration without initializer"))
            }
            _ => self.type_name(ty),
        }
    }

    fn modifiers(&self, modifiers: Modifiers) -> String {
        let mut out = String::new();
        if modifiers.contains(Modifiers::STATIC) {
            out.push_str("static ");
        }
        if modifiers.intersects(Modifiers::CONST | Modifiers::FINAL) {
            out.push_str("const ");
        }
        out
    }

    fn decl(&mut self, id: DeclId) -> Result<(), ViewError> {
        let ast = self.tree.ast();
        match ast.decl(id) {
            Decl::Variable { .. } => {
                let text = self.variable_declaration(id)?;
                self.line(&format!("{text};"));
            }
            Decl::Function { .. } => {
                mt_types::declare(ast, id, &mut self.scope);
                let signature = self.signature(id)?;
                self.line(&format!("{signature};"));
            }
            Decl::Class { .. } => {
                let header = self.class_header(id)?;
                self.line(&format!("{header};"));
            }
            Decl::Import { path, items, .. } => {
                let path = join_path(path, "::");
                match items {
                    ImportItems::Module | ImportItems::All => {
                        self.line(&format!("using namespace {path};"));
                    }
                    ImportItems::Members(members) => {
                        for member in members {
                            self.line(&format!("using {path}::{member};"));
                        }
                    }
                }
            }
            Decl::Package(_) => return Err(self.unsupported("package declaration")),
            Decl::Include { path, system: true } => self.line(&format!("#include <{path}>")),
            Decl::Include {
                path,
                system: false,
            } => self.line(&format!("#include {}", quote_string(path))),
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

    fn delete(&mut self, target: ExprId, array: bool) -> Result<(), ViewError> {
        let target = self.expr(target)?;
        let keyword = if array { "delete[]" } else { "delete" };
        self.line(&format!("{keyword} {target};"));
        Ok(())
    }
}
