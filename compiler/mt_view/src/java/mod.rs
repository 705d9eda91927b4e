//! Java viewer.
//!
//! Loose statements are wrapped in `public class Main` with a
//! `public static void main(String[] args)` entry point when the program
//! has no main class of its own and translation unit mode is on.

use mt_ir::{
    BinaryOp, CollectionKind, Decl, DeclId, Def, DefId, Expr, ExprId, ImportItems, IrError,
    MeaningTree, Modifiers, Node, NodeId, StmtId, Type,
};
use mt_tokens::lang::quote_string;
use mt_tokens::{Java, Language, OperandPosition};
use mt_types::TypeScope;

use crate::c_family::CFamily;
use crate::config::INDENT_WIDTH;
use crate::expr::{join_path, ExprSyntax};
use crate::layout::{self, Sections};
use crate::{Config, ConfigKind, ConfigParameter, ViewContext, ViewError};

/// Renders a meaning tree as Java source.
#[derive(Debug)]
pub struct JavaViewer<'a> {
    tree: &'a MeaningTree,
    ctx: ViewContext,
    scope: TypeScope,
}

impl<'a> JavaViewer<'a> {
    /// A fresh viewer; `config` overrides the Java defaults.
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

    #[tracing::instrument(level = "trace", skip_all, fields(language = "java"))]
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

    fn program(&mut self, body: &[NodeId], main_class: Option<DefId>) -> Result<(), ViewError> {
        if main_class.is_some() || !self.ctx.flag(ConfigKind::TranslationUnitMode) {
            return self.items(body);
        }
        let sections = Sections::split(self.tree.ast(), body);
        tracing::debug!(
            definitions = sections.definitions.len(),
            statements = sections.statements.len(),
            "wrapping program in Main"
        );
        for &item in &sections.preamble {
            self.node(item)?;
        }
        if !sections.preamble.is_empty() {
            self.ctx.newline();
        }
        self.open("public class Main");
        self.ctx.indent();
        for &item in &sections.definitions {
            self.member(item, true)?;
            self.ctx.newline();
        }
        self.open("public static void main(String[] args)");
        self.ctx.indent();
        self.scope.enter();
        for &item in &sections.statements {
            self.node(item)?;
        }
        self.scope.leave(true)?;
        self.ctx.dedent()?;
        self.line("}");
        self.ctx.dedent()?;
        self.line("}");
        Ok(())
    }

    /// A class member. Members of the synthesized `Main` are static.
    fn member(&mut self, id: NodeId, in_main: bool) -> Result<(), ViewError> {
        let ast = self.tree.ast();
        match ast.node(id) {
            Node::Def(Def::Function { decl, body }) => self.function(*decl, *body, in_main),
            Node::Def(Def::Class { decl, members }) => self.class(*decl, members, in_main),
            _ => self.node(id),
        }
    }

    fn signature(&self, decl: DeclId, force_static: bool) -> Result<String, ViewError> {
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
        let mut modifiers = *modifiers;
        if force_static {
            modifiers |= Modifiers::STATIC;
        }
        let mut list = Vec::with_capacity(params.len());
        for param in params {
            list.push(format!("{} {}", self.type_name(ast.ty(param.ty))?, param.name));
        }
        Ok(format!(
            "{}{} {name}({})",
            self.modifiers(modifiers),
            self.type_name(ast.ty(*ret))?,
            list.join(", ")
        ))
    }

    fn function(
        &mut self,
        decl: DeclId,
        body: StmtId,
        force_static: bool,
    ) -> Result<(), ViewError> {
        let ast = self.tree.ast();
        let header = self.signature(decl, force_static)?;
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

    fn class_header(&self, decl: DeclId, force_static: bool) -> Result<String, ViewError> {
        let ast = self.tree.ast();
        let Decl::Class {
            name,
            parents,
            modifiers,
        } = ast.decl(decl)
        else {
            return Err(IrError::Malformed {
                node: "class definition",
                reason: format!("declaration is a {}", ast.decl(decl).kind_name()),
            }
            .into());
        };
        let mut modifiers = *modifiers;
        if force_static {
            modifiers |= Modifiers::STATIC;
        }
        let mut header = format!("{}class {name}", self.modifiers(modifiers));
        if let Some((first, rest)) = parents.split_first() {
            header.push_str(&format!(" extends {}", self.type_name(ast.ty(*first))?));
            if !rest.is_empty() {
                let mut names = Vec::with_capacity(rest.len());
                for &parent in rest {
                    names.push(self.type_name(ast.ty(parent))?);
                }
                header.push_str(&format!(" implements {}", names.join(", ")));
            }
        }
        Ok(header)
    }

    fn class(&mut self, decl: DeclId, members: &[NodeId], force_static: bool) -> Result<(), ViewError> {
        let header = self.class_header(decl, force_static)?;
        self.open(&header);
        self.ctx.indent();
        self.scope.enter();
        for (i, &member) in members.iter().enumerate() {
            if i > 0 {
                self.ctx.newline();
            }
            self.member(member, false)?;
        }
        self.scope.leave(true)?;
        self.ctx.dedent()?;
        self.line("}");
        Ok(())
    }

    /// Operand of a string concatenation.
    fn concat_part(&mut self, part: ExprId, position: OperandPosition) -> Result<String, ViewError> {
        match Java.binary(BinaryOp::Add) {
            Some(add) => self.operand(&add, part, position),
            None => Err(self.unsupported("string concatenation")),
        }
    }
}

/// Boxed form of a primitive, as required in generic arguments.
fn boxed(name: String) -> String {
    match name.as_str() {
        "int" => "Integer".to_owned(),
        "double" => "Double".to_owned(),
        "boolean" => "Boolean".to_owned(),
        "char" => "Character".to_owned(),
        _ => name,
    }
}

impl<'a> ExprSyntax<'a> for JavaViewer<'a> {
    fn lang(&self) -> &'static dyn Language {
        &Java
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
        let boxed_arg = |ty: &Type| self.type_name(ty).map(boxed);
        Ok(match ty {
            Type::Int => "int".to_owned(),
            Type::Float => "double".to_owned(),
            Type::Bool => "boolean".to_owned(),
            Type::Char => "char".to_owned(),
            Type::Str => "String".to_owned(),
            Type::Void => "void".to_owned(),
            Type::Unknown => "Object".to_owned(),
            Type::Pointer(_) => return Err(self.unsupported("pointer type")),
            Type::Reference(inner) => self.type_name(inner)?,
            Type::Array(item) => format!("{}[]", self.type_name(item)?),
            Type::List(item) => format!("List<{}>", boxed_arg(item)?),
            Type::Set(item) => format!("Set<{}>", boxed_arg(item)?),
            Type::Dict(key, value) => {
                format!("Map<{}, {}>", boxed_arg(key)?, boxed_arg(value)?)
            }
            Type::Tuple(_) => "Object[]".to_owned(),
            Type::User(name) => name.to_string(),
            Type::Generic { name, args } => {
                let mut list = Vec::with_capacity(args.len());
                for arg in args {
                    list.push(boxed_arg(arg)?);
                }
                format!("{name}<{}>", list.join(", "))
            }
        })
    }

    fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> Result<String, ViewError> {
        let call = match op {
            BinaryOp::Pow => "Math.pow",
            BinaryOp::FloorDiv => "Math.floorDiv",
            _ => {
                return match Java.binary(op) {
                    Some(token) => self.infix(&token, left, right),
                    None => Err(self.unsupported(format!("operator `{}`", op.as_symbol()))),
                }
            }
        };
        Ok(format!("{call}({}, {})", self.expr(left)?, self.expr(right)?))
    }

    fn collection(
        &mut self,
        id: ExprId,
        kind: CollectionKind,
        items: &[ExprId],
    ) -> Result<String, ViewError> {
        let list = self.args(items)?;
        Ok(match kind {
            CollectionKind::Array => {
                let item = match self.inferred(id) {
                    Type::Array(item) if item.is_known() => self.type_name(&item)?,
                    _ => "Object".to_owned(),
                };
                format!("new {item}[] {{{list}}}")
            }
            CollectionKind::List if items.is_empty() => "new ArrayList<>()".to_owned(),
            CollectionKind::List => format!("new ArrayList<>(List.of({list}))"),
            CollectionKind::Set if items.is_empty() => "new HashSet<>()".to_owned(),
            CollectionKind::Set => format!("new HashSet<>(Set.of({list}))"),
            CollectionKind::Tuple => format!("List.of({list})"),
        })
    }

    fn dict(&mut self, _id: ExprId, entries: &[(ExprId, ExprId)]) -> Result<String, ViewError> {
        if entries.is_empty() {
            return Ok("new HashMap<>()".to_owned());
        }
        let mut list = Vec::with_capacity(entries.len() * 2);
        for &(key, value) in entries {
            list.push(self.expr(key)?);
            list.push(self.expr(value)?);
        }
        Ok(format!("new HashMap<>(Map.of({}))", list.join(", ")))
    }

    /// String concatenation, led by `""` when the first part is not a
    /// string literal.
    fn interpolated(&mut self, parts: &[ExprId]) -> Result<String, ViewError> {
        let ast = self.tree.ast();
        let mut out = Vec::with_capacity(parts.len() + 1);
        if !matches!(parts.first().map(|&p| ast.expr(p)), Some(Expr::Str { .. })) {
            out.push(quote_string(""));
        }
        for &part in parts {
            let position = if out.is_empty() {
                OperandPosition::Left
            } else {
                OperandPosition::Right
            };
            out.push(self.concat_part(part, position)?);
        }
        Ok(out.join(" + "))
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
            let items = match ast.expr(init) {
                Expr::Collection { items, .. } => self.args(items)?,
                _ => self.expr(init)?,
            };
            return Ok(format!("new {item}[] {{{items}}}"));
        }
        let mut out = format!("new {item}");
        for &dim in dims {
            out.push_str(&format!("[{}]", self.expr(dim)?));
        }
        Ok(out)
    }

    fn sequence(&mut self, _items: &[ExprId]) -> Result<String, ViewError> {
        Err(self.unsupported("expression sequence"))
    }
}

impl<'a> CFamily<'a> for JavaViewer<'a> {
    fn ctx_mut(&mut self) -> &mut ViewContext {
        &mut self.ctx
    }

    /// `var` for a lone initialized variable of unknown type.
    fn variable_type(&self, ty: &Type, inferable: bool) -> Result<String, ViewError> {
        match ty {
            Type::Unknown if inferable => Ok("var".to_owned()),
            _ => self.type_name(ty),
        }
    }

    fn modifiers(&self, modifiers: Modifiers) -> String {
        let mut out = String::new();
        for (flag, word) in [
            (Modifiers::PUBLIC, "public "),
            (Modifiers::PRIVATE, "private "),
            (Modifiers::PROTECTED, "protected "),
            (Modifiers::ABSTRACT, "abstract "),
            (Modifiers::STATIC, "static "),
            (Modifiers::FINAL | Modifiers::CONST, "final "),
        ] {
            if modifiers.intersects(flag) {
                out.push_str(word);
            }
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
                let signature = self.signature(id, false)?;
                self.line(&format!("{signature};"));
            }
            Decl::Class { .. } => {
                let header = self.class_header(id, false)?;
                self.line(&format!("{header} {{}}"));
            }
            Decl::Import {
                path,
                items,
                is_static,
            } => {
                let keyword = if *is_static { "import static" } else { "import" };
                let path = join_path(path, ".");
                match items {
                    ImportItems::Module => self.line(&format!("{keyword} {path};")),
                    ImportItems::All => self.line(&format!("{keyword} {path}.*;")),
                    ImportItems::Members(members) => {
                        for member in members {
                            self.line(&format!("{keyword} {path}.{member};"));
                        }
                    }
                }
            }
            Decl::Package(path) => self.line(&format!("package {};", join_path(path, "."))),
            Decl::Include { .. } => return Err(self.unsupported("include")),
        }
        Ok(())
    }

    fn def(&mut self, id: DefId) -> Result<(), ViewError> {
        match self.tree.ast().def(id) {
            Def::Program {
                body, main_class, ..
            } => self.program(body, *main_class),
            Def::Function { decl, body } => self.function(*decl, *body, false),
            Def::Class { decl, members } => self.class(*decl, members, false),
        }
    }

    fn delete(&mut self, _target: ExprId, _array: bool) -> Result<(), ViewError> {
        Err(self.unsupported("delete"))
    }
}

#[cfg(test)]
mod tests;
