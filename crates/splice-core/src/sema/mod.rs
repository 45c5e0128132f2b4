//! Name-level semantics over workspace snapshots.
//!
//! Mica has no type inference in this engine, so resolution is nominal:
//! top-level functions and classes are looked up by name, and member access
//! `recv.name` resolves to an extension function or to a uniquely named
//! class member. Anything that would need the receiver's type to
//! disambiguate is reported as an indirect reference instead of guessed.

pub mod references;
pub mod scope;

use rustc_hash::FxHashMap;
use splice_syntax::ast::{
    ClassDecl, FunctionBody, FunctionDecl, Item, Member, Param, PropertyDecl,
};
use splice_syntax::{Span, Spanned, StringId, StringInterner};

use crate::workspace::{DocumentId, Workspace};

/// Identity of an arena-allocated AST node, used as a map key.
///
/// Nodes are never moved or freed while a snapshot is alive, so the
/// allocation address is a stable identity for the lifetime of the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(usize);

impl NodeKey {
    #[inline]
    pub fn of<T>(node: &T) -> Self {
        NodeKey(node as *const T as usize)
    }
}

/// A class member found by name somewhere in the workspace.
#[derive(Clone, Copy)]
pub struct MemberHit<'a> {
    pub doc: DocumentId,
    pub class: &'a ClassDecl<'a>,
    pub member: &'a Member<'a>,
}

pub struct FunctionEntry<'a> {
    pub doc: DocumentId,
    pub decl: &'a FunctionDecl<'a>,
}

pub struct ClassEntry<'a> {
    pub doc: DocumentId,
    pub decl: &'a ClassDecl<'a>,
}

/// Workspace-wide symbol tables, built once per snapshot.
pub struct GlobalIndex<'a> {
    functions: FxHashMap<StringId, FunctionEntry<'a>>,
    classes: FxHashMap<StringId, ClassEntry<'a>>,
    members: FxHashMap<StringId, Vec<MemberHit<'a>>>,
}

impl<'a> GlobalIndex<'a> {
    pub fn build(workspace: &Workspace<'a>) -> Self {
        let mut functions = FxHashMap::default();
        let mut classes = FxHashMap::default();
        let mut members: FxHashMap<StringId, Vec<MemberHit<'a>>> = FxHashMap::default();

        for doc in workspace.documents() {
            for item in doc.module.items {
                match item {
                    Item::Function(decl) => {
                        functions.insert(decl.name.node, FunctionEntry { doc: doc.id, decl });
                    }
                    Item::Class(decl) => {
                        for member in decl.members {
                            members.entry(member.name()).or_default().push(MemberHit {
                                doc: doc.id,
                                class: decl,
                                member,
                            });
                        }
                        classes.insert(decl.name.node, ClassEntry { doc: doc.id, decl });
                    }
                }
            }
        }

        Self {
            functions,
            classes,
            members,
        }
    }

    pub fn function(&self, name: StringId) -> Option<&FunctionEntry<'a>> {
        self.functions.get(&name)
    }

    pub fn class(&self, name: StringId) -> Option<&ClassEntry<'a>> {
        self.classes.get(&name)
    }

    pub fn members_named(&self, name: StringId) -> &[MemberHit<'a>] {
        self.members.get(&name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Member of a specific class, by name.
    pub fn class_member(&self, class: StringId, name: StringId) -> Option<MemberHit<'a>> {
        self.members_named(name)
            .iter()
            .find(|hit| hit.class.name.node == class)
            .copied()
    }

    /// Names of every top-level function and class in the workspace.
    pub fn top_level_names(&self) -> impl Iterator<Item = StringId> + '_ {
        self.functions.keys().chain(self.classes.keys()).copied()
    }
}

/// The declaration being inlined.
#[derive(Clone, Copy)]
pub enum InlineTarget<'a> {
    Function {
        doc: DocumentId,
        decl: &'a FunctionDecl<'a>,
        /// Declaring class for methods; `None` for top-level functions.
        class: Option<&'a ClassDecl<'a>>,
    },
    Property {
        doc: DocumentId,
        decl: &'a PropertyDecl<'a>,
        class: &'a ClassDecl<'a>,
    },
}

impl<'a> InlineTarget<'a> {
    pub fn name(&self) -> StringId {
        match self {
            InlineTarget::Function { decl, .. } => decl.name.node,
            InlineTarget::Property { decl, .. } => decl.name.node,
        }
    }

    pub fn doc(&self) -> DocumentId {
        match self {
            InlineTarget::Function { doc, .. } => *doc,
            InlineTarget::Property { doc, .. } => *doc,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            InlineTarget::Function { decl, .. } => decl.span,
            InlineTarget::Property { decl, .. } => decl.span,
        }
    }

    pub fn body(&self) -> &'a FunctionBody<'a> {
        match self {
            InlineTarget::Function { decl, .. } => &decl.body,
            InlineTarget::Property { decl, .. } => &decl.body,
        }
    }

    pub fn params(&self) -> &'a [Param<'a>] {
        match self {
            InlineTarget::Function { decl, .. } => decl.params,
            InlineTarget::Property { .. } => &[],
        }
    }

    pub fn type_params(&self) -> &'a [Spanned<StringId>] {
        match self {
            InlineTarget::Function { decl, .. } => decl.type_params,
            InlineTarget::Property { .. } => &[],
        }
    }

    pub fn declaring_class(&self) -> Option<&'a ClassDecl<'a>> {
        match self {
            InlineTarget::Function { class, .. } => *class,
            InlineTarget::Property { class, .. } => Some(class),
        }
    }

    /// Extension function: first parameter carries `this`.
    pub fn is_extension(&self) -> bool {
        matches!(self, InlineTarget::Function { decl, class: None, .. } if decl.is_extension())
    }

    /// Body may refer to `self`: instance methods and instance properties.
    pub fn binds_self(&self) -> bool {
        match self {
            InlineTarget::Function { decl, class, .. } => class.is_some() && !decl.is_static,
            InlineTarget::Property { decl, .. } => !decl.is_static,
        }
    }

    /// The declaration produces a value when called or read.
    pub fn has_value(&self) -> bool {
        match self {
            InlineTarget::Function { decl, .. } => decl.return_type.is_some(),
            InlineTarget::Property { .. } => true,
        }
    }
}

/// Resolve a target named on the command line: `name` for a top-level
/// function, or `Class.name` for a method or property.
pub fn resolve_target<'a>(
    index: &GlobalIndex<'a>,
    interner: &StringInterner,
    name: &str,
) -> Option<InlineTarget<'a>> {
    if let Some((class_part, member_part)) = name.split_once('.') {
        let class_id = interner.get(class_part)?;
        let member_id = interner.get(member_part)?;
        let hit = index.class_member(class_id, member_id)?;
        return target_from_member(&hit);
    }

    let id = interner.get(name)?;
    if let Some(entry) = index.function(id) {
        return Some(InlineTarget::Function {
            doc: entry.doc,
            decl: entry.decl,
            class: None,
        });
    }
    // Unqualified member name: accept it only when exactly one class
    // declares it.
    match index.members_named(id) {
        [hit] => target_from_member(hit),
        _ => None,
    }
}

fn target_from_member<'a>(hit: &MemberHit<'a>) -> Option<InlineTarget<'a>> {
    match hit.member {
        Member::Method(decl) => Some(InlineTarget::Function {
            doc: hit.doc,
            decl,
            class: Some(hit.class),
        }),
        Member::Property(decl) => Some(InlineTarget::Property {
            doc: hit.doc,
            decl,
            class: hit.class,
        }),
        Member::Field(_) | Member::Const(_) => None,
    }
}
