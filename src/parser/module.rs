//! Compilation unit for one IDL file
//!
//! [`Module`] owns every node produced while parsing a file:
//!
//! - the type arena (primitives, generic instantiations, interfaces, sequenceables,
//!   and placeholders for names that never resolved)
//! - the namespace arena and the list of root namespaces
//! - the flat name table used for resolution
//!
//! Declared types are reachable both through the namespace that declares them
//! and through the name table, under their simple and their qualified name.

use super::ast::*;
use super::namespace::{split_qualified, Namespace, NamespaceId};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

const TAB: &str = "    ";

#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    file: String,
    license: Option<String>,
    types: Vec<TypeKind>,
    table: FxHashMap<String, TypeId>,
    /// Qualified names of declared interfaces and sequenceables
    declared: FxHashMap<String, TypeId>,
    namespaces: Vec<Namespace>,
    roots: Vec<NamespaceId>,
    interfaces: Vec<TypeId>,
    sequenceables: Vec<TypeId>,
}

impl Module {
    /// Create an empty module with the primitive types registered.
    pub fn new(name: &str, file: &str) -> Self {
        let mut module = Module {
            name: name.to_string(),
            file: file.to_string(),
            license: None,
            types: Vec::new(),
            table: FxHashMap::default(),
            declared: FxHashMap::default(),
            namespaces: Vec::new(),
            roots: Vec::new(),
            interfaces: Vec::new(),
            sequenceables: Vec::new(),
        };
        for primitive in Primitive::ALL {
            let id = module.alloc(TypeKind::Primitive(primitive));
            module.table.insert(primitive.keyword().to_string(), id);
        }
        module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the source file the module was parsed from
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }

    pub(crate) fn set_license(&mut self, license: String) {
        self.license = Some(license);
    }

    // ===== Types =====

    fn alloc(&mut self, kind: TypeKind) -> TypeId {
        self.types.push(kind);
        TypeId(self.types.len() - 1)
    }

    pub fn get(&self, id: TypeId) -> &TypeKind {
        &self.types[id.0]
    }

    pub fn types(&self) -> impl Iterator<Item = (TypeId, &TypeKind)> {
        self.types.iter().enumerate().map(|(i, kind)| (TypeId(i), kind))
    }

    /// Exact-match lookup in the name table. Never creates anything.
    pub fn find_type(&self, name: &str) -> Option<TypeId> {
        self.table.get(name).copied()
    }

    /// True when the node is reachable through the name table
    pub fn is_registered(&self, id: TypeId) -> bool {
        self.table.values().any(|&registered| registered == id)
    }

    pub fn primitive(&self, primitive: Primitive) -> TypeId {
        // Primitives are allocated first, in `Primitive::ALL` order.
        let index = Primitive::ALL
            .iter()
            .position(|&p| p == primitive)
            .unwrap_or_default();
        TypeId(index)
    }

    fn intern(&mut self, kind: TypeKind, args: &[TypeId]) -> TypeId {
        // Instantiations over placeholders stay out of the table so every
        // reference site keeps its own unresolved node.
        if args.iter().any(|&arg| self.contains_unresolved(arg)) {
            return self.alloc(kind);
        }
        let id = TypeId(self.types.len());
        self.types.push(kind);
        let key = self.type_name(id);
        match self.table.get(&key) {
            Some(&existing) => {
                self.types.pop();
                existing
            }
            None => {
                self.table.insert(key, id);
                id
            }
        }
    }

    fn contains_unresolved(&self, id: TypeId) -> bool {
        match self.get(id) {
            TypeKind::Unresolved(_) => true,
            TypeKind::List { element } | TypeKind::Array { element } => {
                self.contains_unresolved(*element)
            }
            TypeKind::Map { key, value } => {
                self.contains_unresolved(*key) || self.contains_unresolved(*value)
            }
            _ => false,
        }
    }

    pub fn list_of(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeKind::List { element }, &[element])
    }

    pub fn map_of(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(TypeKind::Map { key, value }, &[key, value])
    }

    pub fn array_of(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeKind::Array { element }, &[element])
    }

    pub(crate) fn unresolved(&mut self, name: &str, location: SourceLocation) -> TypeId {
        self.alloc(TypeKind::Unresolved(Unresolved {
            name: name.to_string(),
            location,
        }))
    }

    fn register(&mut self, id: TypeId, simple: &str) {
        let qualified = self.type_name(id);
        self.table.entry(simple.to_string()).or_insert(id);
        self.table.insert(qualified.clone(), id);
        self.declared.insert(qualified, id);
    }

    /// Register an interface in its namespace and in the name table.
    ///
    /// A definition completes an earlier forward declaration of the same
    /// qualified name: the node keeps its id, so earlier references see the
    /// body, but moves to the position of the definition. A forward declaration
    /// of an already known interface is a no-op. Any other clash returns the
    /// existing node as `Err`.
    pub fn add_interface(&mut self, mut interface: Interface) -> Result<TypeId, TypeId> {
        let qualified = self.join_qualified(interface.namespace, &interface.name);
        if let Some(&existing) = self.declared.get(&qualified) {
            let known_external = match self.get(existing) {
                TypeKind::Interface(known) => known.external,
                _ => return Err(existing),
            };
            if interface.external {
                return Ok(existing);
            }
            if !known_external {
                return Err(existing);
            }
            if let Some(known) = self.interface_mut(existing) {
                interface.forward_declared = true;
                interface.license = interface.license.or(known.license.take());
                *known = interface;
            }
            self.move_to_end(existing);
            return Ok(existing);
        }

        let namespace = interface.namespace;
        let simple = interface.name.clone();
        let id = self.alloc(TypeKind::Interface(interface));
        self.namespaces[namespace.0].interfaces.push(id);
        self.interfaces.push(id);
        self.register(id, &simple);
        Ok(id)
    }

    fn move_to_end(&mut self, id: TypeId) {
        self.interfaces.retain(|&known| known != id);
        self.interfaces.push(id);
        if let Some(namespace) = self.get(id).namespace() {
            let declared = &mut self.namespaces[namespace.0].interfaces;
            declared.retain(|&known| known != id);
            declared.push(id);
        }
    }

    pub fn add_sequenceable(&mut self, sequenceable: Sequenceable) -> Result<TypeId, TypeId> {
        let qualified = self.join_qualified(sequenceable.namespace, &sequenceable.name);
        if let Some(&existing) = self.declared.get(&qualified) {
            return Err(existing);
        }

        let namespace = sequenceable.namespace;
        let simple = sequenceable.name.clone();
        let id = self.alloc(TypeKind::Sequenceable(sequenceable));
        self.namespaces[namespace.0].sequenceables.push(id);
        self.sequenceables.push(id);
        self.register(id, &simple);
        Ok(id)
    }

    pub(crate) fn interface_mut(&mut self, id: TypeId) -> Option<&mut Interface> {
        match &mut self.types[id.0] {
            TypeKind::Interface(interface) => Some(interface),
            _ => None,
        }
    }

    pub fn interface(&self, id: TypeId) -> Option<&Interface> {
        self.get(id).as_interface()
    }

    /// All interfaces, external ones included, in declaration order
    pub fn interfaces(&self) -> impl Iterator<Item = (TypeId, &Interface)> {
        self.interfaces
            .iter()
            .filter_map(move |&id| self.interface(id).map(|interface| (id, interface)))
    }

    pub fn sequenceables(&self) -> impl Iterator<Item = (TypeId, &Sequenceable)> {
        self.sequenceables
            .iter()
            .filter_map(move |&id| self.get(id).as_sequenceable().map(|s| (id, s)))
    }

    /// Look an interface up by simple or qualified name.
    pub fn find_interface(&self, name: &str) -> Option<&Interface> {
        self.find_type(name).and_then(|id| self.interface(id))
    }

    pub fn find_sequenceable(&self, name: &str) -> Option<&Sequenceable> {
        self.find_type(name).and_then(|id| self.get(id).as_sequenceable())
    }

    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    /// Interfaces with a body in this file
    pub fn local_interface_count(&self) -> usize {
        self.interfaces().filter(|(_, i)| !i.external).count()
    }

    /// A usable compilation unit has a name and defines at least one interface.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && self.local_interface_count() > 0
    }

    // ===== Namespaces =====

    pub fn namespace(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.0]
    }

    pub fn namespaces(&self) -> impl Iterator<Item = (NamespaceId, &Namespace)> {
        self.namespaces
            .iter()
            .enumerate()
            .map(|(i, ns)| (NamespaceId(i), ns))
    }

    pub fn root_namespaces(&self) -> &[NamespaceId] {
        &self.roots
    }

    fn child_namespace(&mut self, outer: Option<NamespaceId>, segment: &str) -> NamespaceId {
        let siblings = match outer {
            Some(parent) => &self.namespaces[parent.0].inner,
            None => &self.roots,
        };
        if let Some(&found) = siblings
            .iter()
            .find(|&&id| self.namespaces[id.0].name == segment)
        {
            return found;
        }

        self.namespaces.push(Namespace::new(segment, outer));
        let id = NamespaceId(self.namespaces.len() - 1);
        match outer {
            Some(parent) => self.namespaces[parent.0].inner.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// The unnamed root namespace holding declarations without a dotted prefix
    pub fn global_namespace(&mut self) -> NamespaceId {
        self.child_namespace(None, "")
    }

    /// Walk `a.b.c`, creating missing levels, and return the innermost namespace.
    ///
    /// An empty string yields the global namespace. Segments match by exact name.
    pub fn parse_namespace(&mut self, dotted: &str) -> NamespaceId {
        let dotted = dotted.trim_end_matches('.');
        if dotted.is_empty() {
            return self.global_namespace();
        }
        let mut current = None;
        for segment in dotted.split('.') {
            current = Some(self.child_namespace(current, segment));
        }
        current.unwrap_or_else(|| self.global_namespace())
    }

    /// Find an existing namespace by qualified name without creating it.
    pub fn find_namespace(&self, dotted: &str) -> Option<NamespaceId> {
        let mut siblings: &[NamespaceId] = &self.roots;
        let mut current = None;
        let segments: Vec<&str> = if dotted.is_empty() {
            vec![""]
        } else {
            dotted.split('.').collect()
        };
        for segment in segments {
            let found = *siblings
                .iter()
                .find(|&&id| self.namespaces[id.0].name == segment)?;
            siblings = self.namespaces[found.0].inner.as_slice();
            current = Some(found);
        }
        current
    }

    pub fn qualified_namespace_name(&self, id: NamespaceId) -> String {
        let mut segments = Vec::new();
        let mut cursor = Some(id);
        while let Some(ns) = cursor {
            let namespace = &self.namespaces[ns.0];
            if !namespace.name.is_empty() {
                segments.push(namespace.name.as_str());
            }
            cursor = namespace.outer;
        }
        segments.reverse();
        segments.join(".")
    }

    fn join_qualified(&self, namespace: NamespaceId, name: &str) -> String {
        let prefix = self.qualified_namespace_name(namespace);
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", prefix, name)
        }
    }

    /// Build the namespace for a dotted type name and return it with the simple name.
    pub fn declare_path<'a>(&mut self, full_name: &'a str) -> (NamespaceId, &'a str) {
        let (namespace, simple) = split_qualified(full_name);
        (self.parse_namespace(namespace), simple)
    }

    // ===== Names and signatures =====

    /// Canonical spelling of a type, also its key in the name table.
    pub fn type_name(&self, id: TypeId) -> String {
        match self.get(id) {
            TypeKind::Primitive(p) => p.keyword().to_string(),
            TypeKind::List { element } => format!("List<{}>", self.type_name(*element)),
            TypeKind::Map { key, value } => format!(
                "Map<{}, {}>",
                self.type_name(*key),
                self.type_name(*value)
            ),
            TypeKind::Array { element } => format!("{}[]", self.type_name(*element)),
            TypeKind::Interface(i) => self.join_qualified(i.namespace, &i.name),
            TypeKind::Sequenceable(s) => self.join_qualified(s.namespace, &s.name),
            TypeKind::Unresolved(u) => u.name.clone(),
        }
    }

    /// Fully qualified dotted name of a declared type, or its plain name otherwise
    pub fn qualified_name(&self, id: TypeId) -> String {
        self.type_name(id)
    }

    /// Mangled type descriptor, e.g. `Lohos/app/IFoo;`
    pub fn signature(&self, id: TypeId) -> String {
        match self.get(id) {
            TypeKind::Primitive(p) => p.signature().to_string(),
            TypeKind::List { .. } => "Ljava/util/List;".to_string(),
            TypeKind::Map { .. } => "Ljava/util/HashMap;".to_string(),
            TypeKind::Array { element } => format!("[{}", self.signature(*element)),
            TypeKind::Interface(_) | TypeKind::Sequenceable(_) | TypeKind::Unresolved(_) => {
                format!("L{};", self.type_name(id).replace('.', "/"))
            }
        }
    }

    pub fn method_signature(&self, method: &Method) -> String {
        let params: String = method
            .parameters
            .iter()
            .map(|p| self.signature(p.ty))
            .collect();
        format!("({}){}", params, self.signature(method.return_type))
    }

    /// Every placeholder reachable from a method, once each, in source order.
    pub fn unresolved_references(&self) -> Vec<&Unresolved> {
        let mut seen = FxHashSet::default();
        let mut found = Vec::new();
        for (_, interface) in self.interfaces() {
            for method in &interface.methods {
                self.collect_unresolved(method.return_type, &mut seen, &mut found);
                for param in &method.parameters {
                    self.collect_unresolved(param.ty, &mut seen, &mut found);
                }
            }
        }
        found
    }

    fn collect_unresolved<'a>(
        &'a self,
        id: TypeId,
        seen: &mut FxHashSet<TypeId>,
        found: &mut Vec<&'a Unresolved>,
    ) {
        match self.get(id) {
            TypeKind::Unresolved(u) => {
                if seen.insert(id) {
                    found.push(u);
                }
            }
            TypeKind::List { element } | TypeKind::Array { element } => {
                self.collect_unresolved(*element, seen, found)
            }
            TypeKind::Map { key, value } => {
                self.collect_unresolved(*key, seen, found);
                self.collect_unresolved(*value, seen, found);
            }
            _ => {}
        }
    }

    // ===== Dump =====

    /// One method as it appears in the dump, without the trailing `;`
    pub fn method_declaration(&self, method: &Method) -> String {
        let params: Vec<String> = method
            .parameters
            .iter()
            .map(|p| format!("{} {} {}", p.direction, self.type_name(p.ty), p.name))
            .collect();
        format!(
            "{}{} {}({})",
            if method.oneway { "oneway " } else { "" },
            self.type_name(method.return_type),
            method.name,
            params.join(", ")
        )
    }

    pub fn dump_interface(&self, id: TypeId, prefix: &str) -> String {
        let Some(interface) = self.interface(id) else {
            return String::new();
        };
        let mut out = String::new();
        if let Some(license) = &interface.license {
            out.push_str(license);
            out.push('\n');
        }
        out.push_str(prefix);
        if interface.oneway {
            out.push_str("oneway ");
        }
        out.push_str("interface ");
        out.push_str(&self.type_name(id));
        if interface.external {
            out.push_str(";\n");
            return out;
        }
        out.push_str(" {\n");
        for method in &interface.methods {
            out.push_str(prefix);
            out.push_str(TAB);
            out.push_str(&self.method_declaration(method));
            out.push_str(";\n");
        }
        out.push_str(prefix);
        out.push_str("}\n");
        out
    }

    /// Canonical text form: sequenceables, then forward-declared interfaces,
    /// then interfaces defined here. Parsing the output yields the same dump.
    ///
    /// An interface that was forward declared and later defined appears twice:
    /// as a bare `interface x.Y;` after the external ones, and with its body
    /// in definition order.
    pub fn dump(&self, prefix: &str) -> String {
        let sequenceables: String = self
            .sequenceables
            .iter()
            .map(|&id| format!("{}sequenceable {};\n", prefix, self.type_name(id)))
            .collect();
        let mut externals: String = self
            .interfaces()
            .filter(|(_, i)| i.external)
            .map(|(id, _)| self.dump_interface(id, prefix))
            .collect();
        for (id, _) in self
            .interfaces()
            .filter(|(_, i)| i.forward_declared && !i.external)
        {
            externals.push_str(&format!("{}interface {};\n", prefix, self.type_name(id)));
        }
        let locals: Vec<String> = self
            .interfaces()
            .filter(|(_, i)| !i.external)
            .map(|(id, _)| self.dump_interface(id, prefix))
            .collect();

        [sequenceables, externals, locals.join("\n")]
            .into_iter()
            .filter(|section| !section.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump(""))
    }
}
