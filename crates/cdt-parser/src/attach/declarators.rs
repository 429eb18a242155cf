//! Function-name lookup through C++ declarator nesting.

use ast_grep_core::Node;

use crate::scope::DeclName;

/// Declarators that may wrap the `function_declarator` of a function
/// returning a pointer or reference.
const WRAPPING_DECLARATORS: &[&str] = &[
    "pointer_declarator",
    "reference_declarator",
    "attributed_declarator",
];

/// Node kinds that name a function inside its `function_declarator`.
const NAME_KINDS: &[&str] = &[
    "identifier",
    "field_identifier",
    "qualified_identifier",
    "destructor_name",
    "operator_name",
    "operator_cast",
    "template_function",
    "template_method",
];

/// Name of the function declared or defined by `node`, when it is one.
///
/// Variables, function pointers (`int (*fp)(int)`) and declarations without
/// a function declarator yield `None`.
pub(super) fn function_name<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<DeclName> {
    let func_decl = find_function_declarator(node)?;
    let name = func_decl
        .children()
        .find(|c| NAME_KINDS.contains(&c.kind().as_ref()))?;
    Some(DeclName::parse(&name.text()))
}

fn find_function_declarator<'r, D: ast_grep_core::Doc>(node: &Node<'r, D>) -> Option<Node<'r, D>> {
    for child in node.children() {
        let kind = child.kind();
        if kind.as_ref() == "function_declarator" {
            return Some(child);
        }
        if WRAPPING_DECLARATORS.contains(&kind.as_ref())
            && let Some(found) = find_function_declarator(&child)
        {
            return Some(found);
        }
    }
    None
}
