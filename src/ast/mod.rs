/// AST (Abstract Syntax Tree) module
/// Contains the factory interface the engine builds nodes through
///
/// Submodules:
/// - ast: The factory trait plus a general purpose node and factory
pub mod ast;
