//! 可复用的编译器工具组件

pub mod lexer;
