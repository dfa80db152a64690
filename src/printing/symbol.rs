//! Symbol rendering
//!
//! Turns symbols back into SQL text. Operators print infix with their
//! arguments parenthesized only when those are operators themselves, so the
//! output stays minimal while grouping is preserved.

use crate::semantic::symbol::{
    Field, FunctionCall, Literal, Parameter, Reference, Symbol, SymbolVisitor,
};

/// Render a symbol as SQL expression text
pub fn print_symbol(symbol: &Symbol) -> String {
    let mut out = String::new();
    symbol.accept(&mut SymbolPrinter, &mut out);
    out
}

/// The name a SELECT item gets when no alias is given: the canonical
/// unqualified rendering of its symbol
pub fn output_name(symbol: &Symbol) -> String {
    print_symbol(symbol)
}

fn is_operator(name: &str) -> bool {
    matches!(
        name,
        "=" | "<>"
            | "<"
            | "<="
            | ">"
            | ">="
            | "+"
            | "-"
            | "*"
            | "/"
            | "%"
            | "and"
            | "or"
            | "not"
    )
}

/// Visitor that renders symbols into a string buffer
struct SymbolPrinter;

impl SymbolPrinter {
    fn print_operand(&mut self, symbol: &Symbol, out: &mut String) {
        let parens = matches!(symbol, Symbol::Function(f) if is_operator(&f.name));
        if parens {
            out.push('(');
        }
        symbol.accept(self, out);
        if parens {
            out.push(')');
        }
    }
}

impl SymbolVisitor<String, ()> for SymbolPrinter {
    fn visit_literal(&mut self, literal: &Literal, out: &mut String) {
        out.push_str(&literal.value().to_string());
    }

    fn visit_null(&mut self, out: &mut String) {
        out.push_str("NULL");
    }

    fn visit_reference(&mut self, reference: &Reference, out: &mut String) {
        out.push_str(&reference.column().sql_fqn());
    }

    fn visit_function(&mut self, function: &FunctionCall, out: &mut String) {
        match function.name.as_str() {
            "not" if function.args.len() == 1 => {
                out.push_str("NOT ");
                self.print_operand(&function.args[0], out);
            }
            "and" | "or" if function.args.len() == 2 => {
                self.print_operand(&function.args[0], out);
                out.push(' ');
                out.push_str(&function.name.to_uppercase());
                out.push(' ');
                self.print_operand(&function.args[1], out);
            }
            name if is_operator(name) && function.args.len() == 2 => {
                self.print_operand(&function.args[0], out);
                out.push(' ');
                out.push_str(name);
                out.push(' ');
                self.print_operand(&function.args[1], out);
            }
            "count" if function.args.is_empty() => out.push_str("count(*)"),
            _ => {
                out.push_str(&function.name);
                out.push('(');
                for (i, arg) in function.args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    arg.accept(self, out);
                }
                out.push(')');
            }
        }
    }

    fn visit_field(&mut self, field: &Field, out: &mut String) {
        out.push_str(&field.name);
    }

    fn visit_parameter(&mut self, parameter: &Parameter, out: &mut String) {
        out.push('$');
        out.push_str(&(parameter.index + 1).to_string());
    }
}
