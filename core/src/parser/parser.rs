use crate::{
    lexer::{
        lexer::{self, InputSource, Lexer},
        token::{TokenInfo, TokenKind},
    },
    util::error::LineInfo,
};

use super::{
    ast::{ArityAst, Ast, Declaration, Literal, Module, ParamAst, TypeAst},
    error::ParseError,
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Words that cannot be used as function, parameter or operation names.
const KEYWORDS: [&str; 5] = ["fn", "ann", "if", "then", "else"];

/// Binding power of the infix operators. All of them are left-associative.
pub mod prec {
    pub const COMPARISON: u8 = 1;
    pub const ADDITIVE: u8 = 2;
    pub const MULTIPLICATIVE: u8 = 3;
}

/// How deep expressions and types may nest before parsing gives up.
/// Checking walks the same trees recursively, so this also bounds the checker.
pub const MAX_NESTING: usize = 64;

fn precedence(symbol: &str) -> Option<u8> {
    match symbol {
        "==" | "!=" | "<" | ">" | "<=" | ">=" => Some(prec::COMPARISON),
        "+" | "-" => Some(prec::ADDITIVE),
        "*" | "/" => Some(prec::MULTIPLICATIVE),
        _ => None,
    }
}

pub fn from_str(input: &str) -> Parser {
    Parser::new(lexer::from_str(input))
}

pub fn from_string(input: String, source: InputSource) -> Parser {
    Parser::new(lexer::from_string(input, source))
}

pub struct Parser {
    lexer: Lexer,
    /// Expression and type nesting at the current position.
    depth: usize,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        Self { lexer, depth: 0 }
    }

    // ================== Token helpers ==================

    fn next_token(&mut self) -> ParseResult<TokenInfo> {
        Ok(self.lexer.next_token()?)
    }

    fn peek_token(&mut self) -> ParseResult<TokenInfo> {
        Ok(self.lexer.peek_token()?)
    }

    /// Enter one more level of nesting, failing at [`MAX_NESTING`].
    fn enter(&mut self, token: &TokenInfo) -> ParseResult<()> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::new(
                "Expression is nested too deeply".to_string(),
                token.info.clone(),
            )
            .with_hint(format!(
                "Nesting is limited to {} levels, move part of it into a separate function",
                MAX_NESTING
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn expect(&mut self, expected: TokenKind) -> ParseResult<TokenInfo> {
        let token = self.next_token()?;
        if token.token == expected {
            Ok(token)
        } else {
            Err(unexpected(&token, &format!("'{}'", expected)))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> ParseResult<TokenInfo> {
        let token = self.next_token()?;
        if token.token.is_keyword(keyword) {
            Ok(token)
        } else {
            Err(unexpected(&token, &format!("'{}'", keyword)))
        }
    }

    fn expect_op(&mut self, symbol: &str) -> ParseResult<TokenInfo> {
        let token = self.next_token()?;
        if token.token.is_op(symbol) {
            Ok(token)
        } else {
            Err(unexpected(&token, &format!("'{}'", symbol)))
        }
    }

    fn expect_name(&mut self, what: &str) -> ParseResult<(String, LineInfo)> {
        let token = self.next_token()?;
        match token.token {
            TokenKind::Identifier(name) if !KEYWORDS.contains(&name.as_str()) => {
                Ok((name, token.info))
            }
            TokenKind::Identifier(ref name) => Err(ParseError::new(
                format!("Expected {}, found keyword '{}'", what, name),
                token.info,
            )),
            _ => Err(unexpected(&token, what)),
        }
    }

    /// Consume the `;` ending a declaration. The last declaration may omit it.
    fn expect_terminator(&mut self) -> ParseResult<()> {
        let token = self.peek_token()?;
        match token.token {
            TokenKind::SemiColon => {
                self.next_token()?;
                Ok(())
            }
            TokenKind::EndOfFile => Ok(()),
            _ => Err(unexpected(&token, "';'")
                .with_hint("Declarations are separated by ';'".to_string())),
        }
    }

    // ================== Declarations ==================

    pub fn parse_module(&mut self, name: &str) -> ParseResult<Module> {
        let declarations = self.parse_all()?;
        Ok(Module::new(
            name.to_string(),
            declarations,
            self.lexer.source().clone(),
        ))
    }

    pub fn parse_all(&mut self) -> ParseResult<Vec<Declaration>> {
        let mut declarations = vec![];
        while let Some(declaration) = self.parse_one()? {
            declarations.push(declaration);
        }
        Ok(declarations)
    }

    /// Parse the next declaration, or `None` at the end of the input.
    pub fn parse_one(&mut self) -> ParseResult<Option<Declaration>> {
        let token = self.peek_token()?;
        let declaration = match &token.token {
            TokenKind::EndOfFile => return Ok(None),
            TokenKind::SemiColon => {
                self.next_token()?;
                return self.parse_one();
            }
            t if t.is_keyword("ann") => self.parse_annotation()?,
            t if t.is_keyword("fn") => self.parse_function()?,
            _ => {
                return Err(unexpected(&token, "a declaration")
                    .with_hint("Declarations start with 'fn' or 'ann'".to_string()))
            }
        };
        log::trace!("Parsed declaration '{}'", declaration.name());
        self.expect_terminator()?;
        Ok(Some(declaration))
    }

    fn parse_annotation(&mut self) -> ParseResult<Declaration> {
        let start = self.expect_keyword("ann")?.info;
        let token = self.next_token()?;
        let name = match token.token {
            TokenKind::Identifier(name) if !KEYWORDS.contains(&name.as_str()) => name,
            TokenKind::Op(symbol) => symbol,
            _ => return Err(unexpected(&token, "a name to annotate")),
        };
        self.expect(TokenKind::Colon)?;
        let arities = self.parse_arities()?;
        let end = arities.last().map(|a| a.info.clone()).unwrap_or(token.info);
        Ok(Declaration::Annotation {
            name,
            arities,
            info: start.join(&end),
        })
    }

    fn parse_function(&mut self) -> ParseResult<Declaration> {
        let start = self.expect_keyword("fn")?.info;
        let (name, _) = self.expect_name("a function name")?;
        self.expect(TokenKind::LeftParen)?;
        let mut params = vec![];
        if self.peek_token()?.token != TokenKind::RightParen {
            loop {
                params.push(self.parse_param()?);
                if self.peek_token()?.token == TokenKind::Comma {
                    self.next_token()?;
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen)?;
        let return_type = if self.peek_token()?.token.is_op("->") {
            self.next_token()?;
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect_op("=")?;
        let body = self.parse_expr()?;
        let info = start.join(body.info());
        Ok(Declaration::Function {
            name,
            params,
            return_type,
            body,
            info,
        })
    }

    fn parse_param(&mut self) -> ParseResult<ParamAst> {
        let (name, info) = self.expect_name("a parameter name")?;
        let ty = if self.peek_token()?.token == TokenKind::Colon {
            self.next_token()?;
            Some(self.parse_type()?)
        } else {
            None
        };
        let info = match &ty {
            Some(ty) => info.join(ty.info()),
            None => info,
        };
        Ok(ParamAst { name, ty, info })
    }

    // ================== Types ==================

    /// `arity { & arity }`
    fn parse_arities(&mut self) -> ParseResult<Vec<ArityAst>> {
        let mut arities = vec![self.parse_arity()?];
        while self.peek_token()?.token.is_op("&") {
            self.next_token()?;
            arities.push(self.parse_arity()?);
        }
        Ok(arities)
    }

    /// `( [type {, type}] ) -> type`
    fn parse_arity(&mut self) -> ParseResult<ArityAst> {
        let start = self.expect(TokenKind::LeftParen)?.info;
        let mut domain = vec![];
        if self.peek_token()?.token != TokenKind::RightParen {
            loop {
                domain.push(self.parse_type()?);
                if self.peek_token()?.token == TokenKind::Comma {
                    self.next_token()?;
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen)?;
        self.expect_op("->")?;
        let range = self.parse_type()?;
        let info = start.join(range.info());
        Ok(ArityAst {
            domain,
            range,
            info,
        })
    }

    /// `primary { | primary }`
    pub fn parse_type(&mut self) -> ParseResult<TypeAst> {
        let token = self.peek_token()?;
        self.enter(&token)?;
        let ty = self.parse_type_union();
        self.depth -= 1;
        ty
    }

    fn parse_type_union(&mut self) -> ParseResult<TypeAst> {
        let first = self.parse_type_primary()?;
        if !self.peek_token()?.token.is_op("|") {
            return Ok(first);
        }
        let mut members = vec![first];
        while self.peek_token()?.token.is_op("|") {
            self.next_token()?;
            members.push(self.parse_type_primary()?);
        }
        let info = members[0].info().join(members[members.len() - 1].info());
        Ok(TypeAst::Union { members, info })
    }

    fn parse_type_primary(&mut self) -> ParseResult<TypeAst> {
        let token = self.next_token()?;
        match token.token {
            TokenKind::Null => Ok(TypeAst::Null { info: token.info }),
            TokenKind::Identifier(name) if name == "Null" => Ok(TypeAst::Null { info: token.info }),
            TokenKind::Identifier(name) if !KEYWORDS.contains(&name.as_str()) => {
                Ok(TypeAst::Identifier {
                    name,
                    info: token.info,
                })
            }
            TokenKind::LeftParen => {
                let inner = self.parse_type()?;
                self.expect(TokenKind::RightParen)?;
                Ok(inner)
            }
            TokenKind::LeftBracket => {
                let arities = self.parse_arities()?;
                let end = self.expect(TokenKind::RightBracket)?.info;
                Ok(TypeAst::Function {
                    arities,
                    info: token.info.join(&end),
                })
            }
            _ => Err(unexpected(&token, "a type")),
        }
    }

    // ================== Expressions ==================

    pub fn parse_expr(&mut self) -> ParseResult<Ast> {
        let token = self.peek_token()?;
        self.enter(&token)?;
        let expr = if token.token.is_keyword("if") {
            self.parse_conditional()
        } else {
            self.parse_binary(prec::COMPARISON)
        };
        self.depth -= 1;
        expr
    }

    fn parse_conditional(&mut self) -> ParseResult<Ast> {
        let start = self.expect_keyword("if")?.info;
        let test = self.parse_expr()?;
        self.expect_keyword("then")?;
        let then = self.parse_expr()?;
        let otherwise = if self.peek_token()?.token.is_keyword("else") {
            self.next_token()?;
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        let end = match &otherwise {
            Some(otherwise) => otherwise.info().clone(),
            None => then.info().clone(),
        };
        Ok(Ast::Conditional {
            test: Box::new(test),
            then: Box::new(then),
            otherwise,
            info: start.join(&end),
        })
    }

    /// Precedence climbing over the infix operators.
    /// Every operation built deepens the tree, so it counts as a nesting level.
    fn parse_binary(&mut self, min_prec: u8) -> ParseResult<Ast> {
        let mut nodes = 0;
        let expr = self.parse_binary_chain(min_prec, &mut nodes);
        self.depth -= nodes;
        expr
    }

    fn parse_binary_chain(&mut self, min_prec: u8, nodes: &mut usize) -> ParseResult<Ast> {
        let mut lhs = self.parse_primary()?;
        loop {
            let token = self.peek_token()?;
            let TokenKind::Op(symbol) = &token.token else {
                break;
            };
            let Some(prec) = precedence(symbol) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.next_token()?;
            self.enter(&token)?;
            *nodes += 1;
            let rhs = self.parse_binary(prec + 1)?;
            let info = lhs.info().join(rhs.info());
            lhs = Ast::Operation {
                name: symbol.clone(),
                args: vec![lhs, rhs],
                infix: true,
                info,
            };
        }
        Ok(lhs)
    }

    fn parse_primary(&mut self) -> ParseResult<Ast> {
        let token = self.peek_token()?;
        if token.token.is_keyword("if") {
            return self.parse_conditional();
        }
        let token = self.next_token()?;
        let info = token.info.clone();
        match token.token {
            TokenKind::Number(n) => Ok(Ast::Literal {
                value: Literal::Number(n),
                info,
            }),
            TokenKind::String(s) => Ok(Ast::Literal {
                value: Literal::String(s),
                info,
            }),
            TokenKind::Boolean(b) => Ok(Ast::Literal {
                value: Literal::Boolean(b),
                info,
            }),
            TokenKind::Null => Ok(Ast::Literal {
                value: Literal::Null,
                info,
            }),
            TokenKind::Identifier(ref name) if KEYWORDS.contains(&name.as_str()) => {
                Err(unexpected(&token, "an expression"))
            }
            TokenKind::Identifier(name) => {
                if self.peek_token()?.token == TokenKind::LeftParen {
                    self.parse_call(name, info)
                } else {
                    Ok(Ast::Argument { name, info })
                }
            }
            TokenKind::LeftParen => {
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RightParen)?;
                Ok(inner)
            }
            _ => Err(unexpected(&token, "an expression")),
        }
    }

    fn parse_call(&mut self, name: String, start: LineInfo) -> ParseResult<Ast> {
        self.expect(TokenKind::LeftParen)?;
        let mut args = vec![];
        if self.peek_token()?.token != TokenKind::RightParen {
            loop {
                args.push(self.parse_expr()?);
                if self.peek_token()?.token == TokenKind::Comma {
                    self.next_token()?;
                } else {
                    break;
                }
            }
        }
        let end = self.expect(TokenKind::RightParen)?.info;
        Ok(Ast::Operation {
            name,
            args,
            infix: false,
            info: start.join(&end),
        })
    }
}

fn unexpected(token: &TokenInfo, expected: &str) -> ParseError {
    ParseError::new(
        format!("Expected {}, found {}", expected, token.token),
        token.info.clone(),
    )
}
