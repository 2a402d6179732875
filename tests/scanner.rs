#[cfg(test)]
mod scanner_tests {
    use rox::error::{Diagnostics, LoxError};
    use rox::scanner::*;
    use rox::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_two_char_operators() {
        assert_token_sequence(
            "! != = == < <= > >= /",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::SLASH, "/"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "class Foo < Bar { init() { this.x = nil; super.y; } } fun_ orchid",
            &[
                (TokenType::CLASS, "class"),
                (TokenType::IDENTIFIER, "Foo"),
                (TokenType::LESS, "<"),
                (TokenType::IDENTIFIER, "Bar"),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::IDENTIFIER, "init"),
                (TokenType::LEFT_PAREN, "("),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::THIS, "this"),
                (TokenType::DOT, "."),
                (TokenType::IDENTIFIER, "x"),
                (TokenType::EQUAL, "="),
                (TokenType::NIL, "nil"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::SUPER, "super"),
                (TokenType::DOT, "."),
                (TokenType::IDENTIFIER, "y"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::IDENTIFIER, "fun_"),
                (TokenType::IDENTIFIER, "orchid"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_numbers_are_parsed_eagerly() {
        let tokens: Vec<Token> = Scanner::new("12 3.25 7.").filter_map(Result::ok).collect();

        let numbers: Vec<f64> = tokens
            .iter()
            .filter_map(|t| match t.token_type {
                TokenType::NUMBER(n) => Some(n),
                _ => None,
            })
            .collect();

        assert_eq!(numbers, vec![12.0, 3.25, 7.0]);

        // A trailing dot is not part of the number.
        assert_eq!(tokens[2].lexeme, "7");
        assert_eq!(tokens[3].token_type, TokenType::DOT);
    }

    #[test]
    fn test_string_literal_value_and_lexeme() {
        let tokens: Vec<Token> = Scanner::new("\"hello world\"")
            .filter_map(Result::ok)
            .collect();

        assert_eq!(tokens[0].lexeme, "\"hello world\"");
        match &tokens[0].token_type {
            TokenType::STRING(s) => assert_eq!(s, "hello world"),
            other => panic!("expected a string token, got {:?}", other),
        }
    }

    #[test]
    fn test_comments_and_newlines_track_lines() {
        let source = "// header comment\nvar a; // trailing\n\n\"multi\nline\" b";
        let tokens: Vec<Token> = Scanner::new(source).filter_map(Result::ok).collect();

        let lines: Vec<(String, usize)> = tokens
            .iter()
            .map(|t| (t.lexeme.clone(), t.line))
            .collect();

        assert_eq!(
            lines,
            vec![
                ("var".to_string(), 2),
                ("a".to_string(), 2),
                (";".to_string(), 2),
                ("\"multi\nline\"".to_string(), 5),
                ("b".to_string(), 5),
                ("".to_string(), 5),
            ]
        );
    }

    #[test]
    fn test_lexemes_round_trip() {
        let source = "var greeting = \"hi\" + name ; if ( n >= 1.5 ) print ! done ;";
        let tokens: Vec<Token> = Scanner::new(source).filter_map(Result::ok).collect();

        let rebuilt: Vec<&str> = tokens
            .iter()
            .filter(|t| t.token_type != TokenType::EOF)
            .map(|t| t.lexeme.as_str())
            .collect();

        assert_eq!(rebuilt.join(" "), source);
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = ",.$(#";
        let results: Vec<_> = Scanner::new(source).collect();

        // COMMA, DOT, error '$', LEFT_PAREN, error '#', EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_token_matches(&results[0], TokenType::COMMA, ",");
        assert_token_matches(&results[1], TokenType::DOT, ".");
        assert_token_matches(&results[3], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[5], TokenType::EOF, "");

        let errors: Vec<&LoxError> = results.iter().filter_map(|r| r.as_ref().err()).collect();
        assert_eq!(errors.len(), 2, "Expected 2 error messages");

        assert_eq!(errors[0].to_string(), "[line 1] Error: Unexpected character.");
        assert_eq!(errors[1].to_string(), "[line 1] Error: Unexpected character.");

        fn assert_token_matches(
            result: &Result<Token, LoxError>,
            expected_type: TokenType,
            expected_lexeme: &str,
        ) {
            match result {
                Ok(token) => {
                    assert_eq!(
                        token.token_type, expected_type,
                        "Expected token type {:?}, got {:?}",
                        expected_type, token.token_type
                    );
                    assert_eq!(
                        token.lexeme, expected_lexeme,
                        "Expected lexeme '{}', got '{}'",
                        expected_lexeme, token.lexeme
                    );
                }
                Err(e) => panic!("Expected token but got error: {}", e),
            }
        }
    }

    #[test]
    fn test_non_ascii_character_is_one_error() {
        let results: Vec<_> = Scanner::new("a é b").collect();
        let errors: Vec<String> = results
            .iter()
            .filter_map(|r| r.as_ref().err().map(|e| e.to_string()))
            .collect();

        assert_eq!(errors, vec!["[line 1] Error: Unexpected character."]);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 3);
    }

    #[test]
    fn test_unterminated_string_reports_opening_line() {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens("print 1;\n\"never\nclosed", &mut diagnostics);

        let messages: Vec<String> = diagnostics.iter().map(|e| e.to_string()).collect();
        assert_eq!(messages, vec!["[line 2] Error: Unterminated string."]);

        let error = diagnostics.iter().next().expect("one error");
        assert!(error.is_static());
        assert_eq!(error.line(), Some(2));

        let last = tokens.last().expect("scanner always yields EOF");
        assert_eq!(last.token_type, TokenType::EOF);
        assert_eq!(last.line, 3);
    }

    #[test]
    fn test_token_display() {
        let tokens: Vec<Token> = Scanner::new("42 \"s\" x 2.5")
            .filter_map(Result::ok)
            .collect();

        let shown: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();

        assert_eq!(
            shown,
            vec![
                "NUMBER 42 42.0",
                "STRING \"s\" s",
                "IDENTIFIER x null",
                "NUMBER 2.5 2.5",
                "EOF  null",
            ]
        );
    }
}
