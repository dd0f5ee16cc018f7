//! 集成测试 - 端到端扫描

mod common;

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use statelex::{collect, Engine, Lexer, ScanConfig, StateFn, StrSource, TokenType};

use common::{is_space, start, summary, BrokenReader, EndlessWords, WORD};

fn words(input: &str) -> Vec<(String, usize, usize, usize)> {
    let stream = Engine::from_text(input).run(start()).unwrap();
    stream.map(|t| summary(&t)).collect()
}

#[test]
fn test_word_reader() {
    let mut stream = Engine::from_text("  foo bar\n    baz    ").run(start()).unwrap();

    let foo = stream.next().unwrap();
    assert_eq!(summary(&foo), ("foo".to_string(), 0, 2, 2));

    let bar = stream.next().unwrap();
    assert_eq!(summary(&bar), ("bar".to_string(), 0, 6, 6));

    let baz = stream.next().unwrap();
    assert_eq!(summary(&baz), ("baz".to_string(), 1, 4, 14));

    assert!(stream.next().is_none(), "token stream should be closed");
    assert!(stream.next().is_none());
}

#[test]
fn test_broken_reader() {
    // foo 能读到，bar 之后读取失败
    let mut stream = Engine::from_reader(BrokenReader::new("foo bar"))
        .run(start())
        .unwrap();

    let foo = stream.next().unwrap();
    assert_eq!(summary(&foo), ("foo".to_string(), 0, 0, 0));

    let err = stream.next().unwrap();
    assert_eq!(err.kind, TokenType::ERROR);
    assert!(err.is_error());
    assert_eq!(summary(&err), ("broken".to_string(), 0, 7, 7));

    assert!(stream.next().is_none(), "no token after the error token");
    assert!(stream.join().is_ok());
}

#[test]
fn test_token_string() {
    let tokens = Engine::from_text("\n \nfoo").tokenize(start());
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, WORD);
    assert_eq!(summary(&tokens[0]), ("foo".to_string(), 2, 0, 3));
    assert_eq!(tokens[0].to_string(), r#"2:0(3): token=0 "foo""#);
}

#[test]
fn test_threaded_and_same_thread_agree() {
    let input = "alpha  beta\tgamma\r\n\ndelta";
    let threaded = words(input);
    let local: Vec<_> = Engine::from_text(input)
        .tokenize(start())
        .iter()
        .map(summary)
        .collect();
    assert_eq!(threaded, local);
    assert_eq!(
        threaded,
        vec![
            ("alpha".to_string(), 0, 0, 0),
            ("beta".to_string(), 0, 7, 7),
            ("gamma".to_string(), 0, 12, 12),
            ("delta".to_string(), 2, 0, 20),
        ]
    );
}

#[test]
fn test_empty_and_blank_input() {
    // 空输入：lex_skip_spaces 立即看到结尾，驱动停止
    assert!(words("").is_empty());
    assert!(words(" \n\t ").is_empty());
}

#[test]
fn test_multibyte_offsets_count_chars() {
    assert_eq!(
        words("中文 🎉x"),
        vec![("中文".to_string(), 0, 0, 0), ("🎉x".to_string(), 0, 3, 3)]
    );
}

#[test]
fn test_reader_and_text_sources_agree() {
    let input = "one two\nthree";
    let from_reader: Vec<_> = Engine::from_reader(input.as_bytes())
        .tokenize(start())
        .iter()
        .map(summary)
        .collect();
    assert_eq!(from_reader, words(input));
}

#[test]
fn test_bounded_channel_preserves_order() {
    let input: String = (0..500).map(|i| format!("w{} ", i)).collect();
    for capacity in [0, 1, 7, 1024] {
        let config = ScanConfig {
            channel_capacity: capacity,
            ..ScanConfig::default()
        };
        let stream = Engine::with_config(StrSource::new(input.clone()), config)
            .run(start())
            .unwrap();
        let texts: Vec<String> = stream.map(|t| t.text).collect();
        let expected: Vec<String> = (0..500).map(|i| format!("w{}", i)).collect();
        assert_eq!(texts, expected, "capacity {}", capacity);
    }
}

#[test]
fn test_dropping_stream_early_lets_producer_finish() {
    let (dropped, signal) = mpsc::channel();
    let engine = Engine::new(EndlessWords::new(dropped));
    let cancel = engine.cancel_token();
    let mut stream = engine.run(start()).unwrap();
    assert_eq!(stream.next().map(|t| t.text), Some("a".to_string()));
    drop(stream);

    // 字符源随引擎一起被丢弃，说明生产者线程已经退出
    assert!(signal.recv_timeout(Duration::from_secs(10)).is_ok());
    assert!(cancel.is_cancelled());
}

const NUMBER: TokenType = TokenType(1);
const UNEXPECTED: TokenType = TokenType(-2);

/// 数字附带解析后的值，其他字符报错
fn lex_numbers(lex: &mut dyn Lexer) -> Option<StateFn> {
    while lex.next().is_some_and(is_space) {}
    lex.backup();
    lex.ignore();

    match lex.peek() {
        None => None,
        Some(c) if c.is_ascii_digit() => {
            while lex.next().is_some_and(|c| c.is_ascii_digit()) {}
            lex.backup();
            let value: u64 = lex.value().parse().unwrap_or_default();
            lex.emit_extra(NUMBER, Some(Arc::new(value)));
            Some(StateFn::new(lex_numbers))
        }
        Some(c) => {
            let pos = lex.position();
            lex.errorf(UNEXPECTED, format_args!("unexpected character {:?} at {}", c, pos))
        }
    }
}

#[test]
fn test_extra_payload_crosses_thread() {
    let stream = Engine::from_text("12 345\n6").run(StateFn::new(lex_numbers)).unwrap();
    let values: Vec<u64> = stream.map(|t| *t.extra::<u64>().unwrap()).collect();
    assert_eq!(values, vec![12, 345, 6]);
}

#[test]
fn test_grammar_error_is_terminal() {
    let stream = Engine::from_text("1 2 x 3 4").run(StateFn::new(lex_numbers)).unwrap();
    let tokens: Vec<_> = stream.collect();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[2].kind, UNEXPECTED);
    assert_eq!(tokens[2].text, "unexpected character 'x' at 0:4(4)");
    assert_eq!(tokens[2].offset(), 4);

    let err = collect(tokens).unwrap_err();
    assert_eq!(err.kind, UNEXPECTED);
}

#[test]
fn test_word_before_error_is_not_published() {
    // 读取失败后，状态函数里的 emit 不再产出 token
    let tokens = Engine::from_reader(BrokenReader::new("abc")).tokenize(start());
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_error());
    assert_eq!(tokens[0].offset(), 3);
}
