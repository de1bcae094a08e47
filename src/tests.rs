use std::io::Cursor;

use crate::{
    embed_streams, write_declaration, EmbedOptions, EmbedOutcome, LineChange, LineReader,
};

fn fresh(source: &str, name: &str) -> String {
    let mut out = Vec::new();
    write_declaration(
        &mut LineReader::new(Cursor::new(source.as_bytes())),
        &mut out,
        "const char*",
        name,
    )
    .unwrap();
    String::from_utf8(out).unwrap()
}

/// Runs an embed against an in-memory target. An unchanged target is returned as-is.
fn embed_into_string(source: &str, target: &str, name: &str) -> (String, EmbedOutcome) {
    let mut staging = Vec::new();
    let outcome = embed_streams(
        Cursor::new(source.as_bytes()),
        Cursor::new(target.as_bytes()),
        &mut staging,
        name,
        &EmbedOptions::default(),
    )
    .unwrap();

    if outcome == EmbedOutcome::Unchanged {
        assert!(staging.is_empty());
        (target.to_string(), outcome)
    } else {
        (String::from_utf8(staging).unwrap(), outcome)
    }
}

const HEADER_PREFIX: &str = "#pragma once\n// Generated shaders\n#include <GL/gl.h>\n";
const HEADER_SUFFIX: &str = "\nstatic int use_it(void) {\n    return basic[0];\n}\n";

fn header_with(declaration: &str) -> String {
    format!("{}{}{}", HEADER_PREFIX, declaration, HEADER_SUFFIX)
}

#[test]
fn fresh_embed() {
    assert_eq!(
        fresh("foo\nbar\n", "basic"),
        "\nconst char* basic =\n    \"foo\\n\"\n    \"bar\\n\";\n"
    );
}

#[test]
fn unchanged_reembed() {
    let target = header_with(&fresh("foo\nbar\n", "basic"));
    let (result, outcome) = embed_into_string("foo\nbar\n", &target, "basic");
    assert_eq!(outcome, EmbedOutcome::Unchanged);
    assert_eq!(result, target);
}

#[test]
fn whitespace_and_comment_edits_are_not_changes() {
    let target = header_with(&fresh("foo\nbar\n", "basic"));
    let (_, outcome) = embed_into_string(
        "// leading note\n  foo  \n\n\t bar /* trailing */\n",
        &target,
        "basic",
    );
    assert_eq!(outcome, EmbedOutcome::Unchanged);
}

#[test]
fn single_line_change() {
    let target = header_with(&fresh("foo\nbar\n", "basic"));
    let (result, outcome) = embed_into_string("foo\nbaz\n", &target, "basic");

    assert_eq!(
        outcome,
        EmbedOutcome::Updated {
            changes: vec![LineChange::Replaced {
                old: "bar".into(),
                new: "baz".into()
            }]
        }
    );
    assert_eq!(
        result,
        header_with("\nconst char* basic =\n    \"foo\\n\"\n    \"baz\\n\";\n")
    );
    assert!(result.starts_with(HEADER_PREFIX));
    assert!(result.ends_with(HEADER_SUFFIX));
}

#[test]
fn update_is_idempotent() {
    let source = "#version 330\n\nuniform float t; // time\n\nvoid main() {\n  /* nothing\n     yet */\n}\n";
    let target = header_with(&fresh("#version 120\nvoid main() {}\n", "basic"));

    let (first, outcome) = embed_into_string(source, &target, "basic");
    assert!(matches!(outcome, EmbedOutcome::Updated { .. }));

    let (second, outcome) = embed_into_string(source, &first, "basic");
    assert_eq!(outcome, EmbedOutcome::Unchanged);
    assert_eq!(first, second);
}

#[test]
fn fresh_declaration_is_idempotent() {
    let source = "#version 330\n/* header\n * comment */\nout vec4 c; // color\nvoid main() { c = vec4(1.0); }\n";
    let target = header_with(&fresh(source, "basic"));
    let (_, outcome) = embed_into_string(source, &target, "basic");
    assert_eq!(outcome, EmbedOutcome::Unchanged);
}

#[test]
fn shrinking_source_drops_lines() {
    let target = header_with(&fresh("a\nb\nc\nd\n", "basic"));
    let (result, outcome) = embed_into_string("a\nb\n", &target, "basic");

    assert_eq!(
        outcome,
        EmbedOutcome::Updated {
            changes: vec![
                LineChange::Dropped { old: "c".into() },
                LineChange::Dropped { old: "d".into() }
            ]
        }
    );
    assert_eq!(
        result,
        header_with("\nconst char* basic =\n    \"a\\n\"\n    \"b\\n\";\n")
    );
}

#[test]
fn growing_source_adds_lines() {
    let target = header_with(&fresh("a\n", "basic"));
    let (result, outcome) = embed_into_string("a\nb\n", &target, "basic");

    assert_eq!(
        outcome,
        EmbedOutcome::Updated {
            changes: vec![LineChange::Added { new: "b".into() }]
        }
    );
    assert_eq!(
        result,
        header_with("\nconst char* basic =\n    \"a\\n\"\n    \"b\\n\";\n")
    );
}

#[test]
fn quotes_survive_reembedding() {
    let source = "#define STR(x) \"x;\"\nint y; // \"quoted\"\n";
    let target = header_with(&fresh(source, "basic"));
    assert!(target.contains(r##""#define STR(x) \"x;\"\n""##));

    let (_, outcome) = embed_into_string(source, &target, "basic");
    assert_eq!(outcome, EmbedOutcome::Unchanged);

    let (result, _) = embed_into_string("#define STR(x) \"y;\"\nint y;\n", &target, "basic");
    assert!(result.contains(r##""#define STR(x) \"y;\"\n""##));
    assert!(result.ends_with(HEADER_SUFFIX));
}

#[test]
fn insertion_when_absent() {
    let target = "/* shaders */\n#include <stdio.h>\n\nint other = 1;\nvoid f(void) {}\n";
    let (result, outcome) = embed_into_string("foo\nbar\n", target, "basic");

    let offset = target.find("int other").unwrap();
    assert_eq!(
        outcome,
        EmbedOutcome::Inserted {
            offset: (offset - 1) as u64
        }
    );
    assert_eq!(
        result,
        format!(
            "{}{}{}",
            &target[..offset - 1],
            fresh("foo\nbar\n", "basic"),
            &target[offset - 1..]
        )
    );

    // Once inserted, the declaration is found again.
    let (again, outcome) = embed_into_string("foo\nbar\n", &result, "basic");
    assert_eq!(outcome, EmbedOutcome::Unchanged);
    assert_eq!(again, result);
}

#[test]
fn insertion_skips_similar_names() {
    let target = "const char* basic_old =\n    \"x\\n\";\n";
    let (result, outcome) = embed_into_string("foo\n", target, "basic");
    assert!(matches!(outcome, EmbedOutcome::Inserted { offset: 0 }));
    assert!(result.ends_with(target));
}

#[test]
fn declaration_between_other_declarations() {
    let target = format!(
        "{}{}{}",
        fresh("first\n", "vert"),
        fresh("old\n", "frag"),
        fresh("third\n", "geom")
    );
    let (result, _) = embed_into_string("new\n", &target, "frag");
    assert_eq!(
        result,
        format!(
            "{}{}{}",
            fresh("first\n", "vert"),
            fresh("new\n", "frag"),
            fresh("third\n", "geom")
        )
    );
}

#[test]
fn declaration_ending_the_file_is_reembedded() {
    let (first, outcome) = embed_into_string("foo\n", "int a;\nconst char* basic =", "basic");
    assert_eq!(
        outcome,
        EmbedOutcome::Updated {
            changes: vec![LineChange::Added { new: "foo".into() }]
        }
    );
    assert_eq!(first, "int a;\nconst char* basic =\n    \"foo\\n\";");

    let (second, outcome) = embed_into_string("foo\n", &first, "basic");
    assert_eq!(outcome, EmbedOutcome::Unchanged);
    assert_eq!(second, first);
}

#[test]
fn one_line_declaration_is_updated_in_place() {
    let target = "const char* basic = \"old\\n\";\nint x;\n";
    let (result, outcome) = embed_into_string("new\n", target, "basic");

    assert_eq!(
        outcome,
        EmbedOutcome::Updated {
            changes: vec![LineChange::Replaced {
                old: "old".into(),
                new: "new".into()
            }]
        }
    );
    assert_eq!(result, "const char* basic =\n    \"new\\n\";\nint x;\n");
    assert_eq!(result.matches("const char* basic").count(), 1);

    let (_, outcome) = embed_into_string("new\n", &result, "basic");
    assert_eq!(outcome, EmbedOutcome::Unchanged);
}

#[test]
fn one_line_declaration_that_matches_is_left_alone() {
    let target = "static const char basic[] = \"foo\\n\" \"bar\\n\";\n";
    let (result, outcome) = embed_into_string("foo\nbar\n", target, "basic");
    assert_eq!(outcome, EmbedOutcome::Unchanged);
    assert_eq!(result, target);
}

#[test]
fn extern_declaration_is_not_the_definition() {
    let target = format!("extern const char* basic;\n{}", fresh("foo\n", "basic"));
    let (result, outcome) = embed_into_string("bar\n", &target, "basic");

    assert!(matches!(outcome, EmbedOutcome::Updated { .. }));
    assert_eq!(
        result,
        format!("extern const char* basic;\n{}", fresh("bar\n", "basic"))
    );
}

#[test]
fn initializer_on_its_own_line() {
    let target = "static const char* basic\n    = \"x\\n\";\n";
    let (_, outcome) = embed_into_string("x\n", target, "basic");
    assert_eq!(outcome, EmbedOutcome::Unchanged);

    let (result, _) = embed_into_string("y\n", target, "basic");
    assert_eq!(result, "static const char* basic\n    =\n    \"y\\n\";\n");

    let (_, outcome) = embed_into_string("y\n", &result, "basic");
    assert_eq!(outcome, EmbedOutcome::Unchanged);
}
